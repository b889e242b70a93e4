use crate::event::Command;
use crate::state::Update;
use tokio::sync::mpsc;

/// Pipe mode (stdout only, for scripting): open `start_author` and print one
/// line per displayed item as autoplay advances; exit when the run of
/// authors plays out and the session closes.
pub async fn run_pipe(
    mut update_rx: mpsc::Receiver<Update>,
    cmd_tx: mpsc::Sender<Command>,
    start_author: Option<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(author_id) = start_author else {
        return Ok(());
    };
    cmd_tx
        .send(Command::Open(author_id))
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let mut was_open = false;
    let mut saw_idle_snapshot = false;
    let mut last_coordinate: Option<(usize, usize)> = None;

    while let Some(update) = update_rx.recv().await {
        match update.card {
            Some(card) => {
                was_open = true;
                let coordinate = (card.author_index, card.item_index);
                if last_coordinate != Some(coordinate) {
                    println!(
                        "{} [{}/{}] {}",
                        card.author_name,
                        card.item_index + 1,
                        card.item_count,
                        card.caption
                    );
                    last_coordinate = Some(coordinate);
                }
            }
            None if was_open => break,
            None => {
                // The first card-less snapshot is the controller's initial
                // publish; a second one before anything played means the
                // open was rejected and nothing ever will play.
                if saw_idle_snapshot {
                    break;
                }
                saw_idle_snapshot = true;
            }
        }
    }

    let _ = cmd_tx.send(Command::Shutdown).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn exits_when_open_is_rejected() {
        let (update_tx, update_rx) = mpsc::channel(8);
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let task = tokio::spawn(run_pipe(update_rx, cmd_tx, Some("ghost".to_string())));

        // The controller's initial snapshot, then the forced snapshot it
        // publishes after rejecting the open.
        update_tx.send(Update::default()).await.unwrap();
        update_tx.send(Update::default()).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("pipe mode exited")
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd_rx.recv().await,
            Some(Command::Open("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn exits_without_a_start_author() {
        let (_update_tx, update_rx) = mpsc::channel::<Update>(8);
        let (cmd_tx, _cmd_rx) = mpsc::channel(8);
        run_pipe(update_rx, cmd_tx, None).await.unwrap();
    }
}
