// controller.rs: The viewer controller and its command surface.
//
// One controller instance owns the collection, playback record, seen
// tracker, and clock. Commands are synchronous methods that run to
// completion; the async `run` loop merely feeds them from the command
// channel and interleaves clock ticks, so no two mutations of playback
// state ever overlap.

use crate::event::{Command, ViewerEvent};
use crate::model::{Collection, ViewerError};
use crate::state::{TICK_INTERVAL, Update, ViewerState};
use crate::viewer::clock::Clock;
use crate::viewer::navigator::{self, Advance, Retreat};
use crate::viewer::social;
use crate::viewer::tracker::SeenTracker;
use tokio::sync::mpsc;

pub struct Viewer {
    state: ViewerState,
    tracker: SeenTracker,
    clock: Clock,
    update_tx: mpsc::Sender<Update>,
    events_tx: Option<mpsc::Sender<ViewerEvent>>,
    last_sent_version: Option<u64>,
}

impl Viewer {
    /// Build a viewer around an already-loaded collection. Returns the tick
    /// receiver to hand back to `run`.
    pub fn new(
        collection: Collection,
        update_tx: mpsc::Sender<Update>,
        events_tx: Option<mpsc::Sender<ViewerEvent>>,
    ) -> (Self, mpsc::Receiver<()>) {
        let (clock, tick_rx) = Clock::new(TICK_INTERVAL);
        (
            Self {
                state: ViewerState::new(collection),
                tracker: SeenTracker::default(),
                clock,
                update_tx,
                events_tx,
                last_sent_version: None,
            },
            tick_rx,
        )
    }

    /// Open a session on `author_id`, starting at its first item. Re-opening
    /// while already open restarts on the requested author.
    pub fn open(&mut self, author_id: &str) -> Result<(), ViewerError> {
        let Some(index) = self.state.collection.author_index(author_id) else {
            return Err(ViewerError::NotFound(author_id.to_string()));
        };
        let author = &self.state.collection.authors[index];
        let Some(first) = author.items.first() else {
            return Err(ViewerError::NotFound(author_id.to_string()));
        };
        if first.duration_seconds <= 0.0 {
            // Reject rather than divide by a non-positive duration later.
            return Err(ViewerError::InvalidDuration(first.id.clone()));
        }
        self.state.open_at(index);
        self.enter_author(index);
        self.record_view();
        self.clock.arm();
        Ok(())
    }

    /// End the session. The clock is disarmed synchronously; a tick already
    /// in flight is a no-op against the closed state.
    pub fn close(&mut self) {
        self.state.close();
        self.clock.disarm();
    }

    /// Step forward. Past the last item of the last author this closes the
    /// viewer; that is a defined outcome, not an error.
    pub fn next(&mut self) {
        let Some(at) = self.state.playback.coordinate() else {
            return;
        };
        match navigator::advance(&self.state.collection, at) {
            Advance::To(to) => self.move_to(to),
            Advance::EndOfCollection => self.close(),
        }
    }

    /// Step backward. At the very first item this stays put; it never
    /// closes.
    pub fn previous(&mut self) {
        let Some(at) = self.state.playback.coordinate() else {
            return;
        };
        match navigator::retreat(&self.state.collection, at) {
            Retreat::To(to) => self.move_to(to),
            Retreat::AtStart => {}
        }
    }

    /// Freeze progress. Paused wall-clock time does not count toward the
    /// item's duration; the clock stays armed and its ticks no-op.
    pub fn pause(&mut self) {
        self.state.set_paused(true);
    }

    pub fn resume(&mut self) {
        self.state.set_paused(false);
    }

    /// Flip the like on any item in the collection, displayed or not.
    pub fn toggle_like(&mut self, item_id: &str) -> Result<(), ViewerError> {
        let change = social::toggle_like(&mut self.state.collection, item_id)?;
        self.state.bump();
        tracing::debug!(
            item_id = %change.item_id,
            liked = change.liked,
            like_count = change.like_count,
            "like toggled"
        );
        self.emit(ViewerEvent::ItemLikeToggled {
            item_id: change.item_id,
            liked: change.liked,
        });
        Ok(())
    }

    /// Apply one clock tick: accumulate progress and advance when the
    /// current item's display time is up.
    pub fn tick(&mut self) {
        if !self.state.tick_progress() {
            return;
        }
        let Some(at) = self.state.playback.coordinate() else {
            return;
        };
        match navigator::advance(&self.state.collection, at) {
            Advance::To(to) => self.move_to(to),
            Advance::EndOfCollection => self.close(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &ViewerState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn clock_armed(&self) -> bool {
        self.clock.is_armed()
    }

    fn move_to(&mut self, to: crate::state::Coordinate) {
        let from_author = self.state.playback.coordinate().map(|c| c.author);
        self.state.set_coordinate(to);
        if from_author != Some(to.author) {
            self.enter_author(to.author);
        }
        self.record_view();
    }

    /// Mark the entered author as seen, emitting `AuthorSeen` at most once
    /// per session.
    fn enter_author(&mut self, index: usize) {
        let author = &mut self.state.collection.authors[index];
        let id = author.id.clone();
        if self.tracker.mark_seen(&id) {
            author.seen = true;
            self.state.bump();
            self.emit(ViewerEvent::AuthorSeen { author_id: id });
        }
    }

    /// View policy: each item counts one view every time it becomes the
    /// displayed item.
    fn record_view(&mut self) {
        let Some(at) = self.state.playback.coordinate() else {
            return;
        };
        if let Some(item) = self
            .state
            .collection
            .authors
            .get_mut(at.author)
            .and_then(|a| a.items.get_mut(at.item))
        {
            item.view_count += 1;
            self.state.bump();
        }
    }

    fn emit(&self, event: ViewerEvent) {
        // Fire-and-forget; a slow or absent consumer never blocks playback.
        if let Some(tx) = &self.events_tx {
            let _ = tx.try_send(event);
        }
    }

    /// Apply one command. Returns the publish decision, or `None` when the
    /// presentation layer asked to shut down. A rejected command leaves the
    /// state version untouched, so it forces the snapshot out; consumers
    /// like pipe mode rely on seeing that nothing started playing.
    fn handle_command(&mut self, command: Command) -> Option<bool> {
        match command {
            Command::Open(author_id) => {
                if let Err(e) = self.open(&author_id) {
                    tracing::warn!(error = %e, "open rejected");
                    return Some(true);
                }
                Some(false)
            }
            Command::Close => {
                self.close();
                Some(false)
            }
            Command::Next => {
                self.next();
                Some(false)
            }
            Command::Previous => {
                self.previous();
                Some(false)
            }
            Command::Pause => {
                self.pause();
                Some(false)
            }
            Command::Resume => {
                self.resume();
                Some(false)
            }
            Command::ToggleLike(item_id) => {
                if let Err(e) = self.toggle_like(&item_id) {
                    tracing::warn!(error = %e, "like rejected");
                    return Some(true);
                }
                Some(false)
            }
            Command::Shutdown => None,
        }
    }

    /// Push a snapshot to the UI unless nothing changed since the last send.
    async fn publish(&mut self, force: bool) {
        if !force && self.last_sent_version == Some(self.state.version) {
            return;
        }
        let update = self.state.snapshot();
        let version = update.version;
        if self.update_tx.send(update).await.is_ok() {
            self.last_sent_version = Some(version);
        }
    }

    /// Central loop: commands from the presentation layer and ticks from the
    /// clock, strictly serialized.
    pub async fn run(mut self, mut cmd_rx: mpsc::Receiver<Command>, mut tick_rx: mpsc::Receiver<()>) {
        self.publish(true).await;
        loop {
            tokio::select! {
                biased;

                maybe_cmd = cmd_rx.recv() => {
                    let Some(command) = maybe_cmd else { break };
                    match self.handle_command(command) {
                        Some(force) => self.publish(force).await,
                        None => break,
                    }
                }

                maybe_tick = tick_rx.recv() => {
                    if maybe_tick.is_some() {
                        self.tick();
                        self.publish(false).await;
                    }
                }
            }
        }
        self.clock.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Item, MediaKind, MediaRef};
    use crate::state::{Coordinate, PlaybackState};

    fn item(author: &str, n: usize, duration: f64) -> Item {
        Item {
            id: format!("{author}-{n}"),
            author_id: author.to_string(),
            media: MediaRef {
                kind: MediaKind::Image,
                url: String::new(),
                thumbnail: None,
            },
            caption: String::new(),
            duration_seconds: duration,
            view_count: 0,
            like_count: 0,
            liked_by_viewer: false,
            tags: Default::default(),
            created_at: String::new(),
        }
    }

    fn author(id: &str, durations: &[f64]) -> Author {
        Author {
            id: id.to_string(),
            display_name: id.to_string(),
            avatar_url: None,
            items: durations
                .iter()
                .enumerate()
                .map(|(n, &d)| item(id, n, d))
                .collect(),
            seen: false,
        }
    }

    fn viewer(authors: Vec<Author>) -> (Viewer, mpsc::Receiver<ViewerEvent>) {
        let (update_tx, _update_rx) = mpsc::channel(8);
        let (events_tx, events_rx) = mpsc::channel(8);
        let (viewer, _tick_rx) = Viewer::new(Collection { authors }, update_tx, Some(events_tx));
        (viewer, events_rx)
    }

    fn coordinate(viewer: &Viewer) -> Option<Coordinate> {
        viewer.state().playback.coordinate()
    }

    #[tokio::test]
    async fn open_unknown_author_is_rejected() {
        let (mut viewer, _events) = viewer(vec![author("a", &[5.0])]);
        let err = viewer.open("nobody").unwrap_err();
        assert_eq!(err, ViewerError::NotFound("nobody".to_string()));
        assert_eq!(viewer.state().playback, PlaybackState::Closed);
        assert!(!viewer.clock_armed());
    }

    #[tokio::test]
    async fn open_rejects_non_positive_first_duration() {
        let (mut viewer, _events) = viewer(vec![author("a", &[0.0])]);
        let err = viewer.open("a").unwrap_err();
        assert_eq!(err, ViewerError::InvalidDuration("a-0".to_string()));
        assert_eq!(viewer.state().playback, PlaybackState::Closed);
    }

    #[tokio::test]
    async fn forward_navigation_terminates_by_closing() {
        let (mut viewer, _events) =
            viewer(vec![author("a", &[5.0, 5.0]), author("b", &[5.0])]);
        viewer.open("a").unwrap();
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(0, 0)));

        viewer.next();
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(0, 1)));
        viewer.next();
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(1, 0)));
        viewer.next();
        assert_eq!(viewer.state().playback, PlaybackState::Closed);
        assert!(!viewer.clock_armed());

        // Idempotent once closed.
        viewer.next();
        assert_eq!(viewer.state().playback, PlaybackState::Closed);
    }

    #[tokio::test]
    async fn backward_navigation_noops_at_the_start() {
        let (mut viewer, _events) = viewer(vec![author("a", &[5.0, 5.0])]);
        viewer.open("a").unwrap();
        viewer.previous();
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(0, 0)));
        assert!(viewer.state().playback.is_open());
    }

    #[tokio::test]
    async fn backward_navigation_jumps_to_last_item_of_previous_author() {
        let (mut viewer, _events) =
            viewer(vec![author("a", &[5.0, 5.0]), author("b", &[5.0, 5.0, 5.0])]);
        viewer.open("b").unwrap();
        viewer.previous();
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(0, 1)));
    }

    #[tokio::test]
    async fn fifty_ticks_play_out_a_five_second_item() {
        let (mut viewer, mut events) =
            viewer(vec![author("a", &[5.0]), author("b", &[4.0, 4.0])]);
        viewer.open("a").unwrap();
        assert_eq!(events.try_recv().ok(), Some(ViewerEvent::AuthorSeen {
            author_id: "a".to_string(),
        }));

        // 50 ticks at 100ms cover the 5s duration and cross to author b.
        for _ in 0..49 {
            viewer.tick();
        }
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(0, 0)));
        viewer.tick();
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(1, 0)));
        let PlaybackState::Open { progress, .. } = viewer.state().playback else {
            panic!("expected open session");
        };
        assert_eq!(progress, 0.0);
        assert_eq!(events.try_recv().ok(), Some(ViewerEvent::AuthorSeen {
            author_id: "b".to_string(),
        }));

        viewer.close();
        assert_eq!(viewer.state().playback, PlaybackState::Closed);
        assert!(!viewer.clock_armed());

        // A stray tick delivered after close is a no-op.
        viewer.tick();
        assert_eq!(viewer.state().playback, PlaybackState::Closed);
    }

    #[tokio::test]
    async fn pause_and_resume_gate_tick_driven_advance() {
        let (mut viewer, _events) = viewer(vec![author("a", &[1.0, 1.0])]);
        viewer.open("a").unwrap();
        viewer.pause();
        for _ in 0..30 {
            viewer.tick();
        }
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(0, 0)));

        viewer.resume();
        for _ in 0..10 {
            viewer.tick();
        }
        assert_eq!(coordinate(&viewer), Some(Coordinate::new(0, 1)));
    }

    #[tokio::test]
    async fn pause_while_closed_is_a_noop() {
        let (mut viewer, _events) = viewer(vec![author("a", &[5.0])]);
        viewer.pause();
        viewer.resume();
        assert_eq!(viewer.state().playback, PlaybackState::Closed);
    }

    #[tokio::test]
    async fn author_seen_is_emitted_at_most_once() {
        let (mut viewer, mut events) = viewer(vec![author("a", &[5.0])]);
        viewer.open("a").unwrap();
        assert!(events.try_recv().is_ok());
        viewer.close();
        viewer.open("a").unwrap();
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn like_toggle_emits_and_never_touches_playback() {
        let (mut viewer, mut events) = viewer(vec![author("a", &[5.0, 5.0])]);
        viewer.open("a").unwrap();
        for _ in 0..3 {
            viewer.tick();
        }
        let before = viewer.state().playback;

        viewer.toggle_like("a-1").unwrap();
        assert_eq!(viewer.state().playback, before);
        // Skip the AuthorSeen from open.
        assert!(events.try_recv().is_ok());
        assert_eq!(events.try_recv().ok(), Some(ViewerEvent::ItemLikeToggled {
            item_id: "a-1".to_string(),
            liked: true,
        }));
    }

    #[tokio::test]
    async fn rejected_open_still_publishes_a_snapshot() {
        let (update_tx, mut update_rx) = mpsc::channel(8);
        let (viewer, tick_rx) = Viewer::new(
            Collection {
                authors: vec![author("a", &[5.0])],
            },
            update_tx,
            None,
        );
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        tokio::spawn(viewer.run(cmd_rx, tick_rx));

        let initial = update_rx.recv().await.expect("initial snapshot");
        assert!(initial.card.is_none());

        // The version does not change on a rejected open, so only a forced
        // publish makes the outcome observable downstream.
        cmd_tx
            .send(Command::Open("ghost".to_string()))
            .await
            .unwrap();
        let after = update_rx.recv().await.expect("snapshot after rejected open");
        assert!(after.card.is_none());
    }

    #[tokio::test]
    async fn shutdown_command_stops_the_run_loop() {
        let (update_tx, mut update_rx) = mpsc::channel(8);
        let (viewer, tick_rx) = Viewer::new(
            Collection {
                authors: vec![author("a", &[5.0])],
            },
            update_tx,
            None,
        );
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let task = tokio::spawn(viewer.run(cmd_rx, tick_rx));

        assert!(update_rx.recv().await.is_some());
        cmd_tx.send(Command::Shutdown).await.unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), task)
            .await
            .expect("run loop exited")
            .unwrap();
    }

    #[tokio::test]
    async fn each_displayed_item_counts_one_view() {
        let (mut viewer, _events) = viewer(vec![author("a", &[5.0, 5.0])]);
        viewer.open("a").unwrap();
        assert_eq!(viewer.state().collection.authors[0].items[0].view_count, 1);
        viewer.next();
        assert_eq!(viewer.state().collection.authors[0].items[1].view_count, 1);
    }
}
