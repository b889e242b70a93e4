// clock.rs: The single repeating timer that drives playback progress.
//
// While armed, a spawned task forwards one tick per interval onto an mpsc
// channel consumed by the controller's select loop. Arming is idempotent so
// at most one underlying task exists per viewer instance; a second timer
// would double playback speed.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct Clock {
    interval: Duration,
    tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl Clock {
    /// Create a disarmed clock and the receiving end of its tick channel.
    pub fn new(interval: Duration) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (
            Self {
                interval,
                tx,
                task: None,
            },
            rx,
        )
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start emitting ticks. Idempotent: an already-armed clock keeps its
    /// existing task and this returns false.
    pub fn arm(&mut self) -> bool {
        if self.is_armed() {
            return false;
        }
        let tx = self.tx.clone();
        let every = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick of tokio's interval completes immediately; swallow
            // it so progress starts accruing one interval after arming.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        }));
        true
    }

    /// Stop emitting ticks. Idempotent.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.disarm();
    }
}
