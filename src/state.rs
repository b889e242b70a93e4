// state.rs: Playback state machine and UI snapshot types.

use crate::model::{Collection, MediaRef};
use std::time::Duration;

/// Interval between clock ticks while a session is open.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Ticks per wall-clock second at `TICK_INTERVAL`.
pub const TICKS_PER_SECOND: f64 = 10.0;

/// The (author, item) pair identifying the currently displayed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub author: usize,
    pub item: usize,
}

impl Coordinate {
    pub fn new(author: usize, item: usize) -> Self {
        Self { author, item }
    }
}

/// The authoritative record of what is showing, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Closed,
    Open {
        at: Coordinate,
        /// Accumulated display progress for the current item, in [0, 100).
        progress: f64,
        paused: bool,
    },
}

impl PlaybackState {
    pub fn is_open(&self) -> bool {
        matches!(self, PlaybackState::Open { .. })
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            PlaybackState::Open { at, .. } => Some(*at),
            PlaybackState::Closed => None,
        }
    }
}

/// Bundles the collection and playback record, plus versioning. The version
/// counter is bumped on every observable change so publishers can skip
/// redundant snapshots.
pub struct ViewerState {
    pub collection: Collection,
    pub playback: PlaybackState,
    pub version: u64,
}

impl ViewerState {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            playback: PlaybackState::Closed,
            version: 0,
        }
    }

    pub fn bump(&mut self) {
        self.version += 1;
    }

    /// Start an open session at the first item of `author`.
    pub fn open_at(&mut self, author: usize) {
        self.playback = PlaybackState::Open {
            at: Coordinate::new(author, 0),
            progress: 0.0,
            paused: false,
        };
        self.bump();
    }

    pub fn close(&mut self) {
        if self.playback.is_open() {
            self.playback = PlaybackState::Closed;
            self.bump();
        }
    }

    pub fn set_paused(&mut self, value: bool) {
        if let PlaybackState::Open { paused, .. } = &mut self.playback
            && *paused != value
        {
            *paused = value;
            self.bump();
        }
    }

    /// Move to a new coordinate. Progress resets to zero on every coordinate
    /// change, regardless of direction.
    pub fn set_coordinate(&mut self, to: Coordinate) {
        if let PlaybackState::Open { at, progress, .. } = &mut self.playback {
            *at = to;
            *progress = 0.0;
            self.bump();
        }
    }

    /// Apply one tick of progress to the current item. Returns true when the
    /// accumulated progress crossed the advance threshold. No-op while paused
    /// or closed; a tick already in flight when the session closes lands here
    /// harmlessly.
    pub fn tick_progress(&mut self) -> bool {
        let Some(at) = self.playback.coordinate() else {
            return false;
        };
        let Some(duration) = self
            .collection
            .item(at.author, at.item)
            .map(|i| i.duration_seconds)
        else {
            return false;
        };
        if let PlaybackState::Open {
            progress, paused, ..
        } = &mut self.playback
        {
            if *paused || duration <= 0.0 {
                return false;
            }
            // Ties progress rate to the item's wall-clock duration; compare
            // with >= to tolerate tick jitter.
            *progress += 100.0 / (duration * TICKS_PER_SECOND);
            let crossed = *progress >= 100.0;
            self.bump();
            return crossed;
        }
        false
    }
}

/// Snapshot of one author row for the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: String,
    pub display_name: String,
    pub seen: bool,
}

/// Snapshot of the currently playing item for the card view.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub author_id: String,
    pub author_name: String,
    pub author_index: usize,
    pub item_index: usize,
    pub item_count: usize,
    pub item_id: String,
    pub caption: String,
    pub media: MediaRef,
    pub progress: f64,
    pub paused: bool,
    pub like_count: u64,
    pub liked_by_viewer: bool,
    pub view_count: u64,
    pub tags: Vec<String>,
}

/// Represents a UI update for the gallery and playback state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub authors: Vec<AuthorSummary>,
    /// Present while a session is open.
    pub card: Option<CardView>,
    pub version: u64, // Incremented on any state change
}

impl ViewerState {
    /// Build the snapshot the UI renders from.
    pub fn snapshot(&self) -> Update {
        let authors = self
            .collection
            .authors
            .iter()
            .map(|a| AuthorSummary {
                id: a.id.clone(),
                display_name: a.display_name.clone(),
                seen: !a.has_unseen_items(),
            })
            .collect();

        let card = match self.playback {
            PlaybackState::Open {
                at,
                progress,
                paused,
            } => {
                let author = &self.collection.authors[at.author];
                let item = &author.items[at.item];
                Some(CardView {
                    author_id: author.id.clone(),
                    author_name: author.display_name.clone(),
                    author_index: at.author,
                    item_index: at.item,
                    item_count: author.items.len(),
                    item_id: item.id.clone(),
                    caption: item.caption.clone(),
                    media: item.media.clone(),
                    progress,
                    paused,
                    like_count: item.like_count,
                    liked_by_viewer: item.liked_by_viewer,
                    view_count: item.view_count,
                    tags: item.tags.iter().cloned().collect(),
                })
            }
            PlaybackState::Closed => None,
        };

        Update {
            authors,
            card,
            version: self.version,
        }
    }
}
