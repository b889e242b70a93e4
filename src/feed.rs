// feed.rs: Loading and sanitizing the bites feed.
//
// The viewer itself never fetches anything; it is handed an in-memory
// `Collection`. This module is the loading boundary: it reads a JSON feed
// file, drops entries the playback core must never see (items with
// non-positive durations, authors left with no items), and provides a
// built-in demo feed for running without arguments.

use crate::model::Collection;
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse feed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("feed contains no playable authors")]
    Empty,
}

/// Read a JSON feed from `path` and sanitize it for playback.
pub fn load_collection(path: &str) -> Result<Collection, FeedError> {
    let raw = std::fs::read_to_string(path)?;
    let collection: Collection = serde_json::from_str(&raw)?;
    let collection = sanitize(collection);
    if collection.is_empty() {
        return Err(FeedError::Empty);
    }
    Ok(collection)
}

/// Drop items the playback core cannot display and authors with nothing left
/// to show. An author with zero items is never presented to the navigator.
fn sanitize(mut collection: Collection) -> Collection {
    for author in &mut collection.authors {
        let before = author.items.len();
        author.items.retain(|i| i.duration_seconds > 0.0);
        if author.items.len() < before {
            tracing::warn!(
                author = %author.id,
                dropped = before - author.items.len(),
                "dropped items with non-positive durations"
            );
        }
    }
    let before = collection.authors.len();
    collection.authors.retain(|a| !a.items.is_empty());
    if collection.authors.len() < before {
        tracing::warn!(
            dropped = before - collection.authors.len(),
            "dropped authors with no playable items"
        );
    }
    collection
}

static DEMO_FEED: Lazy<Collection> = Lazy::new(|| {
    serde_json::from_str(DEMO_FEED_JSON).expect("built-in demo feed is valid JSON")
});

/// A small built-in feed so the viewer runs without a `--feed` path.
pub fn demo_collection() -> Collection {
    DEMO_FEED.clone()
}

const DEMO_FEED_JSON: &str = r#"[
  {
    "id": "sourdough-sam",
    "displayName": "Sourdough Sam",
    "items": [
      {
        "id": "sam-1",
        "authorId": "sourdough-sam",
        "media": { "kind": "video", "url": "https://cdn.example/bites/sam-1.mp4" },
        "caption": "Overnight levain, 80% hydration. Watch the fold.",
        "durationSeconds": 5,
        "likeCount": 42,
        "viewCount": 311,
        "tags": ["sourdough", "bread"]
      },
      {
        "id": "sam-2",
        "authorId": "sourdough-sam",
        "media": { "kind": "image", "url": "https://cdn.example/bites/sam-2.jpg" },
        "caption": "Crumb shot. Open enough?",
        "durationSeconds": 4,
        "likeCount": 97,
        "viewCount": 560,
        "tags": ["crumb"]
      }
    ]
  },
  {
    "id": "miso-mei",
    "displayName": "Miso Mei",
    "items": [
      {
        "id": "mei-1",
        "authorId": "miso-mei",
        "media": { "kind": "video", "url": "https://cdn.example/bites/mei-1.mp4" },
        "caption": "One-pan miso butter salmon in four minutes.",
        "durationSeconds": 4,
        "likeCount": 18,
        "viewCount": 120,
        "tags": ["salmon", "weeknight"]
      },
      {
        "id": "mei-2",
        "authorId": "miso-mei",
        "media": { "kind": "image", "url": "https://cdn.example/bites/mei-2.jpg" },
        "caption": "Glaze consistency check.",
        "durationSeconds": 4,
        "likeCount": 7,
        "viewCount": 88
      },
      {
        "id": "mei-3",
        "authorId": "miso-mei",
        "media": { "kind": "image", "url": "https://cdn.example/bites/mei-3.jpg" },
        "caption": "Plated. Scallions always last.",
        "durationSeconds": 3,
        "likeCount": 25,
        "viewCount": 140,
        "tags": ["plating"]
      }
    ]
  },
  {
    "id": "pantry-pete",
    "displayName": "Pantry Pete",
    "items": [
      {
        "id": "pete-1",
        "authorId": "pantry-pete",
        "media": { "kind": "image", "url": "https://cdn.example/bites/pete-1.jpg" },
        "caption": "Three meals from one can of chickpeas.",
        "durationSeconds": 6,
        "likeCount": 4,
        "viewCount": 33,
        "tags": ["pantry", "budget"]
      }
    ]
  }
]"#;
