// model.rs: Data shapes for the bites feed (authors, items, media).

use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors surfaced by the viewer command surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("unknown id: {0}")]
    NotFound(String),
    #[error("item {0} has a non-positive duration")]
    InvalidDuration(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Opaque reference to displayable content. The viewer never fetches or
/// decodes media; it only shows what the reference says about it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub kind: MediaKind,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// One timed media unit. Social counters are the only mutable fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub author_id: String,
    pub media: MediaRef,
    #[serde(default)]
    pub caption: String,
    /// How long the item auto-displays. Must be > 0 for a playable item.
    pub duration_seconds: f64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub liked_by_viewer: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub created_at: String,
}

/// An ordered group of items belonging to one creator; the unit of opening
/// the viewer. Item order is fixed for the life of a viewing session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub items: Vec<Item>,
    /// Session-scoped: set once the author has been entered at least once.
    #[serde(skip)]
    pub seen: bool,
}

impl Author {
    pub fn has_unseen_items(&self) -> bool {
        !self.seen
    }

    pub fn last_item_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }
}

/// The ordered set of authors supplied to the viewer at open time. Author
/// order does not change while a session is open.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub authors: Vec<Author>,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn author_index(&self, author_id: &str) -> Option<usize> {
        self.authors.iter().position(|a| a.id == author_id)
    }

    pub fn item(&self, author: usize, item: usize) -> Option<&Item> {
        self.authors.get(author).and_then(|a| a.items.get(item))
    }

    pub fn item_mut_by_id(&mut self, item_id: &str) -> Option<&mut Item> {
        self.authors
            .iter_mut()
            .flat_map(|a| a.items.iter_mut())
            .find(|i| i.id == item_id)
    }
}
