// social.rs: The like side-channel.
//
// Toggling operates on the collection's item store by id and never reads or
// writes progress, pause state, or the clock, so it is safe to call at any
// point in a session, including while paused or mid-tick.

use crate::model::{Collection, ViewerError};

/// Outcome of a toggle, for event emission and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeChange {
    pub item_id: String,
    pub liked: bool,
    pub like_count: u64,
}

/// Flip the viewer's like on `item_id`, moving the count by exactly one in
/// the matching direction.
pub fn toggle_like(collection: &mut Collection, item_id: &str) -> Result<LikeChange, ViewerError> {
    let Some(item) = collection.item_mut_by_id(item_id) else {
        return Err(ViewerError::NotFound(item_id.to_string()));
    };
    if item.liked_by_viewer {
        item.liked_by_viewer = false;
        item.like_count = item.like_count.saturating_sub(1);
    } else {
        item.liked_by_viewer = true;
        item.like_count += 1;
    }
    Ok(LikeChange {
        item_id: item.id.clone(),
        liked: item.liked_by_viewer,
        like_count: item.like_count,
    })
}
