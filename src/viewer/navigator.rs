// navigator.rs: Pure coordinate arithmetic for moving through a collection.
//
// Both functions only read the collection and have no side effects, so
// manual navigation and timer-driven advance share exactly the same rules
// and can be tested without timers.

use crate::model::Collection;
use crate::state::Coordinate;

/// Result of a forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    To(Coordinate),
    /// Past the last item of the last author; the caller closes the session.
    EndOfCollection,
}

/// Result of a backward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    To(Coordinate),
    /// Already at the very first item of the very first author; stay put.
    AtStart,
}

/// Compute the next coordinate after `at`. Crossing an author boundary lands
/// on the first item of the following author.
pub fn advance(collection: &Collection, at: Coordinate) -> Advance {
    let author = &collection.authors[at.author];
    if at.item + 1 < author.items.len() {
        return Advance::To(Coordinate::new(at.author, at.item + 1));
    }
    if at.author + 1 < collection.len() {
        return Advance::To(Coordinate::new(at.author + 1, 0));
    }
    Advance::EndOfCollection
}

/// Compute the coordinate before `at`. Crossing an author boundary lands on
/// the *last* item of the preceding author, not its first.
pub fn retreat(collection: &Collection, at: Coordinate) -> Retreat {
    if at.item > 0 {
        return Retreat::To(Coordinate::new(at.author, at.item - 1));
    }
    if at.author > 0 {
        let previous = &collection.authors[at.author - 1];
        return Retreat::To(Coordinate::new(at.author - 1, previous.last_item_index()));
    }
    Retreat::AtStart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Collection, Item, MediaKind, MediaRef};

    /// Build a collection with the given per-author item counts.
    fn collection(item_counts: &[usize]) -> Collection {
        let authors = item_counts
            .iter()
            .enumerate()
            .map(|(a, &count)| Author {
                id: format!("author-{a}"),
                display_name: format!("Author {a}"),
                avatar_url: None,
                items: (0..count)
                    .map(|i| Item {
                        id: format!("item-{a}-{i}"),
                        author_id: format!("author-{a}"),
                        media: MediaRef {
                            kind: MediaKind::Image,
                            url: String::new(),
                            thumbnail: None,
                        },
                        caption: String::new(),
                        duration_seconds: 5.0,
                        view_count: 0,
                        like_count: 0,
                        liked_by_viewer: false,
                        tags: Default::default(),
                        created_at: String::new(),
                    })
                    .collect(),
                seen: false,
            })
            .collect();
        Collection { authors }
    }

    #[test]
    fn advance_steps_within_author_then_crosses() {
        let c = collection(&[2, 1]);
        assert_eq!(
            advance(&c, Coordinate::new(0, 0)),
            Advance::To(Coordinate::new(0, 1))
        );
        assert_eq!(
            advance(&c, Coordinate::new(0, 1)),
            Advance::To(Coordinate::new(1, 0))
        );
        assert_eq!(advance(&c, Coordinate::new(1, 0)), Advance::EndOfCollection);
    }

    #[test]
    fn retreat_is_a_noop_at_the_very_start() {
        let c = collection(&[2, 1]);
        assert_eq!(retreat(&c, Coordinate::new(0, 0)), Retreat::AtStart);
    }

    #[test]
    fn retreat_crosses_to_last_item_of_previous_author() {
        let c = collection(&[2, 3]);
        assert_eq!(
            retreat(&c, Coordinate::new(1, 0)),
            Retreat::To(Coordinate::new(0, 1))
        );
    }

    #[test]
    fn retreat_steps_within_author() {
        let c = collection(&[2, 3]);
        assert_eq!(
            retreat(&c, Coordinate::new(1, 2)),
            Retreat::To(Coordinate::new(1, 1))
        );
    }
}
