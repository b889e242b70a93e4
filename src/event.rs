// event.rs: Command and event types crossing the viewer's boundaries.

/// Commands the presentation layer sends to the viewer controller. Each maps
/// to one operation of the command surface; commands arriving in the wrong
/// state are no-ops, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Close,
    Next,
    Previous,
    Pause,
    Resume,
    ToggleLike(String),
    Shutdown,
}

/// Outward events for a persistence/telemetry collaborator. Delivered
/// fire-and-forget, at most once per occurrence; how they are persisted is
/// not this crate's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    AuthorSeen { author_id: String },
    ItemLikeToggled { item_id: String, liked: bool },
}
