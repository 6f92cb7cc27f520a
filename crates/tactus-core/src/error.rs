use thiserror::Error;

/// Recoverable registration errors. Each is also logged where it happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("a matcher for event `{event}` is already registered in this pool")]
    DuplicateMatcher { event: String },

    #[error("handler was not registered for: {}", events.join(", "))]
    HandlerNotRegistered { events: Vec<String> },

    #[error("no matcher registered for event `{event}`")]
    UnknownMatcher { event: String },
}
