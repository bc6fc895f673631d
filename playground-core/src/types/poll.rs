//! Long-poll outcome.

/// Result of one long-poll step: either the awaited value or an advisory delay after which
/// the caller should ask again.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Ready(T),
    Wait { seconds: u64 },
}

impl<T> PollOutcome<T> {
    pub fn is_wait(&self) -> bool {
        matches!(self, PollOutcome::Wait { .. })
    }

    pub fn ready(self) -> Option<T> {
        match self {
            PollOutcome::Ready(value) => Some(value),
            PollOutcome::Wait { .. } => None,
        }
    }
}
