//! Set of message identifiers that have already been inspected by the broker.

use dashmap::DashSet;

/// Consumed message identifiers. Entries are never removed.
///
/// [`HandledMessages::mark`] is the only way to claim a message: its return value tells the
/// caller whether it won the claim, so two concurrent pollers can never both act on one id.
#[derive(Debug, Default)]
pub struct HandledMessages {
    ids: DashSet<String>,
}

impl HandledMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `id`. Returns true if this call inserted it, false if it was already handled.
    pub fn mark(&self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
