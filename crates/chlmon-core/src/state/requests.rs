//! Generation tagging for overlapping requests.
//!
//! Responses can arrive out of issuance order. Each request takes a ticket
//! for its action kind; a response is only applied while its ticket is still
//! the latest one issued for that kind.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// User-facing operations that issue requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    LoadTiles,
    AddLayerByDate,
    CalculateNdvi,
    TimeSeries,
    Statistics,
    Export,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::LoadTiles => "load_tiles",
            ActionKind::AddLayerByDate => "add_layer_by_date",
            ActionKind::CalculateNdvi => "calculate_ndvi",
            ActionKind::TimeSeries => "time_series",
            ActionKind::Statistics => "statistics",
            ActionKind::Export => "export",
        };
        write!(f, "{}", name)
    }
}

/// Proof of issuance for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: ActionKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generations: HashMap<ActionKind, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding any in-flight request of the same kind
    pub fn begin(&mut self, kind: ActionKind) -> Ticket {
        let generation = self.generations.entry(kind).or_insert(0);
        *generation += 1;
        Ticket { kind, generation: *generation }
    }

    /// Whether no newer request of the same kind has been issued
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generations.get(&ticket.kind).copied() == Some(ticket.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(ActionKind::LoadTiles);
        let second = tracker.begin(ActionKind::LoadTiles);

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut tracker = RequestTracker::new();
        let tiles = tracker.begin(ActionKind::LoadTiles);
        let _series = tracker.begin(ActionKind::TimeSeries);

        assert!(tracker.is_current(&tiles));
    }
}
