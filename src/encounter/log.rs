//! Narrative events and sinks
//!
//! The engine never configures logging itself; it hands descriptive events
//! to an injectable sink and leaves display/audit policy to the caller.

use serde::{Deserialize, Serialize};

use crate::combat::AttackOutcome;
use crate::core::types::{Round, TeamId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterEvent {
    pub round: Round,
    pub kind: EncounterEventKind,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EncounterEventKind {
    EncounterStarted,
    InitiativeRolled { name: String, initiative: i32 },
    RoundStarted,
    TargetChosen { attacker: String, target: String, attacks: u32 },
    AttackResolved(AttackOutcome),
    CombatantDown { name: String },
    EncounterEnded { winners: Vec<TeamId> },
}

/// Receives per-attack and per-round narration; purely a sink
pub trait NarrativeSink {
    fn record(&mut self, event: EncounterEvent);
}

/// Discards everything (parallel trials, benchmarks)
#[derive(Debug, Default)]
pub struct NullSink;

impl NarrativeSink for NullSink {
    fn record(&mut self, _event: EncounterEvent) {}
}

/// Prints each event's description to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NarrativeSink for ConsoleSink {
    fn record(&mut self, event: EncounterEvent) {
        println!("{}", event.description);
    }
}

/// Collects events in memory; the observability seam for tests
#[derive(Debug, Default)]
pub struct BufferSink {
    pub events: Vec<EncounterEvent>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptions(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.description.as_str()).collect()
    }
}

impl NarrativeSink for BufferSink {
    fn record(&mut self, event: EncounterEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sink_collects_in_order() {
        let mut sink = BufferSink::new();
        sink.record(EncounterEvent {
            round: 0,
            kind: EncounterEventKind::EncounterStarted,
            description: "battle begins".into(),
        });
        sink.record(EncounterEvent {
            round: 1,
            kind: EncounterEventKind::RoundStarted,
            description: "round 1".into(),
        });

        assert_eq!(sink.descriptions(), vec!["battle begins", "round 1"]);
    }
}
