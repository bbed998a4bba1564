//! Encounter execution - state machine, narration and the trial loop

pub mod log;
pub mod state;
pub mod trials;

pub use log::{BufferSink, ConsoleSink, EncounterEvent, EncounterEventKind, NarrativeSink, NullSink};
pub use state::{EncounterPhase, EncounterState, MAX_ROUNDS};
pub use trials::{run_trials, TeamTally, TrialConfig, TrialReport};
