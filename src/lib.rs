//! Encounter Sim - Monte Carlo combat simulator for d20 encounters
//!
//! Pits rosters of combatants against each other repeatedly and reports
//! per-team win tallies so an encounter designer can judge how deadly a
//! fight really is.

pub mod combat;
pub mod core;
pub mod dice;
pub mod encounter;
pub mod model;
pub mod roster;
