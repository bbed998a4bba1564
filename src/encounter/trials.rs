//! Trial runner - repeat the encounter and tally wins
//!
//! Sequential trials share one dice stream rolled from the base seed.
//! The parallel mode gives every trial an independent stream derived from
//! the base seed and the trial index, so results stay deterministic under a
//! fixed seed while trials run across threads.

use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::core::error::{Result, SimError};
use crate::core::types::TeamId;
use crate::dice::SeededDice;
use crate::encounter::log::{NarrativeSink, NullSink};
use crate::encounter::state::EncounterState;
use crate::model::{Combatant, Team};
use crate::roster::{validate_roster, RosterSource};

/// Configuration for a batch of trials
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Number of encounters to run
    pub trials: u32,
    /// Base seed for the dice stream(s)
    pub seed: u64,
    /// Run trials across threads; narration is suppressed since interleaved
    /// narration from concurrent encounters is useless for audit
    pub parallel: bool,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            seed: 12345,
            parallel: false,
        }
    }
}

impl TrialConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SimError::InvalidConfig(
                "trial count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Final win tally for one team
#[derive(Debug, Clone, Serialize)]
pub struct TeamTally {
    pub name: String,
    pub wins: u32,
}

/// Outcome of a whole batch of trials
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    pub trials: u32,
    pub tallies: Vec<TeamTally>,
    pub elapsed_ms: u64,
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "And the scores: ")?;
        for tally in &self.tallies {
            write!(f, "\n{}: {}", tally.name, tally.wins)?;
        }
        Ok(())
    }
}

/// Run the configured number of trials and tally wins per team
pub fn run_trials(
    config: &TrialConfig,
    source: &dyn RosterSource,
    sink: &mut dyn NarrativeSink,
) -> Result<TrialReport> {
    config.validate()?;
    let start = Instant::now();
    let mut teams = source.teams();

    if config.parallel {
        let winner_lists: Result<Vec<_>> = (0..config.trials)
            .into_par_iter()
            .map(|trial| {
                let mut dice = SeededDice::seeded(config.seed.wrapping_add(trial as u64 + 1));
                run_one(source, &teams, &mut dice, &mut NullSink)
            })
            .collect();
        for winners in winner_lists? {
            credit(&mut teams, &winners);
        }
    } else {
        let mut dice = SeededDice::seeded(config.seed);
        for trial in 0..config.trials {
            let winners = run_one(source, &teams, &mut dice, sink)?;
            credit(&mut teams, &winners);
            tracing::info!(
                trial = trial + 1,
                scores = ?teams.iter().map(|t| (t.name.as_str(), t.score)).collect::<Vec<_>>(),
                "trial complete"
            );
        }
    }

    Ok(TrialReport {
        trials: config.trials,
        tallies: teams
            .into_iter()
            .map(|t| TeamTally {
                name: t.name,
                wins: t.score,
            })
            .collect(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

/// Muster every team fresh, run one encounter to resolution and return the
/// surviving teams
fn run_one(
    source: &dyn RosterSource,
    teams: &[Team],
    dice: &mut SeededDice,
    sink: &mut dyn NarrativeSink,
) -> Result<Vec<TeamId>> {
    let mut combatants: Vec<Combatant> = Vec::new();
    for team in teams {
        let members = source.muster(team.id)?;
        validate_roster(&team.name, &members)?;
        combatants.extend(members);
    }

    let mut state = EncounterState::new(combatants);
    Ok(state.run(dice, sink))
}

fn credit(teams: &mut [Team], winners: &[TeamId]) {
    for team in teams.iter_mut() {
        if winners.contains(&team.id) {
            team.record_win();
        }
    }
}
