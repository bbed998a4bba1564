//! Teams and their cumulative win tallies
//!
//! Teams persist across trials; only the member roster is rebuilt each
//! trial. Members live in the encounter arena tagged with the team's id.

use serde::{Deserialize, Serialize};

use crate::core::types::TeamId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Win count accumulated across trials
    pub score: u32,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
        }
    }

    pub fn record_win(&mut self) {
        self.score += 1;
    }
}
