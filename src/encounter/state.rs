//! Encounter state machine
//!
//! Setup rolls initiative once and fixes the turn order; each round walks
//! that order, and the termination check fires after every single attack as
//! well as at the top of every round.

use serde::{Deserialize, Serialize};

use crate::combat::{living_enemies, melee_attack, pick_target, roll_initiative};
use crate::core::types::{Round, TeamId};
use crate::dice::DiceRoller;
use crate::encounter::log::{EncounterEvent, EncounterEventKind, NarrativeSink};
use crate::model::Combatant;

/// Safety valve against zero-damage pathological rosters; hit points only
/// decrease, so real encounters resolve long before this.
pub const MAX_ROUNDS: Round = 10_000;

/// Encounter phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncounterPhase {
    #[default]
    Setup,
    InProgress,
    Resolved,
}

/// One encounter: the combatant arena, the fixed turn order and the phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterState {
    pub combatants: Vec<Combatant>,
    /// Arena indices in initiative order, fixed at `begin`
    pub order: Vec<usize>,
    pub round: Round,
    pub phase: EncounterPhase,
}

impl EncounterState {
    pub fn new(combatants: Vec<Combatant>) -> Self {
        Self {
            combatants,
            order: Vec::new(),
            round: 0,
            phase: EncounterPhase::Setup,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == EncounterPhase::Resolved
    }

    /// Teams that still field at least one living member
    pub fn living_teams(&self) -> Vec<TeamId> {
        let mut teams = Vec::new();
        for combatant in &self.combatants {
            if !combatant.is_down() && !teams.contains(&combatant.team) {
                teams.push(combatant.team);
            }
        }
        teams
    }

    /// Combat continues only while at least two teams stand
    pub fn is_contested(&self) -> bool {
        self.living_teams().len() > 1
    }

    /// Roll initiative, fix the turn order and enter the round loop phase.
    /// A degenerate setup (fewer than two contested teams) resolves on the
    /// spot.
    pub fn begin(&mut self, dice: &mut dyn DiceRoller, sink: &mut dyn NarrativeSink) {
        sink.record(EncounterEvent {
            round: 0,
            kind: EncounterEventKind::EncounterStarted,
            description: format!("encounter begins with {} combatants", self.combatants.len()),
        });

        self.order = roll_initiative(&mut self.combatants, dice);
        for &idx in &self.order {
            let combatant = &self.combatants[idx];
            sink.record(EncounterEvent {
                round: 0,
                kind: EncounterEventKind::InitiativeRolled {
                    name: combatant.name.clone(),
                    initiative: combatant.initiative,
                },
                description: format!(
                    "{} gets an initiative score of {}",
                    combatant.name, combatant.initiative
                ),
            });
        }

        self.phase = EncounterPhase::InProgress;
        if !self.is_contested() {
            self.resolve(sink);
        }
    }

    /// Run one round of the turn order
    pub fn run_round(&mut self, dice: &mut dyn DiceRoller, sink: &mut dyn NarrativeSink) {
        if self.phase != EncounterPhase::InProgress {
            return;
        }
        // top-of-round termination check
        if !self.is_contested() {
            self.resolve(sink);
            return;
        }

        self.round += 1;
        let status: Vec<String> = self
            .order
            .iter()
            .map(|&idx| {
                let combatant = &self.combatants[idx];
                if combatant.is_down() {
                    format!("[{} down]", combatant.name)
                } else {
                    format!(
                        "{} {}/{} HP",
                        combatant.name, combatant.current_hp, combatant.max_hp
                    )
                }
            })
            .collect();
        sink.record(EncounterEvent {
            round: self.round,
            kind: EncounterEventKind::RoundStarted,
            description: format!("Round {} FIGHT! ({})", self.round, status.join(", ")),
        });

        for turn in 0..self.order.len() {
            let attacker = self.order[turn];
            if self.combatants[attacker].is_down() {
                tracing::debug!(name = %self.combatants[attacker].name, "is down, skipping turn");
                continue;
            }

            let enemies = living_enemies(&self.combatants, attacker);
            if enemies.is_empty() {
                // no valid target anywhere; the termination check below ends
                // the encounter
                break;
            }

            let target = pick_target(&self.combatants, attacker, &enemies, dice);
            self.combatants[attacker].previous_target = Some(self.combatants[target].id);

            let attacks = self.combatants[attacker].num_attacks;
            sink.record(EncounterEvent {
                round: self.round,
                kind: EncounterEventKind::TargetChosen {
                    attacker: self.combatants[attacker].name.clone(),
                    target: self.combatants[target].name.clone(),
                    attacks,
                },
                description: format!(
                    "{} targets {} {} times",
                    self.combatants[attacker].name, self.combatants[target].name, attacks
                ),
            });

            for _ in 0..attacks {
                let outcome = melee_attack(&mut self.combatants, attacker, target, dice);
                let description = outcome.describe();
                let target_down = self.combatants[target].is_down();
                sink.record(EncounterEvent {
                    round: self.round,
                    kind: EncounterEventKind::AttackResolved(outcome),
                    description,
                });
                if target_down {
                    sink.record(EncounterEvent {
                        round: self.round,
                        kind: EncounterEventKind::CombatantDown {
                            name: self.combatants[target].name.clone(),
                        },
                        description: format!("{} goes down!", self.combatants[target].name),
                    });
                }

                // termination check after every single attack
                if !self.is_contested() {
                    self.resolve(sink);
                    return;
                }
                // remaining attacks against a downed target are forfeited,
                // never redirected
                if target_down {
                    break;
                }
            }
        }

        if !self.is_contested() {
            self.resolve(sink);
        }
    }

    /// Run rounds until resolved; returns the surviving teams
    pub fn run(
        &mut self,
        dice: &mut dyn DiceRoller,
        sink: &mut dyn NarrativeSink,
    ) -> Vec<TeamId> {
        if self.phase == EncounterPhase::Setup {
            self.begin(dice, sink);
        }
        while self.phase == EncounterPhase::InProgress {
            if self.round >= MAX_ROUNDS {
                tracing::warn!(round = self.round, "round limit reached, forcing resolution");
                self.resolve(sink);
                break;
            }
            self.run_round(dice, sink);
        }
        self.living_teams()
    }

    fn resolve(&mut self, sink: &mut dyn NarrativeSink) {
        self.phase = EncounterPhase::Resolved;
        let winners = self.living_teams();
        let standing: Vec<&str> = self
            .combatants
            .iter()
            .filter(|c| !c.is_down())
            .map(|c| c.name.as_str())
            .collect();
        let description = if standing.is_empty() {
            "combat ends with no one left standing".to_string()
        } else {
            format!("combat ends; still standing: {}", standing.join(", "))
        };
        tracing::info!(round = self.round, winners = ?winners, "encounter resolved");
        sink.record(EncounterEvent {
            round: self.round,
            kind: EncounterEventKind::EncounterEnded { winners },
            description,
        });
    }
}
