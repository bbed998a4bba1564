//! Roster construction - the collaborator that equips each side
//!
//! Sources hand the trial runner a persistent team list once, then a fresh
//! fully-equipped member collection every trial.

pub mod builtin;
pub mod loader;

pub use builtin::DemoRoster;
pub use loader::TomlRoster;

use crate::core::error::{Result, SimError};
use crate::core::types::TeamId;
use crate::model::{Combatant, CombatantKind, Team, WeaponKind};

pub trait RosterSource: Send + Sync {
    /// Persistent team list (ids, names); called once per batch
    fn teams(&self) -> Vec<Team>;

    /// Fresh members for one team; called every trial
    fn muster(&self, team: TeamId) -> Result<Vec<Combatant>>;
}

/// Reject rosters the resolver cannot run: empty sides, weaponless heroes,
/// weapons whose dice cannot be resolved, and stat-block mismatches.
/// Monsters may go weaponless (they fall back to a guaranteed-miss unarmed
/// strike instead).
pub fn validate_roster(team_name: &str, members: &[Combatant]) -> Result<()> {
    if members.is_empty() {
        return Err(SimError::InvalidRoster {
            team: team_name.into(),
            reason: "team has no members".into(),
        });
    }

    for member in members {
        if member.max_hp < 1 {
            return Err(SimError::InvalidRoster {
                team: team_name.into(),
                reason: format!("{} starts with no hit points", member.name),
            });
        }
        if member.num_attacks < 1 {
            return Err(SimError::InvalidRoster {
                team: team_name.into(),
                reason: format!("{} has no attacks per action", member.name),
            });
        }
        if member.kind == CombatantKind::Hero && member.weapons.is_empty() {
            return Err(SimError::InvalidRoster {
                team: team_name.into(),
                reason: format!("{} carries no weapon", member.name),
            });
        }
        for weapon in &member.weapons {
            weapon.validate()?;
            if weapon.damage_dice.is_empty() {
                return Err(SimError::InvalidRoster {
                    team: team_name.into(),
                    reason: format!("weapon `{}` has no damage dice", weapon.name),
                });
            }
            if weapon.damage_dice.iter().any(|die| die.faces == 0) {
                return Err(SimError::InvalidRoster {
                    team: team_name.into(),
                    reason: format!("weapon `{}` has a die with no faces", weapon.name),
                });
            }
            let natural = matches!(weapon.kind, WeaponKind::Natural { .. });
            match member.kind {
                CombatantKind::Hero if natural => {
                    return Err(SimError::InvalidRoster {
                        team: team_name.into(),
                        reason: format!(
                            "{} is a hero but carries stat-block weapon `{}`",
                            member.name, weapon.name
                        ),
                    });
                }
                CombatantKind::Monster if !natural => {
                    return Err(SimError::InvalidRoster {
                        team: team_name.into(),
                        reason: format!(
                            "{} is a monster but carries martial weapon `{}`",
                            member.name, weapon.name
                        ),
                    });
                }
                _ => {}
            }
        }
    }

    Ok(())
}
