//! Target selection
//!
//! Attackers stay on their previous target while it still stands, otherwise
//! they pick uniformly at random among living enemies.

use crate::dice::DiceRoller;
use crate::model::Combatant;

/// Arena indices of living members of every other team
pub fn living_enemies(combatants: &[Combatant], attacker: usize) -> Vec<usize> {
    let team = combatants[attacker].team;
    combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.team != team && !c.is_down())
        .map(|(idx, _)| idx)
        .collect()
}

/// Sticky-previous-target policy with a uniform random fallback.
///
/// Precondition: `living` is non-empty — callers skip the turn when no
/// enemies remain. The caller records the choice back onto the attacker for
/// future stickiness.
pub fn pick_target(
    combatants: &[Combatant],
    attacker: usize,
    living: &[usize],
    dice: &mut dyn DiceRoller,
) -> usize {
    if let Some(prev) = combatants[attacker].previous_target {
        if let Some(&idx) = living.iter().find(|&&idx| combatants[idx].id == prev) {
            return idx;
        }
    }
    living[dice.pick_index(living.len())]
}
