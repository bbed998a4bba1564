//! Initiative scheduling
//!
//! Rolled once per encounter; the resulting order is fixed for every round.

use std::cmp::Reverse;

use crate::dice::{DiceRoller, D20};
use crate::model::Combatant;

/// Roll d20 + dexterity bonus for every combatant, store it, and return the
/// turn order as arena indices sorted by initiative descending.
///
/// Ties keep input order (stable sort) so a fixed seed always reproduces
/// the same ordering.
pub fn roll_initiative(combatants: &mut [Combatant], dice: &mut dyn DiceRoller) -> Vec<usize> {
    for combatant in combatants.iter_mut() {
        combatant.initiative = dice.roll_with_modifier(D20, combatant.dexterity_bonus());
        tracing::debug!(
            name = %combatant.name,
            initiative = combatant.initiative,
            "initiative rolled"
        );
    }

    let mut order: Vec<usize> = (0..combatants.len()).collect();
    order.sort_by_key(|&idx| Reverse(combatants[idx].initiative));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TeamId;
    use crate::dice::{ScriptedDice, SeededDice};
    use crate::model::{AbilityScores, AncillaryTraits, Combatant};

    fn fighter(name: &str, dexterity: i32) -> Combatant {
        Combatant::hero(
            name,
            TeamId(0),
            10,
            10,
            1,
            1,
            AbilityScores::new(10, dexterity, 10, 10, 10, 10),
            AncillaryTraits::default(),
        )
    }

    #[test]
    fn test_order_sorted_descending() {
        // scripted d20s: 5, 18, 11
        let mut dice = ScriptedDice::new(vec![5, 18, 11]);
        let mut combatants = vec![fighter("a", 10), fighter("b", 10), fighter("c", 10)];

        let order = roll_initiative(&mut combatants, &mut dice);

        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(combatants[1].initiative, 18);
    }

    #[test]
    fn test_dexterity_bonus_applied() {
        let mut dice = ScriptedDice::new(vec![10, 10]);
        // dex 18 -> +4, dex 8 -> -1
        let mut combatants = vec![fighter("slow", 8), fighter("fast", 18)];

        let order = roll_initiative(&mut combatants, &mut dice);

        assert_eq!(combatants[0].initiative, 9);
        assert_eq!(combatants[1].initiative, 14);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut dice = ScriptedDice::new(vec![12, 12, 12]);
        let mut combatants = vec![fighter("first", 10), fighter("second", 10), fighter("third", 10)];

        let order = roll_initiative(&mut combatants, &mut dice);

        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_same_seed_same_order() {
        let build = || {
            vec![
                fighter("a", 14),
                fighter("b", 12),
                fighter("c", 16),
                fighter("d", 8),
            ]
        };

        let mut first = build();
        let mut second = build();
        let order_a = roll_initiative(&mut first, &mut SeededDice::seeded(99));
        let order_b = roll_initiative(&mut second, &mut SeededDice::seeded(99));

        assert_eq!(order_a, order_b);
    }
}
