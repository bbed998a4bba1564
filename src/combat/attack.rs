//! Attack resolution
//!
//! One call resolves exactly one swing: roll to hit, compare against armor
//! class unless a natural 20 or 1 short-circuits, roll the damage profile
//! (dice twice on a critical, flat bonuses once), and push every damage
//! bucket through the target's mitigation.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::dice::{DiceRoller, D20};
use crate::model::{Combatant, CombatantKind, DamageDie, DamageType, WeaponKind};

/// Classification of a single resolved attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackResult {
    CriticalMiss,
    Miss,
    Hit,
    CriticalHit,
}

impl AttackResult {
    pub fn is_hit(self) -> bool {
        matches!(self, AttackResult::Hit | AttackResult::CriticalHit)
    }
}

/// Record of one resolved attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: String,
    pub target: String,
    /// None for an unarmed strike (no die was rolled)
    pub weapon: Option<String>,
    pub natural: u32,
    pub attack_total: i32,
    pub target_ac: i32,
    pub result: AttackResult,
    /// Post-mitigation damage subtracted from the target
    pub damage: i32,
    /// Target hit points after the attack
    pub target_hp: i32,
}

impl AttackOutcome {
    /// Human-readable narration of the attack
    pub fn describe(&self) -> String {
        let weapon = match &self.weapon {
            Some(name) => name,
            None => {
                return format!(
                    "{} has no weapon and flails at {} to no effect",
                    self.attacker, self.target
                )
            }
        };
        match self.result {
            AttackResult::CriticalMiss => format!(
                "{} fumbles the {} (natural 1) and misses {}",
                self.attacker, weapon, self.target
            ),
            AttackResult::Miss => format!(
                "{} attacks {} with the {} and misses ({} vs AC {})",
                self.attacker, self.target, weapon, self.attack_total, self.target_ac
            ),
            AttackResult::Hit => format!(
                "{} hits {} with the {} for {} damage ({} at {} HP)",
                self.attacker, self.target, weapon, self.damage, self.target, self.target_hp
            ),
            AttackResult::CriticalHit => format!(
                "{} critically hits {} with the {} for {} damage ({} at {} HP)",
                self.attacker, self.target, weapon, self.damage, self.target, self.target_hp
            ),
        }
    }
}

/// Select and cache the hero's preferred weapon.
///
/// Expected damage per weapon is the resolved profile's dice expectation
/// plus the relevant ability bonus plus the magic bonus; the two-handed
/// profile applies when the weapon is versatile and no shield is carried.
/// The first weapon wins exact ties, and the cache is never recomputed once
/// set, even if equipment changes later.
pub fn choose_preferred_weapon(combatant: &mut Combatant) -> Option<usize> {
    if combatant.preferred_weapon.is_some() {
        return combatant.preferred_weapon;
    }
    if combatant.weapons.is_empty() {
        return None;
    }

    let mut best = 0usize;
    let mut best_value = OrderedFloat(f64::NEG_INFINITY);
    for (idx, weapon) in combatant.weapons.iter().enumerate() {
        let two_handed = weapon.is_versatile() && !combatant.has_shield();
        let expected = weapon.expected_dice_damage(two_handed)
            + combatant.relevant_ability_bonus(weapon) as f64
            + weapon.magic_bonus() as f64;
        let value = OrderedFloat(expected);
        if value > best_value {
            best = idx;
            best_value = value;
        }
    }

    tracing::debug!(
        name = %combatant.name,
        weapon = %combatant.weapons[best].name,
        expected = best_value.into_inner(),
        "preferred weapon chosen"
    );
    combatant.preferred_weapon = Some(best);
    Some(best)
}

/// Resolve one melee attack from `attacker` against `target`, mutating the
/// target's hit points. Dispatches on the attacker's kind.
pub fn melee_attack(
    combatants: &mut [Combatant],
    attacker: usize,
    target: usize,
    dice: &mut dyn DiceRoller,
) -> AttackOutcome {
    let (attacker, target) = pair_mut(combatants, attacker, target);
    match attacker.kind {
        CombatantKind::Hero => hero_attack(attacker, target, dice),
        CombatantKind::Monster => monster_attack(attacker, target, dice),
    }
}

/// Split-borrow two distinct arena slots
fn pair_mut(combatants: &mut [Combatant], a: usize, b: usize) -> (&mut Combatant, &mut Combatant) {
    debug_assert_ne!(a, b, "a combatant cannot attack itself");
    if a < b {
        let (left, right) = combatants.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = combatants.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

fn hero_attack(
    attacker: &mut Combatant,
    target: &mut Combatant,
    dice: &mut dyn DiceRoller,
) -> AttackOutcome {
    let Some(weapon_idx) = choose_preferred_weapon(attacker) else {
        return unarmed_strike(attacker, target);
    };
    let weapon = &attacker.weapons[weapon_idx];
    let two_handed = weapon.is_versatile() && !attacker.has_shield();
    let ability = attacker.relevant_ability_bonus(weapon);
    let to_hit = weapon.magic_bonus() + attacker.proficiency_bonus() + ability;

    let natural = dice.roll(D20);
    let attack_total = natural as i32 + to_hit;

    if natural == 1 {
        return AttackOutcome {
            attacker: attacker.name.clone(),
            target: target.name.clone(),
            weapon: Some(weapon.name.clone()),
            natural,
            attack_total,
            target_ac: target.armor_class,
            result: AttackResult::CriticalMiss,
            damage: 0,
            target_hp: target.current_hp,
        };
    }

    let critical = natural == D20;
    if !critical && attack_total < target.armor_class {
        return AttackOutcome {
            attacker: attacker.name.clone(),
            target: target.name.clone(),
            weapon: Some(weapon.name.clone()),
            natural,
            attack_total,
            target_ac: target.armor_class,
            result: AttackResult::Miss,
            damage: 0,
            target_hp: target.current_hp,
        };
    }

    let profile = weapon.damage_profile(two_handed);
    let flat = weapon.magic_bonus() + ability;
    let damage = apply_damage(target, &profile, critical, flat, dice);

    AttackOutcome {
        attacker: attacker.name.clone(),
        target: target.name.clone(),
        weapon: Some(weapon.name.clone()),
        natural,
        attack_total,
        target_ac: target.armor_class,
        result: if critical {
            AttackResult::CriticalHit
        } else {
            AttackResult::Hit
        },
        damage,
        target_hp: target.current_hp,
    }
}

fn monster_attack(
    attacker: &mut Combatant,
    target: &mut Combatant,
    dice: &mut dyn DiceRoller,
) -> AttackOutcome {
    if attacker.weapons.is_empty() {
        return unarmed_strike(attacker, target);
    }

    // Monsters are less tactically consistent than heroes: a fresh uniform
    // pick every attack, never cached.
    let weapon_idx = dice.pick_index(attacker.weapons.len());
    let weapon = &attacker.weapons[weapon_idx];
    let (attack_bonus, damage_bonus) = match weapon.kind {
        WeaponKind::Natural {
            attack_bonus,
            damage_bonus,
        } => (attack_bonus, damage_bonus),
        WeaponKind::Martial { magic_bonus, .. } => (magic_bonus, magic_bonus),
    };

    let natural = dice.roll(D20);
    let critical = natural == D20;
    let attack_total = natural as i32 + attack_bonus;

    if !critical && attack_total < target.armor_class {
        return AttackOutcome {
            attacker: attacker.name.clone(),
            target: target.name.clone(),
            weapon: Some(weapon.name.clone()),
            natural,
            attack_total,
            target_ac: target.armor_class,
            result: AttackResult::Miss,
            damage: 0,
            target_hp: target.current_hp,
        };
    }

    let profile = weapon.damage_profile(false);
    let damage = apply_damage(target, &profile, critical, damage_bonus, dice);

    AttackOutcome {
        attacker: attacker.name.clone(),
        target: target.name.clone(),
        weapon: Some(weapon.name.clone()),
        natural,
        attack_total,
        target_ac: target.armor_class,
        result: if critical {
            AttackResult::CriticalHit
        } else {
            AttackResult::Hit
        },
        damage,
        target_hp: target.current_hp,
    }
}

/// Guaranteed-miss strike for a combatant with no weapon
fn unarmed_strike(attacker: &Combatant, target: &Combatant) -> AttackOutcome {
    AttackOutcome {
        attacker: attacker.name.clone(),
        target: target.name.clone(),
        weapon: None,
        natural: 0,
        attack_total: 0,
        target_ac: target.armor_class,
        result: AttackResult::Miss,
        damage: 0,
        target_hp: target.current_hp,
    }
}

/// Roll the damage profile (twice on a critical), bucket rolls by damage
/// type, attach the flat bonus to the primary (first-die) type, then push
/// each bucket through the target's mitigation. Returns the total applied.
fn apply_damage(
    target: &mut Combatant,
    profile: &[DamageDie],
    critical: bool,
    flat_bonus: i32,
    dice: &mut dyn DiceRoller,
) -> i32 {
    let passes = if critical { 2 } else { 1 };
    let mut buckets: Vec<(DamageType, i32)> = Vec::new();
    for _ in 0..passes {
        for die in profile {
            let rolled = dice.roll(die.faces) as i32;
            match buckets.iter_mut().find(|(t, _)| *t == die.damage_type) {
                Some((_, sum)) => *sum += rolled,
                None => buckets.push((die.damage_type, rolled)),
            }
        }
    }
    if let Some((_, sum)) = buckets.first_mut() {
        *sum += flat_bonus;
    }

    let mut applied = 0;
    for (damage_type, amount) in buckets {
        applied += target.deal_damage(amount.max(0), damage_type);
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TeamId;
    use crate::dice::{ScriptedDice, SeededDice};
    use crate::model::{AbilityScores, AncillaryTraits, Combatant, DamageDie, Shield, Weapon};

    fn hero(name: &str, strength: i32) -> Combatant {
        Combatant::hero(
            name,
            TeamId(0),
            20,
            10,
            4,
            1,
            AbilityScores::new(strength, 10, 10, 10, 10, 10),
            AncillaryTraits::default(),
        )
    }

    fn target_dummy(armor_class: i32, hp: i32) -> Combatant {
        Combatant::hero(
            "dummy",
            TeamId(1),
            hp,
            armor_class,
            1,
            1,
            AbilityScores::new(10, 10, 10, 10, 10, 10),
            AncillaryTraits::default(),
        )
    }

    #[test]
    fn test_natural_one_always_misses() {
        // AC 0 would otherwise be unmissable
        let mut arena = vec![hero("swinger", 18), target_dummy(0, 20)];
        arena[0].give_weapon(Weapon::greataxe());

        let mut dice = ScriptedDice::new(vec![1]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.result, AttackResult::CriticalMiss);
        assert_eq!(outcome.damage, 0);
        assert_eq!(arena[1].current_hp, 20);
    }

    #[test]
    fn test_miss_below_armor_class() {
        // str 10, prof +2: 5 + 2 = 7 < AC 15
        let mut arena = vec![hero("swinger", 10), target_dummy(15, 20)];
        arena[0].give_weapon(Weapon::greataxe());

        let mut dice = ScriptedDice::new(vec![5]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.result, AttackResult::Miss);
        assert_eq!(outcome.attack_total, 7);
        assert_eq!(arena[1].current_hp, 20);
    }

    #[test]
    fn test_hit_subtracts_damage() {
        // str 14 (+2), prof +2: 10 + 4 = 14 >= AC 12; d12 rolls 7 -> 7 + 2 = 9
        let mut arena = vec![hero("swinger", 14), target_dummy(12, 20)];
        arena[0].give_weapon(Weapon::greataxe());

        let mut dice = ScriptedDice::new(vec![10, 7]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.result, AttackResult::Hit);
        assert_eq!(outcome.damage, 9);
        assert_eq!(arena[1].current_hp, 11);
    }

    #[test]
    fn test_critical_doubles_dice_but_not_bonuses() {
        // natural 20 bypasses AC 30; d12 rolled twice (4, 6), +1 magic and
        // +2 strength added exactly once
        let mut arena = vec![hero("swinger", 14), target_dummy(30, 40)];
        arena[0].give_weapon(Weapon::martial(
            "greataxe of sundering",
            false,
            false,
            1,
            vec![DamageDie::new(12, DamageType::Slashing)],
        ));

        let mut dice = ScriptedDice::new(vec![20, 4, 6]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.result, AttackResult::CriticalHit);
        assert_eq!(outcome.damage, 4 + 6 + 1 + 2);
        assert_eq!(arena[1].current_hp, 40 - 13);
    }

    #[test]
    fn test_versatile_two_handed_without_shield() {
        let mut arena = vec![hero("swinger", 14), target_dummy(10, 30)];
        arena[0].give_weapon(Weapon::longsword());

        // hit, then the single profile die; a scripted 10 clamps to the
        // rolled die's faces, so a d10 profile yields 10, a d8 only 8
        let mut dice = ScriptedDice::new(vec![15, 10]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        // two-handed d10 rolled its full 10, +2 strength
        assert_eq!(outcome.damage, 12);
    }

    #[test]
    fn test_versatile_one_handed_with_shield() {
        let mut arena = vec![hero("swinger", 14), target_dummy(10, 30)];
        arena[0].give_weapon(Weapon::longsword());
        arena[0].equip_shield(Shield::new("round shield", 0));

        let mut dice = ScriptedDice::new(vec![15, 10]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        // one-handed d8 clamps the scripted 10 to 8, +2 strength
        assert_eq!(outcome.damage, 10);
    }

    #[test]
    fn test_hero_damage_is_mitigated() {
        let mut arena = vec![hero("swinger", 14), target_dummy(10, 30)];
        arena[0].give_weapon(Weapon::greataxe());
        arena[1].traits.resistances.insert(DamageType::Slashing);

        // hit with 8 + 2 = 10 slashing, halved to 5
        let mut dice = ScriptedDice::new(vec![15, 8]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.damage, 5);
        assert_eq!(arena[1].current_hp, 25);
    }

    #[test]
    fn test_preferred_weapon_cached_across_attacks() {
        let mut arena = vec![hero("swinger", 14), target_dummy(0, 1000)];
        arena[0].give_weapon(Weapon::dagger());
        arena[0].give_weapon(Weapon::greataxe());

        let mut dice = SeededDice::seeded(11);
        melee_attack(&mut arena, 0, 1, &mut dice);

        // greataxe: 6 + 2 = 8 expected beats dagger's 2 + 0 finesse dex
        assert_eq!(arena[0].preferred_weapon, Some(1));

        // cache survives later equipment changes by design
        arena[0].give_weapon(Weapon::martial(
            "doomblade",
            false,
            false,
            5,
            vec![DamageDie::new(12, DamageType::Slashing)],
        ));
        melee_attack(&mut arena, 0, 1, &mut dice);
        assert_eq!(arena[0].preferred_weapon, Some(1));
    }

    #[test]
    fn test_first_weapon_wins_expected_damage_tie() {
        let mut arena = vec![hero("swinger", 14), target_dummy(0, 100)];
        arena[0].give_weapon(Weapon::martial(
            "axe a",
            false,
            false,
            0,
            vec![DamageDie::new(12, DamageType::Slashing)],
        ));
        arena[0].give_weapon(Weapon::martial(
            "axe b",
            false,
            false,
            0,
            vec![DamageDie::new(12, DamageType::Slashing)],
        ));

        choose_preferred_weapon(&mut arena[0]);
        assert_eq!(arena[0].preferred_weapon, Some(0));
    }

    #[test]
    fn test_monster_flat_bonuses() {
        let mut giant = Combatant::monster(
            "giant",
            TeamId(0),
            105,
            13,
            1,
            AbilityScores::new(23, 9, 21, 9, 10, 12),
            AncillaryTraits::default(),
        );
        giant.give_weapon(Weapon::natural(
            "greatclub",
            8,
            5,
            vec![
                DamageDie::new(8, DamageType::Bludgeoning),
                DamageDie::new(8, DamageType::Bludgeoning),
                DamageDie::new(8, DamageType::Bludgeoning),
            ],
        ));
        let mut arena = vec![giant, target_dummy(16, 50)];

        // weapon pick (single weapon), then 10 + 8 = 18 >= 16, then 3d8
        let mut dice = ScriptedDice::new(vec![1, 10, 3, 4, 5]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.result, AttackResult::Hit);
        // 3 + 4 + 5 dice + 5 flat damage bonus, no ability involvement
        assert_eq!(outcome.damage, 17);
        assert_eq!(arena[1].current_hp, 33);
    }

    #[test]
    fn test_monster_natural_twenty_beats_any_armor() {
        let mut giant = Combatant::monster(
            "giant",
            TeamId(0),
            105,
            13,
            1,
            AbilityScores::new(23, 9, 21, 9, 10, 12),
            AncillaryTraits::default(),
        );
        giant.give_weapon(Weapon::natural(
            "greatclub",
            0,
            0,
            vec![DamageDie::new(8, DamageType::Bludgeoning)],
        ));
        let mut arena = vec![giant, target_dummy(50, 40)];

        let mut dice = ScriptedDice::new(vec![1, 20, 4, 4]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.result, AttackResult::CriticalHit);
        assert_eq!(outcome.damage, 8);
    }

    #[test]
    fn test_unarmed_monster_automatically_misses() {
        let giant = Combatant::monster(
            "clawless",
            TeamId(0),
            50,
            10,
            1,
            AbilityScores::new(20, 10, 10, 10, 10, 10),
            AncillaryTraits::default(),
        );
        let mut arena = vec![giant, target_dummy(5, 30)];

        let mut dice = SeededDice::seeded(2);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        assert_eq!(outcome.result, AttackResult::Miss);
        assert_eq!(outcome.weapon, None);
        assert_eq!(outcome.damage, 0);
        assert_eq!(arena[1].current_hp, 30);
    }

    #[test]
    fn test_monster_weapon_choice_roughly_uniform() {
        let mut giant = Combatant::monster(
            "collector",
            TeamId(0),
            50,
            10,
            1,
            AbilityScores::new(20, 10, 10, 10, 10, 10),
            AncillaryTraits::default(),
        );
        giant.give_weapon(Weapon::natural(
            "club",
            0,
            0,
            vec![DamageDie::new(4, DamageType::Bludgeoning)],
        ));
        giant.give_weapon(Weapon::natural(
            "fist",
            0,
            0,
            vec![DamageDie::new(4, DamageType::Bludgeoning)],
        ));
        let mut arena = vec![giant, target_dummy(40, 1_000_000)];

        let mut dice = SeededDice::seeded(13);
        let mut club_picks = 0;
        let trials = 1000;
        for _ in 0..trials {
            let outcome = melee_attack(&mut arena, 0, 1, &mut dice);
            if outcome.weapon.as_deref() == Some("club") {
                club_picks += 1;
            }
        }

        // a fair pick lands far inside [350, 650] over 1000 draws
        assert!(
            (350..=650).contains(&club_picks),
            "club picked {} times out of {}",
            club_picks,
            trials
        );
    }

    #[test]
    fn test_describe_mentions_damage_on_hit() {
        let mut arena = vec![hero("Geoff", 14), target_dummy(5, 30)];
        arena[0].give_weapon(Weapon::greataxe());

        let mut dice = ScriptedDice::new(vec![15, 6]);
        let outcome = melee_attack(&mut arena, 0, 1, &mut dice);

        let text = outcome.describe();
        assert!(text.contains("Geoff"));
        assert!(text.contains("dummy"));
        assert!(text.contains("8 damage"));
    }
}
