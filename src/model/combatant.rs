//! Combatant stat blocks and hit-point bookkeeping
//!
//! Combatants live in the encounter's arena and carry their team as a tag;
//! cross-combatant memory (sticky targeting) is held as an id, never a
//! reference, so trial resets cannot dangle.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{CombatantId, TeamId};
use crate::model::weapons::{Armor, ArmorWeight, DamageType, Shield, Weapon};

/// The six ability scores, typically 1-30
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }
}

/// Derived modifier from a raw ability score
///
/// floor(score / 2) - 5 for positive scores, 0 otherwise. This is the
/// ruleset's formula and is deliberately not the usual (score - 10) / 2.
pub fn ability_bonus(score: i32) -> i32 {
    if score <= 0 {
        0
    } else {
        score / 2 - 5
    }
}

/// Optional characteristics, resolved at construction time
///
/// Named optional fields defaulting to empty; absent entries simply mean
/// "none" rather than a missing-attribute lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AncillaryTraits {
    /// Informational label; no resolver logic branches on it
    pub battle_style: Option<String>,
    /// Damage types taken at half (rounded down)
    pub resistances: AHashSet<DamageType>,
    /// Damage types ignored entirely
    pub immunities: AHashSet<DamageType>,
}

/// Which attack-resolution style a combatant uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatantKind {
    /// Ability-derived bonuses, cached weapon preference
    Hero,
    /// Flat stat-block bonuses, random weapon each attack
    Monster,
}

/// One creature in the encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub team: TeamId,
    pub kind: CombatantKind,
    pub abilities: AbilityScores,
    /// Drives the proficiency tier for hero attacks
    pub level: u32,
    pub max_hp: i32,
    /// Never clamped; negative values are valid and only the <= 0 check
    /// matters for target validity
    pub current_hp: i32,
    pub armor_class: i32,
    pub num_attacks: u32,
    /// Assigned fresh each encounter by the initiative scheduler
    pub initiative: i32,
    pub weapons: Vec<Weapon>,
    pub armor: Option<Armor>,
    pub shield: Option<Shield>,
    /// Index into `weapons`, selected once per encounter and then reused
    pub preferred_weapon: Option<usize>,
    pub previous_target: Option<CombatantId>,
    pub traits: AncillaryTraits,
}

impl Combatant {
    pub fn hero(
        name: impl Into<String>,
        team: TeamId,
        max_hp: i32,
        armor_class: i32,
        level: u32,
        num_attacks: u32,
        abilities: AbilityScores,
        traits: AncillaryTraits,
    ) -> Self {
        Self::new(
            name,
            team,
            CombatantKind::Hero,
            max_hp,
            armor_class,
            level,
            num_attacks,
            abilities,
            traits,
        )
    }

    pub fn monster(
        name: impl Into<String>,
        team: TeamId,
        max_hp: i32,
        armor_class: i32,
        num_attacks: u32,
        abilities: AbilityScores,
        traits: AncillaryTraits,
    ) -> Self {
        Self::new(
            name,
            team,
            CombatantKind::Monster,
            max_hp,
            armor_class,
            1,
            num_attacks,
            abilities,
            traits,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        name: impl Into<String>,
        team: TeamId,
        kind: CombatantKind,
        max_hp: i32,
        armor_class: i32,
        level: u32,
        num_attacks: u32,
        abilities: AbilityScores,
        traits: AncillaryTraits,
    ) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            team,
            kind,
            abilities,
            level,
            max_hp,
            current_hp: max_hp,
            armor_class,
            num_attacks,
            initiative: 0,
            weapons: Vec::new(),
            armor: None,
            shield: None,
            preferred_weapon: None,
            previous_target: None,
            traits,
        }
    }

    pub fn give_weapon(&mut self, weapon: Weapon) {
        self.weapons.push(weapon);
    }

    /// Equip armor and recompute armor class: light armor adds the wearer's
    /// dexterity bonus, heavy armor does not. A held shield keeps its bonus.
    pub fn equip_armor(&mut self, armor: Armor) {
        let mut ac = match armor.weight {
            ArmorWeight::Light => armor.base_ac + self.dexterity_bonus(),
            ArmorWeight::Heavy => armor.base_ac,
        };
        if let Some(shield) = &self.shield {
            ac += shield.ac_bonus();
        }
        self.armor_class = ac;
        self.armor = Some(armor);
    }

    pub fn equip_shield(&mut self, shield: Shield) {
        self.armor_class += shield.ac_bonus();
        self.shield = Some(shield);
    }

    pub fn has_shield(&self) -> bool {
        self.shield.is_some()
    }

    pub fn strength_bonus(&self) -> i32 {
        ability_bonus(self.abilities.strength)
    }

    pub fn dexterity_bonus(&self) -> i32 {
        ability_bonus(self.abilities.dexterity)
    }

    /// Level-tiered proficiency bonus for hero attack rolls
    pub fn proficiency_bonus(&self) -> i32 {
        match self.level {
            0..=4 => 2,
            5..=8 => 3,
            9..=12 => 4,
            13..=16 => 5,
            _ => 6,
        }
    }

    /// Ability bonus applied with the given weapon: strength, unless the
    /// dexterity bonus is strictly greater or the weapon is finesse
    pub fn relevant_ability_bonus(&self, weapon: &Weapon) -> i32 {
        let strength = self.strength_bonus();
        let dexterity = self.dexterity_bonus();
        if weapon.is_finesse() || dexterity > strength {
            dexterity
        } else {
            strength
        }
    }

    pub fn is_down(&self) -> bool {
        self.current_hp <= 0
    }

    /// Apply incoming damage of one type through resistances and
    /// immunities, subtracting the mitigated amount from current hit
    /// points. Returns the amount actually applied.
    pub fn deal_damage(&mut self, amount: i32, damage_type: DamageType) -> i32 {
        let applied = if self.traits.immunities.contains(&damage_type) {
            0
        } else if self.traits.resistances.contains(&damage_type) {
            amount / 2
        } else {
            amount
        };
        self.current_hp -= applied;
        applied
    }
}
