//! Weapons, damage dice and armor
//!
//! A weapon is a named, ordered set of damage dice plus a kind that decides
//! how attack bonuses are derived: martial weapons use the wielder's ability
//! math, natural (monster) weapons carry flat stat-block bonuses.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Damage type carried by a single damage die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    #[display(fmt = "slashing")]
    Slashing,
    #[display(fmt = "bludgeoning")]
    Bludgeoning,
    #[display(fmt = "piercing")]
    Piercing,
    #[display(fmt = "fire")]
    Fire,
    #[display(fmt = "cold")]
    Cold,
    #[display(fmt = "lightning")]
    Lightning,
    #[display(fmt = "thunder")]
    Thunder,
    #[display(fmt = "poison")]
    Poison,
    #[display(fmt = "acid")]
    Acid,
    #[display(fmt = "necrotic")]
    Necrotic,
    #[display(fmt = "radiant")]
    Radiant,
    #[display(fmt = "force")]
    Force,
    #[display(fmt = "psychic")]
    Psychic,
}

impl DamageType {
    /// Physical types are the versatile-eligible dice of a weapon's profile
    pub fn is_physical(self) -> bool {
        matches!(
            self,
            DamageType::Slashing | DamageType::Bludgeoning | DamageType::Piercing
        )
    }
}

/// One damage die: a face count and a damage type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageDie {
    pub faces: u32,
    pub damage_type: DamageType,
}

impl DamageDie {
    pub fn new(faces: u32, damage_type: DamageType) -> Self {
        Self { faces, damage_type }
    }

    /// Expected value used for weapon preference (faces / 2)
    pub fn expected(&self) -> f64 {
        self.faces as f64 / 2.0
    }
}

/// How a weapon's attack and damage bonuses are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "style")]
pub enum WeaponKind {
    /// Hero-wielded weapon: proficiency and ability bonuses apply
    Martial {
        finesse: bool,
        versatile: bool,
        magic_bonus: i32,
        /// True for +N weapons and baseline-magic blades; an extension point
        /// for bypassing non-magical resistance, not consulted by mitigation
        /// yet
        magical: bool,
    },
    /// Monster stat-block weapon: flat bonuses replace ability math
    Natural { attack_bonus: i32, damage_bonus: i32 },
}

/// A melee weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub kind: WeaponKind,
    pub damage_dice: Vec<DamageDie>,
}

impl Weapon {
    pub fn martial(
        name: impl Into<String>,
        finesse: bool,
        versatile: bool,
        magic_bonus: i32,
        damage_dice: Vec<DamageDie>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: WeaponKind::Martial {
                finesse,
                versatile,
                magic_bonus,
                magical: magic_bonus > 0,
            },
            damage_dice,
        }
    }

    pub fn natural(
        name: impl Into<String>,
        attack_bonus: i32,
        damage_bonus: i32,
        damage_dice: Vec<DamageDie>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: WeaponKind::Natural {
                attack_bonus,
                damage_bonus,
            },
            damage_dice,
        }
    }

    /// Mark a weapon as baseline-magic even without a numeric bonus
    pub fn baseline_magic(mut self) -> Self {
        if let WeaponKind::Martial { magical, .. } = &mut self.kind {
            *magical = true;
        }
        self
    }

    pub fn is_finesse(&self) -> bool {
        matches!(self.kind, WeaponKind::Martial { finesse: true, .. })
    }

    pub fn is_versatile(&self) -> bool {
        matches!(self.kind, WeaponKind::Martial { versatile: true, .. })
    }

    pub fn is_magical(&self) -> bool {
        match self.kind {
            WeaponKind::Martial { magical, .. } => magical,
            WeaponKind::Natural { .. } => false,
        }
    }

    /// Magic bonus added to both attack and damage (zero for natural weapons)
    pub fn magic_bonus(&self) -> i32 {
        match self.kind {
            WeaponKind::Martial { magic_bonus, .. } => magic_bonus,
            WeaponKind::Natural { .. } => 0,
        }
    }

    /// Damage dice for the given grip
    ///
    /// Non-versatile weapons roll everything. A versatile weapon rolls
    /// exactly one of its physical dice (the lowest-faced one-handed, the
    /// highest-faced two-handed) plus any non-physical dice in both grips.
    pub fn damage_profile(&self, two_handed: bool) -> Vec<DamageDie> {
        if !self.is_versatile() {
            return self.damage_dice.clone();
        }

        let physical = self
            .damage_dice
            .iter()
            .copied()
            .filter(|d| d.damage_type.is_physical());
        let kept = if two_handed {
            physical.max_by_key(|d| d.faces)
        } else {
            physical.min_by_key(|d| d.faces)
        };

        let mut profile: Vec<DamageDie> = kept.into_iter().collect();
        profile.extend(
            self.damage_dice
                .iter()
                .copied()
                .filter(|d| !d.damage_type.is_physical()),
        );
        profile
    }

    /// Expected dice damage for the given grip (faces / 2 per die)
    pub fn expected_dice_damage(&self, two_handed: bool) -> f64 {
        self.damage_profile(two_handed)
            .iter()
            .map(DamageDie::expected)
            .sum()
    }

    /// A versatile weapon with no physical die cannot partition its profile
    pub fn validate(&self) -> Result<()> {
        if self.is_versatile() && !self.damage_dice.iter().any(|d| d.damage_type.is_physical()) {
            return Err(SimError::VersatileWithoutPhysicalDie(self.name.clone()));
        }
        Ok(())
    }

    /// Common weapon: longsword (versatile d8/d10 slashing)
    pub fn longsword() -> Self {
        Self::martial(
            "longsword",
            false,
            true,
            0,
            vec![
                DamageDie::new(8, DamageType::Slashing),
                DamageDie::new(10, DamageType::Slashing),
            ],
        )
    }

    /// Common weapon: greataxe (d12 slashing)
    pub fn greataxe() -> Self {
        Self::martial(
            "greataxe",
            false,
            false,
            0,
            vec![DamageDie::new(12, DamageType::Slashing)],
        )
    }

    /// Common weapon: greatsword (2d6 slashing)
    pub fn greatsword() -> Self {
        Self::martial(
            "greatsword",
            false,
            false,
            0,
            vec![
                DamageDie::new(6, DamageType::Slashing),
                DamageDie::new(6, DamageType::Slashing),
            ],
        )
    }

    /// Common weapon: dagger (finesse d4 piercing)
    pub fn dagger() -> Self {
        Self::martial(
            "dagger",
            true,
            false,
            0,
            vec![DamageDie::new(4, DamageType::Piercing)],
        )
    }
}

/// Whether armor lets the wearer add their dexterity bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorWeight {
    Light,
    Heavy,
}

/// Worn armor; recomputes the wearer's armor class when equipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub base_ac: i32,
    pub weight: ArmorWeight,
}

impl Armor {
    pub fn light(name: impl Into<String>, base_ac: i32) -> Self {
        Self {
            name: name.into(),
            base_ac,
            weight: ArmorWeight::Light,
        }
    }

    pub fn heavy(name: impl Into<String>, base_ac: i32) -> Self {
        Self {
            name: name.into(),
            base_ac,
            weight: ArmorWeight::Heavy,
        }
    }
}

/// A shield: +2 armor class plus any magic bonus, occupies the off hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub name: String,
    pub magic_bonus: i32,
}

impl Shield {
    pub const BASE_AC_BONUS: i32 = 2;

    pub fn new(name: impl Into<String>, magic_bonus: i32) -> Self {
        Self {
            name: name.into(),
            magic_bonus,
        }
    }

    pub fn ac_bonus(&self) -> i32 {
        Self::BASE_AC_BONUS + self.magic_bonus
    }
}
