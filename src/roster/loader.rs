//! Load encounter rosters from TOML files
//!
//! Lets a designer tune an encounter without recompiling. The file lists
//! teams in order; team ids are their positions in the file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{Result, SimError};
use crate::core::types::TeamId;
use crate::model::{
    AbilityScores, AncillaryTraits, Armor, ArmorWeight, Combatant, CombatantKind, DamageDie,
    DamageType, Shield, Team, Weapon,
};
use crate::roster::RosterSource;

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    team: Vec<TeamSpec>,
}

#[derive(Debug, Deserialize)]
struct TeamSpec {
    name: String,
    #[serde(default)]
    member: Vec<MemberSpec>,
}

#[derive(Debug, Deserialize)]
struct MemberSpec {
    name: String,
    kind: CombatantKind,
    hp: i32,
    ac: i32,
    #[serde(default = "default_level")]
    level: u32,
    #[serde(default = "default_attacks")]
    attacks: u32,
    abilities: AbilitySpec,
    #[serde(default)]
    battle_style: Option<String>,
    #[serde(default)]
    resistances: Vec<DamageType>,
    #[serde(default)]
    immunities: Vec<DamageType>,
    #[serde(default)]
    weapon: Vec<WeaponSpec>,
    #[serde(default)]
    armor: Option<ArmorSpec>,
    #[serde(default)]
    shield: Option<ShieldSpec>,
}

fn default_level() -> u32 {
    1
}

fn default_attacks() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct AbilitySpec {
    strength: i32,
    dexterity: i32,
    constitution: i32,
    intelligence: i32,
    wisdom: i32,
    charisma: i32,
}

#[derive(Debug, Deserialize)]
struct WeaponSpec {
    name: String,
    #[serde(default)]
    finesse: bool,
    #[serde(default)]
    versatile: bool,
    #[serde(default)]
    magic_bonus: i32,
    /// Present on monster stat-block weapons; switches the weapon to flat
    /// bonuses
    to_hit: Option<i32>,
    damage_bonus: Option<i32>,
    dice: Vec<DieSpec>,
}

#[derive(Debug, Deserialize)]
struct DieSpec {
    faces: u32,
    damage_type: DamageType,
}

#[derive(Debug, Deserialize)]
struct ArmorSpec {
    name: String,
    base_ac: i32,
    weight: ArmorWeight,
}

#[derive(Debug, Deserialize)]
struct ShieldSpec {
    name: String,
    #[serde(default)]
    magic_bonus: i32,
}

/// Roster source backed by a parsed TOML file
#[derive(Debug)]
pub struct TomlRoster {
    file: RosterFile,
}

impl TomlRoster {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RosterFile = toml::from_str(content)?;
        if file.team.is_empty() {
            return Err(SimError::InvalidConfig(
                "roster file defines no teams".into(),
            ));
        }
        Ok(Self { file })
    }
}

impl RosterSource for TomlRoster {
    fn teams(&self) -> Vec<Team> {
        self.file
            .team
            .iter()
            .enumerate()
            .map(|(idx, spec)| Team::new(TeamId(idx as u32), spec.name.clone()))
            .collect()
    }

    fn muster(&self, team: TeamId) -> Result<Vec<Combatant>> {
        let spec = self
            .file
            .team
            .get(team.0 as usize)
            .ok_or_else(|| SimError::InvalidRoster {
                team: format!("#{}", team.0),
                reason: "unknown team".into(),
            })?;
        spec.member
            .iter()
            .map(|member| build_member(member, team))
            .collect()
    }
}

fn build_member(spec: &MemberSpec, team: TeamId) -> Result<Combatant> {
    let abilities = AbilityScores::new(
        spec.abilities.strength,
        spec.abilities.dexterity,
        spec.abilities.constitution,
        spec.abilities.intelligence,
        spec.abilities.wisdom,
        spec.abilities.charisma,
    );
    let traits = AncillaryTraits {
        battle_style: spec.battle_style.clone(),
        resistances: spec.resistances.iter().copied().collect(),
        immunities: spec.immunities.iter().copied().collect(),
    };

    let mut combatant = match spec.kind {
        CombatantKind::Hero => Combatant::hero(
            spec.name.clone(),
            team,
            spec.hp,
            spec.ac,
            spec.level,
            spec.attacks,
            abilities,
            traits,
        ),
        CombatantKind::Monster => Combatant::monster(
            spec.name.clone(),
            team,
            spec.hp,
            spec.ac,
            spec.attacks,
            abilities,
            traits,
        ),
    };

    for weapon in &spec.weapon {
        combatant.give_weapon(build_weapon(weapon));
    }
    if let Some(armor) = &spec.armor {
        combatant.equip_armor(Armor {
            name: armor.name.clone(),
            base_ac: armor.base_ac,
            weight: armor.weight,
        });
    }
    if let Some(shield) = &spec.shield {
        combatant.equip_shield(Shield::new(shield.name.clone(), shield.magic_bonus));
    }

    Ok(combatant)
}

fn build_weapon(spec: &WeaponSpec) -> Weapon {
    let dice: Vec<DamageDie> = spec
        .dice
        .iter()
        .map(|d| DamageDie::new(d.faces, d.damage_type))
        .collect();

    if spec.to_hit.is_some() || spec.damage_bonus.is_some() {
        Weapon::natural(
            spec.name.clone(),
            spec.to_hit.unwrap_or(0),
            spec.damage_bonus.unwrap_or(0),
            dice,
        )
    } else {
        Weapon::martial(
            spec.name.clone(),
            spec.finesse,
            spec.versatile,
            spec.magic_bonus,
            dice,
        )
    }
}
