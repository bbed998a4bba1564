//! Builtin demo encounter: four heroes against three hill giants
//!
//! The stock roster an encounter designer gets without writing a roster
//! file; also doubles as the reference encounter in integration tests.

use crate::core::error::{Result, SimError};
use crate::core::types::TeamId;
use crate::model::{
    AbilityScores, AncillaryTraits, Armor, Combatant, DamageDie, DamageType, Shield, Team, Weapon,
};
use crate::roster::RosterSource;

const PLAYERS: TeamId = TeamId(0);
const MONSTERS: TeamId = TeamId(1);

/// The stock hero-party-versus-hill-giants encounter
#[derive(Debug, Default)]
pub struct DemoRoster;

impl RosterSource for DemoRoster {
    fn teams(&self) -> Vec<Team> {
        vec![
            Team::new(PLAYERS, "Players"),
            Team::new(MONSTERS, "Monsters"),
        ]
    }

    fn muster(&self, team: TeamId) -> Result<Vec<Combatant>> {
        match team {
            PLAYERS => Ok(players()),
            MONSTERS => Ok(monsters()),
            TeamId(other) => Err(SimError::InvalidRoster {
                team: format!("#{}", other),
                reason: "unknown team".into(),
            }),
        }
    }
}

fn berzerker_traits() -> AncillaryTraits {
    AncillaryTraits {
        battle_style: Some("berzerker".into()),
        resistances: [DamageType::Fire].into_iter().collect(),
        immunities: Default::default(),
    }
}

fn players() -> Vec<Combatant> {
    let mut geoff = Combatant::hero(
        "Geoff",
        PLAYERS,
        140,
        13,
        4,
        2,
        AbilityScores::new(18, 14, 14, 8, 13, 14),
        berzerker_traits(),
    );
    geoff.give_weapon(Weapon::martial(
        "greatclub",
        false,
        false,
        1,
        vec![DamageDie::new(10, DamageType::Bludgeoning)],
    ));
    geoff.equip_armor(Armor::light("Studded Leather", 12));

    let mut dave = Combatant::hero(
        "Dave",
        PLAYERS,
        120,
        13,
        4,
        1,
        AbilityScores::new(14, 13, 15, 9, 12, 13),
        berzerker_traits(),
    );
    dave.give_weapon(Weapon::martial(
        "longsword of scalding",
        false,
        true,
        1,
        vec![
            DamageDie::new(8, DamageType::Slashing),
            DamageDie::new(10, DamageType::Slashing),
        ],
    ));
    dave.equip_shield(Shield::new("Kit Shield", 1));

    let mut bob = Combatant::hero(
        "Bob",
        PLAYERS,
        120,
        15,
        4,
        1,
        AbilityScores::new(14, 15, 14, 8, 13, 14),
        berzerker_traits(),
    );
    bob.give_weapon(Weapon::martial(
        "greataxe of sundering",
        false,
        false,
        2,
        vec![DamageDie::new(12, DamageType::Slashing)],
    ));

    let mut john = Combatant::hero(
        "John",
        PLAYERS,
        110,
        13,
        4,
        2,
        AbilityScores::new(20, 10, 15, 9, 12, 13),
        berzerker_traits(),
    );
    john.give_weapon(Weapon::martial(
        "greatsword",
        false,
        false,
        0,
        vec![
            DamageDie::new(6, DamageType::Slashing),
            DamageDie::new(6, DamageType::Slashing),
        ],
    ));

    vec![geoff, dave, bob, john]
}

fn monsters() -> Vec<Combatant> {
    [("Hill Giant 1", 105), ("Hill Giant 2", 105), ("Hill Giant 3", 70)]
        .into_iter()
        .map(|(name, hp)| {
            let mut giant = Combatant::monster(
                name,
                MONSTERS,
                hp,
                15,
                2,
                AbilityScores::new(23, 9, 21, 9, 10, 12),
                AncillaryTraits {
                    battle_style: Some("berzerker".into()),
                    ..Default::default()
                },
            );
            giant.give_weapon(Weapon::natural(
                "Greatclub",
                8,
                5,
                vec![
                    DamageDie::new(8, DamageType::Bludgeoning),
                    DamageDie::new(8, DamageType::Bludgeoning),
                    DamageDie::new(8, DamageType::Bludgeoning),
                ],
            ));
            giant
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::validate_roster;

    #[test]
    fn test_demo_rosters_validate() {
        let roster = DemoRoster;
        for team in roster.teams() {
            let members = roster.muster(team.id).unwrap();
            validate_roster(&team.name, &members).unwrap();
        }
    }

    #[test]
    fn test_light_armor_recomputed_geoffs_ac() {
        let members = DemoRoster.muster(PLAYERS).unwrap();
        let geoff = members.iter().find(|c| c.name == "Geoff").unwrap();
        // studded leather 12 + dex 14 (+2)
        assert_eq!(geoff.armor_class, 14);
    }

    #[test]
    fn test_daves_shield_raises_ac_and_blocks_two_handing() {
        let members = DemoRoster.muster(PLAYERS).unwrap();
        let dave = members.iter().find(|c| c.name == "Dave").unwrap();
        // base 13 + shield 2 + magic 1
        assert_eq!(dave.armor_class, 16);
        assert!(dave.has_shield());
    }

    #[test]
    fn test_muster_returns_fresh_instances() {
        let roster = DemoRoster;
        let first = roster.muster(PLAYERS).unwrap();
        let second = roster.muster(PLAYERS).unwrap();
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(first[0].name, second[0].name);
    }

    #[test]
    fn test_unknown_team_rejected() {
        assert!(DemoRoster.muster(TeamId(9)).is_err());
    }
}
