pub mod combatant;
pub mod team;
pub mod weapons;

pub use combatant::{ability_bonus, AbilityScores, AncillaryTraits, Combatant, CombatantKind};
pub use team::Team;
pub use weapons::{Armor, ArmorWeight, DamageDie, DamageType, Shield, Weapon, WeaponKind};
