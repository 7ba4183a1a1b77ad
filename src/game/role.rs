use super::faction::Faction;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role card.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Role {
    Werewolf,
    Seer,
    Robber,
    Troublemaker,
    Villager,
}

impl Role {
    /// Every role, in the order in which they wake up during the night.
    pub const NIGHT_ORDER: [Role; 5] = [
        Role::Werewolf,
        Role::Seer,
        Role::Robber,
        Role::Troublemaker,
        Role::Villager,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Werewolf => "Werewolf",
            Role::Seer => "Seer",
            Role::Robber => "Robber",
            Role::Troublemaker => "Troublemaker",
            Role::Villager => "Villager",
        }
    }

    /// The team a player holding this card plays for.
    pub fn faction(self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolf,
            _ => Faction::Village,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Role::NIGHT_ORDER
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_names() {
        assert_eq!("Werewolf".parse::<Role>().unwrap(), Role::Werewolf);
        assert_eq!(" troublemaker ".parse::<Role>().unwrap(), Role::Troublemaker);
        for role in Role::NIGHT_ORDER {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn rejects_unknown_roles() {
        let err = "Tanner".parse::<Role>().unwrap_err();
        assert!(matches!(err, GameError::UnknownRole(name) if name == "Tanner"));
    }

    #[test]
    fn only_werewolves_play_for_the_werewolves() {
        assert_eq!(Role::Werewolf.faction(), Faction::Werewolf);
        assert_eq!(Role::Seer.faction(), Faction::Village);
        assert_eq!(Role::Villager.faction(), Faction::Village);
    }
}
