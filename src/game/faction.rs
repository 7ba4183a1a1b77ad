use super::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two teams of the game.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Faction {
    Village,
    Werewolf,
}

impl Faction {
    /// Determines the winning team from the card the eliminated player ended the night with.
    pub fn winner(eliminated: Role) -> Self {
        match eliminated {
            Role::Werewolf => Faction::Village,
            _ => Faction::Werewolf,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Village => f.write_str("Village"),
            Faction::Werewolf => f.write_str("Werewolf"),
        }
    }
}
