use super::role::Role;
use serde::{Deserialize, Serialize};

/// A game player.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Player {
    pub name: String,
    /// The card dealt at the start of the game.
    pub assigned: Role,
    /// The card the player holds after any swaps during the night.
    pub current: Role,
}

impl Player {
    pub fn new(name: String, role: Role) -> Self {
        Self {
            name,
            assigned: role,
            current: role,
        }
    }

    /// Whether the player's card was moved during the night.
    pub fn was_swapped(&self) -> bool {
        self.assigned != self.current
    }
}

/// Creates the players for the dealt cards, in seating order.
pub fn seat_players(names: &[String], dealt: Vec<Role>) -> Vec<Player> {
    names
        .iter()
        .zip(dealt)
        .map(|(name, role)| Player::new(name.clone(), role))
        .collect()
}
