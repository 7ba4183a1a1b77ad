use super::role::Role;
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The role cards used for a game: one per player, plus the center pile.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Deck {
    cards: Vec<Role>,
}

/// The result of dealing the deck.
#[derive(Clone, Debug)]
pub struct Deal {
    /// The card for each player, in seating order.
    pub dealt: Vec<Role>,
    /// The cards nobody was dealt.
    pub center: Vec<Role>,
}

impl Deck {
    pub fn new(cards: &[Role]) -> Self {
        Self { cards: cards.to_vec() }
    }

    /// Shuffles the deck.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
    }

    /// Deals one card from the top of the deck to each of `num_players` players.
    /// The caller guarantees the deck holds more cards than there are players.
    pub fn deal(mut self, num_players: usize) -> Deal {
        let dealt = (0..num_players)
            .map_while(|_| self.cards.pop())
            .collect();
        Deal {
            dealt,
            center: self.cards,
        }
    }

    /// The number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}
