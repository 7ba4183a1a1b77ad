use super::role::Role;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Options for customising a game of One Night Werewolf.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GameOptions {
    /// The names of the players, in seating order.
    pub players: Vec<String>,
    /// Every role card in the game; the cards not dealt form the center pile.
    pub deck: Vec<Role>,
    /// The number of discussion rounds during the day.
    pub rounds: usize,
    /// Sampling temperature passed to the oracle for discussion turns.
    pub conversation_temperature: f32,
    /// Sampling temperature passed to the oracle for votes.
    pub voting_temperature: f32,
    /// How often each role uses its optional night power.
    pub night: NightOdds,
    /// The number of runoff votes held before a tie is broken at random; `None` never gives up.
    pub max_tie_breaks: Option<usize>,
}

/// The probabilities with which the roles choose between their night options.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct NightOdds {
    /// Chance the seer looks at a player rather than two center cards.
    pub seer_player: f64,
    /// Chance the robber swaps cards with another player.
    pub robber_swap: f64,
    /// Chance the troublemaker swaps two other players' cards.
    pub troublemaker_swap: f64,
}

impl Default for NightOdds {
    fn default() -> Self {
        Self {
            seer_player: 0.5,
            robber_swap: 0.8,
            troublemaker_swap: 0.5,
        }
    }
}

impl NightOdds {
    /// Every optional power is always used.
    pub fn always() -> Self {
        Self {
            seer_player: 1.0,
            robber_swap: 1.0,
            troublemaker_swap: 1.0,
        }
    }
}

impl Default for GameOptions {
    fn default() -> Self {
        use Role::*;
        Self {
            players: (1..=5).map(|i| format!("AI_P{}", i)).collect(),
            deck: vec![
                Werewolf,
                Werewolf,
                Seer,
                Robber,
                Troublemaker,
                Villager,
                Villager,
                Villager,
            ],
            rounds: 3,
            conversation_temperature: 0.8,
            voting_temperature: 0.2,
            night: NightOdds::default(),
            max_tie_breaks: Some(5),
        }
    }
}

impl GameOptions {
    /// Reads the options from the environment, falling back to the defaults for missing variables.
    pub fn from_env() -> Result<Self, GameError> {
        let mut opts = Self::default();
        if let Ok(players) = std::env::var("WEREWOLF_PLAYERS") {
            opts.players = split_list(&players).map(str::to_string).collect();
        }
        if let Ok(deck) = std::env::var("WEREWOLF_DECK") {
            opts.deck = parse_deck(&deck)?;
        }
        if let Some(rounds) = env_value("WEREWOLF_ROUNDS")? {
            opts.rounds = rounds;
        }
        if let Some(t) = env_value("WEREWOLF_CONVERSATION_TEMPERATURE")? {
            opts.conversation_temperature = t;
        }
        if let Some(t) = env_value("WEREWOLF_VOTING_TEMPERATURE")? {
            opts.voting_temperature = t;
        }
        if let Ok(limit) = std::env::var("WEREWOLF_MAX_TIE_BREAKS") {
            opts.max_tie_breaks = match limit.trim() {
                "none" | "" => None,
                n => Some(parse_value("WEREWOLF_MAX_TIE_BREAKS", n)?),
            };
        }
        opts.validate()?;
        Ok(opts)
    }

    /// Checks that a game can be played with these options.
    pub fn validate(&self) -> Result<(), GameError> {
        let num_players = self.players.len();
        if num_players == 0 {
            return Err(GameError::TooFewPlayers);
        }
        if self.deck.len() <= num_players {
            return Err(GameError::DeckTooSmall {
                cards: self.deck.len(),
                players: num_players,
            });
        }

        let mut seen = HashSet::new();
        for name in &self.players {
            if name.trim().is_empty() {
                return Err(GameError::InvalidGameOptions("player names cannot be empty".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(GameError::DuplicatePlayer(name.clone()));
            }
        }

        if self.rounds == 0 {
            return Err(GameError::InvalidGameOptions("at least one discussion round is needed".into()));
        }

        let odds = [
            self.night.seer_player,
            self.night.robber_swap,
            self.night.troublemaker_swap,
        ];
        if odds.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(GameError::InvalidGameOptions("night odds must lie between 0 and 1".into()));
        }

        Ok(())
    }

    /// The number of cards left in the center once every player is dealt a card.
    pub fn center_size(&self) -> usize {
        self.deck.len().saturating_sub(self.players.len())
    }
}

/// Parses a comma separated list of role names.
pub fn parse_deck(list: &str) -> Result<Vec<Role>, GameError> {
    split_list(list).map(str::parse).collect()
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn env_value<T: FromStr>(key: &str) -> Result<Option<T>, GameError> {
    match std::env::var(key) {
        Ok(value) => parse_value(key, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, GameError> {
    value
        .trim()
        .parse()
        .map_err(|_| GameError::InvalidGameOptions(format!("{} has an invalid value: {}", key, value)))
}
