use crate::oracle::OracleError;
use thiserror::Error;

/// The result of attempting to set up or run a [Game](crate::game::Game) that cannot proceed.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid combination of game options: {0}")]
    InvalidGameOptions(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("too few players in the game")]
    TooFewPlayers,
    #[error("the deck needs more cards than there are players ({cards} cards for {players} players)")]
    DeckTooSmall { cards: usize, players: usize },
    #[error("two players share the name {0}")]
    DuplicatePlayer(String),
    #[error("no player exists with the given name")]
    PlayerNotFound,
    #[error("invalid player index")]
    InvalidPlayerIndex,
    #[error("this action cannot be performed during this phase of the game")]
    InvalidAction,
    #[error("decision oracle failed: {0}")]
    Oracle(#[from] OracleError),
}
