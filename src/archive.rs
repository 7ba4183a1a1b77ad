use crate::game::memory::Utterance;
use crate::game::votes::Tally;
use crate::game::{Ballot, Faction, Game, Role};
use crate::time::iso8601;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("database error: {0}")]
    Db(#[from] sled::Error),
    #[error("could not encode record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the game is not over")]
    GameNotOver,
}

/// Persists what happens in a game. Called by the game at the end of each phase,
/// and once for every round of voting.
pub trait Recorder {
    /// Reserves a game id. Returns false if another game already holds it.
    fn claim_id(&self, _game_id: &str) -> Result<bool, ArchiveError> {
        Ok(true)
    }

    /// Saves what each player did during the night.
    fn night_actions(&self, _game: &Game) -> Result<(), ArchiveError> {
        Ok(())
    }

    /// Saves the day's discussion.
    fn transcript(&self, _game: &Game) -> Result<(), ArchiveError> {
        Ok(())
    }

    /// Appends the result of one round of voting; `round` is zero for the first vote.
    fn vote_round(&self, _game: &Game, _round: usize, _ballot: &Ballot, _tally: &Tally) -> Result<(), ArchiveError> {
        Ok(())
    }

    /// Saves the final result of the game.
    fn game_over(&self, _game: &Game) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// A recorder that keeps nothing.
pub struct NoArchive;

impl Recorder for NoArchive {}

/// The databases that games are archived to.
#[derive(Clone)]
pub struct Archive {
    db: sled::Db,
    /// Every game id handed out, so that no two games share their records.
    ids: sled::Tree,
    night_actions: sled::Tree,
    transcripts: sled::Tree,
    votes: sled::Tree,
    archive: sled::Tree,
}

/// One round of voting, as archived.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VoteRecord {
    pub game_id: String,
    pub round: usize,
    /// The players the round was limited to; empty for the first vote.
    pub tied: Vec<String>,
    pub votes: Vec<VoteEntry>,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VoteEntry {
    pub voter: String,
    pub vote: String,
    /// Whether the vote named a player.
    pub counted: bool,
}

/// The final result of a game, as archived.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    pub id: String,
    pub players: Vec<PlayerRecord>,
    pub center: Vec<Role>,
    pub eliminated: String,
    pub winner: Faction,
    pub runoffs: usize,
    pub forced: bool,
    pub started: String,
    pub finished: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub assigned: Role,
    pub current: Role,
    pub votes: usize,
}

impl Archive {
    /// Opens (or creates) the archive at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        Self::new(sled::open(path)?)
    }

    pub fn new(db: sled::Db) -> Result<Self, ArchiveError> {
        Ok(Self {
            ids: db.open_tree("ids")?,
            night_actions: db.open_tree("night_actions")?,
            transcripts: db.open_tree("transcripts")?,
            votes: db.open_tree("votes")?,
            archive: db.open_tree("archive")?,
            db,
        })
    }

    /// Gets the night actions of a game, keyed by player.
    pub fn find_night_actions(&self, game_id: &str) -> Result<Option<BTreeMap<String, String>>, ArchiveError> {
        self.read(&self.night_actions, game_id.as_bytes())
    }

    /// Gets the discussion of a game.
    pub fn find_transcript(&self, game_id: &str) -> Result<Option<Vec<Utterance>>, ArchiveError> {
        self.read(&self.transcripts, game_id.as_bytes())
    }

    /// Gets every round of voting of a game, in order.
    pub fn find_votes(&self, game_id: &str) -> Result<Vec<VoteRecord>, ArchiveError> {
        let mut rounds = vec![];
        for entry in self.votes.iter() {
            let (_, value) = entry?;
            let record = serde_json::from_slice::<VoteRecord>(&value)?;
            if record.game_id == game_id {
                rounds.push(record);
            }
        }
        Ok(rounds)
    }

    /// Gets the result of a finished game.
    pub fn find_game(&self, game_id: &str) -> Result<Option<GameRecord>, ArchiveError> {
        for entry in self.archive.iter() {
            let (_, value) = entry?;
            let record = serde_json::from_slice::<GameRecord>(&value)?;
            if record.id == game_id {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Gets the results of every finished game, oldest first. Unreadable entries are skipped.
    pub fn past_games(&self) -> Vec<GameRecord> {
        self.archive
            .iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|(_, value)| serde_json::from_slice(&value).ok())
            .collect()
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, tree: &sled::Tree, key: &[u8]) -> Result<Option<T>, ArchiveError> {
        match tree.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Appends a record under a fresh, increasing key.
    fn append(&self, tree: &sled::Tree, record: &impl Serialize) -> Result<(), ArchiveError> {
        let key = self.db.generate_id()?.to_be_bytes();
        tree.insert(key, serde_json::to_vec(record)?)?;
        Ok(())
    }
}

impl Recorder for Archive {
    fn claim_id(&self, game_id: &str) -> Result<bool, ArchiveError> {
        let claimed = iso8601(SystemTime::now());
        let swapped = self
            .ids
            .compare_and_swap(game_id.as_bytes(), None::<&[u8]>, Some(claimed.as_bytes()))?;
        Ok(swapped.is_ok())
    }

    fn night_actions(&self, game: &Game) -> Result<(), ArchiveError> {
        let snapshot = game.memory().night_snapshot(game.players());
        self.night_actions
            .insert(game.id().as_bytes(), serde_json::to_vec(&snapshot)?)?;
        Ok(())
    }

    fn transcript(&self, game: &Game) -> Result<(), ArchiveError> {
        self.transcripts
            .insert(game.id().as_bytes(), serde_json::to_vec(game.memory().transcript())?)?;
        Ok(())
    }

    fn vote_round(&self, game: &Game, round: usize, ballot: &Ballot, tally: &Tally) -> Result<(), ArchiveError> {
        self.append(&self.votes, &VoteRecord::new(game, round, ballot, tally))
    }

    fn game_over(&self, game: &Game) -> Result<(), ArchiveError> {
        let record = GameRecord::new(game, SystemTime::now())?;
        self.append(&self.archive, &record)?;
        log::info!("Archived game {}", record.id);
        Ok(())
    }
}

impl VoteRecord {
    pub fn new(game: &Game, round: usize, ballot: &Ballot, tally: &Tally) -> Self {
        let players = game.players();
        let tied = match ballot {
            Ballot::Open => vec![],
            Ballot::Runoff { tied, .. } => tied.iter().map(|idx| players[*idx].name.clone()).collect(),
        };
        let votes = tally
            .votes()
            .iter()
            .map(|vote| VoteEntry {
                voter: players[vote.voter].name.clone(),
                vote: vote.raw.clone(),
                counted: vote.target.is_some(),
            })
            .collect();
        let counts = players
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name.clone(), tally.count(idx)))
            .collect();

        Self {
            game_id: game.id().to_string(),
            round,
            tied,
            votes,
            counts,
        }
    }
}

impl GameRecord {
    pub fn new(game: &Game, finished: SystemTime) -> Result<Self, ArchiveError> {
        let Some(outcome) = game.outcome() else {
            return Err(ArchiveError::GameNotOver);
        };
        let players = game
            .players()
            .iter()
            .enumerate()
            .map(|(idx, p)| PlayerRecord {
                name: p.name.clone(),
                assigned: p.assigned,
                current: p.current,
                votes: game.tally().map(|t| t.count(idx)).unwrap_or(0),
            })
            .collect();

        Ok(Self {
            id: game.id().to_string(),
            players,
            center: game.center().to_vec(),
            eliminated: game.players()[outcome.eliminated].name.clone(),
            winner: outcome.winner,
            runoffs: outcome.runoffs,
            forced: outcome.forced,
            started: iso8601(game.started()),
            finished: iso8601(finished),
        })
    }
}
