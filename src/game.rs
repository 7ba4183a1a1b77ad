use self::deck::Deck;
pub use self::faction::Faction;
use self::memory::Memory;
pub use self::options::GameOptions;
use self::player::{seat_players, Player};
pub use self::role::Role;
use self::votes::Tally;
pub use self::voting::Ballot;
use crate::archive::{ArchiveError, Recorder};
use crate::error::GameError;
use crate::narrator::Narrator;
use crate::oracle::Oracle;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

mod day;
mod deck;
mod faction;
mod json;
pub mod memory;
pub mod night;
pub mod options;
pub mod player;
pub mod prompt;
pub mod role;
mod test;
pub mod votes;
mod voting;

/// A game of One Night Werewolf.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Game {
    id: String,
    opts: GameOptions,
    players: Vec<Player>,
    center: Vec<Role>,
    phase: Phase,
    memory: Memory,
    tally: Option<Tally>,
    outcome: Option<Outcome>,
    started: SystemTime,
    rng: rand_chacha::ChaCha8Rng,
}

/// The phases of the game, in the order they are played.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Phase {
    Setup,
    Night,
    Day,
    Voting,
    Ended,
}

impl Phase {
    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Setup => Some(Phase::Night),
            Phase::Night => Some(Phase::Day),
            Phase::Day => Some(Phase::Voting),
            Phase::Voting => Some(Phase::Ended),
            Phase::Ended => None,
        }
    }
}

/// How the vote ended.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Outcome {
    /// Index of the eliminated player.
    pub eliminated: usize,
    /// The card the eliminated player ended the night with.
    pub role: Role,
    pub winner: Faction,
    /// The number of runoff votes that were needed.
    pub runoffs: usize,
    /// Whether the runoff limit was reached and the tie was broken at random.
    pub forced: bool,
}

impl Game {
    /// Creates a new game, dealing the role cards.
    pub fn new(opts: GameOptions, seed: u64) -> Result<Self, GameError> {
        opts.validate()?;

        // Shuffle the deck and deal the cards
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let mut deck = Deck::new(&opts.deck);
        deck.shuffle(&mut rng);
        let deal = deck.deal(opts.players.len());
        let players = seat_players(&opts.players, deal.dealt);

        let id = random_id(&mut rng);
        log::info!("Created game {} with {} players", id, players.len());

        Ok(Game {
            id,
            memory: Memory::new(players.len()),
            players,
            center: deal.center,
            phase: Phase::Setup,
            tally: None,
            outcome: None,
            started: SystemTime::now(),
            opts,
            rng,
        })
    }

    /// Plays the whole game, from the night through to the final vote.
    pub async fn play<O, N, R>(
        &mut self,
        oracle: &mut O,
        narrator: &mut N,
        recorder: &R,
    ) -> Result<Outcome, GameError>
    where
        O: Oracle + ?Sized,
        N: Narrator + ?Sized,
        R: Recorder + ?Sized,
    {
        if self.phase != Phase::Setup {
            return Err(GameError::InvalidAction);
        }
        self.claim_id(recorder);
        narrator.say("Game starting!".into());
        narrator.say("Roles have been assigned!".into());

        self.night_phase(narrator)?;
        persist("night actions", recorder.night_actions(self));

        self.day_phase(oracle, narrator).await?;
        persist("transcript", recorder.transcript(self));

        let outcome = self.voting_phase(oracle, narrator, recorder).await?;
        self.end_game(narrator)?;
        persist("game record", recorder.game_over(self));

        Ok(outcome)
    }

    /// The unique game ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &GameOptions {
        &self.opts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Gets the player names.
    pub fn player_names(&self) -> impl Iterator<Item = &'_ str> {
        self.players.iter().map(|p| &p.name[..])
    }

    /// The cards that were not dealt to anyone.
    pub fn center(&self) -> &[Role] {
        &self.center
    }

    /// The night actions and the day's discussion.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// The tally of the latest round of voting.
    pub fn tally(&self) -> Option<&Tally> {
        self.tally.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn started(&self) -> SystemTime {
        self.started
    }

    /// Returns true if the game is over.
    pub fn game_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// Gets the number of players in the game.
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Finds a player with the given name.
    pub fn find_player(&self, name: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .ok_or(GameError::PlayerNotFound)
    }

    /// Returns `Ok` if the given player index is valid, and an `Err` otherwise.
    fn check_player_index(&self, player: usize) -> Result<(), GameError> {
        if player < self.num_players() {
            Ok(())
        } else {
            Err(GameError::InvalidPlayerIndex)
        }
    }

    /// The indices of every player except the given one.
    fn others(&self, player: usize) -> Vec<usize> {
        (0..self.num_players()).filter(|i| *i != player).collect()
    }

    /// Draws new ids until the recorder accepts one that no other game holds.
    fn claim_id<R: Recorder + ?Sized>(&mut self, recorder: &R) {
        loop {
            match recorder.claim_id(&self.id) {
                Ok(true) => break,
                Ok(false) => {
                    log::debug!("Game id {} is taken", self.id);
                    self.id = random_id(&mut self.rng);
                }
                Err(err) => {
                    log::error!("Could not claim game id {}: {}", self.id, err);
                    break;
                }
            }
        }
    }

    /// Moves the game on to the given phase, which must directly follow the current one.
    fn enter(&mut self, phase: Phase) -> Result<(), GameError> {
        if self.phase.next() != Some(phase) {
            return Err(GameError::InvalidAction);
        }
        log::info!("Game {}: {:?} -> {:?}", self.id, self.phase, phase);
        self.phase = phase;
        Ok(())
    }

    fn end_game<N: Narrator + ?Sized>(&mut self, narrator: &mut N) -> Result<(), GameError> {
        let Some(outcome) = self.outcome.clone() else {
            return Err(GameError::InvalidAction);
        };
        self.enter(Phase::Ended)?;

        narrator.say("Final Results".into());
        for (idx, player) in self.players.iter().enumerate() {
            let votes = self.tally.as_ref().map(|t| t.count(idx)).unwrap_or(0);
            narrator.say(format!(
                "{} (Started as: {}, Ended as: {}): {} vote(s)",
                player.name, player.assigned, player.current, votes
            ));
        }

        let eliminated = &self.players[outcome.eliminated];
        narrator.say(format!("{} was eliminated. They were a {}.", eliminated.name, outcome.role));
        narrator.say(match outcome.winner {
            Faction::Village => "Village Team Wins!".into(),
            Faction::Werewolf => "Werewolf Team Wins!".into(),
        });
        narrator.say("Game Over! Thanks for playing!".into());

        log::info!(
            "Game {} over: {} eliminated as {}, {} team wins",
            self.id,
            eliminated.name,
            outcome.role,
            outcome.winner
        );
        Ok(())
    }
}

/// Generates a short game ID.
fn random_id(rng: &mut impl Rng) -> String {
    (0..4)
        .map(|_| match rng.gen_range('A'..='Z') {
            // Avoid U and V because they are easily confused
            'U' => 'A',
            'V' => 'B',
            other => other,
        })
        .collect()
}

/// Writing an artifact never stops the game; failures are only logged.
fn persist(what: &str, result: Result<(), ArchiveError>) {
    if let Err(err) = result {
        log::error!("Could not record {}: {}", what, err);
    }
}
