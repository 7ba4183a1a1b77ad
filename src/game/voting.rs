use super::{faction::Faction, votes::Tally, Game, Outcome, Phase};
use crate::archive::Recorder;
use crate::error::GameError;
use crate::narrator::Narrator;
use crate::oracle::{extract_vote, Oracle};
use rand::prelude::SliceRandom;

/// The kind of vote being held.
#[derive(Clone, Debug)]
pub enum Ballot {
    /// Everybody may be accused.
    Open,
    /// The players are asked to choose between the tied players.
    Runoff {
        tied: Vec<usize>,
        /// The previous round's tally, as shown to the players.
        previous: String,
    },
}

impl Game {
    /// Holds votes until exactly one player has the most votes, and eliminates them.
    pub(crate) async fn voting_phase<O, N, R>(
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
        self.enter(Phase::Voting)?;
        narrator.say("Voting Phase: time to vote for who you think is a Werewolf!".into());

        let mut ballot = Ballot::Open;
        let mut runoffs = 0;
        let (eliminated, forced) = loop {
            let tally = self.collect_votes(&ballot, oracle, narrator).await?;
            super::persist("vote round", recorder.vote_round(self, runoffs, &ballot, &tally));
            let invalid = tally.invalid_votes().count();
            if invalid > 0 {
                log::info!("Game {}: {} of {} votes named nobody", self.id, invalid, tally.votes().len());
            }

            let plurality = tally.plurality();
            let previous = tally.describe(&self.players);
            self.tally = Some(tally);

            match plurality[..] {
                [] => return Err(GameError::TooFewPlayers),
                [eliminated] => break (eliminated, false),
                _ => {}
            }

            self.announce_tie(&plurality, narrator);
            if self.opts.max_tie_breaks.is_some_and(|limit| runoffs >= limit) {
                let Some(&eliminated) = plurality.choose(&mut self.rng) else {
                    return Err(GameError::TooFewPlayers);
                };
                log::warn!("Game {}: still tied after {} runoffs, choosing at random", self.id, runoffs);
                narrator.say(format!(
                    "Still tied after {} runoff votes! {} is eliminated by lot.",
                    runoffs, self.players[eliminated].name
                ));
                break (eliminated, true);
            }

            runoffs += 1;
            ballot = Ballot::Runoff { tied: plurality, previous };
        };

        let role = self.players[eliminated].current;
        let outcome = Outcome {
            eliminated,
            role,
            winner: Faction::winner(role),
            runoffs,
            forced,
        };
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Asks every player for one vote.
    async fn collect_votes<O, N>(&mut self, ballot: &Ballot, oracle: &mut O, narrator: &mut N) -> Result<Tally, GameError>
    where
        O: Oracle + ?Sized,
        N: Narrator + ?Sized,
    {
        let mut tally = Tally::new(self.num_players());

        for voter in 0..self.num_players() {
            let request = match ballot {
                Ballot::Open => self.vote_request(voter),
                Ballot::Runoff { tied, previous } => self.runoff_request(voter, tied, previous),
            };
            let reply = oracle.complete(&request).await?;
            let vote = extract_vote(&reply, &request.candidates);

            // Anybody may be voted for; only unknown names are discarded
            let target = self.find_player(&vote).ok();
            match target {
                Some(target) => {
                    log::debug!("Game {}: {} votes for {}", self.id, request.player, self.players[target].name)
                }
                None => {
                    log::warn!("Game {}: invalid vote from {}: {:?}", self.id, request.player, reply);
                    narrator.say(format!("Invalid vote from {}: {}", request.player, vote));
                }
            }
            tally.record(voter, target, vote);
        }

        Ok(tally)
    }

    fn announce_tie<N: Narrator + ?Sized>(&self, tied: &[usize], narrator: &mut N) {
        narrator.say("It's a tie!".into());
        if let Some(tally) = &self.tally {
            for (idx, player) in self.players.iter().enumerate() {
                narrator.say(format!("{}: {} vote(s)", player.name, tally.count(idx)));
            }
        }
        let names = tied
            .iter()
            .map(|idx| self.players[*idx].name.as_str())
            .collect::<Vec<_>>();
        narrator.say(format!("Tied players: {}", names.join(", ")));
        narrator.say("Additional voting round required!".into());
    }
}
