use super::player::Player;
use serde::{Deserialize, Serialize};

/// Tracks the votes of one round of voting.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Tally {
    /// The number of valid votes received by each player.
    counts: Vec<usize>,
    /// Every vote cast, including the ones that named nobody.
    votes: Vec<Vote>,
}

/// A single vote.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Vote {
    pub voter: usize,
    /// The accused player, or `None` if the vote did not name a player.
    pub target: Option<usize>,
    /// The vote as given by the voter.
    pub raw: String,
}

impl Tally {
    /// Creates an empty tally in which every player has zero votes.
    pub fn new(num_players: usize) -> Self {
        Self {
            counts: vec![0; num_players],
            votes: vec![],
        }
    }

    /// Records a vote. Votes without a valid target are kept but carry no weight.
    pub fn record(&mut self, voter: usize, target: Option<usize>, raw: impl Into<String>) {
        let target = target.filter(|t| *t < self.counts.len());
        if let Some(target) = target {
            self.counts[target] += 1;
        }
        self.votes.push(Vote {
            voter,
            target,
            raw: raw.into(),
        });
    }

    /// Gets the number of votes received by a player.
    pub fn count(&self, player: usize) -> usize {
        self.counts.get(player).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// The votes that did not name a player.
    pub fn invalid_votes(&self) -> impl Iterator<Item = &Vote> {
        self.votes.iter().filter(|v| v.target.is_none())
    }

    /// The total number of valid votes.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The players sharing the highest number of votes, in seating order.
    /// If nobody received a valid vote, every player is tied on zero.
    pub fn plurality(&self) -> Vec<usize> {
        let Some(max) = self.counts.iter().copied().max() else {
            return vec![];
        };
        (0..self.counts.len()).filter(|i| self.counts[*i] == max).collect()
    }

    /// Formats the tally, e.g. `A: 2 vote(s), B: 0 vote(s)`.
    pub fn describe(&self, players: &[Player]) -> String {
        players
            .iter()
            .enumerate()
            .map(|(idx, p)| format!("{}: {} vote(s)", p.name, self.count(idx)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
