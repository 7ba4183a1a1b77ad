use super::night::NightAction;
use super::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the players did and said during one game.
///
/// Owned by the game, so that every game keeps its own record and nothing is
/// shared between games running side by side.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct Memory {
    /// The night action of each player, indexed like the players.
    night_actions: Vec<Option<NightAction>>,
    /// Everything said during the day, in order.
    transcript: Vec<Utterance>,
}

/// One discussion turn.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Utterance {
    pub speaker: String,
    pub round: usize,
    pub text: String,
}

impl Memory {
    pub fn new(num_players: usize) -> Self {
        Self {
            night_actions: vec![None; num_players],
            transcript: vec![],
        }
    }

    /// Records the night action of a player, replacing any earlier one.
    pub fn record_night_action(&mut self, player: usize, action: NightAction) {
        if player >= self.night_actions.len() {
            self.night_actions.resize(player + 1, None);
        }
        self.night_actions[player] = Some(action);
    }

    /// Gets the night action of a player, if they have acted.
    pub fn night_action(&self, player: usize) -> Option<&NightAction> {
        self.night_actions.get(player).and_then(Option::as_ref)
    }

    /// The night actions keyed by player name, as the players would describe them.
    pub fn night_snapshot(&self, players: &[Player]) -> BTreeMap<String, String> {
        players
            .iter()
            .zip(&self.night_actions)
            .filter_map(|(player, action)| Some((player.name.clone(), action.as_ref()?.to_string())))
            .collect()
    }

    /// Appends a discussion turn to the transcript.
    pub fn add_utterance(&mut self, utterance: Utterance) {
        self.transcript.push(utterance);
    }

    pub fn transcript(&self) -> &[Utterance] {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::role::Role;

    #[test]
    fn night_actions_are_overwritten() {
        let mut memory = Memory::new(2);
        memory.record_night_action(0, NightAction::Slept);
        memory.record_night_action(0, NightAction::KeptCard);
        assert_eq!(memory.night_action(0), Some(&NightAction::KeptCard));
        assert_eq!(memory.night_action(1), None);
    }

    #[test]
    fn snapshot_uses_player_names() {
        let players = vec![
            Player::new("A".into(), Role::Villager),
            Player::new("B".into(), Role::Robber),
        ];
        let mut memory = Memory::new(2);
        memory.record_night_action(0, NightAction::Slept);
        let snapshot = memory.night_snapshot(&players);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["A"], NightAction::Slept.to_string());
    }
}
