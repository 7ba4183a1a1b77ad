use super::Game;
use serde_json::{json, Value};

impl Game {
    /// Summarises the state of the game, revealing every card.
    pub fn get_summary_json(&self) -> Value {
        json!({
            "id": self.id,
            "phase": self.phase,
            "players": self.get_players_json(),
            "center": self.center,
            "nightActions": self.memory.night_snapshot(&self.players),
            "transcript": self.memory.transcript(),
            "outcome": self.get_outcome_json(),
        })
    }

    fn get_players_json(&self) -> Value {
        self.players
            .iter()
            .enumerate()
            .map(|(idx, player)| {
                json!({
                    "name": player.name,
                    "startedAs": player.assigned,
                    "endedAs": player.current,
                    "swapped": player.was_swapped(),
                    "votes": self.tally.as_ref().map(|t| t.count(idx)).unwrap_or(0),
                })
            })
            .collect()
    }

    fn get_outcome_json(&self) -> Value {
        let Some(outcome) = &self.outcome else {
            return Value::Null;
        };
        json!({
            "eliminated": self.players[outcome.eliminated].name,
            "role": outcome.role,
            "winner": outcome.winner,
            "runoffs": outcome.runoffs,
            "forced": outcome.forced,
        })
    }
}
