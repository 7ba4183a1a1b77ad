pub use self::openrouter::OpenRouterOracle;
pub use self::random::RandomOracle;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod openrouter;
mod random;

/// Produces what the players say and who they vote for.
///
/// The engine awaits every call before moving on, so an oracle never sees two
/// requests from the same game at once.
pub trait Oracle: Send {
    /// Returns the free-text reply to a request.
    fn complete<'a>(&'a mut self, request: &'a OracleRequest) -> BoxFuture<'a, Result<String, OracleError>>;
}

/// A failure to get a reply from the oracle. These abort the game.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("the oracle returned an error: {0}")]
    Api(String),
    #[error("the oracle returned an empty reply")]
    EmptyReply,
    #[error("no scripted reply left for {0}")]
    Exhausted(String),
}

/// Everything the oracle needs to answer on behalf of one player.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct OracleRequest {
    /// The player the reply is for.
    pub player: String,
    pub kind: RequestKind,
    /// The names the player may vote for; empty for discussion turns.
    pub candidates: Vec<String>,
    /// The chat context: rules, role guidance, memories, discussion and the instruction.
    pub messages: Vec<Message>,
    pub temperature: f32,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(tag = "type")]
pub enum RequestKind {
    /// A discussion turn.
    Utterance {
        round: usize,
        total_rounds: usize,
        position: usize,
    },
    /// The first vote.
    Vote,
    /// A runoff between tied players.
    Runoff { tied: Vec<String> },
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    Assistant,
    User,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }
}

impl OracleRequest {
    /// A short label identifying the request in logs and traces.
    pub fn trace_name(&self) -> String {
        match &self.kind {
            RequestKind::Utterance { round, .. } => format!("player{}_round{}", self.player, round),
            RequestKind::Vote => format!("vote_player{}", self.player),
            RequestKind::Runoff { .. } => format!("tie_vote_{}", self.player),
        }
    }
}

/// Picks the player named in a vote reply.
///
/// Quotes and full stops are dropped. A reply that is more than a single word
/// is searched for the first candidate it mentions; otherwise the cleaned reply
/// is returned as is, and may not name anybody.
pub fn extract_vote(reply: &str, candidates: &[String]) -> String {
    let vote = reply
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '.'))
        .collect::<String>();
    let vote = vote.trim();

    if vote.contains(char::is_whitespace) {
        if let Some(name) = candidates.iter().find(|name| vote.contains(name.as_str())) {
            return name.clone();
        }
    }
    vote.to_string()
}

/// Strips a leading `"NAME: "` (or `"NAME: OTHER: "`) label from a discussion reply.
pub fn clean_utterance<'a>(reply: &str, speaker: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    let reply = reply.trim();
    let own = format!("{}: ", speaker);
    let Some(rest) = reply.strip_prefix(&own) else {
        return reply.to_string();
    };
    let rest = names
        .into_iter()
        .find_map(|name| rest.strip_prefix(&format!("{}: ", name)))
        .unwrap_or(rest);
    rest.trim().to_string()
}

/// Where the oracles for new games come from.
#[derive(Clone)]
pub enum OracleSource {
    OpenRouter(OpenRouterOracle),
    Random,
}

impl OracleSource {
    /// Uses the chat-completions API if an API key is configured, and plays randomly otherwise.
    pub fn from_env() -> Self {
        match OpenRouterOracle::from_env() {
            Some(oracle) => {
                log::info!("Using model {} for the players", oracle.model());
                OracleSource::OpenRouter(oracle)
            }
            None => {
                log::warn!("OPENAI_API_KEY is not set; players will act randomly");
                OracleSource::Random
            }
        }
    }

    /// Creates the oracle for one game.
    pub fn make(&self, seed: u64) -> Box<dyn Oracle> {
        match self {
            OracleSource::OpenRouter(oracle) => Box::new(oracle.clone()),
            OracleSource::Random => Box::new(RandomOracle::new(seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_votes_are_cleaned() {
        let candidates = names(&["AI_P1", "AI_P2"]);
        assert_eq!(extract_vote(" \"AI_P2\". ", &candidates), "AI_P2");
        assert_eq!(extract_vote("'AI_P1'", &candidates), "AI_P1");
    }

    #[test]
    fn votes_are_found_in_sentences() {
        let candidates = names(&["AI_P1", "AI_P2", "AI_P3"]);
        assert_eq!(extract_vote("I vote for AI_P3.", &candidates), "AI_P3");
    }

    #[test]
    fn unknown_votes_are_returned_as_given() {
        let candidates = names(&["AI_P1", "AI_P2"]);
        assert_eq!(extract_vote("Nobody", &candidates), "Nobody");
        assert_eq!(extract_vote("I abstain.", &candidates), "I abstain");
    }

    #[test]
    fn runoff_votes_only_match_tied_players() {
        let tied = names(&["AI_P2"]);
        assert_eq!(extract_vote("AI_P1 or AI_P2, I pick AI_P2", &tied), "AI_P2");
        assert_eq!(extract_vote("I pick AI_P4", &tied), "I pick AI_P4");
    }

    #[test]
    fn speaker_labels_are_stripped() {
        let all = ["AI_P1", "AI_P2"];
        assert_eq!(clean_utterance("AI_P1: Hello there", "AI_P1", all), "Hello there");
        assert_eq!(clean_utterance("AI_P1: AI_P1: Hello", "AI_P1", all), "Hello");
        assert_eq!(clean_utterance("AI_P1: AI_P2: Hello", "AI_P1", all), "Hello");
        assert_eq!(clean_utterance("  AI_P2 is lying ", "AI_P1", all), "AI_P2 is lying");
    }

    #[test]
    fn trace_names() {
        let request = OracleRequest {
            player: "AI_P1".into(),
            kind: RequestKind::Utterance { round: 2, total_rounds: 3, position: 1 },
            candidates: vec![],
            messages: vec![],
            temperature: 0.8,
        };
        assert_eq!(request.trace_name(), "playerAI_P1_round2");
    }
}
