use super::{Oracle, OracleError, OracleRequest, RequestKind};
use futures_util::future::{ready, BoxFuture};
use futures_util::FutureExt;
use rand::prelude::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const LINES: [&str; 6] = [
    "I'm a Villager, I slept through the whole night.",
    "Somebody here is not telling the truth.",
    "I'd like to hear from the people who haven't claimed a role yet.",
    "That story doesn't add up to me.",
    "I trust what the Seer said.",
    "Let's not rush this vote.",
];

/// An oracle that votes for a random candidate and makes small talk.
/// Used for offline games and simulations.
pub struct RandomOracle {
    rng: ChaCha8Rng,
}

impl RandomOracle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn reply(&mut self, request: &OracleRequest) -> Result<String, OracleError> {
        let choice = match &request.kind {
            RequestKind::Utterance { .. } => LINES.choose(&mut self.rng).map(|s| s.to_string()),
            RequestKind::Vote | RequestKind::Runoff { .. } => {
                request.candidates.choose(&mut self.rng).cloned()
            }
        };
        choice.ok_or_else(|| OracleError::Exhausted(request.trace_name()))
    }
}

impl Oracle for RandomOracle {
    fn complete<'a>(&'a mut self, request: &'a OracleRequest) -> BoxFuture<'a, Result<String, OracleError>> {
        ready(self.reply(request)).boxed()
    }
}
