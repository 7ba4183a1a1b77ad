use super::{memory::Utterance, Game, Phase};
use crate::error::GameError;
use crate::narrator::Narrator;
use crate::oracle::{clean_utterance, Oracle};
use rand::prelude::SliceRandom;

impl Game {
    /// Runs the discussion rounds. Turns are taken one at a time, since every
    /// speaker hears everything said before them.
    pub(crate) async fn day_phase<O, N>(&mut self, oracle: &mut O, narrator: &mut N) -> Result<(), GameError>
    where
        O: Oracle + ?Sized,
        N: Narrator + ?Sized,
    {
        self.enter(Phase::Day)?;
        narrator.say("Day Phase: discussion time!".into());

        let total_rounds = self.opts.rounds;
        for round in 1..=total_rounds {
            narrator.say(format!("Discussion Round {}/{}", round, total_rounds));

            let mut order = (0..self.num_players()).collect::<Vec<_>>();
            order.shuffle(&mut self.rng);

            for (position, player) in order.into_iter().enumerate() {
                self.take_turn(player, round, position + 1, oracle, narrator).await?;
            }
        }

        narrator.say("Discussion phase ended!".into());
        Ok(())
    }

    async fn take_turn<O, N>(
        &mut self,
        player: usize,
        round: usize,
        position: usize,
        oracle: &mut O,
        narrator: &mut N,
    ) -> Result<(), GameError>
    where
        O: Oracle + ?Sized,
        N: Narrator + ?Sized,
    {
        let request = self.utterance_request(player, round, position);
        let reply = oracle.complete(&request).await?;

        let speaker = self.players[player].name.clone();
        let text = clean_utterance(&reply, &speaker, self.player_names());
        log::debug!("Game {}: {} says {:?}", self.id, speaker, text);

        narrator.say(format!("{}: {}", speaker, text));
        self.memory.add_utterance(Utterance { speaker, round, text });
        Ok(())
    }
}
