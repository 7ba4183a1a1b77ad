use super::{role::Role, Game, Phase};
use crate::error::GameError;
use crate::narrator::Narrator;
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a player did and learned during the night.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(tag = "type")]
pub enum NightAction {
    /// A werewolf saw the other werewolves.
    SawWerewolves { others: Vec<String> },
    /// The only werewolf looked at a center card.
    LoneWolf { center: Role },
    /// The seer looked at another player's card.
    SawPlayer { player: String, role: Role },
    /// The seer looked at cards in the center.
    SawCenter { cards: Vec<Role> },
    /// The robber took another player's card and looked at it.
    Robbed { player: String, now: Role },
    /// The robber kept their own card.
    KeptCard,
    /// The troublemaker swapped two other players' cards without looking.
    SwappedPlayers { first: String, second: String },
    /// The troublemaker left everybody's cards alone.
    LeftCardsAlone,
    /// The troublemaker had fewer than two other players to swap.
    NoOneToSwap,
    /// Villagers sleep through the night.
    Slept,
}

impl fmt::Display for NightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NightAction::SawWerewolves { others } => {
                write!(f, "I have seen that players {} are werewolves.", others.join(", "))
            }
            NightAction::LoneWolf { center } => {
                write!(f, "I am the only werewolf. I have seen the center card: {}.", center)
            }
            NightAction::SawPlayer { player, role } => {
                write!(f, "I have seen that player {} is a {}.", player, role)
            }
            NightAction::SawCenter { cards } => {
                let cards = cards.iter().map(|card| card.name()).collect::<Vec<_>>();
                write!(f, "I have seen the center cards: {}.", cards.join(", "))
            }
            NightAction::Robbed { player, now } => {
                write!(f, "I swapped roles with player {} and now I am a {}.", player, now)
            }
            NightAction::KeptCard => {
                write!(f, "I had the opportunity to swap but chose not to do anything.")
            }
            NightAction::SwappedPlayers { first, second } => {
                write!(f, "I swapped roles between player {} and player {}.", first, second)
            }
            NightAction::LeftCardsAlone => write!(
                f,
                "I had the opportunity to swap between players but chose not to do anything."
            ),
            NightAction::NoOneToSwap => write!(f, "Not enough players to swap roles."),
            NightAction::Slept => write!(f, "As a villager, I did nothing during the night."),
        }
    }
}

impl Game {
    pub(crate) fn night_phase<N: Narrator + ?Sized>(&mut self, narrator: &mut N) -> Result<(), GameError> {
        self.enter(Phase::Night)?;
        narrator.say("Night Phase: everyone close your eyes...".into());

        // Later roles must see the swaps made by earlier ones
        for role in Role::NIGHT_ORDER {
            let acting = (0..self.num_players())
                .filter(|idx| self.players[*idx].assigned == role)
                .collect::<Vec<_>>();
            for player in acting {
                self.perform_night_action(player)?;
            }
        }

        narrator.say("Dawn breaks! Everyone wake up!".into());
        Ok(())
    }

    /// Performs the night action for the card the player was dealt, and records it in the player's memory.
    pub fn perform_night_action(&mut self, player: usize) -> Result<NightAction, GameError> {
        self.check_player_index(player)?;
        if self.phase != Phase::Night {
            return Err(GameError::InvalidAction);
        }

        let action = match self.players[player].assigned {
            Role::Werewolf => self.werewolf(player),
            Role::Seer => self.seer(player),
            Role::Robber => self.robber(player),
            Role::Troublemaker => self.troublemaker(player),
            Role::Villager => NightAction::Slept,
        };

        log::debug!("Game {}: {} -> {}", self.id, self.players[player].name, action);
        self.memory.record_night_action(player, action.clone());
        Ok(action)
    }

    /// Swaps the robber's card with the target's.
    pub fn rob(&mut self, robber: usize, target: usize) -> Result<Role, GameError> {
        self.check_swap(robber, target)?;
        self.swap_cards(robber, target);
        Ok(self.players[robber].current)
    }

    /// Swaps the cards of two players.
    pub fn swap(&mut self, first: usize, second: usize) -> Result<(), GameError> {
        self.check_swap(first, second)?;
        self.swap_cards(first, second);
        Ok(())
    }

    fn check_swap(&self, first: usize, second: usize) -> Result<(), GameError> {
        self.check_player_index(first)?;
        self.check_player_index(second)?;
        if self.phase != Phase::Night {
            return Err(GameError::InvalidAction);
        }
        if first == second {
            return Err(GameError::InvalidAction);
        }
        Ok(())
    }

    fn swap_cards(&mut self, first: usize, second: usize) {
        let card = self.players[first].current;
        self.players[first].current = self.players[second].current;
        self.players[second].current = card;
    }

    fn werewolf(&mut self, player: usize) -> NightAction {
        let others = self
            .players
            .iter()
            .enumerate()
            .filter(|(idx, p)| *idx != player && p.assigned == Role::Werewolf)
            .map(|(_, p)| p.name.clone())
            .collect::<Vec<_>>();

        if !others.is_empty() {
            return NightAction::SawWerewolves { others };
        }
        match self.center.choose(&mut self.rng) {
            Some(&center) => NightAction::LoneWolf { center },
            None => NightAction::SawWerewolves { others },
        }
    }

    fn seer(&mut self, player: usize) -> NightAction {
        let look_at_player = self.rng.gen_bool(self.opts.night.seer_player);
        if look_at_player {
            if let Some(&target) = self.others(player).choose(&mut self.rng) {
                // Nothing has been swapped yet, so this is also the dealt card
                let target = &self.players[target];
                return NightAction::SawPlayer {
                    player: target.name.clone(),
                    role: target.current,
                };
            }
        }
        let cards = self.center.choose_multiple(&mut self.rng, 2).copied().collect();
        NightAction::SawCenter { cards }
    }

    fn robber(&mut self, player: usize) -> NightAction {
        if !self.rng.gen_bool(self.opts.night.robber_swap) {
            return NightAction::KeptCard;
        }
        let Some(&target) = self.others(player).choose(&mut self.rng) else {
            return NightAction::KeptCard;
        };
        self.swap_cards(player, target);
        NightAction::Robbed {
            player: self.players[target].name.clone(),
            now: self.players[player].current,
        }
    }

    fn troublemaker(&mut self, player: usize) -> NightAction {
        if !self.rng.gen_bool(self.opts.night.troublemaker_swap) {
            return NightAction::LeftCardsAlone;
        }
        let others = self.others(player);
        if others.len() < 2 {
            return NightAction::NoOneToSwap;
        }
        let targets = others.choose_multiple(&mut self.rng, 2).copied().collect::<Vec<_>>();
        let (first, second) = (targets[0], targets[1]);
        self.swap_cards(first, second);
        NightAction::SwappedPlayers {
            first: self.players[first].name.clone(),
            second: self.players[second].name.clone(),
        }
    }
}
