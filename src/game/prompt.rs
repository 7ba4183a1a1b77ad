use super::{options::GameOptions, role::Role, Game};
use crate::oracle::{Message, OracleRequest, RequestKind};
use std::collections::BTreeMap;

const RESPONSE_RULE: &str = "it is your turn to speak. Reply with a single short message to the \
other players, in character, without prefixing it with your name. You may tell the truth, lie or \
bluff, whatever helps your team win.";

const VOTE_RULE: &str = "The discussion is over. Vote for the player you believe is a Werewolf. \
Reply with the player's name only, e.g. AI_P3, and nothing else.";

const TIE_VOTE_RULE: &str = "The vote was tied. Vote again, choosing only among the tied players. \
Reply with the player's name only, and nothing else.";

/// The rules of the game, as explained to the players.
pub fn rules_text(opts: &GameOptions) -> String {
    let mut counts = BTreeMap::<Role, usize>::new();
    for role in &opts.deck {
        *counts.entry(*role).or_default() += 1;
    }
    let deck = counts
        .iter()
        .map(|(role, count)| format!("{} {}", count, role))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are playing One Night Ultimate Werewolf.\n\
        Setup: the deck holds {cards} cards ({deck}). Each of the {players} players is dealt one card \
        and the remaining {center} cards are placed face down in the center.\n\
        Night: the roles wake up in order. Werewolves see each other; a lone werewolf may look at one \
        center card. The Seer looks at one other player's card or at two center cards. The Robber may \
        swap cards with another player and looks at their new card. The Troublemaker may swap the cards \
        of two other players without looking at them. Villagers do nothing.\n\
        Day: everybody discusses for {rounds} rounds to work out who the werewolves are. Players may \
        tell the truth, lie or bluff. Your card may have been swapped during the night.\n\
        Vote: everybody votes for one player, and the player with the most votes is eliminated. Ties \
        are settled with a runoff between the tied players. The Village team wins if the eliminated \
        player holds a Werewolf card at the end of the night, otherwise the Werewolf team wins.",
        cards = opts.deck.len(),
        deck = deck,
        players = opts.players.len(),
        center = opts.center_size(),
        rounds = opts.rounds,
    )
}

/// Guidance for playing the card a player was dealt, including how it may have changed.
pub fn role_guidance(role: Role) -> &'static str {
    match role {
        Role::Werewolf => {
            "You are a Werewolf. Your goal is to avoid being eliminated: blend in with the village, claim \
            a safe role, and steer suspicion onto somebody else.\n\n\
            IMPORTANT: Your role may have changed during the night. The Robber might have stolen your \
            card, or the Troublemaker might have swapped you with another player. You won't know unless \
            you deduce it from the discussion."
        }
        Role::Seer => {
            "You are the Seer, on the Village team. Use what you saw during the night to find the \
            werewolves, but beware that cards may have moved after you looked.\n\n\
            IMPORTANT: Your role may have changed during the night. The Robber might have stolen your \
            card, or the Troublemaker might have swapped you with another player. Pay attention to \
            conflicting claims and try to figure out if you were affected."
        }
        Role::Robber => {
            "You are the Robber, on the Village team at the start of the night. If you robbed somebody, \
            you now play for the team of the card you took.\n\n\
            REMINDER: If you robbed another player's card during the night, you saw what role you took. \
            However, the Troublemaker acts after you, so you might have been swapped again without \
            knowing it. Pay attention to the discussion to figure out if the Troublemaker affected you."
        }
        Role::Troublemaker => {
            "You are the Troublemaker, on the Village team. Share who you swapped when it helps the \
            village reason about the cards.\n\n\
            REMINDER: If you swapped two players' cards, you don't know what roles you swapped - you only \
            know WHO you swapped. Those players don't know they were swapped. You cannot swap yourself."
        }
        Role::Villager => {
            "You are a Villager, on the Village team. You have no information from the night, so listen \
            carefully, question claims, and help the village find a werewolf.\n\n\
            IMPORTANT: Your role may have changed during the night. The Robber might have stolen your \
            card, or the Troublemaker might have swapped you with another player. Pay attention to \
            conflicting claims and try to figure out if you were affected."
        }
    }
}

impl Game {
    /// The context shared by every request for a player: rules, guidance, their night and the discussion so far.
    fn context_messages(&self, player: usize) -> Vec<Message> {
        let me = &self.players[player];
        let mut messages = vec![
            Message::system(format!("{}\n\nYou are {} in this game.", rules_text(&self.opts), me.name)),
            Message::system(role_guidance(me.assigned)),
        ];
        if let Some(action) = self.memory.night_action(player) {
            messages.push(Message::system(format!("Your night action: {}", action)));
        }
        messages.extend(
            self.memory
                .transcript()
                .iter()
                .map(|u| Message::assistant(format!("{}: {}", u.speaker, u.text))),
        );
        messages
    }

    /// Builds the request for a player's turn in the discussion.
    pub fn utterance_request(&self, player: usize, round: usize, position: usize) -> OracleRequest {
        let name = &self.players[player].name;
        let total_rounds = self.opts.rounds;
        let mut messages = self.context_messages(player);
        messages.push(Message::user(format!(
            "{}, {}\nPlease note you are now in position {} in discussion round {} of {} total rounds. \
            Please adjust your strategy accordingly.",
            name, RESPONSE_RULE, position, round, total_rounds
        )));

        OracleRequest {
            player: name.clone(),
            kind: RequestKind::Utterance {
                round,
                total_rounds,
                position,
            },
            candidates: vec![],
            messages,
            temperature: self.opts.conversation_temperature,
        }
    }

    /// Builds the request for a player's first vote.
    pub fn vote_request(&self, player: usize) -> OracleRequest {
        let mut messages = self.context_messages(player);
        messages.push(Message::user(VOTE_RULE));

        OracleRequest {
            player: self.players[player].name.clone(),
            kind: RequestKind::Vote,
            candidates: self.player_names().map(str::to_string).collect(),
            messages,
            temperature: self.opts.voting_temperature,
        }
    }

    /// Builds the request for a player's vote in a runoff between the tied players.
    pub fn runoff_request(&self, player: usize, tied: &[usize], previous: &str) -> OracleRequest {
        let tied = tied
            .iter()
            .map(|idx| self.players[*idx].name.clone())
            .collect::<Vec<_>>();
        let mut messages = self.context_messages(player);
        messages.push(Message::user(format!(
            "The last round of voting results are: {}\nThese players are tied: [{}]\n{}",
            previous,
            tied.join(", "),
            TIE_VOTE_RULE
        )));

        OracleRequest {
            player: self.players[player].name.clone(),
            kind: RequestKind::Runoff { tied: tied.clone() },
            candidates: tied,
            messages,
            temperature: self.opts.voting_temperature,
        }
    }
}
