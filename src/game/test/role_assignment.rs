//! Dealing the role cards and validating the game options

use super::test_utils::*;
use crate::error::GameError;
use crate::game::{Game, GameOptions, Role};

fn sorted(mut cards: Vec<Role>) -> Vec<Role> {
    cards.sort();
    cards
}

#[test]
fn test_deal_preserves_the_deck() {
    let deck = sorted(GameOptions::default().deck);
    for seed in 0..50 {
        let game = create_standard_game(seed);
        assert_eq!(game.players.len(), 5);
        assert_eq!(game.center.len(), 3);
        assert_eq!(all_cards(&game), deck, "seed {}", seed);
    }
}

#[test]
fn test_players_start_with_their_dealt_card() {
    let game = create_standard_game(7);
    for player in &game.players {
        assert_eq!(player.assigned, player.current);
        assert!(!player.was_swapped());
    }
}

#[test]
fn test_deal_is_seeded() {
    let first = create_standard_game(11);
    let second = create_standard_game(11);
    assert_eq!(current_cards(&first), current_cards(&second));
    assert_eq!(first.center, second.center);
    assert_eq!(first.id(), second.id());

    let deals = (0..20)
        .map(|seed| current_cards(&create_standard_game(seed)))
        .collect::<std::collections::HashSet<_>>();
    assert!(deals.len() > 1, "every seed dealt the same cards");
}

#[test]
fn test_players_keep_their_seats() {
    let game = create_standard_game(3);
    let names = game.player_names().collect::<Vec<_>>();
    assert_eq!(names, ["AI_P1", "AI_P2", "AI_P3", "AI_P4", "AI_P5"]);
    assert_eq!(game.find_player("AI_P4").unwrap(), 3);
    assert!(matches!(game.find_player("AI_P9"), Err(GameError::PlayerNotFound)));
}

#[test]
fn test_custom_deck() {
    let opts = GameOptions {
        players: player_names(3),
        deck: vec![Role::Werewolf, Role::Seer, Role::Villager, Role::Robber],
        ..Default::default()
    };
    let game = Game::new(opts, 1).unwrap();
    assert_eq!(game.center.len(), 1);
    assert_eq!(
        all_cards(&game),
        sorted(vec![Role::Werewolf, Role::Seer, Role::Villager, Role::Robber])
    );
}

#[test]
fn test_deck_must_leave_a_center_pile() {
    let opts = GameOptions {
        players: player_names(8),
        ..Default::default()
    };
    let result = Game::new(opts, 1);
    assert!(matches!(
        result,
        Err(GameError::DeckTooSmall { cards: 8, players: 8 })
    ));
}

#[test]
fn test_invalid_rosters() {
    let no_players = GameOptions {
        players: vec![],
        ..Default::default()
    };
    assert!(matches!(Game::new(no_players, 1), Err(GameError::TooFewPlayers)));

    let duplicates = GameOptions {
        players: vec!["A".into(), "B".into(), "A".into()],
        ..Default::default()
    };
    assert!(matches!(
        Game::new(duplicates, 1),
        Err(GameError::DuplicatePlayer(name)) if name == "A"
    ));

    let no_rounds = GameOptions {
        rounds: 0,
        ..Default::default()
    };
    assert!(matches!(Game::new(no_rounds, 1), Err(GameError::InvalidGameOptions(_))));
}
