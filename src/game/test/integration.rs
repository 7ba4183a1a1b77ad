//! Integration tests for complete games

use super::test_utils::*;
use crate::archive::{Archive, NoArchive};
use crate::game::night::NightAction;
use crate::game::{Faction, Game, GameOptions, Phase, Role, Role::*};
use crate::oracle::RandomOracle;

fn temporary_archive() -> Archive {
    let db = sled::Config::new().temporary(true).open().unwrap();
    Archive::new(db).unwrap()
}

/// Five players, the reference deck and three rounds, with nobody using an optional power.
fn reference_game() -> Game {
    let opts = GameOptions {
        rounds: 3,
        ..quiet_options(5)
    };
    rigged_game(&[Villager, Werewolf, Seer, Robber, Troublemaker], &[Werewolf, Villager, Villager], opts)
}

fn reference_votes() -> ScriptedOracle {
    ScriptedOracle::new()
        .votes("AI_P1", &["AI_P2"])
        .votes("AI_P2", &["AI_P3"])
        .votes("AI_P3", &["AI_P2"])
        .votes("AI_P4", &["AI_P2"])
        .votes("AI_P5", &["AI_P1"])
}

#[tokio::test]
async fn test_complete_game_village_victory() {
    let mut game = reference_game();
    let mut oracle = reference_votes();
    let mut narration = Vec::<String>::new();

    let outcome = game.play(&mut oracle, &mut narration, &NoArchive).await.unwrap();

    assert_eq!(outcome.eliminated, 1);
    assert_eq!(outcome.role, Werewolf);
    assert_eq!(outcome.winner, Faction::Village);
    assert!(game.game_over());
    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.memory().transcript().len(), 15);
    assert_eq!(oracle.requests.len(), 20);

    assert_eq!(narration.first().map(String::as_str), Some("Game starting!"));
    assert!(narration.iter().any(|l| l == "AI_P2 was eliminated. They were a Werewolf."));
    assert!(narration.iter().any(|l| l == "Village Team Wins!"));
    assert!(narration
        .iter()
        .any(|l| l == "AI_P4 (Started as: Robber, Ended as: Robber): 0 vote(s)"));
    assert_eq!(narration.last().map(String::as_str), Some("Game Over! Thanks for playing!"));
}

#[tokio::test]
async fn test_complete_game_werewolf_victory() {
    let mut game = reference_game();
    let mut oracle = ScriptedOracle::new().everyone_votes(&player_names(5), "AI_P3", 1);
    let mut narration = Vec::<String>::new();

    let outcome = game.play(&mut oracle, &mut narration, &NoArchive).await.unwrap();
    assert_eq!(outcome.role, Seer);
    assert_eq!(outcome.winner, Faction::Werewolf);
    assert!(narration.iter().any(|l| l == "Werewolf Team Wins!"));
}

#[tokio::test]
async fn test_summary_reveals_the_cards() {
    let mut game = reference_game();
    game.play(&mut reference_votes(), &mut Vec::<String>::new(), &NoArchive)
        .await
        .unwrap();

    let summary = game.get_summary_json();
    assert_eq!(summary["phase"], "Ended");
    assert_eq!(summary["players"][1]["name"], "AI_P2");
    assert_eq!(summary["players"][1]["startedAs"], "Werewolf");
    assert_eq!(summary["players"][1]["votes"], 3);
    assert_eq!(summary["outcome"]["eliminated"], "AI_P2");
    assert_eq!(summary["outcome"]["winner"], "Village");
    assert_eq!(summary["center"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_games_are_archived() {
    let archive = temporary_archive();
    let mut game = reference_game();
    let mut oracle = ScriptedOracle::new()
        .votes("AI_P1", &["AI_P2", "AI_P2"])
        .votes("AI_P2", &["AI_P1", "AI_P2"])
        .votes("AI_P3", &["AI_P1", "AI_P2"])
        .votes("AI_P4", &["AI_P2", "AI_P1"])
        .votes("AI_P5", &["AI_P3", "AI_P1"]);

    game.play(&mut oracle, &mut Vec::<String>::new(), &archive)
        .await
        .unwrap();

    let record = archive.find_game(game.id()).unwrap().unwrap();
    assert_eq!(record.eliminated, "AI_P2");
    assert_eq!(record.winner, Faction::Village);
    assert_eq!(record.runoffs, 1);
    assert_eq!(record.players.len(), 5);
    assert_eq!(record.center, game.center());

    let votes = archive.find_votes(game.id()).unwrap();
    assert_eq!(votes.len(), 2);
    assert!(votes[0].tied.is_empty());
    assert_eq!(votes[1].tied, ["AI_P1", "AI_P2"]);
    assert_eq!(votes[1].counts["AI_P2"], 3);

    let transcript = archive.find_transcript(game.id()).unwrap().unwrap();
    assert_eq!(transcript, game.memory().transcript());
    let night = archive.find_night_actions(game.id()).unwrap().unwrap();
    assert_eq!(night.len(), 5);

    assert_eq!(archive.past_games(), vec![record]);
    assert!(archive.find_game("ZZZZ").unwrap().is_none());
}

#[tokio::test]
async fn test_recorder_failures_do_not_stop_the_game() {
    let mut game = reference_game();
    let outcome = game
        .play(&mut reference_votes(), &mut Vec::<String>::new(), &BrokenRecorder)
        .await
        .unwrap();
    assert_eq!(outcome.eliminated, 1);
    assert!(game.game_over());
}

#[tokio::test]
async fn test_oracle_failure_aborts_the_game() {
    let mut game = reference_game();
    // Nobody has any votes queued
    let result = game
        .play(&mut ScriptedOracle::new(), &mut Vec::<String>::new(), &NoArchive)
        .await;
    assert!(result.is_err());
    assert!(!game.game_over());
}

#[tokio::test]
async fn test_random_games_always_finish() {
    for seed in 0..10 {
        let mut game = Game::new(GameOptions::default(), seed).unwrap();
        let mut oracle = RandomOracle::new(seed);
        let outcome = game
            .play(&mut oracle, &mut Vec::<String>::new(), &NoArchive)
            .await
            .unwrap();
        let eliminated = &game.players()[outcome.eliminated];
        assert_eq!(outcome.winner, Faction::winner(eliminated.current));
        assert!(outcome.runoffs <= 5);
    }
}

#[tokio::test]
async fn test_games_with_the_same_id_keep_separate_records() {
    let archive = temporary_archive();
    let mut first = reference_game();
    let mut second = reference_game();
    assert_eq!(first.id(), second.id());

    first
        .play(&mut reference_votes(), &mut Vec::<String>::new(), &archive)
        .await
        .unwrap();
    let mut oracle = ScriptedOracle::new().everyone_votes(&player_names(5), "AI_P3", 1);
    second
        .play(&mut oracle, &mut Vec::<String>::new(), &archive)
        .await
        .unwrap();
    assert_ne!(first.id(), second.id());

    let record = archive.find_game(first.id()).unwrap().unwrap();
    assert_eq!(record.eliminated, "AI_P2");
    let record = archive.find_game(second.id()).unwrap().unwrap();
    assert_eq!(record.eliminated, "AI_P3");

    for game in [&first, &second] {
        assert_eq!(archive.find_votes(game.id()).unwrap().len(), 1);
        let transcript = archive.find_transcript(game.id()).unwrap().unwrap();
        assert_eq!(transcript, game.memory().transcript());
        let night = archive.find_night_actions(game.id()).unwrap().unwrap();
        assert_eq!(night, game.memory().night_snapshot(game.players()));
    }
    assert_eq!(archive.past_games().len(), 2);
}

/// Replays the robber's and the troublemaker's swaps from the night log.
fn cards_after_the_night(game: &Game) -> Vec<Role> {
    let mut cards = game.players().iter().map(|p| p.assigned).collect::<Vec<_>>();
    for role in [Robber, Troublemaker] {
        for (idx, seat) in game.players().iter().enumerate() {
            if seat.assigned != role {
                continue;
            }
            match game.memory().night_action(idx) {
                Some(NightAction::Robbed { player, now }) => {
                    let target = game.find_player(player).unwrap();
                    cards.swap(idx, target);
                    assert_eq!(cards[idx], *now);
                }
                Some(NightAction::SwappedPlayers { first, second }) => {
                    let first = game.find_player(first).unwrap();
                    let second = game.find_player(second).unwrap();
                    cards.swap(first, second);
                }
                _ => {}
            }
        }
    }
    cards
}

#[tokio::test]
async fn test_default_games_are_decided_by_the_final_cards() {
    let mut changed = 0;
    for seed in 0..64 {
        let mut game = Game::new(GameOptions::default(), seed).unwrap();
        let mut oracle = ScriptedOracle::new().everyone_votes(&player_names(5), "AI_P1", 1);
        let mut narration = Vec::<String>::new();
        let outcome = game.play(&mut oracle, &mut narration, &NoArchive).await.unwrap();

        let cards = cards_after_the_night(&game);
        assert_eq!(current_cards(&game), cards, "seed {}", seed);
        assert_eq!(outcome.eliminated, 0);
        assert_eq!(outcome.role, cards[0], "seed {}", seed);
        assert_eq!(outcome.winner, Faction::winner(cards[0]), "seed {}", seed);
        let announced = format!("AI_P1 was eliminated. They were a {}.", cards[0]);
        assert!(narration.contains(&announced), "seed {}", seed);

        if cards[0] != game.players()[0].assigned {
            changed += 1;
        }
    }
    assert!(changed > 0, "AI_P1 never ended the night with another card");
}
