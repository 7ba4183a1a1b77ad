use crate::api::AppState;
use crate::archive::Archive;
use crate::game::{Game, GameOptions};
use crate::oracle::OracleSource;
use anyhow::Context;
use rand::RngCore;
use std::sync::Arc;

mod api;
mod archive;
mod error;
mod game;
mod narrator;
mod oracle;
mod time;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::try_init().ok();

    let options = GameOptions::from_env().context("invalid game options")?;
    let oracle = OracleSource::from_env();
    let path = std::env::var("ARCHIVE_PATH").unwrap_or_else(|_| "werewolf.db".into());
    let archive = Archive::open(&path).with_context(|| format!("could not open archive at {}", path))?;

    match std::env::var("PORT") {
        Ok(port) => {
            let port = port.parse::<u16>().context("PORT is invalid")?;
            let state = Arc::new(AppState { archive, options, oracle });
            api::serve(port, state).await?;
        }
        Err(_) => play_in_terminal(options, &oracle, &archive).await?,
    }

    Ok(())
}

/// Plays a single game, printing the narration as it happens.
async fn play_in_terminal(options: GameOptions, oracle: &OracleSource, archive: &Archive) -> anyhow::Result<()> {
    let seed = rand::thread_rng().next_u64();
    let mut game = Game::new(options, seed)?;
    let mut oracle = oracle.make(seed);

    let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            println!("{}", line);
        }
    });

    let result = game.play(oracle.as_mut(), &mut tx, archive).await;
    drop(tx);
    printer.await?;

    let outcome = result.with_context(|| format!("game {} failed", game.id()))?;
    log::info!("Game {} finished after {} runoff vote(s)", game.id(), outcome.runoffs);
    Ok(())
}
