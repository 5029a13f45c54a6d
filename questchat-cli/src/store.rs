//! The game-state document on disk. The engine never sees the file itself.
use anyhow::{Context, Result};
use questchat_game::{Clock, GameState, ProgressionEngine};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Read and reconcile the document; a missing file yields the default.
pub async fn load_state<C>(path: &Path, engine: &ProgressionEngine<C>) -> Result<GameState>
where
    C: Clock,
{
    match fs::read_to_string(path).await {
        Ok(text) => Ok(engine.resolve_state_str(Some(&text))),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::debug!("no state at {}, starting fresh", path.display());
            Ok(engine.resolve_state(None))
        }
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read game state {}", path.display()))
        }
    }
}

pub async fn save_state(path: &Path, state: &GameState, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(state)
    } else {
        serde_json::to_string(state)
    }
    .context("Failed to serialize game state")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write game state {}", path.display()))?;
    Ok(())
}
