use questchat_game::{AwardResult, Clock, GameState, ProgressionEngine};
use std::time::Duration;
use tokio::time::timeout;

use crate::generator::{GenerationError, TextGenerator};

/// One chat message worth of results.
#[derive(Debug)]
pub struct ChatTurn {
    pub award: AwardResult,
    /// `None` when no generator was consulted (offline).
    pub reply: Option<Result<String, GenerationError>>,
}

/// Apply progression for `message`, then ask `generator` for a reply.
///
/// The document is updated before generation starts, so a failed or slow
/// reply never loses the award.
pub async fn run_chat_turn<C>(
    engine: &mut ProgressionEngine<C>,
    state: &mut GameState,
    message: &str,
    generator: Option<&dyn TextGenerator>,
    limit: Duration,
) -> ChatTurn
where
    C: Clock,
{
    let award = engine.award_xp(state, message);

    let reply = match generator {
        Some(generator) => Some(
            timeout(limit, generator.generate(message))
                .await
                .unwrap_or(Err(GenerationError::Timeout {
                    secs: limit.as_secs(),
                })),
        ),
        None => None,
    };
    if let Some(Err(err)) = &reply {
        log::warn!("reply generation failed: {err}");
    }

    ChatTurn { award, reply }
}
