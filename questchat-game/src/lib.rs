//! QuestChat progression engine
//!
//! Platform-agnostic gamification core for a chat assistant: XP, levels,
//! streaks, health decay, titles, badges, daily/weekly quests and a
//! personality quiz, all applied to a caller-owned JSON document.
//! Nothing here performs I/O; "now" and the random source are parameters.

pub mod badges;
pub mod clock;
pub mod constants;
pub mod numbers;
pub mod overview;
pub mod progression;
pub mod quests;
pub mod quiz;
pub mod state;
pub mod titles;

// Re-export commonly used types
pub use badges::{BADGES, Badge, BadgeContext, badge_by_key, check_badges};
pub use clock::{Clock, FixedClock, SystemClock, Timestamp, format_day, local_day, parse_day};
pub use overview::{
    BadgeBoard, QuestBoard, StatsOverview, StreakSummary, TitleProgress, badge_board,
    daily_quest_board, stats_overview, title_progress, weekly_quest_board,
};
pub use progression::{AwardResult, TitleChange, award_xp, is_valid_message, streak_multiplier};
pub use quests::{
    Cadence, DAILY_QUEST_TEMPLATES, QuestInstance, QuestKind, QuestTemplate,
    WEEKLY_QUEST_TEMPLATES, generate_daily_quests, generate_weekly_quests,
};
pub use quiz::{
    QUIZ_QUESTIONS, QuizError, QuizOutcome, QuizQuestion, Trait, TraitScores, merge_profile,
    personality_code, score_quiz,
};
pub use state::{GameState, Player, Statistics, Stats, resolve_state, resolve_state_str};
pub use titles::{TITLES, Title, next_title, title_for_xp};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde_json::Value;

/// Binds a clock and a quest-shuffling RNG so callers only pass documents.
pub struct ProgressionEngine<C>
where
    C: Clock,
{
    clock: C,
    rng: ChaCha20Rng,
}

impl ProgressionEngine<SystemClock> {
    /// Wall-clock engine with an entropy-seeded RNG.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

impl<C> ProgressionEngine<C>
where
    C: Clock,
{
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Reproducible quest draws for a given seed.
    #[must_use]
    pub fn with_seed(clock: C, seed: u64) -> Self {
        Self {
            clock,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Reconcile a caller document with the default as of the engine's clock.
    #[must_use]
    pub fn resolve_state(&self, candidate: Option<Value>) -> GameState {
        resolve_state(candidate, self.clock.now())
    }

    #[must_use]
    pub fn resolve_state_str(&self, raw: Option<&str>) -> GameState {
        resolve_state_str(raw, self.clock.now())
    }

    /// The canonical default document, used for resets.
    #[must_use]
    pub fn fresh_state(&self) -> GameState {
        GameState::new(self.clock.now())
    }

    pub fn award_xp(&mut self, state: &mut GameState, message: &str) -> AwardResult {
        let now = self.clock.now();
        award_xp(state, message, now, &mut self.rng)
    }

    pub fn daily_quests(&mut self, state: &mut GameState) -> QuestBoard {
        let today = local_day(self.clock.now());
        daily_quest_board(state, today, &mut self.rng)
    }

    pub fn weekly_quests(&mut self, state: &mut GameState) -> QuestBoard {
        let today = local_day(self.clock.now());
        weekly_quest_board(state, today, &mut self.rng)
    }

    /// Score the quiz and merge the profile into `state` when none is on file.
    /// Returns the outcome and whether it was merged.
    ///
    /// # Errors
    ///
    /// Returns an error if the answers are not ten values in `1..=5`.
    pub fn take_quiz(
        &self,
        state: &mut GameState,
        answers: &[u8],
    ) -> Result<(QuizOutcome, bool), QuizError> {
        let outcome = score_quiz(answers)?;
        let merged = merge_profile(state, &outcome.trait_scores, &outcome.code);
        Ok((outcome, merged))
    }

    #[must_use]
    pub fn stats_overview(&self, state: &GameState) -> StatsOverview {
        stats_overview(state)
    }

    #[must_use]
    pub fn badge_board(&self, state: &GameState) -> BadgeBoard {
        badge_board(&state.player)
    }
}
