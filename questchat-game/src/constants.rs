//! Numbers behind XP awards, streak tiers, stat bounds and document defaults.
//!
//! Rules read these instead of inline literals. The game-state document
//! stores only progress, so none of these can be changed by editing it.

// Message validity ---------------------------------------------------------
pub(crate) const MIN_VALID_MESSAGE_CHARS: usize = 10;
pub(crate) const TRIVIAL_MESSAGES: [&str; 3] = ["hi", "hello", "ok"];

// XP tuning ----------------------------------------------------------------
pub(crate) const SHORT_MESSAGE_MAX_CHARS: usize = 50;
pub(crate) const SHORT_MESSAGE_XP: u32 = 10;
pub(crate) const LONG_MESSAGE_XP: u32 = 20;
pub(crate) const QUESTION_BONUS_XP: u32 = 5;
pub(crate) const XP_PER_LEVEL: u32 = 100;
pub(crate) const HIGH_QUALITY_XP: u32 = 20;

/// Streak tiers as `(minimum streak, multiplier)`, highest first.
pub(crate) const STREAK_MULTIPLIERS: [(u32, f64); 4] = [(30, 5.0), (14, 3.0), (7, 2.0), (3, 1.5)];
pub(crate) const BASE_MULTIPLIER: f64 = 1.0;

// Health decay -------------------------------------------------------------
pub(crate) const HEALTH_DECAY_GRACE_DAYS: f64 = 1.0;
pub(crate) const HEALTH_DECAY_PER_DAY: f64 = 10.0;
pub(crate) const STAT_MIN: i32 = 0;
pub(crate) const STAT_MAX: i32 = 100;

// Quest tuning -------------------------------------------------------------
pub(crate) const QUESTS_PER_SET: usize = 3;
pub(crate) const WEEKLY_WINDOW_DAYS: i64 = 7;
pub(crate) const LONG_QUESTION_MIN_WORDS: usize = 10;
pub(crate) const FOCUS_QUEST_THRESHOLD: i32 = 70;
pub(crate) const HIGH_XP_QUEST_THRESHOLD: u32 = 50;
pub(crate) const PHILOSOPHICAL_MIN_CHARS: usize = 100;
pub(crate) const LONG_MESSAGE_MIN_CHARS: usize = 500;

// Quiz tuning --------------------------------------------------------------
pub(crate) const QUIZ_NEUTRAL_ANSWER: u8 = 3;
pub(crate) const QUIZ_MIN_ANSWER: u8 = 1;
pub(crate) const QUIZ_MAX_ANSWER: u8 = 5;
pub(crate) const QUIZ_TRAIT_START: i32 = 50;
pub(crate) const QUIZ_TRAIT_PIVOT: i32 = 50;

// Document defaults --------------------------------------------------------
pub(crate) const DEFAULT_PLAYER_NAME: &str = "Adventurer";
pub(crate) const UNKNOWN_PERSONALITY: &str = "Unknown";
pub(crate) const DEFAULT_QUESTION_TYPE: &str = "Analytical";
