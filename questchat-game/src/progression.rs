//! The progression engine: one valid chat message in, XP and rewards out.
//!
//! [`award_xp`] runs the steps in a fixed order:
//! validity gate, health decay, streak and multiplier, base XP, level-up,
//! statistics, title, quest progress, badge scan.
use rand::Rng;
use serde::Serialize;
use smallvec::SmallVec;

use crate::badges::{Badge, BadgeContext, check_badges};
use crate::clock::{
    Timestamp, day_of_month, days_since, elapsed_days, epoch_millis, format_day, is_same_day,
    local_day,
};
use crate::constants::{
    BASE_MULTIPLIER, HEALTH_DECAY_GRACE_DAYS, HEALTH_DECAY_PER_DAY, HIGH_QUALITY_XP,
    LONG_MESSAGE_XP, MIN_VALID_MESSAGE_CHARS, QUESTION_BONUS_XP, SHORT_MESSAGE_MAX_CHARS,
    SHORT_MESSAGE_XP, STAT_MIN, STREAK_MULTIPLIERS, TRIVIAL_MESSAGES, XP_PER_LEVEL,
};
use crate::numbers::{floor_f64_to_i32, floor_f64_to_u32, round_ratio_u64};
use crate::quests::{MessageSignals, QuestSignals, update_quest_progress};
use crate::state::{GameState, Player};
use crate::titles::{Title, title_for_xp};

/// Outcome of a title re-evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleChange {
    pub title_changed: bool,
    pub new_title: &'static Title,
}

/// Summary of one [`award_xp`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardResult {
    pub xp: u32,
    pub multiplier: f64,
    pub base_xp: u32,
    pub streak: u32,
    pub new_badges: SmallVec<[&'static Badge; 4]>,
    pub title_info: Option<TitleChange>,
    pub levels_gained: u32,
    pub completed_quests: SmallVec<[String; 3]>,
}

impl AwardResult {
    /// The zero-effect result returned for rejected messages.
    #[must_use]
    pub fn rejected(streak: u32) -> Self {
        Self {
            xp: 0,
            multiplier: BASE_MULTIPLIER,
            base_xp: 0,
            streak,
            new_badges: SmallVec::new(),
            title_info: None,
            levels_gained: 0,
            completed_quests: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn awarded(&self) -> bool {
        self.xp > 0
    }
}

/// A message earns XP when, trimmed and lower-cased, it has at least ten
/// characters and is not a bare greeting.
#[must_use]
pub fn is_valid_message(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    normalized.chars().count() >= MIN_VALID_MESSAGE_CHARS
        && !TRIVIAL_MESSAGES.contains(&normalized.as_str())
}

/// Decay health for inactivity longer than a day and touch the activity clock.
pub fn update_health(player: &mut Player, now: Timestamp) {
    let now_millis = epoch_millis(now);
    if let Some(last) = player.last_message_time {
        let days = elapsed_days(last, now_millis);
        if days > HEALTH_DECAY_GRACE_DAYS {
            let loss = floor_f64_to_i32(days * HEALTH_DECAY_PER_DAY);
            player.stats.health = player.stats.health.saturating_sub(loss).max(STAT_MIN);
            log::debug!("health decayed by {loss} after {days:.1} idle days");
        }
    }
    player.last_message_time = Some(now_millis);
}

/// Advance the streak for today's activity.
///
/// A message on the day after `lastMessageDay` extends the streak; a longer
/// gap (or an unreadable marker) restarts it at 1. The first active day of a
/// player who has never had a streak also counts as 1.
pub fn update_streak(player: &mut Player, now: Timestamp) {
    let today = local_day(now);
    if is_same_day(&player.last_message_day, today) {
        if player.streak == 0 {
            player.streak = 1;
        }
        return;
    }
    let previous = player.streak;
    player.streak = match days_since(&player.last_message_day, today) {
        Some(1) => previous.saturating_add(1),
        _ => 1,
    };
    player.current_day = day_of_month(now);
    player.last_message_day = format_day(today);
    log::debug!("streak {previous} -> {}", player.streak);
}

/// Multiplier for a streak length, highest tier first.
#[must_use]
pub fn streak_multiplier(streak: u32) -> f64 {
    STREAK_MULTIPLIERS
        .iter()
        .find(|(min_streak, _)| streak >= *min_streak)
        .map_or(BASE_MULTIPLIER, |(_, multiplier)| *multiplier)
}

/// Update the streak for `now` and return the resulting multiplier.
pub fn get_streak_multiplier(player: &mut Player, now: Timestamp) -> f64 {
    update_streak(player, now);
    streak_multiplier(player.streak)
}

/// 10 XP for short messages, 20 for longer ones, +5 for a question.
#[must_use]
pub fn base_xp(signals: &MessageSignals) -> u32 {
    let mut xp = if signals.chars > SHORT_MESSAGE_MAX_CHARS {
        LONG_MESSAGE_XP
    } else {
        SHORT_MESSAGE_XP
    };
    if signals.has_question {
        xp += QUESTION_BONUS_XP;
    }
    xp
}

/// Add XP and roll every full hundred into levels. Returns levels gained.
pub fn apply_xp(player: &mut Player, xp: u32) -> u32 {
    player.total_xp_earned = player.total_xp_earned.saturating_add(u64::from(xp));
    let pool = player.xp.saturating_add(xp);
    let levels = pool / XP_PER_LEVEL;
    player.xp = pool % XP_PER_LEVEL;
    if levels > 0 {
        player.level = player.level.saturating_add(levels);
        log::debug!("level up: +{levels} -> level {}", player.level);
    }
    levels
}

/// Fold one awarded message into the aggregate counters.
pub fn update_statistics(player: &mut Player, xp: u32) {
    let streak = player.streak;
    let stats = &mut player.statistics;
    stats.total_messages = stats.total_messages.saturating_add(1);
    stats.total_xp_earned = stats.total_xp_earned.saturating_add(u64::from(xp));
    stats.average_xp_per_message = round_ratio_u64(stats.total_xp_earned, stats.total_messages);
    stats.highest_single_message_xp = stats.highest_single_message_xp.max(xp);
    if xp >= HIGH_QUALITY_XP {
        stats.total_high_quality_messages = stats.total_high_quality_messages.saturating_add(1);
    }
    stats.total_days_active = stats.total_days_active.max(streak);
    player.longest_streak = player.longest_streak.max(streak);
}

/// Re-derive the cached title from lifetime XP.
pub fn update_title(player: &mut Player) -> TitleChange {
    let title = title_for_xp(player.total_xp_earned);
    let title_changed = player.title != title.name;
    if title_changed {
        log::debug!("title promoted: {} -> {}", player.title, title.name);
    }
    player.title = title.name.to_string();
    player.title_level = title.level;
    TitleChange {
        title_changed,
        new_title: title,
    }
}

/// Apply one chat message to the document.
///
/// Invalid messages return [`AwardResult::rejected`] and leave the document
/// untouched. Everything else mutates `state` in place.
pub fn award_xp<R>(
    state: &mut GameState,
    message: &str,
    now: Timestamp,
    rng: &mut R,
) -> AwardResult
where
    R: Rng + ?Sized,
{
    if !is_valid_message(message) {
        return AwardResult::rejected(state.player.streak);
    }

    let player = &mut state.player;
    update_health(player, now);
    player.stats.clamp();
    let multiplier = get_streak_multiplier(player, now);

    let signals = MessageSignals::from_message(message);
    let base_xp = base_xp(&signals);
    let xp = floor_f64_to_u32(f64::from(base_xp) * multiplier);
    let levels_gained = apply_xp(player, xp);
    update_statistics(player, xp);
    let title_info = update_title(player);

    let quest_signals = QuestSignals {
        message: signals,
        xp,
        focus: state.player.stats.focus,
    };
    let quests = update_quest_progress(state, local_day(now), &quest_signals, rng);

    let new_badges = check_badges(&mut state.player, &BadgeContext { now });

    let mut completed_quests = quests.daily_completed;
    completed_quests.extend(quests.weekly_completed);

    AwardResult {
        xp,
        multiplier,
        base_xp,
        streak: state.player.streak,
        new_badges,
        title_info: Some(title_info),
        levels_gained,
        completed_quests,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeDelta, TimeZone};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn at(d: u32, hour: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .and_utc()
            .fixed_offset()
    }

    #[test]
    fn validity_gate_rejects_short_and_trivial() {
        assert!(!is_valid_message("hi"));
        assert!(!is_valid_message("   ok    "));
        assert!(!is_valid_message("123456789"));
        assert!(!is_valid_message("          hello          "));
        assert!(is_valid_message("1234567890"));
        assert!(is_valid_message("Tell me about Rust"));
    }

    #[test]
    fn multiplier_tiers() {
        assert!((streak_multiplier(0) - 1.0).abs() < f64::EPSILON);
        assert!((streak_multiplier(2) - 1.0).abs() < f64::EPSILON);
        assert!((streak_multiplier(3) - 1.5).abs() < f64::EPSILON);
        assert!((streak_multiplier(6) - 1.5).abs() < f64::EPSILON);
        assert!((streak_multiplier(7) - 2.0).abs() < f64::EPSILON);
        assert!((streak_multiplier(13) - 2.0).abs() < f64::EPSILON);
        assert!((streak_multiplier(14) - 3.0).abs() < f64::EPSILON);
        assert!((streak_multiplier(29) - 3.0).abs() < f64::EPSILON);
        assert!((streak_multiplier(30) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn base_xp_by_length_and_question() {
        let short = MessageSignals::from_message("short message");
        assert_eq!(base_xp(&short), 10);
        let short_q = MessageSignals::from_message("is it short?");
        assert_eq!(base_xp(&short_q), 15);
        let long = MessageSignals::from_message(&"x".repeat(51));
        assert_eq!(base_xp(&long), 20);
        let fifty = MessageSignals::from_message(&"x".repeat(50));
        assert_eq!(base_xp(&fifty), 10);
    }

    #[test]
    fn level_up_keeps_remainder() {
        let mut player = Player {
            xp: 95,
            level: 3,
            ..Player::default()
        };
        assert_eq!(apply_xp(&mut player, 20), 1);
        assert_eq!((player.level, player.xp), (4, 15));

        assert_eq!(apply_xp(&mut player, 250), 2);
        assert_eq!((player.level, player.xp), (6, 65));
        assert_eq!(player.total_xp_earned, 270);
    }

    #[test]
    fn streak_transitions() {
        let mut player = Player::fresh(at(10, 9));
        update_streak(&mut player, at(10, 18));
        assert_eq!(player.streak, 1, "first active day starts the streak");
        update_streak(&mut player, at(10, 20));
        assert_eq!(player.streak, 1, "same day is unchanged");

        update_streak(&mut player, at(11, 8));
        assert_eq!(player.streak, 2);
        assert_eq!(player.last_message_day, "Sun Oct 11 2026");
        assert_eq!(player.current_day, 11);

        update_streak(&mut player, at(13, 8));
        assert_eq!(player.streak, 1, "a skipped day resets");

        player.last_message_day = "whenever".to_string();
        player.streak = 9;
        update_streak(&mut player, at(14, 8));
        assert_eq!(player.streak, 1);
    }

    #[test]
    fn health_decays_after_a_day_and_floors_at_zero() {
        let mut player = Player::fresh(at(1, 12));
        update_health(&mut player, at(2, 6));
        assert_eq!(player.stats.health, 100, "under a day is free");

        update_health(&mut player, at(4, 18));
        // 2.5 days idle
        assert_eq!(player.stats.health, 75);
        assert_eq!(player.last_message_time, Some(epoch_millis(at(4, 18))));

        update_health(&mut player, at(30, 18));
        assert_eq!(player.stats.health, 0);
    }

    #[test]
    fn health_decay_measures_real_time_behind_utc() {
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        let start = pacific.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
        let mut player = Player::fresh(start);
        assert_eq!(player.last_message_time, Some(start.timestamp_millis()));

        // 1.25 days later by the wall clock and by the epoch
        let later = start + TimeDelta::minutes(1800);
        assert_eq!(later.naive_local().to_string(), "2026-10-21 02:00:00");
        update_health(&mut player, later);
        assert_eq!(player.stats.health, 88);
        assert_eq!(player.last_message_time, Some(later.timestamp_millis()));
    }

    #[test]
    fn streak_follows_the_local_calendar_day() {
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        // 23:30 local is already the next day in UTC
        let late = pacific.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        let mut player = Player::fresh(late);
        assert_eq!(player.last_message_day, "Mon Oct 19 2026");
        update_streak(&mut player, late);
        assert_eq!(player.streak, 1);
        update_streak(&mut player, late + TimeDelta::minutes(40));
        assert_eq!(player.streak, 2);
        assert_eq!(player.last_message_day, "Tue Oct 20 2026");
    }

    #[test]
    fn statistics_track_streak_and_quality() {
        let mut player = Player {
            streak: 4,
            ..Player::default()
        };
        update_statistics(&mut player, 10);
        update_statistics(&mut player, 25);
        let s = &player.statistics;
        assert_eq!(s.total_messages, 2);
        assert_eq!(s.total_xp_earned, 35);
        assert_eq!(s.average_xp_per_message, 18);
        assert_eq!(s.highest_single_message_xp, 25);
        assert_eq!(s.total_high_quality_messages, 1);
        assert_eq!(s.total_days_active, 4);
        assert_eq!(player.longest_streak, 4);
    }

    #[test]
    fn title_change_is_reported() {
        let mut player = Player::default();
        player.total_xp_earned = 50;
        assert!(!update_title(&mut player).title_changed);
        player.total_xp_earned = 120;
        let change = update_title(&mut player);
        assert!(change.title_changed);
        assert_eq!(change.new_title.name, "Thoughtful Learner");
        assert_eq!(player.title_level, 2);
    }

    #[test]
    fn rejected_messages_do_not_touch_the_document() {
        let mut state = GameState::new(at(19, 9));
        let before = state.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for message in ["hi", "hello", "ok", "too short", "   HELLO   "] {
            let result = award_xp(&mut state, message, at(25, 9), &mut rng);
            assert_eq!(result, AwardResult::rejected(0));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn streak_multiplier_scales_awarded_xp() {
        let mut state = GameState::new(at(19, 9));
        state.player.streak = 6;
        state.player.last_message_day = "Sun Oct 18 2026".to_string();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let result = award_xp(&mut state, "A quick check-in message?", at(19, 10), &mut rng);
        assert_eq!(result.streak, 7);
        assert!((result.multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(result.base_xp, 15);
        assert_eq!(result.xp, 30);
        assert!(result.new_badges.iter().any(|b| b.key == "flame-on"));
    }
}
