//! Daily and weekly quests: templates, live instances, generation and progress.
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::clock::{days_since, format_day, is_same_day};
use crate::constants::{
    FOCUS_QUEST_THRESHOLD, HIGH_XP_QUEST_THRESHOLD, LONG_MESSAGE_MIN_CHARS,
    LONG_QUESTION_MIN_WORDS, PHILOSOPHICAL_MIN_CHARS, QUESTS_PER_SET, WEEKLY_WINDOW_DAYS,
};
use crate::state::GameState;

/// Quest objective tag, stored as the kebab-case `type` of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuestKind {
    Messages,
    LongQuestion,
    FocusMaintenance,
    HighXpMessage,
    Volume,
    Philosophical,
    Streak,
    LongMessage,
    FocusWeek,
    XpGain,
    DailyQuestsWeek,
    Questions,
    /// A tag this build does not know; such quests never progress.
    #[default]
    #[serde(other)]
    Unknown,
}

impl QuestKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::LongQuestion => "long-question",
            Self::FocusMaintenance => "focus-maintenance",
            Self::HighXpMessage => "high-xp-message",
            Self::Volume => "volume",
            Self::Philosophical => "philosophical",
            Self::Streak => "streak",
            Self::LongMessage => "long-message",
            Self::FocusWeek => "focus-week",
            Self::XpGain => "xp-gain",
            Self::DailyQuestsWeek => "daily-quests-week",
            Self::Questions => "questions",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    Daily,
    Weekly,
}

/// Immutable quest definition from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestTemplate {
    pub title: &'static str,
    pub target: u32,
    pub kind: QuestKind,
    pub xp: u32,
}

pub static DAILY_QUEST_TEMPLATES: [QuestTemplate; 8] = [
    QuestTemplate {
        title: "Send 3 meaningful messages",
        target: 3,
        kind: QuestKind::Messages,
        xp: 50,
    },
    QuestTemplate {
        title: "Ask a question with 10+ words",
        target: 1,
        kind: QuestKind::LongQuestion,
        xp: 40,
    },
    QuestTemplate {
        title: "Maintain 70+ Focus during session",
        target: 1,
        kind: QuestKind::FocusMaintenance,
        xp: 45,
    },
    QuestTemplate {
        title: "Earn 50+ XP in one message",
        target: 1,
        kind: QuestKind::HighXpMessage,
        xp: 60,
    },
    QuestTemplate {
        title: "Send 5 messages in one day",
        target: 5,
        kind: QuestKind::Volume,
        xp: 75,
    },
    QuestTemplate {
        title: "Ask a philosophical question",
        target: 1,
        kind: QuestKind::Philosophical,
        xp: 35,
    },
    QuestTemplate {
        title: "Build a 3-message conversation",
        target: 3,
        kind: QuestKind::Streak,
        xp: 55,
    },
    QuestTemplate {
        title: "Reach 500+ character question",
        target: 1,
        kind: QuestKind::LongMessage,
        xp: 50,
    },
];

pub static WEEKLY_QUEST_TEMPLATES: [QuestTemplate; 5] = [
    QuestTemplate {
        title: "Send 50 messages this week",
        target: 50,
        kind: QuestKind::Volume,
        xp: 300,
    },
    QuestTemplate {
        title: "Maintain 80+ Focus for 3 days",
        target: 3,
        kind: QuestKind::FocusWeek,
        xp: 250,
    },
    QuestTemplate {
        title: "Earn 500 XP this week",
        target: 500,
        kind: QuestKind::XpGain,
        xp: 400,
    },
    QuestTemplate {
        title: "Complete 10 Daily Quests",
        target: 10,
        kind: QuestKind::DailyQuestsWeek,
        xp: 350,
    },
    QuestTemplate {
        title: "Ask 20 questions",
        target: 20,
        kind: QuestKind::Questions,
        xp: 200,
    },
];

/// A live quest in the document: template fields plus progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestInstance {
    pub title: String,
    pub target: u32,
    #[serde(rename = "type")]
    pub kind: QuestKind,
    pub xp: u32,
    pub id: usize,
    pub progress: u32,
    pub completed: bool,
}

impl QuestInstance {
    #[must_use]
    pub fn from_template(template: &QuestTemplate, id: usize) -> Self {
        Self {
            title: template.title.to_string(),
            target: template.target,
            kind: template.kind,
            xp: template.xp,
            id,
            progress: 0,
            completed: false,
        }
    }

    /// Add progress, saturating at the target. Returns true on the
    /// incomplete → complete transition.
    pub fn advance(&mut self, amount: u32) -> bool {
        if self.completed || amount == 0 {
            return false;
        }
        self.progress = self.progress.saturating_add(amount).min(self.target);
        if self.progress >= self.target {
            self.completed = true;
            return true;
        }
        false
    }
}

/// Message features the progress rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSignals {
    pub chars: usize,
    pub words: usize,
    pub has_question: bool,
}

impl MessageSignals {
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        Self {
            chars: message.chars().count(),
            words: message.split_whitespace().count(),
            has_question: message.contains('?'),
        }
    }
}

/// Everything a progress rule may depend on for one awarded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestSignals {
    pub message: MessageSignals,
    pub xp: u32,
    pub focus: i32,
}

/// Quests finished during one progress pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestProgressOutcome {
    pub daily_completed: SmallVec<[String; 3]>,
    pub weekly_completed: SmallVec<[String; 3]>,
    pub all_daily_completed: bool,
}

fn daily_increment(kind: QuestKind, signals: &QuestSignals) -> u32 {
    let msg = &signals.message;
    let hit = match kind {
        QuestKind::Messages => signals.xp > 0,
        QuestKind::LongQuestion => msg.has_question && msg.words >= LONG_QUESTION_MIN_WORDS,
        QuestKind::FocusMaintenance => signals.focus >= FOCUS_QUEST_THRESHOLD,
        QuestKind::HighXpMessage => signals.xp >= HIGH_XP_QUEST_THRESHOLD,
        QuestKind::Volume | QuestKind::Streak => true,
        QuestKind::Philosophical => msg.has_question && msg.chars > PHILOSOPHICAL_MIN_CHARS,
        QuestKind::LongMessage => msg.chars >= LONG_MESSAGE_MIN_CHARS,
        _ => false,
    };
    u32::from(hit)
}

fn weekly_increment(kind: QuestKind, signals: &QuestSignals, daily_completions: u32) -> u32 {
    match kind {
        QuestKind::Volume => u32::from(signals.xp > 0),
        QuestKind::Questions => u32::from(signals.message.has_question),
        QuestKind::XpGain => signals.xp,
        QuestKind::DailyQuestsWeek => daily_completions,
        // focus-week would need a per-day focus history
        _ => 0,
    }
}

fn draw_quests<R>(templates: &[QuestTemplate], rng: &mut R) -> Vec<QuestInstance>
where
    R: Rng + ?Sized,
{
    let mut pool = templates.to_vec();
    pool.shuffle(rng);
    pool.iter()
        .take(QUESTS_PER_SET)
        .enumerate()
        .map(|(id, template)| QuestInstance::from_template(template, id))
        .collect()
}

/// Ensure today's daily set exists, replacing it when the marker is stale.
pub fn generate_daily_quests<'a, R>(
    state: &'a mut GameState,
    today: NaiveDate,
    rng: &mut R,
) -> &'a [QuestInstance]
where
    R: Rng + ?Sized,
{
    let fresh = is_same_day(&state.last_quest_generation_day, today);
    if !fresh || state.daily_quests.is_empty() {
        state.daily_quests = draw_quests(&DAILY_QUEST_TEMPLATES, rng);
        state.last_quest_generation_day = format_day(today);
        log::debug!(
            "generated daily quests for {}: {:?}",
            state.last_quest_generation_day,
            state.daily_quests.iter().map(|q| q.kind).collect::<Vec<_>>()
        );
    }
    &state.daily_quests
}

/// Ensure a weekly set exists for the rolling 7-day window.
pub fn generate_weekly_quests<'a, R>(
    state: &'a mut GameState,
    today: NaiveDate,
    rng: &mut R,
) -> &'a [QuestInstance]
where
    R: Rng + ?Sized,
{
    let stale = days_since(&state.last_weekly_quest_gen_date, today)
        .is_none_or(|days| days.abs() >= WEEKLY_WINDOW_DAYS);
    if stale || state.weekly_quests.is_empty() {
        state.weekly_quests = draw_quests(&WEEKLY_QUEST_TEMPLATES, rng);
        state.last_weekly_quest_gen_date = format_day(today);
        log::debug!(
            "generated weekly quests for window starting {}",
            state.last_weekly_quest_gen_date
        );
    }
    &state.weekly_quests
}

/// Apply one awarded message to the current daily and weekly sets.
///
/// Both sets are (re)generated first when stale. `questsCompleted` counts
/// daily completions; `dailyQuestsCompletedTotal` is bumped once, on the
/// call that completes the last open daily quest.
pub fn update_quest_progress<R>(
    state: &mut GameState,
    today: NaiveDate,
    signals: &QuestSignals,
    rng: &mut R,
) -> QuestProgressOutcome
where
    R: Rng + ?Sized,
{
    generate_daily_quests(state, today, rng);
    generate_weekly_quests(state, today, rng);

    let mut outcome = QuestProgressOutcome::default();
    let had_open_daily = state.daily_quests.iter().any(|q| !q.completed);

    for quest in state.daily_quests.iter_mut().filter(|q| !q.completed) {
        if quest.advance(daily_increment(quest.kind, signals)) {
            log::debug!("daily quest completed: {}", quest.title);
            outcome.daily_completed.push(quest.title.clone());
        }
    }

    let stats = &mut state.player.statistics;
    let daily_completions = u32::try_from(outcome.daily_completed.len()).unwrap_or(u32::MAX);
    stats.quests_completed = stats.quests_completed.saturating_add(daily_completions);
    if had_open_daily && state.daily_quests.iter().all(|q| q.completed) {
        stats.daily_quests_completed_total = stats.daily_quests_completed_total.saturating_add(1);
        outcome.all_daily_completed = true;
    }

    for quest in state.weekly_quests.iter_mut().filter(|q| !q.completed) {
        if quest.advance(weekly_increment(quest.kind, signals, daily_completions)) {
            log::debug!("weekly quest completed: {}", quest.title);
            outcome.weekly_completed.push(quest.title.clone());
        }
    }

    outcome
}

#[must_use]
pub fn templates(cadence: Cadence) -> &'static [QuestTemplate] {
    match cadence {
        Cadence::Daily => &DAILY_QUEST_TEMPLATES,
        Cadence::Weekly => &WEEKLY_QUEST_TEMPLATES,
    }
}
