//! Read models rendered by front ends: stats, badges and quest boards.
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use crate::badges::{BADGES, Badge};
use crate::quests::{QuestInstance, generate_daily_quests, generate_weekly_quests};
use crate::state::{GameState, Player, Statistics, Stats};
use crate::titles::{next_title, title_by_name};

const MAX_TITLE_LABEL: &str = "Max";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleProgress {
    pub name: String,
    pub icon: &'static str,
    pub next_title: &'static str,
    pub xp_to_next_title: u64,
    pub min_xp_for_current: u64,
    pub max_xp_for_current: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeBoard {
    pub earned: Vec<&'static Badge>,
    pub locked: Vec<&'static Badge>,
    pub total_earned: usize,
    pub total_available: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub player: Player,
    pub stats: Stats,
    pub title: TitleProgress,
    pub streaks: StreakSummary,
    pub statistics: Statistics,
    pub badges: BadgeBoard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestBoard {
    pub quests: Vec<QuestInstance>,
    pub completed_count: usize,
    pub total_quests: usize,
    pub completion_bonus: u32,
}

impl QuestBoard {
    #[must_use]
    pub fn from_quests(quests: &[QuestInstance]) -> Self {
        Self {
            quests: quests.to_vec(),
            completed_count: quests.iter().filter(|q| q.completed).count(),
            total_quests: quests.len(),
            completion_bonus: 0,
        }
    }
}

#[must_use]
pub fn title_progress(player: &Player) -> TitleProgress {
    let current = title_by_name(&player.title);
    let next = next_title(player.total_xp_earned);
    TitleProgress {
        name: player.title.clone(),
        icon: current.icon,
        next_title: next.map_or(MAX_TITLE_LABEL, |t| t.name),
        xp_to_next_title: next.map_or(0, |t| t.min_xp.saturating_sub(player.total_xp_earned)),
        min_xp_for_current: current.min_xp,
        max_xp_for_current: current.max_xp,
    }
}

/// Earned and locked badges in catalog order. Unknown keys are ignored.
#[must_use]
pub fn badge_board(player: &Player) -> BadgeBoard {
    let (earned, locked): (Vec<&'static Badge>, Vec<&'static Badge>) =
        BADGES.iter().partition(|badge| player.has_badge(badge.key));
    BadgeBoard {
        total_earned: earned.len(),
        total_available: BADGES.len(),
        earned,
        locked,
    }
}

#[must_use]
pub fn stats_overview(state: &GameState) -> StatsOverview {
    let player = &state.player;
    StatsOverview {
        player: player.clone(),
        stats: player.stats.clone(),
        title: title_progress(player),
        streaks: StreakSummary {
            current: player.streak,
            longest: player.longest_streak,
        },
        statistics: player.statistics.clone(),
        badges: badge_board(player),
    }
}

/// Today's daily quests, generated first when stale.
pub fn daily_quest_board<R>(state: &mut GameState, today: NaiveDate, rng: &mut R) -> QuestBoard
where
    R: Rng + ?Sized,
{
    QuestBoard::from_quests(generate_daily_quests(state, today, rng))
}

/// This window's weekly quests, generated first when stale.
pub fn weekly_quest_board<R>(state: &mut GameState, today: NaiveDate, rng: &mut R) -> QuestBoard
where
    R: Rng + ?Sized,
{
    QuestBoard::from_quests(generate_weekly_quests(state, today, rng))
}
