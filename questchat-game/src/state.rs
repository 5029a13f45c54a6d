use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::{Timestamp, day_of_month, epoch_millis, format_day, local_day};
use crate::constants::{
    DEFAULT_PLAYER_NAME, DEFAULT_QUESTION_TYPE, STAT_MAX, STAT_MIN, UNKNOWN_PERSONALITY,
};
use crate::quests::QuestInstance;
use crate::titles::TITLES;

/// Player attributes. Quiz traits appear once a profile has been merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub health: i32,
    pub energy: i32,
    pub focus: i32,
    pub discipline: i32,
    pub productivity: i32,
    pub consistency: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creativity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kindness: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awareness: Option<i32>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 100,
            energy: 100,
            focus: 50,
            discipline: 50,
            productivity: 50,
            consistency: 50,
            creativity: None,
            kindness: None,
            awareness: None,
        }
    }
}

impl Stats {
    pub fn clamp(&mut self) {
        self.health = self.health.clamp(STAT_MIN, STAT_MAX);
        self.energy = self.energy.clamp(STAT_MIN, STAT_MAX);
        self.focus = self.focus.clamp(STAT_MIN, STAT_MAX);
        self.discipline = self.discipline.clamp(STAT_MIN, STAT_MAX);
        self.productivity = self.productivity.clamp(STAT_MIN, STAT_MAX);
        self.consistency = self.consistency.clamp(STAT_MIN, STAT_MAX);
        for trait_score in [&mut self.creativity, &mut self.kindness, &mut self.awareness] {
            if let Some(value) = trait_score.as_mut() {
                *value = (*value).clamp(STAT_MIN, STAT_MAX);
            }
        }
    }
}

impl Stats {
    fn salvage(doc: &Map<String, Value>) -> Self {
        let mut stats = Self::default();
        take(doc, "health", &mut stats.health);
        take(doc, "energy", &mut stats.energy);
        take(doc, "focus", &mut stats.focus);
        take(doc, "discipline", &mut stats.discipline);
        take(doc, "productivity", &mut stats.productivity);
        take(doc, "consistency", &mut stats.consistency);
        take(doc, "creativity", &mut stats.creativity);
        take(doc, "kindness", &mut stats.kindness);
        take(doc, "awareness", &mut stats.awareness);
        stats
    }
}

/// Aggregate counters kept alongside the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub total_messages: u64,
    /// Mirrors `Player::total_xp_earned`.
    pub total_xp_earned: u64,
    pub average_xp_per_message: u64,
    pub highest_single_message_xp: u32,
    pub total_high_quality_messages: u64,
    /// Highest streak seen so far, not a count of distinct days.
    pub total_days_active: u32,
    pub favorite_question_type: String,
    pub quests_completed: u32,
    pub daily_quests_completed_total: u32,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            total_messages: 0,
            total_xp_earned: 0,
            average_xp_per_message: 0,
            highest_single_message_xp: 0,
            total_high_quality_messages: 0,
            total_days_active: 1,
            favorite_question_type: DEFAULT_QUESTION_TYPE.to_string(),
            quests_completed: 0,
            daily_quests_completed_total: 0,
        }
    }
}

impl Statistics {
    fn salvage(doc: &Map<String, Value>) -> Self {
        let mut statistics = Self::default();
        take(doc, "totalMessages", &mut statistics.total_messages);
        take(doc, "totalXpEarned", &mut statistics.total_xp_earned);
        take(doc, "averageXpPerMessage", &mut statistics.average_xp_per_message);
        take(doc, "highestSingleMessageXp", &mut statistics.highest_single_message_xp);
        take(doc, "totalHighQualityMessages", &mut statistics.total_high_quality_messages);
        take(doc, "totalDaysActive", &mut statistics.total_days_active);
        take(doc, "favoriteQuestionType", &mut statistics.favorite_question_type);
        take(doc, "questsCompleted", &mut statistics.quests_completed);
        take(doc, "dailyQuestsCompletedTotal", &mut statistics.daily_quests_completed_total);
        statistics
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub level: u32,
    /// Progress inside the current level, always below 100.
    pub xp: u32,
    pub total_xp_earned: u64,
    pub title: String,
    pub title_level: u8,
    pub stats: Stats,
    pub streak: u32,
    pub longest_streak: u32,
    pub current_day: u32,
    /// Calendar-day marker anchoring streak continuity.
    pub last_message_day: String,
    /// Epoch milliseconds of the last valid message; drives health decay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<i64>,
    pub badges: Vec<String>,
    pub statistics: Statistics,
    pub personality_type: String,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYER_NAME.to_string(),
            level: 1,
            xp: 0,
            total_xp_earned: 0,
            title: TITLES[0].name.to_string(),
            title_level: TITLES[0].level,
            stats: Stats::default(),
            streak: 0,
            longest_streak: 0,
            current_day: 0,
            last_message_day: String::new(),
            last_message_time: None,
            badges: Vec::new(),
            statistics: Statistics::default(),
            personality_type: UNKNOWN_PERSONALITY.to_string(),
        }
    }
}

impl Player {
    /// A brand-new player whose clocks start at `now`.
    #[must_use]
    pub fn fresh(now: Timestamp) -> Self {
        Self {
            current_day: day_of_month(now),
            last_message_day: format_day(local_day(now)),
            last_message_time: Some(epoch_millis(now)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_badge(&self, key: &str) -> bool {
        self.badges.iter().any(|b| b == key)
    }

    /// Record a badge key; returns false when it was already earned.
    pub fn grant_badge(&mut self, key: &str) -> bool {
        if self.has_badge(key) {
            return false;
        }
        self.badges.push(key.to_string());
        true
    }

    #[must_use]
    pub fn personality_known(&self) -> bool {
        let kind = self.personality_type.trim();
        !kind.is_empty() && kind != UNKNOWN_PERSONALITY
    }

    fn salvage(doc: &Map<String, Value>) -> Self {
        let mut player = Self::default();
        take(doc, "name", &mut player.name);
        take(doc, "level", &mut player.level);
        take(doc, "xp", &mut player.xp);
        take(doc, "totalXpEarned", &mut player.total_xp_earned);
        take(doc, "title", &mut player.title);
        take(doc, "titleLevel", &mut player.title_level);
        take_object(doc, "stats", &mut player.stats, Stats::salvage);
        take(doc, "streak", &mut player.streak);
        take(doc, "longestStreak", &mut player.longest_streak);
        take(doc, "currentDay", &mut player.current_day);
        take(doc, "lastMessageDay", &mut player.last_message_day);
        take(doc, "lastMessageTime", &mut player.last_message_time);
        take_each(doc, "badges", &mut player.badges);
        take_object(doc, "statistics", &mut player.statistics, Statistics::salvage);
        take(doc, "personalityType", &mut player.personality_type);
        player
    }
}

/// The complete caller-owned document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub player: Player,
    pub daily_quests: Vec<QuestInstance>,
    pub weekly_quests: Vec<QuestInstance>,
    pub last_quest_generation_day: String,
    pub last_weekly_quest_gen_date: String,
    pub message_count: u64,
}

impl GameState {
    /// The canonical default document as of `now`.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        let today = format_day(local_day(now));
        Self {
            player: Player::fresh(now),
            daily_quests: Vec::new(),
            weekly_quests: Vec::new(),
            last_quest_generation_day: today.clone(),
            last_weekly_quest_gen_date: today,
            message_count: 0,
        }
    }

    /// Load a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a game state.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn salvage(doc: &Map<String, Value>, player: &Map<String, Value>) -> Self {
        let mut state = Self {
            player: Player::salvage(player),
            ..Self::default()
        };
        take_each(doc, "dailyQuests", &mut state.daily_quests);
        take_each(doc, "weeklyQuests", &mut state.weekly_quests);
        take(doc, "lastQuestGenerationDay", &mut state.last_quest_generation_day);
        take(doc, "lastWeeklyQuestGenDate", &mut state.last_weekly_quest_gen_date);
        take(doc, "messageCount", &mut state.message_count);
        state
    }
}

/// Overwrite `slot` with `doc[key]` when that value has the expected shape.
fn take<T>(doc: &Map<String, Value>, key: &str, slot: &mut T)
where
    T: DeserializeOwned,
{
    let Some(value) = doc.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(err) => log::warn!("keeping default `{key}`, stored value is malformed: {err}"),
    }
}

/// Like [`take`] for a nested object, salvaged one field at a time.
fn take_object<T>(
    doc: &Map<String, Value>,
    key: &str,
    slot: &mut T,
    salvage: fn(&Map<String, Value>) -> T,
) {
    match doc.get(key) {
        None => {}
        Some(Value::Object(inner)) => *slot = salvage(inner),
        Some(other) => log::warn!("keeping default `{key}`, expected an object: {other}"),
    }
}

/// Like [`take`] for an array; malformed elements are dropped on their own.
fn take_each<T>(doc: &Map<String, Value>, key: &str, slot: &mut Vec<T>)
where
    T: DeserializeOwned,
{
    match doc.get(key) {
        None => {}
        Some(Value::Array(items)) => {
            *slot = items
                .iter()
                .filter_map(|item| match T::deserialize(item) {
                    Ok(parsed) => Some(parsed),
                    Err(err) => {
                        log::warn!("dropping malformed entry in `{key}`: {err}");
                        None
                    }
                })
                .collect();
        }
        Some(other) => log::warn!("keeping default `{key}`, expected an array: {other}"),
    }
}

/// Reconcile a caller-supplied document with the canonical default.
///
/// Absent documents, non-objects and documents without a `player` object are
/// replaced by [`GameState::new`]. Anything else is completed field by field:
/// a missing or malformed field takes its default and every other field is
/// kept. Never fails.
#[must_use]
pub fn resolve_state(candidate: Option<Value>, now: Timestamp) -> GameState {
    let Some(Value::Object(doc)) = candidate else {
        log::debug!("no candidate document, using default state");
        return GameState::new(now);
    };
    let Some(Value::Object(player)) = doc.get("player") else {
        log::debug!("no player in candidate document, using default state");
        return GameState::new(now);
    };
    GameState::salvage(&doc, player)
}

/// [`resolve_state`] over raw JSON text; unparsable text counts as absent.
#[must_use]
pub fn resolve_state_str(raw: Option<&str>, now: Timestamp) -> GameState {
    let candidate = raw.and_then(|text| match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("game state is not valid JSON: {err}");
            None
        }
    });
    resolve_state(candidate, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc()
            .fixed_offset()
    }

    #[test]
    fn default_document_matches_canonical_values() {
        let state = GameState::new(now());
        let p = &state.player;
        assert_eq!(p.name, "Adventurer");
        assert_eq!((p.level, p.xp, p.total_xp_earned), (1, 0, 0));
        assert_eq!(p.title, "Curious Beginner");
        assert_eq!(p.stats.health, 100);
        assert_eq!(p.stats.focus, 50);
        assert_eq!(p.current_day, 19);
        assert_eq!(p.last_message_day, "Mon Oct 19 2026");
        assert_eq!(p.statistics.total_days_active, 1);
        assert_eq!(p.statistics.favorite_question_type, "Analytical");
        assert_eq!(p.personality_type, "Unknown");
        assert!(!p.personality_known());
        assert_eq!(state.last_quest_generation_day, "Mon Oct 19 2026");
        assert!(state.daily_quests.is_empty());
    }

    #[test]
    fn absent_or_playerless_documents_resolve_to_default() {
        let fresh = GameState::new(now());
        assert_eq!(resolve_state(None, now()), fresh);
        assert_eq!(resolve_state(Some(json!({"messageCount": 4})), now()), fresh);
        assert_eq!(resolve_state(Some(json!([1, 2, 3])), now()), fresh);
        assert_eq!(resolve_state(Some(json!({"player": null})), now()), fresh);
        assert_eq!(resolve_state_str(Some("{not json"), now()), fresh);
        assert_eq!(resolve_state_str(None, now()), fresh);
    }

    #[test]
    fn partial_documents_are_completed_field_by_field() {
        let doc = json!({
            "player": {
                "name": "Ada",
                "level": 4,
                "stats": { "health": 70 },
                "statistics": { "totalMessages": 12 }
            }
        });
        let state = resolve_state(Some(doc), now());
        assert_eq!(state.player.name, "Ada");
        assert_eq!(state.player.level, 4);
        assert_eq!(state.player.stats.health, 70);
        assert_eq!(state.player.stats.energy, 100);
        assert_eq!(state.player.statistics.total_messages, 12);
        assert_eq!(state.player.statistics.total_days_active, 1);
        assert_eq!(state.player.personality_type, "Unknown");
        assert!(state.player.last_message_time.is_none());
        assert!(state.last_quest_generation_day.is_empty());
    }

    #[test]
    fn null_badges_keep_the_rest_of_the_player() {
        let doc = json!({ "player": { "level": 12, "totalXpEarned": 4000, "badges": null } });
        let state = resolve_state(Some(doc), now());
        assert_eq!(state.player.level, 12);
        assert_eq!(state.player.total_xp_earned, 4000);
        assert!(state.player.badges.is_empty());
    }

    #[test]
    fn each_malformed_field_takes_only_its_own_default() {
        let veteran = |patch: Value| {
            let mut player = json!({ "name": "Ada", "level": 12, "totalXpEarned": 4000 });
            if let (Some(player), Value::Object(patch)) = (player.as_object_mut(), patch) {
                player.extend(patch);
            }
            resolve_state(Some(json!({ "player": player, "messageCount": 9 })), now())
        };

        let state = veteran(json!({ "stats": { "health": 72.5, "focus": 80 } }));
        assert_eq!(state.player.stats.health, 100);
        assert_eq!(state.player.stats.focus, 80);

        let state = veteran(json!({ "xp": -3, "level": "seven" }));
        assert_eq!((state.player.xp, state.player.level), (0, 1));

        let state = veteran(json!({ "statistics": "lots", "stats": [1, 2] }));
        assert_eq!(state.player.statistics, Statistics::default());
        assert_eq!(state.player.stats, Stats::default());

        let state = veteran(json!({ "badges": ["flame-on", 7, "night-owl"] }));
        assert_eq!(state.player.badges, vec!["flame-on", "night-owl"]);

        for state in [
            veteran(json!({ "stats": { "health": 72.5 } })),
            veteran(json!({ "xp": -3 })),
            veteran(json!({ "lastMessageTime": "yesterday", "dailyQuests": 3 })),
        ] {
            assert_eq!(state.player.name, "Ada");
            assert_eq!(state.player.total_xp_earned, 4000);
            assert_eq!(state.message_count, 9);
        }
    }

    #[test]
    fn serialization_uses_document_keys() {
        let state = GameState::new(now());
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("dailyQuests").is_some());
        assert!(value.get("lastWeeklyQuestGenDate").is_some());
        let player = &value["player"];
        assert_eq!(player["totalXpEarned"], 0);
        assert_eq!(player["statistics"]["dailyQuestsCompletedTotal"], 0);
        assert!(player["stats"].get("creativity").is_none());
        let restored = GameState::from_json(&value.to_string()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn badges_stay_unique() {
        let mut player = Player::default();
        assert!(player.grant_badge("flame-on"));
        assert!(!player.grant_badge("flame-on"));
        assert_eq!(player.badges, vec!["flame-on".to_string()]);
    }

    #[test]
    fn clamp_bounds_every_stat() {
        let mut stats = Stats {
            health: -5,
            energy: 140,
            creativity: Some(120),
            ..Stats::default()
        };
        stats.clamp();
        assert_eq!(stats.health, 0);
        assert_eq!(stats.energy, 100);
        assert_eq!(stats.creativity, Some(100));
    }
}
