//! Permanent, predicate-gated achievements.
use serde::Serialize;
use smallvec::SmallVec;

use crate::clock::{Timestamp, hour_of_day, is_weekend};
use crate::state::Player;

/// Ambient facts a badge predicate may consult besides the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeContext {
    pub now: Timestamp,
}

pub type BadgeCondition = fn(&Player, &BadgeContext) -> bool;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub condition: BadgeCondition,
}

impl PartialEq for Badge {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Badge {}

impl Badge {
    #[must_use]
    pub fn is_met(&self, player: &Player, ctx: &BadgeContext) -> bool {
        (self.condition)(player, ctx)
    }
}

/// Catalog order is also evaluation order.
pub static BADGES: [Badge; 15] = [
    Badge {
        key: "flame-on",
        name: "🔥 Flame On",
        description: "Achieve a 7-day streak",
        condition: |p, _| p.streak >= 7,
    },
    Badge {
        key: "big-brain",
        name: "🧠 Big Brain",
        description: "Earn 50+ XP in a single message",
        condition: |p, _| p.statistics.highest_single_message_xp >= 50,
    },
    Badge {
        key: "health-guardian",
        name: "💚 Health Guardian",
        description: "Maintain 80+ health for 7 days",
        condition: |p, _| p.stats.health >= 80 && p.streak >= 7,
    },
    Badge {
        key: "legendary",
        name: "🌟 Legendary",
        description: "Achieve a 30-day streak",
        condition: |p, _| p.streak >= 30,
    },
    Badge {
        key: "bibliophile",
        name: "📚 Bibliophile",
        description: "Earn 1,000 total XP",
        condition: |p, _| p.total_xp_earned >= 1_000,
    },
    Badge {
        key: "tech-wizard",
        name: "🤖 Tech Wizard",
        description: "Send 20 technical questions",
        condition: |p, _| p.statistics.total_high_quality_messages >= 20,
    },
    Badge {
        key: "creative-genius",
        name: "🎨 Creative Genius",
        description: "Send 20 creative questions",
        condition: |p, _| p.statistics.total_high_quality_messages >= 20,
    },
    Badge {
        key: "consistent",
        name: "🤝 Consistent",
        description: "Never break a streak (reach level 10)",
        condition: |p, _| p.level >= 10 && p.longest_streak >= 10,
    },
    Badge {
        key: "master",
        name: "👑 Master",
        description: "Reach level 50",
        condition: |p, _| p.level >= 50,
    },
    Badge {
        key: "quest-master",
        name: "🎯 Quest Master",
        description: "Complete all daily quests",
        condition: |p, _| p.statistics.daily_quests_completed_total >= 5,
    },
    Badge {
        key: "night-owl",
        name: "🦉 Night Owl",
        description: "Send a message between 11PM and 4AM",
        condition: |_, ctx| {
            let hour = hour_of_day(ctx.now);
            hour >= 23 || hour <= 4
        },
    },
    Badge {
        key: "early-bird",
        name: "🌅 Early Bird",
        description: "Send a message between 5AM and 9AM",
        condition: |_, ctx| (5..=9).contains(&hour_of_day(ctx.now)),
    },
    Badge {
        key: "weekend-warrior",
        name: "⚔️ Weekend Warrior",
        description: "Active on a weekend",
        condition: |_, ctx| is_weekend(ctx.now),
    },
    Badge {
        key: "social-butterfly",
        name: "🦋 Social Butterfly",
        description: "Send 100 total messages",
        condition: |p, _| p.statistics.total_messages >= 100,
    },
    Badge {
        key: "deep-thinker",
        name: "🤔 Deep Thinker",
        description: "Average XP per message > 20",
        condition: |p, _| p.statistics.average_xp_per_message >= 20,
    },
];

#[must_use]
pub fn badge_by_key(key: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|badge| badge.key == key)
}

/// Grant every unearned badge whose predicate holds, in catalog order.
pub fn check_badges(player: &mut Player, ctx: &BadgeContext) -> SmallVec<[&'static Badge; 4]> {
    let mut awarded = SmallVec::new();
    for badge in &BADGES {
        if player.has_badge(badge.key) || !badge.is_met(player, ctx) {
            continue;
        }
        player.grant_badge(badge.key);
        log::debug!("badge unlocked: {}", badge.key);
        awarded.push(badge);
    }
    awarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hour: u32) -> BadgeContext {
        BadgeContext {
            now: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(hour, 15, 0)
                .unwrap()
                .and_utc()
                .fixed_offset(),
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = BADGES.iter().map(|b| b.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), BADGES.len());
        assert_eq!(badge_by_key("master").map(|b| b.name), Some("👑 Master"));
        assert!(badge_by_key("missing").is_none());
    }

    #[test]
    fn clock_badges_use_the_supplied_time() {
        let mut player = Player::default();
        // Monday 02:15
        let awarded = check_badges(&mut player, &at(2026, 10, 19, 2));
        let keys: Vec<_> = awarded.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["night-owl"]);

        // Saturday 07:15
        let awarded = check_badges(&mut player, &at(2026, 10, 17, 7));
        let keys: Vec<_> = awarded.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["early-bird", "weekend-warrior"]);
    }

    #[test]
    fn clock_badges_read_the_local_hour() {
        let mut player = Player::default();
        // Monday 01:15 in UTC-8 is 09:15 UTC
        let now = chrono::DateTime::parse_from_rfc3339("2026-10-19T01:15:00-08:00").unwrap();
        let awarded = check_badges(&mut player, &BadgeContext { now });
        let keys: Vec<_> = awarded.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["night-owl"]);
    }

    #[test]
    fn several_badges_unlock_in_catalog_order_once() {
        let mut player = Player::default();
        player.streak = 7;
        player.statistics.highest_single_message_xp = 60;
        let ctx = at(2026, 10, 19, 12);
        let awarded = check_badges(&mut player, &ctx);
        let keys: Vec<_> = awarded.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["flame-on", "big-brain", "health-guardian"]);
        assert!(check_badges(&mut player, &ctx).is_empty());
        assert_eq!(player.badges.len(), 3);
    }

    #[test]
    fn earned_badges_are_never_revoked() {
        let mut player = Player::default();
        player.streak = 30;
        let ctx = at(2026, 10, 19, 12);
        check_badges(&mut player, &ctx);
        assert!(player.has_badge("legendary"));
        player.streak = 1;
        check_badges(&mut player, &ctx);
        assert!(player.has_badge("legendary"));
    }
}
