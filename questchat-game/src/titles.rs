//! Cosmetic rank tiers derived from lifetime XP.
use serde::Serialize;

/// A title tier. `max_xp` of `None` means the tier is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub level: u8,
    pub name: &'static str,
    pub icon: &'static str,
    pub min_xp: u64,
    pub max_xp: Option<u64>,
    pub description: &'static str,
}

impl Title {
    #[must_use]
    pub fn contains(&self, total_xp: u64) -> bool {
        total_xp >= self.min_xp && self.max_xp.is_none_or(|max| total_xp <= max)
    }
}

/// Contiguous tiers covering `[0, ∞)`, ascending.
pub static TITLES: [Title; 6] = [
    Title {
        level: 1,
        name: "Curious Beginner",
        icon: "🌱",
        min_xp: 0,
        max_xp: Some(99),
        description: "Your journey begins with the first question",
    },
    Title {
        level: 2,
        name: "Thoughtful Learner",
        icon: "📚",
        min_xp: 100,
        max_xp: Some(499),
        description: "Every conversation deepens your understanding",
    },
    Title {
        level: 3,
        name: "Insightful Mind",
        icon: "💭",
        min_xp: 500,
        max_xp: Some(1_499),
        description: "Your questions reveal layers of meaning",
    },
    Title {
        level: 4,
        name: "Philosopher",
        icon: "🧠",
        min_xp: 1_500,
        max_xp: Some(4_999),
        description: "Wisdom flows through your words",
    },
    Title {
        level: 5,
        name: "Master of Discourse",
        icon: "👑",
        min_xp: 5_000,
        max_xp: Some(9_999),
        description: "Your insights illuminate the path for others",
    },
    Title {
        level: 6,
        name: "Legendary Scholar",
        icon: "⭐",
        min_xp: 10_000,
        max_xp: None,
        description: "A seeker of infinite knowledge and understanding",
    },
];

/// First tier whose range contains `total_xp`.
#[must_use]
pub fn title_for_xp(total_xp: u64) -> &'static Title {
    TITLES
        .iter()
        .find(|title| title.contains(total_xp))
        .unwrap_or(&TITLES[0])
}

/// Look a tier up by display name, falling back to the first tier.
#[must_use]
pub fn title_by_name(name: &str) -> &'static Title {
    TITLES
        .iter()
        .find(|title| title.name == name)
        .unwrap_or(&TITLES[0])
}

/// The lowest tier that still needs more XP than `total_xp`.
#[must_use]
pub fn next_title(total_xp: u64) -> Option<&'static Title> {
    TITLES.iter().find(|title| title.min_xp > total_xp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_contiguous_and_exhaustive() {
        assert_eq!(TITLES[0].min_xp, 0);
        for pair in TITLES.windows(2) {
            let upper = pair[0].max_xp.expect("only the last tier is open");
            assert_eq!(upper + 1, pair[1].min_xp);
            assert_eq!(pair[0].level + 1, pair[1].level);
        }
        assert!(TITLES[TITLES.len() - 1].max_xp.is_none());
    }

    #[test]
    fn lookup_respects_inclusive_bounds() {
        assert_eq!(title_for_xp(0).level, 1);
        assert_eq!(title_for_xp(99).level, 1);
        assert_eq!(title_for_xp(100).level, 2);
        assert_eq!(title_for_xp(1_499).level, 3);
        assert_eq!(title_for_xp(u64::MAX).level, 6);
    }

    #[test]
    fn next_title_and_name_lookup() {
        assert_eq!(next_title(120).map(|t| t.name), Some("Insightful Mind"));
        assert!(next_title(10_000).is_none());
        assert_eq!(title_by_name("Philosopher").min_xp, 1_500);
        assert_eq!(title_by_name("Nobody").level, 1);
    }
}
