use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub value: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

pub const DEFAULT_CATEGORY: &str = "Groceries";
pub const UNKNOWN_EMOJI: &str = "❓";

const fn category(value: &'static str, emoji: &'static str) -> Category {
    Category {
        value,
        label: value,
        emoji,
    }
}

static CATEGORIES: [Category; 23] = [
    category("Groceries", "🛒"),
    category("Ordering in", "🍱"),
    category("Eating out", "🍴"),
    category("Transport", "🚌"),
    category("Household items", "🏠"),
    category("Utilities", "💡"),
    category("Health", "💊"),
    category("Capex", "🏗️"),
    category("Gifts", "🎁"),
    category("Clothes", "👗"),
    category("Self care", "🛁"),
    category("Entertainment", "🎬"),
    category("Trips", "✈️"),
    category("Wedding", "💍"),
    category("Learning", "📚"),
    category("Other", "❓"),
    category("Memberships", "🏆"),
    category("Card fees", "💳"),
    category("Transfers", "🔄"),
    category("Test", "🧪"),
    category("Rent", "🏠"),
    category("Work", "💼"),
    category("Investments", "💰"),
];

pub fn all() -> &'static [Category] {
    &CATEGORIES
}

pub fn find(value: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.value == value)
}

pub fn emoji_for(value: &str) -> &'static str {
    find(value).map_or(UNKNOWN_EMOJI, |category| category.emoji)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact_match() {
        assert_eq!(find("Eating out").map(|c| c.emoji), Some("🍴"));
        assert!(find("eating out").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn unknown_category_gets_fallback_emoji() {
        assert_eq!(emoji_for("Rent"), "🏠");
        assert_eq!(emoji_for("Crypto"), UNKNOWN_EMOJI);
    }

    #[test]
    fn values_are_unique_and_default_exists() {
        let mut values: Vec<_> = all().iter().map(|c| c.value).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), all().len());
        assert!(find(DEFAULT_CATEGORY).is_some());
    }
}
