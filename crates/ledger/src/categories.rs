//! The fixed expense category registry.
//!
//! Categories are an enumerated column on the remote store; clients cannot
//! extend the set at runtime. Each category carries display metadata (icon
//! name and hex color) consumed by the UI layer.

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// A fixed expense category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Home,
    Health,
    Shopping,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Home,
        Category::Health,
        Category::Shopping,
        Category::Entertainment,
        Category::Other,
    ];

    /// Returns the full fixed set, independently of which categories are in
    /// use by existing expenses.
    #[must_use]
    pub fn all() -> &'static [Category] {
        &Self::ALL
    }

    /// Canonical value stored in the database column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Home => "home",
            Category::Health => "health",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Home => "Home",
            Category::Health => "Health",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// Hex color used when charting this category.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Category::Food => "#f471b5",
            Category::Transport => "#f59e0b",
            Category::Home => "#3b82f6",
            Category::Health => "#10b981",
            Category::Shopping => "#06b6d4",
            Category::Entertainment => "#8b5cf6",
            Category::Other => "#6b7280",
        }
    }

    /// Icon identifier for UI clients.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Category::Food => "utensils",
            Category::Transport => "car",
            Category::Home => "home",
            Category::Health => "heart",
            Category::Shopping => "shopping-bag",
            Category::Entertainment => "film",
            Category::Other => "help-circle",
        }
    }

    /// Position inside [`Category::ALL`]; used by the accumulator in
    /// `summary`.
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Category::Food => 0,
            Category::Transport => 1,
            Category::Home => 2,
            Category::Health => 3,
            Category::Shopping => 4,
            Category::Entertainment => 5,
            Category::Other => 6,
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "transport" => Ok(Category::Transport),
            "home" => Ok(Category::Home),
            "health" => Ok(Category::Health),
            "shopping" => Ok(Category::Shopping),
            "entertainment" => Ok(Category::Entertainment),
            "other" => Ok(Category::Other),
            other => Err(LedgerError::InvalidCategory(format!(
                "unknown category: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_round_trips_through_str() {
        for category in Category::all() {
            assert_eq!(Category::try_from(category.as_str()).unwrap(), *category);
        }
    }

    #[test]
    fn indices_match_display_order() {
        for (position, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), position);
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(Category::try_from("utilities").is_err());
    }
}
