use serde::{Deserialize, Serialize};

use super::restaurant::Restaurant;

/// Outcome of a page-level operation, ready to be shown in place of results.
///
/// Page operations never return `Err`; failures become `Error` panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    /// A grid of restaurant cards, optionally under a heading.
    Results {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        restaurants: Vec<Restaurant>,
    },
    /// A single restaurant detail card.
    Detail { restaurant: Restaurant },
    /// An informational notice (e.g. nothing to recommend yet).
    Info { message: String },
    /// An inline error message.
    Error { message: String },
}

impl Panel {
    pub fn info(message: impl Into<String>) -> Self {
        Panel::Info {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Panel::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Panel::Error { .. })
    }

    /// Restaurants carried by a `Results` panel, empty otherwise.
    pub fn restaurants(&self) -> &[Restaurant] {
        match self {
            Panel::Results { restaurants, .. } => restaurants,
            _ => &[],
        }
    }
}
