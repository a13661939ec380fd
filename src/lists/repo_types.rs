use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Name of the flat list backed by the `items` table.
pub const TODAY: &str = "Today";

/// Seed for every newly created custom list.
pub const DEFAULT_ITEMS: &[&str] = &["First Action"];

/// Entry of the flat "Today" list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// Entry embedded in a custom list document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: Uuid,
    pub name: String,
}

impl ListItem {
    pub fn new(name: &ItemName) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.as_str().to_owned(),
        }
    }

    /// Fresh copies of the default items, each with its own id.
    pub fn defaults(names: &[&str]) -> Vec<ListItem> {
        names
            .iter()
            .map(|n| ListItem {
                id: Uuid::new_v4(),
                name: (*n).to_owned(),
            })
            .collect()
    }
}

/// Custom list with its items stored inline as `jsonb`.
#[derive(Debug, Clone, FromRow)]
pub struct TodoList {
    pub name: String,
    pub items: Json<Vec<ListItem>>,
}

/// Outcome of the find-or-create lookup.
#[derive(Debug, Clone)]
pub enum ListLookup {
    Found(TodoList),
    Created,
}

/// Non-empty, trimmed item text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName(String);

impl ItemName {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Canonical list name: first character upper-cased, the rest lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListName(String);

impl ListName {
    pub fn capitalize(raw: &str) -> Self {
        let mut chars = raw.chars();
        let name = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        };
        Self(name)
    }

    pub fn is_today(&self) -> bool {
        self.0 == TODAY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
