use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined pick-list (roles, specialties, supplier kinds, ...).
/// Items live in their own store collection keyed by `list_id`.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct CustomList {
    /// UUID of the list
    pub id: Uuid,
    /// Title of the list
    pub title: String,
    /// Slug of the list, used to address it from the command line
    pub slug: String,
    /// Optional description
    pub description: Option<String>,
    /// Created at timestamp of the list
    pub created_at: Timestamp,
}

/// A single value inside a custom list.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct ListItem {
    /// UUID of the item
    pub id: Uuid,
    /// The list this item belongs to
    pub list_id: Uuid,
    /// The bare string value
    pub value: String,
    /// Created at timestamp of the item
    pub created_at: Timestamp,
}

/// Split a semicolon-delimited batch of values into individual items:
/// trim each segment and drop the empty ones.
pub fn split_items(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}
