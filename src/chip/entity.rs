//! Chip representation: a selectable token such as a contact or tag

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Unique identifier for a chip
///
/// Serializes as a plain string (UUID or caller key like "contact:ada")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChipId(String);

impl ChipId {
    /// Create a new random ChipId (UUID-based)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a ChipId from a caller-chosen key
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A blank id stands for an absent chip
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for ChipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChipId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChipId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A selectable token
///
/// Equality is identity equality: two chips are equal when their ids are.
/// The `filterable` flag belongs to the store, which sets it on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chip {
    /// Stable identity
    pub id: ChipId,
    /// Display title, also the natural ordering key
    pub title: String,
    /// Optional secondary line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Opaque avatar reference (URI, asset name, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Output only; input chips always start non-filterable
    #[serde(default, skip_deserializing)]
    pub(crate) filterable: bool,
}

impl Chip {
    /// Create a new chip with a random id
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(ChipId::new(), title)
    }

    /// Create a chip with a specific id and title
    pub fn with_id(id: impl Into<ChipId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            avatar: None,
            filterable: false,
        }
    }

    /// Set the subtitle
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the avatar reference
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Whether the chip may move back into the filtered partition
    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Natural order: title ignoring case, then exact title, then id.
    pub fn natural_cmp(&self, other: &Chip) -> Ordering {
        self.title
            .to_lowercase()
            .cmp(&other.title.to_lowercase())
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.id.as_str().cmp(other.id.as_str()))
    }
}

impl PartialEq for Chip {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Chip {}
