use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a column. Never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub String);

/// Identifier of a card. Never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

/// A key or value of the order map: either a column id or a card id.
///
/// The order map stores every column's chain in one flat structure, so its
/// keys mix both identifier spaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(ColumnId);
string_id!(CardId);
string_id!(NodeId);

impl From<ColumnId> for NodeId {
    fn from(id: ColumnId) -> Self {
        Self(id.0)
    }
}

impl From<&ColumnId> for NodeId {
    fn from(id: &ColumnId) -> Self {
        Self(id.0.clone())
    }
}

impl From<CardId> for NodeId {
    fn from(id: CardId) -> Self {
        Self(id.0)
    }
}

impl From<&CardId> for NodeId {
    fn from(id: &CardId) -> Self {
        Self(id.0.clone())
    }
}

impl PartialEq<ColumnId> for NodeId {
    fn eq(&self, other: &ColumnId) -> bool {
        self.0 == other.0
    }
}

impl PartialEq<CardId> for NodeId {
    fn eq(&self, other: &CardId) -> bool {
        self.0 == other.0
    }
}

/// A card as stored by the backing store. Cards carry no column reference;
/// membership and position live in the order map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Card {
    pub fn new(id: impl Into<String>, text: Option<&str>) -> Self {
        Self {
            id: CardId::new(id),
            text: text.map(str::to_string),
        }
    }
}

/// A column as served by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub id: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ColumnRecord {
    pub fn new(id: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            id: ColumnId::new(id),
            title: title.map(str::to_string),
        }
    }
}

/// A column in the client snapshot. `draft_text` is the in-progress text of
/// the column's add-card input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub draft_text: String,
}

impl From<ColumnRecord> for Column {
    fn from(record: ColumnRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            draft_text: String::new(),
        }
    }
}

/// Whether `text` contains anything besides whitespace.
pub fn is_non_blank(text: &str) -> bool {
    !text.trim().is_empty()
}
