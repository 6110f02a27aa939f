use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
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
    };
}

id_newtype!(PostId);
id_newtype!(LinkId);

/// Kind of a related link. Only `episode` links are validated locally; every
/// other kind is forwarded to the backend as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkType {
    Episode,
    Other(String),
}

impl LinkType {
    pub fn as_str(&self) -> &str {
        match self {
            LinkType::Episode => "episode",
            LinkType::Other(kind) => kind,
        }
    }
}

impl From<&str> for LinkType {
    fn from(value: &str) -> Self {
        match value {
            "episode" => LinkType::Episode,
            other => LinkType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LinkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LinkType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LinkType::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

/// Id of a related-link payload: `_id`, or `id` when `_id` is absent.
/// Numeric ids are returned as their decimal text.
pub fn related_link_id(link: &Value) -> Option<String> {
    match link.get("_id").or_else(|| link.get("id"))? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Vote fields of a related-link payload, read leniently: missing or
/// mistyped fields count as zero / false.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteState {
    pub score: f64,
    pub upvoted: bool,
    pub downvoted: bool,
}

impl VoteState {
    pub fn read(link: &Value) -> Self {
        Self {
            score: link.get("score").and_then(Value::as_f64).unwrap_or(0.0),
            upvoted: link.get("upvoted").and_then(Value::as_bool).unwrap_or(false),
            downvoted: link
                .get("downvoted")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Applies a vote toggle the way the backend scores it: repeating a vote
    /// clears it, voting against an existing vote flips it.
    pub fn apply(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => {
                if self.upvoted {
                    self.score -= 1.0;
                    self.upvoted = false;
                } else {
                    self.score += if self.downvoted { 2.0 } else { 1.0 };
                    self.upvoted = true;
                    self.downvoted = false;
                }
            }
            VoteDirection::Down => {
                if self.downvoted {
                    self.score += 1.0;
                    self.downvoted = false;
                } else {
                    self.score -= if self.upvoted { 2.0 } else { 1.0 };
                    self.downvoted = true;
                    self.upvoted = false;
                }
            }
        }
    }

    /// Writes the vote fields back. Other fields are left alone; an integer
    /// score stays an integer.
    pub fn write(&self, link: &mut Value) {
        let float_score = link.get("score").is_some_and(Value::is_f64);
        let Some(fields) = link.as_object_mut() else {
            return;
        };
        let score = if float_score {
            Value::from(self.score)
        } else {
            Value::from(self.score.round() as i64)
        };
        fields.insert("score".to_string(), score);
        fields.insert("upvoted".to_string(), Value::Bool(self.upvoted));
        fields.insert("downvoted".to_string(), Value::Bool(self.downvoted));
    }
}

pub fn apply_vote_to_link(link: &mut Value, direction: VoteDirection) {
    let mut state = VoteState::read(link);
    state.apply(direction);
    state.write(link);
}

/// Analytics record describing a single user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub category: String,
    pub action: String,
    pub label: String,
    pub value: i64,
}

impl AuditEvent {
    pub fn new(
        category: impl Into<String>,
        action: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
            label: label.into(),
            value: 1,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
