use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a merge schema entry does with the source value.
///
/// Configuration names are accepted in both the long-standing catalogue
/// spelling (`"equals"`, `"equals_if_not_exists"`) and the canonical
/// snake-case names this type serializes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Operation {
    /// Replace the destination unconditionally.
    #[default]
    Overwrite,
    /// Add the value to a sequence at the destination.
    Append,
    /// Write only if the destination is absent.
    SetIfAbsent,
    /// Set the destination to null if it is present.
    Delete,
}

impl Operation {
    /// Parses a configured operation name. An empty name is an overwrite.
    pub fn parse(name: &str) -> Result<Self, SchemaError> {
        match name {
            "" | "equals" | "overwrite" => Ok(Self::Overwrite),
            "append" => Ok(Self::Append),
            "equals_if_not_exists" | "set_if_absent" => Ok(Self::SetIfAbsent),
            "delete" => Ok(Self::Delete),
            other => Err(SchemaError::UnknownOperation(other.to_string())),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Append => "append",
            Self::SetIfAbsent => "set_if_absent",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Operation {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}
