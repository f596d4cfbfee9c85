use serde::{Deserialize, Serialize};
use std::fmt;

pub type Id = i64;

/// Quantity of an item exactly as the client sent it.
///
/// Clients send either `"amount": 3` or `"amount": "3"`. Both are kept as
/// given and rendered back unchanged; the two forms are never coerced into
/// each other, so `Amount::from(3) != Amount::from("3")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Amount::Number(n) => serde_json::Value::Number(n.clone()),
            Amount::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => Some(Amount::Number(n)),
            serde_json::Value::String(s) => Some(Amount::Text(s)),
            _ => None,
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Number(value.into())
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parse an id taken from a URL path. Anything that is not an integer is
/// simply an id that matches nothing.
pub fn parse_id(raw: &str) -> Option<Id> {
    raw.trim().parse::<Id>().ok()
}
