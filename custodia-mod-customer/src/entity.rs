use serde::{Deserialize, Serialize};

/// Fields missing from a request body take their zero value; the service
/// layer decides whether that is acceptable.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(default)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: 0, name: name.into() }
    }
}
