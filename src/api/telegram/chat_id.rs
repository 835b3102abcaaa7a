use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Either a numeric chat ID or a public `@username`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, derive_more::Display)]
#[serde(untagged)]
pub enum ChatId {
    #[display("{_0}")]
    Id(i64),

    #[display("{_0}")]
    Username(String),
}

impl FromStr for ChatId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(id) = s.parse() {
            Ok(Self::Id(id))
        } else if s.len() >= 2 && s.starts_with('@') {
            Ok(Self::Username(s.to_string()))
        } else {
            bail!("invalid chat ID: `{s}`")
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}
