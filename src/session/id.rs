//! The session ID type.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A newtype wrapper for the UUIDs that identify anonymous sessions.
///
/// A session ID is only a row-scoping key, it does not prove who the caller is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a new, cryptographically random session ID.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID as a session ID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::SessionId;

    #[test]
    fn new_random_ids_are_distinct() {
        let ids: HashSet<SessionId> = (0..1000).map(|_| SessionId::new_random()).collect();

        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn parses_display_output() {
        let id = SessionId::new_random();

        let parsed: SessionId = id.to_string().parse().unwrap();

        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_non_uuid_strings() {
        assert!("abc".parse::<SessionId>().is_err());
        assert!("".parse::<SessionId>().is_err());
    }
}
