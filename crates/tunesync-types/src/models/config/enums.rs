//! Configuration enums for synchronization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy selecting which of two divergent snapshots is authoritative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Remote snapshot always wins
    ServerWins,
    /// Local snapshot always wins
    ClientWins,
    /// Newer `updatedAt` wins, remote on tie. Unknown strategy strings
    /// written by other clients land here too.
    #[serde(other)]
    LastWriteWins,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ServerWins => write!(f, "server_wins"),
            Self::ClientWins => write!(f, "client_wins"),
            Self::LastWriteWins => write!(f, "last_write_wins"),
        }
    }
}

impl ConflictStrategy {
    /// Parse from string.
    pub fn from_string(s: &str) -> Self {
        match s {
            "server_wins" => Self::ServerWins,
            "client_wins" => Self::ClientWins,
            _ => Self::LastWriteWins,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_strategy_deserializes_as_lww() {
        let s: ConflictStrategy = serde_json::from_str("\"merge_fields\"").unwrap();
        assert_eq!(s, ConflictStrategy::LastWriteWins);
    }

    #[test]
    fn test_from_string_roundtrips_display() {
        for s in [ConflictStrategy::ServerWins, ConflictStrategy::ClientWins] {
            assert_eq!(ConflictStrategy::from_string(&s.to_string()), s);
        }
    }
}
