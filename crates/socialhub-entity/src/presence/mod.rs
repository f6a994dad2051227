//! Presence domain entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Presence status broadcast to a user's friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// At least one live connection.
    Online,
    /// Connected but marked away by the user.
    Away,
    /// Connected but marked busy by the user.
    Busy,
    /// No live connection.
    Offline,
}

/// Returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid presence status: '{0}'")]
pub struct InvalidPresenceStatus(pub String);

impl PresenceStatus {
    /// Check if the status counts as online.
    pub fn is_online(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = InvalidPresenceStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" | "active" => Ok(Self::Online),
            "away" | "idle" => Ok(Self::Away),
            "busy" | "dnd" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            _ => Err(InvalidPresenceStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("Active".parse::<PresenceStatus>(), Ok(PresenceStatus::Online));
        assert_eq!("dnd".parse::<PresenceStatus>(), Ok(PresenceStatus::Busy));
        assert_eq!(" away ".parse::<PresenceStatus>(), Ok(PresenceStatus::Away));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("sleeping".parse::<PresenceStatus>().is_err());
    }
}
