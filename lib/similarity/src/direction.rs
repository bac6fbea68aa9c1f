//! Directional intents
//!
//! A direction says how a scored dimension should move from the current
//! track to the next one.

use mixwheel_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Desired tempo movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TempoDirection {
    #[default]
    Maintain,
    Faster,
    Slower,
}

/// Desired movement of energy and other bounded features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    #[default]
    Maintain,
    Build,
    Drop,
}

impl TempoDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TempoDirection::Maintain => "maintain",
            TempoDirection::Faster => "faster",
            TempoDirection::Slower => "slower",
        }
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Maintain => "maintain",
            Direction::Build => "build",
            Direction::Drop => "drop",
        }
    }

    /// Parse a token, mapping anything unrecognized to `None` instead of an error
    pub fn lenient(token: &str) -> Option<Direction> {
        token.parse().ok()
    }
}

impl FromStr for TempoDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maintain" => Ok(TempoDirection::Maintain),
            "faster" => Ok(TempoDirection::Faster),
            "slower" => Ok(TempoDirection::Slower),
            _ => Err(Error::InvalidDirection {
                expected: "maintain, faster, slower",
                token: s.to_string(),
            }),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maintain" => Ok(Direction::Maintain),
            "build" => Ok(Direction::Build),
            "drop" => Ok(Direction::Drop),
            _ => Err(Error::InvalidDirection {
                expected: "maintain, build, drop",
                token: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TempoDirection {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Direction {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TempoDirection> for String {
    fn from(value: TempoDirection) -> Self {
        value.as_str().to_string()
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TempoDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
