//! User preferences for duration rounding and optional entry fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    None,
    Round,
    Ceil,
    Floor,
}

impl FromStr for Rounding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Rounding::None),
            "round" | "nearest" => Ok(Rounding::Round),
            "ceil" | "up" => Ok(Rounding::Ceil),
            "floor" | "down" => Ok(Rounding::Floor),
            _ => Err(Error::InvalidRounding(s.to_string())),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rounding::None => "none",
            Rounding::Round => "round",
            Rounding::Ceil => "ceil",
            Rounding::Floor => "floor",
        };
        f.write_str(label)
    }
}

/// Where rounding is applied: to every entry, or once to each report total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingOn {
    #[default]
    Entries,
    Reports,
}

impl FromStr for RoundingOn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entries" | "entry" => Ok(RoundingOn::Entries),
            "reports" | "report" => Ok(RoundingOn::Reports),
            _ => Err(Error::InvalidRoundingOn(s.to_string())),
        }
    }
}

impl fmt::Display for RoundingOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingOn::Entries => f.write_str("entries"),
            RoundingOn::Reports => f.write_str("reports"),
        }
    }
}

/// Largest rounding step: one day.
pub const MAX_ROUND_AMOUNT: u32 = 24 * 60;

/// Accepts a rounding step between one minute and one day.
pub fn check_round_amount(amount: u32) -> Result<u32, Error> {
    if (1..=MAX_ROUND_AMOUNT).contains(&amount) {
        Ok(amount)
    } else {
        Err(Error::InvalidRoundAmount(amount))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rounding: Rounding,
    /// Rounding step in minutes.
    pub round_amount: u32,
    pub rounding_on: RoundingOn,
    pub enable_notes: bool,
    pub enable_projects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rounding: Rounding::None,
            round_amount: 15,
            rounding_on: RoundingOn::Entries,
            enable_notes: true,
            enable_projects: true,
        }
    }
}

impl Settings {
    pub fn rounds_entries(&self) -> bool {
        self.rounding_on == RoundingOn::Entries
    }

    pub fn validate(&self) -> Result<(), Error> {
        check_round_amount(self.round_amount).map(|_| ())
    }

    /// Rounding applied to single entries in detailed listings.
    pub fn entry_rounding(&self) -> Rounding {
        if self.rounds_entries() {
            self.rounding
        } else {
            Rounding::None
        }
    }
}
