use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Gender as stored on users, leads and employees.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl core::fmt::Display for Gender {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            _ => Err(DomainError::validation(
                "Gender must be either \"Male\" or \"Female\"",
            )),
        }
    }
}

/// Parse an optional gender. Empty strings count as absent.
pub fn parse_gender(value: Option<&str>) -> Result<Option<Gender>, DomainError> {
    match value {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}
