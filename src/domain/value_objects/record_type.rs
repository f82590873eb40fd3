use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag identifying which domain record variant an outbox entry targets.
/// Only identifications and marketplace listings carry a sync obligation;
/// financial info stays local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Identification,
    Marketplace,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Identification => "identification",
            RecordType::Marketplace => "marketplace",
        }
    }

    /// Local collection (table) holding records of this type.
    pub fn collection(&self) -> &'static str {
        match self {
            RecordType::Identification => "identifications",
            RecordType::Marketplace => "marketplace",
        }
    }

    /// Remote push endpoint for records of this type.
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            RecordType::Identification => "/api/identifications",
            RecordType::Marketplace => "/api/marketplace",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "identification" => Ok(RecordType::Identification),
            "marketplace" => Ok(RecordType::Marketplace),
            other => Err(format!("Unknown record type: {other}")),
        }
    }
}
