//! Type-safe enumerations for delegation data.
//!
//! Delegation feeds carry these as lowercase tokens (`ipv4`, `allocated`,
//! `ripencc`). Parsing is case-insensitive; display uses the labels that
//! appear in output tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Kind of number resource a delegation line describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Ipv4,
    Ipv6,
    Asn,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [ResourceType::Ipv4, ResourceType::Ipv6, ResourceType::Asn];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Ipv4 => "ipv4",
            ResourceType::Ipv6 => "ipv6",
            ResourceType::Asn => "asn",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ipv4" => Ok(ResourceType::Ipv4),
            "ipv6" => Ok(ResourceType::Ipv6),
            "asn" => Ok(ResourceType::Asn),
            _ => Err(ModelError::UnknownResourceType(s.trim().to_string())),
        }
    }
}

/// Delegation status of a block.
///
/// Absent status in a reconciled series (years before the first delegation)
/// is modelled as `Option<Status>::None` and rendered as [`UNALLOCATED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Allocated,
    Assigned,
    Reserved,
    Available,
}

/// Label used for a country-year with no delegation status yet.
pub const UNALLOCATED: &str = "unallocated";

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Allocated => "allocated",
            Status::Assigned => "assigned",
            Status::Reserved => "reserved",
            Status::Available => "available",
        }
    }

    /// Renders an optional status the way output tables show it.
    pub fn label(status: Option<Status>) -> &'static str {
        status.map_or(UNALLOCATED, |s| s.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allocated" => Ok(Status::Allocated),
            "assigned" => Ok(Status::Assigned),
            "reserved" => Ok(Status::Reserved),
            "available" => Ok(Status::Available),
            _ => Err(ModelError::UnknownStatus(s.trim().to_string())),
        }
    }
}

/// The five Regional Internet Registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rir {
    #[serde(rename = "AFRINIC")]
    Afrinic,
    #[serde(rename = "APNIC")]
    Apnic,
    #[serde(rename = "ARIN")]
    Arin,
    #[serde(rename = "LACNIC")]
    Lacnic,
    #[serde(rename = "RIPE NCC")]
    RipeNcc,
}

impl Rir {
    pub const ALL: [Rir; 5] = [Rir::Afrinic, Rir::Apnic, Rir::Arin, Rir::Lacnic, Rir::RipeNcc];

    /// Display label, e.g. `RIPE NCC`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rir::Afrinic => "AFRINIC",
            Rir::Apnic => "APNIC",
            Rir::Arin => "ARIN",
            Rir::Lacnic => "LACNIC",
            Rir::RipeNcc => "RIPE NCC",
        }
    }

    /// Token used in the first field of delegation lines and in feed file names.
    pub fn feed_token(&self) -> &'static str {
        match self {
            Rir::Afrinic => "afrinic",
            Rir::Apnic => "apnic",
            Rir::Arin => "arin",
            Rir::Lacnic => "lacnic",
            Rir::RipeNcc => "ripencc",
        }
    }
}

impl fmt::Display for Rir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rir {
    type Err = ModelError;

    /// Accepts both feed tokens (`ripencc`) and labels (`RIPE NCC`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "afrinic" => Ok(Rir::Afrinic),
            "apnic" => Ok(Rir::Apnic),
            "arin" => Ok(Rir::Arin),
            "lacnic" => Ok(Rir::Lacnic),
            "ripencc" | "ripe" => Ok(Rir::RipeNcc),
            _ => Err(ModelError::UnknownRegistry(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_parses_case_insensitively() {
        assert_eq!("IPv4".parse::<ResourceType>().unwrap(), ResourceType::Ipv4);
        assert_eq!(" asn ".parse::<ResourceType>().unwrap(), ResourceType::Asn);
        assert!("ipv5".parse::<ResourceType>().is_err());
    }

    #[test]
    fn status_label_handles_absence() {
        assert_eq!(Status::label(Some(Status::Assigned)), "assigned");
        assert_eq!(Status::label(None), "unallocated");
        assert!("unallocated".parse::<Status>().is_err());
    }

    #[test]
    fn rir_accepts_tokens_and_labels() {
        for rir in Rir::ALL {
            assert_eq!(rir.feed_token().parse::<Rir>().unwrap(), rir);
            assert_eq!(rir.as_str().parse::<Rir>().unwrap(), rir);
        }
        assert_eq!("RIPE-NCC".parse::<Rir>().unwrap(), Rir::RipeNcc);
        assert!("iana".parse::<Rir>().is_err());
    }

    #[test]
    fn rir_serializes_with_label() {
        let json = serde_json::to_string(&Rir::RipeNcc).unwrap();
        assert_eq!(json, "\"RIPE NCC\"");
    }
}
