//! Zone and record types shared by validation, rendering and persistence.
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of zone as selected by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Master,
    Slave,
    Forward,
    Redirect,
}

impl ZoneType {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneType::Master => "master",
            ZoneType::Slave => "slave",
            ZoneType::Forward => "forward",
            ZoneType::Redirect => "redirect",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown zone type '{0}'")]
pub struct UnknownZoneType(pub String);

impl FromStr for ZoneType {
    type Err = UnknownZoneType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(ZoneType::Master),
            "slave" => Ok(ZoneType::Slave),
            "forward" => Ok(ZoneType::Forward),
            "redirect" => Ok(ZoneType::Redirect),
            other => Err(UnknownZoneType(other.to_string())),
        }
    }
}

/// Type-specific zone data. Each variant carries only the fields that are
/// meaningful for that zone type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneKind {
    Master {
        ns1: String,
        ns2: String,
        ttl: u32,
        soa: String,
    },
    Slave {
        master_ip: Ipv4Addr,
    },
    Forward {
        forwarders: Vec<Ipv4Addr>,
    },
    Redirect {
        forwarders: Vec<Ipv4Addr>,
    },
}

impl ZoneKind {
    pub fn zone_type(&self) -> ZoneType {
        match self {
            ZoneKind::Master { .. } => ZoneType::Master,
            ZoneKind::Slave { .. } => ZoneType::Slave,
            ZoneKind::Forward { .. } => ZoneType::Forward,
            ZoneKind::Redirect { .. } => ZoneType::Redirect,
        }
    }

    pub fn master_ip(&self) -> Option<Ipv4Addr> {
        match self {
            ZoneKind::Slave { master_ip } => Some(*master_ip),
            _ => None,
        }
    }

    pub fn forwarders(&self) -> Option<&[Ipv4Addr]> {
        match self {
            ZoneKind::Forward { forwarders } | ZoneKind::Redirect { forwarders } => {
                Some(forwarders)
            }
            _ => None,
        }
    }

    pub fn ns1(&self) -> Option<&str> {
        match self {
            ZoneKind::Master { ns1, .. } => Some(ns1),
            _ => None,
        }
    }

    pub fn ns2(&self) -> Option<&str> {
        match self {
            ZoneKind::Master { ns2, .. } => Some(ns2),
            _ => None,
        }
    }

    pub fn ttl(&self) -> Option<u32> {
        match self {
            ZoneKind::Master { ttl, .. } => Some(*ttl),
            _ => None,
        }
    }

    pub fn soa(&self) -> Option<&str> {
        match self {
            ZoneKind::Master { soa, .. } => Some(soa),
            _ => None,
        }
    }
}

/// Joins forwarders into the comma-separated form operators type in.
pub fn join_forwarders(forwarders: &[Ipv4Addr]) -> String {
    forwarders
        .iter()
        .map(Ipv4Addr::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unchecked zone fields as submitted by the web layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCandidate {
    pub name: String,
    pub zone_type: ZoneType,
    #[serde(default)]
    pub master_ip: Option<String>,
    /// Comma-separated IPv4 addresses.
    #[serde(default)]
    pub forwarders: Option<String>,
    #[serde(default)]
    pub ns1: Option<String>,
    #[serde(default)]
    pub ns2: Option<String>,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub soa: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ZoneCandidate {
    pub fn new(name: impl Into<String>, zone_type: ZoneType) -> Self {
        Self {
            name: name.into(),
            zone_type,
            master_ip: None,
            forwarders: None,
            ns1: None,
            ns2: None,
            ttl: None,
            soa: None,
            description: None,
        }
    }
}

/// A zone that passed validation and has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedZone {
    pub name: String,
    pub kind: ZoneKind,
    pub description: Option<String>,
}

/// A stored zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub kind: ZoneKind,
    pub serial: i64,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Zone {
    pub fn zone_type(&self) -> ZoneType {
        self.kind.zone_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Ptr,
    Srv,
    Caa,
    Soa,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Caa => "CAA",
            RecordType::Soa => "SOA",
        }
    }

    /// MX and SRV carry a priority in front of their target.
    pub fn requires_priority(self) -> bool {
        matches!(self, RecordType::Mx | RecordType::Srv)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown record type '{0}'")]
pub struct UnknownRecordType(pub String);

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "TXT" => RecordType::Txt,
            "NS" => RecordType::Ns,
            "PTR" => RecordType::Ptr,
            "SRV" => RecordType::Srv,
            "CAA" => RecordType::Caa,
            "SOA" => RecordType::Soa,
            other => return Err(UnknownRecordType(other.to_string())),
        })
    }
}

pub const DEFAULT_RECORD_TTL: u32 = 3600;

fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

/// Unchecked record fields as submitted by the web layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCandidate {
    pub record_type: RecordType,
    #[serde(default)]
    pub name: Option<String>,
    pub value: String,
    #[serde(default)]
    pub priority: Option<u16>,
    #[serde(default = "default_record_ttl")]
    pub ttl: u32,
}

impl RecordCandidate {
    pub fn new(record_type: RecordType, value: impl Into<String>) -> Self {
        Self {
            record_type,
            name: None,
            value: value.into(),
            priority: None,
            ttl: DEFAULT_RECORD_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub record_type: RecordType,
    pub name: Option<String>,
    pub value: String,
    pub priority: Option<u16>,
    pub ttl: u32,
}

/// A stored record; always owned by exactly one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,
    pub zone_id: i64,
    pub record_type: RecordType,
    pub name: Option<String>,
    pub value: String,
    pub priority: Option<u16>,
    pub ttl: u32,
}
