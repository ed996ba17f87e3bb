//! Reverse/forward classification of zones for display.
use serde::Serialize;

use super::DirectoryKind;
use crate::model::ZoneType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub is_reverse: bool,
    pub directory: DirectoryKind,
}

/// Reverse-mapping zones live under `in-addr.arpa` or `ip6.arpa`.
pub fn is_reverse(name: &str) -> bool {
    name.ends_with(".in-addr.arpa") || name.ends_with(".ip6.arpa")
}

/// Picks the bucket a zone belongs to. A reverse name wins over the zone type.
///
/// File placement does not use this; see [`super::render`].
pub fn classify(name: &str, zone_type: ZoneType) -> Classification {
    let is_reverse = is_reverse(name);
    let directory = if is_reverse {
        DirectoryKind::Reverse
    } else {
        match zone_type {
            ZoneType::Slave => DirectoryKind::Slave,
            ZoneType::Forward | ZoneType::Redirect => DirectoryKind::Forward,
            ZoneType::Master => DirectoryKind::Master,
        }
    };
    Classification {
        is_reverse,
        directory,
    }
}
