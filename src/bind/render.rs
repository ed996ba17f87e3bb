//! Zone-to-configuration rendering.
//!
//! Each zone type maps to a fixed stanza and a fixed place under the zones
//! root. The place depends only on the zone type, never on
//! [`classify`](super::classify::classify).
use std::path::{Path, PathBuf};

use super::DirectoryKind;
use crate::model::{Zone, ZoneKind, ZoneType};

pub const SOA_REFRESH: u32 = 3600;
pub const SOA_RETRY: u32 = 1800;
pub const SOA_EXPIRE: u32 = 1_209_600;
pub const SOA_MINIMUM: u32 = 86400;

/// Rendered text plus where it goes, relative to the zones root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFragment {
    pub path: PathBuf,
    pub text: String,
}

/// Subdirectory and file name the renderer uses for a zone.
pub fn artifact_path(name: &str, zone_type: ZoneType) -> PathBuf {
    let (dir, file) = match zone_type {
        ZoneType::Master => (DirectoryKind::Master, format!("db.{name}.conf")),
        ZoneType::Slave => (DirectoryKind::Slave, format!("{name}.conf")),
        ZoneType::Forward | ZoneType::Redirect => {
            (DirectoryKind::Forward, format!("{name}.conf"))
        }
    };
    Path::new(dir.as_str()).join(file)
}

/// Renders a stored zone. `zones_root` only appears inside slave stanzas,
/// as the location of the transferred zone data.
pub fn render(zone: &Zone, zones_root: &Path) -> ConfigFragment {
    let name = &zone.name;
    let text = match &zone.kind {
        ZoneKind::Master { ns1, ns2, ttl, soa } => format!(
            "$TTL {ttl}\n\
             @   IN  SOA ns1.{name}. {soa} (\n\
             \x20       {serial} ; Serial\n\
             \x20       {SOA_REFRESH}     ; Refresh\n\
             \x20       {SOA_RETRY}     ; Retry\n\
             \x20       {SOA_EXPIRE}  ; Expire\n\
             \x20       {SOA_MINIMUM}    ; Minimum TTL\n\
             )\n\
             \x20   IN  NS  {ns1}.\n\
             \x20   IN  NS  {ns2}.\n",
            serial = zone.serial,
        ),
        ZoneKind::Slave { master_ip } => format!(
            "zone \"{name}\" {{\n\
             \x20   type slave;\n\
             \x20   masters {{ {master_ip}; }};\n\
             \x20   file \"{root}/db.{name}\";\n\
             }};\n",
            root = zones_root.display(),
        ),
        ZoneKind::Forward { forwarders } | ZoneKind::Redirect { forwarders } => {
            let policy = if zone.zone_type() == ZoneType::Forward {
                "first"
            } else {
                "only"
            };
            let list: String = forwarders.iter().map(|ip| format!("{ip}; ")).collect();
            format!(
                "zone \"{name}\" {{\n\
                 \x20   type forward;\n\
                 \x20   forward {policy};\n\
                 \x20   forwarders {{ {list}}};\n\
                 }};\n"
            )
        }
    };

    ConfigFragment {
        path: artifact_path(name, zone.zone_type()),
        text,
    }
}
