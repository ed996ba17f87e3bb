//! Zone and record validation.
//!
//! Zone checks collect every problem at once so the operator can fix a form in
//! one pass. Record checks stop at the first problem. Nothing here touches the
//! database; the caller says whether the zone name is already taken.
use std::net::{Ipv4Addr, Ipv6Addr};

use regex::Regex;
use serde::Serialize;

use crate::model::{
    RecordCandidate, RecordType, ValidatedRecord, ValidatedZone, ZoneCandidate, ZoneKind,
    ZoneType,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name too long (max 253 characters)")]
    TooLong,
    #[error("label '{0}' is empty or longer than 63 characters")]
    BadLabelLength(String),
    #[error("label '{0}' contains invalid characters (only letters, digits, '_' and '-' allowed)")]
    InvalidCharacters(String),
    #[error("label '{0}' must not start or end with '-'")]
    LeadingOrTrailingHyphen(String),
}

lazy_static::lazy_static! {
    /// Letters, digits, '_' and '-'
    static ref LABEL_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

pub fn validate_label(label: &str) -> Result<(), NameError> {
    if label.is_empty() || label.len() > 63 {
        return Err(NameError::BadLabelLength(label.to_string()));
    }
    if !LABEL_RE.is_match(label) {
        return Err(NameError::InvalidCharacters(label.to_string()));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(NameError::LeadingOrTrailingHyphen(label.to_string()));
    }
    Ok(())
}

/// Checks a domain name, with or without its trailing dot.
pub fn validate_domain_name(domain: &str) -> Result<(), NameError> {
    let d = domain.strip_suffix('.').unwrap_or(domain);
    if d.is_empty() {
        return Err(NameError::Empty);
    }
    if d.len() > 253 {
        return Err(NameError::TooLong);
    }
    for label in d.split('.') {
        validate_label(label)?;
    }
    Ok(())
}

/// Field of a zone an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneField {
    Name,
    MasterIp,
    Forwarders,
    Ns1,
    Ns2,
    Ttl,
    Soa,
}

impl ZoneField {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneField::Name => "name",
            ZoneField::MasterIp => "master_ip",
            ZoneField::Forwarders => "forwarders",
            ZoneField::Ns1 => "ns1",
            ZoneField::Ns2 => "ns2",
            ZoneField::Ttl => "ttl",
            ZoneField::Soa => "soa",
        }
    }
}

impl std::fmt::Display for ZoneField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneValidationError {
    #[error("invalid zone name: {0}")]
    InvalidName(#[from] NameError),
    #[error("a zone named '{0}' already exists")]
    DuplicateName(String),
    #[error("{field} is required for {zone_type} zones")]
    MissingField {
        field: ZoneField,
        zone_type: ZoneType,
    },
    #[error("invalid master IP address '{0}'")]
    InvalidMasterIp(String),
    #[error("invalid forwarder address '{0}'")]
    InvalidForwarder(String),
}

impl ZoneValidationError {
    pub fn field(&self) -> ZoneField {
        match self {
            ZoneValidationError::InvalidName(_) | ZoneValidationError::DuplicateName(_) => {
                ZoneField::Name
            }
            ZoneValidationError::MissingField { field, .. } => *field,
            ZoneValidationError::InvalidMasterIp(_) => ZoneField::MasterIp,
            ZoneValidationError::InvalidForwarder(_) => ZoneField::Forwarders,
        }
    }
}

/// Trims a form value; blank values count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Host name without trailing dots; nothing left counts as absent.
fn present_host(value: &Option<String>) -> Option<String> {
    present(value)
        .map(|v| v.trim_end_matches('.'))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Zone name as it will be stored: surrounding whitespace and a single
/// trailing dot removed.
pub fn normalize_zone_name(name: &str) -> &str {
    let name = name.trim();
    name.strip_suffix('.').unwrap_or(name)
}

/// Parses a comma-separated forwarder list, reporting the first bad entry.
pub fn parse_forwarders(raw: &str) -> Result<Vec<Ipv4Addr>, ZoneValidationError> {
    raw.split(',')
        .map(str::trim)
        .map(|entry| {
            entry
                .parse::<Ipv4Addr>()
                .map_err(|_| ZoneValidationError::InvalidForwarder(entry.to_string()))
        })
        .collect()
}

/// Validates a zone candidate.
///
/// `name_taken` tells whether another zone already uses the candidate's
/// name. Fields that do not belong to the selected zone type are dropped:
/// the returned [`ZoneKind`] has no place to keep them.
pub fn validate_zone(
    candidate: &ZoneCandidate,
    name_taken: bool,
) -> Result<ValidatedZone, Vec<ZoneValidationError>> {
    let mut errors = Vec::new();

    let name = normalize_zone_name(&candidate.name).to_string();
    if let Err(e) = validate_domain_name(&name) {
        errors.push(e.into());
    } else if name_taken {
        errors.push(ZoneValidationError::DuplicateName(name.clone()));
    }

    let zone_type = candidate.zone_type;
    let missing = |field: ZoneField| ZoneValidationError::MissingField { field, zone_type };

    let kind = match zone_type {
        ZoneType::Master => {
            // NS hosts are rendered with a trailing dot appended.
            let ns1 = present_host(&candidate.ns1);
            let ns2 = present_host(&candidate.ns2);
            let ttl = candidate.ttl.filter(|ttl| *ttl != 0);
            let soa = present(&candidate.soa).map(str::to_string);

            if ns1.is_none() {
                errors.push(missing(ZoneField::Ns1));
            }
            if ns2.is_none() {
                errors.push(missing(ZoneField::Ns2));
            }
            if ttl.is_none() {
                errors.push(missing(ZoneField::Ttl));
            }
            if soa.is_none() {
                errors.push(missing(ZoneField::Soa));
            }

            match (ns1, ns2, ttl, soa) {
                (Some(ns1), Some(ns2), Some(ttl), Some(soa)) => {
                    Some(ZoneKind::Master { ns1, ns2, ttl, soa })
                }
                _ => None,
            }
        }
        ZoneType::Slave => match present(&candidate.master_ip) {
            None => {
                errors.push(missing(ZoneField::MasterIp));
                None
            }
            Some(raw) => match raw.parse::<Ipv4Addr>() {
                Ok(master_ip) => Some(ZoneKind::Slave { master_ip }),
                Err(_) => {
                    errors.push(ZoneValidationError::InvalidMasterIp(raw.to_string()));
                    None
                }
            },
        },
        ZoneType::Forward | ZoneType::Redirect => match present(&candidate.forwarders) {
            None => {
                errors.push(missing(ZoneField::Forwarders));
                None
            }
            Some(raw) => match parse_forwarders(raw) {
                Ok(forwarders) if zone_type == ZoneType::Forward => {
                    Some(ZoneKind::Forward { forwarders })
                }
                Ok(forwarders) => Some(ZoneKind::Redirect { forwarders }),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
        },
    };

    match kind {
        Some(kind) if errors.is_empty() => Ok(ValidatedZone {
            name,
            kind,
            description: present(&candidate.description).map(str::to_string),
        }),
        _ => Err(errors),
    }
}

/// Field of a record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Value,
    Priority,
    Ttl,
}

impl RecordField {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordField::Value => "value",
            RecordField::Priority => "priority",
            RecordField::Ttl => "ttl",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    #[error("value is required")]
    EmptyValue,
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidIpv4(String),
    #[error("'{0}' is not a valid IPv6 address")]
    InvalidIpv6(String),
    #[error("PTR target '{0}' must be fully qualified (end with '.')")]
    PtrNotFullyQualified(String),
    #[error("priority is required for {0} records")]
    MissingPriority(RecordType),
    #[error("TTL must be positive")]
    ZeroTtl,
    #[error("an identical {0} record already exists in this zone")]
    Duplicate(RecordType),
}

impl RecordValidationError {
    pub fn field(&self) -> RecordField {
        match self {
            RecordValidationError::MissingPriority(_) => RecordField::Priority,
            RecordValidationError::ZeroTtl => RecordField::Ttl,
            _ => RecordField::Value,
        }
    }
}

/// Validates a record candidate on its own; the duplicate check against the
/// zone's other records is left to the caller.
pub fn validate_record(
    candidate: &RecordCandidate,
) -> Result<ValidatedRecord, RecordValidationError> {
    let value = candidate.value.trim();
    if value.is_empty() {
        return Err(RecordValidationError::EmptyValue);
    }
    if candidate.ttl == 0 {
        return Err(RecordValidationError::ZeroTtl);
    }

    match candidate.record_type {
        RecordType::A => {
            value
                .parse::<Ipv4Addr>()
                .map_err(|_| RecordValidationError::InvalidIpv4(value.to_string()))?;
        }
        RecordType::Aaaa => {
            value
                .parse::<Ipv6Addr>()
                .map_err(|_| RecordValidationError::InvalidIpv6(value.to_string()))?;
        }
        RecordType::Ptr if !value.ends_with('.') => {
            return Err(RecordValidationError::PtrNotFullyQualified(
                value.to_string(),
            ));
        }
        t if t.requires_priority() && candidate.priority.is_none() => {
            return Err(RecordValidationError::MissingPriority(t));
        }
        // Other types are accepted as typed.
        _ => {}
    }

    Ok(ValidatedRecord {
        record_type: candidate.record_type,
        name: present(&candidate.name).map(str::to_string),
        value: value.to_string(),
        priority: candidate.priority,
        ttl: candidate.ttl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> ZoneCandidate {
        ZoneCandidate {
            ns1: Some("ns1.example.local".into()),
            ns2: Some("ns2.example.local".into()),
            ttl: Some(86400),
            soa: Some("admin.example.local.".into()),
            ..ZoneCandidate::new("example.local", ZoneType::Master)
        }
    }

    fn fields(errors: &[ZoneValidationError]) -> Vec<ZoneField> {
        errors.iter().map(ZoneValidationError::field).collect()
    }

    #[test]
    fn complete_master_zone_validates() {
        let zone = validate_zone(&master(), false).unwrap();
        assert_eq!(zone.name, "example.local");
        assert_eq!(
            zone.kind,
            ZoneKind::Master {
                ns1: "ns1.example.local".into(),
                ns2: "ns2.example.local".into(),
                ttl: 86400,
                soa: "admin.example.local.".into(),
            }
        );
    }

    #[test]
    fn master_reports_every_missing_field() {
        let candidate = ZoneCandidate::new("example.local", ZoneType::Master);
        let errors = validate_zone(&candidate, false).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![ZoneField::Ns1, ZoneField::Ns2, ZoneField::Ttl, ZoneField::Soa]
        );
    }

    #[test]
    fn master_zero_ttl_counts_as_missing() {
        let candidate = ZoneCandidate {
            ttl: Some(0),
            ..master()
        };
        let errors = validate_zone(&candidate, false).unwrap_err();
        assert_eq!(fields(&errors), vec![ZoneField::Ttl]);
    }

    #[test]
    fn master_blank_ns_counts_as_missing() {
        let candidate = ZoneCandidate {
            ns2: Some("   ".into()),
            ..master()
        };
        let errors = validate_zone(&candidate, false).unwrap_err();
        assert_eq!(fields(&errors), vec![ZoneField::Ns2]);
    }

    #[test]
    fn master_ns_of_only_dots_counts_as_missing() {
        for dots in [".", "..", " . "] {
            let candidate = ZoneCandidate {
                ns1: Some(dots.into()),
                ns2: Some(dots.into()),
                ..master()
            };
            let errors = validate_zone(&candidate, false).unwrap_err();
            assert_eq!(fields(&errors), vec![ZoneField::Ns1, ZoneField::Ns2], "ns {dots:?}");
        }
    }

    #[test]
    fn master_ns_trailing_dot_is_stripped() {
        let candidate = ZoneCandidate {
            ns1: Some("ns1.example.local.".into()),
            ..master()
        };
        let zone = validate_zone(&candidate, false).unwrap();
        assert_eq!(zone.kind.ns1(), Some("ns1.example.local"));
    }

    #[test]
    fn master_drops_foreign_fields() {
        let candidate = ZoneCandidate {
            forwarders: Some("8.8.8.8".into()),
            master_ip: Some("10.0.0.1".into()),
            ..master()
        };
        let zone = validate_zone(&candidate, false).unwrap();
        assert!(zone.kind.forwarders().is_none());
        assert!(zone.kind.master_ip().is_none());
    }

    #[test]
    fn slave_requires_master_ip() {
        let candidate = ZoneCandidate::new("example.local", ZoneType::Slave);
        let errors = validate_zone(&candidate, false).unwrap_err();
        assert_eq!(
            errors,
            vec![ZoneValidationError::MissingField {
                field: ZoneField::MasterIp,
                zone_type: ZoneType::Slave,
            }]
        );
    }

    #[test]
    fn slave_rejects_malformed_master_ip() {
        let candidate = ZoneCandidate {
            master_ip: Some("not-an-ip".into()),
            ..ZoneCandidate::new("example.local", ZoneType::Slave)
        };
        let errors = validate_zone(&candidate, false).unwrap_err();
        assert_eq!(
            errors,
            vec![ZoneValidationError::InvalidMasterIp("not-an-ip".into())]
        );
    }

    #[test]
    fn slave_clears_master_fields() {
        let candidate = ZoneCandidate {
            master_ip: Some("192.0.2.53".into()),
            zone_type: ZoneType::Slave,
            ..master()
        };
        let zone = validate_zone(&candidate, false).unwrap();
        assert_eq!(
            zone.kind,
            ZoneKind::Slave {
                master_ip: "192.0.2.53".parse().unwrap()
            }
        );
        assert!(zone.kind.ns1().is_none());
        assert!(zone.kind.soa().is_none());
    }

    #[test]
    fn forward_cites_first_bad_forwarder() {
        let candidate = ZoneCandidate {
            forwarders: Some("8.8.8.8, bad-ip".into()),
            ..ZoneCandidate::new("example.local", ZoneType::Forward)
        };
        let errors = validate_zone(&candidate, false).unwrap_err();
        assert_eq!(
            errors,
            vec![ZoneValidationError::InvalidForwarder("bad-ip".into())]
        );
        assert!(errors[0].to_string().contains("bad-ip"));
    }

    #[test]
    fn redirect_parses_forwarders_in_order() {
        let candidate = ZoneCandidate {
            forwarders: Some(" 8.8.8.8 ,8.8.4.4".into()),
            ..ZoneCandidate::new("corp.example", ZoneType::Redirect)
        };
        let zone = validate_zone(&candidate, false).unwrap();
        assert_eq!(
            zone.kind,
            ZoneKind::Redirect {
                forwarders: vec!["8.8.8.8".parse().unwrap(), "8.8.4.4".parse().unwrap()]
            }
        );
    }

    #[test]
    fn forward_requires_forwarders() {
        let candidate = ZoneCandidate::new("example.local", ZoneType::Forward);
        let errors = validate_zone(&candidate, false).unwrap_err();
        assert_eq!(fields(&errors), vec![ZoneField::Forwarders]);
    }

    #[test]
    fn taken_name_is_collected_with_other_errors() {
        let candidate = ZoneCandidate::new("example.local", ZoneType::Slave);
        let errors = validate_zone(&candidate, true).unwrap_err();
        assert_eq!(fields(&errors), vec![ZoneField::Name, ZoneField::MasterIp]);
        assert_eq!(
            errors[0],
            ZoneValidationError::DuplicateName("example.local".into())
        );
    }

    #[test]
    fn bad_names_are_rejected() {
        for name in ["", ".", "exa mple.local", "-bad.local", "a..b"] {
            let candidate = ZoneCandidate {
                name: name.into(),
                ..master()
            };
            let errors = validate_zone(&candidate, false).unwrap_err();
            assert_eq!(fields(&errors), vec![ZoneField::Name], "name {name:?}");
        }
    }

    #[test]
    fn reverse_names_are_accepted() {
        assert!(validate_domain_name("1.0.10.in-addr.arpa").is_ok());
        assert!(validate_domain_name("8.b.d.0.1.0.0.2.ip6.arpa.").is_ok());
    }

    #[test]
    fn a_record_requires_ipv4() {
        assert!(validate_record(&RecordCandidate::new(RecordType::A, "10.0.0.1")).is_ok());
        let err = validate_record(&RecordCandidate::new(RecordType::A, "10.0.0.999")).unwrap_err();
        assert_eq!(err, RecordValidationError::InvalidIpv4("10.0.0.999".into()));
        assert_eq!(err.field(), RecordField::Value);
    }

    #[test]
    fn aaaa_record_requires_ipv6() {
        assert!(validate_record(&RecordCandidate::new(RecordType::Aaaa, "2001:db8::1")).is_ok());
        let err = validate_record(&RecordCandidate::new(RecordType::Aaaa, "10.0.0.1")).unwrap_err();
        assert_eq!(err.field(), RecordField::Value);
    }

    #[test]
    fn ptr_record_requires_trailing_dot() {
        assert!(validate_record(&RecordCandidate::new(RecordType::Ptr, "host.example.")).is_ok());
        let err = validate_record(&RecordCandidate::new(RecordType::Ptr, "host.example")).unwrap_err();
        assert_eq!(
            err,
            RecordValidationError::PtrNotFullyQualified("host.example".into())
        );
    }

    #[test]
    fn mx_and_srv_require_priority() {
        for t in [RecordType::Mx, RecordType::Srv] {
            let mut candidate = RecordCandidate::new(t, "mail.example.local.");
            let err = validate_record(&candidate).unwrap_err();
            assert_eq!(err.field(), RecordField::Priority);

            candidate.priority = Some(10);
            assert!(validate_record(&candidate).is_ok());
        }
    }

    #[test]
    fn zero_priority_is_accepted() {
        // Preference 0 is a valid MX/SRV value, so only absence is rejected.
        for t in [RecordType::Mx, RecordType::Srv] {
            let candidate = RecordCandidate {
                priority: Some(0),
                ..RecordCandidate::new(t, "mail.example.local.")
            };
            assert_eq!(validate_record(&candidate).unwrap().priority, Some(0));
        }
    }

    #[test]
    fn free_form_types_only_need_a_value() {
        for t in [RecordType::Cname, RecordType::Txt, RecordType::Ns, RecordType::Caa] {
            assert!(validate_record(&RecordCandidate::new(t, "anything goes")).is_ok());
            assert_eq!(
                validate_record(&RecordCandidate::new(t, "  ")).unwrap_err(),
                RecordValidationError::EmptyValue
            );
        }
    }

    #[test]
    fn blank_record_name_becomes_none() {
        let candidate = RecordCandidate {
            name: Some("".into()),
            ..RecordCandidate::new(RecordType::Txt, "v=spf1 -all")
        };
        assert_eq!(validate_record(&candidate).unwrap().name, None);
    }

    #[test]
    fn zero_record_ttl_is_rejected() {
        let candidate = RecordCandidate {
            ttl: 0,
            ..RecordCandidate::new(RecordType::A, "10.0.0.1")
        };
        assert_eq!(
            validate_record(&candidate).unwrap_err().field(),
            RecordField::Ttl
        );
    }
}
