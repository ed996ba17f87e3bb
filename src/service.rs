//! Zone and record operations used by the web layer.
//!
//! Every zone mutation runs validation, assigns the next serial, commits the
//! row and only then regenerates the zone's configuration file. The database
//! is authoritative: a failed file write is logged and reported as
//! [`ConfigOutcome::Pending`], never rolled back.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::bind::classify::{Classification, classify};
use crate::bind::render::{artifact_path, render};
use crate::bind::serial::{next_serial, seed};
use crate::db::{is_unique_violation, record_repo, zone_repo};
use crate::error::AppError;
use crate::model::{Record, RecordCandidate, Zone, ZoneCandidate, ZoneType, join_forwarders};
use crate::validation::{
    RecordValidationError, ZoneValidationError, normalize_zone_name, validate_record,
    validate_zone,
};
use crate::AppState;

/// What happened to the on-disk configuration after a committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfigOutcome {
    Written { path: PathBuf },
    Removed { paths: Vec<PathBuf> },
    /// The change is stored but the files could not be updated; a resync
    /// will regenerate them.
    Pending { reason: String },
}

impl ConfigOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, ConfigOutcome::Pending { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneMutation {
    pub zone_id: i64,
    pub serial: i64,
    pub config: ConfigOutcome,
}

/// Flat view of a zone for listings and detail pages.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneSummary {
    pub id: i64,
    pub name: String,
    pub zone_type: ZoneType,
    pub master_ip: Option<String>,
    pub forwarders: Option<String>,
    pub ns1: Option<String>,
    pub ns2: Option<String>,
    pub ttl: Option<u32>,
    pub soa: Option<String>,
    pub serial: i64,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub classification: Classification,
}

impl From<&Zone> for ZoneSummary {
    fn from(zone: &Zone) -> Self {
        let kind = &zone.kind;
        Self {
            id: zone.id,
            name: zone.name.clone(),
            zone_type: zone.zone_type(),
            master_ip: kind.master_ip().map(|ip| ip.to_string()),
            forwarders: kind.forwarders().map(join_forwarders),
            ns1: kind.ns1().map(str::to_string),
            ns2: kind.ns2().map(str::to_string),
            ttl: kind.ttl(),
            soa: kind.soa().map(str::to_string),
            serial: zone.serial,
            description: zone.description.clone(),
            updated_at: zone.updated_at,
            classification: classify(&zone.name, zone.zone_type()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneView {
    pub zone: ZoneSummary,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResyncReport {
    pub written: Vec<PathBuf>,
    pub pending: Vec<String>,
}

fn duplicate_name(name: String) -> AppError {
    vec![ZoneValidationError::DuplicateName(name)].into()
}

async fn load_zone(state: &AppState, id: i64) -> Result<Zone, AppError> {
    zone_repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Render a stored zone and write it out.
fn publish(state: &AppState, zone: &Zone) -> ConfigOutcome {
    let fragment = render(zone, state.config.zones_root());
    match state.writer.write(&fragment) {
        Ok(path) => {
            info!("config for zone {} written to {}", zone.name, path.display());
            ConfigOutcome::Written { path }
        }
        Err(e) => {
            warn!("config for zone {} not written: {e}", zone.name);
            ConfigOutcome::Pending {
                reason: e.to_string(),
            }
        }
    }
}

/// Remove a zone's files.
fn retire(state: &AppState, name: &str, zone_type: ZoneType) -> ConfigOutcome {
    match state.writer.remove_artifacts(name, zone_type) {
        Ok(paths) => ConfigOutcome::Removed { paths },
        Err(e) => {
            warn!("config for zone {name} not removed: {e}");
            ConfigOutcome::Pending {
                reason: e.to_string(),
            }
        }
    }
}

pub async fn list_zones(state: &AppState) -> Result<Vec<ZoneSummary>, AppError> {
    let zones = zone_repo::list(&state.db).await?;
    Ok(zones.iter().map(ZoneSummary::from).collect())
}

pub async fn create_zone(
    state: &AppState,
    candidate: &ZoneCandidate,
) -> Result<ZoneMutation, AppError> {
    let name = normalize_zone_name(&candidate.name);
    let taken = zone_repo::find_id_by_name(&state.db, name).await?.is_some();
    let zone = validate_zone(candidate, taken)?;

    let serial = next_serial(seed(Utc::now()));
    let id = match zone_repo::insert(&state.db, &zone, serial).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => return Err(duplicate_name(zone.name)),
        Err(e) => return Err(e.into()),
    };
    info!(
        "created {} zone {} (id {id}, serial {serial})",
        zone.kind.zone_type(),
        zone.name
    );

    let stored = load_zone(state, id).await?;
    Ok(ZoneMutation {
        zone_id: id,
        serial,
        config: publish(state, &stored),
    })
}

pub async fn update_zone(
    state: &AppState,
    id: i64,
    candidate: &ZoneCandidate,
) -> Result<ZoneMutation, AppError> {
    let current = load_zone(state, id).await?;

    let name = normalize_zone_name(&candidate.name);
    let taken = zone_repo::find_id_by_name(&state.db, name)
        .await?
        .is_some_and(|other| other != id);
    let zone = validate_zone(candidate, taken)?;

    let serial = next_serial(current.serial);
    match zone_repo::update(&state.db, id, &zone, serial).await {
        Ok(true) => {}
        Ok(false) => return Err(AppError::NotFound),
        Err(e) if is_unique_violation(&e) => return Err(duplicate_name(zone.name)),
        Err(e) => return Err(e.into()),
    }
    info!("updated zone {} (id {id}, serial {serial})", zone.name);

    let stored = load_zone(state, id).await?;
    let mut config = publish(state, &stored);

    // Files of the old name or type would otherwise linger next to the new
    // ones. A path shared with the new fragment was just replaced in place.
    if current.name != stored.name || current.zone_type() != stored.zone_type() {
        let keep = artifact_path(&stored.name, stored.zone_type());
        if let Err(e) = state
            .writer
            .remove_stale(&current.name, current.zone_type(), Some(&keep))
        {
            warn!("stale config for zone {} not removed: {e}", current.name);
            config = match config {
                ConfigOutcome::Pending { reason } => ConfigOutcome::Pending {
                    reason: format!("{reason}; {e}"),
                },
                _ => ConfigOutcome::Pending {
                    reason: e.to_string(),
                },
            };
        }
    }

    Ok(ZoneMutation {
        zone_id: id,
        serial,
        config,
    })
}

/// Remove a zone's files, then the zone and its records.
pub async fn delete_zone(state: &AppState, id: i64) -> Result<ConfigOutcome, AppError> {
    let zone = load_zone(state, id).await?;
    let config = retire(state, &zone.name, zone.zone_type());

    if !zone_repo::delete(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    info!("deleted zone {} (id {id})", zone.name);

    Ok(config)
}

pub async fn get_zone_with_records(state: &AppState, id: i64) -> Result<ZoneView, AppError> {
    let zone = load_zone(state, id).await?;
    let records = record_repo::list_for_zone(&state.db, id).await?;
    Ok(ZoneView {
        zone: ZoneSummary::from(&zone),
        records,
    })
}

pub async fn create_record(
    state: &AppState,
    zone_id: i64,
    candidate: &RecordCandidate,
) -> Result<i64, AppError> {
    let zone = load_zone(state, zone_id).await?;
    let record = validate_record(candidate)?;

    let duplicate = RecordValidationError::Duplicate(record.record_type);
    if record_repo::exists_identical(&state.db, zone_id, &record).await? {
        return Err(duplicate.into());
    }
    let id = match record_repo::insert(&state.db, zone_id, &record).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => return Err(duplicate.into()),
        Err(e) => return Err(e.into()),
    };
    info!(
        "added {} record {id} to zone {}",
        record.record_type, zone.name
    );
    Ok(id)
}

pub async fn delete_record(state: &AppState, zone_id: i64, record_id: i64) -> Result<(), AppError> {
    if !record_repo::delete(&state.db, zone_id, record_id).await? {
        return Err(AppError::NotFound);
    }
    info!("deleted record {record_id} from zone {zone_id}");
    Ok(())
}

/// Regenerate the files of every stored zone.
pub async fn resync(state: &AppState) -> Result<ResyncReport, AppError> {
    let zones = zone_repo::list(&state.db).await?;
    let mut report = ResyncReport::default();
    for zone in &zones {
        match publish(state, zone) {
            ConfigOutcome::Written { path } => report.written.push(path),
            _ => report.pending.push(zone.name.clone()),
        }
    }
    info!(
        "resync finished: {} written, {} pending",
        report.written.len(),
        report.pending.len()
    );
    Ok(report)
}
