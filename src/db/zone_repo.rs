//! Repository functions for manipulating rows in the `zones` table.
//!
//! A row keeps every type-specific column; the ones that do not belong to the
//! zone's type are always written as NULL.
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::model::{ValidatedZone, Zone, ZoneKind, ZoneType, join_forwarders};
use crate::validation::parse_forwarders;

const ZONE_COLUMNS: &str = r#"
    id,
    name,
    zone_type,
    master_ip,
    forwarders,
    ns1,
    ns2,
    ttl,
    soa,
    serial,
    description,
    updated_at
"#;

fn decode_error(msg: String) -> sqlx::Error {
    sqlx::Error::Decode(msg.into())
}

fn required<T>(value: Option<T>, column: &str, zone_type: ZoneType) -> sqlx::Result<T> {
    value.ok_or_else(|| decode_error(format!("{column} is NULL for a {zone_type} zone")))
}

fn zone_from_row(row: &SqliteRow) -> sqlx::Result<Zone> {
    let zone_type: String = row.try_get("zone_type")?;
    let zone_type: ZoneType = zone_type
        .parse()
        .map_err(|e: crate::model::UnknownZoneType| decode_error(e.to_string()))?;

    let forwarders = |row: &SqliteRow| -> sqlx::Result<Vec<Ipv4Addr>> {
        let raw: Option<String> = row.try_get("forwarders")?;
        parse_forwarders(&required(raw, "forwarders", zone_type)?)
            .map_err(|e| decode_error(e.to_string()))
    };

    let kind = match zone_type {
        ZoneType::Master => ZoneKind::Master {
            ns1: required(row.try_get("ns1")?, "ns1", zone_type)?,
            ns2: required(row.try_get("ns2")?, "ns2", zone_type)?,
            ttl: required(row.try_get("ttl")?, "ttl", zone_type)?,
            soa: required(row.try_get("soa")?, "soa", zone_type)?,
        },
        ZoneType::Slave => {
            let raw: Option<String> = row.try_get("master_ip")?;
            let master_ip = required(raw, "master_ip", zone_type)?
                .parse::<Ipv4Addr>()
                .map_err(|e| decode_error(format!("master_ip: {e}")))?;
            ZoneKind::Slave { master_ip }
        }
        ZoneType::Forward => ZoneKind::Forward {
            forwarders: forwarders(row)?,
        },
        ZoneType::Redirect => ZoneKind::Redirect {
            forwarders: forwarders(row)?,
        },
    };

    Ok(Zone {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        kind,
        serial: row.try_get("serial")?,
        description: row.try_get("description")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

/// Id of the zone using `name`, if any.
pub async fn find_id_by_name(db: &SqlitePool, name: &str) -> sqlx::Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM zones WHERE name = ?")
        .bind(name)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|r| r.0))
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Zone>> {
    let row = sqlx::query(&format!("SELECT {ZONE_COLUMNS} FROM zones WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;

    row.as_ref().map(zone_from_row).transpose()
}

/// All zones, most recently changed first.
pub async fn list(db: &SqlitePool) -> sqlx::Result<Vec<Zone>> {
    let rows = sqlx::query(&format!(
        "SELECT {ZONE_COLUMNS} FROM zones ORDER BY updated_at DESC, id DESC"
    ))
    .fetch_all(db)
    .await?;

    rows.iter().map(zone_from_row).collect()
}

/// Store a freshly validated zone with its first serial.
pub async fn insert(db: &SqlitePool, zone: &ValidatedZone, serial: i64) -> sqlx::Result<i64> {
    let now = Utc::now();
    let kind = &zone.kind;

    let res = sqlx::query(
        r#"
        INSERT INTO zones (
            name,
            zone_type,
            master_ip,
            forwarders,
            ns1,
            ns2,
            ttl,
            soa,
            serial,
            description,
            created_at,
            updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(zone.name.as_str())
    .bind(kind.zone_type().as_str())
    .bind(kind.master_ip().map(|ip| ip.to_string()))
    .bind(kind.forwarders().map(join_forwarders))
    .bind(kind.ns1())
    .bind(kind.ns2())
    .bind(kind.ttl())
    .bind(kind.soa())
    .bind(serial)
    .bind(zone.description.as_deref())
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;

    Ok(res.last_insert_rowid())
}

/// Overwrite every column of an existing zone. Returns false when the id is
/// unknown.
pub async fn update(
    db: &SqlitePool,
    id: i64,
    zone: &ValidatedZone,
    serial: i64,
) -> sqlx::Result<bool> {
    let now = Utc::now();
    let kind = &zone.kind;

    let res = sqlx::query(
        r#"
        UPDATE zones
        SET
            name = ?,
            zone_type = ?,
            master_ip = ?,
            forwarders = ?,
            ns1 = ?,
            ns2 = ?,
            ttl = ?,
            soa = ?,
            serial = ?,
            description = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(zone.name.as_str())
    .bind(kind.zone_type().as_str())
    .bind(kind.master_ip().map(|ip| ip.to_string()))
    .bind(kind.forwarders().map(join_forwarders))
    .bind(kind.ns1())
    .bind(kind.ns2())
    .bind(kind.ttl())
    .bind(kind.soa())
    .bind(serial)
    .bind(zone.description.as_deref())
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    Ok(res.rows_affected() > 0)
}

/// Delete a zone; its records go with it.
pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM zones WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
