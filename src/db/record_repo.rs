//! Repository functions for the `records` table.
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::model::{Record, RecordType, ValidatedRecord};

fn record_from_row(row: &SqliteRow) -> sqlx::Result<Record> {
    let record_type: String = row.try_get("record_type")?;
    let record_type: RecordType = record_type
        .parse()
        .map_err(|e: crate::model::UnknownRecordType| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Record {
        id: row.try_get("id")?,
        zone_id: row.try_get("zone_id")?,
        record_type,
        name: row.try_get("name")?,
        value: row.try_get("value")?,
        priority: row.try_get("priority")?,
        ttl: row.try_get("ttl")?,
    })
}

/// Records of one zone in insertion order.
pub async fn list_for_zone(db: &SqlitePool, zone_id: i64) -> sqlx::Result<Vec<Record>> {
    let rows = sqlx::query(
        r#"
        SELECT id, zone_id, record_type, name, value, priority, ttl
        FROM records
        WHERE zone_id = ?
        ORDER BY id
        "#,
    )
    .bind(zone_id)
    .fetch_all(db)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// Whether the zone already holds a record with the same name, type and
/// value. A missing name only matches another missing name.
pub async fn exists_identical(
    db: &SqlitePool,
    zone_id: i64,
    record: &ValidatedRecord,
) -> sqlx::Result<bool> {
    let cnt: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM records
        WHERE zone_id = ? AND name IS ? AND record_type = ? AND value = ?
        "#,
    )
    .bind(zone_id)
    .bind(record.name.as_deref())
    .bind(record.record_type.as_str())
    .bind(record.value.as_str())
    .fetch_one(db)
    .await?;
    Ok(cnt.0 > 0)
}

pub async fn insert(db: &SqlitePool, zone_id: i64, record: &ValidatedRecord) -> sqlx::Result<i64> {
    let res = sqlx::query(
        r#"
        INSERT INTO records (
            zone_id,
            record_type,
            name,
            value,
            priority,
            ttl,
            created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(zone_id)
    .bind(record.record_type.as_str())
    .bind(record.name.as_deref())
    .bind(record.value.as_str())
    .bind(record.priority)
    .bind(record.ttl)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(res.last_insert_rowid())
}

/// Delete one record of a zone. Returns false when no such record exists in
/// that zone.
pub async fn delete(db: &SqlitePool, zone_id: i64, record_id: i64) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM records WHERE id = ? AND zone_id = ?")
        .bind(record_id)
        .bind(zone_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
