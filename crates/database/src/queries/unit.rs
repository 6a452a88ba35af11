use milsym::database::{DatabaseError, DeleteResult, Result};
use model::{
    feature::{UnitFeature, UnitFeaturePatch},
    WithId,
};
use sqlx::{types::Json, Executor, Postgres};
use utility::id::Id;

use crate::data_model::{unit::UnitRow, with_ids, DatabaseRow};

use super::convert_error;

pub async fn insert<'c, E>(executor: E, unit: &UnitFeature) -> Result<WithId<UnitFeature>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO units (document)
        VALUES ($1)
        RETURNING id, document;
        ",
    )
    .bind(Json(unit))
    .fetch_one(executor)
    .await
    .map(|row: UnitRow| row.to_model())
    .map_err(convert_error)
}

pub async fn get<'c, E>(executor: E, id: &Id<UnitFeature>) -> Result<WithId<UnitFeature>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, document
        FROM units
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(|row: UnitRow| row.to_model())
    .ok_or(DatabaseError::NotFound)
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<UnitFeature>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, document
        FROM units
        ORDER BY seq;
        ",
    )
    .fetch_all(executor)
    .await
    .map(|rows: Vec<UnitRow>| with_ids(rows))
    .map_err(convert_error)
}

pub async fn get_page<'c, E>(
    executor: E,
    offset: usize,
    limit: usize,
) -> Result<Vec<WithId<UnitFeature>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, document
        FROM units
        ORDER BY seq
        LIMIT $1 OFFSET $2;
        ",
    )
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .bind(i64::try_from(offset).unwrap_or(i64::MAX))
    .fetch_all(executor)
    .await
    .map(|rows: Vec<UnitRow>| with_ids(rows))
    .map_err(convert_error)
}

/// Merges the patch into the stored document. The patch serializes only its
/// supplied members, so `||` replaces exactly those top level keys.
pub async fn update<'c, E>(
    executor: E,
    id: &Id<UnitFeature>,
    patch: &UnitFeaturePatch,
) -> Result<WithId<UnitFeature>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE units
        SET document = document || $2
        WHERE id = $1
        RETURNING id, document;
        ",
    )
    .bind(id.raw())
    .bind(Json(patch))
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(|row: UnitRow| row.to_model())
    .ok_or(DatabaseError::NotFound)
}

pub async fn delete<'c, E>(executor: E, id: &Id<UnitFeature>) -> Result<DeleteResult>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        DELETE FROM units
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .execute(executor)
    .await
    .map(|result| DeleteResult {
        deleted_count: result.rows_affected(),
    })
    .map_err(convert_error)
}
