//! CRUD handlers shared by every resource.
//!
//! Each handler is generic over [`Entity`] and is instantiated once per
//! resource by the router. The protocol is the same for all five:
//!
//! | Operation | Success | Failure |
//! |---|---|---|
//! | list | 200, array | - |
//! | get | 200, record | 404 |
//! | create | 201, record + `Location` | 400 validation or conflict |
//! | update | 204 | 400 id mismatch or validation; 404 |
//! | delete | 204 | 404 |
//!
//! A concurrency conflict reported by the store is never retried: an update
//! whose row vanished answers 404, anything else is a 500.

use crate::error::AppError;
use crate::extractors::{CorrelationId, IdPath, JsonBody};
use crate::state::AppState;
use crate::WebResult;
use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    Json,
};
use eventhub_core::{ChangeSet, Entity, RecordId, SaveOutcome, Version};

/// Path under which a stored record is served.
#[must_use]
pub fn location<T: Entity>(id: RecordId) -> String {
    format!("/api/{}/{id}", T::KIND.route())
}

fn concurrency_fault<T: Entity>(id: RecordId, expected: Version, actual: Version) -> AppError {
    AppError::internal("An internal error occurred").with_source(anyhow::anyhow!(
        "concurrency conflict on {} {id}: read at version {expected}, found {actual}",
        T::KIND
    ))
}

/// `GET /api/{resource}`
///
/// # Errors
///
/// 500 when the store fails.
pub async fn list<T: Entity>(State(state): State<AppState>) -> WebResult<Json<Vec<T>>> {
    let records = T::repository(state.db()).list().await?;
    Ok(Json(records))
}

/// `GET /api/{resource}/:id`
///
/// # Errors
///
/// 404 when no record has `id`.
pub async fn get<T: Entity>(
    State(state): State<AppState>,
    path: IdPath<T>,
) -> WebResult<Json<T>> {
    T::repository(state.db())
        .find(path.id())
        .await?
        .map(|found| Json(found.record))
        .ok_or_else(|| AppError::not_found(T::KIND))
}

/// `POST /api/{resource}`
///
/// Any id in the body is ignored; the store assigns one.
///
/// # Errors
///
/// 400 when the body fails validation or collides with a stored record.
pub async fn create<T: Entity>(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    JsonBody(record): JsonBody<T>,
) -> WebResult<(StatusCode, [(HeaderName, String); 1], Json<T>)> {
    record.validate().map_err(AppError::validation)?;

    let repository = T::repository(state.db());
    let existing = repository.list().await?;
    if let Some(message) = record.conflict(&existing) {
        return Err(AppError::conflict(message));
    }

    let mut changes = ChangeSet::new();
    changes.add(record.with_id(RecordId::UNASSIGNED));

    let created = match repository.save(changes).await? {
        SaveOutcome::Committed(mut stored) => stored.pop(),
        SaveOutcome::NotFound(_) | SaveOutcome::ConcurrencyConflict { .. } => None,
    }
    .ok_or_else(|| {
        AppError::internal("An internal error occurred").with_source(anyhow::anyhow!(
            "insert into {} did not return the stored record",
            T::KIND
        ))
    })?;

    let id = created.id();
    tracing::info!(
        correlation_id = %correlation_id.0,
        resource = %T::KIND,
        %id,
        "Record created"
    );

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location::<T>(id))],
        Json(created),
    ))
}

/// `PUT /api/{resource}/:id`
///
/// Full replacement; the id in the body must equal the path id.
///
/// # Errors
///
/// 400 on id mismatch or validation failure, 404 when the record does not
/// exist, 500 when the store reports a conflict on a record that still exists.
pub async fn update<T: Entity>(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    path: IdPath<T>,
    JsonBody(record): JsonBody<T>,
) -> WebResult<StatusCode> {
    let id = path.id();
    if record.id() != id {
        return Err(AppError::bad_request(T::KIND.id_mismatch_message()));
    }
    record.validate().map_err(AppError::validation)?;

    let repository = T::repository(state.db());
    let mut changes = ChangeSet::new();
    changes.update(record);

    match repository.save(changes).await? {
        SaveOutcome::Committed(_) => {
            tracing::info!(
                correlation_id = %correlation_id.0,
                resource = %T::KIND,
                %id,
                "Record updated"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        SaveOutcome::NotFound(_) => Err(AppError::not_found(T::KIND)),
        SaveOutcome::ConcurrencyConflict {
            id: conflicted,
            expected,
            actual,
        } => {
            if repository.exists(id).await? {
                Err(concurrency_fault::<T>(conflicted, expected, actual))
            } else {
                Err(AppError::not_found(T::KIND))
            }
        }
    }
}

/// `DELETE /api/{resource}/:id`
///
/// # Errors
///
/// 404 when the record does not exist or disappears before the delete
/// commits, 500 when it changed in between.
pub async fn delete<T: Entity>(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    path: IdPath<T>,
) -> WebResult<StatusCode> {
    let id = path.id();
    let repository = T::repository(state.db());
    let found = repository
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found(T::KIND))?;

    let mut changes = ChangeSet::<T>::new();
    changes.remove_tracked(id, found.version);

    match repository.save(changes).await? {
        SaveOutcome::Committed(_) => {
            tracing::info!(
                correlation_id = %correlation_id.0,
                resource = %T::KIND,
                %id,
                "Record deleted"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        SaveOutcome::NotFound(_) => Err(AppError::not_found(T::KIND)),
        SaveOutcome::ConcurrencyConflict {
            id: conflicted,
            expected,
            actual,
        } => Err(concurrency_fault::<T>(conflicted, expected, actual)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_core::{Category, Participation};

    #[test]
    fn location_uses_resource_route() {
        assert_eq!(location::<Category>(RecordId::new(4)), "/api/categoria/4");
        assert_eq!(
            location::<Participation>(RecordId::new(12)),
            "/api/participante/12"
        );
    }

    #[test]
    fn concurrency_fault_hides_details() {
        let err = concurrency_fault::<Category>(RecordId::new(1), Version::new(2), Version::new(3));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("version"));
    }
}
