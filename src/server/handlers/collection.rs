//! CRUD handlers shared by every [`Resource`]
//!
//! Authorization runs before the id, the query string or the body is looked
//! at, so an anonymous caller on a protected route always sees 401.

use super::{authorize, not_found, parse_id};
use crate::core::error::{PortalResult, ValidationError};
use crate::core::query::{PaginatedResponse, QueryParams};
use crate::core::validation::Valid;
use crate::entities::CreateContext;
use crate::server::extract::Session;
use crate::server::resource::{Access, Resource};
use crate::server::state::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequest, Path, Query, Request, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

/// `GET /api/{plural}?page=&limit=&status=`
///
/// Callers without admin rights only see publicly visible records.
pub async fn list<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> PortalResult<Json<PaginatedResponse<T>>> {
    authorize(T::LIST, &session, &state)?;
    let Query(params) = query.map_err(|rejection| ValidationError::InvalidQuery {
        message: rejection.body_text(),
    })?;

    let store = T::store(&state);
    let mut records = match params.status() {
        Some(status) => store.find_by("status", status).await?,
        None => store.list().await?,
    };
    if !session.is_admin(&state) {
        records.retain(|record| record.publicly_visible());
    }

    Ok(Json(params.paginate(records)))
}

/// `GET /api/{plural}/{id}`
pub async fn get<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> PortalResult<Json<T>> {
    authorize(T::READ, &session, &state)?;
    let id = parse_id(&id)?;

    let record = T::store(&state)
        .get(&id)
        .await?
        .filter(|record| record.publicly_visible() || session.is_admin(&state))
        .ok_or_else(|| not_found::<T>(id))?;

    Ok(Json(record))
}

/// `POST /api/{plural}`
pub async fn create<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    request: Request,
) -> PortalResult<(StatusCode, Json<T>)> {
    authorize(T::CREATE, &session, &state)?;
    let Valid(input) = Valid::<T::Create>::from_request(request, &state).await?;

    let ctx = CreateContext::new(&state.config.receipts, session.is_admin(&state));
    let record = T::from_create(input, &ctx)?;
    let created = T::store(&state).create(record).await?;

    tracing::info!(
        entity = T::resource_name_singular(),
        id = %created.id(),
        by = session.0.user_id().unwrap_or("public"),
        "record created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/{plural}/{id}`: merge the supplied fields into the record
pub async fn update<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    request: Request,
) -> PortalResult<Json<T>> {
    authorize(Access::Admin, &session, &state)?;
    let id = parse_id(&id)?;
    let Valid(input) = Valid::<T::Update>::from_request(request, &state).await?;

    let store = T::store(&state);
    let mut record = store.get(&id).await?.ok_or_else(|| not_found::<T>(id))?;
    record.apply_update(input)?;
    record.touch();
    let updated = store.update(&id, record).await?;

    tracing::info!(
        entity = T::resource_name_singular(),
        id = %id,
        by = session.0.user_id().unwrap_or("public"),
        "record updated"
    );
    Ok(Json(updated))
}

/// `DELETE /api/{plural}/{id}`
pub async fn delete<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> PortalResult<Json<Value>> {
    authorize(Access::Admin, &session, &state)?;
    let id = parse_id(&id)?;

    let store = T::store(&state);
    if store.get(&id).await?.is_none() {
        return Err(not_found::<T>(id));
    }
    store.delete(&id).await?;

    tracing::info!(
        entity = T::resource_name_singular(),
        id = %id,
        by = session.0.user_id().unwrap_or("public"),
        "record deleted"
    );
    Ok(Json(json!({ "id": id, "deleted": true })))
}
