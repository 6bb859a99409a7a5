//! Site settings exposed as a single key → value map

use crate::core::Entity;
use crate::core::error::{PortalError, PortalResult, ValidationError};
use crate::core::validation::{Valid, validators};
use crate::entities::Setting;
use crate::entities::setting::SettingValue;
use crate::server::extract::AdminSession;
use crate::server::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Map, Value, json};

fn check_key(key: &str) -> Result<(), PortalError> {
    validators::setting_key(key).map_err(|e| {
        ValidationError::FieldError {
            field: "key".to_string(),
            message: e
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string()),
        }
        .into()
    })
}

/// `GET /api/settings`
pub async fn list(State(state): State<AppState>) -> PortalResult<Json<Map<String, Value>>> {
    let mut settings = state.stores.settings.list().await?;
    settings.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(Json(
        settings
            .into_iter()
            .map(|setting| (setting.key, setting.value))
            .collect(),
    ))
}

/// `PUT /api/settings/{key}`: create or replace one value
pub async fn upsert(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(key): Path<String>,
    Valid(body): Valid<SettingValue>,
) -> PortalResult<Json<Setting>> {
    check_key(&key)?;
    let store = &state.stores.settings;

    let saved = match store.find_by("key", &key).await?.into_iter().next() {
        Some(mut setting) => {
            setting.value = body.value;
            setting.touch();
            store.update(&setting.id, setting.clone()).await?
        }
        None => store.create(Setting::new(key.clone(), body.value)).await?,
    };

    tracing::info!(key = %key, "setting saved");
    Ok(Json(saved))
}

/// `DELETE /api/settings/{key}`
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(key): Path<String>,
) -> PortalResult<Json<Value>> {
    check_key(&key)?;
    let store = &state.stores.settings;

    let Some(setting) = store.find_by("key", &key).await?.into_iter().next() else {
        return Err(super::not_found::<Setting>(&key));
    };
    store.delete(&setting.id).await?;

    tracing::info!(key = %key, "setting deleted");
    Ok(Json(json!({ "key": key, "deleted": true })))
}
