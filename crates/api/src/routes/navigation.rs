//! Local save endpoint for the navigation envelope, plus the TypeScript and
//! JSON export artifacts built from whatever was saved last.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use navedit_core::codegen;
use navedit_core::error::CoreError;
use navedit_core::navigation::{FooterData, HeaderData, LayoutConfig};
use navedit_core::serializer::{self, Imported};
use navedit_core::storage::{NavigationStorageData, STORAGE_KEY, STORAGE_VERSION};
use navedit_core::types::Timestamp;
use navedit_core::validation::{FieldError, ValidationReport};
use navedit_events::{event_types, EditorEvent};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a successful save.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub last_updated: Timestamp,
}

/// Mount navigation routes (nested under `/api/navigation`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_navigation).post(save_navigation))
        .route("/export/typescript", get(export_typescript))
        .route("/export/json", get(export_json))
}

/// Read the saved envelope. `None` when nothing has been saved yet.
fn load_stored(state: &AppState) -> AppResult<Option<NavigationStorageData>> {
    let Some(raw) = state.store.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| AppError::InternalError(format!("Stored navigation data is corrupt: {e}")))
}

fn require_stored(state: &AppState) -> AppResult<NavigationStorageData> {
    load_stored(state)?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Navigation data",
            id: STORAGE_KEY.to_string(),
        })
    })
}

/// Collect a section's structural errors under `section.field`.
fn check_section<T>(
    obj: &Map<String, Value>,
    section: &str,
    parse: impl FnOnce(&str) -> Imported<T>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let Some(value) = obj.get(section) else {
        errors.push(FieldError::new(section, format!("{section} is required")));
        return None;
    };
    let imported = parse(&value.to_string());
    if imported.validation.valid {
        return Some(imported.value);
    }
    errors.extend(imported.validation.errors.into_iter().map(|e| FieldError {
        field: format!("{section}.{}", e.field),
        message: e.message,
    }));
    None
}

/// Structural checks for a submitted envelope.
///
/// `headerData` and `footerData` are required and must have the shape the
/// editor writes. `layout` defaults when absent and `lastUpdated` defaults
/// to now; the client's stamp is kept so local and remote copies reconcile.
fn parse_submission(body: &[u8]) -> AppResult<NavigationStorageData> {
    let value: Value = serde_json::from_slice(body).map_err(CoreError::from)?;
    let Some(obj) = value.as_object() else {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".into(),
        ));
    };

    let mut errors = Vec::new();
    let header: Option<HeaderData> =
        check_section(obj, "headerData", serializer::deserialize_header_data, &mut errors);
    let footer: Option<FooterData> =
        check_section(obj, "footerData", serializer::deserialize_footer_data, &mut errors);

    let layout = match obj.get("layout") {
        None | Some(Value::Null) => Some(LayoutConfig::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| errors.push(FieldError::new("layout", format!("Invalid layout: {e}"))))
            .ok(),
    };

    let last_updated = match obj.get("lastUpdated") {
        None | Some(Value::Null) => Some(Utc::now()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|_| {
                errors.push(FieldError::new(
                    "lastUpdated",
                    "lastUpdated must be an ISO-8601 timestamp",
                ))
            })
            .ok(),
    };

    match (header, footer, layout, last_updated) {
        (Some(header_data), Some(footer_data), Some(layout), Some(last_updated))
            if errors.is_empty() =>
        {
            Ok(NavigationStorageData {
                header_data,
                footer_data,
                layout,
                last_updated,
                version: STORAGE_VERSION.to_string(),
            })
        }
        _ => Err(AppError::Validation(ValidationReport::from_errors(errors))),
    }
}

/// GET /api/navigation
async fn get_navigation(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = require_stored(&state)?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/navigation
async fn save_navigation(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let data = parse_submission(&body)?;
    let json = serde_json::to_string_pretty(&data).map_err(CoreError::from)?;
    state.store.set(STORAGE_KEY, &json)?;

    tracing::info!(
        store = state.store.name(),
        last_updated = %data.last_updated,
        "Saved navigation data",
    );
    state.event_bus.publish(
        EditorEvent::new(event_types::NAVIGATION_SAVED)
            .with_payload(json!({ "lastUpdated": data.last_updated, "source": "api" })),
    );

    Ok(Json(DataResponse {
        data: SaveResponse {
            success: true,
            last_updated: data.last_updated,
        },
    }))
}

/// GET /api/navigation/export/typescript
async fn export_typescript(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = require_stored(&state)?;
    let source = codegen::to_typescript(&data.header_data, &data.footer_data);
    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"navigation.ts\""),
        ],
        source,
    ))
}

/// GET /api/navigation/export/json
async fn export_json(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = require_stored(&state)?;
    let export = serializer::serialize_export(&data.header_data, &data.footer_data, &data.layout);
    Ok((
        [
            (CONTENT_TYPE, "application/json"),
            (CONTENT_DISPOSITION, "attachment; filename=\"navigation.json\""),
        ],
        export,
    ))
}
