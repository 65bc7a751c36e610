use axum::{
    extract::{Path, State},
    Extension, Json,
};
use laudo_db::AddressDirectory;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct PropertyTypeItem {
    id: i64,
    name: String,
}

pub(super) async fn list_addresses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(state_code): Path<String>,
) -> Result<Json<ApiResponse<AddressDirectory>>, ApiError> {
    let state_code = state_code.trim();
    if state_code.is_empty() {
        return Err(ApiError::validation(req_id.0, "state code is required"));
    }

    let directory = laudo_db::list_address_directory(&state.pool, state_code)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: directory,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_property_types(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<PropertyTypeItem>>>, ApiError> {
    let rows = laudo_db::list_property_types(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| PropertyTypeItem {
            id: row.id,
            name: row.name,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
