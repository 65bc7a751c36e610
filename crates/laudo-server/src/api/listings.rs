use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use laudo_core::{filter_text, parse_area_param};
use laudo_db::{ListingRow, ListingSearch};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    attribute_filters, map_db_error, ApiError, ApiResponse, AppState, ResponseMeta,
};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 2000;

#[derive(Debug, Serialize)]
pub(super) struct ListingItem {
    id: i64,
    state_code: String,
    city: String,
    neighborhood: String,
    address: Option<String>,
    property_type: Option<String>,
    title: String,
    area_text: Option<String>,
    area_m2: Option<f64>,
    bedrooms: Option<i32>,
    suites: Option<i32>,
    parking_spaces: Option<i32>,
    price_text: Option<String>,
    price_value: Option<f64>,
    price_per_m2_text: Option<String>,
    transaction_type: Option<String>,
    scraped_at: DateTime<Utc>,
}

impl From<ListingRow> for ListingItem {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            state_code: row.state_code,
            city: row.city,
            neighborhood: row.neighborhood,
            address: row.address,
            property_type: row.property_type,
            title: row.title,
            area_text: row.area_text,
            area_m2: row.area_m2,
            bedrooms: row.bedrooms,
            suites: row.suites,
            parking_spaces: row.parking_spaces,
            price_text: row.price_text,
            price_value: row.price_value,
            price_per_m2_text: row.price_per_m2_text,
            transaction_type: row.transaction_type,
            scraped_at: row.scraped_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListingParams {
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub transaction_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub suites: Option<i32>,
    pub parking: Option<i32>,
    /// A single value is a minimum area; `"a-b"` bounds both sides.
    pub area: Option<String>,
    pub limit: Option<i64>,
}

pub(super) fn normalize_limit(limit: Option<i64>) -> usize {
    let clamped = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    usize::try_from(clamped).unwrap_or(1)
}

pub(super) async fn list_listings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ApiResponse<Vec<ListingItem>>>, ApiError> {
    let filters = attribute_filters(
        &req_id.0,
        params.property_type.as_deref(),
        params.transaction_type.as_deref(),
        params.bedrooms,
        params.suites,
        params.parking,
    )?;
    let area = parse_area_param(params.area.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::validation(req_id.0.clone(), e.to_string()))?;

    let search = ListingSearch {
        city: filter_text(params.city.as_deref()),
        neighborhood: filter_text(params.neighborhood.as_deref()),
        address: filter_text(params.address.as_deref()),
        filters,
        area,
        limit: normalize_limit(params.limit),
    };

    let rows = laudo_db::search_listings(&state.pool, &search)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ListingItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_listing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ListingItem>>, ApiError> {
    let row = laudo_db::get_listing(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("listing {id} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: ListingItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}
