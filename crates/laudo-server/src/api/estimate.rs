use axum::{
    extract::{Query, State},
    Extension, Json,
};
use laudo_core::{estimate_value, filter_text, parse_area_param, Valuation, ValuationQuery};
use laudo_db::PgListingStore;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    attribute_filters, map_db_error, ApiError, ApiResponse, AppState, ResponseMeta,
};

const MAX_TOLERANCE: f64 = 0.5;

#[derive(Debug, Default, Deserialize)]
pub(super) struct EstimateParams {
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub transaction_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub suites: Option<i32>,
    pub parking: Option<i32>,
    /// `"200-250"`, `"220"` or `"*"`.
    pub area: Option<String>,
    pub target_area: Option<f64>,
    pub condition: Option<String>,
    pub tolerance: Option<f64>,
}

pub(super) async fn get_estimate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<EstimateParams>,
) -> Result<Json<ApiResponse<Valuation>>, ApiError> {
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

    let mut policy = state.policy;
    if let Some(tolerance) = params.tolerance {
        if !(0.0..=MAX_TOLERANCE).contains(&tolerance) {
            return Err(ApiError::validation(
                req_id.0,
                format!("tolerance must be between 0 and {MAX_TOLERANCE}"),
            ));
        }
        policy.area_tolerance = tolerance;
    }

    if params.target_area.is_some_and(|t| !t.is_finite()) {
        return Err(ApiError::validation(
            req_id.0,
            "target_area must be a finite number",
        ));
    }

    let query = ValuationQuery {
        address: filter_text(params.address.as_deref()),
        neighborhood: filter_text(params.neighborhood.as_deref()),
        city: filter_text(params.city.as_deref()),
        filters,
        area,
        target_area_override: params.target_area,
        condition: filter_text(params.condition.as_deref()),
    };

    let store = PgListingStore::new(state.pool.clone());
    let valuation = estimate_value(&store, &query, &policy)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(
        request_id = %req_id.0,
        tier = %valuation.tier(),
        comparables = valuation.comparables_used(),
        estimated = matches!(valuation, Valuation::Estimated(_)),
        "valuation computed"
    );

    Ok(Json(ApiResponse {
        data: valuation,
        meta: ResponseMeta::new(req_id.0),
    }))
}
