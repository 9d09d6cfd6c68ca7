use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mncodes_service::{
	JurisdictionDetail, JurisdictionListRequest, JurisdictionListResponse, SearchFilters,
	SearchOptions, SearchRequest, SearchResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/codes/search", get(search_get).post(search_post))
		.route("/api/jurisdictions", get(list_jurisdictions))
		.route("/api/jurisdictions/{id}", get(jurisdiction_detail))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// The POST body as received. `query` stays untyped so a missing or
/// non-string value yields the contract's 400 instead of a deserialization
/// rejection.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
	#[serde(default)]
	pub query: Option<Value>,
	pub jurisdiction: Option<String>,
	pub filters: Option<SearchFilters>,
	pub options: Option<SearchOptions>,
}

async fn search_post(
	State(state): State<AppState>,
	Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Some(query) = body
		.query
		.as_ref()
		.and_then(Value::as_str)
		.filter(|q| !q.trim().is_empty())
		.map(str::to_string)
	else {
		return Err(ApiError::new(StatusCode::BAD_REQUEST, "Query is required"));
	};
	let response = state
		.service
		.search(SearchRequest {
			query,
			jurisdiction: body.jurisdiction,
			filters: body.filters,
			options: body.options,
		})
		.await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
	pub q: Option<String>,
	pub jurisdiction: Option<String>,
	pub summary: Option<bool>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

async fn search_get(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Some(query) = params.q.filter(|q| !q.is_empty()) else {
		return Err(ApiError::new(
			StatusCode::BAD_REQUEST,
			"Query parameter \"q\" is required",
		));
	};
	let response = state
		.service
		.search(SearchRequest {
			query,
			jurisdiction: params.jurisdiction,
			filters: None,
			options: Some(SearchOptions {
				include_ai_summary: params.summary,
				limit: params.limit,
				offset: params.offset,
			}),
		})
		.await?;

	Ok(Json(response))
}

async fn list_jurisdictions(
	State(state): State<AppState>,
	Query(params): Query<JurisdictionListRequest>,
) -> Result<Json<JurisdictionListResponse>, ApiError> {
	let response = state.service.list_jurisdictions(params).await?;

	Ok(Json(response))
}

async fn jurisdiction_detail(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<JurisdictionDetail>, ApiError> {
	let detail = state.service.jurisdiction_detail(&id).await?;

	Ok(Json(detail))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}
}
impl From<mncodes_service::Error> for ApiError {
	fn from(err: mncodes_service::Error) -> Self {
		match err {
			mncodes_service::Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, message),
			mncodes_service::Error::NotFound { .. } =>
				Self::new(StatusCode::NOT_FOUND, "Jurisdiction not found"),
			mncodes_service::Error::Provider { message }
			| mncodes_service::Error::Storage { message } => {
				tracing::error!(%message, "Request failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}
