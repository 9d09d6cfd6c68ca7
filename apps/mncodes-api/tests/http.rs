use std::sync::Arc;

use axum::{
	Router,
	body::Body,
	http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tower::util::ServiceExt;

use mncodes_api::{routes, state::AppState};
use mncodes_config::{
	Config, LlmProviderConfig, Postgres, Providers, Search, Service, Storage,
};
use mncodes_service::{BoxFuture, CodeSearchService, LlmProvider};
use mncodes_storage::{
	db::Db,
	models::{BaseCode, CodeSection, Jurisdiction, LocalAmendment},
	queries,
};
use mncodes_testkit::TestDatabase;

/// Always-offline language model so routing tests exercise the fallback
/// paths deterministically.
struct OfflineLlm;
impl LlmProvider for OfflineLlm {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_max_tokens: u32,
		_prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async { Err(color_eyre::eyre::eyre!("model offline")) })
	}
}

fn test_config(dsn: &str) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres { dsn: dsn.to_string(), pool_max_conns: 2 },
		},
		providers: Providers {
			llm: LlmProviderConfig {
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/messages".to_string(),
				model: "test-model".to_string(),
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
		search: Search::default(),
	}
}

async fn seeded_app(test_db: &TestDatabase) -> Router {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(8).await.expect("Failed to ensure schema.");

	let now = OffsetDateTime::now_utc();

	queries::insert_jurisdiction(
		&db,
		&Jurisdiction {
			id: "minneapolis".to_string(),
			name: "Minneapolis".to_string(),
			r#type: "city".to_string(),
			county: Some("Hennepin".to_string()),
			parent_jurisdiction_id: None,
			population: Some(429_954),
			has_local_amendments: true,
			enforcement_authority: "self".to_string(),
			building_department_name: None,
			building_department_phone: None,
			building_department_email: None,
			building_department_address: None,
			website_url: None,
			permit_portal_url: None,
			last_verified_date: None,
			created_at: now,
			updated_at: now,
		},
	)
	.await
	.expect("Failed to insert jurisdiction.");
	queries::insert_base_code(
		&db,
		&BaseCode {
			id: "mrc-2020".to_string(),
			code_name: "Minnesota Residential Code".to_string(),
			code_abbreviation: "MRC".to_string(),
			code_year: 2020,
			code_organization: None,
			mn_rules_chapter: Some("1309".to_string()),
			effective_date: None,
			supersedes_code_id: None,
			full_text_url: None,
			created_at: now,
		},
	)
	.await
	.expect("Failed to insert base code.");
	queries::insert_code_section(
		&db,
		&CodeSection {
			id: "r312-1".to_string(),
			base_code_id: "mrc-2020".to_string(),
			chapter: None,
			section_number: "R312.1".to_string(),
			section_title: "Guards Required".to_string(),
			full_text: "Guards shall be provided for decks more than 30 inches above grade."
				.to_string(),
			summary: None,
			category: Some("Guards".to_string()),
			subcategory: None,
			tags: None,
			created_at: now,
		},
	)
	.await
	.expect("Failed to insert section.");
	queries::insert_local_amendment(
		&db,
		&LocalAmendment {
			id: "am-1".to_string(),
			jurisdiction_id: "minneapolis".to_string(),
			base_code_id: None,
			code_section_id: Some("r312-1".to_string()),
			amendment_type: "stricter".to_string(),
			amendment_title: None,
			amendment_text: "42 inch guards required.".to_string(),
			original_text: None,
			effective_date: None,
			expiration_date: None,
			ordinance_number: None,
			ordinance_url: None,
			created_at: now,
			updated_at: now,
		},
	)
	.await
	.expect("Failed to insert amendment.");

	let service =
		CodeSearchService::with_llm(test_config(test_db.dsn()), db, Arc::new(OfflineLlm));

	routes::router(AppState { service: Arc::new(service) })
}

async fn body_json(response: axum::response::Response) -> Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Response body was not JSON.")
}

fn post_search(body: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/api/codes/search")
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.expect("Failed to build request.")
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn search_request_validation() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!("Skipping search_request_validation; set MNCODES_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let app = seeded_app(&test_db).await;

	let health = app.clone().oneshot(get("/health")).await.expect("Request failed.");

	assert_eq!(health.status(), StatusCode::OK);

	for body in [json!({}), json!({ "query": 42 }), json!({ "query": "   " })] {
		let response =
			app.clone().oneshot(post_search(body)).await.expect("Request failed.");

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(body_json(response).await, json!({ "error": "Query is required" }));
	}

	let response =
		app.clone().oneshot(get("/api/codes/search")).await.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		body_json(response).await,
		json!({ "error": "Query parameter \"q\" is required" })
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn search_round_trip_with_amendments() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!("Skipping search_round_trip_with_amendments; set MNCODES_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let app = seeded_app(&test_db).await;

	let response = app
		.clone()
		.oneshot(post_search(json!({
			"query": "deck guard height",
			"jurisdiction": "Minneapolis"
		})))
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;

	assert_eq!(body["query_interpretation"]["intent"], "general");
	assert_eq!(body["query_interpretation"]["jurisdiction_resolved"]["id"], "minneapolis");
	assert_eq!(
		body["query_interpretation"]["jurisdiction_resolved"]["name"],
		"Minneapolis"
	);
	assert_eq!(body["total_count"], 1);
	assert_eq!(body["results"][0]["id"], "r312-1");
	assert_eq!(body["results"][0]["source"], "MRC");
	assert_eq!(body["results"][0]["section"], "R312.1");
	assert_eq!(
		body["results"][0]["local_amendments"][0]["text"],
		"42 inch guards required."
	);
	assert!(
		body["ai_summary"]
			.as_str()
			.expect("Expected a summary string.")
			.starts_with("For \"deck guard height\" in Minneapolis:")
	);

	// The GET form of the same search, statewide, without a summary.
	let response = app
		.clone()
		.oneshot(get("/api/codes/search?q=deck&summary=false"))
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;

	assert_eq!(
		body["query_interpretation"]["jurisdiction_resolved"]["name"],
		"All Minnesota"
	);
	assert!(body["query_interpretation"]["jurisdiction_resolved"]["id"].is_null());
	assert!(body["ai_summary"].is_null());
	assert!(body["results"][0]["local_amendments"].as_array().unwrap().is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn jurisdiction_endpoints() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!("Skipping jurisdiction_endpoints; set MNCODES_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let app = seeded_app(&test_db).await;

	let response =
		app.clone().oneshot(get("/api/jurisdictions")).await.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;

	assert_eq!(body["pagination"]["total"], 1);
	assert_eq!(body["jurisdictions"][0]["id"], "minneapolis");
	assert_eq!(body["jurisdictions"][0]["type"], "city");

	let response = app
		.clone()
		.oneshot(get("/api/jurisdictions/minneapolis"))
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;

	assert_eq!(body["name"], "Minneapolis");
	assert_eq!(body["local_amendments"][0]["amendment_type"], "stricter");

	let response = app
		.clone()
		.oneshot(get("/api/jurisdictions/nowhere"))
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(body_json(response).await, json!({ "error": "Jurisdiction not found" }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
