use time::OffsetDateTime;

use mncodes_config::Postgres;
use mncodes_storage::{
	db::Db,
	models::{BaseCode, CodeSection, Jurisdiction, LocalAmendment, SectionEmbedding},
	queries,
};
use mncodes_testkit::TestDatabase;

fn jurisdiction(id: &str, name: &str) -> Jurisdiction {
	let now = OffsetDateTime::now_utc();

	Jurisdiction {
		id: id.to_string(),
		name: name.to_string(),
		r#type: "city".to_string(),
		county: Some("Hennepin".to_string()),
		parent_jurisdiction_id: None,
		population: Some(100_000),
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
	}
}

fn base_code(id: &str, abbreviation: &str) -> BaseCode {
	BaseCode {
		id: id.to_string(),
		code_name: "Minnesota Residential Code".to_string(),
		code_abbreviation: abbreviation.to_string(),
		code_year: 2020,
		code_organization: None,
		mn_rules_chapter: Some("1309".to_string()),
		effective_date: None,
		supersedes_code_id: None,
		full_text_url: None,
		created_at: OffsetDateTime::now_utc(),
	}
}

fn section(id: &str, base_code_id: &str, title: &str, text: &str, category: &str) -> CodeSection {
	CodeSection {
		id: id.to_string(),
		base_code_id: base_code_id.to_string(),
		chapter: None,
		section_number: id.to_uppercase(),
		section_title: title.to_string(),
		full_text: text.to_string(),
		summary: None,
		category: Some(category.to_string()),
		subcategory: None,
		tags: None,
		created_at: OffsetDateTime::now_utc(),
	}
}

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(8).await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set MNCODES_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'code_sections'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	// Bootstrap twice; the statements are idempotent.
	db.ensure_schema(8).await.expect("Failed to re-ensure schema.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn jurisdiction_lookup_matches_name_or_id() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!("Skipping jurisdiction_lookup_matches_name_or_id; set MNCODES_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	queries::insert_jurisdiction(&db, &jurisdiction("minneapolis", "Minneapolis"))
		.await
		.expect("Failed to insert jurisdiction.");

	let by_fragment = queries::find_jurisdiction(&db, "minneap")
		.await
		.expect("Lookup failed.")
		.expect("Expected a match by name fragment.");

	assert_eq!(by_fragment.id, "minneapolis");

	let by_id = queries::find_jurisdiction(&db, "minneapolis")
		.await
		.expect("Lookup failed.")
		.expect("Expected a match by id.");

	assert_eq!(by_id.name, "Minneapolis");
	assert!(
		queries::find_jurisdiction(&db, "duluth").await.expect("Lookup failed.").is_none()
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn section_search_filters_and_joins() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!("Skipping section_search_filters_and_joins; set MNCODES_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	queries::insert_base_code(&db, &base_code("mrc-2020", "MRC"))
		.await
		.expect("Failed to insert base code.");
	queries::insert_code_section(
		&db,
		&section("r312-1", "mrc-2020", "Guards Required", "Guards shall be provided.", "Guards"),
	)
	.await
	.expect("Failed to insert section.");
	queries::insert_code_section(
		&db,
		&section("r311-7", "mrc-2020", "Stairways", "Stair riser height limits.", "Stairs"),
	)
	.await
	.expect("Failed to insert section.");

	let hits = queries::search_sections(&db, "guard", None, None, 10)
		.await
		.expect("Search failed.");

	assert_eq!(hits.len(), 1);
	assert_eq!(hits[0].id, "r312-1");
	assert_eq!(hits[0].base_code_abbreviation, "MRC");

	let filtered =
		queries::search_sections(&db, "guard", None, Some(&["Stairs".to_string()]), 10)
			.await
			.expect("Search failed.");

	assert!(filtered.is_empty());

	let related = queries::related_by_categories(
		&db,
		&["Stairs".to_string()],
		&["r312-1".to_string()],
		5,
	)
	.await
	.expect("Related lookup failed.");

	assert_eq!(related.len(), 1);
	assert_eq!(related[0].id, "r311-7");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn amendments_are_scoped_to_jurisdiction_and_sections() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!(
			"Skipping amendments_are_scoped_to_jurisdiction_and_sections; set MNCODES_PG_DSN to run."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let now = OffsetDateTime::now_utc();

	queries::insert_jurisdiction(&db, &jurisdiction("minneapolis", "Minneapolis"))
		.await
		.expect("Failed to insert jurisdiction.");
	queries::insert_jurisdiction(&db, &jurisdiction("st-paul", "St. Paul"))
		.await
		.expect("Failed to insert jurisdiction.");
	queries::insert_base_code(&db, &base_code("mrc-2020", "MRC"))
		.await
		.expect("Failed to insert base code.");
	queries::insert_code_section(
		&db,
		&section("r312-1", "mrc-2020", "Guards Required", "Guards shall be provided.", "Guards"),
	)
	.await
	.expect("Failed to insert section.");

	for (id, jurisdiction_id) in [("am-1", "minneapolis"), ("am-2", "st-paul")] {
		queries::insert_local_amendment(
			&db,
			&LocalAmendment {
				id: id.to_string(),
				jurisdiction_id: jurisdiction_id.to_string(),
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
	}

	let rows =
		queries::amendments_for_sections(&db, "minneapolis", &["r312-1".to_string()])
			.await
			.expect("Amendment lookup failed.");

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].jurisdiction_name, "Minneapolis");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MNCODES_PG_DSN to run."]
async fn section_embeddings_round_trip() {
	let Some(base_dsn) = mncodes_testkit::env_dsn() else {
		eprintln!("Skipping section_embeddings_round_trip; set MNCODES_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	queries::insert_base_code(&db, &base_code("mrc-2020", "MRC"))
		.await
		.expect("Failed to insert base code.");
	queries::insert_code_section(
		&db,
		&section("r312-1", "mrc-2020", "Guards Required", "Guards shall be provided.", "Guards"),
	)
	.await
	.expect("Failed to insert section.");

	let vec = vec![0.5_f32; 8];

	queries::insert_section_embedding(
		&db,
		&SectionEmbedding {
			code_section_id: "r312-1".to_string(),
			embedding_dim: 8,
			vec: vec.clone(),
			created_at: OffsetDateTime::now_utc(),
		},
	)
	.await
	.expect("Failed to insert embedding.");

	let stored = queries::all_section_embeddings(&db).await.expect("Embedding scan failed.");

	assert_eq!(stored.len(), 1);
	assert_eq!(stored[0].vec, vec);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
