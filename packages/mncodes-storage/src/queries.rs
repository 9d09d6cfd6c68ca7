use sqlx::QueryBuilder;

use crate::{
	Result,
	db::Db,
	models::{
		AmendmentRow, BaseCode, CodeSection, Jurisdiction, JurisdictionSummary, LocalAmendment,
		PermitType, RelatedRow, SectionEmbedding, SectionHit,
	},
};

/// Fuzzy name-or-id lookup, first match wins.
pub async fn find_jurisdiction(db: &Db, needle: &str) -> Result<Option<JurisdictionSummary>> {
	let summary = sqlx::query_as::<_, JurisdictionSummary>(
		"\
SELECT id, name, type, county
FROM jurisdictions
WHERE name ILIKE $1
	OR id = $2
LIMIT 1",
	)
	.bind(format!("%{needle}%"))
	.bind(needle)
	.fetch_optional(&db.pool)
	.await?;

	Ok(summary)
}

/// Case-insensitive substring match over title, full text, and summary.
/// `term` is a single token; the caller decides which token to use.
pub async fn search_sections(
	db: &Db,
	term: &str,
	code_types: Option<&[String]>,
	categories: Option<&[String]>,
	limit: i64,
) -> Result<Vec<SectionHit>> {
	let pattern = format!("%{term}%");
	let mut builder = QueryBuilder::new(
		"SELECT cs.id, cs.section_number, cs.section_title, cs.full_text, cs.summary, \
		 cs.category, bc.code_name AS base_code_name, \
		 bc.code_abbreviation AS base_code_abbreviation \
		 FROM code_sections cs \
		 JOIN base_codes bc ON bc.id = cs.base_code_id \
		 WHERE (cs.section_title ILIKE ",
	);
	builder.push_bind(pattern.clone());
	builder.push(" OR cs.full_text ILIKE ");
	builder.push_bind(pattern.clone());
	builder.push(" OR cs.summary ILIKE ");
	builder.push_bind(pattern);
	builder.push(")");

	if let Some(code_types) = code_types
		&& !code_types.is_empty()
	{
		builder.push(" AND bc.code_abbreviation = ANY(");
		builder.push_bind(code_types.to_vec());
		builder.push(")");
	}
	if let Some(categories) = categories
		&& !categories.is_empty()
	{
		builder.push(" AND cs.category = ANY(");
		builder.push_bind(categories.to_vec());
		builder.push(")");
	}

	// Stable order so position-based scores are reproducible.
	builder.push(" ORDER BY cs.id LIMIT ");
	builder.push_bind(limit);

	let hits = builder.build_query_as::<SectionHit>().fetch_all(&db.pool).await?;

	Ok(hits)
}

pub async fn sections_by_ids(db: &Db, ids: &[String]) -> Result<Vec<SectionHit>> {
	let hits = sqlx::query_as::<_, SectionHit>(
		"\
SELECT cs.id, cs.section_number, cs.section_title, cs.full_text, cs.summary, cs.category,
	bc.code_name AS base_code_name, bc.code_abbreviation AS base_code_abbreviation
FROM code_sections cs
JOIN base_codes bc ON bc.id = cs.base_code_id
WHERE cs.id = ANY($1)",
	)
	.bind(ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(hits)
}

pub async fn amendments_for_sections(
	db: &Db,
	jurisdiction_id: &str,
	section_ids: &[String],
) -> Result<Vec<AmendmentRow>> {
	let rows = sqlx::query_as::<_, AmendmentRow>(
		"\
SELECT la.code_section_id, la.amendment_type, la.amendment_text, j.name AS jurisdiction_name
FROM local_amendments la
JOIN jurisdictions j ON j.id = la.jurisdiction_id
WHERE la.jurisdiction_id = $1
	AND la.code_section_id = ANY($2)",
	)
	.bind(jurisdiction_id)
	.bind(section_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn related_by_categories(
	db: &Db,
	categories: &[String],
	exclude_ids: &[String],
	limit: i64,
) -> Result<Vec<RelatedRow>> {
	let rows = sqlx::query_as::<_, RelatedRow>(
		"\
SELECT id, section_number, section_title
FROM code_sections
WHERE category = ANY($1)
	AND NOT (id = ANY($2))
ORDER BY id
LIMIT $3",
	)
	.bind(categories)
	.bind(exclude_ids)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Full scan of stored vectors. The corpus is a few thousand sections, so
/// similarity is computed in-process rather than through a vector index.
pub async fn all_section_embeddings(db: &Db) -> Result<Vec<SectionEmbedding>> {
	let rows = sqlx::query_as::<_, SectionEmbedding>(
		"SELECT code_section_id, embedding_dim, vec, created_at FROM code_section_embeddings",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub struct JurisdictionPage {
	pub jurisdictions: Vec<Jurisdiction>,
	pub total: i64,
}

pub async fn list_jurisdictions(
	db: &Db,
	type_filter: Option<&str>,
	county: Option<&str>,
	search: Option<&str>,
	limit: i64,
	offset: i64,
) -> Result<JurisdictionPage> {
	fn push_filters(
		builder: &mut QueryBuilder<'_, sqlx::Postgres>,
		type_filter: Option<&str>,
		county: Option<&str>,
		search: Option<&str>,
	) {
		if let Some(type_filter) = type_filter {
			builder.push(" AND type = ");
			builder.push_bind(type_filter.to_string());
		}
		if let Some(county) = county {
			builder.push(" AND county ILIKE ");
			builder.push_bind(county.to_string());
		}
		if let Some(search) = search {
			let pattern = format!("%{search}%");
			builder.push(" AND (name ILIKE ");
			builder.push_bind(pattern.clone());
			builder.push(" OR county ILIKE ");
			builder.push_bind(pattern);
			builder.push(")");
		}
	}

	let mut count_builder =
		QueryBuilder::new("SELECT COUNT(*) FROM jurisdictions WHERE TRUE");
	push_filters(&mut count_builder, type_filter, county, search);

	let total: i64 = count_builder.build_query_scalar().fetch_one(&db.pool).await?;

	let mut page_builder = QueryBuilder::new(
		"SELECT id, name, type, county, parent_jurisdiction_id, population, \
		 has_local_amendments, enforcement_authority, building_department_name, \
		 building_department_phone, building_department_email, building_department_address, \
		 website_url, permit_portal_url, last_verified_date, created_at, updated_at \
		 FROM jurisdictions WHERE TRUE",
	);
	push_filters(&mut page_builder, type_filter, county, search);
	page_builder.push(" ORDER BY name LIMIT ");
	page_builder.push_bind(limit);
	page_builder.push(" OFFSET ");
	page_builder.push_bind(offset);

	let jurisdictions = page_builder.build_query_as::<Jurisdiction>().fetch_all(&db.pool).await?;

	Ok(JurisdictionPage { jurisdictions, total })
}

pub async fn get_jurisdiction(db: &Db, id: &str) -> Result<Option<Jurisdiction>> {
	let jurisdiction = sqlx::query_as::<_, Jurisdiction>(
		"\
SELECT id, name, type, county, parent_jurisdiction_id, population, has_local_amendments,
	enforcement_authority, building_department_name, building_department_phone,
	building_department_email, building_department_address, website_url, permit_portal_url,
	last_verified_date, created_at, updated_at
FROM jurisdictions
WHERE id = $1",
	)
	.bind(id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(jurisdiction)
}

pub async fn permit_types_for_jurisdiction(db: &Db, id: &str) -> Result<Vec<PermitType>> {
	let permits = sqlx::query_as::<_, PermitType>(
		"\
SELECT id, jurisdiction_id, permit_name, permit_category, description, when_required,
	exemptions, contractor_license_required, homeowner_can_pull, application_method,
	application_url, typical_processing_days, created_at, updated_at
FROM permit_types
WHERE jurisdiction_id = $1
ORDER BY permit_name",
	)
	.bind(id)
	.fetch_all(&db.pool)
	.await?;

	Ok(permits)
}

pub async fn amendments_for_jurisdiction(db: &Db, id: &str) -> Result<Vec<LocalAmendment>> {
	let amendments = sqlx::query_as::<_, LocalAmendment>(
		"\
SELECT id, jurisdiction_id, base_code_id, code_section_id, amendment_type, amendment_title,
	amendment_text, original_text, effective_date, expiration_date, ordinance_number,
	ordinance_url, created_at, updated_at
FROM local_amendments
WHERE jurisdiction_id = $1
ORDER BY effective_date DESC NULLS LAST",
	)
	.bind(id)
	.fetch_all(&db.pool)
	.await?;

	Ok(amendments)
}

// Seed helpers. Ingestion tooling owns writes in production; these exist so
// tests can populate a corpus through the same column lists.

pub async fn insert_jurisdiction(db: &Db, jurisdiction: &Jurisdiction) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO jurisdictions (
	id,
	name,
	type,
	county,
	parent_jurisdiction_id,
	population,
	has_local_amendments,
	enforcement_authority,
	building_department_name,
	building_department_phone,
	building_department_email,
	building_department_address,
	website_url,
	permit_portal_url,
	last_verified_date,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
	)
	.bind(&jurisdiction.id)
	.bind(&jurisdiction.name)
	.bind(&jurisdiction.r#type)
	.bind(&jurisdiction.county)
	.bind(&jurisdiction.parent_jurisdiction_id)
	.bind(jurisdiction.population)
	.bind(jurisdiction.has_local_amendments)
	.bind(&jurisdiction.enforcement_authority)
	.bind(&jurisdiction.building_department_name)
	.bind(&jurisdiction.building_department_phone)
	.bind(&jurisdiction.building_department_email)
	.bind(&jurisdiction.building_department_address)
	.bind(&jurisdiction.website_url)
	.bind(&jurisdiction.permit_portal_url)
	.bind(jurisdiction.last_verified_date)
	.bind(jurisdiction.created_at)
	.bind(jurisdiction.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_base_code(db: &Db, base_code: &BaseCode) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO base_codes (
	id,
	code_name,
	code_abbreviation,
	code_year,
	code_organization,
	mn_rules_chapter,
	effective_date,
	supersedes_code_id,
	full_text_url,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
	)
	.bind(&base_code.id)
	.bind(&base_code.code_name)
	.bind(&base_code.code_abbreviation)
	.bind(base_code.code_year)
	.bind(&base_code.code_organization)
	.bind(&base_code.mn_rules_chapter)
	.bind(base_code.effective_date)
	.bind(&base_code.supersedes_code_id)
	.bind(&base_code.full_text_url)
	.bind(base_code.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_code_section(db: &Db, section: &CodeSection) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO code_sections (
	id,
	base_code_id,
	chapter,
	section_number,
	section_title,
	full_text,
	summary,
	category,
	subcategory,
	tags,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(&section.id)
	.bind(&section.base_code_id)
	.bind(&section.chapter)
	.bind(&section.section_number)
	.bind(&section.section_title)
	.bind(&section.full_text)
	.bind(&section.summary)
	.bind(&section.category)
	.bind(&section.subcategory)
	.bind(&section.tags)
	.bind(section.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_local_amendment(db: &Db, amendment: &LocalAmendment) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO local_amendments (
	id,
	jurisdiction_id,
	base_code_id,
	code_section_id,
	amendment_type,
	amendment_title,
	amendment_text,
	original_text,
	effective_date,
	expiration_date,
	ordinance_number,
	ordinance_url,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
	)
	.bind(&amendment.id)
	.bind(&amendment.jurisdiction_id)
	.bind(&amendment.base_code_id)
	.bind(&amendment.code_section_id)
	.bind(&amendment.amendment_type)
	.bind(&amendment.amendment_title)
	.bind(&amendment.amendment_text)
	.bind(&amendment.original_text)
	.bind(amendment.effective_date)
	.bind(amendment.expiration_date)
	.bind(&amendment.ordinance_number)
	.bind(&amendment.ordinance_url)
	.bind(amendment.created_at)
	.bind(amendment.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_section_embedding(db: &Db, embedding: &SectionEmbedding) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO code_section_embeddings (code_section_id, embedding_dim, vec, created_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (code_section_id) DO UPDATE
SET embedding_dim = EXCLUDED.embedding_dim, vec = EXCLUDED.vec, created_at = EXCLUDED.created_at",
	)
	.bind(&embedding.code_section_id)
	.bind(embedding.embedding_dim)
	.bind(&embedding.vec)
	.bind(embedding.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_permit_type(db: &Db, permit: &PermitType) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO permit_types (
	id,
	jurisdiction_id,
	permit_name,
	permit_category,
	description,
	when_required,
	exemptions,
	contractor_license_required,
	homeowner_can_pull,
	application_method,
	application_url,
	typical_processing_days,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
	)
	.bind(&permit.id)
	.bind(&permit.jurisdiction_id)
	.bind(&permit.permit_name)
	.bind(&permit.permit_category)
	.bind(&permit.description)
	.bind(&permit.when_required)
	.bind(&permit.exemptions)
	.bind(permit.contractor_license_required)
	.bind(permit.homeowner_can_pull)
	.bind(&permit.application_method)
	.bind(&permit.application_url)
	.bind(permit.typical_processing_days)
	.bind(permit.created_at)
	.bind(permit.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}
