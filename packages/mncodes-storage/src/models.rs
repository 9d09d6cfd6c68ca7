use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Jurisdiction {
	pub id: String,
	pub name: String,
	pub r#type: String,
	pub county: Option<String>,
	pub parent_jurisdiction_id: Option<String>,
	pub population: Option<i64>,
	pub has_local_amendments: bool,
	pub enforcement_authority: String,
	pub building_department_name: Option<String>,
	pub building_department_phone: Option<String>,
	pub building_department_email: Option<String>,
	pub building_department_address: Option<String>,
	pub website_url: Option<String>,
	pub permit_portal_url: Option<String>,
	pub last_verified_date: Option<Date>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// The columns jurisdiction resolution needs; the search path never loads
/// contact details.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JurisdictionSummary {
	pub id: String,
	pub name: String,
	pub r#type: String,
	pub county: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BaseCode {
	pub id: String,
	pub code_name: String,
	pub code_abbreviation: String,
	pub code_year: i32,
	pub code_organization: Option<String>,
	pub mn_rules_chapter: Option<String>,
	pub effective_date: Option<Date>,
	pub supersedes_code_id: Option<String>,
	pub full_text_url: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CodeSection {
	pub id: String,
	pub base_code_id: String,
	pub chapter: Option<String>,
	pub section_number: String,
	pub section_title: String,
	pub full_text: String,
	pub summary: Option<String>,
	pub category: Option<String>,
	pub subcategory: Option<String>,
	pub tags: Option<Vec<String>>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocalAmendment {
	pub id: String,
	pub jurisdiction_id: String,
	pub base_code_id: Option<String>,
	pub code_section_id: Option<String>,
	pub amendment_type: String,
	pub amendment_title: Option<String>,
	pub amendment_text: String,
	pub original_text: Option<String>,
	pub effective_date: Option<Date>,
	pub expiration_date: Option<Date>,
	pub ordinance_number: Option<String>,
	pub ordinance_url: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SectionEmbedding {
	pub code_section_id: String,
	pub embedding_dim: i32,
	pub vec: Vec<f32>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PermitType {
	pub id: String,
	pub jurisdiction_id: String,
	pub permit_name: String,
	pub permit_category: String,
	pub description: Option<String>,
	pub when_required: Option<String>,
	pub exemptions: Option<String>,
	pub contractor_license_required: bool,
	pub homeowner_can_pull: bool,
	pub application_method: Option<String>,
	pub application_url: Option<String>,
	pub typical_processing_days: Option<i32>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A code section as returned by the search queries, joined to its base
/// code's display columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SectionHit {
	pub id: String,
	pub section_number: String,
	pub section_title: String,
	pub full_text: String,
	pub summary: Option<String>,
	pub category: Option<String>,
	pub base_code_name: String,
	pub base_code_abbreviation: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AmendmentRow {
	pub code_section_id: String,
	pub amendment_type: String,
	pub amendment_text: String,
	pub jurisdiction_name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RelatedRow {
	pub id: String,
	pub section_number: String,
	pub section_title: String,
}
