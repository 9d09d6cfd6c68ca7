use serde::{Deserialize, Serialize};

use mncodes_storage::{
	models::{Jurisdiction, LocalAmendment, PermitType},
	queries,
};

use crate::{CodeSearchService, Error, Result};

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JurisdictionListRequest {
	/// Exact match on jurisdiction type, e.g. "city" or "county".
	pub r#type: Option<String>,
	pub county: Option<String>,
	/// Substring match over name and county.
	pub search: Option<String>,
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionListResponse {
	pub jurisdictions: Vec<JurisdictionItem>,
	pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
	pub total: i64,
	pub limit: i64,
	pub offset: i64,
	pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionItem {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub jurisdiction_type: String,
	pub county: Option<String>,
	pub population: Option<i64>,
	pub has_local_amendments: bool,
	pub enforcement_authority: String,
	pub website_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionDetail {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub jurisdiction_type: String,
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
	pub last_verified_date: Option<String>,
	pub permit_types: Vec<PermitTypeInfo>,
	pub local_amendments: Vec<LocalAmendmentInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermitTypeInfo {
	pub id: String,
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
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalAmendmentInfo {
	pub id: String,
	pub code_section_id: Option<String>,
	pub amendment_type: String,
	pub amendment_title: Option<String>,
	pub amendment_text: String,
	pub effective_date: Option<String>,
	pub ordinance_number: Option<String>,
	pub ordinance_url: Option<String>,
}

impl CodeSearchService {
	pub async fn list_jurisdictions(
		&self,
		req: JurisdictionListRequest,
	) -> Result<JurisdictionListResponse> {
		let limit = req.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
		let offset = req.offset.unwrap_or(0).max(0);
		let page = queries::list_jurisdictions(
			&self.db,
			req.r#type.as_deref(),
			req.county.as_deref(),
			req.search.as_deref(),
			limit,
			offset,
		)
		.await?;
		let jurisdictions = page.jurisdictions.into_iter().map(to_item).collect();

		Ok(JurisdictionListResponse {
			jurisdictions,
			pagination: Pagination {
				total: page.total,
				limit,
				offset,
				has_more: offset + limit < page.total,
			},
		})
	}

	pub async fn jurisdiction_detail(&self, id: &str) -> Result<JurisdictionDetail> {
		let Some(jurisdiction) = queries::get_jurisdiction(&self.db, id).await? else {
			return Err(Error::NotFound { message: format!("jurisdiction {id}") });
		};
		let permits = queries::permit_types_for_jurisdiction(&self.db, id).await?;
		let amendments = queries::amendments_for_jurisdiction(&self.db, id).await?;

		Ok(to_detail(jurisdiction, permits, amendments))
	}
}

fn to_item(j: Jurisdiction) -> JurisdictionItem {
	JurisdictionItem {
		id: j.id,
		name: j.name,
		jurisdiction_type: j.r#type,
		county: j.county,
		population: j.population,
		has_local_amendments: j.has_local_amendments,
		enforcement_authority: j.enforcement_authority,
		website_url: j.website_url,
	}
}

fn to_detail(
	j: Jurisdiction,
	permits: Vec<PermitType>,
	amendments: Vec<LocalAmendment>,
) -> JurisdictionDetail {
	JurisdictionDetail {
		id: j.id,
		name: j.name,
		jurisdiction_type: j.r#type,
		county: j.county,
		parent_jurisdiction_id: j.parent_jurisdiction_id,
		population: j.population,
		has_local_amendments: j.has_local_amendments,
		enforcement_authority: j.enforcement_authority,
		building_department_name: j.building_department_name,
		building_department_phone: j.building_department_phone,
		building_department_email: j.building_department_email,
		building_department_address: j.building_department_address,
		website_url: j.website_url,
		permit_portal_url: j.permit_portal_url,
		last_verified_date: j.last_verified_date.map(|d| d.to_string()),
		permit_types: permits
			.into_iter()
			.map(|p| PermitTypeInfo {
				id: p.id,
				permit_name: p.permit_name,
				permit_category: p.permit_category,
				description: p.description,
				when_required: p.when_required,
				exemptions: p.exemptions,
				contractor_license_required: p.contractor_license_required,
				homeowner_can_pull: p.homeowner_can_pull,
				application_method: p.application_method,
				application_url: p.application_url,
				typical_processing_days: p.typical_processing_days,
			})
			.collect(),
		local_amendments: amendments
			.into_iter()
			.map(|a| LocalAmendmentInfo {
				id: a.id,
				code_section_id: a.code_section_id,
				amendment_type: a.amendment_type,
				amendment_title: a.amendment_title,
				amendment_text: a.amendment_text,
				effective_date: a.effective_date.map(|d| d.to_string()),
				ordinance_number: a.ordinance_number,
				ordinance_url: a.ordinance_url,
			})
			.collect(),
	}
}
