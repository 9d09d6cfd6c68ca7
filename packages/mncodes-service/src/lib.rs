pub mod amendments;
pub mod jurisdictions;
pub mod lexical;
pub mod merge;
pub mod parse;
pub mod related;
pub mod search;
pub mod semantic;
pub mod summary;

mod error;

pub use error::{Error, Result};
pub use jurisdictions::{
	JurisdictionDetail, JurisdictionItem, JurisdictionListRequest, JurisdictionListResponse,
	Pagination,
};
pub use parse::QueryAnalysis;
pub use search::{
	AmendmentInfo, QueryInterpretation, RelatedSection, ResolvedJurisdiction, SearchFilters,
	SearchOptions, SearchRequest, SearchResponse, SearchResult,
};

use std::{future::Future, pin::Pin, sync::Arc};

use mncodes_config::{Config, LlmProviderConfig};
use mncodes_storage::{db::Db, models::SectionHit};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Single-turn language-model completion. Injected so tests can stand in a
/// double for the external API; the default delegates to the reqwest client.
pub trait LlmProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		max_tokens: u32,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

struct DefaultLlm;
impl LlmProvider for DefaultLlm {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		max_tokens: u32,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(mncodes_providers::llm::complete(cfg, max_tokens, prompt))
	}
}

pub struct CodeSearchService {
	pub cfg: Config,
	pub db: Db,
	pub llm: Arc<dyn LlmProvider>,
}
impl CodeSearchService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, llm: Arc::new(DefaultLlm) }
	}

	pub fn with_llm(cfg: Config, db: Db, llm: Arc<dyn LlmProvider>) -> Self {
		Self { cfg, db, llm }
	}
}

/// A scored section candidate flowing through the search pipeline. Carries
/// the full storage row; the wire shape is derived at response time.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
	pub(crate) hit: SectionHit,
	pub(crate) relevance_score: f32,
	pub(crate) local_amendments: Vec<AmendmentInfo>,
}
impl Candidate {
	pub(crate) fn new(hit: SectionHit, relevance_score: f32) -> Self {
		Self { hit, relevance_score, local_amendments: Vec::new() }
	}
}
