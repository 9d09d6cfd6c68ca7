use std::sync::Arc;

use mncodes_service::CodeSearchService;
use mncodes_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CodeSearchService>,
}
impl AppState {
	pub async fn new(config: mncodes_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.search.embedding_dim).await?;

		let service = CodeSearchService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
