use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	#[serde(default = "default_embedding_dim")]
	pub embedding_dim: u32,
	#[serde(default)]
	pub semantic_enabled: bool,
	#[serde(default = "default_semantic_threshold")]
	pub semantic_threshold: f32,
	#[serde(default = "default_parse_max_tokens")]
	pub parse_max_tokens: u32,
	#[serde(default = "default_summary_max_tokens")]
	pub summary_max_tokens: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: default_limit(),
			embedding_dim: default_embedding_dim(),
			semantic_enabled: false,
			semantic_threshold: default_semantic_threshold(),
			parse_max_tokens: default_parse_max_tokens(),
			summary_max_tokens: default_summary_max_tokens(),
		}
	}
}

fn default_limit() -> u32 {
	20
}

fn default_embedding_dim() -> u32 {
	1_536
}

fn default_semantic_threshold() -> f32 {
	0.7
}

fn default_parse_max_tokens() -> u32 {
	200
}

fn default_summary_max_tokens() -> u32 {
	500
}
