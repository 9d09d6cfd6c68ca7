mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, LlmProviderConfig, Postgres, Providers, Search, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.embedding_dim == 0 {
		return Err(Error::Validation {
			message: "search.embedding_dim must be greater than zero.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.semantic_threshold) {
		return Err(Error::Validation {
			message: "search.semantic_threshold must be between zero and one.".to_string(),
		});
	}
	if cfg.search.parse_max_tokens == 0 {
		return Err(Error::Validation {
			message: "search.parse_max_tokens must be greater than zero.".to_string(),
		});
	}
	if cfg.search.summary_max_tokens == 0 {
		return Err(Error::Validation {
			message: "search.summary_max_tokens must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.providers.llm.api_base.ends_with('/') {
		cfg.providers.llm.api_base.pop();
	}
}
