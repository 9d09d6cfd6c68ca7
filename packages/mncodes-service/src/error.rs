pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<mncodes_storage::Error> for Error {
	fn from(err: mncodes_storage::Error) -> Self {
		match err {
			mncodes_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			mncodes_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			mncodes_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
