//! Library error type.
//! 
//! Conditions that simply produce nothing (a project that hasn't been restored, a payload with no
//! matching group, a package without origins) are never errors, they come back as empty results.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("zip error: {0}")]
	Zip(#[from] zip::result::ZipError),
	#[error("directory walk error: {0}")]
	WalkDir(#[from] walkdir::Error),
	#[error("background task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("operation cancelled")]
	Cancelled,
}

/// Returns [`Error::Cancelled`] if `token` has been cancelled.
pub(crate) fn check_cancelled(token: &tokio_util::sync::CancellationToken) -> Result<()> {
	if token.is_cancelled() {
		Err(Error::Cancelled)
	} else {
		Ok(())
	}
}
