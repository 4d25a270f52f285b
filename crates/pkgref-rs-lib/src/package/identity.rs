use serde::{Serialize, Deserialize};

use super::PackageVersion;

/// A package id and optionally the exact version of it.
///
/// Ids are compared case-insensitively, the original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageIdentity {
	pub id: String,
	pub version: Option<PackageVersion>,
}

impl PackageIdentity {
	pub fn new(id: impl Into<String>, version: Option<PackageVersion>) -> Self {
		Self { id: id.into(), version }
	}

	pub fn has_version(&self) -> bool {
		self.version.is_some()
	}

	/// Case-insensitive id comparison.
	pub fn is_same_id(&self, id: &str) -> bool {
		self.id.eq_ignore_ascii_case(id)
	}

	/// The key used wherever packages are indexed by id alone.
	pub fn id_key(&self) -> String {
		self.id.to_ascii_lowercase()
	}
}

impl std::cmp::Ord for PackageIdentity {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.id.to_ascii_lowercase().cmp(&other.id.to_ascii_lowercase()) {
			core::cmp::Ordering::Equal => {}
			ord => return ord,
		}
		/* No version sorts before any version */
		self.version.cmp(&other.version)
	}
}

impl std::cmp::PartialOrd for PackageIdentity {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::cmp::PartialEq for PackageIdentity {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl std::cmp::Eq for PackageIdentity {}

impl std::hash::Hash for PackageIdentity {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.id.to_ascii_lowercase().hash(state);
		self.version.hash(state);
	}
}

impl std::fmt::Display for PackageIdentity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.version {
			Some(v) => write!(f, "{} {}", self.id, v),
			None => write!(f, "{}", self.id),
		}
	}
}

impl AsRef<PackageIdentity> for PackageIdentity {
	fn as_ref(&self) -> &PackageIdentity {
		self
	}
}
