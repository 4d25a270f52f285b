use serde::{Serialize, Deserialize};

use super::*;

/// A package as referenced by a project for one target framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageReference {
	pub identity: PackageIdentity,
	pub target_framework: TargetFramework,
	pub allowed_versions: Option<VersionRange>,
	pub user_installed: bool,
	pub development_dependency: bool,
	pub requires_reinstallation: bool,
}

impl PackageReference {
	/// A reference that wasn't asked for by the user, as used for transitive packages.
	pub fn new(identity: PackageIdentity, target_framework: TargetFramework) -> Self {
		Self {
			identity,
			target_framework,
			allowed_versions: None,
			user_installed: false,
			development_dependency: false,
			requires_reinstallation: false,
		}
	}

	pub fn with_allowed_versions(mut self, allowed_versions: VersionRange) -> Self {
		self.allowed_versions = Some(allowed_versions);
		self
	}

	pub fn has_allowed_versions(&self) -> bool {
		self.allowed_versions.is_some()
	}

	/// Same package regardless of which framework references it.
	pub fn is_same_package(&self, other: &PackageReference) -> bool {
		self.identity == other.identity
	}

	/// Same package declared for the same framework.
	pub fn is_same_declaration(&self, other: &PackageReference) -> bool {
		self.identity == other.identity && self.target_framework == other.target_framework
	}
}

impl AsRef<PackageIdentity> for PackageReference {
	fn as_ref(&self) -> &PackageIdentity {
		&self.identity
	}
}

impl std::fmt::Display for PackageReference {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.identity, self.target_framework)
	}
}

/// A package only present because some installed package depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitivePackageReference {
	pub reference: PackageReference,
	/// Installed packages which pull this package in, ordered by identity.
	///
	/// Empty when origin tracking is disabled or nothing could be traced.
	pub origins: Vec<PackageReference>,
}

impl TransitivePackageReference {
	pub fn new(reference: PackageReference) -> Self {
		Self { reference, origins: Vec::new() }
	}

	pub fn identity(&self) -> &PackageIdentity {
		&self.reference.identity
	}
}

impl From<PackageReference> for TransitivePackageReference {
	fn from(value: PackageReference) -> Self {
		Self::new(value)
	}
}

/// A (framework, runtime id) combination, one per resolved graph target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameworkRuntimePair {
	pub framework: TargetFramework,
	pub runtime_identifier: Option<String>,
}

impl FrameworkRuntimePair {
	pub fn new(framework: TargetFramework, runtime_identifier: Option<String>) -> Self {
		Self { framework, runtime_identifier }
	}
}

impl std::fmt::Display for FrameworkRuntimePair {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.runtime_identifier {
			Some(rid) => write!(f, "{}/{}", self.framework, rid),
			None => write!(f, "{}", self.framework),
		}
	}
}
