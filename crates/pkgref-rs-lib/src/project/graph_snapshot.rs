use serde::{Serialize, Deserialize};

use crate::package::*;

/// A dependency edge of a resolved library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphDependency {
	pub id: String,
	#[serde(default)]
	pub version_range: VersionRange,
}

/// A library as resolved for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLibrary {
	pub name: String,
	pub version: PackageVersion,
	#[serde(default)]
	pub kind: LibraryKind,
	#[serde(default)]
	pub dependencies: Vec<GraphDependency>,
}

impl GraphLibrary {
	pub fn identity(&self) -> PackageIdentity {
		PackageIdentity::new(self.name.clone(), Some(self.version.clone()))
	}

	pub fn is_package(&self) -> bool {
		self.kind == LibraryKind::Package
	}

	/// Whether this library is the package a reference points at.
	///
	/// The name must match and either the allowed range is satisfied by the resolved version or
	/// the versions are exactly equal.
	pub fn matches(&self, id: &str, allowed_versions: Option<&VersionRange>, version: Option<&PackageVersion>) -> bool {
		self.is_package()
			&& self.name.eq_ignore_ascii_case(id)
			&& (allowed_versions.map_or(false, |r| r.satisfies(&self.version)) || version == Some(&self.version))
	}
}

/// The resolved graph for a single (framework, runtime id) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphTarget {
	pub framework: TargetFramework,
	#[serde(default)]
	pub runtime_identifier: Option<String>,
	#[serde(default)]
	pub libraries: Vec<GraphLibrary>,
}

impl GraphTarget {
	pub fn pair(&self) -> FrameworkRuntimePair {
		FrameworkRuntimePair::new(self.framework.clone(), self.runtime_identifier.clone())
	}

	/// First package library matching per [`GraphLibrary::matches()`].
	pub fn find_library(&self, id: &str, allowed_versions: Option<&VersionRange>, version: Option<&PackageVersion>) -> Option<usize> {
		self.libraries.iter().position(|lib| lib.matches(id, allowed_versions, version))
	}

	/// First package library named `id` regardless of version.
	pub fn find_package_by_name(&self, id: &str) -> Option<&GraphLibrary> {
		self.libraries.iter().find(|lib| lib.is_package() && lib.name.eq_ignore_ascii_case(id))
	}
}

/// The output of a restore, treated as immutable once read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	pub targets: Vec<GraphTarget>,
	/// Folders packages were extracted to.
	#[serde(default)]
	pub package_folders: Vec<std::path::PathBuf>,
}

impl GraphSnapshot {
	/// Targets for `framework`, the runtime-less target first.
	pub fn targets_for<'a>(&'a self, framework: &'a TargetFramework) -> impl Iterator<Item = &'a GraphTarget> + 'a {
		let neutral = self.targets.iter().filter(move |t| &t.framework == framework && t.runtime_identifier.is_none());
		let specific = self.targets.iter().filter(move |t| &t.framework == framework && t.runtime_identifier.is_some());
		neutral.chain(specific)
	}
}
