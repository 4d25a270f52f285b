//! The project model the resolver consumes.
//!
//! A project is described by two things,
//! - Its [`ProjectSpec`], the dependencies declared per target framework.
//! - A [`GraphSnapshot`] produced by a previous restore, the fully resolved dependency graph for each
//! (framework, runtime id) target.
//!
//! Both are supplied through a [`ProjectDataSource`].

use std::hash::{Hash, Hasher};

use serde::{Serialize, Deserialize};

use crate::package::*;

mod graph_snapshot;
pub use graph_snapshot::GraphSnapshot;
pub use graph_snapshot::GraphTarget;
pub use graph_snapshot::GraphLibrary;
pub use graph_snapshot::GraphDependency;

mod data_source;
pub use data_source::ProjectDataSource;
pub use data_source::FileDataSource;
pub use data_source::MemoryDataSource;

/// A dependency as written in the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredDependency {
	pub id: String,
	#[serde(default)]
	pub version_range: VersionRange,
	#[serde(default)]
	pub kind: LibraryKind,
	/// Assets of this dependency don't flow to consumers of the project.
	#[serde(default)]
	pub development_dependency: bool,
}

impl DeclaredDependency {
	pub fn package(id: impl Into<String>, version_range: VersionRange) -> Self {
		Self { id: id.into(), version_range, kind: LibraryKind::Package, development_dependency: false }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameworkDependencies {
	pub framework: TargetFramework,
	#[serde(default)]
	pub dependencies: Vec<DeclaredDependency>,
}

/// Declared dependencies of a project, one entry per target framework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectSpec {
	pub frameworks: Vec<FrameworkDependencies>,
}

impl ProjectSpec {
	/// A hash of the whole spec, used to notice declaration changes without keeping the old spec around.
	pub fn content_hash(&self) -> u64 {
		let mut hasher = std::collections::hash_map::DefaultHasher::new();
		self.hash(&mut hasher);
		hasher.finish()
	}

	/// Lower case ids of every package declared for any framework.
	pub fn package_ids(&self) -> std::collections::HashSet<String> {
		self.frameworks.iter()
			.flat_map(|f| &f.dependencies)
			.filter(|d| d.kind == LibraryKind::Package)
			.map(|d| d.id.to_lowercase())
			.collect()
	}
}

/// Recency of a graph snapshot.
///
/// Never interpreted, only compared for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotStamp {
	/// Modification time of the file backing the snapshot.
	Modified(std::time::SystemTime),
	/// A counter bumped every time an in-memory snapshot is replaced.
	Generation(u64),
}

/// Everything the cached results depend on. A change to either part invalidates the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecencyMarker {
	pub snapshot: SnapshotStamp,
	pub spec_hash: u64,
}

impl RecencyMarker {
	pub fn new(spec: &ProjectSpec, snapshot: SnapshotStamp) -> Self {
		Self { snapshot, spec_hash: spec.content_hash() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spec(range: &str) -> ProjectSpec {
		ProjectSpec {
			frameworks: vec![FrameworkDependencies {
				framework: TargetFramework::parse("net8.0").unwrap(),
				dependencies: vec![DeclaredDependency::package("A", VersionRange::parse(range).unwrap())],
			}],
		}
	}

	#[test] fn content_hash_is_stable() { assert_eq!(spec("1.0").content_hash(), spec("1.0").content_hash()) }
	#[test] fn content_hash_tracks_declarations() { assert_ne!(spec("1.0").content_hash(), spec("2.0").content_hash()) }
	#[test] fn marker_tracks_stamp() {
		let s = spec("1.0");
		assert_ne!(RecencyMarker::new(&s, SnapshotStamp::Generation(1)), RecencyMarker::new(&s, SnapshotStamp::Generation(2)));
	}

	#[test]
	fn spec_reads_from_json() {
		let json = r#"{ "frameworks": [ { "framework": "net8.0", "dependencies": [ { "id": "Serilog", "version_range": "[3.0,4.0)" } ] } ] }"#;
		let spec: ProjectSpec = serde_json::from_str(json).unwrap();
		let dep = &spec.frameworks[0].dependencies[0];
		assert_eq!(dep.kind, LibraryKind::Package);
		assert!(dep.version_range.satisfies(&PackageVersion::new("3.1.0").unwrap()));
	}
}
