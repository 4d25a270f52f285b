//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use pkgref_rs::package::*;
use pkgref_rs::project::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("pkgref-rs error: {0}")]
	Library(#[from] pkgref_rs::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A package library of a resolved target.
/// # Parameters
/// - `dependencies` - `(id, version range)` pairs
pub fn library(name: &str, version: &str, dependencies: &[(&str, &str)]) -> Result<GraphLibrary> {
	Ok(GraphLibrary {
		name: name.to_string(),
		version: PackageVersion::new(version)?,
		kind: LibraryKind::Package,
		dependencies: dependencies.iter()
			.map(|(id, range)| Ok(GraphDependency { id: id.to_string(), version_range: VersionRange::parse(range)? }))
			.collect::<Result<_>>()?,
	})
}

pub fn target(framework: &str, runtime_identifier: Option<&str>, libraries: Vec<GraphLibrary>) -> Result<GraphTarget> {
	Ok(GraphTarget {
		framework: TargetFramework::parse(framework)?,
		runtime_identifier: runtime_identifier.map(str::to_string),
		libraries,
	})
}

/// Packages declared for one framework.
/// # Parameters
/// - `packages` - `(id, version range)` pairs
pub fn declared(framework: &str, packages: &[(&str, &str)]) -> Result<FrameworkDependencies> {
	Ok(FrameworkDependencies {
		framework: TargetFramework::parse(framework)?,
		dependencies: packages.iter()
			.map(|(id, range)| Ok(DeclaredDependency::package(*id, VersionRange::parse(range)?)))
			.collect::<Result<_>>()?,
	})
}

/// A project declaring `A` and `D` for net6.0 and net8.0.
///
/// `A -> B -> C` and `D -> C` in both targets, `A` resolves to 1.0.0 for net6.0 and 2.0.0 for net8.0.
pub fn diamond_project() -> Result<(ProjectSpec, GraphSnapshot)> {
	let spec = ProjectSpec {
		frameworks: vec![
			declared("net6.0", &[("A", "1.0.0"), ("D", "1.0.0")])?,
			declared("net8.0", &[("A", "2.0.0"), ("D", "1.0.0")])?,
		],
	};

	let libraries = |a_version: &str| -> Result<Vec<GraphLibrary>> {
		Ok(vec![
			library("A", a_version, &[("B", "1.0.0")])?,
			library("B", "1.0.0", &[("C", "1.0.0")])?,
			library("C", "1.0.0", &[])?,
			library("D", "1.0.0", &[("C", "1.0.0")])?,
		])
	};

	let snapshot = GraphSnapshot {
		targets: vec![
			target("net6.0", None, libraries("1.0.0")?)?,
			target("net8.0", None, libraries("2.0.0")?)?,
		],
		package_folders: vec![std::path::PathBuf::from("/packages")],
	};

	Ok((spec, snapshot))
}

/// A project stored as JSON files in a temporary directory, removed on drop.
pub struct ProjectFiles {
	pub dir: tempfile::TempDir,
}

impl ProjectFiles {
	pub fn new() -> Result<Self> {
		Ok(Self { dir: tempfile::tempdir()? })
	}

	pub fn spec_path(&self) -> std::path::PathBuf {
		self.dir.path().join("project.json")
	}

	pub fn snapshot_path(&self) -> std::path::PathBuf {
		self.dir.path().join("project.assets.json")
	}

	pub fn write_spec(&self, spec: &ProjectSpec) -> Result<()> {
		std::fs::write(self.spec_path(), serde_json::to_vec_pretty(spec)?)?;
		Ok(())
	}

	pub fn write_snapshot(&self, snapshot: &GraphSnapshot) -> Result<()> {
		std::fs::write(self.snapshot_path(), serde_json::to_vec_pretty(snapshot)?)?;
		Ok(())
	}

	pub fn source(&self) -> FileDataSource {
		FileDataSource::new(self.spec_path(), self.snapshot_path())
	}
}

/// Creates empty files at each relative path below `root`.
pub fn create_payload(root: &std::path::Path, paths: &[&str]) -> Result<()> {
	for path in paths {
		let full = root.join(path);
		if let Some(parent) = full.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(full, b"")?;
	}
	Ok(())
}
