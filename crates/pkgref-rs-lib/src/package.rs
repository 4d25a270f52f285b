//! Various types associated with packages.

mod package_version;
pub use package_version::PackageVersion;

mod version_range;
pub use version_range::VersionRange;

mod identity;
pub use identity::PackageIdentity;

mod target_framework;
pub use target_framework::TargetFramework;
pub use target_framework::FrameworkFamily;
pub use target_framework::FrameworkVersion;

mod reference;
pub use reference::PackageReference;
pub use reference::TransitivePackageReference;
pub use reference::FrameworkRuntimePair;

/// The kind of a library in a dependency declaration or a resolved graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
	#[default] Package,
	/// Another project referenced by this one.
	Project,
	/// References to plain files, framework assemblies and such.
	Other,
}
