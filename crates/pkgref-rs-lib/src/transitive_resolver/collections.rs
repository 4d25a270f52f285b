use std::collections::{BTreeMap, HashMap, HashSet};

use crate::package::*;
use crate::project::*;
use super::target_graph::TargetGraph;

/// Results of the last full computation, reused while the snapshot hasn't changed.
#[derive(Debug, Clone, Default)]
pub(crate) struct PackageCollections {
	/// Resolved identity of each declared package, keyed by framework and lower case id.
	pub installed: BTreeMap<(TargetFramework, String), PackageIdentity>,
	/// Every transitive package, a single reference per identity.
	pub transitive: BTreeMap<PackageIdentity, PackageReference>,
}

impl PackageCollections {
	/// References for the packages declared for one framework.
	///
	/// With a snapshot the version comes from the first target for the framework containing the
	/// package, without one the previously resolved version is reused. Failing both the lowest
	/// version the declared range allows is used.
	pub fn resolve_installed(&mut self, declared: &FrameworkDependencies, snapshot: Option<&GraphSnapshot>) -> Vec<PackageReference> {
		let framework = &declared.framework;
		let mut refs = Vec::new();

		for dep in declared.dependencies.iter().filter(|d| d.kind == LibraryKind::Package) {
			let key = (framework.clone(), dep.id.to_lowercase());

			let resolved = match snapshot {
				Some(snapshot) => {
					let found = snapshot.targets_for(framework).find_map(|t| t.find_package_by_name(&dep.id)).map(|l| l.identity());
					if let Some(identity) = &found {
						self.installed.insert(key, identity.clone());
					}
					found
				},
				None => self.installed.get(&key).cloned(),
			};

			let identity = match resolved {
				Some(i) => PackageIdentity::new(dep.id.clone(), i.version),
				None => {
					log::debug!("{} isn't in the resolved graph for {}, using its lowest allowed version", dep.id, framework);
					PackageIdentity::new(dep.id.clone(), dep.version_range.min_version().cloned())
				},
			};

			refs.push(PackageReference {
				identity,
				target_framework: framework.clone(),
				allowed_versions: Some(dep.version_range.clone()),
				user_installed: true,
				development_dependency: dep.development_dependency,
				requires_reinstallation: false,
			});
		}

		refs
	}

	/// Records every package library in `graphs` not declared by the project.
	///
	/// Dependencies of each such package are walked so packages only reachable through other
	/// transitive packages are included too.
	pub fn resolve_transitive(&mut self, graphs: &[TargetGraph], installed_ids: &HashSet<String>, cancel: &crate::CancellationToken) -> crate::Result<()> {
		let is_transitive = |lib: &GraphLibrary| lib.is_package() && !installed_ids.contains(&lib.name.to_lowercase());

		for graph in graphs {
			crate::error::check_cancelled(cancel)?;
			let framework = &graph.target.framework;
			let mut seen = HashSet::new();

			for (i, lib) in graph.target.libraries.iter().enumerate() {
				if !is_transitive(lib) || seen.contains(&i) {
					continue;
				}
				graph.walk(petgraph::graph::NodeIndex::new(i), |node, _| {
					let lib = graph.library(node);
					if !is_transitive(lib) || !seen.insert(node.index()) {
						return Ok(false)
					}
					self.insert_transitive(PackageReference::new(lib.identity(), framework.clone()));
					Ok(true)
				})?;
			}
		}

		Ok(())
	}

	/// Keeps the framework which comes first by precedence when the identity is already present.
	fn insert_transitive(&mut self, reference: PackageReference) {
		match self.transitive.get_mut(&reference.identity) {
			Some(existing) if reference.target_framework < existing.target_framework => *existing = reference,
			Some(_) => {},
			None => { self.transitive.insert(reference.identity.clone(), reference); },
		}
	}
}

/// Collapses references with the same identity, keeping the one whose framework comes first by
/// precedence. Order of first appearance is kept.
pub(crate) fn merge_by_framework_precedence(refs: impl IntoIterator<Item = PackageReference>) -> Vec<PackageReference> {
	let mut merged: Vec<PackageReference> = Vec::new();
	let mut index: HashMap<PackageIdentity, usize> = HashMap::new();

	for reference in refs {
		match index.get(&reference.identity) {
			Some(&i) => {
				if reference.target_framework < merged[i].target_framework {
					merged[i] = reference;
				}
			},
			None => {
				index.insert(reference.identity.clone(), merged.len());
				merged.push(reference);
			},
		}
	}

	merged
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fw(s: &str) -> TargetFramework {
		TargetFramework::parse(s).unwrap()
	}

	fn reference(id: &str, version: &str, framework: &str) -> PackageReference {
		PackageReference::new(PackageIdentity::new(id, Some(PackageVersion::new(version).unwrap())), fw(framework))
	}

	#[test]
	fn merge_keeps_first_framework_by_precedence() {
		let merged = merge_by_framework_precedence(vec![
			reference("A", "1.0", "net8.0"),
			reference("B", "1.0", "net8.0"),
			reference("A", "1.0", "net6.0"),
		]);
		assert_eq!(merged.len(), 2);
		assert_eq!(merged[0].identity.id, "A");
		assert_eq!(merged[0].target_framework, fw("net6.0"));
	}

	#[test]
	fn merge_keeps_distinct_versions() {
		let merged = merge_by_framework_precedence(vec![reference("A", "1.0", "net8.0"), reference("A", "2.0", "net6.0")]);
		assert_eq!(merged.len(), 2);
	}

	#[test]
	fn installed_falls_back_to_range_minimum() {
		let declared = FrameworkDependencies {
			framework: fw("net8.0"),
			dependencies: vec![DeclaredDependency::package("A", VersionRange::parse("[1.2,2.0)").unwrap())],
		};
		let refs = PackageCollections::default().resolve_installed(&declared, Some(&GraphSnapshot::default()));
		assert_eq!(refs[0].identity.version, Some(PackageVersion::new("1.2").unwrap()));
		assert!(refs[0].user_installed);
	}

	#[test]
	fn installed_reuses_previous_resolution() {
		let mut collections = PackageCollections::default();
		collections.installed.insert((fw("net8.0"), "a".to_string()), PackageIdentity::new("A", Some(PackageVersion::new("1.7").unwrap())));
		let declared = FrameworkDependencies {
			framework: fw("net8.0"),
			dependencies: vec![DeclaredDependency::package("A", VersionRange::parse("1.0").unwrap())],
		};
		let refs = collections.resolve_installed(&declared, None);
		assert_eq!(refs[0].identity.version, Some(PackageVersion::new("1.7").unwrap()));
	}
}
