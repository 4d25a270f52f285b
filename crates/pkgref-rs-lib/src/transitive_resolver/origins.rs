//! Tracing transitive packages back to the installed packages which pull them in.

use std::collections::{BTreeMap, HashMap};

use crate::package::*;
use super::target_graph::TargetGraph;

/// Installed packages reaching a transitive package, per target.
pub type TransitiveEntry = BTreeMap<FrameworkRuntimePair, Vec<PackageReference>>;

/// Transitive entries keyed by lower case package id.
#[derive(Debug, Clone, Default)]
pub(crate) struct OriginCache {
	entries: HashMap<String, TransitiveEntry>,
}

impl OriginCache {
	pub fn get(&self, id: &str) -> Option<&TransitiveEntry> {
		self.entries.get(&id.to_lowercase())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	fn mark(&mut self, id: &str, pair: &FrameworkRuntimePair, top: &PackageReference) {
		let list = self.entries.entry(id.to_lowercase()).or_default().entry(pair.clone()).or_default();
		if !list.contains(top) {
			list.push(top.clone());
		}
	}

	/// Walks the graph of every target once per installed package.
	///
	/// Every package reachable from an installed package gets it recorded as an origin, including
	/// the installed package itself. Walks stop descending at `max_depth`.
	pub fn build(graphs: &[TargetGraph], installed: &[PackageReference], max_depth: usize, cancel: &crate::CancellationToken) -> crate::Result<Self> {
		let mut cache = Self::default();

		for graph in graphs {
			for top in installed {
				crate::error::check_cancelled(cancel)?;
				let Some(start) = graph.find(top) else {
					log::trace!("{} isn't part of target {}", top.identity, graph.pair);
					continue
				};

				graph.walk(start, |node, depth| {
					crate::error::check_cancelled(cancel)?;
					cache.mark(&graph.library(node).name, &graph.pair, top);
					if depth >= max_depth {
						log::warn!("Dependencies of {} go deeper than {} in {}, not following them further", top.identity, max_depth, graph.pair);
						return Ok(false)
					}
					Ok(true)
				})?;
			}
		}

		log::debug!("Traced origins of {} packages", cache.len());
		Ok(cache)
	}
}

/// Flattens `entry` over all targets into a single reference per package id, keeping the highest
/// version of each, ordered by id.
pub(crate) fn merge_transitive_origin(reference: PackageReference, entry: Option<&TransitiveEntry>) -> TransitivePackageReference {
	let mut highest: BTreeMap<String, PackageReference> = BTreeMap::new();

	for origin in entry.into_iter().flat_map(|e| e.values()).flatten() {
		match highest.get_mut(&origin.identity.id_key()) {
			Some(existing) => {
				if existing.identity.version < origin.identity.version {
					*existing = origin.clone();
				}
			},
			None => { highest.insert(origin.identity.id_key(), origin.clone()); },
		}
	}

	TransitivePackageReference { reference, origins: highest.into_values().collect() }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::project::*;

	fn fw(s: &str) -> TargetFramework {
		TargetFramework::parse(s).unwrap()
	}

	fn lib(name: &str, version: &str, deps: &[&str]) -> GraphLibrary {
		GraphLibrary {
			name: name.to_string(),
			version: PackageVersion::new(version).unwrap(),
			kind: LibraryKind::Package,
			dependencies: deps.iter().map(|id| GraphDependency { id: id.to_string(), version_range: VersionRange::parse("1.0").unwrap() }).collect(),
		}
	}

	fn installed(id: &str, version: &str, framework: &str) -> PackageReference {
		PackageReference::new(PackageIdentity::new(id, Some(PackageVersion::new(version).unwrap())), fw(framework))
			.with_allowed_versions(VersionRange::parse(version).unwrap())
	}

	fn origin_ids(cache: &OriginCache, id: &str) -> Vec<String> {
		let merged = merge_transitive_origin(installed(id, "1.0", "net8.0"), cache.get(id));
		merged.origins.into_iter().map(|o| o.identity.id).collect()
	}

	#[test]
	fn origins_follow_chains() {
		let target = GraphTarget {
			framework: fw("net8.0"),
			runtime_identifier: None,
			libraries: vec![lib("A", "1.0", &["B"]), lib("B", "1.0", &["C"]), lib("C", "1.0", &[]), lib("D", "1.0", &["C"])],
		};
		let graphs = vec![TargetGraph::new(&target)];
		let cache = OriginCache::build(&graphs, &[installed("A", "1.0", "net8.0"), installed("D", "1.0", "net8.0")], 256, &Default::default()).unwrap();

		assert_eq!(origin_ids(&cache, "b"), vec!["A"]);
		assert_eq!(origin_ids(&cache, "C"), vec!["A", "D"]);
	}

	#[test]
	fn merge_keeps_highest_version_across_targets() {
		let pair6 = FrameworkRuntimePair::new(fw("net6.0"), None);
		let pair8 = FrameworkRuntimePair::new(fw("net8.0"), None);
		let mut entry = TransitiveEntry::new();
		entry.insert(pair6, vec![installed("A", "1.0", "net6.0")]);
		entry.insert(pair8, vec![installed("A", "2.0", "net8.0")]);

		let merged = merge_transitive_origin(installed("C", "1.0", "net8.0"), Some(&entry));
		assert_eq!(merged.origins.len(), 1);
		assert_eq!(merged.origins[0].identity.version, Some(PackageVersion::new("2.0").unwrap()));
	}

	#[test]
	fn no_entry_means_no_origins() {
		assert!(merge_transitive_origin(installed("C", "1.0", "net8.0"), None).origins.is_empty());
	}

	#[test]
	fn depth_limit_stops_descent() {
		let target = GraphTarget {
			framework: fw("net8.0"),
			runtime_identifier: None,
			libraries: vec![lib("A", "1.0", &["B"]), lib("B", "1.0", &["C"]), lib("C", "1.0", &[])],
		};
		let graphs = vec![TargetGraph::new(&target)];
		let cache = OriginCache::build(&graphs, &[installed("A", "1.0", "net8.0")], 1, &Default::default()).unwrap();
		assert!(cache.get("B").is_some());
		assert!(cache.get("C").is_none());
	}

	#[test]
	fn cancelled_build_fails() {
		let target = GraphTarget { framework: fw("net8.0"), runtime_identifier: None, libraries: vec![lib("A", "1.0", &[])] };
		let graphs = vec![TargetGraph::new(&target)];
		let cancel = crate::CancellationToken::new();
		cancel.cancel();
		assert!(matches!(OriginCache::build(&graphs, &[installed("A", "1.0", "net8.0")], 256, &cancel), Err(crate::Error::Cancelled)));
	}
}
