//! Lists the packages a project uses, both the ones it declares and the ones they pull in.
//!
//! # Usage
//! 1. Create a [`ProjectResolver`] over a [`ProjectDataSource`](crate::project::ProjectDataSource).
//! 1. [`ProjectResolver::compute_packages()`] whenever the package list is needed, results are cached
//! until the project's snapshot or declarations change.
//! 1. [`ProjectResolver::invalidate()`] to force the next call to start from scratch.
//!
//! When [`ResolverOptions::transitive_origins()`] is enabled every transitive package lists the
//! installed packages it is reachable from.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ResolverOptions;
use crate::CancellationToken;
use crate::error::check_cancelled;
use crate::package::*;
use crate::project::*;

mod target_graph;
use target_graph::TargetGraph;

mod collections;
use collections::*;

mod origins;
use origins::*;
pub use origins::TransitiveEntry;

/// Packages used by a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPackages {
	/// Packages declared by the project, one per identity, in declaration order.
	pub installed: Vec<PackageReference>,
	/// Packages only present through other packages, ordered by identity.
	pub transitive: Vec<TransitivePackageReference>,
}

impl ProjectPackages {
	pub fn is_empty(&self) -> bool {
		self.installed.is_empty() && self.transitive.is_empty()
	}
}

#[derive(Debug)]
struct ResolverCache {
	marker: Option<RecencyMarker>,
	needs_recompute: bool,
	/// Bumped by every invalidation, a computation that started before one mustn't mark the cache fresh.
	generation: u64,
	collections: Arc<PackageCollections>,
	/// `None` until origins have been traced for the current marker.
	origins: Option<Arc<OriginCache>>,
	package_folders: Arc<Vec<PathBuf>>,
}

impl Default for ResolverCache {
	fn default() -> Self {
		Self {
			marker: None,
			needs_recompute: true,
			generation: 0,
			collections: Default::default(),
			origins: None,
			package_folders: Default::default(),
		}
	}
}

/// Computes and caches the packages of one project.
///
/// Shared between tasks freely, the cache is only touched in short critical sections and finished
/// results are swapped in whole.
pub struct ProjectResolver<S> {
	source: S,
	options: ResolverOptions,
	cache: parking_lot::Mutex<ResolverCache>,
}

impl<S: ProjectDataSource> ProjectResolver<S> {
	pub fn new(source: S, options: ResolverOptions) -> Self {
		Self { source, options, cache: Default::default() }
	}

	pub fn source(&self) -> &S {
		&self.source
	}

	pub fn options(&self) -> &ResolverOptions {
		&self.options
	}

	/// Whether the next computation will rebuild everything regardless of the snapshot stamp.
	pub fn needs_recompute(&self) -> bool {
		self.cache.lock().needs_recompute
	}

	/// Discards cached results on the next computation.
	pub fn invalidate(&self) {
		log::debug!("Package cache invalidated");
		let mut cache = self.cache.lock();
		cache.generation += 1;
		cache.needs_recompute = true;
	}

	fn not_restored(&self) -> ProjectPackages {
		log::debug!("Project hasn't been restored, no packages");
		self.cache.lock().needs_recompute = true;
		ProjectPackages::default()
	}

	/// Installed and transitive packages of the project.
	///
	/// The snapshot is only read when the cache is stale. A project which hasn't been restored yet
	/// has no packages. Nothing is committed to the cache when `cancel` fires before completion.
	pub async fn compute_packages(&self, cancel: &CancellationToken) -> crate::Result<ProjectPackages> {
		check_cancelled(cancel)?;
		let generation = self.cache.lock().generation;

		let Some(spec) = self.source.project_spec().await? else {
			return Ok(self.not_restored())
		};
		let Some(stamp) = self.source.snapshot_stamp().await? else {
			return Ok(self.not_restored())
		};
		check_cancelled(cancel)?;

		let marker = RecencyMarker::new(&spec, stamp);
		let trace_origins = self.options.transitive_origins();

		let reusable = {
			let cache = self.cache.lock();
			let fresh = !cache.needs_recompute
				&& cache.marker == Some(marker)
				&& (!trace_origins || cache.origins.is_some());
			fresh.then(|| ((*cache.collections).clone(), cache.origins.clone()))
		};

		let (mut collections, snapshot, cached_origins) = match reusable {
			Some((collections, origins)) => {
				log::trace!("Reusing cached packages");
				(collections, None, origins)
			},
			None => {
				log::debug!("Computing packages from the graph snapshot");
				let Some(snapshot) = self.source.read_snapshot().await? else {
					return Ok(self.not_restored())
				};
				(PackageCollections::default(), Some(snapshot), None)
			},
		};
		check_cancelled(cancel)?;

		let mut installed = Vec::new();
		for declared in &spec.frameworks {
			installed.extend(collections.resolve_installed(declared, snapshot.as_ref()));
		}
		let installed = merge_by_framework_precedence(installed);

		let graphs: Vec<TargetGraph> = snapshot.iter().flat_map(|s| &s.targets).map(TargetGraph::new).collect();
		if snapshot.is_some() {
			collections.resolve_transitive(&graphs, &spec.package_ids(), cancel)?;
		}

		let origins = match (trace_origins, cached_origins) {
			(false, _) => None,
			(true, Some(origins)) => Some(origins),
			(true, None) => Some(Arc::new(OriginCache::build(&graphs, &installed, self.options.max_walk_depth(), cancel)?)),
		};

		let transitive = collections.transitive.values()
			.map(|r| match &origins {
				Some(o) => merge_transitive_origin(r.clone(), o.get(&r.identity.id)),
				None => TransitivePackageReference::new(r.clone()),
			})
			.collect();

		check_cancelled(cancel)?;
		{
			let mut cache = self.cache.lock();
			cache.marker = Some(marker);
			cache.collections = Arc::new(collections);
			if let Some(snapshot) = &snapshot {
				cache.package_folders = Arc::new(snapshot.package_folders.clone());
				cache.origins = origins;
			} else if origins.is_some() {
				cache.origins = origins;
			}
			if cache.generation == generation {
				cache.needs_recompute = false;
			} else {
				log::debug!("Cache invalidated during computation, it stays stale");
			}
		}

		Ok(ProjectPackages { installed, transitive })
	}

	/// Only the installed part of [`compute_packages()`](Self::compute_packages).
	pub async fn installed_packages(&self, cancel: &CancellationToken) -> crate::Result<Vec<PackageReference>> {
		Ok(self.compute_packages(cancel).await?.installed)
	}

	/// Folders packages were extracted to by the last restore.
	pub async fn package_folders(&self) -> crate::Result<Vec<PathBuf>> {
		let Some(spec) = self.source.project_spec().await? else { return Ok(Vec::new()) };
		let Some(stamp) = self.source.snapshot_stamp().await? else { return Ok(Vec::new()) };

		{
			let cache = self.cache.lock();
			if !cache.needs_recompute && cache.marker == Some(RecencyMarker::new(&spec, stamp)) {
				return Ok(cache.package_folders.to_vec())
			}
		}

		Ok(self.source.read_snapshot().await?.map(|s| s.package_folders).unwrap_or_default())
	}
}
