//! A petgraph view over one resolved target, only concerned with walking dependency edges.

use petgraph::prelude::*;
use petgraph::visit::{Visitable, VisitMap};

use crate::package::*;
use crate::project::GraphTarget;

/// Node `i` is library `i` of the target. An edge exists for every dependency that could be matched
/// to a package library in the same target.
#[derive(Debug)]
pub(crate) struct TargetGraph<'s> {
	pub target: &'s GraphTarget,
	pub pair: FrameworkRuntimePair,
	graph: DiGraph<(), ()>,
}

impl<'s> TargetGraph<'s> {
	pub fn new(target: &'s GraphTarget) -> Self {
		let mut graph = DiGraph::<(), ()>::with_capacity(target.libraries.len(), 0);
		for _ in &target.libraries {
			graph.add_node(());
		}

		for (i, lib) in target.libraries.iter().enumerate() {
			for dep in &lib.dependencies {
				/* The dependency stands in for a package at the lowest version its range allows */
				match target.find_library(&dep.id, Some(&dep.version_range), dep.version_range.min_version()) {
					Some(j) => { graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ()); },
					None => log::trace!("Dependency {} {} of {} has no match in target {}, skipping", dep.id, dep.version_range, lib.name, target.framework),
				}
			}
		}

		Self { pair: target.pair(), target, graph }
	}

	/// Node for the package `reference` points at.
	pub fn find(&self, reference: &PackageReference) -> Option<NodeIndex> {
		self.target.find_library(&reference.identity.id, reference.allowed_versions.as_ref(), reference.identity.version.as_ref())
			.map(NodeIndex::new)
	}

	pub fn library(&self, node: NodeIndex) -> &'s crate::project::GraphLibrary {
		&self.target.libraries[node.index()]
	}

	/// Depth first walk from `start`, each node is visited at most once.
	///
	/// `visit` receives every node reached and its distance from `start`, returning `false` stops
	/// the walk from descending past that node. Errors returned by `visit` abort the walk.
	pub fn walk<F>(&self, start: NodeIndex, mut visit: F) -> crate::Result<()>
	where F: FnMut(NodeIndex, usize) -> crate::Result<bool>
	{
		let mut visited = self.graph.visit_map();
		let mut stack = vec![(start, 0usize)];
		visited.visit(start);

		while let Some((node, depth)) = stack.pop() {
			if !visit(node, depth)? {
				continue;
			}
			for child in self.graph.neighbors_directed(node, Outgoing) {
				if visited.visit(child) {
					stack.push((child, depth + 1));
				}
			}
		}

		Ok(())
	}
}
