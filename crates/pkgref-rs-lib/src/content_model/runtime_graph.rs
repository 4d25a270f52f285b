use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use serde::Deserialize;

/// Which runtime identifiers each runtime identifier can use assets of.
///
/// Read from the `runtime.json` layout, `{ "runtimes": { "win-x64": { "#import": [ "win" ] } } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeGraph {
	imports: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct RuntimeFile {
	#[serde(default)]
	runtimes: HashMap<String, RuntimeEntry>,
}

#[derive(Deserialize)]
struct RuntimeEntry {
	#[serde(rename = "#import", default)]
	imports: Vec<String>,
}

impl RuntimeGraph {
	pub fn new() -> Self {
		Self::default()
	}

	/// The common desktop and server runtimes.
	pub fn standard() -> Self {
		let mut graph = Self::new();
		graph.add("base", &[]);
		graph.add("any", &["base"]);
		graph.add("win", &["any"]);
		graph.add("win-x86", &["win"]);
		graph.add("win-x64", &["win"]);
		graph.add("win-arm64", &["win"]);
		graph.add("win10", &["win"]);
		graph.add("win10-x86", &["win10", "win-x86"]);
		graph.add("win10-x64", &["win10", "win-x64"]);
		graph.add("win10-arm64", &["win10", "win-arm64"]);
		graph.add("unix", &["any"]);
		graph.add("linux", &["unix"]);
		graph.add("linux-x64", &["linux"]);
		graph.add("linux-arm64", &["linux"]);
		graph.add("linux-musl", &["linux"]);
		graph.add("linux-musl-x64", &["linux-musl", "linux-x64"]);
		graph.add("linux-musl-arm64", &["linux-musl", "linux-arm64"]);
		graph.add("osx", &["unix"]);
		graph.add("osx-x64", &["osx"]);
		graph.add("osx-arm64", &["osx"]);
		graph
	}

	pub fn from_json(json: &str) -> crate::Result<Self> {
		let file: RuntimeFile = serde_json::from_str(json)?;
		let mut graph = Self::new();
		for (rid, entry) in file.runtimes {
			graph.imports.insert(rid.to_ascii_lowercase(), entry.imports.iter().map(|i| i.to_ascii_lowercase()).collect());
		}
		Ok(graph)
	}

	/// Adds or replaces a runtime and what it imports, in preference order.
	pub fn add(&mut self, rid: &str, imports: &[&str]) {
		self.imports.insert(rid.to_ascii_lowercase(), imports.iter().map(|i| i.to_ascii_lowercase()).collect());
	}

	/// `rid` followed by everything it imports directly or indirectly, nearest first.
	pub fn expand(&self, rid: &str) -> Vec<String> {
		let mut expanded = Vec::new();
		let mut seen = HashSet::new();
		let mut queue = VecDeque::from([rid.to_ascii_lowercase()]);

		while let Some(current) = queue.pop_front() {
			if !seen.insert(current.clone()) {
				continue;
			}
			if let Some(imports) = self.imports.get(&current) {
				queue.extend(imports.iter().cloned());
			}
			expanded.push(current);
		}

		expanded
	}

	/// Whether assets for `candidate` can be used on `wanted`.
	pub fn are_compatible(&self, wanted: &str, candidate: &str) -> bool {
		wanted.eq_ignore_ascii_case(candidate) || self.expand(wanted).iter().any(|r| r.eq_ignore_ascii_case(candidate))
	}

	/// `Greater` when `a` is nearer to `wanted` than `b`.
	pub fn nearer(&self, wanted: &str, a: &str, b: &str) -> Ordering {
		let expanded = self.expand(wanted);
		let position = |rid: &str| expanded.iter().position(|r| r.eq_ignore_ascii_case(rid)).unwrap_or(usize::MAX);
		position(b).cmp(&position(a))
	}
}
