use std::sync::Arc;

use super::*;

/// The standard layouts of a package.
#[derive(Debug, Clone)]
pub struct ManagedCodePatterns {
	/// Assemblies loaded at runtime, `runtimes/{rid}/lib/{tfm}` and `lib/{tfm}`.
	pub runtime_assemblies: PatternSet,
	/// Reference assemblies compiled against, `ref/{tfm}`.
	pub compile_ref_assemblies: PatternSet,
	/// Compile assemblies for packages without a `ref` folder.
	pub compile_lib_assemblies: PatternSet,
	pub native_libraries: PatternSet,
	/// Satellite assemblies, `lib/{tfm}/{locale}`.
	pub resource_assemblies: PatternSet,
	pub msbuild_files: PatternSet,
	pub content_files: PatternSet,
	pub tools_assemblies: PatternSet,
}

/// Property definitions, pattern sets and criteria for managed code packages.
#[derive(Debug, Clone)]
pub struct ManagedCodeConventions {
	properties: Arc<PropertyTable>,
	runtime_graph: Arc<RuntimeGraph>,
	patterns: ManagedCodePatterns,
}

fn standard_properties(runtime_graph: &Arc<RuntimeGraph>) -> PropertyTable {
	[
		ContentPropertyDefinition::new("tfm", PropertyKind::Framework),
		ContentPropertyDefinition::new("rid", PropertyKind::Runtime(Arc::clone(runtime_graph))),
		ContentPropertyDefinition::new("assembly", PropertyKind::Text).with_file_extensions(&[".dll", ".winmd", ".exe"]),
		ContentPropertyDefinition::new("msbuild", PropertyKind::Text).with_file_extensions(&[".targets", ".props"]),
		ContentPropertyDefinition::new("satelliteAssembly", PropertyKind::Text).with_file_extensions(&[".resources.dll"]),
		ContentPropertyDefinition::new("locale", PropertyKind::Locale),
		ContentPropertyDefinition::new("codeLanguage", PropertyKind::Text),
		ContentPropertyDefinition::new("any", PropertyKind::Any).with_subfolders(),
	]
	.into_iter()
	.map(|d| (d.name.clone(), d))
	.collect()
}

impl ManagedCodeConventions {
	pub fn new(runtime_graph: RuntimeGraph) -> Self {
		let runtime_graph = Arc::new(runtime_graph);
		let properties = Arc::new(standard_properties(&runtime_graph));
		let set = |groups: Vec<PatternDefinition>, paths: Vec<PatternDefinition>| PatternSet::new(Arc::clone(&properties), groups, paths);
		let pattern = PatternDefinition::new;
		let net = || TargetFramework::parse_folder("net");

		let patterns = ManagedCodePatterns {
			runtime_assemblies: set(
				vec![pattern("runtimes/{rid}/lib/{tfm}/{any?}"), pattern("lib/{tfm}/{any?}"), pattern("lib/{assembly?}").with_default("tfm", net())],
				vec![pattern("runtimes/{rid}/lib/{tfm}/{assembly}"), pattern("lib/{tfm}/{assembly}"), pattern("lib/{assembly}").with_default("tfm", net())],
			),
			compile_ref_assemblies: set(
				vec![pattern("ref/{tfm}/{any?}")],
				vec![pattern("ref/{tfm}/{assembly}")],
			),
			compile_lib_assemblies: set(
				vec![pattern("lib/{tfm}/{any?}"), pattern("lib/{assembly?}").with_default("tfm", net())],
				vec![pattern("lib/{tfm}/{assembly}"), pattern("lib/{assembly}").with_default("tfm", net())],
			),
			native_libraries: set(
				vec![pattern("runtimes/{rid}/nativeassets/{tfm}/{any?}"), pattern("runtimes/{rid}/native/{any?}").with_default("tfm", TargetFramework::any())],
				vec![pattern("runtimes/{rid}/nativeassets/{tfm}/{any}"), pattern("runtimes/{rid}/native/{any}").with_default("tfm", TargetFramework::any())],
			),
			resource_assemblies: set(
				vec![pattern("runtimes/{rid}/lib/{tfm}/{locale?}/{any?}"), pattern("lib/{tfm}/{locale?}/{any?}")],
				vec![pattern("runtimes/{rid}/lib/{tfm}/{locale}/{satelliteAssembly}"), pattern("lib/{tfm}/{locale}/{satelliteAssembly}")],
			),
			msbuild_files: set(
				vec![pattern("build/{tfm}/{msbuild?}"), pattern("build/{msbuild?}").with_default("tfm", TargetFramework::any())],
				vec![pattern("build/{tfm}/{msbuild}"), pattern("build/{msbuild}").with_default("tfm", TargetFramework::any())],
			),
			content_files: set(
				vec![pattern("contentFiles/{codeLanguage}/{tfm}/{any?}")],
				vec![pattern("contentFiles/{codeLanguage}/{tfm}/{any}")],
			),
			tools_assemblies: set(
				vec![pattern("tools/{tfm}/{rid}/{any?}")],
				vec![pattern("tools/{tfm}/{rid}/{any}")],
			),
		};

		Self { properties, runtime_graph, patterns }
	}

	pub fn properties(&self) -> &Arc<PropertyTable> {
		&self.properties
	}

	pub fn runtime_graph(&self) -> &RuntimeGraph {
		&self.runtime_graph
	}

	pub fn patterns(&self) -> &ManagedCodePatterns {
		&self.patterns
	}

	/// Assets for `framework` that aren't specific to any runtime.
	pub fn for_framework(&self, framework: &TargetFramework) -> SelectionCriteria {
		SelectionCriteria::new()
			.entry(SelectionCriteriaEntry::new().with("tfm", framework.clone()).without("rid"))
	}

	/// Runtime specific assets first, falling back to runtime agnostic ones.
	pub fn for_framework_and_runtime(&self, framework: &TargetFramework, runtime_identifier: Option<&str>) -> SelectionCriteria {
		let mut criteria = SelectionCriteria::new();
		if let Some(rid) = runtime_identifier {
			criteria = criteria.entry(SelectionCriteriaEntry::new().with("tfm", framework.clone()).with("rid", rid));
		}
		criteria.entry(SelectionCriteriaEntry::new().with("tfm", framework.clone()).without("rid"))
	}

	/// Assets for a runtime regardless of framework, such as native libraries.
	pub fn for_runtime(&self, runtime_identifier: &str) -> SelectionCriteria {
		SelectionCriteria::new()
			.entry(SelectionCriteriaEntry::new().with("rid", runtime_identifier))
	}
}

impl Default for ManagedCodeConventions {
	fn default() -> Self {
		Self::new(RuntimeGraph::standard())
	}
}
