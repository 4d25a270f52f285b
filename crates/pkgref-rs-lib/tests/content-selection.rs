use pkgref_rs::*;
use pkgref_rs::content_model::*;
use pkgref_rs::package::TargetFramework;

const PAYLOAD: &[&str] = &[
	"Serilog.nuspec",
	"lib/net462/Serilog.dll",
	"lib/netstandard2.0/Serilog.dll",
	"lib/netstandard2.0/Serilog.xml",
	"lib/net6.0/Serilog.dll",
	"lib/net6.0/fr/Serilog.resources.dll",
	"ref/net6.0/Serilog.dll",
	"runtimes/win-x64/native/serilog_native.dll",
	"runtimes/linux-x64/native/libserilog_native.so",
	"build/net6.0/Serilog.targets",
	"build/Serilog.props",
	"contentFiles/cs/net6.0/config/serilog.json",
];

fn fw(s: &str) -> TargetFramework {
	TargetFramework::parse(s).unwrap()
}

fn extracted() -> (tempfile::TempDir, ContentItemCollection) {
	let dir = tempfile::tempdir().unwrap();
	pkgref_rs_test_utils::create_payload(dir.path(), PAYLOAD).unwrap();
	let mut collection = ContentItemCollection::new(ContentOptions::default());
	collection.load_from_directory(dir.path()).unwrap();
	(dir, collection)
}

fn paths(group: Option<ContentItemGroup>) -> Vec<String> {
	let mut paths: Vec<String> = group.map(|g| g.paths().map(str::to_string).collect()).unwrap_or_default();
	paths.sort();
	paths
}

#[test]
fn runtime_assemblies_per_framework() {
	let _ = env_logger::builder().is_test(true).try_init();
	let (_dir, collection) = extracted();
	let conventions = ManagedCodeConventions::default();
	let sets = [&conventions.patterns().runtime_assemblies];

	assert_eq!(paths(collection.find_best_item_group(&conventions.for_framework(&fw("net8.0")), &sets)), vec!["lib/net6.0/Serilog.dll"]);
	assert_eq!(paths(collection.find_best_item_group(&conventions.for_framework(&fw("netcoreapp3.1")), &sets)), vec!["lib/netstandard2.0/Serilog.dll"]);
	assert_eq!(paths(collection.find_best_item_group(&conventions.for_framework(&fw("net472")), &sets)), vec!["lib/net462/Serilog.dll"]);
	assert!(!collection.has_item_group(&conventions.for_framework(&fw("net45")), &sets));
}

#[test]
fn compile_assets_prefer_ref() {
	let (_dir, collection) = extracted();
	let conventions = ManagedCodeConventions::default();
	let patterns = conventions.patterns();
	let sets = [&patterns.compile_ref_assemblies, &patterns.compile_lib_assemblies];

	assert_eq!(paths(collection.find_best_item_group(&conventions.for_framework(&fw("net8.0")), &sets)), vec!["ref/net6.0/Serilog.dll"]);
	/* Nothing in ref fits netstandard2.0, lib does */
	assert_eq!(paths(collection.find_best_item_group(&conventions.for_framework(&fw("netstandard2.0")), &sets)), vec!["lib/netstandard2.0/Serilog.dll"]);
}

#[test]
fn native_libraries_per_runtime() {
	let (_dir, collection) = extracted();
	let conventions = ManagedCodeConventions::default();
	let sets = [&conventions.patterns().native_libraries];

	let win = conventions.for_framework_and_runtime(&fw("net8.0"), Some("win10-x64"));
	assert_eq!(paths(collection.find_best_item_group(&win, &sets)), vec!["runtimes/win-x64/native/serilog_native.dll"]);

	let linux = conventions.for_runtime("linux-musl-x64");
	assert_eq!(paths(collection.find_best_item_group(&linux, &sets)), vec!["runtimes/linux-x64/native/libserilog_native.so"]);

	assert!(!collection.has_item_group(&conventions.for_runtime("osx-arm64"), &sets));
}

#[test]
fn other_asset_kinds() {
	let (_dir, collection) = extracted();
	let conventions = ManagedCodeConventions::default();
	let patterns = conventions.patterns();
	let net8 = conventions.for_framework(&fw("net8.0"));

	let resources = collection.find_best_item_group(&net8, &[&patterns.resource_assemblies]).unwrap();
	assert_eq!(resources.items[0].properties["locale"], ContentValue::Text("fr".to_string()));

	assert_eq!(paths(collection.find_best_item_group(&net8, &[&patterns.msbuild_files])), vec!["build/net6.0/Serilog.targets"]);
	assert_eq!(paths(collection.find_best_item_group(&conventions.for_framework(&fw("net472")), &[&patterns.msbuild_files])), vec!["build/Serilog.props"]);

	let content = collection.find_items(&patterns.content_files);
	assert_eq!(content.len(), 1);
	assert_eq!(content[0].properties["codeLanguage"], ContentValue::Text("cs".to_string()));
}

#[test]
fn cancellation_stops_selection() {
	let (_dir, collection) = extracted();
	let conventions = ManagedCodeConventions::default();
	let cancel = CancellationToken::new();
	cancel.cancel();
	let result = collection.try_select_item_group(&conventions.for_framework(&fw("net8.0")), &[&conventions.patterns().runtime_assemblies], &cancel);
	assert!(matches!(result, Err(Error::Cancelled)));
}
