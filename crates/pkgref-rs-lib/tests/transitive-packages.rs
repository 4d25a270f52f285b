use pkgref_rs::*;
use pkgref_rs::package::*;
use pkgref_rs_test_utils::*;

fn ids(refs: &[TransitivePackageReference]) -> Vec<String> {
	refs.iter().map(|r| r.identity().to_string()).collect()
}

#[tokio::test]
async fn packages_from_project_files() {
	let _ = env_logger::builder().is_test(true).try_init();

	let files = ProjectFiles::new().unwrap();
	let (spec, snapshot) = diamond_project().unwrap();
	files.write_spec(&spec).unwrap();
	files.write_snapshot(&snapshot).unwrap();

	let mut options = ResolverOptions::default();
	options.set_transitive_origins(true);
	let resolver = ProjectResolver::new(files.source(), options);
	let packages = resolver.compute_packages(&CancellationToken::new()).await.unwrap();

	let installed: Vec<String> = packages.installed.iter().map(|r| format!("{} {}", r.identity, r.target_framework)).collect();
	assert_eq!(installed, vec!["A 1.0.0 net6.0", "D 1.0.0 net6.0", "A 2.0.0 net8.0"]);

	/* B and C are identical in both targets so net6.0 wins by precedence */
	assert_eq!(ids(&packages.transitive), vec!["B 1.0.0", "C 1.0.0"]);
	assert!(packages.transitive.iter().all(|t| t.reference.target_framework == TargetFramework::parse("net6.0").unwrap()));

	let c = &packages.transitive[1];
	let origins: Vec<String> = c.origins.iter().map(|o| o.identity.to_string()).collect();
	assert_eq!(origins, vec!["A 2.0.0", "D 1.0.0"]);

	assert_eq!(resolver.package_folders().await.unwrap(), vec![std::path::PathBuf::from("/packages")]);
}

#[tokio::test]
async fn restoring_later_fills_in_packages() {
	let files = ProjectFiles::new().unwrap();
	let (spec, snapshot) = diamond_project().unwrap();
	files.write_spec(&spec).unwrap();

	let resolver = ProjectResolver::new(files.source(), ResolverOptions::default());
	let cancel = CancellationToken::new();
	assert!(resolver.compute_packages(&cancel).await.unwrap().is_empty());
	assert!(resolver.needs_recompute());

	files.write_snapshot(&snapshot).unwrap();
	let packages = resolver.compute_packages(&cancel).await.unwrap();
	assert_eq!(packages.installed.len(), 3);
	assert_eq!(packages.transitive.len(), 2);
	assert!(!resolver.needs_recompute());
}

#[tokio::test]
async fn results_are_stable_between_calls() {
	let files = ProjectFiles::new().unwrap();
	let (spec, snapshot) = diamond_project().unwrap();
	files.write_spec(&spec).unwrap();
	files.write_snapshot(&snapshot).unwrap();

	let resolver = ProjectResolver::new(files.source(), ResolverOptions::default());
	let cancel = CancellationToken::new();
	let first = resolver.compute_packages(&cancel).await.unwrap();
	let second = resolver.compute_packages(&cancel).await.unwrap();
	assert_eq!(first, second);
	assert_eq!(resolver.installed_packages(&cancel).await.unwrap(), first.installed);
}

#[tokio::test]
async fn declaration_changes_are_picked_up() {
	let files = ProjectFiles::new().unwrap();
	let (mut spec, snapshot) = diamond_project().unwrap();
	files.write_spec(&spec).unwrap();
	files.write_snapshot(&snapshot).unwrap();

	let resolver = ProjectResolver::new(files.source(), ResolverOptions::default());
	let cancel = CancellationToken::new();
	resolver.compute_packages(&cancel).await.unwrap();

	/* Declaring B makes it installed rather than transitive */
	for framework in &mut spec.frameworks {
		framework.dependencies.push(pkgref_rs::project::DeclaredDependency::package("B", VersionRange::parse("1.0.0").unwrap()));
	}
	files.write_spec(&spec).unwrap();

	let packages = resolver.compute_packages(&cancel).await.unwrap();
	assert!(packages.installed.iter().any(|r| r.identity.id == "B"));
	assert_eq!(ids(&packages.transitive), vec!["C 1.0.0"]);
}

#[tokio::test]
async fn concurrent_callers_agree() {
	let files = ProjectFiles::new().unwrap();
	let (spec, snapshot) = diamond_project().unwrap();
	files.write_spec(&spec).unwrap();
	files.write_snapshot(&snapshot).unwrap();

	let resolver = std::sync::Arc::new(ProjectResolver::new(files.source(), ResolverOptions::default()));
	let mut handles = Vec::new();
	for _ in 0..8 {
		let resolver = std::sync::Arc::clone(&resolver);
		handles.push(tokio::spawn(async move {
			resolver.compute_packages(&CancellationToken::new()).await
		}));
	}

	let mut results = Vec::new();
	for handle in handles {
		results.push(handle.await.unwrap().unwrap());
	}
	assert!(results.windows(2).all(|w| w[0] == w[1]));
}
