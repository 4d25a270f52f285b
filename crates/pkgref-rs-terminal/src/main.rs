use std::path::{Path, PathBuf};

use pkgref_rs::content_model::*;
use pkgref_rs::package::TargetFramework;

#[tokio::main]
async fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",             "Show help");
		opts.optflag( "",  "no-origins",       "Don't trace which installed packages pull in transitive packages");
		opts.optopt(  "",  "max-depth",        "Stop tracing origins this many dependencies deep", "DEPTH");
		opts.optopt(  "k", "kind",             "Asset kind to select: runtime, compile, native, resources, build, content or tools", "KIND");
		opts.optopt(  "",  "runtime-graph",    "runtime.json to use instead of the built in runtime graph", "FILE");
		opts.optflag( "",  "no-contract-shim", "Don't expose lib/contract files as ref/any");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") || parsed_options.free.is_empty() {
			eprintln!("{}", opts.usage("Usage:\n\tpkgref-rs-terminal packages <project.json> <snapshot.json>\n\tpkgref-rs-terminal select <payload> <framework> [runtime]"));
			return;
		}

		parsed_options
	};

	let result = match parsed_options.free[0].as_str() {
		"packages" => list_packages(&parsed_options).await,
		"select" => select_assets(&parsed_options),
		other => Err(Error::UnknownCommand(other.to_string())),
	};

	if let Err(e) = result {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

fn argument(options: &getopts::Matches, index: usize, name: &'static str) -> Result<String, Error> {
	options.free.get(index).cloned().ok_or(Error::MissingArgument(name))
}

async fn list_packages(options: &getopts::Matches) -> Result<(), Error> {
	let spec_path = PathBuf::from(argument(options, 1, "project file")?);
	let snapshot_path = PathBuf::from(argument(options, 2, "snapshot file")?);

	let mut resolver_options = pkgref_rs::ResolverOptions::default();
	if options.opt_present("no-origins") {
		resolver_options.set_transitive_origins(false);
	}
	if let Some(depth) = options.opt_str("max-depth") {
		let depth = depth.parse().map_err(|_| Error::InvalidArgument("max-depth", depth.clone()))?;
		if !resolver_options.set_max_walk_depth(depth) {
			return Err(Error::InvalidArgument("max-depth", depth.to_string()));
		}
	}

	let source = pkgref_rs::project::FileDataSource::new(spec_path, snapshot_path);
	let resolver = pkgref_rs::ProjectResolver::new(source, resolver_options);
	let packages = resolver.compute_packages(&pkgref_rs::CancellationToken::new()).await?;

	if packages.is_empty() {
		println!("No packages, the project may not have been restored.");
		return Ok(());
	}

	println!("Installed packages:");
	for package in &packages.installed {
		println!("\t{} ({})", package.identity, package.target_framework);
	}
	println!("Transitive packages:");
	for package in &packages.transitive {
		let origins: Vec<String> = package.origins.iter().map(|o| o.identity.to_string()).collect();
		if origins.is_empty() {
			println!("\t{} ({})", package.identity(), package.reference.target_framework);
		} else {
			println!("\t{} ({}) via {}", package.identity(), package.reference.target_framework, origins.join(", "));
		}
	}

	Ok(())
}

fn load_payload(collection: &mut ContentItemCollection, path: &Path) -> Result<(), Error> {
	let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
	if path.is_dir() {
		collection.load_from_directory(path)?;
	} else if matches!(extension.as_deref(), Some("zip") | Some("nupkg")) {
		collection.load_from_archive(path)?;
	} else {
		/* A plain listing, one path per line */
		let listing = std::fs::read_to_string(path).map_err(pkgref_rs::Error::from)?;
		collection.load(listing.lines().map(str::trim).filter(|l| !l.is_empty()));
	}
	Ok(())
}

fn select_assets(options: &getopts::Matches) -> Result<(), Error> {
	let payload = PathBuf::from(argument(options, 1, "payload")?);
	let framework = TargetFramework::parse(&argument(options, 2, "framework")?)?;
	let runtime = options.free.get(3).cloned();

	let runtime_graph = match options.opt_str("runtime-graph") {
		Some(path) => RuntimeGraph::from_json(&std::fs::read_to_string(path).map_err(pkgref_rs::Error::from)?)?,
		None => RuntimeGraph::standard(),
	};
	let conventions = ManagedCodeConventions::new(runtime_graph);
	let patterns = conventions.patterns();

	let kind = options.opt_str("kind").unwrap_or_else(|| "runtime".to_string());
	let sets: Vec<&PatternSet> = match kind.as_str() {
		"runtime" => vec![&patterns.runtime_assemblies],
		"compile" => vec![&patterns.compile_ref_assemblies, &patterns.compile_lib_assemblies],
		"native" => vec![&patterns.native_libraries],
		"resources" => vec![&patterns.resource_assemblies],
		"build" => vec![&patterns.msbuild_files],
		"content" => vec![&patterns.content_files],
		"tools" => vec![&patterns.tools_assemblies],
		_ => return Err(Error::InvalidArgument("kind", kind)),
	};

	let mut content_options = pkgref_rs::ContentOptions::default();
	if options.opt_present("no-contract-shim") {
		content_options.set_contract_shim(false);
	}
	let mut collection = ContentItemCollection::new(content_options);
	load_payload(&mut collection, &payload)?;
	log::debug!("Loaded {} files from {}", collection.paths().len(), payload.display());

	let criteria = conventions.for_framework_and_runtime(&framework, runtime.as_deref());
	match collection.select_item_group(&criteria, &sets) {
		Some(selection) => {
			if selection.ambiguous {
				log::warn!("Several groups fit equally well, using the first one found.");
			}
			let properties: Vec<String> = selection.group.properties.iter()
				.filter(|(k, _)| k.as_str() != TFM_RAW)
				.map(|(k, v)| format!("{}={}", k, v))
				.collect();
			println!("Selected group [{}]:", properties.join(", "));
			for item in &selection.group.items {
				println!("\t{}", item.path);
			}
		},
		None => println!("No {} assets fit {}.", kind, framework),
	}

	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("pkgref-rs error: {0}")]
	PkgRefError(#[from] pkgref_rs::Error),
	#[error("Missing argument: {0}")]
	MissingArgument(&'static str),
	#[error("Invalid value for {0}: {1}")]
	InvalidArgument(&'static str, String),
	#[error("Unknown command: {0}")]
	UnknownCommand(String),
}
