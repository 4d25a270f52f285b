use std::collections::HashMap;
use std::path::Path;

use crate::{CancellationToken, ContentOptions};
use crate::error::check_cancelled;
use super::*;

const CONTRACT_FOLDER: &str = "lib/contract/";
const CONTRACT_SHIM_FOLDER: &str = "ref/any/";

/// The result of a selection along with whether another group ranked exactly as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGroupSelection {
	pub group: ContentItemGroup,
	/// The first group found was kept over at least one equally good group.
	pub ambiguous: bool,
}

/// The files of one package.
#[derive(Debug, Clone, Default)]
pub struct ContentItemCollection {
	assets: Vec<String>,
	has_contract: bool,
	options: ContentOptions,
}

/// Files directly in the package root never match a pattern.
fn is_valid_asset(path: &str) -> bool {
	path.char_indices().skip(1).any(|(_, c)| c == '/')
}

impl ContentItemCollection {
	pub fn new(options: ContentOptions) -> Self {
		Self { options, ..Default::default() }
	}

	/// Replaces the file listing with `paths`, relative and `/` separated.
	pub fn load<I>(&mut self, paths: I)
	where I: IntoIterator, I::Item: AsRef<str>
	{
		self.assets.clear();
		self.has_contract = false;

		for path in paths {
			let path = path.as_ref();
			if !is_valid_asset(path) {
				log::trace!("Skipping root file {}", path);
				continue;
			}
			self.assets.push(path.to_string());

			if let Some(rest) = path.strip_prefix(CONTRACT_FOLDER) {
				self.has_contract = true;
				if self.options.contract_shim() {
					self.assets.push(format!("{}{}", CONTRACT_SHIM_FOLDER, rest));
				}
			}
		}
	}

	/// Loads the file entries of a zip archive, in the order they are stored.
	pub fn load_from_archive(&mut self, path: &Path) -> crate::Result<()> {
		let file = std::fs::File::open(path)?;
		let mut archive = zip::ZipArchive::new(std::io::BufReader::new(file))?;
		let mut names = Vec::with_capacity(archive.len());
		for i in 0..archive.len() {
			let entry = archive.by_index_raw(i)?;
			if entry.is_dir() {
				continue;
			}
			names.push(entry.name().replace('\\', "/"));
		}
		log::debug!("{} files in {}", names.len(), path.display());
		self.load(names);
		Ok(())
	}

	/// Loads every file below `root`.
	pub fn load_from_directory(&mut self, root: &Path) -> crate::Result<()> {
		let mut names = Vec::new();
		for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
			let entry = entry?;
			if !entry.file_type().is_file() {
				continue;
			}
			let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
			let name: Vec<String> = relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
			names.push(name.join("/"));
		}
		self.load(names);
		Ok(())
	}

	/// Whether the package has a `lib/contract` folder.
	pub fn has_contract(&self) -> bool {
		self.has_contract
	}

	pub fn paths(&self) -> &[String] {
		&self.assets
	}

	/// Every file matched by one of the set's path expressions.
	pub fn find_items(&self, patterns: &PatternSet) -> Vec<ContentItem> {
		self.assets.iter().filter_map(|a| patterns.match_path(a)).collect()
	}

	/// Appends a group to `groups` for every distinct key the set's group expressions produce.
	///
	/// A file can be part of several groups. Groups come in the order their first file was seen.
	pub fn populate_item_groups(&self, patterns: &PatternSet, groups: &mut Vec<ContentItemGroup>) {
		let mut keyed: Vec<(ContentProperties, Vec<&str>)> = Vec::new();
		let mut index: HashMap<ContentProperties, usize> = HashMap::new();

		for asset in &self.assets {
			for item in patterns.group_matches(asset) {
				let mut key = item.properties.clone();
				key.remove(TFM_RAW);
				match index.get(&key) {
					Some(&i) => keyed[i].1.push(asset.as_str()),
					None => {
						index.insert(key, keyed.len());
						keyed.push((item.properties, vec![asset.as_str()]));
					},
				}
			}
		}

		for (properties, assets) in keyed {
			let items = assets.into_iter().filter_map(|a| patterns.match_path(a)).collect();
			groups.push(ContentItemGroup { properties, items });
		}
	}

	pub fn has_item_group(&self, criteria: &SelectionCriteria, pattern_sets: &[&PatternSet]) -> bool {
		self.find_best_item_group(criteria, pattern_sets).is_some()
	}

	/// The best group for the first criteria entry any group satisfies, trying each pattern set in turn.
	pub fn find_best_item_group(&self, criteria: &SelectionCriteria, pattern_sets: &[&PatternSet]) -> Option<ContentItemGroup> {
		self.select_item_group(criteria, pattern_sets).map(|s| s.group)
	}

	/// Like [`find_best_item_group()`](Self::find_best_item_group) but also reports ties.
	pub fn select_item_group(&self, criteria: &SelectionCriteria, pattern_sets: &[&PatternSet]) -> Option<ItemGroupSelection> {
		/* A token that is never cancelled can't fail the selection */
		self.try_select_item_group(criteria, pattern_sets, &CancellationToken::new()).unwrap_or_default()
	}

	/// Selection checking `cancel` before every scan over the groups.
	pub fn try_select_item_group(&self, criteria: &SelectionCriteria, pattern_sets: &[&PatternSet], cancel: &CancellationToken) -> crate::Result<Option<ItemGroupSelection>> {
		let mut groups = Vec::new();

		for patterns in pattern_sets {
			groups.clear();
			self.populate_item_groups(patterns, &mut groups);
			let definitions = patterns.properties();

			for entry in &criteria.entries {
				check_cancelled(cancel)?;

				let mut best: Option<usize> = None;
				let mut ambiguous = false;
				for (i, group) in groups.iter().enumerate() {
					if !entry.accepts(&group.properties, definitions) {
						continue;
					}
					let Some(b) = best else {
						best = Some(i);
						continue
					};
					match entry.compare(&groups[b].properties, &group.properties, definitions) {
						std::cmp::Ordering::Greater => {
							best = Some(i);
							ambiguous = false;
						},
						std::cmp::Ordering::Equal => ambiguous = true,
						std::cmp::Ordering::Less => {},
					}
				}

				if let Some(b) = best {
					let group = groups.swap_remove(b);
					if ambiguous {
						log::debug!("Several groups rank equally for {:?}, keeping the first found {:?}", entry.properties, group.properties);
					}
					return Ok(Some(ItemGroupSelection { group, ambiguous }))
				}
			}
		}

		Ok(None)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;
	use std::sync::Arc;

	use super::*;

	fn fw(s: &str) -> TargetFramework {
		TargetFramework::parse(s).unwrap()
	}

	fn collection(paths: &[&str]) -> ContentItemCollection {
		let mut c = ContentItemCollection::new(ContentOptions::default());
		c.load(paths);
		c
	}

	/// `lib/{tfm}` groups plus a framework-less group for files directly in `lib`.
	fn lib_patterns(conventions: &ManagedCodeConventions) -> PatternSet {
		PatternSet::new(
			Arc::clone(conventions.properties()),
			["lib/{tfm}/{any?}", "lib/{assembly?}"],
			["lib/{tfm}/{assembly}", "lib/{assembly}"],
		)
	}

	fn preference() -> SelectionCriteria {
		SelectionCriteria::new()
			.entry(SelectionCriteriaEntry::new().with("tfm", fw("net8.0")))
			.entry(SelectionCriteriaEntry::new().with("tfm", fw("net6.0")))
			.entry(SelectionCriteriaEntry::new().without("tfm"))
	}

	#[test]
	fn root_files_are_ignored() {
		let c = collection(&["readme.txt", "/rooted.txt", "lib/net8.0/A.dll"]);
		assert_eq!(c.paths(), &["lib/net8.0/A.dll".to_string()]);
	}

	#[test]
	fn contract_folder_is_shimmed() {
		let c = collection(&["lib/contract/Foo.dll"]);
		assert!(c.has_contract());
		assert!(c.paths().iter().any(|p| p == "ref/any/Foo.dll"));

		let conventions = ManagedCodeConventions::default();
		let group = c.find_best_item_group(&conventions.for_framework(&fw("net8.0")), &[&conventions.patterns().compile_ref_assemblies]).unwrap();
		assert_eq!(group.paths().collect::<Vec<_>>(), vec!["ref/any/Foo.dll"]);
	}

	#[test]
	fn contract_shim_can_be_disabled() {
		let mut options = ContentOptions::default();
		options.set_contract_shim(false);
		let mut c = ContentItemCollection::new(options);
		c.load(["lib/contract/Foo.dll"]);
		assert!(c.has_contract());
		assert_eq!(c.paths().len(), 1);
	}

	#[test]
	fn raw_framework_label_doesnt_split_groups() {
		let conventions = ManagedCodeConventions::default();
		let c = collection(&["lib/net45/A.dll", "lib/net4.5/B.dll"]);
		let mut groups = Vec::new();
		c.populate_item_groups(&conventions.patterns().runtime_assemblies, &mut groups);
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].items.len(), 2);
	}

	#[test]
	fn selection_prefers_criteria_in_order() {
		let conventions = ManagedCodeConventions::default();
		let patterns = lib_patterns(&conventions);

		let all = collection(&["lib/net8.0/A.dll", "lib/net6.0/A.dll", "lib/A.dll"]);
		assert_eq!(all.find_best_item_group(&preference(), &[&patterns]).unwrap().framework(), Some(&fw("net8.0")));

		let no_net8 = collection(&["lib/net6.0/A.dll", "lib/A.dll"]);
		assert_eq!(no_net8.find_best_item_group(&preference(), &[&patterns]).unwrap().framework(), Some(&fw("net6.0")));

		let neither = collection(&["lib/A.dll"]);
		let group = neither.find_best_item_group(&preference(), &[&patterns]).unwrap();
		assert_eq!(group.framework(), None);
		assert_eq!(group.paths().collect::<Vec<_>>(), vec!["lib/A.dll"]);
	}

	#[test]
	fn nearest_framework_wins() {
		let conventions = ManagedCodeConventions::default();
		let c = collection(&["lib/netstandard2.0/A.dll", "lib/net6.0/A.dll", "lib/net472/A.dll"]);
		let group = c.find_best_item_group(&conventions.for_framework(&fw("net8.0")), &[&conventions.patterns().runtime_assemblies]).unwrap();
		assert_eq!(group.framework(), Some(&fw("net6.0")));
	}

	#[test]
	fn nothing_compatible_is_none() {
		let conventions = ManagedCodeConventions::default();
		let c = collection(&["lib/net472/A.dll"]);
		assert!(!c.has_item_group(&conventions.for_framework(&fw("net8.0")), &[&conventions.patterns().runtime_assemblies]));
	}

	#[test]
	fn ties_are_reported() {
		let conventions = ManagedCodeConventions::default();
		let c = collection(&["lib/net8.0/A.dll", "lib/net8.0-windows/A.dll"]);
		let patterns = PatternSet::new(Arc::clone(conventions.properties()), ["lib/{tfm}/{any?}"], ["lib/{tfm}/{assembly}"]);
		let criteria = SelectionCriteria::new().entry(SelectionCriteriaEntry::new().with("tfm", fw("net8.0")));
		let selection = c.select_item_group(&criteria, &[&patterns]).unwrap();
		assert_eq!(selection.group.framework(), Some(&fw("net8.0")));
		assert!(!selection.ambiguous);

		/* Nothing concrete to rank by, every accepted group ties */
		let c = collection(&["lib/A/x/A.dll", "lib/B/x/A.dll"]);
		let patterns = PatternSet::new(Arc::clone(conventions.properties()), ["lib/{codeLanguage}/{any?}"], ["lib/{codeLanguage}/{any}"]);
		let criteria = SelectionCriteria::new().entry(SelectionCriteriaEntry::new().without("tfm"));
		let selection = c.select_item_group(&criteria, &[&patterns]).unwrap();
		assert!(selection.ambiguous);
		assert_eq!(selection.group.properties["codeLanguage"], ContentValue::Text("A".to_string()));
	}

	#[test]
	fn runtime_specific_assets_first() {
		let conventions = ManagedCodeConventions::default();
		let c = collection(&["runtimes/win/lib/net8.0/A.dll", "lib/net8.0/A.dll"]);
		let sets = [&conventions.patterns().runtime_assemblies];

		let win = c.find_best_item_group(&conventions.for_framework_and_runtime(&fw("net8.0"), Some("win10-x64")), &sets).unwrap();
		assert_eq!(win.paths().collect::<Vec<_>>(), vec!["runtimes/win/lib/net8.0/A.dll"]);

		let linux = c.find_best_item_group(&conventions.for_framework_and_runtime(&fw("net8.0"), Some("linux-x64")), &sets).unwrap();
		assert_eq!(linux.paths().collect::<Vec<_>>(), vec!["lib/net8.0/A.dll"]);
	}

	#[test]
	fn later_pattern_sets_are_fallbacks() {
		let conventions = ManagedCodeConventions::default();
		let c = collection(&["lib/net6.0/A.dll"]);
		let patterns = conventions.patterns();
		let group = c.find_best_item_group(&conventions.for_framework(&fw("net8.0")), &[&patterns.compile_ref_assemblies, &patterns.compile_lib_assemblies]).unwrap();
		assert_eq!(group.paths().collect::<Vec<_>>(), vec!["lib/net6.0/A.dll"]);
	}

	#[test]
	fn cancelled_selection_fails() {
		let conventions = ManagedCodeConventions::default();
		let c = collection(&["lib/net8.0/A.dll"]);
		let cancel = CancellationToken::new();
		cancel.cancel();
		let result = c.try_select_item_group(&conventions.for_framework(&fw("net8.0")), &[&conventions.patterns().runtime_assemblies], &cancel);
		assert!(matches!(result, Err(crate::Error::Cancelled)));
	}

	#[test]
	fn loads_archives_and_directories() {
		let dir = tempfile::tempdir().unwrap();

		let archive = dir.path().join("package.zip");
		let mut zip = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
		for name in ["package.nuspec", "lib/net8.0/A.dll", "lib/net8.0/A.xml"] {
			zip.start_file(name, zip::write::FileOptions::default()).unwrap();
			zip.write_all(b"content").unwrap();
		}
		zip.finish().unwrap();

		let mut from_zip = ContentItemCollection::default();
		from_zip.load_from_archive(&archive).unwrap();
		let mut paths = from_zip.paths().to_vec();
		paths.sort();
		assert_eq!(paths, vec!["lib/net8.0/A.dll", "lib/net8.0/A.xml"]);

		let extracted = dir.path().join("extracted");
		std::fs::create_dir_all(extracted.join("lib/net8.0")).unwrap();
		std::fs::write(extracted.join("lib/net8.0/A.dll"), b"content").unwrap();
		std::fs::write(extracted.join("package.nuspec"), b"content").unwrap();

		let mut from_dir = ContentItemCollection::default();
		from_dir.load_from_directory(&extracted).unwrap();
		assert_eq!(from_dir.paths(), &["lib/net8.0/A.dll".to_string()]);
	}

	#[test]
	fn archive_order_is_kept_between_loads() {
		let dir = tempfile::tempdir().unwrap();
		let archive = dir.path().join("package.zip");
		let names: Vec<String> = (0..12).map(|i| format!("lib/lang{}/x/A.dll", i)).collect();
		let mut zip = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
		for name in &names {
			zip.start_file(name.as_str(), zip::write::FileOptions::default()).unwrap();
			zip.write_all(b"content").unwrap();
		}
		zip.finish().unwrap();

		let conventions = ManagedCodeConventions::default();
		let patterns = PatternSet::new(Arc::clone(conventions.properties()), ["lib/{codeLanguage}/{any?}"], ["lib/{codeLanguage}/{any}"]);
		let criteria = SelectionCriteria::new().entry(SelectionCriteriaEntry::new().without("tfm"));

		for _ in 0..20 {
			let mut c = ContentItemCollection::default();
			c.load_from_archive(&archive).unwrap();
			assert_eq!(c.paths(), names.as_slice());

			let selection = c.select_item_group(&criteria, &[&patterns]).unwrap();
			assert!(selection.ambiguous);
			assert_eq!(selection.group.properties["codeLanguage"], ContentValue::Text("lang0".to_string()));
		}
	}
}
