use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::*;

/// Property definitions by name.
pub type PropertyTable = HashMap<String, ContentPropertyDefinition>;

/// How a property's values are parsed, compared with criteria and ranked.
#[derive(Debug, Clone)]
pub enum PropertyKind {
	/// Free text compared case-insensitively.
	Text,
	/// A culture name such as `fr` or `zh-Hans`.
	Locale,
	/// A target framework folder, compatibility and ranking follow framework rules.
	Framework,
	/// A runtime identifier, compatibility and ranking follow the runtime graph.
	Runtime(Arc<RuntimeGraph>),
	/// Anything at all.
	Any,
}

#[derive(Debug, Clone)]
pub struct ContentPropertyDefinition {
	pub name: String,
	pub kind: PropertyKind,
	/// When non empty values must end with one of these, compared case-insensitively.
	pub file_extensions: Vec<String>,
	/// Whether values may span several folders.
	pub allow_subfolders: bool,
}

fn locale_regex() -> &'static regex::Regex {
	static RE: OnceLock<regex::Regex> = OnceLock::new();
	RE.get_or_init(|| {
		regex::Regex::new(r"^[a-zA-Z]{2,3}(-[a-zA-Z0-9]{1,8})*$").expect("locale regex should compile")
	})
}

impl ContentPropertyDefinition {
	pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
		Self { name: name.into(), kind, file_extensions: Vec::new(), allow_subfolders: false }
	}

	pub fn with_file_extensions(mut self, extensions: &[&str]) -> Self {
		self.file_extensions = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();
		self
	}

	pub fn with_subfolders(mut self) -> Self {
		self.allow_subfolders = true;
		self
	}

	/// Parses a value taken from a path, `None` when this property can't hold it.
	pub fn try_lookup(&self, value: &str) -> Option<ContentValue> {
		if value.is_empty() {
			return None
		}
		if !self.allow_subfolders && value.contains('/') {
			return None
		}
		if !self.file_extensions.is_empty() {
			let lower = value.to_ascii_lowercase();
			if !self.file_extensions.iter().any(|e| lower.ends_with(e.as_str())) {
				return None
			}
		}

		match &self.kind {
			PropertyKind::Framework => Some(ContentValue::Framework(TargetFramework::parse_folder(value))),
			PropertyKind::Locale if !locale_regex().is_match(value) => None,
			_ => Some(ContentValue::Text(value.to_string())),
		}
	}

	/// Whether a group's value is acceptable for the value asked for by the criteria.
	pub fn is_criteria_satisfied(&self, criteria: &ContentValue, candidate: &ContentValue) -> bool {
		match (&self.kind, criteria, candidate) {
			(PropertyKind::Framework, ContentValue::Framework(project), ContentValue::Framework(candidate)) => project.is_compatible(candidate),
			(PropertyKind::Framework, _, _) => false,
			(PropertyKind::Runtime(graph), ContentValue::Text(wanted), ContentValue::Text(candidate)) => graph.are_compatible(wanted, candidate),
			(_, ContentValue::Text(a), ContentValue::Text(b)) => a.eq_ignore_ascii_case(b),
			_ => criteria == candidate,
		}
	}

	/// Ranks two acceptable values, `Greater` when `challenger` is the better fit for `criteria`.
	pub fn compare(&self, criteria: &ContentValue, best: &ContentValue, challenger: &ContentValue) -> Ordering {
		match (&self.kind, criteria, best, challenger) {
			(PropertyKind::Framework, ContentValue::Framework(project), ContentValue::Framework(best), ContentValue::Framework(challenger)) => {
				project.nearer(challenger, best)
			},
			(PropertyKind::Runtime(graph), ContentValue::Text(wanted), ContentValue::Text(best), ContentValue::Text(challenger)) => {
				graph.nearer(wanted, challenger, best)
			},
			_ => Ordering::Equal,
		}
	}
}
