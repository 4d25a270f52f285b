//! Interpreting a package's flat file listing as selectable groups of content.
//!
//! # Usage
//! 1. Load the file listing into a [`ContentItemCollection`].
//! 1. Pick the [`PatternSet`] for the kind of asset wanted, usually one of the
//! [`ManagedCodeConventions`] standard sets.
//! 1. Build [`SelectionCriteria`] for the consuming project with the conventions' criteria builders.
//! 1. [`ContentItemCollection::find_best_item_group()`] to get the single best group of items.

use std::collections::BTreeMap;

use crate::package::TargetFramework;

mod pattern;
pub use pattern::PatternDefinition;
pub use pattern::PatternExpression;
pub use pattern::PatternSet;

mod property;
pub use property::ContentPropertyDefinition;
pub use property::PropertyKind;
pub use property::PropertyTable;

mod runtime_graph;
pub use runtime_graph::RuntimeGraph;

mod criteria;
pub use criteria::SelectionCriteria;
pub use criteria::SelectionCriteriaEntry;

mod conventions;
pub use conventions::ManagedCodeConventions;
pub use conventions::ManagedCodePatterns;

mod collection;
pub use collection::ContentItemCollection;
pub use collection::ItemGroupSelection;

/// Property holding the framework folder name exactly as written, never part of a group's key.
pub const TFM_RAW: &str = "tfm_raw";

/// A value extracted from a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentValue {
	Framework(TargetFramework),
	Text(String),
}

impl ContentValue {
	pub fn as_framework(&self) -> Option<&TargetFramework> {
		match self {
			ContentValue::Framework(f) => Some(f),
			ContentValue::Text(_) => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			ContentValue::Text(t) => Some(t),
			ContentValue::Framework(_) => None,
		}
	}
}

impl From<TargetFramework> for ContentValue {
	fn from(value: TargetFramework) -> Self {
		ContentValue::Framework(value)
	}
}

impl From<&str> for ContentValue {
	fn from(value: &str) -> Self {
		ContentValue::Text(value.to_string())
	}
}

impl std::fmt::Display for ContentValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ContentValue::Framework(fw) => write!(f, "{}", fw),
			ContentValue::Text(t) => write!(f, "{}", t),
		}
	}
}

pub type ContentProperties = BTreeMap<String, ContentValue>;

/// A single file with the properties its path produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
	pub path: String,
	pub properties: ContentProperties,
}

/// Files sharing the same key properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentItemGroup {
	pub properties: ContentProperties,
	pub items: Vec<ContentItem>,
}

impl ContentItemGroup {
	pub fn framework(&self) -> Option<&TargetFramework> {
		self.properties.get("tfm").and_then(ContentValue::as_framework)
	}

	pub fn paths(&self) -> impl Iterator<Item = &str> {
		self.items.iter().map(|i| i.path.as_str())
	}
}
