use std::sync::Arc;

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	/// A `{name}` placeholder, `capture` is false for `{name?}`.
	Token { name: String, capture: bool },
}

/// A path pattern with its implied properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDefinition {
	pub pattern: String,
	/// Properties every match gets unless the path itself provides them.
	pub defaults: ContentProperties,
}

impl PatternDefinition {
	pub fn new(pattern: impl Into<String>) -> Self {
		Self { pattern: pattern.into(), defaults: ContentProperties::new() }
	}

	pub fn with_default(mut self, property: &str, value: impl Into<ContentValue>) -> Self {
		self.defaults.insert(property.to_string(), value.into());
		self
	}
}

impl From<&str> for PatternDefinition {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// A parsed [`PatternDefinition`].
///
/// Literal text matches case-insensitively. A token takes everything up to the next occurrence of
/// the first character of the literal that follows it, or the rest of the path when it is last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternExpression {
	segments: Vec<Segment>,
	defaults: ContentProperties,
}

impl PatternExpression {
	/// An unterminated `{` is kept as literal text.
	pub fn new(definition: &PatternDefinition) -> Self {
		let mut segments = Vec::new();
		let mut rest = definition.pattern.as_str();

		while !rest.is_empty() {
			let token = rest.find('{').and_then(|start| rest[start..].find('}').map(|len| (start, start + len)));
			match token {
				Some((start, end)) => {
					if start > 0 {
						segments.push(Segment::Literal(rest[..start].to_string()));
					}
					let inner = &rest[start + 1..end];
					let (name, capture) = match inner.strip_suffix('?') {
						Some(name) => (name, false),
						None => (inner, true),
					};
					segments.push(Segment::Token { name: name.to_string(), capture });
					rest = &rest[end + 1..];
				},
				None => {
					segments.push(Segment::Literal(rest.to_string()));
					rest = "";
				},
			}
		}

		Self { segments, defaults: definition.defaults.clone() }
	}

	/// Matches the whole of `path`, `None` when it doesn't fit or a token's property rejects its value.
	pub fn matches(&self, path: &str, properties: &PropertyTable) -> Option<ContentItem> {
		let mut item = ContentItem { path: path.to_string(), properties: self.defaults.clone() };
		let mut cursor = 0;

		for (i, segment) in self.segments.iter().enumerate() {
			let rest = &path[cursor..];
			match segment {
				Segment::Literal(literal) => {
					let head = rest.get(..literal.len())?;
					if !head.eq_ignore_ascii_case(literal) {
						return None
					}
					cursor += literal.len();
				},
				Segment::Token { name, capture } => {
					let delimiter = match self.segments.get(i + 1) {
						Some(Segment::Literal(next)) => next.chars().next(),
						_ => None,
					};
					let len = match delimiter {
						Some(d) => rest.find(d)?,
						None => rest.len(),
					};

					let definition = properties.get(name)?;
					let raw = &rest[..len];
					let value = definition.try_lookup(raw)?;
					if *capture {
						if name == "tfm" {
							item.properties.insert(TFM_RAW.to_string(), ContentValue::Text(raw.to_string()));
						}
						item.properties.insert(name.clone(), value);
					}
					cursor += len;
				},
			}
		}

		(cursor == path.len()).then_some(item)
	}
}

/// Rules for turning paths into items and items into groups.
#[derive(Debug, Clone)]
pub struct PatternSet {
	properties: Arc<PropertyTable>,
	group_expressions: Vec<PatternExpression>,
	path_expressions: Vec<PatternExpression>,
}

impl PatternSet {
	pub fn new<G, P>(properties: Arc<PropertyTable>, groups: G, paths: P) -> Self
	where
		G: IntoIterator, G::Item: Into<PatternDefinition>,
		P: IntoIterator, P::Item: Into<PatternDefinition>,
	{
		Self {
			properties,
			group_expressions: groups.into_iter().map(|d| PatternExpression::new(&d.into())).collect(),
			path_expressions: paths.into_iter().map(|d| PatternExpression::new(&d.into())).collect(),
		}
	}

	pub fn properties(&self) -> &PropertyTable {
		&self.properties
	}

	/// Every grouping expression matching `path`.
	pub(super) fn group_matches<'a>(&'a self, path: &'a str) -> impl Iterator<Item = ContentItem> + 'a {
		self.group_expressions.iter().filter_map(move |e| e.matches(path, &self.properties))
	}

	/// The first path expression matching `path`.
	pub fn match_path(&self, path: &str) -> Option<ContentItem> {
		self.path_expressions.iter().find_map(|e| e.matches(path, &self.properties))
	}
}
