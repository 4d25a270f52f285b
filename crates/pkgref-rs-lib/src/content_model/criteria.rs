use super::*;

/// One acceptable combination of properties.
///
/// A `None` value means the property must be absent from the group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteriaEntry {
	pub properties: Vec<(String, Option<ContentValue>)>,
}

impl SelectionCriteriaEntry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, property: &str, value: impl Into<ContentValue>) -> Self {
		self.properties.push((property.to_string(), Some(value.into())));
		self
	}

	pub fn without(mut self, property: &str) -> Self {
		self.properties.push((property.to_string(), None));
		self
	}

	/// Whether a group with `group` properties can satisfy this entry.
	pub(super) fn accepts(&self, group: &ContentProperties, definitions: &PropertyTable) -> bool {
		self.properties.iter().all(|(key, wanted)| match wanted {
			None => !group.contains_key(key),
			Some(wanted) => match (group.get(key), definitions.get(key)) {
				(Some(value), Some(definition)) => definition.is_criteria_satisfied(wanted, value),
				_ => false,
			},
		})
	}

	/// Ranks two accepted groups, `Greater` when `challenger` is better. The first property that
	/// tells them apart decides.
	pub(super) fn compare(&self, best: &ContentProperties, challenger: &ContentProperties, definitions: &PropertyTable) -> std::cmp::Ordering {
		for (key, wanted) in &self.properties {
			let Some(wanted) = wanted else { continue };
			let (Some(b), Some(c), Some(definition)) = (best.get(key), challenger.get(key), definitions.get(key)) else { continue };
			let ordering = definition.compare(wanted, b, c);
			if ordering.is_ne() {
				return ordering
			}
		}
		std::cmp::Ordering::Equal
	}
}

/// Acceptable property combinations, most preferred first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
	pub entries: Vec<SelectionCriteriaEntry>,
}

impl SelectionCriteria {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entry(mut self, entry: SelectionCriteriaEntry) -> Self {
		self.entries.push(entry);
		self
	}
}

impl FromIterator<SelectionCriteriaEntry> for SelectionCriteria {
	fn from_iter<T: IntoIterator<Item = SelectionCriteriaEntry>>(iter: T) -> Self {
		Self { entries: iter.into_iter().collect() }
	}
}
