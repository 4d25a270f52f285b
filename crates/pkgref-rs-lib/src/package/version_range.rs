use serde::{Serialize, Deserialize};

use super::PackageVersion;

/// A range of acceptable package versions.
///
/// Written using interval notation, `[1.0,2.0)`, `(,2.0]`, `[1.0]` for an exact version
/// or a bare `1.0` meaning "1.0 or higher". `*` and the empty string accept any version.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
	min: Option<PackageVersion>,
	min_inclusive: bool,
	max: Option<PackageVersion>,
	max_inclusive: bool,
}

impl VersionRange {
	/// A range accepting every version.
	pub fn any() -> Self {
		Self::default()
	}

	/// `version` or higher.
	pub fn at_least(version: PackageVersion) -> Self {
		Self { min: Some(version), min_inclusive: true, max: None, max_inclusive: false }
	}

	/// Only `version`.
	pub fn exact(version: PackageVersion) -> Self {
		Self { min: Some(version.clone()), min_inclusive: true, max: Some(version), max_inclusive: true }
	}

	pub fn new(min: Option<PackageVersion>, min_inclusive: bool, max: Option<PackageVersion>, max_inclusive: bool) -> crate::Result<Self> {
		if let (Some(min), Some(max)) = (&min, &max) {
			let empty = min > max || (min == max && !(min_inclusive && max_inclusive));
			if empty {
				return Err(crate::Error::Parse(format!("version range with minimum {} and maximum {} can't contain any version", min, max)))
			}
		}
		/* An open end has no inclusivity */
		let min_inclusive = min_inclusive && min.is_some();
		let max_inclusive = max_inclusive && max.is_some();
		Ok(Self { min, min_inclusive, max, max_inclusive })
	}

	pub fn parse(range: &str) -> crate::Result<Self> {
		let range = range.trim();
		if range.is_empty() || range == "*" {
			return Ok(Self::any())
		}

		let first = range.chars().next().unwrap_or_default();
		if first != '[' && first != '(' {
			return Ok(Self::at_least(PackageVersion::new(range)?))
		}

		let last = range.chars().last().unwrap_or_default();
		if last != ']' && last != ')' {
			return Err(crate::Error::Parse(format!("version range \"{}\" is missing a closing bracket", range)))
		}

		let min_inclusive = first == '[';
		let max_inclusive = last == ']';
		let inner = &range[1..range.len() - 1];

		match inner.split_once(',') {
			None => {
				/* `[1.0]` is the only valid form without a comma */
				if !(min_inclusive && max_inclusive) {
					return Err(crate::Error::Parse(format!("exact version range \"{}\" must use square brackets", range)))
				}
				Ok(Self::exact(PackageVersion::new(inner)?))
			},
			Some((lhs, rhs)) => {
				let parse_bound = |s: &str| -> crate::Result<Option<PackageVersion>> {
					let s = s.trim();
					if s.is_empty() { Ok(None) } else { PackageVersion::new(s).map(Some) }
				};
				let min = parse_bound(lhs)?;
				let max = parse_bound(rhs)?;
				Self::new(min, min_inclusive, max, max_inclusive)
			},
		}
	}

	pub fn satisfies(&self, version: &PackageVersion) -> bool {
		let above_min = match &self.min {
			None => true,
			Some(min) => if self.min_inclusive { version >= min } else { version > min },
		};
		let below_max = match &self.max {
			None => true,
			Some(max) => if self.max_inclusive { version <= max } else { version < max },
		};
		above_min && below_max
	}

	pub fn min_version(&self) -> Option<&PackageVersion> {
		self.min.as_ref()
	}

	pub fn max_version(&self) -> Option<&PackageVersion> {
		self.max.as_ref()
	}

	pub fn is_min_inclusive(&self) -> bool {
		self.min.is_some() && self.min_inclusive
	}

	pub fn is_max_inclusive(&self) -> bool {
		self.max.is_some() && self.max_inclusive
	}

	pub fn is_any(&self) -> bool {
		self.min.is_none() && self.max.is_none()
	}
}

impl TryFrom<String> for VersionRange {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<VersionRange> for String {
	fn from(value: VersionRange) -> Self {
		value.to_string()
	}
}

impl std::str::FromStr for VersionRange {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl std::fmt::Display for VersionRange {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match (&self.min, &self.max) {
			(None, None) => write!(f, "*"),
			(Some(min), None) if self.min_inclusive => write!(f, "{}", min),
			(Some(min), Some(max)) if min == max && self.min_inclusive && self.max_inclusive => write!(f, "[{}]", min),
			(min, max) => {
				write!(f, "{}", if self.min.is_some() && self.min_inclusive { '[' } else { '(' })?;
				if let Some(min) = min { write!(f, "{}", min)?; }
				write!(f, ", ")?;
				if let Some(max) = max { write!(f, "{}", max)?; }
				write!(f, "{}", if self.max.is_some() && self.max_inclusive { ']' } else { ')' })
			},
		}
	}
}
