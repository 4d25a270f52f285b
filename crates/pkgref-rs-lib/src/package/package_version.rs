use serde::{Serialize, Deserialize};

/// A package version in the form `major.minor[.patch[.revision]][-release][+metadata]`.
///
/// Build metadata is kept for display but ignored for equality and ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion {
	major: u64,
	minor: u64,
	patch: u64,
	revision: u64,
	release: Option<String>,
	metadata: Option<String>,
	/// How many numeric parts were written, used to print the version back the way it was given.
	parts: u8,
}

impl PackageVersion {
	pub fn new(version: &str) -> crate::Result<Self> {
		let version = version.trim();
		if version.is_empty() {
			return Err(crate::Error::Parse("empty version string".to_string()))
		}

		let (rest, metadata) = match version.split_once('+') {
			Some((r, m)) => (r, Some(m.to_string())),
			None => (version, None),
		};
		let (numbers, release) = match rest.split_once('-') {
			Some((n, r)) => {
				if r.is_empty() {
					return Err(crate::Error::Parse(format!("\"{}\" has an empty release label", version)))
				}
				(n, Some(r.to_string()))
			},
			None => (rest, None),
		};

		let mut values = [0u64; 4];
		let mut parts = 0u8;
		for (i, s) in numbers.split('.').enumerate() {
			if i >= 4 {
				return Err(crate::Error::Parse(format!("\"{}\" has more than four version parts", version)))
			}
			values[i] = s.parse::<u64>().map_err(|_| crate::Error::Parse(format!("Couldn't parse \"{}\" in version \"{}\"", s, version)))?;
			parts += 1;
		}

		Ok(PackageVersion {
			major: values[0],
			minor: values[1],
			patch: values[2],
			revision: values[3],
			release,
			metadata,
			parts: parts.max(2),
		})
	}

	pub fn from_parts(major: u64, minor: u64, patch: u64) -> Self {
		PackageVersion { major, minor, patch, revision: 0, release: None, metadata: None, parts: 3 }
	}

	pub fn major(&self) -> u64 { self.major }
	pub fn minor(&self) -> u64 { self.minor }
	pub fn patch(&self) -> u64 { self.patch }
	pub fn revision(&self) -> u64 { self.revision }

	pub fn release(&self) -> Option<&str> {
		self.release.as_deref()
	}

	pub fn is_prerelease(&self) -> bool {
		self.release.is_some()
	}
}

impl TryFrom<String> for PackageVersion {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl TryFrom<&str> for PackageVersion {
	type Error = crate::Error;
	fn try_from(value: &str) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<PackageVersion> for String {
	fn from(value: PackageVersion) -> Self {
		value.to_string()
	}
}

impl PartialEq for PackageVersion {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Eq for PackageVersion {}

impl Ord for PackageVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		use std::cmp::Ordering;

		let numbers = (self.major, self.minor, self.patch, self.revision)
			.cmp(&(other.major, other.minor, other.patch, other.revision));
		if numbers != Ordering::Equal {
			return numbers
		}

		match (&self.release, &other.release) {
			(None, None) => Ordering::Equal,
			/* A prerelease always comes before the release itself */
			(None, Some(_)) => Ordering::Greater,
			(Some(_), None) => Ordering::Less,
			(Some(lhs), Some(rhs)) => compare_release_labels(lhs, rhs),
		}
	}
}

impl PartialOrd for PackageVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::hash::Hash for PackageVersion {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.major.hash(state);
		self.minor.hash(state);
		self.patch.hash(state);
		self.revision.hash(state);
		/* Segments hash the way they compare */
		match &self.release {
			None => 0usize.hash(state),
			Some(release) => {
				let mut count = 0usize;
				for segment in release.split('.') {
					match segment.parse::<u64>() {
						Ok(n) => (0u8, n).hash(state),
						Err(_) => (1u8, segment.to_ascii_lowercase()).hash(state),
					}
					count += 1;
				}
				count.hash(state);
			},
		}
	}
}

impl std::fmt::Display for PackageVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)?;
		if self.parts >= 3 || self.revision != 0 {
			write!(f, ".{}", self.patch)?;
		}
		if self.parts >= 4 || self.revision != 0 {
			write!(f, ".{}", self.revision)?;
		}
		if let Some(release) = &self.release {
			write!(f, "-{}", release)?;
		}
		if let Some(metadata) = &self.metadata {
			write!(f, "+{}", metadata)?;
		}
		Ok(())
	}
}

/// Compares dotted release labels, numeric segments numerically and everything else case-insensitively.
fn compare_release_labels(lhs: &str, rhs: &str) -> std::cmp::Ordering {
	use std::cmp::Ordering;

	let mut lhs_segments = lhs.split('.');
	let mut rhs_segments = rhs.split('.');
	loop {
		match (lhs_segments.next(), rhs_segments.next()) {
			(None, None) => return Ordering::Equal,
			(None, Some(_)) => return Ordering::Less,
			(Some(_), None) => return Ordering::Greater,
			(Some(l), Some(r)) => {
				let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
					(Ok(l), Ok(r)) => l.cmp(&r),
					/* Numeric labels sort before alphanumeric ones */
					(Ok(_), Err(_)) => Ordering::Less,
					(Err(_), Ok(_)) => Ordering::Greater,
					(Err(_), Err(_)) => l.to_ascii_lowercase().cmp(&r.to_ascii_lowercase()),
				};
				if ord != Ordering::Equal {
					return ord
				}
			},
		}
	}
}
