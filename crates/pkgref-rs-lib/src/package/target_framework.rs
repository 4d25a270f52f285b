//! Target frameworks as written in short folder form (`net8.0`, `netstandard2.0`, `net472`, ...).

use std::cmp::Ordering;
use std::sync::OnceLock;

use serde::{Serialize, Deserialize};

/// A four part framework version, missing parts are zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion(pub u32, pub u32, pub u32, pub u32);

impl FrameworkVersion {
	pub fn new(major: u32, minor: u32) -> Self {
		FrameworkVersion(major, minor, 0, 0)
	}

	fn parse_dotted(s: &str) -> Option<Self> {
		if s.is_empty() {
			return Some(Self::default())
		}
		let mut parts = [0u32; 4];
		for (i, p) in s.split('.').enumerate() {
			if i >= 4 { return None }
			parts[i] = p.parse().ok()?;
		}
		Some(FrameworkVersion(parts[0], parts[1], parts[2], parts[3]))
	}

	/// `472` style versions where every digit is its own part.
	fn parse_compact(s: &str) -> Option<Self> {
		if s.len() > 4 {
			return None
		}
		let mut parts = [0u32; 4];
		for (i, c) in s.chars().enumerate() {
			parts[i] = c.to_digit(10)?;
		}
		Some(FrameworkVersion(parts[0], parts[1], parts[2], parts[3]))
	}

	fn fmt_dotted(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.0, self.1)?;
		if self.2 != 0 || self.3 != 0 { write!(f, ".{}", self.2)?; }
		if self.3 != 0 { write!(f, ".{}", self.3)?; }
		Ok(())
	}

	fn fmt_compact(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if *self == Self::default() {
			return Ok(())
		}
		write!(f, "{}{}", self.0, self.1)?;
		if self.2 != 0 || self.3 != 0 { write!(f, "{}", self.2)?; }
		if self.3 != 0 { write!(f, "{}", self.3)?; }
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameworkFamily {
	NetFramework,
	/// .NET Core and .NET 5 onwards.
	NetCoreApp,
	NetStandard,
	/// Fits every project.
	Any,
	Native,
	/// A family with no special compatibility rules, stored lower case.
	Other(String),
	/// The folder name couldn't be parsed as a framework.
	Unsupported,
}

impl FrameworkFamily {
	pub fn name(&self) -> &str {
		match self {
			FrameworkFamily::NetFramework => ".NETFramework",
			FrameworkFamily::NetCoreApp => ".NETCoreApp",
			FrameworkFamily::NetStandard => ".NETStandard",
			FrameworkFamily::Any => "Any",
			FrameworkFamily::Native => "native",
			FrameworkFamily::Other(id) => id,
			FrameworkFamily::Unsupported => "Unsupported",
		}
	}

	fn discriminant(&self) -> u8 {
		match self {
			FrameworkFamily::NetFramework => 0,
			FrameworkFamily::NetCoreApp => 1,
			FrameworkFamily::NetStandard => 2,
			FrameworkFamily::Any => 3,
			FrameworkFamily::Native => 4,
			FrameworkFamily::Other(_) => 5,
			FrameworkFamily::Unsupported => 6,
		}
	}
}

/// A framework a project or a package asset targets.
///
/// The [`Ord`] implementation is the framework precedence used to pick a single
/// representative when the same package shows up under several frameworks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetFramework {
	family: FrameworkFamily,
	version: FrameworkVersion,
	platform: Option<String>,
	platform_version: FrameworkVersion,
}

fn folder_regex() -> &'static regex::Regex {
	static RE: OnceLock<regex::Regex> = OnceLock::new();
	RE.get_or_init(|| {
		regex::Regex::new(r"^([a-z]+)([0-9.]*)(?:-([a-z]+)([0-9.]*))?$").expect("framework folder regex should compile")
	})
}

impl TargetFramework {
	pub fn new(family: FrameworkFamily, version: FrameworkVersion) -> Self {
		Self { family, version, platform: None, platform_version: FrameworkVersion::default() }
	}

	pub fn any() -> Self {
		Self::new(FrameworkFamily::Any, FrameworkVersion::default())
	}

	pub fn unsupported() -> Self {
		Self::new(FrameworkFamily::Unsupported, FrameworkVersion::default())
	}

	pub fn with_platform(mut self, platform: &str, platform_version: FrameworkVersion) -> Self {
		self.platform = Some(platform.to_ascii_lowercase());
		self.platform_version = platform_version;
		self
	}

	/// Parses a short folder name.
	/// # Errors
	/// [`Parse`](crate::Error::Parse) when the name is not a recognisable framework.
	pub fn parse(folder: &str) -> crate::Result<Self> {
		let lower = folder.trim().to_ascii_lowercase();
		let err = || crate::Error::Parse(format!("\"{}\" is not a valid target framework", folder));

		let caps = folder_regex().captures(&lower).ok_or_else(err)?;
		let id = caps.get(1).map_or("", |m| m.as_str());
		let version_str = caps.get(2).map_or("", |m| m.as_str());

		let (family, version) = match id {
			"any" | "dotnet" if version_str.is_empty() => (FrameworkFamily::Any, FrameworkVersion::default()),
			"native" if version_str.is_empty() => (FrameworkFamily::Native, FrameworkVersion::default()),
			"net" => {
				let version = if version_str.contains('.') {
					FrameworkVersion::parse_dotted(version_str)
				} else {
					FrameworkVersion::parse_compact(version_str)
				}.ok_or_else(err)?;
				if version.0 >= 5 {
					(FrameworkFamily::NetCoreApp, version)
				} else {
					(FrameworkFamily::NetFramework, version)
				}
			},
			"netcoreapp" => (FrameworkFamily::NetCoreApp, FrameworkVersion::parse_dotted(version_str).ok_or_else(err)?),
			"netstandard" => (FrameworkFamily::NetStandard, FrameworkVersion::parse_dotted(version_str).ok_or_else(err)?),
			other => {
				let version = if version_str.contains('.') || version_str.is_empty() {
					FrameworkVersion::parse_dotted(version_str)
				} else {
					version_str.parse().ok().map(|major| FrameworkVersion::new(major, 0))
				}.ok_or_else(err)?;
				(FrameworkFamily::Other(other.to_string()), version)
			},
		};

		let mut framework = TargetFramework::new(family, version);

		if let Some(platform) = caps.get(3) {
			/* Only .NET 5 onwards carries a platform */
			if framework.family != FrameworkFamily::NetCoreApp || framework.version.0 < 5 {
				return Err(err())
			}
			let platform_version = FrameworkVersion::parse_dotted(caps.get(4).map_or("", |m| m.as_str())).ok_or_else(err)?;
			framework = framework.with_platform(platform.as_str(), platform_version);
		}

		Ok(framework)
	}

	/// Like [`parse()`](Self::parse) but unparseable names become [`FrameworkFamily::Unsupported`].
	pub fn parse_folder(folder: &str) -> Self {
		Self::parse(folder).unwrap_or_else(|_| Self::unsupported())
	}

	pub fn family(&self) -> &FrameworkFamily { &self.family }
	pub fn version(&self) -> FrameworkVersion { self.version }
	pub fn platform(&self) -> Option<&str> { self.platform.as_deref() }
	pub fn platform_version(&self) -> FrameworkVersion { self.platform_version }

	pub fn is_any(&self) -> bool {
		self.family == FrameworkFamily::Any
	}

	pub fn is_unsupported(&self) -> bool {
		self.family == FrameworkFamily::Unsupported
	}

	/// Highest .NETStandard version usable by this framework, if any.
	fn max_net_standard(&self) -> Option<FrameworkVersion> {
		let v = self.version;
		match self.family {
			FrameworkFamily::NetStandard => Some(v),
			FrameworkFamily::NetCoreApp => Some(
				if v >= FrameworkVersion::new(2, 1) { FrameworkVersion::new(2, 1) }
				else if v >= FrameworkVersion::new(2, 0) { FrameworkVersion::new(2, 0) }
				else { FrameworkVersion::new(1, 6) }
			),
			FrameworkFamily::NetFramework => {
				if v >= FrameworkVersion(4, 6, 1, 0) { Some(FrameworkVersion::new(2, 0)) }
				else if v >= FrameworkVersion::new(4, 6) { Some(FrameworkVersion::new(1, 3)) }
				else if v >= FrameworkVersion(4, 5, 1, 0) { Some(FrameworkVersion::new(1, 2)) }
				else if v >= FrameworkVersion::new(4, 5) { Some(FrameworkVersion::new(1, 1)) }
				else { None }
			},
			_ => None,
		}
	}

	/// Checks whether assets built for `candidate` can be used by a project targeting `self`.
	pub fn is_compatible(&self, candidate: &TargetFramework) -> bool {
		if candidate.is_any() {
			return true
		}
		if self.is_unsupported() || candidate.is_unsupported() || self.is_any() {
			return false
		}

		if let Some(platform) = &candidate.platform {
			if self.platform.as_ref() != Some(platform) || candidate.platform_version > self.platform_version {
				return false
			}
		}

		if self.family == candidate.family {
			return candidate.version <= self.version
		}

		match candidate.family {
			FrameworkFamily::NetStandard => self.max_net_standard().map_or(false, |max| candidate.version <= max),
			_ => false,
		}
	}

	/// Orders two compatible candidates by how close they are to `self`.
	///
	/// `Greater` when `a` is the nearer match.
	pub fn nearer(&self, a: &TargetFramework, b: &TargetFramework) -> Ordering {
		let rank = |c: &TargetFramework| {
			let family_rank = if c.family == self.family {
				3
			} else {
				match c.family {
					FrameworkFamily::NetStandard => 2,
					FrameworkFamily::Any => 0,
					_ => 1,
				}
			};
			(family_rank, c.version, c.platform.is_some(), c.platform_version)
		};
		rank(a).cmp(&rank(b))
	}
}

impl Ord for TargetFramework {
	fn cmp(&self, other: &Self) -> Ordering {
		self.family.name().to_ascii_lowercase().cmp(&other.family.name().to_ascii_lowercase())
			/* Families sharing a lower case name still have to differ to agree with `Eq` */
			.then_with(|| self.family.discriminant().cmp(&other.family.discriminant()))
			.then_with(|| self.family.name().cmp(other.family.name()))
			.then_with(|| self.version.cmp(&other.version))
			.then_with(|| self.platform.cmp(&other.platform))
			.then_with(|| self.platform_version.cmp(&other.platform_version))
	}
}

impl PartialOrd for TargetFramework {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for TargetFramework {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.family {
			FrameworkFamily::NetFramework => {
				write!(f, "net")?;
				self.version.fmt_compact(f)?;
			},
			FrameworkFamily::NetCoreApp => {
				write!(f, "{}", if self.version.0 >= 5 { "net" } else { "netcoreapp" })?;
				self.version.fmt_dotted(f)?;
			},
			FrameworkFamily::NetStandard => {
				write!(f, "netstandard")?;
				self.version.fmt_dotted(f)?;
			},
			FrameworkFamily::Any => write!(f, "any")?,
			FrameworkFamily::Native => write!(f, "native")?,
			FrameworkFamily::Other(id) => {
				write!(f, "{}", id)?;
				if self.version != FrameworkVersion::default() {
					self.version.fmt_dotted(f)?;
				}
			},
			FrameworkFamily::Unsupported => write!(f, "unsupported")?,
		}
		if let Some(platform) = &self.platform {
			write!(f, "-{}", platform)?;
			if self.platform_version != FrameworkVersion::default() {
				self.platform_version.fmt_dotted(f)?;
			}
		}
		Ok(())
	}
}

impl TryFrom<String> for TargetFramework {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<TargetFramework> for String {
	fn from(value: TargetFramework) -> Self {
		value.to_string()
	}
}

impl std::str::FromStr for TargetFramework {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}
