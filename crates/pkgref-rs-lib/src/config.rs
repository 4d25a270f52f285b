/// Environment variable consulted for the default of [`ResolverOptions::transitive_origins`].
pub const TRANSITIVE_ORIGINS_ENV: &str = "PKGREF_TRANSITIVE_ORIGINS";

/// Options for [`ProjectResolver`](crate::ProjectResolver).
#[derive(Debug, Clone)]
pub struct ResolverOptions {
	transitive_origins: bool,
	max_walk_depth: usize,
}

impl Default for ResolverOptions {
	fn default() -> Self {
		Self {
			transitive_origins: match std::env::var(TRANSITIVE_ORIGINS_ENV) {
				Ok(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"),
				Err(_) => true,
			},
			max_walk_depth: 256,
		}
	}
}

impl ResolverOptions {
	/// When enabled transitive packages carry the direct packages that pulled them in.
	pub fn transitive_origins(&self) -> bool {
		self.transitive_origins
	}
	pub fn set_transitive_origins(&mut self, transitive_origins: bool) {
		self.transitive_origins = transitive_origins;
	}

	/// Origin walks don't descend further than this many edges from a direct package.
	pub fn max_walk_depth(&self) -> usize {
		self.max_walk_depth
	}
	/// returns if the depth is valid or not.
	pub fn set_max_walk_depth(&mut self, max_walk_depth: usize) -> bool {
		if max_walk_depth > 0 {
			self.max_walk_depth = max_walk_depth;
			true
		} else {
			false
		}
	}
}

/// Options for [`ContentItemCollection`](crate::ContentItemCollection).
#[derive(Debug, Clone)]
pub struct ContentOptions {
	contract_shim: bool,
}

impl Default for ContentOptions {
	fn default() -> Self {
		Self { contract_shim: true }
	}
}

impl ContentOptions {
	/// Files under `lib/contract` also appear under `ref/any` when enabled.
	pub fn contract_shim(&self) -> bool {
		self.contract_shim
	}
	pub fn set_contract_shim(&mut self, contract_shim: bool) {
		self.contract_shim = contract_shim;
	}
}
