pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::ResolverOptions;
pub use config::ContentOptions;

pub mod package;
pub use package::PackageIdentity;
pub use package::PackageReference;
pub use package::TransitivePackageReference;

pub mod project;
pub mod transitive_resolver;
pub use transitive_resolver::ProjectResolver;
pub use transitive_resolver::ProjectPackages;

pub mod content_model;
pub use content_model::ContentItemCollection;
pub use content_model::ManagedCodeConventions;

pub use tokio_util::sync::CancellationToken;
