pub mod config;
pub mod logging;

pub mod attachment;
pub mod locator;
pub mod materialize;
pub mod metadata;
pub mod provider;
pub mod resolver;

pub use attachment::Attachment;
pub use locator::Locator;
pub use resolver::{Resolution, ResolutionSource, Resolver, ResolverSettings, UnresolvedReason};
