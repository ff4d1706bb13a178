//! Download pipeline: normalize → resolve via the fallback chain → fetch.

pub mod fetch;
pub mod link;
pub mod provider;
pub mod resolver;

// Re-exports for convenience
pub use fetch::{fetch_client, fetch_media, FetchError, MediaBlob};
pub use link::SourceLink;
pub use resolver::{DownloadOutcome, Resolver};
