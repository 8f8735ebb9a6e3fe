//! Remote asset verification: manifest fetch, URL extraction, reachability
//! probes, and the single-version result cache.

pub mod extract;
pub mod manifest;
pub mod probe;
pub mod verify;

pub use extract::extract_asset_urls;
pub use manifest::{AssetManifest, ManifestClient};
pub use probe::ReachabilityChecker;
pub use verify::{AssetReport, AssetVerifier, CacheEntry};
