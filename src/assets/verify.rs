use std::collections::BTreeSet;

use crate::config::AssetConfig;
use crate::error::AssetError;

use super::extract::extract_asset_urls;
use super::manifest::ManifestClient;
use super::probe::ReachabilityChecker;

/// The single remembered verification: which URLs were unreachable for one
/// manifest version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub version: String,
    pub bad_urls: BTreeSet<String>,
}

/// Outcome of a verification pass that got as far as judging URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReport {
    pub version: Option<String>,
    /// Number of URLs covered by the verdict. Unknown (0) on cache hits.
    pub checked: usize,
    pub bad_urls: BTreeSet<String>,
    /// True when the verdict was served from the cache without probing.
    pub cached: bool,
}

impl AssetReport {
    pub fn passed(&self) -> bool {
        self.bad_urls.is_empty()
    }
}

/// Runs the fetch → extract → probe pipeline and remembers the result for the
/// latest manifest version only.
pub struct AssetVerifier {
    manifest: ManifestClient,
    checker: ReachabilityChecker,
    host_domain: String,
    progress_every: usize,
    cache: Option<CacheEntry>,
}

impl AssetVerifier {
    pub fn new(
        manifest: ManifestClient,
        checker: ReachabilityChecker,
        host_domain: impl Into<String>,
    ) -> Self {
        Self {
            manifest,
            checker,
            host_domain: host_domain.into(),
            progress_every: 100,
            cache: None,
        }
    }

    pub fn from_config(config: &AssetConfig) -> Result<Self, AssetError> {
        let manifest = ManifestClient::new(
            config.manifest_url.clone(),
            config.version_field.clone(),
            config.timeout(),
        )?;
        let checker = ReachabilityChecker::new(config.timeout())?;
        Ok(Self::new(manifest, checker, config.host_domain.clone())
            .with_progress_every(config.progress_every))
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    pub fn cached(&self) -> Option<&CacheEntry> {
        self.cache.as_ref()
    }

    /// Verify that every asset in the current manifest is reachable.
    ///
    /// Fetch failures and empty URL sets are errors and leave the cache
    /// untouched. A manifest whose version token matches the cached entry is
    /// answered from the cache without probing. A manifest without a version
    /// token is always probed.
    pub async fn verify(&mut self) -> Result<AssetReport, AssetError> {
        let manifest = self.manifest.fetch().await?;

        if let (Some(version), Some(entry)) = (&manifest.version, &self.cache) {
            if *version == entry.version {
                tracing::debug!(version = %version, "asset manifest unchanged, using cached result");
                return Ok(AssetReport {
                    version: Some(entry.version.clone()),
                    checked: 0,
                    bad_urls: entry.bad_urls.clone(),
                    cached: true,
                });
            }
        }

        let urls = extract_asset_urls(&manifest, &self.host_domain);
        if urls.is_empty() {
            return Err(AssetError::NoUrls);
        }

        let total = urls.len();
        let mut bad_urls = BTreeSet::new();
        for (index, url) in urls.iter().enumerate() {
            if !self.checker.check(url).await {
                bad_urls.insert(url.clone());
            }
            let done = index + 1;
            if done % self.progress_every == 0 {
                tracing::info!("Checked {done}/{total} assets...");
            }
        }

        if let Some(version) = &manifest.version {
            self.cache = Some(CacheEntry {
                version: version.clone(),
                bad_urls: bad_urls.clone(),
            });
        }

        Ok(AssetReport {
            version: manifest.version,
            checked: total,
            bad_urls,
            cached: false,
        })
    }
}
