use std::time::Duration;

use serde_json::Value;

use crate::error::AssetError;

/// A snapshot of the remote asset manifest.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    /// Opaque version token (e.g. the export timestamp). Equal tokens imply an
    /// identical asset set.
    pub version: Option<String>,
    pub body: Value,
}

impl AssetManifest {
    /// Wrap a decoded manifest, reading the version token from `version_field`.
    ///
    /// String and numeric tokens are accepted; anything else counts as absent.
    pub fn from_value(body: Value, version_field: &str) -> Self {
        let version = match body.get(version_field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self { version, body }
    }
}

/// Fetches the manifest with one bounded GET. No retries.
#[derive(Debug, Clone)]
pub struct ManifestClient {
    client: reqwest::Client,
    url: Option<String>,
    version_field: String,
}

impl ManifestClient {
    pub fn new(
        url: Option<String>,
        version_field: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AssetError::Client)?;
        Ok(Self::with_client(client, url, version_field))
    }

    pub fn with_client(
        client: reqwest::Client,
        url: Option<String>,
        version_field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url,
            version_field: version_field.into(),
        }
    }

    pub async fn fetch(&self) -> Result<AssetManifest, AssetError> {
        let url = self.url.as_deref().ok_or(AssetError::NotConfigured)?;

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(AssetError::Status {
                status: resp.status().as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| AssetError::Malformed(e.to_string()))?;
        Ok(AssetManifest::from_value(body, &self.version_field))
    }
}
