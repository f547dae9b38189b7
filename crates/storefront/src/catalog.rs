//! Product catalog loader.
//!
//! The catalog is a static JSON document published either next to the
//! binary (a file path) or on a web server (an http(s) URL). It is loaded on
//! first use and cached with `moka` for the configured TTL, so edits to the
//! file show up without a restart once the entry expires.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bazaar_core::Catalog;
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

const CACHE_KEY: &str = "catalog";

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file failed.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("catalog request returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The document is not a valid catalog.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the catalog document is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(Url),
}

impl FromStr for CatalogSource {
    type Err = url::ParseError;

    /// Values starting with `http://` or `https://` are URLs; anything else is
    /// a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s).map(Self::Url)
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Cached catalog loader.
///
/// Cheaply cloneable; clones share the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    source: CatalogSource,
    http: reqwest::Client,
    cache: Cache<&'static str, Arc<Catalog>>,
}

impl CatalogClient {
    /// Create a loader for `source`, caching results for `ttl`.
    #[must_use]
    pub fn new(source: CatalogSource, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            inner: Arc::new(CatalogClientInner {
                source,
                http: reqwest::Client::new(),
                cache,
            }),
        }
    }

    /// Where the catalog is loaded from.
    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.inner.source
    }

    /// Get the catalog, loading it if the cache is empty or expired.
    ///
    /// Failed loads are not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched or parsed.
    #[instrument(skip(self), fields(source = %self.inner.source))]
    pub async fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self.inner.cache.get(CACHE_KEY).await {
            debug!("Cache hit for catalog");
            return Ok(catalog);
        }

        let catalog = Arc::new(self.fetch().await?);
        debug!(products = catalog.products.len(), "Catalog loaded");

        self.inner
            .cache
            .insert(CACHE_KEY, Arc::clone(&catalog))
            .await;

        Ok(catalog)
    }

    /// Drop the cached catalog so the next request reloads it.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(CACHE_KEY).await;
    }

    async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let body = match &self.inner.source {
            CatalogSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            CatalogSource::Url(url) => {
                let response = self.inner.http.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status));
                }
                response.text().await?
            }
        };

        Ok(Catalog::from_json(&body)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/products.json")
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!(
            "data/products.json".parse::<CatalogSource>().unwrap(),
            CatalogSource::File(PathBuf::from("data/products.json"))
        );
        assert!(matches!(
            "https://cdn.example.com/products.json".parse::<CatalogSource>(),
            Ok(CatalogSource::Url(_))
        ));
        assert!("http://".parse::<CatalogSource>().is_err());
    }

    #[tokio::test]
    async fn test_loads_bundled_catalog() {
        let client = CatalogClient::new(
            CatalogSource::File(fixture_path()),
            Duration::from_secs(60),
        );

        let catalog = client.catalog().await.unwrap();
        assert!(!catalog.products.is_empty());
        assert!(catalog.duplicate_ids().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let client = CatalogClient::new(
            CatalogSource::File(PathBuf::from("/nonexistent/products.json")),
            Duration::from_secs(60),
        );

        assert!(matches!(
            client.catalog().await,
            Err(CatalogError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "bazaar-catalog-{}.json",
            uuid::Uuid::new_v4()
        ));
        tokio::fs::write(&path, "{\"items\": []}").await.unwrap();

        let client = CatalogClient::new(CatalogSource::File(path.clone()), Duration::from_secs(60));
        let result = client.catalog().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_cached_until_invalidated() {
        let path = std::env::temp_dir().join(format!(
            "bazaar-catalog-{}.json",
            uuid::Uuid::new_v4()
        ));
        tokio::fs::write(&path, r#"{"products": []}"#).await.unwrap();

        let client = CatalogClient::new(CatalogSource::File(path.clone()), Duration::from_secs(60));
        assert!(client.catalog().await.unwrap().products.is_empty());

        let fixture = tokio::fs::read_to_string(fixture_path()).await.unwrap();
        tokio::fs::write(&path, fixture).await.unwrap();
        assert!(client.catalog().await.unwrap().products.is_empty());

        client.invalidate().await;
        let reloaded = client.catalog().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(!reloaded.unwrap().products.is_empty());
    }
}
