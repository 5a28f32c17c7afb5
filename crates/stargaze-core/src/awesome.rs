//! Awesome list membership.
//!
//! The list is a loosely structured markdown file, so membership is a plain
//! substring test on `owner/name` rather than a parse.

use std::sync::Arc;

use stargaze_github::{ClientConfig, RawClient, RepositoryReference};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::traits::Cache;

/// Default list location.
pub const AWESOME_LIST_URL: &str =
    "https://raw.githubusercontent.com/sindresorhus/awesome/master/readme.md";

/// Cache key the list text is stored under.
pub const AWESOME_LIST_KEY: &str = "@@awesome-list";

/// Where the list text comes from.
pub trait ListSource: Send + Sync {
    /// Download the full list text.
    fn fetch(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// List source backed by a raw-content URL.
#[derive(Debug, Clone)]
pub struct HttpListSource {
    client: RawClient,
    url: String,
}

impl HttpListSource {
    /// Create a source for `url`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: RawClient::new(config)?,
            url: url.into(),
        })
    }
}

impl ListSource for HttpListSource {
    async fn fetch(&self) -> Result<String> {
        Ok(self.client.fetch_text(&self.url).await?)
    }
}

/// Read-through cached view of the awesome list.
pub struct AwesomeListIndex<L: ListSource> {
    source: L,
    cache: Arc<dyn Cache>,
    fill: Mutex<()>,
}

impl<L: ListSource> AwesomeListIndex<L> {
    /// Create an index reading through `cache`.
    #[must_use]
    pub fn new(source: L, cache: Arc<dyn Cache>) -> Self {
        Self {
            source,
            cache,
            fill: Mutex::new(()),
        }
    }

    /// Full list text, fetched at most once per cache lifetime.
    ///
    /// # Errors
    /// Returns error if the list has to be fetched and the fetch fails.
    pub async fn list(&self) -> Result<String> {
        if let Some(list) = self.cached() {
            log_size(&list, true);
            return Ok(list);
        }

        // Concurrent misses wait here instead of fetching again.
        let _fill = self.fill.lock().await;
        if let Some(list) = self.cached() {
            log_size(&list, true);
            return Ok(list);
        }

        let list = self.source.fetch().await?;
        self.cache.set(AWESOME_LIST_KEY, list.clone());
        log_size(&list, false);
        Ok(list)
    }

    /// Whether `owner/name` appears anywhere in the list.
    ///
    /// # Errors
    /// Returns error if the list cannot be fetched.
    pub async fn contains(&self, reference: &RepositoryReference) -> Result<bool> {
        let list = self.list().await?;
        Ok(list.contains(&reference.to_string()))
    }

    fn cached(&self) -> Option<String> {
        self.cache
            .get(AWESOME_LIST_KEY)
            .filter(|list| !list.is_empty())
    }
}

impl<L: ListSource> std::fmt::Debug for AwesomeListIndex<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwesomeListIndex")
            .field("cached", &self.cached().is_some())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_precision_loss)]
fn log_size(list: &str, from_cache: bool) {
    let kib = list.len() as f64 / 1024.0;
    debug!(size_kib = %format!("{kib:.3}"), from_cache, "awesome list");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cache::MemoryCache;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIST: &str = "# Awesome\n\n- [Go](https://github.com/avelino/awesome-go)\n";

    struct CountingSource {
        text: String,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl ListSource for &CountingSource {
        async fn fetch(&self) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    fn reference(owner: &str, name: &str) -> RepositoryReference {
        RepositoryReference::new(owner, name).unwrap()
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let source = CountingSource::new(LIST);
        let cache = Arc::new(MemoryCache::new());
        let index = AwesomeListIndex::new(&source, cache.clone());

        assert!(index.contains(&reference("avelino", "awesome-go")).await.unwrap());
        assert_eq!(source.fetches(), 1);
        assert_eq!(cache.get(AWESOME_LIST_KEY).as_deref(), Some(LIST));

        assert!(!index.contains(&reference("golang", "go")).await.unwrap());
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_prefilled_cache_skips_fetch() {
        let source = CountingSource::new("unused");
        let cache = Arc::new(MemoryCache::new());
        cache.set(AWESOME_LIST_KEY, LIST.to_string());
        let index = AwesomeListIndex::new(&source, cache);

        assert!(index.contains(&reference("avelino", "awesome-go")).await.unwrap());
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn test_empty_cached_list_is_refetched() {
        let source = CountingSource::new(LIST);
        let cache = Arc::new(MemoryCache::new());
        cache.set(AWESOME_LIST_KEY, String::new());
        let index = AwesomeListIndex::new(&source, cache);

        assert_eq!(index.list().await.unwrap(), LIST);
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let source = CountingSource::new(LIST);
        let index = AwesomeListIndex::new(&source, Arc::new(MemoryCache::new()));
        let target = reference("avelino", "awesome-go");

        let (a, b) = tokio::join!(index.contains(&target), index.contains(&target));

        assert!(a.unwrap() && b.unwrap());
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_http_source_fetches_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/readme.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LIST))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/readme.md", server.uri());
        let source = HttpListSource::new(url, &ClientConfig::new(server.uri())).unwrap();
        let index = AwesomeListIndex::new(source, Arc::new(MemoryCache::new()));

        assert!(index.contains(&reference("avelino", "awesome-go")).await.unwrap());
        assert!(index.contains(&reference("avelino", "awesome-go")).await.unwrap());
    }

    #[tokio::test]
    async fn test_http_source_failure_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = HttpListSource::new(server.uri(), &ClientConfig::new(server.uri())).unwrap();
        let cache = Arc::new(MemoryCache::new());
        let index = AwesomeListIndex::new(source, cache.clone());

        assert!(index.contains(&reference("a", "b")).await.is_err());
        assert!(cache.is_empty());
    }
}
