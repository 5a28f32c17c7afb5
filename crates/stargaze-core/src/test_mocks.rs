//! Mock implementations for testing core logic.
//!
//! These mocks implement the protocol traits from stargaze-github and the
//! collaborator traits from this crate, so reconciliation and session logic
//! can be tested without a server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use stargaze_github::{
    BulkQueryApi, Error as GitHubError, GraphQLResponse, GraphQLWarning, OwnerNode, QueryDocument,
    RateLimitSnapshot, RepositoryMap, RepositoryNode, Result as GitHubResult, SecretString,
    SingleItemApi, StargazerConnection,
};
use tokio::sync::Barrier;

use crate::Result;
use crate::traits::TokenSource;

fn unavailable() -> GitHubError {
    GitHubError::ApiError {
        status: 503,
        message: "Service Unavailable".into(),
    }
}

/// Build a resolved repository node.
pub fn node(owner: &str, name: &str, stars: u64) -> RepositoryNode {
    RepositoryNode {
        owner: OwnerNode {
            login: owner.to_string(),
        },
        name: name.to_string(),
        stargazers: StargazerConnection { total_count: stars },
    }
}

/// Mock implementation of `BulkQueryApi`.
pub struct MockBulk {
    rate_limit: Option<RateLimitSnapshot>,
    data: Option<RepositoryMap>,
    warnings: Vec<GraphQLWarning>,
    fail_queries: bool,
    rate_limit_barrier: Option<Arc<Barrier>>,
    rate_limit_calls: AtomicUsize,
    documents: Mutex<Vec<String>>,
}

impl Default for MockBulk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBulk {
    pub fn new() -> Self {
        Self {
            rate_limit: Some(RateLimitSnapshot::new(5000, 5000)),
            data: Some(RepositoryMap::new()),
            warnings: Vec::new(),
            fail_queries: false,
            rate_limit_barrier: None,
            rate_limit_calls: AtomicUsize::new(0),
            documents: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rate_limit(mut self, snapshot: RateLimitSnapshot) -> Self {
        self.rate_limit = Some(snapshot);
        self
    }

    pub fn with_node(mut self, alias: &str, node: RepositoryNode) -> Self {
        self.data
            .get_or_insert_with(RepositoryMap::new)
            .insert(alias.to_string(), Some(node));
        self
    }

    pub fn with_null(mut self, alias: &str) -> Self {
        self.data
            .get_or_insert_with(RepositoryMap::new)
            .insert(alias.to_string(), None);
        self
    }

    pub fn with_no_data(mut self) -> Self {
        self.data = None;
        self
    }

    pub fn with_warning(mut self, message: &str) -> Self {
        self.warnings.push(GraphQLWarning {
            message: message.to_string(),
            kind: Some("NOT_FOUND".into()),
            path: Vec::new(),
        });
        self
    }

    pub fn with_failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Hold `rate_limit` until every party of `barrier` has arrived.
    pub fn with_rate_limit_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.rate_limit_barrier = Some(barrier);
        self
    }

    pub fn rate_limit_calls(&self) -> usize {
        self.rate_limit_calls.load(Ordering::SeqCst)
    }

    /// Rendered query text of every repository document received.
    pub fn documents(&self) -> Vec<String> {
        self.documents.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

impl BulkQueryApi for MockBulk {
    async fn rate_limit(&self) -> GitHubResult<RateLimitSnapshot> {
        self.rate_limit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.rate_limit_barrier {
            barrier.wait().await;
        }
        self.rate_limit.ok_or_else(unavailable)
    }

    async fn repositories(
        &self,
        document: &QueryDocument,
    ) -> GitHubResult<GraphQLResponse<RepositoryMap>> {
        if let Ok(mut documents) = self.documents.lock() {
            documents.push(document.render().query);
        }
        if self.fail_queries {
            return Err(unavailable());
        }
        Ok(GraphQLResponse {
            data: self.data.clone(),
            warnings: self.warnings.clone(),
        })
    }
}

/// Scripted single-item answer.
#[derive(Debug, Clone, Copy)]
pub enum MockCount {
    Stars(u64),
    NotFound,
    Unavailable,
}

/// Mock implementation of `SingleItemApi`.
pub struct MockSingle {
    rate_limit: Option<RateLimitSnapshot>,
    counts: HashMap<String, MockCount>,
    rate_limit_barrier: Option<Arc<Barrier>>,
    rate_limit_calls: AtomicUsize,
    lookups: Mutex<Vec<String>>,
}

impl Default for MockSingle {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSingle {
    pub fn new() -> Self {
        Self {
            rate_limit: Some(RateLimitSnapshot::new(5000, 5000)),
            counts: HashMap::new(),
            rate_limit_barrier: None,
            rate_limit_calls: AtomicUsize::new(0),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rate_limit(mut self, snapshot: RateLimitSnapshot) -> Self {
        self.rate_limit = Some(snapshot);
        self
    }

    pub fn with_failing_rate_limit(mut self) -> Self {
        self.rate_limit = None;
        self
    }

    pub fn with_count(mut self, full_name: &str, count: MockCount) -> Self {
        self.counts.insert(full_name.to_string(), count);
        self
    }

    /// Hold `rate_limit` until every party of `barrier` has arrived.
    pub fn with_rate_limit_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.rate_limit_barrier = Some(barrier);
        self
    }

    pub fn rate_limit_calls(&self) -> usize {
        self.rate_limit_calls.load(Ordering::SeqCst)
    }

    /// `owner/name` of every stargazer lookup received.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl SingleItemApi for MockSingle {
    async fn rate_limit(&self) -> GitHubResult<RateLimitSnapshot> {
        self.rate_limit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.rate_limit_barrier {
            barrier.wait().await;
        }
        self.rate_limit.ok_or_else(unavailable)
    }

    async fn stargazers_count(&self, owner: &str, name: &str) -> GitHubResult<u64> {
        let full_name = format!("{owner}/{name}");
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(full_name.clone());
        }
        match self.counts.get(&full_name) {
            Some(MockCount::Stars(count)) => Ok(*count),
            Some(MockCount::NotFound) | None => Err(GitHubError::RepoNotFound(full_name)),
            Some(MockCount::Unavailable) => Err(unavailable()),
        }
    }
}

/// Mock implementation of `TokenSource`.
pub struct MockTokenSource {
    token: Mutex<Option<String>>,
    changed: AtomicBool,
}

impl MockTokenSource {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(ToString::to_string)),
            changed: AtomicBool::new(false),
        }
    }

    /// Swap the token without raising the changed flag.
    pub fn replace_silently(&self, token: Option<&str>) {
        if let Ok(mut current) = self.token.lock() {
            *current = token.map(ToString::to_string);
        }
    }

    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::SeqCst);
    }
}

impl TokenSource for MockTokenSource {
    async fn load(&self) -> Result<Option<SecretString>> {
        Ok(self
            .token
            .lock()
            .ok()
            .and_then(|t| t.clone())
            .map(SecretString::from))
    }

    fn changed(&self) -> bool {
        self.changed.load(Ordering::SeqCst)
    }

    fn clear_changed(&self) {
        self.changed.store(false, Ordering::SeqCst);
    }
}
