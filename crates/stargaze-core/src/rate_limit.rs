//! Rate-limit guard shared by both protocols.
//!
//! GitHub meters the GraphQL and REST APIs separately. The guard asks both
//! for their quota at once, keeps the tighter of the two, publishes it as a
//! menu title, and refuses batch work once less than the threshold fraction
//! of quota is left.

use std::sync::{Arc, Mutex};

use stargaze_github::{BulkQueryApi, RateLimitSnapshot, SingleItemApi};
use tracing::info;

use crate::error::{Error, Result};
use crate::menu::MENU_RATE_LIMIT;
use crate::traits::ContextMenu;

/// Fraction of quota a batch must leave untouched.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Queries, reduces and enforces rate limits.
pub struct RateLimitGuard {
    threshold: f64,
    menu: Arc<dyn ContextMenu>,
    latest: Mutex<Option<RateLimitSnapshot>>,
}

impl RateLimitGuard {
    /// Create a guard publishing titles to `menu`.
    #[must_use]
    pub fn new(threshold: f64, menu: Arc<dyn ContextMenu>) -> Self {
        Self {
            threshold,
            menu,
            latest: Mutex::new(None),
        }
    }

    /// Configured threshold fraction.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Query both protocols concurrently and return the binding snapshot.
    ///
    /// A failure on either side fails the whole check.
    ///
    /// # Errors
    /// Returns the first remote error from either query.
    pub async fn check<B, S>(&self, bulk: &B, single: &S) -> Result<RateLimitSnapshot>
    where
        B: BulkQueryApi,
        S: SingleItemApi,
    {
        let (graphql, rest) = tokio::try_join!(bulk.rate_limit(), single.rate_limit())?;
        let snapshot = select_binding(graphql, rest);

        info!(
            remaining = snapshot.remaining,
            limit = snapshot.limit,
            "rate limit"
        );
        self.publish(snapshot);

        Ok(snapshot)
    }

    /// Fail when `snapshot` leaves too little headroom for a batch.
    ///
    /// # Errors
    /// Returns [`Error::RateLimitExceeded`].
    pub fn enforce(&self, snapshot: &RateLimitSnapshot) -> Result<()> {
        enforce_threshold(snapshot, self.threshold)
    }

    /// Snapshot from the most recent successful check.
    #[must_use]
    pub fn latest(&self) -> Option<RateLimitSnapshot> {
        self.latest.lock().ok().and_then(|latest| *latest)
    }

    fn publish(&self, snapshot: RateLimitSnapshot) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(snapshot);
        }
        self.menu.upsert(MENU_RATE_LIMIT, &format_title(&snapshot));
    }
}

impl std::fmt::Debug for RateLimitGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitGuard")
            .field("threshold", &self.threshold)
            .field("latest", &self.latest())
            .finish_non_exhaustive()
    }
}

/// Keep the snapshot with fewer calls left. Ties go to the bulk protocol.
#[must_use]
pub const fn select_binding(bulk: RateLimitSnapshot, single: RateLimitSnapshot) -> RateLimitSnapshot {
    if single.remaining < bulk.remaining {
        single
    } else {
        bulk
    }
}

/// Fail when the quota is unknown or at most `threshold` of it is left.
///
/// # Errors
/// Returns [`Error::RateLimitExceeded`].
pub fn enforce_threshold(snapshot: &RateLimitSnapshot, threshold: f64) -> Result<()> {
    match snapshot.ratio() {
        Some(ratio) if ratio > threshold => Ok(()),
        _ => Err(Error::RateLimitExceeded {
            remaining: snapshot.remaining,
            limit: snapshot.limit,
            threshold,
        }),
    }
}

/// Menu title for a snapshot, e.g. `Rate limit: 4,321 / 5,000 (86%)`.
#[must_use]
pub fn format_title(snapshot: &RateLimitSnapshot) -> String {
    format!(
        "Rate limit: {} / {} ({}%)",
        group_thousands(snapshot.remaining),
        group_thousands(snapshot.limit),
        snapshot.percent()
    )
}

/// Render an integer with `,` between groups of three digits.
#[must_use]
pub fn group_thousands(value: impl Into<i128>) -> String {
    let value = value.into();
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::MenuTitles;
    use crate::test_mocks::{MockBulk, MockSingle};

    fn guard_with_menu() -> (RateLimitGuard, Arc<MenuTitles>) {
        let menu = Arc::new(MenuTitles::new());
        let guard = RateLimitGuard::new(DEFAULT_THRESHOLD, menu.clone());
        (guard, menu)
    }

    #[test]
    fn test_enforce_threshold_rejects_low_headroom() {
        let result = enforce_threshold(&RateLimitSnapshot::new(10, 100), DEFAULT_THRESHOLD);
        assert!(matches!(
            result,
            Err(Error::RateLimitExceeded {
                remaining: 10,
                limit: 100,
                ..
            })
        ));
    }

    #[test]
    fn test_enforce_threshold_accepts_enough_headroom() {
        assert!(enforce_threshold(&RateLimitSnapshot::new(60, 100), DEFAULT_THRESHOLD).is_ok());
    }

    #[test]
    fn test_enforce_threshold_boundary_is_exclusive() {
        assert!(enforce_threshold(&RateLimitSnapshot::new(50, 100), DEFAULT_THRESHOLD).is_err());
        assert!(enforce_threshold(&RateLimitSnapshot::new(51, 100), DEFAULT_THRESHOLD).is_ok());
    }

    #[test]
    fn test_enforce_threshold_rejects_unknown_quota() {
        for snapshot in [
            RateLimitSnapshot::new(-1, 5000),
            RateLimitSnapshot::new(100, 0),
            RateLimitSnapshot::new(100, -1),
        ] {
            assert!(enforce_threshold(&snapshot, DEFAULT_THRESHOLD).is_err());
        }
    }

    #[test]
    fn test_select_binding_prefers_lower_remaining() {
        let bulk = RateLimitSnapshot::new(40, 100);
        let single = RateLimitSnapshot::new(10, 100);
        assert_eq!(select_binding(bulk, single), single);
        assert_eq!(select_binding(single, bulk), single);
    }

    #[test]
    fn test_select_binding_tie_goes_to_bulk() {
        let bulk = RateLimitSnapshot::new(10, 5000);
        let single = RateLimitSnapshot::new(10, 60);
        assert_eq!(select_binding(bulk, single), bulk);
    }

    #[test]
    fn test_format_title() {
        assert_eq!(
            format_title(&RateLimitSnapshot::new(4321, 5000)),
            "Rate limit: 4,321 / 5,000 (86%)"
        );
        assert_eq!(
            format_title(&RateLimitSnapshot::new(60, 60)),
            "Rate limit: 60 / 60 (100%)"
        );
        assert_eq!(
            format_title(&RateLimitSnapshot::unknown()),
            "Rate limit: -1 / -1 (0%)"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-12_000), "-12,000");
        assert_eq!(group_thousands(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[tokio::test]
    async fn test_check_reduces_and_publishes() {
        let (guard, menu) = guard_with_menu();
        let bulk = MockBulk::new().with_rate_limit(RateLimitSnapshot::new(40, 100));
        let single = MockSingle::new().with_rate_limit(RateLimitSnapshot::new(10, 100));

        let snapshot = guard.check(&bulk, &single).await.unwrap();

        assert_eq!(snapshot, RateLimitSnapshot::new(10, 100));
        assert_eq!(guard.latest(), Some(snapshot));
        assert_eq!(
            menu.title(MENU_RATE_LIMIT).as_deref(),
            Some("Rate limit: 10 / 100 (10%)")
        );
        assert_eq!(bulk.rate_limit_calls(), 1);
        assert_eq!(single.rate_limit_calls(), 1);
    }

    #[tokio::test]
    async fn test_check_queries_both_protocols_concurrently() {
        let (guard, _menu) = guard_with_menu();
        // Each side waits for the other, so a sequential check never finishes.
        let barrier = Arc::new(tokio::sync::Barrier::new(2));
        let bulk = MockBulk::new()
            .with_rate_limit(RateLimitSnapshot::new(40, 100))
            .with_rate_limit_barrier(barrier.clone());
        let single = MockSingle::new()
            .with_rate_limit(RateLimitSnapshot::new(90, 100))
            .with_rate_limit_barrier(barrier);

        let snapshot = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            guard.check(&bulk, &single),
        )
        .await
        .expect("rate limits were not requested concurrently")
        .unwrap();

        assert_eq!(snapshot, RateLimitSnapshot::new(40, 100));
    }

    #[tokio::test]
    async fn test_check_fails_when_either_side_fails() {
        let (guard, menu) = guard_with_menu();
        let bulk = MockBulk::new().with_rate_limit(RateLimitSnapshot::new(40, 100));
        let single = MockSingle::new().with_failing_rate_limit();

        assert!(guard.check(&bulk, &single).await.is_err());
        assert!(guard.latest().is_none());
        assert!(menu.title(MENU_RATE_LIMIT).is_none());
    }
}
