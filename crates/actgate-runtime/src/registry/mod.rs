//! Trust registry.
//!
//! Answers "what is the current classification of this identifier in this
//! domain?" from an in-memory snapshot that is periodically replaced.
//!
//! # Snapshot Swapping
//!
//! ```text
//!  refresh()                         classify() (any number, any task)
//!     │                                   │
//!     ├─ source.fetch().await             │
//!     ├─ build RegistrySnapshot           │
//!     └─ write lock: swap Arc ──────►  read lock: clone Arc, look up
//! ```
//!
//! The snapshot itself is immutable. The lock only guards the pointer, so a
//! reader either sees the old snapshot or the new one, never a mix.
//!
//! # Failure Policy
//!
//! Nothing here surfaces an error to callers. Before the first successful
//! refresh every lookup answers `unknown`; after a failed refresh the
//! previous snapshot stays authoritative until the next success.

mod error;
mod snapshot;
mod source;

pub use error::RegistryError;
pub use snapshot::{canonical_identifier, RegistryDocument, RegistryEntry, RegistrySnapshot};
pub use source::{
    HttpRegistrySource, RegistrySource, StaticSource, DEFAULT_FETCH_TIMEOUT, DEFAULT_REGISTRY_URL,
};

use actgate_types::{TrustDomain, TrustLevel};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default interval between scheduled refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Synchronous classification source.
///
/// Implemented by [`TrustRegistry`] (current snapshot) and by
/// [`RegistrySnapshot`] (a fixed view, handy in tests).
pub trait TrustLookup: Send + Sync {
    /// Classifies `identifier` in `domain`; unrecognized identifiers are `unknown`.
    fn classify(&self, domain: TrustDomain, identifier: &str) -> TrustLevel;
}

impl TrustLookup for RegistrySnapshot {
    fn classify(&self, domain: TrustDomain, identifier: &str) -> TrustLevel {
        RegistrySnapshot::classify(self, domain, identifier)
    }
}

/// Periodically refreshed trust registry.
///
/// # Example
///
/// ```
/// use actgate_runtime::registry::{RegistryDocument, StaticSource, TrustRegistry};
/// use actgate_types::{TrustDomain, TrustLevel};
///
/// # tokio_test_block_on(async {
/// let doc = RegistryDocument::default()
///     .with(TrustDomain::Actions, "dial.to", TrustLevel::Trusted);
/// let registry = TrustRegistry::new(StaticSource::new(doc));
///
/// // Before init nothing is known.
/// assert_eq!(registry.action_state("https://dial.to/api"), TrustLevel::Unknown);
///
/// registry.init().await;
/// assert_eq!(registry.action_state("https://dial.to/api"), TrustLevel::Trusted);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
pub struct TrustRegistry {
    source: Box<dyn RegistrySource>,
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    initialized: OnceCell<()>,
}

impl TrustRegistry {
    /// Creates a registry with an empty snapshot.
    #[must_use]
    pub fn new(source: impl RegistrySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            snapshot: RwLock::new(Arc::new(RegistrySnapshot::empty())),
            initialized: OnceCell::new(),
        }
    }

    /// Returns the process-wide registry, creating it on first use.
    ///
    /// The shared instance fetches from [`DEFAULT_REGISTRY_URL`]. Callers
    /// still need to [`init`](Self::init) it and usually
    /// [`start`](Self::start) the refresh loop once.
    pub fn global() -> &'static Arc<TrustRegistry> {
        static GLOBAL: OnceLock<Arc<TrustRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TrustRegistry::new(HttpRegistrySource::default())))
    }

    /// Performs the first refresh. Idempotent: concurrent and repeated
    /// calls share a single attempt.
    ///
    /// A failed first attempt is not an error; the registry simply keeps
    /// answering `unknown` until a scheduled refresh succeeds.
    pub async fn init(&self) {
        self.initialized
            .get_or_init(|| async {
                if !self.refresh().await {
                    debug!("registry init: no data yet, lookups answer unknown");
                }
            })
            .await;
    }

    /// Fetches a new document and swaps it in.
    ///
    /// Returns `true` when a new snapshot was installed. Failures are
    /// logged and leave the current snapshot in place.
    pub async fn refresh(&self) -> bool {
        match self.source.fetch().await {
            Ok(document) => {
                let next = Arc::new(RegistrySnapshot::from_document(&document));
                let entries = next.len();
                *self.snapshot.write() = next;
                info!(entries, "registry snapshot refreshed");
                true
            }
            Err(e) => {
                warn!(error = %e, "registry refresh failed, keeping previous snapshot");
                false
            }
        }
    }

    /// Spawns the refresh loop on the current tokio runtime.
    ///
    /// The loop first performs [`init`](Self::init), which is a no-op when
    /// the registry was already initialized, then refreshes every
    /// `interval`. It lives until the returned handle is stopped or the
    /// runtime shuts down.
    pub fn start(self: &Arc<Self>, interval: Duration) -> RefreshHandle {
        let registry = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            registry.init().await;
            loop {
                ticker.tick().await;
                registry.refresh().await;
            }
        });
        debug!(interval_secs = interval.as_secs(), "registry refresh loop started");
        RefreshHandle { task }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Classifies `identifier` in `domain` against the current snapshot.
    #[must_use]
    pub fn classify(&self, domain: TrustDomain, identifier: &str) -> TrustLevel {
        self.snapshot().classify(domain, identifier)
    }

    #[must_use]
    pub fn action_state(&self, url: &str) -> TrustLevel {
        self.classify(TrustDomain::Actions, url)
    }

    #[must_use]
    pub fn website_state(&self, url: &str) -> TrustLevel {
        self.classify(TrustDomain::Websites, url)
    }

    #[must_use]
    pub fn interstitial_state(&self, url: &str) -> TrustLevel {
        self.classify(TrustDomain::Interstitials, url)
    }

    /// Number of classified hosts in the current snapshot.
    #[must_use]
    pub fn snapshot_len(&self) -> usize {
        self.snapshot().len()
    }
}

impl TrustLookup for TrustRegistry {
    fn classify(&self, domain: TrustDomain, identifier: &str) -> TrustLevel {
        TrustRegistry::classify(self, domain, identifier)
    }
}

impl std::fmt::Debug for TrustRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustRegistry")
            .field("entries", &self.snapshot_len())
            .field("initialized", &self.initialized.initialized())
            .finish_non_exhaustive()
    }
}

/// Handle to a running refresh loop.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stops the loop. An in-flight fetch is dropped.
    pub fn stop(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns queued results in order, then repeats the last one.
    struct ScriptedSource {
        script: Mutex<Vec<Result<RegistryDocument, RegistryError>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<RegistryDocument, RegistryError>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    script: Mutex::new(script),
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl RegistrySource for ScriptedSource {
        async fn fetch(&self) -> Result<RegistryDocument, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock();
            if script.len() > 1 {
                script.remove(0)
            } else {
                script
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Err(RegistryError::Fetch("script exhausted".into())))
            }
        }
    }

    fn trusted_doc() -> RegistryDocument {
        RegistryDocument::default().with(TrustDomain::Actions, "dial.to", TrustLevel::Trusted)
    }

    fn malicious_doc() -> RegistryDocument {
        RegistryDocument::default().with(TrustDomain::Actions, "dial.to", TrustLevel::Malicious)
    }

    #[tokio::test]
    async fn lookups_are_unknown_before_init() {
        let registry = TrustRegistry::new(StaticSource::new(trusted_doc()));
        assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Unknown);
        assert_eq!(registry.snapshot_len(), 0);
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let (source, calls) = ScriptedSource::new(vec![Ok(trusted_doc())]);
        let registry = TrustRegistry::new(source);

        registry.init().await;
        registry.init().await;
        tokio::join!(registry.init(), registry.init());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Trusted);
    }

    #[tokio::test]
    async fn failed_init_leaves_unknown() {
        let (source, _) = ScriptedSource::new(vec![Err(RegistryError::Fetch("offline".into()))]);
        let registry = TrustRegistry::new(source);
        registry.init().await;
        assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Unknown);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let (source, _) = ScriptedSource::new(vec![
            Ok(trusted_doc()),
            Err(RegistryError::Status { status: 503 }),
        ]);
        let registry = TrustRegistry::new(source);

        assert!(registry.refresh().await);
        assert!(!registry.refresh().await);
        assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Trusted);
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot_wholesale() {
        let (source, _) = ScriptedSource::new(vec![Ok(trusted_doc()), Ok(malicious_doc())]);
        let registry = TrustRegistry::new(source);

        registry.refresh().await;
        let before = registry.snapshot();
        registry.refresh().await;

        // The old snapshot is untouched; only the pointer moved.
        assert_eq!(before.classify(TrustDomain::Actions, "dial.to"), TrustLevel::Trusted);
        assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Malicious);
    }

    #[tokio::test(start_paused = true)]
    async fn start_refreshes_on_interval() {
        let (source, calls) = ScriptedSource::new(vec![Ok(trusted_doc())]);
        let registry = Arc::new(TrustRegistry::new(source));

        let handle = registry.start(Duration::from_secs(600));
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(601)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        assert!(handle.is_running());
        handle.stop();
    }

    #[test]
    fn global_is_a_single_instance() {
        let a = TrustRegistry::global();
        let b = TrustRegistry::global();
        assert!(Arc::ptr_eq(a, b));
    }
}
