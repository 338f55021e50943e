//! Test doubles for hosts and integration tests.
//!
//! Everything here is deterministic and in-memory:
//!
//! | Double | Stands in for |
//! |--------|---------------|
//! | [`ScriptedWallet`] | [`TransactionAdapter`] |
//! | [`MockTransport`] | [`ActionTransport`] |
//! | [`SharedSource`] | [`RegistrySource`] whose document can be swapped |
//! | [`RecordingCallbacks`] | [`ActionCallbacks`] |
//!
//! # Example
//!
//! ```
//! use actgate_runtime::testing::{MockTransport, ScriptedWallet};
//! use actgate_runtime::action::{ActionMetadata, ActionModel};
//! use std::sync::Arc;
//!
//! let url = "https://dial.to/api/donate";
//! let transport = MockTransport::new().with_action(url, ActionMetadata {
//!     title: "Donate".into(),
//!     label: "Donate".into(),
//!     ..ActionMetadata::default()
//! });
//! let meta = transport.metadata(url).unwrap();
//! let model = ActionModel::from_metadata(url, meta, Arc::new(transport), Arc::new(ScriptedWallet::new()))
//!     .unwrap();
//! assert_eq!(model.components().len(), 1);
//! ```

use crate::action::{
    ActionError, ActionMetadata, ActionModel, ActionTransport, ExecutionContext, PostResponse,
    ResolveError, SignOutcome, TransactionAdapter,
};
use crate::callbacks::ActionCallbacks;
use crate::controller::ActionView;
use crate::registry::{RegistryDocument, RegistryError, RegistrySource};
use actgate_types::TrustLevel;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Wallet with canned answers for each step.
///
/// Defaults: connects as `"test-account"`, signs with `"test-signature"`,
/// confirms successfully.
pub struct ScriptedWallet {
    connect: Mutex<Result<Option<String>, ActionError>>,
    sign: Mutex<Result<SignOutcome, ActionError>>,
    confirm: Mutex<Result<(), ActionError>>,
    calls: Mutex<Vec<&'static str>>,
    contexts: Mutex<Vec<ExecutionContext>>,
    sign_pause: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedWallet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connect: Mutex::new(Ok(Some("test-account".into()))),
            sign: Mutex::new(Ok(SignOutcome::signed("test-signature"))),
            confirm: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
            sign_pause: None,
        }
    }

    #[must_use]
    pub fn connect_with(self, result: Result<Option<String>, ActionError>) -> Self {
        *self.connect.lock() = result;
        self
    }

    #[must_use]
    pub fn sign_with(self, result: Result<SignOutcome, ActionError>) -> Self {
        *self.sign.lock() = result;
        self
    }

    #[must_use]
    pub fn confirm_with(self, result: Result<(), ActionError>) -> Self {
        *self.confirm.lock() = result;
        self
    }

    /// Makes `sign_transaction` notify `entered` and then wait on `resume`.
    #[must_use]
    pub fn pause_in_sign(mut self, entered: Arc<Notify>, resume: Arc<Notify>) -> Self {
        self.sign_pause = Some((entered, resume));
        self
    }

    /// Steps called so far, in order (`"connect"`, `"sign"`, `"confirm"`).
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// Contexts passed to each call.
    #[must_use]
    pub fn contexts(&self) -> Vec<ExecutionContext> {
        self.contexts.lock().clone()
    }

    fn record(&self, step: &'static str, context: &ExecutionContext) {
        self.calls.lock().push(step);
        self.contexts.lock().push(context.clone());
    }
}

impl Default for ScriptedWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionAdapter for ScriptedWallet {
    async fn connect(&self, context: &ExecutionContext) -> Result<Option<String>, ActionError> {
        self.record("connect", context);
        self.connect.lock().clone()
    }

    async fn sign_transaction(
        &self,
        _transaction: &str,
        context: &ExecutionContext,
    ) -> Result<SignOutcome, ActionError> {
        self.record("sign", context);
        if let Some((entered, resume)) = &self.sign_pause {
            entered.notify_one();
            resume.notified().await;
        }
        self.sign.lock().clone()
    }

    async fn confirm_transaction(
        &self,
        _signature: &str,
        context: &ExecutionContext,
    ) -> Result<(), ActionError> {
        self.record("confirm", context);
        self.confirm.lock().clone()
    }
}

/// Action endpoint double keyed by URL.
#[derive(Default)]
pub struct MockTransport {
    actions: Mutex<HashMap<String, ActionMetadata>>,
    post: Mutex<Option<Result<PostResponse, ActionError>>>,
    posted: Mutex<Vec<(String, String)>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_action(self, url: &str, metadata: ActionMetadata) -> Self {
        self.actions.lock().insert(url.to_string(), metadata);
        self
    }

    /// Answer for every `post`. Defaults to a transaction with no message.
    #[must_use]
    pub fn post_with(self, result: Result<PostResponse, ActionError>) -> Self {
        *self.post.lock() = Some(result);
        self
    }

    #[must_use]
    pub fn metadata(&self, url: &str) -> Option<ActionMetadata> {
        self.actions.lock().get(url).cloned()
    }

    /// `(href, account)` of every post so far.
    #[must_use]
    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().clone()
    }
}

#[async_trait]
impl ActionTransport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<ActionMetadata, ResolveError> {
        self.metadata(url)
            .ok_or_else(|| ResolveError::NotAnAction(url.to_string()))
    }

    async fn post(&self, href: &str, account: &str) -> Result<PostResponse, ActionError> {
        self.posted.lock().push((href.to_string(), account.to_string()));
        self.post
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(PostResponse::transaction("test-transaction")))
    }
}

/// Registry source whose document can be replaced between fetches.
///
/// Hand a clone of the `Arc` to [`TrustRegistry::new`](crate::registry::TrustRegistry::new)
/// and keep one to swap documents.
pub struct SharedSource {
    document: Mutex<Result<RegistryDocument, RegistryError>>,
    fetches: AtomicUsize,
}

impl SharedSource {
    #[must_use]
    pub fn new(document: RegistryDocument) -> Arc<Self> {
        Arc::new(Self {
            document: Mutex::new(Ok(document)),
            fetches: AtomicUsize::new(0),
        })
    }

    /// Document served by subsequent fetches.
    pub fn set(&self, document: RegistryDocument) {
        *self.document.lock() = Ok(document);
    }

    /// Makes subsequent fetches fail.
    pub fn fail(&self, error: RegistryError) {
        *self.document.lock() = Err(error);
    }

    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrySource for Arc<SharedSource> {
    async fn fetch(&self) -> Result<RegistryDocument, RegistryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.document.lock().clone()
    }
}

/// Callbacks that record what they saw.
#[derive(Default)]
pub struct RecordingCallbacks {
    mounts: Mutex<Vec<(String, String, TrustLevel)>>,
    renders: AtomicUsize,
}

impl RecordingCallbacks {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `(action title, original url, overall trust)` per mount.
    #[must_use]
    pub fn mounts(&self) -> Vec<(String, String, TrustLevel)> {
        self.mounts.lock().clone()
    }

    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl ActionCallbacks for RecordingCallbacks {
    fn on_mount(&self, model: &ActionModel, original_url: &str, overall: TrustLevel) {
        self.mounts
            .lock()
            .push((model.title().to_string(), original_url.to_string(), overall));
    }

    fn on_render(&self, _view: &ActionView) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }
}
