//! Gated execution of one rendered action.
//!
//! An [`ExecutionController`] owns one [`ActionModel`] and drives its
//! components through the wallet protocol:
//!
//! ```text
//! execute(id)
//!   ├─ re-assess trust (fresh registry lookup)
//!   │    └─ classification changed and no longer admitted → Blocked
//!   ├─ Init(id) → Executing
//!   ├─ adapter.connect      ── None ─────────────► Idle (silent)
//!   ├─ component.post       ── no transaction ──► Idle ("Transaction data missing")
//!   ├─ adapter.sign         ── declined ────────► Idle (silent)
//!   ├─ adapter.confirm
//!   └─ Finish(post message) → Success
//!
//!   any step fails ──────────────────────────────► Error (step message)
//! ```
//!
//! Trust is only re-checked before a run starts. A registry refresh that
//! lands while the protocol is awaiting a step does not interrupt it.
//!
//! At most one run is in flight per controller. [`reset`] returns to
//! `idle` at once, but the abandoned run keeps its wallet call until the
//! adapter answers; until then `execute` is refused with
//! [`ExecuteError::InFlight`], and the abandoned outcome is discarded.
//!
//! [`reset`]: ExecutionController::reset
//!
//! State changes are published on a [`tokio::sync::watch`] channel; see
//! [`ExecutionController::subscribe`].

mod error;
mod state;
mod view;

pub use error::ExecuteError;
pub use state::{apply, ExecutionEvent, ExecutionState, ExecutionStatus};
pub use view::{ActionView, ButtonVariant, ButtonView, Disclaimer, InputView};

use crate::action::{ActionComponent, ActionError, ActionModel, ExecutionContext, TransactionAdapter};
use crate::callbacks::{ActionCallbacks, NoopCallbacks};
use crate::config::Limits;
use crate::link::DiscoveredLink;
use crate::registry::TrustLookup;
use actgate_security::{Evaluation, NormalizedPolicy, TrustAssessment};
use actgate_types::{ComponentId, ErrorCode};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Note recorded when the endpoint answered without a transaction.
pub const MISSING_TRANSACTION_MESSAGE: &str = "Transaction data missing";

/// Classification the current state was entered with.
#[derive(Debug, Clone, Copy)]
struct TrustRecord {
    assessment: TrustAssessment,
    evaluation: Evaluation,
}

/// How a protocol run ended without raising.
enum RunOutcome {
    Declined(&'static str),
    MissingTransaction,
    Confirmed(Option<String>),
}

/// Holds the in-flight flag for one run; released on drop, including when
/// the `execute` future is cancelled.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// State machine for one rendered action.
///
/// All methods take `&self`; the controller can be shared behind an
/// [`Arc`] between the rendering layer and whatever triggers execution.
/// At most one component executes at a time: a second
/// [`execute`](Self::execute) while busy is rejected with
/// [`ExecuteError::NotIdle`], or [`ExecuteError::InFlight`] while a reset
/// run is still waiting on the wallet.
pub struct ExecutionController {
    model: Mutex<ActionModel>,
    link: DiscoveredLink,
    lookup: Arc<dyn TrustLookup>,
    policy: NormalizedPolicy,
    limits: Limits,
    callbacks: Arc<dyn ActionCallbacks>,
    trust: Mutex<TrustRecord>,
    state: watch::Sender<ExecutionState>,
    /// Bumped on every `Init` and `Reset`, under the state lock. A run
    /// settles only if the generation is still the one it started with.
    generation: AtomicU64,
    in_flight: AtomicBool,
}

impl ExecutionController {
    /// Assesses `link` against `lookup` and starts in `blocked` or `idle`.
    pub fn new(
        model: ActionModel,
        link: DiscoveredLink,
        lookup: Arc<dyn TrustLookup>,
        policy: NormalizedPolicy,
    ) -> Self {
        let assessment = link.assess(lookup.as_ref());
        let evaluation = assessment.evaluate(&policy);
        let initial = if evaluation.starts_blocked() {
            ExecutionState::blocked()
        } else {
            ExecutionState::idle()
        };
        debug!(
            action = %link.action_url,
            overall = %evaluation.overall,
            admitted = evaluation.admitted,
            status = %initial.status,
            "controller created"
        );

        let (state, _) = watch::channel(initial);
        Self {
            model: Mutex::new(model),
            link,
            lookup,
            policy,
            limits: Limits::default(),
            callbacks: Arc::new(NoopCallbacks),
            trust: Mutex::new(TrustRecord {
                assessment,
                evaluation,
            }),
            state,
            generation: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: Arc<dyn ActionCallbacks>) -> Self {
        self.callbacks = callbacks;
        self
    }

    #[must_use]
    pub fn state(&self) -> ExecutionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> ExecutionStatus {
        self.state.borrow().status
    }

    /// Receiver that observes every state change from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ExecutionState> {
        self.state.subscribe()
    }

    /// Classification the current state was entered with.
    #[must_use]
    pub fn assessment(&self) -> TrustAssessment {
        self.trust.lock().assessment
    }

    #[must_use]
    pub fn evaluation(&self) -> Evaluation {
        self.trust.lock().evaluation
    }

    #[must_use]
    pub fn link(&self) -> &DiscoveredLink {
        &self.link
    }

    #[must_use]
    pub fn policy(&self) -> NormalizedPolicy {
        self.policy
    }

    /// Runs `f` against the action model.
    pub fn with_model<R>(&self, f: impl FnOnce(&ActionModel) -> R) -> R {
        f(&self.model.lock())
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.model.lock().set_disabled(disabled);
    }

    /// Sets a component's parameter value. Returns `false` for unknown ids.
    pub fn set_value(&self, id: ComponentId, value: impl Into<String>) -> bool {
        self.model.lock().set_value(id, value)
    }

    /// Derives the current view and reports it to the render callback.
    #[must_use]
    pub fn view(&self) -> ActionView {
        let state = self.state();
        let evaluation = self.evaluation();
        let view = view::derive(&self.model.lock(), &state, evaluation, self.limits);
        self.callbacks.on_render(&view);
        view
    }

    /// Clears executing, error and success fields and returns to `idle`.
    ///
    /// A run still awaiting the wallet is abandoned: its outcome is
    /// discarded when it arrives.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.replace(state, ExecutionEvent::Reset)
        });
    }

    /// Lets the user dismiss a block.
    ///
    /// Re-assesses trust first. Succeeds only when the policy check
    /// passes on the fresh data; returns whether the block was lifted.
    pub fn override_block(&self) -> bool {
        if self.status() != ExecutionStatus::Blocked {
            return false;
        }
        let record = self.reassess();
        if !record.evaluation.override_permitted() {
            debug!(action = %self.link.action_url, "override refused by policy");
            return false;
        }
        info!(
            action = %self.link.action_url,
            overall = %record.evaluation.overall,
            "block overridden by user"
        );
        self.transition_if(|s| s.status == ExecutionStatus::Blocked, ExecutionEvent::Unblock)
    }

    /// Executes component `id`, optionally setting its parameter first.
    ///
    /// Returns the status the run ended in. Protocol failures are not
    /// errors here: they end in [`ExecutionStatus::Error`] with the message
    /// in [`ExecutionState::error_message`].
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::UnknownComponent`] if `id` is not part of this action
    /// - [`ExecuteError::NotOffered`] if `id` is beyond the configured limits
    /// - [`ExecuteError::Disabled`] if the action is disabled
    /// - [`ExecuteError::NotIdle`] if the controller is not `idle`
    /// - [`ExecuteError::InFlight`] if a reset run has not returned yet
    pub async fn execute(
        &self,
        id: ComponentId,
        value: Option<String>,
    ) -> Result<ExecutionStatus, ExecuteError> {
        let (component, adapter, title) = {
            let mut model = self.model.lock();
            if model.component(id).is_none() {
                return Err(ExecuteError::UnknownComponent(id));
            }
            if !view::is_offered(&model, id, self.limits) {
                return Err(ExecuteError::NotOffered(id));
            }
            if model.is_disabled() {
                return Err(ExecuteError::Disabled);
            }
            let status = self.status();
            if !status.is_ready() {
                return Err(ExecuteError::NotIdle(status));
            }
            if let Some(value) = value {
                model.set_value(id, value);
            }
            let Some(component) = model.component(id).cloned() else {
                return Err(ExecuteError::UnknownComponent(id));
            };
            (component, Arc::clone(model.adapter()), model.title().to_string())
        };

        let Some(_flight) = FlightGuard::acquire(&self.in_flight) else {
            debug!(component = %id, "previous run still in flight");
            return Err(ExecuteError::InFlight);
        };

        let previous = self.assessment();
        let record = self.reassess();
        if record.assessment != previous && !record.evaluation.admitted {
            warn!(
                action = %self.link.action_url,
                from = ?previous,
                to = ?record.assessment,
                "trust changed before execution, blocking"
            );
            self.transition_if(|s| s.status.is_ready(), ExecutionEvent::Block);
            return Ok(self.status());
        }

        let mut started = None;
        self.state.send_if_modified(|state| {
            if !state.status.is_ready() {
                return false;
            }
            started = Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            self.replace(state, ExecutionEvent::Init(id))
        });
        let Some(generation) = started else {
            return Err(ExecuteError::NotIdle(self.status()));
        };

        let context = ExecutionContext {
            original_url: self.link.original_url().to_string(),
            action_url: self.link.action_url.clone(),
            title,
            trust: record.assessment.action,
            component: id,
        };

        let event = match run_protocol(&component, adapter.as_ref(), &context).await {
            Ok(RunOutcome::Confirmed(message)) => {
                info!(component = %id, "action executed");
                ExecutionEvent::Finish(message)
            }
            Ok(RunOutcome::Declined(step)) => {
                debug!(component = %id, step, "execution declined");
                ExecutionEvent::SoftReset(None)
            }
            Ok(RunOutcome::MissingTransaction) => {
                warn!(component = %id, "endpoint returned no transaction");
                ExecutionEvent::SoftReset(Some(MISSING_TRANSACTION_MESSAGE.to_string()))
            }
            Err(err) => {
                warn!(component = %id, code = err.code(), error = %err, "execution failed");
                ExecutionEvent::Fail(err.user_message())
            }
        };

        // A reset while the protocol was in flight wins; the outcome is dropped.
        let settled = self.transition_if(
            |s| {
                s.status == ExecutionStatus::Executing
                    && s.is_executing(id)
                    && self.generation.load(Ordering::SeqCst) == generation
            },
            event,
        );
        if !settled {
            debug!(component = %id, "run abandoned, outcome discarded");
        }
        Ok(self.status())
    }

    fn reassess(&self) -> TrustRecord {
        let assessment = self.link.assess(self.lookup.as_ref());
        let record = TrustRecord {
            assessment,
            evaluation: assessment.evaluate(&self.policy),
        };
        *self.trust.lock() = record;
        record
    }

    /// Applies `event` if `guard` holds; returns whether the state changed.
    fn transition_if(
        &self,
        guard: impl FnOnce(&ExecutionState) -> bool,
        event: ExecutionEvent,
    ) -> bool {
        self.state.send_if_modified(|state| guard(state) && self.replace(state, event))
    }

    /// Applies `event` in place; returns whether anything changed.
    fn replace(&self, state: &mut ExecutionState, event: ExecutionEvent) -> bool {
        let next = apply(state.clone(), event);
        if next == *state {
            return false;
        }
        debug!(
            action = %self.link.action_url,
            from = %state.status,
            to = %next.status,
            "execution transition"
        );
        *state = next;
        true
    }
}

async fn run_protocol(
    component: &ActionComponent,
    adapter: &dyn TransactionAdapter,
    context: &ExecutionContext,
) -> Result<RunOutcome, ActionError> {
    let Some(account) = adapter.connect(context).await? else {
        return Ok(RunOutcome::Declined("connect"));
    };

    let response = component.post(&account).await?;
    let Some(transaction) = response.transaction.filter(|t| !t.is_empty()) else {
        return Ok(RunOutcome::MissingTransaction);
    };

    let signed = adapter.sign_transaction(&transaction, context).await?;
    let Some(signature) = signed.signature() else {
        return Ok(RunOutcome::Declined("sign"));
    };

    adapter.confirm_transaction(signature, context).await?;
    Ok(RunOutcome::Confirmed(response.message))
}

impl fmt::Debug for ExecutionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionController")
            .field("link", &self.link)
            .field("policy", &self.policy)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
