//! Optimize-then-accept workflow for a single prompt.
//!
//! `Idle → Optimizing → Ready → Accepting → Accepted`, with
//! `Optimizing → Idle` and `Accepting → Ready` on failure. Every new
//! optimize call starts from `Idle` and drops the previous result.
//!
//! [`Workflow`] holds the state and is updated synchronously. The async
//! drivers [`optimize`] and [`accept`] split each remote call into a begin
//! and a finish step so the state can live in a reactive signal.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::{AddSavedRequest, OptimizationResult, OptimizeRequest, SustainabilityApi, TokenBar};
use crate::error::{ApiError, WorkflowError};
use crate::session::User;

/// How long the "Copied!" acknowledgement stays visible.
pub const COPY_NOTICE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Optimizing,
    Ready,
    Accepting,
    Accepted,
}

/// A titled value shown on a metric card.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    phase: Phase,
    result: Option<OptimizationResult>,
    last_error: Option<WorkflowError>,
    copied: bool,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    pub fn is_optimizing(&self) -> bool {
        self.phase == Phase::Optimizing
    }

    pub fn is_saving(&self) -> bool {
        self.phase == Phase::Accepting
    }

    pub fn is_accepted(&self) -> bool {
        self.phase == Phase::Accepted
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Start an optimize call. Returns the request to send, or `None` when
    /// the prompt is blank or another call is in flight.
    pub fn begin_optimize(&mut self, prompt: &str) -> Option<OptimizeRequest> {
        if prompt.trim().is_empty() {
            debug!("Ignoring blank prompt");
            return None;
        }
        if matches!(self.phase, Phase::Optimizing | Phase::Accepting) {
            debug!("Ignoring optimize while {:?}", self.phase);
            return None;
        }

        self.phase = Phase::Optimizing;
        self.result = None;
        self.last_error = None;
        self.copied = false;
        Some(OptimizeRequest {
            prompt: prompt.to_string(),
        })
    }

    pub fn finish_optimize(
        &mut self,
        outcome: Result<OptimizationResult, ApiError>,
    ) -> Result<(), WorkflowError> {
        if self.phase != Phase::Optimizing {
            warn!("Dropping optimize response received while {:?}", self.phase);
            return Ok(());
        }

        match outcome {
            Ok(result) => {
                if !result.is_consistent() {
                    warn!(
                        "Backend reported {} tokens saved for {} -> {}",
                        result.tokens_saved,
                        result.original_estimated_tokens,
                        result.optimized_estimated_tokens
                    );
                }
                self.result = Some(result);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(e) => {
                let err = WorkflowError::OptimizeFailed(e);
                self.phase = Phase::Idle;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Start recording the impact of the current result for `user`.
    /// Returns `None` without a result, after acceptance, or while saving.
    pub fn begin_accept(&mut self, user: &User) -> Option<AddSavedRequest> {
        if self.phase != Phase::Ready {
            debug!("Ignoring accept while {:?}", self.phase);
            return None;
        }
        let result = self.result.as_ref()?;
        let request = AddSavedRequest {
            email: user.email.clone(),
            co2_saved: result.estimated_co2_saved_kg,
        };

        self.phase = Phase::Accepting;
        self.last_error = None;
        Some(request)
    }

    pub fn finish_accept(&mut self, outcome: Result<(), ApiError>) -> Result<(), WorkflowError> {
        if self.phase != Phase::Accepting {
            warn!("Dropping accept response received while {:?}", self.phase);
            return Ok(());
        }

        match outcome {
            Ok(()) => {
                self.phase = Phase::Accepted;
                Ok(())
            }
            Err(e) => {
                let err = WorkflowError::AcceptFailed(e);
                self.phase = Phase::Ready;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Text to put on the clipboard. Raises the "copied" flag.
    pub fn copy_result(&mut self) -> Option<String> {
        let text = self.result.as_ref()?.optimized_prompt.clone();
        self.copied = true;
        Some(text)
    }

    pub fn dismiss_copy_notice(&mut self) {
        self.copied = false;
    }

    /// Original vs optimized token counts; empty without a result.
    pub fn token_series(&self) -> Vec<TokenBar> {
        self.result
            .as_ref()
            .map(|r| r.token_series().to_vec())
            .unwrap_or_default()
    }

    pub fn metrics(&self) -> Vec<Metric> {
        let Some(r) = &self.result else {
            return Vec::new();
        };
        vec![
            Metric {
                title: "Token Reduction",
                value: r.tokens_saved.to_string(),
            },
            Metric {
                title: "Reduction %",
                value: format!("{}%", r.percentage_reduction),
            },
            Metric {
                title: "Energy Saved",
                value: r.estimated_energy_saved_kwh.to_string(),
            },
            Metric {
                title: "CO\u{2082} Saved (kg)",
                value: r.estimated_co2_saved_kg.to_string(),
            },
        ]
    }
}

/// Somewhere a [`Workflow`] lives. `apply` returns `None` once the owner is gone.
pub trait WorkflowHandle {
    fn apply<R>(&self, f: impl FnOnce(&mut Workflow) -> R) -> Option<R>;
}

impl WorkflowHandle for Rc<RefCell<Workflow>> {
    fn apply<R>(&self, f: impl FnOnce(&mut Workflow) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Submit `prompt` for optimization. Does nothing for blank input or while busy.
pub async fn optimize<A, H>(api: &A, handle: &H, prompt: &str) -> Result<(), WorkflowError>
where
    A: SustainabilityApi,
    H: WorkflowHandle,
{
    let Some(request) = handle.apply(|w| w.begin_optimize(prompt)).flatten() else {
        return Ok(());
    };

    info!("Optimizing prompt ({} chars)", request.prompt.len());
    let outcome = api.optimize_prompt(&request).await;
    if let Err(e) = &outcome {
        warn!("Prompt optimization failed: {}", e);
    }
    handle.apply(|w| w.finish_optimize(outcome)).unwrap_or(Ok(()))
}

/// Record the current result's CO2 savings against `user`. At most once per result.
pub async fn accept<A, H>(api: &A, handle: &H, user: &User) -> Result<(), WorkflowError>
where
    A: SustainabilityApi,
    H: WorkflowHandle,
{
    let Some(request) = handle.apply(|w| w.begin_accept(user)).flatten() else {
        return Ok(());
    };

    info!("Recording {} kg CO2 saved for {}", request.co2_saved, request.email);
    let outcome = api.add_saved(&request).await;
    if let Err(e) = &outcome {
        warn!("Recording savings failed: {}", e);
    }
    handle.apply(|w| w.finish_accept(outcome)).unwrap_or(Ok(()))
}

// -- Copy acknowledgement --

/// One-shot timer. The browser implementation wraps `setTimeout`.
pub trait Timer {
    type Handle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Handle;
    fn cancel(&self, handle: Self::Handle);
}

/// Owns the pending "hide copied notice" callback.
/// A new copy replaces the pending callback; dropping the notice cancels it.
pub struct CopyNotice<T: Timer> {
    timer: T,
    pending: RefCell<Option<T::Handle>>,
}

impl<T: Timer> CopyNotice<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            pending: RefCell::new(None),
        }
    }

    /// Copy the current result and schedule the acknowledgement to clear.
    /// Returns the text that should go on the clipboard.
    pub fn copy<H>(&self, handle: &H) -> Option<String>
    where
        H: WorkflowHandle + Clone + 'static,
    {
        let text = handle.apply(Workflow::copy_result).flatten()?;

        self.cancel();
        let expire = handle.clone();
        let scheduled = self.timer.schedule(
            COPY_NOTICE,
            Box::new(move || {
                expire.apply(Workflow::dismiss_copy_notice);
            }),
        );
        *self.pending.borrow_mut() = Some(scheduled);
        Some(text)
    }

    pub fn cancel(&self) {
        if let Some(pending) = self.pending.borrow_mut().take() {
            self.timer.cancel(pending);
        }
    }
}

impl<T: Timer> Drop for CopyNotice<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> OptimizationResult {
        OptimizationResult {
            original_prompt: "Please kindly provide me with a very detailed explanation of...".to_string(),
            optimized_prompt: "Explain...".to_string(),
            original_estimated_tokens: 50.0,
            optimized_estimated_tokens: 20.0,
            tokens_saved: 30.0,
            percentage_reduction: 60.0,
            estimated_energy_saved_kwh: 0.002,
            estimated_co2_saved_kg: 0.001,
        }
    }

    fn ready() -> Workflow {
        let mut w = Workflow::new();
        w.begin_optimize("Please kindly explain").unwrap();
        w.finish_optimize(Ok(sample_result())).unwrap();
        w
    }

    #[test]
    fn test_blank_prompt_is_ignored() {
        let mut w = Workflow::new();
        for prompt in ["", " ", "\n\t  "] {
            assert!(w.begin_optimize(prompt).is_none());
            assert_eq!(w, Workflow::new());
        }
    }

    #[test]
    fn test_prompt_sent_untrimmed() {
        let mut w = Workflow::new();
        let request = w.begin_optimize("  shorten me  ").unwrap();
        assert_eq!(request.prompt, "  shorten me  ");
        assert!(w.is_optimizing());
    }

    #[test]
    fn test_optimize_success_moves_to_ready() {
        let w = ready();
        assert_eq!(w.phase(), Phase::Ready);
        assert_eq!(w.result(), Some(&sample_result()));
        assert!(w.last_error().is_none());
    }

    #[test]
    fn test_optimize_failure_returns_to_idle() {
        let mut w = Workflow::new();
        w.begin_optimize("prompt").unwrap();
        let err = w
            .finish_optimize(Err(ApiError::Transport("offline".into())))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::OptimizeFailed(_)));
        assert_eq!(w.phase(), Phase::Idle);
        assert!(!w.is_optimizing());
        assert!(w.result().is_none());
        assert_eq!(w.last_error(), Some(&err));
    }

    #[test]
    fn test_new_optimize_clears_previous_result_and_acceptance() {
        let mut w = ready();
        let user = User::new("a@b.c");
        w.begin_accept(&user).unwrap();
        w.finish_accept(Ok(())).unwrap();
        w.copy_result().unwrap();
        assert!(w.is_accepted());

        w.begin_optimize("another prompt").unwrap();
        assert!(w.result().is_none());
        assert!(!w.is_accepted());
        assert!(!w.is_copied());
        assert!(w.token_series().is_empty());
    }

    #[test]
    fn test_optimize_rejected_while_busy() {
        let mut w = Workflow::new();
        w.begin_optimize("first").unwrap();
        assert!(w.begin_optimize("second").is_none());

        let mut w = ready();
        w.begin_accept(&User::new("a@b.c")).unwrap();
        assert!(w.begin_optimize("second").is_none());
        assert!(w.is_saving());
    }

    #[test]
    fn test_accept_requires_result() {
        let mut w = Workflow::new();
        assert!(w.begin_accept(&User::new("a@b.c")).is_none());
        assert_eq!(w.phase(), Phase::Idle);
    }

    #[test]
    fn test_accept_reports_co2_for_user() {
        let mut w = ready();
        let request = w.begin_accept(&User::new("a@b.c")).unwrap();
        assert_eq!(request.email, "a@b.c");
        assert_eq!(request.co2_saved, 0.001);
        assert!(w.is_saving());
    }

    #[test]
    fn test_accept_is_one_shot() {
        let mut w = ready();
        let user = User::new("a@b.c");
        w.begin_accept(&user).unwrap();
        assert!(w.begin_accept(&user).is_none());
        w.finish_accept(Ok(())).unwrap();
        assert!(w.begin_accept(&user).is_none());
        assert_eq!(w.phase(), Phase::Accepted);
    }

    #[test]
    fn test_accept_failure_keeps_result_for_retry() {
        let mut w = ready();
        let user = User::new("a@b.c");
        w.begin_accept(&user).unwrap();
        let err = w
            .finish_accept(Err(ApiError::Status {
                status: 500,
                body: String::new(),
            }))
            .unwrap_err();

        assert_eq!(err.user_message(), "Failed to apply sustainability impact");
        assert_eq!(w.phase(), Phase::Ready);
        assert!(!w.is_saving());
        assert!(!w.is_accepted());
        assert!(w.result().is_some());
        assert!(w.begin_accept(&user).is_some());
    }

    #[test]
    fn test_late_response_is_dropped() {
        let mut w = Workflow::new();
        assert!(w.finish_optimize(Ok(sample_result())).is_ok());
        assert!(w.result().is_none());
        assert!(w.finish_accept(Err(ApiError::Decode("x".into()))).is_ok());
        assert!(w.last_error().is_none());
    }

    #[test]
    fn test_copy_requires_result() {
        let mut w = Workflow::new();
        assert!(w.copy_result().is_none());
        assert!(!w.is_copied());

        let mut w = ready();
        assert_eq!(w.copy_result().as_deref(), Some("Explain..."));
        assert!(w.is_copied());
        w.dismiss_copy_notice();
        assert!(!w.is_copied());
    }

    #[test]
    fn test_metrics_formatting() {
        let metrics = ready().metrics();
        let values: Vec<(&str, &str)> = metrics.iter().map(|m| (m.title, m.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Token Reduction", "30"),
                ("Reduction %", "60%"),
                ("Energy Saved", "0.002"),
                ("CO\u{2082} Saved (kg)", "0.001"),
            ]
        );
        assert!(Workflow::new().metrics().is_empty());
    }
}
