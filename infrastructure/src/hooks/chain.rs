//! Hook chain — the concrete implementation of [`HookDispatchPort`].
//!
//! Maintains the registered tool hooks in dispatch order and runs them
//! around invocations, plus the unordered session listener list.
//!
//! # Ordering
//!
//! Within a phase, hooks run by descending priority; equal priorities keep
//! registration order. The list is re-sorted on registration with a stable
//! sort, so dispatch is a plain filtered iteration.
//!
//! # Snapshotting
//!
//! Hooks are user code and must not run under the chain's lock: dispatch
//! clones an `Arc` of the current list and iterates that snapshot, so a
//! hook registering another hook cannot deadlock. A registration concurrent
//! with a running invocation applies from the next invocation on.

use std::sync::{Arc, PoisonError, RwLock};
use toolgate_application::ports::hook_dispatch::{HookDispatchPort, PreHookOutcome};
use toolgate_domain::core::error::{PipelineError, RegistrationError};
use toolgate_domain::hook::entities::{
    FailurePolicy, HookPhase, HookRegistration, SessionRegistration, TrustScope,
};
use toolgate_domain::hook::traits::{HookDecision, HookError};
use toolgate_domain::session::events::SessionEvent;
use toolgate_domain::tool::value_objects::{ArgumentMap, InvocationOutcome};
use tracing::{debug, info, warn};

/// Priority-ordered hook chain with trust-gated registration.
pub struct HookChain {
    trusted: TrustScope,
    policy: FailurePolicy,
    hooks: RwLock<Arc<Vec<HookRegistration>>>,
    session_hooks: RwLock<Arc<Vec<SessionRegistration>>>,
}

impl HookChain {
    pub fn new(trusted: TrustScope, policy: FailurePolicy) -> Self {
        Self {
            trusted,
            policy,
            hooks: RwLock::new(Arc::new(Vec::new())),
            session_hooks: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn trusted(&self) -> &TrustScope {
        &self.trusted
    }

    /// Register a tool hook.
    ///
    /// The registration's scope must be the trusted scope or a descendant
    /// of it; anything else is rejected without being added.
    pub fn register(&self, registration: HookRegistration) -> Result<(), RegistrationError> {
        if !self.trusted.permits(registration.scope()) {
            return Err(RegistrationError::UntrustedScope {
                hook: registration.name().to_string(),
                scope: registration.scope().to_string(),
                trusted: self.trusted.to_string(),
            });
        }

        debug!(
            "Registered {} hook '{}' (priority {}, pattern '{}')",
            registration.phase().as_str(),
            registration.name(),
            registration.priority(),
            registration.pattern()
        );

        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        let mut next: Vec<HookRegistration> = hooks.as_ref().clone();
        next.push(registration);
        // Stable sort: equal priorities keep registration order.
        next.sort_by(|a, b| b.priority().cmp(&a.priority()));
        *hooks = Arc::new(next);
        Ok(())
    }

    /// Register a session listener, gated by the same trust scope.
    pub fn register_session(
        &self,
        registration: SessionRegistration,
    ) -> Result<(), RegistrationError> {
        if !self.trusted.permits(registration.scope()) {
            return Err(RegistrationError::UntrustedScope {
                hook: registration.name().to_string(),
                scope: registration.scope().to_string(),
                trusted: self.trusted.to_string(),
            });
        }

        debug!("Registered session hook '{}'", registration.name());
        let mut hooks = self
            .session_hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next: Vec<SessionRegistration> = hooks.as_ref().clone();
        next.push(registration);
        *hooks = Arc::new(next);
        Ok(())
    }

    pub fn hook_count(&self) -> usize {
        self.snapshot().len()
    }

    pub fn session_hook_count(&self) -> usize {
        self.session_snapshot().len()
    }

    fn snapshot(&self) -> Arc<Vec<HookRegistration>> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn session_snapshot(&self) -> Arc<Vec<SessionRegistration>> {
        self.session_hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply_policy(&self, hook: &str, tool: &str, error: &HookError) -> Result<(), PipelineError> {
        match self.policy {
            FailurePolicy::Strict => Err(PipelineError::HookFailed {
                tool: tool.to_string(),
                message: format!("{hook}: {error}"),
            }),
            FailurePolicy::Warn => {
                warn!("Hook '{}' failed during invocation of '{}': {}", hook, tool, error);
                Ok(())
            }
            FailurePolicy::Silent => Ok(()),
        }
    }
}

impl Default for HookChain {
    fn default() -> Self {
        Self::new(TrustScope::default(), FailurePolicy::default())
    }
}

impl HookDispatchPort for HookChain {
    fn run_pre(
        &self,
        tool: &str,
        arguments: ArgumentMap,
    ) -> Result<PreHookOutcome, PipelineError> {
        let hooks = self.snapshot();
        let mut arguments = arguments;
        let mut modified = false;

        for registration in hooks
            .iter()
            .filter(|r| r.phase() == HookPhase::Pre && r.applies_to(tool))
        {
            match registration.hook().before_invoke(tool, &arguments) {
                Ok(HookDecision::Allow) => {}
                Ok(HookDecision::Deny { message }) => {
                    info!(
                        "Hook '{}' denied invocation of '{}': {}",
                        registration.name(),
                        tool,
                        message
                    );
                    return Err(PipelineError::HookDenied {
                        tool: tool.to_string(),
                        message,
                    });
                }
                Ok(HookDecision::ModifyArguments(next)) => {
                    debug!("Hook '{}' modified arguments for '{}'", registration.name(), tool);
                    arguments = next;
                    modified = true;
                }
                Ok(HookDecision::ModifyResult(_)) => {
                    debug!(
                        "Hook '{}' returned a result modification in the PRE phase; ignored",
                        registration.name()
                    );
                }
                Err(error) => self.apply_policy(registration.name(), tool, &error)?,
            }
        }

        Ok(if modified {
            PreHookOutcome::modified(arguments)
        } else {
            PreHookOutcome::unchanged(arguments)
        })
    }

    fn run_post(
        &self,
        tool: &str,
        arguments: &ArgumentMap,
        outcome: InvocationOutcome,
    ) -> InvocationOutcome {
        let hooks = self.snapshot();
        let mut outcome = outcome;

        for registration in hooks
            .iter()
            .filter(|r| r.phase() == HookPhase::Post && r.applies_to(tool))
        {
            match registration.hook().after_invoke(tool, arguments, &outcome) {
                Ok(HookDecision::Allow) => {}
                Ok(HookDecision::ModifyResult(value)) => {
                    if outcome.is_success() {
                        debug!("Hook '{}' replaced the result of '{}'", registration.name(), tool);
                        outcome = InvocationOutcome::Success(value);
                    } else {
                        // A failed invocation stays failed.
                        debug!(
                            "Hook '{}' tried to replace a failed outcome of '{}'; ignored",
                            registration.name(),
                            tool
                        );
                    }
                }
                Ok(HookDecision::Deny { .. } | HookDecision::ModifyArguments(_)) => {
                    debug!(
                        "Hook '{}' returned a PRE-phase decision in the POST phase; ignored",
                        registration.name()
                    );
                }
                Err(error) => {
                    if let Err(failure) = self.apply_policy(registration.name(), tool, &error) {
                        outcome = InvocationOutcome::Failure(failure);
                        break;
                    }
                }
            }
        }

        outcome
    }

    fn notify_session(&self, event: &SessionEvent) {
        let hooks = self.session_snapshot();
        for registration in hooks.iter() {
            if let Err(error) = registration.hook().on_session_event(event) {
                // Session listeners are observers; their failures never
                // reach the pipeline.
                warn!(
                    "Session hook '{}' failed on {} event: {}",
                    registration.name(),
                    event.kind(),
                    error
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use toolgate_domain::hook::traits::{SessionHook, ToolHook};
    use toolgate_domain::session::events::ExpiryReason;

    enum PreAction {
        Allow,
        Deny(&'static str),
        Modify(ArgumentMap),
        Fail(&'static str),
    }

    struct ScriptedPre {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        action: PreAction,
    }

    impl ToolHook for ScriptedPre {
        fn before_invoke(
            &self,
            _tool: &str,
            _arguments: &ArgumentMap,
        ) -> Result<HookDecision, HookError> {
            self.log.lock().unwrap().push(self.label);
            match &self.action {
                PreAction::Allow => Ok(HookDecision::Allow),
                PreAction::Deny(message) => Ok(HookDecision::deny(*message)),
                PreAction::Modify(map) => Ok(HookDecision::ModifyArguments(map.clone())),
                PreAction::Fail(message) => Err(HookError::new(*message)),
            }
        }
    }

    fn pre_registration(
        label: &'static str,
        priority: i32,
        action: PreAction,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> HookRegistration {
        HookRegistration::new(
            label,
            HookPhase::Pre,
            Arc::new(ScriptedPre {
                label,
                log: Arc::clone(log),
                action,
            }),
        )
        .with_priority(priority)
    }

    fn args_with(name: &str, value: Value) -> ArgumentMap {
        let mut map = ArgumentMap::new();
        map.insert(name.to_string(), value);
        map
    }

    #[test]
    fn test_priority_order_with_stable_ties() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::default();
        chain
            .register(pre_registration("first_five", 5, PreAction::Allow, &log))
            .unwrap();
        chain
            .register(pre_registration("ten", 10, PreAction::Allow, &log))
            .unwrap();
        chain
            .register(pre_registration("second_five", 5, PreAction::Allow, &log))
            .unwrap();

        chain.run_pre("any", ArgumentMap::new()).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["ten", "first_five", "second_five"]
        );
    }

    #[test]
    fn test_denial_suppresses_later_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::default();
        chain
            .register(pre_registration("gate", 10, PreAction::Deny("no"), &log))
            .unwrap();
        chain
            .register(pre_registration("after", 5, PreAction::Allow, &log))
            .unwrap();

        let error = chain.run_pre("launch", ArgumentMap::new()).unwrap_err();
        assert!(matches!(
            error,
            PipelineError::HookDenied { tool, message } if tool == "launch" && message == "no"
        ));
        assert_eq!(*log.lock().unwrap(), vec!["gate"]);
    }

    #[test]
    fn test_modification_flows_to_later_hooks() {
        struct Observing {
            seen: Arc<Mutex<Option<Value>>>,
        }

        impl ToolHook for Observing {
            fn before_invoke(
                &self,
                _tool: &str,
                arguments: &ArgumentMap,
            ) -> Result<HookDecision, HookError> {
                *self.seen.lock().unwrap() = arguments.get("a").cloned();
                Ok(HookDecision::Allow)
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(None));
        let chain = HookChain::default();
        chain
            .register(pre_registration(
                "rewriter",
                10,
                PreAction::Modify(args_with("a", json!("b"))),
                &log,
            ))
            .unwrap();
        chain
            .register(
                HookRegistration::new(
                    "observer",
                    HookPhase::Pre,
                    Arc::new(Observing {
                        seen: Arc::clone(&seen),
                    }),
                )
                .with_priority(5),
            )
            .unwrap();

        let outcome = chain.run_pre("any", args_with("a", json!("a"))).unwrap();
        assert!(outcome.modified);
        assert_eq!(outcome.arguments.get("a"), Some(&json!("b")));
        assert_eq!(*seen.lock().unwrap(), Some(json!("b")));
    }

    #[test]
    fn test_pattern_scopes_hooks_to_one_tool() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::default();
        chain
            .register(pre_registration("add_only", 0, PreAction::Deny("no"), &log).for_tool("add"))
            .unwrap();

        assert!(chain.run_pre("subtract", ArgumentMap::new()).is_ok());
        assert!(chain.run_pre("add", ArgumentMap::new()).is_err());
        assert_eq!(*log.lock().unwrap(), vec!["add_only"]);
    }

    #[test]
    fn test_untrusted_scope_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::new(TrustScope::new("app"), FailurePolicy::Warn);

        let error = chain
            .register(pre_registration("outsider", 0, PreAction::Allow, &log).with_scope("vendor"))
            .unwrap_err();
        assert!(matches!(
            error,
            RegistrationError::UntrustedScope { scope, trusted, .. }
                if scope == "vendor" && trusted == "app"
        ));
        assert_eq!(chain.hook_count(), 0);

        chain
            .register(
                pre_registration("insider", 0, PreAction::Allow, &log).with_scope("app.audit"),
            )
            .unwrap();
        assert_eq!(chain.hook_count(), 1);
    }

    #[test]
    fn test_warn_policy_continues_past_hook_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::new(TrustScope::default(), FailurePolicy::Warn);
        chain
            .register(pre_registration("broken", 10, PreAction::Fail("boom"), &log))
            .unwrap();
        chain
            .register(pre_registration("next", 5, PreAction::Allow, &log))
            .unwrap();

        assert!(chain.run_pre("any", ArgumentMap::new()).is_ok());
        assert_eq!(*log.lock().unwrap(), vec!["broken", "next"]);
    }

    #[test]
    fn test_strict_policy_fails_the_invocation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::new(TrustScope::default(), FailurePolicy::Strict);
        chain
            .register(pre_registration("broken", 10, PreAction::Fail("boom"), &log))
            .unwrap();
        chain
            .register(pre_registration("next", 5, PreAction::Allow, &log))
            .unwrap();

        let error = chain.run_pre("any", ArgumentMap::new()).unwrap_err();
        assert!(matches!(
            error,
            PipelineError::HookFailed { message, .. } if message == "broken: boom"
        ));
        assert_eq!(*log.lock().unwrap(), vec!["broken"]);
    }

    #[test]
    fn test_silent_policy_swallows_hook_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::new(TrustScope::default(), FailurePolicy::Silent);
        chain
            .register(pre_registration("broken", 0, PreAction::Fail("boom"), &log))
            .unwrap();
        assert!(chain.run_pre("any", ArgumentMap::new()).is_ok());
    }

    struct ScriptedPost {
        decision: HookDecision,
    }

    impl ToolHook for ScriptedPost {
        fn after_invoke(
            &self,
            _tool: &str,
            _arguments: &ArgumentMap,
            _outcome: &InvocationOutcome,
        ) -> Result<HookDecision, HookError> {
            Ok(self.decision.clone())
        }
    }

    fn post_registration(name: &'static str, decision: HookDecision) -> HookRegistration {
        HookRegistration::new(name, HookPhase::Post, Arc::new(ScriptedPost { decision }))
    }

    #[test]
    fn test_post_replaces_successful_result_only() {
        let chain = HookChain::default();
        chain
            .register(post_registration(
                "redactor",
                HookDecision::ModifyResult(json!("redacted")),
            ))
            .unwrap();

        let outcome = chain.run_post(
            "any",
            &ArgumentMap::new(),
            InvocationOutcome::Success(json!("secret")),
        );
        assert_eq!(outcome.value(), Some(&json!("redacted")));

        let outcome = chain.run_post(
            "any",
            &ArgumentMap::new(),
            InvocationOutcome::Failure(PipelineError::UnknownTool("x".to_string())),
        );
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_post_ignores_pre_phase_decisions() {
        let chain = HookChain::default();
        chain
            .register(post_registration("confused", HookDecision::deny("too late")))
            .unwrap();

        let outcome = chain.run_post(
            "any",
            &ArgumentMap::new(),
            InvocationOutcome::Success(json!(1)),
        );
        assert_eq!(outcome.value(), Some(&json!(1)));
    }

    struct RecordingSessionHook {
        events: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl SessionHook for RecordingSessionHook {
        fn on_session_event(&self, event: &SessionEvent) -> Result<(), HookError> {
            self.events.lock().unwrap().push(event.kind().to_string());
            if self.fail {
                Err(HookError::new("listener broke"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_session_events_reach_every_listener() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::default();
        chain
            .register_session(SessionRegistration::new(
                "failing",
                Arc::new(RecordingSessionHook {
                    events: Arc::clone(&events),
                    fail: true,
                }),
            ))
            .unwrap();
        chain
            .register_session(SessionRegistration::new(
                "healthy",
                Arc::new(RecordingSessionHook {
                    events: Arc::clone(&events),
                    fail: false,
                }),
            ))
            .unwrap();

        chain.notify_session(&SessionEvent::Expiring {
            session_id: "s1".to_string(),
            reason: ExpiryReason::Timeout,
        });

        // The failing listener does not stop delivery to the next one.
        assert_eq!(*events.lock().unwrap(), vec!["expiring", "expiring"]);
    }
}
