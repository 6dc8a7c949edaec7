//! Hook registration entities.

use crate::hook::traits::{SessionHook, ToolHook};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which side of the handler a hook observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    Pre,
    Post,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPhase::Pre => "pre",
            HookPhase::Post => "post",
        }
    }
}

/// Which tools a hook registration applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPattern {
    /// Every tool.
    Any,
    /// A single tool by exact name.
    Exact(String),
}

impl ToolPattern {
    /// Parse a pattern string: `"*"` matches every tool, anything else
    /// matches one tool exactly.
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            ToolPattern::Any
        } else {
            ToolPattern::Exact(pattern.to_string())
        }
    }

    pub fn matches(&self, tool: &str) -> bool {
        match self {
            ToolPattern::Any => true,
            ToolPattern::Exact(name) => name == tool,
        }
    }
}

impl From<&str> for ToolPattern {
    fn from(pattern: &str) -> Self {
        ToolPattern::parse(pattern)
    }
}

impl fmt::Display for ToolPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolPattern::Any => write!(f, "*"),
            ToolPattern::Exact(name) => write!(f, "{name}"),
        }
    }
}

/// Dotted hierarchical scope controlling who may register hooks.
///
/// A chain trusted for `app` accepts registrations scoped `app` or any
/// dotted descendant such as `app.audit`, and rejects everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrustScope(String);

impl TrustScope {
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `other` is this scope or a descendant of it.
    pub fn permits(&self, other: &TrustScope) -> bool {
        match other.0.strip_prefix(&self.0) {
            Some("") => true,
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }

    /// Scope one level below this one.
    pub fn child(&self, segment: &str) -> TrustScope {
        TrustScope(format!("{}.{segment}", self.0))
    }
}

impl Default for TrustScope {
    fn default() -> Self {
        Self("app".to_string())
    }
}

impl From<&str> for TrustScope {
    fn from(scope: &str) -> Self {
        Self::new(scope)
    }
}

impl fmt::Display for TrustScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the chain reacts when a hook raises an internal error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// A hook error fails the whole invocation.
    Strict,
    /// A hook error is logged and the chain continues.
    #[default]
    Warn,
    /// A hook error is swallowed.
    Silent,
}

/// A tool hook together with its dispatch metadata.
#[derive(Clone)]
pub struct HookRegistration {
    name: String,
    phase: HookPhase,
    priority: i32,
    pattern: ToolPattern,
    scope: TrustScope,
    hook: Arc<dyn ToolHook>,
}

impl HookRegistration {
    /// Registration with priority 0, matching every tool, scoped to the
    /// default trust root.
    pub fn new(name: impl Into<String>, phase: HookPhase, hook: Arc<dyn ToolHook>) -> Self {
        Self {
            name: name.into(),
            phase,
            priority: 0,
            pattern: ToolPattern::Any,
            scope: TrustScope::default(),
            hook,
        }
    }

    /// Higher priority runs earlier within a phase.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict to a single tool by exact name.
    pub fn for_tool(mut self, tool: impl Into<String>) -> Self {
        self.pattern = ToolPattern::Exact(tool.into());
        self
    }

    pub fn with_pattern(mut self, pattern: ToolPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<TrustScope>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> HookPhase {
        self.phase
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn pattern(&self) -> &ToolPattern {
        &self.pattern
    }

    pub fn scope(&self) -> &TrustScope {
        &self.scope
    }

    pub fn hook(&self) -> &Arc<dyn ToolHook> {
        &self.hook
    }

    pub fn applies_to(&self, tool: &str) -> bool {
        self.pattern.matches(tool)
    }
}

impl fmt::Debug for HookRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistration")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("priority", &self.priority)
            .field("pattern", &self.pattern)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// A session hook together with its trust scope.
///
/// Session hooks have no phase, priority, or tool pattern: every listener
/// receives every event and mutual order is unspecified.
#[derive(Clone)]
pub struct SessionRegistration {
    name: String,
    scope: TrustScope,
    hook: Arc<dyn SessionHook>,
}

impl SessionRegistration {
    pub fn new(name: impl Into<String>, hook: Arc<dyn SessionHook>) -> Self {
        Self {
            name: name.into(),
            scope: TrustScope::default(),
            hook,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<TrustScope>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &TrustScope {
        &self.scope
    }

    pub fn hook(&self) -> &Arc<dyn SessionHook> {
        &self.hook
    }
}

impl fmt::Debug for SessionRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistration")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::traits::{HookDecision, HookError};
    use crate::tool::value_objects::ArgumentMap;

    struct AllowAll;

    impl ToolHook for AllowAll {}

    #[test]
    fn test_pattern_parse_and_match() {
        assert_eq!(ToolPattern::parse("*"), ToolPattern::Any);
        assert!(ToolPattern::parse("*").matches("anything"));

        let exact = ToolPattern::parse("add");
        assert_eq!(exact, ToolPattern::Exact("add".to_string()));
        assert!(exact.matches("add"));
        assert!(!exact.matches("subtract"));
        assert_eq!(exact.to_string(), "add");
    }

    #[test]
    fn test_trust_scope_permits_descendants() {
        let root = TrustScope::new("app");
        assert!(root.permits(&TrustScope::new("app")));
        assert!(root.permits(&TrustScope::new("app.audit")));
        assert!(root.permits(&TrustScope::new("app.audit.files")));
        assert!(!root.permits(&TrustScope::new("application")));
        assert!(!root.permits(&TrustScope::new("other")));
        assert!(!TrustScope::new("app.audit").permits(&root));
    }

    #[test]
    fn test_trust_scope_child() {
        assert_eq!(TrustScope::new("app").child("audit").as_str(), "app.audit");
    }

    #[test]
    fn test_registration_defaults_and_builders() {
        let registration = HookRegistration::new("guard", HookPhase::Pre, Arc::new(AllowAll));
        assert_eq!(registration.priority(), 0);
        assert_eq!(registration.pattern(), &ToolPattern::Any);
        assert_eq!(registration.scope().as_str(), "app");

        let registration = registration
            .with_priority(10)
            .for_tool("add")
            .with_scope("app.guard");
        assert_eq!(registration.priority(), 10);
        assert!(registration.applies_to("add"));
        assert!(!registration.applies_to("subtract"));
        assert_eq!(registration.scope().as_str(), "app.guard");
    }

    #[test]
    fn test_registered_hook_is_callable() {
        let registration = HookRegistration::new("guard", HookPhase::Pre, Arc::new(AllowAll));
        let decision: Result<HookDecision, HookError> = registration
            .hook()
            .before_invoke("add", &ArgumentMap::new());
        assert_eq!(decision, Ok(HookDecision::Allow));
    }

    #[test]
    fn test_failure_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&FailurePolicy::Strict).expect("serialize"),
            "\"strict\""
        );
        let policy: FailurePolicy = serde_json::from_str("\"warn\"").expect("deserialize");
        assert_eq!(policy, FailurePolicy::Warn);
        assert_eq!(FailurePolicy::default(), FailurePolicy::Warn);
    }
}
