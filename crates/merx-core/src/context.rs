//! Execution context
//!
//! Every pipeline invocation carries an [`ExecutionContext`]: the environment
//! name, the configured policies, and a cancellation token that is propagated
//! into every collaborator call so in-flight work can stop promptly.

use crate::policies::{Policy, PolicySet};
use std::sync::Arc;
use tokio::sync::watch;

/// Cooperatively-observed cancellation signal.
///
/// Cloning the token is cheap; all clones observe the same signal. Once
/// cancelled, a token stays cancelled.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Signal cancellation to all clones of this token
    pub fn cancel(&self) {
        // All receivers are clones of rx held by tokens, so send only fails
        // when every token is gone, which is fine.
        let _ = self.tx.send(true);
    }

    /// Whether cancellation has been signalled
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is signalled; never resolves otherwise
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if *rx.borrow() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
        // The sender is kept alive by this token, so the channel can only
        // close during teardown; pend rather than spuriously resolve.
        std::future::pending::<()>().await
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Context for one pipeline invocation
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    environment: String,
    policies: PolicySet,
    cancellation: CancellationToken,
}

impl ExecutionContext {
    /// Create a context for the given environment with no policies configured
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            policies: PolicySet::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Add a policy to the context
    pub fn with_policy<P: Policy + 'static>(mut self, policy: P) -> Self {
        self.policies.insert(policy);
        self
    }

    /// Use the given cancellation token instead of a fresh one
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Name of the environment this invocation runs in
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Look up a policy by type, falling back to its default when absent
    pub fn policy<P: Policy + Default + Clone + 'static>(&self) -> P {
        self.policies.policy()
    }

    /// The cancellation token for this invocation
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}
