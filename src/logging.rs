//! Structured logging collaborator
//!
//! The admission engine and lookup service log through an injected
//! `EventLogger` rather than calling global macros directly, so tests can
//! capture what was reported. `TracingLogger` forwards to `tracing`.

use std::sync::Arc;

pub trait EventLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards every event to the `tracing` subscriber under one target
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn shared(component: &'static str) -> Arc<dyn EventLogger> {
        Arc::new(Self::new(component))
    }
}

impl EventLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(component = self.component, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(component = self.component, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(component = self.component, "{}", message);
    }
}

/// Install the global `tracing` subscriber
///
/// Uses RUST_LOG when set, otherwise `default_filter`. Safe to call twice.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .try_init();
}
