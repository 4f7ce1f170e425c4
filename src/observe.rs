//! Optional operation observer
//!
//! Engines accept an `Option<Arc<dyn Observer>>`. Observers only watch: they
//! cannot fail an operation or change its result.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Core operations reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BuildSignature,
    Compare,
    Apply,
    Handle,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::BuildSignature => "signature.build",
            Operation::Compare => "diff.compare",
            Operation::Apply => "apply.changes",
            Operation::Handle => "sync.handle",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an observed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed(String),
}

pub trait Observer: Send + Sync {
    /// Span entered for the whole operation; events raised inside it nest
    /// under it
    fn span(&self, _operation: Operation, _target: &str) -> tracing::Span {
        tracing::Span::none()
    }

    fn on_start(&self, operation: Operation, target: &str);

    fn on_finish(&self, operation: Operation, target: &str, outcome: &Outcome, elapsed: Duration);
}

pub type SharedObserver = Arc<dyn Observer>;

/// Observer that turns operation boundaries into `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn span(&self, operation: Operation, target: &str) -> tracing::Span {
        tracing::info_span!("operation", operation = operation.as_str(), path = target)
    }

    fn on_start(&self, operation: Operation, target: &str) {
        tracing::debug!(operation = operation.as_str(), path = target, "operation started");
    }

    fn on_finish(&self, operation: Operation, target: &str, outcome: &Outcome, elapsed: Duration) {
        match outcome {
            Outcome::Ok => tracing::debug!(
                operation = operation.as_str(),
                path = target,
                elapsed_us = elapsed.as_micros() as u64,
                "operation finished"
            ),
            Outcome::Failed(error) => tracing::warn!(
                operation = operation.as_str(),
                path = target,
                elapsed_us = elapsed.as_micros() as u64,
                %error,
                "operation failed"
            ),
        }
    }
}

/// Run `body`, reporting start and finish to `observer` when one is set
pub(crate) fn observed<T, E, F>(
    observer: Option<&SharedObserver>,
    operation: Operation,
    target: &str,
    body: F,
) -> Result<T, E>
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    let Some(observer) = observer else {
        return body();
    };

    let span = observer.span(operation, target);
    let _entered = span.enter();

    observer.on_start(operation, target);
    let started = Instant::now();
    let result = body();
    let outcome = match &result {
        Ok(_) => Outcome::Ok,
        Err(e) => Outcome::Failed(e.to_string()),
    };
    observer.on_finish(operation, target, &outcome, started.elapsed());
    result
}
