/*!
 * Structured Tracing
 * Subscriber setup and per-invocation spans using the tracing crate
 */

use crate::core::types::{ExitStatus, HandlerId};
use std::time::{Duration, Instant};
use tracing::{debug, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Handler bodies slower than this are reported
const SLOW_HANDLER: Duration = Duration::from_millis(100);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SHELL_EVENTS_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns false when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SHELL_EVENTS_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        debug!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span covering one handler invocation
pub struct HandlerSpan {
    span: tracing::Span,
    start: Instant,
    handler: HandlerId,
}

impl HandlerSpan {
    pub fn new(handler: HandlerId, command: &str) -> Self {
        let span = span!(
            Level::DEBUG,
            "event_handler",
            handler,
            command,
            status = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            handler,
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn record_status(&self, status: ExitStatus) {
        self.span.record("status", status);
    }
}

impl Drop for HandlerSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration > SLOW_HANDLER {
            let _entered = self.span.enter();
            warn!(
                handler = self.handler,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow event handler"
            );
        }
    }
}

/// Helper to create a handler span
#[inline]
pub fn span_handler(handler: HandlerId, command: &str) -> HandlerSpan {
    HandlerSpan::new(handler, command)
}
