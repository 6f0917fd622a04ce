/*!
 * Monitoring
 * Structured logging setup and invocation tracing
 */

mod tracer;

pub use tracer::{init_tracing, span_handler, HandlerSpan};
