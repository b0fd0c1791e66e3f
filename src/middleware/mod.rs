//! Middleware layer.
//!
//! Cross-cutting concerns wrapped around every routed request. For now this
//! is request tracing; anything else that needs to see every request and
//! response (request ids, metrics) belongs here too.

mod trace;

pub(crate) use trace::trace;
