//! Process-wide trace toggle for authorization diagnostics
//!
//! Tracing is purely observational: it never changes a check's decision.
//! Records are emitted through the `tracing` facade, so the host decides
//! the sink by installing a subscriber (e.g. `tracing-subscriber` with an
//! env filter). Default OFF.

use std::sync::atomic::{AtomicBool, Ordering};

static TRACE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Turns authorization tracing on or off for the whole process.
///
/// Intended to be set once at startup or in tests. The flag is a relaxed
/// atomic, so flipping it concurrently with running checks is safe but
/// not transactional: checks in flight during the flip may be traced
/// only partially.
pub fn set_trace_enabled(enabled: bool) {
    TRACE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Current state of the process-wide trace flag
pub fn trace_enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
}
