use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::browser::accessor::DocumentAccessor;
use crate::browser::scripts::{QUIESCE_SCRIPT, READY_STATE_SCRIPT};

/// Bounds for the page readiness polls.
#[derive(Debug, Clone)]
pub struct ReadinessConfig {
    /// Ceiling for `document.readyState == "complete"`.
    pub ready_timeout: Duration,
    /// Ceiling for pending async work (jQuery / AngularJS) to drain.
    pub quiesce_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(30),
            quiesce_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl ReadinessConfig {
    pub fn from_secs(ready_secs: u64, quiesce_secs: u64) -> Self {
        Self {
            ready_timeout: Duration::from_secs(ready_secs),
            quiesce_timeout: Duration::from_secs(quiesce_secs),
            ..Self::default()
        }
    }
}

/// Wait for the document to report ready, then for async work to quiesce.
///
/// Returns `false` if either poll timed out. A timeout is logged and is not
/// an error: analysis proceeds against whatever the document holds.
pub fn wait_for_page_load<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    config: &ReadinessConfig,
) -> bool {
    let ready = poll_until(config.ready_timeout, config.poll_interval, || {
        matches!(
            accessor.evaluate_script(READY_STATE_SCRIPT, &[]),
            Ok(Value::String(state)) if state == "complete"
        )
    });
    if !ready {
        warn!(timeout = ?config.ready_timeout, "document did not reach readyState=complete");
    }

    let quiet = poll_until(config.quiesce_timeout, config.poll_interval, || {
        matches!(accessor.evaluate_script(QUIESCE_SCRIPT, &[]), Ok(Value::Bool(true)))
    });
    if !quiet {
        warn!(timeout = ?config.quiesce_timeout, "pending async requests did not settle");
    }

    debug!(ready, quiet, "page load wait finished");
    ready && quiet
}

fn poll_until(timeout: Duration, interval: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if check() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(interval.min(deadline - now));
    }
}
