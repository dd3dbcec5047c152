//! Polling waits for effects produced on background threads or tasks.

use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(5);

/// Poll `condition` until it holds or `timeout` elapses. Returns whether it
/// held.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use test_helpers::wait::wait_until;
///
/// assert!(wait_until(Duration::from_millis(10), || true));
/// ```
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(POLL);
    }
}
