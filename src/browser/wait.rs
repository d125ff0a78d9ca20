// src/browser/wait.rs
//
// Bounded readiness polling. Every wait names the condition it is waiting
// for and gives up with `BrowserError::Timeout` after `WaitPolicy::timeout`.

use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use super::{Browser, BrowserError, BrowserResult, ElementRef};

const BUSY_SCRIPT: &str = "return document.documentElement.classList.contains('nprogress-busy');";
const DOC_READY_SCRIPT: &str = "return document.readyState === 'complete';";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll: Duration,
}

impl WaitPolicy {
    pub const fn new(timeout: Duration, poll: Duration) -> Self { Self { timeout, poll } }

    pub fn with_timeout(self, timeout: Duration) -> Self { Self { timeout, ..self } }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(15), Duration::from_millis(100))
    }
}

/// Poll `check` until it returns `true` or the policy times out.
///
/// Missing or stale elements count as "not yet"; any other error aborts.
pub fn until<F>(policy: WaitPolicy, what: &str, mut check: F) -> BrowserResult<()>
where
    F: FnMut() -> BrowserResult<bool>,
{
    let deadline = Instant::now() + policy.timeout;
    loop {
        match check() {
            Ok(true) => return Ok(()),
            Ok(false) | Err(BrowserError::ElementNotFound(_)) | Err(BrowserError::StaleElement(_)) => {}
            Err(e) => return Err(e),
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::Timeout(format!("{what} after {:?}", policy.timeout)));
        }
        thread::sleep(policy.poll);
    }
}

pub fn wait_for_selector(
    browser: &mut dyn Browser,
    selector: &str,
    policy: WaitPolicy,
) -> BrowserResult<ElementRef> {
    let mut found = None;
    until(policy, &format!("waiting for {selector}"), || {
        found = browser.query(None, selector)?;
        Ok(found.is_some())
    })?;
    found.ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))
}

/// Wait until the page URL equals `url` (trailing slashes ignored).
pub fn wait_for_url(browser: &mut dyn Browser, url: &str, policy: WaitPolicy) -> BrowserResult<()> {
    let want = url.trim_end_matches('/');
    until(policy, &format!("waiting for url {url}"), || {
        Ok(browser.current_url()?.trim_end_matches('/') == want)
    })
}

pub fn wait_for_document(browser: &mut dyn Browser, policy: WaitPolicy) -> BrowserResult<()> {
    until(policy, "waiting for document ready", || {
        Ok(browser.evaluate(DOC_READY_SCRIPT)?.as_bool().unwrap_or(false))
    })
}

/// Wait for the portal's progress bar to settle.
///
/// The bar is switched on a moment after input, so first give it a short
/// window to appear, then wait for it to clear.
pub fn wait_for_idle(browser: &mut dyn Browser, policy: WaitPolicy) -> BrowserResult<()> {
    let appear = WaitPolicy::new(policy.poll * 10, policy.poll);
    if until(appear, "progress bar", || is_busy(browser)).is_err() {
        trace!("progress bar never showed up");
    }
    until(policy, "waiting for progress bar to clear", || Ok(!is_busy(browser)?))
}

fn is_busy(browser: &mut dyn Browser) -> BrowserResult<bool> {
    Ok(browser.evaluate(BUSY_SCRIPT)?.as_bool().unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> WaitPolicy {
        WaitPolicy::new(Duration::from_millis(50), Duration::from_millis(1))
    }

    #[test]
    fn until_returns_once_condition_holds() {
        let mut calls = 0;
        until(fast(), "third call", || { calls += 1; Ok(calls >= 3) }).unwrap();
        assert_eq!(calls, 3);
    }

    #[test]
    fn until_times_out() {
        let err = until(fast(), "never", || Ok(false)).unwrap_err();
        assert!(matches!(err, BrowserError::Timeout(msg) if msg.contains("never")));
    }

    #[test]
    fn missing_elements_keep_polling_other_errors_abort() {
        let mut calls = 0;
        until(fast(), "appears", || {
            calls += 1;
            if calls < 2 { Err(BrowserError::ElementNotFound("x".into())) } else { Ok(true) }
        })
        .unwrap();

        let err = until(fast(), "boom", || Err(BrowserError::SessionClosed)).unwrap_err();
        assert!(matches!(err, BrowserError::SessionClosed));
    }
}
