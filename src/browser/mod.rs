// src/browser/mod.rs
//! Browser seam.
//!
//! Everything that drives a page goes through [`Browser`]: one tab, one
//! blocking call at a time. The run loops own the browser exclusively for
//! their whole lifetime, so the trait takes `&mut self` throughout.
//!
//! [`webdriver::WebDriver`] is the real implementation (W3C WebDriver over
//! HTTP). Readiness waits live in [`wait`] and only use trait methods, so
//! they work against any implementation.

mod error;
pub mod wait;
pub mod webdriver;

pub use error::{BrowserError, BrowserResult};
pub use webdriver::WebDriver;

use serde_json::Value;

/// Opaque handle to a DOM element, valid until the page navigates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

pub trait Browser {
    fn goto(&mut self, url: &str) -> BrowserResult<()>;

    fn current_url(&mut self) -> BrowserResult<String>;

    /// First element matching a CSS selector, searched inside `scope` when given.
    fn query(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<Option<ElementRef>>;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<Vec<ElementRef>>;

    /// The element's `textContent`.
    fn text(&mut self, element: &ElementRef) -> BrowserResult<String>;

    fn attribute(&mut self, element: &ElementRef, name: &str) -> BrowserResult<Option<String>>;

    fn click(&mut self, element: &ElementRef) -> BrowserResult<()>;

    /// Clear the first field matching `selector` and type `value` into it.
    fn fill(&mut self, selector: &str, value: &str) -> BrowserResult<()>;

    /// Pick the `<option>` whose value or visible label equals `value`.
    fn select_option(&mut self, selector: &str, value: &str) -> BrowserResult<()>;

    /// Run a script in the page and return what it returns.
    fn evaluate(&mut self, script: &str) -> BrowserResult<Value>;

    /// End the session. Further calls fail with `SessionClosed`.
    fn quit(&mut self) -> BrowserResult<()>;

    /* ---------- provided helpers ---------- */

    /// First match of `selector`, or `ElementNotFound`.
    fn expect(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<ElementRef> {
        self.query(scope, selector)?
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))
    }

    /// Trimmed text of the first match inside `scope`, `None` if nothing matches.
    fn text_of(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<Option<String>> {
        match self.query(scope, selector)? {
            Some(el) => Ok(Some(self.text(&el)?.trim().to_string())),
            None => Ok(None),
        }
    }

    fn click_selector(&mut self, selector: &str) -> BrowserResult<()> {
        let el = self.expect(None, selector)?;
        self.click(&el)
    }
}
