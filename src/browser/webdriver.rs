// src/browser/webdriver.rs
//! Blocking W3C WebDriver client.
//!
//! Talks to a running `chromedriver` (default `http://localhost:9515`) or
//! `geckodriver` over plain HTTP/JSON. One client owns one session, i.e.
//! one browser window.
//!
//! ```text
//! chromedriver --port=9515
//! ```

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use super::{Browser, BrowserError, BrowserResult, ElementRef};

/// Key under which W3C drivers return element handles.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

const TEXT_SCRIPT: &str = "return arguments[0].textContent;";
const SELECT_SCRIPT: &str = r#"
const sel = arguments[0], want = arguments[1];
const opt = Array.from(sel.options).find(o => o.value === want || o.text.trim() === want);
if (!opt) { return false; }
sel.value = opt.value;
sel.dispatchEvent(new Event('input', { bubbles: true }));
sel.dispatchEvent(new Event('change', { bubbles: true }));
return true;
"#;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub browser: BrowserKind,
    pub headless: bool,
    /// Page-load and script timeout handed to the driver.
    pub page_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { browser: BrowserKind::Chrome, headless: false, page_timeout: Duration::from_secs(30) }
    }
}

/// New-session capabilities for the chosen browser.
pub fn capabilities(opts: &SessionOptions) -> Value {
    let always = match opts.browser {
        BrowserKind::Chrome => {
            let mut args = vec!["--window-size=1400,1000"];
            if opts.headless { args.push("--headless=new"); }
            json!({ "browserName": "chrome", "goog:chromeOptions": { "args": args } })
        }
        BrowserKind::Firefox => {
            let args: Vec<&str> = if opts.headless { vec!["-headless"] } else { vec![] };
            json!({ "browserName": "firefox", "moz:firefoxOptions": { "args": args } })
        }
    };
    json!({ "capabilities": { "alwaysMatch": always } })
}

/// Unwrap a driver reply: `{"value": ...}` on success, `{"value": {"error": ..}}` on failure.
pub fn decode_response(ok: bool, mut payload: Value) -> BrowserResult<Value> {
    let value = payload
        .get_mut("value")
        .map(Value::take)
        .ok_or_else(|| BrowserError::InvalidResponse(s!("missing \"value\"")))?;

    let error = value.get("error").and_then(Value::as_str).map(str::to_string);
    match error {
        Some(error) => {
            let message = value.get("message").and_then(Value::as_str).unwrap_or("").to_string();
            Err(map_error(&error, message))
        }
        None if !ok => Err(BrowserError::InvalidResponse(value.to_string())),
        None => Ok(value),
    }
}

fn map_error(error: &str, message: String) -> BrowserError {
    match error {
        "no such element" => BrowserError::ElementNotFound(message),
        "stale element reference" => BrowserError::StaleElement(message),
        "timeout" | "script timeout" => BrowserError::Timeout(message),
        "javascript error" => BrowserError::JavaScript(message),
        "invalid session id" => BrowserError::SessionClosed,
        _ => BrowserError::WebDriver { error: error.to_string(), message },
    }
}

fn element_from(value: &Value) -> BrowserResult<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| BrowserError::InvalidResponse(format!("not an element: {value}")))
}

fn element_arg(el: &ElementRef) -> Value {
    json!({ ELEMENT_KEY: el.0 })
}

pub struct WebDriver {
    http: Client,
    endpoint: String,
    session: Option<String>,
}

impl WebDriver {
    /// Open a new browser session at `endpoint`.
    pub fn connect(endpoint: &str, opts: &SessionOptions) -> BrowserResult<Self> {
        let http = Client::builder()
            .timeout(opts.page_timeout + Duration::from_secs(10))
            .build()
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        let mut driver = Self { http, endpoint: endpoint.trim_end_matches('/').to_string(), session: None };

        let url = format!("{}/session", driver.endpoint);
        let value = driver
            .send(Method::POST, &url, Some(capabilities(opts)))
            .map_err(|e| BrowserError::ConnectionFailed(format!("{endpoint}: {e}")))?;
        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BrowserError::InvalidResponse(s!("no sessionId in new-session reply")))?;
        debug!(session = id, endpoint, "webdriver session started");
        driver.session = Some(id.to_string());

        let ms = opts.page_timeout.as_millis() as u64;
        driver.session_call(Method::POST, "timeouts", Some(json!({ "pageLoad": ms, "script": ms })))?;
        Ok(driver)
    }

    fn send(&self, method: Method, url: &str, body: Option<Value>) -> BrowserResult<Value> {
        trace!(%method, url, "webdriver call");
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send()?;
        let ok = resp.status().is_success();
        let payload: Value = resp.json()?;
        decode_response(ok, payload)
    }

    fn session_call(&self, method: Method, path: &str, body: Option<Value>) -> BrowserResult<Value> {
        let id = self.session.as_deref().ok_or(BrowserError::SessionClosed)?;
        let url = if path.is_empty() {
            format!("{}/session/{}", self.endpoint, id)
        } else {
            format!("{}/session/{}/{}", self.endpoint, id, path)
        };
        self.send(method, &url, body)
    }

    fn find_path(scope: Option<&ElementRef>, many: bool) -> String {
        let leaf = if many { "elements" } else { "element" };
        match scope {
            Some(el) => format!("element/{}/{}", el.0, leaf),
            None => leaf.to_string(),
        }
    }

    fn execute(&self, script: &str, args: Vec<Value>) -> BrowserResult<Value> {
        self.session_call(Method::POST, "execute/sync", Some(json!({ "script": script, "args": args })))
    }
}

impl Browser for WebDriver {
    fn goto(&mut self, url: &str) -> BrowserResult<()> {
        debug!(url, "goto");
        self.session_call(Method::POST, "url", Some(json!({ "url": url })))?;
        Ok(())
    }

    fn current_url(&mut self) -> BrowserResult<String> {
        let v = self.session_call(Method::GET, "url", None)?;
        v.as_str()
            .map(str::to_string)
            .ok_or_else(|| BrowserError::InvalidResponse(format!("url: {v}")))
    }

    fn query(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<Option<ElementRef>> {
        let body = json!({ "using": "css selector", "value": selector });
        match self.session_call(Method::POST, &Self::find_path(scope, false), Some(body)) {
            Ok(v) => element_from(&v).map(Some),
            Err(BrowserError::ElementNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn query_all(&mut self, scope: Option<&ElementRef>, selector: &str) -> BrowserResult<Vec<ElementRef>> {
        let body = json!({ "using": "css selector", "value": selector });
        let v = self.session_call(Method::POST, &Self::find_path(scope, true), Some(body))?;
        v.as_array()
            .ok_or_else(|| BrowserError::InvalidResponse(format!("elements: {v}")))?
            .iter()
            .map(element_from)
            .collect()
    }

    fn text(&mut self, element: &ElementRef) -> BrowserResult<String> {
        let v = self.execute(TEXT_SCRIPT, vec![element_arg(element)])?;
        Ok(v.as_str().unwrap_or_default().to_string())
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> BrowserResult<Option<String>> {
        let v = self.session_call(Method::GET, &format!("element/{}/attribute/{}", element.0, name), None)?;
        Ok(v.as_str().map(str::to_string))
    }

    fn click(&mut self, element: &ElementRef) -> BrowserResult<()> {
        self.session_call(Method::POST, &format!("element/{}/click", element.0), Some(json!({})))?;
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> BrowserResult<()> {
        let el = self.expect(None, selector)?;
        self.session_call(Method::POST, &format!("element/{}/clear", el.0), Some(json!({})))?;
        self.session_call(Method::POST, &format!("element/{}/value", el.0), Some(json!({ "text": value })))?;
        Ok(())
    }

    fn select_option(&mut self, selector: &str, value: &str) -> BrowserResult<()> {
        let el = self.expect(None, selector)?;
        let picked = self.execute(SELECT_SCRIPT, vec![element_arg(&el), json!(value)])?;
        if picked.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(BrowserError::ElementNotFound(format!("{selector} has no option {value:?}")))
        }
    }

    fn evaluate(&mut self, script: &str) -> BrowserResult<Value> {
        self.execute(script, Vec::new())
    }

    fn quit(&mut self) -> BrowserResult<()> {
        if self.session.is_none() {
            return Ok(());
        }
        let result = self.session_call(Method::DELETE, "", None).map(|_| ());
        self.session = None;
        result
    }
}

impl Drop for WebDriver {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!(error = %e, "webdriver session did not close cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_success_value() {
        let v = decode_response(true, json!({ "value": { ELEMENT_KEY: "abc" } })).unwrap();
        assert_eq!(element_from(&v).unwrap(), ElementRef("abc".into()));
    }

    #[test]
    fn decode_maps_driver_errors() {
        let payload = |e: &str| json!({ "value": { "error": e, "message": "m", "stacktrace": "" } });
        assert!(matches!(decode_response(false, payload("no such element")), Err(BrowserError::ElementNotFound(_))));
        assert!(matches!(decode_response(false, payload("stale element reference")), Err(BrowserError::StaleElement(_))));
        assert!(matches!(decode_response(false, payload("timeout")), Err(BrowserError::Timeout(_))));
        assert!(matches!(decode_response(false, payload("invalid session id")), Err(BrowserError::SessionClosed)));
        assert!(matches!(
            decode_response(false, payload("element click intercepted")),
            Err(BrowserError::WebDriver { error, .. }) if error == "element click intercepted"
        ));
    }

    #[test]
    fn decode_rejects_missing_value() {
        assert!(matches!(decode_response(true, json!({})), Err(BrowserError::InvalidResponse(_))));
    }

    #[test]
    fn null_value_is_success() {
        assert_eq!(decode_response(true, json!({ "value": null })).unwrap(), Value::Null);
    }

    #[test]
    fn headless_chrome_capabilities() {
        let caps = capabilities(&SessionOptions { headless: true, ..Default::default() });
        let args = &caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"];
        assert!(args.as_array().unwrap().iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn scoped_find_paths() {
        let el = ElementRef("e1".into());
        assert_eq!(WebDriver::find_path(None, false), "element");
        assert_eq!(WebDriver::find_path(Some(&el), true), "element/e1/elements");
    }
}
