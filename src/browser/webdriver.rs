use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::browser::accessor::{DocumentAccessor, ElementHandle, QueryKind, Rect};
use crate::browser::error::AccessError;
use crate::browser::scripts::{ATTRIBUTES_SCRIPT, OWN_TEXT_SCRIPT};

/// W3C element reference key, used until the driver tells us otherwise.
const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Attributes read one by one when the attribute script cannot run.
const FALLBACK_ATTRIBUTES: &[&str] = &[
    "id",
    "class",
    "name",
    "type",
    "role",
    "value",
    "placeholder",
    "aria-label",
    "title",
    "for",
    "href",
    "onclick",
    "data-testid",
    "data-rb-event-key",
    "data-id",
];

/// A live browser document driven through a W3C WebDriver endpoint
/// (chromedriver, geckodriver, a Selenium grid).
///
/// The session is created on `launch` and deleted on `quit` or drop.
pub struct WebDriverSession {
    client: Client,
    endpoint: String,
    session_id: String,
    element_key: OnceCell<String>,
    closed: bool,
}

impl WebDriverSession {
    /// Create a new browser session on the driver at `endpoint`.
    pub fn launch(endpoint: &str, headless: bool) -> Result<Self, AccessError> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AccessError::SessionSetup(format!("http client: {e}")))?;

        let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage", "--window-size=1920,1080"];
        if headless {
            args.push("--headless=new");
        }
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let response = client
            .post(format!("{endpoint}/session"))
            .json(&capabilities)
            .send()
            .map_err(|e| AccessError::SessionSetup(format!("cannot reach {endpoint}: {e}")))?;
        let body = response
            .text()
            .map_err(|e| AccessError::SessionSetup(format!("new session: {e}")))?;
        let payload: Value = serde_json::from_str(&body).map_err(|source| AccessError::Decode {
            context: "new session response".into(),
            source,
        })?;
        let value = unwrap_value("new session", payload)
            .map_err(|e| AccessError::SessionSetup(e.to_string()))?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| AccessError::SessionSetup("driver returned no sessionId".into()))?
            .to_string();

        info!(endpoint = %endpoint, session = %session_id, headless, "webdriver session started");

        Ok(Self {
            client,
            endpoint,
            session_id,
            element_key: OnceCell::new(),
            closed: false,
        })
    }

    /// Load `url` in the session's window.
    pub fn navigate(&self, url: &str) -> Result<(), AccessError> {
        self.send("navigate", Method::POST, "/url", Some(json!({ "url": url })))?;
        Ok(())
    }

    /// Delete the session. Safe to call more than once.
    pub fn quit(&mut self) -> Result<(), AccessError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.send("delete session", Method::DELETE, "", None)?;
        info!(session = %self.session_id, "webdriver session closed");
        Ok(())
    }

    fn send(
        &self,
        command: &str,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, AccessError> {
        let url = format!("{}/session/{}{}", self.endpoint, self.session_id, path);
        debug!(command, %url, "webdriver request");

        let mut request = self.client.request(method, url.as_str());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let transport = |source| AccessError::Transport {
            command: command.to_string(),
            source,
        };
        let text = request.send().map_err(transport)?.text().map_err(transport)?;
        let payload: Value = serde_json::from_str(&text).map_err(|source| AccessError::Decode {
            context: format!("{command} response"),
            source,
        })?;
        unwrap_value(command, payload)
    }

    fn element_path(&self, handle: &ElementHandle, suffix: &str) -> String {
        format!("/element/{}{}", handle.id, suffix)
    }

    /// Pull the element id out of a `{<element key>: id}` reference,
    /// learning the key from the first reference the driver returns.
    fn element_id(&self, reference: &Value) -> Option<String> {
        let object = reference.as_object()?;
        let key = match self.element_key.get() {
            Some(key) => key.clone(),
            None => {
                let key = object
                    .keys()
                    .find(|k| k.starts_with("element-") || *k == "ELEMENT")?
                    .clone();
                let _ = self.element_key.set(key.clone());
                key
            }
        };
        object.get(&key)?.as_str().map(str::to_string)
    }

    fn element_reference(&self, handle: &ElementHandle) -> Value {
        let key = self
            .element_key
            .get()
            .map(String::as_str)
            .unwrap_or(W3C_ELEMENT_KEY);
        let mut reference = serde_json::Map::new();
        reference.insert(key.to_string(), Value::String(handle.id.clone()));
        Value::Object(reference)
    }

    fn handles(&self, value: Value) -> Vec<ElementHandle> {
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| self.element_id(item))
                .map(ElementHandle::new)
                .collect(),
            _ => vec![],
        }
    }

    fn get_string(&self, command: &str, path: &str) -> Result<String, AccessError> {
        let value = self.send(command, Method::GET, path, None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn get_bool(&self, command: &str, path: &str) -> Result<bool, AccessError> {
        let value = self.send(command, Method::GET, path, None)?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

impl DocumentAccessor for WebDriverSession {
    fn query(&self, kind: QueryKind, value: &str) -> Result<Vec<ElementHandle>, AccessError> {
        let body = json!({ "using": kind.as_webdriver(), "value": value });
        let found = self.send("find elements", Method::POST, "/elements", Some(body))?;
        Ok(self.handles(found))
    }

    fn query_within(
        &self,
        scope: &ElementHandle,
        kind: QueryKind,
        value: &str,
    ) -> Result<Vec<ElementHandle>, AccessError> {
        let body = json!({ "using": kind.as_webdriver(), "value": value });
        let path = self.element_path(scope, "/elements");
        let found = self.send("find child elements", Method::POST, &path, Some(body))?;
        Ok(self.handles(found))
    }

    fn evaluate_script(&self, script: &str, args: &[ElementHandle]) -> Result<Value, AccessError> {
        let args: Vec<Value> = args.iter().map(|h| self.element_reference(h)).collect();
        let body = json!({ "script": script, "args": args });
        self.send("execute script", Method::POST, "/execute/sync", Some(body))
            .map_err(|e| match e {
                AccessError::Protocol { error, .. } => AccessError::Script(error),
                other => other,
            })
    }

    fn tag_name(&self, handle: &ElementHandle) -> Result<String, AccessError> {
        let path = self.element_path(handle, "/name");
        Ok(self.get_string("get tag name", &path)?.to_lowercase())
    }

    fn text(&self, handle: &ElementHandle) -> Result<String, AccessError> {
        let path = self.element_path(handle, "/text");
        self.get_string("get text", &path)
    }

    fn own_text(&self, handle: &ElementHandle) -> Result<String, AccessError> {
        match self.evaluate_script(OWN_TEXT_SCRIPT, std::slice::from_ref(handle))? {
            Value::String(text) => Ok(text),
            other => Err(AccessError::Script(format!("own text returned {other}"))),
        }
    }

    fn read_attributes(
        &self,
        handle: &ElementHandle,
    ) -> Result<BTreeMap<String, String>, AccessError> {
        match self.evaluate_script(ATTRIBUTES_SCRIPT, std::slice::from_ref(handle)) {
            Ok(Value::Object(map)) => {
                return Ok(map
                    .into_iter()
                    .map(|(k, v)| {
                        let v = match v {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        (k, v)
                    })
                    .collect());
            }
            Ok(other) => debug!(?other, "attribute script returned a non-object"),
            Err(e) => debug!(error = %e, "attribute script failed, reading attributes one by one"),
        }

        let mut attributes = BTreeMap::new();
        for name in FALLBACK_ATTRIBUTES {
            let path = self.element_path(handle, &format!("/attribute/{name}"));
            match self.send("get attribute", Method::GET, &path, None) {
                Ok(Value::String(value)) => {
                    attributes.insert(name.to_string(), value);
                }
                Ok(_) => {}
                Err(e @ AccessError::StaleElement(_)) => return Err(e),
                Err(e) => debug!(attribute = name, error = %e, "attribute read failed"),
            }
        }
        Ok(attributes)
    }

    fn read_geometry(&self, handle: &ElementHandle) -> Result<Rect, AccessError> {
        let path = self.element_path(handle, "/rect");
        let value = self.send("get rect", Method::GET, &path, None)?;
        serde_json::from_value(value).map_err(|source| AccessError::Decode {
            context: "element rect".into(),
            source,
        })
    }

    fn is_displayed(&self, handle: &ElementHandle) -> Result<bool, AccessError> {
        let path = self.element_path(handle, "/displayed");
        self.get_bool("is displayed", &path)
    }

    fn is_enabled(&self, handle: &ElementHandle) -> Result<bool, AccessError> {
        let path = self.element_path(handle, "/enabled");
        self.get_bool("is enabled", &path)
    }

    fn current_url(&self) -> Result<String, AccessError> {
        self.get_string("get current url", "/url")
    }

    fn page_title(&self) -> Result<String, AccessError> {
        self.get_string("get title", "/title")
    }

    fn page_source(&self) -> Result<String, AccessError> {
        self.get_string("get page source", "/source")
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!(error = %e, "failed to close webdriver session");
        }
    }
}

/// Unwrap the `{"value": ...}` envelope, turning error payloads into `AccessError`.
fn unwrap_value(command: &str, payload: Value) -> Result<Value, AccessError> {
    let value = match payload {
        Value::Object(mut map) => map.remove("value").unwrap_or(Value::Null),
        other => other,
    };

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if error == "stale element reference" || error == "no such element" {
            return Err(AccessError::StaleElement(format!("{error}: {message}")));
        }
        return Err(AccessError::Protocol {
            command: command.to_string(),
            error: format!("{error}: {message}"),
        });
    }

    Ok(value)
}
