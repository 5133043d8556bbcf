use js_sys::Reflect;
use wasm_bindgen::JsValue;

const BASE_URL_GLOBAL: &str = "__FLEET_API_BASE__";
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Backend endpoint configuration, resolved once at startup and injected
/// into the component tree via context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Uses `window.__FLEET_API_BASE__` when the host page defines it,
    /// otherwise the local development backend.
    pub fn resolve() -> Self {
        let injected = web_sys::window()
            .and_then(|window| {
                Reflect::get(&window, &JsValue::from_str(BASE_URL_GLOBAL))
                    .ok()?
                    .as_string()
            })
            .filter(|value| !value.trim().is_empty());

        Self::from_base_url(injected.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
    }

    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        ApiConfig { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slashes() {
        let config = ApiConfig::from_base_url("http://ops.example:9000//");
        assert_eq!(config.base_url(), "http://ops.example:9000");
    }

    #[test]
    fn keeps_clean_base_urls() {
        let config = ApiConfig::from_base_url(DEFAULT_BASE_URL);
        assert_eq!(config.base_url(), "http://localhost:5000");
    }
}
