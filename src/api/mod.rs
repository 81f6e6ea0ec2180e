mod auth;
mod error;
mod fees;
mod holidays;
mod leaderboard;
mod mentors;
mod notifications;
mod reviews;
mod users;

pub(crate) use auth::{ChangePasswordRequest, LoginResponse};
pub(crate) use error::{normalize_response, ApiError, ApiErrorKind, ApiResult};
pub(crate) use holidays::NewHoliday;
pub(crate) use notifications::NewNotification;

use crate::storage::{TOKEN_KEY, USER_KEY};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub log_level: log::Level,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut config = Self::default_values();

        // We support BOTH `window.ENV.API_URL` (deployment docs) and
        // `window.ENV.api_url` (older index.html templates).
        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return config;
        };

        let read = |key: &str| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .filter(|s| !s.trim().is_empty())
        };

        if let Some(url) = read("API_URL").or_else(|| read("api_url")) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(level) = read("LOG_LEVEL").and_then(|l| l.parse().ok()) {
            config.log_level = level;
        }

        config
    }

    fn default_values() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            log_level: log::Level::Info,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn encode_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let mut client = Self::new(EnvConfig::new().api_url);
        client.token = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());
        client
    }

    pub fn save_to_storage(&self) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    pub fn clear_storage() {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    pub fn get_auth_header(&self) -> Option<String> {
        self.get_token().map(|t| format!("Bearer {t}"))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    /// Copy of this client carrying a different bearer token, without
    /// touching persisted credentials.
    pub(crate) fn with_token(&self, token: Option<String>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<serde_json::Value> {
        let mut req = reqwest::Client::new().request(method.clone(), self.url(path));
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }
        if let Some(b) = body {
            req = req.json(&b);
        }

        log::debug!("{method} {path}");
        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status().as_u16();
        let text = res.text().await.map_err(ApiError::network)?;

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        normalize_response(status, body).inspect_err(|e| {
            log::warn!("{method} {path} failed ({:?}): {e}", e.status);
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<T> {
        let data = self.execute(method, path, body).await?;
        serde_json::from_value(data).map_err(ApiError::parse)
    }

    /// For endpoints whose payload the caller does not use.
    async fn send_unit(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> ApiResult<()> {
        self.execute(method, path, body).await.map(|_| ())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::GET, path, None).await
    }

    fn to_body(body: &impl Serialize) -> ApiResult<serde_json::Value> {
        serde_json::to_value(body).map_err(ApiError::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:5000/api".to_string());
        assert_eq!(client.base_url, "http://localhost:5000/api");
        assert!(client.token.is_none());
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_auth_header() {
        let mut client = ApiClient::new("http://localhost:5000/api".to_string());
        assert!(client.get_auth_header().is_none());
        client.set_token("my-jwt-token".to_string());
        assert_eq!(client.get_auth_header().as_deref(), Some("Bearer my-jwt-token"));
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_with_token_leaves_original_untouched() {
        let mut client = ApiClient::new("http://x".to_string());
        client.set_token("session".to_string());
        let scoped = client.with_token(Some("verified".to_string()));
        assert_eq!(scoped.get_token().map(String::as_str), Some("verified"));
        assert_eq!(client.get_token().map(String::as_str), Some("session"));
        assert!(client.with_token(None).get_auth_header().is_none());
    }

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("http://x/api".to_string());
        assert_eq!(client.url("/reviews/u1"), "http://x/api/reviews/u1");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }
}
