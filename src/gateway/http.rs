use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::traits::Backend;
use super::types::{
    Ack, Credentials, DataReply, GatewayError, IdentityReply, IssuedReply, LoginReply,
    PasswordChange, Reply, Statement,
};
use crate::access::{OwnerAccessToken, Pin};
use crate::constants::{
    CHANGE_LANG_PATH, CHANGE_PASSWORD_PATH, CHANGE_THEME_PATH, LOGIN_PATH, LOGOUT_PATH,
    OWNER_ACCESS_CHECK_PATH, OWNER_ACCESS_ENTER_PATH, OWNER_ACCESS_PATH, OWNER_ACCESS_SET_PATH,
    USER_PATH,
};
use crate::i18n::Locale;

/// reqwest-backed backend client, one per process
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway for `base_url` with JSON headers and a cookie store
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Use a custom HTTP client (for connection pool reuse or testing)
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    fn post(&self, path: &str, token: &str, body: &Value) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token).json(body)
    }

    /// Send a request and decode a 2xx body; other statuses become `GatewayError::Status`
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Reply<T>, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        debug!("backend replied {} ({} bytes)", status, text.len());
        decode_reply(status, &text)
    }
}

/// Turn a raw status and body into a typed reply
fn decode_reply<T: DeserializeOwned>(status: u16, text: &str) -> Result<Reply<T>, GatewayError> {
    if !(200..300).contains(&status) {
        return Err(GatewayError::Status {
            status,
            message: error_message(text),
        });
    }

    let body = serde_json::from_str(text).map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(Reply::new(status, body))
}

/// `message` field of an error body, if the body is JSON and carries one
fn error_message(text: &str) -> Option<String> {
    serde_json::from_str::<Value>(text)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl Backend for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> Result<Reply<LoginReply>, GatewayError> {
        self.send(self.client.post(self.url(LOGIN_PATH)).json(credentials))
            .await
    }

    async fn logout(&self, token: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url(LOGOUT_PATH))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(GatewayError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            })
        }
    }

    async fn fetch_user(&self, token: &str) -> Result<Reply<IdentityReply>, GatewayError> {
        self.send(self.get(USER_PATH, token)).await
    }

    async fn change_locale(
        &self,
        token: &str,
        locale: &Locale,
    ) -> Result<Reply<Ack>, GatewayError> {
        let body = json!({ "lang": locale.as_str() });
        self.send(self.post(CHANGE_LANG_PATH, token, &body)).await
    }

    async fn change_theme(&self, token: &str, dark_mode: bool) -> Result<Reply<Ack>, GatewayError> {
        let body = json!({ "theme": u8::from(dark_mode) });
        self.send(self.post(CHANGE_THEME_PATH, token, &body)).await
    }

    async fn change_password(
        &self,
        token: &str,
        change: &PasswordChange,
    ) -> Result<Reply<Ack>, GatewayError> {
        let request = self
            .client
            .post(self.url(CHANGE_PASSWORD_PATH))
            .bearer_auth(token)
            .json(change);
        self.send(request).await
    }

    async fn owner_pin_exists(&self, token: &str) -> Result<Reply<Ack>, GatewayError> {
        self.send(self.get(OWNER_ACCESS_PATH, token)).await
    }

    async fn check_owner_token(
        &self,
        token: &str,
        owner: OwnerAccessToken,
    ) -> Result<Reply<Ack>, GatewayError> {
        // The held unlock token travels in the `pin` field
        let body = json!({ "pin": owner.value() });
        self.send(self.post(OWNER_ACCESS_CHECK_PATH, token, &body))
            .await
    }

    async fn enter_owner_pin(
        &self,
        token: &str,
        pin: &Pin,
    ) -> Result<Reply<IssuedReply>, GatewayError> {
        let body = json!({ "pin": pin.as_str() });
        self.send(self.post(OWNER_ACCESS_ENTER_PATH, token, &body))
            .await
    }

    async fn set_owner_pin(
        &self,
        token: &str,
        pin: &Pin,
    ) -> Result<Reply<IssuedReply>, GatewayError> {
        let body = json!({ "pin": pin.as_str() });
        self.send(self.post(OWNER_ACCESS_SET_PATH, token, &body))
            .await
    }

    async fn fetch_statement(
        &self,
        token: &str,
        statement: &Statement,
        owner: OwnerAccessToken,
    ) -> Result<Reply<DataReply>, GatewayError> {
        let request = self
            .get(statement.path(), token)
            .query(&statement.query(owner));
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let gateway = HttpGateway::with_client("https://beebot.asia/", Client::new());
        assert_eq!(gateway.base_url(), "https://beebot.asia");
        assert_eq!(
            gateway.url(LOGIN_PATH),
            "https://beebot.asia/api/v1/app/login"
        );
    }

    #[test]
    fn test_unauthorized_keeps_status() {
        let err = decode_reply::<LoginReply>(401, r#"{"message":"Unauthenticated."}"#).unwrap_err();
        assert_eq!(
            err,
            GatewayError::Status {
                status: 401,
                message: Some("Unauthenticated.".to_string())
            }
        );
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_error_body_without_message() {
        let err = decode_reply::<Ack>(500, "<html>oops</html>").unwrap_err();
        assert_eq!(
            err,
            GatewayError::Status {
                status: 500,
                message: None
            }
        );
    }

    #[test]
    fn test_malformed_success_body() {
        let err = decode_reply::<Ack>(200, "not json").unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn test_decodes_success_body() {
        let reply = decode_reply::<Ack>(200, r#"{"success":true}"#).unwrap();
        assert!(reply.is_accepted());
    }
}
