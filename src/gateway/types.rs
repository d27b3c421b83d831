use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::access::OwnerAccessToken;
use crate::constants::{BILLS_PATH, CASHBACKS_PATH, CASHBACK_PERIODS_PATH};
use crate::utils::PartnerError;

/// Transport-level failure talking to the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Non-2xx response; `message` is the body's `message` field when present
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Common `{success, message}` envelope of every backend reply
pub trait Envelope {
    fn success(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

/// A 2xx response with its decoded body
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: u16,
    pub body: T,
}

impl<T> Reply<T> {
    pub fn new(status: u16, body: T) -> Self {
        Self { status, body }
    }

    /// 200 response
    pub fn ok(body: T) -> Self {
        Self::new(200, body)
    }
}

impl<T: Envelope> Reply<T> {
    /// Exactly 200 and `success: true`
    pub fn is_accepted(&self) -> bool {
        self.status == 200 && self.body.success()
    }

    /// Body of an accepted reply, or the server's message as a failure
    pub fn into_accepted(self) -> Result<T, PartnerError> {
        if self.is_accepted() {
            Ok(self.body)
        } else {
            Err(PartnerError::from_message(
                self.body.message().map(str::to_string),
            ))
        }
    }
}

macro_rules! envelope {
    ($($ty:ty),*) => {
        $(impl Envelope for $ty {
            fn success(&self) -> bool {
                self.success
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        })*
    };
}

envelope!(Ack, LoginReply, IdentityReply, IssuedReply, DataReply);

/// Login request body
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Change-password request body
#[derive(Clone, Serialize)]
pub struct PasswordChange {
    pub current: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

/// Bare `{success, message}` reply
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: Option<&str>) -> Self {
        Self {
            success: false,
            message: message.map(str::to_string),
        }
    }
}

/// Identity fields as the backend sends them
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "opaque_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default, deserialize_with = "int_or_string")]
    pub permission: Option<i64>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub gankbeebot: Option<Value>,
    #[serde(default)]
    pub campaign: Option<Value>,
    #[serde(default, rename = "totalComission")]
    pub total_commission: Option<Value>,
    #[serde(default, rename = "totalUsedVoucher")]
    pub total_used_voucher: Option<Value>,
}

/// `POST /login` reply: `{success, token, user: {...}}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

/// `GET /user` reply: identity fields sit next to `success`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IdentityReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub user: UserRecord,
}

/// PIN enter/set reply: `{success, data: token, message}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssuedReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "int_or_string")]
    pub data: Option<i64>,
}

impl IssuedReply {
    pub fn token(&self) -> OwnerAccessToken {
        OwnerAccessToken::new(self.data.unwrap_or_default())
    }
}

/// Reply carrying an opaque `data` payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// Owner-gated statement screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Bills,
    CashbackPeriods,
    Cashbacks { month: Option<String> },
}

impl Statement {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Bills => BILLS_PATH,
            Self::CashbackPeriods => CASHBACK_PERIODS_PATH,
            Self::Cashbacks { .. } => CASHBACKS_PATH,
        }
    }

    /// Query string pairs, owner token first
    pub fn query(&self, owner: OwnerAccessToken) -> Vec<(&'static str, String)> {
        let mut query = vec![("owner_token", owner.value().to_string())];
        if let Self::Cashbacks { month: Some(month) } = self {
            query.push(("month", month.clone()));
        }
        query
    }
}

/// Accepts `true`/`false` as well as `1`/`0`
fn bool_or_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        Some(Value::String(s)) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Accepts `77` as well as `"77"`
fn int_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Server identifiers are opaque; numbers are kept in their decimal form
fn opaque_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
