use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{BRAND_AMBASSADOR_PERMISSION, DEFAULT_DARK_MODE};
use crate::gateway::UserRecord;
use crate::i18n::Locale;

/// Server-supplied identity fields, opaque to the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub permission: Option<i64>,
    #[serde(default)]
    pub gankbeebot: Option<Value>,
    #[serde(default)]
    pub campaign: Option<Value>,
    #[serde(default)]
    pub total_commission: Option<Value>,
    #[serde(default)]
    pub total_used_voucher: Option<Value>,
}

impl From<&UserRecord> for Profile {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            status: user.status.clone(),
            permission: user.permission,
            gankbeebot: user.gankbeebot.clone(),
            campaign: user.campaign.clone(),
            total_commission: user.total_commission.clone(),
            total_used_voucher: user.total_used_voucher.clone(),
        }
    }
}

/// A logged-in identity; holding one means holding its bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    token: String,
    profile: Profile,
}

impl Identity {
    /// `None` for an empty token, which cannot authenticate anything
    pub fn new(token: impl Into<String>, profile: Profile) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self { token, profile })
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub(crate) fn to_persisted(&self) -> PersistedUser {
        PersistedUser {
            logged_in: true,
            token: Some(self.token.clone()),
            profile: self.profile.clone(),
        }
    }

    pub(crate) fn from_persisted(user: PersistedUser) -> Option<Self> {
        if !user.logged_in {
            return None;
        }
        Self::new(user.token?, user.profile)
    }
}

/// Shape of the `user` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedUser {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Authentication and display state of the device
///
/// The token lives inside `Identity`, so "token present" and "logged in" cannot
/// disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    identity: Option<Identity>,
    locale: Option<Locale>,
    dark_mode: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            identity: None,
            locale: None,
            dark_mode: DEFAULT_DARK_MODE,
        }
    }
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(Identity::token)
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.identity.as_ref().map(Identity::profile)
    }

    pub fn permission(&self) -> Option<i64> {
        self.profile().and_then(|p| p.permission)
    }

    /// Brand ambassadors get their own dashboard
    pub fn is_brand_ambassador(&self) -> bool {
        self.permission() == Some(BRAND_AMBASSADOR_PERMISSION)
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Locale for rendering, falling back to the device locale while unset
    pub fn display_locale(&self, device: &Locale) -> Locale {
        self.locale.clone().unwrap_or_else(|| device.clone())
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub(crate) fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub(crate) fn clear_identity(&mut self) {
        self.identity = None;
    }

    pub(crate) fn set_locale(&mut self, locale: Locale) {
        self.locale = Some(locale);
    }

    pub(crate) fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }
}
