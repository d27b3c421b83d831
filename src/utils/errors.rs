use thiserror::Error;

use crate::constants::{INTERNAL_ERROR_MESSAGE, INVALID_CREDENTIALS_MESSAGE};
use crate::gateway::GatewayError;
use crate::i18n::{translate, Locale, MessageKey};

/// Client-side validation failures, one variant per field rule
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username is required")]
    UsernameRequired,
    #[error("username is too short")]
    UsernameTooShort,
    #[error("password is required")]
    PasswordRequired,
    #[error("PIN is required")]
    PinRequired,
    #[error("PIN must be exactly 6 characters")]
    PinLength,
    #[error("PIN must contain digits only")]
    PinNotNumeric,
    #[error("current password is required")]
    CurrentPasswordRequired,
    #[error("current password does not meet the password rules")]
    CurrentPasswordFormat,
    #[error("new password is required")]
    NewPasswordRequired,
    #[error("new password does not meet the password rules")]
    NewPasswordFormat,
    #[error("password confirmation is required")]
    ConfirmationRequired,
    #[error("password confirmation does not match")]
    ConfirmationMismatch,
    #[error("locale must be a two-letter tag")]
    InvalidLocale,
}

impl ValidationError {
    /// Form field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Self::UsernameRequired | Self::UsernameTooShort => "username",
            Self::PasswordRequired => "password",
            Self::PinRequired | Self::PinLength | Self::PinNotNumeric => "pin",
            Self::CurrentPasswordRequired | Self::CurrentPasswordFormat => "current",
            Self::NewPasswordRequired | Self::NewPasswordFormat => "password",
            Self::ConfirmationRequired | Self::ConfirmationMismatch => "password_confirmation",
            Self::InvalidLocale => "lang",
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::UsernameRequired => MessageKey::UsernameRequired,
            Self::UsernameTooShort => MessageKey::UsernameTooShort,
            Self::PasswordRequired => MessageKey::PasswordRequired,
            Self::PinRequired => MessageKey::EnterPin,
            Self::PinLength => MessageKey::FormatPin,
            Self::PinNotNumeric => MessageKey::PinNumber,
            Self::CurrentPasswordRequired => MessageKey::EnterCurrentPassword,
            Self::CurrentPasswordFormat | Self::NewPasswordFormat => MessageKey::PasswordFormat,
            Self::NewPasswordRequired => MessageKey::EnterNewPassword,
            Self::ConfirmationRequired => MessageKey::EnterConfirmPassword,
            Self::ConfirmationMismatch => MessageKey::PasswordConfirmInvalid,
            Self::InvalidLocale => MessageKey::InvalidLocale,
        }
    }

    pub fn localized(&self, locale: &Locale) -> &'static str {
        translate(self.message_key(), locale)
    }
}

/// Failure of a session or owner-access operation, as reported to the screen layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartnerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// Message reported by the backend, shown verbatim
    #[error("{0}")]
    Server(String),

    #[error("{}", INTERNAL_ERROR_MESSAGE)]
    Internal,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Owner access is locked")]
    AccessLocked,
}

impl PartnerError {
    /// Server message when one was given, generic failure otherwise
    pub fn from_message(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.trim().is_empty() => Self::Server(message),
            _ => Self::Internal,
        }
    }

    /// Text for display; validation errors are localized, server text is verbatim
    pub fn display_message(&self, locale: &Locale) -> String {
        match self {
            Self::Validation(err) => err.localized(locale).to_string(),
            Self::AccessLocked => translate(MessageKey::OwnerAccessRequired, locale).to_string(),
            other => other.to_string(),
        }
    }
}

impl From<GatewayError> for PartnerError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Status { message, .. } => Self::from_message(message),
            GatewayError::Transport(_) | GatewayError::Decode(_) => Self::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_messages() {
        assert_eq!(
            PartnerError::InvalidCredentials.to_string(),
            "Username or Password is Invalid"
        );
        assert_eq!(PartnerError::Internal.to_string(), "Internal Server Error");
        assert_eq!(
            PartnerError::Server("PIN salah".to_string()).to_string(),
            "PIN salah"
        );
    }

    #[test]
    fn test_gateway_error_mapping() {
        let with_message = GatewayError::Status {
            status: 422,
            message: Some("Wrong PIN".to_string()),
        };
        assert_eq!(
            PartnerError::from(with_message),
            PartnerError::Server("Wrong PIN".to_string())
        );

        let bare = GatewayError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(PartnerError::from(bare), PartnerError::Internal);
        assert_eq!(
            PartnerError::from(GatewayError::Transport("refused".to_string())),
            PartnerError::Internal
        );
    }

    #[test]
    fn test_blank_server_message_is_generic() {
        assert_eq!(
            PartnerError::from_message(Some("  ".to_string())),
            PartnerError::Internal
        );
    }

    #[test]
    fn test_validation_display_is_localized() {
        let err = PartnerError::from(ValidationError::PinLength);
        assert_eq!(err.display_message(&Locale::new("en")), "PIN must be 6 digits");
        assert_eq!(err.display_message(&Locale::new("id")), "PIN harus 6 digit");
    }
}
