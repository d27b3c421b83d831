use crate::constants::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use crate::gateway::{Credentials, PasswordChange};
use crate::utils::ValidationError;

/// Check login input before anything goes over the wire
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    if credentials.username.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    if credentials.username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if credentials.password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    Ok(())
}

/// At least 8 characters with a lowercase letter, an uppercase letter and a digit
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Field rules are checked in form order; the first violation wins
pub fn validate_password_change(change: &PasswordChange) -> Result<(), ValidationError> {
    if change.current.is_empty() {
        return Err(ValidationError::CurrentPasswordRequired);
    }
    if !is_strong_password(&change.current) {
        return Err(ValidationError::CurrentPasswordFormat);
    }
    if change.password.is_empty() {
        return Err(ValidationError::NewPasswordRequired);
    }
    if !is_strong_password(&change.password) {
        return Err(ValidationError::NewPasswordFormat);
    }
    if change.password_confirmation.is_empty() {
        return Err(ValidationError::ConfirmationRequired);
    }
    if change.password != change.password_confirmation {
        return Err(ValidationError::ConfirmationMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(current: &str, password: &str, confirmation: &str) -> PasswordChange {
        PasswordChange {
            current: current.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_credentials_rules() {
        assert_eq!(
            validate_credentials(&Credentials::new("", "Secret123")),
            Err(ValidationError::UsernameRequired)
        );
        assert_eq!(
            validate_credentials(&Credentials::new("ba", "Secret123")),
            Err(ValidationError::UsernameTooShort)
        );
        assert_eq!(
            validate_credentials(&Credentials::new("ba1", "")),
            Err(ValidationError::PasswordRequired)
        );
        assert_eq!(validate_credentials(&Credentials::new("ba1", "x")), Ok(()));
    }

    #[test]
    fn test_strong_password() {
        assert!(is_strong_password("Secret123"));
        assert!(!is_strong_password("secret123"));
        assert!(!is_strong_password("SECRET123"));
        assert!(!is_strong_password("SecretPwd"));
        assert!(!is_strong_password("Sec123"));
    }

    #[test]
    fn test_password_change_rules() {
        assert_eq!(
            validate_password_change(&change("", "Newpass123", "Newpass123")),
            Err(ValidationError::CurrentPasswordRequired)
        );
        assert_eq!(
            validate_password_change(&change("weak", "Newpass123", "Newpass123")),
            Err(ValidationError::CurrentPasswordFormat)
        );
        assert_eq!(
            validate_password_change(&change("Secret123", "", "")),
            Err(ValidationError::NewPasswordRequired)
        );
        assert_eq!(
            validate_password_change(&change("Secret123", "newpass", "newpass")),
            Err(ValidationError::NewPasswordFormat)
        );
        assert_eq!(
            validate_password_change(&change("Secret123", "Newpass123", "")),
            Err(ValidationError::ConfirmationRequired)
        );
        assert_eq!(
            validate_password_change(&change("Secret123", "Newpass123", "Newpass124")),
            Err(ValidationError::ConfirmationMismatch)
        );
        assert_eq!(
            validate_password_change(&change("Secret123", "Newpass123", "Newpass123")),
            Ok(())
        );
    }
}
