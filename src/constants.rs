/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_BACKEND_URL: &str = "https://beebot.asia";
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// Backend endpoints
pub const LOGIN_PATH: &str = "/api/v1/app/login";
pub const LOGOUT_PATH: &str = "/api/v1/app/logout";
pub const USER_PATH: &str = "/api/v1/app/user";
pub const CHANGE_LANG_PATH: &str = "/api/v1/app/change/lang";
pub const CHANGE_THEME_PATH: &str = "/api/v1/app/change/theme";
pub const CHANGE_PASSWORD_PATH: &str = "/api/v1/app/change/password";
pub const OWNER_ACCESS_PATH: &str = "/api/v1/app/user/access/owner";
pub const OWNER_ACCESS_CHECK_PATH: &str = "/api/v1/app/user/access/owner/check";
pub const OWNER_ACCESS_ENTER_PATH: &str = "/api/v1/app/user/access/owner/enter";
pub const OWNER_ACCESS_SET_PATH: &str = "/api/v1/app/user/access/owner/set";
pub const BILLS_PATH: &str = "/api/v1/app/user/bills";
pub const CASHBACK_PERIODS_PATH: &str = "/api/v1/app/user/cashbackPeriods";
pub const CASHBACKS_PATH: &str = "/api/v1/app/user/cashbacks";

// Persisted keys
pub const USER_KEY: &str = "user";
pub const LOCALE_KEY: &str = "locale";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const OWNER_ACCESS_KEY: &str = "ownerAccess";

// Restore defaults
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_DARK_MODE: bool = true;

// Validation
pub const PIN_LENGTH: usize = 6;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Permission code of brand ambassador accounts
pub const BRAND_AMBASSADOR_PERMISSION: i64 = 5;

// Literal messages shown by the screen layer
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Username or Password is Invalid";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
