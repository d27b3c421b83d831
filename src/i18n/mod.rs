// Gateway module for i18n - locale tags and the message catalog

mod catalog;
mod locale;

pub use catalog::{translate, MessageKey};
pub use locale::Locale;
