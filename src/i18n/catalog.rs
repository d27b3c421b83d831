use super::Locale;

/// Keys of the messages this crate produces itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    UsernameRequired,
    UsernameTooShort,
    PasswordRequired,
    EnterPin,
    FormatPin,
    PinNumber,
    EnterCurrentPassword,
    EnterNewPassword,
    EnterConfirmPassword,
    PasswordFormat,
    PasswordConfirmInvalid,
    InvalidLocale,
    OwnerAccessSuccess,
    OwnerAccessFailed,
    OwnerAccessEnabled,
    OwnerAccessDisabled,
    OwnerAccessNotExists,
    OwnerAccessRequired,
    ChangeLangSuccess,
    ChangeLangFailed,
    ChangeThemeSuccess,
    ChangeThemeFailed,
    ChangePasswordSuccess,
}

impl MessageKey {
    fn english(self) -> &'static str {
        match self {
            Self::UsernameRequired => "Username is required",
            Self::UsernameTooShort => "Username must be at least 3 characters",
            Self::PasswordRequired => "Password is required",
            Self::EnterPin => "Enter PIN",
            Self::FormatPin => "PIN must be 6 digits",
            Self::PinNumber => "PIN must contain numbers only",
            Self::EnterCurrentPassword => "Enter your current password",
            Self::EnterNewPassword => "Enter a new password",
            Self::EnterConfirmPassword => "Confirm your new password",
            Self::PasswordFormat => {
                "Password must be at least 8 characters with uppercase, lowercase and a number"
            }
            Self::PasswordConfirmInvalid => "Password confirmation does not match",
            Self::InvalidLocale => "Language must be a two-letter code",
            Self::OwnerAccessSuccess => "Owner access enabled",
            Self::OwnerAccessFailed => "Failed to enable owner access",
            Self::OwnerAccessEnabled => "Owner access is enabled",
            Self::OwnerAccessDisabled => "Owner access is disabled",
            Self::OwnerAccessNotExists => "Owner access PIN has not been created",
            Self::OwnerAccessRequired => "Owner access is required to view this page",
            Self::ChangeLangSuccess => "Language changed",
            Self::ChangeLangFailed => "Failed to change language",
            Self::ChangeThemeSuccess => "Theme changed",
            Self::ChangeThemeFailed => "Failed to change theme",
            Self::ChangePasswordSuccess => "Password changed",
        }
    }

    fn indonesian(self) -> &'static str {
        match self {
            Self::UsernameRequired => "Username wajib diisi",
            Self::UsernameTooShort => "Username minimal 3 karakter",
            Self::PasswordRequired => "Password wajib diisi",
            Self::EnterPin => "Masukkan PIN",
            Self::FormatPin => "PIN harus 6 digit",
            Self::PinNumber => "PIN hanya boleh berisi angka",
            Self::EnterCurrentPassword => "Masukkan password saat ini",
            Self::EnterNewPassword => "Masukkan password baru",
            Self::EnterConfirmPassword => "Konfirmasi password baru",
            Self::PasswordFormat => {
                "Password minimal 8 karakter dengan huruf besar, huruf kecil dan angka"
            }
            Self::PasswordConfirmInvalid => "Konfirmasi password tidak sesuai",
            Self::InvalidLocale => "Bahasa harus berupa kode dua huruf",
            Self::OwnerAccessSuccess => "Akses pemilik diaktifkan",
            Self::OwnerAccessFailed => "Gagal mengaktifkan akses pemilik",
            Self::OwnerAccessEnabled => "Akses pemilik aktif",
            Self::OwnerAccessDisabled => "Akses pemilik tidak aktif",
            Self::OwnerAccessNotExists => "PIN akses pemilik belum dibuat",
            Self::OwnerAccessRequired => "Akses pemilik diperlukan untuk membuka halaman ini",
            Self::ChangeLangSuccess => "Bahasa berhasil diubah",
            Self::ChangeLangFailed => "Gagal mengubah bahasa",
            Self::ChangeThemeSuccess => "Tema berhasil diubah",
            Self::ChangeThemeFailed => "Gagal mengubah tema",
            Self::ChangePasswordSuccess => "Password berhasil diubah",
        }
    }
}

/// Look up a message, falling back to English for tags without a table
pub fn translate(key: MessageKey, locale: &Locale) -> &'static str {
    match locale.as_str() {
        "id" => key.indonesian(),
        _ => key.english(),
    }
}
