use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static LOGIN_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());
static HAS_UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static HAS_LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static HAS_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
// Latin and cyrillic letters, digits, and the permitted punctuation set.
static PASSWORD_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[a-zA-Zа-яА-Я0-9~!?@#$%^&*_\-+()\[\]{}></\\|"'.,:;]+$"#).unwrap()
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Field cannot be empty")]
    Empty,
    #[error("Login must be at least 5 characters long")]
    LoginTooShort,
    #[error("Login must consist of latin letters and digits only")]
    LoginIllegalCharacters,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Password must be at most 128 characters long")]
    PasswordTooLong,
    #[error("Password must not contain spaces")]
    PasswordContainsSpaces,
    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,
    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,
    #[error("Password must contain at least one digit")]
    PasswordMissingDigit,
    #[error("Password contains illegal characters")]
    PasswordIllegalCharacters,
    #[error("The {0} field cannot be empty")]
    NameEmpty(&'static str),
}

pub fn validate_login(login: &str) -> Result<(), CredentialError> {
    if login.is_empty() {
        return Err(CredentialError::Empty);
    }
    if login.chars().count() < 5 {
        return Err(CredentialError::LoginTooShort);
    }
    if !LOGIN_CHARS.is_match(login) {
        return Err(CredentialError::LoginIllegalCharacters);
    }
    Ok(())
}

/// Password rules are checked in a fixed order so the first failing rule
/// produces the message the user sees.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::Empty);
    }
    let length = password.chars().count();
    if length < 8 {
        return Err(CredentialError::PasswordTooShort);
    }
    if length > 128 {
        return Err(CredentialError::PasswordTooLong);
    }
    if password.contains(' ') {
        return Err(CredentialError::PasswordContainsSpaces);
    }
    if !HAS_UPPERCASE.is_match(password) {
        return Err(CredentialError::PasswordMissingUppercase);
    }
    if !HAS_LOWERCASE.is_match(password) {
        return Err(CredentialError::PasswordMissingLowercase);
    }
    if !HAS_DIGIT.is_match(password) {
        return Err(CredentialError::PasswordMissingDigit);
    }
    if !PASSWORD_CHARS.is_match(password) {
        return Err(CredentialError::PasswordIllegalCharacters);
    }
    Ok(())
}

pub fn validate_name(name: &str, field: &'static str) -> Result<(), CredentialError> {
    if name.is_empty() {
        return Err(CredentialError::NameEmpty(field));
    }
    Ok(())
}
