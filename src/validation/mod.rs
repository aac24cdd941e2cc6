// Input validation rules for user-supplied form fields
pub mod credentials;
pub mod phone;

pub use credentials::{validate_login, validate_name, validate_password, CredentialError};
pub use phone::{normalize, PhoneError};
