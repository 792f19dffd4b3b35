use thiserror::Error;

use crate::auth::password::verify_password;
use crate::errors::AppError;

/// Which portal a login attempt came through. Decides the "no such user" message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portal {
    Student,
    Admin,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Student not added for placements yet; speak to your placement officer")]
    StudentNotAdded,

    #[error("Invalid usermail")]
    UnknownAdmin,

    #[error("Incorrect password")]
    IncorrectPassword,
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        AppError::InvalidCredentials(e.to_string())
    }
}

/// Checks a password against the credential row found for the email, if any.
pub fn check_credentials(
    portal: Portal,
    stored_hash: Option<&str>,
    password: &str,
) -> Result<(), LoginError> {
    let Some(hash) = stored_hash else {
        return Err(match portal {
            Portal::Student => LoginError::StudentNotAdded,
            Portal::Admin => LoginError::UnknownAdmin,
        });
    };
    if verify_password(password, hash) {
        Ok(())
    } else {
        Err(LoginError::IncorrectPassword)
    }
}

/// Lowercases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
