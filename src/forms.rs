//! Login and registration forms.
//!
//! Forms validate their fields before touching the store, then submit through
//! the [`SessionContext`]. Store rejections that a user can cause come back as
//! inline messages; anything else stays a [`JsonLandError`] for the caller to
//! report.
//!
//! # Examples
//!
//! ```
//! use jsonland::forms::{FormError, LoginForm};
//!
//! let form = LoginForm { email: "a@x.com".into(), password: String::new() };
//! let err = form.validate().unwrap_err();
//! assert_eq!(err.inline_message().as_deref(), Some("Email and password are required"));
//! ```

use crate::domain::error::JsonLandError;
use crate::domain::Account;
use crate::session::SessionContext;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::Path;
use thiserror::Error;

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const INVALID_PHOTO: &str = "Please upload a valid image file";

const IMAGE_DATA_URI_PREFIX: &str = "data:image/";

/// Why a form submission did not go through.
#[derive(Debug, Error)]
pub enum FormError {
    /// A field failed validation; nothing reached the store.
    #[error("{0}")]
    Invalid(&'static str),

    /// The store rejected or failed the operation.
    #[error(transparent)]
    Store(#[from] JsonLandError),
}

impl FormError {
    /// The message to show next to the form, if the user can act on it.
    ///
    /// Returns `None` for storage and I/O failures.
    #[must_use]
    pub fn inline_message(&self) -> Option<String> {
        match self {
            Self::Invalid(message) => Some((*message).to_string()),
            Self::Store(e) if e.is_user_facing() => Some(e.to_string()),
            Self::Store(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// [`FormError::Invalid`] when either field is empty.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(FormError::Invalid(CREDENTIALS_REQUIRED));
        }
        Ok(())
    }

    /// Validates and logs in, caching the account in `session`.
    ///
    /// # Errors
    ///
    /// Validation failures, or the store's error (e.g. invalid credentials).
    pub fn submit<'s>(&self, session: &'s mut SessionContext) -> Result<&'s Account, FormError> {
        self.validate()?;
        Ok(session.login(&self.email, &self.password)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Image data URI, usually produced by [`photo_from_file`].
    pub photo: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// [`FormError::Invalid`] when any field is empty or the photo is not an
    /// image data URI.
    pub fn validate(&self) -> Result<(), FormError> {
        let fields = [&self.username, &self.email, &self.password, &self.photo];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(FormError::Invalid(ALL_FIELDS_REQUIRED));
        }
        if !self.photo.starts_with(IMAGE_DATA_URI_PREFIX) {
            return Err(FormError::Invalid(INVALID_PHOTO));
        }
        Ok(())
    }

    /// Validates and registers, caching the new account in `session`.
    ///
    /// # Errors
    ///
    /// Validation failures, or the store's error (e.g. duplicate email).
    pub fn submit<'s>(&self, session: &'s mut SessionContext) -> Result<&'s Account, FormError> {
        self.validate()?;
        Ok(session.register(&self.username, &self.email, &self.password, &self.photo)?)
    }
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => return None,
    };
    Some(mime)
}

/// Reads an image file into a base64 data URI.
///
/// # Errors
///
/// - [`FormError::Invalid`] with [`INVALID_PHOTO`] if the extension is not a
///   known image type
/// - [`FormError::Store`] wrapping the I/O error if the file cannot be read
pub fn photo_from_file(path: impl AsRef<Path>) -> Result<String, FormError> {
    let path = path.as_ref();
    let _span = tracing::debug_span!("photo_from_file", path = %path.display()).entered();

    let mime = image_mime(path).ok_or(FormError::Invalid(INVALID_PHOTO))?;
    let bytes = std::fs::read(path).map_err(JsonLandError::from)?;
    tracing::debug!(bytes = bytes.len(), mime, "encoded photo");

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserStore;
    use crate::storage::MemoryStore;
    use std::io::Write;
    use std::sync::Arc;

    const PHOTO: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn session() -> SessionContext {
        SessionContext::new(UserStore::new(Arc::new(MemoryStore::default())))
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "p".to_string(),
            photo: PHOTO.to_string(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            email: String::new(),
            password: "p".to_string(),
        };
        assert!(matches!(form.validate(), Err(FormError::Invalid(CREDENTIALS_REQUIRED))));
    }

    #[test]
    fn register_requires_every_field() {
        let form = RegisterForm {
            username: String::new(),
            ..register_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.inline_message().as_deref(), Some(ALL_FIELDS_REQUIRED));
    }

    #[test]
    fn register_rejects_non_image_photo() {
        let form = RegisterForm {
            photo: "data:text/plain;base64,aGk=".to_string(),
            ..register_form()
        };
        assert!(matches!(form.validate(), Err(FormError::Invalid(INVALID_PHOTO))));
    }

    #[test]
    fn invalid_form_never_reaches_store() {
        let mut session = session();
        let form = RegisterForm {
            password: String::new(),
            ..register_form()
        };
        assert!(form.submit(&mut session).is_err());
        assert!(session.store().accounts().unwrap().is_empty());
    }

    #[test]
    fn store_rejections_become_inline_messages() {
        let mut session = session();
        register_form().submit(&mut session).unwrap();

        let err = register_form().submit(&mut session).unwrap_err();
        assert_eq!(
            err.inline_message().as_deref(),
            Some("User already exists with this email")
        );

        let login = LoginForm {
            email: "a@x.com".to_string(),
            password: "wrong".to_string(),
        };
        let err = login.submit(&mut session).unwrap_err();
        assert_eq!(err.inline_message().as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn successful_login_caches_account() {
        let mut session = session();
        register_form().submit(&mut session).unwrap();
        session.logout();

        let login = LoginForm {
            email: "a@x.com".to_string(),
            password: "p".to_string(),
        };
        assert_eq!(login.submit(&mut session).unwrap().username, "alice");
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("a@x.com"));
    }

    #[test]
    fn storage_failures_have_no_inline_message() {
        let err = FormError::Store(JsonLandError::Storage("disk full".to_string()));
        assert_eq!(err.inline_message(), None);
    }

    #[test]
    fn photo_from_file_builds_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.PNG");
        std::fs::File::create(&path).unwrap().write_all(b"hi").unwrap();

        let uri = photo_from_file(&path).unwrap();
        assert_eq!(uri, "data:image/png;base64,aGk=");

        let form = RegisterForm {
            photo: uri,
            ..register_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn photo_from_file_rejects_other_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(matches!(photo_from_file(&path), Err(FormError::Invalid(INVALID_PHOTO))));
    }

    #[test]
    fn photo_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = photo_from_file(dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, FormError::Store(JsonLandError::Io(_))));
        assert_eq!(err.inline_message(), None);
    }
}
