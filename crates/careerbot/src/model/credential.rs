//! API key resolution
//!
//! The key comes from the environment variable named in the config, which a
//! `.env` file may supply. When it is missing, the front end gets one chance
//! to ask the user for it.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CareerBotError, Result};

/// A non-empty API key; never printed by `Debug`
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank values
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Load variables from a `.env` file into the process environment
///
/// With no explicit path, searches the working directory and its ancestors.
/// Variables that are already set keep their values. Returns the file that
/// was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
            None
        }
    }
}

/// Read the key from `env_var`, falling back to `ask`
///
/// `ask` receives the variable name so it can tell the user what is missing.
/// Returns [`CareerBotError::MissingCredential`] if neither source yields a
/// non-blank key.
pub fn resolve_api_key<F>(env_var: &str, ask: F) -> Result<ApiKey>
where
    F: FnOnce(&str) -> std::io::Result<Option<String>>,
{
    resolve_from(env::var(env_var).ok(), env_var, ask)
}

fn resolve_from<F>(from_env: Option<String>, env_var: &str, ask: F) -> Result<ApiKey>
where
    F: FnOnce(&str) -> std::io::Result<Option<String>>,
{
    if let Some(key) = from_env.and_then(ApiKey::new) {
        tracing::debug!("Using API key from {}", env_var);
        return Ok(key);
    }

    tracing::warn!("{} not set, asking for an API key", env_var);
    match ask(env_var)?.and_then(ApiKey::new) {
        Some(key) => Ok(key),
        None => Err(CareerBotError::MissingCredential(format!(
            "{env_var} is not set in the environment or .env file and no API key was entered"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_blank() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert_eq!(ApiKey::new("  abc \n").unwrap().expose(), "abc");
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret").unwrap();
        assert!(!format!("{key:?}").contains("super-secret"));
    }

    #[test]
    fn test_env_value_wins_without_asking() {
        let key = resolve_from(Some("from-env".to_string()), "X_KEY", |_| {
            panic!("should not ask when env is set")
        })
        .unwrap();
        assert_eq!(key.expose(), "from-env");
    }

    #[test]
    fn test_blank_env_falls_back_to_prompt() {
        let key = resolve_from(Some("  ".to_string()), "X_KEY", |name| {
            assert_eq!(name, "X_KEY");
            Ok(Some("typed".to_string()))
        })
        .unwrap();
        assert_eq!(key.expose(), "typed");
    }

    #[test]
    fn test_no_value_anywhere_is_missing_credential() {
        let err = resolve_from(None, "X_KEY", |_| Ok(None)).unwrap_err();
        assert!(matches!(err, CareerBotError::MissingCredential(_)));
        assert!(err.to_string().contains("X_KEY"));

        let err = resolve_from(None, "X_KEY", |_| Ok(Some(String::new()))).unwrap_err();
        assert!(matches!(err, CareerBotError::MissingCredential(_)));
    }

    #[test]
    fn test_prompt_io_error_propagates() {
        let err = resolve_from(None, "X_KEY", |_| {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed"))
        })
        .unwrap_err();
        assert!(matches!(err, CareerBotError::Io(_)));
    }

    #[test]
    fn test_env_file_supplies_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "CAREERBOT_TEST_DOTENV_KEY=from-dotenv\n").unwrap();

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));
        let key = resolve_api_key("CAREERBOT_TEST_DOTENV_KEY", |_| {
            panic!("should not ask when .env provides the key")
        })
        .unwrap();
        assert_eq!(key.expose(), "from-dotenv");
        unsafe { env::remove_var("CAREERBOT_TEST_DOTENV_KEY") };
    }

    #[test]
    fn test_env_file_does_not_override_environment() {
        unsafe { env::set_var("CAREERBOT_TEST_DOTENV_SET", "from-env") };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "CAREERBOT_TEST_DOTENV_SET=from-file\n").unwrap();

        load_env_file(Some(&path));
        assert_eq!(env::var("CAREERBOT_TEST_DOTENV_SET").unwrap(), "from-env");
        unsafe { env::remove_var("CAREERBOT_TEST_DOTENV_SET") };
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_env_file(Some(&dir.path().join(".env"))), None);
    }

    #[test]
    fn test_resolve_api_key_reads_environment() {
        unsafe { env::set_var("CAREERBOT_TEST_CREDENTIAL_KEY", "env-key") };
        let key = resolve_api_key("CAREERBOT_TEST_CREDENTIAL_KEY", |_| Ok(None)).unwrap();
        assert_eq!(key.expose(), "env-key");
        unsafe { env::remove_var("CAREERBOT_TEST_CREDENTIAL_KEY") };
    }
}
