//! Process configuration, read once at startup and passed down via `AppState`.

use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ONBOARDING_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("SQUIRREL_USER_ID is not set and no SQUIRREL_ACTIVE_USER was chosen")]
    MissingUser,
    #[error("SQUIRREL_ACTIVE_USER={0} is not one of SQUIRREL_DEV_USERS")]
    UnknownTestUser(i64),
}

/// Development identity the service can act as instead of a real user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Who requests are made on behalf of.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub init_data: String,
    pub dev_bypass: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_url: String,
    pub session: Session,
    pub test_users: Vec<TestUser>,
    pub request_timeout: Duration,
    pub onboarding_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = parse_number("PORT", get("PORT"))?.unwrap_or(DEFAULT_PORT);
        let api_url = get("SQUIRREL_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let dev_bypass = get("SQUIRREL_DEV_MODE").is_some_and(|value| is_truthy(&value));
        let test_users = get("SQUIRREL_DEV_USERS")
            .map(|raw| parse_test_users(&raw))
            .unwrap_or_default();

        let active: Option<i64> = parse_number("SQUIRREL_ACTIVE_USER", get("SQUIRREL_ACTIVE_USER"))?;
        let (user_id, display_name) = match active {
            Some(id) => {
                let user = test_users
                    .iter()
                    .find(|user| user.id == id)
                    .ok_or(ConfigError::UnknownTestUser(id))?;
                (id, Some(user.first_name.clone()))
            }
            None => {
                let id = parse_number("SQUIRREL_USER_ID", get("SQUIRREL_USER_ID"))?
                    .ok_or(ConfigError::MissingUser)?;
                (id, None)
            }
        };

        let request_timeout = parse_number("SQUIRREL_TIMEOUT_SECS", get("SQUIRREL_TIMEOUT_SECS"))?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let onboarding_timeout = parse_number(
            "SQUIRREL_ONBOARDING_TIMEOUT_SECS",
            get("SQUIRREL_ONBOARDING_TIMEOUT_SECS"),
        )?
        .unwrap_or(DEFAULT_ONBOARDING_TIMEOUT_SECS);

        Ok(Self {
            port,
            api_url,
            session: Session {
                user_id,
                display_name,
                init_data: get("SQUIRREL_INIT_DATA").unwrap_or_default(),
                dev_bypass,
            },
            test_users,
            request_timeout: Duration::from_secs(request_timeout),
            onboarding_timeout: Duration::from_secs(onboarding_timeout),
        })
    }
}

/// Parses a JSON array of test users, dropping entries without a numeric id
/// or a first name.
pub fn parse_test_users(raw: &str) -> Vec<TestUser> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(err) => {
            warn!("failed to parse SQUIRREL_DEV_USERS: {err}");
            return Vec::new();
        }
    };

    values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<TestUser>(value).ok())
        .filter(|user| !user.first_name.is_empty())
        .collect()
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { key, value })
        })
        .transpose()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_user_is_set() {
        let config = config(&[("SQUIRREL_USER_ID", "1234")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.session.user_id, 1234);
        assert!(!config.session.dev_bypass);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.onboarding_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_user_is_an_error() {
        assert!(matches!(config(&[]), Err(ConfigError::MissingUser)));
    }

    #[test]
    fn bad_numbers_are_reported_by_key() {
        let err = config(&[("SQUIRREL_USER_ID", "1"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "PORT", .. }));
    }

    #[test]
    fn active_test_user_overrides_user_id() {
        let config = config(&[
            ("SQUIRREL_USER_ID", "1"),
            ("SQUIRREL_DEV_MODE", "true"),
            (
                "SQUIRREL_DEV_USERS",
                r#"[{"id": 7, "first_name": "Asha"}, {"id": "x", "first_name": "Bad"}, {"id": 8, "first_name": ""}]"#,
            ),
            ("SQUIRREL_ACTIVE_USER", "7"),
            ("SQUIRREL_API_URL", "https://finance.example/"),
        ])
        .unwrap();

        assert_eq!(config.test_users.len(), 1);
        assert_eq!(config.session.user_id, 7);
        assert_eq!(config.session.display_name.as_deref(), Some("Asha"));
        assert!(config.session.dev_bypass);
        assert_eq!(config.api_url, "https://finance.example");
    }

    #[test]
    fn active_user_must_be_known() {
        let err = config(&[("SQUIRREL_ACTIVE_USER", "99")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTestUser(99)));
    }

    #[test]
    fn malformed_test_users_parse_to_empty() {
        assert!(parse_test_users("not json").is_empty());
        assert!(parse_test_users("{}").is_empty());
    }
}
