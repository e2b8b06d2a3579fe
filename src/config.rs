use std::collections::HashMap;
use std::path::Path;
use std::{env, fmt, fs, io};

use serde_json::Value;

pub const SETTINGS_FILE: &str = "appsettings.json";
pub const SETTINGS_PATH_VAR: &str = "HACKALERT_SETTINGS";

pub const EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";
pub const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const EVENTS_URL: &str = "EVENTS_URL";
pub const LOCATION_FILTER: &str = "LOCATION_FILTER";
pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const EMAIL_SUBJECT: &str = "EMAIL_SUBJECT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct EmailCredentials {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub password: Option<String>,
}

impl EmailCredentials {
    /// Names of the credential keys that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (EMAIL_SENDER, &self.sender),
            (EMAIL_RECEIVER, &self.receiver),
            (EMAIL_PASSWORD, &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(key, _)| key)
        .collect()
    }
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Configuration resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub events_url: String,
    pub location_target: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub subject: String,
    pub credentials: EmailCredentials,
}

impl Settings {
    /// Reads the process environment and the optional settings file.
    ///
    /// A settings file that cannot be read or parsed is ignored with a warning.
    pub fn load() -> Self {
        let path = env::var(SETTINGS_PATH_VAR).unwrap_or_else(|_| SETTINGS_FILE.to_string());

        let file = read_settings_file(Path::new(&path)).unwrap_or_else(|e| {
            log::warn!("Ignoring settings file {}: {}", path, e);
            HashMap::new()
        });

        Self::resolve(&file, |key| env::var(key).ok())
    }

    /// Settings file values take precedence over `env`; empty values count as absent.
    pub fn resolve<F>(file: &HashMap<String, String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            file.get(key)
                .cloned()
                .filter(|v| !v.is_empty())
                .or_else(|| env(key).filter(|v| !v.is_empty()))
        };

        let smtp_port = match lookup(SMTP_PORT) {
            Some(port) => port.trim().parse::<u16>().unwrap_or_else(|_| {
                log::warn!(
                    "Invalid {} '{}', using {}",
                    SMTP_PORT,
                    port,
                    crate::DEFAULT_SMTP_PORT
                );
                crate::DEFAULT_SMTP_PORT
            }),
            None => crate::DEFAULT_SMTP_PORT,
        };

        Self {
            events_url: lookup(EVENTS_URL).unwrap_or_else(|| crate::DEFAULT_EVENTS_URL.into()),
            location_target: lookup(LOCATION_FILTER)
                .unwrap_or_else(|| crate::DEFAULT_LOCATION_TARGET.into()),
            smtp_host: lookup(SMTP_HOST).unwrap_or_else(|| crate::DEFAULT_SMTP_HOST.into()),
            smtp_port,
            subject: lookup(EMAIL_SUBJECT).unwrap_or_else(|| crate::DEFAULT_SUBJECT.into()),
            credentials: EmailCredentials {
                sender: lookup(EMAIL_SENDER),
                receiver: lookup(EMAIL_RECEIVER),
                password: lookup(EMAIL_PASSWORD),
            },
        }
    }
}

/// Reads a flat JSON object of settings. A missing file yields no settings.
pub fn read_settings_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };

    let raw: HashMap<String, Value> = serde_json::from_str(&contents)?;

    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = Settings::resolve(&HashMap::new(), |_| None);

        assert_eq!(settings.events_url, "https://mlh.io/seasons/2024/events");
        assert_eq!(settings.location_target, "South Africa");
        assert_eq!(settings.smtp_host, "smtp.gmail.com");
        assert_eq!(settings.smtp_port, 587);
        assert_eq!(settings.subject, "Upcoming Hackathons in South Africa!");
        assert_eq!(settings.credentials, EmailCredentials::default());
        assert_eq!(
            settings.credentials.missing_fields(),
            vec![EMAIL_SENDER, EMAIL_RECEIVER, EMAIL_PASSWORD]
        );
    }

    #[test]
    fn test_reads_credentials_from_env() {
        let env = env_from(&[
            (EMAIL_SENDER, "bot@example.com"),
            (EMAIL_RECEIVER, "me@example.com"),
            (EMAIL_PASSWORD, "hunter2"),
        ]);

        let settings = Settings::resolve(&HashMap::new(), env);

        assert_eq!(
            settings.credentials.sender.as_deref(),
            Some("bot@example.com")
        );
        assert_eq!(
            settings.credentials.receiver.as_deref(),
            Some("me@example.com")
        );
        assert_eq!(settings.credentials.password.as_deref(), Some("hunter2"));
        assert!(settings.credentials.missing_fields().is_empty());
    }

    #[test]
    fn test_settings_file_overrides_env() {
        let env = env_from(&[
            (EMAIL_SENDER, "env@example.com"),
            (EMAIL_PASSWORD, "from-env"),
        ]);
        let file = HashMap::from([
            (EMAIL_SENDER.to_string(), "file@example.com".to_string()),
            (EMAIL_PASSWORD.to_string(), String::new()),
        ]);

        let settings = Settings::resolve(&file, env);

        assert_eq!(
            settings.credentials.sender.as_deref(),
            Some("file@example.com")
        );
        assert_eq!(settings.credentials.password.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_empty_values_are_missing() {
        let env = env_from(&[
            (EMAIL_SENDER, "bot@example.com"),
            (EMAIL_RECEIVER, ""),
            (EMAIL_PASSWORD, "hunter2"),
        ]);

        let settings = Settings::resolve(&HashMap::new(), env);

        assert_eq!(settings.credentials.missing_fields(), vec![EMAIL_RECEIVER]);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let env = env_from(&[(SMTP_PORT, "not-a-port")]);

        let settings = Settings::resolve(&HashMap::new(), env);

        assert_eq!(settings.smtp_port, 587);
    }

    #[test]
    fn test_overrides_optional_keys() {
        let env = env_from(&[
            (EVENTS_URL, "http://localhost:8080/events"),
            (LOCATION_FILTER, "Kenya"),
            (SMTP_HOST, "mail.example.com"),
            (SMTP_PORT, "2525"),
            (EMAIL_SUBJECT, "Hackathons"),
        ]);

        let settings = Settings::resolve(&HashMap::new(), env);

        assert_eq!(settings.events_url, "http://localhost:8080/events");
        assert_eq!(settings.location_target, "Kenya");
        assert_eq!(settings.smtp_host, "mail.example.com");
        assert_eq!(settings.smtp_port, 2525);
        assert_eq!(settings.subject, "Hackathons");
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = EmailCredentials {
            sender: Some("bot@example.com".to_string()),
            receiver: None,
            password: Some("hunter2".to_string()),
        };

        let debug = format!("{:?}", credentials);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("bot@example.com"));
    }

    #[test]
    fn test_read_missing_settings_file() {
        let settings = read_settings_file(Path::new("samples/does-not-exist.json"))
            .expect("Missing file should not be an error");

        assert!(settings.is_empty());
    }

    #[test]
    fn test_read_settings_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(
            file,
            r#"{{"EMAIL_SENDER": "bot@example.com", "SMTP_PORT": 465, "Logging": {{"LogLevel": "Info"}}}}"#
        )
        .expect("Failed to write temp file");

        let settings = read_settings_file(file.path()).expect("Failed to read settings");

        assert_eq!(
            settings.get(EMAIL_SENDER).map(String::as_str),
            Some("bot@example.com")
        );
        assert_eq!(settings.get(SMTP_PORT).map(String::as_str), Some("465"));
        assert!(!settings.contains_key("Logging"));
    }

    #[test]
    fn test_read_malformed_settings_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{{ not json").expect("Failed to write temp file");

        let result = read_settings_file(file.path());

        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
