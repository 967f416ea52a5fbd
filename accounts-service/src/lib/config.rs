use std::env;

use auth::CredentialConfig;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres URL. When absent the service keeps accounts in memory.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

/// Raw token settings as found in files or environment.
///
/// Values stay strings here so that a missing or malformed value falls back
/// to its default with a warning instead of aborting startup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub issuer: Option<String>,
    pub access_expiration_secs: Option<String>,
    pub refresh_expiration_secs: Option<String>,
}

impl JwtConfig {
    /// Resolve into the immutable signing configuration.
    ///
    /// # Security Notes
    /// Falling back to the default secret makes every issued token forgeable
    /// by anyone who knows the default. It is logged at warn level and only
    /// meant for local development.
    pub fn resolve(&self) -> CredentialConfig {
        let defaults = CredentialConfig::default();

        let issuer = match non_empty(&self.issuer) {
            Some(issuer) => issuer,
            None => {
                tracing::warn!(
                    default = %defaults.issuer,
                    "JWT issuer not configured, using default"
                );
                defaults.issuer
            }
        };

        let secret = match non_empty(&self.secret) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT secret not configured, using insecure development default");
                defaults.secret
            }
        };

        CredentialConfig {
            issuer,
            secret,
            access_ttl: resolve_lifetime(
                "access",
                self.access_expiration_secs.as_deref(),
                defaults.access_ttl,
            ),
            refresh_ttl: resolve_lifetime(
                "refresh",
                self.refresh_expiration_secs.as_deref(),
                defaults.refresh_ttl,
            ),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a lifetime in seconds. Absent, unparseable, zero or negative values
/// yield `default`.
fn resolve_lifetime(kind: &str, given: Option<&str>, default: Duration) -> Duration {
    let given = given.map(str::trim).unwrap_or_default();
    if given.is_empty() {
        tracing::warn!(
            token_type = kind,
            default = default.num_seconds(),
            "JWT expiration not configured, using default"
        );
        return default;
    }

    match given.parse::<i64>() {
        Ok(secs) if secs > 0 => match Duration::try_seconds(secs) {
            Some(lifetime) => lifetime,
            None => {
                tracing::warn!(
                    token_type = kind,
                    given,
                    default = default.num_seconds(),
                    "JWT expiration out of range, using default"
                );
                default
            }
        },
        Ok(_) => {
            tracing::warn!(
                token_type = kind,
                given,
                default = default.num_seconds(),
                "JWT expiration must be positive, using default"
            );
            default
        }
        Err(e) => {
            tracing::warn!(
                token_type = kind,
                given,
                error = %e,
                default = default.num_seconds(),
                "Invalid JWT expiration, using default"
            );
            default
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.resolve(), CredentialConfig::default());
    }

    #[test]
    fn test_explicit_values_win() {
        let config = from_toml(
            r#"
            [server]
            http_port = 9000

            [jwt]
            secret = "s3cr3t"
            issuer = "accounts"
            access_expiration_secs = 60
            refresh_expiration_secs = "600"
            "#,
        );

        let credentials = config.jwt.resolve();

        assert_eq!(config.server.http_port, 9000);
        assert_eq!(credentials.secret, "s3cr3t");
        assert_eq!(credentials.issuer, "accounts");
        assert_eq!(credentials.access_ttl, Duration::seconds(60));
        assert_eq!(credentials.refresh_ttl, Duration::seconds(600));
    }

    #[test]
    fn test_unusable_lifetimes_fall_back() {
        let jwt = JwtConfig {
            access_expiration_secs: Some("soon".to_string()),
            refresh_expiration_secs: Some("0".to_string()),
            ..Default::default()
        };

        let credentials = jwt.resolve();

        assert_eq!(credentials.access_ttl, Duration::seconds(3600));
        assert_eq!(credentials.refresh_ttl, Duration::seconds(86400));
    }

    #[test]
    fn test_negative_and_blank_values_fall_back() {
        let jwt = JwtConfig {
            secret: Some("   ".to_string()),
            issuer: Some(String::new()),
            access_expiration_secs: Some("-5".to_string()),
            refresh_expiration_secs: Some(" ".to_string()),
        };

        assert_eq!(jwt.resolve(), CredentialConfig::default());
    }
}
