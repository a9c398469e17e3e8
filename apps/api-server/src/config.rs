//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "postgres")]
use scribe_infra::DatabaseConfig;
use scribe_infra::JwtConfig;

/// Credentials of the superuser created at startup when absent.
#[derive(Debug, Clone)]
pub struct FirstSuperuser {
    pub email: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Mount point of every API route, e.g. `/api/v1`.
    pub api_prefix: String,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub first_superuser: Option<FirstSuperuser>,
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
                min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
                connect_attempts: parsed("DB_CONNECT_ATTEMPTS")
                    .unwrap_or(defaults.connect_attempts),
                ..defaults
            }
        });

        let first_superuser = match (
            env::var("FIRST_SUPERUSER"),
            env::var("FIRST_SUPERUSER_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(FirstSuperuser { email, password })
            }
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            #[cfg(feature = "postgres")]
            database,
            jwt: JwtConfig::from_env(),
            first_superuser,
            cors_origins: env::var("BACKEND_CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        }
    }
}

/// Split a comma separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_origins;

    #[test]
    fn origins_are_trimmed() {
        assert_eq!(
            parse_origins("http://localhost:5173/, https://example.com ,,"),
            vec!["http://localhost:5173", "https://example.com"]
        );
        assert!(parse_origins("").is_empty());
    }
}
