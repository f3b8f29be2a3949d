// Configuration lue depuis les variables d'environnement (.env)

use std::env;

use chrono::Duration;

use crate::error::{AppError, AppResult};
use crate::utils::password::DEFAULT_ITERATIONS;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub url: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Durée de validité d'un token de récupération
    pub recover_token_minutes: i64,
    /// Préfixe du lien envoyé par email (le token est ajouté à la fin)
    pub recover_uri: String,
    pub smtp: Option<SmtpConfig>,
    pub password_hash_iterations: u32,
    /// 0 = purge des tokens expirés désactivée
    pub token_purge_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Config("DATABASE_URL must be set in .env file".to_string()))?;

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("SERVER_PORT", 8080)?;

        let recover_token_minutes: i64 = parse_var("RECOVER_TOKEN_MINUTES", 30)?;
        if recover_token_minutes <= 0 {
            return Err(AppError::Config(
                "RECOVER_TOKEN_MINUTES must be greater than 0".to_string(),
            ));
        }

        let recover_uri = env::var("RECOVER_URI")
            .unwrap_or_else(|_| "http://localhost:5173/recover-password/".to_string());

        let smtp = match env::var("SMTP_URL") {
            Ok(url) => Some(SmtpConfig {
                url,
                from_address: env::var("MAIL_FROM").map_err(|_| {
                    AppError::Config("MAIL_FROM is required when SMTP_URL is set".to_string())
                })?,
            }),
            Err(_) => None,
        };

        let password_hash_iterations = parse_var("PASSWORD_HASH_ITERATIONS", DEFAULT_ITERATIONS)?;
        let token_purge_interval_secs = parse_var("TOKEN_PURGE_INTERVAL_SECS", 3600)?;

        Ok(Self {
            database_url,
            host,
            port,
            recover_token_minutes,
            recover_uri,
            smtp,
            password_hash_iterations,
            token_purge_interval_secs,
        })
    }

    pub fn recover_window(&self) -> Duration {
        Duration::minutes(self.recover_token_minutes)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_uses_default_when_missing() {
        let value: u16 = parse_var("DSCATALOG_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_recover_window_in_minutes() {
        let config = AppConfig {
            database_url: "postgres://localhost/dscatalog".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            recover_token_minutes: 45,
            recover_uri: "http://localhost/recover/".to_string(),
            smtp: None,
            password_hash_iterations: DEFAULT_ITERATIONS,
            token_purge_interval_secs: 0,
        };
        assert_eq!(config.recover_window(), Duration::minutes(45));
    }
}
