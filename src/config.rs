use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TOKEN_EXPIRATION_DAYS: i64 = 7;
/// Roughly a century; keeps token expiry far inside chrono's range
pub const MAX_TOKEN_EXPIRATION_DAYS: i64 = 36_500;
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@vwashlaundry.co.ke";
pub const DEFAULT_ADMIN_NAME: &str = "Admin";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Credentials of the account created at startup when no admin with that email exists
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Process-wide settings read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// In-memory storage when unset
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_expiration_days: i64,
    pub admin: AdminSeed,
    /// Permissive CORS when unset
    pub cors_allowed_origins: Option<Vec<String>>,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "Ignoring unreadable .env file"),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let token_expiration_days = match get("TOKEN_EXPIRATION_DAYS") {
            Some(value) => match value.trim().parse::<i64>() {
                Ok(days) if (1..=MAX_TOKEN_EXPIRATION_DAYS).contains(&days) => days,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "TOKEN_EXPIRATION_DAYS",
                        value,
                    })
                }
            },
            None => DEFAULT_TOKEN_EXPIRATION_DAYS,
        };

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let admin = AdminSeed {
            email: get("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            name: get("ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
            password: get("ADMIN_PASSWORD").ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|value| {
            value
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect::<Vec<String>>()
        });

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            token_expiration_days,
            admin,
            cors_allowed_origins,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [("JWT_SECRET", "s3cret"), ("ADMIN_PASSWORD", "admin123")];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.token_expiration_days, 7);
        assert_eq!(config.admin.email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(config.admin.name, "Admin");
        assert!(config.database_url.is_none());
        assert!(config.cors_allowed_origins.is_none());
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(
            load(&[("ADMIN_PASSWORD", "admin123")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            load(&[("JWT_SECRET", "s3cret"), ("ADMIN_PASSWORD", "  ")]).unwrap_err(),
            ConfigError::Missing("ADMIN_PASSWORD")
        );
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("TOKEN_EXPIRATION_DAYS", "30"),
            ("DATABASE_URL", "postgres://localhost/vwash"),
            ("CORS_ALLOWED_ORIGINS", "https://vwash.co.ke, http://localhost:5173,"),
            ("STATIC_DIR", "public"),
        ]);

        let config = load(&vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_expiration_days, 30);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/vwash")
        );
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec![
                "https://vwash.co.ke".to_string(),
                "http://localhost:5173".to_string()
            ])
        );
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_invalid_numbers() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));

        let mut vars = REQUIRED.to_vec();
        vars.push(("TOKEN_EXPIRATION_DAYS", "0"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid {
                name: "TOKEN_EXPIRATION_DAYS",
                ..
            })
        ));
    }

    #[test]
    fn test_token_expiration_upper_bound() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TOKEN_EXPIRATION_DAYS", "36500"));
        assert_eq!(
            load(&vars).unwrap().token_expiration_days,
            MAX_TOKEN_EXPIRATION_DAYS
        );

        for days in ["36501", "100000000"] {
            let mut vars = REQUIRED.to_vec();
            vars.push(("TOKEN_EXPIRATION_DAYS", days));
            assert_eq!(
                load(&vars).unwrap_err(),
                ConfigError::Invalid {
                    name: "TOKEN_EXPIRATION_DAYS",
                    value: days.to_string(),
                }
            );
        }
    }
}
