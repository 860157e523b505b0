/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity-provider settings consumed by the bearer gate.
///
/// Built once at startup and handed to `AuthService::new`; nothing reads these
/// from the environment after that.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwks_uri: Url,
    pub issuer: String,
    pub audience: String,
    // None = transport default (no overall deadline)
    pub jwks_fetch_timeout: Option<Duration>,
}

/// Cross-cutting HTTP limits applied around the whole router.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub http: HttpLimits,
    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let defaults = HttpLimits::default();
        let http = HttpLimits {
            request_timeout: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            body_limit_bytes: std::env::var("REQUEST_BODY_LIMIT_BYTES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.body_limit_bytes),
        };

        let database_url = required("DATABASE_URL")?;

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let app_env = AppEnv::from_env();

        let cors_allowed_origins =
            split_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let auth = AuthConfig::from_parts(
            &required("AUTH0_JWKS_URI")?,
            required("AUTH0_ISSUER")?,
            required("AUTH0_AUDIENCE")?,
            std::env::var("JWKS_FETCH_TIMEOUT_SECONDS").ok().as_deref(),
        )?;

        Ok(Self {
            addr,
            http,
            database_url,
            database_max_connections,
            app_env,
            cors_allowed_origins,
            auth,
        })
    }
}

impl AuthConfig {
    fn from_parts(
        jwks_uri: &str,
        issuer: String,
        audience: String,
        fetch_timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let jwks_uri = Url::parse(jwks_uri.trim()).map_err(|_| ConfigError::Invalid("AUTH0_JWKS_URI"))?;
        if !matches!(jwks_uri.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("AUTH0_JWKS_URI"));
        }

        let jwks_fetch_timeout = match fetch_timeout_secs.map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS"))?;
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            jwks_uri,
            issuer,
            audience,
            jwks_fetch_timeout,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
