//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    /// `None` runs with in-memory message/room stores
    pub database: Option<DatabaseConfig>,
    /// `None` runs with an in-memory presence store
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub hub: HubConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP/WebSocket listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on draining in-flight work after a shutdown signal
    pub shutdown_grace: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

/// Session registry tuning
#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Capacity of each session's outbound queue
    pub outbound_queue_capacity: usize,
    /// Per-frame socket write timeout in the outbound pump
    pub write_timeout: Duration,
    /// How often the server pings an otherwise quiet connection
    pub ping_interval: Duration,
    /// A connection with no inbound frame for this long is torn down
    pub idle_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            outbound_queue_capacity: default_outbound_queue_capacity(),
            write_timeout: Duration::from_secs(default_write_timeout_secs()),
            ping_interval: Duration::from_secs(default_ping_interval_secs()),
            idle_timeout: Duration::from_secs(default_idle_timeout_secs()),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "chat-server".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_outbound_queue_capacity() -> usize {
    256
}

fn default_write_timeout_secs() -> u64 {
    10
}

fn default_ping_interval_secs() -> u64 {
    45
}

fn default_idle_timeout_secs() -> u64 {
    90
}

fn default_shutdown_grace_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|s| s.parse::<u64>().map_err(|_| ConfigError::InvalidValue(key, s)))
                .transpose()
        };

        let database_url = lookup("DATABASE_URL").or_else(|| lookup("POSTGRES_URL"));
        let outbound_queue_capacity = parsed("HUB_OUTBOUND_QUEUE_CAPACITY")?
            .map_or_else(default_outbound_queue_capacity, |v| v as usize);
        if outbound_queue_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "HUB_OUTBOUND_QUEUE_CAPACITY",
                "0".to_string(),
            ));
        }

        let ping_interval_secs =
            parsed("HUB_PING_INTERVAL_SECS")?.unwrap_or_else(default_ping_interval_secs);
        if ping_interval_secs == 0 {
            return Err(ConfigError::InvalidValue("HUB_PING_INTERVAL_SECS", "0".to_string()));
        }
        let idle_timeout_secs =
            parsed("HUB_IDLE_TIMEOUT_SECS")?.unwrap_or_else(default_idle_timeout_secs);
        // Pongs must be able to arrive before the idle deadline
        if idle_timeout_secs <= ping_interval_secs {
            return Err(ConfigError::InvalidValue(
                "HUB_IDLE_TIMEOUT_SECS",
                idle_timeout_secs.to_string(),
            ));
        }
        let ping_interval = Duration::from_secs(ping_interval_secs);
        let idle_timeout = Duration::from_secs(idle_timeout_secs);

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(default_host),
                port: match lookup("PORT") {
                    Some(s) => s
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("PORT", s))?,
                    None => default_port(),
                },
                shutdown_grace: Duration::from_secs(
                    parsed("SHUTDOWN_GRACE_SECS")?.unwrap_or_else(default_shutdown_grace_secs),
                ),
            },
            database: database_url.map(|url| DatabaseConfig {
                url,
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            }),
            redis: lookup("REDIS_URL").map(|url| RedisConfig {
                url,
                max_connections: lookup("REDIS_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_redis_max_connections),
            }),
            jwt: JwtConfig {
                secret: lookup("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: lookup("JWT_ACCESS_TOKEN_EXPIRY")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_access_token_expiry),
            },
            hub: HubConfig {
                outbound_queue_capacity,
                write_timeout: Duration::from_secs(
                    parsed("HUB_WRITE_TIMEOUT_SECS")?.unwrap_or_else(default_write_timeout_secs),
                ),
                ping_interval,
                idle_timeout,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
