use std::path::PathBuf;

use myficdb_core::paths::ensure_directory;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after the server drains (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Directory holding the SQLite database file.
    pub data_dir: PathBuf,
    /// Directory receiving the rolling log files.
    pub logs_dir: PathBuf,
    /// SQLite busy timeout in seconds (default: `30`).
    pub sqlite_busy_timeout_secs: u64,
    /// Interval between database health checks in hours (default: `12`).
    pub db_health_interval_hours: u64,
    /// One-shot password reset applied at startup.
    pub reset_password: ResetPasswordOptions,
    /// Version information baked in at build time.
    pub build: BuildInfo,
}

/// Startup password reset, driven by `MYFICDB_RESET_PASSWORD` and
/// `MYFICDB_RESET_PASSWORD_VALUE`.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordOptions {
    pub enabled: bool,
    pub new_password: Option<String>,
}

/// Installed build details used by the update check.
#[derive(Debug, Clone, Default)]
pub struct BuildInfo {
    pub version: Option<String>,
    pub build_date: Option<String>,
    pub git_sha: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `HOST`                           | `0.0.0.0`               |
    /// | `PORT`                           | `3000`                  |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`          | `30`                    |
    /// | `MYFICDB_DB_PATH`                | `./data`                |
    /// | `MYFICDB_LOGS_PATH`              | `./logs`                |
    /// | `MYFICDB_SQLITE_COMMAND_TIMEOUT` | `30`                    |
    /// | `DB_HEALTH_INTERVAL_HOURS`       | `12`                    |
    /// | `MYFICDB_RESET_PASSWORD`         | `false`                 |
    /// | `MYFICDB_RESET_PASSWORD_VALUE`   | --                      |
    /// | `APP_VERSION`                    | --                      |
    /// | `BUILD_DATE`                     | --                      |
    /// | `GIT_SHA`                        | --                      |
    ///
    /// The data and log directories are created when missing.
    ///
    /// # Panics
    ///
    /// Panics on unparseable numbers or a directory that cannot be created
    /// or written to.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_u64("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs = env_u64("SHUTDOWN_TIMEOUT_SECS", 30);

        let jwt = JwtConfig::from_env();

        let data_dir = env_directory("MYFICDB_DB_PATH", "./data");
        let logs_dir = env_directory("MYFICDB_LOGS_PATH", "./logs");

        let sqlite_busy_timeout_secs = env_u64("MYFICDB_SQLITE_COMMAND_TIMEOUT", 30);
        let db_health_interval_hours = env_u64("DB_HEALTH_INTERVAL_HOURS", 12);
        assert!(
            db_health_interval_hours > 0,
            "DB_HEALTH_INTERVAL_HOURS must be at least 1"
        );

        let reset_password = ResetPasswordOptions {
            enabled: std::env::var("MYFICDB_RESET_PASSWORD")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            new_password: std::env::var("MYFICDB_RESET_PASSWORD_VALUE").ok(),
        };

        let build = BuildInfo {
            version: env_non_empty("APP_VERSION"),
            build_date: env_non_empty("BUILD_DATE"),
            git_sha: env_non_empty("GIT_SHA"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            data_dir,
            logs_dir,
            sqlite_busy_timeout_secs,
            db_health_interval_hours,
            reset_password,
            build,
        }
    }

    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(myficdb_db::DATABASE_FILE_NAME)
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .map(|v| {
            v.trim()
                .parse()
                .unwrap_or_else(|_| panic!("{name} must be a valid u64"))
        })
        .unwrap_or(default)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_directory(name: &str, default: &str) -> PathBuf {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    ensure_directory(&raw).unwrap_or_else(|e| panic!("{name}: {e}"))
}
