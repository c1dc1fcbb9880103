//! Runtime configuration from environment variables
//!
//! All knobs come from the environment (a `.env` file works via dotenv in
//! the binary): transport mode and credentials, the server base path the
//! source directories derive from, staging and export locations, and the
//! leaderboards to produce. The export backend can be switched on the
//! command line with `--backend csv|sqlite`.

use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Local,
    Ftp,
    Sftp,
}

impl TransportMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" => Some(TransportMode::Local),
            "ftp" => Some(TransportMode::Ftp),
            "sftp" => Some(TransportMode::Sftp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Local => "local",
            TransportMode::Ftp => "ftp",
            TransportMode::Sftp => "sftp",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            TransportMode::Ftp => 21,
            _ => 22,
        }
    }

    fn is_remote(&self) -> bool {
        !matches!(self, TransportMode::Local)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Csv,
    Sqlite,
}

/// One requested leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardSpec {
    Stat {
        category: String,
        subcategory: String,
    },
    AdvancementCount,
}

impl LeaderboardSpec {
    /// Parse a request of the form `category/subcategory` or the special
    /// `advancements`. A legacy `vanilla/` prefix is tolerated.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let spec = spec.strip_prefix("vanilla/").unwrap_or(spec);
        if spec == "advancements" {
            return Ok(LeaderboardSpec::AdvancementCount);
        }
        match spec.split_once('/') {
            Some((category, subcategory)) if !category.is_empty() && !subcategory.is_empty() => {
                Ok(LeaderboardSpec::Stat {
                    category: category.to_string(),
                    subcategory: subcategory.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidValue(format!(
                "leaderboard spec '{}' is not 'category/subcategory' or 'advancements'",
                spec
            ))),
        }
    }
}

/// The source locations one server exposes, derived from its base path.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub stats_dir: String,
    pub playerdata_dir: String,
    pub advancements_dir: String,
    pub usercache_path: String,
}

impl SourcePaths {
    pub fn from_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            stats_dir: format!("{}/world/stats", root),
            playerdata_dir: format!("{}/world/playerdata", root),
            advancements_dir: format!("{}/world/advancements", root),
            usercache_path: format!("{}/usercache.json", root),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: TransportMode,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Base path containing `world/` and `usercache.json` - a filesystem
    /// path in local mode, a remote path otherwise.
    pub server_root: String,
    pub staging_dir: PathBuf,
    pub backend: BackendType,
    /// CSV output directory or SQLite database path, depending on backend.
    pub export_path: PathBuf,
    /// (title, spec) pairs to rank and print.
    pub leaderboards: Vec<(String, LeaderboardSpec)>,
    pub transfer_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode_str = env::var("SOURCE_MODE")
            .map_err(|_| ConfigError::MissingVariable("SOURCE_MODE".to_string()))?;
        let mode = TransportMode::parse(&mode_str).ok_or_else(|| {
            ConfigError::InvalidValue(format!(
                "SOURCE_MODE must be local, ftp or sftp, got '{}'",
                mode_str
            ))
        })?;

        let host = env::var("SOURCE_HOST").unwrap_or_default();
        let username = env::var("SOURCE_USERNAME").unwrap_or_default();
        let password = env::var("SOURCE_PASSWORD").unwrap_or_default();
        if mode.is_remote() {
            if host.is_empty() {
                return Err(ConfigError::MissingVariable("SOURCE_HOST".to_string()));
            }
            if username.is_empty() {
                return Err(ConfigError::MissingVariable("SOURCE_USERNAME".to_string()));
            }
        }

        let port = match env::var("SOURCE_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                ConfigError::InvalidValue(format!("SOURCE_PORT '{}' is not a port number", raw))
            })?,
            Err(_) => mode.default_port(),
        };

        let server_root = env::var("SERVER_ROOT")
            .map_err(|_| ConfigError::MissingVariable("SERVER_ROOT".to_string()))?;

        let staging_dir =
            PathBuf::from(env::var("STAGING_DIR").unwrap_or_else(|_| "data".to_string()));

        let backend = parse_backend_from_args();
        let export_path = match backend {
            BackendType::Csv => {
                PathBuf::from(env::var("EXPORT_DIR").unwrap_or_else(|_| "exports".to_string()))
            }
            BackendType::Sqlite => PathBuf::from(
                env::var("CRAFTBOARD_DB_PATH").unwrap_or_else(|_| "data/craftboard.db".to_string()),
            ),
        };

        let leaderboards = parse_leaderboards(
            &env::var("LEADERBOARDS").unwrap_or_default(),
            &env::var("TITLES").unwrap_or_default(),
        )?;

        let transfer_timeout_secs = env::var("TRANSFER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            mode,
            host,
            port,
            username,
            password,
            server_root,
            staging_dir,
            backend,
            export_path,
            leaderboards,
            transfer_timeout_secs,
        })
    }

    pub fn source_paths(&self) -> SourcePaths {
        SourcePaths::from_root(&self.server_root)
    }
}

/// Pair up the comma-separated LEADERBOARDS and TITLES lists; a missing
/// title falls back to the spec string itself.
fn parse_leaderboards(
    specs: &str,
    titles: &str,
) -> Result<Vec<(String, LeaderboardSpec)>, ConfigError> {
    let titles: Vec<&str> = titles
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    specs
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, spec)| {
            let parsed = LeaderboardSpec::parse(spec)?;
            let title = titles
                .get(i)
                .map_or_else(|| spec.to_string(), |t| t.to_string());
            Ok((title, parsed))
        })
        .collect()
}

pub fn parse_backend_from_args() -> BackendType {
    let args: Vec<String> = env::args().collect();

    if let Some(idx) = args.iter().position(|x| x == "--backend") {
        match args.get(idx + 1).map(|s| s.as_str()) {
            Some("sqlite") => return BackendType::Sqlite,
            Some("csv") => return BackendType::Csv,
            _ => {}
        }
    }

    BackendType::Csv // Default to CSV
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat_spec() {
        let spec = LeaderboardSpec::parse("minecraft:custom/minecraft:jump").unwrap();
        assert_eq!(
            spec,
            LeaderboardSpec::Stat {
                category: "minecraft:custom".to_string(),
                subcategory: "minecraft:jump".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_advancements_spec_with_legacy_prefix() {
        assert_eq!(
            LeaderboardSpec::parse("vanilla/advancements").unwrap(),
            LeaderboardSpec::AdvancementCount
        );
    }

    #[test]
    fn test_parse_bad_spec_rejected() {
        assert!(LeaderboardSpec::parse("no-slash-here").is_err());
    }

    #[test]
    fn test_source_paths_from_root() {
        let paths = SourcePaths::from_root("/srv/minecraft/");
        assert_eq!(paths.stats_dir, "/srv/minecraft/world/stats");
        assert_eq!(paths.usercache_path, "/srv/minecraft/usercache.json");
    }

    #[test]
    fn test_titles_zip_with_fallback() {
        let boards = parse_leaderboards("a/b,advancements", "Jumps").unwrap();
        assert_eq!(boards[0].0, "Jumps");
        assert_eq!(boards[1].0, "advancements");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(TransportMode::parse("SFTP"), Some(TransportMode::Sftp));
        assert_eq!(TransportMode::parse("carrier-pigeon"), None);
    }
}
