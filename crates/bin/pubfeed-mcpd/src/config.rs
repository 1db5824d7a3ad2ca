use clap::{Parser, builder::BoolishValueParser};
use pubfeed_core::origin::{DEFAULT_FEED_BASE_URL, DEFAULT_FETCH_TIMEOUT};
use pubfeed_core::registry::ToolProfile;
use pubfeed_core::services::DEFAULT_CATALOG_TTL;
use pubfeed_http::{DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT};
use std::error::Error;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MODE: &str = "http";
const DEFAULT_PROFILE: &str = "catalog";

#[derive(Parser, Debug)]
#[command(name = "pubfeed-mcpd", version, about = "Pubfeed MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "PUBFEED_FEED_URL", default_value = DEFAULT_FEED_BASE_URL)]
    feed_url: String,

    #[arg(
        long,
        env = "PUBFEED_DEBUG",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    debug: bool,

    #[arg(long, env = "PUBFEED_HOST", default_value = DEFAULT_HOST)]
    host: String,

    #[arg(long, env = "PUBFEED_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, env = "PUBFEED_MODE", default_value = DEFAULT_MODE)]
    mode: String,

    #[arg(long, env = "PUBFEED_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    #[arg(
        long,
        env = "PUBFEED_CACHE_TTL_SECS",
        default_value_t = DEFAULT_CATALOG_TTL.as_secs()
    )]
    cache_ttl_secs: u64,

    #[arg(
        long,
        env = "PUBFEED_FETCH_TIMEOUT_SECS",
        default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs()
    )]
    fetch_timeout_secs: u64,

    #[arg(
        long,
        env = "PUBFEED_MAX_BODY_BYTES",
        default_value_t = DEFAULT_MAX_BODY_BYTES
    )]
    max_body_bytes: usize,
}

/// Which front end the daemon serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// REST and JSON-RPC over HTTP.
    Http,
    /// MCP over stdin/stdout.
    Stdio,
}

impl FromStr for TransportMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "stdio" => Ok(Self::Stdio),
            _ => Err(()),
        }
    }
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct PubfeedConfig {
    pub feed_url: String,
    pub debug: bool,
    pub addr: SocketAddr,
    pub mode: TransportMode,
    pub profile: ToolProfile,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub max_body_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl PubfeedConfig {
    /// Parses process arguments, falling back to `PUBFEED_*` variables.
    ///
    /// # Errors
    /// Returns `ConfigError` naming the first invalid setting.
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for PubfeedConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let feed_url = args.feed_url.trim().trim_end_matches('/').to_string();
        if feed_url.is_empty() {
            return Err(ConfigError::MissingSetting("PUBFEED_FEED_URL"));
        }
        if !(feed_url.starts_with("http://") || feed_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: "PUBFEED_FEED_URL",
                value: args.feed_url,
            });
        }

        let host: IpAddr = args
            .host
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidSetting {
                name: "PUBFEED_HOST",
                value: args.host.clone(),
            })?;

        let mode = args
            .mode
            .parse::<TransportMode>()
            .map_err(|()| ConfigError::InvalidSetting {
                name: "PUBFEED_MODE",
                value: args.mode.clone(),
            })?;

        let profile = args
            .profile
            .parse::<ToolProfile>()
            .map_err(|_| ConfigError::InvalidSetting {
                name: "PUBFEED_PROFILE",
                value: args.profile.clone(),
            })?;

        if args.cache_ttl_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "PUBFEED_CACHE_TTL_SECS",
                value: args.cache_ttl_secs.to_string(),
            });
        }
        if args.fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "PUBFEED_FETCH_TIMEOUT_SECS",
                value: args.fetch_timeout_secs.to_string(),
            });
        }

        Ok(Self {
            feed_url,
            debug: args.debug,
            addr: SocketAddr::new(host, args.port),
            mode,
            profile,
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
            max_body_bytes: args.max_body_bytes,
        })
    }
}
