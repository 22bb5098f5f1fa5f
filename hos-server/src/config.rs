//! Server configuration from the environment.
//!
//! | Variable                 | Default                      |
//! |--------------------------|------------------------------|
//! | `HOS_BIND_ADDR`          | `127.0.0.1:3000`             |
//! | `OVERPASS_URL`           | the public Overpass endpoint |
//! | `HOS_STATION_DIRECTORY`  | unset (use Overpass)         |
//! | `HOS_PLAN_TIMEOUT_SECS`  | `60`                         |
//! | `HOS_LOOKUP_CONCURRENCY` | `4`                          |

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::fuel::{LocatorConfig, OverpassConfig, StationCacheConfig};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));

/// Default bound on one planning call, in seconds.
pub const DEFAULT_PLAN_TIMEOUT_SECS: u64 = 60;

/// An environment variable held a value that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub overpass: OverpassConfig,
    /// Serve stations from this JSON file instead of Overpass
    pub station_directory: Option<PathBuf>,
    pub plan_timeout: Duration,
    pub locator: LocatorConfig,
    pub cache: StationCacheConfig,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable
    /// name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_var(&lookup, "HOS_BIND_ADDR")?.unwrap_or(DEFAULT_BIND_ADDR);

        let mut overpass = OverpassConfig::default();
        if let Some(url) = lookup("OVERPASS_URL").filter(|u| !u.trim().is_empty()) {
            overpass = overpass.with_base_url(url);
        }

        let station_directory = lookup("HOS_STATION_DIRECTORY")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let plan_timeout_secs: u64 =
            parse_var(&lookup, "HOS_PLAN_TIMEOUT_SECS")?.unwrap_or(DEFAULT_PLAN_TIMEOUT_SECS);
        if plan_timeout_secs == 0 {
            return Err(ConfigError {
                var: "HOS_PLAN_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let mut locator = LocatorConfig::default();
        if let Some(concurrency) = parse_var::<usize>(&lookup, "HOS_LOOKUP_CONCURRENCY")? {
            if concurrency == 0 {
                return Err(ConfigError {
                    var: "HOS_LOOKUP_CONCURRENCY",
                    value: "0".to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            locator.concurrency = concurrency;
            overpass = overpass.with_max_concurrent(concurrency);
        }

        Ok(Self {
            bind_addr,
            overpass,
            station_directory,
            plan_timeout: Duration::from_secs(plan_timeout_secs),
            locator,
            cache: StationCacheConfig::default(),
        })
    }
}

/// Parse `var` if it is set and not blank.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError {
            var,
            value: value.clone(),
            reason: e.to_string(),
        })
}
