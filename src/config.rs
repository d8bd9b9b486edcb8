use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::types::Target;

/// Environment variable consulted when a query block leaves its
/// password empty.
const PASSWORD_ENV: &str = "NXAPI_PASSWORD";

/// Top-level configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub version: u32,
    /// Base URL of the push collector. Empty means print to stdout.
    #[serde(default)]
    pub push: String,
    /// Polling interval string (e.g. "5m"). Absent means one-shot:
    /// a single sweep over all hosts, then exit.
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub nxapi: Vec<QueryBlock>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// A group of hosts sharing credentials, port and protocol.
#[derive(Debug, Deserialize, Clone)]
pub struct QueryBlock {
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub host: Vec<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        // Expand environment variables
        let expanded = expand_env_vars(&content);

        let mut config: Config = serde_yaml::from_str(&expanded)
            .with_context(|| "Failed to parse configuration")?;

        for block in config.nxapi.iter_mut() {
            block.password = resolve_password(&block.password)
                .with_context(|| format!("Resolving password for user {}", block.user))?;
        }

        Ok(config)
    }

    /// Parsed polling interval, or `None` in one-shot mode.
    pub fn poll_interval(&self) -> Result<Option<Duration>> {
        if self.interval.is_empty() {
            return Ok(None);
        }
        parse_interval(&self.interval)
            .map(Some)
            .with_context(|| format!("Parsing interval: {}", self.interval))
    }

    /// Total number of hosts across all query blocks.
    pub fn host_count(&self) -> usize {
        self.nxapi.iter().map(|b| b.host.len()).sum()
    }

    /// Ordered (block, host) pairs in config order. One sweep
    /// dispatches a query round to each of these exactly once.
    pub fn targets(&self) -> Vec<Target> {
        self.nxapi
            .iter()
            .flat_map(|block| {
                block.host.iter().map(move |host| Target {
                    host: host.clone(),
                    user: block.user.clone(),
                    password: block.password.clone(),
                    port: block.port,
                    protocol: block.protocol.clone(),
                })
            })
            .collect()
    }

    /// Startup validation: a schedule cannot be computed for an empty
    /// host list, so that is fatal before the scheduler ever runs.
    pub fn validate(&self) -> Result<()> {
        if self.host_count() == 0 {
            bail!("No hosts found, please add hosts for querying");
        }
        self.poll_interval()?;
        Ok(())
    }
}

/// Resolve a password value: `@path` reads the (trimmed) file
/// contents, an empty value falls back to $NXAPI_PASSWORD, anything
/// else is taken literally.
fn resolve_password(raw: &str) -> Result<String> {
    if let Some(path) = raw.strip_prefix('@') {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read password file: {}", path))?;
        return Ok(content.trim_end().to_string());
    }
    if raw.is_empty() {
        return Ok(std::env::var(PASSWORD_ENV).unwrap_or_default());
    }
    Ok(raw.to_string())
}

/// Parse a Go-style duration string: decimal value plus unit, e.g.
/// "90s", "5m", "1.5h". Multiple segments may be concatenated
/// ("1h30m").
pub fn parse_interval(s: &str) -> Result<Duration> {
    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if num_end == 0 {
            bail!("expected a number in duration: {}", s);
        }
        let value: f64 = rest[..num_end].parse()?;
        let unit_end = rest[num_end..]
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .map(|i| num_end + i)
            .unwrap_or(rest.len());
        let secs = match &rest[num_end..unit_end] {
            "ms" => value / 1000.0,
            "s" => value,
            "m" => value * 60.0,
            "h" => value * 3600.0,
            unit => bail!("unknown duration unit {:?} in {}", unit, s),
        };
        total += Duration::from_secs_f64(secs);
        rest = &rest[unit_end..];
    }
    if total.is_zero() {
        bail!("interval must be greater than zero");
    }
    Ok(total)
}

/// Expand ${ENV_VAR} references in config string
fn expand_env_vars(input: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    })
    .to_string()
}

fn default_port() -> u16 { 443 }
fn default_protocol() -> String { "https".to_string() }
fn default_log_level() -> String { "info".to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn defaults_applied_per_block() {
        let cfg = parse(
            "nxapi:\n  - user: admin\n    password: secret\n    host: [sw1, sw2]\n",
        );
        assert_eq!(cfg.nxapi[0].port, 443);
        assert_eq!(cfg.nxapi[0].protocol, "https");
        assert_eq!(cfg.host_count(), 2);
        assert!(cfg.push.is_empty());
    }

    #[test]
    fn targets_preserve_config_order() {
        let cfg = parse(
            "nxapi:\n  - user: a\n    password: p\n    host: [sw1, sw2]\n  - user: b\n    password: p\n    host: [sw3]\n    port: 8443\n",
        );
        let targets = cfg.targets();
        let hosts: Vec<&str> = targets.iter().map(|t| t.host.as_str()).collect();
        assert_eq!(hosts, ["sw1", "sw2", "sw3"]);
        assert_eq!(targets[2].port, 8443);
        assert_eq!(targets[2].user, "b");
    }

    #[test]
    fn zero_hosts_is_fatal() {
        let cfg = parse("nxapi: []\n");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn absent_interval_means_one_shot() {
        let cfg = parse("nxapi:\n  - user: a\n    password: p\n    host: [sw1]\n");
        assert!(cfg.poll_interval().unwrap().is_none());
    }

    #[test]
    fn interval_parsing() {
        assert_eq!(parse_interval("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_interval("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_interval("5x").is_err());
        assert!(parse_interval("").is_err());
    }

    #[test]
    fn endpoint_formats_from_block_fields() {
        let cfg = parse("nxapi:\n  - user: a\n    password: p\n    host: [sw1]\n");
        assert_eq!(cfg.targets()[0].endpoint(), "https://sw1:443/ins");
    }
}
