use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::dispatcher::DispatchConfig;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            batch: BatchConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "ORDER_PACKER_API_HOST";
    const PORT_VAR: &'static str = "ORDER_PACKER_API_PORT";

    fn from_env() -> Self {
        Self::from_values(env_string(Self::HOST_VAR), env_string(Self::PORT_VAR))
    }

    fn from_values(host: Option<String>, port: Option<String>) -> Self {
        let host_value = host.unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, effective_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                log::warn!(
                    "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match port {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    log::warn!(
                        "⚠️ {} must not be 0. Using {}.",
                        Self::PORT_VAR,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    log::warn!(
                        "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                        Self::PORT_VAR,
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host: effective_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    /// Checks whether the hostname matches the default value.
    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

/// Configuration for batch packing.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    dispatch: DispatchConfig,
    report_excluded: bool,
}

impl BatchConfig {
    const MAX_WORKERS_VAR: &'static str = "ORDER_PACKER_MAX_WORKERS";
    const REPORT_EXCLUDED_VAR: &'static str = "ORDER_PACKER_REPORT_EXCLUDED";
    pub const DEFAULT_REPORT_EXCLUDED: bool = true;

    /// Creates a batch configuration from explicit values.
    pub fn new(dispatch: DispatchConfig, report_excluded: bool) -> Self {
        Self {
            dispatch,
            report_excluded,
        }
    }

    fn from_env() -> Self {
        Self::from_values(
            env_string(Self::MAX_WORKERS_VAR),
            env_string(Self::REPORT_EXCLUDED_VAR),
        )
    }

    fn from_values(max_workers: Option<String>, report_excluded: Option<String>) -> Self {
        let max_workers = parse_usize_with_warning(
            max_workers,
            Self::MAX_WORKERS_VAR,
            DispatchConfig::DEFAULT_MAX_WORKERS,
            |value| value >= 1,
            "must be at least 1",
            "Warning: Adjusted worker count changes how many orders are packed in parallel",
        );

        let report_excluded = report_excluded
            .and_then(|raw| parse_bool(&raw, Self::REPORT_EXCLUDED_VAR))
            .unwrap_or(Self::DEFAULT_REPORT_EXCLUDED);

        Self::new(
            DispatchConfig::builder().max_workers(max_workers).build(),
            report_excluded,
        )
    }

    /// Returns the configured DispatchConfig.
    pub fn dispatch_config(&self) -> DispatchConfig {
        self.dispatch
    }

    /// Whether responses list products that fit no box.
    pub fn report_excluded(&self) -> bool {
        self.report_excluded
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            report_excluded: Self::DEFAULT_REPORT_EXCLUDED,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            log::warn!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name,
                err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            log::warn!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name,
                other
            );
            None
        }
    }
}

fn parse_usize_with_warning(
    raw: Option<String>,
    var_name: &str,
    default: usize,
    validator: impl Fn(usize) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> usize {
    match raw {
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) => {
                if !validator(value) {
                    log::warn!(
                        "⚠️ {} contains invalid value '{}': {}. Using {}.",
                        var_name,
                        raw,
                        invalid_hint,
                        default
                    );
                    default
                } else {
                    if value != default {
                        log::info!("⚠️ {} ({} = {}).", warning, var_name, value);
                    }
                    value
                }
            }
            Err(err) => {
                log::warn!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name,
                    raw,
                    err,
                    default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_workers(raw: Option<&str>) -> usize {
        parse_usize_with_warning(
            raw.map(str::to_string),
            "TEST_VAR",
            10,
            |value| value >= 1,
            "must be at least 1",
            "Warning",
        )
    }

    #[test]
    fn test_parse_bool_true_values() {
        assert_eq!(parse_bool("1", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("true", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("yes", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("y", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("on", "TEST_VAR"), Some(true));

        // Test case insensitivity
        assert_eq!(parse_bool("TRUE", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("ON", "TEST_VAR"), Some(true));

        // Test with whitespace
        assert_eq!(parse_bool(" true ", "TEST_VAR"), Some(true));
    }

    #[test]
    fn test_parse_bool_false_values() {
        assert_eq!(parse_bool("0", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("false", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("no", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("n", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("off", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool(" FALSE ", "TEST_VAR"), Some(false));
    }

    #[test]
    fn test_parse_bool_invalid_values() {
        assert_eq!(parse_bool("invalid", "TEST_VAR"), None);
        assert_eq!(parse_bool("2", "TEST_VAR"), None);
        assert_eq!(parse_bool("", "TEST_VAR"), None);
    }

    #[test]
    fn worker_count_falls_back_on_bad_input() {
        assert_eq!(parse_workers(None), 10);
        assert_eq!(parse_workers(Some("4")), 4);
        assert_eq!(parse_workers(Some("0")), 10);
        assert_eq!(parse_workers(Some("-3")), 10);
        assert_eq!(parse_workers(Some("many")), 10);
    }

    #[test]
    fn api_config_defaults_and_fallbacks() {
        let config = ApiConfig::from_values(None, None);
        assert_eq!(config.port(), 8080);
        assert!(config.binds_to_all_interfaces());
        assert!(config.uses_default_host());

        let config = ApiConfig::from_values(Some("not-an-ip".into()), Some("0".into()));
        assert_eq!(config.display_host(), "0.0.0.0");
        assert_eq!(config.port(), 8080);

        let config = ApiConfig::from_values(Some("127.0.0.1".into()), Some("9090".into()));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
        assert!(!config.binds_to_all_interfaces());
    }

    #[test]
    fn batch_config_defaults() {
        let config = BatchConfig::default();
        assert!(config.report_excluded());
        assert_eq!(
            config.dispatch_config().max_workers,
            DispatchConfig::DEFAULT_MAX_WORKERS
        );
    }

    #[test]
    fn batch_config_reads_report_flag_and_workers() {
        let config = BatchConfig::from_values(Some("4".into()), Some("false".into()));
        assert!(!config.report_excluded());
        assert_eq!(config.dispatch_config().max_workers, 4);

        let config = BatchConfig::from_values(None, Some("off".into()));
        assert!(!config.report_excluded());
        assert_eq!(
            config.dispatch_config().max_workers,
            DispatchConfig::DEFAULT_MAX_WORKERS
        );

        // unreadable flag keeps the default
        let config = BatchConfig::from_values(Some("0".into()), Some("maybe".into()));
        assert!(config.report_excluded());
        assert_eq!(
            config.dispatch_config().max_workers,
            DispatchConfig::DEFAULT_MAX_WORKERS
        );
    }
}
