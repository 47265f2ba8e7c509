use std::time::Duration;

use check_tempager_3e_temperature::{
    check::{CheckConfiguration, Thresholds},
    snmp::DEFAULT_PORT,
};
use clap::Parser;

/// Checks the temperature reported by a Tempager 3E over SNMP.
#[derive(Debug, Parser)]
#[command(version, allow_negative_numbers = true)]
pub struct Args {
    /// IP address of the target unit.
    #[arg(short = 't', long, env = "TEMPAGER_TARGET", default_value = "")]
    pub target: String,

    /// SNMP community.
    #[arg(short = 'C', long, env = "TEMPAGER_COMMUNITY", default_value = "public")]
    pub community: String,

    /// Warning threshold, in degrees Celsius.
    #[arg(short = 'w', long, env = "TEMPAGER_WARNING", default_value_t = 35.0)]
    pub warning: f64,

    /// Critical threshold, in degrees Celsius.
    #[arg(short = 'c', long, env = "TEMPAGER_CRITICAL", default_value_t = 40.0)]
    pub critical: f64,

    /// SNMP agent UDP port.
    #[arg(short = 'p', long, env = "TEMPAGER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Time to wait for each response, in milliseconds.
    #[arg(long = "timeout", env = "TEMPAGER_TIMEOUT_MS", default_value_t = 2000)]
    pub timeout_ms: u64,

    /// Retransmissions before giving up on the agent.
    #[arg(short = 'r', long, env = "TEMPAGER_RETRIES", default_value_t = 3)]
    pub retries: u32,
}

impl From<Args> for CheckConfiguration {
    fn from(args: Args) -> Self {
        Self {
            target: args.target,
            community: args.community,
            thresholds: Thresholds {
                warning: args.warning,
                critical: args.critical,
            },
            port: args.port,
            timeout: Duration::from_millis(args.timeout_ms),
            retries: args.retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn short_flags() {
        let args = Args::try_parse_from([
            "check-tempager-3e-temperature",
            "-t",
            "10.0.0.5",
            "-C",
            "private",
            "-w",
            "30.5",
            "-c",
            "-2",
            "-p",
            "1161",
            "--timeout",
            "500",
            "-r",
            "0",
        ])
        .unwrap();

        let config = CheckConfiguration::from(args);
        assert_eq!(config.target, "10.0.0.5");
        assert_eq!(config.community, "private");
        assert_eq!(config.thresholds.warning, 30.5);
        assert_eq!(config.thresholds.critical, -2.0);
        assert_eq!(config.port, 1161);
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.retries, 0);
    }

    #[test]
    fn rejects_non_numeric_thresholds() {
        assert!(
            Args::try_parse_from(["check-tempager-3e-temperature", "--warning", "hot"]).is_err()
        );
    }
}
