//! Configuration Module
//!
//! Handles the active-expiration tuning knobs and the settings of the
//! illustrative server, loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Default cadence of the background sweep
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Default share of TTL-bearing keys sampled per sweep round
pub const DEFAULT_SAMPLE_FRACTION: f64 = 0.25;

/// Default hit ratio at or above which a sweep immediately samples again
pub const DEFAULT_HIT_THRESHOLD: f64 = 0.25;

// == Sweep Config ==
/// Tuning for the active expiration sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Time between background sweeps
    pub interval: Duration,
    /// Fraction of the TTL-bearing population sampled per round, in `(0, 1]`
    pub sample_fraction: f64,
    /// Hit ratio that triggers another round, in `(0, 1]`
    pub hit_threshold: f64,
}

impl SweepConfig {
    /// Loads sweep tuning from environment variables.
    ///
    /// # Environment Variables
    /// - `SWEEP_INTERVAL_MS` - Sweep cadence in milliseconds (default: 1000)
    /// - `SWEEP_SAMPLE_FRACTION` - Sample fraction (default: 0.25)
    /// - `SWEEP_HIT_THRESHOLD` - Re-sweep threshold (default: 0.25)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval: env_parse::<u64>("SWEEP_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            sample_fraction: env_parse("SWEEP_SAMPLE_FRACTION").unwrap_or(defaults.sample_fraction),
            hit_threshold: env_parse("SWEEP_HIT_THRESHOLD").unwrap_or(defaults.hit_threshold),
        }
        .validated()
    }

    /// Replaces out-of-range settings with their defaults.
    ///
    /// A zero interval would spin the sweeper, and ratios outside `(0, 1]`
    /// make the sample size or the re-sweep rule meaningless.
    pub fn validated(self) -> Self {
        let defaults = Self::default();

        let interval = if self.interval.is_zero() {
            warn!("Sweep interval must be positive, using {:?}", defaults.interval);
            defaults.interval
        } else {
            self.interval
        };

        let sample_fraction = if is_ratio(self.sample_fraction) {
            self.sample_fraction
        } else {
            warn!(
                "Sample fraction {} outside (0, 1], using {}",
                self.sample_fraction, defaults.sample_fraction
            );
            defaults.sample_fraction
        };

        let hit_threshold = if is_ratio(self.hit_threshold) {
            self.hit_threshold
        } else {
            warn!(
                "Hit threshold {} outside (0, 1], using {}",
                self.hit_threshold, defaults.hit_threshold
            );
            defaults.hit_threshold
        };

        Self {
            interval,
            sample_fraction,
            hit_threshold,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
            sample_fraction: DEFAULT_SAMPLE_FRACTION,
            hit_threshold: DEFAULT_HIT_THRESHOLD,
        }
    }
}

// == Server Config ==
/// Configuration of the illustrative HTTP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Active expiration tuning
    pub sweep: SweepConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - plus everything read by [`SweepConfig::from_env`]
    pub fn from_env() -> Self {
        Self {
            server_port: env_parse("SERVER_PORT").unwrap_or(3000),
            sweep: SweepConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            sweep: SweepConfig::default(),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn is_ratio(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep.interval, Duration::from_secs(1));
        assert_eq!(config.sweep.sample_fraction, 0.25);
        assert_eq!(config.sweep.hit_threshold, 0.25);
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches these variables
        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_INTERVAL_MS");
        env::remove_var("SWEEP_SAMPLE_FRACTION");
        env::remove_var("SWEEP_HIT_THRESHOLD");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep, SweepConfig::default());

        env::set_var("SWEEP_INTERVAL_MS", "250");
        env::set_var("SWEEP_SAMPLE_FRACTION", "0.5");
        env::set_var("SWEEP_HIT_THRESHOLD", "7");

        let sweep = SweepConfig::from_env();
        assert_eq!(sweep.interval, Duration::from_millis(250));
        assert_eq!(sweep.sample_fraction, 0.5);
        assert_eq!(sweep.hit_threshold, DEFAULT_HIT_THRESHOLD);

        env::remove_var("SWEEP_INTERVAL_MS");
        env::remove_var("SWEEP_SAMPLE_FRACTION");
        env::remove_var("SWEEP_HIT_THRESHOLD");
    }

    #[test]
    fn test_validated_replaces_out_of_range_values() {
        let sweep = SweepConfig {
            interval: Duration::ZERO,
            sample_fraction: 0.0,
            hit_threshold: f64::NAN,
        }
        .validated();

        assert_eq!(sweep, SweepConfig::default());
    }

    #[test]
    fn test_validated_keeps_valid_values() {
        let sweep = SweepConfig {
            interval: Duration::from_millis(10),
            sample_fraction: 1.0,
            hit_threshold: 0.1,
        };
        assert_eq!(sweep.clone().validated(), sweep);
    }
}
