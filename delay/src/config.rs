use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration of a [`Delay`](crate::Delay).
///
/// Defaults: multiplier `1.0` (no growth), maximum equal to `base` (no
/// headroom), jitter `0.0` (deterministic waits), no seed (jitter drawn from
/// an entropy-seeded generator).
///
/// On disk the record is YAML with durations in milliseconds:
///
/// ```yaml
/// base_ms: 100
/// multiplier: 2.0
/// maximum_ms: 800
/// jitter: 0.1
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile", into = "ConfigFile")]
pub struct DelayConfig {
    pub base: Duration,
    pub multiplier: f64,
    pub maximum: Option<Duration>,
    pub jitter: f64,
    pub seed: Option<u64>,
}

/// A single configuration override, applied in order by
/// [`Delay::with_options`](crate::Delay::with_options).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DelayOpt {
    Multiplier(f64),
    Maximum(Duration),
    Jitter(f64),
    Seed(u64),
}

impl DelayOpt {
    /// Writes this option into `cfg`. Later options overwrite earlier ones.
    pub fn apply(self, cfg: &mut DelayConfig) -> Result<(), ConfigError> {
        match self {
            DelayOpt::Multiplier(m) => {
                check_factor(m).map_err(ConfigError::InvalidMultiplier)?;
                cfg.multiplier = m;
            }
            DelayOpt::Maximum(max) => cfg.maximum = Some(max),
            DelayOpt::Jitter(j) => {
                check_factor(j).map_err(ConfigError::InvalidJitter)?;
                cfg.jitter = j;
            }
            DelayOpt::Seed(s) => cfg.seed = Some(s),
        }
        Ok(())
    }
}

fn check_factor(v: f64) -> Result<(), f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(v)
    }
}

impl DelayConfig {
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            multiplier: 1.0,
            maximum: None,
            jitter: 0.0,
            seed: None,
        }
    }

    pub fn multiplier(mut self, m: f64) -> Self {
        self.multiplier = m;
        self
    }

    pub fn maximum(mut self, max: Duration) -> Self {
        self.maximum = Some(max);
        self
    }

    pub fn jitter(mut self, j: f64) -> Self {
        self.jitter = j;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }

    /// The ceiling `current` is clamped to; `base` when no maximum was set.
    pub fn ceiling(&self) -> Duration {
        self.maximum.unwrap_or(self.base)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_factor(self.multiplier).map_err(ConfigError::InvalidMultiplier)?;
        check_factor(self.jitter).map_err(ConfigError::InvalidJitter)?;
        Ok(())
    }

    pub fn from_yaml(data: &str) -> Result<Self, ConfigError> {
        let cfg: DelayConfig = serde_yaml::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&data)
    }

    /// Command-line flags take precedence over file values.
    pub fn apply_cli(&mut self, cli: &crate::cli::Cli) {
        if let Some(ms) = cli.base_ms {
            self.base = Duration::from_millis(ms);
        }
        if let Some(m) = cli.multiplier {
            self.multiplier = m;
        }
        if let Some(ms) = cli.maximum_ms {
            self.maximum = Some(Duration::from_millis(ms));
        }
        if let Some(j) = cli.jitter {
            self.jitter = j;
        }
        if let Some(s) = cli.seed {
            self.seed = Some(s);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ConfigFile {
    base_ms: u64,
    #[serde(default = "default_multiplier")]
    multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maximum_ms: Option<u64>,
    #[serde(default)]
    jitter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

fn default_multiplier() -> f64 {
    1.0
}

pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl From<ConfigFile> for DelayConfig {
    fn from(f: ConfigFile) -> Self {
        Self {
            base: Duration::from_millis(f.base_ms),
            multiplier: f.multiplier,
            maximum: f.maximum_ms.map(Duration::from_millis),
            jitter: f.jitter,
            seed: f.seed,
        }
    }
}

impl From<DelayConfig> for ConfigFile {
    fn from(c: DelayConfig) -> Self {
        Self {
            base_ms: millis(c.base),
            multiplier: c.multiplier,
            maximum_ms: c.maximum.map(millis),
            jitter: c.jitter,
            seed: c.seed,
        }
    }
}
