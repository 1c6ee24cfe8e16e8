use crate::config::{DelayConfig, DelayOpt};
use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::{Instant, Sleep};
use tracing::debug;

/// Geometric backoff generator.
///
/// Each call to [`Delay::delay`] hands out a wait derived from the current
/// interval and then grows that interval by the multiplier, clamped to the
/// maximum. [`Delay::reset`] goes back to the base interval.
///
/// Calls take `&mut self`; share a generator between tasks behind a lock, or
/// give each retry loop its own.
#[derive(Debug)]
pub struct Delay {
    cfg: DelayConfig,
    max: Duration,
    current: Duration,
    rng: StdRng,
}

impl Delay {
    /// A generator that never grows: every wait is `base`.
    pub fn new(base: Duration) -> Self {
        Self::build(DelayConfig::new(base))
    }

    /// Applies `opts` in order over the defaults for `base`.
    pub fn with_options<I>(base: Duration, opts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = DelayOpt>,
    {
        let mut cfg = DelayConfig::new(base);
        for opt in opts {
            opt.apply(&mut cfg)?;
        }
        Ok(Self::build(cfg))
    }

    pub fn from_config(cfg: DelayConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self::build(cfg))
    }

    fn build(cfg: DelayConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            max: cfg.ceiling(),
            current: cfg.base,
            rng,
            cfg,
        }
    }

    /// Computes the next wait and advances the interval.
    ///
    /// The interval advances immediately, whether or not the returned
    /// [`Wait`] is ever awaited. The wait is measured from this call.
    pub fn delay(&mut self) -> Wait {
        let u: f64 = self.rng.gen();
        let wait = self
            .current
            .saturating_add(scale(self.current, u * self.cfg.jitter));
        self.current = scale(self.current, self.cfg.multiplier).min(self.max);
        debug!(?wait, "returning delay");
        let now = Instant::now();
        Wait {
            duration: wait,
            deadline: now.checked_add(wait).unwrap_or_else(|| far_future(now)),
        }
    }

    pub fn reset(&mut self) {
        self.current = self.cfg.base;
    }

    /// The unjittered interval the next [`Delay::delay`] call will use.
    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn base(&self) -> Duration {
        self.cfg.base
    }

    pub fn config(&self) -> &DelayConfig {
        &self.cfg
    }
}

// Roughly 30 years out.
fn far_future(now: Instant) -> Instant {
    now + Duration::from_secs(86400 * 365 * 30)
}

// Saturates at Duration::MAX. Values below u64::MAX nanoseconds stay exact
// to the nanosecond; larger ones go through f64 seconds.
fn scale(d: Duration, factor: f64) -> Duration {
    if factor == 1.0 {
        return d;
    }
    let nanos = d.as_nanos() as f64 * factor;
    if nanos < u64::MAX as f64 {
        Duration::from_nanos(nanos as u64)
    } else {
        Duration::try_from_secs_f64(nanos / 1e9).unwrap_or(Duration::MAX)
    }
}

/// A single-fire time signal returned by [`Delay::delay`].
///
/// Await it to sleep until its deadline, race it in `tokio::select!`, or drop
/// it. Constructing one needs no runtime; awaiting one does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wait {
    duration: Duration,
    deadline: Instant,
}

impl Wait {
    /// The jittered wait that was computed.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl IntoFuture for Wait {
    type Output = ();
    type IntoFuture = Sleep;

    fn into_future(self) -> Sleep {
        tokio::time::sleep_until(self.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_saturates_at_duration_max() {
        assert_eq!(scale(Duration::MAX, 2.0), Duration::MAX);
        assert_eq!(scale(Duration::from_secs(1), 1e30), Duration::MAX);
    }

    #[test]
    fn scale_covers_range_past_u64_nanos() {
        let d = Duration::from_secs(u64::MAX / 4);
        assert_eq!(scale(d, 1.0), d);
        let doubled = scale(d, 2.0);
        assert!(doubled > Duration::from_nanos(u64::MAX));
        assert!(doubled > d);
        assert!(scale(d, 0.5) < d);
    }

    #[test]
    fn scale_keeps_whole_nanoseconds() {
        let d = Duration::from_millis(100);
        assert_eq!(scale(d, 2.0), Duration::from_millis(200));
        assert_eq!(scale(d, 1.5), Duration::from_millis(150));
        assert_eq!(scale(d, 0.0), Duration::ZERO);
    }
}
