//! Backoff delay generator.
//!
//! [`Delay`] hands out geometrically growing, optionally jittered waits up to
//! a ceiling, for retry loops that should not hammer whatever they retry.
//!
//! ```no_run
//! use delay::{Delay, DelayOpt};
//! use std::time::Duration;
//!
//! # async fn reconnect() -> Result<(), ()> { Ok(()) }
//! # async fn run() -> Result<(), delay::ConfigError> {
//! let mut backoff = Delay::with_options(
//!     Duration::from_millis(100),
//!     [
//!         DelayOpt::Multiplier(2.0),
//!         DelayOpt::Maximum(Duration::from_secs(5)),
//!         DelayOpt::Jitter(0.2),
//!     ],
//! )?;
//! while reconnect().await.is_err() {
//!     backoff.delay().await;
//! }
//! backoff.reset();
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use backoff::{Delay, Wait};
pub use config::{DelayConfig, DelayOpt};
pub use error::ConfigError;
