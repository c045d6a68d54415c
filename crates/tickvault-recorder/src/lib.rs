//! Host event adapter for the tickvault capture pipeline.
//!
//! The hosting platform delivers start/record/timer/stop notifications;
//! this crate maps them onto a `Pipeline` instance and guarantees that no
//! failure ever crosses the callback boundary back into the host. Also
//! provides configuration file loading and logging initialization.

pub mod config;
pub mod error;
pub mod logging;
pub mod recorder;

pub use config::RecorderConfig;
pub use error::{RecorderError, RecorderResult};
pub use logging::init_logging;
pub use recorder::Recorder;
