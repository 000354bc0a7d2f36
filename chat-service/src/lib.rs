//! Chat delivery for the maintainer bot.
//!
//! - [`config`]: chat settings loaded from the environment.
//! - [`services::slack_service`]: thin Slack Web API client.
//! - [`worker`]: the single background task that performs sends.
//! - [`sink`]: what request handlers hold: `Active` (queue) or `Disabled`.
//! - [`telemetry`]: process-wide tracing subscriber setup.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod sink;
pub mod telemetry;
pub mod worker;

pub use config::ChatConfig;
pub use error_handler::{ChatError, ConfigError};
pub use sink::{ChatMessage, NotificationSink};
