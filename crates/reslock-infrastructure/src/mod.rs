//! # Infrastructure Layer
//!
//! Cross-cutting concerns that wire the lock providers into an application.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered configuration (defaults, TOML, environment) |
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context helpers mapping foreign errors into domain errors |
//! | [`di`] | Composition root building providers from configuration |
//! | [`constants`] | Infrastructure defaults |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader};
pub use di::{AppContext, init_app};
pub use error_ext::ErrorContext;
