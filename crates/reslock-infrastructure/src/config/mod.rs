//! Configuration management
//!
//! Settings are layered by [`ConfigLoader`]: built-in defaults, then a TOML
//! file, then `RESLOCK__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
