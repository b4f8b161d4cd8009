//! Configuration types module

pub mod app;
pub mod event_bus;
pub mod lock;
pub mod logging;
pub mod storage;
pub mod throttling;

// Re-export main types
pub use app::*;
pub use event_bus::*;
pub use lock::*;
pub use logging::*;
pub use storage::*;
pub use throttling::*;
