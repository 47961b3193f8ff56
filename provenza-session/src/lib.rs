//! Order session runtime
//!
//! One `OrderSession` per browser-style visit: it owns the cart, the
//! checkout step and the form drafts, broadcasts state changes to the
//! rendering surface, and runs the simulated two-stage payment timer.
//! Everything is in-memory; dropping the last session handle cancels any
//! pending delayed work.

pub mod config;
pub mod events;
pub mod payment;
pub mod session;

// Re-exports
pub use config::SessionConfig;
pub use events::SessionEvent;
pub use payment::CompletedOrder;
pub use session::OrderSession;
