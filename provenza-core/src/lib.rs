//! Core domain types for the Provenza ordering session
//!
//! Pure, synchronous building blocks shared by the session runtime:
//! menu catalog, cart, checkout step, form payloads and error types.

pub mod cart;
pub mod checkout;
pub mod error;
pub mod forms;
pub mod menu;
pub mod util;

// Re-exports
pub use cart::{Cart, CartLine};
pub use checkout::CheckoutStep;
pub use error::{CatalogError, SessionError};
pub use forms::{PaymentForm, ReservationForm, ReviewForm};
pub use menu::{Catalog, Category, CategoryFilter, MenuItem, WineInfo};
