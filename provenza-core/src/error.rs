//! Error types for catalog loading and session operations

use crate::checkout::CheckoutStep;
use thiserror::Error;

/// Catalog load/validation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid menu data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate menu item id: {0}")]
    DuplicateItemId(u32),

    #[error("menu item {id}: price must be positive, got {price}")]
    InvalidPrice { id: u32, price: i64 },

    #[error("menu item {0}: wine details on a non-wine item")]
    UnexpectedWineInfo(u32),
}

/// Rejected session operations
///
/// Cart mutations are total and never produce these; only checkout flow
/// transitions can be rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid checkout transition: {from} -> {to}")]
    InvalidTransition {
        from: CheckoutStep,
        to: CheckoutStep,
    },

    #[error("payment already in progress")]
    PaymentInProgress,

    #[error("checkout surface is not open")]
    CheckoutNotOpen,
}
