//! Checkout flow step
//!
//! Linear three-stage flow: Cart -> Payment -> Success, with a back edge
//! Payment -> Cart and a reset edge Success -> Cart. Transition legality is
//! a pure function here; guards that need session state (non-empty cart,
//! surface open) live in the session crate.

use serde::{Deserialize, Serialize};

/// Current stage of the checkout surface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStep {
    #[default]
    Cart,
    Payment,
    Success,
}

impl CheckoutStep {
    /// Whether a direct transition to `next` is legal.
    ///
    /// No implicit skips: Cart can never jump straight to Success.
    pub fn can_advance_to(self, next: CheckoutStep) -> bool {
        matches!(
            (self, next),
            (CheckoutStep::Cart, CheckoutStep::Payment)
                | (CheckoutStep::Payment, CheckoutStep::Cart)
                | (CheckoutStep::Payment, CheckoutStep::Success)
                | (CheckoutStep::Success, CheckoutStep::Cart)
        )
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutStep::Cart => write!(f, "CART"),
            CheckoutStep::Payment => write!(f, "PAYMENT"),
            CheckoutStep::Success => write!(f, "SUCCESS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cart() {
        assert_eq!(CheckoutStep::default(), CheckoutStep::Cart);
    }

    #[test]
    fn test_legal_transitions() {
        assert!(CheckoutStep::Cart.can_advance_to(CheckoutStep::Payment));
        assert!(CheckoutStep::Payment.can_advance_to(CheckoutStep::Cart));
        assert!(CheckoutStep::Payment.can_advance_to(CheckoutStep::Success));
        assert!(CheckoutStep::Success.can_advance_to(CheckoutStep::Cart));
    }

    #[test]
    fn test_no_step_skips() {
        assert!(!CheckoutStep::Cart.can_advance_to(CheckoutStep::Success));
        assert!(!CheckoutStep::Success.can_advance_to(CheckoutStep::Payment));
        assert!(!CheckoutStep::Cart.can_advance_to(CheckoutStep::Cart));
        assert!(!CheckoutStep::Payment.can_advance_to(CheckoutStep::Payment));
    }

    #[test]
    fn test_display_wire_form() {
        assert_eq!(CheckoutStep::Payment.to_string(), "PAYMENT");
        let json = serde_json::to_string(&CheckoutStep::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
    }
}
