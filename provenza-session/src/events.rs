//! Session events
//!
//! Emitted after every state mutation so the rendering surface can re-render
//! from fresh state. Delivery is fire-and-forget over a broadcast channel;
//! a missing or lagging subscriber never blocks a mutation.

use provenza_core::CheckoutStep;
use serde::{Deserialize, Serialize};

/// State-change notification for one session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    // ========== Cart ==========
    ItemAdded { item_id: u32, quantity: u32 },
    ItemRemoved { item_id: u32 },
    QuantityChanged { item_id: u32, quantity: u32 },
    CartCleared,

    // ========== Checkout ==========
    CheckoutOpened,
    CheckoutClosed,
    StepChanged { step: CheckoutStep },
    PaymentSettled { order_id: String, total: i64 },

    // ========== Forms ==========
    ReservationSubmitted,
    ReviewSubmitted,
}
