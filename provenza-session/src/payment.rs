//! Simulated payment worker
//!
//! The "payment gateway" is a fixed-delay timer that always succeeds, run as
//! an explicit two-stage scheduled task:
//!
//! 1. processing delay -> settle: step to SUCCESS, record the order, clear
//!    the cart;
//! 2. confirmation delay -> close the checkout surface and reset to CART.
//!
//! Each stage is cancellable through the attempt token (a child of the
//! session-lifetime token), and re-checks the session under the lock before
//! applying its change, so a callback can never mutate a surface that was
//! closed in the meantime.

use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::session::SessionState;
use parking_lot::RwLock;
use provenza_core::{CheckoutStep, util::now_millis};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// In-memory receipt of a settled order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletedOrder {
    pub order_id: String,
    /// Total at settlement, in whole currency units
    pub total: i64,
    /// Units across all lines at settlement
    pub item_count: u32,
    /// Unix milliseconds
    pub settled_at: i64,
}

/// Two-stage payment simulation. Spawned fire-and-forget by
/// [`crate::OrderSession::process_payment`].
pub(crate) async fn run_payment_worker(
    inner: Arc<RwLock<SessionState>>,
    event_tx: broadcast::Sender<SessionEvent>,
    config: SessionConfig,
    cancel: CancellationToken,
) {
    // Stage 1: processing latency
    tokio::select! {
        _ = tokio::time::sleep(config.processing_delay) => {}
        _ = cancel.cancelled() => {
            tracing::debug!("Payment attempt cancelled while processing");
            return;
        }
    }

    let settled = {
        let mut state = inner.write();
        if !state.checkout_open || state.step != CheckoutStep::Payment {
            // Surface torn down or step moved while the timer was pending.
            tracing::warn!(
                checkout_open = state.checkout_open,
                step = %state.step,
                "Stale payment callback ignored"
            );
            state.payment_attempt = None;
            None
        } else {
            let order = CompletedOrder {
                order_id: uuid::Uuid::new_v4().to_string(),
                total: state.cart.total(),
                item_count: state.cart.item_count(),
                settled_at: now_millis(),
            };
            state.step = CheckoutStep::Success;
            state.cart.clear();
            state.completed_orders.push(order.clone());
            Some(order)
        }
    };
    let Some(order) = settled else { return };

    tracing::info!(order_id = %order.order_id, total = order.total, "Payment settled");
    let _ = event_tx.send(SessionEvent::PaymentSettled {
        order_id: order.order_id,
        total: order.total,
    });
    let _ = event_tx.send(SessionEvent::StepChanged {
        step: CheckoutStep::Success,
    });
    let _ = event_tx.send(SessionEvent::CartCleared);

    // Stage 2: success screen display time
    tokio::select! {
        _ = tokio::time::sleep(config.confirmation_delay) => {}
        _ = cancel.cancelled() => {
            tracing::debug!("Payment attempt cancelled on success screen");
            return;
        }
    }

    let closed = {
        let mut state = inner.write();
        state.payment_attempt = None;
        if !state.checkout_open {
            tracing::warn!("Stale confirmation callback ignored");
            false
        } else {
            state.checkout_open = false;
            state.step = CheckoutStep::Cart;
            true
        }
    };
    if closed {
        let _ = event_tx.send(SessionEvent::StepChanged {
            step: CheckoutStep::Cart,
        });
        let _ = event_tx.send(SessionEvent::CheckoutClosed);
    }
}
