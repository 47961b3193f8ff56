//! OrderSession - per-visit state and checkout flow enforcement
//!
//! The session is a cheaply clonable handle over shared state. Each user
//! action (a click or form edit on the surface) synchronously mutates the
//! state under the lock and then emits [`SessionEvent`]s. The only
//! asynchrony is the simulated payment worker in [`crate::payment`].
//!
//! # Checkout flow
//!
//! ```text
//! open_checkout()
//!     CART ──begin_payment()──▶ PAYMENT ──process_payment()──▶ SUCCESS
//!       ▲                         │                               │
//!       └────── back_to_cart() ───┘        (confirmation delay)   │
//!       ◀──────────────────────────────────────────────────────── ┘
//! ```
//!
//! Entering PAYMENT requires a non-empty cart; no step is ever skipped.

use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::payment::{self, CompletedOrder};
use parking_lot::RwLock;
use provenza_core::{
    Cart, CartLine, Catalog, CategoryFilter, CheckoutStep, MenuItem, PaymentForm,
    ReservationForm, ReviewForm, SessionError,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Mutable per-session state, guarded by the session lock
pub(crate) struct SessionState {
    pub(crate) cart: Cart,
    pub(crate) step: CheckoutStep,
    pub(crate) checkout_open: bool,
    pub(crate) payment_form: PaymentForm,
    pub(crate) reservation_form: ReservationForm,
    pub(crate) review_form: ReviewForm,
    pub(crate) reservations: Vec<ReservationForm>,
    pub(crate) reviews: Vec<ReviewForm>,
    pub(crate) completed_orders: Vec<CompletedOrder>,
    /// Cancellation token of the in-flight payment attempt, if any
    pub(crate) payment_attempt: Option<CancellationToken>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            cart: Cart::new(),
            step: CheckoutStep::Cart,
            checkout_open: false,
            payment_form: PaymentForm::default(),
            reservation_form: ReservationForm::default(),
            review_form: ReviewForm::default(),
            reservations: Vec::new(),
            reviews: Vec::new(),
            completed_orders: Vec::new(),
            payment_attempt: None,
        }
    }

    /// Cancel and forget the in-flight payment attempt, if any.
    fn cancel_payment_attempt(&mut self) {
        if let Some(token) = self.payment_attempt.take() {
            token.cancel();
            tracing::debug!("In-flight payment attempt cancelled");
        }
    }
}

/// Cancels the session token once the last handle is dropped, so pending
/// delayed work never touches a torn-down session.
struct SessionGuard {
    shutdown: CancellationToken,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Per-visit order session: catalog view, cart, checkout flow and forms
///
/// Clones share the same state; one session is never shared across visits.
#[derive(Clone)]
pub struct OrderSession {
    catalog: Arc<Catalog>,
    inner: Arc<RwLock<SessionState>>,
    event_tx: broadcast::Sender<SessionEvent>,
    shutdown: CancellationToken,
    config: SessionConfig,
    _guard: Arc<SessionGuard>,
}

impl std::fmt::Debug for OrderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("OrderSession")
            .field("step", &state.step)
            .field("checkout_open", &state.checkout_open)
            .field("line_count", &state.cart.line_count())
            .finish()
    }
}

impl OrderSession {
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity);
        let shutdown = CancellationToken::new();
        Self {
            catalog,
            inner: Arc::new(RwLock::new(SessionState::new())),
            event_tx,
            shutdown: shutdown.clone(),
            config,
            _guard: Arc::new(SessionGuard { shutdown }),
        }
    }

    /// Session over the built-in menu with default timings.
    pub fn with_default_menu() -> Self {
        Self::new(Arc::new(Catalog::default_menu()), SessionConfig::default())
    }

    /// Subscribe to state-change events (for the rendering surface).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; the surface may not be attached yet.
        let _ = self.event_tx.send(event);
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Menu rows for the given filter tab, in catalog order.
    pub fn menu(&self, filter: CategoryFilter) -> Vec<MenuItem> {
        self.catalog.filter(filter).into_iter().cloned().collect()
    }

    // ========================================================================
    // Cart
    // ========================================================================

    /// Add one unit of the item to the cart. Unknown ids are ignored.
    pub fn add_to_cart(&self, item_id: u32) {
        let Some(item) = self.catalog.get(item_id) else {
            tracing::debug!(item_id, "add_to_cart on unknown item ignored");
            return;
        };
        let quantity = {
            let mut state = self.inner.write();
            state.cart.add_item(item);
            state
                .cart
                .lines()
                .find(|l| l.item_id == item_id)
                .map(|l| l.quantity)
                .unwrap_or(1)
        };
        self.emit(SessionEvent::ItemAdded { item_id, quantity });
    }

    /// Remove the line for `item_id`. Unknown ids are ignored.
    pub fn remove_from_cart(&self, item_id: u32) {
        let removed = {
            let mut state = self.inner.write();
            let had_line = state.cart.lines().any(|l| l.item_id == item_id);
            state.cart.remove_item(item_id);
            had_line
        };
        if removed {
            self.emit(SessionEvent::ItemRemoved { item_id });
        }
    }

    /// Set a line's quantity; zero removes the line. Unknown ids are ignored.
    pub fn set_quantity(&self, item_id: u32, quantity: u32) {
        let event = {
            let mut state = self.inner.write();
            let had_line = state.cart.lines().any(|l| l.item_id == item_id);
            state.cart.set_quantity(item_id, quantity);
            match (had_line, quantity) {
                (false, _) => None,
                (true, 0) => Some(SessionEvent::ItemRemoved { item_id }),
                (true, q) => Some(SessionEvent::QuantityChanged {
                    item_id,
                    quantity: q,
                }),
            }
        };
        if let Some(event) = event {
            self.emit(event);
        }
    }

    /// The "+" control on a cart line.
    pub fn increment(&self, item_id: u32) {
        let quantity = self
            .inner
            .read()
            .cart
            .lines()
            .find(|l| l.item_id == item_id)
            .map(|l| l.quantity);
        if let Some(q) = quantity {
            self.set_quantity(item_id, q + 1);
        }
    }

    /// The "-" control on a cart line; removes the line at quantity 1.
    pub fn decrement(&self, item_id: u32) {
        let quantity = self
            .inner
            .read()
            .cart
            .lines()
            .find(|l| l.item_id == item_id)
            .map(|l| l.quantity);
        if let Some(q) = quantity {
            self.set_quantity(item_id, q.saturating_sub(1));
        }
    }

    pub fn cart_total(&self) -> i64 {
        self.inner.read().cart.total()
    }

    /// Sum of quantities (the "items: N" display).
    pub fn item_count(&self) -> u32 {
        self.inner.read().cart.item_count()
    }

    /// Number of distinct lines (the cart badge).
    pub fn line_count(&self) -> usize {
        self.inner.read().cart.line_count()
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.inner.read().cart.lines().cloned().collect()
    }

    // ========================================================================
    // Checkout flow
    // ========================================================================

    pub fn step(&self) -> CheckoutStep {
        self.inner.read().step
    }

    pub fn is_checkout_open(&self) -> bool {
        self.inner.read().checkout_open
    }

    /// Open the checkout surface (the cart dialog). Idempotent.
    pub fn open_checkout(&self) {
        let opened = {
            let mut state = self.inner.write();
            if state.checkout_open {
                false
            } else {
                state.checkout_open = true;
                true
            }
        };
        if opened {
            self.emit(SessionEvent::CheckoutOpened);
        }
    }

    /// Close the checkout surface. Cancels any in-flight payment attempt and
    /// resets the step, so no delayed callback fires against stale state.
    pub fn close_checkout(&self) {
        let (closed, step_reset) = {
            let mut state = self.inner.write();
            state.cancel_payment_attempt();
            if !state.checkout_open {
                (false, false)
            } else {
                state.checkout_open = false;
                let step_reset = state.step != CheckoutStep::Cart;
                state.step = CheckoutStep::Cart;
                (true, step_reset)
            }
        };
        if step_reset {
            self.emit(SessionEvent::StepChanged {
                step: CheckoutStep::Cart,
            });
        }
        if closed {
            self.emit(SessionEvent::CheckoutClosed);
        }
    }

    /// Advance CART -> PAYMENT. Requires an open surface and a non-empty
    /// cart; entering payment with nothing to pay for is a rejected
    /// transition, not a silent no-op.
    pub fn begin_payment(&self) -> Result<(), SessionError> {
        {
            let mut state = self.inner.write();
            if !state.checkout_open {
                return Err(SessionError::CheckoutNotOpen);
            }
            if !state.step.can_advance_to(CheckoutStep::Payment) {
                return Err(SessionError::InvalidTransition {
                    from: state.step,
                    to: CheckoutStep::Payment,
                });
            }
            if state.cart.is_empty() {
                return Err(SessionError::EmptyCart);
            }
            state.step = CheckoutStep::Payment;
        }
        self.emit(SessionEvent::StepChanged {
            step: CheckoutStep::Payment,
        });
        Ok(())
    }

    /// The back edge PAYMENT -> CART. Cancels an in-flight payment attempt.
    pub fn back_to_cart(&self) -> Result<(), SessionError> {
        {
            let mut state = self.inner.write();
            if state.step != CheckoutStep::Payment {
                return Err(SessionError::InvalidTransition {
                    from: state.step,
                    to: CheckoutStep::Cart,
                });
            }
            state.cancel_payment_attempt();
            state.step = CheckoutStep::Cart;
        }
        self.emit(SessionEvent::StepChanged {
            step: CheckoutStep::Cart,
        });
        Ok(())
    }

    /// Start the simulated payment. Always succeeds after the processing
    /// delay; see [`crate::payment`] for the two-stage worker.
    ///
    /// Must be called within a Tokio runtime.
    pub fn process_payment(&self) -> Result<(), SessionError> {
        let attempt = {
            let mut state = self.inner.write();
            if !state.checkout_open {
                return Err(SessionError::CheckoutNotOpen);
            }
            if state.step != CheckoutStep::Payment {
                return Err(SessionError::InvalidTransition {
                    from: state.step,
                    to: CheckoutStep::Success,
                });
            }
            if state.payment_attempt.is_some() {
                return Err(SessionError::PaymentInProgress);
            }
            let attempt = self.shutdown.child_token();
            state.payment_attempt = Some(attempt.clone());
            attempt
        };
        tracing::info!(total = self.cart_total(), "Payment processing started");
        tokio::spawn(payment::run_payment_worker(
            Arc::clone(&self.inner),
            self.event_tx.clone(),
            self.config.clone(),
            attempt,
        ));
        Ok(())
    }

    /// Completed orders of this session (in-memory receipt trail).
    pub fn completed_orders(&self) -> Vec<CompletedOrder> {
        self.inner.read().completed_orders.clone()
    }

    // ========================================================================
    // Forms
    // ========================================================================

    pub fn set_payment_form(&self, form: PaymentForm) {
        self.inner.write().payment_form = form;
    }

    pub fn payment_form(&self) -> PaymentForm {
        self.inner.read().payment_form.clone()
    }

    pub fn set_reservation_form(&self, form: ReservationForm) {
        self.inner.write().reservation_form = form;
    }

    pub fn reservation_form(&self) -> ReservationForm {
        self.inner.read().reservation_form.clone()
    }

    pub fn set_review_form(&self, form: ReviewForm) {
        self.inner.write().review_form = form;
    }

    pub fn review_form(&self) -> ReviewForm {
        self.inner.read().review_form.clone()
    }

    /// File the current reservation draft and reset it.
    pub fn submit_reservation(&self) {
        {
            let mut state = self.inner.write();
            let form = std::mem::take(&mut state.reservation_form);
            state.reservations.push(form);
        }
        self.emit(SessionEvent::ReservationSubmitted);
    }

    /// File the current review draft and reset it.
    pub fn submit_review(&self) {
        {
            let mut state = self.inner.write();
            let form = std::mem::take(&mut state.review_form);
            state.reviews.push(form);
        }
        self.emit(SessionEvent::ReviewSubmitted);
    }

    pub fn reservations(&self) -> Vec<ReservationForm> {
        self.inner.read().reservations.clone()
    }

    pub fn reviews(&self) -> Vec<ReviewForm> {
        self.inner.read().reviews.clone()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Tear down the session: cancels all pending delayed work.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> OrderSession {
        OrderSession::with_default_menu()
    }

    #[test]
    fn test_add_unknown_item_is_noop() {
        let s = session();
        s.add_to_cart(999);
        assert_eq!(s.line_count(), 0);
        assert_eq!(s.cart_total(), 0);
    }

    #[test]
    fn test_running_totals_scenario() {
        let s = session();
        s.add_to_cart(1);
        s.add_to_cart(1);
        assert_eq!(s.cart_total(), 5600);

        s.add_to_cart(3);
        assert_eq!(s.cart_total(), 6490);
        assert_eq!(s.line_count(), 2);
        assert_eq!(s.item_count(), 3);
    }

    #[test]
    fn test_begin_payment_requires_open_surface() {
        let s = session();
        s.add_to_cart(1);
        assert_eq!(s.begin_payment(), Err(SessionError::CheckoutNotOpen));
    }

    #[test]
    fn test_begin_payment_rejects_empty_cart() {
        let s = session();
        s.open_checkout();
        assert_eq!(s.begin_payment(), Err(SessionError::EmptyCart));
        assert_eq!(s.step(), CheckoutStep::Cart);
    }

    #[tokio::test]
    async fn test_no_jump_from_cart_to_success() {
        let s = session();
        s.add_to_cart(1);
        s.open_checkout();
        assert_eq!(
            s.process_payment(),
            Err(SessionError::InvalidTransition {
                from: CheckoutStep::Cart,
                to: CheckoutStep::Success,
            })
        );
    }

    #[test]
    fn test_back_to_cart_only_from_payment() {
        let s = session();
        s.open_checkout();
        assert_eq!(
            s.back_to_cart(),
            Err(SessionError::InvalidTransition {
                from: CheckoutStep::Cart,
                to: CheckoutStep::Cart,
            })
        );

        s.add_to_cart(2);
        s.begin_payment().unwrap();
        assert_eq!(s.step(), CheckoutStep::Payment);
        s.back_to_cart().unwrap();
        assert_eq!(s.step(), CheckoutStep::Cart);
    }

    #[test]
    fn test_close_checkout_resets_step() {
        let s = session();
        s.add_to_cart(1);
        s.open_checkout();
        s.begin_payment().unwrap();

        s.close_checkout();
        assert!(!s.is_checkout_open());
        assert_eq!(s.step(), CheckoutStep::Cart);
        // Cart contents survive a closed surface.
        assert_eq!(s.cart_total(), 2800);
    }

    #[test]
    fn test_form_drafts_and_submission() {
        let s = session();
        s.set_reservation_form(ReservationForm {
            name: "Анна".into(),
            phone: "+7 495 123-45-67".into(),
            date: "2026-09-01".into(),
            time: "19:00".into(),
            guests: "4".into(),
            message: String::new(),
        });
        s.submit_reservation();

        assert_eq!(s.reservations().len(), 1);
        assert_eq!(s.reservations()[0].guests, "4");
        // Draft resets after submission.
        assert_eq!(s.reservation_form(), ReservationForm::default());
    }
}
