//! In-memory shopping cart
//!
//! The cart is an insertion-ordered list of lines, keyed by item id (at most
//! one line per item). Totals are derived on every read; nothing is cached.
//! Operations on unknown ids are silent no-ops (non-critical UI state).

use crate::menu::MenuItem;
use serde::{Deserialize, Serialize};

/// One catalog item plus its requested quantity
///
/// The line snapshots the fields it needs from the catalog entry, so a line
/// stays self-describing without borrowing from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub item_id: u32,
    pub name: String,
    /// Unit price in whole currency units
    pub unit_price: i64,
    /// Always >= 1; a quantity reaching zero removes the line
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }
}

/// Insertion-ordered cart, owned exclusively by one session
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`: bump the existing line or append a new one.
    /// Always succeeds.
    pub fn add_item(&mut self, item: &MenuItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            line.quantity += 1;
            tracing::debug!(item_id = item.id, quantity = line.quantity, "Cart line incremented");
        } else {
            self.lines.push(CartLine {
                item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: 1,
            });
            tracing::debug!(item_id = item.id, "Cart line added");
        }
    }

    /// Delete the line with the matching id; no-op if absent.
    pub fn remove_item(&mut self, item_id: u32) {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        if self.lines.len() < before {
            tracing::debug!(item_id, "Cart line removed");
        } else {
            tracing::debug!(item_id, "remove_item on unknown id ignored");
        }
    }

    /// Set the quantity of a line. Zero removes the line; unknown ids are
    /// ignored. Negative quantities are unrepresentable by the type.
    pub fn set_quantity(&mut self, item_id: u32, quantity: u32) {
        if quantity == 0 {
            self.remove_item(item_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = quantity;
            tracing::debug!(item_id, quantity, "Cart line quantity set");
        } else {
            tracing::debug!(item_id, "set_quantity on unknown id ignored");
        }
    }

    /// Bump a line's quantity by one (the "+" control). No-op on unknown ids.
    pub fn increment(&mut self, item_id: u32) {
        if let Some(line) = self.lines.iter().find(|l| l.item_id == item_id) {
            let quantity = line.quantity + 1;
            self.set_quantity(item_id, quantity);
        }
    }

    /// Lower a line's quantity by one (the "-" control); at quantity 1 this
    /// removes the line. No-op on unknown ids.
    pub fn decrement(&mut self, item_id: u32) {
        if let Some(line) = self.lines.iter().find(|l| l.item_id == item_id) {
            let quantity = line.quantity.saturating_sub(1);
            self.set_quantity(item_id, quantity);
        }
    }

    /// Cart total: sum of unit_price x quantity over all lines.
    /// Pure derived value, recomputed on every read.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities across lines (the "items: N" display).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Number of distinct lines (the cart badge). Not the same count as
    /// [`Cart::item_count`].
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Category, MenuItem};

    fn item(id: u32, price: i64) -> MenuItem {
        MenuItem {
            id,
            name: format!("Item {id}"),
            description: String::new(),
            price,
            category: Category::Main,
            image: None,
            wine: None,
        }
    }

    #[test]
    fn test_repeated_add_accumulates_quantity() {
        let mut cart = Cart::new();
        let risotto = item(1, 2800);
        for _ in 0..4 {
            cart.add_item(&risotto);
        }
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines().next().unwrap().quantity, 4);
    }

    #[test]
    fn test_total_tracks_mutations() {
        let mut cart = Cart::new();
        let a = item(1, 2800);
        let b = item(3, 890);

        cart.add_item(&a);
        cart.add_item(&a);
        assert_eq!(cart.total(), 5600);

        cart.add_item(&b);
        assert_eq!(cart.total(), 6490);

        cart.set_quantity(1, 1);
        assert_eq!(cart.total(), 2800 + 890);

        cart.remove_item(3);
        assert_eq!(cart.total(), 2800);

        cart.clear();
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let a = item(1, 2800);
        let b = item(2, 450);
        cart.add_item(&a);
        cart.add_item(&b);

        cart.set_quantity(1, 0);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), 450);
        assert!(cart.lines().all(|l| l.item_id != 1));
    }

    #[test]
    fn test_unknown_id_operations_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, 100));
        let snapshot = cart.clone();

        cart.remove_item(42);
        cart.set_quantity(42, 3);
        cart.increment(42);
        cart.decrement(42);

        assert_eq!(cart, snapshot);
    }

    #[test]
    fn test_decrement_removes_at_quantity_one() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, 100));
        cart.increment(1);
        assert_eq!(cart.lines().next().unwrap().quantity, 2);

        cart.decrement(1);
        assert_eq!(cart.lines().next().unwrap().quantity, 1);

        cart.decrement(1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_item_count_vs_line_count() {
        let mut cart = Cart::new();
        let a = item(1, 2800);
        let b = item(3, 890);
        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&b);

        // Two distinct lines, three units total.
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), 6490);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(&item(5, 10));
        cart.add_item(&item(2, 20));
        cart.add_item(&item(9, 30));
        cart.add_item(&item(2, 20)); // bump, must not reorder

        let ids: Vec<u32> = cart.lines().map(|l| l.item_id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }
}
