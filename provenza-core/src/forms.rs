//! Form payloads
//!
//! Plain field bags mirroring the page's dialogs. No validation beyond what
//! the types force; nothing here outlives the session.

use serde::{Deserialize, Serialize};

/// Card payment dialog fields
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub email: String,
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

/// Table reservation dialog fields
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ReservationForm {
    pub name: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: String,
    pub message: String,
}

/// Guest review dialog fields
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ReviewForm {
    pub name: String,
    /// Star rating, 1-5 in the UI; stored as given
    pub rating: u8,
    pub text: String,
}
