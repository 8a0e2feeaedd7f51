//! Order submission boundary.
//!
//! The storefront hands a finished [`OrderDraft`] to an
//! [`OrderSubmissionService`] and records whatever it answers. The bundled
//! [`AcknowledgingSubmitter`] confirms immediately without any I/O; a real
//! backend would be wired in behind the same trait.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use thiserror::Error;

use crate::domain::aggregates::order::{OrderConfirmation, OrderDraft};

pub trait OrderSubmissionService: Send + Sync + 'static {
    fn submit(&self, draft: &OrderDraft) -> Result<OrderConfirmation, SubmissionError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Order has no items")]
    EmptyOrder,

    #[error("Order rejected: {0}")]
    Rejected(String),
}

/// Confirms every non-empty order with a sequential order number.
#[derive(Debug)]
pub struct AcknowledgingSubmitter {
    next_number: AtomicU64,
}

impl AcknowledgingSubmitter {
    pub fn new() -> Self { Self::starting_at(1001) }

    pub fn starting_at(first: u64) -> Self { Self { next_number: AtomicU64::new(first) } }
}

impl Default for AcknowledgingSubmitter {
    fn default() -> Self { Self::new() }
}

impl OrderSubmissionService for AcknowledgingSubmitter {
    fn submit(&self, draft: &OrderDraft) -> Result<OrderConfirmation, SubmissionError> {
        if draft.is_empty() {
            return Err(SubmissionError::EmptyOrder);
        }
        let number = self.next_number.fetch_add(1, Ordering::Relaxed);
        let confirmation = OrderConfirmation {
            order_number: format!("ORD-{:08}", number),
            total: draft.total.clone(),
            submitted_at: Utc::now(),
        };
        tracing::info!(order_number = %confirmation.order_number, total = %confirmation.total, "order acknowledged");
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::cart::Cart;
    use crate::domain::aggregates::order::{CheckoutForm, DeliveryFees};
    use crate::domain::aggregates::product::test_product;
    use rust_decimal_macros::dec;

    #[test]
    fn test_acknowledges_with_sequential_numbers() {
        let mut cart = Cart::new("RUB");
        cart.add_line(&test_product(1, "A", dec!(100), "X"), None, None).unwrap();
        let draft = OrderDraft::from_cart(CheckoutForm::default(), &cart, &DeliveryFees::default());
        let submitter = AcknowledgingSubmitter::starting_at(7);
        let first = submitter.submit(&draft).unwrap();
        let second = submitter.submit(&draft).unwrap();
        assert_eq!(first.order_number, "ORD-00000007");
        assert_eq!(second.order_number, "ORD-00000008");
        assert_eq!(first.total.amount(), dec!(450));
    }

    #[test]
    fn test_empty_order_is_refused() {
        let draft = OrderDraft::from_cart(CheckoutForm::default(), &Cart::new("RUB"), &DeliveryFees::default());
        assert_eq!(AcknowledgingSubmitter::new().submit(&draft), Err(SubmissionError::EmptyOrder));
    }
}
