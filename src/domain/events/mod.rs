//! Domain events
use crate::domain::value_objects::{LineId, ProductId};
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Favorites(FavoriteEvent),
    Checkout(CheckoutEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    LineAdded { line_id: LineId, product_id: ProductId },
    LineMerged { line_id: LineId, quantity: u32 },
    QuantityChanged { line_id: LineId, quantity: u32 },
    LineRemoved { line_id: LineId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FavoriteEvent {
    Added { product_id: ProductId },
    Removed { product_id: ProductId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutEvent {
    Confirmed { order_number: String, total: Decimal },
    Rejected { reasons: Vec<String> },
}
