//! Aggregates module
pub mod product;
pub mod cart;
pub mod favorites;
pub mod order;

pub use product::{Product, ProductError, ProductRecord};
pub use cart::{Cart, CartError, CartLine};
pub use favorites::Favorites;
pub use order::{compute_total, CheckoutForm, CheckoutPatch, DeliveryFees, DeliveryMethod, OrderConfirmation, OrderDraft, OrderLine, PaymentMethod};
