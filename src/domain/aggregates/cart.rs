//! Cart Aggregate

use crate::domain::aggregates::product::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{LineId, Money, ProductId, Quantity};

#[derive(Clone, Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: String,
    events: Vec<DomainEvent>,
}

/// One product in one variant, with a quantity of at least one.
#[derive(Clone, Debug, PartialEq)]
pub struct CartLine {
    pub id: LineId,
    pub product: Product,
    pub quantity: Quantity,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl CartLine {
    pub fn unit_price(&self) -> &Money { self.product.price() }
    pub fn line_total(&self) -> Money { self.unit_price().multiply(self.quantity.value()) }

    fn matches(&self, product_id: ProductId, color: Option<&str>, size: Option<&str>) -> bool {
        self.product.id() == product_id && self.color.as_deref() == color && self.size.as_deref() == size
    }
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        Self { lines: vec![], currency: currency.to_string(), events: vec![] }
    }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn line_count(&self) -> usize { self.lines.len() }
    pub fn line(&self, id: LineId) -> Option<&CartLine> { self.lines.iter().find(|l| l.id == id) }
    pub fn line_id_at(&self, index: usize) -> Option<LineId> { self.lines.get(index).map(|l| l.id) }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 { self.lines.iter().map(|l| u64::from(l.quantity.value())).sum() }

    /// Adds one unit of `product` in the given variant. A line with the same
    /// product, color and size absorbs the unit; otherwise a new line is
    /// appended.
    pub fn add_line(&mut self, product: &Product, color: Option<&str>, size: Option<&str>) -> Result<LineId, CartError> {
        if !product.accepts_variant(color, size) {
            return Err(CartError::InvalidVariant { product_id: product.id(), color: color.map(str::to_string), size: size.map(str::to_string) });
        }
        if let Some(existing) = self.lines.iter_mut().find(|l| l.matches(product.id(), color, size)) {
            existing.quantity = existing.quantity.increment();
            let event = CartEvent::LineMerged { line_id: existing.id, quantity: existing.quantity.value() };
            let id = existing.id;
            self.raise_event(event);
            return Ok(id);
        }
        let line = CartLine {
            id: LineId::generate(),
            product: product.clone(),
            quantity: Quantity::ONE,
            color: color.map(str::to_string),
            size: size.map(str::to_string),
        };
        let id = line.id;
        self.lines.push(line);
        self.raise_event(CartEvent::LineAdded { line_id: id, product_id: product.id() });
        Ok(id)
    }

    /// Sets the quantity directly. Zero or less removes the line; more than
    /// `u32::MAX` is rejected and leaves the line as it was.
    pub fn update_quantity(&mut self, id: LineId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_line(id);
        }
        let Some(quantity) = u32::try_from(quantity).ok().and_then(Quantity::new) else {
            return Err(CartError::QuantityTooLarge(quantity));
        };
        let line = self.lines.iter_mut().find(|l| l.id == id).ok_or(CartError::LineNotFound(id))?;
        line.quantity = quantity;
        self.raise_event(CartEvent::QuantityChanged { line_id: id, quantity: quantity.value() });
        Ok(())
    }

    pub fn remove_line(&mut self, id: LineId) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() == before { return Err(CartError::LineNotFound(id)); }
        self.raise_event(CartEvent::LineRemoved { line_id: id });
        Ok(())
    }

    /// Recomputed on every call.
    pub fn subtotal(&self) -> Money {
        let amount = self.lines.iter().map(|l| l.line_total().amount()).sum();
        Money::new(amount, &self.currency)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Cart line not found: {0}")]
    LineNotFound(LineId),
    #[error("Product {product_id} has no variant color={color:?} size={size:?}")]
    InvalidVariant { product_id: ProductId, color: Option<String>, size: Option<String> },
    #[error("Quantity {0} is too large")]
    QuantityTooLarge(i64),
}
