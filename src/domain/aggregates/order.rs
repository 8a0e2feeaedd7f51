//! Order Aggregate
//!
//! Checkout form, delivery fee table and the order draft built from a cart
//! snapshot at submission time. Drafts are never persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};
use crate::domain::aggregates::cart::Cart;
use crate::domain::value_objects::{LineId, Money, ProductId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod { #[default] Courier, Pickup, Post }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod { #[default] Card, Cash, Invoice }

/// Fee per delivery method, in the catalog currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeliveryFees {
    pub courier: Decimal,
    pub pickup: Decimal,
    /// Post is billed "by tariff" and has no computation yet; zero unless configured.
    pub post: Decimal,
}

impl Default for DeliveryFees {
    fn default() -> Self {
        Self { courier: Decimal::from(350), pickup: Decimal::ZERO, post: Decimal::ZERO }
    }
}

impl DeliveryFees {
    pub fn fee_for(&self, method: DeliveryMethod) -> Decimal {
        match method {
            DeliveryMethod::Courier => self.courier,
            DeliveryMethod::Pickup => self.pickup,
            DeliveryMethod::Post => self.post,
        }
    }
}

/// Subtotal plus the delivery fee for `method`.
pub fn compute_total(subtotal: &Money, method: DeliveryMethod, fees: &DeliveryFees) -> Money {
    Money::new(subtotal.amount() + fees.fee_for(method), subtotal.currency())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_delivery_address", skip_on_field_errors = false))]
pub struct CheckoutForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    pub delivery_method: DeliveryMethod,
    pub city: String,
    pub address: String,
    pub postal_code: String,
    pub payment_method: PaymentMethod,
    pub comment: String,
}

fn validate_delivery_address(form: &CheckoutForm) -> Result<(), ValidationError> {
    if form.delivery_method == DeliveryMethod::Pickup {
        return Ok(());
    }
    if form.city.trim().is_empty() || form.address.trim().is_empty() {
        let mut err = ValidationError::new("delivery_address");
        err.message = Some("city and address are required for delivery".into());
        return Err(err);
    }
    Ok(())
}

impl CheckoutForm {
    /// Advisory validation, flattened to readable messages in a stable order.
    pub fn problems(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(errors) => flatten(&errors),
        }
    }

    pub fn apply(&mut self, patch: CheckoutPatch) {
        let CheckoutPatch { name, email, phone, delivery_method, city, address, postal_code, payment_method, comment } = patch;
        if let Some(v) = name { self.name = v; }
        if let Some(v) = email { self.email = v; }
        if let Some(v) = phone { self.phone = v; }
        if let Some(v) = delivery_method { self.delivery_method = v; }
        if let Some(v) = city { self.city = v; }
        if let Some(v) = address { self.address = v; }
        if let Some(v) = postal_code { self.postal_code = v; }
        if let Some(v) = payment_method { self.payment_method = v; }
        if let Some(v) = comment { self.comment = v; }
    }
}

fn flatten(errors: &ValidationErrors) -> Vec<String> {
    let mut out: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(m) => m.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    out.sort();
    out
}

/// Partial update of the checkout form; absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub delivery_method: Option<DeliveryMethod>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderLine {
    pub line_id: LineId,
    pub product_id: ProductId,
    pub name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
}

/// Checkout form plus the cart as it stood when the order was submitted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderDraft {
    pub form: CheckoutForm,
    pub lines: Vec<OrderLine>,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

impl OrderDraft {
    pub fn from_cart(form: CheckoutForm, cart: &Cart, fees: &DeliveryFees) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|l| OrderLine {
                line_id: l.id,
                product_id: l.product.id(),
                name: l.product.name().to_string(),
                color: l.color.clone(),
                size: l.size.clone(),
                quantity: l.quantity.value(),
                unit_price: l.unit_price().clone(),
                total: l.line_total(),
            })
            .collect();
        let subtotal = cart.subtotal();
        let delivery_fee = Money::new(fees.fee_for(form.delivery_method), cart.currency());
        let total = compute_total(&subtotal, form.delivery_method, fees);
        Self { form, lines, subtotal, delivery_fee, total }
    }

    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

/// Acknowledgment returned by an order submission service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub total: Money,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::test_product;
    use rust_decimal_macros::dec;

    fn filled_form() -> CheckoutForm {
        CheckoutForm {
            name: "Ivan Petrov".into(),
            email: "ivan@example.com".into(),
            phone: "+7 900 000-00-00".into(),
            city: "Moscow".into(),
            address: "Tverskaya 1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fee_table() {
        let fees = DeliveryFees::default();
        assert_eq!(fees.fee_for(DeliveryMethod::Courier), dec!(350));
        assert_eq!(fees.fee_for(DeliveryMethod::Pickup), dec!(0));
        assert_eq!(fees.fee_for(DeliveryMethod::Post), dec!(0));
    }

    #[test]
    fn test_total_with_courier() {
        let fees = DeliveryFees::default();
        let subtotal = Money::new(dec!(250), "RUB");
        assert_eq!(compute_total(&subtotal, DeliveryMethod::Courier, &fees).amount(), dec!(600));
        assert_eq!(compute_total(&subtotal, DeliveryMethod::Pickup, &fees).amount(), dec!(250));
    }

    #[test]
    fn test_configured_post_fee() {
        let fees = DeliveryFees { post: dec!(420), ..Default::default() };
        let subtotal = Money::new(dec!(1000), "RUB");
        assert_eq!(compute_total(&subtotal, DeliveryMethod::Post, &fees).amount(), dec!(1420));
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let problems = CheckoutForm::default().problems();
        assert!(problems.contains(&"name is required".to_string()));
        assert!(problems.contains(&"phone is required".to_string()));
        assert!(problems.contains(&"a valid email is required".to_string()));
        assert!(problems.contains(&"city and address are required for delivery".to_string()));
    }

    #[test]
    fn test_pickup_needs_no_address() {
        let form = CheckoutForm { delivery_method: DeliveryMethod::Pickup, city: String::new(), address: String::new(), ..filled_form() };
        assert!(form.problems().is_empty());
        let courier = CheckoutForm { delivery_method: DeliveryMethod::Courier, ..form };
        assert_eq!(courier.problems(), vec!["city and address are required for delivery".to_string()]);
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut form = filled_form();
        form.apply(CheckoutPatch { delivery_method: Some(DeliveryMethod::Post), comment: Some("after 6pm".into()), ..Default::default() });
        assert_eq!(form.delivery_method, DeliveryMethod::Post);
        assert_eq!(form.comment, "after 6pm");
        assert_eq!(form.name, "Ivan Petrov");
    }

    #[test]
    fn test_draft_snapshots_cart() {
        let mut cart = Cart::new("RUB");
        cart.add_line(&test_product(1, "A", dec!(100), "X"), None, None).unwrap();
        cart.add_line(&test_product(1, "A", dec!(100), "X"), None, None).unwrap();
        cart.add_line(&test_product(2, "B", dec!(50), "X"), None, None).unwrap();
        let draft = OrderDraft::from_cart(filled_form(), &cart, &DeliveryFees::default());
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].quantity, 2);
        assert_eq!(draft.lines[0].total.amount(), dec!(200));
        assert_eq!(draft.subtotal.amount(), dec!(250));
        assert_eq!(draft.delivery_fee.amount(), dec!(350));
        assert_eq!(draft.total.amount(), dec!(600));
    }
}
