//! Derived view state handed to the presentation layer.
//!
//! Nothing here is stored; every view is rebuilt from [`SessionState`] on
//! request.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{Catalog, CategoryFilter};
use crate::domain::aggregates::order::{compute_total, CheckoutForm, DeliveryFees};
use crate::domain::aggregates::product::Product;
use crate::domain::value_objects::{LineId, Money, ProductId};
use crate::session::{CheckoutStatus, SessionState};

#[derive(Clone, Debug, Serialize)]
pub struct StorefrontView {
    pub catalog: CatalogView,
    pub cart: CartView,
    pub favorites_count: usize,
    pub product: Option<ProductDetailView>,
    pub checkout: CheckoutView,
}

#[derive(Clone, Debug, Serialize)]
pub struct CatalogView {
    pub search: String,
    pub category: CategoryFilter,
    pub categories: Vec<CategoryFilter>,
    pub products: Vec<ProductCard>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub image: String,
    pub price: Money,
    pub old_price: Option<Money>,
    pub discount_badge: Option<String>,
    pub rating: Decimal,
    pub reviews: u32,
    pub in_stock: bool,
    pub favorite: bool,
}

impl ProductCard {
    pub fn new(product: &Product, favorite: bool) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            category: product.category().to_string(),
            image: product.image().to_string(),
            price: product.price().clone(),
            old_price: product.old_price().cloned(),
            discount_badge: product.discount_badge(),
            rating: product.rating(),
            reviews: product.reviews(),
            in_stock: product.is_in_stock(),
            favorite,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: Money,
}

#[derive(Clone, Debug, Serialize)]
pub struct CartLineView {
    pub line_id: LineId,
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub unit_price: Money,
    pub quantity: u32,
    pub total: Money,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub card: ProductCard,
    pub description: String,
    pub features: Vec<String>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
    pub can_add_to_cart: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct CheckoutView {
    pub form: CheckoutForm,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub status: CheckoutStatus,
}

impl StorefrontView {
    pub fn render(state: &SessionState, catalog: &Catalog, fees: &DeliveryFees) -> Self {
        let favorites = state.favorites();
        let products = catalog
            .filter(state.search(), state.category())
            .into_iter()
            .map(|p| ProductCard::new(p, favorites.contains(p.id())))
            .collect();

        let cart = state.cart();
        let lines = cart
            .lines()
            .iter()
            .map(|l| CartLineView {
                line_id: l.id,
                product_id: l.product.id(),
                name: l.product.name().to_string(),
                image: l.product.image().to_string(),
                color: l.color.clone(),
                size: l.size.clone(),
                unit_price: l.unit_price().clone(),
                quantity: l.quantity.value(),
                total: l.line_total(),
            })
            .collect();
        let subtotal = cart.subtotal();

        let product = state.selection().and_then(|sel| {
            let p = catalog.get(sel.product_id)?;
            Some(ProductDetailView {
                card: ProductCard::new(p, favorites.contains(p.id())),
                description: p.description().to_string(),
                features: p.features().to_vec(),
                colors: p.colors().map(<[String]>::to_vec),
                sizes: p.sizes().map(<[String]>::to_vec),
                selected_color: sel.color.clone(),
                selected_size: sel.size.clone(),
                can_add_to_cart: p.is_in_stock(),
            })
        });

        let form = state.checkout().clone();
        let method = form.delivery_method;
        let checkout = CheckoutView {
            delivery_fee: Money::new(fees.fee_for(method), catalog.currency()),
            total: compute_total(&subtotal, method, fees),
            subtotal: subtotal.clone(),
            form,
            status: state.status().clone(),
        };

        Self {
            catalog: CatalogView {
                search: state.search().to_string(),
                category: state.category().clone(),
                categories: catalog.categories(),
                products,
            },
            cart: CartView { lines, item_count: cart.item_count(), subtotal },
            favorites_count: favorites.len(),
            product,
            checkout,
        }
    }
}
