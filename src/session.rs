//! Session state and the reducer that drives it.
//!
//! All mutable storefront state lives in one [`SessionState`]. Every user
//! event is an [`Action`]; applying it is a synchronous transition
//! `(state, action) -> state`. Actions that target something that does not
//! exist (an unknown product, a removed line, an undeclared color) leave the
//! state untouched. Any action that changes the cart or the form returns the
//! checkout status to editing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CategoryFilter};
use crate::domain::aggregates::cart::Cart;
use crate::domain::aggregates::favorites::Favorites;
use crate::domain::aggregates::order::{CheckoutForm, CheckoutPatch, DeliveryFees, OrderConfirmation, OrderDraft};
use crate::domain::events::{CheckoutEvent, DomainEvent};
use crate::domain::value_objects::{LineId, ProductId};
use crate::services::OrderSubmissionService;
use crate::view::StorefrontView;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetSearch { query: String },
    SelectCategory { category: CategoryFilter },
    AddToCart {
        product_id: ProductId,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        size: Option<String>,
    },
    UpdateQuantity { line_id: LineId, quantity: i64 },
    RemoveLine { line_id: LineId },
    ToggleFavorite { product_id: ProductId },
    OpenProduct { product_id: ProductId },
    CloseProduct,
    ChooseColor { color: String },
    ChooseSize { size: String },
    AddSelectedToCart,
    UpdateCheckout(CheckoutPatch),
}

/// Product open in the detail view with the variant currently picked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutStatus {
    #[default]
    Editing,
    Confirmed(OrderConfirmation),
    Rejected { reasons: Vec<String> },
}

#[derive(Clone, Debug)]
pub struct SessionState {
    cart: Cart,
    favorites: Favorites,
    search: String,
    category: CategoryFilter,
    selection: Option<Selection>,
    checkout: CheckoutForm,
    status: CheckoutStatus,
    events: Vec<DomainEvent>,
}

impl SessionState {
    pub fn new(currency: &str) -> Self {
        Self {
            cart: Cart::new(currency),
            favorites: Favorites::new(),
            search: String::new(),
            category: CategoryFilter::All,
            selection: None,
            checkout: CheckoutForm::default(),
            status: CheckoutStatus::Editing,
            events: vec![],
        }
    }

    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn favorites(&self) -> &Favorites { &self.favorites }
    pub fn search(&self) -> &str { &self.search }
    pub fn category(&self) -> &CategoryFilter { &self.category }
    pub fn selection(&self) -> Option<&Selection> { self.selection.as_ref() }
    pub fn checkout(&self) -> &CheckoutForm { &self.checkout }
    pub fn status(&self) -> &CheckoutStatus { &self.status }

    /// Pure transition: consumes the state and returns its successor.
    pub fn apply(mut self, action: &Action, catalog: &Catalog) -> Self {
        self.reduce(action, catalog);
        self
    }

    pub(crate) fn reduce(&mut self, action: &Action, catalog: &Catalog) {
        let edited = match action {
            Action::SetSearch { query } => {
                self.search = query.clone();
                false
            }
            Action::SelectCategory { category } => {
                self.category = category.clone();
                false
            }
            Action::AddToCart { product_id, color, size } => self.add_to_cart(catalog, *product_id, color.as_deref(), size.as_deref()),
            Action::UpdateQuantity { line_id, quantity } => match self.cart.update_quantity(*line_id, *quantity) {
                Ok(()) => true,
                Err(e) => {
                    debug!(error = %e, "quantity update ignored");
                    false
                }
            },
            Action::RemoveLine { line_id } => match self.cart.remove_line(*line_id) {
                Ok(()) => true,
                Err(e) => {
                    debug!(error = %e, "line removal ignored");
                    false
                }
            },
            Action::ToggleFavorite { product_id } => {
                if catalog.get(*product_id).is_some() {
                    self.favorites.toggle(*product_id);
                } else {
                    warn!(%product_id, "favorite toggle for unknown product ignored");
                }
                false
            }
            Action::OpenProduct { product_id } => {
                match catalog.get(*product_id) {
                    Some(p) => {
                        self.selection = Some(Selection {
                            product_id: p.id(),
                            color: p.default_color().map(str::to_string),
                            size: p.default_size().map(str::to_string),
                        });
                    }
                    None => warn!(%product_id, "cannot open unknown product"),
                }
                false
            }
            Action::CloseProduct => {
                self.selection = None;
                false
            }
            Action::ChooseColor { color } => {
                self.choose(catalog, Some(color), None);
                false
            }
            Action::ChooseSize { size } => {
                self.choose(catalog, None, Some(size));
                false
            }
            Action::AddSelectedToCart => self.add_selected(catalog),
            Action::UpdateCheckout(patch) => {
                self.checkout.apply(patch.clone());
                true
            }
        };
        // A confirmation or rejection describes the cart and form it was computed from.
        if edited {
            self.status = CheckoutStatus::Editing;
        }
    }

    fn add_to_cart(&mut self, catalog: &Catalog, product_id: ProductId, color: Option<&str>, size: Option<&str>) -> bool {
        let Some(product) = catalog.get(product_id) else {
            warn!(%product_id, "add to cart for unknown product ignored");
            return false;
        };
        match self.cart.add_line(product, color, size) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "add to cart rejected");
                false
            }
        }
    }

    fn choose(&mut self, catalog: &Catalog, color: Option<&String>, size: Option<&String>) {
        let Some(selection) = self.selection.as_mut() else { return; };
        let Some(product) = catalog.get(selection.product_id) else { return; };
        if !product.accepts_variant(color.map(String::as_str), size.map(String::as_str)) {
            debug!(product_id = %selection.product_id, ?color, ?size, "undeclared variant choice ignored");
            return;
        }
        if let Some(c) = color { selection.color = Some(c.clone()); }
        if let Some(s) = size { selection.size = Some(s.clone()); }
    }

    fn add_selected(&mut self, catalog: &Catalog) -> bool {
        let Some(selection) = self.selection.clone() else { return false; };
        if !catalog.get(selection.product_id).is_some_and(|p| p.is_in_stock()) {
            debug!(product_id = %selection.product_id, "out of stock, add disabled");
            return false;
        }
        let added = self.add_to_cart(catalog, selection.product_id, selection.color.as_deref(), selection.size.as_deref());
        if added {
            self.selection = None;
        }
        added
    }

    fn submit(&mut self, fees: &DeliveryFees, service: &dyn OrderSubmissionService) {
        if matches!(self.status, CheckoutStatus::Confirmed(_)) {
            return;
        }
        let mut reasons = self.checkout.problems();
        if self.cart.is_empty() {
            reasons.insert(0, "cart is empty".to_string());
        }
        if reasons.is_empty() {
            let draft = OrderDraft::from_cart(self.checkout.clone(), &self.cart, fees);
            match service.submit(&draft) {
                Ok(confirmation) => {
                    self.events.push(DomainEvent::Checkout(CheckoutEvent::Confirmed {
                        order_number: confirmation.order_number.clone(),
                        total: confirmation.total.amount(),
                    }));
                    self.status = CheckoutStatus::Confirmed(confirmation);
                    return;
                }
                Err(e) => reasons.push(e.to_string()),
            }
        }
        self.events.push(DomainEvent::Checkout(CheckoutEvent::Rejected { reasons: reasons.clone() }));
        self.status = CheckoutStatus::Rejected { reasons };
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        let mut events = self.cart.take_events();
        events.extend(self.favorites.take_events());
        events.append(&mut self.events);
        events
    }
}

/// One shopper's storefront: the catalog, the fee table and the session
/// state, with the derived view available after every transition.
#[derive(Clone, Debug)]
pub struct Storefront {
    catalog: Arc<Catalog>,
    fees: DeliveryFees,
    state: SessionState,
}

impl Storefront {
    pub fn new(catalog: Arc<Catalog>, fees: DeliveryFees) -> Self {
        let state = SessionState::new(catalog.currency());
        Self { catalog, fees, state }
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn fees(&self) -> &DeliveryFees { &self.fees }
    pub fn state(&self) -> &SessionState { &self.state }

    pub fn dispatch(&mut self, action: &Action) {
        debug!(?action, "dispatch");
        self.state.reduce(action, &self.catalog);
        self.log_events();
    }

    pub fn submit_order(&mut self, service: &dyn OrderSubmissionService) -> &CheckoutStatus {
        self.state.submit(&self.fees, service);
        self.log_events();
        &self.state.status
    }

    pub fn view(&self) -> StorefrontView {
        StorefrontView::render(&self.state, &self.catalog, &self.fees)
    }

    fn log_events(&mut self) {
        for event in self.state.take_events() {
            match &event {
                DomainEvent::Checkout(CheckoutEvent::Confirmed { order_number, total }) => {
                    info!(%order_number, %total, "order confirmed");
                }
                DomainEvent::Checkout(CheckoutEvent::Rejected { reasons }) => {
                    warn!(?reasons, "order rejected");
                }
                other => debug!(event = ?other, "domain event"),
            }
        }
    }
}
