//! Favorites Aggregate

use std::collections::BTreeSet;
use crate::domain::events::{DomainEvent, FavoriteEvent};
use crate::domain::value_objects::ProductId;

#[derive(Clone, Debug, Default)]
pub struct Favorites {
    ids: BTreeSet<ProductId>,
    events: Vec<DomainEvent>,
}

impl Favorites {
    pub fn new() -> Self { Self::default() }

    pub fn contains(&self, id: ProductId) -> bool { self.ids.contains(&id) }
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ { self.ids.iter().copied() }

    /// Flips membership and returns whether `id` is now a favorite.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.ids.remove(&id) {
            self.events.push(DomainEvent::Favorites(FavoriteEvent::Removed { product_id: id }));
            false
        } else {
            self.ids.insert(id);
            self.events.push(DomainEvent::Favorites(FavoriteEvent::Added { product_id: id }));
            true
        }
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores() {
        let mut favs = Favorites::new();
        favs.toggle(ProductId::new(3));
        let before: Vec<_> = favs.iter().collect();
        assert!(favs.toggle(ProductId::new(5)));
        assert!(!favs.toggle(ProductId::new(5)));
        assert_eq!(favs.iter().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_toggle_events() {
        let mut favs = Favorites::new();
        favs.toggle(ProductId::new(1));
        favs.toggle(ProductId::new(1));
        assert_eq!(
            favs.take_events(),
            vec![
                DomainEvent::Favorites(FavoriteEvent::Added { product_id: ProductId::new(1) }),
                DomainEvent::Favorites(FavoriteEvent::Removed { product_id: ProductId::new(1) }),
            ]
        );
        assert!(favs.is_empty());
    }
}
