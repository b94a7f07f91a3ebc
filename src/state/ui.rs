use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Tour,
    Accommodation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CartItem {
    pub kind: ItemKind,
    pub item_id: Uuid,
    pub title: String,
    pub guests: i32,
}

/// Theme, cart, favorites and mobile-menu flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UiState {
    pub theme: Theme,
    pub cart: Vec<CartItem>,
    pub favorites: BTreeSet<Uuid>,
    pub mobile_menu_open: bool,
}

impl UiState {
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.theme
    }

    /// Adding an item already in the cart replaces it.
    pub fn add_to_cart(&mut self, item: CartItem) {
        match self
            .cart
            .iter_mut()
            .find(|c| c.kind == item.kind && c.item_id == item.item_id)
        {
            Some(existing) => *existing = item,
            None => self.cart.push(item),
        }
    }

    pub fn remove_from_cart(&mut self, item_id: Uuid) -> bool {
        let before = self.cart.len();
        self.cart.retain(|c| c.item_id != item_id);
        self.cart.len() != before
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Returns whether the item is a favorite afterwards.
    pub fn toggle_favorite(&mut self, item_id: Uuid) -> bool {
        if self.favorites.remove(&item_id) {
            false
        } else {
            self.favorites.insert(item_id);
            true
        }
    }

    pub fn set_mobile_menu(&mut self, open: bool) {
        self.mobile_menu_open = open;
    }
}
