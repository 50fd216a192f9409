//! Filter and sort composition for product listings.

use bakery_store::{StoreError, StoreResult};
use uuid::Uuid;

use crate::models::{
    BreadType, CakeFlavor, ListProductsParams, PastryType, PizzaStyle, Product, ProductDetails,
    ProductKind, ProductSort, SortDirection,
};

/// Resolved product filter. `market_ids` is the already-resolved set of
/// market candidates; `Some(vec![])` matches nothing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub kind: Option<ProductKind>,
    pub pizza_style: Option<PizzaStyle>,
    pub bread_type: Option<BreadType>,
    pub cake_flavor: Option<CakeFlavor>,
    pub pastry_type: Option<PastryType>,
    pub market_ids: Option<Vec<Uuid>>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub available: Option<bool>,
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn from_params(params: &ListProductsParams, market_ids: Option<Vec<Uuid>>) -> Self {
        Self {
            kind: params.kind,
            pizza_style: params.pizza_style,
            bread_type: params.bread_type,
            cake_flavor: params.cake_flavor,
            pastry_type: params.pastry_type,
            market_ids,
            min_price_cents: params.min_price_cents,
            max_price_cents: params.max_price_cents,
            available: params.available,
            search: params.search.clone(),
        }
    }

    /// Reject nonsensical price bounds up front instead of silently returning
    /// an empty page.
    pub fn validate(&self) -> StoreResult<()> {
        if let Some(min) = self.min_price_cents {
            if min < 0 {
                return Err(StoreError::InvalidInput(
                    "min_price_cents must not be negative".to_string(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price_cents, self.max_price_cents) {
            if max < min {
                return Err(StoreError::InvalidInput(
                    "max_price_cents must not be below min_price_cents".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn matches(&self, product: &Product) -> bool {
        if product.deleted {
            return false;
        }
        if let Some(kind) = self.kind {
            if product.kind() != kind {
                return false;
            }
        }
        if !self.matches_subtype(product) {
            return false;
        }
        if let Some(market_ids) = &self.market_ids {
            if !market_ids.contains(&product.market_id) {
                return false;
            }
        }
        if let Some(min) = self.min_price_cents {
            if product.price_cents < min {
                return false;
            }
        }
        if let Some(max) = self.max_price_cents {
            if product.price_cents > max {
                return false;
            }
        }
        if let Some(available) = self.available {
            if product.available != available {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_description = product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }
        true
    }

    /// A subtype filter only applies when the category filter selects its own
    /// category; a cake-flavor filter under kind=pizza is a no-op, not a
    /// contradiction.
    fn matches_subtype(&self, product: &Product) -> bool {
        match (self.kind, &product.details) {
            (Some(ProductKind::Pizza), ProductDetails::Pizza { style, .. }) => self
                .pizza_style
                .is_none_or(|wanted| *style == wanted),
            (Some(ProductKind::Bread), ProductDetails::Bread { bread_type, .. }) => self
                .bread_type
                .is_none_or(|wanted| *bread_type == wanted),
            (Some(ProductKind::Cake), ProductDetails::Cake { flavor, .. }) => self
                .cake_flavor
                .is_none_or(|wanted| *flavor == wanted),
            (Some(ProductKind::Pastry), ProductDetails::Pastry { pastry_type, .. }) => self
                .pastry_type
                .is_none_or(|wanted| *pastry_type == wanted),
            _ => true,
        }
    }
}

/// Sort products in place by the requested key and direction. Ties fall back
/// to name so pagination stays stable.
pub fn sort_products(products: &mut [Product], sort_by: ProductSort, direction: SortDirection) {
    products.sort_by(|a, b| {
        let ordering = match sort_by {
            ProductSort::Name => a.name.cmp(&b.name),
            ProductSort::Price => a
                .price_cents
                .cmp(&b.price_cents)
                .then_with(|| a.name.cmp(&b.name)),
            ProductSort::Category => a
                .kind()
                .to_string()
                .cmp(&b.kind().to_string())
                .then_with(|| a.name.cmp(&b.name)),
            ProductSort::CreatedAt => a
                .created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name)),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
