use bakery_store::{Entity, Page, SoftDeletable, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Product category discriminator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductKind {
    Plain,
    Pizza,
    Bread,
    Cake,
    Pastry,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PizzaStyle {
    Neapolitan,
    Roman,
    Sicilian,
    NewYorkStyle,
    Calzone,
    Margherita,
    Pepperoni,
    FourCheese,
    WhitePizza,
    GlutenFree,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PizzaSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BreadType {
    Baguette,
    Ciabatta,
    Sourdough,
    WholeWheat,
    Rye,
    Multigrain,
    Focaccia,
    Brioche,
    Cornbread,
    Bagel,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CakeFlavor {
    Chocolate,
    Vanilla,
    Strawberry,
    Lemon,
    Cheesecake,
    RedVelvet,
    Carrot,
    Tiramisu,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PastryType {
    Croissant,
    Danish,
    Muffin,
    Eclair,
    Cannoli,
    Macaron,
    Strudel,
    Donut,
}

/// Subtype-specific payload. Exactly one variant per [`ProductKind`];
/// fields of a non-matching variant simply do not exist on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ProductDetails {
    Plain,
    Pizza {
        ingredients: Vec<String>,
        style: PizzaStyle,
        size: PizzaSize,
        spicy: bool,
    },
    Bread {
        bread_type: BreadType,
        gluten_free: bool,
        shelf_life_days: u16,
    },
    Cake {
        flavor: CakeFlavor,
        occasion: Option<String>,
        serving_size: u16,
    },
    Pastry {
        pastry_type: PastryType,
        filling: Option<String>,
        vegan: bool,
    },
}

impl ProductDetails {
    pub fn kind(&self) -> ProductKind {
        match self {
            ProductDetails::Plain => ProductKind::Plain,
            ProductDetails::Pizza { .. } => ProductKind::Pizza,
            ProductDetails::Bread { .. } => ProductKind::Bread,
            ProductDetails::Cake { .. } => ProductKind::Cake,
            ProductDetails::Pastry { .. } => ProductKind::Pastry,
        }
    }
}

/// A catalog item sold by one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Price in cents.
    pub price_cents: i64,
    pub available: bool,
    pub image_url: Option<String>,
    pub market_id: Uuid,
    pub details: ProductDetails,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(input: CreateProduct, details: ProductDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price_cents: input.price_cents,
            available: input.available.unwrap_or(true),
            image_url: input.image_url,
            market_id: input.market_id,
            details,
            deleted: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn kind(&self) -> ProductKind {
        self.details.kind()
    }

    /// A product can be ordered when it is available, not soft-deleted and
    /// carries a positive price.
    pub fn can_be_ordered(&self) -> bool {
        self.available && !self.deleted && self.price_cents > 0
    }

    /// Price after applying a percentage discount, rounded down to the cent.
    pub fn discounted_price_cents(&self, discount_percent: u8) -> i64 {
        let discount = self.price_cents * i64::from(discount_percent.min(100)) / 100;
        self.price_cents - discount
    }

    /// Minutes of oven time before a pizza is ready. `None` for every other
    /// category.
    pub fn preparation_time_minutes(&self) -> Option<u16> {
        match &self.details {
            ProductDetails::Pizza { size, .. } => Some(match size {
                PizzaSize::Small => 15,
                PizzaSize::Medium => 20,
                PizzaSize::Large => 25,
            }),
            _ => None,
        }
    }

    /// Price per serving for cakes, `None` for everything else or when the
    /// serving size is zero.
    pub fn price_per_serving_cents(&self) -> Option<i64> {
        match &self.details {
            ProductDetails::Cake { serving_size, .. } if *serving_size > 0 => {
                Some(self.price_cents / i64::from(*serving_size))
            }
            _ => None,
        }
    }

    /// Apply a partial update. Subtype fields are applied only when they match
    /// the product's own category; the category itself never changes.
    pub fn apply_update(&mut self, input: UpdateProduct) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = Some(description);
        }
        if let Some(price_cents) = input.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(available) = input.available {
            self.available = available;
        }
        if let Some(image_url) = input.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(market_id) = input.market_id {
            self.market_id = market_id;
        }
        match &mut self.details {
            ProductDetails::Plain => {}
            ProductDetails::Pizza {
                ingredients,
                style,
                size,
                spicy,
            } => {
                if let Some(new_ingredients) = input.ingredients {
                    *ingredients = new_ingredients;
                }
                if let Some(new_style) = input.pizza_style {
                    *style = new_style;
                }
                if let Some(new_size) = input.pizza_size {
                    *size = new_size;
                }
                if let Some(new_spicy) = input.spicy {
                    *spicy = new_spicy;
                }
            }
            ProductDetails::Bread {
                bread_type,
                gluten_free,
                shelf_life_days,
            } => {
                if let Some(new_type) = input.bread_type {
                    *bread_type = new_type;
                }
                if let Some(new_gluten_free) = input.gluten_free {
                    *gluten_free = new_gluten_free;
                }
                if let Some(new_shelf_life) = input.shelf_life_days {
                    *shelf_life_days = new_shelf_life;
                }
            }
            ProductDetails::Cake {
                flavor,
                occasion,
                serving_size,
            } => {
                if let Some(new_flavor) = input.cake_flavor {
                    *flavor = new_flavor;
                }
                if let Some(new_occasion) = input.occasion {
                    *occasion = Some(new_occasion);
                }
                if let Some(new_serving_size) = input.serving_size {
                    *serving_size = new_serving_size;
                }
            }
            ProductDetails::Pastry {
                pastry_type,
                filling,
                vegan,
            } => {
                if let Some(new_type) = input.pastry_type {
                    *pastry_type = new_type;
                }
                if let Some(new_filling) = input.filling {
                    *filling = Some(new_filling);
                }
                if let Some(new_vegan) = input.vegan {
                    *vegan = new_vegan;
                }
            }
        }
        self.updated_at = Some(Utc::now());
    }
}

impl Entity for Product {
    type Key = Uuid;

    const NAME: &'static str = "product";

    fn key(&self) -> Uuid {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl SoftDeletable for Product {
    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.updated_at = Some(now);
    }
}

/// Input for creating a product. `kind` selects the category; the
/// corresponding subtype fields become required (see
/// [`ProductDetails::from_create`]), the rest are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Price in cents, must be positive
    #[validate(range(min = 1))]
    pub price_cents: i64,

    /// Defaults to true
    pub available: Option<bool>,

    #[validate(length(max = 500))]
    pub image_url: Option<String>,

    pub market_id: Uuid,

    pub kind: ProductKind,

    // Pizza
    pub ingredients: Option<Vec<String>>,
    pub pizza_style: Option<PizzaStyle>,
    pub pizza_size: Option<PizzaSize>,
    pub spicy: Option<bool>,

    // Bread
    pub bread_type: Option<BreadType>,
    pub gluten_free: Option<bool>,
    #[validate(range(min = 1))]
    pub shelf_life_days: Option<u16>,

    // Cake
    pub cake_flavor: Option<CakeFlavor>,
    #[validate(length(max = 100))]
    pub occasion: Option<String>,
    #[validate(range(min = 1))]
    pub serving_size: Option<u16>,

    // Pastry
    pub pastry_type: Option<PastryType>,
    #[validate(length(max = 100))]
    pub filling: Option<String>,
    pub vegan: Option<bool>,
}

impl ProductDetails {
    /// Build the subtype payload from a create request. Fails when a field the
    /// selected category requires is missing.
    pub fn from_create(input: &CreateProduct) -> Result<Self, String> {
        match input.kind {
            ProductKind::Plain => Ok(ProductDetails::Plain),
            ProductKind::Pizza => {
                let style = input
                    .pizza_style
                    .ok_or_else(|| "pizza_style is required for pizzas".to_string())?;
                Ok(ProductDetails::Pizza {
                    ingredients: input.ingredients.clone().unwrap_or_default(),
                    style,
                    size: input.pizza_size.unwrap_or_default(),
                    spicy: input.spicy.unwrap_or(false),
                })
            }
            ProductKind::Bread => {
                let bread_type = input
                    .bread_type
                    .ok_or_else(|| "bread_type is required for breads".to_string())?;
                let shelf_life_days = input
                    .shelf_life_days
                    .ok_or_else(|| "shelf_life_days is required for breads".to_string())?;
                Ok(ProductDetails::Bread {
                    bread_type,
                    gluten_free: input.gluten_free.unwrap_or(false),
                    shelf_life_days,
                })
            }
            ProductKind::Cake => {
                let flavor = input
                    .cake_flavor
                    .ok_or_else(|| "cake_flavor is required for cakes".to_string())?;
                let serving_size = input
                    .serving_size
                    .ok_or_else(|| "serving_size is required for cakes".to_string())?;
                Ok(ProductDetails::Cake {
                    flavor,
                    occasion: input.occasion.clone(),
                    serving_size,
                })
            }
            ProductKind::Pastry => {
                let pastry_type = input
                    .pastry_type
                    .ok_or_else(|| "pastry_type is required for pastries".to_string())?;
                Ok(ProductDetails::Pastry {
                    pastry_type,
                    filling: input.filling.clone(),
                    vegan: input.vegan.unwrap_or(false),
                })
            }
        }
    }
}

/// Input for updating a product. All fields are optional; subtype fields that
/// do not match the product's category are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub price_cents: Option<i64>,

    pub available: Option<bool>,

    #[validate(length(max = 500))]
    pub image_url: Option<String>,

    pub market_id: Option<Uuid>,

    pub ingredients: Option<Vec<String>>,
    pub pizza_style: Option<PizzaStyle>,
    pub pizza_size: Option<PizzaSize>,
    pub spicy: Option<bool>,

    pub bread_type: Option<BreadType>,
    pub gluten_free: Option<bool>,
    #[validate(range(min = 1))]
    pub shelf_life_days: Option<u16>,

    pub cake_flavor: Option<CakeFlavor>,
    #[validate(length(max = 100))]
    pub occasion: Option<String>,
    #[validate(range(min = 1))]
    pub serving_size: Option<u16>,

    pub pastry_type: Option<PastryType>,
    #[validate(length(max = 100))]
    pub filling: Option<String>,
    pub vegan: Option<bool>,
}

/// Flattened product representation returned by the API. Subtype fields are
/// present only when `category` matches.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub available: bool,
    pub can_be_ordered: bool,
    pub image_url: Option<String>,
    pub market_id: Uuid,
    pub category: ProductKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pizza_style: Option<PizzaStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pizza_size: Option<PizzaSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spicy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time_minutes: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bread_type: Option<BreadType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gluten_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_life_days: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cake_flavor: Option<CakeFlavor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_serving_cents: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pastry_type: Option<PastryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegan: Option<bool>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        let mut dto = Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price_cents: product.price_cents,
            available: product.available,
            can_be_ordered: product.can_be_ordered(),
            image_url: product.image_url.clone(),
            market_id: product.market_id,
            category: product.kind(),
            ingredients: None,
            pizza_style: None,
            pizza_size: None,
            spicy: None,
            preparation_time_minutes: None,
            bread_type: None,
            gluten_free: None,
            shelf_life_days: None,
            cake_flavor: None,
            occasion: None,
            serving_size: None,
            price_per_serving_cents: None,
            pastry_type: None,
            filling: None,
            vegan: None,
            created_at: product.created_at,
            updated_at: product.updated_at,
        };
        match &product.details {
            ProductDetails::Plain => {}
            ProductDetails::Pizza {
                ingredients,
                style,
                size,
                spicy,
            } => {
                dto.ingredients = Some(ingredients.clone());
                dto.pizza_style = Some(*style);
                dto.pizza_size = Some(*size);
                dto.spicy = Some(*spicy);
                dto.preparation_time_minutes = product.preparation_time_minutes();
            }
            ProductDetails::Bread {
                bread_type,
                gluten_free,
                shelf_life_days,
            } => {
                dto.bread_type = Some(*bread_type);
                dto.gluten_free = Some(*gluten_free);
                dto.shelf_life_days = Some(*shelf_life_days);
            }
            ProductDetails::Cake {
                flavor,
                occasion,
                serving_size,
            } => {
                dto.cake_flavor = Some(*flavor);
                dto.occasion = occasion.clone();
                dto.serving_size = Some(*serving_size);
                dto.price_per_serving_cents = product.price_per_serving_cents();
            }
            ProductDetails::Pastry {
                pastry_type,
                filling,
                vegan,
            } => {
                dto.pastry_type = Some(*pastry_type);
                dto.filling = filling.clone();
                dto.vegan = Some(*vegan);
            }
        }
        dto
    }
}

/// Sort key for product listings
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Name,
    Price,
    Category,
    CreatedAt,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Query parameters for listing products
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// Only products of this category
    pub kind: Option<ProductKind>,
    /// Only pizzas of this style (ignored unless kind=pizza)
    pub pizza_style: Option<PizzaStyle>,
    /// Only breads of this type (ignored unless kind=bread)
    pub bread_type: Option<BreadType>,
    /// Only cakes of this flavor (ignored unless kind=cake)
    pub cake_flavor: Option<CakeFlavor>,
    /// Only pastries of this type (ignored unless kind=pastry)
    pub pastry_type: Option<PastryType>,
    /// Only products sold by this market
    pub market_id: Option<Uuid>,
    /// Only products sold by markets whose name contains this string
    pub market_name: Option<String>,
    /// Minimum price in cents, inclusive
    pub min_price_cents: Option<i64>,
    /// Maximum price in cents, inclusive
    pub max_price_cents: Option<i64>,
    /// Only (un)available products
    pub available: Option<bool>,
    /// Case-insensitive search against name and description
    pub search: Option<String>,
    /// Sort key (default name)
    pub sort_by: Option<ProductSort>,
    /// Sort direction (default ascending)
    pub sort_direction: Option<SortDirection>,
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Page size (default 10)
    pub page_size: Option<u32>,
}

impl ListProductsParams {
    pub fn page(&self) -> StoreResult<Page> {
        Page::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(Page::DEFAULT_SIZE),
        )
    }
}
