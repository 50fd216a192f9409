use bakery_store::{Entity, Page, SoftDeletable, StoreError, StoreResult};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A point of sale with daily opening hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    /// Whether the market currently operates at all. A closed market is
    /// never open regardless of the time of day.
    pub open: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Market {
    pub fn new(input: CreateMarket) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            city: input.city,
            opening_time: input.opening_time,
            closing_time: input.closing_time,
            open: input.open.unwrap_or(true),
            deleted: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Whether the market is open at the given time of day.
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        self.open && time >= self.opening_time && time <= self.closing_time
    }

    /// Whether the market is open right now (server local time).
    pub fn is_currently_open(&self) -> bool {
        self.is_open_at(chrono::Local::now().time())
    }

    /// Daily opening window in hours.
    pub fn daily_opening_hours(&self) -> f64 {
        (self.closing_time - self.opening_time).num_minutes() as f64 / 60.0
    }

    pub fn apply_update(&mut self, input: UpdateMarket) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(address) = input.address {
            self.address = address;
        }
        if let Some(city) = input.city {
            self.city = city;
        }
        if let Some(opening_time) = input.opening_time {
            self.opening_time = opening_time;
        }
        if let Some(closing_time) = input.closing_time {
            self.closing_time = closing_time;
        }
        if let Some(open) = input.open {
            self.open = open;
        }
        self.updated_at = Some(Utc::now());
    }
}

impl Entity for Market {
    type Key = Uuid;

    const NAME: &'static str = "market";

    fn key(&self) -> Uuid {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl SoftDeletable for Market {
    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.updated_at = Some(now);
    }
}

/// Input for creating a market
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMarket {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub address: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[schema(value_type = String, example = "07:00:00")]
    pub opening_time: NaiveTime,

    #[schema(value_type = String, example = "19:30:00")]
    pub closing_time: NaiveTime,

    /// Defaults to true
    pub open: Option<bool>,
}

/// Input for updating a market. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMarket {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[schema(value_type = String, example = "07:00:00")]
    pub opening_time: Option<NaiveTime>,

    #[schema(value_type = String, example = "19:30:00")]
    pub closing_time: Option<NaiveTime>,

    pub open: Option<bool>,
}

/// Market representation returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarketDto {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    #[schema(value_type = String, example = "07:00:00")]
    pub opening_time: NaiveTime,
    #[schema(value_type = String, example = "19:30:00")]
    pub closing_time: NaiveTime,
    pub open: bool,
    pub currently_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Market> for MarketDto {
    fn from(market: &Market) -> Self {
        Self {
            id: market.id,
            name: market.name.clone(),
            address: market.address.clone(),
            city: market.city.clone(),
            opening_time: market.opening_time,
            closing_time: market.closing_time,
            open: market.open,
            currently_open: market.is_currently_open(),
            created_at: market.created_at,
            updated_at: market.updated_at,
        }
    }
}

/// Query parameters for listing markets
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMarketsParams {
    /// Case-insensitive city filter
    pub city: Option<String>,
    /// Only markets that are (not) operating
    pub open: Option<bool>,
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Page size (default 10)
    pub page_size: Option<u32>,
}

impl ListMarketsParams {
    pub fn page(&self) -> StoreResult<Page> {
        Page::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(Page::DEFAULT_SIZE),
        )
    }

    pub fn matches(&self, market: &Market) -> bool {
        if let Some(city) = &self.city {
            if !market.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if let Some(open) = self.open {
            if market.open != open {
                return false;
            }
        }
        true
    }
}

/// Opening hours sanity check shared by create and update paths.
pub(crate) fn check_opening_hours(
    opening: NaiveTime,
    closing: NaiveTime,
) -> Result<(), StoreError> {
    if closing <= opening {
        return Err(StoreError::InvalidInput(format!(
            "closing time {closing} must be after opening time {opening}"
        )));
    }
    Ok(())
}
