use bakery_store::{Entity, Page, SoftDeletable, StoreResult};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// VIP spend thresholds in cents.
const VIP_GOLD_SPEND_CENTS: i64 = 1_000_00;
const VIP_SILVER_SPEND_CENTS: i64 = 500_00;
const VIP_BRONZE_SPEND_CENTS: i64 = 250_00;

/// A registered customer of one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub market_id: Uuid,
    pub vip: bool,
    /// Lifetime spend in cents.
    pub total_spent_cents: i64,
    pub last_order_date: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn new(input: CreateCustomer) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            market_id: input.market_id,
            vip: input.vip.unwrap_or(false),
            total_spent_cents: 0,
            last_order_date: None,
            deleted: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn age(&self) -> u32 {
        let today = Utc::now().date_naive();
        let mut age = today.year() - self.date_of_birth.year();
        if (today.month(), today.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }

    /// Discount tier for VIP customers, as a percentage.
    ///
    /// Non-VIP customers always get 0, regardless of spend.
    pub fn vip_discount_percent(&self) -> u8 {
        if !self.vip {
            return 0;
        }
        match self.total_spent_cents {
            s if s >= VIP_GOLD_SPEND_CENTS => 15,
            s if s >= VIP_SILVER_SPEND_CENTS => 10,
            s if s >= VIP_BRONZE_SPEND_CENTS => 5,
            _ => 0,
        }
    }

    /// Record a completed order against this customer's history.
    pub fn record_order(&mut self, amount_cents: i64, now: DateTime<Utc>) {
        self.total_spent_cents += amount_cents;
        self.last_order_date = Some(now);
        self.updated_at = Some(now);
    }

    pub fn apply_update(&mut self, input: UpdateCustomer) {
        if let Some(first_name) = input.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = input.email {
            self.email = email;
        }
        if let Some(phone) = input.phone {
            self.phone = Some(phone);
        }
        if let Some(market_id) = input.market_id {
            self.market_id = market_id;
        }
        if let Some(vip) = input.vip {
            self.vip = vip;
        }
        self.updated_at = Some(Utc::now());
    }
}

impl Entity for Customer {
    type Key = Uuid;

    const NAME: &'static str = "customer";

    fn key(&self) -> Uuid {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl SoftDeletable for Customer {
    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.updated_at = Some(now);
    }
}

fn validate_birth_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        return Err(ValidationError::new("birth_date_in_future"));
    }
    Ok(())
}

/// Input for registering a customer
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCustomer {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: NaiveDate,

    pub market_id: Uuid,

    /// Defaults to false
    pub vip: Option<bool>,
}

/// Input for updating a customer. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomer {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    pub market_id: Option<Uuid>,

    pub vip: Option<bool>,
}

/// Customer representation returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub market_id: Uuid,
    pub vip: bool,
    pub total_spent_cents: i64,
    pub last_order_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            full_name: customer.full_name(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            date_of_birth: customer.date_of_birth,
            market_id: customer.market_id,
            vip: customer.vip,
            total_spent_cents: customer.total_spent_cents,
            last_order_date: customer.last_order_date,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Current discount position of one customer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerDiscountDto {
    pub customer_id: Uuid,
    pub vip: bool,
    pub total_spent_cents: i64,
    pub discount_percent: u8,
}

impl From<&Customer> for CustomerDiscountDto {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.id,
            vip: customer.vip,
            total_spent_cents: customer.total_spent_cents,
            discount_percent: customer.vip_discount_percent(),
        }
    }
}

/// Query parameters for listing customers
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCustomersParams {
    /// Only customers registered at this market
    pub market_id: Option<Uuid>,
    /// Only (non-)VIP customers
    pub vip: Option<bool>,
    /// Case-insensitive search against name and email
    pub search: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Page size (default 10)
    pub page_size: Option<u32>,
}

impl ListCustomersParams {
    pub fn page(&self) -> StoreResult<Page> {
        Page::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(Page::DEFAULT_SIZE),
        )
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(market_id) = self.market_id {
            if customer.market_id != market_id {
                return false;
            }
        }
        if let Some(vip) = self.vip {
            if customer.vip != vip {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {} {}",
                customer.first_name.to_lowercase(),
                customer.last_name.to_lowercase(),
                customer.email.to_lowercase()
            );
            if !haystack.contains(&needle) {
                return false;
            }
        }
        true
    }
}
