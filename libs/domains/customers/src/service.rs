use bakery_store::{PagedList, Registry, Repository, Session, Table, UnitOfWork, paginate};
use domain_markets::Market;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{
    CreateCustomer, Customer, CustomerDiscountDto, ListCustomersParams, UpdateCustomer,
};

/// Repositories participating in customer write operations.
pub struct CustomerRegistry {
    pub customers: Repository<Customer>,
    pub markets: Repository<Market>,
}

impl Registry for CustomerRegistry {
    fn sessions(&mut self) -> Vec<&mut dyn Session> {
        vec![&mut self.customers, &mut self.markets]
    }

    fn sessions_ref(&self) -> Vec<&dyn Session> {
        vec![&self.customers, &self.markets]
    }
}

/// Service layer for Customer business logic
#[derive(Clone)]
pub struct CustomerService {
    customers: Table<Customer>,
    markets: Table<Market>,
}

impl CustomerService {
    pub fn new(customers: Table<Customer>, markets: Table<Market>) -> Self {
        Self { customers, markets }
    }

    fn unit_of_work(&self) -> UnitOfWork<CustomerRegistry> {
        UnitOfWork::new(CustomerRegistry {
            customers: Repository::new(self.customers.clone()),
            markets: Repository::new(self.markets.clone()),
        })
    }

    /// Register a new customer. The referenced market must exist and the
    /// email must be unique among non-deleted customers.
    #[instrument(skip(self, input), fields(customer_email = %input.email))]
    pub async fn create_customer(&self, input: CreateCustomer) -> CustomerResult<Customer> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        let mut uow = self.unit_of_work();

        let market_id = input.market_id;
        let market_exists = uow
            .repositories()
            .markets
            .any(move |m| m.id == market_id)
            .await?;
        if !market_exists {
            return Err(CustomerError::UnknownMarket(market_id));
        }

        let email = input.email.clone();
        let duplicate = uow
            .repositories()
            .customers
            .any(move |c| c.email.eq_ignore_ascii_case(&email))
            .await?;
        if duplicate {
            return Err(CustomerError::DuplicateEmail(input.email));
        }

        let customer = Customer::new(input);
        uow.repositories().customers.add(customer.clone()).await?;
        uow.save_changes_with_transaction().await?;

        Ok(customer)
    }

    /// Get a customer by ID. Soft-deleted customers are still returned.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: Uuid) -> CustomerResult<Customer> {
        let mut uow = self.unit_of_work();
        uow.repositories()
            .customers
            .get_by_id(id)
            .await
            .map_err(|_| CustomerError::NotFound(id))
    }

    /// List customers, filtered and paginated, sorted by last then first name.
    #[instrument(skip(self, params))]
    pub async fn list_customers(
        &self,
        params: ListCustomersParams,
    ) -> CustomerResult<PagedList<Customer>> {
        let page = params.page()?;

        let mut uow = self.unit_of_work();
        let mut customers = uow
            .repositories()
            .customers
            .find(|c| params.matches(c))
            .await?;
        customers.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });

        Ok(paginate(customers, page))
    }

    /// Update a customer
    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        id: Uuid,
        input: UpdateCustomer,
    ) -> CustomerResult<Customer> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        let mut uow = self.unit_of_work();
        let mut customer = uow
            .repositories()
            .customers
            .get_by_id(id)
            .await
            .map_err(|_| CustomerError::NotFound(id))?;

        if let Some(market_id) = input.market_id {
            let market_exists = uow
                .repositories()
                .markets
                .any(move |m| m.id == market_id)
                .await?;
            if !market_exists {
                return Err(CustomerError::UnknownMarket(market_id));
            }
        }

        if let Some(email) = input.email.clone() {
            let needle = email.clone();
            let taken = uow
                .repositories()
                .customers
                .any(move |c| c.id != id && c.email.eq_ignore_ascii_case(&needle))
                .await?;
            if taken {
                return Err(CustomerError::DuplicateEmail(email));
            }
        }

        customer.apply_update(input);
        uow.repositories().customers.update(customer.clone());
        uow.save_changes_with_transaction().await?;

        Ok(customer)
    }

    /// Soft-delete a customer
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: Uuid) -> CustomerResult<()> {
        let mut uow = self.unit_of_work();
        uow.repositories()
            .customers
            .soft_delete(id)
            .await
            .map_err(|_| CustomerError::NotFound(id))?;
        uow.save_changes().await?;
        Ok(())
    }

    /// Current discount position for a customer
    #[instrument(skip(self))]
    pub async fn customer_discount(&self, id: Uuid) -> CustomerResult<CustomerDiscountDto> {
        let customer = self.get_customer(id).await?;
        Ok(CustomerDiscountDto::from(&customer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain_markets::CreateMarket;

    async fn service_with_market() -> (CustomerService, Uuid) {
        let markets = Table::new();
        let market = Market::new(CreateMarket {
            name: "Forno Centrale".to_string(),
            address: "Via Roma 1".to_string(),
            city: "Torino".to_string(),
            opening_time: chrono::NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            closing_time: chrono::NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            open: None,
        });
        let market_id = market.id;
        markets.insert(market).await;

        (CustomerService::new(Table::new(), markets), market_id)
    }

    fn create_input(email: &str, market_id: Uuid) -> CreateCustomer {
        CreateCustomer {
            first_name: "Ada".to_string(),
            last_name: "Rossi".to_string(),
            email: email.to_string(),
            phone: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            market_id,
            vip: Some(true),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_customer() {
        let (service, market_id) = service_with_market().await;
        let created = service
            .create_customer(create_input("ada@example.com", market_id))
            .await
            .unwrap();

        let fetched = service.get_customer(created.id).await.unwrap();
        assert_eq!(fetched.email, "ada@example.com");
        assert_eq!(fetched.total_spent_cents, 0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_market_rejected() {
        let (service, _market_id) = service_with_market().await;
        let err = service
            .create_customer(create_input("ada@example.com", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::UnknownMarket(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_case_insensitive() {
        let (service, market_id) = service_with_market().await;
        service
            .create_customer(create_input("ada@example.com", market_id))
            .await
            .unwrap();

        let err = service
            .create_customer(create_input("ADA@example.com", market_id))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_update_cannot_steal_existing_email() {
        let (service, market_id) = service_with_market().await;
        service
            .create_customer(create_input("ada@example.com", market_id))
            .await
            .unwrap();
        let other = service
            .create_customer(create_input("bea@example.com", market_id))
            .await
            .unwrap();

        let err = service
            .update_customer(
                other.id,
                UpdateCustomer {
                    email: Some("ada@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_discount_reflects_vip_tier() {
        let (service, market_id) = service_with_market().await;
        let created = service
            .create_customer(create_input("ada@example.com", market_id))
            .await
            .unwrap();

        // Fresh VIP with no spend: no discount yet.
        let discount = service.customer_discount(created.id).await.unwrap();
        assert!(discount.vip);
        assert_eq!(discount.discount_percent, 0);
    }

    #[tokio::test]
    async fn test_deleted_customer_leaves_listing_but_keeps_lookup() {
        let (service, market_id) = service_with_market().await;
        let created = service
            .create_customer(create_input("ada@example.com", market_id))
            .await
            .unwrap();

        service.delete_customer(created.id).await.unwrap();

        let page = service
            .list_customers(ListCustomersParams::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
        assert!(service.get_customer(created.id).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn test_list_filters_by_vip_and_market() {
        let (service, market_id) = service_with_market().await;
        for i in 0..4 {
            let mut input = create_input(&format!("c{i}@example.com"), market_id);
            input.vip = Some(i % 2 == 0);
            input.last_name = format!("Rossi{i}");
            service.create_customer(input).await.unwrap();
        }

        let page = service
            .list_customers(ListCustomersParams {
                vip: Some(true),
                market_id: Some(market_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 2);
    }
}
