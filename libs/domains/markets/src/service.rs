use bakery_store::{PagedList, Registry, Repository, Session, Table, UnitOfWork, paginate};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{MarketError, MarketResult};
use crate::models::{check_opening_hours, CreateMarket, ListMarketsParams, Market, UpdateMarket};

/// Repositories participating in market write operations.
pub struct MarketRegistry {
    pub markets: Repository<Market>,
}

impl Registry for MarketRegistry {
    fn sessions(&mut self) -> Vec<&mut dyn Session> {
        vec![&mut self.markets]
    }

    fn sessions_ref(&self) -> Vec<&dyn Session> {
        vec![&self.markets]
    }
}

/// Service layer for Market business logic
#[derive(Clone)]
pub struct MarketService {
    markets: Table<Market>,
}

impl MarketService {
    pub fn new(markets: Table<Market>) -> Self {
        Self { markets }
    }

    fn unit_of_work(&self) -> UnitOfWork<MarketRegistry> {
        UnitOfWork::new(MarketRegistry {
            markets: Repository::new(self.markets.clone()),
        })
    }

    /// Create a new market with validation and duplicate-name checking
    #[instrument(skip(self, input), fields(market_name = %input.name))]
    pub async fn create_market(&self, input: CreateMarket) -> MarketResult<Market> {
        input
            .validate()
            .map_err(|e| MarketError::Validation(e.to_string()))?;
        check_opening_hours(input.opening_time, input.closing_time)
            .map_err(|e| MarketError::Validation(e.to_string()))?;

        let mut uow = self.unit_of_work();
        let name = input.name.clone();
        let duplicate = uow
            .repositories()
            .markets
            .any(move |m| m.name.eq_ignore_ascii_case(&name))
            .await?;
        if duplicate {
            return Err(MarketError::DuplicateName(input.name));
        }

        let market = Market::new(input);
        uow.repositories().markets.add(market.clone()).await?;
        uow.save_changes_with_transaction().await?;

        Ok(market)
    }

    /// Get a market by ID. Soft-deleted markets are still returned.
    #[instrument(skip(self))]
    pub async fn get_market(&self, id: Uuid) -> MarketResult<Market> {
        let mut uow = self.unit_of_work();
        uow.repositories()
            .markets
            .get_by_id(id)
            .await
            .map_err(|_| MarketError::NotFound(id))
    }

    /// List markets, filtered and paginated, sorted by name.
    #[instrument(skip(self, params))]
    pub async fn list_markets(&self, params: ListMarketsParams) -> MarketResult<PagedList<Market>> {
        let page = params.page()?;

        let mut uow = self.unit_of_work();
        let mut markets = uow
            .repositories()
            .markets
            .find(|m| params.matches(m))
            .await?;
        markets.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(paginate(markets, page))
    }

    /// Update a market
    #[instrument(skip(self, input))]
    pub async fn update_market(&self, id: Uuid, input: UpdateMarket) -> MarketResult<Market> {
        input
            .validate()
            .map_err(|e| MarketError::Validation(e.to_string()))?;

        let mut uow = self.unit_of_work();
        let mut market = uow
            .repositories()
            .markets
            .get_by_id(id)
            .await
            .map_err(|_| MarketError::NotFound(id))?;

        if let Some(name) = input.name.clone() {
            let needle = name.clone();
            let taken = uow
                .repositories()
                .markets
                .any(move |m| m.id != id && m.name.eq_ignore_ascii_case(&needle))
                .await?;
            if taken {
                return Err(MarketError::DuplicateName(name));
            }
        }

        market.apply_update(input);
        check_opening_hours(market.opening_time, market.closing_time)
            .map_err(|e| MarketError::Validation(e.to_string()))?;

        uow.repositories().markets.update(market.clone());
        uow.save_changes_with_transaction().await?;

        Ok(market)
    }

    /// Soft-delete a market: the row is kept but disappears from listings.
    #[instrument(skip(self))]
    pub async fn delete_market(&self, id: Uuid) -> MarketResult<()> {
        let mut uow = self.unit_of_work();
        uow.repositories()
            .markets
            .soft_delete(id)
            .await
            .map_err(|_| MarketError::NotFound(id))?;
        uow.save_changes().await?;
        Ok(())
    }
}
