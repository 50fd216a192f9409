use bakery_store::{PagedList, Registry, Repository, Session, Table, UnitOfWork, paginate};
use domain_markets::Market;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, ListProductsParams, Product, ProductDetails, UpdateProduct};
use crate::query::{ProductFilter, sort_products};

/// Repositories participating in product write operations.
pub struct ProductRegistry {
    pub products: Repository<Product>,
    pub markets: Repository<Market>,
}

impl Registry for ProductRegistry {
    fn sessions(&mut self) -> Vec<&mut dyn Session> {
        vec![&mut self.products, &mut self.markets]
    }

    fn sessions_ref(&self) -> Vec<&dyn Session> {
        vec![&self.products, &self.markets]
    }
}

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService {
    products: Table<Product>,
    markets: Table<Market>,
}

impl ProductService {
    pub fn new(products: Table<Product>, markets: Table<Market>) -> Self {
        Self { products, markets }
    }

    fn unit_of_work(&self) -> UnitOfWork<ProductRegistry> {
        UnitOfWork::new(ProductRegistry {
            products: Repository::new(self.products.clone()),
            markets: Repository::new(self.markets.clone()),
        })
    }

    async fn ensure_market_exists(
        &self,
        uow: &mut UnitOfWork<ProductRegistry>,
        market_id: Uuid,
    ) -> ProductResult<()> {
        let exists = uow
            .repositories()
            .markets
            .any(move |m| m.id == market_id)
            .await?;
        if !exists {
            return Err(ProductError::MarketNotFound(market_id));
        }
        Ok(())
    }

    /// Create a product. The referenced market must exist and the name must
    /// be unique within that market (case-insensitive).
    #[instrument(skip(self, input), fields(product_name = %input.name, product_kind = %input.kind))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;
        let details = ProductDetails::from_create(&input).map_err(ProductError::Validation)?;

        let mut uow = self.unit_of_work();
        self.ensure_market_exists(&mut uow, input.market_id).await?;

        let name = input.name.clone();
        let market_id = input.market_id;
        let duplicate = uow
            .repositories()
            .products
            .any(move |p| p.market_id == market_id && p.name.eq_ignore_ascii_case(&name))
            .await?;
        if duplicate {
            return Err(ProductError::DuplicateName(input.name));
        }

        let product = Product::new(input, details);
        uow.repositories().products.add(product.clone()).await?;
        uow.save_changes_with_transaction().await?;

        Ok(product)
    }

    /// Get a product by ID. Soft-deleted products are still returned.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        let mut uow = self.unit_of_work();
        uow.repositories()
            .products
            .get_by_id(id)
            .await
            .map_err(|_| ProductError::NotFound(id))
    }

    /// List products, filtered, sorted and paginated.
    #[instrument(skip(self, params))]
    pub async fn list_products(
        &self,
        params: ListProductsParams,
    ) -> ProductResult<PagedList<Product>> {
        let page = params.page()?;

        let mut uow = self.unit_of_work();
        let market_ids = self.resolve_market_filter(&mut uow, &params).await?;
        let filter = ProductFilter::from_params(&params, market_ids);
        filter.validate()?;

        let mut products = uow
            .repositories()
            .products
            .find(move |p| filter.matches(p))
            .await?;
        sort_products(
            &mut products,
            params.sort_by.unwrap_or_default(),
            params.sort_direction.unwrap_or_default(),
        );

        Ok(paginate(products, page))
    }

    /// Resolve the market part of the filter to a concrete id set. A market
    /// name that matches no market yields an empty set, which matches no
    /// products.
    async fn resolve_market_filter(
        &self,
        uow: &mut UnitOfWork<ProductRegistry>,
        params: &ListProductsParams,
    ) -> ProductResult<Option<Vec<Uuid>>> {
        let Some(name) = params.market_name.clone() else {
            return Ok(params.market_id.map(|id| vec![id]));
        };

        let needle = name.to_lowercase();
        let matching = uow
            .repositories()
            .markets
            .find(move |m| m.name.to_lowercase().contains(&needle))
            .await?;
        let mut ids: Vec<Uuid> = matching.iter().map(|m| m.id).collect();
        if let Some(market_id) = params.market_id {
            ids.retain(|id| *id == market_id);
        }
        Ok(Some(ids))
    }

    /// Update a product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let mut uow = self.unit_of_work();
        let mut product = uow
            .repositories()
            .products
            .get_by_id(id)
            .await
            .map_err(|_| ProductError::NotFound(id))?;

        if let Some(market_id) = input.market_id {
            self.ensure_market_exists(&mut uow, market_id).await?;
        }

        if let Some(name) = input.name.clone() {
            let market_id = input.market_id.unwrap_or(product.market_id);
            let needle = name.clone();
            let taken = uow
                .repositories()
                .products
                .any(move |p| {
                    p.id != id
                        && p.market_id == market_id
                        && p.name.eq_ignore_ascii_case(&needle)
                })
                .await?;
            if taken {
                return Err(ProductError::DuplicateName(name));
            }
        }

        product.apply_update(input);
        uow.repositories().products.update(product.clone());
        uow.save_changes_with_transaction().await?;

        Ok(product)
    }

    /// Soft-delete a product; it stays in storage but leaves all listings.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let mut uow = self.unit_of_work();
        uow.repositories()
            .products
            .soft_delete(id)
            .await
            .map_err(|_| ProductError::NotFound(id))?;
        uow.save_changes().await?;
        Ok(())
    }

    /// Physically remove a product from storage.
    #[instrument(skip(self))]
    pub async fn purge_product(&self, id: Uuid) -> ProductResult<()> {
        let mut uow = self.unit_of_work();
        uow.repositories()
            .products
            .remove_by_id(id)
            .await
            .map_err(|_| ProductError::NotFound(id))?;
        uow.save_changes().await?;
        Ok(())
    }

    /// All orderable products of one market, sorted by name.
    #[instrument(skip(self))]
    pub async fn available_products(&self, market_id: Uuid) -> ProductResult<Vec<Product>> {
        let mut uow = self.unit_of_work();
        self.ensure_market_exists(&mut uow, market_id).await?;

        let mut products = uow
            .repositories()
            .products
            .find(move |p| p.market_id == market_id && p.can_be_ordered())
            .await?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreadType, CakeFlavor, PastryType, PizzaSize, PizzaStyle, ProductKind};
    use chrono::NaiveTime;
    use domain_markets::CreateMarket;

    async fn service_with_market() -> (ProductService, Uuid) {
        let markets = Table::new();
        let market = Market::new(CreateMarket {
            name: "Forno Centrale".to_string(),
            address: "Via Roma 1".to_string(),
            city: "Torino".to_string(),
            opening_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            open: None,
        });
        let market_id = market.id;
        markets.insert(market).await;

        (ProductService::new(Table::new(), markets), market_id)
    }

    fn create_input(name: &str, kind: ProductKind, market_id: Uuid) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: None,
            price_cents: 8_50,
            available: None,
            image_url: None,
            market_id,
            kind,
            ingredients: None,
            pizza_style: Some(PizzaStyle::Margherita),
            pizza_size: Some(PizzaSize::Medium),
            spicy: None,
            bread_type: Some(BreadType::Sourdough),
            gluten_free: None,
            shelf_life_days: Some(3),
            cake_flavor: Some(CakeFlavor::Chocolate),
            occasion: None,
            serving_size: Some(8),
            pastry_type: Some(PastryType::Croissant),
            filling: None,
            vegan: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let (service, market_id) = service_with_market().await;
        let created = service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();

        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.name, "Margherita");
        assert_eq!(fetched.kind(), ProductKind::Pizza);
        assert!(fetched.can_be_ordered());
    }

    #[tokio::test]
    async fn test_create_with_unknown_market_rejected() {
        let (service, _market_id) = service_with_market().await;
        let err = service
            .create_product(create_input(
                "Margherita",
                ProductKind::Pizza,
                Uuid::new_v4(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::MarketNotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_name_in_same_market_rejected() {
        let (service, market_id) = service_with_market().await;
        service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();

        let err = service
            .create_product(create_input("MARGHERITA", ProductKind::Pizza, market_id))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_missing_subtype_field_rejected() {
        let (service, market_id) = service_with_market().await;
        let mut input = create_input("Baguette", ProductKind::Bread, market_id);
        input.bread_type = None;
        let err = service.create_product(input).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_gates_subtype_filter_on_kind() {
        let (service, market_id) = service_with_market().await;
        service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();
        service
            .create_product(create_input("Sourdough loaf", ProductKind::Bread, market_id))
            .await
            .unwrap();

        // Flavor filter with no cakes matching: empty page, not an error.
        let page = service
            .list_products(ListProductsParams {
                kind: Some(ProductKind::Cake),
                cake_flavor: Some(CakeFlavor::Lemon),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);

        // Same flavor filter under kind=pizza is a no-op.
        let page = service
            .list_products(ListProductsParams {
                kind: Some(ProductKind::Pizza),
                cake_flavor: Some(CakeFlavor::Lemon),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_list_by_market_name_with_no_match_is_empty() {
        let (service, market_id) = service_with_market().await;
        service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();

        let page = service
            .list_products(ListProductsParams {
                market_name: Some("centrale".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);

        let page = service
            .list_products(ListProductsParams {
                market_name: Some("panetteria".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_invalid_price_range_rejected() {
        let (service, _market_id) = service_with_market().await;
        let err = service
            .list_products(ListProductsParams {
                min_price_cents: Some(10_00),
                max_price_cents: Some(5_00),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProductError::Store(bakery_store::StoreError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_cannot_collide_within_market() {
        let (service, market_id) = service_with_market().await;
        service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();
        let other = service
            .create_product(create_input("Calzone", ProductKind::Pizza, market_id))
            .await
            .unwrap();

        let err = service
            .update_product(
                other.id,
                UpdateProduct {
                    name: Some("Margherita".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_soft_delete_leaves_listing_but_keeps_lookup() {
        let (service, market_id) = service_with_market().await;
        let created = service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();

        service.delete_product(created.id).await.unwrap();

        let page = service
            .list_products(ListProductsParams::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
        assert!(service.get_product(created.id).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn test_purge_removes_product_entirely() {
        let (service, market_id) = service_with_market().await;
        let created = service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();

        service.purge_product(created.id).await.unwrap();

        let err = service.get_product(created.id).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_available_products_excludes_unorderable() {
        let (service, market_id) = service_with_market().await;
        service
            .create_product(create_input("Margherita", ProductKind::Pizza, market_id))
            .await
            .unwrap();
        let mut unavailable = create_input("Calzone", ProductKind::Pizza, market_id);
        unavailable.available = Some(false);
        service.create_product(unavailable).await.unwrap();
        let deleted = service
            .create_product(create_input("Sourdough loaf", ProductKind::Bread, market_id))
            .await
            .unwrap();
        service.delete_product(deleted.id).await.unwrap();

        let products = service.available_products(market_id).await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Margherita"]);
    }

    #[tokio::test]
    async fn test_available_products_for_unknown_market_rejected() {
        let (service, _market_id) = service_with_market().await;
        let err = service
            .available_products(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::MarketNotFound(_)));
    }
}
