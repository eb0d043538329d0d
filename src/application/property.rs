//! Property catalog service.
//!
//! Keeps a local copy of the `properties` table and mirrors every change
//! made through the data service. Service failures are logged and turned
//! into `None`/`false`; the local copy only changes after the service
//! accepted the write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::domain::listing::ListingQuery;
use crate::domain::{Amount, InventorySummary, PortfolioSummary, Property, PropertyId};
use crate::port::outbound::data::{DataService, Filter, Order, Table};

/// Cached view of the property listings.
pub struct PropertyCatalog {
    data: Arc<dyn DataService>,
    properties: RwLock<Vec<Property>>,
}

impl PropertyCatalog {
    pub fn new(data: Arc<dyn DataService>) -> Self {
        Self {
            data,
            properties: RwLock::new(Vec::new()),
        }
    }

    /// Reload every listing, newest first.
    ///
    /// Rows that do not decode are skipped. Returns false and keeps the
    /// previous copy if the service call fails.
    pub async fn refresh(&self) -> bool {
        let order = Order::descending("listedDate");
        let rows = match self
            .data
            .select_all(Table::Properties, &Filter::none(), Some(&order))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Failed to load properties");
                return false;
            }
        };

        let properties: Vec<Property> = rows.into_iter().filter_map(decode).collect();
        info!(count = properties.len(), "Properties loaded");
        *self.properties.write() = properties;
        true
    }

    /// Snapshot of the cached listings.
    #[must_use]
    pub fn list(&self) -> Vec<Property> {
        self.properties.read().clone()
    }

    /// Cached listings filtered and sorted by `query`.
    #[must_use]
    pub fn search(&self, query: &ListingQuery) -> Vec<Property> {
        let properties = self.properties.read();
        query.apply(&properties).into_iter().cloned().collect()
    }

    /// A single listing, from the cache or else from the service.
    pub async fn get(&self, id: &PropertyId) -> Option<Property> {
        if let Some(cached) = self.cached(id) {
            return Some(cached);
        }
        match self.data.select_one(Table::Properties, id.as_str()).await {
            Ok(row) => row.and_then(decode),
            Err(e) => {
                error!(property_id = %id, error = %e, "Failed to load property");
                None
            }
        }
    }

    /// Validate and insert a new listing under a fresh id.
    pub async fn create(&self, mut property: Property) -> Option<Property> {
        if let Err(e) = property.validate() {
            warn!(error = %e, "Rejected invalid property");
            return None;
        }

        let now = Utc::now();
        property.id = PropertyId::generate();
        property.listed_date.get_or_insert(now);
        property.updated_date = Some(now);

        let row = encode(&property)?;
        let stored = match self.data.insert(Table::Properties, row).await {
            Ok(stored) => stored.and_then(decode).unwrap_or(property),
            Err(e) => {
                error!(error = %e, "Failed to create property");
                return None;
            }
        };

        info!(property_id = %stored.id, title = %stored.title, "Property created");
        self.properties.write().insert(0, stored.clone());
        Some(stored)
    }

    /// Replace a listing's fields.
    pub async fn update(&self, mut property: Property) -> Option<Property> {
        if let Err(e) = property.validate() {
            warn!(property_id = %property.id, error = %e, "Rejected invalid property");
            return None;
        }
        property.updated_date = Some(Utc::now());

        let id = property.id.clone();
        let patch = encode(&property)?;
        self.persist(&id, patch, property).await
    }

    /// Delete a listing. Returns true when the service removed a row.
    pub async fn delete(&self, id: &PropertyId) -> bool {
        match self.data.delete(Table::Properties, id.as_str()).await {
            Ok(true) => {
                self.properties.write().retain(|p| p.id != *id);
                info!(property_id = %id, "Property deleted");
                true
            }
            Ok(false) => {
                warn!(property_id = %id, "Property not found for delete");
                false
            }
            Err(e) => {
                error!(property_id = %id, error = %e, "Failed to delete property");
                false
            }
        }
    }

    /// Record a sale: status, price, date, archive flag and derived figures.
    pub async fn mark_as_sold(
        &self,
        id: &PropertyId,
        sold_price: Amount,
        at: DateTime<Utc>,
    ) -> Option<Property> {
        let mut property = self.get(id).await?;
        if let Err(e) = property.mark_as_sold(sold_price, at) {
            warn!(property_id = %id, error = %e, "Rejected sale");
            return None;
        }

        let patch = json!({
            "status": property.status,
            "soldDate": property.sold_date,
            "isArchived": property.is_archived,
            "financials": property.financials,
            "updatedDate": property.updated_date,
        });
        let sold = self.persist(id, patch, property).await?;
        info!(
            property_id = %id,
            sold_price = %sold_price,
            margin = %sold.financial_summary().margin,
            "Property marked as sold"
        );
        Some(sold)
    }

    /// Flip the liked flag. Returns the new value.
    pub async fn toggle_like(&self, id: &PropertyId) -> Option<bool> {
        let mut property = self.get(id).await?;
        property.is_liked = !property.is_liked;
        let liked = property.is_liked;

        self.persist(id, json!({ "isLiked": liked }), property)
            .await
            .map(|p| p.is_liked)
    }

    /// Portfolio roll-up over the cached listings.
    #[must_use]
    pub fn summary(&self) -> PortfolioSummary {
        PortfolioSummary::from_properties(&self.properties.read())
    }

    /// Inventory counts over the cached listings.
    #[must_use]
    pub fn inventory(&self) -> InventorySummary {
        InventorySummary::from_properties(&self.properties.read())
    }

    fn cached(&self, id: &PropertyId) -> Option<Property> {
        self.properties.read().iter().find(|p| p.id == *id).cloned()
    }

    /// Send `patch` and, on success, store the service's row (or `local`
    /// when the service echoes nothing) in the cache.
    async fn persist(&self, id: &PropertyId, patch: Value, local: Property) -> Option<Property> {
        let updated = match self.data.update(Table::Properties, id.as_str(), patch).await {
            Ok(Some(row)) => decode(row).unwrap_or(local),
            Ok(None) => {
                warn!(property_id = %id, "Property not found for update");
                return None;
            }
            Err(e) => {
                error!(property_id = %id, error = %e, "Failed to update property");
                return None;
            }
        };

        let mut properties = self.properties.write();
        match properties.iter_mut().find(|p| p.id == *id) {
            Some(slot) => *slot = updated.clone(),
            None => properties.push(updated.clone()),
        }
        debug!(property_id = %id, "Property cache updated");
        Some(updated)
    }
}

fn decode(row: Value) -> Option<Property> {
    match serde_json::from_value::<Property>(row) {
        Ok(property) => Some(property),
        Err(e) => {
            warn!(error = %e, "Skipping undecodable property row");
            None
        }
    }
}

fn encode(property: &Property) -> Option<Value> {
    match serde_json::to_value(property) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(property_id = %property.id, error = %e, "Failed to encode property");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Margin, PropertyStatus};
    use crate::error::ServiceError;
    use crate::testkit::domain::{property, sold_property};
    use crate::testkit::service::InMemoryDataService;
    use rust_decimal_macros::dec;

    fn rows(properties: &[Property]) -> Vec<Value> {
        properties
            .iter()
            .map(|p| serde_json::to_value(p).unwrap())
            .collect()
    }

    async fn loaded(data: &InMemoryDataService) -> PropertyCatalog {
        let catalog = PropertyCatalog::new(Arc::new(data.clone()));
        assert!(catalog.refresh().await);
        catalog
    }

    #[tokio::test]
    async fn refresh_failure_keeps_previous_listings() {
        let data = InMemoryDataService::new()
            .with_rows(Table::Properties, rows(&[property("a"), property("b")]));
        let catalog = loaded(&data).await;

        data.set_failure(Some(ServiceError::Network("offline".into())));

        assert!(!catalog.refresh().await);
        assert_eq!(catalog.list().len(), 2);
    }

    #[tokio::test]
    async fn refresh_skips_undecodable_rows() {
        let mut bad = rows(&[property("a")]);
        bad.push(json!({ "id": "broken" }));
        let data = InMemoryDataService::new().with_rows(Table::Properties, bad);

        let catalog = loaded(&data).await;

        assert_eq!(catalog.list().len(), 1);
    }

    #[tokio::test]
    async fn create_assigns_id_and_rejects_invalid() {
        let data = InMemoryDataService::new();
        let catalog = loaded(&data).await;

        let created = catalog.create(property("draft")).await.unwrap();
        assert_ne!(created.id.as_str(), "draft");
        assert!(created.listed_date.is_some());
        assert_eq!(data.rows(Table::Properties).len(), 1);

        let mut invalid = property("x");
        invalid.title = "  ".into();
        assert!(catalog.create(invalid).await.is_none());
        assert_eq!(catalog.list().len(), 1);
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_untouched() {
        let data = InMemoryDataService::new().with_rows(Table::Properties, rows(&[property("a")]));
        let catalog = loaded(&data).await;
        data.set_failure(Some(ServiceError::Rejected("rls".into())));

        let mut edited = property("a");
        edited.title = "Renamed".into();
        assert!(catalog.update(edited).await.is_none());
        assert!(!catalog.delete(&PropertyId::new("a")).await);
        assert_eq!(catalog.toggle_like(&PropertyId::new("a")).await, None);

        let cached = catalog.list();
        assert_eq!(cached[0].title, "Listing a");
        assert!(!cached[0].is_liked);
    }

    #[tokio::test]
    async fn update_replaces_cached_and_stored_listing() {
        let data = InMemoryDataService::new().with_rows(Table::Properties, rows(&[property("a")]));
        let catalog = loaded(&data).await;

        let mut edited = property("a");
        edited.title = "Renamed".into();
        let updated = catalog.update(edited).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert!(updated.updated_date.is_some());
        assert_eq!(catalog.list()[0].title, "Renamed");
        assert_eq!(data.rows(Table::Properties)[0]["title"], "Renamed");
    }

    #[tokio::test]
    async fn mark_as_sold_persists_derived_figures() {
        let mut listing = property("a");
        listing.financials = Some(crate::domain::Financials {
            purchase_price: Some(dec!(200000)),
            project_costs: Some(dec!(50000)),
            ..Default::default()
        });
        let data = InMemoryDataService::new().with_rows(Table::Properties, rows(&[listing]));
        let catalog = loaded(&data).await;

        let sold = catalog
            .mark_as_sold(&PropertyId::new("a"), dec!(300000), Utc::now())
            .await
            .unwrap();

        assert_eq!(sold.status, PropertyStatus::Sold);
        assert!(sold.is_archived);
        assert_eq!(sold.financial_summary().margin, Margin::Percent(dec!(20)));

        let stored: Property =
            serde_json::from_value(data.rows(Table::Properties)[0].clone()).unwrap();
        let financials = stored.financials.unwrap();
        assert_eq!(financials.profit, Some(dec!(50000)));
        assert_eq!(financials.total_investment, Some(dec!(250000)));
    }

    #[tokio::test]
    async fn mark_as_sold_rejects_non_positive_price() {
        let data = InMemoryDataService::new().with_rows(Table::Properties, rows(&[property("a")]));
        let catalog = loaded(&data).await;

        let result = catalog
            .mark_as_sold(&PropertyId::new("a"), dec!(0), Utc::now())
            .await;

        assert!(result.is_none());
        assert_eq!(catalog.list()[0].status, PropertyStatus::Active);
    }

    #[tokio::test]
    async fn toggle_like_and_summary() {
        let data = InMemoryDataService::new().with_rows(
            Table::Properties,
            rows(&[property("a"), sold_property("s", dec!(100), dec!(150))]),
        );
        let catalog = loaded(&data).await;

        assert_eq!(catalog.toggle_like(&PropertyId::new("a")).await, Some(true));
        assert_eq!(catalog.toggle_like(&PropertyId::new("a")).await, Some(false));

        let summary = catalog.summary();
        assert_eq!(summary.sold_count, 1);
        assert_eq!(summary.total_profit, dec!(50));
        assert_eq!(catalog.inventory().active_properties, 1);
    }

    #[tokio::test]
    async fn delete_removes_from_cache() {
        let data = InMemoryDataService::new().with_rows(Table::Properties, rows(&[property("a")]));
        let catalog = loaded(&data).await;

        assert!(catalog.delete(&PropertyId::new("a")).await);
        assert!(!catalog.delete(&PropertyId::new("a")).await);
        assert!(catalog.list().is_empty());
    }
}
