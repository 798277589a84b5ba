mod domain;
mod clients;
mod validation;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod product_actor;

use tracing::{error, info, Instrument};
use crate::app_system::{CatalogConfig, CatalogSystem, setup_tracing};
use crate::domain::{ProductBatchUpdate, ProductInput, ProductQuery};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = CatalogConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting product catalog");

    let system = CatalogSystem::start(&config).await.map_err(|e| e.to_string())?;
    let products = &system.product_client;

    let span = tracing::info_span!("product_creation");
    let created = async {
        info!("Creating product");
        let input = ProductInput::new("Gizmo", 14.5, 12).with_description("Pocket-sized gizmo");
        products.create_product(input).await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(product_id = %created.id, "Product created successfully");

    let span = tracing::info_span!("catalog_queries");
    async {
        let fetched = products.get_product(created.id).await.map_err(|e| e.to_string())?;
        info!(name = %fetched.name, price = fetched.price, "Fetched product by id");

        let mid_range = products
            .query_products(ProductQuery::new().min_price(10.0).max_price(25.0))
            .await
            .map_err(|e| e.to_string())?;
        info!(matches = mid_range.len(), "Products priced between 10 and 25");

        let widgets = products
            .query_products(ProductQuery::new().name_contains("widget"))
            .await
            .map_err(|e| e.to_string())?;
        info!(matches = widgets.len(), "Products named like 'widget'");

        let all = products.list_products().await.map_err(|e| e.to_string())?;
        info!(total = all.len(), "Listed catalog");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Invalid input is rejected with per-field violations
    match products.create_product(ProductInput::new("", -1.0, -5)).await {
        Ok(product) => error!(product_id = %product.id, "Invalid product was accepted"),
        Err(e) => info!(error = %e, "Invalid product rejected"),
    }

    let span = tracing::info_span!("batch_maintenance");
    async {
        let restock = ProductBatchUpdate::new(
            created.id,
            ProductInput::new("Gizmo", 13.0, 40).with_description("Pocket-sized gizmo"),
        );
        let updated = products.update_products(vec![restock]).await.map_err(|e| e.to_string())?;
        info!(updated = updated.len(), "Batch update applied");

        let renamed = products
            .update_product(created.id, ProductInput::new("Gizmo Pro", 17.0, 40))
            .await
            .map_err(|e| e.to_string())?;
        info!(product_id = %renamed.id, name = %renamed.name, "Product updated");

        // Unknown ids are skipped rather than reported
        let deleted = products
            .delete_products(vec![created.id, uuid::Uuid::new_v4()])
            .await
            .map_err(|e| e.to_string())?;
        info!(deleted = deleted.len(), "Batch delete applied");

        if let Err(e) = products.delete_product(created.id).await {
            info!(error = %e, "Second delete reports the product as missing");
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let remaining = products.count_products().await.map_err(|e| e.to_string())?;
    info!(remaining, "Catalog size");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
