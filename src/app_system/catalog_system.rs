use tracing::{error, info, instrument};

use crate::app_system::CatalogConfig;
use crate::clients::ProductClient;
use crate::domain::ProductInput;
use crate::product_actor::{self, ProductError};

/// The products every fresh catalog starts with when seeding is enabled.
pub fn demo_catalog() -> Vec<ProductInput> {
    vec![
        ProductInput::new("Widget A", 9.99, 100).with_description("Basic widget"),
        ProductInput::new("Widget B", 19.99, 50).with_description("Advanced widget"),
        ProductInput::new("Gadget", 29.99, 25).with_description("Multi-purpose gadget"),
    ]
}

/// The main application system that owns the product actor.
///
/// Responsible for starting the actor, seeding it, and handling shutdown.
pub struct CatalogSystem {
    pub product_client: ProductClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    #[instrument(name = "catalog_system", skip(config), fields(buffer_size = config.buffer_size))]
    pub async fn start(config: &CatalogConfig) -> Result<Self, ProductError> {
        info!("Starting catalog system");

        let (product_actor, product_client) = product_actor::new(config.buffer_size);
        let product_handle = tokio::spawn(product_actor.run());

        let system = Self {
            product_client,
            handles: vec![product_handle],
        };

        if config.seed_demo_data {
            let seeded = system.product_client.create_products(demo_catalog()).await?;
            info!(count = seeded.len(), "Seeded demo catalog");
        }

        Ok(system)
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // The actor stops once every client clone is gone.
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
