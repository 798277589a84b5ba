use validator::Validate;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Product, ProductInput, ProductQuery};
use crate::validation::ValidationReport;
use uuid::Uuid;

impl Entity for Product {
    type Id = Uuid;
    type CreateParams = ProductInput;
    type Update = ProductInput;
    type Filter = ProductQuery;

    fn id(&self) -> &Uuid { &self.id }

    /// Checks the name, description, price and quantity constraints.
    fn validate_create(params: &ProductInput) -> Result<(), ValidationReport> {
        params.validate().map_err(ValidationReport::from)
    }

    /// Updates carry the same fields as creation, so the same constraints apply.
    fn validate_update(update: &ProductInput) -> Result<(), ValidationReport> {
        update.validate().map_err(ValidationReport::from)
    }

    fn from_create_params(id: Uuid, params: ProductInput) -> Result<Self, FrameworkError> {
        Ok(Product::new(id, params))
    }

    /// Replaces name, description, price and quantity. The id never changes.
    fn on_update(&mut self, update: ProductInput) -> Result<(), FrameworkError> {
        self.apply(update);
        Ok(())
    }

    fn matches(&self, filter: &ProductQuery) -> bool {
        filter.matches(self)
    }
}
