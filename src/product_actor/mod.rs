//! Product-specific resource logic: validation, replacement updates and filtering.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::ResourceActor;
use crate::clients::ProductClient;
use crate::domain::Product;
use uuid::Uuid;

/// Creates a new Product actor and its client.
///
/// Ids are random v4 UUIDs; the actor retries on the (unlikely) collision.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let (actor, generic_client) = ResourceActor::<Product>::new(buffer_size, Uuid::new_v4);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
