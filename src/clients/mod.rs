//! Domain-facing clients wrapping the generic [`ResourceClient`](crate::actor_framework::ResourceClient).

#[macro_use]
mod macros;
mod product_client;

pub use product_client::ProductClient;
