//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_query`] to assert behavior.

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test owns instead of a running
/// `ResourceActor`, so the test decides what each request answers.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a CreateMany request
pub async fn expect_create_many<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(Vec<T::CreateParams>, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::CreateMany { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Query request
pub async fn expect_query<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Filter, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Query { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, T::Update, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, update, respond_to }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an UpdateMany request
pub async fn expect_update_many<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(Vec<(T::Id, T::Update)>, Responder<Vec<T::Id>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::UpdateMany { updates, respond_to }) => Some((updates, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, Responder<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, ProductInput};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        // Anything other than the expected request yields None
        let create_task = tokio::spawn(async move {
            client.create(ProductInput::new("Test", 1.0, 1)).await
        });

        assert!(expect_get(&mut receiver).await.is_none());
        let result = create_task.await.unwrap();
        assert_eq!(result, Err(FrameworkError::ActorDropped));
    }
}
