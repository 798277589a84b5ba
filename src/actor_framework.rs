use std::collections::HashMap;
use std::hash::Hash;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::validation::ValidationReport;

/// How many times a colliding id is regenerated before a create is refused.
const MAX_ID_ATTEMPTS: usize = 16;

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Validation, and Filters)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    /// Replacement payload for every mutable field.
    type Update: Send + Sync + Debug;
    /// Query predicate evaluated by [`Entity::matches`].
    type Filter: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    // --- Validation (runs before any lookup or mutation) ---

    fn validate_create(_params: &Self::CreateParams) -> Result<(), ValidationReport> { Ok(()) }
    fn validate_update(_update: &Self::Update) -> Result<(), ValidationReport> { Ok(()) }

    /// Construct the full Entity from the ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, FrameworkError>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), FrameworkError> { Ok(()) }
    fn on_update(&mut self, update: Self::Update) -> Result<(), FrameworkError>;
    fn on_delete(&self) -> Result<(), FrameworkError> { Ok(()) }

    // --- Queries ---

    fn matches(&self, filter: &Self::Filter) -> bool;
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    CreateMany {
        params: Vec<T::CreateParams>,
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Query {
        filter: T::Filter,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    UpdateMany {
        updates: Vec<(T::Id, T::Update)>,
        respond_to: Response<Vec<T::Id>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    DeleteMany {
        ids: Vec<T::Id>,
        respond_to: Response<Vec<T::Id>>,
    },
    Count {
        respond_to: Response<usize>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns the collection. Every request is handled to completion before the
/// next one is received, so each request is atomic relative to the store.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    items: HashMap<T::Id, T>,
    /// Insertion order of the keys in `items`.
    order: Vec<T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            items: HashMap::new(),
            order: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = std::any::type_name::<T>()))]
    pub async fn run(mut self) {
        info!("ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::CreateMany { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create_many(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_get(&id)));
                }
                ResourceRequest::Query { filter, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_query(&filter)));
                }
                ResourceRequest::Update { id, update, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, update));
                }
                ResourceRequest::UpdateMany { updates, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_update_many(updates)));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::DeleteMany { ids, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_delete_many(ids)));
                }
                ResourceRequest::Count { respond_to } => {
                    let _ = respond_to.send(Ok(self.items.len()));
                }
            }
        }
        info!(items = self.items.len(), "ResourceActor stopped");
    }

    /// Generates an id that is neither stored nor taken by `pending`.
    fn next_free_id(&self, pending: &[T]) -> Result<T::Id, FrameworkError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.next_id_fn)();
            if !self.items.contains_key(&id) && !pending.iter().any(|p| p.id() == &id) {
                return Ok(id);
            }
            warn!(id = %id, "Generated id already in use, retrying");
        }
        Err(FrameworkError::Rejected("could not allocate a unique id".to_string()))
    }

    fn build(&self, params: T::CreateParams, pending: &[T]) -> Result<T, FrameworkError> {
        let id = self.next_free_id(pending)?;
        let mut item = T::from_create_params(id, params)?;
        item.on_create()?;
        Ok(item)
    }

    fn insert(&mut self, item: T) {
        let id = item.id().clone();
        self.order.push(id.clone());
        self.items.insert(id, item);
    }

    #[instrument(skip(self, params))]
    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, FrameworkError> {
        debug!("Processing create request");
        T::validate_create(&params).map_err(FrameworkError::Validation)?;
        let item = self.build(params, &[])?;
        self.insert(item.clone());
        info!(id = %item.id(), "Item created");
        Ok(item)
    }

    /// Validates and builds the whole batch before inserting anything.
    #[instrument(skip(self, params), fields(count = params.len()))]
    fn handle_create_many(&mut self, params: Vec<T::CreateParams>) -> Result<Vec<T>, FrameworkError> {
        debug!("Processing create_many request");
        for (index, p) in params.iter().enumerate() {
            if let Err(report) = T::validate_create(p) {
                warn!(index, %report, "Batch create rejected");
                return Err(FrameworkError::Validation(report.for_item(index)));
            }
        }

        let mut created: Vec<T> = Vec::with_capacity(params.len());
        for p in params {
            let item = self.build(p, &created)?;
            created.push(item);
        }
        for item in &created {
            self.insert(item.clone());
        }
        info!(created = created.len(), "Batch created");
        Ok(created)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    fn handle_get(&self, id: &T::Id) -> Option<T> {
        debug!("Processing get request");
        let item = self.items.get(id).cloned();
        if item.is_none() {
            debug!("Item not found");
        }
        item
    }

    #[instrument(skip(self))]
    fn handle_query(&self, filter: &T::Filter) -> Vec<T> {
        debug!("Processing query request");
        let matches: Vec<T> = self
            .order
            .iter()
            .filter_map(|id| self.items.get(id))
            .filter(|item| item.matches(filter))
            .cloned()
            .collect();
        debug!(matched = matches.len(), "Query complete");
        matches
    }

    /// Applies `update` to a copy so a failing hook leaves the stored item untouched.
    fn apply_update(&mut self, id: &T::Id, update: T::Update) -> Result<T, FrameworkError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut updated = item.clone();
        updated.on_update(update)?;
        *item = updated.clone();
        Ok(updated)
    }

    #[instrument(skip(self, id, update), fields(id = %id))]
    fn handle_update(&mut self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        debug!("Processing update request");
        T::validate_update(&update).map_err(FrameworkError::Validation)?;
        let item = self.apply_update(&id, update)?;
        info!("Item updated");
        Ok(item)
    }

    #[instrument(skip(self, updates), fields(count = updates.len()))]
    fn handle_update_many(&mut self, updates: Vec<(T::Id, T::Update)>) -> Vec<T::Id> {
        debug!("Processing update_many request");
        let mut updated = Vec::new();
        for (id, update) in updates {
            if let Err(report) = T::validate_update(&update) {
                debug!(id = %id, %report, "Skipping invalid update");
                continue;
            }
            match self.apply_update(&id, update) {
                // A repeated id is applied again (last write wins) but reported once.
                Ok(_) if updated.contains(&id) => {}
                Ok(_) => updated.push(id),
                Err(e) => debug!(id = %id, error = %e, "Skipping update"),
            }
        }
        info!(updated = updated.len(), "Batch updated");
        updated
    }

    fn remove(&mut self, id: &T::Id) -> Result<(), FrameworkError> {
        let item = self
            .items
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete()?;
        self.items.remove(id);
        self.order.retain(|existing| existing != id);
        Ok(())
    }

    #[instrument(skip(self, id), fields(id = %id))]
    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        debug!("Processing delete request");
        self.remove(&id)?;
        info!("Item deleted");
        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    fn handle_delete_many(&mut self, ids: Vec<T::Id>) -> Vec<T::Id> {
        debug!("Processing delete_many request");
        let mut deleted = Vec::new();
        for id in ids {
            match self.remove(&id) {
                Ok(()) => deleted.push(id),
                Err(e) => debug!(id = %id, error = %e, "Skipping delete"),
            }
        }
        info!(deleted = deleted.len(), "Batch deleted");
        deleted
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(build(respond_to))
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn create_many(&self, params: Vec<T::CreateParams>) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::CreateMany { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn query(&self, filter: T::Filter) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Query { filter, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, update, respond_to }).await
    }

    pub async fn update_many(&self, updates: Vec<(T::Id, T::Update)>) -> Result<Vec<T::Id>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::UpdateMany { updates, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn delete_many(&self, ids: Vec<T::Id>) -> Result<Vec<T::Id>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::DeleteMany { ids, respond_to }).await
    }

    pub async fn count(&self) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Count { respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldViolation;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: String,
        title: String,
        pinned: bool,
    }

    #[derive(Debug)]
    struct NoteCreate {
        title: String,
        pinned: bool,
    }

    #[derive(Debug)]
    struct NoteUpdate {
        title: String,
    }

    #[derive(Debug)]
    struct NoteFilter {
        pinned: Option<bool>,
    }

    fn check_title(title: &str) -> Result<(), ValidationReport> {
        if title.is_empty() {
            Err(ValidationReport::new(vec![FieldViolation::new("title", "length")]))
        } else {
            Ok(())
        }
    }

    impl Entity for Note {
        type Id = String;
        type CreateParams = NoteCreate;
        type Update = NoteUpdate;
        type Filter = NoteFilter;

        fn id(&self) -> &String { &self.id }

        fn validate_create(params: &NoteCreate) -> Result<(), ValidationReport> {
            check_title(&params.title)
        }

        fn validate_update(update: &NoteUpdate) -> Result<(), ValidationReport> {
            check_title(&update.title)
        }

        fn from_create_params(id: String, params: NoteCreate) -> Result<Self, FrameworkError> {
            Ok(Self { id, title: params.title, pinned: params.pinned })
        }

        fn on_update(&mut self, update: NoteUpdate) -> Result<(), FrameworkError> {
            self.title = update.title;
            Ok(())
        }

        // Pinned notes must be unpinned before they can be deleted.
        fn on_delete(&self) -> Result<(), FrameworkError> {
            if self.pinned {
                Err(FrameworkError::Rejected(format!("note {} is pinned", self.id)))
            } else {
                Ok(())
            }
        }

        fn matches(&self, filter: &NoteFilter) -> bool {
            filter.pinned.map_or(true, |pinned| self.pinned == pinned)
        }
    }

    fn note(title: &str, pinned: bool) -> NoteCreate {
        NoteCreate { title: title.to_string(), pinned }
    }

    fn start() -> ResourceClient<Note> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            format!("note_{}", id)
        };
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_create_get_and_query_in_insertion_order() {
        let client = start();

        let a = client.create(note("a", false)).await.unwrap();
        let b = client.create(note("b", true)).await.unwrap();
        let c = client.create(note("c", false)).await.unwrap();
        assert_eq!(a.id, "note_1");

        let fetched = client.get(b.id.clone()).await.unwrap();
        assert_eq!(fetched, Some(b.clone()));

        let all = client.query(NoteFilter { pinned: None }).await.unwrap();
        assert_eq!(all, vec![a.clone(), b, c.clone()]);

        let unpinned = client.query(NoteFilter { pinned: Some(false) }).await.unwrap();
        assert_eq!(unpinned, vec![a, c]);
    }

    #[tokio::test]
    async fn test_create_many_is_all_or_nothing() {
        let client = start();

        let err = client
            .create_many(vec![note("ok", false), note("", false), note("also ok", false)])
            .await
            .unwrap_err();
        match err {
            FrameworkError::Validation(report) => {
                assert_eq!(report.item, Some(1));
                assert!(report.has_field("title"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(client.count().await.unwrap(), 0);

        let created = client.create_many(vec![note("x", false), note("y", false)]).await.unwrap();
        let titles: Vec<&str> = created.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["x", "y"]);
        assert_eq!(client.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let client = start();

        let err = client
            .update("missing".to_string(), NoteUpdate { title: String::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::Validation(_)));

        let err = client
            .update("missing".to_string(), NoteUpdate { title: "t".into() })
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_update_many_skips_missing_and_invalid() {
        let client = start();
        let a = client.create(note("a", false)).await.unwrap();
        let b = client.create(note("b", false)).await.unwrap();

        let updated = client
            .update_many(vec![
                (a.id.clone(), NoteUpdate { title: "a2".into() }),
                ("missing".to_string(), NoteUpdate { title: "zz".into() }),
                (b.id.clone(), NoteUpdate { title: String::new() }),
            ])
            .await
            .unwrap();

        assert_eq!(updated, vec![a.id.clone()]);
        assert_eq!(client.get(a.id).await.unwrap().unwrap().title, "a2");
        assert_eq!(client.get(b.id).await.unwrap().unwrap().title, "b");
    }

    #[tokio::test]
    async fn test_update_many_reports_repeated_id_once() {
        let client = start();
        let a = client.create(note("a", false)).await.unwrap();

        let updated = client
            .update_many(vec![
                (a.id.clone(), NoteUpdate { title: "first".into() }),
                (a.id.clone(), NoteUpdate { title: "second".into() }),
            ])
            .await
            .unwrap();

        assert_eq!(updated, vec![a.id.clone()]);
        assert_eq!(client.get(a.id).await.unwrap().unwrap().title, "second");
    }

    #[tokio::test]
    async fn test_delete_hook_can_reject() {
        let client = start();
        let pinned = client.create(note("keep", true)).await.unwrap();
        let loose = client.create(note("drop", false)).await.unwrap();

        let err = client.delete(pinned.id.clone()).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Rejected(_)));

        let deleted = client
            .delete_many(vec![pinned.id.clone(), loose.id.clone(), loose.id.clone()])
            .await
            .unwrap();
        assert_eq!(deleted, vec![loose.id.clone()]);
        assert_eq!(client.count().await.unwrap(), 1);
        assert_eq!(client.get(loose.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_colliding_id_generator_is_refused() {
        let (actor, client) = ResourceActor::<Note>::new(10, || "same".to_string());
        tokio::spawn(actor.run());

        client.create(note("first", false)).await.unwrap();
        let err = client.create(note("second", false)).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Rejected(_)));
        assert_eq!(client.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_error() {
        let (actor, client) = ResourceActor::<Note>::new(10, || "id".to_string());
        drop(actor);

        let err = client.count().await.unwrap_err();
        assert_eq!(err, FrameworkError::ActorClosed);
    }
}
