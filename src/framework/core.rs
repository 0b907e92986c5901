//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the actor system.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that all stored record types must implement.
//! - [`ResourceActor`]: The generic actor that owns a [`ResourceStore`] and serialises access to it.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, NotFound).

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::marker::PhantomData;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::store::{ResourceStore, StoreError};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, Actions and Queries)
// =============================================================================

/// Trait that any stored record type must implement to be managed by [`ResourceActor`].
///
/// # Architecture Note
/// By defining a contract (`ActorEntity`) that all our record types (Campaign, Insight)
/// must satisfy, we write the `ResourceActor` message loop *once* and reuse it for every table.
///
/// Associated types keep every request typed: a `Campaign` actor only accepts a
/// `CampaignCreate` payload and only answers `CampaignQuery` requests.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they may call other actors. The `Context` type is
/// injected into every hook at `run()` time rather than at construction time.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type CreateParams: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type UpdateParams: Send + Sync + Debug;

    /// Enum representing record-specific operations (e.g., `ApplyTraffic`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Collection-level requests answered by the store (aggregates, bulk writes).
    type Query: Send + Sync + Debug;

    /// The result type returned by queries.
    type QueryResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// An id chosen by the caller, if the create payload carries one.
    /// When `None`, the actor's id generator is used.
    fn requested_id(_params: &Self::CreateParams) -> Option<Self::Id> {
        None
    }

    /// Construct the full entity from the id and payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is built and before it is persisted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), String> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(&mut self, update: Self::UpdateParams, _ctx: &Self::Context) -> Result<(), String>;

    /// Called immediately before the entity is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), String> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom record-specific action. The mutated entity is persisted afterwards.
    async fn handle_action(&mut self, action: Self::Action, _ctx: &Self::Context) -> Result<Self::ActionResult, String>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants map to CRUD on a single record, a record-specific `Action`,
/// and two collection-level requests (`Count`, `Query`).
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::UpdateParams,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Count {
        respond_to: Response<usize>,
    },
    Query {
        query: T::Query,
        respond_to: Response<T::QueryResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that manages one table of entities.
///
/// # Concurrency Model
/// Each actor processes its own messages *sequentially*. The store is owned by the
/// actor task, so a SQLite connection needs neither a `Mutex` nor a pool.
pub struct ResourceActor<T: ActorEntity, S: ResourceStore<T>> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: S,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: ActorEntity, S: ResourceStore<T>> ResourceActor<T, S> {
    pub fn new(
        buffer_size: usize,
        store: S,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store,
            next_id_fn: Box::new(next_id_fn),
            _entity: PhantomData,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Campaign" instead of "adintel::model::campaign::Campaign"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let result = self.store.fetch(&id).map_err(FrameworkError::from);
                    let found = matches!(result, Ok(Some(_)));
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Update { id, update, respond_to } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(&id, update, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(&id, &context).await;
                    match &result {
                        Ok(()) => info!(entity_type, %id, "Deleted"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self.action(&id, action, &context).await;
                    match &result {
                        Ok(_) => debug!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Count { respond_to } => {
                    let _ = respond_to.send(self.store.count().map_err(FrameworkError::from));
                }
                ResourceRequest::Query { query, respond_to } => {
                    debug!(entity_type, ?query, "Query");
                    let result = self.store.query(query).map_err(FrameworkError::from);
                    if let Err(e) = &result {
                        warn!(entity_type, error = %e, "Query failed");
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, "Shutdown");
    }

    async fn create(&mut self, params: T::CreateParams, context: &T::Context) -> Result<T::Id, FrameworkError> {
        let id = T::requested_id(&params).unwrap_or_else(|| (self.next_id_fn)());
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Custom)?;
        item.on_create(context).await.map_err(FrameworkError::Custom)?;
        self.store.insert(&item)?;
        Ok(id)
    }

    async fn update(&mut self, id: &T::Id, update: T::UpdateParams, context: &T::Context) -> Result<T, FrameworkError> {
        let mut item = self
            .store
            .fetch(id)?
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(update, context).await.map_err(FrameworkError::Custom)?;
        self.store.save(&item)?;
        Ok(item)
    }

    async fn delete(&mut self, id: &T::Id, context: &T::Context) -> Result<(), FrameworkError> {
        let item = self
            .store
            .fetch(id)?
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete(context).await.map_err(FrameworkError::Custom)?;
        self.store.remove(id)?;
        Ok(())
    }

    async fn action(&mut self, id: &T::Id, action: T::Action, context: &T::Context) -> Result<T::ActionResult, FrameworkError> {
        let mut item = self
            .store
            .fetch(id)?
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let result = item.handle_action(action, context).await.map_err(FrameworkError::Custom)?;
        self.store.save(&item)?;
        Ok(result)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, update: T::UpdateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, update, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    pub async fn count(&self) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Count { respond_to }).await
    }

    pub async fn query(&self, query: T::Query) -> Result<T::QueryResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Query { query, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        label: String,
        hits: u64,
    }

    #[derive(Debug)]
    struct CounterCreate {
        id: Option<String>,
        label: String,
    }

    #[derive(Debug)]
    struct CounterUpdate {
        label: Option<String>,
    }

    #[derive(Debug)]
    enum CounterAction {
        Hit(u64),
    }

    #[derive(Debug)]
    enum CounterQuery {
        TotalHits,
    }

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type UpdateParams = CounterUpdate;
        type Action = CounterAction;
        type ActionResult = u64;
        type Query = CounterQuery;
        type QueryResult = u64;
        type Context = ();

        fn requested_id(params: &CounterCreate) -> Option<String> {
            params.id.clone()
        }

        fn from_create_params(id: String, params: CounterCreate) -> Result<Self, String> {
            if params.label.is_empty() {
                return Err("label must not be empty".into());
            }
            Ok(Self { id, label: params.label, hits: 0 })
        }

        async fn on_update(&mut self, update: CounterUpdate, _ctx: &()) -> Result<(), String> {
            if let Some(label) = update.label {
                self.label = label;
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: CounterAction, _ctx: &()) -> Result<u64, String> {
            match action {
                CounterAction::Hit(n) => {
                    self.hits += n;
                    Ok(self.hits)
                }
            }
        }
    }

    #[derive(Default)]
    struct MapStore {
        items: HashMap<String, Counter>,
    }

    impl ResourceStore<Counter> for MapStore {
        fn insert(&mut self, item: &Counter) -> Result<(), StoreError> {
            if self.items.contains_key(&item.id) {
                return Err(StoreError::Duplicate(item.id.clone()));
            }
            self.items.insert(item.id.clone(), item.clone());
            Ok(())
        }

        fn fetch(&self, id: &String) -> Result<Option<Counter>, StoreError> {
            Ok(self.items.get(id).cloned())
        }

        fn save(&mut self, item: &Counter) -> Result<(), StoreError> {
            self.items.insert(item.id.clone(), item.clone());
            Ok(())
        }

        fn remove(&mut self, id: &String) -> Result<bool, StoreError> {
            Ok(self.items.remove(id).is_some())
        }

        fn count(&self) -> Result<usize, StoreError> {
            Ok(self.items.len())
        }

        fn query(&mut self, query: CounterQuery) -> Result<u64, StoreError> {
            match query {
                CounterQuery::TotalHits => Ok(self.items.values().map(|c| c.hits).sum()),
            }
        }
    }

    fn spawn_counter_actor() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("counter_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, MapStore::default(), next_id);
        tokio::spawn(actor.run(()));
        client
    }

    #[tokio::test]
    async fn test_resource_actor_crud_action_and_query() {
        let client = spawn_counter_actor();

        let id = client
            .create(CounterCreate { id: None, label: "clicks".into() })
            .await
            .unwrap();
        assert_eq!(id, "counter_1");

        let hits = client.perform_action(id.clone(), CounterAction::Hit(3)).await.unwrap();
        assert_eq!(hits, 3);
        let hits = client.perform_action(id.clone(), CounterAction::Hit(2)).await.unwrap();
        assert_eq!(hits, 5);

        // Action results are persisted through the store
        let stored = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.hits, 5);

        let updated = client
            .update(id.clone(), CounterUpdate { label: Some("views".into()) })
            .await
            .unwrap();
        assert_eq!(updated.label, "views");

        client
            .create(CounterCreate { id: Some("fixed".into()), label: "other".into() })
            .await
            .unwrap();
        client.perform_action("fixed".into(), CounterAction::Hit(10)).await.unwrap();
        assert_eq!(client.query(CounterQuery::TotalHits).await.unwrap(), 15);
        assert_eq!(client.count().await.unwrap(), 2);

        client.delete(id.clone()).await.unwrap();
        assert!(client.get(id).await.unwrap().is_none());
        assert_eq!(client.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resource_actor_errors() {
        let client = spawn_counter_actor();

        let err = client
            .create(CounterCreate { id: None, label: String::new() })
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::Custom("label must not be empty".into()));

        client
            .create(CounterCreate { id: Some("dup".into()), label: "a".into() })
            .await
            .unwrap();
        let err = client
            .create(CounterCreate { id: Some("dup".into()), label: "b".into() })
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::Store(StoreError::Duplicate("dup".into())));

        let err = client.perform_action("missing".into(), CounterAction::Hit(1)).await.unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("missing".into()));
        let err = client.delete("missing".into()).await.unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("missing".into()));
    }

    #[tokio::test]
    async fn test_client_reports_closed_actor() {
        let (actor, client) = ResourceActor::<Counter, MapStore>::new(1, MapStore::default(), || "x".to_string());
        drop(actor);
        assert_eq!(client.count().await.unwrap_err(), FrameworkError::ActorClosed);
    }
}
