//! # Mock Actor
//!
//! Stand-ins for a running [`ResourceActor`](crate::framework::ResourceActor) so a
//! typed client can be tested without a database.
//!
//! Two styles are available:
//! - [`MockClient`] answers requests from a queue of scripted responses.
//! - [`create_mock_client`] hands back the raw receiver, and helpers such as
//!   [`expect_query`] pull the next request off it for inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};

/// One scripted reply, matched against the kind of the next incoming request.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Delete(Result<(), FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
    Count(Result<usize, FrameworkError>),
    Query(Result<T::QueryResult, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::Get(_) => "Get",
            Expectation::Create(_) => "Create",
            Expectation::Update(_) => "Update",
            Expectation::Delete(_) => "Delete",
            Expectation::Action(_) => "Action",
            Expectation::Count(_) => "Count",
            Expectation::Query(_) => "Query",
        }
    }
}

fn request_kind<T: ActorEntity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Create { .. } => "Create",
        ResourceRequest::Get { .. } => "Get",
        ResourceRequest::Update { .. } => "Update",
        ResourceRequest::Delete { .. } => "Delete",
        ResourceRequest::Action { .. } => "Action",
        ResourceRequest::Count { .. } => "Count",
        ResourceRequest::Query { .. } => "Query",
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock actor that replies to requests in the order expectations were queued.
///
/// # Example
/// ```ignore
/// let mock = MockClient::<Campaign>::new();
/// mock.expect_query().return_ok(CampaignQueryResult::SampleIds(vec![]));
///
/// let client = CampaignClient::new(mock.client());
/// assert!(client.sample_ids(5).await?.is_empty());
/// mock.verify();
/// ```
///
/// A request whose kind differs from the next expectation makes the mock task
/// panic, which drops the reply channel; the caller then sees
/// [`FrameworkError::ActorDropped`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().map(|mut q| q.pop_front()).unwrap_or(None);

                match (request, next) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Delete { respond_to, .. }, Some(Expectation::Delete(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Count { respond_to }, Some(Expectation::Count(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Query { respond_to, .. }, Some(Expectation::Query(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (request, expected) => {
                        panic!(
                            "unexpected {} request (expected {})",
                            request_kind(&request),
                            expected.as_ref().map_or("nothing", Expectation::kind)
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// The client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&self) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Expectation::Get)
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_update(&self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Update)
    }

    pub fn expect_delete(&self) -> ExpectationBuilder<T, ()> {
        self.builder(Expectation::Delete)
    }

    pub fn expect_action(&self) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Expectation::Action)
    }

    pub fn expect_count(&self) -> ExpectationBuilder<T, usize> {
        self.builder(Expectation::Count)
    }

    pub fn expect_query(&self) -> ExpectationBuilder<T, T::QueryResult> {
        self.builder(Expectation::Query)
    }

    fn builder<R>(&self, wrap: fn(Result<R, FrameworkError>) -> Expectation<T>) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Panics if any queued expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().map(|q| q.len()).unwrap_or(0);
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues the reply for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        if let Ok(mut queue) = self.expectations.lock() {
            queue.push_back((self.wrap)(response));
        }
    }
}

/// Creates a client whose requests land on the returned receiver.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request, if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a Query.
pub async fn expect_query<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Query, oneshot::Sender<Result<T::QueryResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Query { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign_actor::{CampaignQuery, CampaignQueryResult, CampaignTotals};
    use crate::model::{Campaign, CampaignCreate};

    #[tokio::test]
    async fn test_receiver_sees_create_payload() {
        let (client, mut receiver) = create_mock_client::<Campaign>(10);

        let task = tokio::spawn(async move {
            let params = CampaignCreate {
                campaign_name: Some("Spring Promo".into()),
                ..Default::default()
            };
            client.create(params).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.campaign_name.as_deref(), Some("Spring Promo"));
        responder.send(Ok("ad_1".to_string())).unwrap();

        assert_eq!(task.await.unwrap(), Ok("ad_1".to_string()));
    }

    #[tokio::test]
    async fn test_receiver_sees_query() {
        let (client, mut receiver) = create_mock_client::<Campaign>(10);
        let task = tokio::spawn(async move { client.query(CampaignQuery::SampleIds { limit: 3 }).await });

        let (query, responder) = expect_query(&mut receiver).await.expect("Expected Query request");
        assert!(matches!(query, CampaignQuery::SampleIds { limit: 3 }));
        responder.send(Ok(CampaignQueryResult::SampleIds(vec!["a".into()]))).unwrap();

        let Ok(CampaignQueryResult::SampleIds(ids)) = task.await.unwrap() else {
            panic!("expected SampleIds");
        };
        assert_eq!(ids, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockClient::<Campaign>::new();
        mock.expect_create().return_ok("ad_1".to_string());
        mock.expect_get().return_ok(Some(Campaign::new("ad_1", "Spring Promo")));
        mock.expect_count().return_ok(1);
        mock.expect_query().return_ok(CampaignQueryResult::Totals(CampaignTotals::default()));

        let client = mock.client();
        assert_eq!(client.create(CampaignCreate::default()).await.unwrap(), "ad_1");
        let fetched = client.get("ad_1".to_string()).await.unwrap().unwrap();
        assert_eq!(fetched.campaign_name, "Spring Promo");
        assert_eq!(client.count().await.unwrap(), 1);
        assert!(matches!(
            client.query(CampaignQuery::Totals).await.unwrap(),
            CampaignQueryResult::Totals(_)
        ));

        mock.verify();
    }

    #[tokio::test]
    async fn test_kind_mismatch_drops_reply() {
        let mock = MockClient::<Campaign>::new();
        mock.expect_count().return_ok(0);

        let result = mock.client().get("ad_1".to_string()).await;
        assert_eq!(result, Err(FrameworkError::ActorDropped));
    }
}
