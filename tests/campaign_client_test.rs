use adintel::campaign_actor::{CampaignAction, CampaignActionResult, CampaignError, CampaignQuery, CampaignQueryResult, TrafficDelta};
use adintel::clients::{ActorClient, BulkInsertSummary, CampaignClient};
use adintel::framework::mock::{create_mock_client, expect_action, expect_query, MockClient};
use adintel::framework::FrameworkError;
use adintel::model::{Campaign, CampaignCreate};

fn row(ad_id: Option<&str>, cost: f64) -> CampaignCreate {
    CampaignCreate {
        ad_id: ad_id.map(str::to_string),
        campaign_name: Some("Spring Sale".into()),
        cost,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_bulk_insert_prepares_rows_and_counts_duplicates() {
    let (inner, mut receiver) = create_mock_client::<Campaign>(10);
    let client = CampaignClient::new(inner);

    let batch = vec![row(Some("A1"), 10.0), row(None, 5.0), row(Some("A3"), -1.0), row(Some("A1"), 2.0)];
    let call = tokio::spawn(async move { client.bulk_insert(batch).await });

    let (query, respond_to) = expect_query(&mut receiver).await.expect("query request");
    let CampaignQuery::BulkInsert(rows) = query else {
        panic!("expected BulkInsert, got {query:?}");
    };
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].ad_id, "A1");
    assert_eq!(rows[1].ad_id.len(), 36);
    assert_eq!(rows[1].campaign_name, "Spring Sale");
    respond_to.send(Ok(CampaignQueryResult::BulkInsert(2))).unwrap();

    let summary = call.await.unwrap().unwrap();
    assert_eq!(summary, BulkInsertSummary { inserted: 2, duplicates: 1, invalid: 1 });
}

#[tokio::test]
async fn test_apply_traffic_forwards_delta() {
    let (inner, mut receiver) = create_mock_client::<Campaign>(10);
    let client = CampaignClient::new(inner);

    let delta = TrafficDelta { impressions: 100, clicks: 4, conversions: 1, cost: 2.5, sale_amount: 0.0 };
    let call = tokio::spawn(async move { client.apply_traffic("A7".into(), delta).await });

    let (id, action, respond_to) = expect_action(&mut receiver).await.expect("action request");
    assert_eq!(id, "A7");
    let CampaignAction::ApplyTraffic(sent) = action;
    assert_eq!(sent, delta);

    let mut updated = Campaign::new("A7", "Spring Sale");
    updated.impressions = 100;
    respond_to.send(Ok(CampaignActionResult::ApplyTraffic(updated.clone()))).unwrap();

    assert_eq!(call.await.unwrap().unwrap(), updated);
}

#[tokio::test]
async fn test_wrong_result_variant_is_a_communication_error() {
    let mock = MockClient::<Campaign>::new();
    mock.expect_query().return_ok(CampaignQueryResult::SampleIds(vec!["A1".into()]));

    let client = CampaignClient::new(mock.client());
    let err = client.totals().await.unwrap_err();
    assert!(matches!(err, CampaignError::ActorCommunicationError(_)));
    mock.verify();
}

#[tokio::test]
async fn test_framework_errors_map_to_campaign_errors() {
    let mock = MockClient::<Campaign>::new();
    mock.expect_get().return_ok(None);
    mock.expect_delete().return_err(FrameworkError::NotFound("A9".into()));
    mock.expect_count().return_ok(12);

    let client = CampaignClient::new(mock.client());
    assert_eq!(client.get("A9".into()).await.unwrap(), None);
    assert_eq!(client.delete("A9".into()).await, Err(CampaignError::NotFound("A9".into())));
    assert_eq!(client.count().await.unwrap(), 12);
    mock.verify();
}
