use httpmock::prelude::*;

use laddercache::{ApiClient, ApiError};

mod common;

fn client_for(server: &MockServer) -> ApiClient {
    common::init_tracing();
    ApiClient::with_base_urls(&server.base_url(), &server.base_url()).unwrap()
}

#[tokio::test]
async fn test_fetch_organisation_sends_modifier_and_parses() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/orgsproducts/organisation/org-1")
            .query_param("responseModifier", "includePrograms")
            .query_param("jsconfig", "eccn:true");
        then.status(200).json_body(serde_json::json!({
            "organisationGuid": "org-1",
            "name": "Northcote CC",
            "shortName": "NCC",
            "logoURL": "https://x/logo.png",
            "description": null,
        }));
    });

    let org = client_for(&server).fetch_organisation("org-1").await.unwrap();
    assert_eq!(org.organisation_guid, "org-1");
    assert_eq!(org.logo_url.as_deref(), Some("https://x/logo.png"));
    mock.assert();
}

#[tokio::test]
async fn test_non_success_status_maps_to_http_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/fixturesladders/grades/g1/ladders");
        then.status(404);
    });

    let err = client_for(&server).fetch_ladders("g1").await.unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus(404)));
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/fixturesladders/organisations/org-1/seasons");
        then.status(200).body("<html>not json</html>");
    });

    let err = client_for(&server).fetch_seasons("org-1").await.unwrap_err();
    match err {
        ApiError::Decode(message) => assert!(message.contains("seasons")),
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_maps_to_transport() {
    // Nothing listens on this port.
    let client = ApiClient::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9").unwrap();
    let err = client.fetch_seasons("org-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_fetch_teams_scopes_to_season() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fixturesladders/organisations/org-1/teams")
            .query_param("seasonId", "s-2025");
        then.status(200).json_body(serde_json::json!({
            "teams": [{
                "id": "t1",
                "name": "Northcote 1sts",
                "grade": {"id": "g1", "name": "A Grade", "isCurrent": true},
                "grades": null,
            }]
        }));
    });

    let teams = client_for(&server)
        .fetch_teams("org-1", "s-2025")
        .await
        .unwrap()
        .teams;
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].active_grade().unwrap().id, "g1");
    mock.assert();
}
