//! End-to-end client tests against a mock W3Browse server

mod common;

use common::{scw_fits, MockHeasarcServer, MISSION, W3QUERY_PATH};
use heasarc_query::app::{Angle, Frame, QueryOptions, QueryPayload, SkyCoord, Value};
use heasarc_query::errors::QueryError;
use tokio_test::{assert_err, assert_ok};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn one_degree() -> Angle {
    "1 degree".parse().unwrap()
}

fn position() -> SkyCoord {
    SkyCoord::parse("12h29m06.70s +02d03m08.7s", Frame::Icrs).unwrap()
}

#[tokio::test]
async fn test_query_object_parses_fits_table() {
    let server = MockHeasarcServer::start().await;
    MockHeasarcServer::request(MISSION)
        .and(query_param("Entry", "3c273"))
        .and(query_param("Radius", "60.0 arcmin"))
        .and(query_param("Coordinates", "Equatorial: R.A. Dec"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(scw_fits(4)))
        .expect(1)
        .mount(server.inner())
        .await;

    let client = server.client();
    let options = QueryOptions::new().with_radius(one_degree());
    let table = assert_ok!(client.query_object("3c273", MISSION, &options).await);

    assert_eq!(table.len(), 4);
    assert_eq!(
        table.column_names(),
        vec!["SCW_ID", "RA_X", "DEC_X", "SCW_TYPE"]
    );
    assert_eq!(
        table.get(3, "SCW_ID").and_then(Value::as_str),
        Some("004900020013")
    );
    assert_eq!(table.get(2, "RA_X").and_then(Value::as_f64), Some(187.25));
}

#[tokio::test]
async fn test_query_object_async_returns_raw_body() {
    let server = MockHeasarcServer::start().await;
    let body = scw_fits(2);
    server.mock_entry("3c273", body.clone()).await;

    let client = server.client();
    let response = assert_ok!(
        client
            .query_object_async("3c273", MISSION, &QueryOptions::default())
            .await
    );

    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes(), body.as_slice());
    assert_eq!(response.url().path(), W3QUERY_PATH);
}

#[tokio::test]
async fn test_region_and_object_row_counts_match() {
    let server = MockHeasarcServer::start().await;
    let coordinate = position();
    server.mock_entry("3c273", scw_fits(7)).await;
    server.mock_entry(&coordinate.to_entry(), scw_fits(7)).await;

    let client = server.client();
    let options = QueryOptions::new().with_radius(one_degree());
    let by_name = assert_ok!(client.query_object("3c273", MISSION, &options).await);
    let by_position = assert_ok!(
        client
            .query_region(&coordinate, MISSION, one_degree(), &QueryOptions::default())
            .await
    );
    let repeated = assert_ok!(
        client
            .query_region(&coordinate, MISSION, one_degree(), &QueryOptions::default())
            .await
    );

    assert_eq!(by_position.len(), 7);
    assert_eq!(by_position.len(), by_name.len());
    assert_eq!(repeated.len(), by_position.len());
}

#[tokio::test]
async fn test_query_region_async_sends_position() {
    let server = MockHeasarcServer::start().await;
    let coordinate = SkyCoord::parse("289.95 64.36", Frame::Galactic).unwrap();
    MockHeasarcServer::request(MISSION)
        .and(query_param("Entry", "289.95,64.36"))
        .and(query_param("Coordinates", "Galactic: LII BII"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(scw_fits(1)))
        .expect(1)
        .mount(server.inner())
        .await;

    let client = server.client();
    let response = assert_ok!(
        client
            .query_region_async(&coordinate, MISSION, one_degree(), &QueryOptions::default())
            .await
    );
    assert!(response.is_success());
}

#[tokio::test]
async fn test_unknown_mission_is_unrecognized_input() {
    let server = MockHeasarcServer::start().await;
    MockHeasarcServer::request("bogus_mission")
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<pre>\nBATCH_RETRIEVAL_MSG ERROR: Unrecognized table: bogus_mission\n</pre>",
        ))
        .mount(server.inner())
        .await;

    let client = server.client();
    let result = client
        .query_object("3c273", "bogus_mission", &QueryOptions::default())
        .await;

    assert!(matches!(result, Err(QueryError::UnrecognizedInput { .. })));
}

#[tokio::test]
async fn test_software_error_is_service_error() {
    let server = MockHeasarcServer::start().await;
    server
        .mock_entry("3c273", "<h1>Software error:</h1>\n<pre>database offline</pre>")
        .await;

    let client = server.client();
    let result = client
        .query_object("3c273", MISSION, &QueryOptions::default())
        .await;

    match result {
        Err(QueryError::ServiceError { message }) => assert!(message.contains("database offline")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_no_matching_rows_gives_empty_table() {
    let server = MockHeasarcServer::start().await;
    server
        .mock_entry("nowhere", "<pre>\nNO MATCHING ROWS\n</pre>")
        .await;

    let client = server.client();
    let table = assert_ok!(
        client
            .query_object("nowhere", MISSION, &QueryOptions::default())
            .await
    );
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_throttling_statuses_are_errors() {
    let throttled = MockHeasarcServer::start().await;
    throttled.mock_status(429).await;
    let result = throttled
        .client()
        .query_object_async("3c273", MISSION, &QueryOptions::default())
        .await;
    assert!(matches!(result, Err(QueryError::RateLimitExceeded)));

    let overloaded = MockHeasarcServer::start().await;
    overloaded.mock_status(503).await;
    let result = overloaded
        .client()
        .query_object("3c273", MISSION, &QueryOptions::default())
        .await;
    assert!(matches!(result, Err(QueryError::ServerOverloaded)));
}

#[tokio::test]
async fn test_server_error_raw_vs_parsed() {
    let server = MockHeasarcServer::start().await;
    server.mock_status(500).await;
    let client = server.client();

    let response = assert_ok!(
        client
            .query_object_async("3c273", MISSION, &QueryOptions::default())
            .await
    );
    assert_eq!(response.status(), 500);
    assert!(!response.is_success());

    let result = client
        .query_object("3c273", MISSION, &QueryOptions::default())
        .await;
    assert!(matches!(result, Err(QueryError::ServerError { status: 500 })));
}

#[tokio::test]
async fn test_query_mission_list() {
    let server = MockHeasarcServer::start().await;
    server.mock_mission_list().await;

    let missions = assert_ok!(server.client().query_mission_list().await);

    assert_eq!(missions.len(), 3);
    assert_eq!(
        missions.names(),
        vec!["integral_rev3", "integral_rev3_scw", "integral_rev3_prp"]
    );
}

#[tokio::test]
async fn test_query_mission_cols() {
    let server = MockHeasarcServer::start().await;
    server.mock_mission_cols(1).await;

    let columns = assert_ok!(server.client().query_mission_cols(MISSION).await);

    assert_eq!(columns.len(), 4);
    for name in ["SCW_ID", "RA_X", "DEC_X"] {
        assert!(columns.contains(name), "missing column {}", name);
    }
}

#[tokio::test]
async fn test_unknown_parameter_is_rejected_before_query() {
    let server = MockHeasarcServer::start().await;
    server.mock_mission_cols(1).await;
    MockHeasarcServer::request(MISSION)
        .and(query_param("Entry", "3c273"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(scw_fits(1)))
        .expect(0)
        .mount(server.inner())
        .await;

    let client = server.client();
    let options = QueryOptions::new().with_param("not_a_column", "1");
    let result = client.query_object("3c273", MISSION, &options).await;

    match assert_err!(result) {
        QueryError::UnknownParameter { name, valid } => {
            assert_eq!(name, "not_a_column");
            assert!(valid.contains(&"SCW_ID".to_string()));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_known_parameter_is_sent_lowercased() {
    let server = MockHeasarcServer::start().await;
    server.mock_mission_cols(1).await;
    MockHeasarcServer::request(MISSION)
        .and(query_param("Entry", "3c273"))
        .and(query_param("bparam_scw_type", "POINTING"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(scw_fits(3)))
        .expect(1)
        .mount(server.inner())
        .await;

    let client = server.client();
    let options = QueryOptions::new().with_param("SCW_TYPE", "POINTING");
    let table = assert_ok!(client.query_object("3c273", MISSION, &options).await);
    assert_eq!(table.len(), 3);
}

#[tokio::test]
async fn test_temp_server_routes_and_restores() {
    let primary = MockHeasarcServer::start().await;
    let mirror = MockHeasarcServer::start().await;
    primary.mock_entry("3c273", scw_fits(1)).await;
    mirror.mock_entry("3c273", scw_fits(5)).await;

    let mut client = primary.client();
    {
        let temp = assert_ok!(client.set_temp_server(&mirror.endpoint()));
        let table = assert_ok!(
            temp.query_object("3c273", MISSION, &QueryOptions::default())
                .await
        );
        assert_eq!(table.len(), 5);
    }

    assert_eq!(client.server().as_str(), primary.endpoint());
    let table = assert_ok!(
        client
            .query_object("3c273", MISSION, &QueryOptions::default())
            .await
    );
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_query_async_explicit_url() {
    let server = MockHeasarcServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alternate/w3query.pl"))
        .and(query_param("Entry", "none"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(server.inner())
        .await;

    let client = server.client();
    let mut payload = QueryPayload::new();
    payload.push("Entry", "none");
    let url = Url::parse(&format!("{}/alternate/w3query.pl", server.inner().uri())).unwrap();

    let response = assert_ok!(client.query_async(&payload, Some(&url)).await);
    assert_eq!(response.text(), "ok");
}
