//! End-to-end tests of the request/response pipeline against a mock API

use comtrade::params::names;
use comtrade::{ClientConfig, ComtradeClient, ComtradeError, ParameterStore};
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::json;

const API_PATH: &str = "/api/get";

#[fixture]
fn server() -> ServerGuard {
    Server::new()
}

fn client_for(server: &ServerGuard) -> ComtradeClient {
    ComtradeClient::with_base_url(format!("{}{}", server.url(), API_PATH))
        .expect("client should build")
}

fn api_path() -> Matcher {
    Matcher::Regex(format!("^{API_PATH}"))
}

fn response_body(status: &str, rows: serde_json::Value) -> String {
    json!({
        "validation": {
            "status": {"name": status, "value": 0},
            "count": {"value": rows.as_array().map_or(0, Vec::len)},
        },
        "dataset": rows,
    })
    .to_string()
}

#[rstest]
fn test_execute_decodes_rows_and_records_metadata(mut server: ServerGuard) {
    let rows = json!([
        {"rtCode": 40, "rtTitle": "Austria", "ptCode": 0, "ptTitle": "World", "TradeValue": 1000},
        {"rtCode": 40, "rtTitle": "Austria", "ptCode": 276, "ptTitle": "Germany", "TradeValue": 600},
        {"rtCode": 40, "rtTitle": "Austria", "ptCode": 380, "ptTitle": "Italy", "TradeValue": 400},
    ]);
    let mock = server
        .mock("GET", api_path())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(names::REPORTER.into(), "40".into()),
            Matcher::UrlEncoded(names::TRADE_FLOW.into(), "2".into()),
            Matcher::UrlEncoded(names::FORMAT.into(), "json".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body("Ok", rows))
        .create();

    let mut client = client_for(&server);
    client.params_mut().set_reporter("40").unwrap();
    client.params_mut().set_trade_flow("2").unwrap();

    let (mut data, metadata) = client.execute().unwrap();
    mock.assert();

    assert_eq!(data.len(), 3);
    assert_eq!(data.rows()[1].partner_name(), Some("Germany"));
    assert_eq!(metadata["status"]["name"], "Ok");
    assert_eq!(client.metadata_history().len(), 1);
    assert_eq!(client.metadata_history().latest(), Some(&metadata));

    assert_eq!(data.remove_world().sum("tradeValueUSD").unwrap(), 1000);
}

#[rstest]
fn test_history_reads_most_recent_first(mut server: ServerGuard) {
    let first = server
        .mock("GET", api_path())
        .match_query(Matcher::UrlEncoded(names::TIME_PERIOD.into(), "2014".into()))
        .with_body(response_body("First", json!([])))
        .create();
    let second = server
        .mock("GET", api_path())
        .match_query(Matcher::UrlEncoded(names::TIME_PERIOD.into(), "2015".into()))
        .with_body(response_body("Second", json!([])))
        .create();

    let mut client = client_for(&server);
    client.params_mut().set_time_period("2014");
    client.retrieve().unwrap();
    client.params_mut().set_time_period("2015");
    client.retrieve().unwrap();
    first.assert();
    second.assert();

    let statuses: Vec<_> = client
        .metadata_history()
        .recent_first()
        .map(|m| m["status"]["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["Second", "First"]);
}

#[rstest]
fn test_http_error_status(mut server: ServerGuard) {
    let mock = server.mock("GET", api_path()).with_status(404).create();

    let mut client = client_for(&server);
    let err = client.execute().unwrap_err();
    mock.assert();

    match err {
        ComtradeError::HttpStatus { code, reason } => {
            assert_eq!(code, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    assert!(client.metadata_history().is_empty());
}

#[rstest]
fn test_empty_body(mut server: ServerGuard) {
    server.mock("GET", api_path()).with_status(200).create();

    let mut client = client_for(&server);
    assert!(matches!(client.execute(), Err(ComtradeError::EmptyBody)));
    assert!(client.metadata_history().is_empty());
}

#[rstest]
fn test_malformed_json(mut server: ServerGuard) {
    server
        .mock("GET", api_path())
        .with_body("{\"validation\": {")
        .create();

    let mut client = client_for(&server);
    assert!(matches!(client.execute(), Err(ComtradeError::JsonDecode(_))));
    assert!(client.metadata_history().is_empty());
}

#[rstest]
fn test_missing_dataset(mut server: ServerGuard) {
    server
        .mock("GET", api_path())
        .with_body(r#"{"validation": {"status": {"name": "Ok"}}}"#)
        .create();

    let mut client = client_for(&server);
    assert!(matches!(
        client.execute(),
        Err(ComtradeError::MalformedResponse { .. })
    ));
    assert!(client.metadata_history().is_empty());
}

#[rstest]
fn test_body_charset_from_content_type(mut server: ServerGuard) {
    let mut body = br#"{"validation": {}, "dataset": [{"ptTitle": "Cura"#.to_vec();
    body.push(0xE7);
    body.extend_from_slice(br#"ao"}]}"#);
    server
        .mock("GET", api_path())
        .with_header("content-type", "application/json; charset=ISO-8859-1")
        .with_body(body)
        .create();

    let data = client_for(&server).retrieve().unwrap();
    assert_eq!(data.rows()[0].partner_name(), Some("Curaçao"));
}

#[rstest]
fn test_execute_request_with_explicit_parameters(mut server: ServerGuard) {
    let mock = server
        .mock("GET", Matcher::Regex("^/other".into()))
        .match_query(Matcher::Exact("freq=A&r=842".into()))
        .with_body(response_body("Ok", json!([{"reporterCode": 842}])))
        .create();

    let mut params = ParameterStore::empty();
    params.set_param(names::REPORTER, "842");
    params.set_param(names::DATA_FREQUENCY, "A");

    let mut client = client_for(&server);
    let (data, _) = client
        .execute_request(&format!("{}/other", server.url()), &params)
        .unwrap();
    mock.assert();

    assert_eq!(data.rows()[0].reporter_code(), Some(842));
    assert_eq!(client.metadata_history().len(), 1);
}

#[test]
fn test_api_url_reflects_settings() {
    let mut client = ComtradeClient::with_base_url("http://localhost/api/get").unwrap();
    client.params_mut().set_partner_area("0").unwrap();
    client.params_mut().set_time_period("2014,2015");

    assert_eq!(
        client.api_url(),
        "http://localhost/api/get?cc=TOTAL&fmt=json&freq=A&head=H&max=50000&p=0\
         &ps=2014%2C2015&px=HS&r=all&rg=all&type=C"
    );
    client.close();
}

#[test]
fn test_connection_failure_is_a_transport_error() {
    let config = ClientConfig {
        timeout_seconds: Some(5),
        ..ClientConfig::with_base_url("http://127.0.0.1:1/api/get")
    };
    let mut client = ComtradeClient::with_config(config).unwrap();

    assert!(matches!(client.execute(), Err(ComtradeError::Transport(_))));
    assert!(client.metadata_history().is_empty());
}
