// End-to-end passes against mocked UniFi and Route 53 endpoints.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wan_dnssync::service::{ReconciliationResult, WARNING_WAN2_UNRESOLVED};
use wan_dnssync::Config;

const API_KEY: &str = "unifi-test-key";
const ZONE_ID: &str = "Z0123456789";
const RRSET_PATH: &str = "/2013-04-01/hostedzone/Z0123456789/rrset";

const CHANGE_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <ChangeInfo>
    <Id>/change/C2682N5HXP0BZ4</Id>
    <Status>PENDING</Status>
    <SubmittedAt>2024-06-15T10:30:00.000Z</SubmittedAt>
  </ChangeInfo>
</ChangeResourceRecordSetsResponse>"#;

// ── Helpers ─────────────────────────────────────────────────────────

fn config(unifi: &MockServer, route53: &MockServer, record_name_wan2: Option<&str>) -> Config {
    Config {
        unifi_api_key: API_KEY.into(),
        unifi_api_url: url::Url::parse(&unifi.uri()).unwrap(),
        gateway_models: None,
        hosted_zone_id: ZONE_ID.into(),
        record_name: "home.example.com".into(),
        record_name_wan2: record_name_wan2.map(String::from),
        ttl: 300,
        aws_access_key_id: "AKIDEXAMPLE".into(),
        aws_secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
        aws_session_token: None,
        route53_endpoint: url::Url::parse(&route53.uri()).unwrap(),
    }
}

/// The client is blocking, so the pass runs off the async runtime.
async fn run(config: Config) -> ReconciliationResult {
    tokio::task::spawn_blocking(move || config.get_service().unwrap().run(false))
        .await
        .unwrap()
}

async fn mount_hosts(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/hosts"))
        .and(header("X-API-KEY", API_KEY))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_devices(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .and(header("X-API-KEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn devices_with(model: &str, ip: &str) -> serde_json::Value {
    json!({
        "data": [{
            "hostId": "host-1",
            "hostName": "home",
            "devices": [
                {"productLine": "network", "model": "U6-Lite", "ip": "192.168.1.20"},
                {"productLine": "network", "model": model, "ip": ip}
            ]
        }],
        "httpStatusCode": 200
    })
}

async fn expect_no_write(route53: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANGE_RESPONSE))
        .expect(0)
        .mount(route53)
        .await;
}

async fn posted_bodies(route53: &MockServer) -> Vec<String> {
    route53
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method.as_str() == "POST")
        .map(|request| String::from_utf8(request.body).unwrap())
        .collect()
}

// ── Success paths ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_both_wans_updated() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": [{"id": "host-1", "ipAddress": "3.3.3.3"}]})).await;
    mount_devices(&unifi, devices_with("USG 3P", "1.1.1.1")).await;

    Mock::given(method("POST"))
        .and(path(RRSET_PATH))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .and(body_string_contains("<Action>UPSERT</Action>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANGE_RESPONSE))
        .expect(1)
        .mount(&route53)
        .await;

    let result = run(config(&unifi, &route53, Some("home-wan2.example.com"))).await;

    assert_eq!(
        result.to_response(),
        json!({
            "statusCode": 200,
            "body": {
                "message": "DNS record(s) updated successfully",
                "wan1": {"record": "home.example.com", "ip": "1.1.1.1"},
                "changeId": "/change/C2682N5HXP0BZ4",
                "wan2": {"record": "home-wan2.example.com", "ip": "3.3.3.3"}
            }
        })
    );

    let bodies = posted_bodies(&route53).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].matches("<Change>").count(), 2);
    assert!(bodies[0].contains("<Name>home.example.com</Name>"));
    assert!(bodies[0].contains("<Value>1.1.1.1</Value>"));
    assert!(bodies[0].contains("<Name>home-wan2.example.com</Name>"));
    assert!(bodies[0].contains("<Value>3.3.3.3</Value>"));
    assert!(bodies[0].contains("<TTL>300</TTL>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_wan2_is_a_warning() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": []})).await;
    mount_devices(&unifi, devices_with("USG-PRO-4", "1.1.1.1")).await;

    Mock::given(method("POST"))
        .and(path(RRSET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANGE_RESPONSE))
        .expect(1)
        .mount(&route53)
        .await;

    let result = run(config(&unifi, &route53, Some("home-wan2.example.com"))).await;

    let ReconciliationResult::Success(reconciliation) = &result else {
        panic!("expected success, got: {result:?}");
    };
    assert_eq!(reconciliation.wan1.ip, "1.1.1.1");
    assert_eq!(reconciliation.wan2, None);
    assert_eq!(reconciliation.warning.as_deref(), Some(WARNING_WAN2_UNRESOLVED));

    let bodies = posted_bodies(&route53).await;
    assert_eq!(bodies[0].matches("<Change>").count(), 1);
    assert!(!bodies[0].contains("home-wan2.example.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_null_hosts_listing_is_a_warning() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": null, "httpStatusCode": 200})).await;
    mount_devices(&unifi, devices_with("USG 3P", "1.1.1.1")).await;

    Mock::given(method("POST"))
        .and(path(RRSET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANGE_RESPONSE))
        .expect(1)
        .mount(&route53)
        .await;

    let result = run(config(&unifi, &route53, Some("home-wan2.example.com"))).await;

    let ReconciliationResult::Success(reconciliation) = &result else {
        panic!("expected success, got: {result:?}");
    };
    assert_eq!(reconciliation.wan2, None);
    assert_eq!(reconciliation.warning.as_deref(), Some(WARNING_WAN2_UNRESOLVED));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_identical_inputs_send_identical_batches() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": [{"ipAddress": "3.3.3.3"}]})).await;
    mount_devices(&unifi, devices_with("USG 3P", "1.1.1.1")).await;

    Mock::given(method("POST"))
        .and(path(RRSET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANGE_RESPONSE))
        .expect(2)
        .mount(&route53)
        .await;

    let first = run(config(&unifi, &route53, Some("home-wan2.example.com"))).await;
    let second = run(config(&unifi, &route53, Some("home-wan2.example.com"))).await;

    assert_eq!(first, second);
    let bodies = posted_bodies(&route53).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}

// ── Failure paths ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_null_devices_listing_is_unresolved() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": [{"ipAddress": "3.3.3.3"}]})).await;
    mount_devices(&unifi, json!({"data": null})).await;
    expect_no_write(&route53).await;

    let result = run(config(&unifi, &route53, None)).await;

    assert_eq!(
        result,
        ReconciliationResult::Failure {
            error: "WAN1 IP address not found in UniFi devices API response".into()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_unavailable() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": [{"ipAddress": "3.3.3.3"}]})).await;
    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&unifi)
        .await;
    expect_no_write(&route53).await;

    let result = run(config(&unifi, &route53, Some("home-wan2.example.com"))).await;

    assert_eq!(
        result.to_response(),
        json!({
            "statusCode": 500,
            "body": {"error": "UniFi API /v1/devices returned status 503"}
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hosts_unauthorized() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/hosts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&unifi)
        .await;
    expect_no_write(&route53).await;

    let result = run(config(&unifi, &route53, None)).await;

    assert_eq!(
        result,
        ReconciliationResult::Failure {
            error: "UniFi API /v1/hosts returned status 401".into()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gateway_not_found() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": [{"ipAddress": "3.3.3.3"}]})).await;
    mount_devices(&unifi, devices_with("UDM-Pro", "1.1.1.1")).await;
    expect_no_write(&route53).await;

    let result = run(config(&unifi, &route53, Some("home-wan2.example.com"))).await;

    assert_eq!(
        result,
        ReconciliationResult::Failure {
            error: "WAN1 IP address not found in UniFi devices API response".into()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_route53_rejection_is_propagated() {
    let unifi = MockServer::start().await;
    let route53 = MockServer::start().await;

    mount_hosts(&unifi, json!({"data": []})).await;
    mount_devices(&unifi, devices_with("USG 3P", "1.1.1.1")).await;

    Mock::given(method("POST"))
        .and(path(RRSET_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"<?xml version="1.0"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <Error>
    <Type>Sender</Type>
    <Code>InvalidChangeBatch</Code>
    <Message>RRSet with DNS name home.example.com. is not permitted in zone other.com.</Message>
  </Error>
  <RequestId>b25f48e8-84fd-11e6-80d9-574e0c4664cb</RequestId>
</ErrorResponse>"#,
        ))
        .expect(1)
        .mount(&route53)
        .await;

    let result = run(config(&unifi, &route53, None)).await;

    assert_eq!(
        result,
        ReconciliationResult::Failure {
            error: "InvalidChangeBatch: RRSet with DNS name home.example.com. is not permitted \
                    in zone other.com."
                .into()
        }
    );
}
