//! HTTP behaviour of [`Server`] against a mock OpenL2M instance.

use openl2m_client::{
    DeviceFilter, Error, GroupId, InterfaceCommand, InterfaceId, RetryPolicy, Server,
    ServerBuilder,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "0123456789abcdef";

fn fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap()
}

fn client(server: &MockServer) -> Server {
    Server::new(server.uri(), TOKEN).unwrap()
}

#[tokio::test]
async fn list_devices_sends_token_and_parses_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .and(header("Authorization", format!("Token {TOKEN}").as_str()))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("switches.json")))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client(&server)
        .list_devices(&DeviceFilter::all())
        .await
        .unwrap();
    assert_eq!(devices.len(), 3);
    assert_eq!(devices.groups().len(), 2);
}

#[tokio::test]
async fn list_devices_applies_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("switches.json")))
        .mount(&server)
        .await;

    let devices = client(&server)
        .list_devices(&DeviceFilter::all().in_group(GroupId::new(9)))
        .await
        .unwrap();
    let names: Vec<_> = devices.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["core-sw1"]);
}

#[tokio::test]
async fn list_devices_empty_array_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let devices = client(&server)
        .list_devices(&DeviceFilter::all())
        .await
        .unwrap();
    assert!(devices.is_empty());
    assert_eq!(devices.iter().count(), 0);
}

#[tokio::test]
async fn list_devices_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .list_devices(&DeviceFilter::all())
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::AuthenticationFailed(ref msg) if msg.contains("Invalid token.")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn list_devices_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_devices(&DeviceFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed(_)));
}

#[tokio::test]
async fn list_devices_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .list_devices(&DeviceFilter::all())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::ServerError {
            status: 500,
            message: "Internal Server Error".to_string()
        }
    );
}

#[tokio::test]
async fn list_devices_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_devices(&DeviceFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolError(_)));
}

#[tokio::test]
async fn list_devices_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "no-url"}])),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .list_devices(&DeviceFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolError(_)));
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = Server::new(format!("http://127.0.0.1:{port}/"), TOKEN).unwrap();
    let err = client.stats().await.unwrap_err();
    assert!(matches!(err, Error::NetworkError(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_response_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixture("stats.json"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = ServerBuilder::new(server.uri(), TOKEN)
        .unwrap()
        .with_timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = client.stats().await.unwrap_err();
    assert!(matches!(err, Error::NetworkError(_)), "got {err:?}");
}

#[tokio::test]
async fn get_device_reads_listed_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switches/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("switches.json")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/switch/9/272/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("device_272.json")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let devices = client.list_devices(&DeviceFilter::all()).await.unwrap();
    let core = devices.iter().find(|d| d.name == "core-sw1").unwrap();

    let detail = core.handle(&client).get().await.unwrap();
    assert_eq!(detail.hostname(), Some("CORE-SW1"));
    assert_eq!(detail.interface_count(), 3);
}

#[tokio::test]
async fn get_device_details_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switch/9/272/details/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixture("device_272_details.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let device = client.device("/api/switch/9/272").unwrap();
    let detail = device.details().await.unwrap();
    assert!(detail.section("lldp").is_some());
}

#[tokio::test]
async fn get_device_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/switch/9/999/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"reason": "Invalid device"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_device("/api/switch/9/999/")
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::NotFound(ref msg) if msg.contains("Invalid device")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn device_url_on_other_host_is_rejected() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client
        .get_device("https://elsewhere.example.com/api/switch/9/272/")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
}

#[tokio::test]
async fn set_description_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/switch/9/272/interface/15/description/"))
        .and(header("Authorization", format!("Token {TOKEN}").as_str()))
        .and(body_json(json!({"description": "New description"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": "Interface description changed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let device = client.device("/api/switch/9/272/").unwrap();
    let result = device
        .set_interface_description("15", "New description")
        .await
        .unwrap();
    assert_eq!(result.status, 200);
    assert_eq!(
        result.message.as_deref(),
        Some("Interface description changed")
    );
}

#[tokio::test]
async fn interface_commands_hit_their_endpoints() {
    let server = MockServer::start().await;
    let cases = [
        ("state", json!({"state": "off"})),
        ("poe_state", json!({"poe_state": true})),
        ("vlan", json!({"vlan": 888})),
    ];
    for (segment, body) in &cases {
        Mock::given(method("POST"))
            .and(path(format!("/api/switch/4/839/interface/10/{segment}/").as_str()))
            .and(body_json(body.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "OK"})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&server);
    let device = client.device("/api/switch/4/839/").unwrap();
    device.set_interface_state("10", false).await.unwrap();
    device.set_interface_poe_state("10", true).await.unwrap();
    device.set_interface_vlan("10", 888).await.unwrap();
}

#[tokio::test]
async fn run_command_validation_message_is_verbatim() {
    let server = MockServer::start().await;
    let reason = "Invalid vlan id 4095: VLAN does not exist on this device!";
    Mock::given(method("POST"))
        .and(path("/api/switch/9/272/interface/15/vlan/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"reason": reason})))
        .mount(&server)
        .await;

    let err = client(&server)
        .run_command(
            "/api/switch/9/272/",
            &InterfaceId::new("15"),
            &InterfaceCommand::Vlan(4095),
        )
        .await
        .unwrap_err();
    assert_eq!(err, Error::ValidationError(reason.to_string()));
}

#[tokio::test]
async fn run_command_plain_text_validation_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/switch/9/272/interface/15/state/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad state value"))
        .mount(&server)
        .await;

    let err = client(&server)
        .run_command(
            "/api/switch/9/272/",
            &InterfaceId::new("15"),
            &InterfaceCommand::State(true),
        )
        .await
        .unwrap_err();
    assert_eq!(err, Error::ValidationError("Bad state value".to_string()));
}

#[tokio::test]
async fn run_command_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/switch/9/272/interface/15/state/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client(&server)
        .run_command(
            "/api/switch/9/272/",
            &InterfaceId::new("15"),
            &InterfaceCommand::State(true),
        )
        .await
        .unwrap();
    assert_eq!(result.status, 204);
    assert_eq!(result.body, Value::Null);
    assert!(result.message.is_none());
}

#[tokio::test]
async fn stats_and_environment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("stats.json")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/environment/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("environment.json")))
        .mount(&server)
        .await;

    let client = client(&server);
    let stats = client.stats().await.unwrap();
    assert_eq!(stats.get("Total Devices"), Some(&json!(3)));

    let env = client.environment().await.unwrap();
    assert_eq!(env.get("OS"), Some(&json!("Linux")));
    assert_eq!(env.len(), 5);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openl2m/api/stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Server::new(format!("{}/openl2m", server.uri()), TOKEN).unwrap();
    assert!(client.stats().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_is_not_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).stats().await.unwrap_err();
    assert!(matches!(err, Error::ServerError { status: 503, .. }));
}

#[tokio::test]
async fn get_retries_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Total Users": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServerBuilder::new(server.uri(), TOKEN)
        .unwrap()
        .with_retry_policy(
            RetryPolicy::new()
                .with_max_retries(2)
                .with_initial_delay(Duration::from_millis(1)),
        )
        .build()
        .unwrap();

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.get("Total Users"), Some(&json!(1)));
}

#[tokio::test]
async fn post_is_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/switch/9/272/interface/15/state/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServerBuilder::new(server.uri(), TOKEN)
        .unwrap()
        .with_retry_policy(RetryPolicy::new().with_initial_delay(Duration::from_millis(1)))
        .build()
        .unwrap();

    let err = client
        .run_command(
            "/api/switch/9/272/",
            &InterfaceId::new("15"),
            &InterfaceCommand::State(false),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ServerError { status: 503, .. }));
}
