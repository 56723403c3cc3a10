// tests/live_announcer_tests.rs

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use autolive_common::models::config::{keys, sentinel_for};
use autolive_common::models::status::parse_created_at;
use autolive_common::models::BroadcasterInfo;
use autolive_common::traits::BroadcasterSource;
use autolive_core::platforms::twitch::{HelixBroadcasterSource, StaticBroadcaster, TwitchHelixClient};
use autolive_core::repositories::InMemoryConfigStore;
use autolive_core::{AutoLiveConfig, DefaultHttpClient, Error, HttpClient, LiveAnnouncer};

const CREATE_SESSION_PATH: &str = "/xrpc/com.atproto.server.createSession";
const PUT_RECORD_PATH: &str = "/xrpc/com.atproto.repo.putRecord";

// ---- log capture

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buf = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buf, guard)
}

// ---- fixtures

struct NoBroadcaster;

#[async_trait]
impl BroadcasterSource for NoBroadcaster {
    async fn current_broadcaster(&self) -> Result<BroadcasterInfo, Error> {
        Err(Error::BroadcasterUnavailable("nobody is logged in".into()))
    }
}

fn http() -> Arc<dyn HttpClient> {
    Arc::new(DefaultHttpClient::new().unwrap())
}

fn config_for(service: &str) -> AutoLiveConfig {
    AutoLiveConfig {
        identifier: Some("alice.bsky.social".into()),
        app_password: Some("abcd-efgh-ijkl-mnop".into()),
        default_duration_minutes: Some(180),
        bsky_service: service.to_string(),
        ..AutoLiveConfig::default()
    }
}

fn session_body(pds: &str) -> Value {
    json!({
        "did": "did:plc:alice",
        "didDoc": {
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": "did:plc:alice",
            "alsoKnownAs": ["at://alice.bsky.social"],
            "verificationMethod": [],
            "service": [{
                "id": "#atproto_pds",
                "type": "AtprotoPersonalDataServer",
                "serviceEndpoint": pds
            }]
        },
        "handle": "alice.bsky.social",
        "email": "alice@example.com",
        "emailConfirmed": true,
        "emailAuthFactor": false,
        "accessJwt": "access-jwt-123",
        "refreshJwt": "refresh-jwt-456",
        "active": true
    })
}

async fn mount_session(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(CREATE_SESSION_PATH))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn forbid_put_record(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(PUT_RECORD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

async fn put_record_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("mock server should record received requests")
        .into_iter()
        .filter(|req| req.url.path() == PUT_RECORD_PATH)
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect()
}

// ---- tests

#[tokio::test]
async fn each_unset_key_is_logged_and_nothing_is_sent() {
    let full = [
        (keys::IDENTIFIER, "alice.bsky.social"),
        (keys::APP_PASSWORD, "abcd-efgh-ijkl-mnop"),
        (keys::DEFAULT_DURATION, "180"),
    ];

    for (idx, key) in keys::REQUIRED.iter().enumerate() {
        let server = MockServer::start().await;
        let (logs, _guard) = capture_logs();

        let placeholder = sentinel_for(key).unwrap();
        let mut pairs: Vec<(&str, &str)> = full.to_vec();
        pairs[idx] = (*key, placeholder.as_str());
        let store = InMemoryConfigStore::with_values(pairs);

        let config = AutoLiveConfig {
            bsky_service: server.uri(),
            ..AutoLiveConfig::load(&store).await.unwrap()
        };
        let announcer = LiveAnnouncer::new(config, http(), Arc::new(StaticBroadcaster::new("alice")));

        assert!(!announcer.execute().await);

        let text = logs.contents();
        assert!(text.contains(&format!("Set the config value \"{key}\"")), "{text}");
        for other in keys::REQUIRED.iter().filter(|k| *k != key) {
            assert!(!text.contains(&format!("Set the config value \"{other}\"")));
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn all_unset_keys_are_reported_in_one_pass() {
    let server = MockServer::start().await;
    let (logs, _guard) = capture_logs();

    let config = AutoLiveConfig {
        bsky_service: server.uri(),
        ..AutoLiveConfig::default()
    };
    let announcer = LiveAnnouncer::new(config, http(), Arc::new(StaticBroadcaster::new("alice")));
    assert!(!announcer.execute().await);

    let text = logs.contents();
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| l.contains("Set the config value"))
        .collect();
    assert_eq!(lines.len(), 3, "{text}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn publishes_status_linking_to_twitch_channel() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(&server.uri())),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(PUT_RECORD_PATH))
        .and(header("authorization", "Bearer access-jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "at://did:plc:alice/app.bsky.actor.status/self",
            "cid": "bafyreib"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    let started = Utc::now();
    let announcement = announcer.try_execute().await.unwrap();
    assert!(announcement.response_body.contains("app.bsky.actor.status/self"));

    let bodies = put_record_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["repo"], "did:plc:alice");
    assert_eq!(body["collection"], "app.bsky.actor.status");
    assert_eq!(body["rkey"], "self");
    assert_eq!(body["record"]["$type"], "app.bsky.actor.status");
    assert_eq!(body["record"]["status"], "app.bsky.actor.status#live");
    assert_eq!(body["record"]["durationMinutes"], 180);
    assert_eq!(body["record"]["embed"]["$type"], "app.bsky.embed.external");
    assert_eq!(body["record"]["embed"]["external"]["uri"], "https://www.twitch.tv/alice");
    assert_eq!(body["record"]["embed"]["external"]["title"], "alice - Twitch");
    assert_eq!(
        body["record"]["embed"]["external"]["description"],
        "Check me out live on Twitch!"
    );

    let created_at = body["record"]["createdAt"].as_str().unwrap();
    let parsed = parse_created_at(created_at).unwrap();
    let drift = (parsed - started).num_milliseconds().abs();
    assert!(drift < 1000, "createdAt {created_at} drifted {drift}ms");

    server.verify().await;
}

#[tokio::test]
async fn session_body_that_is_not_json_stops_the_run() {
    let server = MockServer::start().await;
    let (logs, _guard) = capture_logs();
    mount_session(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;
    forbid_put_record(&server).await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    assert!(!announcer.execute().await);
    assert!(logs.contents().contains("<html>oops</html>"));
    server.verify().await;
}

#[tokio::test]
async fn session_body_missing_fields_stops_the_run() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "did": "did:plc:alice", "handle": "alice.bsky.social" })),
    )
    .await;
    forbid_put_record(&server).await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    match announcer.try_execute().await {
        Err(Error::UnexpectedResponse { url, .. }) => assert!(url.ends_with(CREATE_SESSION_PATH)),
        other => panic!("expected UnexpectedResponse, got {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn rejected_login_is_an_xrpc_error() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        })),
    )
    .await;
    forbid_put_record(&server).await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    match announcer.try_execute().await {
        Err(Error::Xrpc { status, error, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(error, "AuthenticationRequired");
        }
        other => panic!("expected Xrpc error, got {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn refused_connection_logs_the_target_url() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let (logs, _guard) = capture_logs();
    let announcer = LiveAnnouncer::new(
        config_for(&dead),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );

    assert!(!announcer.execute().await);
    let text = logs.contents();
    assert!(
        text.contains(&format!("[{dead}{CREATE_SESSION_PATH}]")),
        "{text}"
    );
}

#[tokio::test]
async fn malformed_service_url_is_a_construction_error() {
    let announcer = LiveAnnouncer::new(
        config_for("bsky dot social"),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    assert!(matches!(
        announcer.try_execute().await,
        Err(Error::InvalidUri(_))
    ));
}

#[tokio::test]
async fn malformed_pds_endpoint_is_a_construction_error() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body("not a url")),
    )
    .await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    match announcer.try_execute().await {
        Err(Error::InvalidUri(detail)) => assert!(detail.contains(PUT_RECORD_PATH), "{detail}"),
        other => panic!("expected InvalidUri, got {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn unreachable_pds_logs_the_put_record_url() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let server = MockServer::start().await;
    let (logs, _guard) = capture_logs();
    mount_session(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(&dead)),
    )
    .await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    assert!(!announcer.execute().await);

    let text = logs.contents();
    assert!(text.contains(&format!("[{dead}{PUT_RECORD_PATH}]")), "{text}");
    server.verify().await;
}

#[tokio::test]
async fn blank_access_token_never_reaches_put_record() {
    let server = MockServer::start().await;
    let mut body = session_body(&server.uri());
    body["accessJwt"] = json!("  ");
    mount_session(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    forbid_put_record(&server).await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    match announcer.try_execute().await {
        Err(Error::UnexpectedResponse { url, reason, .. }) => {
            assert!(url.ends_with(CREATE_SESSION_PATH));
            assert!(reason.contains("accessJwt"), "{reason}");
        }
        other => panic!("expected UnexpectedResponse, got {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn static_login_keeps_its_case_in_the_title() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(&server.uri())),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(PUT_RECORD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("Alice")),
    );
    assert!(announcer.execute().await);

    let bodies = put_record_bodies(&server).await;
    let external = &bodies[0]["record"]["embed"]["external"];
    assert_eq!(external["title"], "Alice - Twitch");
    assert_eq!(external["uri"], "https://www.twitch.tv/alice");
    server.verify().await;
}

#[tokio::test]
async fn missing_broadcaster_stops_before_write() {
    let server = MockServer::start().await;
    let (logs, _guard) = capture_logs();
    mount_session(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(&server.uri())),
    )
    .await;
    forbid_put_record(&server).await;

    let announcer = LiveAnnouncer::new(config_for(&server.uri()), http(), Arc::new(NoBroadcaster));
    assert!(!announcer.execute().await);
    assert!(logs
        .contents()
        .contains("must be authenticated as the Twitch broadcaster"));
    server.verify().await;
}

#[tokio::test]
async fn failed_write_returns_false() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(&server.uri())),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(PUT_RECORD_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "InvalidRequest",
            "message": "Record/createdAt must be a valid datetime"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let announcer = LiveAnnouncer::new(
        config_for(&server.uri()),
        http(),
        Arc::new(StaticBroadcaster::new("alice")),
    );
    assert!(!announcer.execute().await);
    server.verify().await;
}

#[tokio::test]
async fn helix_token_owner_is_the_broadcaster() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/helix/users"))
        .and(header("client-id", "twitch-client"))
        .and(header("authorization", "Bearer twitch-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "141981764",
                "login": "alice",
                "display_name": "Alice",
                "type": "",
                "broadcaster_type": "affiliate",
                "description": "",
                "profile_image_url": "https://static-cdn.jtvnw.net/alice.png",
                "offline_image_url": "",
                "view_count": 0,
                "created_at": "2016-12-14T20:32:28Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let helix = TwitchHelixClient::with_base_url(
        http(),
        &format!("{}/helix", server.uri()),
        "twitch-token",
        "twitch-client",
    );
    let info = HelixBroadcasterSource::new(Some(helix))
        .current_broadcaster()
        .await
        .unwrap();

    assert_eq!(info.user_login, "alice");
    assert_eq!(info.user_name, "Alice");
    assert_eq!(info.user_id.as_deref(), Some("141981764"));
    assert_eq!(info.channel_url(), "https://www.twitch.tv/alice");
    server.verify().await;
}

#[tokio::test]
async fn helix_empty_data_means_no_broadcaster() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/helix/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let helix = TwitchHelixClient::with_base_url(
        http(),
        &format!("{}/helix", server.uri()),
        "twitch-token",
        "twitch-client",
    );
    assert!(matches!(
        HelixBroadcasterSource::new(Some(helix)).current_broadcaster().await,
        Err(Error::BroadcasterUnavailable(_))
    ));
}
