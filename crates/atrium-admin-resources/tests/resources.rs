//! Resource module integration tests over a scripted transport:
//! candidate ordering, envelope normalization, shape probing, multipart
//! descriptors and the message poller.

use async_trait::async_trait;
use atrium_admin_resources::users::{UserFilter, UserStatus};
use atrium_admin_resources::{ConsoleApi, ListQuery};
use atrium_api_client::{
    ApiClient, ApiError, HttpTransport, MultipartField, NoRedirect, RequestBody, TransportError,
    TransportRequest, TransportResponse, UrlBuilder,
};
use atrium_session_store::{MemorySessionStore, Session, SessionStore};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transport replaying scripted responses and recording requests.
#[derive(Default)]
struct MockTransport {
    requests: Mutex<Vec<TransportRequest>>,
    responses: Mutex<VecDeque<TransportResponse>>,
}

impl MockTransport {
    fn enqueue_json(&self, status: u16, body: serde_json::Value) {
        self.responses.lock().unwrap().push_back(TransportResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string().into_bytes(),
        });
    }

    fn enqueue_empty(&self, status: u16) {
        self.responses.lock().unwrap().push_back(TransportResponse {
            status,
            content_type: None,
            body: Vec::new(),
        });
    }

    fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn urls(&self) -> Vec<String> {
        self.requests().iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::new("no scripted response"))
    }
}

/// A JWT without an exp claim, so it never trips the expiry guard.
fn token() -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(br#"{"sub":"op-1"}"#);
    format!("{}.{}.signature", header, claims)
}

fn signed_in_api() -> (Arc<MockTransport>, ConsoleApi) {
    let transport = Arc::new(MockTransport::default());
    let session = Arc::new(MemorySessionStore::new());
    session
        .set(&Session::new("op@atrium.app", token()))
        .unwrap();
    let client = ApiClient::with_transport(
        transport.clone(),
        // No version prefix, so prefix recovery stays out of the way.
        UrlBuilder::new("http://backend.test", ""),
        session,
        Arc::new(NoRedirect),
    );
    (transport, ConsoleApi::new(Arc::new(client)))
}

fn sample_user() -> serde_json::Value {
    json!({ "id": 5, "email": "ada@example.com", "name": "Ada", "status": "active" })
}

#[tokio::test]
async fn users_list_unwraps_envelope() {
    let (transport, api) = signed_in_api();
    transport.enqueue_json(200, json!({ "data": [sample_user()], "meta": { "total": 1 } }));

    let users = api.users().list(&UserFilter::default()).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ada@example.com");
    assert_eq!(users[0].status, UserStatus::Active);
    assert_eq!(transport.urls(), vec!["http://backend.test/admin/users".to_string()]);
}

#[tokio::test]
async fn users_list_accepts_bare_payload_on_legacy_route() {
    let (transport, api) = signed_in_api();
    transport.enqueue_json(404, json!({ "message": "Not found" }));
    transport.enqueue_json(200, json!([sample_user()]));

    let users = api.users().list(&UserFilter::default()).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(
        transport.urls(),
        vec![
            "http://backend.test/admin/users".to_string(),
            "http://backend.test/users".to_string(),
        ]
    );
}

#[tokio::test]
async fn users_search_probes_parameter_names() {
    let (transport, api) = signed_in_api();
    // First shape misses on both path candidates, second shape lands.
    transport.enqueue_json(404, json!({ "message": "Not found" }));
    transport.enqueue_json(404, json!({ "message": "Not found" }));
    transport.enqueue_json(200, json!({ "data": [] }));

    let filter = UserFilter {
        search: Some("ada".to_string()),
        ..UserFilter::default()
    };
    api.users().list(&filter).await.unwrap();

    assert_eq!(
        transport.urls(),
        vec![
            "http://backend.test/admin/users?search=ada".to_string(),
            "http://backend.test/users?search=ada".to_string(),
            "http://backend.test/admin/users?query=ada".to_string(),
        ]
    );
}

#[tokio::test]
async fn users_search_aborts_on_validation_error() {
    let (transport, api) = signed_in_api();
    transport.enqueue_json(422, json!({ "message": "search too short" }));

    let filter = UserFilter {
        search: Some("a".to_string()),
        ..UserFilter::default()
    };
    let err = api.users().list(&filter).await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(transport.requests().len(), 1, "no further shapes probed");
}

#[tokio::test]
async fn user_status_transition_sends_typed_body() {
    let (transport, api) = signed_in_api();
    transport.enqueue_json(200, json!({ "data": sample_user() }));

    api.users().set_status(5, UserStatus::Suspended).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url, "http://backend.test/admin/users/5/status");
    match &requests[0].body {
        Some(RequestBody::Json(body)) => assert_eq!(body, &json!({ "status": "suspended" })),
        other => panic!("expected JSON body, got {:?}", other),
    }
}

#[tokio::test]
async fn report_resolution_probes_body_shapes_around_paths() {
    let (transport, api) = signed_in_api();
    // The `state` body shape misses on all three path candidates, then
    // the `status` shape lands on the first path.
    for _ in 0..3 {
        transport.enqueue_json(404, json!({ "message": "Not found" }));
    }
    transport.enqueue_json(
        200,
        json!({ "data": {
            "id": 9, "reporter_id": 1, "subject_type": "event", "subject_id": 3,
            "state": "resolved"
        }}),
    );

    let report = api.reports().resolve(9, Some("duplicate")).await.unwrap();
    assert_eq!(report.id, 9);

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    match &requests[3].body {
        Some(RequestBody::Json(body)) => {
            assert_eq!(body.get("status"), Some(&json!("resolved")));
            assert_eq!(body.get("note"), Some(&json!("duplicate")));
        }
        other => panic!("expected JSON body, got {:?}", other),
    }
}

#[tokio::test]
async fn ad_creation_uploads_creative_as_multipart() {
    use atrium_admin_resources::ads::{Creative, NewAd};

    let (transport, api) = signed_in_api();
    transport.enqueue_json(201, json!({ "data": { "id": 3, "title": "Spring", "status": "draft" } }));

    let ad = NewAd {
        title: "Spring".to_string(),
        placement: "sidebar".to_string(),
        target_url: None,
        creative: Some(Creative {
            file_name: "banner.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        }),
    };
    api.ads().create(&ad).await.unwrap();

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(request.header("Content-Type"), None, "transport owns the boundary");
    match &request.body {
        Some(RequestBody::Multipart(form)) => {
            assert_eq!(form.fields.len(), 3);
            assert!(form.fields.iter().any(|field| matches!(
                field,
                MultipartField::File { name, file_name, .. }
                    if name == "creative" && file_name == "banner.png"
            )));
        }
        other => panic!("expected multipart body, got {:?}", other),
    }
}

#[tokio::test]
async fn ad_creation_without_creative_stays_json() {
    use atrium_admin_resources::ads::NewAd;

    let (transport, api) = signed_in_api();
    transport.enqueue_json(201, json!({ "data": { "id": 4, "title": "Plain", "status": "draft" } }));

    let ad = NewAd {
        title: "Plain".to_string(),
        placement: "feed".to_string(),
        target_url: Some("https://example.com".to_string()),
        creative: None,
    };
    api.ads().create(&ad).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].header("Content-Type"), Some("application/json"));
    assert!(matches!(requests[0].body, Some(RequestBody::Json(_))));
}

#[tokio::test]
async fn category_delete_tolerates_empty_body() {
    let (transport, api) = signed_in_api();
    transport.enqueue_empty(204);

    api.categories().delete(12).await.unwrap();

    assert_eq!(
        transport.urls(),
        vec!["http://backend.test/admin/categories/12".to_string()]
    );
}

#[tokio::test]
async fn list_query_serializes_in_order() {
    let (transport, api) = signed_in_api();
    transport.enqueue_json(200, json!({ "data": [] }));

    api.shop()
        .list(&ListQuery::new().page(2).per_page(50))
        .await
        .unwrap();

    assert_eq!(
        transport.urls(),
        vec!["http://backend.test/admin/shop/products?page=2&per_page=50".to_string()]
    );
}

#[tokio::test]
async fn envelope_shape_mismatch_is_a_json_error() {
    let (transport, api) = signed_in_api();
    transport.enqueue_json(200, json!({ "data": { "unexpected": true } }));

    let err = api.users().list(&UserFilter::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Json(_)));
}

#[tokio::test]
async fn sign_in_persists_the_session() {
    let transport = Arc::new(MockTransport::default());
    let session: Arc<MemorySessionStore> = Arc::new(MemorySessionStore::new());
    let client = ApiClient::with_transport(
        transport.clone(),
        UrlBuilder::new("http://backend.test", ""),
        session.clone(),
        Arc::new(NoRedirect),
    );
    let api = ConsoleApi::new(Arc::new(client));

    transport.enqueue_json(
        200,
        json!({ "data": { "access_token": token(), "refresh_token": "r-1" } }),
    );

    let granted = api.auth().sign_in("op@atrium.app", "pw").await.unwrap();
    assert_eq!(granted.email, "op@atrium.app");

    let stored = session.get().expect("session persisted");
    assert_eq!(stored.access_token, Some(token()));
    assert_eq!(stored.refresh_token.as_deref(), Some("r-1"));
    assert!(stored.created_at.is_some());

    // Sign-in must not have attached a bearer header.
    assert_eq!(transport.requests()[0].header("Authorization"), None);
    assert_eq!(transport.urls(), vec!["http://backend.test/auth/sign-in".to_string()]);
}

#[tokio::test]
async fn message_poller_delivers_pages_until_stopped() {
    let (transport, api) = signed_in_api();
    let message = json!({ "id": 1, "sender_id": 2, "body": "hi" });
    transport.enqueue_json(200, json!({ "data": [message.clone()] }));
    transport.enqueue_json(200, json!({ "data": [message.clone(), { "id": 2, "sender_id": 5, "body": "yo" }] }));

    let (poller, mut rx) = api.chat().poll_messages(7, Duration::from_millis(10));

    let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("first page in time")
        .expect("channel open");
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].body, "hi");

    let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("second page in time")
        .expect("channel open");
    assert_eq!(second.len(), 2);

    poller.stop();
    let closed = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("channel closes after stop");
    assert!(closed.is_none());
}
