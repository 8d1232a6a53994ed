// End-to-end refresh cycles against mock endpoints:
// cache hit short-circuits, stale/corrupt cache refetches, persistence
// failures stay non-fatal, and the wire format matches the token endpoint
// contract.

#[cfg(test)]
mod test {

    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use httpmock::prelude::*;

    use crate::cache::token::Token;
    use crate::config::secrets::{CredentialPair, SecretValue};
    use crate::config::settings::RetryConfig;
    use crate::crypto::cipher;
    use crate::crypto::key::{derive_key, Derivation};
    use crate::error::Error;
    use crate::helpers::time::now_millis;
    use crate::refresh::refresher::TokenRefresher;
    use crate::sources::oauth2::OAuth2Source;
    use crate::store::http::HttpStore;
    use crate::store::memory::MemoryStore;
    use crate::store::TokenStore;
    use crate::tests::common::{build_refresher, endpoint, json, spawn_axum, static_credentials};
    use crate::utils::constants::TOKEN_SLOT_ID;

    fn cache_key() -> [u8; 32] {
        let creds = CredentialPair {
            consumer_key: "k1".into(),
            consumer_secret: "s1".into(),
        };
        derive_key(&creds, Derivation::Concat).unwrap()
    }

    async fn seed(store: &MemoryStore, token_json: &str) {
        let blob = cipher::encrypt(token_json, &cache_key());
        store.put(TOKEN_SLOT_ID, &blob).await.unwrap();
    }

    #[tokio::test]
    async fn first_refresh_fetches_then_cache_short_circuits() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .header("authorization", "Basic azE6czE=");
                then.status(200)
                    .json_body(json!({"access_token": "A", "expires_in": 3600}));
            })
            .await;

        let store = MemoryStore::new();
        let refresher = build_refresher(&server.url("/token"), store.clone(), None);

        let before = now_millis();
        let token = refresher.refresh().await.unwrap();
        assert_eq!(token.access_token, "A");
        assert!(token.expiry >= before + 3_600_000);
        assert!(token.expiry <= now_millis() + 3_600_000);

        let again = refresher.refresh().await.unwrap();
        assert_eq!(again.access_token, "A");
        // a cache hit never restamps the expiry
        assert_eq!(again.expiry, token.expiry);
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn valid_cached_token_skips_network() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "FRESH", "expires_in": 3600}));
            })
            .await;

        let store = MemoryStore::new();
        let cached = json!({
            "access_token": "CACHED",
            "expires_in": 3600,
            "expiry": now_millis() + 3_600_000
        })
        .to_string();
        seed(&store, &cached).await;

        let refresher = build_refresher(&server.url("/token"), store, None);
        let token = refresher.refresh().await.unwrap();
        assert_eq!(token.access_token, "CACHED");
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn stale_cache_refetches_and_overwrites_slot() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "NEW", "expires_in": 3600}));
            })
            .await;

        let store = MemoryStore::new();
        let expired = json!({
            "access_token": "OLD",
            "expires_in": 1,
            "expiry": now_millis() - 1
        })
        .to_string();
        seed(&store, &expired).await;

        let refresher = build_refresher(&server.url("/token"), store.clone(), None);
        let token = refresher.refresh().await.unwrap();
        assert_eq!(token.access_token, "NEW");
        assert_eq!(mock.hits_async().await, 1);

        let blob = store.get(TOKEN_SLOT_ID).await.unwrap().unwrap();
        let stored: Token =
            serde_json::from_str(&cipher::decrypt(&blob, &cache_key()).unwrap()).unwrap();
        assert_eq!(stored.access_token, "NEW");
        assert!(stored.expiry > now_millis());
    }

    #[tokio::test]
    async fn corrupt_blob_degrades_to_miss() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "A", "expires_in": 3600}));
            })
            .await;

        let store = MemoryStore::new();
        store.put(TOKEN_SLOT_ID, "garbage-without-delimiter").await.unwrap();

        let refresher = build_refresher(&server.url("/token"), store, None);
        let token = refresher.refresh().await.unwrap();
        assert_eq!(token.access_token, "A");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn unparsable_decrypted_payload_degrades_to_miss() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "A", "expires_in": 3600}));
            })
            .await;

        let store = MemoryStore::new();
        seed(&store, "this decrypts fine but is not a token").await;

        let refresher = build_refresher(&server.url("/token"), store, None);
        let token = refresher.refresh().await.unwrap();
        assert_eq!(token.access_token, "A");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn persistence_failure_still_returns_token() {
        let server = MockServer::start_async().await;
        let endpoint_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "A", "expires_in": 3600}));
            })
            .await;
        let kv_get = server
            .mock_async(|when, then| {
                when.method(GET).path("/kv/api_token");
                then.status(404);
            })
            .await;
        let kv_put = server
            .mock_async(|when, then| {
                when.method(PUT).path("/kv/api_token");
                then.status(500);
            })
            .await;

        let store = HttpStore::new(&server.url("/kv")).unwrap();
        let refresher = build_refresher(&server.url("/token"), store, None);

        let token = refresher.refresh().await.unwrap();
        assert_eq!(token.access_token, "A");
        assert_eq!(endpoint_mock.hits_async().await, 1);
        assert_eq!(kv_get.hits_async().await, 1);
        assert_eq!(kv_put.hits_async().await, 1);
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_network_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "A", "expires_in": 3600}));
            })
            .await;

        let mut credentials = static_credentials("k1", "s1");
        credentials.consumer_secret = SecretValue::Literal { value: "".into() };
        let source = OAuth2Source::new(endpoint(&server.url("/token"))).unwrap();
        let refresher = TokenRefresher::new(credentials, source, MemoryStore::new(), None);

        assert!(matches!(refresher.refresh().await, Err(Error::Config(_))));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn malformed_endpoint_response_is_a_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200).body("not json at all");
            })
            .await;

        let retry = RetryConfig { enabled: false, attempts: None, delay_ms: None };
        let refresher =
            build_refresher(&server.url("/token"), MemoryStore::new(), Some(retry));
        assert!(matches!(
            refresher.refresh().await,
            Err(Error::Parse { context: "token endpoint response", .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn fetch_sends_client_credentials_wire_format() {
        let seen: Arc<Mutex<Option<(HeaderMap, String)>>> = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();

        let router = Router::new().route(
            "/token",
            post(move |headers: HeaderMap, body: String| {
                let seen = seen_clone.clone();
                async move {
                    *seen.lock().unwrap() = Some((headers, body));
                    (
                        StatusCode::OK,
                        json!({"access_token": "A", "expires_in": 3600}).to_string(),
                    )
                }
            }),
        );
        let (handle, addr) = spawn_axum(router).await;

        let refresher = build_refresher(
            &format!("http://{addr}/token"),
            MemoryStore::new(),
            None,
        );
        let token = refresher.refresh().await.unwrap();
        assert_eq!(token.access_token, "A");

        let (headers, body) = seen.lock().unwrap().take().expect("request captured");
        assert_eq!(headers["authorization"], "Basic azE6czE=");
        assert!(headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/x-www-form-urlencoded"));
        assert!(body.contains("grant_type=client_credentials"));
        assert!(body.contains("scope=default"));

        handle.abort();
    }
}
