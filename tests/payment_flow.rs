//! End-to-end payment flow through the HTTP gateway.
//!
//! Two users sign up, each links a bank, and one sends money to the
//! other's shareable account id. External platforms are the in-memory
//! mocks (`mock-api` feature).

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use banklink::actions::{Actions, Clients, CollectionIds};
use banklink::appwrite::mock::{MockDocumentStore, MockIdentity};
use banklink::dwolla::mock::MockProcessor;
use banklink::gateway::{router, state::AppState};
use banklink::plaid::mock::MockAggregator;

struct Gateway {
    app: Router,
    aggregator: Arc<MockAggregator>,
    processor: Arc<MockProcessor>,
}

impl Gateway {
    fn new() -> Self {
        let aggregator = Arc::new(MockAggregator::new());
        let processor = Arc::new(MockProcessor::new());
        let clients = Clients {
            identity: Arc::new(MockIdentity::new()),
            documents: Arc::new(MockDocumentStore::new()),
            aggregator: aggregator.clone(),
            processor: processor.clone(),
        };
        let collections = CollectionIds {
            user: "users".to_string(),
            bank: "banks".to_string(),
            transaction: "transactions".to_string(),
        };
        let state = Arc::new(AppState::new(Actions::new(clients, &collections)));
        Self {
            app: router(state),
            aggregator,
            processor,
        }
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, cookie, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.call(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, cookie: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = self.call(request).await;
        (status, body)
    }

    /// Sign up and return the session cookie pair
    async fn sign_up(&self, email: &str, first_name: &str) -> String {
        let (status, cookie, _) = self
            .post(
                "/api/v1/auth/sign-up",
                json!({
                    "email": email,
                    "firstName": first_name,
                    "lastName": "Tester",
                    "password": "secret-pw"
                }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        cookie.unwrap()
    }

    /// Link a bank whose only account is `account_id`; returns the bank view
    async fn link_bank(&self, cookie: &str, account_id: &str) -> Value {
        self.aggregator
            .set_accounts(vec![MockAggregator::checking_account(account_id, "Checking")]);
        let (status, _, body) = self
            .post(
                "/api/v1/banks/exchange",
                json!({"publicToken": format!("public-{}", account_id)}),
                Some(cookie),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["bank"].clone()
    }
}

#[tokio::test]
async fn test_send_payment_between_users() {
    let gw = Gateway::new();
    let alice = gw.sign_up("alice@example.com", "Alice").await;
    let bob = gw.sign_up("bob@example.com", "Bob").await;

    let alice_bank = gw.link_bank(&alice, "acc_alice").await;
    let bob_bank = gw.link_bank(&bob, "acc_bob").await;
    assert_ne!(alice_bank["shareableId"], bob_bank["shareableId"]);

    let (status, _, body) = gw
        .post(
            "/api/v1/transfers",
            json!({
                "name": "Rent",
                "email": "bob@example.com",
                "amount": "25.00",
                "senderBankId": alice_bank["id"],
                "shareableId": bob_bank["shareableId"]
            }),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["senderBankId"], alice_bank["id"]);
    assert_eq!(body["data"]["receiverBankId"], bob_bank["id"]);
    assert_eq!(body["data"]["channel"], "Online");
    assert_eq!(body["data"]["category"], "Transfer");
    assert_eq!(gw.processor.transfers().len(), 1);

    // The record shows up for both sides
    let uri = format!("/api/v1/transactions/{}", alice_bank["id"].as_str().unwrap());
    let (status, body) = gw.get(&uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);

    let uri = format!("/api/v1/transactions/{}", bob_bank["id"].as_str().unwrap());
    let (status, body) = gw.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn test_other_users_bank_reads_as_missing() {
    let gw = Gateway::new();
    let alice = gw.sign_up("alice@example.com", "Alice").await;
    let bob = gw.sign_up("bob@example.com", "Bob").await;
    let alice_bank = gw.link_bank(&alice, "acc_alice").await;

    let uri = format!("/api/v1/banks/{}", alice_bank["id"].as_str().unwrap());
    let (status, _) = gw.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/accounts/{}", alice_bank["id"].as_str().unwrap());
    let (status, _) = gw.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_to_unknown_shareable_id() {
    let gw = Gateway::new();
    let alice = gw.sign_up("alice@example.com", "Alice").await;
    let alice_bank = gw.link_bank(&alice, "acc_alice").await;

    let (status, _, body) = gw
        .post(
            "/api/v1/transfers",
            json!({
                "name": "Rent",
                "email": "x@example.com",
                "amount": "5.00",
                "senderBankId": alice_bank["id"],
                "shareableId": banklink::ids::encrypt_id("acc_nobody")
            }),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
    assert!(gw.processor.transfers().is_empty());
}

#[tokio::test]
async fn test_payment_rejects_sub_cent_amount() {
    let gw = Gateway::new();
    let alice = gw.sign_up("alice@example.com", "Alice").await;
    let bob = gw.sign_up("bob@example.com", "Bob").await;
    let alice_bank = gw.link_bank(&alice, "acc_alice").await;
    let bob_bank = gw.link_bank(&bob, "acc_bob").await;

    let (status, _, _) = gw
        .post(
            "/api/v1/transfers",
            json!({
                "name": "Rent",
                "email": "bob@example.com",
                "amount": "1.005",
                "senderBankId": alice_bank["id"],
                "shareableId": bob_bank["shareableId"]
            }),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(gw.processor.transfers().is_empty());
}

#[tokio::test]
async fn test_accounts_summary_totals_linked_banks() {
    let gw = Gateway::new();
    let alice = gw.sign_up("alice@example.com", "Alice").await;
    gw.link_bank(&alice, "acc_one").await;
    gw.link_bank(&alice, "acc_two").await;

    let (status, body) = gw.get("/api/v1/accounts", &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalBanks"], 2);
    assert_eq!(body["data"]["totalCurrentBalance"], "220.00");
}
