use std::collections::HashMap;

use subscription_order::error::{AppError, TransportError};
use subscription_order::form::{normalize, FormSource, JiraFormClient};
use subscription_order::http::HttpClient;

mod common;

async fn client(token: &str) -> JiraFormClient {
    let mut forms = HashMap::new();
    forms.insert(
        "online-1".to_string(),
        serde_json::json!([
            {"label": "Kostnadsoppfølger", "questionKey": "kostnadsoppfolger", "answer": "Angrboða@skatteetaten.no"},
            {"label": "Informasjon om bestillingen"},
            {"label": "Nettverksstørrelse", "questionKey": "vnetSize", "answer": " /24 "}
        ]),
    );
    forms.insert(
        "../admin".to_string(),
        common::form_answers(&[("subscriptionName", "sub-escaped-key")]),
    );
    let base_url = common::start_form_service(forms).await;
    JiraFormClient::new(HttpClient::new(&base_url, Some(token.to_string()), 5).unwrap())
}

#[tokio::test]
async fn test_fetch_and_normalize_form() {
    let client = client(common::FORM_TOKEN).await;

    let answers = client.fetch_answers("online-1").await.unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers[1].question_key, None);

    let order = normalize(&answers).unwrap();
    assert_eq!(order.kostnadsoppfolger, "Angrboða@skatteetaten.no");
    assert_eq!(order.vnet_size, 24);
    assert!(order.budget_contact.is_empty());
}

#[tokio::test]
async fn test_unknown_form_is_transport_error() {
    let client = client(common::FORM_TOKEN).await;

    match client.fetch_answers("missing").await {
        Err(AppError::Transport(TransportError::Status { method, url, status, message })) => {
            assert_eq!(method, "GET");
            assert!(url.ends_with("/jira/missing"), "url was {}", url);
            assert_eq!(status, "404 Not Found");
            assert_eq!(message, None);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_key_stays_one_path_segment() {
    let client = client(common::FORM_TOKEN).await;

    let order = normalize(&client.fetch_answers("../admin").await.unwrap()).unwrap();
    assert_eq!(order.subscription_name, "sub-escaped-key");

    match client.fetch_answers("online-1?x=1").await {
        Err(AppError::Transport(TransportError::Status { url, status, .. })) => {
            assert_eq!(status, "404 Not Found");
            assert!(url.ends_with("/jira/online-1%3Fx=1"), "url was {}", url);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let client = client(common::FORM_TOKEN).await;

    let err = client.fetch_answers("BROKEN").await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("500 Internal Server Error jira is down"), "{}", err);
}

#[tokio::test]
async fn test_non_json_body_is_transport_error() {
    let client = client(common::FORM_TOKEN).await;

    let err = client.fetch_answers("GARBLED").await.unwrap_err();
    assert!(matches!(err, AppError::Transport(TransportError::Decode(_))), "{:?}", err);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let client = client("wrong-token").await;

    let err = client.fetch_answers("online-1").await.unwrap_err();
    assert!(err.to_string().contains("401 Unauthorized"), "{}", err);
}
