//! Integration tests for `RemoteClassifier` using wiremock HTTP mocks.

use phishdb_classify::{RemoteClassifier, Verdict};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn classify_posts_the_url_and_maps_the_label() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(body_json(serde_json::json!({ "url": "http://phish.test/login" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "label": "malicious" })),
        )
        .mount(&server)
        .await;

    let classifier = RemoteClassifier::new(&server.uri(), 5).unwrap();
    let verdict = classifier.classify("http://phish.test/login").await.unwrap();

    assert_eq!(verdict, Verdict::Malicious);
}

#[tokio::test]
async fn unexpected_labels_become_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "label": "meh" })),
        )
        .mount(&server)
        .await;

    let classifier = RemoteClassifier::new(&server.uri(), 5).unwrap();
    let verdict = classifier.classify("http://x.test/").await.unwrap();

    assert_eq!(verdict, Verdict::Unknown);
}

#[tokio::test]
async fn service_errors_surface_as_classify_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let classifier = RemoteClassifier::new(&server.uri(), 5).unwrap();
    let result = classifier.classify("http://x.test/").await;

    assert!(result.is_err());
}
