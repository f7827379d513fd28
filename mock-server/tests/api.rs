use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Product};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- products ---

#[tokio::test]
async fn product_get_empty() {
    let resp = app()
        .oneshot(get_request("/api/v1/product/get?merchantId=M1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn create_product_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/product/createOrUpdate",
            r#"{"merchantId":"M1","name":"Apples"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Product = body_json(resp).await;
    assert_eq!(product.name, "Apples");
    assert!(!product.id.is_empty());
}

#[tokio::test]
async fn create_product_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/product/createOrUpdate",
            r#"{"merchantId":"M1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn product_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::<Request<String>>::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/product/createOrUpdate",
            r#"{"id":"p1","merchantId":"M1","name":"Apples"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::<Request<String>>::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/product/createOrUpdate",
            r#"{"id":"p1","merchantId":"M1","name":"Green apples"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::<Request<String>>::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/product/get?merchantId=M1"))
        .await
        .unwrap();
    let products: Vec<Product> = body_json(resp).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Green apples");

    let resp = ServiceExt::<Request<String>>::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/product/delete?id=p1&id=missing")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    let deleted: Value = body_json(resp).await;
    assert_eq!(deleted["deleted"], 1);

    let resp = ServiceExt::<Request<String>>::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/product/get?merchantId=M1"))
        .await
        .unwrap();
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}

// --- fixtures ---

#[tokio::test]
async fn echo_reflects_request() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/echo?a=1&a=2")
                .header("X-Client-Id", "c1")
                .body(r#"{"k":"v"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Value = body_json(resp).await;
    assert_eq!(echo["method"], "PUT");
    assert_eq!(echo["path"], "/api/v1/echo");
    assert_eq!(echo["query"], "a=1&a=2");
    assert_eq!(echo["headers"]["x-client-id"], "c1");
    assert_eq!(echo["body"]["k"], "v");
}

#[tokio::test]
async fn text_is_not_json() {
    let resp = app().oneshot(get_request("/api/v1/text")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "oops");
}

#[tokio::test]
async fn status_returns_requested_code_with_json() {
    let resp = app().oneshot(get_request("/api/v1/status/404")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["code"], 404);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn cookies_sets_two_cookies() {
    let resp = app().oneshot(get_request("/api/v1/cookies")).await.unwrap();
    let cookies: Vec<&str> = resp
        .headers()
        .get_all(http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies, vec!["session=abc123; Path=/api; HttpOnly", "theme=dark"]);
}

#[tokio::test]
async fn large_returns_an_oversized_json_document() {
    let resp = app().oneshot(get_request("/api/v1/large")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["blob"].as_str().unwrap().len(), mock_server::LARGE_BLOB_LEN);
}
