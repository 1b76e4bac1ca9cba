use axum::{
    body::Body,
    extract::Path,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;
use warden_gate::{
    ExtensionRoleExtractor, HeaderRoleExtractor, HttpRouter, Responder, WardenError,
};

const ROLE_HEADER: &str = "x-role";

async fn call(app: &Router, method: Method, uri: &str, role: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header(ROLE_HEADER, role);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_token_allow_list() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let list_orders = move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            "orders"
        }
    };

    let router = HttpRouter::<String>::new(HeaderRoleExtractor::default());
    let orders = router.new_route(["orders"]).unwrap();
    orders
        .allow_for("GET", "", list_orders, &["ADMIN", "CUSTOMER"])
        .unwrap();
    let app = router.build();

    assert_eq!(
        call(&app, Method::GET, "/orders", Some("CUSTOMER")).await,
        (StatusCode::OK, "orders".to_string())
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert_eq!(
        call(&app, Method::GET, "/orders", Some("GUEST")).await.0,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        call(&app, Method::GET, "/orders", None).await.0,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        call(&app, Method::GET, "/orders", Some("customer")).await.0,
        StatusCode::FORBIDDEN
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_flag_deny_list() {
    let router = HttpRouter::<u64>::new(HeaderRoleExtractor::default());
    let reports = router.new_route(["reports"]).unwrap();
    reports
        .deny_for("GET", "", || async { "report" }, &[0x02u64])
        .unwrap();
    let app = router.build();

    assert_eq!(
        call(&app, Method::GET, "/reports", Some("0x02")).await.0,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        call(&app, Method::GET, "/reports", Some("4")).await,
        (StatusCode::OK, "report".to_string())
    );
    assert_eq!(
        call(&app, Method::GET, "/reports", None).await.0,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        call(&app, Method::GET, "/reports", Some("not-a-number")).await.0,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_flag_membership_is_subset_of_union() {
    let router = HttpRouter::<u64>::new(HeaderRoleExtractor::default());
    router
        .allow_for("GET /audit", || async { "audit" }, &[0x01u64, 0x04])
        .unwrap();
    let app = router.build();

    assert_eq!(call(&app, Method::GET, "/audit", Some("0x05")).await.0, StatusCode::OK);
    assert_eq!(call(&app, Method::GET, "/audit", Some("0x04")).await.0, StatusCode::OK);
    assert_eq!(call(&app, Method::GET, "/audit", Some("0x06")).await.0, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_roles_from_request_extensions() {
    let router = HttpRouter::<String>::new(ExtensionRoleExtractor::new());
    router
        .allow_for("GET /vault", || async { "vault" }, &["ADMIN"])
        .unwrap();
    let app = router.build();

    let request = Request::builder()
        .uri("/vault")
        .extension("ADMIN".to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/vault")
        .header(ROLE_HEADER, "ADMIN")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_route_tree() {
    let router = HttpRouter::<String>::new(HeaderRoleExtractor::default());
    router.set_forbidden_responder(Responder::new(|req: &Request<Body>| {
        (StatusCode::FORBIDDEN, format!("no access to {}", req.uri().path()))
    }));

    let api = router.new_route(["api", "v1/"]).unwrap();
    let orders = api.next(["orders"]).unwrap();
    let items = orders.next([":id", "items"]).unwrap();
    assert_eq!(api.url(), "/api/v1");
    assert_eq!(orders.url(), "/api/v1/orders");
    assert_eq!(items.url(), "/api/v1/orders/:id/items");

    orders
        .handle("GET", ":id", |Path(id): Path<String>| async move { format!("order {id}") })
        .unwrap();
    items
        .allow_for("GET", "", |Path(id): Path<String>| async move { format!("items of {id}") }, &["CUSTOMER"])
        .unwrap();
    orders
        .deny_for("DELETE", ":id", || async { StatusCode::NO_CONTENT }, &["CUSTOMER"])
        .unwrap();

    assert_eq!(
        router.patterns(),
        vec![
            "DELETE /api/v1/orders/:id",
            "GET /api/v1/orders/:id",
            "GET /api/v1/orders/:id/items",
        ]
    );

    let app = router.build();
    assert_eq!(
        call(&app, Method::GET, "/api/v1/orders/42", None).await,
        (StatusCode::OK, "order 42".to_string())
    );
    assert_eq!(
        call(&app, Method::GET, "/api/v1/orders/42/items", Some("CUSTOMER")).await,
        (StatusCode::OK, "items of 42".to_string())
    );
    assert_eq!(
        call(&app, Method::DELETE, "/api/v1/orders/42", Some("CUSTOMER")).await,
        (StatusCode::FORBIDDEN, "no access to /api/v1/orders/42".to_string())
    );
    assert_eq!(
        call(&app, Method::DELETE, "/api/v1/orders/42", Some("ADMIN")).await.0,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        call(&app, Method::PUT, "/api/v1/orders/42", Some("ADMIN")).await.0,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[test]
fn test_wiring_errors_surface_to_caller() {
    let router = HttpRouter::<String>::new(HeaderRoleExtractor::default());
    let orders = router.new_route(["orders"]).unwrap();

    orders.handle("GET", ":id", || async { "" }).unwrap();
    assert!(matches!(
        orders.handle("GET", ":id", || async { "" }),
        Err(WardenError::DuplicatePattern(_))
    ));
    assert!(matches!(
        orders.handle("PUT", ":order", || async { "" }),
        Err(WardenError::CaptureConflict { .. })
    ));
    assert!(matches!(orders.next(["bad segment"]), Err(WardenError::Path(_))));
    assert_eq!(router.patterns(), vec!["GET /orders/:id"]);
}

#[test]
fn test_handle_methods_blocking() {
    let router = HttpRouter::<String>::new(HeaderRoleExtractor::default());
    let demo = router.new_route(["demo"]).unwrap();
    demo.handle_methods(&["GET", "HEAD", "POST"], "", || async { "demo" })
        .unwrap();
    let app = router.build();

    let (status, body) = tokio_test::block_on(call(&app, Method::POST, "/demo", None));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "demo");

    let (status, _) = tokio_test::block_on(call(&app, Method::DELETE, "/demo", None));
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
