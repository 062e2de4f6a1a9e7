use super::*;
use axum::http::StatusCode;
use monito_scraper::core::selectors;
use monito_scraper::web::create_router;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let app = create_router(create_test_app_state(FixtureEngine::compare_page(), test_config())?);

    let response = app.oneshot(request(Method::GET, "/health", None)?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    let body = json_body(response).await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "monito-scraper-api");
    Ok(())
}

#[tokio::test]
async fn test_api_docs_lists_endpoints() -> anyhow::Result<()> {
    let app = create_router(create_test_app_state(FixtureEngine::compare_page(), test_config())?);

    let response = app.oneshot(request(Method::GET, "/api/docs", None)?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert!(body["endpoints"]["POST /api/scrape"].is_string());
    assert!(body["options"]["blockResources"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_post_scrape_returns_providers() -> anyhow::Result<()> {
    let engine = FixtureEngine::compare_page();
    let recorder = engine.recorder();
    let app = create_router(create_test_app_state(engine, test_config())?);

    let payload = json!({
        "fromCountry": "DE",
        "toCountry": "TN",
        "fromCurrency": "EUR",
        "toCurrency": "TND",
        "amount": 100,
        "options": { "headless": true, "timeout": 20000 }
    });
    let response = app
        .oneshot(request(Method::POST, "/api/scrape", Some(payload))?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["totalProviders"], 4);
    assert_eq!(body["providers"][2]["name"], "Western Union");
    assert_eq!(body["transfer"]["from"], "DE");

    // Codes reach the page lower-cased.
    assert!(recorder.visited()[0].ends_with("/transfer/de/tn/eur/tnd/100"));
    Ok(())
}

#[tokio::test]
async fn test_get_scrape_with_path_params() -> anyhow::Result<()> {
    let app = create_router(create_test_app_state(FixtureEngine::compare_page(), test_config())?);

    let response = app
        .oneshot(request(Method::GET, "/api/scrape/de/tn/eur/tnd/50", None)?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["transfer"]["amount"], 50.0);
    Ok(())
}

#[tokio::test]
async fn test_post_validation_failure() -> anyhow::Result<()> {
    let engine = FixtureEngine::compare_page();
    let recorder = engine.recorder();
    let app = create_router(create_test_app_state(engine, test_config())?);

    let payload = json!({ "fromCountry": "germany", "amount": -10 });
    let response = app
        .oneshot(request(Method::POST, "/api/scrape", Some(payload))?)
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["details"],
        json!([
            "fromCountry must be a 2-letter country code",
            "amount must be a positive number"
        ])
    );
    assert_eq!(recorder.launches(), 0);
    Ok(())
}

#[tokio::test]
async fn test_scrape_failure_is_a_200_with_error() -> anyhow::Result<()> {
    let engine = FixtureEngine::compare_page().missing(selectors::CASH_TAB);
    let recorder = engine.recorder();
    let app = create_router(create_test_app_state(engine, test_config())?);

    let response = app
        .oneshot(request(Method::GET, "/api/scrape/de/tn/eur/tnd/100", None)?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap_or_default().contains("#cash-tab"));
    assert!(body.get("providers").is_none());
    assert_eq!(recorder.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unknown_endpoint() -> anyhow::Result<()> {
    let app = create_router(create_test_app_state(FixtureEngine::compare_page(), test_config())?);

    let response = app
        .oneshot(request(Method::GET, "/api/providers", None)?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await?;
    assert_eq!(body, json!({ "success": false, "error": "Endpoint not found" }));
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_applies_per_client() -> anyhow::Result<()> {
    let mut config = test_config();
    config.rate_limit.max_requests = 2;
    let app = create_router(create_test_app_state(FixtureEngine::compare_page(), config)?);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/docs", None)?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/docs", None)?)
        .await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = json_body(response).await?;
    assert_eq!(body["success"], false);

    let response = app
        .oneshot(request_from("192.0.2.99:41000", Method::GET, "/api/docs", None)?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_spoofed_forwarded_for_is_still_limited() -> anyhow::Result<()> {
    let mut config = test_config();
    config.rate_limit.max_requests = 1;
    let app = create_router(create_test_app_state(FixtureEngine::compare_page(), config)?);

    let mut statuses = Vec::new();
    for i in 1..=5 {
        let mut req = request_from("203.0.113.9:52000", Method::GET, "/api/docs", None)?;
        req.headers_mut()
            .insert("x-forwarded-for", format!("10.0.0.{}", i).parse()?);
        statuses.push(app.clone().oneshot(req).await?.status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
    Ok(())
}
