//! Route behaviour for the hard-fail data routes and the health endpoint.

use serde_json::json;

mod common;

use common::{spawn_app, spawn_with_workers, test_config, WorkerDir};

#[tokio::test]
async fn quote_passes_worker_output_through() {
    let app = spawn_with_workers(&[("quote.sh", r#"echo "QUOTE:$1""#)]).await;

    let (status, body) = app.post("/quote", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true, "data": "QUOTE:ABC\n"}));
}

#[tokio::test]
async fn missing_ticker_is_rejected_before_any_worker_runs() {
    let workers = WorkerDir::new();
    let marker = workers.file("spawned");
    let record = format!("echo ran >> '{}'", marker.display());
    for name in ["quote.sh", "filings.sh", "chart.sh", "news.sh"] {
        workers.write(name, &record);
    }
    let app = spawn_app(test_config(&workers), workers).await;

    for route in ["/quote", "/filings", "/chart", "/news"] {
        for body in [json!({}), json!({"ticker": ""}), json!({"ticker": "   "})] {
            let (status, response) = app.post(route, body).await;
            assert_eq!(status, 400, "{route} should reject a missing ticker");
            assert_eq!(response["error"], "Ticker is required");
        }

        let (status, response) = app.post_raw(route, "").await;
        assert_eq!(status, 400);
        assert_eq!(response["error"], "Ticker is required");
    }

    assert!(!marker.exists(), "no worker may run for an invalid request");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = spawn_with_workers(&[("quote.sh", r#"echo "QUOTE:$1""#)]).await;

    let (status, body) = app.post_raw("/quote", "{\"ticker\": ").await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request body");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn ticker_is_passed_as_a_single_inert_argument() {
    let app = spawn_with_workers(&[("quote.sh", r#"printf '%s|%s' "$#" "$1""#)]).await;

    let ticker = "ABC; echo pwned $(whoami)";
    let (status, body) = app.post("/quote", json!({"ticker": ticker})).await;

    assert_eq!(status, 200);
    assert_eq!(body["data"], format!("1|{}", ticker));
}

#[tokio::test]
async fn quote_failure_returns_stderr_as_details() {
    let app = spawn_with_workers(&[(
        "quote.sh",
        "echo 'partial output'\necho 'unknown ticker ZZZ' 1>&2\nexit 2",
    )])
    .await;

    let (status, body) = app.post("/quote", json!({"ticker": "ZZZ"})).await;

    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Error running quote fetcher",
            "details": "unknown ticker ZZZ\n"
        })
    );
}

#[tokio::test]
async fn silent_failure_gets_generated_details() {
    let app = spawn_with_workers(&[("quote.sh", "exit 3")]).await;

    let (status, body) = app.post("/quote", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 500);
    assert_eq!(body["details"], "process exited with code 3");
}

#[tokio::test]
async fn launch_failure_is_reported_distinctly() {
    let workers = WorkerDir::new();
    let mut config = test_config(&workers);
    config.workers.interpreter = None;
    config.workers.quote = workers.file("does-not-exist");
    let app = spawn_app(config, workers).await;

    let (status, body) = app.post("/quote", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "Error running quote fetcher");
    let details = body["details"].as_str().unwrap();
    assert!(
        details.starts_with("failed to start worker:"),
        "unexpected details: {details}"
    );
}

#[tokio::test]
async fn filings_receives_ticker_on_stdin() {
    let app = spawn_with_workers(&[(
        "filings.sh",
        "read ticker\necho \"FILINGS:$ticker\"\necho \"args:$#\"",
    )])
    .await;

    let (status, body) = app.post("/filings", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"success": true, "data": "FILINGS:ABC\nargs:0\n"})
    );
}

#[tokio::test]
async fn filings_failure_is_a_server_error() {
    let app = spawn_with_workers(&[("filings.sh", "echo 'SEC API unreachable' 1>&2\nexit 1")]).await;

    let (status, body) = app.post("/filings", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "Error running filings fetcher");
    assert_eq!(body["details"], "SEC API unreachable\n");
}

const ECHO_CHART_ARGS: &str =
    r#"printf '{"count":%d,"args":["%s","%s","%s"]}' "$#" "$1" "$2" "$3""#;

#[tokio::test]
async fn chart_uses_default_interval_and_period() {
    let app = spawn_with_workers(&[("chart.sh", ECHO_CHART_ARGS)]).await;

    let (status, body) = app.post("/chart", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"count": 3, "args": ["ABC", "1d", "1y"]}));
}

#[tokio::test]
async fn chart_forwards_requested_interval_and_period() {
    let app = spawn_with_workers(&[("chart.sh", ECHO_CHART_ARGS)]).await;

    let (status, body) = app
        .post(
            "/chart",
            json!({"ticker": "ABC", "interval": "1wk", "period": "5y"}),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["args"], json!(["ABC", "1wk", "5y"]));
}

#[tokio::test]
async fn chart_payload_round_trips_field_for_field() {
    let fixture = json!({
        "success": true,
        "ticker": "ABC",
        "candlestick": [
            {"time": 1704067200, "open": 187.15, "high": 188.44, "low": 183.89, "close": 185.64},
            {"time": 1704153600, "open": 184.22, "high": 185.88, "low": 183.43, "close": 184.25}
        ],
        "volume": [{"time": 1704067200, "value": 82488700, "color": "#26a69a"}],
        "indicators": {"sma20": [], "rsi": [{"time": 1704153600, "value": 48.21}]},
        "meta": {"currency": "USD", "exchange": null}
    });

    let workers = WorkerDir::new();
    let fixture_path = workers.file("chart.json");
    std::fs::write(&fixture_path, serde_json::to_string(&fixture).unwrap()).unwrap();
    workers.write("chart.sh", &format!("cat '{}'", fixture_path.display()));
    let app = spawn_app(test_config(&workers), workers).await;

    let (status, body) = app.post("/chart", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 200);
    assert_eq!(body, fixture);
}

#[tokio::test]
async fn chart_parse_failure_differs_from_fetch_failure() {
    let app = spawn_with_workers(&[("chart.sh", "echo 'not json at all'")]).await;
    let (status, parse_body) = app.post("/chart", json!({"ticker": "ABC"})).await;
    assert_eq!(status, 500);
    assert_eq!(parse_body["error"], "Failed to parse chart data");
    assert!(!parse_body["details"].as_str().unwrap().is_empty());

    let app = spawn_with_workers(&[("chart.sh", "echo 'no data' 1>&2\nexit 1")]).await;
    let (status, fetch_body) = app.post("/chart", json!({"ticker": "ABC"})).await;
    assert_eq!(status, 500);
    assert_eq!(fetch_body["error"], "Failed to fetch chart data");
    assert_eq!(fetch_body["details"], "no data\n");
}

#[tokio::test]
async fn hard_fail_route_times_out_with_gateway_timeout() {
    let workers = WorkerDir::new();
    workers.write("quote.sh", "exec sleep 30");
    let mut config = test_config(&workers);
    config.limits.worker_timeout_secs = 1;
    let app = spawn_app(config, workers).await;

    let (status, body) = app.post("/quote", json!({"ticker": "ABC"})).await;

    assert_eq!(status, 504);
    assert_eq!(body["error"], "Worker timed out");
    assert_eq!(body["details"], "worker did not finish within 1s");
}

#[tokio::test]
async fn health_reports_ok_with_request_id() {
    let app = spawn_with_workers(&[]).await;

    let res = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let request_id = res
        .headers()
        .get("x-request-id")
        .expect("response must carry x-request-id")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(request_id.len(), 36);
    assert_eq!(
        res.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn incoming_request_id_is_preserved() {
    let app = spawn_with_workers(&[]).await;

    let res = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "client-supplied-id")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers().get("x-request-id").unwrap(), "client-supplied-id");
}

#[tokio::test]
async fn static_assets_are_served_as_fallback() {
    let workers = WorkerDir::new();
    let public = workers.file("public");
    std::fs::create_dir(&public).unwrap();
    std::fs::write(public.join("index.html"), "<h1>dashboard</h1>").unwrap();

    let mut config = test_config(&workers);
    config.server.static_dir = Some(public);
    let app = spawn_app(config, workers).await;

    let res = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "<h1>dashboard</h1>");

    let res = app.client.get(app.url("/missing.js")).send().await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let workers = WorkerDir::new();
    workers.write("quote.sh", r#"echo "QUOTE:$1""#);
    let mut config = test_config(&workers);
    config.security.max_body_size = 64;
    let app = spawn_app(config, workers).await;

    let res = app
        .client
        .post(app.url("/quote"))
        .json(&json!({"ticker": "A".repeat(512)}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 413);
}

#[tokio::test]
async fn timed_out_worker_takes_its_children_with_it() {
    let workers = WorkerDir::new();
    let marker = workers.file("survived");
    workers.write(
        "quote.sh",
        &format!("(sleep 2; touch '{}') &\nsleep 30", marker.display()),
    );
    let mut config = test_config(&workers);
    config.limits.worker_timeout_secs = 1;
    let app = spawn_app(config, workers).await;

    let (status, _) = app.post("/quote", json!({"ticker": "ABC"})).await;
    assert_eq!(status, 504);

    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
    assert!(!marker.exists(), "a child of the timed-out worker kept running");
}
