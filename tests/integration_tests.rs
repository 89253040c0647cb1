//! Integration tests for the Netlify build and the Functions adapter.

use fezz_netlify::lambda::body;
use fezz_netlify::prelude::*;
use fezz_netlify::runtime::Preset;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ROUTE_RULES: &str = r#"{
    "/rules/headers": { "headers": { "cache-control": "s-maxage=60" } },
    "/rules/cors": {
        "cors": true,
        "headers": {
            "access-control-allow-origin": "*",
            "access-control-allow-methods": "GET",
            "access-control-allow-headers": "*",
            "access-control-max-age": "0"
        }
    },
    "/rules/dynamic": { "cache": false, "isr": false },
    "/rules/redirect": { "redirect": "/base" },
    "/rules/isr/**": { "isr": true },
    "/rules/isr-ttl/**": { "isr": 60 },
    "/rules/swr/**": { "cache": { "swr": true } },
    "/rules/swr-ttl/**": { "cache": { "swr": 60 } },
    "/rules/redirect/obj": { "redirect": { "to": "https://example.com/", "statusCode": 308 } },
    "/rules/redirect/wildcard/**": { "redirect": "https://example.com/**" },
    "/rules/nested/**": { "redirect": "/base", "headers": { "x-test": "test" } },
    "/rules/nested/override": { "redirect": { "to": "/other" } },
    "/rules/_/noncached/cached": { "cache": { "swr": true } },
    "/rules/_/noncached/**": { "cache": false, "isr": false },
    "/rules/_/cached/noncached": { "cache": false, "isr": false },
    "/rules/_/cached/**": { "cache": { "swr": true } },
    "/build/**": { "headers": { "cache-control": "public, max-age=3600, immutable" } }
}"#;

const EXPECTED_REDIRECTS: &str = "\
/rules/nested/override\t/other\t302
/rules/redirect/wildcard/*\thttps://example.com/:splat\t302
/rules/redirect/obj\thttps://example.com/\t301
/rules/nested/*\t/base\t302
/rules/redirect\t/base\t302
/rules/_/cached/noncached\t/.netlify/functions/server 200
/rules/_/noncached/cached\t/.netlify/builders/server 200
/rules/_/cached/*\t/.netlify/builders/server 200
/rules/_/noncached/*\t/.netlify/functions/server 200
/rules/swr-ttl/*\t/.netlify/builders/server 200
/rules/swr/*\t/.netlify/builders/server 200
/rules/isr-ttl/*\t/.netlify/builders/server 200
/rules/isr/*\t/.netlify/builders/server 200
/rules/dynamic\t/.netlify/functions/server 200
/* /.netlify/functions/server 200";

const EXPECTED_HEADERS: &str = "\
/rules/headers
  cache-control: s-maxage=60
/rules/cors
  access-control-allow-origin: *
  access-control-allow-methods: GET
  access-control-allow-headers: *
  access-control-max-age: 0
/rules/nested/*
  x-test: test
/build/*
  cache-control: public, max-age=3600, immutable
";

fn project() -> (tempfile::TempDir, PresetConfig) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("dist")).unwrap();
    let rules: RuleSet = serde_json::from_str(ROUTE_RULES).unwrap();
    let config = PresetConfig::new().root_dir(dir.path()).route_rules(rules);
    (dir, config)
}

#[test]
fn test_build_rule_files() {
    let (dir, config) = project();

    let report = NetlifyBuild::new(config).run().unwrap();
    assert!(report.legacy_options);

    let dist = dir.path().join("dist");
    assert_eq!(
        fs::read_to_string(dist.join("_redirects")).unwrap(),
        EXPECTED_REDIRECTS
    );
    assert_eq!(fs::read_to_string(dist.join("_headers")).unwrap(), EXPECTED_HEADERS);
}

#[test]
fn test_build_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("public")).unwrap();
    let config_path = dir.path().join("netlify.json");
    fs::write(
        &config_path,
        format!(
            r#"{{ "rootDir": {:?}, "publicDir": "public", "routeRules": {} }}"#,
            dir.path().display().to_string(),
            ROUTE_RULES
        ),
    )
    .unwrap();

    let config = PresetConfig::load(&config_path).unwrap();
    NetlifyBuild::new(config).run().unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("public/_redirects")).unwrap(),
        EXPECTED_REDIRECTS
    );
}

#[test]
fn test_build_merges_existing_rule_files() {
    let (dir, config) = project();
    let dist = dir.path().join("dist");
    fs::write(dist.join("_redirects"), "/legacy /new 301").unwrap();
    fs::write(dist.join("_headers"), "/legacy\n  x-legacy: 1").unwrap();

    let report = NetlifyBuild::new(config).run().unwrap();
    assert!(report.skipped.is_empty());

    assert_eq!(
        fs::read_to_string(dist.join("_redirects")).unwrap(),
        format!("{EXPECTED_REDIRECTS}\n/legacy /new 301")
    );
    assert_eq!(
        fs::read_to_string(dist.join("_headers")).unwrap(),
        format!("/legacy\n  x-legacy: 1\n{EXPECTED_HEADERS}")
    );
}

#[test]
fn test_build_respects_existing_fallback() {
    let (dir, config) = project();
    let dist = dir.path().join("dist");
    let redirects = "/old /new 301\n/* /index.html 200\n";
    let headers = "/* \n  x-frame-options: DENY\n";
    fs::write(dist.join("_redirects"), redirects).unwrap();
    fs::write(dist.join("_headers"), headers).unwrap();

    let report = NetlifyBuild::new(config).run().unwrap();
    assert_eq!(report.skipped.len(), 2);

    assert_eq!(fs::read_to_string(dist.join("_redirects")).unwrap(), redirects);
    assert_eq!(fs::read_to_string(dist.join("_headers")).unwrap(), headers);
}

#[test]
fn test_static_build_without_404_page() {
    let (dir, config) = project();
    NetlifyBuild::new(config.preset(Preset::NetlifyStatic)).run().unwrap();

    let redirects = fs::read_to_string(dir.path().join("dist/_redirects")).unwrap();
    assert!(!redirects.contains("/.netlify/"));
    assert!(redirects.starts_with("/rules/nested/override\t/other\t302\n"));
    assert!(redirects.ends_with("/rules/redirect\t/base\t302\n"));
    assert!(!dir.path().join(".netlify/functions-internal/server/server.json").exists());
}

/// Echoes the request it received.
struct EchoFunction {
    loads: Arc<AtomicUsize>,
}

#[async_trait]
impl FezzFunction for EchoFunction {
    async fn on_load(&mut self, _ctx: &FunctionContext) -> Result<(), FezzError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch(
        &self,
        request: FezzRequest,
        ctx: &FunctionContext,
    ) -> Result<FezzResponse, FezzError> {
        match request.path.as_str() {
            "/binary" => Ok(FezzResponse::bytes(vec![0x00, 0xFF], "application/octet-stream")),
            "/fail" => Err(FezzError::with_code(503, "backend unavailable")),
            _ => Ok(FezzResponse::json(&serde_json::json!({
                "method": request.method.to_string(),
                "url": &request.url,
                "headers": &request.headers,
                "query": &request.query,
                "body": request.text(),
                "base64": ctx.body_base64_encoded,
            }))?
            .append_header("set-cookie", "a=1")
            .append_header("set-cookie", "b=2")),
        }
    }

    fn name(&self) -> &str {
        "echo"
    }
}

async fn adapter() -> (LambdaAdapter, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    let function = EchoFunction {
        loads: loads.clone(),
    };
    let adapter = LambdaAdapter::load(Box::new(function), FunctionContext::new("server", ""))
        .await
        .unwrap();
    (adapter, loads)
}

fn echoed(result: &LambdaResult) -> serde_json::Value {
    assert!(!result.is_base64_encoded);
    serde_json::from_str(&result.body).unwrap()
}

#[tokio::test]
async fn test_adapter_loads_once() {
    let (adapter, loads) = adapter().await;
    adapter.invoke(LambdaEvent::new("GET", "/")).await.unwrap();
    adapter.invoke(LambdaEvent::new("GET", "/")).await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_adapter_merges_query() {
    let (adapter, _) = adapter().await;
    let event: LambdaEvent = serde_json::from_str(
        r#"{
            "path": "/search",
            "httpMethod": "GET",
            "headers": { "Accept": "application/json", "X-Forwarded-For": "1.2.3.4" },
            "queryStringParameters": { "x": "1" },
            "multiValueQueryStringParameters": { "x": ["1", "2"] },
            "body": null
        }"#,
    )
    .unwrap();

    let result = adapter.invoke(event).await.unwrap();
    assert_eq!(result.status_code, 200);

    let echoed = echoed(&result);
    assert_eq!(echoed["method"], "GET");
    assert_eq!(echoed["url"], "/search?x=1&x=2");
    assert_eq!(echoed["query"], serde_json::json!({ "x": ["1", "2"] }));
    assert_eq!(echoed["headers"]["accept"], "application/json");
    assert_eq!(echoed["headers"]["x-forwarded-for"], "1.2.3.4");
    assert_eq!(echoed["body"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_adapter_flattens_response_headers() {
    let (adapter, _) = adapter().await;
    let result = adapter.invoke(LambdaEvent::new("GET", "/")).await.unwrap();
    assert_eq!(
        result.headers.get("set-cookie").map(String::as_str),
        Some("a=1,b=2")
    );
    assert_eq!(
        result.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_adapter_defaults_method_to_get() {
    let (adapter, _) = adapter().await;
    let event = LambdaEvent {
        path: "/".to_string(),
        ..LambdaEvent::default()
    };
    let result = adapter.invoke(event).await.unwrap();
    assert_eq!(echoed(&result)["method"], "GET");
}

#[tokio::test]
async fn test_adapter_passes_base64_body_through() {
    let (adapter, _) = adapter().await;
    let event = LambdaEvent::new("POST", "/upload").body("AP8=", true);

    let echoed = echoed(&adapter.invoke(event).await.unwrap());
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["body"], "AP8=");
    assert_eq!(echoed["base64"], true);
}

#[tokio::test]
async fn test_adapter_encodes_binary_body() {
    let (adapter, _) = adapter().await;
    let result = adapter.invoke(LambdaEvent::new("GET", "/binary")).await.unwrap();

    assert!(result.is_base64_encoded);
    assert_eq!(body::decode(&result.body).unwrap(), vec![0x00, 0xFF]);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["isBase64Encoded"], true);
    assert_eq!(json["statusCode"], 200);
}

#[tokio::test]
async fn test_adapter_propagates_function_errors() {
    let (adapter, _) = adapter().await;
    let err = adapter
        .invoke(LambdaEvent::new("GET", "/fail"))
        .await
        .unwrap_err();
    assert_eq!(err.code, 503);
    assert_eq!(err.message, "backend unavailable");
}

#[tokio::test]
async fn test_adapter_is_shareable_across_invocations() {
    let (adapter, loads) = adapter().await;
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let adapter = adapter.clone();
            tokio::spawn(async move {
                adapter
                    .invoke(LambdaEvent::new("GET", "/").query("i", i.to_string()))
                    .await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(echoed(&result)["query"]["i"], i.to_string());
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}
