use serde_json::json;
use std::sync::{Arc, Mutex};
use terrax_core::config::LlmConfig;
use terrax_core::llm::{
    CredentialSource, ProviderKeys, ProviderKind, ProviderRegistry, GROQ_FALLBACK_MODEL,
    GROQ_PRIMARY_MODEL, OPENAI_MODEL,
};
use terrax_core::providers::{WeatherConfig, WeatherProvider};
use terrax_core::{SimulationEngine, SimulationError, SimulationRequest};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Credentials that can change while the engine is running
#[derive(Default)]
struct MutableKeys(Mutex<ProviderKeys>);

impl MutableKeys {
    fn set_groq(&self, key: &str) {
        self.0.lock().unwrap().groq = Some(key.to_string());
    }
}

impl CredentialSource for MutableKeys {
    fn provider_keys(&self) -> ProviderKeys {
        self.0.lock().unwrap().clone()
    }
}

fn amazon() -> SimulationRequest {
    SimulationRequest {
        location: "Amazon".into(),
        lat: -3.1,
        lon: -60.0,
        carbon_change: 20,
        pop_growth: 5,
        econ_shift: -10,
        resource_use: 15,
    }
}

fn llm_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        groq_base_url: format!("{}/groq/v1", server.uri()),
        openai_base_url: format!("{}/openai/v1", server.uri()),
        request_timeout_ms: 5_000,
    }
}

fn weather(endpoint: String, key: Option<&str>) -> WeatherProvider {
    WeatherProvider::new(WeatherConfig {
        api_endpoint: endpoint,
        api_key: key.map(str::to_string),
        timeout_ms: 5_000,
    })
    .unwrap()
}

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
    }))
}

fn engine(
    server: &MockServer,
    credentials: Arc<dyn CredentialSource>,
    weather_key: Option<&str>,
) -> SimulationEngine {
    let registry = ProviderRegistry::new(credentials, llm_config(server));
    SimulationEngine::new(
        Arc::new(registry),
        weather(format!("{}/weather", server.uri()), weather_key),
    )
}

fn groq_keys() -> Arc<dyn CredentialSource> {
    Arc::new(ProviderKeys {
        groq: Some("gsk_integration0001".into()),
        openai: None,
    })
}

#[tokio::test]
async fn amazon_without_weather_key_has_null_baseline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/v1/chat/completions"))
        .and(body_partial_json(json!({"model": GROQ_PRIMARY_MODEL})))
        .respond_with(completion(
            "\n Rainfall drops as deforestation accelerates. STRATEGIC ADVICE: protect canopy. ",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let out = engine(&server, groq_keys(), None)
        .simulate(&amazon())
        .await
        .unwrap();
    assert!(out.baseline.is_none());
    assert!(!out.analysis.is_empty());
    assert!(out.analysis.split_whitespace().count() <= 50);
    assert_eq!(out.analysis, out.analysis.trim());
}

#[tokio::test]
async fn weather_baseline_is_fed_into_prompt_and_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "weather": [{"description": "overcast clouds"}],
            "main": {"temp": 25.5, "humidity": 90}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/groq/v1/chat/completions"))
        .respond_with(completion("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let out = engine(&server, groq_keys(), Some("owm"))
        .simulate(&amazon())
        .await
        .unwrap();
    let baseline = out.baseline.expect("baseline present");
    assert_eq!(baseline.desc, "overcast clouds");
    assert_eq!(baseline.humidity, 90);

    let requests = server.received_requests().await.unwrap();
    let llm_call = requests
        .iter()
        .find(|r| r.url.path().ends_with("/chat/completions"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&llm_call.body).unwrap();
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("REAL-TIME BASELINE for Amazon: Temp 25.5C, overcast clouds"));
}

#[tokio::test]
async fn failing_weather_does_not_fail_simulation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/groq/v1/chat/completions"))
        .respond_with(completion("still fine"))
        .mount(&server)
        .await;

    let out = engine(&server, groq_keys(), Some("owm"))
        .simulate(&amazon())
        .await
        .unwrap();
    assert_eq!(out.analysis, "still fine");
    assert!(out.baseline.is_none());
}

#[tokio::test]
async fn primary_failure_makes_one_fallback_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/v1/chat/completions"))
        .and(body_partial_json(json!({"model": GROQ_PRIMARY_MODEL})))
        .respond_with(ResponseTemplate::new(503).set_body_string("model overloaded"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/groq/v1/chat/completions"))
        .and(body_partial_json(json!({"model": GROQ_FALLBACK_MODEL})))
        .respond_with(completion("smaller model answer"))
        .expect(1)
        .mount(&server)
        .await;

    let out = engine(&server, groq_keys(), None)
        .simulate(&amazon())
        .await
        .unwrap();
    assert_eq!(out.analysis, "smaller model answer");
}

#[tokio::test]
async fn both_calls_failing_is_engine_error_with_truncated_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("E".repeat(1_000)))
        .expect(2)
        .mount(&server)
        .await;

    let err = engine(&server, groq_keys(), None)
        .simulate(&amazon())
        .await
        .unwrap_err();
    match &err {
        SimulationError::Engine(detail) => {
            assert_eq!(detail.chars().count(), 150);
            assert!(detail.contains("status=500"));
        }
        other => panic!("expected engine error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Simulation Engine Error: "));
}

#[tokio::test]
async fn openai_is_used_when_only_its_key_is_valid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(body_partial_json(json!({"model": OPENAI_MODEL})))
        .respond_with(completion("gpt answer"))
        .expect(1)
        .mount(&server)
        .await;

    let keys = Arc::new(ProviderKeys {
        groq: Some("bogus".into()),
        openai: Some("sk-integration0001".into()),
    });
    let engine = engine(&server, keys, None);
    let active = engine.providers().current().await.unwrap();
    assert_eq!(active.kind, ProviderKind::OpenAi);

    let out = engine.simulate(&amazon()).await.unwrap();
    assert_eq!(out.analysis, "gpt answer");
}

#[tokio::test]
async fn no_credentials_is_unavailable_without_any_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("never"))
        .expect(0)
        .mount(&server)
        .await;

    let err = engine(&server, Arc::new(ProviderKeys::default()), None)
        .simulate(&amazon())
        .await
        .unwrap_err();
    assert_eq!(err, SimulationError::Unavailable);
}

#[tokio::test]
async fn keys_added_after_startup_are_picked_up() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/v1/chat/completions"))
        .respond_with(completion("late start"))
        .expect(1)
        .mount(&server)
        .await;

    let keys = Arc::new(MutableKeys::default());
    let engine = engine(&server, keys.clone(), None);
    assert!(!engine.health().await.ai_active);
    assert_eq!(
        engine.simulate(&amazon()).await.unwrap_err(),
        SimulationError::Unavailable
    );

    keys.set_groq("gsk_addedlater0001");
    // health never re-selects on its own
    assert!(!engine.health().await.ai_active);

    let out = engine.simulate(&amazon()).await.unwrap();
    assert_eq!(out.analysis, "late start");

    let health = engine.health().await;
    assert!(health.ai_active);
    assert_eq!(health.engine, GROQ_PRIMARY_MODEL);
    assert!(!health.weather_active);
}
