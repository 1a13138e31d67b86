use serde::Deserialize;

/// Transport used to ship spans to the collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    Http,
}

/// `[telemetry]`: optional OTLP export of intake spans.
///
/// ```toml
/// [telemetry]
/// enabled = true
/// endpoint = "http://otel-collector:4317"
/// sample_ratio = 0.2
/// environment = "staging"
/// ```
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// Collector address. gRPC collectors usually listen on 4317, HTTP on 4318.
    pub endpoint: String,
    pub protocol: OtlpProtocol,
    /// Fraction of traces kept. Values outside `0.0..=1.0` saturate.
    pub sample_ratio: f64,
    /// Reported as the `deployment.environment` resource attribute.
    pub environment: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:4317".to_owned(),
            protocol: OtlpProtocol::Grpc,
            sample_ratio: 1.0,
            environment: None,
        }
    }
}
