//! Tracing initialization and subscriber setup.

use super::exporter::file_tracer_provider;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Installs the global subscriber: an [`EnvFilter`] plus an OpenTelemetry layer
/// that writes OTLP JSON to `<data_dir>/jsonland-otlp.json`.
///
/// `RUST_LOG` takes precedence over `config.trace_level`. Tracing is optional:
/// if the data directory cannot be created, or a subscriber is already
/// installed, this returns without doing anything.
///
/// # Example
///
/// ```rust,no_run
/// use jsonland::observability::init_tracing;
/// use jsonland::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_TRACE_LEVEL);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = config.data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", "jsonland"),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = file_tracer_provider(config.trace_path(), resource);
    let tracer = provider.tracer("jsonland");

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(OpenTelemetryLayer::new(tracer))
        .try_init();
}
