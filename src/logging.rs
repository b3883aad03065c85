//! Tracing setup and per-request logging.
//!
//! Console output is filtered by `RUST_LOG`, falling back to `LOG_LEVEL`
//! (default `info`). Errors and structured JSON logs are also written to
//! daily rolling files under `storage/logs`. When an OTLP collector is
//! configured and reachable, spans are exported through OpenTelemetry.

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR: &str = "storage/logs";

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %matched_path,
        "Incoming request"
    );

    let mut response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status();

    match status.as_u16() {
        400..=499 => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Client error"
            );
        }
        500..=599 => {
            error!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Server error"
            );
        }
        _ => {
            info!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Request completed"
            );
        }
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn otlp_endpoint() -> Option<String> {
    std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .filter(|s| !s.is_empty())
}

fn init_tracer(otlp_endpoint: String) -> Result<Tracer, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(format!(
            "{}={level},studyhub_db={level},tower_http=warn,sqlx=warn,hyper=info,tonic=info",
            env!("CARGO_CRATE_NAME")
        ))
    })
}

pub fn init_tracing() {
    use std::fs;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter());

    // File layers are skipped when the log directory cannot be created.
    let file_logging = match fs::create_dir_all(LOG_DIR) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("⚠️  Cannot create {}: {}. File logging disabled.", LOG_DIR, e);
            false
        }
    };

    let file_layer = file_logging.then(|| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "studyhub.log");
        fmt::layer()
            .with_writer(file_appender)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(EnvFilter::new("error"))
    });

    let json_layer = file_logging.then(|| {
        let json_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "studyhub.json");
        fmt::layer()
            .json()
            .with_writer(json_appender)
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(EnvFilter::new("info"))
    });

    let tracer = match otlp_endpoint().map(init_tracer) {
        Some(Ok(tracer)) => Some(tracer),
        Some(Err(e)) => {
            eprintln!(
                "⚠️  Failed to initialize OpenTelemetry: {}. Continuing without it...",
                e
            );
            None
        }
        None => None,
    };
    let otel_enabled = tracer.is_some();
    let otel_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .with(otel_layer)
        .init();

    if otel_enabled {
        info!("Tracing initialized with OpenTelemetry and file logging");
    } else {
        info!("Tracing initialized without OpenTelemetry");
    }
}

pub async fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer...");
    global::shutdown_tracer_provider();
}
