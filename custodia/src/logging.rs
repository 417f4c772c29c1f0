use std::sync::OnceLock;

use crate::config::{LoggingConfig, LoggingFormat};
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder};
use tracing_appender::{non_blocking::WorkerGuard, rolling::daily};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

// Writer guards must outlive the process, otherwise buffered lines are lost.
static LOGGING_INIT: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

fn new_fmt_layer<S>(
    format: LoggingFormat,
    writer: NonBlocking,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match format {
        LoggingFormat::Full => fmt::layer().with_writer(writer).boxed(),
        LoggingFormat::Compact => {
            fmt::layer().with_writer(writer).compact().boxed()
        }
        LoggingFormat::Pretty => {
            fmt::layer().with_writer(writer).pretty().boxed()
        }
        LoggingFormat::Json => fmt::layer().with_writer(writer).json().boxed(),
    }
}

fn non_blocking<W>(
    config: &LoggingConfig,
    writer: W,
) -> (NonBlocking, WorkerGuard)
where
    W: std::io::Write + Send + 'static,
{
    NonBlockingBuilder::default()
        .buffered_lines_limit(config.buffer_limit)
        .lossy(config.lossy)
        .finish(writer)
}

/// Installs the global subscriber: stdout, optional daily-rolling file and a
/// no-op OpenTelemetry layer that assigns W3C trace ids to spans.
///
/// Only the first call has an effect. `RUST_LOG` wins over `filter`.
pub fn init_tracing(logging_config: &LoggingConfig) -> crate::Result<()> {
    let mut setup_result = Ok(());
    LOGGING_INIT.get_or_init(|| {
        let (console, console_guard) =
            non_blocking(logging_config, std::io::stdout());
        let console_layer = new_fmt_layer(logging_config.format, console);

        let mut guards = vec![console_guard];

        let file_layer = logging_config.file.as_ref().map(|file_config| {
            let appender = daily(&file_config.directory, &file_config.filename);
            let (file_writer, file_guard) =
                non_blocking(logging_config, appender);
            guards.push(file_guard);
            new_fmt_layer(file_config.format, file_writer)
        });

        opentelemetry::global::set_text_map_propagator(
            TraceContextPropagator::new(),
        );

        let otel_provider = opentelemetry_sdk::trace::TracerProvider::builder()
            .with_span_processor(crate::observability::NoopProcessor)
            .build();

        opentelemetry::global::set_tracer_provider(otel_provider.clone());

        let telemetry_layer = tracing_opentelemetry::layer()
            .with_tracer(otel_provider.tracer("custodia"));

        let layered = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(logging_config.filter.as_str())
            }))
            .with(telemetry_layer)
            .with(console_layer)
            .with(file_layer);

        if let Err(e) = layered.try_init() {
            setup_result = Err(anyhow::Error::new(e)
                .context("failed to init tracing")
                .into());
        }
        guards
    });
    setup_result
}
