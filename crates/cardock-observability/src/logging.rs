use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize compact console logging.
///
/// # Configuration
///
/// - **Log Level**: Controlled by `LOG_LEVEL` environment variable (default: "info")
/// - **Filtering**: `RUST_LOG` takes precedence when set; noisy HTTP
///   dependencies are filtered to warn otherwise
/// - **Format**: Compact, with source file and line number
///
/// Safe to call more than once; later calls are no-ops, which lets test
/// binaries share a single initialization path.
pub fn init_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cardock_auth={log_level},hyper=warn,reqwest=warn,tower=warn"
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
