use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crate targets whose level follows the quiet flag.
const LOG_TARGETS: [&str; 2] = ["trmnl", "trmnl_core"];

/// Initialize JSON logging on stderr.
///
/// `quiet` keeps only error events from the workspace crates; otherwise info
/// and above are emitted. `RUST_LOG` can still enable other targets.
pub fn init_logging(quiet: bool) {
    let filter = log_directives(quiet)
        .into_iter()
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive.parse().expect("Invalid log directive"))
        });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}

fn log_directives(quiet: bool) -> Vec<String> {
    let level = if quiet { "error" } else { "info" };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect()
}
