//! Tracing subscriber setup.

use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for a verbosity level. `RUST_LOG` takes precedence.
pub fn filter_directive(verbose: u8) -> String {
    match std::env::var("RUST_LOG") {
        Ok(filter) if !filter.trim().is_empty() => filter,
        _ => match verbose {
            0 => "warn".to_string(),
            1 => "warn,gql_codegen=info,gql_codegen_cli=info".to_string(),
            2 => "info,gql_codegen=debug,gql_codegen_cli=debug".to_string(),
            _ => "debug,gql_codegen=trace,gql_codegen_cli=trace".to_string(),
        },
    }
}

/// Install a stderr subscriber. Later calls are ignored.
pub fn init(verbose: u8) {
    let directive = filter_directive(verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}
