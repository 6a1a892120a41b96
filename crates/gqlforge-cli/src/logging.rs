//! Subscriber setup for the command line

use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used for a verbosity count when `RUST_LOG` is not set
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,gqlforge=info,gqlforge_codegen=info",
        2 => "info,gqlforge=debug,gqlforge_codegen=debug",
        _ => "debug,gqlforge=trace,gqlforge_codegen=trace",
    }
}

/// Install a stderr subscriber; `RUST_LOG` wins over `-v`
pub fn init_tracing(verbose: u8) {
    let base_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(verbose).to_string());
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}
