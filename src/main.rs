use std::collections::HashMap;

use pkg_publish::cli::{self, Toolchain};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics are opt-in through RUST_LOG.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let env: HashMap<String, String> = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect();

    std::process::exit(cli::run(&args, &env, Toolchain::connect));
}
