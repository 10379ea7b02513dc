/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

fn filter_layer() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Install a subscriber that logs to `stderr` and respects the `RUST_LOG` environment
/// variable, defaulting to the "info" level.
///
/// Several drivers stream matrices through `stdout`, so log lines never go there.
pub fn init_subscriber() {
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer())
        .with(fmt_layer)
        .init();
}

/// Create a subscriber for tests.
///
/// The returned guard installs the subscriber for the current thread only, so test
/// threads do not conflict.
pub fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    tracing_subscriber::registry()
        .with(filter_layer())
        .with(fmt_layer)
        .set_default()
}
