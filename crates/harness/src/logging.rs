use tracing_subscriber::EnvFilter;

/// Initializes tracing for the suite binary and test processes.
///
/// `RUST_LOG` wins when set; otherwise verbosity maps -v to info and -vv to
/// debug. Safe to call more than once (later calls are no-ops), which test
/// fixtures rely on.
pub fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn,rly=info",
        1 => "info,rly=debug",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
