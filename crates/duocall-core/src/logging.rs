use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing for the embedding shell. Call once before creating a
/// session; later calls are no-ops. Honors `RUST_LOG`, defaulting to debug
/// output for this crate. On Android, stderr reaches logcat for debuggable
/// builds.
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "duocall_core=debug".parse().unwrap()),
            )
            .with_ansi(false)
            .init();
    });
}
