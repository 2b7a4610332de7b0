use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the stderr subscriber once; later calls are no-ops. `RUST_LOG`
/// overrides the default `info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
