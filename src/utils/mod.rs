pub mod clock;

use std::sync::Once;

pub use clock::{Clock, FixedClock, SystemClock};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "expense_core=info".parse() {
            filter = filter.add_directive(directive);
        }

        // A host application may already have installed a subscriber.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
