//! Observability for schemadoc
//!
//! - Structured logs through `tracing`; every line carries an `event` field
//!   naming an [`Event`]
//! - Operation timing with a slow-operation warning
//!
//! Observability never changes the outcome of the operation it observes.

mod events;
mod timer;

pub use events::Event;
pub use timer::{OperationTimer, DEFAULT_SLOW_OPERATION};

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. Calling this twice keeps
/// the first subscriber.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }
}
