//! SpeedPlan Gateway - the browser-facing UI Shell
//!
//! Serves a single-page interface and a small JSON API over one shared
//! [`Shell`](speedplan_core::Shell). Every mutating endpoint answers with the
//! full [`ShellView`](speedplan_core::ShellView), so the page only ever
//! renders one value.
//!
//! # Endpoints
//!
//! | method | path | effect |
//! |---|---|---|
//! | GET | `/` | interface |
//! | GET | `/health` | liveness |
//! | GET | `/api/state` | current view |
//! | POST | `/api/analyze` | idle/failed → loading → success/failed |
//! | POST | `/api/reset` | back to idle |
//! | POST | `/api/report` | parse a pasted Lighthouse report |
//! | POST | `/api/report/reset` | clear the comparison panel |
//! | POST | `/api/tab` | switch dashboard tab |
//! | POST | `/api/tasks/:index/toggle` | expand or collapse a task card |

#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod gateway;

pub use config::{GatewayConfig, ProviderSettings};
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayState};

/// Gateway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Install the `tracing` subscriber used by the binaries
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects DEBUG over INFO.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .try_init();
}
