#![deny(missing_docs)]
//! This crate provides the standardized initialization process for the binaries in this
//! workspace, so that tracing behaves the same everywhere.

pub mod environment;

pub use environment::Environment;

use tracing_subscriber::EnvFilter;


/// defines the behaviour for instantiation
#[derive(Debug)]
pub struct Entrypoint {
    /// filter used when `RUST_LOG` is not set
    default_filter: &'static str,
}

impl Default for Entrypoint {
    fn default() -> Self {
        Entrypoint {
            default_filter: "info",
        }
    }
}

/// sentinel struct which guarantees that we called [Entrypoint::init]
#[derive(Debug)]
pub struct InitializedEntrypoint(());

impl Entrypoint {
    /// loads `.env` into the process environment, then reads [Environment] from it
    fn environment(&self) -> Environment {
        dotenv::dotenv().ok();
        Environment::new_or_local()
    }

    /// consume self, initialize this binary, and return a proof that it was initialized [InitializedEntrypoint]
    pub fn init(self) -> InitializedEntrypoint {
        let env = self.environment();
        std::panic::set_hook(Box::new(tracing_panic::panic_hook));

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_filter));

        match env {
            Environment::Local => {
                tracing_subscriber::fmt()
                    .with_ansi(true)
                    .with_env_filter(filter)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .init();
            }
            Environment::Production | Environment::Develop => {
                tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_env_filter(filter)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .init();
            }
        }

        tracing::trace!(environment = %env, "entrypoint initialized");

        InitializedEntrypoint(())
    }
}
