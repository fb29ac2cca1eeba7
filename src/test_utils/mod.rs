//! Test utilities for gome
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration test target.
//!
//! - [`init_test_logging`]: one-time tracing setup honouring `RUST_LOG`
//! - [`TreeFixture`]: builds small directory trees in a temp dir
//! - [`zip_entry_names`] / [`read_zip_entry`]: read archives back
//!
//! # Example
//!
//! ```rust,no_run
//! use gome::test_utils::{TreeFixture, zip_entry_names};
//!
//! let tree = TreeFixture::new("data")
//!     .unwrap()
//!     .with_file("a.txt", "alpha")
//!     .with_file("sub/b.txt", "beta")
//!     .build()
//!     .unwrap();
//!
//! let dest = tree.scratch_path("data.zip");
//! gome::archive::create_zip(tree.root(), &dest).unwrap();
//! assert_eq!(zip_entry_names(&dest).unwrap().len(), 4);
//! ```

pub mod fixtures;

pub use fixtures::{TreeFixture, read_zip_entry, zip_entry_names};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honoured if present, and logging stays off if it
/// is not.
///
/// ```bash
/// RUST_LOG=archive=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
