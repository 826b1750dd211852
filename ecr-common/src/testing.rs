//! Test support for the ECR suites.
//!
//! Integration tests install logging once per binary:
//!
//! ```ignore
//! use ecr_common::testing::init_global_test_logging;
//!
//! #[ctor::ctor]
//! fn setup() {
//!     init_global_test_logging();
//! }
//! ```
//!
//! [`CountingBody`] stands in for a parsed body when a test needs to know
//! whether the resolver looked at it at all.

use crate::body::StructuredBody;
use crate::config::EnvParser;
use crate::logging::LogConfig;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static TEST_LOGGING_INIT: Once = Once::new();

const DEFAULT_TEST_LOG_FILE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../target/test-logs/ecr-tests.jsonl"
);

/// Send resolver events to a JSONL file and to the test writer.
///
/// The level for the ECR crates comes from `ECR_TEST_LOG_LEVEL` (default
/// `debug`), read and validated like `ECR_LOG_LEVEL`. `ECR_TEST_LOG_FILE`
/// moves the JSONL file. Only the first call has an effect.
pub fn init_global_test_logging() {
    TEST_LOGGING_INIT.call_once(|| {
        let mut parser = EnvParser::new();
        let config = LogConfig::new(parser.get_log_level("TEST_LOG_LEVEL", "debug").value);
        let path = parser
            .get_optional_string("TEST_LOG_FILE")
            .value
            .map_or_else(|| PathBuf::from(DEFAULT_TEST_LOG_FILE), PathBuf::from);

        let file_layer = open_log_file(&path).map(|file| {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(Mutex::new(file))
        });
        let filter =
            EnvFilter::try_new(config.directive()).unwrap_or_else(|_| EnvFilter::new("warn"));

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().compact().with_test_writer())
            .try_init()
            .is_ok();

        if installed {
            for err in parser.take_errors() {
                tracing::warn!("{err}");
            }
        }
    });
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    File::create(path).ok()
}

/// A JSON body that counts every lookup made against it.
#[derive(Debug, Default)]
pub struct CountingBody {
    inner: Value,
    lookups: AtomicUsize,
}

impl CountingBody {
    pub fn new(inner: Value) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of `has_field` and `find_field` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl StructuredBody for CountingBody {
    fn has_field(&self, name: &str) -> bool {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.has_field(name)
    }

    fn find_field(&self, name: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_field(name)
    }
}
