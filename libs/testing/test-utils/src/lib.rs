//! Shared test utilities for the catalog crates
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: deterministic test data (always available)
//! - `assertions`: custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "needs docker"]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!     let db = mongo.database(&builder.database_name());
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name, so every test gets its own data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_save_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        Self::new(hash_str(name))
    }

    /// 24 hex characters, shaped like a MongoDB object id.
    pub fn id(&self, suffix: &str) -> String {
        format!("{:016x}{:08x}", self.seed, hash_str(suffix) as u32)
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("producto", "main"), "test-producto-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Database name unique to this seed, within MongoDB's naming rules.
    pub fn database_name(&self) -> String {
        format!("test_{:016x}", self.seed)
    }
}

fn hash_str(value: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Test assertion helpers
pub mod assertions {
    use std::fmt::Debug;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert `low <= value <= high`
    pub fn assert_between<T: PartialOrd + Debug>(value: T, low: T, high: T, context: &str) {
        assert!(
            low <= value && value <= high,
            "{}: expected {:?} within [{:?}, {:?}]",
            context,
            value,
            low,
            high
        );
    }
}
