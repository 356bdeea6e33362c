//! Built-in analyzers.
//!
//! Each analyzer owns one objective and is a black box behind the
//! [`Analyzer`](crate::analyzer::Analyzer) contract: it fetches what it
//! needs through the API client, catches its own data-fetch errors, and
//! returns a result the orchestrator can aggregate.

mod config;
mod health;

use std::sync::Arc;

pub use config::ConfigAnalyzer;
pub use health::HealthAnalyzer;

use crate::analyzer::{Analyzer, AnalyzerRegistry};

/// Registry of the built-in analyzers, in registration order.
pub fn builtin_registry() -> AnalyzerRegistry {
    let analyzers: Vec<Arc<dyn Analyzer>> = vec![
        Arc::new(HealthAnalyzer),
        Arc::new(ConfigAnalyzer),
    ];
    // Objective names are distinct by construction.
    AnalyzerRegistry::new(analyzers).expect("built-in objectives are unique")
}
