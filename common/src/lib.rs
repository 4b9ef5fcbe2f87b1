//! assign-audit Common Library
//!
//! CLIとテストで共有される型と照合ルール

pub mod types;
pub mod error;
pub mod identity;
pub mod reconcile;
pub mod summary;
#[cfg(feature = "excel")]
pub mod export;

pub use types::{CellValue, FailureKind, LookupFailure, LookupOutcome, Recommendation, TaskRecord};
pub use error::{Error, Result};
pub use identity::AccountNameMap;
pub use reconcile::reconcile;
pub use summary::{Aggregator, RunSummary};
