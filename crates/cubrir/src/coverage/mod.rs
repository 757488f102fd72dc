//! Coverage identifiers and the execution-trace record.

mod ids;
mod record;

pub use ids::{BranchEdge, BranchId, StmtId};
pub use record::CoverageRecord;
