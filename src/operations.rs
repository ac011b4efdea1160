mod gifti_convert;
mod metric_merge;
mod metric_stats;
mod reduce;
mod set_map_names;
mod surface_information;
mod util;

#[cfg(test)]
mod tests;

use crate::commands::{OperationRegistry, Result};

pub use gifti_convert::GiftiConvertOp;
pub use metric_merge::MetricMergeOp;
pub use metric_stats::MetricStatsOp;
pub use reduce::{ReduceOperation, percentile};
pub use set_map_names::{SetMapNameOp, SetMapNamesOp};
pub use surface_information::{SurfaceInformationOp, SurfaceSummary};

/// Registers every built-in operation, in listing order, then the deprecated ones.
pub fn register_all(registry: &mut OperationRegistry) -> Result<()> {
    registry.register(GiftiConvertOp)?;
    registry.register(MetricMergeOp)?;
    registry.register(MetricStatsOp)?;
    registry.register(SetMapNamesOp)?;
    registry.register(SurfaceInformationOp)?;
    registry.register_deprecated(SetMapNameOp)?;
    Ok(())
}
