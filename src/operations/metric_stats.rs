
use rayon::prelude::*;

use crate::commands::{
    CommandError, Operation, OperationContext, ParamKind, ParameterComponent, Result,
};
use crate::model::{FileKind, GiftiFile};

use super::reduce::{ReduceOperation, percentile};
use super::util::{find_column, to_f64};

#[derive(Debug, Clone, Copy)]
enum Statistic {
    Reduce(ReduceOperation),
    Percentile(f64),
}

impl Statistic {
    fn apply(self, values: &[f64]) -> Result<f64> {
        match self {
            Self::Reduce(operation) => operation.apply(values),
            Self::Percentile(percent) => percentile(values, percent),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MetricStatsOp;

impl Operation for MetricStatsOp {
    fn switch(&self) -> &'static str {
        "-metric-stats"
    }

    fn short_description(&self) -> &'static str {
        "SPECIFIED STATISTICS ON METRIC COLUMNS"
    }

    fn parameters(&self) -> ParameterComponent {
        let mut params = ParameterComponent::new();
        params.add_param(
            ParamKind::File(FileKind::Metric),
            "metric-in",
            "the input metric",
        );
        params
            .add_option("-reduce", "use a reduction operation")
            .add_param(
                ParamKind::Choice(ReduceOperation::NAMES),
                "operation",
                "the reduction operation",
            );
        params
            .add_option("-percentile", "give the value at a percentile")
            .add_param(
                ParamKind::Double,
                "percent",
                "the percentile to find, must be between 0 and 100",
            );
        params
            .add_option("-column", "only display output for one column")
            .add_param(
                ParamKind::String,
                "column",
                "the column number (starting from 1) or name",
            );
        let roi = params.add_option("-roi", "only consider data inside an roi");
        roi.add_param(
            ParamKind::File(FileKind::Metric),
            "roi-metric",
            "the roi, as a metric file",
        );
        roi.add_option(
            "-match",
            "each column of input uses the corresponding column from the roi file",
        );
        params.add_option(
            "-show-map-name",
            "print map index and name before each output",
        );
        params
    }

    fn help_text(&self) -> &'static str {
        "For each column of the input, a line of text is printed, resulting from the specified reduction or percentile operation.  \
         Use -column to only give output for a single column.  \
         Use -roi to consider only the data within a region.  \
         Exactly one of -reduce or -percentile must be specified.\n\n\
         The argument to the -reduce option must be one of the following:\n\n\
         MAX: the maximum value\n\
         MIN: the minimum value\n\
         INDEXMAX: the 1-based index of the maximum value\n\
         INDEXMIN: the 1-based index of the minimum value\n\
         SUM: add all values\n\
         PRODUCT: multiply all values\n\
         MEAN: the mean of the data\n\
         STDEV: the standard deviation (N denominator)\n\
         SAMPSTDEV: the sample standard deviation (N-1 denominator)\n\
         VARIANCE: the variance of the data\n\
         TSNR: mean divided by sample standard deviation\n\
         COV: sample standard deviation divided by mean\n\
         L2NORM: square root of sum of squares\n\
         MEDIAN: the median of the data\n\
         MODE: the mode of the data\n\
         COUNT_NONZERO: the number of nonzero elements in the data\n"
    }

    fn execute(
        &self,
        params: &mut ParameterComponent,
        context: &mut OperationContext<'_>,
    ) -> Result<()> {
        let statistic = match (params.option("-reduce")?, params.option("-percentile")?) {
            (Some(reduce), None) => {
                let name = reduce.string("operation")?;
                ReduceOperation::from_name(name)
                    .map(Statistic::Reduce)
                    .ok_or_else(|| {
                        CommandError::operation(format!("unrecognized operation string '{name}'"))
                    })?
            }
            (None, Some(option)) => {
                let percent = option.double("percent")?;
                if !(0.0..=100.0).contains(&percent) {
                    return Err(CommandError::operation(
                        "percentile must be between 0 and 100",
                    ));
                }
                Statistic::Percentile(percent)
            }
            (Some(_), Some(_)) => {
                return Err(CommandError::operation("you may only specify one operation"));
            }
            (None, None) => return Err(CommandError::operation("you must specify an operation")),
        };

        let handle = params.file("metric-in")?;
        let metric = params.gifti("metric-in")?;
        let columns = match params.option("-column")? {
            Some(column) => vec![find_column(metric, column.string("column")?, handle.path())?],
            None => (0..metric.number_of_arrays()).collect(),
        };
        let roi = match params.option("-roi")? {
            Some(roi) => Some(RoiSelection::new(
                roi.gifti("roi-metric")?,
                roi.has_option("-match")?,
                metric,
            )?),
            None => None,
        };

        let results = columns
            .par_iter()
            .map(|column| {
                let values = metric.column(*column)?;
                let selected = match &roi {
                    Some(roi) => roi.select(&values, *column)?,
                    None => to_f64(&values),
                };
                statistic.apply(&selected)
            })
            .collect::<Result<Vec<_>>>()?;

        let show_names = params.has_option("-show-map-name")?;
        for (column, value) in columns.iter().zip(results) {
            if show_names {
                let name = metric.map_name(*column).unwrap_or_default();
                writeln!(context.out, "{}:\t{name}:\t{value}", column + 1)?;
            } else {
                writeln!(context.out, "{value}")?;
            }
        }
        Ok(())
    }
}

struct RoiSelection<'a> {
    roi: &'a GiftiFile,
    matched: bool,
}

impl<'a> RoiSelection<'a> {
    fn new(roi: &'a GiftiFile, matched: bool, metric: &GiftiFile) -> Result<Self> {
        if roi.number_of_rows() != metric.number_of_rows() {
            return Err(CommandError::operation(
                "roi metric has a different number of vertices than the input",
            ));
        }
        if matched && roi.number_of_arrays() != metric.number_of_arrays() {
            return Err(CommandError::operation(
                "-match specified, but roi has different number of columns than input",
            ));
        }
        Ok(Self { roi, matched })
    }

    fn select(&self, values: &[f32], column: usize) -> Result<Vec<f64>> {
        let mask = self.roi.column(if self.matched { column } else { 0 })?;
        let selected = values
            .iter()
            .zip(&mask)
            .filter(|(_, inside)| **inside > 0.0)
            .map(|(value, _)| f64::from(*value))
            .collect::<Vec<_>>();
        if selected.is_empty() {
            return Err(CommandError::operation("roi column is empty"));
        }
        Ok(selected)
    }
}
