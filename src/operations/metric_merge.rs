use tracing::debug;

use crate::commands::{
    CommandError, Operation, OperationContext, ParamKind, ParameterComponent, Result,
};
use crate::model::{FileKind, GiftiFile};

use super::util::find_column;

#[derive(Debug, Default, Clone, Copy)]
pub struct MetricMergeOp;

impl Operation for MetricMergeOp {
    fn switch(&self) -> &'static str {
        "-metric-merge"
    }

    fn short_description(&self) -> &'static str {
        "MERGE METRIC FILES INTO A NEW FILE"
    }

    fn parameters(&self) -> ParameterComponent {
        let mut params = ParameterComponent::new();
        params.add_output(
            ParamKind::File(FileKind::Metric),
            "metric-out",
            "the output metric",
        );
        let metric = params.add_repeatable_option("-metric", "specify an input metric");
        metric.add_param(
            ParamKind::File(FileKind::Metric),
            "metric-in",
            "a metric file to use columns from",
        );
        let column = metric.add_repeatable_option("-column", "select a single column to use");
        column.add_param(
            ParamKind::String,
            "column",
            "the column number (starting from 1) or name",
        );
        let up_to = column.add_option("-up-to", "use an inclusive range of columns");
        up_to.add_param(
            ParamKind::String,
            "last-column",
            "the number or name of the last column to include",
        );
        up_to.add_option("-reverse", "use the range in reverse order");
        params
    }

    fn help_text(&self) -> &'static str {
        "Takes one or more metric files and constructs a new metric file by concatenating columns from them.  \
         The input metric files must have the same number of vertices.\n\n\
         Example: wb_command -metric-merge out.func.gii -metric first.func.gii -column 1 -metric second.func.gii\n\n\
         This example would take the first column from first.func.gii, followed by all columns from second.func.gii, \
         and write these columns to out.func.gii."
    }

    fn execute(
        &self,
        params: &mut ParameterComponent,
        _context: &mut OperationContext<'_>,
    ) -> Result<()> {
        let inputs = params.repeatable("-metric")?;
        if inputs.is_empty() {
            return Err(CommandError::operation("no inputs specified"));
        }

        let mut merged = GiftiFile::new();
        let mut vertices = None;
        for input in inputs {
            let handle = input.component.file("metric-in")?;
            let metric = input.component.gifti("metric-in")?;
            let rows = metric.number_of_rows();
            match vertices {
                None => vertices = Some(rows),
                Some(expected) if expected != rows => {
                    return Err(CommandError::operation(format!(
                        "file '{}' has {rows} vertices, expected {expected}",
                        handle.path().display()
                    )));
                }
                Some(_) => {}
            }

            let columns = input.component.repeatable("-column")?;
            if columns.is_empty() {
                merged.arrays.extend(metric.arrays.iter().cloned());
                continue;
            }
            for column in columns {
                let selection = &column.component;
                let first = find_column(metric, selection.string("column")?, handle.path())?;
                let Some(up_to) = selection.option("-up-to")? else {
                    merged.arrays.push(metric.arrays[first].clone());
                    continue;
                };
                let last = find_column(metric, up_to.string("last-column")?, handle.path())?;
                if last < first {
                    return Err(CommandError::operation(format!(
                        "ending column occurs before starting column in file '{}'",
                        handle.path().display()
                    )));
                }
                let range = metric.arrays[first..=last].iter().cloned();
                if up_to.has_option("-reverse")? {
                    merged.arrays.extend(range.rev());
                } else {
                    merged.arrays.extend(range);
                }
            }
        }

        debug!(columns = merged.number_of_arrays(), "merged metric columns");
        params.set_output_file("metric-out", merged)
    }
}
