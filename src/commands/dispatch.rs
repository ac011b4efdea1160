use std::io::Write;

use tracing::{info, warn};

use crate::formats::FileProvider;
use crate::model::DataFile;

use super::{
    CommandError, CommandParser, OperationContext, OperationRegistry, ParameterComponent,
    ParameterValue, Result, TokenCursor,
};

/// Metadata stamped into GIFTI outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub command_line: String,
    pub program: String,
    pub working_directory: String,
}

/// Runs one command: parse, execute, then write every output.
pub struct Dispatcher<'a> {
    registry: &'a OperationRegistry,
    provider: &'a dyn FileProvider,
    provenance: Option<Provenance>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a OperationRegistry, provider: &'a dyn FileProvider) -> Self {
        Self {
            registry,
            provider,
            provenance: None,
        }
    }

    pub fn with_provenance(mut self, provenance: Option<Provenance>) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn execute<I, S>(&self, switch: &str, args: I, out: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let operation = self.registry.resolve(switch)?;
        let mut params = operation.parameters();
        let mut cursor = TokenCursor::new(args);
        CommandParser::new(self.provider).parse(&mut params, &mut cursor)?;

        info!(switch, "executing operation");
        let mut context = OperationContext {
            out: &mut *out,
            provider: self.provider,
        };
        operation
            .execute(&mut params, &mut context)
            .map_err(|error| CommandError::Dispatch {
                switch: switch.to_string(),
                source: Box::new(error),
            })?;

        for name in params.unchecked() {
            warn!(switch, parameter = %name, "parameter was not checked by the operation");
        }
        self.write_outputs(&mut params, out)?;
        info!(switch, "operation finished");
        Ok(())
    }

    fn write_outputs(&self, params: &mut ParameterComponent, out: &mut dyn Write) -> Result<()> {
        if let Some(missing) = params.all_outputs().into_iter().find(|output| !output.is_set()) {
            return Err(CommandError::OutputNotSet(missing.name.clone()));
        }

        let parent = self.parent_provenance(params);
        for output in params.all_outputs_mut() {
            match output.value.as_mut() {
                Some(ParameterValue::File(handle)) => {
                    if let (Some(provenance), Some(DataFile::Gifti(gifti))) =
                        (&self.provenance, handle.loaded_mut())
                    {
                        gifti.metadata.set("Provenance", &provenance.command_line);
                        gifti.metadata.set("ProgramProvenance", &provenance.program);
                        gifti
                            .metadata
                            .set("WorkingDirectory", &provenance.working_directory);
                        if let Some(parent) = &parent {
                            gifti.metadata.set("ParentProvenance", parent);
                        }
                    }
                    info!(path = %handle.path().display(), "writing output");
                    handle.write(self.provider)?;
                }
                Some(value) => {
                    writeln!(
                        out,
                        "Output {} \"{}\" value is {value}",
                        value.kind_name(),
                        output.name
                    )?;
                }
                None => return Err(CommandError::OutputNotSet(output.name.clone())),
            }
        }
        Ok(())
    }

    fn parent_provenance(&self, params: &ParameterComponent) -> Option<String> {
        self.provenance.as_ref()?;
        let parent = params
            .input_files()
            .into_iter()
            .filter_map(|handle| {
                let gifti = handle.loaded()?.as_gifti()?;
                let provenance = gifti.metadata.get("Provenance")?;
                Some(format!("{}:\n{provenance}\n\n", handle.path().display()))
            })
            .collect::<String>();
        (!parent.is_empty()).then_some(parent)
    }
}
