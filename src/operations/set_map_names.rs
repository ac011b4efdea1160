use tracing::info;

use crate::commands::{
    CommandError, Operation, OperationContext, ParamKind, ParameterComponent, Result,
};
use crate::model::{DataFile, FileKind, GiftiFile};

fn rename_map(file: &mut GiftiFile, index: i64, name: &str) -> Result<()> {
    let count = file.number_of_arrays();
    let array = usize::try_from(index)
        .ok()
        .filter(|index| (1..=count).contains(index))
        .and_then(|index| file.arrays.get_mut(index - 1))
        .ok_or_else(|| {
            CommandError::operation(format!("invalid map index {index}, file has {count} maps"))
        })?;
    array.set_name(name);
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SetMapNamesOp;

impl Operation for SetMapNamesOp {
    fn switch(&self) -> &'static str {
        "-set-map-names"
    }

    fn short_description(&self) -> &'static str {
        "SET THE NAME OF ONE OR MORE MAPS IN A FILE"
    }

    fn parameters(&self) -> ParameterComponent {
        let mut params = ParameterComponent::new();
        params.add_param(
            ParamKind::File(FileKind::Gifti),
            "data-file",
            "the file to set the map names of",
        );
        let map = params.add_repeatable_option("-map", "specify a map to set the name of");
        map.add_param(ParamKind::Int, "index", "the map index to change the name of");
        map.add_param(ParamKind::String, "new-name", "the name to set for the map");
        params
    }

    fn help_text(&self) -> &'static str {
        "Sets the name of one or more maps for metric, label or other GIFTI files.  \
         The -map option must be specified at least once.  The file is modified in place."
    }

    fn execute(
        &self,
        params: &mut ParameterComponent,
        context: &mut OperationContext<'_>,
    ) -> Result<()> {
        let maps = params.repeatable("-map")?;
        if maps.is_empty() {
            return Err(CommandError::operation(
                "the -map option must be specified at least once",
            ));
        }
        let path = params.file("data-file")?.path().to_path_buf();
        let mut file = params.gifti("data-file")?.clone();
        for map in maps {
            let index = map.component.int("index")?;
            rename_map(&mut file, index, map.component.string("new-name")?)?;
        }
        info!(path = %path.display(), "rewriting map names");
        context.provider.write(&path, &DataFile::Gifti(file))?;
        Ok(())
    }
}

/// Single-map form of `-set-map-names`, still accepted for old scripts.
#[derive(Debug, Default, Clone, Copy)]
pub struct SetMapNameOp;

impl Operation for SetMapNameOp {
    fn switch(&self) -> &'static str {
        "-set-map-name"
    }

    fn short_description(&self) -> &'static str {
        "DEPRECATED: use -set-map-names"
    }

    fn parameters(&self) -> ParameterComponent {
        let mut params = ParameterComponent::new();
        params.add_param(
            ParamKind::File(FileKind::Gifti),
            "data-file",
            "the file to set a map name of",
        );
        params.add_param(ParamKind::Int, "index", "the map index to change the name of");
        params.add_param(ParamKind::String, "name", "the name to set for the map");
        params
    }

    fn help_text(&self) -> &'static str {
        "DEPRECATED: this command may be removed in a future release, use -set-map-names.\n\n\
         Sets the name of one map in a metric, label or other GIFTI file.  The file is modified in place."
    }

    fn execute(
        &self,
        params: &mut ParameterComponent,
        context: &mut OperationContext<'_>,
    ) -> Result<()> {
        let path = params.file("data-file")?.path().to_path_buf();
        let mut file = params.gifti("data-file")?.clone();
        let index = params.int("index")?;
        rename_map(&mut file, index, params.string("name")?)?;
        info!(path = %path.display(), index, "rewriting map name");
        context.provider.write(&path, &DataFile::Gifti(file))?;
        Ok(())
    }
}
