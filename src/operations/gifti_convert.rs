use tracing::debug;

use crate::commands::{
    CommandError, Operation, OperationContext, ParamKind, ParameterComponent, Result,
};
use crate::model::{Encoding, FileKind};

const ENCODINGS: &[&str] = &[
    "ASCII",
    "BASE64_BINARY",
    "GZIP_BASE64_BINARY",
    "Base64Binary",
    "GZipBase64Binary",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct GiftiConvertOp;

impl Operation for GiftiConvertOp {
    fn switch(&self) -> &'static str {
        "-gifti-convert"
    }

    fn short_description(&self) -> &'static str {
        "CONVERT A GIFTI FILE TO A DIFFERENT ENCODING"
    }

    fn parameters(&self) -> ParameterComponent {
        let mut params = ParameterComponent::new();
        params.add_param(
            ParamKind::Choice(ENCODINGS),
            "gifti-encoding",
            "what the output encoding should be",
        );
        params.add_param(
            ParamKind::File(FileKind::Gifti),
            "input-gifti-file",
            "the input gifti file",
        );
        params.add_output(
            ParamKind::File(FileKind::Gifti),
            "output-gifti-file",
            "the output gifti file",
        );
        params
    }

    fn help_text(&self) -> &'static str {
        "The value of <gifti-encoding> must be one of the following:\n\n\
         ASCII\nBASE64_BINARY\nGZIP_BASE64_BINARY\n\n\
         Every data array of the input is rewritten with the new encoding; the data values are not changed."
    }

    fn execute(
        &self,
        params: &mut ParameterComponent,
        _context: &mut OperationContext<'_>,
    ) -> Result<()> {
        let name = params.string("gifti-encoding")?;
        let encoding = Encoding::from_option_name(name)
            .ok_or_else(|| CommandError::operation(format!("invalid encoding name: {name}")))?;
        let mut file = params.gifti("input-gifti-file")?.clone();
        debug!(encoding = encoding.xml_name(), arrays = file.number_of_arrays(), "re-encoding");
        file.set_encoding(encoding);
        params.set_output_file("output-gifti-file", file)
    }
}
