use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Gifti,
    Surface,
    Metric,
    Label,
    Volume,
    Cifti,
    Border,
    Foci,
    Annotation,
}

impl FileKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gifti => "GIFTI",
            Self::Surface => "SURFACE",
            Self::Metric => "METRIC",
            Self::Label => "LABEL",
            Self::Volume => "VOLUME",
            Self::Cifti => "CIFTI",
            Self::Border => "BORDER",
            Self::Foci => "FOCI",
            Self::Annotation => "ANNOTATION",
        }
    }

    /// GIFTI-backed kinds are decoded into a document; the rest are carried as raw bytes.
    pub fn is_gifti(self) -> bool {
        matches!(self, Self::Gifti | Self::Surface | Self::Metric | Self::Label)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
