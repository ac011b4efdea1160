use super::{FileKind, GiftiFile};

/// File content that is carried through the engine without being interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub kind: FileKind,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataFile {
    Gifti(GiftiFile),
    Raw(RawFile),
}

impl DataFile {
    pub fn as_gifti(&self) -> Option<&GiftiFile> {
        match self {
            Self::Gifti(file) => Some(file),
            Self::Raw(_) => None,
        }
    }
}

impl From<GiftiFile> for DataFile {
    fn from(file: GiftiFile) -> Self {
        Self::Gifti(file)
    }
}
