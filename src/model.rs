mod data_array;
mod data_file;
mod error;
mod gifti;
mod kind;
mod metadata;


pub use data_array::{
    ArrayData, CoordinateTransform, DataArray, DataType, Encoding, Endian, INTENT_LABEL,
    INTENT_NONE, INTENT_NORMAL, INTENT_POINTSET, INTENT_SHAPE, INTENT_TIME_SERIES,
    INTENT_TRIANGLE, IndexingOrder,
};
pub use data_file::{DataFile, RawFile};
pub use error::{ModelError, Result};
pub use gifti::GiftiFile;
pub use kind::FileKind;
pub use metadata::{Label, LabelTable, MetaData};
