use ndarray::{Array1, ArrayD, IxDyn, ShapeBuilder};

use super::{MetaData, ModelError, Result};

pub const INTENT_NONE: &str = "NIFTI_INTENT_NONE";
pub const INTENT_POINTSET: &str = "NIFTI_INTENT_POINTSET";
pub const INTENT_TRIANGLE: &str = "NIFTI_INTENT_TRIANGLE";
pub const INTENT_LABEL: &str = "NIFTI_INTENT_LABEL";
pub const INTENT_SHAPE: &str = "NIFTI_INTENT_SHAPE";
pub const INTENT_NORMAL: &str = "NIFTI_INTENT_NORMAL";
pub const INTENT_TIME_SERIES: &str = "NIFTI_INTENT_TIME_SERIES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Ascii,
    Base64Binary,
    GZipBase64Binary,
    ExternalFileBinary,
}

impl Encoding {
    pub fn xml_name(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Base64Binary => "Base64Binary",
            Self::GZipBase64Binary => "GZipBase64Binary",
            Self::ExternalFileBinary => "ExternalFileBinary",
        }
    }

    pub fn from_xml_name(name: &str) -> Result<Self> {
        match name {
            "ASCII" => Ok(Self::Ascii),
            "Base64Binary" => Ok(Self::Base64Binary),
            "GZipBase64Binary" => Ok(Self::GZipBase64Binary),
            "ExternalFileBinary" => Ok(Self::ExternalFileBinary),
            other => Err(ModelError::UnknownName {
                what: "GIFTI encoding",
                value: other.to_string(),
            }),
        }
    }

    /// Accepts both the enum spellings used on the command line and the XML attribute values.
    pub fn from_option_name(name: &str) -> Option<Self> {
        match name {
            "ASCII" => Some(Self::Ascii),
            "BASE64_BINARY" | "Base64Binary" => Some(Self::Base64Binary),
            "GZIP_BASE64_BINARY" | "GZipBase64Binary" => Some(Self::GZipBase64Binary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Float32,
    Int32,
    UInt8,
}

impl DataType {
    pub fn xml_name(self) -> &'static str {
        match self {
            Self::Float32 => "NIFTI_TYPE_FLOAT32",
            Self::Int32 => "NIFTI_TYPE_INT32",
            Self::UInt8 => "NIFTI_TYPE_UINT8",
        }
    }

    pub fn from_xml_name(name: &str) -> Result<Self> {
        match name {
            "NIFTI_TYPE_FLOAT32" => Ok(Self::Float32),
            "NIFTI_TYPE_INT32" => Ok(Self::Int32),
            "NIFTI_TYPE_UINT8" => Ok(Self::UInt8),
            other => Err(ModelError::UnknownName {
                what: "GIFTI data type",
                value: other.to_string(),
            }),
        }
    }

    pub fn byte_size(self) -> usize {
        match self {
            Self::Float32 | Self::Int32 => 4,
            Self::UInt8 => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    pub fn xml_name(self) -> &'static str {
        match self {
            Self::Little => "LittleEndian",
            Self::Big => "BigEndian",
        }
    }

    pub fn from_xml_name(name: &str) -> Result<Self> {
        match name {
            "LittleEndian" => Ok(Self::Little),
            "BigEndian" => Ok(Self::Big),
            other => Err(ModelError::UnknownName {
                what: "GIFTI endianness",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexingOrder {
    #[default]
    RowMajor,
    ColumnMajor,
}

impl IndexingOrder {
    pub fn xml_name(self) -> &'static str {
        match self {
            Self::RowMajor => "RowMajorOrder",
            Self::ColumnMajor => "ColumnMajorOrder",
        }
    }

    pub fn from_xml_name(name: &str) -> Result<Self> {
        match name {
            "RowMajorOrder" => Ok(Self::RowMajor),
            "ColumnMajorOrder" => Ok(Self::ColumnMajor),
            other => Err(ModelError::UnknownName {
                what: "GIFTI array indexing order",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Float32(ArrayD<f32>),
    Int32(ArrayD<i32>),
    UInt8(ArrayD<u8>),
}

impl ArrayData {
    /// Builds an array from values stored in `order`, as they appear in a file.
    pub fn from_file_order<T>(
        dims: &[usize],
        order: IndexingOrder,
        values: Vec<T>,
    ) -> Result<ArrayD<T>> {
        let expected = dims
            .iter()
            .try_fold(1_usize, |total, dim| total.checked_mul(*dim))
            .ok_or_else(|| {
                ModelError::InvalidArray(format!("dimensions {dims:?} are too large"))
            })?;
        if expected != values.len() {
            return Err(ModelError::ValueCountMismatch {
                expected,
                found: values.len(),
            });
        }
        let shape = IxDyn(dims);
        let array = match order {
            IndexingOrder::RowMajor => ArrayD::from_shape_vec(shape, values),
            IndexingOrder::ColumnMajor => ArrayD::from_shape_vec(shape.f(), values),
        };
        array.map_err(|error| ModelError::InvalidArray(error.to_string()))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Float32(_) => DataType::Float32,
            Self::Int32(_) => DataType::Int32,
            Self::UInt8(_) => DataType::UInt8,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Float32(array) => array.shape(),
            Self::Int32(array) => array.shape(),
            Self::UInt8(array) => array.shape(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Float32(array) => array.len(),
            Self::Int32(array) => array.len(),
            Self::UInt8(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values as f64 in logical row-major order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Float32(array) => array.iter().map(|value| f64::from(*value)).collect(),
            Self::Int32(array) => array.iter().map(|value| f64::from(*value)).collect(),
            Self::UInt8(array) => array.iter().map(|value| f64::from(*value)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateTransform {
    pub data_space: String,
    pub transformed_space: String,
    pub matrix: [f64; 16],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    pub intent: String,
    pub data: ArrayData,
    pub encoding: Encoding,
    pub endian: Endian,
    pub indexing_order: IndexingOrder,
    pub metadata: MetaData,
    pub transforms: Vec<CoordinateTransform>,
}

impl DataArray {
    pub fn new(intent: impl Into<String>, data: ArrayData) -> Self {
        Self {
            intent: intent.into(),
            data,
            encoding: Encoding::default(),
            endian: Endian::default(),
            indexing_order: IndexingOrder::default(),
            metadata: MetaData::new(),
            transforms: Vec::new(),
        }
    }

    pub fn from_column(values: Vec<f32>) -> Self {
        Self::new(
            INTENT_NONE,
            ArrayData::Float32(Array1::from(values).into_dyn()),
        )
    }

    pub fn name(&self) -> &str {
        self.metadata.get("Name").unwrap_or_default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.set("Name", name);
    }

    pub fn rows(&self) -> usize {
        self.data.shape().first().copied().unwrap_or(0)
    }

    /// A metric column: float data that is either 1-D or has a trailing dimension of 1.
    pub fn column_values(&self) -> Option<Vec<f32>> {
        let ArrayData::Float32(array) = &self.data else {
            return None;
        };
        match array.shape() {
            [_] | [_, 1] => Some(array.iter().copied().collect()),
            _ => None,
        }
    }
}
