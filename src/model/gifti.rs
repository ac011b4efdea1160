use ndarray::{ArrayView2, Ix2};

use super::{
    ArrayData, DataArray, DataType, Encoding, FileKind, INTENT_POINTSET, INTENT_TRIANGLE,
    LabelTable, MetaData, ModelError, Result,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GiftiFile {
    pub version: String,
    pub metadata: MetaData,
    pub label_table: LabelTable,
    pub arrays: Vec<DataArray>,
}

impl Default for GiftiFile {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            metadata: MetaData::new(),
            label_table: LabelTable::default(),
            arrays: Vec::new(),
        }
    }
}

impl GiftiFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of_arrays(&self) -> usize {
        self.arrays.len()
    }

    pub fn number_of_rows(&self) -> usize {
        self.arrays.first().map(DataArray::rows).unwrap_or(0)
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        for array in &mut self.arrays {
            array.encoding = encoding;
        }
    }

    pub fn map_name(&self, index: usize) -> Option<&str> {
        self.arrays.get(index).map(DataArray::name)
    }

    /// Resolves "the column number or name": an integer is a 1-based index, anything else
    /// is matched against map names.
    pub fn find_column(&self, selector: &str) -> Result<usize> {
        if let Ok(number) = selector.trim().parse::<i64>() {
            return match usize::try_from(number) {
                Ok(number) if number >= 1 && number <= self.arrays.len() => Ok(number - 1),
                _ => Err(ModelError::ColumnNotFound(selector.to_string())),
            };
        }
        self.arrays
            .iter()
            .position(|array| array.name() == selector)
            .ok_or_else(|| ModelError::ColumnNotFound(selector.to_string()))
    }

    pub fn column(&self, index: usize) -> Result<Vec<f32>> {
        self.arrays
            .get(index)
            .and_then(DataArray::column_values)
            .ok_or_else(|| ModelError::ColumnNotFound((index + 1).to_string()))
    }

    pub fn coordinates(&self) -> Result<ArrayView2<'_, f32>> {
        let array = self.array_with_intent(INTENT_POINTSET)?;
        match &array.data {
            ArrayData::Float32(values) => values
                .view()
                .into_dimensionality::<Ix2>()
                .map_err(|error| ModelError::InvalidArray(error.to_string())),
            other => Err(ModelError::InvalidArray(format!(
                "coordinates must be {}, found {}",
                DataType::Float32.xml_name(),
                other.data_type().xml_name()
            ))),
        }
    }

    pub fn triangles(&self) -> Result<ArrayView2<'_, i32>> {
        let array = self.array_with_intent(INTENT_TRIANGLE)?;
        match &array.data {
            ArrayData::Int32(values) => values
                .view()
                .into_dimensionality::<Ix2>()
                .map_err(|error| ModelError::InvalidArray(error.to_string())),
            other => Err(ModelError::InvalidArray(format!(
                "triangles must be {}, found {}",
                DataType::Int32.xml_name(),
                other.data_type().xml_name()
            ))),
        }
    }

    fn array_with_intent(&self, intent: &str) -> Result<&DataArray> {
        self.arrays
            .iter()
            .find(|array| array.intent == intent)
            .ok_or_else(|| ModelError::InvalidArray(format!("no array with intent {intent}")))
    }

    /// Checks the structural requirements of the GIFTI-backed file kinds.
    pub fn validate_kind(&self, kind: FileKind) -> Result<()> {
        let mismatch = |reason: String| ModelError::KindMismatch { kind, reason };
        match kind {
            FileKind::Surface => {
                let coordinates = self
                    .coordinates()
                    .map_err(|error| mismatch(error.to_string()))?;
                let triangles = self
                    .triangles()
                    .map_err(|error| mismatch(error.to_string()))?;
                if coordinates.ncols() != 3 || triangles.ncols() != 3 {
                    return Err(mismatch(
                        "coordinate and triangle arrays must have 3 columns".to_string(),
                    ));
                }
                let vertices = coordinates.nrows();
                if let Some(bad) = triangles
                    .iter()
                    .find(|index| **index < 0 || **index as usize >= vertices)
                {
                    return Err(mismatch(format!(
                        "triangle references vertex {bad}, but surface has {vertices} vertices"
                    )));
                }
                Ok(())
            }
            FileKind::Metric => {
                self.validate_columns(DataType::Float32).map_err(mismatch)?;
                if self.arrays.iter().any(|array| array.column_values().is_none()) {
                    return Err(mismatch("metric arrays must be one-dimensional".to_string()));
                }
                Ok(())
            }
            FileKind::Label => self.validate_columns(DataType::Int32).map_err(mismatch),
            _ => Ok(()),
        }
    }

    fn validate_columns(&self, data_type: DataType) -> std::result::Result<(), String> {
        if self.arrays.is_empty() {
            return Err("file contains no data arrays".to_string());
        }
        let rows = self.number_of_rows();
        for (index, array) in self.arrays.iter().enumerate() {
            if array.data.data_type() != data_type {
                return Err(format!(
                    "array {} has data type {}, expected {}",
                    index + 1,
                    array.data.data_type().xml_name(),
                    data_type.xml_name()
                ));
            }
            if array.rows() != rows {
                return Err(format!(
                    "array {} has {} rows, expected {rows}",
                    index + 1,
                    array.rows()
                ));
            }
        }
        Ok(())
    }
}
