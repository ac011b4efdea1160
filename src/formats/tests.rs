use std::fs;
use std::path::Path;

use ndarray::Array;
use tempfile::tempdir;

use super::{
    FileProvider, FormatError, MemoryFileProvider, parse_gifti, read_data_file, render_gifti,
    write_data_file,
};
use crate::model::{
    ArrayData, DataArray, DataFile, Encoding, Endian, FileKind, GiftiFile, INTENT_POINTSET,
    INTENT_TRIANGLE, IndexingOrder, Label,
};

fn metric(columns: &[(&str, Vec<f32>)]) -> GiftiFile {
    let mut file = GiftiFile::new();
    for (name, values) in columns {
        let mut array = DataArray::from_column(values.clone());
        array.set_name(*name);
        file.arrays.push(array);
    }
    file
}

fn surface() -> GiftiFile {
    let coordinates = Array::from_shape_vec(
        (3, 3),
        vec![0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    )
    .expect("coordinates")
    .into_dyn();
    let triangles = Array::from_shape_vec((1, 3), vec![0_i32, 1, 2])
        .expect("triangles")
        .into_dyn();
    let mut file = GiftiFile::new();
    file.arrays
        .push(DataArray::new(INTENT_POINTSET, ArrayData::Float32(coordinates)));
    file.arrays
        .push(DataArray::new(INTENT_TRIANGLE, ArrayData::Int32(triangles)));
    file
}

fn roundtrip(file: &GiftiFile, path: &Path, kind: FileKind) -> GiftiFile {
    write_data_file(path, &DataFile::Gifti(file.clone())).expect("write gifti");
    match read_data_file(path, kind).expect("read gifti") {
        DataFile::Gifti(restored) => restored,
        DataFile::Raw(_) => panic!("expected GIFTI content"),
    }
}

#[test]
fn metric_survives_every_encoding() {
    let dir = tempdir().expect("tempdir");
    let mut file = metric(&[("thickness", vec![1.5, -2.25, 3.0]), ("curv", vec![0.0, 0.5, -0.5])]);
    for encoding in [
        Encoding::Ascii,
        Encoding::Base64Binary,
        Encoding::GZipBase64Binary,
    ] {
        file.set_encoding(encoding);
        let path = dir.path().join(format!("{}.func.gii", encoding.xml_name()));
        let restored = roundtrip(&file, &path, FileKind::Metric);
        assert_eq!(restored.number_of_arrays(), 2);
        assert_eq!(restored.arrays[0].encoding, encoding);
        assert_eq!(restored.map_name(1), Some("curv"));
        assert_eq!(
            restored.column(0).expect("column"),
            vec![1.5, -2.25, 3.0]
        );
    }
}

#[test]
fn big_endian_column_major_surface_is_read_back() {
    let dir = tempdir().expect("tempdir");
    let mut file = surface();
    for array in &mut file.arrays {
        array.encoding = Encoding::Base64Binary;
        array.endian = Endian::Big;
        array.indexing_order = IndexingOrder::ColumnMajor;
    }
    let restored = roundtrip(&file, &dir.path().join("mesh.surf.gii"), FileKind::Surface);
    let coordinates = restored.coordinates().expect("coordinates");
    assert_eq!(coordinates.row(1).to_vec(), vec![1.0, 0.0, 0.0]);
    let triangles = restored.triangles().expect("triangles");
    assert_eq!(triangles.row(0).to_vec(), vec![0, 1, 2]);
}

#[test]
fn metadata_and_labels_are_preserved() {
    let mut file = metric(&[("a<b>&\"]]>", vec![1.0])]);
    file.metadata.set("AnatomicalStructurePrimary", "CortexLeft");
    file.label_table.labels.push(Label {
        key: 1,
        name: "V1".to_string(),
        red: 1.0,
        green: 0.5,
        blue: 0.0,
        alpha: 1.0,
    });
    let text = render_gifti(&file).expect("render");
    assert!(text.contains("NumberOfDataArrays=\"1\""));
    let restored = parse_gifti(&text).expect("parse");
    assert_eq!(
        restored.metadata.get("AnatomicalStructurePrimary"),
        Some("CortexLeft")
    );
    assert_eq!(restored.map_name(0), Some("a<b>&\"]]>"));
    assert_eq!(restored.label_table.get(1).map(|label| label.name.as_str()), Some("V1"));
}

#[test]
fn rendered_document_has_gifti_prolog() {
    let mut file = metric(&[("thickness", vec![1.0, 2.0])]);
    file.arrays[0].metadata.set("Note", "x]]>y");
    let text = render_gifti(&file).expect("render");
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE GIFTI SYSTEM "));
    assert!(text.contains("<GIFTI Version=\"1.0\" NumberOfDataArrays=\"1\">"));
    assert!(text.contains("<Value><![CDATA[thickness]]></Value>"));
    assert!(text.contains("<Value><![CDATA[x]]]]><![CDATA[>y]]></Value>"));
    assert!(text.trim_end().ends_with("</GIFTI>"));
    let restored = parse_gifti(&text).expect("parse");
    assert_eq!(restored.arrays[0].metadata.get("Note"), Some("x]]>y"));
}

#[test]
fn declared_array_count_must_match() {
    let text = r#"<?xml version="1.0"?>
<GIFTI Version="1.0" NumberOfDataArrays="2">
   <DataArray Intent="NIFTI_INTENT_NONE" DataType="NIFTI_TYPE_FLOAT32" Dimensionality="1" Dim0="2" Encoding="ASCII">
      <Data>1 2</Data>
   </DataArray>
</GIFTI>"#;
    let error = parse_gifti(text).expect_err("count mismatch");
    assert!(matches!(error, FormatError::Malformed(_)));
}

#[test]
fn value_count_must_match_dimensions() {
    let text = r#"<GIFTI NumberOfDataArrays="1">
   <DataArray DataType="NIFTI_TYPE_FLOAT32" Dimensionality="1" Dim0="3" Encoding="ASCII">
      <Data>1 2</Data>
   </DataArray>
</GIFTI>"#;
    assert!(matches!(
        parse_gifti(text),
        Err(FormatError::Model(_))
    ));
}

#[test]
fn oversized_dimensions_are_rejected() {
    let text = r#"<GIFTI NumberOfDataArrays="1">
   <DataArray DataType="NIFTI_TYPE_FLOAT32" Dimensionality="2" Dim0="4294967296" Dim1="4294967296" Encoding="ASCII">
      <Data>1 2</Data>
   </DataArray>
</GIFTI>"#;
    let error = parse_gifti(text).expect_err("overflowing dimensions");
    assert!(error.to_string().contains("too large"));
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let dir = tempdir().expect("tempdir");
    let error = read_data_file(dir.path().join("absent.func.gii"), FileKind::Metric)
        .expect_err("missing file");
    assert!(matches!(error, FormatError::FileNotFound { .. }));
}

#[test]
fn garbage_is_reported_as_format_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.surf.gii");
    fs::write(&path, "not xml at all").expect("write garbage");
    let error = read_data_file(&path, FileKind::Surface).expect_err("garbage");
    assert!(matches!(
        error,
        FormatError::FileFormat {
            kind: FileKind::Surface,
            ..
        }
    ));
}

#[test]
fn metric_file_is_not_a_surface() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.func.gii");
    write_data_file(&path, &DataFile::Gifti(metric(&[("x", vec![1.0])]))).expect("write");
    let error = read_data_file(&path, FileKind::Surface).expect_err("kind mismatch");
    assert!(error.to_string().contains("SURFACE"));
}

#[test]
fn raw_kinds_are_carried_as_bytes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("brain.nii");
    fs::write(&path, [1_u8, 2, 3]).expect("write raw");
    let loaded = read_data_file(&path, FileKind::Volume).expect("read raw");
    let DataFile::Raw(raw) = loaded else {
        panic!("volume should load as raw bytes");
    };
    assert_eq!(raw.kind, FileKind::Volume);
    assert_eq!(raw.bytes, [1, 2, 3]);
}

#[test]
fn memory_provider_records_reads_and_validates_kind() {
    let provider = MemoryFileProvider::new();
    provider.insert("mesh.surf.gii", surface());
    assert!(provider
        .read(Path::new("mesh.surf.gii"), FileKind::Surface)
        .is_ok());
    assert!(provider
        .read(Path::new("mesh.surf.gii"), FileKind::Metric)
        .is_err());
    assert!(matches!(
        provider.read(Path::new("other.surf.gii"), FileKind::Surface),
        Err(FormatError::FileNotFound { .. })
    ));
    assert_eq!(provider.reads().len(), 3);
}
