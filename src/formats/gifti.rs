use std::fmt::Display;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use ndarray::ArrayD;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rayon::prelude::*;
use roxmltree::{Document, Node, ParsingOptions};

use crate::model::{
    ArrayData, CoordinateTransform, DataArray, DataType, Encoding, Endian, GiftiFile,
    INTENT_NONE, IndexingOrder, Label, LabelTable, MetaData,
};

use super::{FormatError, Result};

const GIFTI_DOCTYPE: &str = r#"GIFTI SYSTEM "http://www.nitrc.org/frs/download.php/115/gifti.dtd""#;
const INDENT: usize = 3;

trait Scalar: Copy + Display + FromStr + Send + Sync {
    const SIZE: usize;
    fn from_bytes(bytes: &[u8], endian: Endian) -> Self;
    fn push_bytes(self, endian: Endian, out: &mut Vec<u8>);
}

impl Scalar for f32 {
    const SIZE: usize = 4;

    fn from_bytes(bytes: &[u8], endian: Endian) -> Self {
        let mut buffer = [0_u8; 4];
        buffer.copy_from_slice(bytes);
        match endian {
            Endian::Little => f32::from_le_bytes(buffer),
            Endian::Big => f32::from_be_bytes(buffer),
        }
    }

    fn push_bytes(self, endian: Endian, out: &mut Vec<u8>) {
        match endian {
            Endian::Little => out.extend_from_slice(&self.to_le_bytes()),
            Endian::Big => out.extend_from_slice(&self.to_be_bytes()),
        }
    }
}

impl Scalar for i32 {
    const SIZE: usize = 4;

    fn from_bytes(bytes: &[u8], endian: Endian) -> Self {
        let mut buffer = [0_u8; 4];
        buffer.copy_from_slice(bytes);
        match endian {
            Endian::Little => i32::from_le_bytes(buffer),
            Endian::Big => i32::from_be_bytes(buffer),
        }
    }

    fn push_bytes(self, endian: Endian, out: &mut Vec<u8>) {
        match endian {
            Endian::Little => out.extend_from_slice(&self.to_le_bytes()),
            Endian::Big => out.extend_from_slice(&self.to_be_bytes()),
        }
    }
}

impl Scalar for u8 {
    const SIZE: usize = 1;

    fn from_bytes(bytes: &[u8], _endian: Endian) -> Self {
        bytes[0]
    }

    fn push_bytes(self, _endian: Endian, out: &mut Vec<u8>) {
        out.push(self);
    }
}

pub(crate) fn read_gifti(path: &Path) -> Result<GiftiFile> {
    let text = fs::read_to_string(path)?;
    parse_gifti(&text)
}

pub(crate) fn write_gifti(path: &Path, file: &GiftiFile) -> Result<()> {
    let text = render_gifti(file)?;
    fs::write(path, text)?;
    Ok(())
}

pub fn parse_gifti(text: &str) -> Result<GiftiFile> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let document = Document::parse_with_options(text, options)?;
    let root = document.root_element();
    if !root.has_tag_name("GIFTI") {
        return Err(FormatError::Malformed(format!(
            "root element is <{}>, expected <GIFTI>",
            root.tag_name().name()
        )));
    }

    let mut file = GiftiFile::new();
    if let Some(version) = root.attribute("Version") {
        file.version = version.to_string();
    }
    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "MetaData" => file.metadata = read_metadata(child),
            "LabelTable" => file.label_table = read_label_table(child)?,
            "DataArray" => file.arrays.push(read_data_array(child)?),
            _ => {}
        }
    }

    if let Some(declared) = root.attribute("NumberOfDataArrays") {
        let declared = parse_number::<usize>("NumberOfDataArrays", declared)?;
        if declared != file.arrays.len() {
            return Err(FormatError::Malformed(format!(
                "NumberOfDataArrays is {declared}, but file contains {} arrays",
                file.arrays.len()
            )));
        }
    }
    Ok(file)
}

fn element_text(node: Node<'_, '_>) -> String {
    node.children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect()
}

fn child_text(node: Node<'_, '_>, tag: &str) -> String {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .map(element_text)
        .unwrap_or_default()
}

fn parse_number<T: FromStr>(what: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| FormatError::Malformed(format!("invalid {what} value '{value}'")))
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| FormatError::Malformed(format!("DataArray is missing attribute {name}")))
}

fn read_metadata(node: Node<'_, '_>) -> MetaData {
    let mut metadata = MetaData::new();
    for entry in node.children().filter(|child| child.has_tag_name("MD")) {
        metadata.set(child_text(entry, "Name"), child_text(entry, "Value"));
    }
    metadata
}

fn read_label_table(node: Node<'_, '_>) -> Result<LabelTable> {
    let mut table = LabelTable::default();
    for label in node.children().filter(|child| child.has_tag_name("Label")) {
        let component = |name: &str, default: f32| -> Result<f32> {
            label
                .attribute(name)
                .map(|value| parse_number::<f32>(name, value))
                .unwrap_or(Ok(default))
        };
        table.labels.push(Label {
            key: parse_number("Key", label.attribute("Key").unwrap_or("0"))?,
            name: element_text(label).trim().to_string(),
            red: component("Red", 0.0)?,
            green: component("Green", 0.0)?,
            blue: component("Blue", 0.0)?,
            alpha: component("Alpha", 1.0)?,
        });
    }
    Ok(table)
}

fn read_transform(node: Node<'_, '_>) -> Result<CoordinateTransform> {
    let values = child_text(node, "MatrixData")
        .split_ascii_whitespace()
        .map(|token| parse_number::<f64>("MatrixData", token))
        .collect::<Result<Vec<_>>>()?;
    let matrix: [f64; 16] = values.try_into().map_err(|values: Vec<f64>| {
        FormatError::Malformed(format!(
            "MatrixData must contain 16 values, found {}",
            values.len()
        ))
    })?;
    Ok(CoordinateTransform {
        data_space: child_text(node, "DataSpace").trim().to_string(),
        transformed_space: child_text(node, "TransformedSpace").trim().to_string(),
        matrix,
    })
}

fn read_data_array(node: Node<'_, '_>) -> Result<DataArray> {
    let intent = node.attribute("Intent").unwrap_or(INTENT_NONE).to_string();
    let data_type = DataType::from_xml_name(required_attribute(node, "DataType")?)?;
    let indexing_order = node
        .attribute("ArrayIndexingOrder")
        .map(IndexingOrder::from_xml_name)
        .transpose()?
        .unwrap_or_default();
    let encoding = Encoding::from_xml_name(required_attribute(node, "Encoding")?)?;
    let endian = node
        .attribute("Endian")
        .map(Endian::from_xml_name)
        .transpose()?
        .unwrap_or_default();
    let dimensionality =
        parse_number::<usize>("Dimensionality", required_attribute(node, "Dimensionality")?)?;
    let dims = (0..dimensionality)
        .map(|axis| {
            let name = format!("Dim{axis}");
            parse_number::<usize>(&name, required_attribute(node, &name)?)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut metadata = MetaData::new();
    let mut transforms = Vec::new();
    let mut data_text = String::new();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "MetaData" => metadata = read_metadata(child),
            "CoordinateSystemTransformMatrix" => transforms.push(read_transform(child)?),
            "Data" => data_text = element_text(child),
            _ => {}
        }
    }

    let data = match data_type {
        DataType::Float32 => ArrayData::Float32(decode_array(
            &data_text,
            encoding,
            endian,
            &dims,
            indexing_order,
        )?),
        DataType::Int32 => ArrayData::Int32(decode_array(
            &data_text,
            encoding,
            endian,
            &dims,
            indexing_order,
        )?),
        DataType::UInt8 => ArrayData::UInt8(decode_array(
            &data_text,
            encoding,
            endian,
            &dims,
            indexing_order,
        )?),
    };

    Ok(DataArray {
        intent,
        data,
        encoding,
        endian,
        indexing_order,
        metadata,
        transforms,
    })
}

fn decode_array<T: Scalar>(
    text: &str,
    encoding: Encoding,
    endian: Endian,
    dims: &[usize],
    order: IndexingOrder,
) -> Result<ArrayD<T>> {
    let values = match encoding {
        Encoding::Ascii => text
            .split_ascii_whitespace()
            .map(|token| parse_number::<T>("data", token))
            .collect::<Result<Vec<_>>>()?,
        Encoding::Base64Binary => from_bytes(&decode_base64(text)?, endian)?,
        Encoding::GZipBase64Binary => {
            let compressed = decode_base64(text)?;
            let mut bytes = Vec::new();
            ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut bytes)?;
            from_bytes(&bytes, endian)?
        }
        Encoding::ExternalFileBinary => {
            return Err(FormatError::Malformed(
                "external binary data files are not supported".to_string(),
            ));
        }
    };
    Ok(ArrayData::from_file_order(dims, order, values)?)
}

fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let compact = text
        .chars()
        .filter(|character| !character.is_ascii_whitespace())
        .collect::<String>();
    Ok(STANDARD.decode(compact)?)
}

fn from_bytes<T: Scalar>(bytes: &[u8], endian: Endian) -> Result<Vec<T>> {
    if bytes.len() % T::SIZE != 0 {
        return Err(FormatError::Malformed(format!(
            "binary data length {} is not a multiple of {}",
            bytes.len(),
            T::SIZE
        )));
    }
    Ok(bytes
        .chunks_exact(T::SIZE)
        .map(|chunk| T::from_bytes(chunk, endian))
        .collect())
}

type XmlWriter = Writer<Vec<u8>>;

/// Serializes a GIFTI document. Data payloads are encoded in parallel, then written in order.
pub fn render_gifti(file: &GiftiFile) -> Result<String> {
    let payloads = file
        .arrays
        .par_iter()
        .map(|array| match &array.data {
            ArrayData::Float32(values) => encode_array(values, array),
            ArrayData::Int32(values) => encode_array(values, array),
            ArrayData::UInt8(values) => encode_array(values, array),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(GIFTI_DOCTYPE)))?;
    let count = file.arrays.len().to_string();
    let root = BytesStart::new("GIFTI").with_attributes([
        ("Version", file.version.as_str()),
        ("NumberOfDataArrays", count.as_str()),
    ]);
    writer.write_event(Event::Start(root))?;
    write_metadata(&mut writer, &file.metadata)?;
    if !file.label_table.is_empty() {
        write_label_table(&mut writer, &file.label_table)?;
    }
    for (array, payload) in file.arrays.iter().zip(&payloads) {
        write_data_array(&mut writer, array, payload)?;
    }
    writer.write_event(Event::End(BytesEnd::new("GIFTI")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|error| FormatError::Malformed(error.to_string()))
}

/// CDATA cannot hold `]]>`, so the text is split across sections around it.
fn write_cdata(writer: &mut XmlWriter, text: &str) -> Result<()> {
    let mut rest = text;
    while let Some(split) = rest.find("]]>") {
        writer.write_event(Event::CData(BytesCData::new(&rest[..split + 2])))?;
        rest = &rest[split + 2..];
    }
    writer.write_event(Event::CData(BytesCData::new(rest)))?;
    Ok(())
}

fn write_cdata_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    write_cdata(writer, text)?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_metadata(writer: &mut XmlWriter, metadata: &MetaData) -> Result<()> {
    if metadata.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("MetaData")))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("MetaData")))?;
    for (name, value) in metadata.iter() {
        writer.write_event(Event::Start(BytesStart::new("MD")))?;
        write_cdata_element(writer, "Name", name)?;
        write_cdata_element(writer, "Value", value)?;
        writer.write_event(Event::End(BytesEnd::new("MD")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("MetaData")))?;
    Ok(())
}

fn write_label_table(writer: &mut XmlWriter, table: &LabelTable) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("LabelTable")))?;
    for label in &table.labels {
        let colors = [label.red, label.green, label.blue, label.alpha];
        let values = [label.key.to_string()]
            .into_iter()
            .chain(colors.map(|value| value.to_string()))
            .collect::<Vec<_>>();
        let element = BytesStart::new("Label").with_attributes(
            ["Key", "Red", "Green", "Blue", "Alpha"]
                .into_iter()
                .zip(values.iter().map(String::as_str)),
        );
        writer.write_event(Event::Start(element))?;
        write_cdata(writer, &label.name)?;
        writer.write_event(Event::End(BytesEnd::new("Label")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("LabelTable")))?;
    Ok(())
}

fn write_data_array(writer: &mut XmlWriter, array: &DataArray, payload: &str) -> Result<()> {
    let dims = array.data.shape();
    let mut attributes = vec![
        ("Intent".to_string(), array.intent.clone()),
        (
            "DataType".to_string(),
            array.data.data_type().xml_name().to_string(),
        ),
        (
            "ArrayIndexingOrder".to_string(),
            array.indexing_order.xml_name().to_string(),
        ),
        ("Dimensionality".to_string(), dims.len().to_string()),
    ];
    attributes.extend(
        dims.iter()
            .enumerate()
            .map(|(axis, size)| (format!("Dim{axis}"), size.to_string())),
    );
    attributes.extend([
        ("Encoding".to_string(), array.encoding.xml_name().to_string()),
        ("Endian".to_string(), array.endian.xml_name().to_string()),
        ("ExternalFileName".to_string(), String::new()),
        ("ExternalFileOffset".to_string(), String::new()),
    ]);
    let element = BytesStart::new("DataArray").with_attributes(
        attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    writer.write_event(Event::Start(element))?;
    write_metadata(writer, &array.metadata)?;
    for transform in &array.transforms {
        write_transform(writer, transform)?;
    }
    writer.write_event(Event::Start(BytesStart::new("Data")))?;
    writer.write_event(Event::Text(BytesText::new(payload)))?;
    writer.write_event(Event::End(BytesEnd::new("Data")))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;
    Ok(())
}

fn write_transform(writer: &mut XmlWriter, transform: &CoordinateTransform) -> Result<()> {
    let matrix = transform
        .matrix
        .chunks(4)
        .map(|row| {
            row.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    writer.write_event(Event::Start(BytesStart::new(
        "CoordinateSystemTransformMatrix",
    )))?;
    write_cdata_element(writer, "DataSpace", &transform.data_space)?;
    write_cdata_element(writer, "TransformedSpace", &transform.transformed_space)?;
    writer.write_event(Event::Start(BytesStart::new("MatrixData")))?;
    writer.write_event(Event::Text(BytesText::new(&matrix)))?;
    writer.write_event(Event::End(BytesEnd::new("MatrixData")))?;
    writer.write_event(Event::End(BytesEnd::new(
        "CoordinateSystemTransformMatrix",
    )))?;
    Ok(())
}

fn encode_array<T: Scalar>(values: &ArrayD<T>, array: &DataArray) -> Result<String> {
    let ordered: Vec<T> = match array.indexing_order {
        IndexingOrder::RowMajor => values.iter().copied().collect(),
        IndexingOrder::ColumnMajor => values.t().iter().copied().collect(),
    };
    match array.encoding {
        Encoding::Ascii => {
            let rows = values.shape().first().copied().unwrap_or(0).max(1);
            let per_row = (ordered.len() / rows).max(1);
            let lines = ordered
                .chunks(per_row)
                .map(|row| {
                    row.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>();
            Ok(lines.join("\n"))
        }
        Encoding::Base64Binary => Ok(STANDARD.encode(to_bytes(&ordered, array.endian))),
        Encoding::GZipBase64Binary => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&to_bytes(&ordered, array.endian))?;
            Ok(STANDARD.encode(encoder.finish()?))
        }
        Encoding::ExternalFileBinary => Err(FormatError::Malformed(
            "external binary data files are not supported".to_string(),
        )),
    }
}

fn to_bytes<T: Scalar>(values: &[T], endian: Endian) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * T::SIZE);
    for value in values {
        value.push_bytes(endian, &mut bytes);
    }
    bytes
}
