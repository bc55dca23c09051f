//! Parsing of `metadata.xml`

use crate::error::{Error, Result};
use crate::model::{Color, ColorScale, ColorStop, Metadata, ValueDescriptor};
use crate::version::FileVersion;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use uuid::Uuid;

/// Default buffer capacity for XML parsing
const XML_BUFFER_CAPACITY: usize = 1024;

/// A parsed metadata document
///
/// Identifiers absent from the document are nil in [`Self::metadata`] and
/// flagged here so the archive reader can derive them.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    /// Parsed metadata
    pub metadata: Metadata,
    /// Whether the document records a model identifier
    pub has_model_id: bool,
    /// Whether the document records a triangulation fingerprint
    pub has_triangulation_id: bool,
}

/// Parse a metadata document
///
/// A missing or unparseable `fileVersion` is a version error; every other
/// defect is a format error. Unknown elements are ignored so that newer
/// minor revisions can add fields.
pub fn parse_metadata_xml(xml: &str) -> Result<MetadataDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);
    let mut metadata = Metadata::default();
    let mut saw_root = false;
    let mut file_version: Option<FileVersion> = None;
    let mut has_model_id = false;
    let mut has_triangulation_id = false;
    let mut current_value: Option<ValueDescriptor> = None;
    let mut current_stops: Option<Vec<ColorStop>> = None;

    loop {
        let event_result = reader.read_event_into(&mut buf);
        let is_empty_element = matches!(&event_result, Ok(Event::Empty(_)));

        match event_result {
            Ok(Event::DocType(_)) => {
                return Err(Error::InvalidXml(
                    "DTD declarations are not allowed in metadata documents".to_string(),
                ));
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let name_str = std::str::from_utf8(name.as_ref())
                    .map_err(|e| Error::InvalidXml(e.to_string()))?;

                match name_str {
                    "metadata" => saw_root = true,
                    "fileVersion" => {
                        file_version = Some(value_attribute(e, name_str)?.parse()?);
                    }
                    "sourceFormat" => {
                        metadata.source_format = Some(value_attribute(e, name_str)?);
                    }
                    "modelId" => {
                        metadata.model_id = Uuid::parse_str(&value_attribute(e, name_str)?)?;
                        has_model_id = true;
                    }
                    "triangulationId" => {
                        metadata.triangulation_id =
                            Uuid::parse_str(&value_attribute(e, name_str)?)?;
                        has_triangulation_id = true;
                    }
                    "name" => {
                        let value = value_attribute(e, name_str)?;
                        metadata.name = (!value.is_empty()).then_some(value);
                    }
                    "partCount" => {
                        let value = value_attribute(e, name_str)?;
                        metadata.part_count = value.trim().parse::<usize>().map_err(|_| {
                            Error::parse_error_with_context(
                                "partCount",
                                &value,
                                "non-negative integer",
                            )
                        })?;
                    }
                    "layer" => {
                        let value = value_attribute(e, name_str)?;
                        if value.is_empty() {
                            return Err(Error::InvalidXml("empty layer name".to_string()));
                        }
                        metadata.layers.insert(value);
                    }
                    "sourceModel" => {
                        metadata.source_models.push(value_attribute(e, name_str)?);
                    }
                    "value" => {
                        let descriptor = parse_value_descriptor(e)?;
                        if is_empty_element {
                            metadata.values.push(descriptor);
                        } else {
                            current_value = Some(descriptor);
                        }
                    }
                    "colorScale" => {
                        if current_value.is_none() {
                            return Err(Error::InvalidXml(
                                "<colorScale> outside of a <value> element".to_string(),
                            ));
                        }
                        if is_empty_element {
                            if let Some(value) = current_value.as_mut() {
                                value.color_scale = Some(color_scale(Vec::new())?);
                            }
                        } else {
                            current_stops = Some(Vec::new());
                        }
                    }
                    "stop" => {
                        let stops = current_stops.as_mut().ok_or_else(|| {
                            Error::InvalidXml("<stop> outside of a <colorScale> element".to_string())
                        })?;
                        stops.push(parse_stop(e)?);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let name_str = std::str::from_utf8(name.as_ref())
                    .map_err(|e| Error::InvalidXml(e.to_string()))?;

                match name_str {
                    "colorScale" => {
                        if let (Some(value), Some(stops)) =
                            (current_value.as_mut(), current_stops.take())
                        {
                            value.color_scale = Some(color_scale(stops)?);
                        }
                    }
                    "value" => {
                        if let Some(value) = current_value.take() {
                            metadata.values.push(value);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(Error::InvalidXml(
            "metadata document has no <metadata> root element".to_string(),
        ));
    }
    metadata.file_version = file_version.ok_or_else(|| {
        Error::UnsupportedVersion("metadata document records no file version".to_string())
    })?;

    Ok(MetadataDocument {
        metadata,
        has_model_id,
        has_triangulation_id,
    })
}

/// Collect an element's attributes with entity references resolved
fn parse_attributes(e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::with_capacity(4);
    for attr in e.attributes() {
        let attr = attr?;
        let key =
            std::str::from_utf8(attr.key.as_ref()).map_err(|e| Error::InvalidXml(e.to_string()))?;
        let raw = std::str::from_utf8(&attr.value).map_err(|e| Error::InvalidXml(e.to_string()))?;
        let value = unescape(raw).map_err(|e| Error::XmlAttr(e.to_string()))?;
        attrs.insert(key.to_string(), value.into_owned());
    }
    Ok(attrs)
}

fn value_attribute(e: &BytesStart, element: &str) -> Result<String> {
    parse_attributes(e)?.remove("value").ok_or_else(|| {
        Error::XmlAttr(format!("<{}> is missing the 'value' attribute", element))
    })
}

fn parse_value_descriptor(e: &BytesStart) -> Result<ValueDescriptor> {
    let mut attrs = parse_attributes(e)?;
    let data_type = attrs
        .remove("type")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::XmlAttr("<value> is missing the 'type' attribute".to_string()))?;

    let mut descriptor = ValueDescriptor::new(data_type);
    if let Some(file) = attrs.remove("file") {
        descriptor.file_name = file;
    }
    descriptor.unit = attrs.remove("unit");
    Ok(descriptor)
}

fn color_scale(stops: Vec<ColorStop>) -> Result<ColorScale> {
    ColorScale::new(stops).map_err(|e| Error::InvalidXml(format!("invalid <colorScale>: {}", e)))
}

fn parse_stop(e: &BytesStart) -> Result<ColorStop> {
    let mut attrs = parse_attributes(e)?;
    let value = attrs
        .remove("value")
        .ok_or_else(|| Error::XmlAttr("<stop> is missing the 'value' attribute".to_string()))?;
    let color = attrs
        .remove("color")
        .ok_or_else(|| Error::XmlAttr("<stop> is missing the 'color' attribute".to_string()))?;

    let value = value
        .parse::<f32>()
        .map_err(|_| Error::parse_error_with_context("stop value", &value, "number"))?;
    let color: Color = color.parse()?;
    Ok(ColorStop::new(value, color))
}
