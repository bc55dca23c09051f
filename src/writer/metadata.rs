//! Serialization of `metadata.xml`

use crate::error::{Error, Result};
use crate::model::{ColorScale, Metadata, ValueDescriptor};
use crate::version::FileVersion;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::Write as IoWrite;

/// Write a metadata document
///
/// The document always records [`FileVersion::CURRENT`], since the binary
/// entries written alongside it use the current layout. Optional fields
/// are omitted when absent; element order is fixed so identical metadata
/// serializes to identical bytes.
pub fn write_metadata_xml<W: IoWrite>(metadata: &Metadata, writer: W) -> Result<()> {
    let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

    xml_writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::xml_write(format!("Failed to write XML declaration: {}", e)))?;

    start(&mut xml_writer, "metadata")?;

    value_element(
        &mut xml_writer,
        "fileVersion",
        &FileVersion::CURRENT.to_string(),
    )?;
    if let Some(format) = &metadata.source_format {
        value_element(&mut xml_writer, "sourceFormat", format)?;
    }
    value_element(
        &mut xml_writer,
        "modelId",
        &metadata.model_id.hyphenated().to_string(),
    )?;
    value_element(
        &mut xml_writer,
        "triangulationId",
        &metadata.triangulation_id.hyphenated().to_string(),
    )?;
    if let Some(name) = &metadata.name {
        value_element(&mut xml_writer, "name", name)?;
    }
    value_element(
        &mut xml_writer,
        "partCount",
        &metadata.part_count.to_string(),
    )?;

    if !metadata.layers.is_empty() {
        start(&mut xml_writer, "layers")?;
        for layer in &metadata.layers {
            value_element(&mut xml_writer, "layer", layer)?;
        }
        end(&mut xml_writer, "layers")?;
    }

    if !metadata.source_models.is_empty() {
        start(&mut xml_writer, "sourceModels")?;
        for source in &metadata.source_models {
            value_element(&mut xml_writer, "sourceModel", source)?;
        }
        end(&mut xml_writer, "sourceModels")?;
    }

    if !metadata.values.is_empty() {
        start(&mut xml_writer, "values")?;
        for descriptor in &metadata.values {
            write_value_descriptor(&mut xml_writer, descriptor)?;
        }
        end(&mut xml_writer, "values")?;
    }

    end(&mut xml_writer, "metadata")
}

fn write_value_descriptor<W: IoWrite>(
    writer: &mut Writer<W>,
    descriptor: &ValueDescriptor,
) -> Result<()> {
    let mut elem = BytesStart::new("value");
    elem.push_attribute(("type", descriptor.data_type.as_str()));
    elem.push_attribute(("file", descriptor.file_name.as_str()));
    if let Some(unit) = &descriptor.unit {
        elem.push_attribute(("unit", unit.as_str()));
    }

    match &descriptor.color_scale {
        None => writer
            .write_event(Event::Empty(elem))
            .map_err(|e| Error::xml_write(format!("Failed to write value element: {}", e))),
        Some(scale) => {
            writer
                .write_event(Event::Start(elem))
                .map_err(|e| Error::xml_write(format!("Failed to write value element: {}", e)))?;
            write_color_scale(writer, scale)?;
            end(writer, "value")
        }
    }
}

fn write_color_scale<W: IoWrite>(writer: &mut Writer<W>, scale: &ColorScale) -> Result<()> {
    start(writer, "colorScale")?;
    for stop in scale.stops() {
        let value = stop.value.to_string();
        let color = stop.color.to_string();
        let mut elem = BytesStart::new("stop");
        elem.push_attribute(("value", value.as_str()));
        elem.push_attribute(("color", color.as_str()));
        writer
            .write_event(Event::Empty(elem))
            .map_err(|e| Error::xml_write(format!("Failed to write stop element: {}", e)))?;
    }
    end(writer, "colorScale")
}

fn value_element<W: IoWrite>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    let mut elem = BytesStart::new(name);
    elem.push_attribute(("value", value));
    writer
        .write_event(Event::Empty(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write {} element: {}", name, e)))?;
    Ok(())
}

fn start<W: IoWrite>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| Error::xml_write(format!("Failed to write {} element: {}", name, e)))?;
    Ok(())
}

fn end<W: IoWrite>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| Error::xml_write(format!("Failed to close {} element: {}", name, e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, ColorStop};
    use crate::parser::parse_metadata_xml;
    use uuid::Uuid;

    fn sample() -> Metadata {
        let mut metadata = Metadata {
            source_format: Some("step".to_string()),
            model_id: Uuid::new_v4(),
            triangulation_id: Uuid::new_v4(),
            name: Some("<bracket> & \"plate\"".to_string()),
            ..Metadata::default()
        };
        metadata.layers.insert("top".to_string());
        metadata.source_models.push("left.stl".to_string());
        metadata.values.push(
            ValueDescriptor::new("deviation")
                .with_unit("mm")
                .with_color_scale(
                    ColorScale::new(vec![
                        ColorStop::new(-0.125, Color::rgb(0, 0, 255)),
                        ColorStop::new(0.125, Color::rgb(255, 0, 0)),
                    ])
                    .unwrap(),
                ),
        );
        metadata.values.push(ValueDescriptor::new("thickness"));
        metadata
    }

    #[test]
    fn test_metadata_roundtrip() {
        let metadata = sample();
        let mut out = Vec::new();
        write_metadata_xml(&metadata, &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        let doc = parse_metadata_xml(&xml).unwrap();
        assert!(doc.has_model_id);
        assert!(doc.has_triangulation_id);
        assert_eq!(doc.metadata, metadata);
    }

    #[test]
    fn test_output_is_deterministic() {
        let metadata = sample();
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_metadata_xml(&metadata, &mut a).unwrap();
        write_metadata_xml(&metadata, &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_colors_use_argb_hex() {
        let mut out = Vec::new();
        write_metadata_xml(&sample(), &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("color=\"#FF0000FF\""));
        assert!(xml.contains("<fileVersion value=\"3.3.0.0\"/>"));
    }
}
