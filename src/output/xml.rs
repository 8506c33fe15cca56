//! XML output
//!
//! ```xml
//! <structure>
//!   <directory path="/abs/dir">
//!     <files><file>name</file></files>
//!     <subdirectories><directory>name</directory></subdirectories>
//!   </directory>
//! </structure>
//! ```
//!
//! Names containing characters XML 1.0 cannot represent (most control
//! characters) are left out of the document with a warning.

use std::collections::BTreeSet;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::SerializeError;
use crate::tree::StructureMap;

/// Encode the structure as an XML document.
pub fn encode(structure: &StructureMap) -> Result<Vec<u8>, SerializeError> {
    let mut writer = Writer::new(Vec::new());

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    if structure.is_empty() {
        emit(&mut writer, Event::Empty(BytesStart::new("structure")))?;
        return Ok(writer.into_inner());
    }

    emit(&mut writer, Event::Start(BytesStart::new("structure")))?;
    for (path, entry) in structure {
        if !representable(path) {
            tracing::warn!("Skipping directory {:?} in XML output: not representable", path);
            continue;
        }
        let mut directory = BytesStart::new("directory");
        directory.push_attribute(("path", path.as_str()));
        emit(&mut writer, Event::Start(directory))?;
        write_list(&mut writer, "files", "file", &entry.files)?;
        write_list(&mut writer, "subdirectories", "directory", &entry.dirs)?;
        emit(&mut writer, Event::End(BytesEnd::new("directory")))?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("structure")))?;

    Ok(writer.into_inner())
}

fn write_list(
    writer: &mut Writer<Vec<u8>>,
    list: &str,
    item: &str,
    names: &BTreeSet<String>,
) -> Result<(), SerializeError> {
    let names: Vec<&String> = names
        .iter()
        .filter(|name| {
            let keep = representable(name);
            if !keep {
                tracing::warn!("Skipping {:?} in XML output: not representable", name);
            }
            keep
        })
        .collect();
    if names.is_empty() {
        return emit(writer, Event::Empty(BytesStart::new(list)));
    }

    emit(writer, Event::Start(BytesStart::new(list)))?;
    for name in names {
        emit(writer, Event::Start(BytesStart::new(item)))?;
        emit(writer, Event::Text(BytesText::new(name)))?;
        emit(writer, Event::End(BytesEnd::new(item)))?;
    }
    emit(writer, Event::End(BytesEnd::new(list)))
}

/// Whether every character is allowed by the XML 1.0 `Char` production.
fn representable(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
            || c >= '\u{10000}'
    })
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SerializeError> {
    writer
        .write_event(event)
        .map_err(|e| SerializeError::Xml(e.to_string()))
}
