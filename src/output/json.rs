//! JSON output

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use crate::tree::StructureMap;

const INDENT: &[u8] = b"    ";

/// Encode the structure as pretty-printed JSON with four-space indentation.
pub fn encode(structure: &StructureMap) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    structure.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}
