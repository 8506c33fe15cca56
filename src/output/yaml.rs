//! YAML output

use crate::tree::StructureMap;

/// Encode the structure as a block-style YAML mapping.
pub fn encode(structure: &StructureMap) -> Result<Vec<u8>, serde_yaml::Error> {
    serde_yaml::to_string(structure).map(String::into_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DirectoryEntry;

    #[test]
    fn test_yaml_shape() {
        let mut map = StructureMap::new();
        map.insert("/x", DirectoryEntry::new(["f.txt"], ["y"]));

        let bytes = encode(&map).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_slice(&bytes).unwrap();
        let entry = &value["/x"];
        assert_eq!(entry["files"][0].as_str(), Some("f.txt"));
        assert_eq!(entry["dirs"][0].as_str(), Some("y"));

        let parsed: StructureMap = serde_yaml::from_slice(&bytes).unwrap();
        assert_eq!(parsed, map);
    }
}
