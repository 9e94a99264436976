use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::graph::TypeGraph;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// Read a type graph document from disk.
pub fn load_graph(path: &Path) -> anyhow::Result<TypeGraph> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read type graph {}", path.display()))?;
    from_str_with_path(&source)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("failed to parse type graph {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_path() {
        let src = r#"{
            "Post": { "kind": "interface", "members": [
                { "kind": "property", "name": "title", "signature": { "kind": "primitive", "type": "text" } }
            ]}
        }"#;
        let err = from_str_with_path::<TypeGraph>(src).unwrap_err();
        assert!(err.contains("Post"), "{err}");
        assert!(err.contains("unknown variant `text`"), "{err}");
    }

    #[test]
    fn loads_graph_documents_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, r#"{ "Role": { "kind": "enum", "values": ["A"] } }"#).unwrap();
        let graph = load_graph(&path).unwrap();
        assert!(graph.contains_key("Role"));
        assert!(load_graph(&dir.path().join("missing.json")).is_err());
    }
}
