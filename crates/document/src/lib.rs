//! Segmentation document model for sff-migrate
//!
//! An ordered element tree plus a reader/writer pair for the XML subset
//! segmentation files use, and the source-version lookup the pipeline's
//! caller needs before resolving a migration path.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod element;
pub mod reader;
pub mod writer;

pub use element::Element;
pub use reader::parse_document;
pub use writer::write_document;

use sff_core::{MigrateError, Result, Version};

/// Read the document's declared schema version
///
/// The version always lives at `/segmentation/version`. Fails with `Parse`
/// if the root is not a `segmentation` element or carries no version child.
pub fn source_version(document: &Element) -> Result<Version> {
    if document.tag != "segmentation" {
        return Err(MigrateError::Parse(format!(
            "expected <segmentation> root, found <{}>",
            document.tag
        )));
    }
    let version = document
        .child("version")
        .ok_or_else(|| MigrateError::Parse("document has no /segmentation/version".to_string()))?;
    let text = version.text_str();
    if text.is_empty() {
        return Err(MigrateError::Parse(
            "/segmentation/version is empty".to_string(),
        ));
    }
    Ok(Version::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_version() {
        let doc =
            parse_document("<segmentation><version>0.7.0.dev0</version></segmentation>").unwrap();
        assert_eq!(source_version(&doc).unwrap(), Version::new("0.7.0.dev0"));
    }

    #[test]
    fn test_source_version_wrong_root() {
        let doc = parse_document("<mesh/>").unwrap();
        let err = source_version(&doc).unwrap_err();
        assert!(matches!(err, MigrateError::Parse(msg) if msg.contains("segmentation")));
    }

    #[test]
    fn test_source_version_missing() {
        let doc = parse_document("<segmentation><name>x</name></segmentation>").unwrap();
        assert!(source_version(&doc).is_err());
    }
}
