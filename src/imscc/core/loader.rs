//! Manifest location and loading.

use super::archive::Archive;
use super::manifest::Manifest;
use crate::common::{Error, Result};
use tracing::{debug, info};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "imsmanifest.xml";

/// Where the manifest was found inside the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestLocation {
    /// Full entry name of the manifest
    pub entry: String,
    /// Directory holding the manifest; resource hrefs are relative to it
    pub base: String,
}

/// Find the manifest entry.
///
/// Any entry whose name contains `manifest_name` qualifies, which covers
/// cartridges zipped together with their top-level folder. Entries whose
/// final component is exactly `manifest_name` win over looser matches such
/// as backups, then the shallowest path wins.
pub fn locate_manifest<A: Archive + ?Sized>(archive: &A, manifest_name: &str) -> Result<ManifestLocation> {
    let mut matches: Vec<String> = archive
        .entry_names()
        .into_iter()
        .filter(|name| name.contains(manifest_name))
        .collect();

    matches.sort_by_key(|name| {
        let exact = name.rsplit('/').next() == Some(manifest_name);
        (!exact, name.matches('/').count(), name.clone())
    });

    let entry = matches
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("no {} in archive", manifest_name)))?;

    let base = match entry.rsplit_once('/') {
        Some((dir, file)) if file == manifest_name => dir.to_string(),
        _ => String::new(),
    };

    debug!(entry = %entry, base = %base, "located manifest");
    Ok(ManifestLocation { entry, base })
}

/// Locate, read and decode the manifest, keeping items up to `max_depth`
/// levels deep.
///
/// The manifest entry is read exactly once.
pub fn load_manifest<A: Archive + ?Sized>(
    archive: &A,
    manifest_name: &str,
    max_depth: usize,
) -> Result<(Manifest, ManifestLocation)> {
    let location = locate_manifest(archive, manifest_name)?;
    let data = archive.read_entry(&location.entry)?;
    let manifest = Manifest::parse_with_max_depth(&data, max_depth)?;

    info!(
        title = %manifest.metadata.title,
        resources = manifest.resources.len(),
        "loaded cartridge manifest"
    );
    Ok((manifest, location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imscc::core::archive::MemoryArchive;
    use crate::imscc::core::manifest::DEFAULT_MAX_DEPTH;

    #[test]
    fn test_manifest_at_root() {
        let archive = MemoryArchive::new()
            .with_entry("imsmanifest.xml", "<manifest/>")
            .with_entry("course_settings/imsmanifest.xml.bak", "<manifest/>");
        let location = locate_manifest(&archive, MANIFEST_NAME).unwrap();
        assert_eq!(location.entry, "imsmanifest.xml");
        assert_eq!(location.base, "");
    }

    #[test]
    fn test_nested_manifest() {
        let archive = MemoryArchive::new()
            .with_entry("course/imsmanifest.xml", "<manifest/>")
            .with_entry("course/web/a.html", "<p/>");
        let location = locate_manifest(&archive, MANIFEST_NAME).unwrap();
        assert_eq!(location.entry, "course/imsmanifest.xml");
        assert_eq!(location.base, "course");
    }

    #[test]
    fn test_loose_match_is_accepted() {
        let archive = MemoryArchive::new().with_entry("export.imsmanifest.xml", "<manifest identifier='x'/>");
        let (manifest, location) = load_manifest(&archive, MANIFEST_NAME, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(location.base, "");
        assert_eq!(manifest.identifier, "x");
    }

    #[test]
    fn test_missing_manifest() {
        let archive = MemoryArchive::new().with_entry("web/a.html", "<p/>");
        assert!(matches!(
            load_manifest(&archive, MANIFEST_NAME, DEFAULT_MAX_DEPTH),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_manifest() {
        let archive = MemoryArchive::new().with_entry("imsmanifest.xml", "<manifest><oops></manifest>");
        assert!(matches!(
            load_manifest(&archive, MANIFEST_NAME, DEFAULT_MAX_DEPTH),
            Err(Error::MalformedXml(_))
        ));
    }

    #[test]
    fn test_depth_limit_reaches_manifest() {
        let mut xml = String::from("<manifest><organizations><organization><item identifier='root'>");
        for i in 0..20 {
            xml.push_str(&format!("<item identifier='level_{i}'>"));
        }
        xml.push_str(&"</item>".repeat(21));
        xml.push_str("</organization></organizations></manifest>");
        let archive = MemoryArchive::new().with_entry("imsmanifest.xml", xml);

        let (manifest, _) = load_manifest(&archive, MANIFEST_NAME, 3).unwrap();
        let ids: Vec<_> = manifest.organization.walk().iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, vec!["root", "level_0", "level_1", "level_2", "level_3"]);
    }
}
