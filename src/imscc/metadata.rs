//! Flattened, display-oriented view of the manifest metadata.

use super::core::ManifestMetadata;
use chrono::NaiveDate;
use serde::Serialize;

/// Course metadata summary.
///
/// Mirrors [`ManifestMetadata`] with keywords joined into one string, the
/// shape front ends print directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataSummary {
    pub title: String,
    pub schema: String,
    pub schema_version: String,
    pub language: String,
    pub description: String,
    pub keyword: String,
    pub date: String,
    pub copyright: bool,
    pub copyright_description: String,
}

impl MetadataSummary {
    /// Contribution date as a calendar date.
    ///
    /// LOM allows either a bare date or a full timestamp; only the date part
    /// is kept. Returns `None` when the field is empty or not a date.
    pub fn contribution_date(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        let day = date.get(..10).unwrap_or(date);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Check if any field is populated.
    pub fn has_data(&self) -> bool {
        !self.title.is_empty()
            || !self.schema.is_empty()
            || !self.schema_version.is_empty()
            || !self.language.is_empty()
            || !self.description.is_empty()
            || !self.keyword.is_empty()
            || !self.date.is_empty()
            || self.copyright
            || !self.copyright_description.is_empty()
    }
}

impl From<&ManifestMetadata> for MetadataSummary {
    fn from(meta: &ManifestMetadata) -> Self {
        Self {
            title: meta.title.clone(),
            schema: meta.schema.clone(),
            schema_version: meta.schema_version.clone(),
            language: meta.language.clone(),
            description: meta.description.clone(),
            keyword: meta.keywords.join(", "),
            date: meta.contribution_date.clone(),
            copyright: meta.copyright,
            copyright_description: meta.copyright_description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_manifest_metadata() {
        let meta = ManifestMetadata {
            title: "Loaded Course".to_string(),
            keywords: vec!["Test".to_string(), "Attempt".to_string()],
            contribution_date: "2014-09-08".to_string(),
            copyright: true,
            ..ManifestMetadata::default()
        };
        let summary = MetadataSummary::from(&meta);
        assert_eq!(summary.keyword, "Test, Attempt");
        assert!(summary.has_data());
        assert_eq!(summary.contribution_date(), NaiveDate::from_ymd_opt(2014, 9, 8));
    }

    #[test]
    fn test_contribution_date_formats() {
        let mut summary = MetadataSummary {
            date: "2021-03-04T10:15:00Z".to_string(),
            ..MetadataSummary::default()
        };
        assert_eq!(summary.contribution_date(), NaiveDate::from_ymd_opt(2021, 3, 4));

        summary.date = "last spring".to_string();
        assert_eq!(summary.contribution_date(), None);

        summary.date.clear();
        assert_eq!(summary.contribution_date(), None);
        assert!(!summary.has_data());
    }
}
