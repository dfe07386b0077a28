//! Resource type tag classification.
//!
//! Resource `type` attributes are versioned tags such as `imswl_xmlv1p1` or
//! `imsqti_xmlv1p2/imscc_xmlv1p3/assessment`. The minor version moves with
//! each revision of the format, so tags are matched against per-family
//! patterns rather than compared verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Content family of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Discussion topic (`imsdt_xmlv1pN`)
    Topic,
    /// Web link (`imswl_xmlv1pN`)
    WebLink,
    /// Assignment extension (`assignment_xmlv1pN`)
    Assignment,
    /// QTI assessment or question bank (`imsqti_xmlv1pN[/imscc_xmlv1pM/...]`)
    Quiz,
    /// Basic LTI link (`imsbasiclti_xmlv1pN`)
    ExternalToolLink,
    /// Plain web content (`webcontent`)
    WebContent,
    /// Learning application resource (`associatedcontent/imscc_xmlv1pN/learning-application-resource`)
    AssociatedContent,
    /// Anything else
    Unknown,
}

// Tags match whole, with only the version digits free: a family prefix
// followed by anything else (`webcontent2`, `imswl_xmlv1p1x`) is Unknown.
static PATTERNS: Lazy<Vec<(Regex, ResourceKind)>> = Lazy::new(|| {
    [
        (r"^imsdt_xmlv1p\d+$", ResourceKind::Topic),
        (r"^imswl_xmlv1p\d+$", ResourceKind::WebLink),
        (r"^assignment_xmlv1p\d+$", ResourceKind::Assignment),
        (
            r"^imsqti_xmlv1p\d+(/imscc_xmlv1p\d+/(assessment|question-bank))?$",
            ResourceKind::Quiz,
        ),
        (r"^imsbasiclti_xmlv1p\d+$", ResourceKind::ExternalToolLink),
        (r"^webcontent$", ResourceKind::WebContent),
        (
            r"^associatedcontent/imscc_xmlv1p\d+/learning-application-resource$",
            ResourceKind::AssociatedContent,
        ),
    ]
    .into_iter()
    .map(|(pattern, kind)| {
        let re = Regex::new(&format!("(?i){}", pattern)).expect("Failed to compile type tag pattern");
        (re, kind)
    })
    .collect()
});

impl ResourceKind {
    /// Classify a resource type tag. Never fails; unrecognised tags are
    /// [`ResourceKind::Unknown`].
    pub fn classify(type_tag: &str) -> Self {
        let tag = type_tag.trim();
        PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(tag))
            .map(|(_, kind)| *kind)
            .unwrap_or(ResourceKind::Unknown)
    }

    /// Whether resources of this kind decode into a typed document.
    #[inline]
    pub fn is_structured(&self) -> bool {
        self.root_element().is_some()
    }

    /// Local name of the root element a document of this kind must have.
    pub fn root_element(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Topic => Some("topic"),
            ResourceKind::WebLink => Some("webLink"),
            ResourceKind::Assignment => Some("assignment"),
            ResourceKind::Quiz => Some("questestinterop"),
            ResourceKind::ExternalToolLink => Some("cartridge_basiclti_link"),
            ResourceKind::WebContent | ResourceKind::AssociatedContent | ResourceKind::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Topic => "topic",
            ResourceKind::WebLink => "weblink",
            ResourceKind::Assignment => "assignment",
            ResourceKind::Quiz => "quiz",
            ResourceKind::ExternalToolLink => "external_tool_link",
            ResourceKind::WebContent => "webcontent",
            ResourceKind::AssociatedContent => "associated_content",
            ResourceKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
