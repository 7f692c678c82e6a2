//! Text-backed document used for static-site rewriting and as the
//! reference implementation of the markup capability.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::host::{
    DocumentReadiness, ElementId, MarkupSurface, ScriptElement, ScriptRef, StylesheetRef,
};

use super::tags::{self, FoundTag};

/// Marker attribute opting a script element into busting.
pub const BUST_ATTRIBUTE: &str = "data-bust";

const STYLESHEET_REL: &str = "stylesheet";

/// An HTML document held as text and mutated with targeted tag rewrites.
///
/// Tags are rediscovered on every access, so element handles are ordinal
/// positions within the filtered tag lists. Documents constructed from
/// text or disk start out [`DocumentReadiness::Ready`]; hosts that stream
/// markup in can start from [`HtmlDocument::loading`] and flip readiness
/// once parsing settles.
#[derive(Debug)]
pub struct HtmlDocument {
    text: String,
    readiness: DocumentReadiness,
}

impl HtmlDocument {
    /// Wrap already-available markup.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            readiness: DocumentReadiness::Ready,
        }
    }

    /// Wrap markup that is still being parsed by the host.
    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            readiness: DocumentReadiness::Loading,
        }
    }

    /// Read a document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::new(text))
    }

    /// Write the current markup back to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.text)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Current markup text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Update the reported load state.
    pub fn set_readiness(&mut self, readiness: DocumentReadiness) {
        self.readiness = readiness;
    }

    fn stylesheet_tags(&self) -> Vec<(FoundTag, String)> {
        tags::link_tags(&self.text)
            .into_iter()
            .filter_map(|tag| {
                let rel = tags::attribute(&tag.attributes, "rel")?.value.clone()?;
                if !rel.eq_ignore_ascii_case(STYLESHEET_REL) {
                    return None;
                }
                let href = tags::attribute(&tag.attributes, "href")?.value.clone()?;
                Some((tag, href))
            })
            .collect()
    }

    fn busted_script_tags(&self) -> Vec<(FoundTag, String)> {
        tags::script_tags(&self.text)
            .into_iter()
            .filter_map(|tag| {
                tags::attribute(&tag.attributes, BUST_ATTRIBUTE)?;
                let src = tags::attribute(&tag.attributes, "src")?.value.clone()?;
                Some((tag, src))
            })
            .collect()
    }
}

impl MarkupSurface for HtmlDocument {
    fn readiness(&self) -> DocumentReadiness {
        self.readiness
    }

    fn stylesheets(&self) -> Vec<StylesheetRef> {
        self.stylesheet_tags()
            .into_iter()
            .enumerate()
            .map(|(id, (_, href))| StylesheetRef { id, href })
            .collect()
    }

    fn set_stylesheet_href(&mut self, id: ElementId, href: &str) {
        let Some((tag, _)) = self.stylesheet_tags().into_iter().nth(id) else {
            return;
        };
        let Some(rebuilt) = tags::replace_attribute_value(&tag.open_tag, "href", href) else {
            return;
        };
        self.text.replace_range(tag.range, &rebuilt);
    }

    fn busted_scripts(&self) -> Vec<ScriptRef> {
        self.busted_script_tags()
            .into_iter()
            .enumerate()
            .map(|(id, (tag, src))| ScriptRef {
                id,
                src,
                attributes: tag.attributes,
            })
            .collect()
    }

    fn replace_script(&mut self, id: ElementId, replacement: ScriptElement) {
        let Some((tag, _)) = self.busted_script_tags().into_iter().nth(id) else {
            return;
        };
        let rendered = tags::render_script_tag(&replacement.src, &replacement.attributes);
        self.text.replace_range(tag.range, &rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Attribute;
    use tempfile::tempdir;

    const PAGE: &str = r#"<html>
  <head>
    <link rel="stylesheet" href="styles/app.css">
    <link rel="icon" href="favicon.ico">
    <link rel="stylesheet" href="styles/print.css?old=1">
  </head>
  <body>
    <script data-bust src="scripts/app.js"></script>
    <script src="https://analytics.example.com/tag.js"></script>
  </body>
</html>
"#;

    #[test]
    fn reports_only_stylesheet_links() {
        let document = HtmlDocument::new(PAGE);
        let stylesheets = document.stylesheets();
        assert_eq!(stylesheets.len(), 2);
        assert_eq!(stylesheets[0].href, "styles/app.css");
        assert_eq!(stylesheets[1].href, "styles/print.css?old=1");
    }

    #[test]
    fn reports_only_marked_scripts() {
        let document = HtmlDocument::new(PAGE);
        let scripts = document.busted_scripts();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].src, "scripts/app.js");
    }

    #[test]
    fn rewrites_a_stylesheet_reference_in_place() {
        let mut document = HtmlDocument::new(PAGE);
        document.set_stylesheet_href(1, "styles/print.css?v=9");
        assert!(document
            .text()
            .contains(r#"<link rel="stylesheet" href="styles/print.css?v=9">"#));
        // The icon link between the two stylesheets is untouched.
        assert!(document.text().contains(r#"href="favicon.ico""#));
    }

    #[test]
    fn substitutes_a_script_element_wholesale() {
        let mut document = HtmlDocument::new(PAGE);
        document.replace_script(
            0,
            ScriptElement {
                src: "scripts/app.js?v=9".to_string(),
                attributes: vec![Attribute {
                    name: "data-bust".to_string(),
                    value: None,
                }],
            },
        );
        assert!(document
            .text()
            .contains(r#"<script src="scripts/app.js?v=9" data-bust></script>"#));
        assert!(!document.text().contains(r#"<script data-bust src="scripts/app.js">"#));
        // The unmarked analytics tag survives verbatim.
        assert!(document
            .text()
            .contains(r#"<script src="https://analytics.example.com/tag.js"></script>"#));
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut document = HtmlDocument::new(PAGE);
        let before = document.text().to_string();
        document.set_stylesheet_href(7, "nowhere.css");
        document.replace_script(
            7,
            ScriptElement {
                src: "nowhere.js".to_string(),
                attributes: Vec::new(),
            },
        );
        assert_eq!(document.text(), before);
    }

    #[test]
    fn links_without_href_are_not_reported() {
        let document = HtmlDocument::new(r#"<link rel="stylesheet">"#);
        assert!(document.stylesheets().is_empty());
    }

    #[test]
    fn readiness_tracks_construction_and_updates() {
        let mut document = HtmlDocument::loading("");
        assert_eq!(document.readiness(), DocumentReadiness::Loading);
        document.set_readiness(DocumentReadiness::Ready);
        assert_eq!(document.readiness(), DocumentReadiness::Ready);
    }

    #[test]
    fn round_trips_through_the_filesystem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, PAGE).unwrap();

        let mut document = HtmlDocument::load(&path).unwrap();
        document.set_stylesheet_href(0, "styles/app.css?v=5");
        document.save(&path).unwrap();

        let reloaded = fs::read_to_string(&path).unwrap();
        assert!(reloaded.contains("styles/app.css?v=5"));
    }

    #[test]
    fn load_reports_the_missing_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.html");
        let error = HtmlDocument::load(&path).unwrap_err();
        assert!(format!("{error:#}").contains("absent.html"));
    }
}
