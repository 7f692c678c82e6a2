//! Regex scanning and rewriting of asset tags in raw HTML text.

use std::ops::Range;

use regex::Regex;

use crate::host::Attribute;

/// One tag located in the document text.
pub(crate) struct FoundTag {
    /// Span of the full element, closing tag included for scripts.
    pub range: Range<usize>,
    /// Text of the opening tag only.
    pub open_tag: String,
    /// Attributes parsed from the opening tag.
    pub attributes: Vec<Attribute>,
}

fn link_pattern() -> Regex {
    Regex::new(r"(?i)<link\b[^>]*>").expect("invalid link regex")
}

fn script_pattern() -> Regex {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("invalid script regex")
}

fn attribute_pattern() -> Regex {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_:.-]*)(\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("invalid attribute regex")
}

/// All `<link>` tags in document order.
pub(crate) fn link_tags(text: &str) -> Vec<FoundTag> {
    link_pattern()
        .find_iter(text)
        .map(|found| FoundTag {
            range: found.range(),
            open_tag: found.as_str().to_string(),
            attributes: attributes_of(found.as_str()),
        })
        .collect()
}

/// All `<script>...</script>` elements in document order.
pub(crate) fn script_tags(text: &str) -> Vec<FoundTag> {
    script_pattern()
        .find_iter(text)
        .map(|found| {
            let element = found.as_str();
            let open_end = element.find('>').map_or(element.len(), |index| index + 1);
            let open_tag = element[..open_end].to_string();
            FoundTag {
                range: found.range(),
                attributes: attributes_of(&open_tag),
                open_tag,
            }
        })
        .collect()
}

/// Find an attribute by case-insensitive name.
pub(crate) fn attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|attribute| attribute.is_named(name))
}

/// Rewrite the value of a valued attribute inside an opening tag.
///
/// Returns `None` when the tag has no such attribute, leaving the caller
/// to skip the element.
pub(crate) fn replace_attribute_value(
    open_tag: &str,
    name: &str,
    value: &str,
) -> Option<String> {
    let target = parsed_attributes(open_tag)
        .into_iter()
        .find(|parsed| parsed.attribute.is_named(name) && parsed.attribute.value.is_some())?;

    let mut rebuilt = String::with_capacity(open_tag.len() + value.len());
    rebuilt.push_str(&open_tag[..target.span.start]);
    rebuilt.push_str(&target.attribute.name);
    rebuilt.push('=');
    rebuilt.push_str(&quote(value));
    rebuilt.push_str(&open_tag[target.span.end..]);
    Some(rebuilt)
}

/// Render a replacement script element: new reference first, then the
/// carried-over attributes in their original order.
pub(crate) fn render_script_tag(src: &str, attributes: &[Attribute]) -> String {
    let mut tag = format!("<script src={}", quote(src));
    for attribute in attributes {
        tag.push(' ');
        tag.push_str(&attribute.name);
        if let Some(value) = &attribute.value {
            tag.push('=');
            tag.push_str(&quote(value));
        }
    }
    tag.push_str("></script>");
    tag
}

fn quote(value: &str) -> String {
    if value.contains('"') {
        format!("'{value}'")
    } else {
        format!("\"{value}\"")
    }
}

struct ParsedAttribute {
    attribute: Attribute,
    /// Span of the full `name[=value]` token within the opening tag.
    span: Range<usize>,
}

fn attributes_of(open_tag: &str) -> Vec<Attribute> {
    parsed_attributes(open_tag)
        .into_iter()
        .map(|parsed| parsed.attribute)
        .collect()
}

fn parsed_attributes(open_tag: &str) -> Vec<ParsedAttribute> {
    let region = attribute_region(open_tag);
    let offset = region.start;
    attribute_pattern()
        .captures_iter(&open_tag[region])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().to_string();
            let value = if caps.get(2).is_some() {
                let text = caps
                    .get(3)
                    .or_else(|| caps.get(4))
                    .or_else(|| caps.get(5))
                    .map_or("", |m| m.as_str());
                Some(text.to_string())
            } else {
                None
            };
            Some(ParsedAttribute {
                attribute: Attribute { name, value },
                span: offset + whole.start()..offset + whole.end(),
            })
        })
        .collect()
}

/// Span of an opening tag holding its attributes: past the tag name, up
/// to the final `>` (or `/>`).
fn attribute_region(open_tag: &str) -> Range<usize> {
    let name_end = open_tag
        .char_indices()
        .skip(1)
        .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '-')
        .map_or(open_tag.len(), |(index, _)| index);

    let mut end = open_tag.rfind('>').unwrap_or(open_tag.len());
    if open_tag[..end].ends_with('/') {
        end -= 1;
    }

    name_end.min(end)..end
}
