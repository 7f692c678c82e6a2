//! Read/write boundary onto the host document's markup.

/// Positional handle for an element within one scan of the document.
///
/// Handles index the filtered tag list (stylesheet links, or opt-in
/// scripts) and stay valid as long as the document keeps the same tag
/// structure; reference rewrites and script substitution both preserve
/// it. Implementations ignore handles that no longer resolve.
pub type ElementId = usize;

/// Load state of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentReadiness {
    /// Initial parse has not completed; markup may still be missing.
    Loading,
    /// The document is fully available for mutation.
    Ready,
}

/// A single markup attribute; `value` is `None` for bare attributes
/// such as the opt-in busting marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written in the markup.
    pub name: String,
    /// Attribute value, unquoted; `None` when written without `=`.
    pub value: Option<String>,
}

impl Attribute {
    /// Case-insensitive name comparison, matching host markup semantics.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One stylesheet link observed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetRef {
    /// Positional handle for the element.
    pub id: ElementId,
    /// Current value of the reference attribute.
    pub href: String,
}

/// One opt-in script observed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    /// Positional handle for the element.
    pub id: ElementId,
    /// Current value of the reference attribute.
    pub src: String,
    /// All attributes of the element, reference included.
    pub attributes: Vec<Attribute>,
}

/// Replacement element constructed for a script substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
    /// New reference the element should load from.
    pub src: String,
    /// Attributes carried over from the replaced element, reference
    /// excluded.
    pub attributes: Vec<Attribute>,
}

/// Markup capability of the host document.
///
/// Stylesheet references are rewritten in place. Scripts are substituted
/// wholesale: the target host environment does not re-execute a live
/// script element when only its reference attribute changes, so hosts
/// backing this trait with a live document must replace the node rather
/// than mutate it. Elements without a valued reference attribute are
/// simply not reported.
pub trait MarkupSurface {
    /// Current load state of the document.
    fn readiness(&self) -> DocumentReadiness;

    /// All stylesheet links carrying a valued reference attribute.
    fn stylesheets(&self) -> Vec<StylesheetRef>;

    /// Rewrite the reference attribute of one stylesheet link in place.
    fn set_stylesheet_href(&mut self, id: ElementId, href: &str);

    /// All scripts flagged with the opt-in busting marker that also carry
    /// a valued reference attribute. Unflagged scripts are never reported
    /// so third-party tags stay untouched.
    fn busted_scripts(&self) -> Vec<ScriptRef>;

    /// Substitute one opt-in script with a freshly constructed element.
    fn replace_script(&mut self, id: ElementId, replacement: ScriptElement);
}
