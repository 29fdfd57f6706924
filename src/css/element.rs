//! `selectors::Element` over the arena DOM.
//!
//! Only static selectors are supported. Pseudo-classes that depend on user
//! interaction and all pseudo-elements fail to parse, which is how the
//! stylesheet parser knows to keep such rules in the residual `<style>`.

use std::fmt;

use html5ever::{LocalName, Namespace};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::ElementSelectorFlags;
use selectors::parser::{Selector, SelectorParseErrorKind};
use selectors::{OpaqueElement, SelectorImpl};

use crate::dom::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// Selector implementation for email documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSelectors;

/// Identifier, class name or attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct IdentStr(pub String);

impl precomputed_hash::PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        self.0
            .bytes()
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32))
    }
}

impl AsRef<str> for IdentStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentStr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IdentStr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl cssparser::ToCss for IdentStr {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

/// Tag name wrapper implementing `ToCss`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssLocalName(pub LocalName);

impl precomputed_hash::PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssLocalName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for CssLocalName {
    fn from(s: String) -> Self {
        Self(LocalName::from(s))
    }
}

impl From<&str> for CssLocalName {
    fn from(s: &str) -> Self {
        Self(LocalName::from(s))
    }
}

impl AsRef<str> for CssLocalName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

/// Namespace wrapper implementing `ToCss`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssNamespace(pub Namespace);

impl precomputed_hash::PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssNamespace {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for CssNamespace {
    fn from(s: String) -> Self {
        Self(Namespace::from(s))
    }
}

impl From<&str> for CssNamespace {
    fn from(s: &str) -> Self {
        Self(Namespace::from(s))
    }
}

impl<'i> selectors::parser::Parser<'i> for EmailSelectors {
    type Impl = EmailSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// No pseudo-elements can be inlined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = EmailSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        match *self {}
    }

    fn valid_after_slotted(&self) -> bool {
        match *self {}
    }
}

/// No non-tree-structural pseudo-classes can be inlined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = EmailSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl SelectorImpl for EmailSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = CssLocalName;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = CssLocalName;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Element handle for selector matching.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub dom: &'a ArenaDom,
    pub id: ArenaNodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }

    fn is_named(&self, tag: &str) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n.as_ref() == tag)
    }

    fn sibling_element(&self, forward: bool) -> Option<Self> {
        let step = |id: ArenaNodeId| {
            self.dom.get(id).map(|n| {
                if forward {
                    n.next_sibling
                } else {
                    n.prev_sibling
                }
            })
        };
        let mut current = step(self.id)?;
        while current.is_some() {
            if self.dom.is_element(current) {
                return Some(Self::new(self.dom, current));
            }
            current = step(current)?;
        }
        None
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.dom.element_name(self.id))
            .finish()
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = EmailSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.dom.get(self.id)?.parent;
        self.dom
            .is_element(parent)
            .then(|| Self::new(self.dom, parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling_element(false)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling_element(true)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.dom
            .children(self.id)
            .find(|&child| self.dom.is_element(child))
            .map(|child| Self::new(self.dom, child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n == &name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.dom
            .element_namespace(self.id)
            .is_some_and(|n| n == &ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.dom.element_name(self.id) == other.dom.element_name(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&IdentStr>,
    ) -> bool {
        self.dom
            .attrs(self.id)
            .iter()
            .filter(|attr| match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            })
            .find(|attr| attr.name.local == local_name.0)
            .is_some_and(|attr| operation.eval_str(&attr.value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        self.is_named("a") && self.dom.get_attr(self.id, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_id(self.id)
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &IdentStr) -> Option<IdentStr> {
        None
    }

    fn is_part(&self, _name: &IdentStr) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.dom
            .children(self.id)
            .all(|child| match self.dom.get(child).map(|n| &n.data) {
                Some(ArenaNodeData::Element { .. }) => false,
                Some(ArenaNodeData::Text(t)) => t.is_empty(),
                _ => true,
            })
    }

    fn is_root(&self) -> bool {
        self.dom
            .get(self.id)
            .and_then(|n| self.dom.get(n.parent))
            .is_some_and(|p| matches!(p.data, ArenaNodeData::Document))
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &IdentStr) -> bool {
        false
    }
}

/// Test one selector against an element.
pub fn matches(selector: &Selector<EmailSelectors>, element: &ElementRef<'_>) -> bool {
    let mut caches = SelectorCaches::default();
    let mut context = MatchingContext::new(
        selectors::matching::MatchingMode::Normal,
        None,
        &mut caches,
        selectors::context::QuirksMode::NoQuirks,
        selectors::matching::NeedsSelectorFlags::No,
        selectors::matching::MatchingForInvalidation::No,
    );
    selectors::matching::matches_selector(selector, 0, None, element, &mut context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn parse_selector(s: &str) -> Option<Selector<EmailSelectors>> {
        let mut input = cssparser::ParserInput::new(s);
        let mut parser = cssparser::Parser::new(&mut input);
        Selector::parse(&EmailSelectors, &mut parser).ok()
    }

    fn first(dom: &ArenaDom, tag: &str) -> ArenaNodeId {
        dom.find_by_tag(tag).expect("element present")
    }

    #[test]
    fn test_tag_and_class() {
        let dom = parse_html(r#"<table class="container stack-on-mobile"></table>"#);
        let table = ElementRef::new(&dom, first(&dom, "table"));

        assert!(matches(&parse_selector("table").unwrap(), &table));
        assert!(matches(&parse_selector(".container").unwrap(), &table));
        assert!(matches(&parse_selector("table.stack-on-mobile").unwrap(), &table));
        assert!(!matches(&parse_selector(".stack-column").unwrap(), &table));
    }

    #[test]
    fn test_descendant_combinators() {
        let dom = parse_html(
            r#"<table class="stack-on-mobile"><tr><td><p>x</p></td></tr></table>"#,
        );
        let td = ElementRef::new(&dom, first(&dom, "td"));
        let p = ElementRef::new(&dom, first(&dom, "p"));

        assert!(matches(&parse_selector(".stack-on-mobile td").unwrap(), &td));
        assert!(matches(&parse_selector("td > p").unwrap(), &p));
        assert!(!matches(&parse_selector("table > p").unwrap(), &p));
    }

    #[test]
    fn test_attribute_and_id() {
        let dom = parse_html(r#"<a id="cta" href="https://example.com">x</a>"#);
        let a = ElementRef::new(&dom, first(&dom, "a"));
        assert!(matches(&parse_selector("#cta").unwrap(), &a));
        assert!(matches(&parse_selector("a[href^=https]").unwrap(), &a));
    }

    #[test]
    fn test_dynamic_pseudo_classes_do_not_parse() {
        assert!(parse_selector(".stack-on-mobile:hover").is_none());
        assert!(parse_selector("a:visited").is_none());
        assert!(parse_selector("p::first-line").is_none());
        assert!(parse_selector("tr:first-child").is_some());
    }
}
