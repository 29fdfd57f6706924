//! Stylesheet parsing for the inliner.
//!
//! Rules whose selectors can be matched statically become [`StyleRule`]s.
//! Everything else (at-rules, dynamic pseudo-classes, pseudo-elements) is
//! kept as source text in [`ResidualRule`]s so it can be written back into
//! a `<style>` element untouched.

use std::cmp::Ordering;

use cssparser::{
    AtRuleParser, BasicParseErrorKind, CowRcStr, DeclarationParser, ParseError, ParseErrorKind,
    Parser, ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser,
};
use selectors::parser::{ParseRelative, Selector, SelectorList};
use thiserror::Error;

use super::element::EmailSelectors;

/// Malformed CSS found while inlining in strict mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid CSS at line {line}, column {column}: {message}")]
pub struct InlineError {
    /// 1-based line within the stylesheet.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    pub message: String,
}

impl InlineError {
    fn from_parse(error: &ParseError<'_, ()>) -> Self {
        let message = match &error.kind {
            ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
                format!("unexpected token {token:?}")
            }
            ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
                "unexpected end of input".to_string()
            }
            ParseErrorKind::Basic(other) => format!("{other:?}"),
            ParseErrorKind::Custom(()) => "missing declaration value".to_string(),
        };
        Self {
            line: error.location.line + 1,
            column: error.location.column,
            message,
        }
    }
}

/// A `property: value` pair with the value kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// A rule that can be inlined.
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub selectors: Vec<Selector<EmailSelectors>>,
    pub declarations: Vec<Declaration>,
}

/// What a residual rule is, for the preserve options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidualKind {
    MediaQuery,
    FontFace,
    /// A qualified rule whose selector needs user interaction or a pseudo-element.
    Dynamic,
    OtherAtRule,
}

/// A rule kept verbatim for the output `<style>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualRule {
    pub kind: ResidualKind,
    pub text: String,
}

/// A parsed stylesheet.
#[derive(Debug, Default, Clone)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
    pub residual: Vec<ResidualRule>,
}

/// CSS specificity for cascade ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Specificity {
    pub ids: u16,
    pub classes: u16,
    pub elements: u16,
}

impl Specificity {
    pub fn from_selector(selector: &Selector<EmailSelectors>) -> Self {
        let spec = selector.specificity();
        // selectors packs specificity as (id << 20) | (class << 10) | elements
        Self {
            ids: ((spec >> 20) & 0x3FF) as u16,
            classes: ((spec >> 10) & 0x3FF) as u16,
            elements: (spec & 0x3FF) as u16,
        }
    }
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ids
            .cmp(&other.ids)
            .then(self.classes.cmp(&other.classes))
            .then(self.elements.cmp(&other.elements))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Stylesheet {
    /// Parse leniently, skipping anything malformed.
    pub fn parse(css: &str) -> Self {
        let (sheet, _errors) = Self::parse_collecting(css);
        sheet
    }

    /// Parse, failing on the first malformed rule or declaration.
    pub fn parse_strict(css: &str) -> Result<Self, InlineError> {
        let (sheet, errors) = Self::parse_collecting(css);
        match errors.into_iter().min_by_key(|e| (e.line, e.column)) {
            Some(error) => Err(error),
            None => Ok(sheet),
        }
    }

    fn parse_collecting(css: &str) -> (Self, Vec<InlineError>) {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rule_parser = TopLevelRuleParser {
            sheet: Stylesheet::default(),
            errors: Vec::new(),
        };

        let mut top_level_errors = Vec::new();
        for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
            if let Err((error, _source)) = result {
                top_level_errors.push(InlineError::from_parse(&error));
            }
        }

        let mut errors = rule_parser.errors;
        errors.extend(top_level_errors);
        (rule_parser.sheet, errors)
    }

    /// Check if the stylesheet is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.residual.is_empty()
    }
}

/// Parse the contents of a `style` attribute, skipping malformed entries.
pub fn parse_style_attribute(text: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut errors = Vec::new();
    parse_declaration_block(&mut parser, &mut errors)
}

fn parse_declaration_block(
    input: &mut Parser<'_, '_>,
    errors: &mut Vec<InlineError>,
) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut decl_parser = DeclarationListParser {
        declarations: &mut declarations,
    };
    for result in RuleBodyParser::new(input, &mut decl_parser) {
        if let Err((error, _source)) = result {
            errors.push(InlineError::from_parse(&error));
        }
    }
    declarations
}

/// Consume the rest of `input` and return it as written.
fn consume_verbatim(input: &mut Parser<'_, '_>) -> String {
    let start = input.position();
    while input.next().is_ok() {}
    input.slice_from(start).trim().to_string()
}

/// Parse a comma-separated list of selectors.
fn parse_selector_list<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<Vec<Selector<EmailSelectors>>, ParseError<'i, ()>> {
    let location = parser.current_source_location();
    let selectors = SelectorList::parse(&EmailSelectors, parser, ParseRelative::No)
        .map_err(|_| location.new_custom_error(()))?;
    Ok(selectors.slice().to_vec())
}

struct TopLevelRuleParser {
    sheet: Stylesheet,
    errors: Vec<InlineError>,
}

enum RulePrelude {
    Selectors(Vec<Selector<EmailSelectors>>),
    Verbatim(String),
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser {
    type Prelude = (String, String);
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok((name.to_ascii_lowercase(), consume_verbatim(input)))
    }

    fn parse_block<'t>(
        &mut self,
        (name, prelude): Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let body = consume_verbatim(input);
        let text = if prelude.is_empty() {
            format!("@{name} {{ {body} }}")
        } else {
            format!("@{name} {prelude} {{ {body} }}")
        };
        let kind = match name.as_str() {
            "media" => ResidualKind::MediaQuery,
            "font-face" => ResidualKind::FontFace,
            _ => ResidualKind::OtherAtRule,
        };
        self.sheet.residual.push(ResidualRule { kind, text });
        Ok(())
    }

    fn rule_without_block(
        &mut self,
        (name, prelude): Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        self.sheet.residual.push(ResidualRule {
            kind: ResidualKind::OtherAtRule,
            text: format!("@{name} {prelude};"),
        });
        Ok(())
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser {
    type Prelude = RulePrelude;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        match input.try_parse(parse_selector_list) {
            Ok(selectors) => Ok(RulePrelude::Selectors(selectors)),
            Err(_) => Ok(RulePrelude::Verbatim(consume_verbatim(input))),
        }
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        match prelude {
            RulePrelude::Selectors(selectors) => {
                let declarations = parse_declaration_block(input, &mut self.errors);
                self.sheet.rules.push(StyleRule {
                    selectors,
                    declarations,
                });
            }
            RulePrelude::Verbatim(prelude) => {
                let body = consume_verbatim(input);
                self.sheet.residual.push(ResidualRule {
                    kind: ResidualKind::Dynamic,
                    text: format!("{prelude} {{ {body} }}"),
                });
            }
        }
        Ok(())
    }
}

struct DeclarationListParser<'a> {
    declarations: &'a mut Vec<Declaration>,
}

impl<'i> AtRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> DeclarationParser<'i> for DeclarationListParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        // Draining the input also consumes any pending function or block
        // contents, so the slice always ends on a closing delimiter.
        while input.next().is_ok() {}
        let (value, important) = split_important(input.slice_from(start).trim());
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }

        self.declarations.push(Declaration {
            property: name.to_ascii_lowercase(),
            value: value.to_string(),
            important,
        });
        Ok(())
    }
}

/// Splits a trailing `!important` (any case, optional space after `!`)
/// off a declaration value.
fn split_important(value: &str) -> (&str, bool) {
    let lower = value.to_ascii_lowercase();
    let Some(head) = lower.strip_suffix("important") else {
        return (value, false);
    };
    match head.trim_end().strip_suffix('!') {
        Some(rest) => (value[..rest.len()].trim_end(), true),
        None => (value, false),
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationListParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let sheet = Stylesheet::parse("p { margin: 0; }");
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selectors.len(), 1);
        assert_eq!(
            rule.declarations,
            vec![Declaration {
                property: "margin".into(),
                value: "0".into(),
                important: false,
            }]
        );
    }

    #[test]
    fn test_values_kept_as_written() {
        let sheet = Stylesheet::parse(
            "img { -ms-interpolation-mode: bicubic; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }",
        );
        let decls = &sheet.rules[0].declarations;
        assert_eq!(decls[0].property, "-ms-interpolation-mode");
        assert_eq!(decls[0].value, "bicubic");
        assert_eq!(decls[1].value, "0 1px 3px rgba(0,0,0,0.1)");
    }

    #[test]
    fn test_important_flag() {
        let sheet =
            Stylesheet::parse(".container { width: 100% !important; color: red!important }");
        let decls = &sheet.rules[0].declarations;
        assert!(decls.iter().all(|d| d.important));
        assert_eq!(decls[0].value, "100%");
        assert_eq!(decls[1].value, "red");
    }

    #[test]
    fn test_function_values_not_truncated() {
        let sheet = Stylesheet::parse(
            "td { color: rgb(1, 2, 3) !important; background: url(a.png) no-repeat; \
             box-shadow: 0 2px 5px rgba(0,0,0,0.2) }",
        );
        let decls = &sheet.rules[0].declarations;
        assert_eq!(decls[0].value, "rgb(1, 2, 3)");
        assert!(decls[0].important);
        assert_eq!(decls[1].value, "url(a.png) no-repeat");
        assert!(!decls[1].important);
        assert_eq!(decls[2].value, "0 2px 5px rgba(0,0,0,0.2)");
    }

    #[test]
    fn test_split_important() {
        assert_eq!(split_important("red ! IMPORTANT"), ("red", true));
        assert_eq!(split_important("unimportant"), ("unimportant", false));
        assert_eq!(split_important("!important"), ("", true));
    }

    #[test]
    fn test_media_and_dynamic_rules_are_residual() {
        let css = "a { color: inherit; }\n\
                   .stack-on-mobile:hover { background-color: inherit !important; }\n\
                   @media only screen and (max-width:600px) { .container { width: 100% !important; } }\n\
                   @font-face { font-family: Brand; src: url(brand.woff); }";
        let sheet = Stylesheet::parse(css);
        assert_eq!(sheet.rules.len(), 1);
        let kinds: Vec<_> = sheet.residual.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ResidualKind::Dynamic,
                ResidualKind::MediaQuery,
                ResidualKind::FontFace
            ]
        );
        assert_eq!(
            sheet.residual[0].text,
            ".stack-on-mobile:hover { background-color: inherit !important; }"
        );
        assert!(sheet.residual[1]
            .text
            .starts_with("@media only screen and (max-width:600px) { .container"));
    }

    #[test]
    fn test_strict_reports_position() {
        let err = Stylesheet::parse_strict("p { margin: 0; }\np { color red; }").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.column > 1);

        assert!(Stylesheet::parse_strict("p { color: ; }").is_err());
        assert!(Stylesheet::parse_strict("p { color: #000; }").is_ok());
    }

    #[test]
    fn test_lenient_skips_bad_declarations() {
        let sheet = Stylesheet::parse("p { color red; margin: 0; }");
        assert_eq!(sheet.rules[0].declarations.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].property, "margin");
    }

    #[test]
    fn test_style_attribute() {
        let decls = parse_style_attribute("font-size:28px;color:#ffffff;margin:0");
        assert_eq!(decls.len(), 3);
        assert_eq!(decls[1].value, "#ffffff");
    }

    #[test]
    fn test_specificity_ordering() {
        let id = Specificity {
            ids: 1,
            classes: 0,
            elements: 0,
        };
        let classes = Specificity {
            ids: 0,
            classes: 10,
            elements: 0,
        };
        let elements = Specificity {
            ids: 0,
            classes: 0,
            elements: 100,
        };
        assert!(id > classes);
        assert!(classes > elements);
    }
}
