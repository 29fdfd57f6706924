//! CSS inlining for email HTML.
//!
//! Most email clients ignore `<style>` blocks, so every rule that can be
//! matched statically is copied onto the elements it selects. Media
//! queries, font faces and rules needing user interaction (`:hover`) stay
//! behind in the `<style>` element.

mod element;
mod inline;
mod stylesheet;

pub use element::{ElementRef, EmailSelectors};
pub use inline::{InlineOptions, inline_css};
pub use stylesheet::{
    Declaration, InlineError, ResidualKind, ResidualRule, Specificity, StyleRule, Stylesheet,
    parse_style_attribute,
};
