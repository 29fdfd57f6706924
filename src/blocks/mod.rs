//! Block renderers.
//!
//! Each block kind is a pure function from its merged props (plus rendered
//! children and the registry's zones) to an optional HTML fragment. All
//! markup is table-based with `role="presentation"`.
//!
//! Renderers never trust their props: colors, URLs, numbers and enumerated
//! values are re-validated here even though the editor validates them too.

mod action;
mod banner;
mod layout;
mod markup;
mod media;
mod props;
mod spacing;
mod text;

pub use layout::root;
pub use markup::{Element, Markup, Style};
pub use props::PropReader;

use serde::Serialize;
use thiserror::Error;

use crate::registry::Zones;

/// A renderer could not produce output from its props.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("prop `{0}` must be an array")]
    NotAList(&'static str),
}

/// A child block that rendered successfully.
#[derive(Debug, Clone)]
pub struct RenderedChild {
    /// Node key, from its `id` prop or generated.
    pub key: String,
    pub kind: BlockKind,
    /// Zone the node was dropped into, if any.
    pub zone: Option<String>,
    pub markup: Markup,
}

/// Everything a renderer may read.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub props: PropReader<'a>,
    pub children: &'a [RenderedChild],
    pub zones: &'a Zones,
}

/// The closed set of block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    Hero,
    #[serde(rename = "OTPBlock")]
    Otp,
    Button,
    TextBlock,
    Spacer,
    Footer,
    Row,
    Column,
    TwoColumn,
    ThreeColumn,
    Image,
    Logo,
    SocialMedia,
    Divider,
    Video,
    Testimonial,
    Countdown,
    Header,
    #[serde(rename = "CTA")]
    Cta,
    Accordion,
    DynamicContent,
}

impl BlockKind {
    /// Every kind, in registry order.
    pub const ALL: [BlockKind; 21] = [
        BlockKind::Hero,
        BlockKind::Otp,
        BlockKind::Button,
        BlockKind::TextBlock,
        BlockKind::Spacer,
        BlockKind::Footer,
        BlockKind::Row,
        BlockKind::Column,
        BlockKind::TwoColumn,
        BlockKind::ThreeColumn,
        BlockKind::Image,
        BlockKind::Logo,
        BlockKind::SocialMedia,
        BlockKind::Divider,
        BlockKind::Video,
        BlockKind::Testimonial,
        BlockKind::Countdown,
        BlockKind::Header,
        BlockKind::Cta,
        BlockKind::Accordion,
        BlockKind::DynamicContent,
    ];

    /// The type string used in documents.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Hero => "Hero",
            BlockKind::Otp => "OTPBlock",
            BlockKind::Button => "Button",
            BlockKind::TextBlock => "TextBlock",
            BlockKind::Spacer => "Spacer",
            BlockKind::Footer => "Footer",
            BlockKind::Row => "Row",
            BlockKind::Column => "Column",
            BlockKind::TwoColumn => "TwoColumn",
            BlockKind::ThreeColumn => "ThreeColumn",
            BlockKind::Image => "Image",
            BlockKind::Logo => "Logo",
            BlockKind::SocialMedia => "SocialMedia",
            BlockKind::Divider => "Divider",
            BlockKind::Video => "Video",
            BlockKind::Testimonial => "Testimonial",
            BlockKind::Countdown => "Countdown",
            BlockKind::Header => "Header",
            BlockKind::Cta => "CTA",
            BlockKind::Accordion => "Accordion",
            BlockKind::DynamicContent => "DynamicContent",
        }
    }

    /// Look a kind up by its type string.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Render one block. `Ok(None)` means the block chose to output nothing.
    pub fn render(self, ctx: &BlockContext<'_>) -> Result<Option<Markup>, BlockError> {
        let props = &ctx.props;
        if !props.flag("isVisible", true) {
            return Ok(None);
        }

        let markup = match self {
            BlockKind::Hero => banner::hero(props),
            BlockKind::Header => banner::header(props),
            BlockKind::Footer => banner::footer(props),
            BlockKind::Testimonial => banner::testimonial(props),
            BlockKind::Button => action::button(props),
            BlockKind::Cta => action::cta(props),
            BlockKind::Otp => text::otp(props),
            BlockKind::TextBlock => text::text_block(props),
            BlockKind::Countdown => text::countdown(props),
            BlockKind::DynamicContent => text::dynamic_content(props),
            BlockKind::Accordion => text::accordion(props)?,
            BlockKind::Image => media::image(props),
            BlockKind::Logo => media::logo(props),
            BlockKind::Video => media::video(props),
            BlockKind::SocialMedia => media::social_media(props)?,
            BlockKind::Spacer => spacing::spacer(props),
            BlockKind::Divider => spacing::divider(props),
            BlockKind::Row => layout::row(ctx),
            BlockKind::Column => layout::column(ctx),
            BlockKind::TwoColumn => layout::two_column(ctx),
            BlockKind::ThreeColumn => layout::three_column(ctx),
        };
        Ok(Some(markup))
    }
}
