//! Text-centric blocks.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::BlockError;
use super::markup::{Element, Markup, Style, full_width_table, single_cell, with_rows};
use super::props::PropReader;
use crate::sanitize::sanitize_rich_text;

const FONT: &str = "'Arial', sans-serif";

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(super) fn otp(props: &PropReader<'_>) -> Markup {
    let caption = Element::new("p")
        .style(
            Style::new()
                .set("font-size", "16px")
                .set("color", "#333333")
                .set("margin", "0 0 10px")
                .set("font-family", FONT),
        )
        .text("Your One-Time Password (OTP):");
    let code = Element::new("div")
        .style(
            Style::new()
                .set("display", "inline-block")
                .set("padding", "10px 20px")
                .set("background-color", "#f0f0f0")
                .set("border-radius", "4px")
                .set("font-size", "24px")
                .set("font-weight", 700)
                .set("color", "#000000")
                .set("letter-spacing", "2px")
                .set("font-family", FONT),
        )
        .text(props.string("otpCode"));

    single_cell(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        Element::new("td")
            .style(
                Style::new()
                    .set("text-align", "center")
                    .set("padding", "20px"),
            )
            .child(caption.build())
            .child(code.build()),
    )
}

pub(super) fn text_block(props: &PropReader<'_>) -> Markup {
    let content = sanitize_rich_text(props.string("content"));
    single_cell(
        full_width_table().style(
            Style::new()
                .set("background-color", props.color("backgroundColor", "#ffffff"))
                .set("border-collapse", "collapse"),
        ),
        Element::new("td")
            .style(
                Style::new()
                    .set("padding", "20px")
                    .set("font-size", "16px")
                    .set("line-height", "1.5")
                    .set("font-family", FONT)
                    .set("color", "#000000"),
            )
            .child(Element::new("div").raw(&content).build()),
    )
}

pub(super) fn countdown(props: &PropReader<'_>) -> Markup {
    let deadline = utf8_percent_encode(props.string("deadline"), URI_COMPONENT);
    let timer = Element::new("img")
        .attr(
            "src",
            format!("https://via.placeholder.com/300x50?text=Countdown+to+{deadline}"),
        )
        .attr("alt", "Countdown Timer")
        .style(
            Style::new()
                .set("display", "block")
                .set("margin", "10px auto")
                .set("border", 0),
        );

    single_cell(
        full_width_table().style(
            Style::new()
                .set("border-collapse", "collapse")
                .set("text-align", "center"),
        ),
        Element::new("td")
            .style(
                Style::new()
                    .set("padding", "20px")
                    .set("color", props.color("textColor", "#000000")),
            )
            .child(Element::new("p").text(props.string("text")).build())
            .child(timer.build()),
    )
}

pub(super) fn dynamic_content(props: &PropReader<'_>) -> Markup {
    let placeholder = Some(props.string("placeholder"))
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| props.string("fallback"));
    single_cell(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        Element::new("td")
            .style(
                Style::new()
                    .set("color", props.color("textColor", "#000000"))
                    .set("padding", "10px")
                    .set("text-align", "center"),
            )
            .text(placeholder),
    )
}

pub(super) fn accordion(props: &PropReader<'_>) -> Result<Markup, BlockError> {
    let rows = props.list("items")?.into_iter().map(|item| {
        let cell = Element::new("td")
            .style(
                Style::new()
                    .set("padding", "10px")
                    .set("border-bottom", "1px solid #ddd"),
            )
            .child(Element::new("strong").text(item.string("title")).build())
            .child(Element::new("p").text(item.string("content")).build());
        Element::new("tr").child(cell.build()).build()
    });

    Ok(with_rows(
        full_width_table().style(
            Style::new()
                .set("border-collapse", "collapse")
                .set("background-color", props.color("backgroundColor", "#ffffff")),
        ),
        rows,
    ))
}
