//! Link blocks: the bulletproof button and the call-to-action.

use super::markup::{Element, Markup, Style, full_width_table, single_cell, table};
use super::props::PropReader;
use crate::util::escape_html;

pub(super) fn button(props: &PropReader<'_>) -> Markup {
    let color = props.color("color", "#ffffff");
    let background = props.color("backgroundColor", "#007bff");
    let link = props.url("link");
    let text = props.string_or("text", "Button");

    let anchor = Element::new("a")
        .attr("href", link)
        .style(
            Style::new()
                .set("display", "inline-block")
                .set("padding", "12px 24px")
                .set("background-color", background)
                .set("color", color)
                .set("text-decoration", "none")
                .set("border-radius", "4px")
                .set("font-weight", 700)
                .set("font-size", "16px")
                .set("font-family", "'Arial', sans-serif"),
        )
        .attr("aria-label", text)
        .text(text);

    let link_row = Element::new("tbody")
        .child(
            Element::new("tr")
                .child(Element::new("td").child(anchor.build()).build())
                .build(),
        )
        .build();
    let vml_row = Element::new("tbody")
        .child(
            Element::new("tr")
                .child(
                    Element::new("td")
                        .raw(&vml_fallback(link, text, color, background))
                        .build(),
                )
                .build(),
        )
        .build();

    table()
        .style(
            Style::new()
                .set("margin", "0 auto")
                .set("border-collapse", "collapse"),
        )
        .child(link_row)
        .child(vml_row)
        .build()
}

/// Outlook ignores padding on links; draw the button as VML instead.
fn vml_fallback(link: &str, text: &str, color: &str, background: &str) -> String {
    let link = escape_html(link);
    let text = escape_html(text);
    format!(
        "<!--[if mso]><v:roundrect xmlns:v=\"urn:schemas-microsoft-com:vml\" href=\"{link}\" \
         style=\"height:40px;v-text-anchor:middle;width:200px;\" arcsize=\"8%\" \
         strokecolor=\"{background}\" fillcolor=\"{background}\">\
         <v:textbox style=\"mso-fit-shape-to-text:true\" inset=\"0,0,0,0\">\
         <center style=\"color:{color};font-family:Arial,sans-serif;font-size:16px;font-weight:bold;\">\
         {text}</center></v:textbox></v:roundrect><![endif]-->"
    )
}

pub(super) fn cta(props: &PropReader<'_>) -> Markup {
    let radius = props.number("borderRadius", 5.0, 0.0, 20.0);
    let anchor = Element::new("a")
        .attr("href", props.url("link"))
        .style(
            Style::new()
                .set("background-color", props.color("backgroundColor", "#ff4500"))
                .set("color", props.color("textColor", "#ffffff"))
                .set("padding", "15px 30px")
                .set("border-radius", format!("{radius}px"))
                .set("display", "inline-block")
                .set("text-decoration", "none")
                .set("font-weight", "bold"),
        )
        .text(props.string("text"));

    single_cell(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        Element::new("td")
            .style(
                Style::new()
                    .set("text-align", "center")
                    .set("padding", "20px"),
            )
            .child(anchor.build()),
    )
}
