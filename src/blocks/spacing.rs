//! Vertical whitespace and rules.

use super::markup::{Element, Markup, Style, full_width_table, single_cell, table};
use super::props::PropReader;

pub(super) fn spacer(props: &PropReader<'_>) -> Markup {
    let height = props.number("height", 20.0, 10.0, 200.0);
    single_cell(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        Element::new("td")
            .style(
                Style::new()
                    .set("height", format!("{height}px"))
                    .set("line-height", format!("{height}px"))
                    .set("font-size", "1px"),
            )
            .raw("&nbsp;"),
    )
}

pub(super) fn divider(props: &PropReader<'_>) -> Markup {
    let height = props.number("height", 2.0, 1.0, 10.0);
    let width = props.number("width", 100.0, 10.0, 100.0);
    single_cell(
        table().attr("width", format!("{width}%")).style(
            Style::new()
                .set("border-collapse", "collapse")
                .set("margin", "0 auto"),
        ),
        Element::new("td").style(
            Style::new()
                .set("height", format!("{height}px"))
                .set("background-color", props.color("color", "#000000")),
        ),
    )
}
