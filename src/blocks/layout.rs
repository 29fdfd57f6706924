//! Container blocks and the root table.
//!
//! Rows lay their children out in a single `<tr>`; multi-column layouts route
//! each child into the column whose zone matches the child's `zoneId`.

use super::markup::{Element, Markup, Style, full_width_table, table, with_rows};
use super::props::PropReader;
use super::{BlockContext, BlockKind, RenderedChild};

fn zone<'a>(props: &PropReader<'a>, key: &str, fallback: &'a str) -> &'a str {
    Some(props.string(key))
        .filter(|z| !z.is_empty())
        .unwrap_or(fallback)
}

pub(super) fn row(ctx: &BlockContext<'_>) -> Markup {
    let props = &ctx.props;
    let background = props.color("backgroundColor", "#ffffff");
    let padding = props.number("padding", 0.0, 0.0, 50.0);
    let border_width = props.number("borderWidth", 0.0, 0.0, 5.0);
    let border = if border_width > 0.0 {
        format!(
            "{}px {} {}",
            border_width,
            props.choice("borderStyle", &["solid", "dashed", "dotted"], "solid"),
            props.color("borderColor", "#000000"),
        )
    } else {
        "none".to_string()
    };
    let background_image = match props.optional_url("backgroundImage") {
        Some(url) => format!("url({url})"),
        None => "none".to_string(),
    };
    let shadow = match props.string("boxShadow") {
        "light" => "0 1px 3px rgba(0,0,0,0.1)",
        "medium" => "0 2px 5px rgba(0,0,0,0.2)",
        _ => "none",
    };

    let style = Style::new()
        .set("border-collapse", "collapse")
        .set(
            "text-align",
            props.choice("align", &["left", "center", "right"], "left"),
        )
        .set("background-color", background)
        .set("opacity", props.number("backgroundOpacity", 1.0, 0.0, 1.0))
        .set("padding", format!("{padding}px"))
        .set("border", border)
        .set(
            "border-radius",
            format!("{}px", props.number("borderRadius", 0.0, 0.0, 20.0)),
        )
        .set("box-shadow", shadow)
        .set(
            "vertical-align",
            props.choice("verticalAlign", &["top", "middle", "bottom"], "top"),
        )
        .set("max-width", props.css_width("maxWidth", "100%"))
        .set(
            "margin",
            format!("{}px auto", props.number("margin", 0.0, 0.0, 50.0)),
        )
        .set("background-image", background_image)
        .set("background-size", "cover")
        .set("background-position", "center")
        .set(
            "min-height",
            format!("{}px", props.number("minHeight", 50.0, 50.0, 500.0)),
        )
        .set("color", props.color("textColor", "#000000"))
        .set("z-index", props.number("zIndex", 0.0, 0.0, 100.0));

    let mut classes = Vec::new();
    if props.flag("stackOnMobile", true) {
        classes.push("stack-on-mobile".to_string());
    }
    let custom = crate::validate::scrub_class_name(props.string("customClass"));
    if !custom.is_empty() {
        classes.push(custom);
    }

    let mut table = full_width_table().style(style);
    if !classes.is_empty() {
        table = table.attr("class", classes.join(" "));
    }
    table = table.attr(
        "data-hover-bg",
        props.optional_color("hoverBackgroundColor").unwrap_or(background),
    );

    let cells = ctx.children.iter().map(|child| match child.kind {
        BlockKind::Column => child.markup.clone(),
        _ => Element::new("td").child(child.markup.clone()).build(),
    });
    let gap = props.number("columnGap", 0.0, 0.0, 50.0);
    let tr = Element::new("tr")
        .style(Style::new().set("column-gap", format!("{gap}px")))
        .children(cells)
        .build();
    with_rows(table, [tr])
}

pub(super) fn column(ctx: &BlockContext<'_>) -> Markup {
    Element::new("td")
        .style(
            Style::new()
                .set("vertical-align", "top")
                .set("padding", "10px"),
        )
        .attr("data-zone", zone(&ctx.props, "zoneId", &ctx.zones.a))
        .children(ctx.children.iter().map(|c| c.markup.clone()))
        .build()
}

pub(super) fn two_column(ctx: &BlockContext<'_>) -> Markup {
    let zones = [
        zone(&ctx.props, "leftZone", &ctx.zones.b),
        zone(&ctx.props, "rightZone", &ctx.zones.c),
    ];
    columns(&zones, "50%", ctx.children)
}

pub(super) fn three_column(ctx: &BlockContext<'_>) -> Markup {
    let zones = [
        zone(&ctx.props, "leftZone", &ctx.zones.a),
        zone(&ctx.props, "middleZone", &ctx.zones.b),
        zone(&ctx.props, "rightZone", &ctx.zones.c),
    ];
    columns(&zones, "33.33%", ctx.children)
}

/// Stacking columns, one per zone. Children without a matching zone land in
/// the first column.
fn columns(zones: &[&str], width: &str, children: &[RenderedChild]) -> Markup {
    let mut slots: Vec<Vec<Markup>> = vec![Vec::new(); zones.len()];
    for child in children {
        let slot = child
            .zone
            .as_deref()
            .and_then(|z| zones.iter().position(|candidate| *candidate == z))
            .unwrap_or(0);
        slots[slot].push(child.markup.clone());
    }

    let cells = zones.iter().zip(slots).map(|(zone, content)| {
        Element::new("td")
            .attr("width", width)
            .attr("class", "stack-column")
            .style(
                Style::new()
                    .set("vertical-align", "top")
                    .set("padding", "10px"),
            )
            .attr("data-zone", zone)
            .children(content)
            .build()
    });
    with_rows(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        [Element::new("tr").children(cells).build()],
    )
}

/// The width-governing table every document's blocks sit in.
pub fn root(width: &str, children: &[RenderedChild]) -> Markup {
    let cell = Element::new("td")
        .children(children.iter().map(|c| c.markup.clone()))
        .build();
    with_rows(
        table().attr("width", width).style(
            Style::new()
                .set("width", width)
                .set("margin", "0 auto")
                .set("background-color", "#ffffff")
                .set("border-collapse", "collapse"),
        ),
        [Element::new("tr").child(cell).build()],
    )
}
