//! Image-based blocks.

use super::BlockError;
use super::markup::{Element, Markup, Style, full_width_table, single_cell, table};
use super::props::PropReader;

const ALIGNMENTS: &[&str] = &["left", "center", "right"];

pub(super) fn image(props: &PropReader<'_>) -> Markup {
    let width = props.number("width", 600.0, 0.0, 600.0);
    let height = props.number("height", 200.0, 0.0, 600.0);
    let img = Element::new("img")
        .attr("src", props.url("src"))
        .attr("alt", props.string("alt"))
        .attr("width", width)
        .attr("height", height)
        .style(
            Style::new()
                .set("max-width", "100%")
                .set("height", "auto"),
        );

    single_cell(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        Element::new("td")
            .style(
                Style::new()
                    .set("text-align", "center")
                    .set("padding", "20px"),
            )
            .child(img.build()),
    )
}

pub(super) fn logo(props: &PropReader<'_>) -> Markup {
    let align = props.choice("align", ALIGNMENTS, "center");
    let margin = match align {
        "center" => "0 auto",
        "right" => "0 0 0 auto",
        _ => "0 auto 0 0",
    };
    let img = Element::new("img")
        .attr("src", props.url("src"))
        .attr("alt", props.string("alt"))
        .attr("width", props.number("width", 150.0, 50.0, 300.0))
        .attr("height", props.number("height", 50.0, 50.0, 300.0))
        .style(
            Style::new()
                .set("display", "block")
                .set("border", 0)
                .set("margin", 0),
        )
        .build();
    let content = match props.optional_url("link") {
        Some(link) => Element::new("a").attr("href", link).child(img).build(),
        None => img,
    };

    let inner = single_cell(
        table()
            .style(
                Style::new()
                    .set("border-collapse", "collapse")
                    .set("margin", margin),
            )
            .attr("align", align),
        Element::new("td").child(content),
    );
    single_cell(
        full_width_table()
            .style(Style::new().set("border-collapse", "collapse"))
            .attr("align", align),
        Element::new("td")
            .style(
                Style::new()
                    .set("text-align", align)
                    .set("padding", "10px"),
            )
            .child(inner),
    )
}

pub(super) fn video(props: &PropReader<'_>) -> Markup {
    let thumbnail = Element::new("img")
        .attr("src", props.url("thumbnail"))
        .attr("alt", props.string("alt"))
        .attr("width", props.number("width", 600.0, 100.0, 600.0))
        .style(Style::new().set("display", "block").set("border", 0));

    single_cell(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        Element::new("td")
            .style(Style::new().set("text-align", "center"))
            .child(
                Element::new("a")
                    .attr("href", props.url("videoUrl"))
                    .child(thumbnail.build())
                    .build(),
            ),
    )
}

pub(super) fn social_media(props: &PropReader<'_>) -> Result<Markup, BlockError> {
    let size = props.number("iconSize", 32.0, 16.0, 48.0);
    let align = props.choice("align", ALIGNMENTS, "center");
    let icons = props.list("platforms")?.into_iter().map(|entry| {
        let platform = entry.string("platform");
        let icon = Element::new("img")
            .attr(
                "src",
                format!("https://via.placeholder.com/{size}?text={platform}"),
            )
            .attr("alt", platform)
            .attr("width", size)
            .attr("height", size)
            .style(Style::new().set("display", "block").set("border", 0));
        Element::new("a")
            .attr("href", entry.url("url"))
            .style(
                Style::new()
                    .set("margin", "0 5px")
                    .set("display", "inline-block"),
            )
            .child(icon.build())
            .build()
    });

    Ok(single_cell(
        full_width_table().style(Style::new().set("border-collapse", "collapse")),
        Element::new("td")
            .style(Style::new().set("text-align", align))
            .children(icons),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::BlockKind;
    use super::super::tests::render;

    #[test]
    fn test_image_caps_size() {
        let html = render(
            BlockKind::Image,
            json!({"src": "https://example.com/a.png", "alt": "A", "width": 900, "height": 1200}),
        );
        assert!(html.contains(
            "<img src=\"https://example.com/a.png\" alt=\"A\" width=\"600\" height=\"600\""
        ));
    }

    #[test]
    fn test_image_invalid_src() {
        let html = render(BlockKind::Image, json!({"src": "nope"}));
        assert!(html.contains("src=\"#\""));
    }

    #[test]
    fn test_logo_alignment_and_link() {
        let html = render(
            BlockKind::Logo,
            json!({"src": "https://example.com/logo.png", "align": "right", "link": "https://example.com"}),
        );
        assert!(html.contains("margin:0 0 0 auto"));
        assert!(html.contains("<a href=\"https://example.com\"><img"));

        let html = render(BlockKind::Logo, json!({"align": "sideways", "link": ""}));
        assert!(html.contains("margin:0 auto\""));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_social_icons() {
        let html = render(
            BlockKind::SocialMedia,
            json!({
                "platforms": [
                    {"platform": "facebook", "url": "https://facebook.com"},
                    {"platform": "twitter", "url": "bad url"}
                ],
                "iconSize": 100,
                "align": "left"
            }),
        );
        assert!(html.contains("https://via.placeholder.com/48?text=facebook"));
        assert!(html.contains("<a href=\"#\""));
        assert!(html.contains("text-align:left"));
        assert_eq!(html.matches("<img").count(), 2);
    }

    #[test]
    fn test_video_link() {
        let html = render(
            BlockKind::Video,
            json!({"thumbnail": "https://example.com/t.png", "videoUrl": "https://example.com/v", "width": 50}),
        );
        assert!(html.contains(
            "<a href=\"https://example.com/v\"><img src=\"https://example.com/t.png\""
        ));
        assert!(html.contains("width=\"100\""));
    }
}
