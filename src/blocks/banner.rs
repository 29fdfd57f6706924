//! Full-width colored bands: hero, header, footer, testimonial.

use super::markup::{Element, Markup, Style, full_width_table, single_cell};
use super::props::PropReader;

const FONT: &str = "'Arial', sans-serif";

pub(super) fn hero(props: &PropReader<'_>) -> Markup {
    let background = props.color("backgroundColor", "#007bff");
    let title = Element::new("h1")
        .style(
            Style::new()
                .set("font-size", "28px")
                .set("color", "#ffffff")
                .set("margin", 0)
                .set("font-family", FONT),
        )
        .text(props.string("title"));
    let subtitle = Element::new("p")
        .style(
            Style::new()
                .set("font-size", "16px")
                .set("color", "#ffffff")
                .set("margin", "8px 0 0")
                .set("font-family", FONT),
        )
        .text(props.string("subtitle"));

    single_cell(
        full_width_table().style(
            Style::new()
                .set("background-color", background)
                .set("border-collapse", "collapse"),
        ),
        Element::new("td")
            .style(
                Style::new()
                    .set("text-align", "center")
                    .set("padding", "28px 20px"),
            )
            .child(title.build())
            .child(subtitle.build()),
    )
}

pub(super) fn header(props: &PropReader<'_>) -> Markup {
    let font_size = props.number("fontSize", 24.0, 16.0, 48.0);
    single_cell(
        full_width_table().style(
            Style::new()
                .set("border-collapse", "collapse")
                .set("background-color", props.color("backgroundColor", "#ffffff")),
        ),
        Element::new("td")
            .style(
                Style::new()
                    .set("color", props.color("textColor", "#000000"))
                    .set("font-size", format!("{font_size}px"))
                    .set("text-align", "center")
                    .set("padding", "20px"),
            )
            .text(props.string("text")),
    )
}

pub(super) fn footer(props: &PropReader<'_>) -> Markup {
    single_cell(
        full_width_table().style(
            Style::new()
                .set("background-color", props.color("backgroundColor", "#333333"))
                .set("border-collapse", "collapse"),
        ),
        Element::new("td")
            .style(
                Style::new()
                    .set("text-align", "center")
                    .set("padding", "18px 20px")
                    .set("font-size", "12px")
                    .set("color", "#ffffff")
                    .set("font-family", FONT),
            )
            .child(
                Element::new("p")
                    .style(Style::new().set("margin", 0))
                    .text(props.string("content"))
                    .build(),
            ),
    )
}

pub(super) fn testimonial(props: &PropReader<'_>) -> Markup {
    let quote = Element::new("p")
        .style(Style::new().set("font-style", "italic"))
        .text(props.string("quote"));
    let author = Element::new("p")
        .style(
            Style::new()
                .set("font-weight", "bold")
                .set("margin-top", "10px"),
        )
        .text(&format!("- {}", props.string("author")));

    single_cell(
        full_width_table().style(
            Style::new()
                .set("border-collapse", "collapse")
                .set("background-color", props.color("backgroundColor", "#f9f9f9"))
                .set("padding", "20px"),
        ),
        Element::new("td")
            .style(
                Style::new()
                    .set("color", props.color("textColor", "#000000"))
                    .set("padding", "20px"),
            )
            .child(quote.build())
            .child(author.build()),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::BlockKind;
    use super::super::tests::render;

    #[test]
    fn test_hero_markup() {
        let html = render(
            BlockKind::Hero,
            json!({"title": "Verify Your Account", "subtitle": "Use the code", "backgroundColor": "#123456"}),
        );
        assert!(html.starts_with(
            "<table role=\"presentation\" width=\"100%\" style=\"background-color:#123456;border-collapse:collapse\">"
        ));
        assert!(html.contains(
            "<h1 style=\"font-size:28px;color:#ffffff;margin:0;font-family:&#39;Arial&#39;, sans-serif\">Verify Your Account</h1>"
        ));
        assert!(html.contains(">Use the code</p>"));
    }

    #[test]
    fn test_hero_bad_color_falls_back() {
        for bad in ["notacolor", "#12", "#1234567"] {
            let html = render(BlockKind::Hero, json!({"backgroundColor": bad}));
            assert!(html.contains("background-color:#007bff"));
            assert!(!html.contains(bad));
        }
    }

    #[test]
    fn test_header_font_size_clamped() {
        let html = render(BlockKind::Header, json!({"text": "News", "fontSize": 100}));
        assert!(html.contains("font-size:48px"));
        let html = render(BlockKind::Header, json!({"text": "News", "fontSize": "abc"}));
        assert!(html.contains("font-size:24px"));
    }

    #[test]
    fn test_footer_escapes_content() {
        let html = render(BlockKind::Footer, json!({"content": "<b>© 2025</b>"}));
        assert!(html.contains("&lt;b&gt;© 2025&lt;/b&gt;"));
        assert!(html.contains("background-color:#333333"));
    }

    #[test]
    fn test_testimonial_author_prefix() {
        let html = render(
            BlockKind::Testimonial,
            json!({"quote": "Great", "author": "Jane", "textColor": "#ff0000"}),
        );
        assert!(html.contains("<p style=\"font-style:italic\">Great</p>"));
        assert!(html.contains(">- Jane</p>"));
        assert!(html.contains("color:#ff0000;padding:20px"));
    }
}
