//! crates/drivepixel_core/src/render.rs
//!
//! Renders a CMS content document into HTML: groups the flat block list into
//! ordered sections, then dispatches each block through a fixed table of
//! renderers keyed by block type.
//!
//! The `html` block type is injected verbatim. That is an intentional trust
//! decision: CMS content is authored by trusted admins only, and sanitizing
//! here would change rendering output. All other text goes through
//! [`escape_html`].

use crate::domain::{BlockContent, ContentBlock, SitePageContent, TextStyle};

//=========================================================================================
// Section Grouping and Ordering
//=========================================================================================

/// One renderable section: a name and its blocks in final render order.
#[derive(Debug)]
pub struct Section<'a> {
    pub name: &'a str,
    pub blocks: Vec<&'a ContentBlock>,
}

/// Groups blocks by `section_name` and orders everything for rendering.
///
/// Groups form in first-seen order. Each section's sort key is the
/// `section_order` of the block that was first grouped into it, captured
/// before blocks are sorted, so a section whose lowest-`block_order` block
/// carries a different `section_order` still sorts by the first-encountered
/// one. Blocks sort by `block_order` ascending; both sorts are stable.
pub fn ordered_sections(blocks: &[ContentBlock]) -> Vec<Section<'_>> {
    struct Group<'a> {
        name: &'a str,
        key: i32,
        blocks: Vec<&'a ContentBlock>,
    }

    let mut groups: Vec<Group<'_>> = Vec::new();
    for block in blocks {
        match groups.iter_mut().find(|g| g.name == block.section_name) {
            Some(group) => group.blocks.push(block),
            None => groups.push(Group {
                name: &block.section_name,
                key: block.section_order,
                blocks: vec![block],
            }),
        }
    }

    for group in &mut groups {
        group.blocks.sort_by_key(|b| b.block_order);
    }
    groups.sort_by_key(|g| g.key);

    groups
        .into_iter()
        .map(|g| Section {
            name: g.name,
            blocks: g.blocks,
        })
        .collect()
}

//=========================================================================================
// Block Dispatch
//=========================================================================================

/// Renders a single block through the dispatch table.
pub fn render_block(block: &ContentBlock) -> String {
    match block.parsed() {
        BlockContent::Text { text, style } => {
            let escaped = escape_html(&text);
            match style {
                TextStyle::Heading => format!("<h2>{}</h2>", escaped),
                TextStyle::Subheading => format!("<h3>{}</h3>", escaped),
                TextStyle::Quote => format!("<blockquote>{}</blockquote>", escaped),
                TextStyle::Paragraph => format!("<p>{}</p>", escaped),
            }
        }
        // Verbatim by contract; see the module docs.
        BlockContent::Html { html } => html,
        BlockContent::Image { url, alt, caption } => {
            let mut out = format!(
                "<figure><img src=\"{}\" alt=\"{}\">",
                escape_html(&url),
                escape_html(&alt)
            );
            if let Some(caption) = caption {
                out.push_str(&format!("<figcaption>{}</figcaption>", escape_html(&caption)));
            }
            out.push_str("</figure>");
            out
        }
        BlockContent::Hero {
            title,
            subtitle,
            background_image,
            cta,
        } => {
            let mut out = String::from("<header class=\"hero\"");
            if let Some(url) = background_image {
                out.push_str(&format!(
                    " style=\"background-image:url('{}')\"",
                    escape_html(&url)
                ));
            }
            out.push('>');
            out.push_str(&format!("<h1>{}</h1>", escape_html(&title)));
            out.push_str(&format!("<p>{}</p>", escape_html(&subtitle)));
            if let Some(cta) = cta {
                out.push_str(&format!(
                    "<a class=\"cta\" href=\"{}\">{}</a>",
                    escape_html(&cta.url),
                    escape_html(&cta.text)
                ));
            }
            out.push_str("</header>");
            out
        }
        BlockContent::Features { title, features } => {
            let mut out = String::from("<div class=\"features\">");
            out.push_str(&format!("<h2>{}</h2>", escape_html(&title)));
            out.push_str("<div class=\"features-grid\">");
            for feature in features {
                out.push_str("<div class=\"feature\">");
                if let Some(icon) = feature.icon {
                    out.push_str(&format!(
                        "<span class=\"feature-icon\">{}</span>",
                        escape_html(&icon)
                    ));
                }
                out.push_str(&format!("<h4>{}</h4>", escape_html(&feature.title)));
                out.push_str(&format!("<p>{}</p>", escape_html(&feature.description)));
                out.push_str("</div>");
            }
            out.push_str("</div></div>");
            out
        }
        BlockContent::Unknown { block_type } => format!(
            "<div class=\"unsupported-block\">Unsupported block type: {}</div>",
            escape_html(&block_type)
        ),
    }
}

/// Renders a full content document: every section in order, each block in
/// order inside it.
pub fn render_page(page: &SitePageContent) -> String {
    let mut out = String::new();
    for section in ordered_sections(&page.content_blocks) {
        out.push_str(&format!(
            "<section data-section=\"{}\">",
            escape_html(section.name)
        ));
        for block in section.blocks {
            out.push_str(&render_block(block));
        }
        out.push_str("</section>");
    }
    out
}

/// Minimal HTML escaping for text interpolated into markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(
        section_name: &str,
        section_order: i32,
        block_order: i32,
        block_type: &str,
        content: serde_json::Value,
    ) -> ContentBlock {
        ContentBlock {
            id: 0,
            section_name: section_name.to_string(),
            block_type: block_type.to_string(),
            content,
            section_order,
            block_order,
        }
    }

    fn text_block(section: &str, section_order: i32, block_order: i32, text: &str) -> ContentBlock {
        block(
            section,
            section_order,
            block_order,
            "text",
            json!({ "text": text }),
        )
    }

    #[test]
    fn sections_order_by_first_block_section_order() {
        let blocks = vec![
            text_block("a", 5, 2, "a2"),
            text_block("a", 5, 1, "a1"),
            text_block("b", 1, 1, "b1"),
        ];
        let sections = ordered_sections(&blocks);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "b");
        assert_eq!(sections[1].name, "a");
        // Within "a", block_order 1 renders before 2.
        assert_eq!(sections[1].blocks[0].block_order, 1);
        assert_eq!(sections[1].blocks[1].block_order, 2);
    }

    #[test]
    fn section_key_comes_from_first_grouped_block_not_lowest_block_order() {
        // The first block seen for "a" carries section_order 9; the block
        // that sorts first inside "a" carries section_order 1. The section
        // key must stay 9.
        let blocks = vec![
            text_block("a", 9, 2, "late"),
            block("a", 1, 1, "text", json!({ "text": "early" })),
            text_block("b", 5, 1, "b"),
        ];
        let sections = ordered_sections(&blocks);
        assert_eq!(sections[0].name, "b");
        assert_eq!(sections[1].name, "a");
    }

    #[test]
    fn text_styles_select_element() {
        let b = block("s", 1, 1, "text", json!({ "text": "Hi", "style": "heading" }));
        assert_eq!(render_block(&b), "<h2>Hi</h2>");
        let b = block("s", 1, 1, "text", json!({ "text": "Hi", "style": "subheading" }));
        assert_eq!(render_block(&b), "<h3>Hi</h3>");
        let b = block("s", 1, 1, "text", json!({ "text": "Hi", "style": "quote" }));
        assert_eq!(render_block(&b), "<blockquote>Hi</blockquote>");
        let b = block("s", 1, 1, "text", json!({ "text": "Hi" }));
        assert_eq!(render_block(&b), "<p>Hi</p>");
    }

    #[test]
    fn missing_text_renders_empty_not_error() {
        let b = block("s", 1, 1, "text", json!({ "style": "heading" }));
        assert_eq!(render_block(&b), "<h2></h2>");
    }

    #[test]
    fn html_block_is_injected_verbatim() {
        let b = block("s", 1, 1, "html", json!({ "html": "<video controls></video>" }));
        assert_eq!(render_block(&b), "<video controls></video>");
    }

    #[test]
    fn image_caption_is_optional() {
        let b = block("s", 1, 1, "image", json!({ "url": "/a.png", "alt": "A" }));
        assert!(!render_block(&b).contains("figcaption"));

        let b = block(
            "s",
            1,
            1,
            "image",
            json!({ "url": "/a.png", "alt": "A", "caption": "cap" }),
        );
        assert!(render_block(&b).contains("<figcaption>cap</figcaption>"));
    }

    #[test]
    fn hero_cta_requires_both_text_and_url() {
        let b = block(
            "s",
            1,
            1,
            "hero",
            json!({ "title": "T", "subtitle": "S", "cta_text": "Go" }),
        );
        assert!(!render_block(&b).contains("<a"));

        let b = block(
            "s",
            1,
            1,
            "hero",
            json!({ "title": "T", "subtitle": "S", "cta_text": "Go", "cta_url": "/x" }),
        );
        let html = render_block(&b);
        assert!(html.contains("<a class=\"cta\" href=\"/x\">Go</a>"));
    }

    #[test]
    fn features_tolerate_missing_array() {
        let b = block("s", 1, 1, "features", json!({ "title": "Why us" }));
        let html = render_block(&b);
        assert!(html.contains("<h2>Why us</h2>"));
        assert!(!html.contains("feature\">"));
    }

    #[test]
    fn unknown_block_type_renders_visible_placeholder() {
        let b = block("s", 1, 1, "carousel", json!({}));
        assert_eq!(
            render_block(&b),
            "<div class=\"unsupported-block\">Unsupported block type: carousel</div>"
        );
    }

    #[test]
    fn escapes_text_content() {
        let b = block("s", 1, 1, "text", json!({ "text": "<b>&\"" }));
        assert_eq!(render_block(&b), "<p>&lt;b&gt;&amp;&quot;</p>");
    }
}
