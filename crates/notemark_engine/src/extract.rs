use scraper::{Html, Selector};

/// The `<head>` values both resolution strategies read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadMetadata {
    pub og_title: Option<String>,
    pub title: Option<String>,
    pub og_description: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
}

/// What the read-only page script returns for a rendered tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSnapshot {
    pub head: HeadMetadata,
    /// Text of the first `article div[lang]`, where client-rendered posts keep their body.
    pub article_text: Option<String>,
    /// Raw bodies of every `application/ld+json` script block.
    pub structured_data: Vec<String>,
}

pub fn extract_head_metadata(html: &str) -> HeadMetadata {
    head_metadata(&Html::parse_document(html))
}

/// Reads a rendered DOM the same way the in-page script does.
pub fn snapshot_from_html(html: &str) -> PageSnapshot {
    let doc = Html::parse_document(html);
    let article_text = first_text(&doc, "article div[lang]");
    let structured_data = Selector::parse(r#"script[type="application/ld+json"]"#)
        .ok()
        .map(|sel| {
            doc.select(&sel)
                .map(|node| node.text().collect::<String>())
                .filter(|body| !body.trim().is_empty())
                .collect()
        })
        .unwrap_or_default();

    PageSnapshot {
        head: head_metadata(&doc),
        article_text,
        structured_data,
    }
}

fn head_metadata(doc: &Html) -> HeadMetadata {
    HeadMetadata {
        og_title: meta_content(doc, r#"meta[property="og:title"]"#),
        title: first_text(doc, "title"),
        og_description: meta_content(doc, r#"meta[property="og:description"]"#),
        meta_description: meta_content(doc, r#"meta[name="description"]"#),
        og_image: meta_content(doc, r#"meta[property="og:image"]"#),
    }
}

fn meta_content(doc: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel)
        .next()
        .and_then(|node| node.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel)
        .next()
        .map(|node| {
            node.text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
}
