//! Article detail page extraction.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::constants::UNTITLED_PLACEHOLDER;

static MAIN_CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#main-content").expect("Invalid selector"));
static METALINE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.article-metaline, div.article-metaline-right").expect("Invalid selector")
});
static META_TAG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.article-meta-tag").expect("Invalid selector"));
static META_VALUE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.article-meta-value").expect("Invalid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("head > title").expect("Invalid selector"));
static PUSH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.push").expect("Invalid selector"));
static PUSH_TAG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.push-tag").expect("Invalid selector"));
static PUSH_CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.push-content").expect("Invalid selector"));

/// Classes whose subtrees are left out of the body text.
const NON_BODY_CLASSES: &[&str] = &["article-metaline", "article-metaline-right", "push"];

/// Text content of an article page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleContent {
    pub title: String,
    pub author: Option<String>,
    pub published: Option<String>,
    /// Article body without the metadata header or comments.
    pub body_text: String,
    /// One `"<tag> <content>"` line per comment, in document order.
    pub comment_lines: Vec<String>,
}

impl ArticleContent {
    /// Comments joined with newlines.
    #[must_use]
    pub fn comments_text(&self) -> String {
        self.comment_lines.join("\n")
    }

    /// Body followed by the comments, as sent to the classifier.
    #[must_use]
    pub fn full_text(&self) -> String {
        if self.comment_lines.is_empty() {
            self.body_text.clone()
        } else {
            format!("{}\n\n{}", self.body_text, self.comments_text())
        }
    }
}

/// Extract the title, body and comments of an article page.
///
/// Never fails: a page missing any of the expected elements yields the
/// placeholder title and empty text for whatever could not be found.
#[must_use]
pub fn extract_article(html: &str) -> ArticleContent {
    let document = Html::parse_document(html);

    let mut title = None;
    let mut author = None;
    let mut published = None;
    for line in document.select(&METALINE_SELECTOR) {
        let tag = first_text(&line, &META_TAG_SELECTOR);
        let value = first_text(&line, &META_VALUE_SELECTOR);
        if value.is_empty() {
            continue;
        }
        match tag.as_str() {
            "標題" => title = Some(value),
            "作者" => author = Some(value),
            "時間" => published = Some(value),
            _ => {}
        }
    }

    let title = title
        .or_else(|| document_title(&document))
        .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string());

    let main = document.select(&MAIN_CONTENT_SELECTOR).next();
    let body_text = main.map(|m| body_text(&m)).unwrap_or_default();
    let comment_lines = main
        .map(|m| m.select(&PUSH_SELECTOR).filter_map(|p| comment_line(&p)).collect())
        .unwrap_or_default();

    ArticleContent {
        title,
        author,
        published,
        body_text,
        comment_lines,
    }
}

/// `<title>` text with the board suffix removed.
fn document_title(document: &Html) -> Option<String> {
    let raw: String = document.select(&TITLE_SELECTOR).next()?.text().collect();
    let title = raw.split(" - 看板").next().unwrap_or(&raw).trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Collect the text under `main`, skipping metadata lines and comments.
fn body_text(main: &ElementRef) -> String {
    let mut out = String::new();
    let mut stack = vec![**main];

    while let Some(node) = stack.pop() {
        if let Some(text) = node.value().as_text() {
            out.push_str(text);
            continue;
        }
        if let Some(element) = node.value().as_element() {
            if element.classes().any(|c| NON_BODY_CLASSES.contains(&c)) {
                continue;
            }
        }
        // Reverse so children pop in document order.
        stack.extend(node.children().rev());
    }

    out.trim().to_string()
}

fn comment_line(push: &ElementRef) -> Option<String> {
    let tag = first_text(push, &PUSH_TAG_SELECTOR);
    let content = first_text(push, &PUSH_CONTENT_SELECTOR);
    let content = content.trim_start_matches(':').trim();
    if tag.is_empty() && content.is_empty() {
        return None;
    }
    Some(format!("{tag} {content}").trim().to_string())
}

fn first_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html>
        <head><title>[標的] 2330 台積電 多 - 看板 Stock - 批踢踢實業坊</title></head>
        <body>
        <div id="main-content" class="bbs-screen bbs-content"><div class="article-metaline"><span class="article-meta-tag">作者</span><span class="article-meta-value">bull (多頭)</span></div><div class="article-metaline-right"><span class="article-meta-tag">看板</span><span class="article-meta-value">Stock</span></div><div class="article-metaline"><span class="article-meta-tag">標題</span><span class="article-meta-value">[標的] 2330 台積電 多</span></div><div class="article-metaline"><span class="article-meta-tag">時間</span><span class="article-meta-value">Tue Jan  2 10:00:00 2024</span></div>
1. 標的：2330
2. 分類：多
3. 分析：AI 需求強勁，營收創新高

--
<span class="f2">※ 發信站: 批踢踢實業坊(ptt.cc)</span>
<div class="push"><span class="hl push-tag">推 </span><span class="f3 hl push-userid">fan</span><span class="f3 push-content">: 噴出去</span><span class="push-ipdatetime"> 01/02 10:05</span></div>
<div class="push"><span class="f1 hl push-tag">噓 </span><span class="f3 hl push-userid">bear</span><span class="f3 push-content">: 套牢</span><span class="push-ipdatetime"> 01/02 10:06</span></div>
<div class="push"><span class="f1 hl push-tag">→ </span><span class="f3 hl push-userid">meh</span><span class="f3 push-content">: 觀望</span><span class="push-ipdatetime"> 01/02 10:07</span></div>
</div>
        </body></html>
    "#;

    #[test]
    fn test_extract_title_from_metaline() {
        let article = extract_article(ARTICLE);
        assert_eq!(article.title, "[標的] 2330 台積電 多");
        assert_eq!(article.author.as_deref(), Some("bull (多頭)"));
        assert_eq!(article.published.as_deref(), Some("Tue Jan  2 10:00:00 2024"));
    }

    #[test]
    fn test_body_excludes_metadata_and_comments() {
        let article = extract_article(ARTICLE);
        assert!(article.body_text.contains("AI 需求強勁"));
        assert!(article.body_text.contains("發信站"));
        assert!(!article.body_text.contains("作者"));
        assert!(!article.body_text.contains("看板"));
        assert!(!article.body_text.contains("噴出去"));
    }

    #[test]
    fn test_comment_lines_in_order() {
        let article = extract_article(ARTICLE);
        assert_eq!(article.comment_lines, vec!["推 噴出去", "噓 套牢", "→ 觀望"]);
        assert_eq!(article.comments_text(), "推 噴出去\n噓 套牢\n→ 觀望");
        assert!(article.full_text().ends_with("→ 觀望"));
    }

    #[test]
    fn test_title_falls_back_to_document_title() {
        let html = r#"<html><head><title>[新聞] 台股大漲 - 看板 Stock - 批踢踢實業坊</title></head>
            <body><div id="main-content">內文</div></body></html>"#;
        let article = extract_article(html);
        assert_eq!(article.title, "[新聞] 台股大漲");
        assert_eq!(article.body_text, "內文");
        assert!(article.comment_lines.is_empty());
    }

    #[test]
    fn test_broken_page_uses_placeholder() {
        let article = extract_article("<html><body><p>nothing here</p></body></html>");
        assert_eq!(article.title, UNTITLED_PLACEHOLDER);
        assert!(article.body_text.is_empty());
        assert!(article.comment_lines.is_empty());
        assert!(article.author.is_none());
    }
}
