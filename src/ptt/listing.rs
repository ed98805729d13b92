//! Board listing page parsing and candidate filtering.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::constants::{PUSH_OVERFLOW_TOKEN, PUSH_OVERFLOW_VALUE, TARGET_MARKER};
use crate::models::Category;

static ENTRY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.r-ent").expect("Invalid selector"));
static TITLE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.title a[href]").expect("Invalid selector"));
static PUSH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.nrec").expect("Invalid selector"));
static AUTHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.meta div.author").expect("Invalid selector"));
static DATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.meta div.date").expect("Invalid selector"));
static PAGING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.btn-group-paging a[href]").expect("Invalid selector")
});

/// First run of exactly four digits not touching other digits.
static STOCK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{4})(?:[^0-9]|$)").expect("Invalid regex"));

/// One row of a board listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    /// Absolute URL of the article.
    pub link: String,
    pub author: String,
    pub date: String,
    /// Push count as displayed.
    pub push_count: String,
    /// Push count for comparisons.
    pub push_value: u32,
}

/// A parsed listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    /// Absolute URL of the previous (older) page, if the page links one.
    pub prev_page_url: Option<String>,
}

/// Parse a board listing page.
///
/// Rows without an article link (deleted posts) are skipped. Relative links
/// are resolved against `page_url`.
#[must_use]
pub fn parse_listing(html: &str, page_url: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let entries = document
        .select(&ENTRY_SELECTOR)
        .filter_map(|row| parse_entry(&row, base.as_ref()))
        .collect();

    let prev_page_url = document
        .select(&PAGING_SELECTOR)
        .find(|a| element_text(a).contains("上頁"))
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve(base.as_ref(), href));

    ListingPage {
        entries,
        prev_page_url,
    }
}

fn parse_entry(row: &ElementRef, base: Option<&Url>) -> Option<ListingEntry> {
    let anchor = row.select(&TITLE_LINK_SELECTOR).next()?;
    let href = anchor.value().attr("href")?;
    let link = resolve(base, href)?;

    let push_count = first_text(row, &PUSH_SELECTOR);
    let push_value = normalize_push_count(&push_count);

    Some(ListingEntry {
        title: element_text(&anchor),
        link,
        author: first_text(row, &AUTHOR_SELECTOR),
        date: first_text(row, &DATE_SELECTOR),
        push_count,
        push_value,
    })
}

/// Convert a push-count display token into a comparable number.
///
/// `"爆"` compares as 100. Digits parse as themselves. Everything else,
/// including the empty string and the `X1`..`XX` down-vote markers, is 0.
#[must_use]
pub fn normalize_push_count(token: &str) -> u32 {
    let token = token.trim();
    if token == PUSH_OVERFLOW_TOKEN {
        return PUSH_OVERFLOW_VALUE;
    }
    token.parse().unwrap_or(0)
}

/// Decide whether a listing entry is worth analyzing.
///
/// Titles with the target marker are always kept. Other posts are kept only
/// when their push count is strictly above `popularity_threshold`.
#[must_use]
pub fn categorize(title: &str, push_value: u32, popularity_threshold: u32) -> Option<Category> {
    if title.contains(TARGET_MARKER) {
        Some(Category::Target)
    } else if push_value > popularity_threshold {
        Some(Category::Other)
    } else {
        None
    }
}

/// Extract the first standalone 4-digit ticker from a title.
#[must_use]
pub fn extract_stock_id(title: &str) -> Option<String> {
    STOCK_ID_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}

fn first_text(row: &ElementRef, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
