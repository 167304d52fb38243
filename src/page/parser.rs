//! HTML parser for extracting words and links
//!
//! This module handles parsing HTML content to extract:
//! - The visible body text, tallied by word
//! - Links to follow (from <a> tags)

use crate::page::PageData;
use crate::url::{resolve_link, PatternSet};
use scraper::{Html, Node, Selector};
use std::collections::HashMap;
use url::Url;

/// Parses HTML content into a word tally and a list of links
///
/// # Word Rules
///
/// - Only text inside `<body>` counts; `<script>`, `<style>` and
///   `<noscript>` contents are skipped
/// - Words are split on whitespace, stripped of non-word characters and
///   lowercased
/// - Words fully matching any `ignored_words` pattern are dropped
///
/// # Link Rules
///
/// - `<a href="...">` resolved against `base_url`
/// - `<a download>` links are skipped
/// - `javascript:`, `mailto:`, `tel:`, data URIs and fragment-only hrefs are skipped
///
/// # Example
///
/// ```
/// use url::Url;
/// use word_tally::page::parse_html;
/// use word_tally::url::PatternSet;
///
/// let html = r#"<html><body>Hello hello <a href="/next">world</a></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, &base, &PatternSet::default());
/// assert_eq!(page.word_counts["hello"], 2);
/// assert_eq!(page.links, vec!["https://example.com/next"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, ignored_words: &PatternSet) -> PageData {
    let document = Html::parse_document(html);

    let text = extract_body_text(&document);
    let word_counts = tally_words(&text, ignored_words);
    let links = extract_links(&document, base_url);

    PageData { word_counts, links }
}

/// Counts the words in `text`, skipping ignored words
pub fn tally_words(text: &str, ignored_words: &PatternSet) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    for raw in text.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .flat_map(char::to_lowercase)
            .collect();

        if word.is_empty() || ignored_words.matches(&word) {
            continue;
        }

        *counts.entry(word).or_insert(0) += 1;
    }

    counts
}

/// Collects the text of the document body, leaving out non-visible elements
fn extract_body_text(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    let mut text = String::new();
    for body in document.select(&body_selector) {
        for node in body.descendants() {
            let Node::Text(fragment) = node.value() else {
                continue;
            };

            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
            if hidden {
                continue;
            }

            text.push_str(fragment);
            text.push(' ');
        }
    }

    text
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}
