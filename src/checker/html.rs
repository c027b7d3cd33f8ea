// src/checker/html.rs
// =============================================================================
// This module pulls the raw href values out of a fetched page.
//
// We use the `lol_html` crate which:
// - Tokenizes HTML as a stream, chunk by chunk, without building a DOM
// - Keeps every attribute of a start tag in source order, duplicates included
// - Copes with broken markup; if it ever gives up, extraction simply stops
//   there and whatever was found so far is kept
//
// Only <a> start tags are looked at. The values are returned exactly as they
// appear in the page: turning them into full link references is the job of
// crawl::normalize.
// =============================================================================

use lol_html::{element, HtmlRewriter, Settings};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// How much of the body is handed to the tokenizer per step.
const CHUNK_SIZE: usize = 4096;

type Found = Rc<RefCell<VecDeque<String>>>;

fn discard(_: &[u8]) {}

/// Lazy iterator over the href of every anchor in a page body, in document
/// order.
///
/// The body is fed to the tokenizer one chunk at a time, only when the hrefs
/// found so far have been consumed. When an anchor carries several href
/// attributes the last one wins. Anchors without href are skipped; an empty
/// href is still yielded.
pub struct AnchorHrefs<'b> {
    rewriter: Option<HtmlRewriter<'static, fn(&[u8])>>,
    chunks: std::slice::Chunks<'b, u8>,
    found: Found,
}

impl<'b> AnchorHrefs<'b> {
    pub fn new(body: &'b [u8]) -> Self {
        let found: Found = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&found);

        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!("a", move |el| {
                    let href = el
                        .attributes()
                        .iter()
                        .filter(|attr| attr.name() == "href")
                        .last()
                        .map(|attr| attr.value());
                    if let Some(href) = href {
                        sink.borrow_mut().push_back(href);
                    }
                    Ok(())
                })],
                ..Settings::default()
            },
            discard as fn(&[u8]),
        );

        Self {
            rewriter: Some(rewriter),
            chunks: body.chunks(CHUNK_SIZE),
            found,
        }
    }
}

impl Iterator for AnchorHrefs<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(href) = self.found.borrow_mut().pop_front() {
                return Some(href);
            }

            // No rewriter left means the document ended (or the tokenizer
            // gave up) and everything found has been handed out.
            let mut rewriter = self.rewriter.take()?;
            match self.chunks.next() {
                Some(chunk) => {
                    if rewriter.write(chunk).is_ok() {
                        self.rewriter = Some(rewriter);
                    }
                }
                None => {
                    let _ = rewriter.end();
                }
            }
        }
    }
}

/// Collects every anchor href of a page body into owned strings.
///
/// `AnchorHrefs` is not `Send`, so async code that has to await between
/// links uses this instead of holding the iterator across an await point.
pub fn extract_hrefs(body: &[u8]) -> Vec<String> {
    AnchorHrefs::new(body).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(html: &str) -> Vec<String> {
        extract_hrefs(html.as_bytes())
    }

    #[test]
    fn test_extracts_anchor_hrefs_in_document_order() {
        let html = r#"
            <html><body>
                <a href="https://www.rust-lang.org">Rust</a>
                <p>text <a href="/docs">Docs</a></p>
                <a href="mailto:a@b.com">Mail</a>
            </body></html>
        "#;
        assert_eq!(
            hrefs(html),
            vec!["https://www.rust-lang.org", "/docs", "mailto:a@b.com"]
        );
    }

    #[test]
    fn test_skips_anchors_without_href() {
        let html = r#"<a name="top">Top</a><a href="about">About</a>"#;
        assert_eq!(hrefs(html), vec!["about"]);
    }

    #[test]
    fn test_empty_href_is_kept() {
        assert_eq!(hrefs(r#"<a href="">self</a>"#), vec![""]);
    }

    #[test]
    fn test_last_duplicate_href_wins() {
        assert_eq!(hrefs(r#"<a href="/first" href="/last">x</a>"#), vec!["/last"]);
        assert_eq!(
            hrefs(r#"<a href="/a" title="t" href="/b" href="/c">x</a>"#),
            vec!["/c"]
        );
    }

    #[test]
    fn test_ignores_href_on_other_tags() {
        let html = r#"
            <link href="/style.css" rel="stylesheet">
            <area href="/map">
            <base href="https://cdn.example.com/">
            <a href="/only-this">x</a>
        "#;
        assert_eq!(hrefs(html), vec!["/only-this"]);
    }

    #[test]
    fn test_keeps_href_values_verbatim() {
        let html = r#"<a href="../up?q=1#frag">Up</a><a href="//cdn.example.com/x">CDN</a>"#;
        assert_eq!(hrefs(html), vec!["../up?q=1#frag", "//cdn.example.com/x"]);
    }

    #[test]
    fn test_malformed_markup_yields_partial_results() {
        let html = r#"<div><a href="/first">one<a href="/second">two</div><a href="/third"#;
        let found = hrefs(html);
        assert!(found.starts_with(&["/first".to_string(), "/second".to_string()]));
    }

    #[test]
    fn test_links_across_chunk_boundaries() {
        let html: String = (0..CHUNK_SIZE / 8)
            .map(|i| format!(r#"<p><a href="/page/{}">p</a></p>"#, i))
            .collect();
        assert!(html.len() > CHUNK_SIZE * 2);

        let found = hrefs(&html);
        assert_eq!(found.len(), CHUNK_SIZE / 8);
        assert_eq!(found[0], "/page/0");
        assert_eq!(found[found.len() - 1], format!("/page/{}", CHUNK_SIZE / 8 - 1));
    }

    #[test]
    fn test_anchor_hrefs_is_lazy_over_the_body() {
        let mut iter = AnchorHrefs::new(br#"<a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>"#);
        assert_eq!(iter.next().as_deref(), Some("/a"));
        assert_eq!(iter.next().as_deref(), Some("/b"));
        assert_eq!(iter.next().as_deref(), Some("/c"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_empty_body_has_no_links() {
        assert!(extract_hrefs(b"").is_empty());
    }
}
