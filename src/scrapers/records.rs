//! Locating entry elements in a listing page.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("valid selector"));

/// Every `<article>` element in page order, unfiltered.
///
/// An empty listing yields an empty vector.
pub fn extract_records(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&ARTICLE).collect()
}

/// The next element after `start` in document order that satisfies `pred`,
/// searching `start`'s descendants before its following siblings and the
/// siblings of its ancestors.
pub fn find_next<'a>(
    start: ElementRef<'a>,
    pred: impl Fn(&ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    if let Some(found) = start
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| pred(el))
    {
        return Some(found);
    }

    let mut node = Some(*start);
    while let Some(current) = node {
        for sibling in current.next_siblings() {
            if let Some(found) = sibling
                .descendants()
                .filter_map(ElementRef::wrap)
                .find(|el| pred(el))
            {
                return Some(found);
            }
        }
        node = current.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_page_order() {
        let html = Html::parse_document(
            r#"<main>
                <article id="a1"></article>
                <div><article id="a2"></article></div>
                <article id="a3"></article>
            </main>"#,
        );
        let ids: Vec<_> = extract_records(&html)
            .iter()
            .filter_map(|r| r.value().attr("id"))
            .collect();
        assert_eq!(ids, ["a1", "a2", "a3"]);
    }

    #[test]
    fn test_no_records_is_empty() {
        let html = Html::parse_document("<main><p>nothing today</p></main>");
        assert!(extract_records(&html).is_empty());
    }

    #[test]
    fn test_find_next_prefers_descendants() {
        let html = Html::parse_document(
            r#"<div><a id="start"><time id="inner"></time></a><span id="after"></span></div>"#,
        );
        let sel = Selector::parse("#start").unwrap();
        let start = html.select(&sel).next().unwrap();
        let next = find_next(start, |_| true).unwrap();
        assert_eq!(next.value().attr("id"), Some("inner"));
    }

    #[test]
    fn test_find_next_walks_out_of_parent() {
        let html = Html::parse_document(
            r#"<section><h2 id="start">Heading</h2></section><p><a id="link" href="/x"></a></p>"#,
        );
        let sel = Selector::parse("#start").unwrap();
        let start = html.select(&sel).next().unwrap();
        let next = find_next(start, |el| el.value().name() == "a").unwrap();
        assert_eq!(next.value().attr("id"), Some("link"));
    }

    #[test]
    fn test_find_next_none() {
        let html = Html::parse_document(r#"<div><h2 id="start"></h2></div>"#);
        let sel = Selector::parse("#start").unwrap();
        let start = html.select(&sel).next().unwrap();
        assert!(find_next(start, |el| el.value().name() == "a").is_none());
    }
}
