pub(crate) mod roster;

use ::scraper::{ElementRef, Selector};

/// All text beneath `element`, concatenated and trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matching `selector` inside `element`,
/// or `None` if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|e| element_text(&e))
}

/// Make a site-relative link absolute by prefixing `origin`. Anything else is
/// returned unchanged.
pub(crate) fn normalize_link(href: &str, origin: &str) -> String {
    if href.starts_with('/') {
        format!("{}{href}", origin.trim_end_matches('/'))
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use ::scraper::Html;

    use super::*;

    #[test]
    fn test_normalize_link() {
        assert_eq!(
            normalize_link("/player/123/john-smith", "https://www.eliteprospects.com"),
            "https://www.eliteprospects.com/player/123/john-smith"
        );
        assert_eq!(
            normalize_link("/player/123/john-smith", "https://www.eliteprospects.com/"),
            "https://www.eliteprospects.com/player/123/john-smith"
        );
        assert_eq!(
            normalize_link(
                "https://www.eliteprospects.com/player/123/john-smith",
                "https://www.eliteprospects.com"
            ),
            "https://www.eliteprospects.com/player/123/john-smith"
        );
        assert_eq!(normalize_link("", "https://www.eliteprospects.com"), "");
    }

    #[test]
    fn test_text_helpers() {
        let fragment = Html::parse_fragment("<div>  Tempe, <a class=\"x\"> AZ </a>\n</div>");
        let div = Selector::parse("div").unwrap();
        let anchor = Selector::parse("a.x").unwrap();
        let missing = Selector::parse("span").unwrap();
        let root = fragment.select(&div).next().unwrap();

        assert_eq!(element_text(&root), "Tempe,  AZ");
        assert_eq!(select_text(&root, &anchor).as_deref(), Some("AZ"));
        assert_eq!(select_text(&root, &missing), None);
    }
}
