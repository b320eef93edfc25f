//! Response analysis
//!
//! Turns a raw search response into a per-title outcome: either the service
//! knows nothing about the title, or it lists candidate matches.

use super::veveo_types::{ContentItem, VtvRsps};
use thiserror::Error;

/// Item type the service uses to mark an empty result set
pub const NO_RESULTS_SENTINEL: &str = "No Results";

/// Errors that can occur while analyzing a search response
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The response body is not a well-formed search response
    #[error("Malformed search response for '{title}': {reason}")]
    Malformed { title: String, reason: String },
}

/// A candidate match reported by the search service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Matched display text (`mt`), markup left intact
    pub text: String,
    /// Name of the matched field (`mtfn`), e.g. "Title"
    pub field_name: Option<String>,
    /// Display title of the item (`T`)
    pub item_title: Option<String>,
    /// Item type (`TYP`)
    pub item_type: Option<String>,
}

impl From<ContentItem> for Match {
    fn from(item: ContentItem) -> Self {
        let (text, field_name) = match item.match_info {
            Some(info) => (
                info.mt.map(|mt| mt.into_markup()).unwrap_or_default(),
                info.mtfn,
            ),
            None => (String::new(), None),
        };
        Match {
            text,
            field_name,
            item_title: item.title,
            item_type: item.item_type,
        }
    }
}

/// Classification of a single title's search response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service returned its "No Results" marker
    NoMatch { title: String },
    /// The service returned candidate matches (possibly none)
    Matches { title: String, matches: Vec<Match> },
}

impl Outcome {
    /// The title that was searched for
    pub fn title(&self) -> &str {
        match self {
            Outcome::NoMatch { title } | Outcome::Matches { title, .. } => title,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Outcome::NoMatch { .. })
    }

    /// Matched display texts in response order; empty for `NoMatch`
    pub fn matched_texts(&self) -> Vec<&str> {
        match self {
            Outcome::NoMatch { .. } => Vec::new(),
            Outcome::Matches { matches, .. } => matches.iter().map(|m| m.text.as_str()).collect(),
        }
    }
}

/// Analyzes the search response returned for `title`
///
/// A response with a count of one whose only item carries the
/// `"No Results"` type is a `NoMatch`. Every other well-formed response is
/// `Matches`, with one entry per `CI` item. When the count is missing it is
/// taken from the number of items.
///
/// # Errors
///
/// Returns `AnalyzeError::Malformed` if the body is not valid UTF-8 or not a
/// well-formed response document.
pub fn analyze(title: &str, body: &[u8]) -> Result<Outcome, AnalyzeError> {
    let malformed = |reason: String| AnalyzeError::Malformed {
        title: title.to_string(),
        reason,
    };

    let text = std::str::from_utf8(body).map_err(|e| malformed(e.to_string()))?;
    let response: VtvRsps = quick_xml::de::from_str(text).map_err(|e| malformed(e.to_string()))?;

    let (count, items) = match response.result_container.and_then(|rc| rc.contents) {
        Some(contents) => {
            let count = contents.count.unwrap_or(contents.items.len());
            (count, contents.items)
        }
        None => (0, Vec::new()),
    };

    let is_sentinel = count == 1
        && items.len() == 1
        && items[0].item_type.as_deref().map(str::trim) == Some(NO_RESULTS_SENTINEL);

    if is_sentinel {
        return Ok(Outcome::NoMatch {
            title: title.to_string(),
        });
    }

    Ok(Outcome::Matches {
        title: title.to_string(),
        matches: items.into_iter().map(Match::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(count: usize, items: &str) -> String {
        format!(r#"<VtvRsps><RC><CNs n="{count}">{items}</CNs></RC></VtvRsps>"#)
    }

    fn item(mt: &str) -> String {
        format!(
            "<CI><T>{mt}</T><TYP>Program</TYP><mtinfo><mt><![CDATA[{mt}]]></mt><mtfn>Title</mtfn></mtinfo></CI>"
        )
    }

    #[test]
    fn test_no_results_sentinel() {
        let body = response(1, "<CI><T>none</T><TYP>No Results</TYP></CI>");
        let outcome = analyze("サンプル番組", body.as_bytes()).unwrap();
        assert_eq!(
            outcome,
            Outcome::NoMatch {
                title: "サンプル番組".to_string()
            }
        );
        assert!(outcome.matched_texts().is_empty());
    }

    #[test]
    fn test_two_matches() {
        let body = response(2, &(item("Program A") + &item("Program B")));
        let outcome = analyze("サンプル番組", body.as_bytes()).unwrap();
        assert!(!outcome.is_no_match());
        assert_eq!(outcome.title(), "サンプル番組");
        assert_eq!(outcome.matched_texts(), vec!["Program A", "Program B"]);

        let Outcome::Matches { matches, .. } = outcome else {
            panic!("expected matches");
        };
        assert_eq!(matches[0].field_name.as_deref(), Some("Title"));
        assert_eq!(matches[0].item_type.as_deref(), Some("Program"));
    }

    #[test]
    fn test_single_real_match_is_not_sentinel() {
        let body = response(1, &item("Program A"));
        let outcome = analyze("Program", body.as_bytes()).unwrap();
        assert_eq!(outcome.matched_texts(), vec!["Program A"]);
    }

    #[test]
    fn test_zero_results_is_empty_match_list() {
        let body = response(0, "");
        let outcome = analyze("Program", body.as_bytes()).unwrap();
        assert!(!outcome.is_no_match());
        assert!(outcome.matched_texts().is_empty());
    }

    #[test]
    fn test_sentinel_with_larger_count_is_a_match() {
        let body = response(2, "<CI><TYP>No Results</TYP></CI><CI><TYP>No Results</TYP></CI>");
        let outcome = analyze("Program", body.as_bytes()).unwrap();
        assert!(!outcome.is_no_match());
        assert_eq!(outcome.matched_texts().len(), 2);
    }

    #[test]
    fn test_emphasis_markup_is_kept() {
        let body = response(
            1,
            "<CI><TYP>Program</TYP><mtinfo><mt><![CDATA[ワンチョ -<em>伝</em>説の英雄-]]></mt><mtfn>Title</mtfn></mtinfo></CI>",
        );
        let outcome = analyze("ワンチョ", body.as_bytes()).unwrap();
        assert_eq!(outcome.matched_texts(), vec!["ワンチョ -<em>伝</em>説の英雄-"]);
    }

    #[test]
    fn test_emphasis_elements_are_kept_as_markup() {
        let body = response(
            1,
            "<CI><TYP>Program</TYP><mtinfo><mt>ワンチョ -<em>伝</em>説の英雄-</mt><mtfn>Title</mtfn></mtinfo></CI>",
        );
        let outcome = analyze("ワンチョ", body.as_bytes()).unwrap();
        assert!(!outcome.is_no_match());
        assert_eq!(outcome.matched_texts(), vec!["ワンチョ -<em>伝</em>説の英雄-"]);
    }

    #[test]
    fn test_empty_match_text() {
        let body = response(1, "<CI><TYP>Program</TYP><mtinfo><mt/><mtfn>Title</mtfn></mtinfo></CI>");
        let outcome = analyze("Program", body.as_bytes()).unwrap();
        assert_eq!(outcome.matched_texts(), vec![""]);
    }

    #[test]
    fn test_count_as_child_element() {
        let body = "<VtvRsps><RC><CNs><n>1</n><CI><TYP>No Results</TYP></CI></CNs></RC></VtvRsps>";
        let outcome = analyze("Program", body.as_bytes()).unwrap();
        assert!(outcome.is_no_match());
    }

    #[test]
    fn test_missing_count_uses_item_count() {
        let body = "<VtvRsps><RC><CNs><CI><TYP>No Results</TYP></CI></CNs></RC></VtvRsps>";
        let outcome = analyze("Program", body.as_bytes()).unwrap();
        assert!(outcome.is_no_match());
    }

    #[test]
    fn test_item_without_match_info() {
        let body = response(1, "<CI><T>Program A</T><TYP>Program</TYP></CI>");
        let outcome = analyze("Program", body.as_bytes()).unwrap();
        let Outcome::Matches { matches, .. } = outcome else {
            panic!("expected matches");
        };
        assert_eq!(matches[0].text, "");
        assert_eq!(matches[0].item_title.as_deref(), Some("Program A"));
    }

    #[test]
    fn test_malformed_response() {
        let result = analyze("Program", b"<VtvRsps><RC><CNs n=\"1\"><CI></RC></VtvRsps>");
        assert!(matches!(result, Err(AnalyzeError::Malformed { title, .. }) if title == "Program"));
    }
}
