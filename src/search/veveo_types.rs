/// Search service response types for deserialization.
///
/// These structures mirror the `VtvRsps` markup returned by the search
/// endpoint. Only the parts the analyzer needs are modelled.
use serde::Deserialize;

/// The top-level `VtvRsps` document.
#[derive(Debug, Deserialize)]
pub(super) struct VtvRsps {
    #[serde(rename = "RC", default)]
    pub result_container: Option<ResultContainer>,
}

/// The `RC` element wrapping the result list.
#[derive(Debug, Deserialize)]
pub(super) struct ResultContainer {
    #[serde(rename = "CNs", default)]
    pub contents: Option<Contents>,
}

/// The `CNs` element: result count plus the individual items.
#[derive(Debug, Deserialize)]
pub(super) struct Contents {
    /// Result count; the service sends it as an attribute, older
    /// configurations as a child element
    #[serde(rename = "@n", alias = "n", default)]
    pub count: Option<usize>,
    #[serde(rename = "CI", default)]
    pub items: Vec<ContentItem>,
}

/// A single `CI` result item.
///
/// `G`, `ZL` and other per-item fields are not needed and are skipped.
#[derive(Debug, Deserialize)]
pub(super) struct ContentItem {
    /// Display title
    #[serde(rename = "T", default)]
    pub title: Option<String>,
    /// Item type; `"No Results"` marks an empty result set
    #[serde(rename = "TYP", default)]
    pub item_type: Option<String>,
    #[serde(rename = "mtinfo", default)]
    pub match_info: Option<MatchInfo>,
}

/// The `mtinfo` element describing why an item matched.
#[derive(Debug, Deserialize)]
pub(super) struct MatchInfo {
    /// Matched display text, possibly with `<em>` markup
    #[serde(default)]
    pub mt: Option<MarkupText>,
    /// Name of the matched field, e.g. "Title"
    #[serde(default)]
    pub mtfn: Option<String>,
}

/// Text that may carry emphasis markup.
///
/// The service sends `mt` either as CDATA (`<![CDATA[a<em>b</em>]]>`) or as
/// mixed content with real `<em>` elements. Both come back as the same
/// markup string from [`MarkupText::into_markup`].
#[derive(Debug, Default, Deserialize)]
pub(super) struct MarkupText {
    #[serde(rename = "$value", default)]
    nodes: Vec<MarkupNode>,
}

#[derive(Debug, Deserialize)]
enum MarkupNode {
    #[serde(rename = "$text")]
    Text(String),
    #[serde(rename = "em")]
    Emphasis(String),
}

impl MarkupText {
    pub fn into_markup(self) -> String {
        let mut markup = String::new();
        for node in self.nodes {
            match node {
                MarkupNode::Text(text) => markup.push_str(&text),
                MarkupNode::Emphasis(text) => {
                    markup.push_str("<em>");
                    markup.push_str(&text);
                    markup.push_str("</em>");
                }
            }
        }
        markup
    }
}
