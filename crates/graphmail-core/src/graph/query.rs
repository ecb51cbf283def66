//! Structured OData query building for message listings.

use url::Url;

/// Query options for a message listing.
///
/// Values are attached through [`Url::query_pairs_mut`], so filter and
/// search text is always percent-encoded; callers cannot smuggle extra
/// query parameters through free text.
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    top: Option<u32>,
    filter: Option<String>,
    search: Option<String>,
}

impl MessageQuery {
    /// Creates an empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            top: None,
            filter: None,
            search: None,
        }
    }

    /// Caps the number of returned messages (`$top`).
    #[must_use]
    pub const fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Applies an OData filter expression (`$filter`), e.g.
    /// `isRead eq false`.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Applies a full-text search term (`$search`). Graph requires the
    /// value quoted; embedded quotes are stripped so free text cannot
    /// terminate the quoting.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Attaches the query options to a request URL.
    pub fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(top) = self.top {
            pairs.append_pair("$top", &top.to_string());
        }
        if let Some(filter) = &self.filter {
            pairs.append_pair("$filter", filter);
        }
        if let Some(search) = &self.search {
            let term = search.replace('"', "");
            pairs.append_pair("$search", &format!("\"{term}\""));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn applied(query: &MessageQuery) -> String {
        let mut url = Url::parse("https://graph.microsoft.com/v1.0/me/messages").unwrap();
        query.apply(&mut url);
        url.query().unwrap_or_default().to_string()
    }

    #[test]
    fn test_empty_query_adds_nothing() {
        let mut url = Url::parse("https://graph.microsoft.com/v1.0/me/messages").unwrap();
        MessageQuery::new().apply(&mut url);
        assert!(url.query().is_none() || url.query() == Some(""));
    }

    #[test]
    fn test_top_and_filter() {
        let query = MessageQuery::new().top(10).filter("isRead eq false");
        assert_eq!(applied(&query), "%24top=10&%24filter=isRead+eq+false");
    }

    #[test]
    fn test_search_is_quoted_and_encoded() {
        let query = MessageQuery::new().search("quarterly report");
        assert_eq!(applied(&query), "%24search=%22quarterly+report%22");
    }

    #[test]
    fn test_search_cannot_break_out_of_quotes() {
        let query = MessageQuery::new().search("a\"&$select=secret");
        let encoded = applied(&query);
        // The payload stays inside one encoded $search value.
        assert!(encoded.starts_with("%24search=%22"));
        assert!(!encoded.contains("&$select"));
    }
}
