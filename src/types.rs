use serde::Deserialize;

/// Parameters for the `search` endpoint.
///
/// Fields left unset are omitted from the query string entirely;
/// a field set to an empty string is sent as-is.
/// Values are opaque codes defined by the api and are passed through unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Category filter code, like "111"
    pub categories: Option<String>,

    /// Purity filter code for sfw/sketchy/nsfw, like "100"
    pub purity: Option<String>,

    /// Sorting criteria, like "relevance" or "random"
    pub sorting: Option<String>,

    /// Sort order, "desc" or "asc"
    pub order: Option<String>,

    /// Time range for the toplist, like "1d" or "1w"
    pub top_range: Option<String>,

    /// Minimum resolution, like "1920x1080"
    pub minimum_resolution: Option<String>,

    /// Exact resolutions, joined with commas on the wire
    pub resolutions: Vec<String>,

    /// Aspect ratios, joined with commas on the wire
    pub ratios: Vec<String>,

    /// Color filter
    pub colors: Option<String>,

    /// Page number
    pub page: Option<u64>,

    /// Seed for random sorting
    pub seed: Option<String>,
}

impl SearchQuery {
    /// Make an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marshal into query pairs, dropping unset fields.
    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(11);

        let scalars = [
            ("categories", &self.categories),
            ("purity", &self.purity),
            ("sorting", &self.sorting),
            ("order", &self.order),
            ("topRange", &self.top_range),
            // The api calls this "MinimumResolution", capital and all.
            ("MinimumResolution", &self.minimum_resolution),
        ];
        for (name, value) in scalars {
            if let Some(value) = value {
                pairs.push((name, value.clone()));
            }
        }

        if !self.resolutions.is_empty() {
            pairs.push(("resolutions", self.resolutions.join(",")));
        }
        if !self.ratios.is_empty() {
            pairs.push(("ratios", self.ratios.join(",")));
        }

        if let Some(colors) = self.colors.as_ref() {
            pairs.push(("colors", colors.clone()));
        }
        if let Some(page) = self.page {
            let mut buf = itoa::Buffer::new();
            pairs.push(("page", buf.format(page).to_string()));
        }
        if let Some(seed) = self.seed.as_ref() {
            pairs.push(("seed", seed.clone()));
        }

        pairs
    }
}

/// The body the api sends with a non-2xx status
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    /// The api's description of what went wrong
    pub(crate) message: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(SearchQuery::new().to_query_pairs().is_empty());
    }

    #[test]
    fn unset_fields_are_dropped() {
        let query = SearchQuery {
            categories: Some("111".to_string()),
            purity: Some("100".to_string()),
            page: Some(1),
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("categories", "111".to_string()),
                ("purity", "100".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }

    #[test]
    fn empty_string_is_not_unset() {
        let query = SearchQuery {
            seed: Some(String::new()),
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(pairs, vec![("seed", String::new())]);
    }

    #[test]
    fn lists_are_comma_joined() {
        let query = SearchQuery {
            resolutions: vec!["1920x1080".to_string(), "2560x1440".to_string()],
            ratios: vec!["16x9".to_string()],
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("resolutions", "1920x1080,2560x1440".to_string()),
                ("ratios", "16x9".to_string()),
            ]
        );
    }

    #[test]
    fn parse_error_response() {
        let response: ErrorResponse =
            serde_json::from_str("{\"message\":\"API Authentication failed.\"}")
                .expect("failed to parse error response");
        assert_eq!(response.message, "API Authentication failed.");
    }
}
