use url::form_urlencoded;

/// Caller-supplied ticker, uppercased. No other normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker(String);

impl Ticker {
    /// A missing ticker normalizes to the empty string.
    pub fn normalize(raw: Option<&str>) -> Self {
        Self(raw.unwrap_or_default().to_uppercase())
    }

    /// Reads the first `ticker` pair of a raw query string; later repeats are ignored.
    pub fn from_query(query: Option<&str>) -> Self {
        let raw = query.and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "ticker")
                .map(|(_, value)| value.into_owned())
        });
        Self::normalize(raw.as_deref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keyword sent to the search-interest backend, e.g. `"AAPL stock"`.
    pub fn search_term(&self) -> String {
        format!("{} stock", self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
