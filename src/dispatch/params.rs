// Query parameter parsing for the dataset action

use std::collections::BTreeMap;

/// Page window requested by a `get-tenders` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub limit: u64,
    pub offset: u64,
}

impl Paging {
    /// Read `limit`, `offset` and `page` from query parameters.
    ///
    /// Values that are not positive integers fall back to the defaults instead
    /// of failing. `page` (1-based) is only used when `offset` is absent; an
    /// `offset` that is present but unparsable means 0.
    pub fn from_params(params: &BTreeMap<String, String>, default_limit: u64, max_limit: u64) -> Self {
        let mut limit = parse_positive(params.get("limit")).unwrap_or(default_limit);
        if max_limit > 0 {
            limit = limit.min(max_limit);
        }

        let offset = if params.contains_key("offset") {
            parse_count(params.get("offset")).unwrap_or(0)
        } else {
            parse_positive(params.get("page")).map_or(0, |page| (page - 1).saturating_mul(limit))
        };

        Self { limit, offset }
    }
}

fn parse_count(value: Option<&String>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

fn parse_positive(value: Option<&String>) -> Option<u64> {
    parse_count(value).filter(|n| *n > 0)
}
