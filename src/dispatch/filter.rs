// Row filters for the dataset action
//
// `status`, `entity`, `category` and `days_remaining` narrow `get-tenders`
// results; they are sent to the dataset service as one `where` condition.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::DispatchError;

/// Column holding the tender status
pub const STATUS_COLUMN: &str = "status";
/// Column holding the procuring entity name
pub const ENTITY_COLUMN: &str = "procuring_entity";
pub const CATEGORY_COLUMN: &str = "category";
pub const DAYS_REMAINING_COLUMN: &str = "days_remaining";
/// Column holding the tender reference used for single-tender lookups
pub const REFERENCE_COLUMN: &str = "reference";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenderStatus {
    Open,
    ClosingSoon,
    Closed,
}

impl TenderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::ClosingSoon => "closing_soon",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for TenderStatus {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closing_soon" => Ok(Self::ClosingSoon),
            "closed" => Ok(Self::Closed),
            other => Err(DispatchError::InvalidFilter {
                name: STATUS_COLUMN,
                value: other.to_string(),
            }),
        }
    }
}

/// Filters requested by a `get-tenders` call. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderFilter {
    pub status: Option<TenderStatus>,
    /// Case-insensitive substring of the procuring entity
    pub entity: Option<String>,
    /// Case-insensitive substring of the category
    pub category: Option<String>,
    /// Keep tenders closing within this many days
    pub days_remaining: Option<i64>,
}

impl TenderFilter {
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self, DispatchError> {
        let status = non_empty(params, "status")
            .map(str::parse::<TenderStatus>)
            .transpose()?;
        let days_remaining = non_empty(params, "days_remaining")
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| DispatchError::InvalidFilter {
                    name: DAYS_REMAINING_COLUMN,
                    value: raw.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            status,
            entity: non_empty(params, "entity").map(str::to_string),
            category: non_empty(params, "category").map(str::to_string),
            days_remaining,
        })
    }

    /// Conditions joined with `AND`, or `None` when nothing is filtered
    pub fn where_clause(&self) -> Option<String> {
        let mut conditions = Vec::new();
        if let Some(status) = self.status {
            conditions.push(format!(
                "\"{STATUS_COLUMN}\" = {}",
                quote(status.as_str())
            ));
        }
        if let Some(entity) = &self.entity {
            conditions.push(contains(ENTITY_COLUMN, entity));
        }
        if let Some(category) = &self.category {
            conditions.push(contains(CATEGORY_COLUMN, category));
        }
        if let Some(days) = self.days_remaining {
            conditions.push(format!("\"{DAYS_REMAINING_COLUMN}\" <= {days}"));
        }

        if conditions.is_empty() {
            None
        } else {
            Some(conditions.join(" AND "))
        }
    }
}

/// Condition matching one tender by reference
pub fn reference_clause(reference: &str) -> String {
    format!("\"{REFERENCE_COLUMN}\" = {}", quote(reference))
}

fn non_empty<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn contains(column: &str, needle: &str) -> String {
    format!("\"{column}\" ILIKE {}", quote(&format!("%{needle}%")))
}

/// SQL string literal; embedded quotes are doubled
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
