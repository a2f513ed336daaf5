//! Query validation: raw string key-value pairs in, a typed bounded
//! `EventQuery` out, or one aggregated failure listing every bad field.

use std::collections::HashMap;

use sightline_common::{Category, FieldError, Severity, SightlineError};

/// Hard ceiling on page size; the list endpoint clamps to this again as a
/// second safety net.
pub const MAX_PAGE_SIZE: usize = 500;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    CreatedAt,
    Severity,
    Score,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "createdAt" => Some(SortBy::CreatedAt),
            "severity" => Some(SortBy::Severity),
            "score" => Some(SortBy::Score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }
}

/// A validated, bounded query. Absent filters match everything.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub q: Option<String>,
    pub category: Option<Category>,
    pub severity: Option<Severity>,
    pub min_score: Option<f64>,
    /// Relative window; wins over start/end when both are present.
    pub days: Option<i64>,
    /// Raw bound strings; the filter ignores bounds that fail to parse.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
    pub page: usize,
    pub page_size: usize,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            q: None,
            category: None,
            severity: None,
            min_score: None,
            days: None,
            start_date: None,
            end_date: None,
            sort_by: SortBy::default(),
            sort_dir: SortDir::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Validate raw query parameters. Unknown keys are ignored; empty values
/// count as absent. Failures accumulate across all fields; the query is
/// never partially applied.
pub fn validate_query(raw: &HashMap<String, String>) -> Result<EventQuery, SightlineError> {
    let mut errors: Vec<FieldError> = Vec::new();
    let mut query = EventQuery::default();

    let get = |key: &str| raw.get(key).map(String::as_str).filter(|v| !v.is_empty());

    query.q = get("q").map(str::to_string);

    if let Some(value) = get("category") {
        match Category::parse(value) {
            Some(category) => query.category = Some(category),
            None => errors.push(FieldError::new(
                "category",
                "must be one of Fraud, Ops, Safety, Sales, Health",
            )),
        }
    }

    if let Some(value) = get("severity") {
        match Severity::parse(value) {
            Some(severity) => query.severity = Some(severity),
            None => errors.push(FieldError::new("severity", "must be one of Low, Medium, High")),
        }
    }

    if let Some(value) = get("minScore") {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && (0.0..=100.0).contains(&n) => query.min_score = Some(n),
            _ => errors.push(FieldError::new(
                "minScore",
                "must be a number between 0 and 100",
            )),
        }
    }

    if let Some(value) = get("days") {
        match value.parse::<i64>() {
            Ok(n) if n == 7 || n == 30 => query.days = Some(n),
            _ => errors.push(FieldError::new("days", "must be 7 or 30")),
        }
    }

    // Bound strings pass through unvalidated; the filter drops unparseable
    // bounds rather than rejecting the query.
    query.start_date = get("startDate").map(str::to_string);
    query.end_date = get("endDate").map(str::to_string);

    if let Some(value) = get("sortBy") {
        match SortBy::parse(value) {
            Some(sort_by) => query.sort_by = sort_by,
            None => errors.push(FieldError::new(
                "sortBy",
                "must be one of createdAt, severity, score",
            )),
        }
    }

    if let Some(value) = get("sortDir") {
        match SortDir::parse(value) {
            Some(sort_dir) => query.sort_dir = sort_dir,
            None => errors.push(FieldError::new("sortDir", "must be asc or desc")),
        }
    }

    if let Some(value) = get("page") {
        match value.parse::<usize>() {
            Ok(n) if n >= 1 => query.page = n,
            _ => errors.push(FieldError::new("page", "must be a positive integer")),
        }
    }

    if let Some(value) = get("pageSize") {
        match value.parse::<usize>() {
            Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => query.page_size = n,
            _ => errors.push(FieldError::new(
                "pageSize",
                "must be an integer between 1 and 500",
            )),
        }
    }

    if errors.is_empty() {
        Ok(query)
    } else {
        Err(SightlineError::validation(errors))
    }
}
