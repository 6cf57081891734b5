// src/models/filter.rs

//! Filter state held by the inventory page.
//!
//! `FilterParams` is rebuilt from the page URL on every navigation and
//! written back to it when the user changes a filter. The query builder in
//! [`crate::query`] turns it into the inventory API dialect.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Named sort orders offered by the inventory page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    YearDesc,
    YearAsc,
    LengthAsc,
    LengthDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::YearDesc,
        SortKey::YearAsc,
        SortKey::LengthAsc,
        SortKey::LengthDesc,
    ];

    /// URL value, e.g. `price-asc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::YearDesc => "year-desc",
            SortKey::YearAsc => "year-asc",
            SortKey::LengthAsc => "length-asc",
            SortKey::LengthDesc => "length-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::YearDesc => "Year: Newest First",
            SortKey::YearAsc => "Year: Oldest First",
            SortKey::LengthAsc => "Length: Shortest First",
            SortKey::LengthDesc => "Length: Longest First",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Bounds {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Inventory filter selections. Empty lists and `None` mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub types: Vec<String>,
    pub makes: Vec<String>,
    pub models: Vec<String>,
    pub conditions: Vec<String>,
    pub slideouts: Vec<u32>,
    pub price: Bounds,
    pub year: Bounds,
    pub sleeps: Bounds,
    pub weight: Bounds,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    /// 1-indexed
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            makes: Vec::new(),
            models: Vec::new(),
            conditions: Vec::new(),
            slideouts: Vec::new(),
            price: Bounds::default(),
            year: Bounds::default(),
            sleeps: Bounds::default(),
            weight: Bounds::default(),
            search: None,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_number(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

impl FilterParams {
    /// Build filter state from a page URL query string (`?type=...&minPrice=...`).
    ///
    /// Unknown keys are ignored; unparsable numbers and unknown sort keys are
    /// treated as absent. A repeated key keeps its first value.
    pub fn from_query_string(query: &str) -> Self {
        Self::from_query_string_with(query, DEFAULT_PAGE_SIZE)
    }

    /// Like [`FilterParams::from_query_string`], with `default_page_size`
    /// used when `pageSize` is missing or invalid.
    pub fn from_query_string_with(query: &str, default_page_size: u32) -> Self {
        let default_page_size = default_page_size.max(1);
        let mut params = Self {
            page_size: default_page_size,
            ..Self::default()
        };
        let query = query.trim_start_matches('?');
        let mut seen = HashSet::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if !seen.insert(key.to_string()) {
                continue;
            }
            match key.as_ref() {
                "type" => params.types = split_list(&value),
                "make" => params.makes = split_list(&value),
                "model" => params.models = split_list(&value),
                "condition" => params.conditions = split_list(&value),
                "slideouts" => {
                    params.slideouts = value
                        .split(',')
                        .filter_map(|s| s.trim().parse::<u32>().ok())
                        .collect()
                }
                "minPrice" => params.price.min = parse_number(&value),
                "maxPrice" => params.price.max = parse_number(&value),
                "minYear" => params.year.min = parse_number(&value),
                "maxYear" => params.year.max = parse_number(&value),
                "minSleeps" => params.sleeps.min = parse_number(&value),
                "maxSleeps" => params.sleeps.max = parse_number(&value),
                "minWeight" => params.weight.min = parse_number(&value),
                "maxWeight" => params.weight.max = parse_number(&value),
                "search" => {
                    let trimmed = value.trim();
                    params.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
                "sort" => params.sort = value.parse().ok(),
                "page" => {
                    params.page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p >= 1)
                        .unwrap_or(1)
                }
                "pageSize" => {
                    params.page_size = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p >= 1)
                        .unwrap_or(default_page_size)
                }
                _ => {}
            }
        }

        params
    }

    /// Render the filter state back into a page URL query string.
    ///
    /// Defaults (page 1, the default page size) are left out so that a
    /// cleared filter panel yields an empty string.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());

        let lists: [(&str, &[String]); 4] = [
            ("type", self.types.as_slice()),
            ("make", self.makes.as_slice()),
            ("model", self.models.as_slice()),
            ("condition", self.conditions.as_slice()),
        ];
        for (key, values) in lists {
            if !values.is_empty() {
                out.append_pair(key, &join_list(values));
            }
        }

        let bounds = [
            ("minPrice", self.price.min),
            ("maxPrice", self.price.max),
            ("minYear", self.year.min),
            ("maxYear", self.year.max),
            ("minSleeps", self.sleeps.min),
            ("maxSleeps", self.sleeps.max),
            ("minWeight", self.weight.min),
            ("maxWeight", self.weight.max),
        ];
        for (key, value) in bounds {
            if let Some(value) = value {
                out.append_pair(key, &value.to_string());
            }
        }

        if !self.slideouts.is_empty() {
            out.append_pair("slideouts", &join_list(&self.slideouts));
        }
        if let Some(search) = self.search_term() {
            out.append_pair("search", search);
        }
        if self.page > 1 {
            out.append_pair("page", &self.page.to_string());
        }
        if self.page_size != DEFAULT_PAGE_SIZE && self.page_size > 0 {
            out.append_pair("pageSize", &self.page_size.to_string());
        }
        if let Some(sort) = self.sort {
            out.append_pair("sort", sort.as_str());
        }

        out.finish()
    }

    /// Search text, if it contains anything besides whitespace.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Number of filter controls currently narrowing the results.
    pub fn active_filter_count(&self) -> usize {
        let lists = [
            !self.types.is_empty(),
            !self.makes.is_empty(),
            !self.models.is_empty(),
            !self.conditions.is_empty(),
            !self.slideouts.is_empty(),
        ];
        let bounds = [self.price, self.year, self.sleeps, self.weight];

        lists.iter().filter(|active| **active).count()
            + bounds.iter().filter(|b| !b.is_open()).count()
            + usize::from(self.search_term().is_some())
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Same filters on a different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Changing a filter or the sort order always returns to page 1.
    pub fn reset_page(mut self) -> Self {
        self.page = 1;
        self
    }
}
