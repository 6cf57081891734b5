// src/query.rs

//! Inventory API query-string builder.
//!
//! Translates [`FilterParams`] into the inventory API's filter dialect:
//! a list of AND-ed predicate groups, each either a single field predicate
//! or an OR over several terms.
//!
//! ```text
//! filters[$and][0][displayOnWebsite][$eq]=true
//! filters[$and][1][$or][0][unit_make][name][$eqi]=Jayco
//! filters[$and][1][$or][1][unit_make][name][$eqi]=Keystone
//! filters[$and][2][price_current][$gte]=25000
//! sort[0]=price_current:asc
//! ```
//!
//! Keys are emitted verbatim (brackets and `$` unescaped) because the API
//! matches them literally. Text values are percent-encoded.

use std::fmt::Display;

use crate::models::{DEFAULT_PAGE_SIZE, FilterParams, SortKey};

/// Sort used when no recognized sort key is selected ("Featured").
pub const DEFAULT_SORT: &str = "sort[0]=lot_status:asc&sort[1]=received_date:asc";

/// Page size for the homepage featured strip.
pub const FEATURED_PAGE_SIZE: u32 = 12;

/// Predicate that every public listing query carries.
const VISIBLE_ON_WEBSITE: &str = "[displayOnWebsite][$eq]";

/// Fields matched by free-text search.
const SEARCH_PATHS: [&str; 3] = [
    "[stock_number][$containsi]",
    "[unit_make][name][$containsi]",
    "[unit_model][name][$containsi]",
];

/// Percent-encode a value the way browsers' `encodeURIComponent` does.
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

fn encoded(values: &[String]) -> Vec<String> {
    values.iter().map(|v| encode_component(v)).collect()
}

/// Accumulates `filters[$and][n]...` groups with dense indexes.
#[derive(Debug, Default)]
struct Predicates {
    parts: Vec<String>,
    group: usize,
}

impl Predicates {
    /// A group holding a single predicate.
    fn all(&mut self, path: &str, value: impl Display) {
        self.parts
            .push(format!("filters[$and][{}]{}={}", self.group, path, value));
        self.group += 1;
    }

    /// An OR group with one term per value. Nothing is emitted for no values.
    fn any_value<T: Display>(&mut self, path: &str, values: impl IntoIterator<Item = T>) {
        let before = self.parts.len();
        for (i, value) in values.into_iter().enumerate() {
            self.parts.push(format!(
                "filters[$and][{}][$or][{}]{}={}",
                self.group, i, path, value
            ));
        }
        if self.parts.len() > before {
            self.group += 1;
        }
    }

    /// An OR group matching one value against several fields.
    fn any_field(&mut self, paths: &[&str], value: &str) {
        for (i, path) in paths.iter().enumerate() {
            self.parts.push(format!(
                "filters[$and][{}][$or][{}]{}={}",
                self.group, i, path, value
            ));
        }
        self.group += 1;
    }

    fn at_least(&mut self, field: &str, value: Option<u64>) {
        if let Some(value) = value {
            self.all(&format!("[{field}][$gte]"), value);
        }
    }

    fn at_most(&mut self, field: &str, value: Option<u64>) {
        if let Some(value) = value {
            self.all(&format!("[{field}][$lte]"), value);
        }
    }

    fn finish(self) -> String {
        self.parts.join("&")
    }
}

/// Build the `filters[...]` part of an inventory query.
///
/// The visibility predicate is always group 0; the remaining groups follow
/// a fixed order and only appear when their filter is set.
pub fn build_filter_string(params: &FilterParams) -> String {
    let mut p = Predicates::default();

    p.all(VISIBLE_ON_WEBSITE, true);

    if let Some(search) = params.search_term() {
        p.any_field(&SEARCH_PATHS, &encode_component(search));
    }

    p.any_value("[unit_classification][name][$eqi]", encoded(&params.types));
    p.any_value("[unit_make][name][$eqi]", encoded(&params.makes));
    p.any_value("[unit_model][name][$eqi]", encoded(&params.models));
    p.any_value("[condition][$eqi]", encoded(&params.conditions));

    p.at_least("price_current", params.price.min);
    p.at_most("price_current", params.price.max);
    p.at_least("year", params.year.min);
    p.at_most("year", params.year.max);
    p.at_least("max_sleeping_count", params.sleeps.min);
    p.at_most("max_sleeping_count", params.sleeps.max);
    p.at_least("gvwr", params.weight.min);
    p.at_most("gvwr", params.weight.max);

    p.any_value("[number_of_slideouts][$eq]", &params.slideouts);

    p.finish()
}

/// Map a sort key to the API's `sort[n]=field:direction` form.
pub fn build_sort_string(sort: Option<SortKey>) -> &'static str {
    match sort {
        Some(SortKey::PriceAsc) => "sort[0]=price_current:asc",
        Some(SortKey::PriceDesc) => "sort[0]=price_current:desc",
        Some(SortKey::YearDesc) => "sort[0]=year:desc",
        Some(SortKey::YearAsc) => "sort[0]=year:asc",
        Some(SortKey::LengthAsc) => "sort[0]=vehicle_body_length:asc",
        Some(SortKey::LengthDesc) => "sort[0]=vehicle_body_length:desc",
        None => DEFAULT_SORT,
    }
}

/// Sort string for a raw URL value; unrecognized values use the default.
pub fn sort_for(raw: Option<&str>) -> &'static str {
    build_sort_string(raw.and_then(|s| s.parse().ok()))
}

fn scope(company_id: u64) -> String {
    format!("company[0]={company_id}&withUnitData=1")
}

/// Full query for an inventory listing page.
pub fn inventory_query(params: &FilterParams, company_id: u64) -> String {
    let page = params.page.max(1);
    let page_size = if params.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        params.page_size
    };

    format!(
        "{}&{}&{}&page={}&pageSize={}",
        build_filter_string(params),
        build_sort_string(params.sort),
        scope(company_id),
        page,
        page_size
    )
}

/// Query for a single unit by id. No visibility predicate: detail links
/// must keep working for units that were hidden after being shared.
pub fn unit_query(id: u64, company_id: u64) -> String {
    format!("filters[$and][0][id][$eq]={}&{}", id, scope(company_id))
}

/// Query for an explicit set of units, sized to return all of them on one
/// page. Returns `None` for an empty id list.
pub fn units_by_ids_query(ids: &[u64], company_id: u64) -> Option<String> {
    if ids.is_empty() {
        return None;
    }

    let mut p = Predicates::default();
    p.any_value("[id][$eq]", ids);

    Some(format!(
        "{}&{}&pageSize={}",
        p.finish(),
        scope(company_id),
        ids.len()
    ))
}

/// Query for server-flagged featured units, newest first.
pub fn featured_query(company_id: u64, page_size: u32) -> String {
    let mut p = Predicates::default();
    p.all(VISIBLE_ON_WEBSITE, true);
    p.all("[web_settings][featured][$eq]", true);

    format!(
        "{}&sort[0]=received_date:desc&{}&pageSize={}",
        p.finish(),
        scope(company_id),
        page_size
    )
}
