//! Wire parameter mapping for a single endpoint call.

use std::fmt::Display;

use chrono::NaiveDate;

use crate::endpoint::Endpoint;
use crate::error::ValidationError;

/// Ordered query pairs bound to the endpoint they were built for.
///
/// Keys repeat for list-valued filters; order is exactly the insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Query {
    endpoint: Endpoint,
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// All values sent for `key`, in order.
    #[cfg(test)]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Debug)]
pub(crate) struct QueryBuilder {
    endpoint: Endpoint,
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            pairs: Vec::new(),
        }
    }

    /// Adds `key` once per id.
    pub fn ids(mut self, key: &'static str, ids: Option<Vec<String>>) -> Self {
        for id in ids.into_iter().flatten() {
            self.push(key, id);
        }
        self
    }

    pub fn date(mut self, key: &'static str, date: Option<NaiveDate>) -> Self {
        if let Some(date) = date {
            self.push(key, date.format("%Y-%m-%d").to_string());
        }
        self
    }

    pub fn value<T: Display>(mut self, key: &'static str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
        self
    }

    fn push(&mut self, key: &'static str, value: String) {
        if !value.is_empty() {
            self.pairs.push((key, value));
        }
    }

    /// Finishes the mapping, refusing any key the endpoint does not document.
    pub fn build(self) -> Result<Query, ValidationError> {
        if let Some((key, _)) = self.pairs.iter().find(|(k, _)| !self.endpoint.accepts(k)) {
            return Err(ValidationError::new(
                *key,
                format!("not accepted by the {} endpoint", self.endpoint),
            ));
        }
        Ok(Query {
            endpoint: self.endpoint,
            pairs: self.pairs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{SortOrder, Units};

    #[test]
    fn list_values_repeat_in_order() {
        let query = QueryBuilder::new(Endpoint::Data)
            .ids("stationid", Some(vec!["A".into(), "B".into()]))
            .build()
            .unwrap();
        assert_eq!(
            query.pairs(),
            &[("stationid", "A".to_string()), ("stationid", "B".to_string())]
        );
        assert_eq!(query.get_all("stationid"), vec!["A", "B"]);
    }

    #[test]
    fn absent_and_empty_values_are_omitted() {
        let query = QueryBuilder::new(Endpoint::Data)
            .ids("datatypeid", None)
            .value::<u32>("limit", None)
            .value("units", Some(""))
            .date("startdate", None)
            .build()
            .unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn dates_and_enums_render_canonically() {
        let query = QueryBuilder::new(Endpoint::Data)
            .date("startdate", NaiveDate::from_ymd_opt(2023, 1, 5))
            .value("units", Some(Units::Metric))
            .value("sortorder", Some(SortOrder::Desc))
            .value("limit", Some(10u32))
            .build()
            .unwrap();
        assert_eq!(query.get_all("startdate"), vec!["2023-01-05"]);
        assert_eq!(query.get_all("units"), vec!["metric"]);
        assert_eq!(query.get_all("sortorder"), vec!["desc"]);
        assert_eq!(query.get_all("limit"), vec!["10"]);
    }

    #[test]
    fn unknown_keys_are_refused() {
        let err = QueryBuilder::new(Endpoint::Datasets)
            .value("extent", Some("1,2,3,4"))
            .build()
            .unwrap_err();
        assert_eq!(err.param(), "extent");
    }

    #[test]
    fn building_is_deterministic() {
        let build = || {
            QueryBuilder::new(Endpoint::Stations)
                .ids("datasetid", Some(vec!["GHCND".into()]))
                .ids("locationid", Some(vec!["FIPS:37".into()]))
                .value("limit", Some(10u32))
                .build()
                .unwrap()
        };
        assert_eq!(build(), build());
    }
}
