//! Caller-facing parameter types.
//!
//! Each logical parameter that CDO accepts in more than one shape gets a small tagged
//! union here, resolved once by [`crate::validate`] so the query builder only ever
//! sees the canonical form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::ValidationError;

/// One identifier or an ordered list of identifiers.
///
/// Lists are sent as repeated query keys, in the order given.
///
/// ```
/// use noaa_cdo::IdFilter;
///
/// let one: IdFilter = "GHCND".into();
/// let many: IdFilter = vec!["TMAX", "TMIN"].into();
/// assert_eq!(one, IdFilter::One("GHCND".to_string()));
/// assert_eq!(many.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFilter {
    One(String),
    Many(Vec<String>),
}

impl IdFilter {
    pub fn len(&self) -> usize {
        match self {
            IdFilter::One(_) => 1,
            IdFilter::Many(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let ids: &[String] = match self {
            IdFilter::One(id) => std::slice::from_ref(id),
            IdFilter::Many(ids) => ids,
        };
        ids.iter().map(String::as_str)
    }
}

impl From<&str> for IdFilter {
    fn from(value: &str) -> Self {
        IdFilter::One(value.to_string())
    }
}

impl From<String> for IdFilter {
    fn from(value: String) -> Self {
        IdFilter::One(value)
    }
}

impl From<&String> for IdFilter {
    fn from(value: &String) -> Self {
        IdFilter::One(value.clone())
    }
}

impl From<Vec<String>> for IdFilter {
    fn from(value: Vec<String>) -> Self {
        IdFilter::Many(value)
    }
}

impl From<Vec<&str>> for IdFilter {
    fn from(value: Vec<&str>) -> Self {
        IdFilter::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for IdFilter {
    fn from(value: &[&str]) -> Self {
        IdFilter::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for IdFilter {
    fn from(value: [&str; N]) -> Self {
        IdFilter::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

/// A date given either as a calendar value or as text to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::DateTime(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(value: DateTime<Tz>) -> Self {
        DateInput::DateTime(value.naive_local())
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

/// Bounding box filter for the stations endpoint, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtentInput {
    /// `"minLat,minLon,maxLat,maxLon"`
    Text(String),
    Values(Vec<f64>),
}

impl From<&str> for ExtentInput {
    fn from(value: &str) -> Self {
        ExtentInput::Text(value.to_string())
    }
}

impl From<String> for ExtentInput {
    fn from(value: String) -> Self {
        ExtentInput::Text(value)
    }
}

impl From<[f64; 4]> for ExtentInput {
    fn from(value: [f64; 4]) -> Self {
        ExtentInput::Values(value.to_vec())
    }
}

impl From<Vec<f64>> for ExtentInput {
    fn from(value: Vec<f64>) -> Self {
        ExtentInput::Values(value)
    }
}

impl From<&[f64]> for ExtentInput {
    fn from(value: &[f64]) -> Self {
        ExtentInput::Values(value.to_vec())
    }
}

impl From<Extent> for ExtentInput {
    fn from(value: Extent) -> Self {
        ExtentInput::Values(vec![
            value.min_lat,
            value.min_lon,
            value.max_lat,
            value.max_lon,
        ])
    }
}

/// A validated bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Extent {
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lat, self.min_lon, self.max_lat, self.max_lon]
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $param:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ValidationError::new(
                        $param,
                        format!(
                            "{:?} is not accepted; expected one of: {}",
                            s,
                            [$($text),+].join(", ")
                        ),
                    )),
                }
            }
        }
    };
}

string_enum! {
    /// Unit system for observation values returned by the data endpoint.
    Units, "units" {
        Standard => "standard",
        Metric => "metric",
    }
}

string_enum! {
    /// Result field CDO sorts by.
    SortField, "sortfield" {
        Id => "id",
        Name => "name",
        MinDate => "mindate",
        MaxDate => "maxdate",
        DataCoverage => "datacoverage",
    }
}

string_enum! {
    SortOrder, "sortorder" {
        Asc => "asc",
        Desc => "desc",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_filter_conversions_keep_order() {
        let ids: IdFilter = ["GHCND:B", "GHCND:A"].into();
        assert_eq!(ids.iter().collect::<Vec<_>>(), vec!["GHCND:B", "GHCND:A"]);

        let one: IdFilter = String::from("TMAX").into();
        assert_eq!(one.iter().collect::<Vec<_>>(), vec!["TMAX"]);
        assert!(!one.is_empty());

        let none: IdFilter = Vec::<String>::new().into();
        assert!(none.is_empty());
    }

    #[test]
    fn enums_parse_and_print() {
        assert_eq!("metric".parse::<Units>(), Ok(Units::Metric));
        assert_eq!(SortField::DataCoverage.to_string(), "datacoverage");
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!(SortField::ALL.len(), 5);
    }

    #[test]
    fn unknown_enum_value_names_parameter() {
        let err = "kelvin".parse::<Units>().unwrap_err();
        assert_eq!(err.param(), "units");
        assert!(err.message().contains("standard, metric"));

        // CDO is case-sensitive.
        assert!("ASC".parse::<SortOrder>().is_err());
    }

    #[test]
    fn extent_display_is_comma_separated() {
        let extent = Extent {
            min_lat: 37.0,
            min_lon: -123.0,
            max_lat: 38.5,
            max_lon: -121.5,
        };
        assert_eq!(extent.to_string(), "37,-123,38.5,-121.5");
    }

    #[test]
    fn datetime_input_uses_local_wall_clock() {
        let dt = chrono::Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let input: DateInput = dt.into();
        assert_eq!(
            input,
            DateInput::DateTime(
                NaiveDate::from_ymd_opt(2023, 1, 2)
                    .unwrap()
                    .and_hms_opt(3, 4, 5)
                    .unwrap()
            )
        );
    }
}
