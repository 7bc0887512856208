//! Pure input validators.
//!
//! Every function here checks one parameter, returns its canonical form, and fails on
//! the first violated constraint. Nothing is clamped or trimmed on the caller's behalf.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ValidationError;
use crate::params::{DateInput, Extent, ExtentInput, IdFilter};

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 1000;

type Result<T> = std::result::Result<T, ValidationError>;

/// Identifier namespaces CDO uses. Locations and stations are qualified by a prefix
/// (`FIPS:37`, `GHCND:USW00094728`); the rest are bare codes (`GHCND`, `TMAX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Dataset,
    DataCategory,
    DataType,
    LocationCategory,
    Location,
    Station,
}

impl IdKind {
    fn is_namespaced(self) -> bool {
        matches!(self, IdKind::Location | IdKind::Station)
    }
}

pub fn token(token: &str) -> Result<&str> {
    if token.is_empty() {
        return Err(ValidationError::new("token", "must be a non-empty string"));
    }
    if token.trim() != token {
        return Err(ValidationError::new(
            "token",
            "must not have leading or trailing whitespace",
        ));
    }
    if !token.chars().all(|c| c.is_ascii_graphic()) {
        return Err(ValidationError::new(
            "token",
            "must consist of printable ASCII characters",
        ));
    }
    Ok(token)
}

/// Normalizes a date to its calendar day.
pub fn date(value: &DateInput, name: &str) -> Result<NaiveDate> {
    match value {
        DateInput::Date(d) => Ok(*d),
        DateInput::DateTime(dt) => Ok(dt.date()),
        DateInput::Text(text) => parse_date_text(text).ok_or_else(|| {
            ValidationError::new(
                name,
                format!("{text:?} is not an ISO date (expected YYYY-MM-DD)"),
            )
        }),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    // Hour-only times: chrono needs a minute field.
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&format!("{text}:00"), fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Validates an optional start/end pair and checks their ordering when both are present.
pub fn date_range(
    start: Option<&DateInput>,
    end: Option<&DateInput>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = start.map(|d| date(d, "start_date")).transpose()?;
    let end = end.map(|d| date(d, "end_date")).transpose()?;

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(ValidationError::new(
                "start_date",
                format!("{s} is after end_date {e}"),
            ));
        }
    }
    Ok((start, end))
}

/// Checks one identifier against its namespace.
pub fn id<'a>(value: &'a str, kind: IdKind, name: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(ValidationError::new(name, "identifiers must not be empty"));
    }

    if kind.is_namespaced() {
        let Some((prefix, rest)) = value.split_once(':') else {
            return Err(ValidationError::new(
                name,
                format!("{value:?} must have the form PREFIX:ID (e.g. GHCND:USW00094728)"),
            ));
        };
        if prefix.is_empty() || rest.is_empty() || !is_code(prefix) || !is_code(rest) {
            return Err(ValidationError::new(
                name,
                format!("{value:?} must have the form PREFIX:ID (e.g. GHCND:USW00094728)"),
            ));
        }
    } else if !is_code(value) {
        return Err(ValidationError::new(
            name,
            format!("{value:?} may only contain letters, digits, '-', '_' and '.'"),
        ));
    }
    Ok(value)
}

fn is_code(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Resolves a scalar-or-list filter into its ordered list of ids.
pub fn ids(value: &IdFilter, kind: IdKind, name: &str) -> Result<Vec<String>> {
    if value.is_empty() {
        return Err(ValidationError::new(
            name,
            "at least one identifier is required",
        ));
    }
    value
        .iter()
        .map(|v| id(v, kind, name).map(str::to_string))
        .collect()
}

pub fn limit(limit: u32) -> Result<u32> {
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ValidationError::new(
            "limit",
            format!("must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"),
        ));
    }
    Ok(limit)
}

/// Parses and range-checks a `minLat,minLon,maxLat,maxLon` bounding box.
pub fn extent(value: &ExtentInput) -> Result<Extent> {
    let values = match value {
        ExtentInput::Values(v) => v.clone(),
        ExtentInput::Text(text) => text
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    ValidationError::new(
                        "extent",
                        format!("{:?} is not a number in {text:?}", part.trim()),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?,
    };

    let [min_lat, min_lon, max_lat, max_lon] = <[f64; 4]>::try_from(values.as_slice())
        .map_err(|_| {
            ValidationError::new(
                "extent",
                format!(
                    "expected exactly 4 values (minLat,minLon,maxLat,maxLon), got {}",
                    values.len()
                ),
            )
        })?;

    for (label, v, bound) in [
        ("minimum latitude", min_lat, 90.0),
        ("minimum longitude", min_lon, 180.0),
        ("maximum latitude", max_lat, 90.0),
        ("maximum longitude", max_lon, 180.0),
    ] {
        if !v.is_finite() || v < -bound || v > bound {
            return Err(ValidationError::new(
                "extent",
                format!("{label} {v} is outside -{bound}..{bound}"),
            ));
        }
    }
    if min_lat > max_lat {
        return Err(ValidationError::new(
            "extent",
            format!("minimum latitude {min_lat} is greater than maximum latitude {max_lat}"),
        ));
    }
    if min_lon > max_lon {
        return Err(ValidationError::new(
            "extent",
            format!("minimum longitude {min_lon} is greater than maximum longitude {max_lon}"),
        ));
    }

    Ok(Extent {
        min_lat,
        min_lon,
        max_lat,
        max_lon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn dates_normalize_from_any_representation() {
        let cases: Vec<DateInput> = vec![
            "2023-01-05".into(),
            "2023-01-05T13:45:00".into(),
            "2023-01-05T13:45:00.250".into(),
            "2023-01-05 08:00:00".into(),
            "2023-01-05T13:45".into(),
            "2023-01-05 13:45".into(),
            "2023-01-05T13".into(),
            "2023-01-05T23:00:00+02:00".into(),
            d(2023, 1, 5).into(),
            d(2023, 1, 5).and_hms_opt(6, 0, 0).unwrap().into(),
        ];
        for case in cases {
            assert_eq!(date(&case, "start_date").unwrap(), d(2023, 1, 5), "{case:?}");
        }
    }

    #[test]
    fn unparseable_dates_fail() {
        for text in [
            "",
            "yesterday",
            "2023-13-01",
            "2023-02-30",
            "01/05/2023",
            "2023-01-05T25",
            "2023-01-05T",
        ] {
            let err = date(&text.into(), "end_date").unwrap_err();
            assert_eq!(err.param(), "end_date");
        }
    }

    #[test]
    fn date_range_ordering() {
        let start: DateInput = "2020-01-01".into();
        let end: DateInput = "2020-12-31".into();
        assert_eq!(
            date_range(Some(&start), Some(&end)).unwrap(),
            (Some(d(2020, 1, 1)), Some(d(2020, 12, 31)))
        );

        // Equal dates are a valid single-day range.
        assert!(date_range(Some(&start), Some(&start)).is_ok());

        let err = date_range(Some(&end), Some(&start)).unwrap_err();
        assert_eq!(err.param(), "start_date");

        assert_eq!(
            date_range(None, Some(&end)).unwrap(),
            (None, Some(d(2020, 12, 31)))
        );
    }

    #[test]
    fn limit_bounds() {
        assert_eq!(limit(1), Ok(1));
        assert_eq!(limit(1000), Ok(1000));
        assert!(limit(0).is_err());
        assert!(limit(1001).is_err());
    }

    #[test]
    fn plain_ids() {
        assert_eq!(id("GHCND", IdKind::Dataset, "dataset_id"), Ok("GHCND"));
        assert!(id("HLY-TEMP-NORMAL", IdKind::DataType, "data_type_id").is_ok());
        assert!(id("", IdKind::DataType, "data_type_id").is_err());
        assert!(id(" TMAX", IdKind::DataType, "data_type_id").is_err());
        assert!(id("TMAX&x=1", IdKind::DataType, "data_type_id").is_err());
    }

    #[test]
    fn namespaced_ids() {
        assert!(id("GHCND:USW00094728", IdKind::Station, "station_id").is_ok());
        assert!(id("FIPS:37", IdKind::Location, "location_id").is_ok());
        assert!(id("USW00094728", IdKind::Station, "station_id").is_err());
        assert!(id(":USW00094728", IdKind::Station, "station_id").is_err());
        assert!(id("GHCND:", IdKind::Station, "station_id").is_err());
        assert!(id("GHCND:US W", IdKind::Station, "station_id").is_err());
    }

    #[test]
    fn id_lists_preserve_order_and_reject_empty() {
        let filter: IdFilter = vec!["TMIN", "TMAX", "PRCP"].into();
        assert_eq!(
            ids(&filter, IdKind::DataType, "data_type_id").unwrap(),
            vec!["TMIN", "TMAX", "PRCP"]
        );

        let empty: IdFilter = Vec::<&str>::new().into();
        assert!(ids(&empty, IdKind::DataType, "data_type_id").is_err());

        let bad: IdFilter = vec!["GHCND:A", ""].into();
        let err = ids(&bad, IdKind::Station, "station_id").unwrap_err();
        assert_eq!(err.param(), "station_id");
    }

    #[test]
    fn extent_from_text_and_values() {
        let e = extent(&"37.0,-123.0,38.5,-121.5".into()).unwrap();
        assert_eq!(e.as_array(), [37.0, -123.0, 38.5, -121.5]);

        let e = extent(&[37.0, -123.0, 38.5, -121.5].into()).unwrap();
        assert_eq!(e.max_lon, -121.5);

        assert!(extent(&" 37 , -123 , 38.5 , -121.5 ".into()).is_ok());
    }

    #[test]
    fn extent_rejections() {
        for bad in [
            "91,-123,38.5,-121.5",
            "37,-181,38.5,-121.5",
            "37,-123,38.5",
            "37,-123,38.5,-121.5,0",
            "37,-123,north,-121.5",
            "38.5,-123,37,-121.5",
            "37,-121.5,38.5,-123",
            "",
        ] {
            assert!(extent(&bad.into()).is_err(), "{bad}");
        }
        assert!(extent(&vec![0.0, f64::NAN, 1.0, 1.0].into()).is_err());
        assert!(extent(&vec![0.0, 0.0].into()).is_err());
    }

    #[test]
    fn token_rules() {
        assert_eq!(token("abc"), Ok("abc"));
        assert!(token("").is_err());
        assert!(token(" abc").is_err());
        assert!(token("ab\ncd").is_err());
        assert!(token("jeton\u{e9}").is_err());
    }
}
