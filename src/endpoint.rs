use std::fmt;

use reqwest::Url;

use crate::error::ValidationError;

/// Query keys every list endpoint understands.
const COMMON: &[&str] = &[
    "startdate",
    "enddate",
    "sortfield",
    "sortorder",
    "limit",
    "offset",
];

/// The CDO v2 resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Datasets,
    DataCategories,
    DataTypes,
    LocationCategories,
    Locations,
    Stations,
    Data,
}

impl Endpoint {
    pub const ALL: &'static [Endpoint] = &[
        Endpoint::Datasets,
        Endpoint::DataCategories,
        Endpoint::DataTypes,
        Endpoint::LocationCategories,
        Endpoint::Locations,
        Endpoint::Stations,
        Endpoint::Data,
    ];

    /// Path segment below the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Datasets => "datasets",
            Endpoint::DataCategories => "datacategories",
            Endpoint::DataTypes => "datatypes",
            Endpoint::LocationCategories => "locationcategories",
            Endpoint::Locations => "locations",
            Endpoint::Stations => "stations",
            Endpoint::Data => "data",
        }
    }

    /// Endpoint-specific query keys, on top of `COMMON`.
    fn filters(&self) -> &'static [&'static str] {
        match self {
            Endpoint::Datasets => &["datatypeid", "locationid", "stationid"],
            Endpoint::DataCategories => &["datasetid", "locationid", "stationid"],
            Endpoint::DataTypes => &["datasetid", "locationid", "stationid", "datacategoryid"],
            Endpoint::LocationCategories => &["datasetid"],
            Endpoint::Locations => &["datasetid", "locationcategoryid", "datacategoryid"],
            Endpoint::Stations => &[
                "datasetid",
                "locationid",
                "datacategoryid",
                "datatypeid",
                "extent",
            ],
            Endpoint::Data => &[
                "datasetid",
                "datatypeid",
                "locationid",
                "stationid",
                "units",
                "includemetadata",
            ],
        }
    }

    pub fn accepts(&self, key: &str) -> bool {
        COMMON.contains(&key) || self.filters().contains(&key)
    }

    /// Whether `/<path>/<id>` single-resource lookups exist for this endpoint.
    pub fn has_lookup(&self) -> bool {
        !matches!(self, Endpoint::Data)
    }

    /// Joins the endpoint (and optional resource id) onto `base`.
    pub(crate) fn url(&self, base: &str, id: Option<&str>) -> Result<Url, ValidationError> {
        let mut url = Url::parse(base)
            .map_err(|e| ValidationError::new("url", format!("{base:?} is not a valid URL: {e}")))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ValidationError::new("url", format!("{base:?} cannot be used as a base URL"))
            })?;
            segments.pop_if_empty().push(self.path());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
