//! One builder-style method per CDO resource.
//!
//! Every method validates its options, builds the query, issues exactly one GET and
//! returns the decoded JSON unchanged. Options left unset are not sent, so the
//! service defaults apply (25 results, ascending order).
//!
//! The list endpoints other than `data` take an optional `.id(..)`, which turns the
//! call into a single-resource lookup (`/stations/GHCND:USW00094728`). Filters given
//! alongside an id are still validated and sent.

use bon::bon;
use chrono::NaiveDate;
use serde_json::Value;

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::{Result, ValidationError};
use crate::params::{DateInput, ExtentInput, IdFilter, SortField, SortOrder, Units};
use crate::query::QueryBuilder;
use crate::validate::{self, IdKind};

/// Options shared by every list endpoint, already validated.
struct Paging {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    sort_field: Option<SortField>,
    sort_order: Option<SortOrder>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Paging {
    fn validate(
        start_date: Option<DateInput>,
        end_date: Option<DateInput>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let (start_date, end_date) = validate::date_range(start_date.as_ref(), end_date.as_ref())?;
        Ok(Self {
            start_date,
            end_date,
            sort_field,
            sort_order,
            limit: limit.map(validate::limit).transpose()?,
            offset,
        })
    }

    fn apply(self, query: QueryBuilder) -> QueryBuilder {
        query
            .date("startdate", self.start_date)
            .date("enddate", self.end_date)
            .value("sortfield", self.sort_field)
            .value("sortorder", self.sort_order)
            .value("limit", self.limit)
            .value("offset", self.offset)
    }
}

fn filter(
    value: Option<&IdFilter>,
    kind: IdKind,
    name: &str,
) -> Result<Option<Vec<String>>, ValidationError> {
    value.map(|v| validate::ids(v, kind, name)).transpose()
}

fn lookup_id(id: Option<&str>, kind: IdKind) -> Result<Option<&str>, ValidationError> {
    id.map(|id| validate::id(id, kind, "id")).transpose()
}

#[bon]
impl Client {
    /// Lists datasets, or fetches one with `.id("GHCND")`.
    ///
    /// ```no_run
    /// # fn main() -> Result<(), noaa_cdo::Error> {
    /// let client = noaa_cdo::Client::with_token("my-token")?;
    /// let datasets = client
    ///     .datasets()
    ///     .station_id("GHCND:USW00094728")
    ///     .call()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn datasets(
        &self,
        #[builder(into)] id: Option<String>,
        #[builder(into)] data_type_id: Option<IdFilter>,
        #[builder(into)] location_id: Option<IdFilter>,
        #[builder(into)] station_id: Option<IdFilter>,
        #[builder(into)] start_date: Option<DateInput>,
        #[builder(into)] end_date: Option<DateInput>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let id = lookup_id(id.as_deref(), IdKind::Dataset)?;
        let paging = Paging::validate(start_date, end_date, sort_field, sort_order, limit, offset)?;

        let query = QueryBuilder::new(Endpoint::Datasets)
            .ids(
                "datatypeid",
                filter(data_type_id.as_ref(), IdKind::DataType, "data_type_id")?,
            )
            .ids(
                "locationid",
                filter(location_id.as_ref(), IdKind::Location, "location_id")?,
            )
            .ids(
                "stationid",
                filter(station_id.as_ref(), IdKind::Station, "station_id")?,
            );
        let query = paging.apply(query).build()?;

        self.get(&query, id)
    }

    /// Lists data categories (`TEMP`, `PRCP`, ...), or fetches one with `.id(..)`.
    #[builder]
    pub fn data_categories(
        &self,
        #[builder(into)] id: Option<String>,
        #[builder(into)] dataset_id: Option<IdFilter>,
        #[builder(into)] location_id: Option<IdFilter>,
        #[builder(into)] station_id: Option<IdFilter>,
        #[builder(into)] start_date: Option<DateInput>,
        #[builder(into)] end_date: Option<DateInput>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let id = lookup_id(id.as_deref(), IdKind::DataCategory)?;
        let paging = Paging::validate(start_date, end_date, sort_field, sort_order, limit, offset)?;

        let query = QueryBuilder::new(Endpoint::DataCategories)
            .ids(
                "datasetid",
                filter(dataset_id.as_ref(), IdKind::Dataset, "dataset_id")?,
            )
            .ids(
                "locationid",
                filter(location_id.as_ref(), IdKind::Location, "location_id")?,
            )
            .ids(
                "stationid",
                filter(station_id.as_ref(), IdKind::Station, "station_id")?,
            );
        let query = paging.apply(query).build()?;

        self.get(&query, id)
    }

    /// Lists data types (`TMAX`, `PRCP`, ...), or fetches one with `.id(..)`.
    #[builder]
    pub fn data_types(
        &self,
        #[builder(into)] id: Option<String>,
        #[builder(into)] dataset_id: Option<IdFilter>,
        #[builder(into)] location_id: Option<IdFilter>,
        #[builder(into)] station_id: Option<IdFilter>,
        #[builder(into)] data_category_id: Option<IdFilter>,
        #[builder(into)] start_date: Option<DateInput>,
        #[builder(into)] end_date: Option<DateInput>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let id = lookup_id(id.as_deref(), IdKind::DataType)?;
        let paging = Paging::validate(start_date, end_date, sort_field, sort_order, limit, offset)?;

        let query = QueryBuilder::new(Endpoint::DataTypes)
            .ids(
                "datasetid",
                filter(dataset_id.as_ref(), IdKind::Dataset, "dataset_id")?,
            )
            .ids(
                "locationid",
                filter(location_id.as_ref(), IdKind::Location, "location_id")?,
            )
            .ids(
                "stationid",
                filter(station_id.as_ref(), IdKind::Station, "station_id")?,
            )
            .ids(
                "datacategoryid",
                filter(
                    data_category_id.as_ref(),
                    IdKind::DataCategory,
                    "data_category_id",
                )?,
            );
        let query = paging.apply(query).build()?;

        self.get(&query, id)
    }

    /// Lists location categories (`ST`, `CITY`, ...), or fetches one with `.id(..)`.
    #[builder]
    pub fn location_categories(
        &self,
        #[builder(into)] id: Option<String>,
        #[builder(into)] dataset_id: Option<IdFilter>,
        #[builder(into)] start_date: Option<DateInput>,
        #[builder(into)] end_date: Option<DateInput>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let id = lookup_id(id.as_deref(), IdKind::LocationCategory)?;
        let paging = Paging::validate(start_date, end_date, sort_field, sort_order, limit, offset)?;

        let query = QueryBuilder::new(Endpoint::LocationCategories).ids(
            "datasetid",
            filter(dataset_id.as_ref(), IdKind::Dataset, "dataset_id")?,
        );
        let query = paging.apply(query).build()?;

        self.get(&query, id)
    }

    /// Lists locations, or fetches one with `.id("FIPS:37")`.
    #[builder]
    pub fn locations(
        &self,
        #[builder(into)] id: Option<String>,
        #[builder(into)] dataset_id: Option<IdFilter>,
        #[builder(into)] location_category_id: Option<IdFilter>,
        #[builder(into)] data_category_id: Option<IdFilter>,
        #[builder(into)] start_date: Option<DateInput>,
        #[builder(into)] end_date: Option<DateInput>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let id = lookup_id(id.as_deref(), IdKind::Location)?;
        let paging = Paging::validate(start_date, end_date, sort_field, sort_order, limit, offset)?;

        let query = QueryBuilder::new(Endpoint::Locations)
            .ids(
                "datasetid",
                filter(dataset_id.as_ref(), IdKind::Dataset, "dataset_id")?,
            )
            .ids(
                "locationcategoryid",
                filter(
                    location_category_id.as_ref(),
                    IdKind::LocationCategory,
                    "location_category_id",
                )?,
            )
            .ids(
                "datacategoryid",
                filter(
                    data_category_id.as_ref(),
                    IdKind::DataCategory,
                    "data_category_id",
                )?,
            );
        let query = paging.apply(query).build()?;

        self.get(&query, id)
    }

    /// Lists stations, or fetches one with `.id("GHCND:USW00094728")`.
    ///
    /// `extent` restricts results to a `minLat,minLon,maxLat,maxLon` box and combines
    /// with the other filters.
    ///
    /// ```no_run
    /// # fn main() -> Result<(), noaa_cdo::Error> {
    /// let client = noaa_cdo::Client::with_token("my-token")?;
    /// let stations = client
    ///     .stations()
    ///     .dataset_id("GHCND")
    ///     .location_id("FIPS:37")
    ///     .limit(10)
    ///     .call()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn stations(
        &self,
        #[builder(into)] id: Option<String>,
        #[builder(into)] dataset_id: Option<IdFilter>,
        #[builder(into)] location_id: Option<IdFilter>,
        #[builder(into)] data_category_id: Option<IdFilter>,
        #[builder(into)] data_type_id: Option<IdFilter>,
        #[builder(into)] extent: Option<ExtentInput>,
        #[builder(into)] start_date: Option<DateInput>,
        #[builder(into)] end_date: Option<DateInput>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let id = lookup_id(id.as_deref(), IdKind::Station)?;
        let extent = extent.as_ref().map(validate::extent).transpose()?;
        let paging = Paging::validate(start_date, end_date, sort_field, sort_order, limit, offset)?;

        let query = QueryBuilder::new(Endpoint::Stations)
            .ids(
                "datasetid",
                filter(dataset_id.as_ref(), IdKind::Dataset, "dataset_id")?,
            )
            .ids(
                "locationid",
                filter(location_id.as_ref(), IdKind::Location, "location_id")?,
            )
            .ids(
                "datacategoryid",
                filter(
                    data_category_id.as_ref(),
                    IdKind::DataCategory,
                    "data_category_id",
                )?,
            )
            .ids(
                "datatypeid",
                filter(data_type_id.as_ref(), IdKind::DataType, "data_type_id")?,
            )
            .value("extent", extent);
        let query = paging.apply(query).build()?;

        self.get(&query, id)
    }

    /// Fetches observations for one dataset over a date range.
    ///
    /// `dataset_id`, `start_date` and `end_date` are required. `units` defaults to
    /// [`Units::Metric`]. There is no built-in pagination loop: read
    /// [`crate::ResultSet`] from the response and call again with the next `offset`.
    ///
    /// ```no_run
    /// # fn main() -> Result<(), noaa_cdo::Error> {
    /// let client = noaa_cdo::Client::with_token("my-token")?;
    /// let observations = client
    ///     .data()
    ///     .dataset_id("GHCND")
    ///     .start_date("2023-01-01")
    ///     .end_date("2023-01-31")
    ///     .station_id("GHCND:USW00094728")
    ///     .data_type_id(["TMAX", "TMIN"])
    ///     .limit(1000)
    ///     .call()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn data(
        &self,
        #[builder(into)] dataset_id: String,
        #[builder(into)] start_date: DateInput,
        #[builder(into)] end_date: DateInput,
        #[builder(into)] data_type_id: Option<IdFilter>,
        #[builder(into)] location_id: Option<IdFilter>,
        #[builder(into)] station_id: Option<IdFilter>,
        #[builder(default = Units::Metric)] units: Units,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
        include_metadata: Option<bool>,
    ) -> Result<Value> {
        let dataset_id = validate::id(&dataset_id, IdKind::Dataset, "dataset_id")?;
        let paging = Paging::validate(
            Some(start_date),
            Some(end_date),
            sort_field,
            sort_order,
            limit,
            offset,
        )?;

        let query = QueryBuilder::new(Endpoint::Data)
            .value("datasetid", Some(dataset_id))
            .ids(
                "datatypeid",
                filter(data_type_id.as_ref(), IdKind::DataType, "data_type_id")?,
            )
            .ids(
                "locationid",
                filter(location_id.as_ref(), IdKind::Location, "location_id")?,
            )
            .ids(
                "stationid",
                filter(station_id.as_ref(), IdKind::Station, "station_id")?,
            )
            .value("units", Some(units))
            .value("includemetadata", include_metadata);
        let query = paging.apply(query).build()?;

        self.get(&query, None)
    }
}
