//! A small Rust client for NOAA's Climate Data Online (CDO) v2 web services.
//!
//! Each resource (datasets, data categories, data types, location categories,
//! locations, stations and data) is one builder-style method on [`Client`]. Options
//! are validated before anything is sent; a call then makes a single GET and returns
//! the decoded JSON exactly as CDO sent it.
//!
//! ## Quick start
//! - Request a token at <https://www.ncdc.noaa.gov/cdo-web/token>.
//! - Pass it to [`Client::with_token`], or configure it via the `NOAA_CDO_TOKEN`
//!   environment variable or a `.noaacdorc` file and use [`Client::from_env`].
//!
//! ```no_run
//! use noaa_cdo::{Client, ResultSet};
//!
//! fn main() -> Result<(), noaa_cdo::Error> {
//!     let client = Client::from_env()?;
//!     let stations = client
//!         .stations()
//!         .dataset_id("GHCND")
//!         .location_id("FIPS:37")
//!         .limit(10)
//!         .call()?;
//!
//!     for station in noaa_cdo::results(&stations) {
//!         println!("{} {}", station["id"], station["name"]);
//!     }
//!     if let Some(page) = ResultSet::from_envelope(&stations) {
//!         println!("{} stations in total", page.count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//! Every failure is one [`Error`]: [`Error::Validation`] before any I/O,
//! [`Error::Client`] for 4xx answers, [`Error::Service`] for 5xx answers and transport
//! failures, [`Error::Response`] for a 2xx body that is not JSON.

#![forbid(unsafe_code)]

mod api;
mod client;
mod config;
mod endpoint;
mod error;
mod params;
mod query;
mod response;
pub mod validate;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_TIMEOUT, DEFAULT_URL};
pub use endpoint::Endpoint;
pub use error::{ConfigError, Error, Result, ValidationError};
pub use params::{DateInput, Extent, ExtentInput, IdFilter, SortField, SortOrder, Units};
pub use response::{ResultSet, results};
