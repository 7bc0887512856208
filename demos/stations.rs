use anyhow::Result;
use noaa_cdo::{Client, ResultSet};

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Configure the token via NOAA_CDO_TOKEN or a `.noaacdorc` file.
    let client = Client::from_env()?;

    let stations = client
        .stations()
        .dataset_id("GHCND")
        .location_id("FIPS:37")
        .limit(10)
        .call()?;

    for station in noaa_cdo::results(&stations) {
        println!(
            "{:<20} {:<40} {:>9} {:>10}",
            station["id"].as_str().unwrap_or("?"),
            station["name"].as_str().unwrap_or("?"),
            station["latitude"],
            station["longitude"],
        );
    }

    if let Some(page) = ResultSet::from_envelope(&stations) {
        println!("showing {} of {} stations", page.limit.min(page.count), page.count);
    }
    Ok(())
}
