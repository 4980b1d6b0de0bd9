//! COVID-EMDA data release (Texas A&M) hosted on GitHub.
//!
//! Each market publishes `{market}_rto_genmix.csv` (one row per date and
//! fuel, hourly columns `00:00`..`23:00`) and `{market}_rto_load.csv` (one
//! row per date, same hourly columns).

use super::DataSource;

pub const COVID_EMDA_ROOT: &str =
    "https://raw.githubusercontent.com/tamu-engineering-research/COVID-EMDA/master/";

pub fn release_url(market: &str, table: &str) -> String {
    let market = market.to_ascii_lowercase();
    format!("{COVID_EMDA_ROOT}data_release/{market}/{market}_rto_{table}.csv")
}

pub fn genmix(market: &str) -> DataSource {
    DataSource::Url(release_url(market, "genmix"))
}

pub fn load(market: &str) -> DataSource {
    DataSource::Url(release_url(market, "load"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caiso_urls_match_release_layout() {
        assert_eq!(
            genmix("CAISO").to_string(),
            "https://raw.githubusercontent.com/tamu-engineering-research/COVID-EMDA/master/data_release/caiso/caiso_rto_genmix.csv"
        );
        assert!(load("caiso").to_string().ends_with("caiso/caiso_rto_load.csv"));
    }
}
