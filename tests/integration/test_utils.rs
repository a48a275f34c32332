//! Shared fixtures for integration tests
//!
//! Seeds a response cache with one small OpenF1 session (2023 Bahrain Grand
//! Prix race, driver VER, one lap) so that runs never reach the network.
//! The provider base URL points at the discard port; any request the cache
//! does not answer fails fast.

use std::path::Path;
use telget::config::ProviderSettings;
use telget::provider::{HttpCache, OpenF1Client};

pub const OFFLINE_BASE_URL: &str = "http://127.0.0.1:9";

pub fn offline_settings() -> ProviderSettings {
    ProviderSettings {
        base_url: OFFLINE_BASE_URL.to_string(),
        connect_timeout_secs: 1,
        request_timeout_secs: 2,
    }
}

/// Write one cache entry for `path?query`, including empty bodies.
fn seed(cache: &HttpCache, client: &OpenF1Client, path: &str, query: &[(&str, String)], body: &str) {
    let url = client.endpoint_url(path, query).unwrap();
    let entry = cache.entry_path(url.as_str()).unwrap();
    std::fs::write(entry, body).unwrap();
}

/// Seed `cache_dir` with the Bahrain fixture.
pub fn seed_bahrain(cache_dir: &Path) {
    let cache = HttpCache::enable(cache_dir).unwrap();
    let client = OpenF1Client::new(&offline_settings(), cache.clone()).unwrap();

    seed(
        &cache,
        &client,
        "meetings",
        &[("year", "2023".to_string())],
        r#"[
            {"meeting_key": 1140, "meeting_name": "Pre-Season Testing", "country_name": "Bahrain",
             "date_start": "2023-02-23T07:00:00+00:00"},
            {"meeting_key": 1141, "meeting_name": "Bahrain Grand Prix", "country_name": "Bahrain",
             "date_start": "2023-03-03T11:30:00+00:00"}
        ]"#,
    );
    seed(
        &cache,
        &client,
        "sessions",
        &[("meeting_key", "1141".to_string())],
        r#"[
            {"session_key": 7950, "session_name": "Qualifying", "date_start": "2023-03-04T15:00:00+00:00"},
            {"session_key": 7953, "session_name": "Race", "date_start": "2023-03-05T15:00:00+00:00"}
        ]"#,
    );
    seed(
        &cache,
        &client,
        "drivers",
        &[
            ("session_key", "7953".to_string()),
            ("name_acronym", "VER".to_string()),
        ],
        r#"[{"driver_number": 1, "name_acronym": "VER"}]"#,
    );
    seed(
        &cache,
        &client,
        "drivers",
        &[
            ("session_key", "7953".to_string()),
            ("name_acronym", "XYZ".to_string()),
        ],
        "[]",
    );

    let driver_query = [
        ("session_key", "7953".to_string()),
        ("driver_number", "1".to_string()),
    ];
    seed(
        &cache,
        &client,
        "laps",
        &driver_query,
        r#"[{"lap_number": 1, "date_start": "2023-03-05T15:03:00.000000+00:00", "lap_duration": 2.0}]"#,
    );
    seed(
        &cache,
        &client,
        "car_data",
        &driver_query,
        r#"[
            {"date": "2023-03-05T15:03:00.000000+00:00", "rpm": 11000, "speed": 180, "n_gear": 6,
             "throttle": 100, "brake": 0, "drs": 12},
            {"date": "2023-03-05T15:03:01.000000+00:00", "rpm": 11200, "speed": 180, "n_gear": 6,
             "throttle": 100, "brake": 0, "drs": 12},
            {"date": "2023-03-05T15:03:05.000000+00:00", "rpm": 9000, "speed": 150, "n_gear": 5,
             "throttle": 40, "brake": 100, "drs": 0}
        ]"#,
    );
    seed(
        &cache,
        &client,
        "location",
        &driver_query,
        r#"[
            {"date": "2023-03-05T15:03:00.000000+00:00", "x": 0, "y": 0, "z": 100},
            {"date": "2023-03-05T15:03:02.000000+00:00", "x": 20, "y": -10, "z": 100}
        ]"#,
    );
}
