//! End-to-end batch runs against a pre-seeded response cache.

use telget::batch::{BatchDriver, JobOutcome};
use telget::export::TelemetryWriter;
use telget::job::JobSpec;
use telget::provider::{HttpCache, OpenF1Client};
use tempfile::TempDir;

use crate::integration::test_utils::{offline_settings, seed_bahrain};

fn run_batch(jobs: Vec<JobSpec>, temp: &TempDir) -> (telget::batch::BatchSummary, String) {
    let cache_dir = temp.path().join("cache");
    seed_bahrain(&cache_dir);
    let cache = HttpCache::enable(&cache_dir).unwrap();
    let client = OpenF1Client::new(&offline_settings(), cache).unwrap();
    let driver = BatchDriver::new(client, TelemetryWriter::new(temp.path().join("out")));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut out = Vec::new();
    let summary = rt.block_on(driver.run(&jobs, &mut out)).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

#[test]
fn test_cached_session_is_written_as_csv() {
    let temp = TempDir::new().unwrap();
    let (summary, printed) = run_batch(
        vec![JobSpec::from_fields(2023, "Bahrain", "R", "VER")],
        &temp,
    );

    let expected = temp
        .path()
        .join("out")
        .join("2023-bahrain-r-ver-telemetry.csv");
    assert_eq!(summary.reports[0].outcome, JobOutcome::Saved(expected.clone()));
    assert!(printed.contains(&format!("Telemetry data saved to: {}", expected.display())));

    let content = std::fs::read_to_string(&expected).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "Date,SessionTime,LapNumber,Time,RPM,Speed,nGear,Throttle,Brake,DRS,X,Y,Z,Distance,RelativeDistance"
    );
    // The third car sample falls after the only lap and is dropped.
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "2023-03-05T15:03:00.000Z,180,1,0,11000,180,6,100,False,12,0,0,100,0,0"
    );
    assert_eq!(
        lines[2],
        "2023-03-05T15:03:01.000Z,181,1,1,11200,180,6,100,False,12,10,-5,100,50,1"
    );
}

#[test]
fn test_mixed_batch_isolates_failures() {
    let temp = TempDir::new().unwrap();
    let jobs = vec![
        JobSpec::from_fields(2023, "Atlantis", "R", "VER"),
        JobSpec::from_fields(2023, "Bahrain", "R", "XYZ"),
        JobSpec::from_fields(2023, "bahrain grand prix", "race", "ver"),
    ];
    let (summary, printed) = run_batch(jobs, &temp);

    assert_eq!(summary.reports.len(), 3);
    assert!(matches!(summary.reports[0].outcome, JobOutcome::Failed(_)));
    assert_eq!(summary.reports[1].outcome, JobOutcome::NoData);
    assert!(matches!(summary.reports[2].outcome, JobOutcome::Saved(_)));
    assert!(printed.contains("Event not found"));
    assert!(printed.contains("No data found for driver XYZ in this session."));
    assert!(temp
        .path()
        .join("out")
        .join("2023-bahrain-grand-prix-race-ver-telemetry.csv")
        .exists());
}

#[test]
fn test_missing_session_fails_the_job() {
    let temp = TempDir::new().unwrap();
    let (summary, printed) = run_batch(
        vec![JobSpec::from_fields(2023, "Bahrain", "FP1", "VER")],
        &temp,
    );
    assert_eq!(summary.failed(), 1);
    assert!(printed.contains("Session not found"));
}
