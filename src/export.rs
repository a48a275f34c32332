//! CSV export of telemetry tables.

use crate::error::TelgetError;
use crate::job::JobConfig;
use crate::table::TelemetryTable;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `table` as CSV with a header row.
///
/// The file is written next to its destination and renamed into place, so an
/// interrupted run never leaves a truncated CSV under the final name.
pub fn write_csv(path: &Path, table: &TelemetryTable) -> Result<(), TelgetError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let written = (|| -> Result<(), TelgetError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&partial)?;
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
        drop(writer);
        std::fs::rename(&partial, path)?;
        Ok(())
    })();
    if let Err(e) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }
    debug!(path = %path.display(), rows = table.len(), "csv written");
    Ok(())
}

/// Writes one CSV per job into an output directory.
#[derive(Debug, Clone)]
pub struct TelemetryWriter {
    output_dir: PathBuf,
}

impl TelemetryWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Destination of a job's CSV. Bare filename for the current directory.
    pub fn path_for(&self, job: &JobConfig) -> PathBuf {
        if self.output_dir == Path::new(".") {
            PathBuf::from(job.output_filename())
        } else {
            self.output_dir.join(job.output_filename())
        }
    }

    /// Write the job's telemetry and return the path written.
    pub fn write(&self, job: &JobConfig, table: &TelemetryTable) -> Result<PathBuf, TelgetError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(job);
        write_csv(&path, table)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobSpec;
    use crate::table::Cell;
    use tempfile::TempDir;

    fn sample_table() -> TelemetryTable {
        let mut table = TelemetryTable::new(["Date", "Speed", "Brake", "X"]);
        table
            .push_row(vec![
                Cell::Text("2023-03-05T15:03:00.120Z".to_string()),
                Cell::Float(287.0),
                Cell::Bool(false),
                Cell::Float(-1200.5),
            ])
            .unwrap();
        table
            .push_row(vec![
                Cell::Text("2023-03-05T15:03:00.390Z".to_string()),
                Cell::Float(289.0),
                Cell::Bool(true),
                Cell::Empty,
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");
        write_csv(&path, &sample_table()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Date,Speed,Brake,X");
        assert_eq!(lines[1], "2023-03-05T15:03:00.120Z,287,False,-1200.5");
        assert_eq!(lines[2], "2023-03-05T15:03:00.390Z,289,True,");
        assert_eq!(lines.len(), 3);
        assert!(!temp.path().join("out.csv.part").exists());
    }

    #[test]
    fn test_text_cells_are_quoted_when_needed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("quoted.csv");
        let mut table = TelemetryTable::new(["Note"]);
        table
            .push_row(vec![Cell::Text("slow, then fast".to_string())])
            .unwrap();
        write_csv(&path, &table).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Note\n\"slow, then fast\"\n");
    }

    #[test]
    fn test_writer_creates_directory_and_uses_job_filename() {
        let temp = TempDir::new().unwrap();
        let writer = TelemetryWriter::new(temp.path().join("exports"));
        let job = JobConfig::from_spec(&JobSpec::from_fields(2022, "Saudi Arabia", "R", "ALO"))
            .unwrap();

        let path = writer.write(&job, &sample_table()).unwrap();
        assert_eq!(
            path,
            temp.path()
                .join("exports")
                .join("2022-saudi-arabia-r-alo-telemetry.csv")
        );
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let temp = TempDir::new().unwrap();
        // A directory in the way makes the final rename fail.
        let path = temp.path().join("blocked.csv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        assert!(write_csv(&path, &sample_table()).is_err());
        assert!(!temp.path().join("blocked.csv.part").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_current_directory_paths_are_bare_filenames() {
        let writer = TelemetryWriter::new(".");
        let job = JobConfig::from_spec(&JobSpec::from_fields(2023, "Monaco", "Q", "LEC")).unwrap();
        assert_eq!(
            writer.path_for(&job),
            PathBuf::from("2023-monaco-q-lec-telemetry.csv")
        );
    }
}
