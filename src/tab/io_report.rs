// Writing the frequency tables as CSV files.

use crate::tab::*;
use snafu::prelude::*;

pub fn report_file_name(partition: Partition, mode: NameMode) -> String {
    match partition.label() {
        Some(gender) => format!("nameRatios_full_{}_{}.csv", gender, mode.as_str()),
        None => format!("nameRatios_full_{}.csv", mode.as_str()),
    }
}

/// Writes one report into `out_dir` and returns its path.
pub fn write_report(out_dir: &Path, report: &Report, mode: NameMode) -> TallyResult<PathBuf> {
    fs::create_dir_all(out_dir).context(CreatingOutputDirSnafu {
        path: out_dir.display().to_string(),
    })?;
    let path = out_dir.join(report_file_name(report.partition, mode));
    let p = path.display().to_string();
    info!("Writing {} names to {:?}", report.rows.len(), p);

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(&path)
        .context(WritingReportSnafu { path: &p })?;
    wtr.write_record(&report.header)
        .context(WritingReportSnafu { path: &p })?;
    let mut record: Vec<String> = Vec::with_capacity(report.header.len());
    for row in report.rows.iter() {
        record.clear();
        record.push(row.name.clone());
        record.extend(row.counts.iter().map(|c| c.to_string()));
        wtr.write_record(&record)
            .with_context(|_| WritingReportSnafu { path: &p })?;
    }
    wtr.flush().context(FlushingReportSnafu { path: &p })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_encode_mode_and_partition() {
        assert_eq!(
            report_file_name(Partition::All, NameMode::Middle),
            "nameRatios_full_middle.csv"
        );
        assert_eq!(
            report_file_name(Partition::Gender(Gender::Female), NameMode::First),
            "nameRatios_full_female_first.csv"
        );
        assert_eq!(
            report_file_name(Partition::Gender(Gender::Unknown), NameMode::Last),
            "nameRatios_full_unknown_last.csv"
        );
    }

    #[test]
    fn unwritable_directory_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        // A regular file where the directory should be.
        let blocker = dir.path().join("out");
        fs::write(&blocker, "").unwrap();
        let report = Report {
            partition: Partition::All,
            header: vec!["Name".to_string()],
            rows: vec![],
        };
        let res = write_report(&blocker, &report, NameMode::First);
        assert!(matches!(res, Err(TallyError::CreatingOutputDir { .. })));
    }
}
