use crate::tab::*;
use snafu::prelude::*;

use text_diff::print_diff;

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn resolve_input_path(root: &str, path: &str) -> PathBuf {
    if root.is_empty() {
        PathBuf::from(path)
    } else {
        [root, path].iter().collect()
    }
}

/// Compares a written report with the file of the same name in `reference_dir`.
pub fn check_against_reference(report: &Path, reference_dir: &Path) -> TallyResult<()> {
    let file_name = match report.file_name() {
        Some(f) => f,
        None => whatever!("Report path {:?} has no file name", report),
    };
    let reference = reference_dir.join(file_name);
    let expected = fs::read_to_string(&reference).context(ReadingReportSnafu {
        path: reference.display().to_string(),
    })?;
    let produced = fs::read_to_string(report).context(ReadingReportSnafu {
        path: report.display().to_string(),
    })?;
    if expected != produced {
        warn!(
            "Found differences with the reference report {:?}",
            reference
        );
        print_diff(expected.as_str(), produced.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: report.display().to_string(),
        }
        .fail();
    }
    debug!("{:?} matches {:?}", report, reference);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_root_and_path() {
        assert_eq!(
            resolve_input_path("/data/CronJob/", "2021february07/x.tab"),
            PathBuf::from("/data/CronJob/2021february07/x.tab")
        );
        assert_eq!(resolve_input_path("", "x.tab"), PathBuf::from("x.tab"));
        assert_eq!(simplify_file_name(Path::new("/a/b/x.tab")), "x.tab");
    }

    #[test]
    fn missing_reference_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = dir.path().join("nameRatios_full_first.csv");
        fs::write(&report, "Name\n").unwrap();
        let res = check_against_reference(&report, &dir.path().join("nowhere"));
        assert!(matches!(res, Err(TallyError::ReadingReport { .. })));
        assert!(check_against_reference(&report, dir.path()).is_ok());
    }
}
