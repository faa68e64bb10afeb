use crate::tab::*;
use snafu::prelude::*;

use serde::{Deserialize, Serialize};

/// The demographic extracts read when no input is configured, relative to the input root.
pub const DEFAULT_INPUT_PATHS: [&str; 6] = [
    "2020october05/VM2--SC--2020-10-01-DEMOGRAPHIC.tab",
    "2021january26/VM2--LA--2021-01-22-DEMOGRAPHIC.tab",
    "2021february07/VM2--NC--2021-01-28-DEMOGRAPHIC.tab",
    "2021february07/VM2--AL--2021-02-04-DEMOGRAPHIC.tab",
    "2021february07/VM2--FL--2021-02-04-DEMOGRAPHIC.tab",
    "2021february07/VM2--GA--2021-02-04-DEMOGRAPHIC.tab",
];

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSettings {
    #[serde(rename = "firstName")]
    pub first_name: Option<usize>,
    #[serde(rename = "middleName")]
    pub middle_name: Option<usize>,
    #[serde(rename = "lastName")]
    pub last_name: Option<usize>,
    pub gender: Option<usize>,
    pub ethnicity: Option<usize>,
}

impl ColumnSettings {
    /// The layout, with the missing positions taken from the L2 layout.
    pub fn layout(&self) -> ColumnLayout {
        let d = ColumnLayout::L2_DEMOGRAPHIC;
        ColumnLayout {
            first_name: self.first_name.unwrap_or(d.first_name),
            middle_name: self.middle_name.unwrap_or(d.middle_name),
            last_name: self.last_name.unwrap_or(d.last_name),
            gender: self.gender.unwrap_or(d.gender),
            ethnicity: self.ethnicity.unwrap_or(d.ethnicity),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EthnicitySetting {
    pub code: String,
    pub label: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(rename = "inputRoot")]
    pub input_root: Option<String>,
    #[serde(rename = "inputPaths")]
    pub input_paths: Option<Vec<String>>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    pub columns: Option<ColumnSettings>,
    pub ethnicities: Option<Vec<EthnicitySetting>>,
    #[serde(rename = "unrecognizedEthnicity")]
    pub unrecognized_ethnicity: Option<String>,
    #[serde(rename = "progressInterval")]
    pub progress_interval: Option<u64>,
}

impl TallyConfig {
    /// The input files, joined with the input root.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        let root = self.input_root.clone().unwrap_or_default();
        match &self.input_paths {
            Some(paths) => paths
                .iter()
                .map(|p| resolve_input_path(&root, p))
                .collect(),
            None => DEFAULT_INPUT_PATHS
                .iter()
                .map(|p| resolve_input_path(&root, p))
                .collect(),
        }
    }

    /// Validates the configuration. The policy passed as an argument takes
    /// precedence over the one of the file.
    pub fn builder(
        &self,
        mode: NameMode,
        gender_segregation: bool,
        unrecognized: Option<UnrecognizedPolicy>,
    ) -> TallyResult<Builder> {
        let mut builder = Builder::new(mode).gender_segregation(gender_segregation);

        if let Some(columns) = &self.columns {
            builder = builder.columns(columns.layout());
        }

        if let Some(ethnicities) = &self.ethnicities {
            let entries: Vec<Ethnicity> = ethnicities
                .iter()
                .map(|e| Ethnicity::new(&e.code, &e.label))
                .collect();
            let vocabulary = Vocabulary::new(entries).context(InvalidConfigSnafu {})?;
            builder = builder.vocabulary(vocabulary);
        }

        let policy = match (unrecognized, &self.unrecognized_ethnicity) {
            (Some(p), _) => Some(p),
            (None, Some(s)) => Some(
                s.parse::<UnrecognizedPolicy>()
                    .context(InvalidConfigSnafu {})?,
            ),
            (None, None) => None,
        };
        if let Some(p) = policy {
            builder = builder.unrecognized(p);
        }

        if let Some(n) = self.progress_interval {
            builder = builder.progress_interval(n);
        }

        debug!("builder: rules: {:?}", builder.rules());
        Ok(builder)
    }
}

pub fn read_config(path: &str) -> TallyResult<TallyConfig> {
    info!("Attempting to read config file {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    let config: TallyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingConfigSnafu { path })?;
    Ok(config)
}
