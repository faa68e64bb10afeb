// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The name component used as the key of the frequency tables.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NameMode {
    First,
    Middle,
    Last,
}

impl NameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameMode::First => "first",
            NameMode::Middle => "middle",
            NameMode::Last => "last",
        }
    }
}

impl FromStr for NameMode {
    type Err = TallyErrors;

    fn from_str(s: &str) -> Result<NameMode, TallyErrors> {
        match s {
            "first" => Ok(NameMode::First),
            "middle" => Ok(NameMode::Middle),
            "last" => Ok(NameMode::Last),
            x => Err(TallyErrors::InvalidMode(x.to_string())),
        }
    }
}

/// Parses the yes/no flag that turns on the gender partition.
pub fn parse_gender_segregation(s: &str) -> Result<bool, TallyErrors> {
    match s {
        "yes" => Ok(true),
        "no" => Ok(false),
        x => Err(TallyErrors::InvalidGenderFlag(x.to_string())),
    }
}

/// The reported gender of a voter.
///
/// Only the exact codes `M` and `F` are recognized. Everything else,
/// including a blank field, is `Unknown`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// All the partitions, in the order the reports are written.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unknown];

    pub fn from_code(code: &str) -> Gender {
        match code {
            "M" => Gender::Male,
            "F" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Unknown => 2,
        }
    }
}

/// One entry of the ethnicity vocabulary: the code found in the input
/// and the label used in the report header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ethnicity {
    pub code: String,
    pub label: String,
}

impl Ethnicity {
    pub fn new(code: &str, label: &str) -> Ethnicity {
        Ethnicity {
            code: code.to_string(),
            label: label.to_string(),
        }
    }
}

/// The closed set of ethnicity codes that get a column in the reports.
///
/// The order of the entries is the order of the columns.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<Ethnicity>,
}

impl Vocabulary {
    pub const SIZE: usize = 7;

    /// Builds a vocabulary. It must contain exactly 7 entries with distinct codes.
    pub fn new(entries: Vec<Ethnicity>) -> Result<Vocabulary, TallyErrors> {
        if entries.len() != Vocabulary::SIZE {
            return Err(TallyErrors::InvalidVocabulary(format!(
                "expected {} ethnicities, found {}",
                Vocabulary::SIZE,
                entries.len()
            )));
        }
        for (idx, e) in entries.iter().enumerate() {
            if entries[..idx].iter().any(|e2| e2.code == e.code) {
                return Err(TallyErrors::InvalidVocabulary(format!(
                    "duplicate ethnicity code {:?}",
                    e.code
                )));
            }
        }
        Ok(Vocabulary { entries })
    }

    /// The vocabulary of the L2 VM2 demographic extracts. The codes are the
    /// descriptions written in the files, the blank code means no race was reported.
    pub fn l2_demographic() -> Vocabulary {
        Vocabulary {
            entries: vec![
                Ethnicity::new("", "No Race"),
                Ethnicity::new(
                    "Native American (self reported)",
                    "Native American (self reported)",
                ),
                Ethnicity::new("East Asian", "East Asian"),
                Ethnicity::new(
                    "African or Af-Am Self Reported",
                    "African or Af-Am Self Reported",
                ),
                Ethnicity::new("Hispanic", "Hispanic"),
                Ethnicity::new("White Self Reported", "White Self Reported"),
                Ethnicity::new("Other Undefined Race", "Other Undefined Race"),
            ],
        }
    }

    pub fn entries(&self) -> &[Ethnicity] {
        &self.entries
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }
}

impl Default for Vocabulary {
    fn default() -> Vocabulary {
        Vocabulary::l2_demographic()
    }
}

/// The 0-based positions of the fields of interest in an input row.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnLayout {
    pub first_name: usize,
    pub middle_name: usize,
    pub last_name: usize,
    pub gender: usize,
    pub ethnicity: usize,
}

impl ColumnLayout {
    /// Layout of the L2 VM2 `DEMOGRAPHIC.tab` files.
    pub const L2_DEMOGRAPHIC: ColumnLayout = ColumnLayout {
        first_name: 14,
        middle_name: 15,
        last_name: 16,
        gender: 65,
        ethnicity: 74,
    };

    pub fn name_column(&self, mode: NameMode) -> usize {
        match mode {
            NameMode::First => self.first_name,
            NameMode::Middle => self.middle_name,
            NameMode::Last => self.last_name,
        }
    }
}

impl Default for ColumnLayout {
    fn default() -> ColumnLayout {
        ColumnLayout::L2_DEMOGRAPHIC
    }
}

/// What to do with the ethnicity codes that are not part of the vocabulary.
///
/// - Drop keeps them in the tables but they do not show in any column of the
/// reports.
///
/// - Column adds a trailing `Unrecognized` column with their sum for each name.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UnrecognizedPolicy {
    Drop,
    Column,
}

impl FromStr for UnrecognizedPolicy {
    type Err = TallyErrors;

    fn from_str(s: &str) -> Result<UnrecognizedPolicy, TallyErrors> {
        match s {
            "drop" => Ok(UnrecognizedPolicy::Drop),
            "column" => Ok(UnrecognizedPolicy::Column),
            x => Err(TallyErrors::InvalidUnrecognizedPolicy(x.to_string())),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyRules {
    pub mode: NameMode,
    pub gender_segregation: bool,
    pub columns: ColumnLayout,
    pub vocabulary: Vocabulary,
    pub unrecognized: UnrecognizedPolicy,
    /// Number of rows between two progress messages. Zero turns them off.
    pub progress_interval: u64,
}

impl TallyRules {
    pub const DEFAULT_PROGRESS_INTERVAL: u64 = 500_000;

    pub fn new(mode: NameMode, gender_segregation: bool) -> TallyRules {
        TallyRules {
            mode,
            gender_segregation,
            columns: ColumnLayout::L2_DEMOGRAPHIC,
            vocabulary: Vocabulary::l2_demographic(),
            unrecognized: UnrecognizedPolicy::Drop,
            progress_interval: TallyRules::DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

// ******** Output data structures *********

/// The set of rows folded into one frequency table.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Partition {
    All,
    Gender(Gender),
}

impl Partition {
    /// The name of the partition, if the rows are segregated by gender.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Partition::All => None,
            Partition::Gender(g) => Some(g.as_str()),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRow {
    pub name: String,
    pub counts: Vec<u64>,
}

/// The rendered content of one frequency table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Report {
    pub partition: Partition,
    pub header: Vec<String>,
    pub rows: Vec<ReportRow>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyStats {
    pub rows_recorded: u64,
    pub distinct_names: Vec<(Partition, usize)>,
    /// Codes outside the vocabulary and their total count, sorted by code.
    pub unrecognized: Vec<(String, u64)>,
}

/// Errors that prevent a row or a configuration from being used.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    InvalidMode(String),
    InvalidGenderFlag(String),
    InvalidUnrecognizedPolicy(String),
    InvalidVocabulary(String),
    RowTooShort { index: usize, width: usize },
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::InvalidMode(x) => {
                write!(f, "Mode must be first, middle, or last (got {:?})", x)
            }
            TallyErrors::InvalidGenderFlag(x) => write!(
                f,
                "Gender segregation must be yes or no (got {:?})",
                x
            ),
            TallyErrors::InvalidUnrecognizedPolicy(x) => write!(
                f,
                "Unrecognized ethnicity policy must be drop or column (got {:?})",
                x
            ),
            TallyErrors::InvalidVocabulary(msg) => write!(f, "Invalid ethnicity list: {}", msg),
            TallyErrors::RowTooShort { index, width } => write!(
                f,
                "field {} requested but the row only has {} fields",
                index, width
            ),
        }
    }
}
