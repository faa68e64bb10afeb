mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;

/// Counts of ethnicity codes for each name.
///
/// Names are kept in the order they were first seen. A missing cell is
/// zero: there is no implicit default on insertion, entries are created
/// explicitly by `increment`.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, HashMap<String, u64>)>,
}

impl FrequencyTable {
    pub fn new() -> FrequencyTable {
        FrequencyTable::default()
    }

    /// Adds one occurrence of `code` for `name`.
    pub fn increment(&mut self, name: &str, code: &str) {
        let pos = match self.index.get(name) {
            Some(pos) => *pos,
            None => {
                let pos = self.entries.len();
                self.index.insert(name.to_string(), pos);
                self.entries.push((name.to_string(), HashMap::new()));
                pos
            }
        };
        let codes = &mut self.entries[pos].1;
        match codes.get_mut(code) {
            Some(c) => *c += 1,
            None => {
                codes.insert(code.to_string(), 1);
            }
        }
    }

    pub fn count(&self, name: &str, code: &str) -> u64 {
        self.codes(name)
            .and_then(|codes| codes.get(code))
            .cloned()
            .unwrap_or(0)
    }

    /// All the codes recorded for a name, including the ones outside the vocabulary.
    pub fn codes(&self, name: &str) -> Option<&HashMap<String, u64>> {
        self.index.get(name).map(|pos| &self.entries[*pos].1)
    }

    /// Iterates over the names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<String, u64>)> {
        self.entries.iter().map(|(n, codes)| (n.as_str(), codes))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the table against a vocabulary: one row per name, one count per code.
    pub fn render(
        &self,
        partition: Partition,
        vocabulary: &Vocabulary,
        policy: UnrecognizedPolicy,
    ) -> Report {
        let mut header: Vec<String> = vec!["Name".to_string()];
        header.extend(vocabulary.entries().iter().map(|e| e.label.clone()));
        if policy == UnrecognizedPolicy::Column {
            header.push(UNRECOGNIZED_LABEL.to_string());
        }

        let rows: Vec<ReportRow> = self
            .iter()
            .map(|(name, codes)| {
                let mut counts: Vec<u64> = vocabulary
                    .entries()
                    .iter()
                    .map(|e| codes.get(&e.code).cloned().unwrap_or(0))
                    .collect();
                if policy == UnrecognizedPolicy::Column {
                    let other: u64 = codes
                        .iter()
                        .filter(|(code, _)| !vocabulary.contains(code))
                        .map(|(_, c)| *c)
                        .sum();
                    counts.push(other);
                }
                ReportRow {
                    name: name.to_string(),
                    counts,
                }
            })
            .collect();

        Report {
            partition,
            header,
            rows,
        }
    }
}

/// Header of the extra column added with `UnrecognizedPolicy::Column`.
pub const UNRECOGNIZED_LABEL: &str = "Unrecognized";

/// Folds input rows into frequency tables.
///
/// There is one table when the rules do not segregate by gender, and one per
/// `Gender` otherwise. A row always lands in exactly one table.
#[derive(Debug, Clone)]
pub struct Tabulator {
    rules: TallyRules,
    tables: Vec<(Partition, FrequencyTable)>,
    rows_recorded: u64,
    unrecognized: HashMap<String, u64>,
}

impl Tabulator {
    pub fn new(rules: &TallyRules) -> Tabulator {
        let partitions: Vec<Partition> = if rules.gender_segregation {
            Gender::ALL.iter().map(|g| Partition::Gender(*g)).collect()
        } else {
            vec![Partition::All]
        };
        info!(
            "Tabulating by {} name, partitions: {:?}",
            rules.mode.as_str(),
            partitions
        );
        Tabulator {
            rules: rules.clone(),
            tables: partitions
                .into_iter()
                .map(|p| (p, FrequencyTable::new()))
                .collect(),
            rows_recorded: 0,
            unrecognized: HashMap::new(),
        }
    }

    pub fn rules(&self) -> &TallyRules {
        &self.rules
    }

    /// Records one input row.
    ///
    /// The name and the ethnicity columns are always required. The gender column
    /// is only read when segregating. A short row is an error and leaves the
    /// tables untouched.
    pub fn record<S: AsRef<str>>(&mut self, row: &[S]) -> Result<Partition, TallyErrors> {
        let name = field(row, self.rules.columns.name_column(self.rules.mode))?;
        let code = field(row, self.rules.columns.ethnicity)?;
        let slot = if self.rules.gender_segregation {
            let gender = Gender::from_code(field(row, self.rules.columns.gender)?);
            gender.index()
        } else {
            0
        };

        let partition = self.tables[slot].0;
        self.tables[slot].1.increment(name, code);
        self.rows_recorded += 1;

        if !self.rules.vocabulary.contains(code) {
            debug!("record: name {:?}: unrecognized ethnicity {:?}", name, code);
            match self.unrecognized.get_mut(code) {
                Some(c) => *c += 1,
                None => {
                    self.unrecognized.insert(code.to_string(), 1);
                }
            }
        }
        Ok(partition)
    }

    pub fn table(&self, partition: Partition) -> Option<&FrequencyTable> {
        self.tables
            .iter()
            .find(|(p, _)| *p == partition)
            .map(|(_, t)| t)
    }

    pub fn tables(&self) -> impl Iterator<Item = (Partition, &FrequencyTable)> {
        self.tables.iter().map(|(p, t)| (*p, t))
    }

    pub fn rows_recorded(&self) -> u64 {
        self.rows_recorded
    }

    /// One report per table, male, female then unknown when segregating.
    pub fn reports(&self) -> Vec<Report> {
        self.tables
            .iter()
            .map(|(p, t)| t.render(*p, &self.rules.vocabulary, self.rules.unrecognized))
            .collect()
    }

    pub fn stats(&self) -> TallyStats {
        let mut unrecognized: Vec<(String, u64)> = self
            .unrecognized
            .iter()
            .map(|(code, c)| (code.clone(), *c))
            .collect();
        unrecognized.sort();
        TallyStats {
            rows_recorded: self.rows_recorded,
            distinct_names: self.tables.iter().map(|(p, t)| (*p, t.len())).collect(),
            unrecognized,
        }
    }
}

fn field<S: AsRef<str>>(row: &[S], index: usize) -> Result<&str, TallyErrors> {
    row.get(index)
        .map(|s| s.as_ref())
        .ok_or(TallyErrors::RowTooShort {
            index,
            width: row.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // A narrow layout for synthetic rows: first, middle, last, gender, ethnicity.
    const LAYOUT: ColumnLayout = ColumnLayout {
        first_name: 0,
        middle_name: 1,
        last_name: 2,
        gender: 3,
        ethnicity: 4,
    };

    fn numeric_vocabulary() -> Vocabulary {
        let labels = Vocabulary::l2_demographic();
        let codes = ["", "1", "2", "3", "4", "5", "6"];
        Vocabulary::new(
            labels
                .entries()
                .iter()
                .zip(codes.iter())
                .map(|(e, code)| Ethnicity::new(code, &e.label))
                .collect(),
        )
        .unwrap()
    }

    fn rules(mode: NameMode, gender_segregation: bool) -> TallyRules {
        TallyRules {
            columns: LAYOUT,
            vocabulary: numeric_vocabulary(),
            ..TallyRules::new(mode, gender_segregation)
        }
    }

    fn row(first: &str, gender: &str, code: &str) -> Vec<String> {
        vec![first, "Q", "Smith", gender, code]
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn single_hispanic_name_renders_in_fifth_column() {
        let mut t = Tabulator::new(&rules(NameMode::First, false));
        t.record(&row("X", "M", "4")).unwrap();
        let reports = t.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].header,
            vec![
                "Name",
                "No Race",
                "Native American (self reported)",
                "East Asian",
                "African or Af-Am Self Reported",
                "Hispanic",
                "White Self Reported",
                "Other Undefined Race"
            ]
        );
        assert_eq!(
            reports[0].rows,
            vec![ReportRow {
                name: "X".to_string(),
                counts: vec![0, 0, 0, 0, 1, 0, 0]
            }]
        );
    }

    #[test]
    fn nested_counts_accumulate() {
        let mut t = Tabulator::new(&rules(NameMode::First, false));
        for (name, code) in [("ANN", "5"), ("ANN", "5"), ("ANN", ""), ("BOB", "3")] {
            t.record(&row(name, "F", code)).unwrap();
        }
        let table = t.table(Partition::All).unwrap();
        assert_eq!(table.count("ANN", "5"), 2);
        assert_eq!(table.count("ANN", ""), 1);
        assert_eq!(table.count("ANN", "3"), 0);
        assert_eq!(table.count("BOB", "3"), 1);
        assert_eq!(table.count("CARL", "3"), 0);
        assert_eq!(t.rows_recorded(), 4);
    }

    #[test]
    fn mode_selects_name_column() {
        let mut t = Tabulator::new(&rules(NameMode::Last, false));
        t.record(&row("ANN", "F", "5")).unwrap();
        let table = t.table(Partition::All).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Smith"]);

        let mut t = Tabulator::new(&rules(NameMode::Middle, false));
        t.record(&row("ANN", "F", "5")).unwrap();
        let table = t.table(Partition::All).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Q"]);
    }

    #[test]
    fn names_keep_first_seen_order() {
        let mut t = Tabulator::new(&rules(NameMode::First, false));
        for name in ["ZOE", "ANN", "ZOE", "MIA", "ANN"] {
            t.record(&row(name, "", "5")).unwrap();
        }
        let names: Vec<String> = t.reports()[0].rows.iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["ZOE", "ANN", "MIA"]);
    }

    #[test]
    fn gender_partitions_are_disjoint() {
        let mut t = Tabulator::new(&rules(NameMode::First, true));
        assert_eq!(
            t.record(&row("ALEX", "M", "5")).unwrap(),
            Partition::Gender(Gender::Male)
        );
        assert_eq!(
            t.record(&row("ALEX", "F", "5")).unwrap(),
            Partition::Gender(Gender::Female)
        );
        // Only the exact upper-case codes are recognized.
        for g in ["", "U", "m", "f "] {
            assert_eq!(
                t.record(&row("ALEX", g, "5")).unwrap(),
                Partition::Gender(Gender::Unknown)
            );
        }
        let count = |g: Gender| {
            t.table(Partition::Gender(g))
                .map(|table| table.count("ALEX", "5"))
                .unwrap()
        };
        assert_eq!(count(Gender::Male), 1);
        assert_eq!(count(Gender::Female), 1);
        assert_eq!(count(Gender::Unknown), 4);
        assert!(t.table(Partition::All).is_none());

        let partitions: Vec<Partition> = t.reports().iter().map(|r| r.partition).collect();
        assert_eq!(
            partitions,
            vec![
                Partition::Gender(Gender::Male),
                Partition::Gender(Gender::Female),
                Partition::Gender(Gender::Unknown)
            ]
        );
    }

    #[test]
    fn unrecognized_code_is_kept_but_not_rendered() {
        let mut t = Tabulator::new(&rules(NameMode::First, false));
        t.record(&row("X", "M", "4")).unwrap();
        let before = t.reports();
        t.record(&row("X", "M", "Z")).unwrap();
        let after = t.reports();
        assert_eq!(before, after);
        assert_eq!(t.table(Partition::All).unwrap().count("X", "Z"), 1);
        assert_eq!(t.stats().unrecognized, vec![("Z".to_string(), 1)]);
    }

    #[test]
    fn unrecognized_column_sums_unknown_codes() {
        let r = TallyRules {
            unrecognized: UnrecognizedPolicy::Column,
            ..rules(NameMode::First, false)
        };
        let mut t = Tabulator::new(&r);
        for code in ["Z", "Y", "Z", "1"] {
            t.record(&row("X", "M", code)).unwrap();
        }
        t.record(&row("W", "M", "2")).unwrap();
        let report = &t.reports()[0];
        assert_eq!(report.header.last().unwrap(), UNRECOGNIZED_LABEL);
        assert_eq!(report.rows[0].counts, vec![0, 1, 0, 0, 0, 0, 0, 3]);
        assert_eq!(report.rows[1].counts, vec![0, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(
            t.stats().unrecognized,
            vec![("Y".to_string(), 1), ("Z".to_string(), 2)]
        );
    }

    #[test]
    fn counts_do_not_depend_on_row_order() {
        let rows: Vec<Vec<String>> = vec![
            row("ANN", "F", "5"),
            row("BOB", "M", "3"),
            row("ANN", "", "5"),
            row("ANN", "F", "4"),
            row("BOB", "M", ""),
        ];
        let mut forward = Tabulator::new(&rules(NameMode::First, true));
        let mut backward = Tabulator::new(&rules(NameMode::First, true));
        for r in rows.iter() {
            forward.record(r).unwrap();
        }
        for r in rows.iter().rev() {
            backward.record(r).unwrap();
        }
        for p in Gender::ALL.iter().map(|g| Partition::Gender(*g)) {
            let a = forward.table(p).unwrap();
            let b = backward.table(p).unwrap();
            assert_eq!(a.len(), b.len());
            for (name, codes) in a.iter() {
                assert_eq!(Some(codes), b.codes(name));
            }
        }
    }

    #[test]
    fn short_row_is_rejected() {
        let mut t = Tabulator::new(&rules(NameMode::First, true));
        let res = t.record(&["ANN", "Q", "Smith"]);
        assert_eq!(
            res,
            Err(TallyErrors::RowTooShort { index: 4, width: 3 })
        );
        assert_eq!(t.rows_recorded(), 0);
        assert!(t.tables().all(|(_, table)| table.is_empty()));
    }

    #[test]
    fn gender_column_only_required_when_segregating() {
        let layout = ColumnLayout {
            gender: 10,
            ..LAYOUT
        };
        let mut t = Tabulator::new(&TallyRules {
            columns: layout,
            ..rules(NameMode::First, false)
        });
        assert!(t.record(&row("ANN", "F", "5")).is_ok());

        let mut t = Tabulator::new(&TallyRules {
            columns: layout,
            ..rules(NameMode::First, true)
        });
        assert_eq!(
            t.record(&row("ANN", "F", "5")),
            Err(TallyErrors::RowTooShort { index: 10, width: 5 })
        );
    }

    #[test]
    fn empty_tally_renders_header_only() {
        let t = Tabulator::new(&rules(NameMode::First, false));
        let reports = t.reports();
        assert_eq!(reports[0].header.len(), 8);
        assert!(reports[0].rows.is_empty());
    }

    #[test]
    fn parse_arguments() {
        assert_eq!("middle".parse::<NameMode>(), Ok(NameMode::Middle));
        assert_eq!(
            "First".parse::<NameMode>(),
            Err(TallyErrors::InvalidMode("First".to_string()))
        );
        assert_eq!(parse_gender_segregation("yes"), Ok(true));
        assert_eq!(parse_gender_segregation("no"), Ok(false));
        assert!(parse_gender_segregation("y").is_err());
        assert_eq!(
            "column".parse::<UnrecognizedPolicy>(),
            Ok(UnrecognizedPolicy::Column)
        );
    }

    #[test]
    fn vocabulary_needs_seven_distinct_codes() {
        let mut entries: Vec<Ethnicity> = numeric_vocabulary().entries().to_vec();
        entries.pop();
        assert!(Vocabulary::new(entries.clone()).is_err());
        entries.push(Ethnicity::new("1", "Again"));
        assert!(matches!(
            Vocabulary::new(entries),
            Err(TallyErrors::InvalidVocabulary(_))
        ));
    }
}
