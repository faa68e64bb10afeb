pub use crate::config::*;
use crate::Tabulator;

/// A builder for configuring a tabulation.
///
/// Every setting that is not given keeps the value used for the L2
/// demographic extracts.
///
/// ```
/// pub use name_tally::builder::Builder;
/// pub use name_tally::NameMode;
/// # use name_tally::TallyErrors;
///
/// let mut tabulator = Builder::new(NameMode::First)
///     .gender_segregation(true)
///     .ethnicity_codes(&["", "1", "2", "3", "4", "5", "6"])?
///     .build();
///
/// let row: Vec<String> = (0..80).map(|i| match i {
///     14 => "MARIA".to_string(),
///     65 => "F".to_string(),
///     74 => "4".to_string(),
///     _ => "".to_string(),
/// }).collect();
/// tabulator.record(&row)?;
///
/// let reports = tabulator.reports();
/// assert_eq!(reports.len(), 3);
/// assert_eq!(reports[1].rows[0].counts, vec![0, 0, 0, 0, 1, 0, 0]);
///
/// # Ok::<(), TallyErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TallyRules,
}

impl Builder {
    pub fn new(mode: NameMode) -> Builder {
        Builder {
            _rules: TallyRules::new(mode, false),
        }
    }

    pub fn gender_segregation(self, gender_segregation: bool) -> Builder {
        Builder {
            _rules: TallyRules {
                gender_segregation,
                ..self._rules
            },
        }
    }

    pub fn columns(self, columns: ColumnLayout) -> Builder {
        Builder {
            _rules: TallyRules {
                columns,
                ..self._rules
            },
        }
    }

    pub fn vocabulary(self, vocabulary: Vocabulary) -> Builder {
        Builder {
            _rules: TallyRules {
                vocabulary,
                ..self._rules
            },
        }
    }

    /// Replaces the codes of the vocabulary, keeping the standard labels.
    ///
    /// codes: the code for each column, in column order.
    pub fn ethnicity_codes(self, codes: &[&str]) -> Result<Builder, TallyErrors> {
        let labels = Vocabulary::l2_demographic();
        if codes.len() != labels.entries().len() {
            return Err(TallyErrors::InvalidVocabulary(format!(
                "expected {} ethnicity codes, found {}",
                labels.entries().len(),
                codes.len()
            )));
        }
        let entries: Vec<Ethnicity> = labels
            .entries()
            .iter()
            .zip(codes.iter())
            .map(|(e, code)| Ethnicity::new(code, &e.label))
            .collect();
        Ok(self.vocabulary(Vocabulary::new(entries)?))
    }

    pub fn unrecognized(self, unrecognized: UnrecognizedPolicy) -> Builder {
        Builder {
            _rules: TallyRules {
                unrecognized,
                ..self._rules
            },
        }
    }

    pub fn progress_interval(self, progress_interval: u64) -> Builder {
        Builder {
            _rules: TallyRules {
                progress_interval,
                ..self._rules
            },
        }
    }

    pub fn rules(&self) -> &TallyRules {
        &self._rules
    }

    pub fn build(self) -> Tabulator {
        Tabulator::new(&self._rules)
    }
}
