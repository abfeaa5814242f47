/// How a single rule fared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The expression evaluated to true
    Passed,

    /// The expression evaluated to false; carries the message to report
    Failed(String),

    /// The rule could not be evaluated; fatal to the whole run
    Defect(String),
}

/// The outcome of evaluating a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub key: String,
    pub disposition: Disposition,
}

impl EvaluationOutcome {
    #[must_use]
    pub fn new(key: impl Into<String>, disposition: Disposition) -> Self {
        Self {
            key: key.into(),
            disposition,
        }
    }

    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self.disposition, Disposition::Defect(_))
    }

    /// The `[<key>] <message>` line this outcome contributes to a report, if any
    #[must_use]
    pub fn report_line(&self) -> Option<String> {
        match &self.disposition {
            Disposition::Passed => None,
            Disposition::Failed(text) | Disposition::Defect(text) => Some(format!("[{}] {text}", self.key)),
        }
    }
}
