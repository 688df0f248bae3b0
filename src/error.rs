use thiserror::Error;

/// Everything that can stop a report from being produced.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No file 'live_csv' provided.")]
    MissingPayload,

    #[error("Error reading CSV: {0}")]
    Csv(String),

    #[error("Missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Row {row}: invalid value {value:?} in column '{column}'")]
    MalformedRow {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Duplicate delivery: innings {innings}, over {over}, ball {ball}")]
    DuplicateDelivery { innings: u8, over: u32, ball: u32 },

    #[error("Not enough live data to form a sequence: need {needed} balls, got {got}")]
    InsufficientEvents { needed: usize, got: usize },

    #[error("Momentum predictor failed: {0}")]
    Predictor(String),

    #[error("Error generating report: {0}")]
    Internal(String),
}

/// Who is responsible for a failure, which decides the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Client,
    Precondition,
    Server,
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::MissingPayload
            | ReportError::Csv(_)
            | ReportError::Schema { .. }
            | ReportError::MalformedRow { .. }
            | ReportError::DuplicateDelivery { .. } => ErrorKind::Client,
            ReportError::InsufficientEvents { .. } => ErrorKind::Precondition,
            ReportError::Predictor(_) | ReportError::Internal(_) => ErrorKind::Server,
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        ReportError::Csv(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_three_kinds() {
        assert_eq!(ReportError::MissingPayload.kind(), ErrorKind::Client);
        assert_eq!(
            ReportError::Schema {
                missing: vec!["Over".into()]
            }
            .kind(),
            ErrorKind::Client
        );
        assert_eq!(
            ReportError::InsufficientEvents { needed: 10, got: 9 }.kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            ReportError::Predictor("timeout".into()).kind(),
            ErrorKind::Server
        );
    }

    #[test]
    fn schema_message_lists_every_missing_column() {
        let e = ReportError::Schema {
            missing: vec!["Batter".into(), "Venue".into()],
        };
        assert_eq!(e.to_string(), "Missing required column(s): Batter, Venue");
    }
}
