use thiserror::Error;

/// Which part of the render pipeline a layout failure came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Banner,
    Subject,
    Category,
    Section,
    Footer,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Banner => "banner",
            Stage::Subject => "subject block",
            Stage::Category => "category header",
            Stage::Section => "section",
            Stage::Footer => "footer",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid report input: {0}")]
    InvalidReport(String),
    #[error("Layout failed in {stage}: {cause}")]
    Layout { stage: Stage, cause: String },
    #[error("PDF generation error: {0}")]
    Pdf(String),
}

impl Error {
    pub(crate) fn layout(stage: Stage, cause: impl Into<String>) -> Self {
        Error::Layout {
            stage,
            cause: cause.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidReport(err.to_string())
    }
}
