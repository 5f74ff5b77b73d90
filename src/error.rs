use thiserror::Error;

#[derive(Error, Debug)]
pub enum KssError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid filename pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Walk error: {0}")]
    Walk(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed reference \"{reference}\": {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("Duplicate reference \"{reference}\" in {first_file} and {second_file}")]
    DuplicateReference {
        reference: String,
        first_file: String,
        second_file: String,
    },

    #[error("Extend target \"{reference}\" not found (from {filename})")]
    ExtendTargetMissing { reference: String, filename: String },

    #[error("Replace target \"{reference}\" not found (from {filename})")]
    ReplaceTargetMissing { reference: String, filename: String },

    #[error("Cannot merge a {merge_type} section into \"{reference}\"")]
    InvalidMergeKind { reference: String, merge_type: String },

    #[error("Cannot merge \"{source_reference}\" into \"{target_reference}\"")]
    InvalidMergeTarget {
        source_reference: String,
        target_reference: String,
    },

    #[error("Not a section: block in {filename} has no Styleguide reference")]
    NotASection { filename: String },

    #[error("Section not found: {0}")]
    SectionNotFound(String),
}

pub type Result<T> = std::result::Result<T, KssError>;
