pub mod design;
pub mod error;
pub mod extract;
pub mod figma;
pub mod gateway;
pub mod guidance;
pub mod input;
pub mod jobs;
pub mod llm;
pub mod patch;
pub mod pipeline;
pub mod prompts;
pub mod scaffold;
pub mod transcribe;
pub mod workspace;

/// Generated project contents: relative file path mapped to file text.
/// Transient, owned by a single pipeline run.
pub type FileMap = std::collections::BTreeMap<String, String>;
