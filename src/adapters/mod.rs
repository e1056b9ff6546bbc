// Adapters layer: concrete implementations for external systems (documents, model server, result files).

pub mod docx;
pub mod llm;
pub mod report;
