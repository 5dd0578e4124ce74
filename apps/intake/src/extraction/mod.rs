// Resume extraction: classify the attachment, build the prompt, call the
// model and normalize its answer. All model calls go through llm_client.

pub mod classify;
pub mod docx;
pub mod parser;
pub mod pipeline;
pub mod prompts;
