// Resume extraction pipeline.
// Implements: PDF text extraction, prompt building, reply decoding, normalization.
// All completion calls go through llm_client.

pub mod decode;
pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod upload;
