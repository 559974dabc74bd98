// Plan pipeline: prompt → Gemini completion → shape normalization → latest-plan slot.
// Speech and download views are derived from the normalized plan only.
// All model calls go through llm_client — no direct Gemini calls here.

pub mod export;
pub mod generator;
pub mod handlers;
pub mod normalize;
pub mod prompts;
pub mod speech;
pub mod store;
