//! Agent nodes: LLM-backed steps

mod llm;

pub use llm::LlmAgentNode;
