//! Oracle Adapters - the three oracle contracts over an LLM provider.

mod llm_oracle;
mod prompts;

pub use llm_oracle::LlmOracle;
