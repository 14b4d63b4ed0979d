//! Per-request query models exchanged with HTTP callers

use serde::{Deserialize, Serialize};

/// An incoming query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The natural-language prompt
    pub prompt: String,

    /// Caller identifier, echoed back in the response metadata
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "anonymous".to_string()
}

impl QueryRequest {
    pub fn new(prompt: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            user_id: user_id.into(),
        }
    }

    /// The prompt as processed, without surrounding whitespace
    pub fn trimmed_prompt(&self) -> &str {
        self.prompt.trim()
    }

    /// Length of the processed prompt in characters
    pub fn prompt_len(&self) -> usize {
        self.trimmed_prompt().chars().count()
    }
}

/// Auxiliary metadata attached to every answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultData {
    pub is_rag_active: bool,
    pub model: String,
    pub user_id: String,
    pub retrieved_chunks: usize,
    pub sources: Vec<String>,
}

/// A successful answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    pub processed_prompt: String,
    pub ai_response: String,
    pub result_data: ResultData,
}

impl QueryResponse {
    pub fn success(request: &QueryRequest, ai_response: String, result_data: ResultData) -> Self {
        Self {
            status: "success".to_string(),
            processed_prompt: format!("Length: {}", request.prompt_len()),
            ai_response,
            result_data,
        }
    }
}

/// Body of the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    #[serde(rename = "RAG_Status")]
    pub rag_status: String,
    pub model: String,
}

impl StatusResponse {
    pub fn new(is_rag_active: bool, model: impl Into<String>) -> Self {
        Self {
            message: "RAG chatbot API is running".to_string(),
            rag_status: if is_rag_active { "Active" } else { "Inactive" }.to_string(),
            model: model.into(),
        }
    }
}
