use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::io::config_io::resolve_api_key;
use crate::model::config::AiConfig;
use crate::model::task::Task;

/// Error type for advisory calls. Every failure surfaces as one
/// human-readable message scoped to the advisory session; the board
/// itself is never affected and nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(
        "Gemini API key is not configured; set ai.api_key in config.toml \
         or the GEMINI_API_KEY environment variable"
    )]
    MissingApiKey,
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid API key (HTTP {0})")]
    Auth(u16),
    #[error("API quota exceeded; check your Gemini usage limits")]
    Quota,
    #[error("Gemini API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("reply contained no text")]
    EmptyReply,
    #[error("could not parse subtask suggestions from the reply")]
    UnparseableReply,
}

/// One suggested subtask from a breakdown request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskSuggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Client for the Gemini generateContent endpoint. Calls are blocking;
/// the TUI runs them on a worker thread (see `ai::advisor`).
pub struct Gateway {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl Gateway {
    pub fn from_config(ai: &AiConfig) -> Result<Self, GatewayError> {
        let api_key = resolve_api_key(ai).ok_or(GatewayError::MissingApiKey)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Gateway {
            client,
            api_key,
            model: ai.model.clone(),
            base_url: ai.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Free-form advisory text for a task
    pub fn analyze(&self, task: &Task) -> Result<String, GatewayError> {
        let prompt = format!(
            "You are an AI task management assistant. Analyze the following task \
             and provide helpful insights:\n\n{}\n\n\
             Please provide:\n\
             1. A brief analysis of what this task involves\n\
             2. Potential challenges or obstacles that might arise\n\
             3. Actionable solutions and recommendations to complete this task effectively\n\
             4. Best practices or tips related to this type of task\n\
             5. Any clarifications or questions that might help the user better \
             understand or approach this task\n\n\
             Format your response in a clear, concise, and actionable manner. \
             Use bullet points where appropriate.",
            task_info(task)
        );
        self.generate(&prompt)
    }

    /// Answer a specific question about a task
    pub fn answer(&self, task: &Task, question: &str) -> Result<String, GatewayError> {
        if question.trim().is_empty() {
            return Err(GatewayError::EmptyQuestion);
        }
        let prompt = format!(
            "Based on this task, answer the user's question:\n\n{}\n\
             User's Question: {}\n\n\
             Provide a clear, helpful, and specific answer. If the question cannot \
             be answered based on the task information alone, suggest what \
             additional information might be needed.",
            task_info(task),
            question
        );
        self.generate(&prompt)
    }

    /// Suggest 3-5 smaller subtasks for a task. The model is asked for a
    /// bare JSON array but often wraps it in prose; the first well-formed
    /// array found in the reply is used.
    pub fn suggest_subtasks(&self, task: &Task) -> Result<Vec<SubtaskSuggestion>, GatewayError> {
        let prompt = format!(
            "Analyze this task and suggest 3-5 smaller, actionable subtasks that \
             would help complete it:\n\n\
             Task: {}\nDescription: {}\n\n\
             Return your response as a JSON array of objects, each with \"title\" \
             and \"description\" fields. Only return the JSON, no other text.\n\
             Example format: [{{\"title\": \"Subtask 1\", \"description\": \"Description 1\"}}, \
             {{\"title\": \"Subtask 2\", \"description\": \"Description 2\"}}]",
            task.title,
            if task.description.is_empty() {
                "No description"
            } else {
                &task.description
            }
        );
        let text = self.generate(&prompt)?;
        parse_subtasks(&text)
    }

    fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => GatewayError::Auth(status.as_u16()),
                429 => GatewayError::Quota,
                code => GatewayError::Api {
                    status: code,
                    message: response.text().unwrap_or_default(),
                },
            });
        }

        let body: GenerateResponse = response.json()?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.is_empty())
            .ok_or(GatewayError::EmptyReply)
    }
}

/// Task fields formatted for a prompt, mirroring the on-screen record
fn task_info(task: &Task) -> String {
    format!(
        "Task Title: {}\nDescription: {}\nPriority: {}\nStatus: {}\nDue Date: {}\nCompleted: {}\n",
        task.title,
        if task.description.is_empty() {
            "No description provided"
        } else {
            &task.description
        },
        task.priority.as_str(),
        task.status.as_str(),
        task.due_date.as_deref().unwrap_or("Not set"),
        if task.completed { "Yes" } else { "No" },
    )
}

/// Extract and parse the first JSON array embedded in the reply text.
/// A reply with no parseable array is a gateway-level failure.
pub fn parse_subtasks(text: &str) -> Result<Vec<SubtaskSuggestion>, GatewayError> {
    // Greedy bracket match, same as the extraction the reply format was
    // designed around. Falls back to parsing the whole reply.
    let candidate = Regex::new(r"(?s)\[.*\]")
        .ok()
        .and_then(|re| re.find(text))
        .map(|m| m.as_str())
        .unwrap_or(text);
    serde_json::from_str(candidate).map_err(|_| GatewayError::UnparseableReply)
}

// --- Gemini wire shapes ---------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
