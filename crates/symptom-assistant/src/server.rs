/// MCP server for the symptom-lookup assistant.
///
/// Exposes four tools:
/// - `ask_symptom`: Catalog answer or fallback model answer for free text
/// - `match_symptom`: Structured catalog match (exact, then semantic) without fallback
/// - `list_quick_symptoms`: The fixed quick-select labels
/// - `quick_symptom`: Answer a quick-select label
use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chatbot::HealthChatbot;
use crate::matcher::MatchResult;
use crate::model::CatalogRecord;

pub const QUICK_SYMPTOMS: [&str; 6] = [
    "Fever",
    "Cough",
    "Headache",
    "Overweight",
    "Fatigue",
    "Stomach Pain",
];

const NOT_SURE_MESSAGE: &str = "I'm not sure. Please consult a healthcare professional.";

#[derive(Debug, Deserialize, JsonSchema)]
struct SymptomParams {
    /// Free-text description of the symptom, e.g. "I have a fever and chills".
    input: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct QuickSymptomParams {
    /// One of the labels returned by list_quick_symptoms.
    label: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct TextResponse {
    text: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct MatchResponse {
    /// "exact", "semantic" or "none".
    match_kind: String,
    /// Cosine similarity for semantic matches.
    score: Option<f32>,
    record: Option<CatalogRecord>,
    /// Set when no record matched.
    message: Option<String>,
}

impl From<MatchResult<'_>> for MatchResponse {
    fn from(result: MatchResult<'_>) -> Self {
        let score = match result {
            MatchResult::Semantic { score, .. } => Some(score),
            _ => None,
        };
        let record = result.record().cloned();
        let message = record.is_none().then(|| NOT_SURE_MESSAGE.to_string());
        Self {
            match_kind: result.kind().to_string(),
            score,
            record,
            message,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
struct QuickSymptomsResponse {
    labels: Vec<String>,
}

#[derive(Clone)]
pub struct SymptomAssistantServer {
    chatbot: HealthChatbot,
    tool_router: ToolRouter<SymptomAssistantServer>,
}

impl SymptomAssistantServer {
    pub fn new(chatbot: HealthChatbot) -> Self {
        Self {
            chatbot,
            tool_router: Self::tool_router(),
        }
    }
}

fn require_input(raw: &str, field: &str) -> Result<String, String> {
    let value = raw.trim().to_string();
    if value.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(value)
}

#[tool_router]
impl SymptomAssistantServer {
    #[tool(description = "Describe a symptom in free text. Returns the matching catalog entry (symptom, possible condition, recommended action) or, when nothing matches, general advice from a language model. Informational only, not a diagnosis.")]
    async fn ask_symptom(
        &self,
        Parameters(params): Parameters<SymptomParams>,
    ) -> Result<Json<TextResponse>, String> {
        let input = require_input(&params.input, "input")?;
        let text = self.chatbot.answer(&input).await;
        Ok(Json(TextResponse { text }))
    }

    #[tool(description = "Match a symptom description against the catalog only: exact substring match first, then semantic similarity (threshold 0.6). Never calls the language model.")]
    async fn match_symptom(
        &self,
        Parameters(params): Parameters<SymptomParams>,
    ) -> Result<Json<MatchResponse>, String> {
        let input = require_input(&params.input, "input")?;
        let result = self
            .chatbot
            .matcher()
            .find(&input)
            .await
            .map_err(|e| format!("match failed: {e}"))?;
        info!(kind = result.kind(), "match_symptom");
        Ok(Json(MatchResponse::from(result)))
    }

    #[tool(description = "List the quick-select symptom labels.")]
    async fn list_quick_symptoms(&self) -> Result<Json<QuickSymptomsResponse>, String> {
        Ok(Json(QuickSymptomsResponse {
            labels: QUICK_SYMPTOMS.iter().map(|s| s.to_string()).collect(),
        }))
    }

    #[tool(description = "Answer one of the quick-select symptom labels (see list_quick_symptoms) exactly as ask_symptom would.")]
    async fn quick_symptom(
        &self,
        Parameters(params): Parameters<QuickSymptomParams>,
    ) -> Result<Json<TextResponse>, String> {
        let label = require_input(&params.label, "label")?;
        let label = QUICK_SYMPTOMS
            .iter()
            .find(|s| s.eq_ignore_ascii_case(&label))
            .ok_or_else(|| {
                format!(
                    "unknown quick symptom: '{label}'. Available: {}",
                    QUICK_SYMPTOMS.join(", ")
                )
            })?;
        let text = self.chatbot.answer(label).await;
        Ok(Json(TextResponse { text }))
    }
}

#[tool_handler]
impl ServerHandler for SymptomAssistantServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "symptom-assistant".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Symptom lookup assistant for informational health advice only. Use ask_symptom \
for free-text descriptions, quick_symptom for the labels from list_quick_symptoms, and \
match_symptom to inspect the catalog match without calling the language model."
                    .to_string(),
            ),
        }
    }
}
