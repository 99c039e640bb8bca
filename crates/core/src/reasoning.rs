//! Remote reasoning adapter — the middle matching tier.
//!
//! Wraps one synchronous text-completion call per triage request against an
//! OpenAI-compatible chat endpoint. The core depends only on the capability
//! "submit a natural-language prompt, receive a natural-language response";
//! the vendor is just whatever the configured base URL points at.
//!
//! Failure semantics are deliberately soft: a transport fault, timeout, bad
//! status or unusable response body makes the tier report "no match" after a
//! log line. A reasoning-service outage must never surface to the caller.

use crate::{ReasoningConfig, TriageError, TriageResult};
use mediaid_types::{Advice, SeverityTier, TriageVerdict};
use serde::{Deserialize, Serialize};

/// Client for the remote reasoning service.
#[derive(Debug, Clone)]
pub struct ReasoningClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl ReasoningClient {
    /// Create a client from the resolved reasoning configuration.
    pub fn new(config: &ReasoningConfig) -> TriageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TriageError::ReasoningTransport)?;

        Ok(Self {
            client,
            api_base: config.api_base().to_string(),
            api_key: config.api_key().to_string(),
            model: config.model().to_string(),
        })
    }

    /// Classifies symptom text via the remote service.
    ///
    /// Returns `None` on any transport or response-shape fault; the engine
    /// treats that exactly like "no match" and moves to the rule tier.
    pub async fn classify(&self, symptoms: &str) -> Option<TriageVerdict> {
        match self.complete(&build_prompt(symptoms)).await {
            Ok(reply) => Some(parse_reply(&reply)),
            Err(e) => {
                tracing::warn!("reasoning tier unavailable: {}", e);
                None
            }
        }
    }

    async fn complete(&self, prompt: &str) -> TriageResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "system",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(TriageError::ReasoningTransport)?;

        if !response.status().is_success() {
            return Err(TriageError::ReasoningStatus(response.status().as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(TriageError::ReasoningTransport)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(TriageError::ReasoningEmptyResponse)
    }
}

/// Fixed instructional prompt with the symptom text interpolated.
fn build_prompt(symptoms: &str) -> String {
    format!(
        "You are a medical triage assistant. \
         A patient describes their symptoms. \
         Decide the urgency: Mild (home care, self-monitor), Moderate (see a doctor within 24h), \
         Severe (go to ER now). \
         Give a short summary of severity and advice, and if possible, suggest a likely disease (optional).\n\n\
         Symptoms: {symptoms}\n\
         Respond in this exact format:\n\
         Severity: [Mild/Moderate/Severe]\n\
         Advice: [brief advice]\n\
         Disease: [optional, if highly likely]\n"
    )
}

/// Parses the three-line reply format into a verdict.
///
/// Lines are scanned for the `Severity:`/`Advice:`/`Disease:` label prefixes,
/// matched case-insensitively, taking the value after the first colon and
/// trimming it. The severity is accepted only when it names one of the three
/// tiers; anything else leaves the Mild floor in place. Missing advice is
/// replaced with the tier's stock advice so the verdict invariant holds even
/// for an empty reply.
pub(crate) fn parse_reply(text: &str) -> TriageVerdict {
    let mut severity = SeverityTier::Mild;
    let mut advice = String::new();
    let mut disease = String::new();

    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.starts_with("severity:") {
            let value = field_value(line).unwrap_or_default();
            if let Ok(tier) = value.parse::<SeverityTier>() {
                severity = tier;
            }
        } else if lower.starts_with("advice:") {
            advice = field_value(line).unwrap_or_default();
        } else if lower.starts_with("disease:") {
            disease = field_value(line).unwrap_or_default();
        }
    }

    let advice = Advice::new(&advice)
        .unwrap_or_else(|_| Advice::new(severity.default_advice()).expect("stock advice is non-empty"));
    TriageVerdict::with_disease(severity, advice, disease)
}

fn field_value(line: &str) -> Option<String> {
    line.split_once(':').map(|(_, v)| v.trim().to_string())
}
