use chrono::{DateTime, FixedOffset, Utc};
use tracing::info;

use crate::errors::AppError;
use crate::models::{ChatMessage, ChatTurn, CompletionRequest, GenerateRequest, GenerateResponse};
use crate::services::llm_service::LlmService;
use crate::utils::markdown::render_html;

const MIN_OUTPUT_TOKENS: i64 = 1200;
const MAX_OUTPUT_TOKENS: i64 = 4000;
const OUTPUT_TOKEN_CEILING: i64 = 6000;

const REPLY_TEMPERATURE: f32 = 0.85;
const REPLY_TOP_P: f32 = 0.95;
const TITLE_TEMPERATURE: f32 = 0.6;
const TITLE_MAX_TOKENS: usize = 20;

const TITLE_SYSTEM_PROMPT: &str = "You create short, professional titles summarizing financial scenarios. \
Return only the title text.";

/// Clock and timezone used for the "current time" line of the system prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext {
    pub now: DateTime<FixedOffset>,
}

impl PromptContext {
    pub fn now_in(offset: FixedOffset) -> Self {
        Self { now: Utc::now().with_timezone(&offset) }
    }

    fn timezone_label(&self) -> String {
        let seconds = self.now.offset().local_minus_utc();
        let hours = seconds / 3600;
        let minutes = (seconds.abs() % 3600) / 60;
        match (hours, minutes) {
            (0, 0) => "GMT".to_string(),
            (h, 0) => format!("GMT{:+}", h),
            (h, m) => format!("GMT{:+}:{:02}", h, m),
        }
    }
}

pub fn build_system_prompt(context: &PromptContext) -> String {
    let timestamp = context.now.format("%A, %B %d, %Y - %I:%M %p");
    format!(
        "You are **Financial AI Assistant**. \
You provide advanced financial and business insights with clarity, reasoning, and elegance.\n\n\
### Writing Rules\n\
- Use **bold**, *italic*, and clear section titles like **Overview**, **Financial Impact**, **Risks**, **Opportunities**, and **Recommendations**.\n\
- Do NOT use Markdown syntax like ### or ``` for headings; use bold or italic formatting instead.\n\
- Structure content professionally with readable spacing and smooth flow.\n\
- Avoid a robotic or templated tone. Write naturally but precisely.\n\
- Adapt automatically: use structured sections for reports, and smooth paragraphs for general answers.\n\
- Never give overly short or summarized responses unless asked.\n\n\
### Behavior Rules\n\
- Be analytical, empathetic, and factually consistent.\n\
- Always write with a professional, human-like voice.\n\n\
### Context\n\
Today's actual date and time is: **{} ({})**.\n\
Reference time or trends accurately when relevant.",
        timestamp,
        context.timezone_label()
    )
}

/// System instruction, then the flattened history, then the new scenario.
pub fn build_messages(context: &PromptContext, history: &[ChatTurn], scenario: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(build_system_prompt(context)));

    for turn in history {
        if let Some(user) = turn.user.as_deref().filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::user(user));
        }
        if let Some(assistant) = turn.assistant.as_deref().filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::assistant(assistant));
        }
    }

    messages.push(ChatMessage::user(scenario));
    messages
}

/// Longer prompts leave less room for the answer. Always within [1200, 4000].
pub fn output_token_budget(messages: &[ChatMessage]) -> usize {
    let prompt_chars: usize = messages.iter().map(|m| m.content.chars().count()).sum();
    let half = i64::try_from(prompt_chars / 2).unwrap_or(i64::MAX);
    OUTPUT_TOKEN_CEILING
        .saturating_sub(half)
        .clamp(MIN_OUTPUT_TOKENS, MAX_OUTPUT_TOKENS) as usize
}

/// Runs the full reply flow: prompt, completion, HTML rendering and, if
/// needed, a separate title completion.
pub async fn generate_reply(
    llm_service: &LlmService,
    context: &PromptContext,
    request: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    let scenario = request.scenario.trim();
    if scenario.is_empty() {
        return Err(AppError::Validation("Missing 'scenario' text".to_string()));
    }

    let messages = build_messages(context, &request.history, scenario);
    let max_tokens = output_token_budget(&messages);
    info!(
        "Generating reply ({} messages, {} history turns, max_tokens: {})",
        messages.len(),
        request.history.len(),
        max_tokens
    );

    let reply = llm_service
        .complete(CompletionRequest {
            messages,
            temperature: REPLY_TEMPERATURE,
            top_p: Some(REPLY_TOP_P),
            max_tokens,
        })
        .await?;
    let reply_html = render_html(reply.trim());

    let supplied_title = request.title.as_deref().map(str::trim).unwrap_or_default();
    let title = if supplied_title.is_empty() {
        generate_title(llm_service, scenario).await?
    } else {
        supplied_title.to_string()
    };

    Ok(GenerateResponse { title, reply: reply_html })
}

async fn generate_title(llm_service: &LlmService, scenario: &str) -> Result<String, AppError> {
    let title = llm_service
        .complete(CompletionRequest {
            messages: vec![
                ChatMessage::system(TITLE_SYSTEM_PROMPT),
                ChatMessage::user(scenario),
            ],
            temperature: TITLE_TEMPERATURE,
            top_p: None,
            max_tokens: TITLE_MAX_TOKENS,
        })
        .await?;
    Ok(title.trim().to_string())
}
