use serde::{Deserialize, Deserializer, Serialize};

/// One prior exchange in the conversation. Either side may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub assistant: Option<String>,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub scenario: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub title: String,
    /// Rendered HTML.
    pub reply: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ChatTurn>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ChatTurn>>::deserialize(deserializer)?.unwrap_or_default())
}
