//! Language translation collaborator
//!
//! Turns free-form text plus scene context into one normalized command
//! line. When no API key is configured the interpreter simply skips
//! translation and normalizes the raw line itself.

use async_trait::async_trait;
use shared::SceneContext;

use super::{ServiceError, REQUEST_TIMEOUT};

/// Translates natural language into a single DSL command string
#[async_trait]
pub trait CommandTranslator {
    async fn translate(&self, raw: &str, context: &SceneContext) -> Result<String, ServiceError>;
}

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const MODEL: &str = "claude-sonnet-4-20250514";

const SYSTEM_PROMPT: &str = r#"You are a 3D scene command parser. Convert natural language into structured commands.

Commands:
- create model <term> [at x y z] - Create 3D models
- create terrain <heightmap1-5> [grass <key>] [mud <key>] [rock <key>] [at x y z] - Create terrain
- create <type> [color] [at x y z] - Create shapes (cube, sphere, cylinder)
- clone [at x y z] - Duplicate selected objects
- select <target> - Select objects (all, none, cubes, spheres, cylinders, or name)
- delete <target> - Delete objects
- scale <target> <value> - Scale objects
- rotate <target> <degrees> - Rotate objects
- move <target> to/by <x y z> - Move objects
- change texture <grass|mud|rock|heightmap> <index|next|prev> - Retexture selected terrain
- clear - Clear selection
- reset - Reset scene

Rules:
1. "it", "this", "that" means "selected"
2. Real-world objects (car, building, tree) use "create model"
3. Bigger/smaller/grow/shrink means scale
4. Turn/spin/rotate means rotate
5. Move/shift/slide means move
6. Clone/copy/duplicate means clone
7. Extract coordinates from any format (commas, spaces, parentheses)
8. Be flexible with phrasing

Examples:
"create a car at 0 0 0" = create model car at 0 0 0
"make it bigger" = scale selected 2
"turn it 90 degrees" = rotate selected 90
"move it up 5" = move selected by 0 5 0

Return ONLY the command, nothing else."#;

/// Anthropic-backed translator
pub struct ClaudeTranslator {
    client: reqwest::Client,
    api_key: String,
}

impl ClaudeTranslator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Build from `ANTHROPIC_API_KEY`, `None` when unset
    pub fn from_env() -> Option<Self> {
        std::env::var("ANTHROPIC_API_KEY").ok().map(Self::new)
    }
}

#[async_trait]
impl CommandTranslator for ClaudeTranslator {
    async fn translate(&self, raw: &str, context: &SceneContext) -> Result<String, ServiceError> {
        let system = format!(
            "{SYSTEM_PROMPT}\n\nContext:\nObjects: {}\nSelected: {}",
            join_or_none(&context.object_names),
            join_or_none(&context.selected_names),
        );

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&serde_json::json!({
                "model": MODEL,
                "max_tokens": 200,
                "system": system,
                "messages": [{ "role": "user", "content": raw }]
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        let text = body["content"]
            .as_array()
            .and_then(|blocks| blocks.first())
            .and_then(|block| block["text"].as_str())
            .ok_or_else(|| {
                ServiceError::Unsuccessful("translation reply had no text content".to_string())
            })?
            .trim()
            .to_string();

        if let Some(error) = text.strip_prefix("ERROR:") {
            return Err(ServiceError::Unsuccessful(error.trim().to_string()));
        }

        tracing::debug!(raw, translated = %text, "command translated");
        Ok(text)
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
