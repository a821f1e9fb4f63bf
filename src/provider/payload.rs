//! Request body shapes.

use crate::types::{Message, OptimizeMode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const SYSTEM_PROMPT: &str =
    "你是一名专业的中文文字编辑。请只输出改写后的文本，不要添加任何解释、标题或引号。";

const BASIC_TASK_PROMPT: &str =
    "请在保持原意的前提下润色以下文本，使表达更加通顺、专业，并修正明显的用词与标点问题：\n\n";

const STRICT_TASK_PROMPT: &str = "请严格按照规范改写以下文本：修正用词与标点，删除绝对化、夸大或承诺性表述，保持原意与篇幅大致不变：\n\n";

/// Which body shape an endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{model, messages, temperature, max_tokens}`
    Chat,
    /// `{model, prompt, max_tokens, temperature}`
    Completion,
    /// `{text, site_type, optimization_type, language, style}`
    Custom,
}

impl PayloadShape {
    pub fn for_endpoint(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path.ends_with("chat/completions") {
            PayloadShape::Chat
        } else if path.ends_with("completions") {
            PayloadShape::Completion
        } else {
            PayloadShape::Custom
        }
    }
}

/// Tunables that end up in the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadSettings {
    pub max_tokens: u32,
    pub basic_temperature: f64,
    pub strict_temperature: f64,
    pub site_type: String,
    pub language: String,
    pub style: String,
}

impl Default for PayloadSettings {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            basic_temperature: 0.7,
            strict_temperature: 0.3,
            site_type: "general".to_string(),
            language: "zh".to_string(),
            style: "professional".to_string(),
        }
    }
}

impl PayloadSettings {
    fn temperature(&self, mode: OptimizeMode) -> f64 {
        match mode {
            OptimizeMode::Basic => self.basic_temperature,
            OptimizeMode::Strict => self.strict_temperature,
        }
    }
}

pub fn task_prompt(mode: OptimizeMode) -> &'static str {
    match mode {
        OptimizeMode::Basic => BASIC_TASK_PROMPT,
        OptimizeMode::Strict => STRICT_TASK_PROMPT,
    }
}

pub fn build_payload(
    shape: PayloadShape,
    model: &str,
    text: &str,
    mode: OptimizeMode,
    settings: &PayloadSettings,
) -> Value {
    let prompt = format!("{}{}", task_prompt(mode), text);
    match shape {
        PayloadShape::Chat => json!({
            "model": model,
            "messages": [Message::system(SYSTEM_PROMPT), Message::user(prompt)],
            "temperature": settings.temperature(mode),
            "max_tokens": settings.max_tokens,
        }),
        PayloadShape::Completion => json!({
            "model": model,
            "prompt": format!("{}\n\n{}", SYSTEM_PROMPT, prompt),
            "max_tokens": settings.max_tokens,
            "temperature": settings.temperature(mode),
        }),
        PayloadShape::Custom => json!({
            "text": text,
            "site_type": settings.site_type,
            "optimization_type": mode.tag(),
            "language": settings.language,
            "style": settings.style,
        }),
    }
}
