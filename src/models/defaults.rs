//! Built-in model catalog.
//!
//! These are the models offered out of the box. The list order is the
//! catalog declaration order, which the picker and listing endpoint preserve.

use crate::models::types::{ModelDescriptor, Provider};

/// Process-wide default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash-exp";

/// Get the built-in model descriptors.
pub fn default_models() -> Vec<ModelDescriptor> {
    vec![
        // Google Gemini (default provider)
        ModelDescriptor::new(
            "gemini-2.0-flash-exp",
            "Gemini 2.0 Flash",
            "Fastest and most efficient multimodal model",
            Provider::Google,
        )
        .with_context_window(1_000_000)
        .with_vision(),
        ModelDescriptor::new(
            "gemini-1.5-pro",
            "Gemini 1.5 Pro",
            "Most capable Gemini model for complex tasks",
            Provider::Google,
        )
        .with_context_window(2_000_000)
        .with_vision(),
        ModelDescriptor::new(
            "gemini-1.5-flash",
            "Gemini 1.5 Flash",
            "Fast and versatile performance",
            Provider::Google,
        )
        .with_context_window(1_000_000)
        .with_vision(),
        // OpenAI
        ModelDescriptor::new(
            "gpt-4o",
            "GPT-4o",
            "Most capable OpenAI multimodal model",
            Provider::Openai,
        )
        .with_context_window(128_000)
        .with_vision(),
        ModelDescriptor::new("gpt-4o-mini", "GPT-4o Mini", "Fast and affordable", Provider::Openai)
            .with_context_window(128_000)
            .with_vision(),
        ModelDescriptor::new(
            "gpt-4-turbo",
            "GPT-4 Turbo",
            "Previous generation flagship model",
            Provider::Openai,
        )
        .with_context_window(128_000)
        .with_vision(),
        ModelDescriptor::new("o1", "o1", "Advanced reasoning model", Provider::Openai)
            .with_context_window(200_000)
            .with_reasoning(),
        ModelDescriptor::new(
            "o1-mini",
            "o1-mini",
            "Faster reasoning for STEM tasks",
            Provider::Openai,
        )
        .with_context_window(128_000)
        .with_reasoning(),
        // Anthropic
        ModelDescriptor::new(
            "claude-3-5-sonnet",
            "Claude 3.5 Sonnet",
            "Best balance of intelligence and speed",
            Provider::Anthropic,
        )
        .with_context_window(200_000)
        .with_vision(),
        ModelDescriptor::new(
            "claude-3-5-haiku",
            "Claude 3.5 Haiku",
            "Fastest Claude model",
            Provider::Anthropic,
        )
        .with_context_window(200_000)
        .with_vision(),
        ModelDescriptor::new(
            "claude-3-opus",
            "Claude 3 Opus",
            "Most capable Claude model",
            Provider::Anthropic,
        )
        .with_context_window(200_000)
        .with_vision(),
        // OpenRouter
        ModelDescriptor::new(
            "mistral-large",
            "Mistral Large",
            "Flagship Mistral model via OpenRouter",
            Provider::Openrouter,
        )
        .with_context_window(128_000),
        ModelDescriptor::new(
            "llama-3.3-70b",
            "Llama 3.3 70B",
            "Open source model via OpenRouter",
            Provider::Openrouter,
        )
        .with_context_window(128_000),
        ModelDescriptor::new(
            "deepseek-chat",
            "DeepSeek Chat",
            "High-performance reasoning model",
            Provider::Openrouter,
        )
        .with_context_window(64_000),
    ]
}
