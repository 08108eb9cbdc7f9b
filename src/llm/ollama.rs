use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::{
        chat::{ChatMessage, request::ChatMessageRequest},
        parameters::{FormatType, JsonStructure},
    },
};

const DEFAULT_OLLAMA_PORT: u16 = 11434;

pub struct OllamaClient {
    client: Ollama,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Result<Self> {
        let (host, port) = split_base_url(&base_url)?;
        let client = Ollama::new(host, port);

        Ok(Self { client, model })
    }

    async fn chat(&self, request: ChatMessageRequest) -> Result<String> {
        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error ({}): {}", self.model, e)))?;

        Ok(response.message.content)
    }
}

/// Split `scheme://host[:port]` into the `(scheme://host, port)` pair `Ollama::new` expects.
fn split_base_url(base_url: &str) -> Result<(String, u16)> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| AppError::Config(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;

    let host = url
        .host_str()
        .ok_or_else(|| AppError::Config(format!("Ollama URL '{}' has no host", base_url)))?;

    Ok((
        format!("{}://{}", url.scheme(), host),
        url.port().unwrap_or(DEFAULT_OLLAMA_PORT),
    ))
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = vec![ChatMessage::user(prompt.to_string())];
        let request = ChatMessageRequest::new(self.model.clone(), messages);

        self.chat(request).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String> {
        let schema_text = serde_json::to_string_pretty(schema)
            .map_err(|e| AppError::Internal(format!("Failed to render schema: {}", e)))?;

        let messages = vec![
            ChatMessage::system(format!(
                "Responda somente com um objeto JSON que siga este JSON Schema:\n{}",
                schema_text
            )),
            ChatMessage::user(prompt.to_string()),
        ];

        // Ollama constrains decoding to the schema when `format` carries it
        let structure = schemars::Schema::try_from(schema.clone())
            .map_err(|e| AppError::Internal(format!("Invalid output schema: {}", e)))?;
        let format = FormatType::StructuredJson(Box::new(JsonStructure::new_for_schema(structure)));

        let request = ChatMessageRequest::new(self.model.clone(), messages).format(format);

        self.chat(request).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
