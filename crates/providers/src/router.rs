//! Adapter router: builds the generation adapter selected by config.

use std::sync::Arc;

use dcl_config::ProviderConfig;
use dcl_core::{AdapterError, GenerationAdapter};
use tracing::info;

use crate::mock::MockAdapter;
use crate::openai_compat::OpenAiCompatAdapter;

/// Build the adapter described by `config`.
///
/// The `openai` kind requires an API key.
pub fn build_from_config(config: &ProviderConfig) -> Result<Arc<dyn GenerationAdapter>, AdapterError> {
    let adapter: Arc<dyn GenerationAdapter> = match config.kind.as_str() {
        "mock" => Arc::new(match &config.mock_response {
            Some(response) => MockAdapter::with_response(response.clone()),
            None => MockAdapter::new(),
        }),
        "openai" => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                AdapterError::NotConfigured(
                    "provider.api_key is not set (or set DCL_API_KEY / OPENAI_API_KEY)".into(),
                )
            })?;
            let mut adapter = OpenAiCompatAdapter::new(&config.api_url, api_key, &config.model)
                .with_temperature(config.temperature);
            if let Some(max_tokens) = config.max_tokens {
                adapter = adapter.with_max_tokens(max_tokens);
            }
            Arc::new(adapter)
        }
        other => {
            return Err(AdapterError::NotConfigured(format!("unknown provider kind '{other}'")));
        }
    };

    info!(adapter = adapter.name(), "Generation adapter ready");
    Ok(adapter)
}
