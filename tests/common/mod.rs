#![allow(dead_code)]

pub mod mocks;

use licita::{
    AnalysisPipeline, LicitaConfigManager, ModelHandles,
    search::SearchProvider,
    utils::toml_config::LicitaConfig,
};
use mocks::{MockLLMClient, MockSearchProvider};
use std::sync::Arc;

/// Everything a test needs to drive the pipeline and inspect the mocks
pub struct Harness {
    pub pipeline: AnalysisPipeline,
    pub config: Arc<LicitaConfigManager>,
    pub general: Arc<MockLLMClient>,
    pub reasoning: Arc<MockLLMClient>,
    pub search: Arc<MockSearchProvider>,
}

pub fn harness(
    general: MockLLMClient,
    reasoning: MockLLMClient,
    search: MockSearchProvider,
) -> Harness {
    harness_with_config(general, reasoning, search, LicitaConfig::default())
}

pub fn harness_with_config(
    general: MockLLMClient,
    reasoning: MockLLMClient,
    search: MockSearchProvider,
    config: LicitaConfig,
) -> Harness {
    let general = Arc::new(general);
    let reasoning = Arc::new(reasoning);
    let search = Arc::new(search);
    let config = Arc::new(LicitaConfigManager::from_config(config));

    let models = ModelHandles {
        general: general.clone(),
        reasoning: reasoning.clone(),
    };
    let pipeline = AnalysisPipeline::new(
        models,
        search.clone() as Arc<dyn SearchProvider>,
        Arc::clone(&config),
    );

    Harness {
        pipeline,
        config,
        general,
        reasoning,
        search,
    }
}

/// A general model that proposes `queries`, summarizing every page as "resumo"
pub fn general_with_queries(queries: &[&str]) -> MockLLMClient {
    let structured = serde_json::json!({ "queries": queries }).to_string();
    MockLLMClient::new(&structured, "resumo")
}

/// A reasoning model answer with thinking and a citation
pub const SYNTHESIS: &str = "<think>Analisar a Lei 14.133/2021.</think>\n\nO DFD formaliza a demanda [1].";
