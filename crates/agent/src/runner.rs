//! The agent: parse → assemble → invoke.

use std::path::Path;
use std::sync::Arc;

use dcl_core::{GenerationAdapter, InvocationContext, Result};
use dcl_registry::{BundleLoader, DocumentDecoder, ModuleRegistry};
use tracing::{debug, info};

use crate::strategy::AssemblyStrategy;

/// Resolves instruction text against a validated registry and hands the
/// assembled context to a generation adapter.
///
/// The registry is validated on construction and never mutated afterwards,
/// so one agent can serve concurrent requests.
pub struct DclAgent {
    /// Validated, read-only registry
    registry: Arc<ModuleRegistry>,

    /// The generation backend
    adapter: Arc<dyn GenerationAdapter>,

    /// Frame layout
    strategy: AssemblyStrategy,
}

impl DclAgent {
    /// Load `bundles` in precedence order with the default loader and build
    /// an agent over them.
    ///
    /// Fails with a configuration error if any alias is left dangling.
    pub fn new<P: AsRef<Path>>(bundles: &[P], adapter: Arc<dyn GenerationAdapter>) -> Result<Self> {
        Self::with_loader(&BundleLoader::new(), bundles, adapter)
    }

    /// Like [`DclAgent::new`], with a configured loader (index file name, decoder).
    pub fn with_loader<P: AsRef<Path>, D: DocumentDecoder>(
        loader: &BundleLoader<D>,
        bundles: &[P],
        adapter: Arc<dyn GenerationAdapter>,
    ) -> Result<Self> {
        let (registry, report) = loader.load_bundles(bundles)?;
        debug!(
            modules = report.modules_inserted(),
            aliases = report.aliases_inserted(),
            "Bundles loaded for agent"
        );
        Self::from_registry(registry, adapter)
    }

    /// Build an agent over an already loaded registry. The registry is
    /// validated here.
    pub fn from_registry(registry: ModuleRegistry, adapter: Arc<dyn GenerationAdapter>) -> Result<Self> {
        registry.validate()?;
        Ok(Self {
            registry: Arc::new(registry),
            adapter,
            strategy: AssemblyStrategy::default(),
        })
    }

    /// Use a different assembly strategy.
    pub fn with_strategy(mut self, strategy: AssemblyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// A shared handle to the registry.
    pub fn shared_registry(&self) -> Arc<ModuleRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn strategy(&self) -> AssemblyStrategy {
        self.strategy
    }

    pub fn adapter_name(&self) -> &str {
        self.adapter.name()
    }

    /// Parse and assemble without invoking the adapter.
    pub fn prepare(&self, text: &str) -> Result<InvocationContext> {
        let instruction = dcl_parser::parse_instruction(text)?;
        let context = self.strategy.assemble(&instruction, &self.registry);
        debug!(
            action = %instruction.action,
            strategy = %self.strategy,
            frames = context.frames.len(),
            "Assembled invocation context"
        );
        Ok(context)
    }

    /// Parse, assemble and invoke the adapter, returning its response.
    pub async fn execute(&self, text: &str) -> Result<String> {
        let context = self.prepare(text)?;
        info!(adapter = self.adapter.name(), frames = context.frames.len(), "Invoking adapter");
        let response = self.adapter.invoke(&context).await?;
        Ok(response)
    }
}
