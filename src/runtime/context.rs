use std::io::Write;

use tracing::debug;

use crate::commands::{Dispatcher, OperationRegistry, Provenance};
use crate::formats::{DiskFileProvider, FileProvider};
use crate::operations::register_all;

use super::Result;

/// Process-wide state: the operation registry and the file provider commands load through.
///
/// Built once at startup; dropping it (or calling [`AppContext::shutdown`]) releases both.
pub struct AppContext {
    registry: OperationRegistry,
    provider: Box<dyn FileProvider>,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        Self::with_provider(Box::new(DiskFileProvider))
    }

    pub fn with_provider(provider: Box<dyn FileProvider>) -> Result<Self> {
        let mut registry = OperationRegistry::new();
        register_all(&mut registry)?;
        debug!(operations = registry.len(), "operation registry initialized");
        Ok(Self { registry, provider })
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &dyn FileProvider {
        self.provider.as_ref()
    }

    pub fn execute(
        &self,
        switch: &str,
        args: Vec<String>,
        provenance: Option<Provenance>,
        out: &mut dyn Write,
    ) -> Result<()> {
        Dispatcher::new(&self.registry, self.provider())
            .with_provenance(provenance)
            .execute(switch, args, out)?;
        Ok(())
    }

    pub fn shutdown(self) {
        debug!(operations = self.registry.len(), "operation registry released");
    }
}
