use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{CommandError, OpSchema, Operation, Result};

#[derive(Clone, Copy)]
enum Slot {
    Current(usize),
    Deprecated(usize),
}

/// Every known operation, keyed by switch, in registration order.
///
/// Deprecated operations still resolve by exact switch but are kept out of
/// listings and prefix matches.
#[derive(Default)]
pub struct OperationRegistry {
    operations: Vec<Arc<dyn Operation>>,
    deprecated: Vec<Arc<dyn Operation>>,
    index: HashMap<&'static str, Slot>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<O: Operation + 'static>(&mut self, operation: O) -> Result<()> {
        self.register_arc(Arc::new(operation))
    }

    pub fn register_arc(&mut self, operation: Arc<dyn Operation>) -> Result<()> {
        let switch = self.check(operation.as_ref())?;
        debug!(switch, "registered operation");
        self.index.insert(switch, Slot::Current(self.operations.len()));
        self.operations.push(operation);
        Ok(())
    }

    pub fn register_deprecated<O: Operation + 'static>(&mut self, operation: O) -> Result<()> {
        let operation: Arc<dyn Operation> = Arc::new(operation);
        let switch = self.check(operation.as_ref())?;
        debug!(switch, "registered deprecated operation");
        self.index.insert(switch, Slot::Deprecated(self.deprecated.len()));
        self.deprecated.push(operation);
        Ok(())
    }

    fn check(&self, operation: &dyn Operation) -> Result<&'static str> {
        let switch = operation.switch();
        if !switch.starts_with('-') || switch.len() < 2 {
            return Err(CommandError::InvalidSchema {
                switch: switch.to_string(),
                message: "operation switch must start with '-'".to_string(),
            });
        }
        if self.index.contains_key(switch) {
            return Err(CommandError::RegistrationConflict(switch.to_string()));
        }
        operation.parameters().validate(switch)?;
        Ok(switch)
    }

    /// Looks up `switch` among current operations, then deprecated ones.
    pub fn resolve(&self, switch: &str) -> Result<Arc<dyn Operation>> {
        match self.index.get(switch) {
            Some(Slot::Current(position)) => Ok(Arc::clone(&self.operations[*position])),
            Some(Slot::Deprecated(position)) => Ok(Arc::clone(&self.deprecated[*position])),
            None => Err(CommandError::UnknownCommand(switch.to_string())),
        }
    }

    pub fn is_deprecated(&self, switch: &str) -> bool {
        matches!(self.index.get(switch), Some(Slot::Deprecated(_)))
    }

    pub fn contains(&self, switch: &str) -> bool {
        self.index.contains_key(switch)
    }

    pub fn list_all(&self) -> &[Arc<dyn Operation>] {
        &self.operations
    }

    pub fn list_deprecated(&self) -> &[Arc<dyn Operation>] {
        &self.deprecated
    }

    /// Operations whose switch starts with `prefix`, sorted by switch.
    pub fn matching(&self, prefix: &str) -> Vec<Arc<dyn Operation>> {
        let mut matches = self
            .operations
            .iter()
            .filter(|operation| operation.switch().starts_with(prefix))
            .cloned()
            .collect::<Vec<_>>();
        matches.sort_by_key(|operation| operation.switch());
        matches
    }

    pub fn schemas(&self) -> Vec<OpSchema> {
        self.operations
            .iter()
            .map(|operation| operation.schema())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
