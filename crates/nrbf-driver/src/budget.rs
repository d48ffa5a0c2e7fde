use crate::error::DriverError;

/// Default node limit for one crunch or literal rendering pass.
pub const DEFAULT_MAX_NODES: usize = 1 << 20;

/// Counts the JSON nodes a renderer emits against a fixed limit.
///
/// Both renderers expand a shared object at every reference to it, so a
/// chain of objects that each reference the next one twice doubles the
/// output per link. A stream of a few hundred bytes can describe an
/// output of billions of nodes. Every node is charged here and rendering
/// stops with [`DriverError::OutputTooLarge`] once the limit is passed.
///
/// ```text
/// ┌──────────────────────────────┬───────────────┐
/// │ Emitted                      │ Charge        │
/// ├──────────────────────────────┼───────────────┤
/// │ record (class, string, …)    │ 1             │
/// │ inline primitive value       │ 1             │
/// │ primitive array              │ its length    │
/// │ null run expanded by crunch  │ its width     │
/// └──────────────────────────────┴───────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeBudget {
    limit: usize,
    used: usize,
}

impl NodeBudget {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Record `nodes` more emitted nodes.
    ///
    /// # Errors
    ///
    /// [`DriverError::OutputTooLarge`] once the running total passes the
    /// limit. The total keeps counting after that.
    pub fn charge(&mut self, nodes: usize) -> Result<(), DriverError> {
        self.used = self.used.saturating_add(nodes);
        if self.used > self.limit {
            return Err(DriverError::OutputTooLarge { limit: self.limit });
        }
        Ok(())
    }
}

impl Default for NodeBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NODES)
    }
}
