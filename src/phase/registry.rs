//! Ordered phase registry.

use super::ReleasePhase;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Ordered sequence of phase names plus their implementations.
///
/// Built once through [`PhaseRegistryBuilder`] and read-only afterwards.
#[derive(Clone)]
pub struct PhaseRegistry {
    order: Vec<String>,
    phases: HashMap<String, Arc<dyn ReleasePhase>>,
}

impl fmt::Debug for PhaseRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<&String> = self.phases.keys().collect();
        registered.sort();
        f.debug_struct("PhaseRegistry")
            .field("order", &self.order)
            .field("registered", &registered)
            .finish()
    }
}

impl PhaseRegistry {
    /// Start building a registry
    pub fn builder() -> PhaseRegistryBuilder {
        PhaseRegistryBuilder::default()
    }

    /// Phase names in execution order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of phases in the sequence
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Index of a phase in the sequence
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    /// Last phase of the sequence; completing it means preparation is done
    pub fn terminal(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    /// Implementation registered under a name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ReleasePhase>> {
        self.phases.get(name).cloned()
    }

    /// Every registered implementation: sequence order first, then any
    /// registered phase outside the sequence, by name.
    pub fn implementations(&self) -> Vec<(String, Arc<dyn ReleasePhase>)> {
        let mut result: Vec<(String, Arc<dyn ReleasePhase>)> = self
            .order
            .iter()
            .filter_map(|name| self.phases.get(name).map(|p| (name.clone(), p.clone())))
            .collect();

        let mut extra: Vec<(&String, &Arc<dyn ReleasePhase>)> = self
            .phases
            .iter()
            .filter(|(name, _)| !self.order.contains(name))
            .collect();
        extra.sort_by(|a, b| a.0.cmp(b.0));
        result.extend(extra.into_iter().map(|(n, p)| (n.clone(), p.clone())));

        result
    }

    /// Names in the sequence that have no implementation
    pub fn unimplemented(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| !self.phases.contains_key(*name))
            .map(String::as_str)
            .collect()
    }
}

/// Builder for [`PhaseRegistry`]
#[derive(Default)]
pub struct PhaseRegistryBuilder {
    order: Vec<String>,
    phases: HashMap<String, Arc<dyn ReleasePhase>>,
    explicit_order: Option<Vec<String>>,
}

impl PhaseRegistryBuilder {
    /// Register a phase and append it to the sequence.
    ///
    /// Registering a name twice replaces the implementation but keeps its
    /// original position.
    pub fn phase(mut self, name: impl Into<String>, phase: Arc<dyn ReleasePhase>) -> Self {
        let name = name.into();
        if !self.phases.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.phases.insert(name, phase);
        self
    }

    /// Replace the execution order. Names without an implementation are kept
    /// and reported when preparation reaches them.
    pub fn order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit_order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Finish the registry
    pub fn build(self) -> PhaseRegistry {
        let order = self.explicit_order.unwrap_or(self.order);
        PhaseRegistry {
            order,
            phases: self.phases,
        }
    }
}
