//! Search parameter registry for descriptor lookup.
//!
//! The registry is built at startup and consulted read-only afterwards; the
//! parsers never mutate it. Parameters are indexed per resource type, with a
//! common tier for parameters that apply to every resource.

use std::collections::HashMap;
use std::sync::Arc;

use crate::parameters::SearchParamInfo;

/// Read-only lookup table of search parameter descriptors.
#[derive(Debug, Default)]
pub struct SearchParamRegistry {
    /// Parameters indexed by (resource type, parameter name)
    by_resource: HashMap<String, HashMap<String, Arc<SearchParamInfo>>>,
    /// Parameters that apply to all resource types
    common: HashMap<String, Arc<SearchParamInfo>>,
}

impl SearchParamRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor for a specific resource type.
    pub fn register(&mut self, resource_type: impl Into<String>, info: SearchParamInfo) {
        let resource_type = resource_type.into();
        tracing::debug!(resource = %resource_type, param = %info.name, "registering search parameter");
        self.by_resource
            .entry(resource_type)
            .or_default()
            .insert(info.name.clone(), Arc::new(info));
    }

    /// Register a descriptor that applies to every resource type.
    pub fn register_common(&mut self, info: SearchParamInfo) {
        self.common.insert(info.name.clone(), Arc::new(info));
    }

    /// Look up a descriptor for a resource type and parameter name.
    ///
    /// Resource-specific parameters shadow common ones.
    pub fn lookup(&self, resource_type: &str, name: &str) -> Option<Arc<SearchParamInfo>> {
        if let Some(info) = self
            .by_resource
            .get(resource_type)
            .and_then(|params| params.get(name))
        {
            return Some(info.clone());
        }
        self.common.get(name).cloned()
    }

    /// All descriptors applicable to a resource type.
    pub fn all_for_type(&self, resource_type: &str) -> Vec<Arc<SearchParamInfo>> {
        let mut params: Vec<_> = self.common.values().cloned().collect();
        if let Some(type_params) = self.by_resource.get(resource_type) {
            params.extend(type_params.values().cloned());
        }
        params
    }

    /// Total number of registered descriptors.
    pub fn len(&self) -> usize {
        self.by_resource.values().map(HashMap::len).sum::<usize>() + self.common.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_resource.is_empty() && self.common.is_empty()
    }
}
