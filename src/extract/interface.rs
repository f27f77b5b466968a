//! Interface extraction: one derived interface per receiver type.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer};

use crate::scan::MethodSignature;

/// Default suffix appended to the owner type name.
pub const DEFAULT_INTERFACE_SUFFIX: &str = "Interface";

/// An interface synthesized from the method set of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceSpec {
    pub derived_name: String,
    pub original_type_name: String,
    /// Method name to signature text, e.g. `SetStuff` -> `(i int) *Bar`.
    #[serde(serialize_with = "sorted_map")]
    pub methods: HashMap<String, String>,
}

impl InterfaceSpec {
    /// Create an empty interface for `type_name`.
    pub fn new(type_name: &str, suffix: &str) -> Self {
        Self {
            derived_name: format!("{}{}", type_name, suffix),
            original_type_name: type_name.to_string(),
            methods: HashMap::new(),
        }
    }

    /// Add a method, replacing any earlier method of the same name.
    ///
    /// Returns the replaced signature, if any.
    pub fn insert(&mut self, method: &MethodSignature) -> Option<String> {
        self.methods.insert(method.name.clone(), method.signature())
    }

    /// Methods sorted by name.
    pub fn sorted_methods(&self) -> Vec<(&str, &str)> {
        let mut methods: Vec<(&str, &str)> = self
            .methods
            .iter()
            .map(|(name, sig)| (name.as_str(), sig.as_str()))
            .collect();
        methods.sort_unstable_by(|a, b| a.0.cmp(b.0));
        methods
    }
}

/// Derived interfaces of one package, keyed by original type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceSet {
    #[serde(serialize_with = "sorted_map")]
    pub specs: HashMap<String, InterfaceSpec>,
}

impl InterfaceSet {
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn get(&self, type_name: &str) -> Option<&InterfaceSpec> {
        self.specs.get(type_name)
    }

    /// Interfaces sorted by derived name.
    pub fn sorted(&self) -> Vec<&InterfaceSpec> {
        let mut specs: Vec<&InterfaceSpec> = self.specs.values().collect();
        specs.sort_unstable_by(|a, b| a.derived_name.cmp(&b.derived_name));
        specs
    }
}

/// Group methods by owner type into derived interfaces.
///
/// Pointer and value receivers of the same type land in the same interface.
/// When two methods share a name, the later one wins.
pub fn extract_interfaces(methods: &[MethodSignature], suffix: &str) -> InterfaceSet {
    let mut set = InterfaceSet::default();
    for method in methods {
        let spec = set
            .specs
            .entry(method.owner_type_name.clone())
            .or_insert_with(|| InterfaceSpec::new(&method.owner_type_name, suffix));
        if let Some(previous) = spec.insert(method) {
            tracing::warn!(
                type_name = %method.owner_type_name,
                method = %method.name,
                replaced = %previous,
                "duplicate method name, keeping the later declaration"
            );
        }
    }
    set
}

fn sorted_map<V, S>(map: &HashMap<String, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    let sorted: BTreeMap<&String, &V> = map.iter().collect();
    sorted.serialize(serializer)
}
