//! Component registry: canonical key → constructible component type.
//!
//! Built once through [`RegistryBuilder`] with one `register::<T>()` call per
//! component type, then immutable and freely shared across threads. Keys are
//! derived from the type's simple name (`AndRule` → `and-rule`).

pub mod case;
pub mod component;
pub mod descriptor;

pub use case::{camel_to_lower_hyphen, key_of, lower_hyphen_to_camel, simple_type_name};
pub use component::{
    ArgInput, ArgValue, Component, ComponentKind, Constructor, Factory, ResolvedArgs,
};
pub use descriptor::{
    ComponentInfo, ConstructorArg, ConstructorInfo, EnumSpec, Param, ParamEnum, ParamType,
};

use std::collections::BTreeMap;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::{ConstructionError, EngineError, RegistryError};

struct Entry<K: ComponentKind> {
    type_name: &'static str,
    constructors: Vec<Constructor<K>>,
}

/// Registry of one component kind.
pub struct ComponentRegistry<K: ComponentKind> {
    entries: BTreeMap<String, Entry<K>>,
}

impl<K: ComponentKind> std::fmt::Debug for ComponentRegistry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("kind", &K::NAME)
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K: ComponentKind> ComponentRegistry<K> {
    pub fn builder() -> RegistryBuilder<K> {
        RegistryBuilder::new()
    }

    /// The constructible type registered under `key`.
    pub fn type_for(&self, key: &str) -> Result<ComponentType<'_, K>, EngineError> {
        self.entries
            .get_key_value(key)
            .map(|(key, entry)| ComponentType { key, entry })
            .ok_or_else(|| EngineError::UnknownComponent {
                kind: K::NAME,
                key: key.to_string(),
            })
    }

    /// Introspection metadata for `key`, built fresh on every call.
    pub fn info_for(&self, key: &str) -> Result<ComponentInfo, EngineError> {
        Ok(self.type_for(key)?.info())
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A registered, constructible type.
pub struct ComponentType<'a, K: ComponentKind> {
    key: &'a str,
    entry: &'a Entry<K>,
}

impl<K: ComponentKind> std::fmt::Debug for ComponentType<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentType")
            .field("key", &self.key)
            .field("type_name", &self.entry.type_name)
            .finish()
    }
}

impl<'a, K: ComponentKind> ComponentType<'a, K> {
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Full Rust type path.
    pub fn type_name(&self) -> &'static str {
        self.entry.type_name
    }

    pub fn simple_name(&self) -> &'static str {
        simple_type_name(self.entry.type_name)
    }

    pub fn constructors(&self) -> &'a [Constructor<K>] {
        &self.entry.constructors
    }

    pub fn info(&self) -> ComponentInfo {
        ComponentInfo {
            name: camel_to_lower_hyphen(self.simple_name()),
            constructors: self.constructors().iter().map(Constructor::describe).collect(),
        }
    }

    /// Construct an instance with the first constructor (in registration
    /// order) whose parameters all accept `inputs`.
    pub fn construct(&self, inputs: &[ArgInput]) -> Result<K::Output, ConstructionError> {
        for ctor in self.constructors() {
            if let Some(args) = ctor.bind(inputs) {
                return ctor.construct(&args);
            }
        }
        let supplied: Vec<String> = inputs.iter().map(ArgInput::describe).collect();
        let available: Vec<String> = self
            .constructors()
            .iter()
            .map(|c| c.describe().signature())
            .collect();
        Err(ConstructionError::NoMatchingConstructor {
            supplied: format!("({})", supplied.join(", ")),
            available: available.join(" | "),
        })
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

pub struct RegistryBuilder<K: ComponentKind> {
    pending: Vec<(String, &'static str, Vec<Constructor<K>>)>,
    _kind: PhantomData<K>,
}

impl<K: ComponentKind> Default for RegistryBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ComponentKind> RegistryBuilder<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            _kind: PhantomData,
        }
    }

    /// Register `T` under its derived key.
    pub fn register<T: Component<K> + 'static>(mut self) -> Self {
        self.pending
            .push((key_of::<T>(), std::any::type_name::<T>(), T::constructors()));
        self
    }

    pub fn build(self) -> Result<ComponentRegistry<K>, RegistryError> {
        let mut entries: BTreeMap<String, Entry<K>> = BTreeMap::new();
        for (key, type_name, constructors) in self.pending {
            if constructors.is_empty() {
                debug!(kind = K::NAME, type_name, "skipping non-constructible component");
                continue;
            }
            if let Some(existing) = entries.get(&key) {
                return Err(RegistryError::DuplicateKey {
                    kind: K::NAME,
                    key,
                    first: existing.type_name,
                    second: type_name,
                });
            }
            entries.insert(
                key,
                Entry {
                    type_name,
                    constructors,
                },
            );
        }
        debug!(kind = K::NAME, count = entries.len(), "component registry built");
        Ok(ComponentRegistry { entries })
    }
}
