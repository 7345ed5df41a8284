//! Resource registry
//!
//! Provides [`ResourceRegistry`], the ordered set of resources the admin panel
//! exposes. Built once at startup and handed to the controller.

use crate::error::ResourceError;
use crate::label::Label;
use crate::resource::Resource;
use indexmap::IndexMap;

/// Ordered registry of resources, unique by label
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceRegistry {
    resources: IndexMap<Label, Resource>,
}

impl ResourceRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: IndexMap::new(),
        }
    }

    /// Create registry with the built-in resources
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut resources = IndexMap::new();
        let user = Resource::user();
        resources.insert(user.label().clone(), user);
        Self { resources }
    }

    /// Build a registry from resources, keeping their order
    ///
    /// # Errors
    /// Returns [`ResourceError::DuplicateResource`] if a label repeats
    pub fn from_resources<I>(resources: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = Resource>,
    {
        let mut registry = Self::new();
        for resource in resources {
            registry.register(resource)?;
        }
        Ok(registry)
    }

    /// Register a resource
    ///
    /// # Errors
    /// Returns [`ResourceError::DuplicateResource`] if the label is taken
    pub fn register(&mut self, resource: Resource) -> Result<(), ResourceError> {
        if self.resources.contains_key(resource.label()) {
            return Err(ResourceError::DuplicateResource(resource.label().to_string()));
        }
        self.resources.insert(resource.label().clone(), resource);
        Ok(())
    }

    /// Look up a resource by label
    #[inline]
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Resource> {
        self.resources.get(label)
    }

    /// Check if a label is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.resources.contains_key(label)
    }

    /// First registered resource, the initial selection
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Resource> {
        self.resources.first().map(|(_, r)| r)
    }

    /// Registered labels, in order
    #[must_use]
    pub fn labels(&self) -> Vec<&Label> {
        self.resources.keys().collect()
    }

    /// Iterate over resources, in order
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Number of registered resources
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResourceRegistry {
    type Item = &'a Resource;
    type IntoIter = indexmap::map::Values<'a, Label, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.values()
    }
}
