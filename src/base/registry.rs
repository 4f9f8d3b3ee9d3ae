use super::ParamSet;
use crate::ModelError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Defines a model family that can be allocated by name
pub trait ModelAllocator: Sized {
    /// Holds the data needed by the family besides the parameters (e.g., the idealization)
    type Setup;

    /// Allocates and initializes a new model
    ///
    /// Returns [ModelError::UnknownModel] if the family has no model with the given name.
    fn allocate(model_name: &str, setup: &Self::Setup, params: &ParamSet) -> Result<Self, ModelError>;
}

/// Holds a cache of model instances shared by many material points
///
/// The instances are keyed by the `(sim_key, material_name, model_name)` triple. The registry
/// is owned by the caller (e.g., one per simulation) and is guarded by a mutex; thus,
/// concurrent first-population of the same key is safe, although pre-populating the
/// registry before processing elements in parallel is recommended.
///
/// # Examples
///
/// ```
/// use geomat::base::{Idealization, ModelRegistry, SampleParams};
/// use geomat::material::StressStrain;
///
/// let registry = ModelRegistry::<StressStrain>::new();
/// let ideal = Idealization::new(2);
/// let params = SampleParams::von_mises();
/// let a = registry.get("sim1", "clay", "vm", &ideal, &params, false).unwrap();
/// let b = registry.get("sim1", "clay", "vm", &ideal, &params, false).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// assert_eq!(registry.len(), 1);
/// ```
pub struct ModelRegistry<M> {
    models: Mutex<HashMap<(String, String, String), Arc<M>>>,
}

impl<M: ModelAllocator> ModelRegistry<M> {
    /// Allocates an empty registry
    pub fn new() -> Self {
        ModelRegistry {
            models: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the model instance for a (simulation, material, model) triple
    ///
    /// If `force_new` is false, returns the cached instance, allocating (and caching)
    /// it on the first request. The `setup` and `params` are only consumed when the
    /// instance is allocated. If `force_new` is true, always allocates a fresh instance
    /// that is not cached.
    pub fn get(
        &self,
        sim_key: &str,
        material_name: &str,
        model_name: &str,
        setup: &M::Setup,
        params: &ParamSet,
        force_new: bool,
    ) -> Result<Arc<M>, ModelError> {
        if force_new {
            return Ok(Arc::new(M::allocate(model_name, setup, params)?));
        }
        let key = (sim_key.to_string(), material_name.to_string(), model_name.to_string());
        let mut models = self
            .models
            .lock()
            .map_err(|_| ModelError::InvalidInput("model registry is poisoned".to_string()))?;
        if let Some(model) = models.get(&key) {
            return Ok(model.clone());
        }
        let model = Arc::new(M::allocate(model_name, setup, params)?);
        models.insert(key, model.clone());
        Ok(model)
    }

    /// Returns the number of cached instances
    pub fn len(&self) -> usize {
        self.models.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns true if no instance has been cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all cached instances
    pub fn clear(&self) {
        if let Ok(mut models) = self.models.lock() {
            models.clear();
        }
    }
}

impl<M: ModelAllocator> Default for ModelRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ModelAllocator, ModelRegistry};
    use crate::base::ParamSet;
    use crate::ModelError;
    use std::sync::Arc;

    struct Dummy {
        value: f64,
    }

    impl ModelAllocator for Dummy {
        type Setup = f64;
        fn allocate(model_name: &str, setup: &f64, params: &ParamSet) -> Result<Self, ModelError> {
            if model_name != "dummy" {
                return Err(ModelError::UnknownModel(model_name.to_string()));
            }
            Ok(Dummy {
                value: setup + params.get("a").unwrap_or(0.0),
            })
        }
    }

    #[test]
    fn get_caches_instances() {
        let registry = ModelRegistry::<Dummy>::new();
        assert!(registry.is_empty());
        let params = ParamSet::from_pairs(&[("a", 1.0)]);
        let a = registry.get("s", "m", "dummy", &10.0, &params, false).unwrap();
        assert_eq!(a.value, 11.0);

        // parameters are ignored for cached instances
        let other = ParamSet::from_pairs(&[("a", 2.0)]);
        let b = registry.get("s", "m", "dummy", &10.0, &other, false).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.value, 11.0);

        let c = registry.get("s", "n", "dummy", &10.0, &other, false).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.value, 12.0);
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn keys_with_underscores_do_not_collide() {
        let registry = ModelRegistry::<Dummy>::new();
        let a = registry.get("a_b", "c", "dummy", &1.0, &ParamSet::new(), false).unwrap();
        let b = registry.get("a", "b_c", "dummy", &2.0, &ParamSet::new(), false).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.value, 1.0);
        assert_eq!(b.value, 2.0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn force_new_bypasses_the_cache() {
        let registry = ModelRegistry::<Dummy>::new();
        let params = ParamSet::new();
        let a = registry.get("s", "m", "dummy", &1.0, &params, true).unwrap();
        let b = registry.get("s", "m", "dummy", &1.0, &params, true).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(registry.is_empty());
    }

    #[test]
    fn get_captures_errors() {
        let registry = ModelRegistry::<Dummy>::new();
        let params = ParamSet::new();
        assert_eq!(
            registry.get("s", "m", "wrong", &1.0, &params, false).err(),
            Some(ModelError::UnknownModel("wrong".to_string()))
        );
        assert!(registry.is_empty());
    }
}
