use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Holds a named scalar parameter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Name of the parameter (e.g., "E", "nu", "qy0")
    pub name: String,

    /// Value of the parameter
    pub value: f64,

    /// Optional unit (informative only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Holds an ordered set of parameters
///
/// The set is consumed once by the model allocators. Each model checks every
/// name against its own vocabulary and rejects unknown names.
///
/// # Examples
///
/// ```
/// use geomat::base::ParamSet;
///
/// let params = ParamSet::from_pairs(&[("K", 1.5), ("G", 1.0), ("qy0", 2.0), ("H", 0.5)]);
/// assert_eq!(params.len(), 4);
/// assert_eq!(params.get("qy0"), Some(2.0));
///
/// let json = r#"[{"name": "E", "value": 60.0, "unit": "MPa"}, {"name": "nu", "value": 0.25}]"#;
/// let params = ParamSet::from_json(json).unwrap();
/// assert_eq!(params.get("E"), Some(60.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    all: Vec<Param>,
}

impl ParamSet {
    /// Allocates an empty set
    pub fn new() -> Self {
        ParamSet { all: Vec::new() }
    }

    /// Allocates a new set from (name, value) pairs
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        let mut params = ParamSet::new();
        for (name, value) in pairs {
            params.push(name, *value);
        }
        params
    }

    /// Parses a JSON array of `{"name": ..., "value": ..., "unit": ...}` records
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::InvalidInput(format!("cannot parse parameters: {}", e)))
    }

    /// Appends a parameter
    pub fn push(&mut self, name: &str, value: f64) -> &mut Self {
        self.all.push(Param {
            name: name.to_string(),
            value,
            unit: None,
        });
        self
    }

    /// Appends a parameter with unit
    pub fn push_with_unit(&mut self, name: &str, value: f64, unit: &str) -> &mut Self {
        self.all.push(Param {
            name: name.to_string(),
            value,
            unit: Some(unit.to_string()),
        });
        self
    }

    /// Appends all parameters of another set
    pub fn extend(&mut self, other: &ParamSet) -> &mut Self {
        self.all.extend(other.all.iter().cloned());
        self
    }

    /// Returns the value of the first parameter with the given name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.all.iter().find(|p| p.name == name).map(|p| p.value)
    }

    /// Returns the value of a switch parameter; values greater than zero mean `true`
    pub fn get_flag(&self, name: &str, default: bool) -> bool {
        self.get(name).map(|v| v > 0.0).unwrap_or(default)
    }

    /// Checks every name against the vocabulary of a model
    ///
    /// Names in `ignored` are accepted with a warning; any other name not in `known`
    /// results in [ModelError::UnknownParameter].
    pub fn check_names(&self, model: &'static str, known: &[&str], ignored: &[&str]) -> Result<(), ModelError> {
        for p in &self.all {
            let name = p.name.as_str();
            if known.contains(&name) {
                continue;
            }
            if ignored.contains(&name) {
                log::warn!("{}: handling of {:?} parameter is not implemented; the value is ignored", model, name);
                continue;
            }
            return Err(ModelError::UnknownParameter {
                model,
                name: p.name.clone(),
            });
        }
        Ok(())
    }

    /// Returns the number of parameters
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if the set is empty
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Returns an iterator over the parameters (in insertion order)
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.all.iter()
    }

    /// Returns the JSON representation of the set
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(|e| ModelError::InvalidInput(format!("cannot write parameters: {}", e)))
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;
    fn into_iter(self) -> Self::IntoIter {
        self.all.iter()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
