//! Reconciles caller-supplied arguments with a target's declared parameters.
//!
//! Two calling conventions are accepted: an ordered list, matched by position,
//! and a name-keyed map, matched by parameter name. Trailing parameters with a
//! default may be left out in either convention.

use serde_json::{Map, Value};

use crate::error::ArityError;

/// One formal parameter of a procedure
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub position: usize,
    pub default: Option<Value>,
}

impl ParameterSpec {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Ordered parameter list of a procedure, built at registration time.
///
/// Optional parameters are expected to follow required ones; positions are
/// assigned in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<ParameterSpec>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        let position = self.params.len();
        self.params.push(ParameterSpec {
            name: name.into(),
            position,
            default: None,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, default: Value) -> Self {
        let position = self.params.len();
        self.params.push(ParameterSpec {
            name: name.into(),
            position,
            default: Some(default),
        });
        self
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.has_default()).count()
    }
}

/// Arguments of one invocation: exactly one of the two shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Arguments {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Arguments {
    /// No arguments at all
    pub fn none() -> Self {
        Arguments::Positional(Vec::new())
    }

    /// Classify a map by its keys alone: dense `"0".."n-1"` keys are positional
    pub fn from_map(map: Map<String, Value>) -> Self {
        if !is_positional_arguments(&map) {
            return Arguments::Named(map);
        }

        let mut indexed: Vec<(usize, Value)> = map
            .into_iter()
            .filter_map(|(key, value)| key.parse::<usize>().ok().map(|i| (i, value)))
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        Arguments::Positional(indexed.into_iter().map(|(_, v)| v).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Arguments::Positional(values) => values.len(),
            Arguments::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Arguments::Positional(values)
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Arguments::from_map(map)
    }
}

/// True iff the keys are exactly the integers `0..n-1` written in canonical decimal form.
///
/// Only the shape of the supplied data is inspected. The empty map is positional.
pub fn is_positional_arguments(map: &Map<String, Value>) -> bool {
    let n = map.len();
    let mut seen = vec![false; n];
    for key in map.keys() {
        let Ok(index) = key.parse::<usize>() else {
            return false;
        };
        // "01" or "+1" would parse but are not list indices
        if index >= n || index.to_string() != *key || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}

/// Produce the ordered argument vector for `params`, filling defaults where allowed
pub fn bind_arguments(
    arguments: &Arguments,
    params: &[ParameterSpec],
) -> Result<Vec<Value>, ArityError> {
    match arguments {
        Arguments::Named(map) => params
            .iter()
            .map(|param| match map.get(&param.name) {
                Some(value) => Ok(value.clone()),
                None => param.default.clone().ok_or_else(|| ArityError::Missing {
                    name: param.name.clone(),
                }),
            })
            .collect(),
        Arguments::Positional(values) => {
            if values.len() > params.len() {
                return Err(ArityError::TooMany {
                    expected: params.len(),
                    given: values.len(),
                });
            }

            let required = params.iter().filter(|p| !p.has_default()).count();
            if values.len() < required {
                return Err(ArityError::TooFew {
                    required,
                    given: values.len(),
                });
            }

            let mut bound = values.clone();
            for param in &params[values.len()..] {
                match &param.default {
                    Some(default) => bound.push(default.clone()),
                    // A required parameter after an optional one
                    None => {
                        return Err(ArityError::Missing {
                            name: param.name.clone(),
                        });
                    }
                }
            }
            Ok(bound)
        }
    }
}
