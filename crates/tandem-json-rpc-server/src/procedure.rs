use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::binder::Signature;
use crate::error::{DispatchError, ProcedureError, ResponseEncodingFailure};

/// Anything that can be invoked with an ordered, already bound argument vector
pub trait Procedure: Send + Sync {
    /// Declared parameters, used to bind incoming arguments
    fn signature(&self) -> &Signature;

    /// Run the procedure
    fn invoke(&self, args: BoundArguments) -> Result<Value, DispatchError>;
}

/// Arguments after binding: one value per declared parameter, in position order
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments(Vec<Value>);

impl BoundArguments {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Deserialize the argument at `index` into `T`
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, ProcedureError> {
        let value = self.0.get(index).ok_or_else(|| {
            ProcedureError::invalid_params(format!("no argument at position {}", index))
        })?;
        serde_json::from_value(value.clone()).map_err(|e| {
            ProcedureError::invalid_params(format!("argument {} has the wrong type: {}", index, e))
        })
    }

    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

/// A procedure backed by a closure
pub struct FnProcedure<F> {
    signature: Signature,
    func: F,
}

impl<F, R> FnProcedure<F>
where
    F: Fn(BoundArguments) -> Result<R, ProcedureError> + Send + Sync,
    R: Serialize,
{
    pub fn new(signature: Signature, func: F) -> Self {
        Self { signature, func }
    }
}

impl<F, R> Procedure for FnProcedure<F>
where
    F: Fn(BoundArguments) -> Result<R, ProcedureError> + Send + Sync,
    R: Serialize,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, args: BoundArguments) -> Result<Value, DispatchError> {
        let output = (self.func)(args)?;
        serde_json::to_value(output)
            .map_err(|e| DispatchError::Encoding(ResponseEncodingFailure(e)))
    }
}

impl<F> fmt::Debug for FnProcedure<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcedure")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// An object exposing named methods: a registered class or a live instance
pub trait RpcObject: Send + Sync {
    fn method(&self, name: &str) -> Option<Arc<dyn Procedure>>;
}

/// Name-keyed table of procedures acting as an [`RpcObject`]
#[derive(Default, Clone)]
pub struct MethodTable {
    methods: HashMap<String, Arc<dyn Procedure>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method<P>(mut self, name: impl Into<String>, procedure: P) -> Self
    where
        P: Procedure + 'static,
    {
        self.methods.insert(name.into(), Arc::new(procedure));
        self
    }

    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }
}

impl RpcObject for MethodTable {
    fn method(&self, name: &str) -> Option<Arc<dyn Procedure>> {
        self.methods.get(name).cloned()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.method_names())
            .finish()
    }
}
