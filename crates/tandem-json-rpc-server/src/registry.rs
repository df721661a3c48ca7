use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::DispatchError;
use crate::procedure::{Procedure, RpcObject};

/// What a procedure name is bound to
#[derive(Clone)]
pub enum ProcedureTarget {
    /// A standalone callable
    Function(Arc<dyn Procedure>),
    /// A method on a class registered by name; looked up when called
    StaticMethod { class: String, method: String },
    /// A method on a live object
    InstanceMethod {
        instance: Arc<dyn RpcObject>,
        method: String,
    },
}

impl fmt::Debug for ProcedureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureTarget::Function(_) => f.write_str("Function"),
            ProcedureTarget::StaticMethod { class, method } => {
                write!(f, "StaticMethod({}::{})", class, method)
            }
            ProcedureTarget::InstanceMethod { method, .. } => {
                write!(f, "InstanceMethod(<instance>.{})", method)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcedureBinding {
    pub name: String,
    pub target: ProcedureTarget,
}

/// Maps external procedure names to bindings. The last registration for a name wins.
#[derive(Default)]
pub struct ProcedureRegistry {
    procedures: HashMap<String, ProcedureBinding>,
    classes: HashMap<String, Arc<dyn RpcObject>>,
}

impl ProcedureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a standalone callable
    pub fn register<P>(&mut self, name: impl Into<String>, procedure: P) -> &mut Self
    where
        P: Procedure + 'static,
    {
        self.insert(name.into(), ProcedureTarget::Function(Arc::new(procedure)))
    }

    /// Make a class reachable by name for [`ProcedureRegistry::bind_class`] bindings
    pub fn register_class(
        &mut self,
        class: impl Into<String>,
        object: Arc<dyn RpcObject>,
    ) -> &mut Self {
        let class = class.into();
        debug!(class = %class, "Registering class");
        self.classes.insert(class, object);
        self
    }

    /// Bind `name` to `class::method`. Neither needs to exist until the procedure is called.
    pub fn bind_class(
        &mut self,
        name: impl Into<String>,
        class: impl Into<String>,
        method: impl Into<String>,
    ) -> &mut Self {
        self.insert(
            name.into(),
            ProcedureTarget::StaticMethod {
                class: class.into(),
                method: method.into(),
            },
        )
    }

    /// Bind `name` to a method of a live object
    pub fn bind_instance(
        &mut self,
        name: impl Into<String>,
        instance: Arc<dyn RpcObject>,
        method: impl Into<String>,
    ) -> &mut Self {
        self.insert(
            name.into(),
            ProcedureTarget::InstanceMethod {
                instance,
                method: method.into(),
            },
        )
    }

    fn insert(&mut self, name: String, target: ProcedureTarget) -> &mut Self {
        debug!(procedure = %name, target = ?target, "Binding procedure");
        if self.procedures.contains_key(&name) {
            debug!(procedure = %name, "Replacing existing binding");
        }
        self.procedures
            .insert(name.clone(), ProcedureBinding { name, target });
        self
    }

    pub fn resolve(&self, name: &str) -> Result<&ProcedureBinding, DispatchError> {
        self.procedures
            .get(name)
            .ok_or_else(|| DispatchError::ProcedureNotFound(name.to_string()))
    }

    /// Locate the callable behind a binding
    pub fn resolve_target(
        &self,
        binding: &ProcedureBinding,
    ) -> Result<Arc<dyn Procedure>, DispatchError> {
        match &binding.target {
            ProcedureTarget::Function(procedure) => Ok(procedure.clone()),
            ProcedureTarget::StaticMethod { class, method } => {
                let object = self.classes.get(class).ok_or_else(|| {
                    DispatchError::TargetNotFound {
                        procedure: binding.name.clone(),
                        target: class.clone(),
                    }
                })?;
                object
                    .method(method)
                    .ok_or_else(|| DispatchError::MethodNotFound {
                        target: class.clone(),
                        method: method.clone(),
                    })
            }
            ProcedureTarget::InstanceMethod { instance, method } => instance
                .method(method)
                .ok_or_else(|| DispatchError::MethodNotFound {
                    target: format!("<instance bound to {}>", binding.name),
                    method: method.clone(),
                }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    /// Registered procedure names, sorted
    pub fn procedure_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }
}
