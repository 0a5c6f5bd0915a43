//! Explicit handler/validator registries and the typed dispatcher.
//!
//! # Responsibility
//! - Build the request-type → handler and request-type → validator maps once
//!   at process start.
//! - Route `process` calls to the resolved handler, validation first.
//! - Fail fast at startup when any declared request type lacks its
//!   registrations.
//!
//! # Invariants
//! - At most one handler and one validator per request type; duplicates are
//!   configuration defects reported by `build()`.
//! - Registries are immutable after `build()`; lookup is by `TypeId`, never
//!   by ambient reflection or a container.

use crate::dispatch::error::{ProcessError, ProcessResult};
use crate::dispatch::validation::Validator;
use crate::dispatch::{Handler, Request, RequestContext};
use log::{debug, error};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

struct StoredHandler<R: Request> {
    handler: Box<dyn Handler<R>>,
}

struct StoredValidator<R: Request> {
    validator: Box<dyn Validator<R>>,
}

/// One configuration problem found while building or verifying registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationIssue {
    DuplicateHandler(&'static str),
    DuplicateValidator(&'static str),
    MissingHandler(&'static str),
    MissingValidator(&'static str),
}

impl Display for ConfigurationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateHandler(name) => write!(f, "duplicate handler for {name}"),
            Self::DuplicateValidator(name) => write!(f, "duplicate validator for {name}"),
            Self::MissingHandler(name) => write!(f, "missing handler for {name}"),
            Self::MissingValidator(name) => write!(f, "missing validator for {name}"),
        }
    }
}

/// Aggregate of every configuration defect found. Fatal at startup.
#[derive(Debug)]
pub struct ConfigurationError {
    issues: Vec<ConfigurationIssue>,
}

impl ConfigurationError {
    pub fn issues(&self) -> &[ConfigurationIssue] {
        &self.issues
    }
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispatcher configuration is invalid: ")?;
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl Error for ConfigurationError {}

/// Declares what the registries must contain for one request type.
///
/// The wiring module exposes the full contract list so the startup check can
/// iterate every known request type.
#[derive(Debug, Clone, Copy)]
pub struct RequestContract {
    type_id: TypeId,
    name: &'static str,
    requires_validator: bool,
}

/// Builds the contract descriptor for request type `R`.
pub fn contract<R: Request>(requires_validator: bool) -> RequestContract {
    RequestContract {
        type_id: TypeId::of::<R>(),
        name: type_name::<R>(),
        requires_validator,
    }
}

/// Collects handler/validator registrations before the dispatcher is built.
#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    validators: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    issues: Vec<ConfigurationIssue>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the single handler for request type `R`.
    ///
    /// `R` is inferred from the handler's `Handler<R>` implementation.
    pub fn handler<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: Handler<R> + 'static,
    {
        let stored: Box<dyn Any + Send + Sync> = Box::new(StoredHandler::<R> {
            handler: Box::new(handler),
        });
        if self.handlers.insert(TypeId::of::<R>(), stored).is_some() {
            self.issues
                .push(ConfigurationIssue::DuplicateHandler(type_name::<R>()));
        }
        self
    }

    /// Registers the single validator for request type `R`.
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R> + 'static,
    {
        let stored: Box<dyn Any + Send + Sync> = Box::new(StoredValidator::<R> {
            validator: Box::new(validator),
        });
        if self.validators.insert(TypeId::of::<R>(), stored).is_some() {
            self.issues
                .push(ConfigurationIssue::DuplicateValidator(type_name::<R>()));
        }
        self
    }

    /// Finalizes the registries. Duplicate registrations fail the build.
    pub fn build(self) -> Result<Dispatcher, ConfigurationError> {
        if !self.issues.is_empty() {
            return Err(ConfigurationError {
                issues: self.issues,
            });
        }
        Ok(Dispatcher {
            handlers: self.handlers,
            validators: self.validators,
        })
    }
}

/// Routes typed requests to their registered handler, validation first.
pub struct Dispatcher {
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    validators: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Dispatches one request inside the caller's transaction scope.
    ///
    /// Resolution order: handler lookup, validator (short-circuits with
    /// `ProcessError::Validation` on failure), cancellation check, handler.
    /// Handler failures propagate unchanged.
    pub fn process<R: Request>(
        &self,
        request: &R,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<R::Response> {
        let request_type = type_name::<R>();
        let stored = self
            .handlers
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.downcast_ref::<StoredHandler<R>>())
            .ok_or_else(|| {
                error!(
                    "event=dispatch module=dispatch status=error error_code=handler_not_found request_type={request_type}"
                );
                ProcessError::HandlerNotFound { request_type }
            })?;

        if let Some(stored_validator) = self
            .validators
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.downcast_ref::<StoredValidator<R>>())
        {
            let result = stored_validator.validator.validate(request);
            if !result.is_valid() {
                debug!(
                    "event=dispatch module=dispatch status=rejected request_type={request_type} failures={}",
                    result.failures().len()
                );
                return Err(ProcessError::Validation(result));
            }
        }

        if ctx.cancellation().is_cancelled() {
            return Err(ProcessError::Cancelled);
        }

        stored.handler.handle(request, ctx)
    }

    /// Eager startup check: every declared request type must resolve a
    /// handler and, where required, a validator.
    ///
    /// Run once after registry construction, before accepting traffic. A
    /// failure here is a process-start abort, never a per-request outcome.
    pub fn assert_configuration_valid(
        &self,
        contracts: &[RequestContract],
    ) -> Result<(), ConfigurationError> {
        let mut issues = Vec::new();
        for declared in contracts {
            if !self.handlers.contains_key(&declared.type_id) {
                issues.push(ConfigurationIssue::MissingHandler(declared.name));
            }
            if declared.requires_validator && !self.validators.contains_key(&declared.type_id) {
                issues.push(ConfigurationIssue::MissingValidator(declared.name));
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            let err = ConfigurationError { issues };
            error!("event=config_check module=dispatch status=error error={err}");
            Err(err)
        }
    }
}
