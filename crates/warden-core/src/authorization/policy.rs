//! Per-operation policies and their evaluation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::ability::Ability;
use super::capability::{Action, Subject};
use crate::domain::Principal;
use crate::error::{DomainError, DomainResult};

/// The parts of the inbound request policies may look at.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A boolean predicate guarding one operation. Parameterized policies are
/// closures that capture their parameters when built.
pub type Policy = Arc<dyn Fn(&Ability, &Principal, &RequestInfo) -> bool + Send + Sync>;

pub struct PolicyEvaluator;

impl PolicyEvaluator {
    /// Logical AND over `policies`, in order. An empty list permits.
    pub fn evaluate(
        policies: &[Policy],
        ability: &Ability,
        principal: &Principal,
        request: &RequestInfo,
    ) -> bool {
        policies.iter().enumerate().all(|(index, policy)| {
            let allowed = policy(ability, principal, request);
            if !allowed {
                debug!(index, user_id = %principal.user_id, path = %request.path, "Policy denied");
            }
            allowed
        })
    }

    pub fn authorize(
        policies: &[Policy],
        ability: &Ability,
        principal: &Principal,
        request: &RequestInfo,
    ) -> DomainResult<()> {
        if Self::evaluate(policies, ability, principal, request) {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

/// Blanket grant check.
pub fn can(action: Action, subject: Subject) -> Policy {
    Arc::new(move |ability, _, _| ability.can(action, subject))
}

/// `any` on the subject, or `own` when the path parameter `param` names the
/// principal itself.
pub fn can_any_or_own(any: Action, own: Action, subject: Subject, param: &'static str) -> Policy {
    Arc::new(move |ability, principal, request| {
        if ability.can(any, subject) {
            return true;
        }
        ability.can(own, subject) && is_principal_param(principal, request, param)
    })
}

/// Passes when at least one inner policy passes.
pub fn any_of(policies: Vec<Policy>) -> Policy {
    Arc::new(move |ability, principal, request| {
        policies.iter().any(|p| p(ability, principal, request))
    })
}

fn is_principal_param(principal: &Principal, request: &RequestInfo, param: &str) -> bool {
    request
        .param(param)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .is_some_and(|id| id == principal.user_id)
}
