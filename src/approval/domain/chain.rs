//! Ordered approval chain.

use super::{Login, TaskDomainError};
use serde::{Deserialize, Serialize};

/// Non-empty, ordered sequence of approvers.
///
/// Position in the chain defines the order in which approvers are asked to
/// act. The first approver is stored separately so that it can be returned
/// without a fallible lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Login>", into = "Vec<Login>")]
pub struct ApprovalChain {
    first: Login,
    rest: Vec<Login>,
}

impl ApprovalChain {
    /// Creates a chain from validated logins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyApprovalChain`] when no logins are
    /// supplied.
    pub fn new(logins: impl IntoIterator<Item = Login>) -> Result<Self, TaskDomainError> {
        let mut iter = logins.into_iter();
        let first = iter.next().ok_or(TaskDomainError::EmptyApprovalChain)?;
        Ok(Self {
            first,
            rest: iter.collect(),
        })
    }

    /// Validates raw login strings and builds a chain from them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyLogin`] when any entry is blank, or
    /// [`TaskDomainError::EmptyApprovalChain`] when no entries are supplied.
    pub fn parse<I, S>(raw: I) -> Result<Self, TaskDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let logins = raw
            .into_iter()
            .map(Login::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(logins)
    }

    /// Returns the first approver.
    #[must_use]
    pub const fn first(&self) -> &Login {
        &self.first
    }

    /// Returns the approver at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Login> {
        match position.checked_sub(1) {
            None => Some(&self.first),
            Some(offset) => self.rest.get(offset),
        }
    }

    /// Returns the number of approvers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` when `position` names the final approver.
    #[must_use]
    pub fn is_last(&self, position: usize) -> bool {
        position + 1 == self.len()
    }

    /// Iterates over approvers in approval order.
    pub fn iter(&self) -> impl Iterator<Item = &Login> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Returns the approvers as an owned vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Login> {
        self.iter().cloned().collect()
    }
}

impl TryFrom<Vec<Login>> for ApprovalChain {
    type Error = TaskDomainError;

    fn try_from(value: Vec<Login>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApprovalChain> for Vec<Login> {
    fn from(chain: ApprovalChain) -> Self {
        let mut logins = Vec::with_capacity(chain.len());
        logins.push(chain.first);
        logins.extend(chain.rest);
        logins
    }
}
