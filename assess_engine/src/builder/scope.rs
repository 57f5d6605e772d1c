use crate::requirements::{BaseRequirement, DerivedRequirement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Declared scope of an assessment run
///
/// `None` for an inclusion set means "everything". Exclusions always win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_requirements: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_requirements: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub excluded: BTreeSet<String>,
}

impl RequirementScope {
    /// Every requirement in scope
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_base_requirements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_requirements = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_derived_requirements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derived_requirements = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Exclude a base or derived requirement by id
    pub fn excluding(mut self, id: impl Into<String>) -> Self {
        self.excluded.insert(id.into());
        self
    }

    pub fn includes_base(&self, base: &BaseRequirement) -> bool {
        if self.excluded.contains(&base.id) {
            return false;
        }
        self.base_requirements
            .as_ref()
            .map_or(true, |ids| ids.contains(&base.id))
    }

    /// In scope only when the owning base requirement is
    pub fn includes_derived(&self, base: &BaseRequirement, derived: &DerivedRequirement) -> bool {
        if !self.includes_base(base) || self.excluded.contains(&derived.id) {
            return false;
        }
        self.derived_requirements
            .as_ref()
            .map_or(true, |ids| ids.contains(&derived.id))
    }
}
