use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type/severity of a derived requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementType {
    #[default]
    Must,
    Should,
    May,
    #[serde(alias = "info")]
    Informational,
}

impl RequirementType {
    pub fn is_informational(&self) -> bool {
        matches!(self, RequirementType::Informational)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementType::Must => "must",
            RequirementType::Should => "should",
            RequirementType::May => "may",
            RequirementType::Informational => "informational",
        }
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The finest-grained requirement a check reports against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRequirement {
    pub id: String,
    #[serde(default)]
    pub statement: String,
    #[serde(rename = "type", default)]
    pub requirement_type: RequirementType,
    #[serde(default)]
    pub conditional: bool,
}

impl DerivedRequirement {
    pub fn new(id: impl Into<String>, requirement_type: RequirementType) -> Self {
        Self {
            id: id.into(),
            statement: String::new(),
            requirement_type,
            conditional: false,
        }
    }

    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = statement.into();
        self
    }

    pub fn conditional(mut self) -> Self {
        self.conditional = true;
        self
    }

    pub fn is_informational(&self) -> bool {
        self.requirement_type.is_informational()
    }
}

/// A group of derived requirements; its status is always computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRequirement {
    pub id: String,
    #[serde(default)]
    pub statement: String,
    #[serde(rename = "derived", default)]
    pub derived_requirements: Vec<DerivedRequirement>,
}

impl BaseRequirement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            statement: String::new(),
            derived_requirements: Vec::new(),
        }
    }

    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = statement.into();
        self
    }

    pub fn with_derived(mut self, derived: DerivedRequirement) -> Self {
        self.derived_requirements.push(derived);
        self
    }

    pub fn derived_requirement(&self, id: &str) -> Option<&DerivedRequirement> {
        self.derived_requirements.iter().find(|d| d.id == id)
    }
}
