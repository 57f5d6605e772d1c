//! Requirement catalogue access

use super::errors::CatalogueError;
use super::model::{BaseRequirement, DerivedRequirement};
use crate::logging::codes;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Supplies the base/derived requirement catalogue at build time
pub trait RequirementsManager: Send + Sync {
    fn base_requirements(&self) -> &[BaseRequirement];

    fn base_requirement(&self, id: &str) -> Option<&BaseRequirement> {
        self.base_requirements().iter().find(|b| b.id == id)
    }

    /// Derived requirement with the base requirement that owns it
    fn derived_requirement(&self, id: &str) -> Option<(&BaseRequirement, &DerivedRequirement)> {
        self.base_requirements().iter().find_map(|base| {
            base.derived_requirement(id).map(|derived| (base, derived))
        })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogueFile {
    #[serde(rename = "requirement", alias = "requirements", default)]
    requirements: Vec<BaseRequirement>,
}

/// Validated, in-memory requirement catalogue
#[derive(Debug, Clone, Default)]
pub struct InMemoryRequirementsManager {
    base_requirements: Vec<BaseRequirement>,
    derived_index: HashMap<String, (usize, usize)>,
}

impl InMemoryRequirementsManager {
    /// Build from requirements, rejecting empty and duplicate ids
    pub fn new(base_requirements: Vec<BaseRequirement>) -> Result<Self, CatalogueError> {
        let mut base_ids: HashSet<&str> = HashSet::new();
        let mut derived_index: HashMap<String, (usize, usize)> = HashMap::new();

        for (base_idx, base) in base_requirements.iter().enumerate() {
            if base.id.trim().is_empty() {
                return Err(CatalogueError::EmptyId { parent: None });
            }
            if !base_ids.insert(base.id.as_str()) {
                return Err(CatalogueError::DuplicateBaseRequirement {
                    id: base.id.clone(),
                });
            }

            for (derived_idx, derived) in base.derived_requirements.iter().enumerate() {
                if derived.id.trim().is_empty() {
                    return Err(CatalogueError::EmptyId {
                        parent: Some(base.id.clone()),
                    });
                }
                if let Some((first_base, _)) = derived_index.get(&derived.id) {
                    return Err(CatalogueError::DuplicateDerivedRequirement {
                        id: derived.id.clone(),
                        first: base_requirements[*first_base].id.clone(),
                        second: base.id.clone(),
                    });
                }
                derived_index.insert(derived.id.clone(), (base_idx, derived_idx));
            }
        }

        Ok(Self {
            base_requirements,
            derived_index,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogueError> {
        let file: CatalogueFile = toml::from_str(content)?;
        Self::new(file.requirements)
    }

    /// Accepts either `{"requirement": [...]}` or a bare array
    pub fn from_json_str(content: &str) -> Result<Self, CatalogueError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let requirements: Vec<BaseRequirement> = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            serde_json::from_value::<CatalogueFile>(value)?.requirements
        };
        Self::new(requirements)
    }

    /// Load by extension (`.toml` or `.json`)
    pub fn from_path(path: &Path) -> Result<Self, CatalogueError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            log_error!(codes::requirements::CATALOGUE_IO, "Cannot read requirement catalogue",
                "path" => path.display()
            );
            CatalogueError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let manager = match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => Err(CatalogueError::UnsupportedFormat {
                extension: extension.clone(),
            }),
        };

        match &manager {
            Ok(loaded) => log_success!(
                codes::success::CATALOGUE_LOADED,
                "Requirement catalogue loaded",
                "path" => path.display(),
                "base_requirements" => loaded.base_requirements.len(),
                "derived_requirements" => loaded.derived_count()
            ),
            Err(e) => log_error!(codes::requirements::CATALOGUE_INVALID, "Invalid requirement catalogue",
                "path" => path.display(),
                "error" => e
            ),
        }

        manager
    }

    pub fn derived_count(&self) -> usize {
        self.derived_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_requirements.is_empty()
    }
}

impl RequirementsManager for InMemoryRequirementsManager {
    fn base_requirements(&self) -> &[BaseRequirement] {
        &self.base_requirements
    }

    fn derived_requirement(&self, id: &str) -> Option<(&BaseRequirement, &DerivedRequirement)> {
        let (base_idx, derived_idx) = *self.derived_index.get(id)?;
        let base = &self.base_requirements[base_idx];
        Some((base, &base.derived_requirements[derived_idx]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::RequirementType;
    use assert_matches::assert_matches;

    const CATALOGUE: &str = r#"
[[requirement]]
id = "BR-1"
statement = "Documents identify their issuer"

[[requirement.derived]]
id = "DR-1.1"
statement = "Issuer name present"

[[requirement.derived]]
id = "DR-1.2"
type = "informational"
conditional = true

[[requirement]]
id = "BR-2"
"#;

    #[test]
    fn test_load_toml_catalogue() {
        let manager = InMemoryRequirementsManager::from_toml_str(CATALOGUE).unwrap();

        assert_eq!(manager.base_requirements().len(), 2);
        assert_eq!(manager.derived_count(), 2);

        let (base, derived) = manager.derived_requirement("DR-1.2").unwrap();
        assert_eq!(base.id, "BR-1");
        assert_eq!(derived.requirement_type, RequirementType::Informational);
        assert!(derived.conditional);

        let (_, first) = manager.derived_requirement("DR-1.1").unwrap();
        assert_eq!(first.requirement_type, RequirementType::Must);
        assert!(manager.base_requirement("BR-2").unwrap().derived_requirements.is_empty());
    }

    #[test]
    fn test_load_json_catalogue_forms() {
        let wrapped = r#"{"requirement": [{"id": "BR-1", "derived": [{"id": "DR-1", "type": "should"}]}]}"#;
        let bare = r#"[{"id": "BR-1", "derived": [{"id": "DR-1"}]}]"#;

        let wrapped = InMemoryRequirementsManager::from_json_str(wrapped).unwrap();
        let bare = InMemoryRequirementsManager::from_json_str(bare).unwrap();

        assert_eq!(
            wrapped.derived_requirement("DR-1").unwrap().1.requirement_type,
            RequirementType::Should
        );
        assert_eq!(bare.derived_count(), 1);
    }

    #[test]
    fn test_rejects_duplicates_and_empty_ids() {
        let duplicate_base = vec![BaseRequirement::new("A"), BaseRequirement::new("A")];
        assert_matches!(
            InMemoryRequirementsManager::new(duplicate_base),
            Err(CatalogueError::DuplicateBaseRequirement { .. })
        );

        let duplicate_derived = vec![
            BaseRequirement::new("A").with_derived(DerivedRequirement::new("D", RequirementType::Must)),
            BaseRequirement::new("B").with_derived(DerivedRequirement::new("D", RequirementType::May)),
        ];
        assert_matches!(
            InMemoryRequirementsManager::new(duplicate_derived),
            Err(CatalogueError::DuplicateDerivedRequirement { ref first, ref second, .. })
                if first == "A" && second == "B"
        );

        let empty = vec![BaseRequirement::new("A").with_derived(DerivedRequirement::new(" ", RequirementType::Must))];
        assert_matches!(
            InMemoryRequirementsManager::new(empty),
            Err(CatalogueError::EmptyId { parent: Some(_) })
        );
    }

    #[test]
    fn test_from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("catalogue.toml");
        std::fs::write(&toml_path, CATALOGUE).unwrap();
        let yaml_path = dir.path().join("catalogue.yaml");
        std::fs::write(&yaml_path, "requirement: []").unwrap();

        assert!(InMemoryRequirementsManager::from_path(&toml_path).is_ok());
        assert_matches!(
            InMemoryRequirementsManager::from_path(&yaml_path),
            Err(CatalogueError::UnsupportedFormat { .. })
        );
        assert_matches!(
            InMemoryRequirementsManager::from_path(&dir.path().join("missing.toml")),
            Err(CatalogueError::Io { .. })
        );
    }
}
