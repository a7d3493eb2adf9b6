//! Category registry: the direct/indirect vocabulary of task categories.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DIRECT_CATEGORIES: [&str; 4] = ["articulation", "fluency", "voice", "language"];

const INDIRECT_CATEGORIES: [&str; 13] = [
    "chart",
    "clerical",
    "collaboration",
    "documentation",
    "equipment",
    "education",
    "materials",
    "observation",
    "research",
    "scheduling",
    "staffing",
    "scores",
    "transcription",
];

/// Errors raised while building a registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A category name was empty or whitespace.
    #[error("category name cannot be empty")]
    EmptyName,

    /// A category name contained uppercase characters or whitespace.
    #[error("category name must be a single lowercase word: {name:?}")]
    InvalidName { name: String },

    /// The same name was listed as both direct and indirect.
    #[error("category {name:?} is listed as both direct and indirect")]
    Overlap { name: String },
}

/// The two service classes a category can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceClass {
    Direct,
    Indirect,
}

impl ServiceClass {
    /// Both classes, in report order.
    pub const ALL: [Self; 2] = [Self::Direct, Self::Indirect];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Indirect => "indirect",
        }
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServiceClass {
    type Err = UnknownServiceClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "indirect" => Ok(Self::Indirect),
            _ => Err(UnknownServiceClass(s.to_string())),
        }
    }
}

/// Error type for unknown service class strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownServiceClass(String);

impl fmt::Display for UnknownServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown service class: {}", self.0)
    }
}

impl std::error::Error for UnknownServiceClass {}

/// Result of looking a category name up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Direct,
    Indirect,
    Unknown,
}

impl Classification {
    /// The service class, or `None` for unknown categories.
    pub const fn class(self) -> Option<ServiceClass> {
        match self {
            Self::Direct => Some(ServiceClass::Direct),
            Self::Indirect => Some(ServiceClass::Indirect),
            Self::Unknown => None,
        }
    }
}

/// Raw category lists as they appear in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySets {
    #[serde(default)]
    pub direct: Vec<String>,
    #[serde(default)]
    pub indirect: Vec<String>,
}

/// Immutable partition of category names into direct and indirect sets.
///
/// The two sets are disjoint; [`CategoryRegistry::new`] is the only way to
/// build one from arbitrary input and it enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategorySets", into = "CategorySets")]
pub struct CategoryRegistry {
    direct: BTreeSet<String>,
    indirect: BTreeSet<String>,
}

impl CategoryRegistry {
    /// Builds a registry, rejecting empty, non-lowercase or overlapping names.
    pub fn new<D, I>(direct: D, indirect: I) -> Result<Self, RegistryError>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let direct = collect_names(direct)?;
        let indirect = collect_names(indirect)?;

        if let Some(name) = direct.intersection(&indirect).next() {
            return Err(RegistryError::Overlap { name: name.clone() });
        }

        Ok(Self { direct, indirect })
    }

    /// Looks up a category name. Matching is exact; callers lowercase first.
    pub fn classify(&self, task_type: &str) -> Classification {
        if self.direct.contains(task_type) {
            Classification::Direct
        } else if self.indirect.contains(task_type) {
            Classification::Indirect
        } else {
            Classification::Unknown
        }
    }

    pub fn is_direct(&self, task_type: &str) -> bool {
        self.direct.contains(task_type)
    }

    pub fn is_indirect(&self, task_type: &str) -> bool {
        self.indirect.contains(task_type)
    }

    /// Category names of one class, in sorted order.
    pub fn categories(&self, class: ServiceClass) -> impl Iterator<Item = &str> {
        let set = match class {
            ServiceClass::Direct => &self.direct,
            ServiceClass::Indirect => &self.indirect,
        };
        set.iter().map(String::as_str)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            direct: DIRECT_CATEGORIES.iter().map(ToString::to_string).collect(),
            indirect: INDIRECT_CATEGORIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl TryFrom<CategorySets> for CategoryRegistry {
    type Error = RegistryError;

    fn try_from(sets: CategorySets) -> Result<Self, Self::Error> {
        Self::new(sets.direct, sets.indirect)
    }
}

impl From<CategoryRegistry> for CategorySets {
    fn from(registry: CategoryRegistry) -> Self {
        Self {
            direct: registry.direct.into_iter().collect(),
            indirect: registry.indirect.into_iter().collect(),
        }
    }
}

fn collect_names<T>(names: T) -> Result<BTreeSet<String>, RegistryError>
where
    T: IntoIterator,
    T::Item: Into<String>,
{
    names
        .into_iter()
        .map(|name| {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            let valid = name
                .chars()
                .all(|c| !c.is_whitespace() && !c.is_uppercase());
            if valid {
                Ok(name)
            } else {
                Err(RegistryError::InvalidName { name })
            }
        })
        .collect()
}
