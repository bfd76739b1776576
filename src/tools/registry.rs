use std::fmt;

/// A type in a function signature. `Wildcard` only takes part in partial lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeToken {
    Named(String),
    Wildcard,
}

impl TypeToken {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Wildcard => None,
        }
    }

    fn matches(&self, other: &TypeToken, allow_wildcard: bool) -> bool {
        if allow_wildcard && (*self == Self::Wildcard || *other == Self::Wildcard) {
            return true;
        }
        self == other
    }
}

impl From<&str> for TypeToken {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for TypeToken {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => name.fmt(f),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub id: String,
    pub input_param_types: Vec<TypeToken>,
    pub output_param_type: TypeToken,
}

impl RegistryEntry {
    fn matches(&self, input_types: &[TypeToken], output_type: &TypeToken, allow_wildcard: bool) -> bool {
        self.input_param_types.len() == input_types.len()
            && self.output_param_type.matches(output_type, allow_wildcard)
            && self
                .input_param_types
                .iter()
                .zip(input_types)
                .all(|(candidate, query)| candidate.matches(query, allow_wildcard))
    }
}

/// Type-signature index over the functions of one tool session. Lookups walk
/// entries in registration order and duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    entries: Vec<RegistryEntry>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<I, T>(&mut self, input_types: I, output_type: impl Into<TypeToken>, id: &str)
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeToken>,
    {
        self.entries.push(RegistryEntry {
            id: id.to_string(),
            input_param_types: input_types.into_iter().map(Into::into).collect(),
            output_param_type: output_type.into(),
        });
    }

    /// First entry whose input types and output type are all equal to the query.
    pub fn find(&self, input_types: &[TypeToken], output_type: &TypeToken) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.matches(input_types, output_type, false))
            .map(|entry| entry.id.as_str())
    }

    /// Every matching entry, in registration order. With `allow_wildcard` a
    /// wildcard on either side matches any type at that position.
    pub fn find_partial(
        &self,
        input_types: &[TypeToken],
        output_type: &TypeToken,
        allow_wildcard: bool,
    ) -> Vec<&str> {
        self.matching_entries(input_types, output_type, allow_wildcard)
            .into_iter()
            .map(|entry| entry.id.as_str())
            .collect()
    }

    /// Same as `find_partial`, returning the full entries so callers can read
    /// the registered parameter types of each candidate.
    pub fn matching_entries(
        &self,
        input_types: &[TypeToken],
        output_type: &TypeToken,
        allow_wildcard: bool,
    ) -> Vec<&RegistryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.matches(input_types, output_type, allow_wildcard))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
