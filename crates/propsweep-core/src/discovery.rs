//! Discovery and validation.
//!
//! Walks every configured source, collects the bindings whose names match
//! the pattern and checks that each has exactly one generator per
//! parameter. A single mismatch anywhere rejects the whole pass: partial
//! results are never returned.

use tracing::{debug, error, info};

use crate::error::ConfigError;
use crate::pattern::NamePattern;
use crate::source::{PropertyBinding, PropertySource, SourceKind};

/// Bindings discovered in one source.
#[derive(Debug)]
pub struct Group {
    pub name: String,
    pub kind: SourceKind,
    pub bindings: Vec<PropertyBinding>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Discover and validate bindings across `sources`, one group per source.
///
/// No sources yields an empty list, not an error.
pub fn discover<'a, I>(sources: I, pattern: &NamePattern) -> Result<Vec<Group>, ConfigError>
where
    I: IntoIterator<Item = &'a dyn PropertySource>,
{
    let mut groups = Vec::new();
    for source in sources {
        let bindings = source.list_bindings(pattern);
        validate(source.name(), &bindings)?;
        debug!(
            group = source.name(),
            kind = %source.kind(),
            bindings = bindings.len(),
            "Discovered group"
        );
        groups.push(Group {
            name: source.name().to_string(),
            kind: source.kind(),
            bindings,
        });
    }

    info!(
        pattern = %pattern,
        groups = groups.len(),
        bindings = groups.iter().map(Group::len).sum::<usize>(),
        "Discovery complete"
    );
    Ok(groups)
}

fn validate(group: &str, bindings: &[PropertyBinding]) -> Result<(), ConfigError> {
    if let Some(bad) = bindings.iter().find(|b| !b.is_well_formed()) {
        error!(
            group,
            property = %bad.name,
            generators = bad.generators.len(),
            arity = bad.arity(),
            "Generator count does not match property arity"
        );
        return Err(ConfigError::GeneratorCountMismatch {
            group: group.to_string(),
            property: bad.name.clone(),
            generators: bad.generators.len(),
            arity: bad.arity(),
        });
    }
    Ok(())
}
