//! Collision-free callback names.

use std::{cell::Cell, fmt, rc::Rc};

use serde::{Deserialize, Serialize};

/// Opaque callback identifier exchanged with the host as data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryId(String);

impl RegistryId {
    /// Wraps an identifier received from outside the registry (for example, from the host).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegistryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for RegistryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Page-lifetime name generator.
///
/// Clones share one counter. The counter value is always the final `_`-separated segment of an
/// issued name, so two names can only collide if they carry the same counter value.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    counter: Rc<Cell<u64>>,
}

impl NameGenerator {
    /// Creates a generator starting from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next name derived from `base`.
    pub fn next_name(&self, base: &str) -> RegistryId {
        let next = self.counter.get().wrapping_add(1);
        self.counter.set(next);
        if base.is_empty() || base.ends_with('_') {
            RegistryId(format!("{base}{next}"))
        } else {
            RegistryId(format!("{base}_{next}"))
        }
    }

    /// Returns how many names have been issued.
    pub fn issued(&self) -> u64 {
        self.counter.get()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_embed_base_for_debugging() {
        let names = NameGenerator::new();
        assert_eq!(names.next_name("_median_temp_").as_str(), "_median_temp_1");
        assert_eq!(
            names.next_name("_median_device_shake").as_str(),
            "_median_device_shake_2"
        );
        assert_eq!(names.issued(), 2);
    }

    #[test]
    fn back_to_back_names_are_pairwise_distinct() {
        let names = NameGenerator::new();
        let clone = names.clone();
        let bases = ["a", "a_", "a_1", "", "_median_temp_", "a_1_"];
        let mut seen = HashSet::new();
        for round in 0..200 {
            let base = bases[round % bases.len()];
            let generator = if round % 2 == 0 { &names } else { &clone };
            assert!(seen.insert(generator.next_name(base)), "duplicate at round {round}");
        }
        assert_eq!(names.issued(), 200);
    }
}
