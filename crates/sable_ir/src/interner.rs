//! String interner for identifier and literal storage.
//!
//! Provides O(1) interning and lookup behind a single read/write lock.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Interner internals: map from content to index plus index-ordered storage.
#[derive(Default)]
struct InternTable {
    map: FxHashMap<String, u32>,
    strings: Vec<String>,
}

/// String interner.
///
/// One compilation unit holds one interner; tokens and AST nodes store
/// [`Name`] handles into it. Interning the same text twice yields the
/// same handle.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut table = InternTable::default();
        table.map.insert(String::new(), 0);
        table.strings.push(String::new());
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern a string, returning its stable handle.
    pub fn intern(&self, s: &str) -> Name {
        {
            let table = self.table.read();
            if let Some(&idx) = table.map.get(s) {
                return Name(idx);
            }
        }
        let mut table = self.table.write();
        // Re-check: another caller may have interned between the locks.
        if let Some(&idx) = table.map.get(s) {
            return Name(idx);
        }
        let idx = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("interner capacity exceeded"));
        table.strings.push(s.to_owned());
        table.map.insert(s.to_owned(), idx);
        Name(idx)
    }

    /// Resolve a handle back to its text.
    ///
    /// Returns an owned copy; handles only ever come from `intern`, so the
    /// index is always valid.
    pub fn resolve(&self, name: Name) -> String {
        self.table.read().strings[name.0 as usize].clone()
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if only the pre-interned empty string is present.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedup() {
        let interner = StringInterner::new();
        let a = interner.intern("color");
        let b = interner.intern("color");
        let c = interner.intern("background");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn resolve_round_trip() {
        let interner = StringInterner::new();
        let name = interner.intern("border-width");
        assert_eq!(interner.resolve(name), "border-width");
    }

    #[test]
    fn empty_string_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert!(interner.is_empty());
    }
}
