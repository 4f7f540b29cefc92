// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Two-level scope table for variable resolution during compilation.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::compiler::bytecode::Segment;

/// Storage class of a declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Class-level, shared by all instances
    Static,
    /// Class-level, one per instance
    Field,
    /// Subroutine parameter
    Arg,
    /// Subroutine local
    Var,
}

impl SymbolKind {
    /// The VM segment holding variables of this kind.
    pub fn segment(&self) -> Segment {
        match self {
            SymbolKind::Static => Segment::Static,
            SymbolKind::Field => Segment::This,
            SymbolKind::Arg => Segment::Argument,
            SymbolKind::Var => Segment::Local,
        }
    }

    /// Static and field names live in the class scope.
    pub fn is_class_level(&self) -> bool {
        matches!(self, SymbolKind::Static | SymbolKind::Field)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Static => "static",
            SymbolKind::Field => "field",
            SymbolKind::Arg => "arg",
            SymbolKind::Var => "var",
        })
    }
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The variable name
    pub name: String,
    /// Declared type: `int`, `char`, `boolean` or a class name
    pub ty: String,
    /// Storage class
    pub kind: SymbolKind,
    /// Zero-based slot within (scope, kind)
    pub index: u16,
}

impl Symbol {
    /// The segment this symbol is pushed from and popped to.
    pub fn segment(&self) -> Segment {
        self.kind.segment()
    }
}

/// One level of the table. Entries are never removed; a repeated name
/// gets a fresh slot and hides the older entry.
#[derive(Debug, Default)]
struct Scope {
    symbols: Vec<Symbol>,
    by_name: FxHashMap<String, usize>,
    counts: FxHashMap<SymbolKind, u16>,
}

impl Scope {
    fn define(&mut self, name: &str, ty: &str, kind: SymbolKind) -> Option<u16> {
        let counter = self.counts.entry(kind).or_insert(0);
        let index = *counter;
        *counter = index.checked_add(1)?;

        self.by_name.insert(name.to_string(), self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_string(),
            ty: ty.to_string(),
            kind,
            index,
        });
        Some(index)
    }

    fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.by_name.get(name).map(|&i| &self.symbols[i])
    }

    fn count(&self, kind: SymbolKind) -> u16 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    fn clear(&mut self) {
        self.symbols.clear();
        self.by_name.clear();
        self.counts.clear();
    }
}

/// Class scope plus current-subroutine scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class: Scope,
    subroutine: Scope,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears both scopes before compiling a new class.
    pub fn start_class(&mut self) {
        self.class.clear();
        self.subroutine.clear();
    }

    /// Clears the subroutine scope only.
    pub fn start_subroutine(&mut self) {
        self.subroutine.clear();
    }

    /// Declares `name`, returning the slot it was assigned, or `None` once
    /// every 16-bit slot of `kind` is taken.
    ///
    /// Statics and fields go to the class scope, args and vars to the
    /// subroutine scope.
    pub fn define(&mut self, name: &str, ty: &str, kind: SymbolKind) -> Option<u16> {
        if kind.is_class_level() {
            self.class.define(name, ty, kind)
        } else {
            self.subroutine.define(name, ty, kind)
        }
    }

    /// Looks `name` up in the subroutine scope, then the class scope.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.subroutine
            .resolve(name)
            .or_else(|| self.class.resolve(name))
    }

    /// Number of slots handed out for `kind` in its scope.
    pub fn var_count(&self, kind: SymbolKind) -> u16 {
        if kind.is_class_level() {
            self.class.count(kind)
        } else {
            self.subroutine.count(kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_numbered_per_kind() {
        let mut table = SymbolTable::new();
        assert_eq!(table.define("x", "int", SymbolKind::Field), Some(0));
        assert_eq!(table.define("y", "int", SymbolKind::Field), Some(1));
        assert_eq!(table.define("count", "int", SymbolKind::Static), Some(0));

        let x = table.resolve("x").unwrap();
        assert_eq!((x.kind, x.index, x.segment()), (SymbolKind::Field, 0, Segment::This));
        let y = table.resolve("y").unwrap();
        assert_eq!((y.kind, y.index), (SymbolKind::Field, 1));
        let count = table.resolve("count").unwrap();
        assert_eq!(
            (count.kind, count.index, count.segment()),
            (SymbolKind::Static, 0, Segment::Static)
        );
        assert_eq!(table.var_count(SymbolKind::Field), 2);
        assert_eq!(table.var_count(SymbolKind::Static), 1);
    }

    #[test]
    fn test_start_subroutine_clears_only_subroutine_scope() {
        let mut table = SymbolTable::new();
        table.define("size", "int", SymbolKind::Field);
        table.define("a", "int", SymbolKind::Arg);
        table.define("i", "int", SymbolKind::Var);

        table.start_subroutine();
        assert!(table.resolve("a").is_none());
        assert!(table.resolve("i").is_none());
        assert_eq!(table.var_count(SymbolKind::Arg), 0);
        assert_eq!(table.var_count(SymbolKind::Var), 0);
        assert!(table.resolve("size").is_some());

        // Same names in the next subroutine start again from slot 0.
        assert_eq!(table.define("i", "char", SymbolKind::Var), Some(0));
        assert_eq!(table.resolve("i").unwrap().ty, "char");
    }

    #[test]
    fn test_subroutine_scope_shadows_class_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", SymbolKind::Field);
        table.define("x", "boolean", SymbolKind::Arg);
        let x = table.resolve("x").unwrap();
        assert_eq!(
            (x.kind, x.segment(), x.ty.as_str()),
            (SymbolKind::Arg, Segment::Argument, "boolean")
        );
    }

    #[test]
    fn test_redeclaration_last_definition_wins() {
        let mut table = SymbolTable::new();
        assert_eq!(table.define("t", "int", SymbolKind::Var), Some(0));
        assert_eq!(table.define("t", "Array", SymbolKind::Var), Some(1));

        let t = table.resolve("t").unwrap();
        assert_eq!((t.index, t.ty.as_str()), (1, "Array"));
        // The hidden slot is not reused.
        assert_eq!(table.var_count(SymbolKind::Var), 2);
    }

    #[test]
    fn test_start_class_clears_everything() {
        let mut table = SymbolTable::new();
        table.define("x", "int", SymbolKind::Field);
        table.define("a", "int", SymbolKind::Arg);
        table.start_class();
        assert!(table.resolve("x").is_none());
        assert!(table.resolve("a").is_none());
        assert_eq!(table.var_count(SymbolKind::Field), 0);
    }

    #[test]
    fn test_unresolved_name() {
        let table = SymbolTable::new();
        assert!(table.resolve("Output").is_none());
    }

    #[test]
    fn test_slot_count_never_exceeds_u16() {
        let mut table = SymbolTable::new();
        for i in 0..u16::MAX {
            assert_eq!(table.define(&format!("v{i}"), "int", SymbolKind::Var), Some(i));
        }
        assert_eq!(table.define("overflow", "int", SymbolKind::Var), None);
        assert!(table.resolve("overflow").is_none());
        assert_eq!(table.var_count(SymbolKind::Var), u16::MAX);

        // Other kinds keep their own counters.
        assert_eq!(table.define("a", "int", SymbolKind::Arg), Some(0));
    }
}
