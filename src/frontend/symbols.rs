use std::collections::HashMap;
use std::io;

use super::ast::Ty;

#[derive(Clone, Debug)]
pub struct SymbolEntry {
    pub name: String,
    /// `None` until a declaration (or the analyser) resolves the type.
    pub ty: Option<Ty>,
    /// every textual appearance, in scan order
    pub occurrences: Vec<(u32, u32)>,
}

/// A stack of scope frames. Frame 0 is the global frame and is never popped;
/// lookup walks from the innermost frame outward.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, SymbolEntry>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Appends an occurrence to the innermost entry for `name`, creating the
    /// entry in the top frame with an empty type if no frame has one.
    pub fn add_occurrence(&mut self, name: &str, line: u32, column: u32) {
        if let Some(ix) = self.scopes.iter().rposition(|s| s.contains_key(name)) {
            if let Some(entry) = self.scopes[ix].get_mut(name) {
                entry.occurrences.push((line, column));
            }
            return;
        }

        if let Some(top) = self.scopes.last_mut() {
            top.entry(name.to_owned())
                .or_insert_with(|| SymbolEntry {
                    name: name.to_owned(),
                    ty: None,
                    occurrences: Vec::new(),
                })
                .occurrences
                .push((line, column));
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut SymbolEntry> {
        self.scopes.iter_mut().rev().find_map(|s| s.get_mut(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn defined_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|s| s.contains_key(name))
    }

    /// Writes the live frames as `Scope k:` sections, entries sorted by name.
    pub fn write<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        for (k, scope) in self.scopes.iter().enumerate() {
            writeln!(w, "Scope {k}:")?;
            let mut names: Vec<_> = scope.keys().collect();
            names.sort();
            for name in names {
                let entry = &scope[name];
                let ty = match entry.ty {
                    Some(ty) => ty.to_string(),
                    None => "-".to_string(),
                };
                write!(w, "  {} : {}  occurs at:", entry.name, ty)?;
                for (line, column) in &entry.occurrences {
                    write!(w, " ({line},{column})")?;
                }
                writeln!(w)?;
            }
        }
        Ok(())
    }
}
