//! Address-to-label lookup parsed from a linker map file.
//!
//! Only lines starting with `Symbol:` are used. Their whitespace-separated
//! fields are `Symbol: <label> <file> <kind> <hex address> ...`; compiler
//! storage prefixes are stripped from the label.

use std::collections::HashMap;
use std::path::Path;

const SYMBOL_PREFIX: &str = "Symbol:";
const LABEL_PREFIXES: [&str; 3] = [
    ".static.function.",
    ".local.static.",
    ".global.static.variable.",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub label: String,
    pub file: String,
    pub address: u16,
}

impl Symbol {
    fn parse(line: &str) -> Option<Symbol> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 || tokens[0] != SYMBOL_PREFIX {
            return None;
        }
        let mut label = tokens[1];
        for prefix in LABEL_PREFIXES {
            if let Some(stripped) = label.strip_prefix(prefix) {
                label = stripped;
            }
        }
        let address = u16::from_str_radix(tokens[4], 16).ok()?;
        Some(Symbol {
            label: label.to_string(),
            file: tokens[2].to_string(),
            address,
        })
    }
}

/// Ordered symbol list with an address index. Read-only after construction.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_address: HashMap<u16, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        for (number, line) in text.lines().enumerate() {
            if !line.starts_with(SYMBOL_PREFIX) {
                continue;
            }
            match Symbol::parse(line) {
                Some(symbol) => table.push(symbol),
                None => log::warn!("skipping malformed symbol on line {}: {line}", number + 1),
            }
        }
        table
    }

    /// Load a map file. A missing or unreadable file yields an empty table.
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let table = Self::parse(&text);
                log::debug!("loaded {} symbols from {}", table.len(), path.display());
                table
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no symbol file at {}", path.display());
                Self::new()
            }
            Err(err) => {
                log::warn!("could not read symbol file {}: {err}", path.display());
                Self::new()
            }
        }
    }

    fn push(&mut self, symbol: Symbol) {
        // First definition of an address wins.
        self.by_address
            .entry(symbol.address)
            .or_insert(self.symbols.len());
        self.symbols.push(symbol);
    }

    pub fn lookup(&self, address: u16) -> Option<&str> {
        self.by_address
            .get(&address)
            .map(|&index| self.symbols[index].label.as_str())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
Section: code (main.o) at FF00
Symbol: .static.function.main main.c static FF00
Symbol: _putc io.c global FF10 size 12
Symbol: .local.static.counter main.c local 0040
Symbol: .global.static.variable.ticks timer.c global 0042
Symbol: duplicate other.c global FF00
Symbol: broken
";

    #[test]
    fn parses_symbols_and_strips_prefixes() {
        let table = SymbolTable::parse(MAP);
        assert_eq!(table.len(), 5);
        assert_eq!(table.lookup(0xFF00), Some("main"));
        assert_eq!(table.lookup(0xFF10), Some("_putc"));
        assert_eq!(table.lookup(0x0040), Some("counter"));
        assert_eq!(table.lookup(0x0042), Some("ticks"));
        assert_eq!(table.symbols()[1].file, "io.c");
    }

    #[test]
    fn unknown_address_has_no_label() {
        let table = SymbolTable::parse(MAP);
        assert_eq!(table.lookup(0x1234), None);
    }

    #[test]
    fn missing_file_is_empty() {
        let table = SymbolTable::from_file(Path::new("/nonexistent/hyper9/program.map"));
        assert!(table.is_empty());
    }
}
