use std::{collections::HashMap, sync::LazyLock};

use log::{debug, warn};

use super::{Unit, UnitParseError, parse::parse_unit, si};

static STANDARD: LazyLock<UnitCatalog> = LazyLock::new(UnitCatalog::with_standard_units);

/// A symbol table used to parse and label units.
///
/// Symbols keep their definition order, so the first symbol defined for a
/// unit is the one [`UnitCatalog::symbol_of`] reports.
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    definitions: Vec<(String, Unit)>,
    index: HashMap<String, usize>,
}

impl UnitCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding every predefined unit of [`si`].
    pub fn with_standard_units() -> Self {
        let mut catalog = Self::new();
        for (symbol, unit) in si::standard_units() {
            catalog.define(symbol, unit);
        }
        debug!("Loaded {} standard unit symbols", catalog.len());
        catalog
    }

    /// The shared catalog of predefined units.
    pub fn standard() -> &'static UnitCatalog {
        &STANDARD
    }

    /// Binds `symbol` to `unit`, returning the unit it was bound to before.
    pub fn define(&mut self, symbol: impl Into<String>, unit: Unit) -> Option<Unit> {
        let symbol = symbol.into();
        match self.index.get(&symbol) {
            Some(&i) => {
                warn!("Unit symbol '{}' redefined", symbol);
                Some(std::mem::replace(&mut self.definitions[i].1, unit))
            }
            None => {
                self.index.insert(symbol.clone(), self.definitions.len());
                self.definitions.push((symbol, unit));
                None
            }
        }
    }

    pub fn resolve(&self, symbol: &str) -> Option<&Unit> {
        self.index.get(symbol).map(|&i| &self.definitions[i].1)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// The first symbol defined for a unit equal to `unit`.
    pub fn symbol_of(&self, unit: &Unit) -> Option<&str> {
        self.definitions
            .iter()
            .find(|(_, u)| u == unit)
            .map(|(symbol, _)| symbol.as_str())
    }

    /// Parses a unit expression, resolving symbols in this catalog.
    pub fn parse(&self, text: &str) -> Result<Unit, UnitParseError> {
        parse_unit(text, self)
    }

    /// The catalog symbol of `unit`, or its structural text.
    pub fn format(&self, unit: &Unit) -> String {
        match self.symbol_of(unit) {
            Some(symbol) => symbol.to_string(),
            None => unit.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Symbols and units, in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Unit)> {
        self.definitions.iter().map(|(s, u)| (s.as_str(), u))
    }
}
