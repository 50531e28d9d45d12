//! Named entities collected while resolving: circuit nodes, parameters and 2D sweeps.

use std::collections::HashMap;

use serde::Serialize;

/// An entity with a unique name inside its collection.
pub trait Named {
    fn name(&self) -> &str;
}

/// A circuit node whose envelope is traced.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub units: String,
    pub dt: f64,
    pub dx: f64,
}

impl Named for Node {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A tunable circuit parameter.
///
/// Included parameters end resolution with exactly one of `sigma` (relative)
/// or `sigabs` (absolute) non-zero. Parameters with `include == false` are
/// fixed constants and carry no such obligation.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub nominal: f64,
    pub sigma: f64,
    pub sigabs: f64,
    pub min: f64,
    pub max: f64,
    /// `min` was given explicitly.
    pub top_min: bool,
    /// `max` was given explicitly.
    pub top_max: bool,
    pub nom_min: f64,
    pub nom_max: f64,
    pub is_nom_min: bool,
    pub is_nom_max: bool,
    pub staticc: bool,
    pub include: bool,
    pub logs: bool,
    pub corners: bool,
}

impl Param {
    /// A parameter with every field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nominal: 1.0,
            sigma: 0.0,
            sigabs: 0.0,
            min: 0.5,
            max: 2.0,
            top_min: false,
            top_max: false,
            nom_min: 0.0,
            nom_max: 0.0,
            is_nom_min: false,
            is_nom_max: false,
            staticc: false,
            include: true,
            logs: true,
            corners: false,
        }
    }

    /// Turns this parameter into a nominal-only constant.
    pub fn make_constant(&mut self, nominal: f64) {
        self.nominal = nominal;
        self.include = false;
        self.logs = false;
        self.sigabs = 1.0;
        self.sigma = 0.0;
    }

    /// True when nothing but `nominal` distinguishes this parameter from a
    /// bare-number declaration.
    pub fn is_constant(&self) -> bool {
        !self.include
            && !self.logs
            && !self.staticc
            && !self.corners
            && self.sigma == 0.0
            && self.sigabs == 1.0
            && !self.top_min
            && !self.top_max
            && !self.is_nom_min
            && !self.is_nom_max
    }

    /// Exactly one of the two spreads is non-zero.
    pub fn has_one_spread(&self) -> bool {
        (self.sigma != 0.0) != (self.sigabs != 0.0)
    }

    pub fn is_corner(&self) -> bool {
        self.include && self.corners
    }
}

impl Named for Param {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A pair of parameters swept against each other in 2D margins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sweep {
    pub x: String,
    pub y: String,
}

/// Insertion-ordered collection of uniquely named entities.
#[derive(Debug, Clone)]
pub struct EntitySet<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for EntitySet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Named> EntitySet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry called `name`, appending `make()` first if there is none.
    ///
    /// The flag is `true` when the entry was just created.
    pub fn find_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> T) -> (&mut T, bool) {
        match self.index.get(name).copied() {
            Some(i) => (&mut self.items[i], false),
            None => {
                let i = self.items.len();
                self.items.push(make());
                self.index.insert(name.to_owned(), i);
                (&mut self.items[i], true)
            }
        }
    }

    /// Inserts `item`, replacing any entry with the same name in place.
    ///
    /// Returns the replaced entry.
    pub fn upsert(&mut self, item: T) -> Option<T> {
        match self.index.get(item.name()).copied() {
            Some(i) => Some(std::mem::replace(&mut self.items[i], item)),
            None => {
                self.index.insert(item.name().to_owned(), self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.items[i])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<'a, T> IntoIterator for &'a EntitySet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
