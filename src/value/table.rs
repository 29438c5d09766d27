//! The ordered key/value storage behind object values and instance
//! properties.

use std::rc::Rc;

use indexmap::IndexMap;

use super::Value;

type Inner = IndexMap<Rc<str>, Value>;

/// An ordered map from property name to value. Keys keep their insertion
/// position; inserting over an existing key replaces the value without
/// moving the key.
#[derive(Default)]
pub struct Table {
  inner: Inner,
}

impl Table {
  pub fn new() -> Self {
    Self {
      inner: Inner::new(),
    }
  }

  pub fn with_capacity(n: usize) -> Self {
    Self {
      inner: Inner::with_capacity(n),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.inner.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  pub fn get(&self, key: &str) -> Option<Value> {
    self.inner.get(key).cloned()
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.inner.contains_key(key)
  }

  pub fn insert(&mut self, key: Rc<str>, value: Value) {
    self.inner.insert(key, value);
  }

  pub fn keys(&self) -> impl Iterator<Item = &Rc<str>> {
    self.inner.keys()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
    self.inner.iter()
  }
}

impl FromIterator<(Rc<str>, Value)> for Table {
  fn from_iter<T: IntoIterator<Item = (Rc<str>, Value)>>(iter: T) -> Self {
    Self {
      inner: Inner::from_iter(iter),
    }
  }
}
