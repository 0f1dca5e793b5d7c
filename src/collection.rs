// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! A minimal identified-collection type, in the shape of this crate's
//! earlier `Collection`/`CollectionWithId`/`Idx` trio: objects carry their
//! own id (via [`Id`]), a [`CollectionWithId`] indexes them by id on
//! insertion and keeps that index in sync. The repositories in
//! [`crate::netex`] and [`crate::gtfs_model`] build their primary maps and
//! derived lookup indexes on top of this.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::slice;

/// An object that knows its own identifier.
pub trait Id {
    /// The object's identifier.
    fn id(&self) -> &str;
}

/// An ordered, id-indexed collection. Insertion order is preserved (`iter`
/// walks objects in the order they were added); lookup by id is O(1).
#[derive(Debug, Clone, Default)]
pub struct CollectionWithId<T> {
    objects: Vec<T>,
    id_to_index: HashMap<String, usize>,
}

impl<T: Id> CollectionWithId<T> {
    /// Builds an empty collection.
    pub fn new() -> Self {
        CollectionWithId {
            objects: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }

    /// Builds a collection from a vector, failing if two objects share an id.
    pub fn from_vec(objects: Vec<T>) -> Result<Self> {
        let mut collection = CollectionWithId::new();
        for object in objects {
            collection.push(object)?;
        }
        Ok(collection)
    }

    /// Inserts an object, failing if its id collides with one already
    /// present.
    pub fn push(&mut self, object: T) -> Result<()> {
        let id = object.id().to_string();
        if self.id_to_index.contains_key(&id) {
            return Err(anyhow!("duplicate id '{}'", id));
        }
        self.id_to_index.insert(id, self.objects.len());
        self.objects.push(object);
        Ok(())
    }

    /// Inserts an object, silently overwriting any existing object with the
    /// same id. Used where a later frame is allowed to replace an earlier
    /// stub (spec §4.D's "later write wins" rule for repeated saves).
    pub fn replace(&mut self, object: T) {
        let id = object.id().to_string();
        if let Some(&index) = self.id_to_index.get(&id) {
            self.objects[index] = object;
        } else {
            self.id_to_index.insert(id, self.objects.len());
            self.objects.push(object);
        }
    }

    /// Looks up an object by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.id_to_index.get(id).map(|&index| &self.objects[index])
    }

    /// Looks up an object by id, mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let index = *self.id_to_index.get(id)?;
        Some(&mut self.objects[index])
    }

    /// Whether an object with this id is present.
    pub fn contains_id(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Number of objects held.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the collection holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over the objects, in insertion order.
    pub fn values(&self) -> slice::Iter<'_, T> {
        self.objects.iter()
    }
}

impl<T: Id> IntoIterator for CollectionWithId<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

impl<'a, T: Id> IntoIterator for &'a CollectionWithId<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

/// A derived, many-valued index from a foreign key to the ids of the
/// objects that reference it (e.g. `routesByLineId`, spec §4.D). Maintained
/// incrementally by callers on every save, rather than recomputed.
#[derive(Debug, Clone, Default)]
pub struct Index {
    by_key: HashMap<String, Vec<String>>,
}

impl Index {
    /// Builds an empty index.
    pub fn new() -> Self {
        Index::default()
    }

    /// Records that `id` is associated with `key`. Idempotent: inserting the
    /// same `(key, id)` pair twice does not duplicate the entry.
    pub fn insert(&mut self, key: &str, id: impl Into<String>) {
        let id = id.into();
        let entries = self.by_key.entry(key.to_string()).or_default();
        if !entries.contains(&id) {
            entries.push(id);
        }
    }

    /// Looks up all ids associated with `key`.
    pub fn get(&self, key: &str) -> &[String] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}
