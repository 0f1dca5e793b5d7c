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

//! Small `minidom::Element` helper traits, in the shape of this crate's
//! earlier `minidom_utils` module, ported to `anyhow` instead of `failure`.

use anyhow::{anyhow, Result};
use minidom::Element;
use std::str::FromStr;

/// Reads a typed attribute off an element.
pub trait TryAttribute {
    /// Parses the attribute `attr_name` as `F`, failing if absent or
    /// unparsable.
    fn try_attribute<F>(&self, attr_name: &str) -> Result<F>
    where
        F: FromStr;

    /// Parses the attribute `attr_name` as `F`, returning `None` if absent
    /// or unparsable rather than failing.
    fn attribute<F>(&self, attr_name: &str) -> Option<F>
    where
        F: FromStr,
    {
        self.try_attribute(attr_name).ok()
    }
}

impl TryAttribute for Element {
    fn try_attribute<F>(&self, attr_name: &str) -> Result<F>
    where
        F: FromStr,
    {
        self.attr(attr_name)
            .ok_or_else(|| anyhow!("attribute '{}' not found on <{}>", attr_name, self.name()))?
            .parse()
            .map_err(|_| anyhow!("failed to parse attribute '{}' on <{}>", attr_name, self.name()))
    }
}

/// Navigates to exactly one matching child element.
pub trait TryOnlyChild {
    /// Returns the unique child named `child_name` satisfying `filter`,
    /// failing if there are zero or more than one.
    fn try_only_child_with_filter<'a, P>(&'a self, child_name: &str, filter: P) -> Result<&'a Element>
    where
        P: Fn(&&Element) -> bool;

    /// Returns the unique child named `child_name`, failing if there are
    /// zero or more than one.
    fn try_only_child<'a>(&'a self, child_name: &str) -> Result<&'a Element> {
        self.try_only_child_with_filter(child_name, |_| true)
    }
}

impl TryOnlyChild for Element {
    fn try_only_child_with_filter<'a, P>(&'a self, child_name: &str, filter: P) -> Result<&'a Element>
    where
        P: Fn(&&Element) -> bool,
    {
        let mut matches = self
            .children()
            .filter(|c| c.name() == child_name)
            .filter(filter);
        let first = matches
            .next()
            .ok_or_else(|| anyhow!("no <{}> child found on <{}>", child_name, self.name()))?;
        if matches.next().is_some() {
            return Err(anyhow!(
                "more than one <{}> child found on <{}>",
                child_name,
                self.name()
            ));
        }
        Ok(first)
    }
}

/// Reads an element's own text content, trimmed. Returns an empty string
/// (rather than erroring) when absent, since most NeTEx text fields are
/// optional and a blank default is handled by the recovery layer.
pub fn text_of(element: &Element) -> String {
    element.text().trim().to_string()
}

/// Reads the trimmed text of `child_name` under `element`, if present.
pub fn child_text(element: &Element, child_name: &str) -> Option<String> {
    element.get_child(child_name, element.ns()).map(text_of).filter(|s| !s.is_empty())
}

/// Reads the `ref` attribute of `child_name` under `element` (NeTEx's usual
/// `<SomethingRef ref="..."/>` shape), if present.
pub fn child_ref(element: &Element, child_name: &str) -> Option<String> {
    element
        .get_child(child_name, element.ns())
        .and_then(|c| c.attr("ref"))
        .map(|s| s.to_string())
}

/// Depth-first search for every descendant (at any depth, not just direct
/// children) whose tag name is `name`, in document order. Mirrors how the
/// token-level pull parser (spec §4.C) reacts to a `StartElement` by name
/// regardless of which wrapper container it's nested under.
pub fn descendants_named<'a>(element: &'a Element, name: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_descendants_named(element, name, &mut found);
    found
}

fn collect_descendants_named<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in element.children() {
        if child.name() == name {
            found.push(child);
        }
        collect_descendants_named(child, name, found);
    }
}

/// Like [`descendants_named`] but matching any of several tag names at
/// once, preserving overall document order (used for `PointsInSequence`'s
/// mixed `StopPointInJourneyPattern`/`TimingPointInJourneyPattern` union,
/// spec §9).
pub fn descendants_named_any<'a>(element: &'a Element, names: &[&str]) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_descendants_named_any(element, names, &mut found);
    found
}

fn collect_descendants_named_any<'a>(element: &'a Element, names: &[&str], found: &mut Vec<&'a Element>) {
    for child in element.children() {
        if names.contains(&child.name()) {
            found.push(child);
        }
        collect_descendants_named_any(child, names, found);
    }
}

/// Reads a NeTEx `Centroid/Location/{Longitude,Latitude}` pair, if both are
/// present and parse as floats. Only looks at `element`'s direct
/// `Centroid` child, so nested entities (e.g. a `StopPlace`'s own quays)
/// never leak into its centroid.
pub fn centroid_of(element: &Element) -> Option<crate::netex::objects::Centroid> {
    let location = element
        .get_child("Centroid", element.ns())
        .and_then(|c| c.get_child("Location", c.ns()))?;
    let lon: f64 = child_text(location, "Longitude")?.parse().ok()?;
    let lat: f64 = child_text(location, "Latitude")?.parse().ok()?;
    Some(crate::netex::objects::Centroid { lat, lon })
}
