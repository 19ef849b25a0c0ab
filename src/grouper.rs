//! Partition resolver output into contiguous display groups.
//!
//! Consecutive locations that share a group key belong to one group; a key
//! change starts a new group and advances the color index, which cycles
//! through the palette. Keys are compared to the immediately preceding
//! location only, so the same key can reappear as a later, separate group.

use serde::Serialize;

use crate::normalize::group_key;

/// A location tagged with its group and palette color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedLocation {
    pub location: String,
    /// Ordinal of the contiguous group (0-based).
    pub group: usize,
    /// Index into the palette (`group % palette_size`).
    pub color: usize,
}

/// A contiguous run of locations sharing one group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationGroup<'a> {
    pub key: &'a str,
    pub color: usize,
    pub locations: &'a [String],
}

/// Tag each location with its contiguous group and color.
///
/// A `palette_size` of zero is treated as one color.
#[must_use]
pub fn group(locations: &[String], key_len: usize, palette_size: usize) -> Vec<GroupedLocation> {
    runs(locations, key_len, palette_size)
        .into_iter()
        .enumerate()
        .flat_map(|(group, run)| {
            run.locations.iter().map(move |location| GroupedLocation {
                location: location.clone(),
                group,
                color: run.color,
            })
        })
        .collect()
}

/// Split `locations` into contiguous same-key runs.
#[must_use]
pub fn runs(locations: &[String], key_len: usize, palette_size: usize) -> Vec<LocationGroup<'_>> {
    let palette_size = palette_size.max(1);
    let mut out: Vec<LocationGroup<'_>> = Vec::new();
    let mut start = 0;

    while let Some(first) = locations.get(start) {
        let key = group_key(first, key_len);
        let len = locations
            .iter()
            .skip(start)
            .take_while(|loc| group_key(loc, key_len) == key)
            .count();
        let end = start + len;
        out.push(LocationGroup {
            key,
            color: out.len() % palette_size,
            locations: locations.get(start..end).unwrap_or_default(),
        });
        start = end;
    }

    out
}
