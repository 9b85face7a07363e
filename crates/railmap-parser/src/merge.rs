//! Cross-line station merging.
//!
//! Stations are identified by name. Once every line is built, each name's
//! line memberships are unioned and every per-line copy is replaced by a copy
//! carrying the merged membership and transfer flag. Lines themselves are
//! rebuilt by value; nothing built earlier is mutated.
//!
//! Membership is counted by line id. Two lines whose badges carry the same
//! name still make a shared station a transfer, even though its `lines` set
//! lists that name once.

use indexmap::{IndexMap, IndexSet};

use railmap_core::network::{ParsedLine, ParsedStation, RailNetwork};

/// Merges station identity across `lines` and collects the global station list.
///
/// The global list holds one entry per name in first-appearance order.
pub(crate) fn merge_transfers(lines: Vec<ParsedLine>) -> RailNetwork {
    let mut memberships: IndexMap<&str, Membership<'_>> = IndexMap::new();
    for line in &lines {
        for station in line.stations() {
            let membership = memberships.entry(station.name()).or_default();
            membership.ids.insert(line.id());
            membership.names.extend(station.lines().iter().cloned());
        }
    }

    let merged = |station: &ParsedStation| -> ParsedStation {
        match memberships.get(station.name()) {
            Some(membership) => {
                station.with_membership(membership.names.clone(), membership.ids.len() > 1)
            }
            None => station.clone(),
        }
    };

    let mut global: IndexMap<&str, ParsedStation> = IndexMap::new();
    for station in lines.iter().flat_map(ParsedLine::stations) {
        global
            .entry(station.name())
            .or_insert_with(|| merged(station));
    }
    let stations = global.into_values().collect();

    let merged_lines = lines
        .iter()
        .map(|line| line.with_stations(line.stations().iter().map(merged).collect()))
        .collect();

    RailNetwork::new(merged_lines, stations)
}

/// The lines serving one station name.
#[derive(Debug, Default)]
struct Membership<'a> {
    ids: IndexSet<&'a str>,
    names: IndexSet<String>,
}
