//! Cluster Resolver — settles which primary a set of matched contacts belongs
//! to, merging clusters when an observation bridges more than one.
//!
//! Resolution is two-phase: the reachable graph is first copied into an owned
//! id → contact map by iterative traversal, then the full set of link rewrites
//! is computed from that snapshot and applied as one batch. Nothing is
//! mutated while decisions are still being derived.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::{
  Error, Result,
  contact::{Contact, ContactId, Link, oldest},
  repository::ContactRepository,
};

/// The part of the contact graph reachable upward from a set of matches.
#[derive(Debug, Default)]
pub struct Reachable {
  /// Every contact seen during traversal, matches included.
  pub visited:   BTreeMap<ContactId, Contact>,
  /// The distinct primaries among `visited`, in id order.
  pub primaries: Vec<Contact>,
}

/// Follow `linked_id` pointers from `matches` to every reachable primary.
///
/// Traversal is breadth-first, one [`ContactRepository::find_by_ids`] call per
/// level. Links to contacts that no longer exist are skipped, and the visited
/// set makes cycles terminate.
pub fn reachable<R: ContactRepository>(
  repo: &mut R,
  matches: &[Contact],
) -> Result<Reachable> {
  let mut visited: BTreeMap<ContactId, Contact> = BTreeMap::new();
  let mut frontier: Vec<Contact> = matches.to_vec();

  while !frontier.is_empty() {
    let mut pending: BTreeSet<ContactId> = BTreeSet::new();
    for contact in frontier.drain(..) {
      if visited.contains_key(&contact.id) {
        continue;
      }
      if !contact.is_primary()
        && let Some(target) = contact.linked_id
      {
        pending.insert(target);
      }
      visited.insert(contact.id, contact);
    }

    pending.retain(|id| !visited.contains_key(id));
    if pending.is_empty() {
      break;
    }
    let ids: Vec<ContactId> = pending.into_iter().collect();
    frontier = repo.find_by_ids(&ids).map_err(Error::storage)?;
  }

  let primaries = visited.values().filter(|c| c.is_primary()).cloned().collect();
  Ok(Reachable { visited, primaries })
}

/// Determine the single primary for `matches`, repairing or merging clusters
/// as needed, and return it.
///
/// - No reachable primary: orphan recovery (see [`recover_orphans`]).
/// - One reachable primary: returned as is, nothing is written.
/// - Several: the oldest survives and the rest are merged under it (see
///   [`merge`]).
pub fn resolve_primary<R: ContactRepository>(
  repo: &mut R,
  matches: &[Contact],
) -> Result<Contact> {
  let mut reach = reachable(repo, matches)?;
  match reach.primaries.len() {
    0 => recover_orphans(repo, matches),
    1 => Ok(reach.primaries.remove(0)),
    _ => merge(repo, &reach),
  }
}

/// Repair matches none of which can reach a primary.
///
/// The oldest match is promoted in place. Every other match is relinked to it,
/// so the repaired cluster is consistent again.
pub fn recover_orphans<R: ContactRepository>(
  repo: &mut R,
  matches: &[Contact],
) -> Result<Contact> {
  let candidate = oldest(matches).cloned().ok_or_else(|| {
    Error::InternalInconsistency("orphan recovery invoked without contacts".to_owned())
  })?;

  let primary = if candidate.is_primary() {
    candidate
  } else {
    warn!(
      contact_id = candidate.id,
      linked_id = ?candidate.linked_id,
      "secondary contact has no reachable primary; promoting"
    );
    repo.update(candidate.id, Link::Primary).map_err(Error::storage)?
  };

  let link = Link::Secondary { linked_id: primary.id };
  let strays: Vec<ContactId> = matches
    .iter()
    .filter(|c| c.id != primary.id && !c.has_link(link))
    .map(|c| c.id)
    .collect();
  if !strays.is_empty() {
    warn!(primary_id = primary.id, relinked = ?strays, "relinking orphaned contacts");
    repo.batch_update(&strays, link).map_err(Error::storage)?;
  }

  Ok(primary)
}

/// Merge every reachable cluster into the one with the oldest primary.
///
/// The demotion set is every contact visited on the way to a losing primary
/// plus everything linked below one, at any depth, so multi-hop chains
/// collapse to point directly at the survivor.
pub fn merge<R: ContactRepository>(repo: &mut R, reach: &Reachable) -> Result<Contact> {
  let survivor = oldest(&reach.primaries).cloned().ok_or_else(|| {
    Error::InternalInconsistency("merge invoked without primaries".to_owned())
  })?;
  let link = Link::Secondary { linked_id: survivor.id };

  // Seed with the losing primaries and every visited contact not already
  // under the survivor, then pull in everything linked below them.
  let mut queue: Vec<ContactId> = reach
    .primaries
    .iter()
    .map(|p| p.id)
    .chain(reach.visited.values().filter(|c| !c.has_link(link)).map(|c| c.id))
    .collect();

  let mut demote: BTreeSet<ContactId> = BTreeSet::new();
  while let Some(id) = queue.pop() {
    if id == survivor.id || !demote.insert(id) {
      continue;
    }
    let members = repo.find_cluster_members(id).map_err(Error::storage)?;
    queue.extend(
      members
        .iter()
        .map(|c| c.id)
        .filter(|m| *m != survivor.id && !demote.contains(m)),
    );
  }

  let ids: Vec<ContactId> = demote.into_iter().collect();
  info!(
    primary_id = survivor.id,
    absorbed = reach.primaries.len() - 1,
    demoted = ids.len(),
    "merging contact clusters"
  );
  if !ids.is_empty() {
    repo.batch_update(&ids, link).map_err(Error::storage)?;
  }

  Ok(survivor)
}
