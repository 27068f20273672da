//! The `identify` orchestrator and the read-only `lookup` companion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
  Error, Result,
  cluster::{reachable, resolve_primary},
  contact::{ContactId, Link, NewContact, oldest},
  matcher::find_matches,
  novelty::has_new_information,
  repository::ContactRepository,
  view::{ConsolidatedIdentity, build},
};

// ─── Request ─────────────────────────────────────────────────────────────────

/// One observation of a customer: an email and/or a phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
  pub email:        Option<String>,
  pub phone_number: Option<String>,
}

impl IdentifyRequest {
  /// Build a request, treating empty or whitespace-only values as absent.
  /// Present values are kept verbatim; matching is exact.
  pub fn new(email: Option<String>, phone_number: Option<String>) -> Self {
    Self {
      email:        email.filter(|v| !v.trim().is_empty()),
      phone_number: phone_number.filter(|v| !v.trim().is_empty()),
    }
  }

  /// Whether at least one identifying field is present.
  pub fn has_identifier(&self) -> bool {
    self.email.is_some() || self.phone_number.is_some()
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Resolve an observation against the store and return the consolidated
/// identity it belongs to.
///
/// 1. Find every contact sharing the email or phone number.
/// 2. No match: store a new primary and return its singleton view.
/// 3. Otherwise resolve the cluster's primary (merging or repairing as
///    needed) and re-read the cluster.
/// 4. If the observation adds an email or phone number the cluster lacks,
///    store it as a new secondary of the primary.
///
/// The whole sequence must run inside one serialisable unit of work; `repo`
/// is that unit.
pub fn identify<R: ContactRepository>(
  repo: &mut R,
  request: &IdentifyRequest,
) -> Result<ConsolidatedIdentity> {
  if !request.has_identifier() {
    return Err(Error::InvalidInput(
      "either email or phoneNumber must be provided".to_owned(),
    ));
  }
  let email = request.email.as_deref();
  let phone = request.phone_number.as_deref();

  let matches = find_matches(repo, email, phone)?;
  if matches.is_empty() {
    let contact = repo
      .insert(NewContact {
        email:        request.email.clone(),
        phone_number: request.phone_number.clone(),
        link:         Link::Primary,
      })
      .map_err(Error::storage)?;
    debug!(contact_id = contact.id, "created primary contact");
    return build(&[contact]);
  }

  let primary = resolve_primary(repo, &matches)?;
  let mut cluster = repo.find_cluster_members(primary.id).map_err(Error::storage)?;

  if has_new_information(&cluster, email, phone) {
    let contact = repo
      .insert(NewContact {
        email:        request.email.clone(),
        phone_number: request.phone_number.clone(),
        link:         Link::Secondary { linked_id: primary.id },
      })
      .map_err(Error::storage)?;
    debug!(
      contact_id = contact.id,
      primary_id = primary.id,
      "created secondary contact"
    );
    cluster.push(contact);
  }

  build(&cluster)
}

/// The consolidated identity of the cluster that holds `contact_id`, or
/// `None` if no such contact exists.
///
/// Reads only; nothing is repaired. Links are followed up to the primary, so
/// a chained secondary reports its real cluster. A secondary that reaches no
/// primary at all is reported as its own single-contact identity until the
/// next `identify` touching it promotes it.
pub fn lookup<R: ContactRepository>(
  repo: &mut R,
  contact_id: ContactId,
) -> Result<Option<ConsolidatedIdentity>> {
  let Some(contact) = repo.find_by_id(contact_id).map_err(Error::storage)? else {
    return Ok(None);
  };

  let reach = reachable(repo, std::slice::from_ref(&contact))?;
  let Some(primary_id) = oldest(&reach.primaries).map(|p| p.id) else {
    return build(std::slice::from_ref(&contact)).map(Some);
  };

  let mut cluster = repo.find_cluster_members(primary_id).map_err(Error::storage)?;
  if !cluster.iter().any(|c| c.id == contact.id) {
    cluster.push(contact);
  }
  build(&cluster).map(Some)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_values_are_treated_as_absent() {
    let req = IdentifyRequest::new(Some("  ".into()), Some(String::new()));
    assert_eq!(req, IdentifyRequest::default());
    assert!(!req.has_identifier());
  }

  #[test]
  fn present_values_are_kept_verbatim() {
    let req = IdentifyRequest::new(Some(" a@x.com".into()), None);
    assert_eq!(req.email.as_deref(), Some(" a@x.com"));
    assert!(req.has_identifier());
  }
}
