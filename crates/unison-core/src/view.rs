//! View Builder — projects a cluster into its consolidated identity.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  contact::{Contact, ContactId, oldest},
};

/// The externally visible shape of one identity cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedIdentity {
  pub primary_contact_id:    ContactId,
  /// The primary's email first, then every other distinct email.
  pub emails:                Vec<String>,
  /// The primary's phone number first, then every other distinct number.
  pub phone_numbers:         Vec<String>,
  /// Every other contact in the cluster, oldest first.
  pub secondary_contact_ids: Vec<ContactId>,
}

/// Build the consolidated view of `cluster`.
///
/// The primary is the contact marked primary (the oldest such, should the
/// data hold several) or, failing that, the oldest contact overall. The
/// remaining contacts are visited oldest first, so the output depends only on
/// the stored rows and not on the order they were handed in.
pub fn build(cluster: &[Contact]) -> Result<ConsolidatedIdentity> {
  let primary = oldest(cluster.iter().filter(|c| c.is_primary()))
    .or_else(|| oldest(cluster))
    .ok_or_else(|| {
      Error::InternalInconsistency("cannot build a view of an empty cluster".to_owned())
    })?;

  let mut others: Vec<&Contact> = cluster.iter().filter(|c| c.id != primary.id).collect();
  others.sort_by_key(|c| c.age_key());
  others.dedup_by_key(|c| c.id);

  let mut emails = Vec::new();
  let mut phone_numbers = Vec::new();
  push_unique(&mut emails, primary.email.as_deref());
  push_unique(&mut phone_numbers, primary.phone_number.as_deref());
  for contact in &others {
    push_unique(&mut emails, contact.email.as_deref());
    push_unique(&mut phone_numbers, contact.phone_number.as_deref());
  }

  Ok(ConsolidatedIdentity {
    primary_contact_id: primary.id,
    emails,
    phone_numbers,
    secondary_contact_ids: others.iter().map(|c| c.id).collect(),
  })
}

/// Append `value` unless it is absent, empty, or already present.
fn push_unique(values: &mut Vec<String>, value: Option<&str>) {
  if let Some(v) = value
    && !v.is_empty()
    && !values.iter().any(|existing| existing == v)
  {
    values.push(v.to_owned());
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::contact::LinkPrecedence;

  fn contact(
    id: ContactId,
    email: Option<&str>,
    phone: Option<&str>,
    linked_id: Option<ContactId>,
    secs: i64,
  ) -> Contact {
    let at = Utc.timestamp_opt(secs, 0).unwrap();
    Contact {
      id,
      phone_number: phone.map(str::to_owned),
      email: email.map(str::to_owned),
      linked_id,
      link_precedence: if linked_id.is_some() {
        LinkPrecedence::Secondary
      } else {
        LinkPrecedence::Primary
      },
      created_at: at,
      updated_at: at,
      deleted_at: None,
    }
  }

  #[test]
  fn singleton_cluster() {
    let view = build(&[contact(1, Some("a@x.com"), Some("111"), None, 0)]).unwrap();
    assert_eq!(view, ConsolidatedIdentity {
      primary_contact_id:    1,
      emails:                vec!["a@x.com".into()],
      phone_numbers:         vec!["111".into()],
      secondary_contact_ids: vec![],
    });
  }

  #[test]
  fn primary_values_come_first_even_when_listed_last() {
    let cluster = [
      contact(3, Some("c@x.com"), Some("333"), Some(1), 30),
      contact(2, Some("b@x.com"), Some("111"), Some(1), 20),
      contact(1, Some("a@x.com"), Some("111"), None, 10),
    ];
    let view = build(&cluster).unwrap();
    assert_eq!(view.primary_contact_id, 1);
    assert_eq!(view.emails, ["a@x.com", "b@x.com", "c@x.com"]);
    assert_eq!(view.phone_numbers, ["111", "333"]);
    assert_eq!(view.secondary_contact_ids, [2, 3]);
  }

  #[test]
  fn missing_and_empty_values_are_skipped() {
    let cluster = [
      contact(1, None, Some("111"), None, 10),
      contact(2, Some(""), None, Some(1), 20),
      contact(3, Some("b@x.com"), Some("111"), Some(1), 30),
    ];
    let view = build(&cluster).unwrap();
    assert_eq!(view.emails, ["b@x.com"]);
    assert_eq!(view.phone_numbers, ["111"]);
    assert_eq!(view.secondary_contact_ids, [2, 3]);
  }

  #[test]
  fn falls_back_to_oldest_without_a_primary() {
    let cluster = [
      contact(4, Some("d@x.com"), None, Some(9), 40),
      contact(2, Some("b@x.com"), None, Some(9), 20),
    ];
    let view = build(&cluster).unwrap();
    assert_eq!(view.primary_contact_id, 2);
    assert_eq!(view.emails, ["b@x.com", "d@x.com"]);
    assert_eq!(view.secondary_contact_ids, [4]);
  }

  #[test]
  fn empty_cluster_is_an_internal_inconsistency() {
    let err = build(&[]).unwrap_err();
    assert!(matches!(err, Error::InternalInconsistency(_)));
  }

  #[test]
  fn serialises_with_camel_case_keys() {
    let view = build(&[contact(1, Some("a@x.com"), None, None, 0)]).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["primaryContactId"], 1);
    assert_eq!(json["phoneNumbers"], serde_json::json!([]));
    assert_eq!(json["secondaryContactIds"], serde_json::json!([]));
  }
}
