//! Integration tests for `SqliteStore` against an in-memory database.

use unison_core::{
  contact::LinkPrecedence,
  identify::IdentifyRequest,
  store::{ContactQuery, ContactStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn req(email: Option<&str>, phone: Option<&str>) -> IdentifyRequest {
  IdentifyRequest::new(email.map(str::to_owned), phone.map(str::to_owned))
}

/// Insert a row verbatim, bypassing resolution.
async fn seed(
  s: &SqliteStore,
  id: i64,
  email: &str,
  phone: &str,
  linked_id: Option<i64>,
  created_at: &str,
) {
  let email      = email.to_owned();
  let phone      = phone.to_owned();
  let created_at = created_at.to_owned();
  let precedence = if linked_id.is_some() { "secondary" } else { "primary" };
  s.conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO contacts (
           id, phone_number, email, linked_id, link_precedence, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        rusqlite::params![id, phone, email, linked_id, precedence, created_at],
      )?;
      Ok(())
    })
    .await
    .unwrap();
}

async fn all_contacts(s: &SqliteStore) -> Vec<unison_core::contact::Contact> {
  s.list_contacts(ContactQuery::default()).await.unwrap()
}

// ─── Identify ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_identity_creates_primary_row() {
  let s = store().await;

  let view = s.identify(req(Some("a@x.com"), Some("111"))).await.unwrap();

  let rows = all_contacts(&s).await;
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].link_precedence, LinkPrecedence::Primary);
  assert_eq!(rows[0].linked_id, None);
  assert_eq!(view.primary_contact_id, rows[0].id);
  assert_eq!(view.emails, ["a@x.com"]);
  assert_eq!(view.phone_numbers, ["111"]);
  assert!(view.secondary_contact_ids.is_empty());
}

#[tokio::test]
async fn new_email_creates_linked_secondary() {
  let s = store().await;
  let first = s.identify(req(Some("a@x.com"), Some("111"))).await.unwrap();

  let view = s.identify(req(Some("b@x.com"), Some("111"))).await.unwrap();

  let rows = all_contacts(&s).await;
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[1].link_precedence, LinkPrecedence::Secondary);
  assert_eq!(rows[1].linked_id, Some(first.primary_contact_id));
  assert_eq!(view.emails, ["a@x.com", "b@x.com"]);
  assert_eq!(view.phone_numbers, ["111"]);
  assert_eq!(view.secondary_contact_ids, [rows[1].id]);
}

#[tokio::test]
async fn repeated_request_creates_nothing() {
  let s = store().await;
  s.identify(req(Some("a@x.com"), Some("111"))).await.unwrap();
  let first = s.identify(req(Some("b@x.com"), Some("111"))).await.unwrap();

  let second = s.identify(req(Some("b@x.com"), Some("111"))).await.unwrap();

  assert_eq!(all_contacts(&s).await.len(), 2);
  assert_eq!(first, second);
}

#[tokio::test]
async fn bridging_request_merges_clusters() {
  let s = store().await;
  seed(&s, 1, "a@x.com", "111", None, "2024-01-01T00:00:00+00:00").await;
  seed(&s, 2, "b@x.com", "222", None, "2024-01-02T00:00:00+00:00").await;
  seed(&s, 3, "c@x.com", "222", Some(2), "2024-01-03T00:00:00+00:00").await;

  let view = s.identify(req(Some("b@x.com"), Some("111"))).await.unwrap();

  assert_eq!(view.primary_contact_id, 1);
  assert_eq!(view.emails, ["a@x.com", "b@x.com", "c@x.com"]);
  assert_eq!(view.phone_numbers, ["111", "222"]);
  assert_eq!(view.secondary_contact_ids, [2, 3]);

  for id in [2, 3] {
    let c = s.get_contact(id).await.unwrap().unwrap();
    assert_eq!(c.link_precedence, LinkPrecedence::Secondary, "contact {id}");
    assert_eq!(c.linked_id, Some(1), "contact {id}");
    assert!(c.updated_at > c.created_at);
  }
}

#[tokio::test]
async fn equal_creation_times_keep_lower_id() {
  let s = store().await;
  seed(&s, 5, "a@x.com", "111", None, "2024-01-01T00:00:00+00:00").await;
  seed(&s, 4, "b@x.com", "222", None, "2024-01-01T00:00:00+00:00").await;

  let view = s.identify(req(Some("a@x.com"), Some("222"))).await.unwrap();

  assert_eq!(view.primary_contact_id, 4);
  assert_eq!(view.emails, ["b@x.com", "a@x.com"]);
  let five = s.get_contact(5).await.unwrap().unwrap();
  assert_eq!(five.linked_id, Some(4));
}

#[tokio::test]
async fn dangling_secondary_is_promoted() {
  let s = store().await;
  seed(&s, 7, "d@x.com", "444", Some(99), "2024-01-01T00:00:00+00:00").await;

  let view = s.identify(req(Some("d@x.com"), None)).await.unwrap();

  assert_eq!(view.primary_contact_id, 7);
  let seven = s.get_contact(7).await.unwrap().unwrap();
  assert_eq!(seven.link_precedence, LinkPrecedence::Primary);
  assert_eq!(seven.linked_id, None);
}

#[tokio::test]
async fn missing_identifiers_convert_to_invalid_input() {
  let s = store().await;

  let err = s.identify(req(None, Some(""))).await.unwrap_err();

  let core: unison_core::Error = err.into();
  assert!(core.is_invalid_input());
  assert!(all_contacts(&s).await.is_empty());
}

#[tokio::test]
async fn concurrent_requests_for_one_identity_create_one_primary() {
  let s = store().await;

  let tasks: Vec<_> = (0..8)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move {
        s.identify(req(Some("race@x.com"), Some("555"))).await.unwrap()
      })
    })
    .collect();

  let mut primary_ids = Vec::new();
  for task in tasks {
    primary_ids.push(task.await.unwrap().primary_contact_id);
  }

  primary_ids.dedup();
  assert_eq!(primary_ids.len(), 1);
  assert_eq!(all_contacts(&s).await.len(), 1);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_contact_missing_returns_none() {
  let s = store().await;
  assert!(s.get_contact(12).await.unwrap().is_none());
}

#[tokio::test]
async fn list_contacts_filters_and_pages() {
  let s = store().await;
  s.identify(req(Some("a@x.com"), Some("111"))).await.unwrap();
  s.identify(req(Some("b@x.com"), Some("111"))).await.unwrap();
  s.identify(req(Some("c@x.com"), Some("111"))).await.unwrap();
  s.identify(req(Some("z@x.com"), Some("999"))).await.unwrap();

  let primaries = s
    .list_contacts(ContactQuery {
      precedence: Some(LinkPrecedence::Primary),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(primaries.len(), 2);
  assert!(primaries.iter().all(|c| c.link_precedence == LinkPrecedence::Primary));

  let page = s
    .list_contacts(ContactQuery { limit: Some(2), offset: Some(1), ..Default::default() })
    .await
    .unwrap();
  let ids: Vec<_> = page.iter().map(|c| c.id).collect();
  assert_eq!(ids, [2, 3]);
}

#[tokio::test]
async fn identity_of_resolves_from_any_member() {
  let s = store().await;
  s.identify(req(Some("a@x.com"), Some("111"))).await.unwrap();
  s.identify(req(Some("b@x.com"), Some("111"))).await.unwrap();

  let from_primary = s.identity_of(1).await.unwrap().unwrap();
  let from_secondary = s.identity_of(2).await.unwrap().unwrap();

  assert_eq!(from_primary, from_secondary);
  assert_eq!(from_primary.primary_contact_id, 1);
  assert!(s.identity_of(3).await.unwrap().is_none());
}

#[tokio::test]
async fn identity_of_dangling_secondary_is_its_own_view() {
  let s = store().await;
  seed(&s, 7, "d@x.com", "444", Some(99), "2024-01-01T00:00:00+00:00").await;

  let view = s.identity_of(7).await.unwrap().unwrap();

  assert_eq!(view.primary_contact_id, 7);
  assert!(view.secondary_contact_ids.is_empty());
  let seven = s.get_contact(7).await.unwrap().unwrap();
  assert_eq!(seven.linked_id, Some(99));
}

#[tokio::test]
async fn oversized_paging_values_clamp_instead_of_wrapping() {
  let s = store().await;
  s.identify(req(Some("a@x.com"), Some("111"))).await.unwrap();
  s.identify(req(Some("b@x.com"), Some("111"))).await.unwrap();

  let all = s
    .list_contacts(ContactQuery { limit: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(all.len(), 2);

  let none = s
    .list_contacts(ContactQuery { offset: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert!(none.is_empty());
}
