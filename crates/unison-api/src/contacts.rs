//! Handlers for `/contacts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/contacts` | Optional `?precedence=primary\|secondary&limit=&offset=` |
//! | `GET`  | `/contacts/:id` | 404 if not found |
//! | `GET`  | `/contacts/:id/identity` | Consolidated view of the contact's cluster |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use unison_core::{
  contact::{Contact, ContactId, LinkPrecedence},
  store::{ContactQuery, ContactStore},
  view::ConsolidatedIdentity,
};

use crate::{error::ApiError, identify::IdentifyResponse};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub precedence: Option<LinkPrecedence>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

/// `GET /contacts[?precedence=<p>][&limit=<n>][&offset=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let query = ContactQuery {
    precedence: params.precedence,
    limit:      params.limit,
    offset:     params.offset,
  };
  let contacts = store.list_contacts(query).await.map_err(ApiError::from_store)?;
  Ok(Json(contacts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ContactId>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let contact = store
    .get_contact(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(contact))
}

// ─── Identity ─────────────────────────────────────────────────────────────────

/// `GET /contacts/:id/identity` — same envelope as `POST /identify`.
pub async fn identity<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ContactId>,
) -> Result<Json<IdentifyResponse>, ApiError>
where
  S: ContactStore,
{
  let contact: ConsolidatedIdentity = store
    .identity_of(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(IdentifyResponse { contact }))
}
