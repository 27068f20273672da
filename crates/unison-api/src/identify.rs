//! Handler for `POST /identify`.
//!
//! Body: `{"email": "a@x.com", "phoneNumber": "111"}`. Either field may be
//! `null` or omitted, but not both. `phoneNumber` may also be a JSON number.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use unison_core::{identify::IdentifyRequest, store::ContactStore, view::ConsolidatedIdentity};

use crate::error::ApiError;

/// A phone number as clients send it: usually a string, sometimes a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PhoneNumber {
  Text(String),
  Number(serde_json::Number),
}

impl PhoneNumber {
  pub fn into_string(self) -> String {
    match self {
      Self::Text(s) => s,
      Self::Number(n) => n.to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyBody {
  pub email:        Option<String>,
  pub phone_number: Option<PhoneNumber>,
}

impl From<IdentifyBody> for IdentifyRequest {
  fn from(b: IdentifyBody) -> Self {
    IdentifyRequest::new(b.email, b.phone_number.map(PhoneNumber::into_string))
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentifyResponse {
  pub contact: ConsolidatedIdentity,
}

/// `POST /identify`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<IdentifyBody>,
) -> Result<Json<IdentifyResponse>, ApiError>
where
  S: ContactStore,
{
  let request = IdentifyRequest::from(body);
  if !request.has_identifier() {
    return Err(ApiError::BadRequest(
      "either email or phoneNumber must be provided".to_owned(),
    ));
  }

  let contact = store.identify(request).await.map_err(ApiError::from_store)?;
  Ok(Json(IdentifyResponse { contact }))
}
