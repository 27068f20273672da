//! Matcher — finds the stored contacts an observation refers to.

use crate::{
  Error, Result,
  contact::Contact,
  repository::ContactRepository,
};

/// Every stored contact whose email equals `email` or whose phone number
/// equals `phone`. Only the supplied fields take part in matching.
///
/// Fails with [`Error::InvalidInput`] when both are absent; an unseen
/// identity yields an empty list.
pub fn find_matches<R: ContactRepository>(
  repo: &mut R,
  email: Option<&str>,
  phone: Option<&str>,
) -> Result<Vec<Contact>> {
  if email.is_none() && phone.is_none() {
    return Err(Error::InvalidInput(
      "either email or phoneNumber must be provided".to_owned(),
    ));
  }
  repo.find_by_email_or_phone(email, phone).map_err(Error::storage)
}
