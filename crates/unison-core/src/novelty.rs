//! Novelty Detector.

use crate::contact::Contact;

/// Whether the observation carries an email or phone number that no contact
/// in `cluster` already has.
pub fn has_new_information(
  cluster: &[Contact],
  email: Option<&str>,
  phone: Option<&str>,
) -> bool {
  let new_email =
    email.is_some_and(|e| !cluster.iter().any(|c| c.email.as_deref() == Some(e)));
  let new_phone = phone
    .is_some_and(|p| !cluster.iter().any(|c| c.phone_number.as_deref() == Some(p)));
  new_email || new_phone
}
