//! URL normalization and domain handling
//!
//! Normalization runs before every visited-set membership test and before
//! every fetch, so that trivially different spellings of the same URL cannot
//! alias-collide in the frontier.

mod domain;
mod normalize;

pub use domain::{host_of, registrable_domain, registrable_domain_of};
pub use normalize::normalize_url;
