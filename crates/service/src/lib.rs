//! Service layer for the partner directory.
//! - `PartnerService` holds the business rules: input validation, id generation, lookup semantics.
//! - Persistence sits behind `PartnerRepository`, backed by PostGIS or by memory.

pub mod errors;
pub mod partner;
#[cfg(test)]
pub mod test_support;
