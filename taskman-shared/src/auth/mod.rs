/// Credential utilities
///
/// - [`password`]: Argon2id password hashing and verification
///
/// Only hashing at write time is used by the API today; `verify_password`
/// is there for any login flow built on top of the stored digests.

pub mod password;
