/// Database plumbing for the PostgreSQL store
///
/// # Modules
///
/// - `pool`: connection pool creation and health checks
/// - `migrations`: embedded schema migrations
///
/// The queries themselves live in [`store::postgres`](crate::store::postgres).

pub mod migrations;
pub mod pool;
