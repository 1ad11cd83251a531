//! The row store facade.

use crate::connection::Connector;
use crate::profile::ConnectionProfile;

/// Primary-key row access over a [`Connector`].
///
/// Every operation opens its own connection through the connector and drops
/// it before returning, on success and on failure alike. The store keeps no
/// other state, so it can be shared freely between callers.
///
/// Reads live in [`fetch`](Self::fetch), [`fetch_scalar`](Self::fetch_scalar)
/// and [`query_raw`](Self::query_raw); writes in [`update`](Self::update) and
/// [`execute_raw`](Self::execute_raw).
///
/// # Examples
///
/// ```no_run
/// use confrow_sql::{ConnectionProfile, SqlStore};
///
/// let store = SqlStore::new(ConnectionProfile::embedded("data/app.db"));
///
/// let name: Option<String> = store.fetch_scalar("users", "id", 123, "name").unwrap();
/// println!("{name:?}");
/// ```
#[derive(Debug, Clone)]
pub struct SqlStore<C = ConnectionProfile> {
    pub(crate) connector: C,
}

impl<C: Connector> SqlStore<C> {
    /// Wraps `connector`; nothing is opened until the first operation.
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// The connector every operation opens connections through.
    pub fn connector(&self) -> &C {
        &self.connector
    }
}
