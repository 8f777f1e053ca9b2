//! [`Query`] collection related to a single [`Assignment`].

use std::convert::Infallible;

use derive_more::From;

use crate::{
    domain::{assignment, Assignment},
    Service,
};

use super::Query;

/// Queries an [`Assignment`] by its [`assignment::Key`].
///
/// [`None`] means the cell was never touched, which is distinct from a
/// cell holding an explicitly cleared [`Assignment`].
#[derive(Clone, Copy, Debug, From)]
pub struct ByKey(pub assignment::Key);

impl<P> Query<ByKey> for Service<P> {
    type Ok = Option<Assignment>;
    type Err = Infallible;

    async fn execute(&self, ByKey(key): ByKey) -> Result<Self::Ok, Self::Err> {
        Ok(self.store().get(&key).cloned())
    }
}
