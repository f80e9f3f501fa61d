//! Dependencies shared by every service.

use std::sync::Arc;

use potluck_access::AccessGuard;
use potluck_core::Clock;
use potluck_store::Store;

use crate::config::PotluckConfig;

/// The store, guard, clock and configuration a service works against.
pub(crate) struct Context<S, G> {
    pub store: Arc<S>,
    pub guard: Arc<G>,
    pub clock: Arc<dyn Clock>,
    pub config: PotluckConfig,
}

impl<S: Store, G: AccessGuard> Context<S, G> {
    pub fn new(store: Arc<S>, guard: Arc<G>, clock: Arc<dyn Clock>, config: PotluckConfig) -> Self {
        Self {
            store,
            guard,
            clock,
            config,
        }
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }
}
