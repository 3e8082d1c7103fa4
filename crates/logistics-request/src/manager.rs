use crate::config::ResolverConfig;
use crate::network::Network;
use crate::resolver::Resolver;
use logistics_core::id::RequesterId;
use logistics_core::item::ItemQuantity;
use logistics_core::log::{ItemMessage, RequestLog};
use logistics_core::tree::{CommitSummary, RequestError};

/// What happened to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Everything was promised and the tree was committed.
    Fulfilled {
        used: Vec<ItemMessage>,
        summary: CommitSummary,
    },
    /// Something could not be promised; nothing was committed.
    Missing { missing: Vec<ItemMessage> },
}

impl RequestOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, RequestOutcome::Fulfilled { .. })
    }
}

/// A dry run: what a request would use and what it would lack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Simulation {
    pub used: Vec<ItemMessage>,
    pub missing: Vec<ItemMessage>,
}

/// Runs requests end to end: resolve, then commit or report.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestManager {
    config: ResolverConfig,
}

impl RequestManager {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `request` against `network` and commit it if nothing is
    /// missing. An incomplete plan is reported to `log` and dropped.
    pub fn request<L>(
        &self,
        network: &mut Network,
        request: ItemQuantity,
        requester: RequesterId,
        log: &mut L,
    ) -> Result<RequestOutcome, RequestError>
    where
        L: RequestLog + ?Sized,
    {
        let tree = Resolver::new(network, self.config).build(request.clone(), requester)?;

        if !tree.is_complete() {
            tracing::info!(%request, "request cannot be satisfied");
            tree.report_missing(log);
            return Ok(RequestOutcome::Missing {
                missing: tree.missing_messages(),
            });
        }

        tree.report_used_and_missing(log);
        let used = tree.used_messages();
        let summary = tree.fulfill_all(network);
        Ok(RequestOutcome::Fulfilled { used, summary })
    }

    /// Resolve `request` and report what it would use, without committing.
    pub fn simulate<L>(
        &self,
        network: &Network,
        request: ItemQuantity,
        requester: RequesterId,
        log: &mut L,
    ) -> Result<Simulation, RequestError>
    where
        L: RequestLog + ?Sized,
    {
        let tree = Resolver::new(network, self.config).build(request, requester)?;
        tree.report_used_and_missing(log);
        Ok(Simulation {
            used: tree.used_messages(),
            missing: tree.missing_messages(),
        })
    }
}
