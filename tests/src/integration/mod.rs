//! # Integration Flows
//!
//! End-to-end alias flows over the public API: a `NameService` driving an
//! `InMemoryLedger`, with independent wallets for every role.

pub mod approve_flow;
pub mod races;
pub mod reject_flow;

use std::sync::{Arc, Once};

use qc_18_name_service::{
    Address, FeeDescriptor, InMemoryLedger, LedgerGateway, LocalWallet, NameService,
    NameServiceConfig, RecordingObserver, RegistryConfig, RoleAuthorities,
};
use quantum_telemetry::{init_logging, TelemetryConfig};
use rand::RngCore;

/// Fee amount used throughout the flows.
pub const FEE_VALUE: &str = "100000000";

/// All parties of the protocol around one ledger.
pub struct World<L: LedgerGateway = InMemoryLedger> {
    /// Shared ledger.
    pub ledger: Arc<L>,
    /// Client service.
    pub service: Arc<NameService<L, RecordingObserver>>,
    /// Fee collector.
    pub collector: Address,
    /// Provider wallet.
    pub provider: LocalWallet,
    /// Issuer wallet.
    pub issuer: LocalWallet,
    /// Middleware wallet.
    pub middleware: LocalWallet,
}

/// Role wallets plus the registry configuration naming them.
pub fn roles() -> (RegistryConfig, LocalWallet, LocalWallet, LocalWallet) {
    let provider = LocalWallet::random();
    let issuer = LocalWallet::random();
    let middleware = LocalWallet::random();
    let config = RegistryConfig::new(
        LocalWallet::random().address(),
        RoleAuthorities {
            provider: provider.address(),
            issuer: issuer.address(),
            middleware: middleware.address(),
        },
    );
    (config, provider, issuer, middleware)
}

static LOGGING: Once = Once::new();

/// Install the subscriber once per test binary. `QC_LOG_LEVEL=debug` shows
/// ledger traffic.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let mut config = TelemetryConfig::for_subsystem("18", "name-service");
        config.log_level = std::env::var("QC_LOG_LEVEL").unwrap_or_else(|_| "warn".into());
        let _ = init_logging(&config);
    });
}

/// Fresh world on an in-memory ledger.
pub fn world() -> World {
    let (config, provider, issuer, middleware) = roles();
    let ledger = Arc::new(InMemoryLedger::new(config.clone()));
    world_on(ledger, &config, provider, issuer, middleware)
}

/// World around an arbitrary ledger.
pub fn world_on<L: LedgerGateway>(
    ledger: Arc<L>,
    config: &RegistryConfig,
    provider: LocalWallet,
    issuer: LocalWallet,
    middleware: LocalWallet,
) -> World<L> {
    init_test_logging();
    let service = NameService::with_observer(
        Arc::clone(&ledger),
        RecordingObserver::new(),
        NameServiceConfig::from(config),
    );
    World {
        ledger,
        service: Arc::new(service),
        collector: config.fee_collector,
        provider,
        issuer,
        middleware,
    }
}

impl<L: LedgerGateway> World<L> {
    /// `{ to: collector, value: "100000000" }`.
    pub fn fee(&self) -> FeeDescriptor {
        FeeDescriptor {
            to: self.collector,
            value: FEE_VALUE.to_string(),
        }
    }
}

/// Four random bytes, hex-encoded.
pub fn random_name() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
