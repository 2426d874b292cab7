//! # Name Service Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Signing | digest sign, address recovery, chain verification |
//! | Registry | create + commit under the write path |
//! | Service | full create → approve → co-sign → broadcast flow |

#![allow(clippy::excessive_nesting)]

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_18_name_service::{
    hash_parts, recover_address, Address, AliasRegistry, AliasSigner, FeeDescriptor,
    FeeValidator, InMemoryLedger, LocalWallet, NameService, NameServiceApi, NameServiceConfig,
    NoopObserver, Overrides, RegistryConfig, RoleAuthorities, StatusAction, StatusPayload,
    StatusTransaction, StatusTransactionEnvelope, FullySigned, DEFAULT_MAX_NAME_LENGTH,
};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

// ============================================================================
// Signing
// ============================================================================

fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-signing");
    group.measurement_time(Duration::from_secs(5));

    let rt = runtime();
    let wallet = LocalWallet::random();
    let digest = hash_parts(&[b"bench".as_slice(), b"a1b2c3d4"]);
    let signature = rt.block_on(wallet.sign_digest(&digest)).unwrap();

    group.bench_function("sign_digest", |b| {
        b.iter(|| rt.block_on(wallet.sign_digest(black_box(&digest))).unwrap())
    });

    group.bench_function("recover_address", |b| {
        b.iter(|| recover_address(black_box(&digest), black_box(&signature)).unwrap())
    });

    // Fully-signed envelope: two chained recoveries plus role checks
    let provider = LocalWallet::random();
    let issuer = LocalWallet::random();
    let payload = StatusPayload {
        name: "a1b2c3d4".into(),
        action: StatusAction::Approve,
        applicant: LocalWallet::random().address(),
        application_id: digest,
        initiator: provider.address(),
    };
    let envelope: StatusTransactionEnvelope = rt.block_on(async {
        let tx = StatusTransaction::new(payload).sign(&provider).await.unwrap();
        tx.sign(&issuer).await.unwrap().into()
    });

    group.bench_function("verify_fully_signed_envelope", |b| {
        b.iter(|| {
            StatusTransaction::<FullySigned>::try_from(black_box(envelope.clone())).unwrap()
        })
    });

    group.finish();
}

// ============================================================================
// Registry
// ============================================================================

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-registry");

    let collector = Address([0xC0; 20]);
    let fee = FeeDescriptor::new(collector, 100_000_000u64);
    let provider = Address([0x01; 20]);

    for size in [100usize, 1_000] {
        let applicants: Vec<Address> = (0..size)
            .map(|i| {
                let mut bytes = [0u8; 20];
                bytes[..8].copy_from_slice(&(i as u64).to_be_bytes());
                Address(bytes)
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("create_and_approve", size),
            &applicants,
            |b, applicants| {
                b.iter(|| {
                    let mut registry =
                        AliasRegistry::new(FeeValidator::new(collector), DEFAULT_MAX_NAME_LENGTH);
                    for (i, applicant) in applicants.iter().enumerate() {
                        let application = registry
                            .create_application(&format!("name-{i}"), *applicant, &fee, 0)
                            .unwrap();
                        registry
                            .commit_status(&StatusPayload {
                                name: application.name.clone(),
                                action: StatusAction::Approve,
                                applicant: *applicant,
                                application_id: application.id(),
                                initiator: provider,
                            })
                            .unwrap();
                    }
                    black_box(registry.approved_count())
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Service
// ============================================================================

fn bench_service_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-service");
    group.measurement_time(Duration::from_secs(10));

    let rt = runtime();
    let provider = LocalWallet::random();
    let issuer = LocalWallet::random();
    let middleware = LocalWallet::random();
    let collector = LocalWallet::random().address();
    let config = RegistryConfig::new(
        collector,
        RoleAuthorities {
            provider: provider.address(),
            issuer: issuer.address(),
            middleware: middleware.address(),
        },
    );
    let ledger = Arc::new(InMemoryLedger::new(config.clone()));
    let service =
        NameService::with_observer(ledger, NoopObserver, NameServiceConfig::from(&config));
    let mut counter = 0u64;

    group.bench_function("create_approve_broadcast", |b| {
        b.iter(|| {
            counter += 1;
            let name = format!("bench-{counter}");
            let applicant = LocalWallet::random();
            rt.block_on(async {
                service
                    .create_alias(
                        &applicant,
                        &name,
                        FeeDescriptor::new(collector, 100_000_000u64),
                        Overrides::default(),
                    )
                    .await
                    .unwrap();
                let tx = service.approve_alias(&name, &provider).await.unwrap();
                let tx = service
                    .sign_alias_status_transaction(tx, &issuer)
                    .await
                    .unwrap();
                let receipt = service
                    .send_alias_status_transaction(tx, &middleware, Overrides::default())
                    .await
                    .unwrap();
                black_box(receipt)
            })
        })
    });

    group.finish();
}

criterion_group!(benches, bench_signing, bench_registry, bench_service_flow);
criterion_main!(benches);
