//! # Property Registry Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | register (recording log) | < 10µs |
//! | register (event bus) | < 20µs |
//! | membership query | < 1µs |
//! | list_relevant, 10k entries | < 1ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use property_registry::{
    BusEventLog, InMemoryEventLog, PropertyRegistryApi, PropertyRegistryService, RegistryConfig,
};
use rand::Rng;
use shared_bus::InMemoryEventBus;
use shared_types::{Address, PropertyId};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const REGISTRY: Address = [0x11; 20];
const OWNER: Address = [0x01; 20];
const CONTROLLER: Address = [0x05; 20];

fn random_property(rng: &mut impl Rng) -> PropertyId {
    let mut id: PropertyId = rng.gen();
    id[0] |= 0x01;
    id
}

fn config() -> RegistryConfig {
    RegistryConfig::new(REGISTRY, OWNER)
        .expect("valid config")
        .with_controller(CONTROLLER)
}

// ============================================================================
// Mutations
// ============================================================================

fn bench_register(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("registry-register");
    group.measurement_time(Duration::from_secs(5));

    let recording = PropertyRegistryService::new(config(), Arc::new(InMemoryEventLog::new()))
        .expect("registry");
    let mut rng = rand::thread_rng();
    group.bench_function("register_recording_log", |b| {
        b.iter(|| {
            let property = random_property(&mut rng);
            rt.block_on(async { black_box(recording.register(property, CONTROLLER).await.is_ok()) })
        })
    });

    let bus = Arc::new(InMemoryEventBus::with_capacity(16));
    let on_bus =
        PropertyRegistryService::new(config(), Arc::new(BusEventLog::new(bus))).expect("registry");
    group.bench_function("register_event_bus", |b| {
        b.iter(|| {
            let property = random_property(&mut rng);
            rt.block_on(async { black_box(on_bus.register(property, CONTROLLER).await.is_ok()) })
        })
    });

    group.bench_function("register_unauthorized", |b| {
        b.iter(|| {
            let property = random_property(&mut rng);
            rt.block_on(async { black_box(recording.register(property, OWNER).await.is_err()) })
        })
    });

    group.finish();
}

fn bench_remove_with_migration(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("registry-remove");

    let registry = PropertyRegistryService::new(config(), Arc::new(InMemoryEventLog::new()))
        .expect("registry");
    let mut rng = rand::thread_rng();
    group.bench_function("register_then_migrate", |b| {
        b.iter(|| {
            let property = random_property(&mut rng);
            rt.block_on(async {
                registry.register(property, CONTROLLER).await.ok();
                black_box(registry.remove(property, true, CONTROLLER).await.is_ok())
            })
        })
    });

    group.finish();
}

// ============================================================================
// Queries
// ============================================================================

fn bench_queries(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("registry-queries");
    let mut rng = rand::thread_rng();

    for size in [100usize, 1_000, 10_000] {
        let registry = PropertyRegistryService::new(config(), Arc::new(InMemoryEventLog::new()))
            .expect("registry");
        let properties: Vec<PropertyId> = (0..size).map(|_| random_property(&mut rng)).collect();
        rt.block_on(async {
            for property in &properties {
                registry.register(*property, CONTROLLER).await.ok();
            }
        });
        let probe = properties[size / 2];

        group.bench_with_input(BenchmarkId::new("is_relevant", size), &size, |b, _| {
            b.iter(|| rt.block_on(async { black_box(registry.is_relevant(&probe).await) }))
        });

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list_relevant", size), &size, |b, _| {
            b.iter(|| rt.block_on(async { black_box(registry.list_relevant().await.len()) }))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_register,
    bench_remove_with_migration,
    bench_queries
);
criterion_main!(benches);
