//! Write/read path benchmarks for the data-block store

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use bms_core::{BlockDescriptor, BlockId, Tick, TickSource};
use bms_db::Database;

const VOLTAGES: BlockId = BlockId::new(0);
const BLOCK_SIZE: usize = 64;

struct FixedClock;

impl TickSource for FixedClock {
    fn now(&self) -> Tick {
        Tick::ZERO
    }
}

static STORE: Database<FixedClock, 1, BLOCK_SIZE> = Database::new(FixedClock);

fn prepare() {
    let table = [BlockDescriptor::new(VOLTAGES, BLOCK_SIZE)];
    // Both benchmark functions share the store; the second register is a no-op.
    let _ = STORE.register(&table);
}

fn write_benchmark(c: &mut Criterion) {
    prepare();
    let payload = [0xA5u8; BLOCK_SIZE];

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Bytes(BLOCK_SIZE as u64));
    group.bench_function("write/64", |b| {
        b.iter(|| STORE.write(VOLTAGES, black_box(&payload)))
    });
    group.finish();
}

fn read_benchmark(c: &mut Criterion) {
    prepare();
    STORE.write(VOLTAGES, &[0x5Au8; BLOCK_SIZE]).unwrap();
    let mut copy = [0u8; BLOCK_SIZE];

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Bytes(BLOCK_SIZE as u64));
    group.bench_function("read/64", |b| {
        b.iter(|| STORE.read(VOLTAGES, black_box(&mut copy)))
    });
    group.finish();
}

criterion_group!(benches, write_benchmark, read_benchmark);
criterion_main!(benches);
