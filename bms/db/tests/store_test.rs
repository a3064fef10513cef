//! Store behaviour tests for bms-db

use core::sync::atomic::{AtomicU32, Ordering};

use bms_core::{Age, BlockDescriptor, BlockId, DataError, Generation, Tick, TickSource};
use bms_db::Database;

const CELL_VOLTAGES: BlockId = BlockId::new(0);
const SYSTEM_STATE: BlockId = BlockId::new(1);

struct TestClock {
    ticks: AtomicU32,
}

impl TestClock {
    const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    fn set(&self, ticks: u32) {
        self.ticks.store(ticks, Ordering::Relaxed);
    }
}

impl TickSource for TestClock {
    fn now(&self) -> Tick {
        Tick::new(self.ticks.load(Ordering::Relaxed))
    }
}

fn table() -> [BlockDescriptor; 2] {
    [
        BlockDescriptor::new(CELL_VOLTAGES, 64),
        BlockDescriptor::new(SYSTEM_STATE, 8),
    ]
}

fn store() -> Database<TestClock, 2, 72> {
    let store = Database::new(TestClock::new());
    store.register(&table()).unwrap();
    store
}

#[test]
fn cell_voltage_update_cycle() {
    let store = store();

    store.clock().set(100);
    store.write(CELL_VOLTAGES, &[0xAA; 64]).unwrap();

    store.clock().set(105);
    let mut copy = [0u8; 64];
    let snapshot = store.read(CELL_VOLTAGES, &mut copy).unwrap();
    assert_eq!(copy, [0xAA; 64]);
    assert_eq!(snapshot.generation, Generation::new(1));
    assert_eq!(snapshot.age, Age::Ticks(5));

    store.clock().set(106);
    store.write(CELL_VOLTAGES, &[0xBB; 64]).unwrap();

    store.clock().set(107);
    let snapshot = store.read(CELL_VOLTAGES, &mut copy).unwrap();
    assert_eq!(copy, [0xBB; 64]);
    assert_eq!(snapshot.generation, Generation::new(2));
    assert_eq!(snapshot.age, Age::Ticks(1));
}

#[test]
fn fresh_store_serves_zeroed_blocks() {
    let store = store();

    let mut copy = [0x55u8; 8];
    let snapshot = store.read(SYSTEM_STATE, &mut copy).unwrap();
    assert_eq!(copy, [0u8; 8]);
    assert_eq!(snapshot.generation, Generation::ZERO);
    assert!(snapshot.age.is_infinite());
    assert_eq!(store.age_of(SYSTEM_STATE).unwrap(), Age::Infinite);
}

#[test]
fn block_table_is_queryable() {
    let store = store();

    assert_eq!(store.block_count(), 2);
    assert_eq!(store.block_size(CELL_VOLTAGES).unwrap(), 64);
    assert_eq!(store.block_size(SYSTEM_STATE).unwrap(), 8);
    assert_eq!(store.block_size(BlockId::new(2)), Err(DataError::InvalidBlock));
}

#[test]
fn blocks_age_independently() {
    let store = store();

    store.clock().set(10);
    store.write(CELL_VOLTAGES, &[1; 64]).unwrap();
    store.clock().set(30);
    store.write(SYSTEM_STATE, &[2; 8]).unwrap();

    store.clock().set(45);
    assert_eq!(store.age_of(CELL_VOLTAGES).unwrap(), Age::Ticks(35));
    assert_eq!(store.age_of(SYSTEM_STATE).unwrap(), Age::Ticks(15));
}

#[test]
fn unknown_id_accesses_are_counted_store_wide() {
    let store = store();

    let mut copy = [0u8; 4];
    assert_eq!(store.read(BlockId::new(7), &mut copy), Err(DataError::InvalidBlock));
    assert_eq!(store.write(BlockId::new(7), &copy), Err(DataError::InvalidBlock));
    assert_eq!(store.unknown_id_faults(), 2);

    store.reset_diagnostics();
    assert_eq!(store.unknown_id_faults(), 0);
}
