//! Concurrent access to a shared pool

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use slabpool::{Bucket, Buffer, SlabPool};

#[test]
fn test_racing_first_borrows_share_one_initialization() {
    let pool = SlabPool::new("race", &[Bucket::new(256, 16)]);
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let pool = pool.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                pool.get(200).ok()
            })
        })
        .collect();

    let buffers: Vec<Buffer> = handles
        .into_iter()
        .filter_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(buffers.len(), 16);
    assert_eq!(pool.slabs()[0].available(), 0);

    // Every borrower got a distinct allocation
    let distinct: HashSet<*const u8> = buffers.iter().map(|b| b.as_ptr()).collect();
    assert_eq!(distinct.len(), 16);

    for buf in buffers {
        pool.put(buf).unwrap();
    }
    assert_eq!(pool.slabs()[0].available(), 16);
}

#[test]
fn test_contended_churn_never_loses_buffers() {
    let pool = SlabPool::new("churn", &[Bucket::new(64, 3), Bucket::new(1024, 2)]);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let pool = pool.clone();
            thread::spawn(move || {
                let mut served = 0u64;
                let mut exhausted = 0u64;
                for i in 0..2_000 {
                    let size = if (i + worker) % 3 == 0 { 1000 } else { 48 };
                    match pool.get(size) {
                        Ok(mut buf) => {
                            assert!(buf.iter().all(|b| *b == 0));
                            buf.fill(worker as u8 + 1);
                            served += 1;
                            pool.put(buf).unwrap();
                        }
                        Err(_) => exhausted += 1,
                    }
                }
                (served, exhausted)
            })
        })
        .collect();

    let (served, exhausted) = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .fold((0, 0), |acc, (s, e)| (acc.0 + s, acc.1 + e));

    assert_eq!(served + exhausted, 16_000);

    let stats = pool.stats();
    assert_eq!(stats.exhausted(), exhausted);
    assert_eq!(stats.in_use(), 0);
    assert_eq!(stats.slabs[0].available, 3);
    assert_eq!(stats.slabs[1].available, 2);
}
