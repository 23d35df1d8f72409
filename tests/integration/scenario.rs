//! End-to-end borrow/return behavior through the public API

use slabpool::{Bucket, Buffer, PoolError, PutError, SlabPool};

fn available(pool: &SlabPool) -> Vec<usize> {
    pool.slabs().iter().map(|s| s.available()).collect()
}

/// Two-slab walkthrough: fill the small slab, overflow the pool, recycle
#[test]
fn test_two_slab_walkthrough() {
    let pool = SlabPool::new("scenario", &[Bucket::new(64, 2), Bucket::new(256, 1)]);

    let a = pool.get(10).unwrap();
    assert_eq!((a.capacity(), a.len()), (64, 10));

    let b = pool.get(64).unwrap();
    assert_eq!((b.capacity(), b.len()), (64, 64));
    assert_eq!(pool.slabs()[0].available(), 0);

    assert!(matches!(pool.get(10), Err(PoolError::SlabExhausted { .. })));
    assert!(matches!(
        pool.get(300),
        Err(PoolError::SizeExceeded {
            requested: 300,
            largest: 256
        })
    ));

    pool.put(a).unwrap();
    assert_eq!(pool.slabs()[0].available(), 1);

    let c = pool.get(5).unwrap();
    assert_eq!(c.capacity(), 64);
    assert_eq!(c.len(), 5);

    pool.put(b).unwrap();
    pool.put(c).unwrap();
    assert_eq!(pool.slabs()[0].available(), 2);
}

#[test]
fn test_exhaustion_admits_exactly_count() {
    let pool = SlabPool::new("exhaustion", &[Bucket::new(128, 5)]);

    let mut held: Vec<Buffer> = (0..5).map(|_| pool.get(100).unwrap()).collect();
    assert!(pool.get(1).is_err());

    pool.put(held.pop().unwrap()).unwrap();
    held.push(pool.get(1).unwrap());
    assert!(pool.get(1).is_err());

    let stats = pool.stats();
    assert_eq!(stats.exhausted(), 2);
    assert_eq!(stats.in_use(), 5);
}

#[test]
fn test_zeroed_after_previous_tenant() {
    let pool = SlabPool::new("zero", &[Bucket::new(64, 1), Bucket::new(512, 1)]);

    // (slab size, shorter request routed to the same slab)
    for (size, short) in [(64, 1), (512, 65)] {
        let mut buf = pool.get(size).unwrap();
        buf.fill(0x5A);
        pool.put(buf).unwrap();

        let mut buf = pool.get(short).unwrap();
        assert_eq!(buf.capacity(), size);
        buf.set_len(buf.capacity());
        assert!(buf.iter().all(|b| *b == 0), "slab {} leaked data", size);
        pool.put(buf).unwrap();
    }
}

#[test]
fn test_round_trip_keeps_slab() {
    let pool = SlabPool::new(
        "round-trip",
        &[Bucket::new(32, 1), Bucket::new(1024, 1), Bucket::new(8192, 1)],
    );

    let buf = pool.get(700).unwrap();
    let origin = buf.origin().unwrap();
    assert_eq!(buf.capacity(), 1024);
    pool.put(buf).unwrap();

    let again = pool.get(33).unwrap();
    assert_eq!(again.capacity(), 1024);
    assert_eq!(again.origin(), Some(origin));
}

#[test]
fn test_size_exceeded_touches_nothing() {
    let pool = SlabPool::new("exceeded", &[Bucket::new(64, 1), Bucket::new(256, 1)]);
    let before = available(&pool);

    for size in [257, 1000, usize::MAX] {
        assert!(matches!(pool.get(size), Err(PoolError::SizeExceeded { .. })));
    }

    assert_eq!(available(&pool), before);
    assert!(pool.slabs().iter().all(|s| !s.is_initialized()));
    assert_eq!(pool.stats().size_exceeded, 3);
}

#[test]
fn test_unrelated_buffers_rejected() {
    let pool = SlabPool::new("owner", &[Bucket::new(64, 2), Bucket::new(256, 2)]);
    let stranger = SlabPool::new("stranger", &[Bucket::new(64, 1), Bucket::new(100, 1)]);
    for slab in pool.slabs() {
        slab.ensure_initialized();
    }
    let before = available(&pool);

    // Capacity matching no slab
    let odd = stranger.get(100).unwrap();
    let err = pool.put(odd).unwrap_err();
    assert!(matches!(err, PutError::NotOwned(_)));
    let odd = err.into_buffer();
    assert_eq!(odd.capacity(), 100);

    // Same capacity, different pool
    let lookalike = stranger.get(64).unwrap();
    let lookalike = pool.put(lookalike).unwrap_err().into_buffer();

    // Never pooled at all
    assert!(pool.put(Buffer::unpooled(64)).is_err());

    assert_eq!(available(&pool), before);
    stranger.put(odd).unwrap();
    stranger.put(lookalike).unwrap();
}
