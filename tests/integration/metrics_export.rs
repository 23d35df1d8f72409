//! Metric reporting through the Prometheus recorder

use metrics_exporter_prometheus::PrometheusBuilder;
use slabpool::{Bucket, SlabPool};

/// Value of the first sample of `name` carrying all of `labels`
fn sample(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    rendered
        .lines()
        .filter(|line| line.starts_with(name))
        .find(|line| {
            labels
                .iter()
                .all(|(k, v)| line.contains(&format!("{}=\"{}\"", k, v)))
        })
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}

#[test]
fn test_gauges_and_error_counters() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    let pool = metrics::with_local_recorder(&recorder, || {
        SlabPool::new("exported", &[Bucket::new(64, 2), Bucket::new(2048, 1)])
    });

    let gauge = "slabpool_available_buffers_per_slab";
    let errors = "slabpool_errors_total";

    let rendered = handle.render();
    assert_eq!(sample(&rendered, gauge, &[("slab", "64 B")]), Some(0.0));
    assert_eq!(sample(&rendered, gauge, &[("slab", "2.0 kB")]), Some(0.0));

    let buf = pool.get(8).unwrap();
    let _other = pool.get(8).unwrap();
    assert!(pool.get(8).is_err());
    assert!(pool.get(4096).is_err());

    let rendered = handle.render();
    assert_eq!(sample(&rendered, gauge, &[("pool", "exported"), ("slab", "64 B")]), Some(0.0));
    assert_eq!(
        sample(&rendered, errors, &[("scope", "64 B"), ("reason", "slab-exhausted")]),
        Some(1.0)
    );
    assert_eq!(
        sample(&rendered, errors, &[("scope", "pool"), ("reason", "size-exceeded")]),
        Some(1.0)
    );

    pool.put(buf).unwrap();
    let rendered = handle.render();
    assert_eq!(sample(&rendered, gauge, &[("slab", "64 B")]), Some(1.0));
    assert_eq!(sample(&rendered, gauge, &[("slab", "2.0 kB")]), Some(0.0));
}
