use std::time::Duration;

use pretty_assertions::assert_eq;
use rvsdb_core::stats::SimStats;

fn report(stats: &SimStats) -> String {
    let mut out = Vec::new();
    stats.print(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_frequency() {
    let stats = SimStats {
        host_time: Duration::from_micros(500),
        instructions_retired: 1000,
    };
    assert_eq!(stats.host_us(), 500);
    assert_eq!(stats.frequency(), Some(2_000_000));
    assert_eq!(
        report(&stats),
        "host time spent = 500 us\n\
         total guest instructions = 1000\n\
         simulation frequency = 2000000 inst/s\n"
    );
}

#[test]
fn test_sub_microsecond_run() {
    let stats = SimStats {
        host_time: Duration::from_nanos(900),
        instructions_retired: 4,
    };
    assert_eq!(stats.frequency(), None);
    assert!(report(&stats).ends_with(
        "Finish running in less than 1 us and can not calculate the simulation frequency\n"
    ));
}
