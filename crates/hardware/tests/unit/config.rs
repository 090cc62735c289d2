use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rvsdb_core::Config;
use rvsdb_core::common::error::SimError;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(!config.general.batch);
    assert_eq!(config.general.max_inst_to_print, 10);
    assert_eq!(config.memory.base, 0x8000_0000);
    assert_eq!(config.memory.size, 128 * 1024 * 1024);
    assert!(config.trace.itrace);
    assert!(config.trace.ftrace);
    assert!(config.trace.watchpoints);
    assert_eq!(config.trace.iringbuf_size, 32);
    assert_eq!(config.difftest.ref_so, None);
    assert_eq!(config.difftest.port, 1234);
}

#[test]
fn test_empty_document_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.memory.size, Config::default().memory.size);
}

#[test]
fn test_partial_sections() {
    let config = Config::from_json(
        r#"{
            "trace": { "iringbuf_size": 8, "watchpoints": false },
            "difftest": { "ref_so": "/opt/ref.so", "port": 4321 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.trace.iringbuf_size, 8);
    assert!(!config.trace.watchpoints);
    assert!(config.trace.itrace);
    assert_eq!(config.difftest.ref_so, Some(PathBuf::from("/opt/ref.so")));
    assert_eq!(config.difftest.port, 4321);
}

#[test]
fn test_bad_documents() {
    assert!(matches!(Config::from_json("{"), Err(SimError::Config(_))));
    assert!(matches!(
        Config::from_json(r#"{ "memory": { "size": "big" } }"#),
        Err(SimError::Config(_))
    ));
}
