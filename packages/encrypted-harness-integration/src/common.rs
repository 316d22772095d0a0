#![allow(dead_code)]

use encrypted_harness::{Error, HarnessConfig};
use std::sync::OnceLock;

static CONFIG: OnceLock<HarnessConfig> = OnceLock::new();

///
/// Harness configuration, loaded once per test binary.
///
/// Panics if `DATABASE_URL` is not set.
/// libtest has no run-level setup, so every test that calls this fails on its own
/// with the same message rather than the run stopping once.
///
pub fn config() -> HarnessConfig {
    CONFIG
        .get_or_init(|| match HarnessConfig::load() {
            Ok(config) => config,
            Err(err) => panic!("{err}"),
        })
        .clone()
}

pub fn trace() {
    encrypted_harness::init(config().log);
}

///
/// Fail the test with every failed mode in the message.
///
pub fn assert_modes_passed(result: Result<(), Error>) {
    if let Err(err) = result {
        panic!("{err}");
    }
}
