//! Straight-line test-script usage against a stub devkit.
//!
//! This is the calling convention real test suites use: every command
//! is a plain blocking call, with the bridge's runtime servicing the
//! transport underneath.

mod common;

use std::time::{Duration, Instant};

use anyhow::Result;
use ps_remote::{BlockingRemote, ConnectOptions, Error, LogicalKey, WaitOptions};
use serde_json::json;

use common::StubDevice;

fn fast_options() -> ConnectOptions {
    ConnectOptions::new()
        .with_command_delay(Duration::ZERO)
        .with_connect_timeout(Duration::from_secs(5))
}

#[test]
fn scripted_session_runs_in_program_order() -> Result<()> {
    let mut remote = BlockingRemote::with_builtin_extensions()?;

    // The stub needs a runtime to start on; borrow the bridge's.
    let device = remote.bridge().run_blocking(StubDevice::start());

    remote.connect(&device.address(), "inspector", &fast_options())?;

    remote.press(LogicalKey::Down)?;
    remote.press(LogicalKey::Cross)?;
    remote.wait(Duration::from_millis(20));
    assert_eq!(remote.evaluate("1+1")?, json!(2));

    remote.disconnect()?;
    remote.disconnect()?; // second disconnect is a no-op

    // One script per press, plus the evaluation
    let scripts = device.evaluated_scripts();
    assert_eq!(scripts.len(), 3);
    assert!(scripts[0].contains("keyCode = 141;"));
    assert!(scripts[1].contains("keyCode = 13;"));
    assert_eq!(scripts[2], "1+1");
    Ok(())
}

#[test]
fn wait_for_timeout_is_bounded() -> Result<()> {
    let mut remote = BlockingRemote::with_builtin_extensions()?;
    let device = remote.bridge().run_blocking(StubDevice::start());

    remote.connect(&device.address(), "inspector", &fast_options())?;

    let started = Instant::now();
    let err = remote
        .wait_for(
            "window.neverTrue",
            "stub condition",
            WaitOptions::default()
                .with_timeout(Duration::from_millis(200))
                .with_poll_interval(Duration::from_millis(10)),
        )
        .unwrap_err();

    assert!(matches!(err, Error::WaitTimeout { .. }));
    assert!(started.elapsed() >= Duration::from_millis(200));

    remote.disconnect()?;
    Ok(())
}

#[test]
fn unsupported_key_is_fatal_from_script_code() -> Result<()> {
    let mut remote = BlockingRemote::with_builtin_extensions()?;
    let device = remote.bridge().run_blocking(StubDevice::start());

    remote.connect(&device.address(), "inspector", &fast_options())?;

    let err = remote.press(LogicalKey::Playstation).unwrap_err();
    assert!(matches!(err, Error::UnsupportedKey { .. }));

    // Nothing reached the device
    assert!(device.evaluated_scripts().is_empty());

    remote.disconnect()?;
    Ok(())
}
