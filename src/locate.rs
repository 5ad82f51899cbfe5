// SPDX-License-Identifier: MPL-2.0

//! Best-effort geolocation tagging.
//!
//! The user can configure an external command whose stdout is a latitude
//! and longitude ("52.52 13.40").  Running it is bounded by a timeout and
//! every failure mode - no command configured, spawn error, timeout, bad
//! output - degrades to `None`.  Stint logging never waits on this beyond
//! the timeout and never fails because of it.

use std::process::Command;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Runs `command` through the shell and waits at most `timeout` for a
/// parsable location on its stdout.
pub fn current_location(command: &str, timeout: Duration) -> Option<Location> {
    let (sender, receiver) = mpsc::channel();
    let command = command.to_owned();

    // the child may outlive the timeout; it is detached and its result
    // simply dropped when nobody is listening any more
    thread::spawn(move || {
        let output = Command::new("sh").arg("-c").arg(&command).output();
        let _ = sender.send(output);
    });

    match receiver.recv_timeout(timeout) {
        Ok(Ok(output)) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let location = parse_location(&stdout);
            if location.is_none() {
                log::debug!("location command output not parsable: {stdout:?}");
            }
            location
        }
        Ok(Ok(output)) => {
            log::debug!("location command exited with {}", output.status);
            None
        }
        Ok(Err(err)) => {
            log::debug!("location command could not be run: {err}");
            None
        }
        Err(_) => {
            log::debug!("location command timed out after {timeout:?}");
            None
        }
    }
}

/// Parses "lat lon" with both values finite and in range.
fn parse_location(output: &str) -> Option<Location> {
    let mut parts = output.split_whitespace();
    let latitude: f64 = parts.next()?.parse().ok()?;
    let longitude: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if !latitude.is_finite() || latitude.abs() > 90.0 {
        return None;
    }
    if !longitude.is_finite() || longitude.abs() > 180.0 {
        return None;
    }
    Some(Location {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_latitude_and_longitude() {
        let location = parse_location("52.52 13.405\n").unwrap();
        assert_eq!(location.latitude, 52.52);
        assert_eq!(location.longitude, 13.405);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(parse_location("91.0 13.4"), None);
        assert_eq!(parse_location("52.5 181.0"), None);
        assert_eq!(parse_location("nan 13.4"), None);
    }

    #[test]
    fn rejects_missing_or_excess_fields() {
        assert_eq!(parse_location("52.52"), None);
        assert_eq!(parse_location("52.52 13.4 99.9"), None);
        assert_eq!(parse_location(""), None);
    }

    #[test]
    fn runs_the_configured_command() {
        let location = current_location("echo 48.85 2.35", Duration::from_secs(5)).unwrap();
        assert_eq!(location.latitude, 48.85);
        assert_eq!(location.longitude, 2.35);
    }

    #[test]
    fn degrades_to_none_on_timeout() {
        let location = current_location("sleep 5", Duration::from_millis(50));
        assert_eq!(location, None);
    }

    #[test]
    fn degrades_to_none_on_failure() {
        let location = current_location("exit 3", Duration::from_secs(5));
        assert_eq!(location, None);
    }
}
