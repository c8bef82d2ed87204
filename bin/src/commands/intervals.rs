//! The `intervals` subcommand.

use candela_lib::prelude::*;

/// Prints the supported aggregation intervals.
pub(crate) fn run() {
    println!("{:<6} {:<12} {:>8}", "id", "label", "seconds");
    for interval in Interval::all() {
        println!(
            "{:<6} {:<12} {:>8}",
            interval.as_str(),
            interval.label(),
            interval.seconds()
        );
    }
}
