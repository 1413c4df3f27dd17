//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ums_core` linkage.
//! - Print today's Jalali date as a quick calendar sanity check.

use ums_core::{DateAdapter, JalaliDateAdapter, JALALI_CANONICAL_FORMAT};

fn main() {
    let adapter: JalaliDateAdapter = JalaliDateAdapter::new();
    let today = adapter.today();

    println!("ums_core ping={}", ums_core::ping());
    println!("ums_core version={}", ums_core::core_version());
    println!(
        "ums_core today={} ({})",
        adapter.format(&today, JALALI_CANONICAL_FORMAT),
        adapter.to_iso8601(&today)
    );
}
