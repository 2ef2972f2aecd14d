//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `daybook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("daybook_core ping={}", daybook_core::ping());
    println!("daybook_core version={}", daybook_core::core_version());
}
