/// Re-export `Config` from `initium-core` for use within this crate.
///
/// Environment parsing lives in `initium-core` so integration tests can build
/// a `Config` without depending on the server binary.
pub use initium_core::config::Config;
