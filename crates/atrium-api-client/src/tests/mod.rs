//! Executor and fallback policy tests.
//!
//! Organization:
//!
//! - `harness.rs`  - scripted transport, recording redirect sink, tokens
//! - `executor.rs` - single-attempt call policies (guards, parsing,
//!                   prefix recovery, 401 side effects)
//! - `fallback.rs` - candidate iteration policies
