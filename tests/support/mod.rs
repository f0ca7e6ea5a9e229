// tests/support/mod.rs
// Shared by several test binaries; each one uses a different subset.
#[allow(dead_code, unused_imports)]
pub mod helpers;

#[allow(dead_code, unused_imports)]
pub mod memory;

#[allow(dead_code, unused_imports)]
pub mod mocks;

#[allow(unused_imports)]
pub use helpers::*;
#[allow(unused_imports)]
pub use memory::*;
#[allow(unused_imports)]
pub use mocks::*;
