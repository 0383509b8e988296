//! Dependency-free constants shared by both the library and `build.rs`. Kept in their own module
//! (rather than alongside `BitBoard`) so the build script can `#[path]`-include this file without
//! also having to pull in `bitboard.rs`'s own `crate::square` dependency.

/// The maximum number of playable squares across every supported variant: a 10x10 board has
/// S = 10*10/2 = 50 dark squares, which is the largest board this crate ever builds geometry for.
pub const MAX_SQUARES: usize = 50;
