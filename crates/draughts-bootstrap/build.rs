use std::io::Error;

use rand::{rngs::StdRng, Rng, SeedableRng};

// `zobrist.rs` resolves its own `crate::consts::MAX_SQUARES` against whatever crate root it's
// included into — the library when compiled as part of `lib.rs`, this build-script binary here.
// So `consts` has to be included alongside it, not just depended on, for `crate::consts` to
// resolve inside the build script.
#[path = "src/consts.rs"]
mod consts;
#[path = "src/zobrist.rs"]
mod zobrist;

use zobrist::ZobristMap;

// Fixed so the generated keys (and therefore hashes recorded in tests/fixtures) are reproducible
// across builds.
const SEED: u64 = 0xD4A0_9744_91CE_B17E;

fn main() -> Result<(), Error> {
    rustifact::write_const!(
        ZOBRIST,
        ZobristMap,
        StdRng::seed_from_u64(SEED).gen::<ZobristMap>()
    );

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/zobrist.rs");
    println!("cargo:rerun-if-changed=src/consts.rs");

    Ok(())
}
