//! Seeds for chance nodes.
//!
//! Every simulated turn inside a search gets its own random stream. Seeds
//! are derived from the parent node's seed and the path taken to reach the
//! child, so the same node always sees the same outcomes no matter which
//! search visits it or in what order, while sibling samples and sibling
//! branches draw independent streams.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// The SplitMix64 finalizer.
pub const fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn mix(seed: u64, value: u64) -> u64 {
    splitmix64(seed ^ splitmix64(value))
}

/// Seed of the chance node reached by playing my candidate `mine` against
/// the opponent's candidate `theirs`.
pub fn child_seed(parent: u64, mine: usize, theirs: usize) -> u64 {
    mix(mix(parent, (mine as u64) << 1), ((theirs as u64) << 1) | 1)
}

/// Seed of the `sample`-th outcome drawn at a chance node.
pub fn sample_seed(node: u64, sample: usize) -> u64 {
    mix(node ^ 0xA076_1D64_78BD_642F, sample as u64)
}

/// Random source for one simulated turn.
pub fn sample_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
