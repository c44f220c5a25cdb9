//! Unopinionated standalone utilities.

mod geom;
pub use geom::{VecExt, DIR_8};

mod heap;
pub use heap::{FibHeap, Handle, HeapError};

mod path;
pub use path::dijkstra_map;

mod rng;
pub use rng::srng;

mod text;
pub use text::StrExt;

pub type FastHasher = rustc_hash::FxHasher;

/// Map with an efficient hash function.
pub use rustc_hash::FxHashMap as HashMap;

/// Set with an efficient hash function.
pub use rustc_hash::FxHashSet as HashSet;

/// Good default concrete rng.
pub type GameRng = rand_xorshift::XorShiftRng;
