//! Hash maps keyed by identifiers. Names are short and never attacker
//! chosen, so FxHash replaces SipHash.

pub type FastHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[inline]
pub fn fast_hash_map_new<K, V>() -> FastHashMap<K, V> {
    FastHashMap::default()
}
