use std::hash::Hasher;

use ropey::Rope;
use twox_hash::XxHash64;

/// Hash of the text, independent of how the rope happens to be chunked.
pub(crate) fn rope_hash(text: &Rope) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for chunk in text.chunks() {
        hasher.write(chunk.as_bytes());
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_follows_text_not_chunking() {
        let whole = Rope::from_str("const x = 1;\ndisplay(x);");
        let mut built = Rope::from_str("display(x);");
        built.insert(0, "const x = 1;\n");
        assert_eq!(rope_hash(&whole), rope_hash(&built));
        assert_ne!(rope_hash(&whole), rope_hash(&Rope::from_str("const x = 2;\ndisplay(x);")));
    }
}
