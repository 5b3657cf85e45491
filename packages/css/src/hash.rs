use crc32fast::Hasher;

/// Hash the identity text of a declaration (`selector + property + value`)
/// into a short, stable identifier suitable as a class-name suffix.
pub fn hash(text: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
