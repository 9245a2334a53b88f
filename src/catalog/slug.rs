/// Derive a URL slug from a display name: lowercase, runs of
/// non-alphanumeric characters collapsed to a single hyphen, no leading
/// or trailing hyphen. Deterministic and idempotent, so slugs can be
/// re-derived on rename without drift.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
