use alloc::string::String;

/// Joins two dotted path segments, empty segments are skipped.
pub(super) fn join_path(base: &str, key: &str) -> String {
    match (base.is_empty(), key.is_empty()) {
        (true, _) => String::from(key),
        (false, true) => String::from(base),
        (false, false) => {
            let mut path = String::with_capacity(base.len() + key.len() + 1);
            path.push_str(base);
            path.push('.');
            path.push_str(key);
            path
        }
    }
}
