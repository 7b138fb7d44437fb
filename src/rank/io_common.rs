use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use pairwise_ranking::Item;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// A readable id for a new item, derived from its title and unique in the list.
pub fn make_item_id(title: &str, items: &[Item]) -> String {
    let mut slug = String::new();
    for c in title.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug = "item".to_string();
    }
    let taken = |id: &str| items.iter().any(|it| it.id == id);
    if !taken(&slug) {
        return slug;
    }
    let mut suffix = 2;
    while taken(&format!("{}-{}", slug, suffix)) {
        suffix += 1;
    }
    format!("{}-{}", slug, suffix)
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
