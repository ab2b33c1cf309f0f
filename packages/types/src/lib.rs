//! Shared primitives for the Glowcart workspace: error handling, id
//! generation and JSON helpers. Every other crate in the workspace pulls
//! these from here instead of depending on the underlying crates directly.

pub use anyhow::{Context, Error, Result, anyhow, bail};
pub use rand;
pub use serde_json::Value;

pub mod json {
    pub use serde_json::{from_slice, from_str, from_value, json, to_string, to_value, to_vec};
}

/// Generates a new globally unique identifier for a stored document.
pub fn create_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::create_id;

    #[test]
    fn ids_are_unique_and_url_safe() {
        let a = create_id();
        let b = create_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
