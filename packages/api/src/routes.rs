use serde::{Deserialize, Serialize};

pub mod admin;
pub mod health;
pub mod orders;
pub mod reviews;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 50;

#[derive(Clone, Deserialize, Serialize, Debug, Default)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// Resolves the raw query parameters into a (skip, limit) pair: pages
    /// are 1-based and the limit is clamped to a sane ceiling.
    pub fn resolve(&self) -> (u64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = self.page.unwrap_or(1).max(1);
        ((page - 1) * limit, limit as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::PaginationParams;

    #[test]
    fn pagination_defaults_and_clamps() {
        let (skip, limit) = PaginationParams::default().resolve();
        assert_eq!((skip, limit), (0, 10));

        let (skip, limit) = PaginationParams {
            page: Some(3),
            limit: Some(20),
        }
        .resolve();
        assert_eq!((skip, limit), (40, 20));

        let (skip, limit) = PaginationParams {
            page: Some(0),
            limit: Some(10_000),
        }
        .resolve();
        assert_eq!((skip, limit), (0, 50));

        let (_, limit) = PaginationParams {
            page: None,
            limit: Some(0),
        }
        .resolve();
        assert_eq!(limit, 1);
    }
}
