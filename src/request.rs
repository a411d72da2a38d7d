use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    // Pages are 1-based; a zero or negative page would otherwise reach
    // Postgres as a negative OFFSET.
    pub fn offset(&self) -> Result<i64, Error> {
        if self.page < 1 || self.size < 1 {
            return Err(Error::BusinessError("page and size must be positive".into()));
        }
        Ok((self.page - 1) * self.size)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(Pagination { page: 1, size: 20 }.offset().unwrap(), 0);
        assert_eq!(Pagination { page: 3, size: 10 }.offset().unwrap(), 20);
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(Pagination { page: 0, size: 20 }.offset().is_err());
    }

    #[test]
    fn test_nonpositive_size_rejected() {
        assert!(Pagination { page: 1, size: 0 }.offset().is_err());
        assert!(Pagination { page: 1, size: -5 }.offset().is_err());
    }
}
