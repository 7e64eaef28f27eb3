//! Pager arithmetic

use crate::core::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Requested page, always within bounds once constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based
    pub index: u32,
    pub size: u32,
}

impl Page {
    /// Clamp raw values: index to `>= 1`, size to `1..=max_size`
    pub fn new(index: u64, size: u64, limits: &PageLimits) -> Self {
        let max = limits.max_size();
        Self {
            index: index.clamp(1, u32::MAX as u64) as u32,
            size: size.clamp(1, max as u64) as u32,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.index as i64 - 1) * self.size as i64
    }

    pub fn limit(&self) -> i64 {
        self.size as i64
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size as u64)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            index: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Configured page size policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    max_size: u32,
}

impl PageLimits {
    /// `max_size` is capped at [`MAX_PAGE_SIZE`]; `default_size` is clamped into `1..=max_size`
    pub fn new(default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            default_size: default_size.clamp(1, max_size),
            max_size,
        }
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}
