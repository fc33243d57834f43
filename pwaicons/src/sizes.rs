use crate::IconError;
use anyhow::Result;
use std::collections::HashSet;

/// Icon sizes required by PWA manifests, in display and archive order.
pub const ICON_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

/// File name of the icon for `size`, used both for single downloads and
/// archive entries.
pub fn icon_name(size: u32) -> String {
    format!("icon-{}x{}.png", size, size)
}

/// Ordered set of distinct, positive icon sizes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetSizeSet {
    sizes: Vec<u32>,
}

impl TargetSizeSet {
    pub fn new(sizes: Vec<u32>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(IconError::InvalidSizes("expected at least one size".into()).into());
        }
        if sizes.contains(&0) {
            return Err(IconError::InvalidSizes("sizes must be positive".into()).into());
        }
        let mut seen = HashSet::with_capacity(sizes.len());
        for size in &sizes {
            if !seen.insert(*size) {
                return Err(IconError::InvalidSizes(format!("duplicate size {}", size)).into());
            }
        }
        Ok(Self { sizes })
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.sizes.iter().copied()
    }
}

impl Default for TargetSizeSet {
    fn default() -> Self {
        Self {
            sizes: ICON_SIZES.to_vec(),
        }
    }
}
