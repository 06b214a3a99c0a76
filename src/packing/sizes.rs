/// Largest atlas dimension the packer will ever produce
pub const MAX_ATLAS_SIZE: u32 = 4096;

/// Every dimension an atlas side may take, ascending
pub const SUPPORTED_SIZES: [u32; 13] = [1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

pub fn is_supported_size(size: u32) -> bool {
    SUPPORTED_SIZES.contains(&size)
}

/// Smallest supported size that is at least `required` and at most `max`.
///
/// Returns `None` when `required` is larger than every allowed size.
pub fn fit_size(required: u32, max: u32) -> Option<u32> {
    SUPPORTED_SIZES
        .iter()
        .copied()
        .take_while(|&size| size <= max)
        .find(|&size| size >= required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_size() {
        assert_eq!(fit_size(0, MAX_ATLAS_SIZE), Some(1));
        assert_eq!(fit_size(1, MAX_ATLAS_SIZE), Some(1));
        assert_eq!(fit_size(3, MAX_ATLAS_SIZE), Some(4));
        assert_eq!(fit_size(12, MAX_ATLAS_SIZE), Some(16));
        assert_eq!(fit_size(100, MAX_ATLAS_SIZE), Some(128));
        assert_eq!(fit_size(1024, MAX_ATLAS_SIZE), Some(1024));
        assert_eq!(fit_size(4096, MAX_ATLAS_SIZE), Some(4096));
    }

    #[test]
    fn test_fit_size_over_limit() {
        assert_eq!(fit_size(4097, MAX_ATLAS_SIZE), None);
        assert_eq!(fit_size(65, 64), None);
        assert_eq!(fit_size(64, 64), Some(64));
    }

    #[test]
    fn test_is_supported_size() {
        assert!(is_supported_size(1));
        assert!(is_supported_size(256));
        assert!(is_supported_size(4096));
        assert!(!is_supported_size(0));
        assert!(!is_supported_size(100));
        assert!(!is_supported_size(8192));
    }
}
