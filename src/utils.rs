/// Width of the rendered book spine, derived from review length and capped
/// so long reviews don't blow up the shelf layout.
pub fn spine_width(review_len: usize) -> f64 {
    (24.0 + review_len as f64 / 5.0).min(64.0)
}

#[cfg(test)]
mod tests {
    use super::spine_width;

    #[test]
    fn test_empty_review() {
        assert_eq!(spine_width(0), 24.0);
    }

    #[test]
    fn test_linear_region() {
        assert_eq!(spine_width(5), 25.0);
        assert_eq!(spine_width(100), 44.0);
        assert_eq!(spine_width(3), 24.6);
    }

    #[test]
    fn test_clamped_at_cap() {
        assert_eq!(spine_width(200), 64.0);
        assert_eq!(spine_width(201), 64.0);
        assert_eq!(spine_width(10_000), 64.0);
    }
}
