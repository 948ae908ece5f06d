//! HUD text

/// Score padded to five digits
pub fn format_score(score: u64) -> String {
    format!("{score:05}")
}

/// High score label, e.g. `HI 00420`
pub fn format_high_score(high_score: u64) -> String {
    format!("HI {}", format_score(high_score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "00000");
        assert_eq!(format_score(42), "00042");
        assert_eq!(format_score(123_456), "123456");
    }

    #[test]
    fn test_format_high_score() {
        assert_eq!(format_high_score(0), "HI 00000");
        assert_eq!(format_high_score(420), "HI 00420");
    }
}
