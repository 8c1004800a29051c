pub mod temperature {
    pub const SUFFIX: &str = "°C";

    /// Nearest integer, halves rounded up (`-2.5` → `-2`).
    pub fn round(temp: f64) -> i64 {
        (temp + 0.5).floor() as i64
    }

    pub fn display(temp: i64) -> String {
        format!("{temp}{SUFFIX}")
    }

    #[test]
    fn test_round() {
        assert_eq!(round(15.6), 16);
        assert_eq!(round(15.4), 15);
        assert_eq!(round(2.5), 3);
        assert_eq!(round(-2.5), -2);
        assert_eq!(round(-2.6), -3);
    }

    #[test]
    fn test_display() {
        assert_eq!(display(16), "16°C");
        assert_eq!(display(-3), "-3°C");
    }
}
