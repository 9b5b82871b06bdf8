use super::*;

#[test]
fn test_parse_period() {
    assert_eq!(parse_period("2024-06"), Some((2024, 6)));
    assert_eq!(parse_period("2024-6"), Some((2024, 6)));
    assert_eq!(parse_period("2024-12"), Some((2024, 12)));
    assert_eq!(parse_period("2024-13"), None);
    assert_eq!(parse_period("2024-0"), None);
    assert_eq!(parse_period("2024"), None);
    assert_eq!(parse_period("june"), None);
}

#[test]
fn test_shellexpand_passthrough() {
    assert_eq!(shellexpand("/tmp/out.csv"), "/tmp/out.csv");
    assert_eq!(shellexpand("out.csv"), "out.csv");
}

#[test]
fn test_shellexpand_home() {
    std::env::set_var("HOME", "/home/tester");
    assert_eq!(shellexpand("~/out.csv"), "/home/tester/out.csv");
}
