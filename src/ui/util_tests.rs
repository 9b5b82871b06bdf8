#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "R$ 1,234.56");
}

#[test]
fn test_format_amount_no_commas() {
    assert_eq!(format_amount(dec!(999.99)), "R$ 999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "R$ 0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-R$ 42.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "R$ 1,234,567.89");
}

#[test]
fn test_format_amount_rounds_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "R$ 1.50");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("Educação física", 8), "Educaçã…");
}

// ── month_label ───────────────────────────────────────────────

#[test]
fn test_month_label() {
    assert_eq!(month_label(2024, 1), "January 2024");
    assert_eq!(month_label(2024, 12), "December 2024");
}

// ── progress_bar ──────────────────────────────────────────────

#[test]
fn test_progress_bar_bounds() {
    assert_eq!(progress_bar(0.0, 4), "[░░░░]");
    assert_eq!(progress_bar(1.0, 4), "[████]");
    assert_eq!(progress_bar(0.5, 4), "[██░░]");
    // Over-limit ratios clamp instead of overflowing the bar.
    assert_eq!(progress_bar(2.5, 4), "[████]");
}

// ── scroll helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_and_up() {
    let (mut index, mut scroll) = (0usize, 0usize);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (1, 0));
    scroll_down(&mut index, &mut scroll, 10, 3);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));

    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (1usize, 0usize);
    scroll_down(&mut index, &mut scroll, 2, 5);
    assert_eq!((index, scroll), (1, 0));
}

#[test]
fn test_scroll_jump_helpers() {
    let (mut index, mut scroll) = (5usize, 3usize);
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));

    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));

    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    assert_eq!((index, scroll), (9, 6));
}
