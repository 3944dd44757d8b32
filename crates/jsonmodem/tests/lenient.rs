#![allow(missing_docs)]
//! Table-driven coverage of the lenient superset: comments,
//! unquoted/single-quoted names and strings, `=`/`=>`/`;` separators, the
//! doubled-comma-as-null rule, and NaN/Infinity literals.

use jsonmodem::{JsonReader, ReaderOptions, SliceSource, TokenKind};
use rstest::rstest;

fn lenient_reader(input: &str) -> JsonReader<SliceSource> {
    JsonReader::new(
        SliceSource::new(input.as_bytes()),
        ReaderOptions {
            lenient: true,
            ..Default::default()
        },
    )
}

#[rstest]
#[case::line_comment("// leading\n[1]", 1)]
#[case::hash_comment("# leading\n[1]", 1)]
#[case::block_comment("/* leading */[1]", 1)]
#[case::interior_line_comment("[1 // trailing\n]", 1)]
fn comment_flavors_are_skipped(#[case] input: &str, #[case] expected_len: usize) {
    let mut r = lenient_reader(input);
    r.begin_array().unwrap();
    let mut count = 0;
    while r.has_next().unwrap() {
        r.next_long().unwrap();
        count += 1;
    }
    r.end_array().unwrap();
    assert_eq!(count, expected_len);
}

#[test]
fn unterminated_block_comment_is_an_error() {
    let mut r = lenient_reader("/* never closes");
    assert!(r.peek().is_err());
}

#[rstest]
#[case::colon("{a:1}")]
#[case::equals("{a=1}")]
#[case::fat_arrow("{a=>1}")]
fn object_separator_variants_are_accepted(#[case] input: &str) {
    let mut r = lenient_reader(input);
    r.begin_object().unwrap();
    assert_eq!(&*r.next_name().unwrap(), "a");
    assert_eq!(r.next_long().unwrap(), 1);
    r.end_object().unwrap();
}

#[rstest]
#[case::unquoted_name("{a:1}")]
#[case::single_quoted_name("{'a':1}")]
#[case::double_quoted_name(r#"{"a":1}"#)]
fn name_quoting_flavors_all_decode_to_the_same_text(#[case] input: &str) {
    let mut r = lenient_reader(input);
    r.begin_object().unwrap();
    assert_eq!(&*r.next_name().unwrap(), "a");
    r.next_long().unwrap();
    r.end_object().unwrap();
}

#[rstest]
#[case::unquoted_string("[abc]", "abc")]
#[case::single_quoted_string("['abc']", "abc")]
#[case::double_quoted_string(r#"["abc"]"#, "abc")]
fn string_quoting_flavors_all_decode_to_the_same_text(#[case] input: &str, #[case] expected: &str) {
    let mut r = lenient_reader(input);
    r.begin_array().unwrap();
    assert_eq!(r.next_string().unwrap(), expected);
    r.end_array().unwrap();
}

#[test]
fn semicolon_substitutes_for_comma_in_arrays_and_objects() {
    let mut r = lenient_reader("[1;2;3]");
    r.begin_array().unwrap();
    assert_eq!(r.next_long().unwrap(), 1);
    assert_eq!(r.next_long().unwrap(), 2);
    assert_eq!(r.next_long().unwrap(), 3);
    r.end_array().unwrap();

    let mut r = lenient_reader("{a:1;b:2}");
    r.begin_object().unwrap();
    assert_eq!(&*r.next_name().unwrap(), "a");
    assert_eq!(r.next_long().unwrap(), 1);
    assert_eq!(&*r.next_name().unwrap(), "b");
    assert_eq!(r.next_long().unwrap(), 2);
    r.end_object().unwrap();
}

#[rstest]
#[case::middle_gap("[1,,3]")]
#[case::leading_gap("[,1]")]
#[case::trailing_gap_before_close("[1,]")]
fn doubled_or_dangling_comma_becomes_a_null_element(#[case] input: &str) {
    let mut r = lenient_reader(input);
    r.begin_array().unwrap();
    while r.has_next().unwrap() {
        match r.peek().unwrap() {
            TokenKind::Null => r.next_null().unwrap(),
            _ => {
                r.next_long().unwrap();
            }
        }
    }
    r.end_array().unwrap();
}

#[test]
fn leading_and_middle_gaps_both_become_null_elements() {
    // spec.md §8's literal example: three elements, null/null/3.
    let mut r = lenient_reader("[, , 3]");
    r.begin_array().unwrap();
    assert_eq!(r.peek().unwrap(), TokenKind::Null);
    r.next_null().unwrap();
    assert_eq!(r.peek().unwrap(), TokenKind::Null);
    r.next_null().unwrap();
    assert_eq!(r.next_long().unwrap(), 3);
    r.end_array().unwrap();
}

#[rstest]
#[case::nan("NaN")]
#[case::positive_infinity("Infinity")]
#[case::negative_infinity("-Infinity")]
fn non_finite_number_literals_are_accepted_when_lenient(#[case] input: &str) {
    let mut r = lenient_reader(input);
    let value = r.next_double().unwrap();
    assert!(value.is_nan() || value.is_infinite());
}

#[test]
fn non_finite_literals_are_rejected_outside_lenient_mode() {
    let mut r = JsonReader::new(SliceSource::new(b"NaN"), ReaderOptions::default());
    assert!(r.peek().is_err());
}

#[test]
fn lenient_mode_accepts_concatenated_top_level_values() {
    let mut r = lenient_reader("1 2");
    assert_eq!(r.next_long().unwrap(), 1);
    assert_eq!(r.next_long().unwrap(), 2);
}

#[test]
fn strict_mode_rejects_a_second_top_level_value() {
    let mut r = JsonReader::new(SliceSource::new(b"1 2"), ReaderOptions::default());
    assert_eq!(r.next_long().unwrap(), 1);
    assert!(r.peek().is_err());
}
