#![allow(missing_docs)]
//! End-to-end structured decoding: `beginObject`/`beginArray`, path
//! progression, and the typed scalar accessors.

use jsonmodem::{JsonReader, ReaderOptions, SliceSource, TokenKind};

fn reader(input: &str) -> JsonReader<SliceSource> {
    JsonReader::new(SliceSource::new(input.as_bytes()), ReaderOptions::default())
}

#[test]
fn array_of_longs_with_path_progression() {
    let mut r = reader("[1, 2, 3]");
    r.begin_array().unwrap();
    assert_eq!(r.path().as_str(), "$[0]");
    assert_eq!(r.next_long().unwrap(), 1);
    assert_eq!(r.path().as_str(), "$[1]");
    assert_eq!(r.next_long().unwrap(), 2);
    assert_eq!(r.path().as_str(), "$[2]");
    assert_eq!(r.next_long().unwrap(), 3);
    r.end_array().unwrap();
}

#[test]
fn nested_object_and_array_decoding() {
    let mut r = reader(r#"{"name":"ann","tags":["a","b"],"age":30,"ok":true,"extra":null}"#);
    r.begin_object().unwrap();

    assert_eq!(&*r.next_name().unwrap(), "name");
    assert_eq!(r.next_string().unwrap(), "ann");

    assert_eq!(&*r.next_name().unwrap(), "tags");
    r.begin_array().unwrap();
    assert_eq!(r.next_string().unwrap(), "a");
    assert_eq!(r.next_string().unwrap(), "b");
    r.end_array().unwrap();

    assert_eq!(&*r.next_name().unwrap(), "age");
    assert_eq!(r.next_long().unwrap(), 30);

    assert_eq!(&*r.next_name().unwrap(), "ok");
    assert!(r.next_boolean().unwrap());

    assert_eq!(&*r.next_name().unwrap(), "extra");
    r.next_null().unwrap();

    r.end_object().unwrap();
    assert_eq!(r.peek().unwrap(), TokenKind::EndDocument);
}

#[test]
fn skip_value_traverses_nested_structure() {
    let mut r = reader(r#"{"a":{"b":[1,2,{"c":3}]},"d":4}"#);
    r.begin_object().unwrap();
    assert_eq!(&*r.next_name().unwrap(), "a");
    r.skip_value().unwrap();
    assert_eq!(&*r.next_name().unwrap(), "d");
    assert_eq!(r.next_long().unwrap(), 4);
    r.end_object().unwrap();
}

#[test]
fn skip_name_stamps_null_path_component() {
    let mut r = reader(r#"{"secret":1,"public":2}"#);
    r.begin_object().unwrap();
    r.skip_name().unwrap();
    assert_eq!(r.path().as_str(), "$.null");
    assert_eq!(r.next_long().unwrap(), 1);
    assert_eq!(&*r.next_name().unwrap(), "public");
    assert_eq!(r.next_long().unwrap(), 2);
    r.end_object().unwrap();
}

#[test]
fn select_name_matches_known_key_without_raising_on_miss() {
    let mut r = reader(r#"{"b":2,"a":1}"#);
    r.begin_object().unwrap();
    let options: [&[u8]; 2] = [b"a\"", b"b\""];
    assert_eq!(r.select_name(&options).unwrap(), Some(1));
    assert_eq!(r.next_long().unwrap(), 2);
    // "a" isn't in the caller's expected set this time; select_name misses
    // without raising, and the caller can still read the name normally.
    let empty: [&[u8]; 0] = [];
    assert_eq!(r.select_name(&empty).unwrap(), None);
    assert_eq!(&*r.next_name().unwrap(), "a");
    assert_eq!(r.next_long().unwrap(), 1);
    r.end_object().unwrap();
}

#[test]
fn promote_name_to_value_reads_a_non_string_map_key() {
    let mut r = reader(r#"{"42":"v"}"#);
    r.begin_object().unwrap();
    r.promote_name_to_value().unwrap();
    assert_eq!(r.next_int().unwrap(), 42);
    assert_eq!(r.next_string().unwrap(), "v");
    r.end_object().unwrap();
}

#[test]
fn number_classification_matches_spec_table() {
    assert_eq!(reader("0").next_long().unwrap(), 0);
    assert!(matches!(reader("-0").peek().unwrap(), TokenKind::Number));
    assert_eq!(
        reader("9223372036854775807").next_long().unwrap(),
        i64::MAX
    );
    assert!(reader("9223372036854775808").next_long().is_err());
    assert_eq!(
        reader("-9223372036854775808").next_long().unwrap(),
        i64::MIN
    );
    assert!(reader("01").peek().is_err());
    assert!((reader("1e2").next_double().unwrap() - 100.0).abs() < f64::EPSILON);
    assert!((reader("1.5").next_double().unwrap() - 1.5).abs() < f64::EPSILON);
    assert!(reader("1.").peek().is_err());
    assert!(reader(".5").peek().is_err());
    assert!(reader("1e").peek().is_err());
}

#[test]
fn deeply_nested_structure_rejects_past_the_depth_ceiling() {
    let mut input = String::new();
    for _ in 0..300 {
        input.push('[');
    }
    let mut r = reader(&input);
    let mut err = None;
    for _ in 0..300 {
        if let Err(e) = r.begin_array() {
            err = Some(e);
            break;
        }
    }
    assert!(err.is_some(), "expected a nesting-too-deep error");
}

#[test]
fn peek_json_forks_an_independent_reader() {
    let mut r = reader("[1,2,3]");
    r.begin_array().unwrap();
    assert_eq!(r.next_long().unwrap(), 1);
    assert_eq!(r.path().as_str(), "$[1]");

    let mut fork = r.peek_json();
    assert_eq!(fork.path().as_str(), "$[1]");

    // Advancing the fork must not move the original.
    assert_eq!(fork.next_long().unwrap(), 2);
    assert_eq!(fork.path().as_str(), "$[2]");
    assert_eq!(r.path().as_str(), "$[1]");

    // Advancing the original from here must not move the fork either; each
    // reads its own remaining "2,3]" independently from the forked offset.
    assert_eq!(r.next_long().unwrap(), 2);
    assert_eq!(r.next_long().unwrap(), 3);
    r.end_array().unwrap();

    assert_eq!(fork.next_long().unwrap(), 3);
    fork.end_array().unwrap();
}

#[test]
fn close_rejects_while_a_value_source_is_open() {
    let mut r = reader(r#"{"k":[1,2,3]}"#);
    r.begin_object().unwrap();
    r.next_name().unwrap();
    {
        let _source = r.next_source().unwrap();
        // dropped unread: `pending_value_source` stays set until the next
        // reader operation drains it, so `close()` must still refuse here.
    }
    assert!(r.close().is_err());
    // Any ordinary operation auto-drains the abandoned sub-source first.
    r.end_object().unwrap();
    r.close().unwrap();
}
