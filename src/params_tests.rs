//! Tests for params

use super::*;
use proptest::prelude::*;

#[test]
fn test_empty_filter_rejected() {
    assert!(matches!(JqParams::new(""), Err(JqError::EmptyFilter)));
}

#[test]
fn test_whitespace_filter_rejected() {
    assert!(matches!(JqParams::new("  \r\n\t "), Err(JqError::EmptyFilter)));
}

#[test]
fn test_filter_kept_verbatim() {
    let params = JqParams::new("  .name\n").unwrap();
    assert_eq!(params.filter(), "  .name\n");
}

#[test]
fn test_raw_output_on_by_default() {
    let params = JqParams::new(".").unwrap();
    assert!(params.flags().raw_output);
    assert!(!params.flags().compact_output);
    assert!(!params.flags().null_input);
    assert_eq!(params.flags().indent, None);
}

#[test]
fn test_with_json_sets_input() {
    let params = JqParams::with_json("{}", ".").unwrap();
    assert_eq!(params.json_input(), Some("{}"));
}

#[test]
fn test_check_input_requires_json_or_null_input() {
    let params = JqParams::new(".").unwrap();
    assert!(matches!(params.check_input(), Err(JqError::MissingInput)));

    let params = JqParams::new(".").unwrap().null_input(true);
    assert!(params.check_input().is_ok());

    let params = JqParams::new(".").unwrap().json("1");
    assert!(params.check_input().is_ok());
}

#[test]
fn test_setters_toggle_flags() {
    let params = JqParams::new(".")
        .unwrap()
        .raw_output(false)
        .compact_output(true)
        .sort_keys(true)
        .tab(true)
        .indent(4);

    let flags = params.flags();
    assert!(!flags.raw_output);
    assert!(flags.compact_output);
    assert!(flags.sort_keys);
    assert!(flags.tab);
    assert_eq!(flags.indent, Some(4));
}

#[test]
fn test_arg_value_serializes_compactly() {
    let value = serde_json::json!({"a": [1, 2]});
    let params = JqParams::new(".").unwrap().arg_value("v", &value);
    assert_eq!(params.args_json().get("v").map(String::as_str), Some(r#"{"a":[1,2]}"#));
}

#[test]
fn test_bindings_keep_insertion_order() {
    let params = JqParams::new(".")
        .unwrap()
        .arg("zeta", "1")
        .arg("alpha", "2")
        .arg("mid", "3");

    let names: Vec<&str> = params.args().iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_rebinding_replaces_in_place() {
    let params = JqParams::new(".")
        .unwrap()
        .arg("a", "1")
        .arg("b", "2")
        .arg("a", "3");

    let entries: Vec<(&str, &String)> = params.args().iter().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], ("a", &"3".to_string()));
    assert_eq!(entries[1], ("b", &"2".to_string()));
}

#[test]
fn test_binding_maps_are_independent() {
    let params = JqParams::new(".")
        .unwrap()
        .arg("x", "s")
        .arg_json("x", "1")
        .slurp_file("x", "a.json")
        .raw_file("x", "b.txt");

    assert_eq!(params.args().len(), 1);
    assert_eq!(params.args_json().len(), 1);
    assert_eq!(params.slurp_files().get("x"), Some(&PathBuf::from("a.json")));
    assert_eq!(params.raw_files().get("x"), Some(&PathBuf::from("b.txt")));
}

#[test]
fn test_bindings_from_iterator() {
    let bindings: Bindings<i32> = vec![("a", 1), ("b", 2), ("a", 5)].into_iter().collect();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings.get("a"), Some(&5));
    assert!(!bindings.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Names stay unique and keep first-insertion order no matter how often
    // they are rebound.
    #[test]
    fn prop_bindings_unique_and_ordered(names in prop::collection::vec("[a-d]", 0..20)) {
        let mut bindings = Bindings::new();
        for (i, name) in names.iter().enumerate() {
            bindings.insert(name.clone(), i);
        }

        let mut expected: Vec<&str> = Vec::new();
        for name in &names {
            if !expected.contains(&name.as_str()) {
                expected.push(name);
            }
        }

        let actual: Vec<&str> = bindings.iter().map(|(n, _)| n).collect();
        prop_assert_eq!(actual, expected);
    }
}
