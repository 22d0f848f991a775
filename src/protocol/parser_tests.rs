//! Tests for the wire command tokenizer

use super::parser::parse_command;
use super::ParseError;

#[test]
fn parses_verb_and_integer_args() {
    let cmd = parse_command("move_to(10,20,500)").unwrap();
    assert_eq!(cmd.verb, "move_to");
    assert_eq!(cmd.args, vec!["10", "20", "500"]);
}

#[test]
fn parses_zero_arguments() {
    let cmd = parse_command("get_camera_position()").unwrap();
    assert_eq!(cmd.verb, "get_camera_position");
    assert!(cmd.args.is_empty());
}

#[test]
fn accepts_trailing_semicolon() {
    let cmd = parse_command("test_echo(hello);").unwrap();
    assert_eq!(cmd.verb, "test_echo");
    assert_eq!(cmd.args, vec!["hello"]);
}

#[test]
fn trims_surrounding_whitespace() {
    let cmd = parse_command("  move_by( 5 , -3 , 100 )\n").unwrap();
    assert_eq!(cmd.verb, "move_by");
    assert_eq!(cmd.args, vec!["5", "-3", "100"]);
}

#[test]
fn unquotes_double_quoted_arguments() {
    let cmd = parse_command("set_camera_names(\"Cam 1\", \"Cam 2\")").unwrap();
    assert_eq!(cmd.args, vec!["Cam 1", "Cam 2"]);
}

#[test]
fn quoted_content_is_trimmed() {
    let cmd = parse_command("set_camera_names(\"  Cam 1  \")").unwrap();
    assert_eq!(cmd.args, vec!["Cam 1"]);
}

#[test]
fn unmatched_quote_passes_through() {
    let cmd = parse_command("test_echo(\"half quoted)").unwrap();
    assert_eq!(cmd.args, vec!["\"half quoted"]);
}

#[test]
fn trailing_comma_drops_empty_final_argument() {
    let cmd = parse_command("set_camera_names(a,b,)").unwrap();
    assert_eq!(cmd.args, vec!["a", "b"]);
}

#[test]
fn interior_empty_arguments_survive() {
    let cmd = parse_command("test_echo(a,,b)").unwrap();
    assert_eq!(cmd.args, vec!["a", "", "b"]);
}

#[test]
fn bare_word_is_malformed() {
    assert_eq!(
        parse_command("foo"),
        Err(ParseError::Malformed("foo".to_string()))
    );
}

#[test]
fn missing_close_paren_is_malformed() {
    assert!(parse_command("move_to(10,20,500").is_err());
}

#[test]
fn trailing_garbage_is_malformed() {
    assert!(parse_command("move_to(10,20,500)x").is_err());
    assert!(parse_command("move_to(10,20,500); extra").is_err());
}

#[test]
fn verb_with_space_is_malformed() {
    assert!(parse_command("move to(1,2,3)").is_err());
}

#[test]
fn empty_line_is_malformed() {
    assert!(parse_command("").is_err());
    assert!(parse_command("   ").is_err());
}
