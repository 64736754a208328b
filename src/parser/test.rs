use super::literal::{decode_number, decode_string};
use super::tokenizer::TokenType as TT;
use super::{parse, tokenize_string, Coords, Locatable, Node};
use crate::error::{Error, ErrorKind};
use crate::interpreter::Value;

fn parse_string(input: &str) -> Result<Node, Error> {
    let tokens = tokenize_string(input, "test.jyf")?;
    parse(&tokens)
}

/// The top-level expressions of a program, without the implicit `do` call.
fn program(input: &str) -> Vec<Node> {
    match parse_string(input) {
        Ok(Node::FunCall(call)) => call.args().items().to_vec(),
        other => panic!("\nFailed to parse \"{}\": {:?}\n", input, other.err()),
    }
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    let result_repr = format!("{:?}", program(input));
    assert!(
        result_repr.contains(tree_repr),
        "\nFailed to parse \"{}\":\nexpected \"{}\" somewhere in \"{}\"\n",
        input,
        tree_repr,
        result_repr
    )
}

fn assert_raises_error(input: &str, msg: &str) {
    match parse_string(input) {
        Err(err) => {
            assert_eq!(err.kind, ErrorKind::Parse);
            assert_eq!(msg, err.message.as_str());
        }
        Ok(tree) => panic!("\nExpected \"{}\" to fail, parsed {:?}\n", input, tree),
    }
}

fn types(input: &str) -> Vec<TT> {
    tokenize_string(input, "test.jyf")
        .unwrap()
        .iter()
        .map(|t| t.typ())
        .collect()
}

#[test]
fn test_tokenizer_is_lossless_and_deterministic() {
    let source = "# counter\ndec('x 5)\n\tprint(\"a \\\"b\\\"\" -12.5 'q x)  # done\n";
    let first = tokenize_string(source, "test.jyf").unwrap();
    let second = tokenize_string(source, "test.jyf").unwrap();
    assert_eq!(first, second);
    let rebuilt: String = first.iter().map(|t| t.lexeme()).collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn test_pattern_priority() {
    assert_eq!(types("'foo"), vec![TT::ATOM]);
    assert_eq!(types("-12.5"), vec![TT::NUMBER]);
    assert_eq!(types("+7"), vec![TT::NUMBER]);
    assert_eq!(types("-"), vec![TT::BINDING]);
    assert_eq!(types("foo-1"), vec![TT::BINDING]);
    assert_eq!(types("1+"), vec![TT::NUMBER, TT::BINDING]);
    assert_eq!(types("#x\n"), vec![TT::COMMENT, TT::WHITESPACE]);
    assert_eq!(
        types("f(\"a b\")"),
        vec![TT::BINDING, TT::LPAR, TT::STRING, TT::RPAR]
    );
}

#[test]
fn test_token_coordinates() {
    let tokens = tokenize_string("a\n  bc d", "coords.jyf").unwrap();
    let positions: Vec<(Option<usize>, Option<usize>)> = tokens
        .iter()
        .map(|t| (t.coords().line(), t.coords().column()))
        .collect();
    assert_eq!(
        positions,
        vec![
            (Some(1), Some(1)),
            (Some(1), Some(2)),
            (Some(2), Some(3)),
            (Some(2), Some(5)),
            (Some(2), Some(6)),
        ]
    );
}

#[test]
fn test_program_is_a_call_to_do() {
    match parse_string("x y").unwrap() {
        Node::FunCall(call) => {
            assert!(matches!(call.target(), Node::Binding(s) if s.name() == "do"));
            assert_eq!(call.target().coords(), Coords::Native);
            assert_eq!(call.args().len(), 2);
        }
        other => panic!("expected a call, found {:?}", other),
    }
    assert!(program("").is_empty());
    assert!(program("  # nothing here\n").is_empty());
}

#[test]
fn test_call_structure() {
    let nodes = program("+(1 2)");
    let Node::FunCall(call) = &nodes[0] else {
        panic!("expected a call, found {:?}", nodes[0]);
    };
    assert!(matches!(call.target(), Node::Binding(s) if s.name() == "+"));
    let args: Vec<f64> = call
        .args()
        .items()
        .iter()
        .map(|n| match n {
            Node::Literal(Value::Number(n), _) => *n,
            other => panic!("expected a number, found {:?}", other),
        })
        .collect();
    assert_eq!(args, vec![1.0, 2.0]);
}

#[test]
fn test_expressions() {
    parse_tree_matches("(+ 1 2)", "List([Binding(\"+\"), Number(1.0), Number(2.0)])");
    parse_tree_matches("'abc", "Atom(\"abc\")");
    parse_tree_matches("\"a\\tb\"", "Str(\"a\\tb\")");
    parse_tree_matches("f()", "FunCall(Binding(\"f\"), [])");
    parse_tree_matches("( a  b )", "List([Binding(\"a\"), Binding(\"b\")])");
    parse_tree_matches("(\n  a # first\n  b\n)", "List([Binding(\"a\"), Binding(\"b\")])");
}

#[test]
fn test_curried_calls_associate_left() {
    parse_tree_matches(
        "f(a)(b)",
        "FunCall(FunCall(Binding(\"f\"), [Binding(\"a\")]), [Binding(\"b\")])",
    );
    parse_tree_matches("(f)(x)", "FunCall(List([Binding(\"f\")]), [Binding(\"x\")])");
}

#[test]
fn test_mandatory_whitespace() {
    parse_tree_matches(
        "(+ 1(2))",
        "List([Binding(\"+\"), FunCall(Number(1.0), [Number(2.0)])])",
    );
    parse_tree_matches(
        "(+ 1 (2))",
        "List([Binding(\"+\"), Number(1.0), List([Number(2.0)])])",
    );
    assert_raises_error("(\"a\"b)", "expected <whitespace>, found <binding>");
    assert_raises_error("(a)b", "expected <whitespace>, found <binding>");
    assert_raises_error("'a'b \"x\"'y", "expected <whitespace>, found <atom>");
}

#[test]
fn test_call_coordinates_are_the_argument_list() {
    let nodes = program("  f(x)");
    assert_eq!(nodes[0].coords().column(), Some(4));
}

#[test]
fn test_parse_errors() {
    assert_raises_error("(a b", "unexpected end of file");
    assert_raises_error("f(", "unexpected end of file");
    assert_raises_error(")", "expected <string | number | atom | binding | parenleft>, found <parenright>");
}

#[test]
fn test_parse_error_coordinates() {
    let err = parse_string("(a)\n  )").unwrap_err();
    assert_eq!(err.coords.as_ref().and_then(Coords::line), Some(2));
    assert_eq!(err.coords.as_ref().and_then(Coords::column), Some(3));
    assert!(err.callstack.is_none());
}

#[test]
fn test_pretty_printing() {
    let nodes = program("f('a (b \"c\") 1.5)(g(x))");
    assert_eq!(nodes[0].to_string(), "f('a (b \"c\") 1.5)(g(x))");
}

#[test]
fn test_string_literals_translate_escapes() {
    assert_eq!(decode_string(r#""a\nb""#).unwrap(), "a\nb");
    assert_eq!(decode_string(r#""say \"hi\"""#).unwrap(), "say \"hi\"");
    assert_eq!(decode_string(r#""back\\slash""#).unwrap(), "back\\slash");
    assert_eq!(decode_string(r#""\q""#).unwrap(), "q");
    assert_eq!(decode_string(r#""A\u{1F600}""#).unwrap(), "A\u{1F600}");
}

#[test]
fn test_bad_unicode_escape_is_rejected() {
    assert!(decode_string(r#""\u{}""#).is_err());
    assert!(decode_string(r#""\uZZZZ""#).is_err());
}

#[test]
fn test_number_literals_accept_signs_and_decimals() {
    assert_eq!(decode_number("42").unwrap(), 42.0);
    assert_eq!(decode_number("-12.5").unwrap(), -12.5);
    assert_eq!(decode_number("+3").unwrap(), 3.0);
}
