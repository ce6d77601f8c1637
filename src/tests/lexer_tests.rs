use crate::error::Reporter;
use crate::frontend::lexer::{Lexer, TokenKind};

fn lex(source: &str) -> (Vec<TokenKind>, Reporter) {
    let mut reporter = Reporter::new();
    let file_id = reporter.add_file("test.byl".to_string(), source.to_string());
    let mut lexer = Lexer::new(source, file_id, &mut reporter);
    let kinds = lexer.tokenize().into_iter().map(|t| t.kind).collect();
    (kinds, reporter)
}

fn lex_ok(source: &str) -> Vec<TokenKind> {
    let (kinds, reporter) = lex(source);
    assert!(!reporter.has_errors());
    kinds
}

#[test]
fn test_keywords_and_identifiers() {
    let kinds = lex_ok("fn foo var const struct enum error noalias");
    assert_eq!(
        kinds,
        vec![
            TokenKind::KwFn,
            TokenKind::Identifier("foo".to_string()),
            TokenKind::KwVar,
            TokenKind::KwConst,
            TokenKind::KwStruct,
            TokenKind::KwEnum,
            TokenKind::KwError,
            TokenKind::KwNoalias,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_number_literals() {
    let kinds = lex_ok("0 42 0xff 0o77 0b1010 3.5 1.0");
    assert_eq!(kinds[0], TokenKind::IntLiteral { value: 0, overflow: false });
    assert_eq!(kinds[1], TokenKind::IntLiteral { value: 42, overflow: false });
    assert_eq!(kinds[2], TokenKind::IntLiteral { value: 255, overflow: false });
    assert_eq!(kinds[3], TokenKind::IntLiteral { value: 63, overflow: false });
    assert_eq!(kinds[4], TokenKind::IntLiteral { value: 10, overflow: false });
    assert_eq!(kinds[5], TokenKind::FloatLiteral(3.5));
    assert_eq!(kinds[6], TokenKind::FloatLiteral(1.0));
}

#[test]
fn test_number_literal_overflow_flag() {
    let kinds = lex_ok("99999999999999999999999999");
    match &kinds[0] {
        TokenKind::IntLiteral { overflow, .. } => assert!(*overflow),
        other => panic!("expected int literal, got {:?}", other),
    }
}

#[test]
fn test_string_and_char_literals() {
    let kinds = lex_ok(r#""hello" c"world" 'a' '\n' '\x41'"#);
    assert_eq!(
        kinds[0],
        TokenKind::StringLiteral { value: b"hello".to_vec(), is_c: false }
    );
    assert_eq!(
        kinds[1],
        TokenKind::StringLiteral { value: b"world".to_vec(), is_c: true }
    );
    assert_eq!(kinds[2], TokenKind::CharLiteral(b'a'));
    assert_eq!(kinds[3], TokenKind::CharLiteral(b'\n'));
    assert_eq!(kinds[4], TokenKind::CharLiteral(0x41));
}

#[test]
fn test_string_escapes() {
    let kinds = lex_ok(r#""a\tb\n\"q\"""#);
    assert_eq!(
        kinds[0],
        TokenKind::StringLiteral { value: b"a\tb\n\"q\"".to_vec(), is_c: false }
    );
}

#[test]
fn test_compound_operators() {
    let kinds = lex_ok("%% ?? ?= ++ .. ... -> => << >> <<= >>= && || &&= ||=");
    assert_eq!(
        kinds,
        vec![
            TokenKind::PercentPercent,
            TokenKind::QuestionQuestion,
            TokenKind::QuestionEq,
            TokenKind::PlusPlus,
            TokenKind::DotDot,
            TokenKind::Ellipsis,
            TokenKind::Arrow,
            TokenKind::FatArrow,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::ShlEq,
            TokenKind::ShrEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::AmpAmpEq,
            TokenKind::PipePipeEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_builtins_and_directives() {
    let kinds = lex_ok("@sizeof #attribute");
    assert_eq!(kinds[0], TokenKind::Builtin("sizeof".to_string()));
    assert_eq!(kinds[1], TokenKind::Directive("attribute".to_string()));
}

#[test]
fn test_comments_are_skipped() {
    let kinds = lex_ok("a // comment with fn and var\nb");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier("a".to_string()),
            TokenKind::Identifier("b".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_c_identifier_is_not_a_c_string() {
    let kinds = lex_ok("c + 1");
    assert_eq!(kinds[0], TokenKind::Identifier("c".to_string()));
}

#[test]
fn test_unterminated_string_is_an_error() {
    let (_, reporter) = lex("\"abc");
    assert!(reporter.has_errors());
}

#[test]
fn test_invalid_character_is_an_error() {
    let (_, reporter) = lex("fn f() { $ }");
    assert!(reporter.has_errors());
}

#[test]
fn test_slice_brackets_vs_range() {
    let kinds = lex_ok("a[0..5]");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier("a".to_string()),
            TokenKind::LBracket,
            TokenKind::IntLiteral { value: 0, overflow: false },
            TokenKind::DotDot,
            TokenKind::IntLiteral { value: 5, overflow: false },
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}
