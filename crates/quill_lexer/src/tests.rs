use pretty_assertions::assert_eq;
use quill_ir::{StringInterner, TokenKind};

use crate::{lex, LexErrorKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    lex(source, &interner)
        .expect("lex failure")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn keywords_are_not_identifiers() {
    let interner = StringInterner::new();
    let tokens = lex("pub public", &interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Pub);
    assert!(matches!(tokens[1].kind, TokenKind::Ident(_)));
}

#[test]
fn numbers_parse_including_exponents() {
    let interner = StringInterner::new();
    let tokens = lex("1 2.5 3e2", &interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Num(1.0));
    assert_eq!(tokens[1].kind, TokenKind::Num(2.5));
    assert_eq!(tokens[2].kind, TokenKind::Num(300.0));
}

#[test]
fn number_dot_attr_does_not_merge() {
    // `1.foo` must not lex the dot into the number.
    let ks = kinds("1.foo");
    assert_eq!(ks[0], TokenKind::Num(1.0));
    assert_eq!(ks[1], TokenKind::Dot);
}

#[test]
fn string_escapes_are_cooked() {
    let interner = StringInterner::new();
    let tokens = lex(r#""a\nb""#, &interner).unwrap();
    let TokenKind::Str(name) = tokens[0].kind else {
        panic!("expected string token");
    };
    assert_eq!(interner.lookup(name), "a\nb");
}

#[test]
fn hex_escape_is_cooked() {
    let interner = StringInterner::new();
    let tokens = lex(r#""\x41""#, &interner).unwrap();
    let TokenKind::Str(name) = tokens[0].kind else {
        panic!("expected string token");
    };
    assert_eq!(interner.lookup(name), "A");
}

#[test]
fn invalid_escape_is_an_error() {
    let interner = StringInterner::new();
    let err = lex(r#""\q""#, &interner).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::InvalidEscape('q'));
}

#[test]
fn fstring_keeps_braces_for_the_parser() {
    let interner = StringInterner::new();
    let tokens = lex(r#"f"x = {x}""#, &interner).unwrap();
    let TokenKind::FStr(name) = tokens[0].kind else {
        panic!("expected f-string token");
    };
    assert_eq!(interner.lookup(name), "x = {x}");
}

#[test]
fn regex_literal_body_is_raw() {
    let interner = StringInterner::new();
    let tokens = lex(r#"re"[a-z]+""#, &interner).unwrap();
    let TokenKind::Regex(name) = tokens[0].kind else {
        panic!("expected regex token");
    };
    assert_eq!(interner.lookup(name), "[a-z]+");
}

#[test]
fn regex_prefix_beats_identifier() {
    // `re` alone is an identifier; `re"..."` is a literal.
    let ks = kinds(r#"re re"x""#);
    assert!(matches!(ks[0], TokenKind::Ident(_)));
    assert!(matches!(ks[1], TokenKind::Regex(_)));
}

#[test]
fn version_literal_beats_identifier() {
    let interner = StringInterner::new();
    let tokens = lex("req v1.2.3;", &interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Req);
    let TokenKind::Version(name) = tokens[1].kind else {
        panic!("expected version token");
    };
    assert_eq!(interner.lookup(name), "1.2.3");
    // A plain `v1` with no dot stays an identifier.
    let tokens = lex("v1", &interner).unwrap();
    assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
}

#[test]
fn multi_char_operators_win() {
    assert_eq!(
        kinds("=== == = ** * .# . && & || |"),
        vec![
            TokenKind::Identical,
            TokenKind::EqEq,
            TokenKind::Assign,
            TokenKind::StarStar,
            TokenKind::Star,
            TokenKind::DotHash,
            TokenKind::Dot,
            TokenKind::AmpAmp,
            TokenKind::Amp,
            TokenKind::PipePipe,
            TokenKind::Pipe,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // trailing\n2"),
        vec![TokenKind::Num(1.0), TokenKind::Num(2.0), TokenKind::Eof]
    );
}

#[test]
fn unterminated_string_is_reported() {
    let interner = StringInterner::new();
    let err = lex("\"abc", &interner).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
}

#[test]
fn unknown_character_is_reported() {
    let interner = StringInterner::new();
    let err = lex("pub x = `;", &interner).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnknownCharacter('`'));
}

#[test]
fn stream_ends_with_exactly_one_eof() {
    let interner = StringInterner::new();
    let tokens = lex("pub x = 1;", &interner).unwrap();
    let eofs = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Eof)
        .count();
    assert_eq!(eofs, 1);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
}

#[test]
fn dump_round_trips_to_equivalent_stream() {
    let source = r#"
        pub fn fib(n) {
            if n < 2 { return n; }
            return fib[n - 1] + fib(n - 2);
        }
        pub xs = [1, 2.5, "three"];
        print[f"fib: {fib(10)}"];
    "#;
    let interner = StringInterner::new();
    let tokens = lex(source, &interner).unwrap();

    // Rebuild a source from the dumped lexemes and lex it again.
    let rebuilt: String = tokens
        .iter()
        .map(|t| t.lexeme(source))
        .collect::<Vec<_>>()
        .join(" ");
    let relexed = lex(&rebuilt, &interner).unwrap();

    assert_eq!(tokens.len(), relexed.len());
    for (a, b) in tokens.iter().zip(relexed.iter()) {
        assert!(
            a.kind.same_variant(&b.kind),
            "variant mismatch: {:?} vs {:?}",
            a.kind,
            b.kind
        );
    }
}

#[test]
fn dump_format_lists_offsets_and_labels() {
    let interner = StringInterner::new();
    let source = "pub x = 1;";
    let tokens = lex(source, &interner).unwrap();
    let dump = crate::dump_tokens(&tokens, source);
    assert!(dump.contains("'pub'"));
    assert!(dump.contains("ident"));
    assert!(dump.contains("num"));
    assert!(dump.lines().count() == tokens.len());
}
