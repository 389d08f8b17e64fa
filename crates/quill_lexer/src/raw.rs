//! Raw token recognizer derived with `logos`.
//!
//! Longest-match resolves the prefixy cases: `re"..."` beats the
//! identifier `re`, `v1.2` beats the identifier `v1`, `.#` beats `.`.

use logos::Logos;

#[derive(Logos, Copy, Clone, Eq, PartialEq, Debug)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum RawToken {
    // Literals
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Num,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[regex(r#"f"([^"\\\n]|\\.)*""#)]
    FStr,
    #[regex(r#"re"([^"\\\n]|\\.)*""#)]
    Regex,
    #[regex(r"v[0-9]+\.[0-9]+(\.[0-9]+)?")]
    Version,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Keywords
    #[token("pub")]
    Pub,
    #[token("priv")]
    Priv,
    #[token("spec")]
    Spec,
    #[token("fn")]
    Fn,
    #[token("type")]
    Type,
    #[token("property")]
    Property,
    #[token("edit")]
    Edit,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("as")]
    As,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("raise")]
    Raise,
    #[token("del")]
    Del,
    #[token("req")]
    Req,
    #[token("import")]
    Import,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Operators and punctuation
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("**")]
    StarStar,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("===")]
    Identical,
    #[token("==")]
    EqEq,
    #[token("=")]
    Assign,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LessEq,
    #[token("<")]
    Less,
    #[token(">=")]
    GreaterEq,
    #[token(">")]
    Greater,
    #[token("&&")]
    AmpAmp,
    #[token("&")]
    Amp,
    #[token("||")]
    PipePipe,
    #[token("|")]
    Pipe,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("$")]
    Dollar,
    #[token(".#")]
    DotHash,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}
