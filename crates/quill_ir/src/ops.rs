//! Operator enums shared by the parser and the interpreter.

use std::fmt;

/// Binary operators.
///
/// `And`, `Or` and `Is` are evaluated directly by the interpreter
/// (short-circuiting / identity); every other operator is routed through
/// the operand's protocol table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    NotEq,
    Less,
    Grtr,
    LessEq,
    GrtrEq,
    Amp,
    Pipe,
    HasItem,
    And,
    Or,
    Is,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Grtr => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GrtrEq => ">=",
            BinaryOp::Amp => "&",
            BinaryOp::Pipe => "|",
            BinaryOp::HasItem => "in",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Is => "===",
        }
    }

    /// Operators the interpreter evaluates without protocol dispatch.
    pub fn is_direct(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Is)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Unary operators. `Truthy` is the `?x` truthiness query.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    UAdd,
    Neg,
    Truthy,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::UAdd => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Truthy => "?",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}
