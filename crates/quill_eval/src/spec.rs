//! Protocol slot names.
//!
//! Every operation on a value — arithmetic, truthiness, iteration,
//! calling, stringification, attribute access — is routed through one of
//! these named slots. Values may carry per-instance overrides in a
//! [`SpecTable`]; a built-in default implementation backs every slot for
//! the built-in kinds.

use rustc_hash::FxHashMap;

use quill_ir::{BinaryOp, UnaryOp};

use crate::value::Value;

/// Closed set of protocol slots.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SpecName {
    // Binary operators
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    Neq,
    Less,
    Grtr,
    LessEq,
    GrtrEq,
    Amp,
    Pipe,
    HasItem,
    // Unary operators
    UAdd,
    Neg,
    Bool,
    // Calling conventions
    Call,
    AltCall,
    GetAttr,
    Iter,
    Next,
    Format,
    Get,
    Init,
    // Conversions
    Repr,
    Str,
    Hash,
    // Attribute slots: these hold plain values, not callables
    Type,
    Parent,
}

impl SpecName {
    /// The surface name used by `spec` declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            SpecName::Add => "add",
            SpecName::Sub => "sub",
            SpecName::Mul => "mul",
            SpecName::Div => "div",
            SpecName::Pow => "pow",
            SpecName::Eq => "eq",
            SpecName::Neq => "neq",
            SpecName::Less => "less",
            SpecName::Grtr => "grtr",
            SpecName::LessEq => "lesseq",
            SpecName::GrtrEq => "grtreq",
            SpecName::Amp => "amp",
            SpecName::Pipe => "pipe",
            SpecName::HasItem => "has_item",
            SpecName::UAdd => "uadd",
            SpecName::Neg => "neg",
            SpecName::Bool => "bool",
            SpecName::Call => "call",
            SpecName::AltCall => "altcall",
            SpecName::GetAttr => "get_attr",
            SpecName::Iter => "iter",
            SpecName::Next => "next",
            SpecName::Format => "format",
            SpecName::Get => "get",
            SpecName::Init => "init",
            SpecName::Repr => "repr",
            SpecName::Str => "str",
            SpecName::Hash => "hash",
            SpecName::Type => "type",
            SpecName::Parent => "parent",
        }
    }

    /// Parse a surface name from a `spec` declaration.
    pub fn from_str(s: &str) -> Option<SpecName> {
        Some(match s {
            "add" => SpecName::Add,
            "sub" => SpecName::Sub,
            "mul" => SpecName::Mul,
            "div" => SpecName::Div,
            "pow" => SpecName::Pow,
            "eq" => SpecName::Eq,
            "neq" => SpecName::Neq,
            "less" => SpecName::Less,
            "grtr" => SpecName::Grtr,
            "lesseq" => SpecName::LessEq,
            "grtreq" => SpecName::GrtrEq,
            "amp" => SpecName::Amp,
            "pipe" => SpecName::Pipe,
            "has_item" => SpecName::HasItem,
            "uadd" => SpecName::UAdd,
            "neg" => SpecName::Neg,
            "bool" => SpecName::Bool,
            "call" => SpecName::Call,
            "altcall" => SpecName::AltCall,
            "get_attr" => SpecName::GetAttr,
            "iter" => SpecName::Iter,
            "next" => SpecName::Next,
            "format" => SpecName::Format,
            "get" => SpecName::Get,
            "init" => SpecName::Init,
            "repr" => SpecName::Repr,
            "str" => SpecName::Str,
            "hash" => SpecName::Hash,
            "type" => SpecName::Type,
            "parent" => SpecName::Parent,
            _ => return None,
        })
    }

    /// Slots that hold plain values rather than callables.
    pub fn is_attr_slot(self) -> bool {
        matches!(self, SpecName::Type | SpecName::Parent)
    }

    /// The slot a binary operator routes to, or `None` for the operators
    /// the interpreter evaluates directly (`&&`, `||`, `===`).
    pub fn for_binary(op: BinaryOp) -> Option<SpecName> {
        Some(match op {
            BinaryOp::Add => SpecName::Add,
            BinaryOp::Sub => SpecName::Sub,
            BinaryOp::Mul => SpecName::Mul,
            BinaryOp::Div => SpecName::Div,
            BinaryOp::Pow => SpecName::Pow,
            BinaryOp::Eq => SpecName::Eq,
            BinaryOp::NotEq => SpecName::Neq,
            BinaryOp::Less => SpecName::Less,
            BinaryOp::Grtr => SpecName::Grtr,
            BinaryOp::LessEq => SpecName::LessEq,
            BinaryOp::GrtrEq => SpecName::GrtrEq,
            BinaryOp::Amp => SpecName::Amp,
            BinaryOp::Pipe => SpecName::Pipe,
            BinaryOp::HasItem => SpecName::HasItem,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Is => return None,
        })
    }

    pub fn for_unary(op: UnaryOp) -> SpecName {
        match op {
            UnaryOp::UAdd => SpecName::UAdd,
            UnaryOp::Neg => SpecName::Neg,
            UnaryOp::Truthy => SpecName::Bool,
        }
    }
}

/// Per-instance protocol table.
pub type SpecTable = FxHashMap<SpecName, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for spec in [
            SpecName::Add,
            SpecName::HasItem,
            SpecName::AltCall,
            SpecName::Repr,
            SpecName::Parent,
        ] {
            assert_eq!(SpecName::from_str(spec.as_str()), Some(spec));
        }
        assert_eq!(SpecName::from_str("frobnicate"), None);
    }

    #[test]
    fn direct_operators_have_no_slot() {
        assert_eq!(SpecName::for_binary(BinaryOp::And), None);
        assert_eq!(SpecName::for_binary(BinaryOp::Or), None);
        assert_eq!(SpecName::for_binary(BinaryOp::Is), None);
        assert_eq!(SpecName::for_binary(BinaryOp::Add), Some(SpecName::Add));
    }

    #[test]
    fn truthy_unary_routes_to_bool() {
        assert_eq!(SpecName::for_unary(UnaryOp::Truthy), SpecName::Bool);
    }
}
