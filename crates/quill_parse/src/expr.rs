//! Expression grammar: precedence climbing plus postfix chains.

use quill_ir::{BinaryOp, Expr, ExprKind, FormatPart, Name, Span, TokenKind, UnaryOp};
use quill_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a full expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_or())
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.cursor.eat(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while self.cursor.eat(TokenKind::AmpAmp) {
            let right = self.parse_comparison()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_pipe()?;
        loop {
            let op = match self.cursor.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::Greater => BinaryOp::Grtr,
                TokenKind::LessEq => BinaryOp::LessEq,
                TokenKind::GreaterEq => BinaryOp::GrtrEq,
                TokenKind::Identical => BinaryOp::Is,
                TokenKind::In => BinaryOp::HasItem,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_pipe()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_pipe(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_amp()?;
        while self.cursor.eat(TokenKind::Pipe) {
            let right = self.parse_amp()?;
            left = binary(BinaryOp::Pipe, left, right);
        }
        Ok(left)
    }

    fn parse_amp(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        while self.cursor.eat(TokenKind::Amp) {
            let right = self.parse_term()?;
            left = binary(BinaryOp::Amp, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.cursor.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_factor()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.cursor.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_power()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// `**` is right-associative.
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_unary()?;
        if self.cursor.eat(TokenKind::StarStar) {
            let exponent = self.parse_power()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.cursor.current().kind {
            TokenKind::Plus => UnaryOp::UAdd,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Question => UnaryOp::Truthy,
            _ => return self.parse_postfix(),
        };
        let start = self.cursor.current_span();
        self.cursor.advance();
        let operand = self.parse_unary()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Postfix chain: calls, bracket calls, attribute and private access.
    pub(crate) fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.cursor.current().kind {
                TokenKind::LParen => {
                    self.cursor.advance();
                    let (args, kwargs) = self.parse_call_args(TokenKind::RParen)?;
                    let span = expr.span.merge(self.cursor.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                            kwargs,
                            alt: false,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let (args, kwargs) = self.parse_call_args(TokenKind::RBracket)?;
                    let span = expr.span.merge(self.cursor.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                            kwargs,
                            alt: true,
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (name, name_span) = self.expect_ident("attribute name")?;
                    let span = expr.span.merge(name_span);
                    expr = Expr::new(
                        ExprKind::GetAttr {
                            target: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                TokenKind::DotHash => {
                    self.cursor.advance();
                    let (name, name_span) = self.expect_ident("private attribute name")?;
                    let span = expr.span.merge(name_span);
                    expr = Expr::new(
                        ExprKind::GetPriv {
                            target: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Argument list for `f(...)` / `f[...]`, already past the opener.
    fn parse_call_args(
        &mut self,
        closer: TokenKind,
    ) -> Result<(Vec<Expr>, Vec<(Name, Expr)>), ParseError> {
        let mut args = Vec::new();
        let mut kwargs: Vec<(Name, Expr)> = Vec::new();
        while !self.cursor.check(closer) {
            let is_kwarg = matches!(self.cursor.current().kind, TokenKind::Ident(_))
                && matches!(self.cursor.peek_kind(1), TokenKind::Assign);
            if is_kwarg {
                let (name, _) = self.expect_ident("argument name")?;
                self.cursor.advance(); // '='
                kwargs.push((name, self.parse_expr()?));
            } else {
                if !kwargs.is_empty() {
                    return Err(ParseError::new(
                        "positional argument after keyword argument",
                        self.cursor.current_span(),
                    ));
                }
                args.push(self.parse_expr()?);
            }
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        let token = *self.cursor.current();
        if !self.cursor.eat(closer) {
            return Err(ParseError::unexpected(&token, closer.describe()));
        }
        Ok((args, kwargs))
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let token = *self.cursor.current();
        let span = token.span;
        match token.kind {
            TokenKind::Null => {
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Null, span))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Bool(true), span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Bool(false), span))
            }
            TokenKind::Num(value) => {
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Num(value), span))
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Str(name), span))
            }
            TokenKind::FStr(name) => {
                self.cursor.advance();
                let parts = self.parse_fstring_parts(name, span)?;
                Ok(Expr::new(ExprKind::Format(parts), span))
            }
            TokenKind::Regex(name) => {
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Regex(name), span))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Ident(name), span))
            }
            TokenKind::Dollar => {
                self.cursor.advance();
                let open = *self.cursor.current();
                if !self.cursor.eat(TokenKind::LParen) {
                    return Err(ParseError::unexpected(&open, "'(' after '$'"));
                }
                let inner = self.parse_expr()?;
                let close = *self.cursor.current();
                if !self.cursor.eat(TokenKind::RParen) {
                    return Err(ParseError::unexpected(&close, "')'"));
                }
                let full = span.merge(self.cursor.previous_span());
                Ok(Expr::new(ExprKind::DynamicId(Box::new(inner)), full))
            }
            TokenKind::LParen => self.parse_paren_or_tuple(span),
            TokenKind::LBracket => self.parse_list(span),
            TokenKind::LBrace => self.parse_dict(span),
            TokenKind::Fn => {
                self.cursor.advance();
                let func = self.parse_func_lit(None)?;
                let full = span.merge(self.cursor.previous_span());
                Ok(Expr::new(ExprKind::Lambda(func), full))
            }
            _ => Err(ParseError::unexpected(&token, "an expression")),
        }
    }

    fn parse_paren_or_tuple(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.cursor.advance();
        // `()` is the empty tuple.
        if self.cursor.eat(TokenKind::RParen) {
            let full = start.merge(self.cursor.previous_span());
            return Ok(Expr::new(ExprKind::Tuple(Vec::new()), full));
        }
        let first = self.parse_expr()?;
        if self.cursor.eat(TokenKind::RParen) {
            let full = start.merge(self.cursor.previous_span());
            return Ok(Expr::new(ExprKind::Par(Box::new(first)), full));
        }
        let mut items = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if self.cursor.check(TokenKind::RParen) {
                break; // trailing comma
            }
            items.push(self.parse_expr()?);
        }
        let close = *self.cursor.current();
        if !self.cursor.eat(TokenKind::RParen) {
            return Err(ParseError::unexpected(&close, "')' or ','"));
        }
        let full = start.merge(self.cursor.previous_span());
        Ok(Expr::new(ExprKind::Tuple(items), full))
    }

    fn parse_list(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let mut items = Vec::new();
        while !self.cursor.check(TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = *self.cursor.current();
        if !self.cursor.eat(TokenKind::RBracket) {
            return Err(ParseError::unexpected(&close, "']'"));
        }
        let full = start.merge(self.cursor.previous_span());
        Ok(Expr::new(ExprKind::List(items), full))
    }

    fn parse_dict(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let mut entries = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            let key = self.parse_expr()?;
            let colon = *self.cursor.current();
            if !self.cursor.eat(TokenKind::Colon) {
                return Err(ParseError::unexpected(&colon, "':'"));
            }
            let value = self.parse_expr()?;
            entries.push((key, value));
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = *self.cursor.current();
        if !self.cursor.eat(TokenKind::RBrace) {
            return Err(ParseError::unexpected(&close, "'}'"));
        }
        let full = start.merge(self.cursor.previous_span());
        Ok(Expr::new(ExprKind::Dict(entries), full))
    }

    /// Split a cooked f-string body into text and interpolation parts.
    ///
    /// `{{` and `}}` escape literal braces. An interpolation is a full
    /// expression, optionally followed by `:spec` at the interpolation's
    /// top nesting level. Fragments are re-lexed and parsed in place.
    fn parse_fstring_parts(
        &mut self,
        body: Name,
        span: Span,
    ) -> Result<Vec<FormatPart>, ParseError> {
        let text = self.interner.lookup(body);
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(ParseError::new(
                        "unmatched '}' in format string (use '}}' for a literal brace)",
                        span,
                    ));
                }
                '{' => {
                    if !literal.is_empty() {
                        parts.push(FormatPart::Text(self.interner.intern(&literal)));
                        literal.clear();
                    }
                    let (fragment, spec) = take_interpolation(&mut chars, span)?;
                    let expr = crate::parse_expression(&fragment, self.interner)?;
                    let spec = spec.map(|s| self.interner.intern(&s));
                    parts.push(FormatPart::Expr(expr, spec));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            parts.push(FormatPart::Text(self.interner.intern(&literal)));
        }
        Ok(parts)
    }
}

/// Consume an interpolation body up to its closing `}`, splitting off an
/// optional `:spec` suffix found at the top nesting level.
fn take_interpolation(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    span: Span,
) -> Result<(String, Option<String>), ParseError> {
    let mut fragment = String::new();
    let mut spec: Option<String> = None;
    let mut depth = (0u32, 0u32, 0u32); // parens, brackets, braces
    let mut in_string = false;

    for c in chars.by_ref() {
        if in_string {
            if c == '"' {
                in_string = false;
            }
            target(&mut fragment, &mut spec).push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                target(&mut fragment, &mut spec).push(c);
            }
            '(' => {
                depth.0 += 1;
                target(&mut fragment, &mut spec).push(c);
            }
            ')' => {
                depth.0 = depth.0.saturating_sub(1);
                target(&mut fragment, &mut spec).push(c);
            }
            '[' => {
                depth.1 += 1;
                target(&mut fragment, &mut spec).push(c);
            }
            ']' => {
                depth.1 = depth.1.saturating_sub(1);
                target(&mut fragment, &mut spec).push(c);
            }
            '{' => {
                depth.2 += 1;
                target(&mut fragment, &mut spec).push(c);
            }
            '}' if depth.2 > 0 => {
                depth.2 -= 1;
                target(&mut fragment, &mut spec).push(c);
            }
            '}' => {
                if fragment.trim().is_empty() {
                    return Err(ParseError::new("empty interpolation in format string", span));
                }
                return Ok((fragment, spec));
            }
            ':' if depth == (0, 0, 0) && spec.is_none() => {
                spec = Some(String::new());
            }
            other => target(&mut fragment, &mut spec).push(other),
        }
    }
    Err(ParseError::new(
        "unterminated interpolation in format string",
        span,
    ))
}

/// Append target: the spec once `:` has been seen, else the fragment.
fn target<'a>(fragment: &'a mut String, spec: &'a mut Option<String>) -> &'a mut String {
    match spec {
        Some(s) => s,
        None => fragment,
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}
