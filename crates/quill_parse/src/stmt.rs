//! Statement grammar.

use quill_ir::{
    Expr, ExprKind, FuncLit, Name, Param, ParamKind, Span, Stmt, StmtKind, TokenKind, VersionReq,
    Vis,
};
use quill_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one statement.
    pub fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        match self.cursor.current().kind {
            TokenKind::At => self.parse_decorated(start),
            TokenKind::Pub => {
                self.cursor.advance();
                self.parse_decl(Vis::Pub, start)
            }
            TokenKind::Priv => {
                self.cursor.advance();
                self.parse_decl(Vis::Priv, start)
            }
            TokenKind::Spec => {
                self.cursor.advance();
                self.parse_decl(Vis::Spec, start)
            }
            TokenKind::LBrace => {
                let body = self.parse_block()?;
                Ok(self.finish(StmtKind::Block(body), start))
            }
            TokenKind::If => self.parse_if(start),
            TokenKind::While => self.parse_while(start),
            TokenKind::For => self.parse_for(start),
            TokenKind::Try => self.parse_try(start),
            TokenKind::Switch => self.parse_switch(start),
            TokenKind::Edit => self.parse_edit(start),
            TokenKind::Return => {
                self.cursor.advance();
                let value = self.optional_expr_before_semi()?;
                self.expect_semicolon()?;
                Ok(self.finish(StmtKind::Return(value), start))
            }
            TokenKind::Break => {
                self.cursor.advance();
                let amount = self.optional_expr_before_semi()?;
                self.expect_semicolon()?;
                Ok(self.finish(StmtKind::Break(amount), start))
            }
            TokenKind::Continue => {
                self.cursor.advance();
                let amount = self.optional_expr_before_semi()?;
                self.expect_semicolon()?;
                Ok(self.finish(StmtKind::Continue(amount), start))
            }
            TokenKind::Raise => {
                self.cursor.advance();
                let value = self.parse_expr()?;
                self.expect_semicolon()?;
                Ok(self.finish(StmtKind::Raise(value), start))
            }
            TokenKind::Del => {
                self.cursor.advance();
                let target = self.parse_postfix()?;
                if !matches!(
                    target.kind,
                    ExprKind::Ident(_) | ExprKind::GetAttr { .. } | ExprKind::GetPriv { .. }
                ) {
                    return Err(ParseError::new(
                        "'del' target must be a name or attribute",
                        target.span,
                    ));
                }
                self.expect_semicolon()?;
                Ok(self.finish(StmtKind::Del(target), start))
            }
            TokenKind::Req => self.parse_req(start),
            TokenKind::Import => self.parse_import(start),
            _ => self.parse_expr_or_assign(start),
        }
    }

    /// `@deco ... pub fn f(...) { ... }` — desugared here into
    /// `pub f = deco[fn (...) { ... }];` with decorators applied
    /// innermost first.
    fn parse_decorated(&mut self, start: Span) -> Result<Stmt, ParseError> {
        let mut decorators = Vec::new();
        while self.cursor.eat(TokenKind::At) {
            decorators.push(self.parse_postfix()?);
        }
        let vis = match self.cursor.advance().kind {
            TokenKind::Pub => Vis::Pub,
            TokenKind::Priv => Vis::Priv,
            TokenKind::Spec => Vis::Spec,
            _ => {
                return Err(ParseError::new(
                    "decorators must be followed by a function declaration",
                    self.cursor.previous_span(),
                ))
            }
        };
        let fn_token = *self.cursor.current();
        if !self.cursor.eat(TokenKind::Fn) {
            return Err(ParseError::unexpected(&fn_token, "'fn'"));
        }
        let (name, _) = self.expect_ident("function name")?;
        let func = self.parse_func_lit(Some(name))?;
        let fn_span = start.merge(self.cursor.previous_span());

        let mut value = Expr::new(ExprKind::Lambda(func), fn_span);
        for deco in decorators.into_iter().rev() {
            let span = deco.span.merge(fn_span);
            value = Expr::new(
                ExprKind::Call {
                    callee: Box::new(deco),
                    args: vec![value],
                    kwargs: Vec::new(),
                    alt: true,
                },
                span,
            );
        }
        Ok(self.finish(
            StmtKind::VarDecl {
                vis,
                name,
                value: Some(value),
            },
            start,
        ))
    }

    /// Declaration after `pub` / `priv` / `spec`.
    fn parse_decl(&mut self, vis: Vis, start: Span) -> Result<Stmt, ParseError> {
        match self.cursor.current().kind {
            TokenKind::Fn => {
                self.cursor.advance();
                let (name, _) = self.expect_ident("function name")?;
                let func = self.parse_func_lit(Some(name))?;
                Ok(self.finish(StmtKind::FuncDecl { vis, name, func }, start))
            }
            TokenKind::Type => {
                if vis != Vis::Pub {
                    return Err(ParseError::new(
                        "type declarations must be 'pub'",
                        self.cursor.current_span(),
                    ));
                }
                self.cursor.advance();
                let (name, _) = self.expect_ident("type name")?;
                let body = self.parse_block()?;
                Ok(self.finish(StmtKind::TypeDecl { name, body }, start))
            }
            TokenKind::Property => {
                if vis == Vis::Spec {
                    return Err(ParseError::new(
                        "properties cannot be declared 'spec'",
                        self.cursor.current_span(),
                    ));
                }
                self.cursor.advance();
                let (name, _) = self.expect_ident("property name")?;
                let body = self.parse_block()?;
                Ok(self.finish(StmtKind::PropDecl { vis, name, body }, start))
            }
            TokenKind::Ident(_) => {
                let (name, _) = self.expect_ident("name")?;
                let value = if self.cursor.eat(TokenKind::Assign) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                self.expect_semicolon()?;
                Ok(self.finish(StmtKind::VarDecl { vis, name, value }, start))
            }
            _ => {
                let token = *self.cursor.current();
                Err(ParseError::unexpected(
                    &token,
                    "a name, 'fn', 'type' or 'property'",
                ))
            }
        }
    }

    pub(crate) fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let open = *self.cursor.current();
        if !self.cursor.eat(TokenKind::LBrace) {
            return Err(ParseError::unexpected(&open, "'{'"));
        }
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.at_end() {
                return Err(ParseError::new("unclosed block, expected '}'", open.span));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.cursor.advance();
        Ok(stmts)
    }

    fn parse_if(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let mut branches = Vec::new();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        branches.push((cond, body));
        let mut else_body = None;
        loop {
            if self.cursor.eat(TokenKind::Elif) {
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                branches.push((cond, body));
            } else if self.cursor.eat(TokenKind::Else) {
                else_body = Some(self.parse_block()?);
                break;
            } else {
                break;
            }
        }
        Ok(self.finish(StmtKind::If { branches, else_body }, start))
    }

    fn parse_while(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(self.finish(StmtKind::While { cond, body }, start))
    }

    fn parse_for(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let (binding, _) = self.expect_ident("loop variable")?;
        let in_token = *self.cursor.current();
        if !self.cursor.eat(TokenKind::In) {
            return Err(ParseError::unexpected(&in_token, "'in'"));
        }
        let iterable = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(self.finish(
            StmtKind::ForLoop {
                binding,
                iterable,
                body,
            },
            start,
        ))
    }

    fn parse_try(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let body = self.parse_block()?;
        let catch_token = *self.cursor.current();
        if !self.cursor.eat(TokenKind::Catch) {
            return Err(ParseError::unexpected(&catch_token, "'catch'"));
        }
        let mut filter = None;
        let mut binding = None;
        if !self.cursor.check(TokenKind::LBrace) {
            if self.cursor.eat(TokenKind::As) {
                let (name, _) = self.expect_ident("catch binding")?;
                binding = Some(name);
            } else {
                filter = Some(self.parse_expr()?);
                if self.cursor.eat(TokenKind::As) {
                    let (name, _) = self.expect_ident("catch binding")?;
                    binding = Some(name);
                }
            }
        }
        let handler = self.parse_block()?;
        Ok(self.finish(
            StmtKind::TryCatch {
                body,
                filter,
                binding,
                handler,
            },
            start,
        ))
    }

    fn parse_switch(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let scrutinee = self.parse_expr()?;
        let open = *self.cursor.current();
        if !self.cursor.eat(TokenKind::LBrace) {
            return Err(ParseError::unexpected(&open, "'{'"));
        }
        let mut cases = Vec::new();
        let mut default = None;
        loop {
            if self.cursor.eat(TokenKind::Case) {
                let value = self.parse_expr()?;
                let body = self.parse_block()?;
                cases.push((value, body));
            } else if self.cursor.eat(TokenKind::Default) {
                if default.is_some() {
                    return Err(ParseError::new(
                        "switch may have only one 'default' arm",
                        self.cursor.previous_span(),
                    ));
                }
                default = Some(self.parse_block()?);
            } else if self.cursor.eat(TokenKind::RBrace) {
                break;
            } else {
                let token = *self.cursor.current();
                return Err(ParseError::unexpected(&token, "'case', 'default' or '}'"));
            }
        }
        Ok(self.finish(
            StmtKind::SwitchCase {
                scrutinee,
                cases,
                default,
            },
            start,
        ))
    }

    fn parse_edit(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let target = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(self.finish(StmtKind::Edit { target, body }, start))
    }

    fn parse_req(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let req = if self.cursor.eat(TokenKind::Plus) {
            VersionReq::AtLeast(self.expect_version()?)
        } else if self.cursor.eat(TokenKind::Minus) {
            VersionReq::AtMost(self.expect_version()?)
        } else {
            let low = self.expect_version()?;
            if self.cursor.eat(TokenKind::Minus) {
                VersionReq::Range(low, self.expect_version()?)
            } else {
                VersionReq::Exact(low)
            }
        };
        self.expect_semicolon()?;
        Ok(self.finish(StmtKind::VersionReq(req), start))
    }

    fn parse_import(&mut self, start: Span) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let (name, _) = self.expect_ident("module name")?;
        let alias = if self.cursor.eat(TokenKind::As) {
            let (alias, _) = self.expect_ident("module alias")?;
            Some(alias)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(self.finish(StmtKind::ImportReq { name, alias }, start))
    }

    /// `target = value;` or a bare expression statement.
    fn parse_expr_or_assign(&mut self, start: Span) -> Result<Stmt, ParseError> {
        let expr = self.parse_expr()?;
        if self.cursor.eat(TokenKind::Assign) {
            if !is_assign_target(&expr) {
                return Err(ParseError::new("invalid assignment target", expr.span));
            }
            let value = self.parse_expr()?;
            self.expect_semicolon()?;
            return Ok(self.finish(
                StmtKind::Assign {
                    target: expr,
                    value,
                },
                start,
            ));
        }
        self.expect_semicolon()?;
        Ok(self.finish(StmtKind::ExprStmt(expr), start))
    }

    /// Parameter list between parentheses, including the `/` and bare `*`
    /// binding markers.
    pub(crate) fn parse_func_lit(&mut self, name: Option<Name>) -> Result<FuncLit, ParseError> {
        let open = *self.cursor.current();
        if !self.cursor.eat(TokenKind::LParen) {
            return Err(ParseError::unexpected(&open, "'('"));
        }
        let mut params: Vec<Param> = Vec::new();
        let mut kwarg_only = false;
        let mut seen_varkwarg = false;
        while !self.cursor.check(TokenKind::RParen) {
            if seen_varkwarg {
                return Err(ParseError::new(
                    "no parameters may follow '**'",
                    self.cursor.current_span(),
                ));
            }
            match self.cursor.current().kind {
                TokenKind::Slash => {
                    self.cursor.advance();
                    // Everything declared so far becomes positional-only.
                    for param in &mut params {
                        if param.kind == ParamKind::ArgOrKwarg {
                            param.kind = ParamKind::Arg;
                        }
                    }
                }
                TokenKind::Star => {
                    self.cursor.advance();
                    if let TokenKind::Ident(_) = self.cursor.current().kind {
                        let (pname, _) = self.expect_ident("parameter name")?;
                        params.push(Param::new(pname, ParamKind::Vararg));
                    }
                    // Either way, later named parameters are keyword-only.
                    kwarg_only = true;
                }
                TokenKind::StarStar => {
                    self.cursor.advance();
                    let (pname, _) = self.expect_ident("parameter name")?;
                    params.push(Param::new(pname, ParamKind::Varkwarg));
                    seen_varkwarg = true;
                }
                TokenKind::Ident(_) => {
                    let (pname, _) = self.expect_ident("parameter name")?;
                    let kind = if kwarg_only {
                        ParamKind::Kwarg
                    } else {
                        ParamKind::ArgOrKwarg
                    };
                    let mut param = Param::new(pname, kind);
                    if self.cursor.eat(TokenKind::Assign) {
                        param = param.with_default(self.parse_expr()?);
                    }
                    params.push(param);
                }
                _ => {
                    let token = *self.cursor.current();
                    return Err(ParseError::unexpected(&token, "a parameter"));
                }
            }
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = *self.cursor.current();
        if !self.cursor.eat(TokenKind::RParen) {
            return Err(ParseError::unexpected(&close, "')'"));
        }
        let body = self.parse_block()?;
        Ok(FuncLit { name, params, body })
    }

    // Small shared helpers

    fn optional_expr_before_semi(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.cursor.check(TokenKind::Semicolon) {
            Ok(None)
        } else {
            Ok(Some(self.parse_expr()?))
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> Result<(Name, Span), ParseError> {
        let token = *self.cursor.current();
        if let TokenKind::Ident(name) = token.kind {
            self.cursor.advance();
            Ok((name, token.span))
        } else {
            Err(ParseError::unexpected(&token, what))
        }
    }

    fn expect_version(&mut self) -> Result<Name, ParseError> {
        let token = *self.cursor.current();
        if let TokenKind::Version(name) = token.kind {
            self.cursor.advance();
            Ok(name)
        } else {
            Err(ParseError::unexpected(&token, "a version like 'v1.2'"))
        }
    }

    pub(crate) fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        let token = *self.cursor.current();
        if self.cursor.eat(TokenKind::Semicolon) {
            Ok(())
        } else {
            Err(ParseError::unexpected(&token, "';'"))
        }
    }

    /// Attach the merged span of everything consumed since `start`.
    fn finish(&self, kind: StmtKind, start: Span) -> Stmt {
        Stmt::new(kind, start.merge(self.cursor.previous_span()))
    }
}

/// Expressions that may appear on the left of `=`.
fn is_assign_target(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ident(_)
        | ExprKind::GetAttr { .. }
        | ExprKind::GetPriv { .. }
        | ExprKind::DynamicId(_) => true,
        ExprKind::Call { alt, .. } => *alt,
        _ => false,
    }
}
