use crate::core::ast::*;
use crate::error::{Diagnostic, DiagnosticKind, Reporter};
use crate::frontend::lexer::token::{Token, TokenKind};
use codespan::{FileId, Span};

/// recursive descent over the token stream; nodes land in the shared arena
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    file_id: FileId,
    import: ImportId,
    ast: &'a mut Ast,
    reporter: &'a mut Reporter,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        file_id: FileId,
        import: ImportId,
        ast: &'a mut Ast,
        reporter: &'a mut Reporter,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
            import,
            ast,
            reporter,
        }
    }

    pub fn parse_root(&mut self) -> NodeId {
        let root_span = self.peek_span();
        let mut decls = Vec::new();
        while !self.check(&TokenKind::Eof) {
            let before = self.pos;
            if let Some(decl) = self.parse_top_level_decl() {
                decls.push(decl);
            }
            if self.pos == before {
                // always make progress
                self.advance();
            }
        }
        self.push(NodeKind::Root(RootNode { decls }), root_span)
    }

    // ---- declarations ----

    fn parse_top_level_decl(&mut self) -> Option<NodeId> {
        let directives = self.parse_directives();

        let mut visib = VisibMod::Private;
        if self.eat(&TokenKind::KwPub) {
            visib = VisibMod::Pub;
        } else if self.check(&TokenKind::KwExport) {
            // `export executable "name";` is the root export declaration;
            // any other token after `export` makes it a visibility modifier
            if matches!(self.peek_at(1), TokenKind::Identifier(_))
                && matches!(self.peek_at(2), TokenKind::StringLiteral { .. })
            {
                return self.parse_root_export(directives);
            }
            self.advance();
            visib = VisibMod::Export;
        }

        match self.peek() {
            TokenKind::KwFn => self.parse_fn(visib, false, directives),
            TokenKind::KwExtern => {
                self.advance();
                let proto = self.parse_fn_proto(visib, true, directives)?;
                self.expect(&TokenKind::Semicolon);
                Some(proto)
            }
            TokenKind::KwVar | TokenKind::KwConst => {
                self.reject_directives(&directives);
                self.parse_var_decl(visib)
            }
            TokenKind::KwStruct | TokenKind::KwEnum => {
                self.reject_directives(&directives);
                self.parse_container_decl(visib)
            }
            TokenKind::KwError => {
                self.reject_directives(&directives);
                let span = self.peek_span();
                self.advance();
                let (name, _) = self.expect_identifier()?;
                self.expect(&TokenKind::Semicolon);
                Some(self.push(NodeKind::ErrorValueDecl(ErrorValueDeclNode { name, visib }), span))
            }
            TokenKind::KwImport => {
                let span = self.peek_span();
                self.advance();
                let path = self.expect_string()?;
                self.expect(&TokenKind::Semicolon);
                Some(self.push(NodeKind::Import(ImportNode { path, directives }), span))
            }
            TokenKind::KwCImport => {
                self.reject_directives(&directives);
                let span = self.peek_span();
                self.advance();
                let block = self.parse_block()?;
                Some(self.push(NodeKind::CImport(CImportNode { block, directives: Vec::new() }), span))
            }
            other => {
                let message = format!("expected declaration, found {}", other.describe());
                let span = self.peek_span();
                self.syntax_error(span, &message);
                self.synchronize();
                None
            }
        }
    }

    fn parse_root_export(&mut self, directives: Vec<NodeId>) -> Option<NodeId> {
        let span = self.peek_span();
        self.advance(); // export
        let kind = match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                name
            }
            _ => return None,
        };
        let name = self.expect_string()?;
        self.expect(&TokenKind::Semicolon);
        Some(self.push(NodeKind::RootExport(RootExportDecl { kind, name, directives }), span))
    }

    fn parse_directives(&mut self) -> Vec<NodeId> {
        let mut directives = Vec::new();
        while let TokenKind::Directive(name) = self.peek().clone() {
            let span = self.peek_span();
            self.advance();
            self.expect(&TokenKind::LParen);
            let param = self.expect_string().unwrap_or_default();
            self.expect(&TokenKind::RParen);
            directives.push(self.push(NodeKind::Directive(DirectiveNode { name, param }), span));
        }
        directives
    }

    fn reject_directives(&mut self, directives: &[NodeId]) {
        for &directive in directives {
            if let NodeKind::Directive(d) = self.ast.kind(directive) {
                let message = format!("invalid directive: '{}'", d.name);
                let span = self.ast.span(directive);
                self.reporter.add_diagnostic(Diagnostic::error(
                    DiagnosticKind::Semantic,
                    span,
                    self.file_id,
                    message,
                ));
            }
        }
    }

    fn parse_fn(
        &mut self,
        visib: VisibMod,
        is_extern: bool,
        directives: Vec<NodeId>,
    ) -> Option<NodeId> {
        let proto = self.parse_fn_proto(visib, is_extern, directives)?;
        if self.check(&TokenKind::LBrace) {
            let span = self.ast.span(proto);
            let body = self.parse_block()?;
            Some(self.push(NodeKind::FnDef(FnDefNode { proto, body }), span))
        } else {
            self.expect(&TokenKind::Semicolon);
            Some(proto)
        }
    }

    fn parse_fn_proto(
        &mut self,
        visib: VisibMod,
        is_extern: bool,
        directives: Vec<NodeId>,
    ) -> Option<NodeId> {
        let span = self.peek_span();
        if !self.expect(&TokenKind::KwFn) {
            return None;
        }
        let (name, _) = self.expect_identifier()?;
        self.expect(&TokenKind::LParen);

        let mut params = Vec::new();
        let mut is_var_args = false;
        if !self.check(&TokenKind::RParen) {
            loop {
                if self.eat(&TokenKind::Ellipsis) {
                    is_var_args = true;
                    break;
                }
                let param_span = self.peek_span();
                let is_noalias = self.eat(&TokenKind::KwNoalias);
                let (param_name, _) = self.expect_identifier()?;
                self.expect(&TokenKind::Colon);
                let type_expr = self.parse_expr_no_init();
                params.push(self.push(
                    NodeKind::ParamDecl(ParamDeclNode {
                        name: param_name,
                        type_expr,
                        is_noalias,
                    }),
                    param_span,
                ));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen);

        let return_type = if self.eat(&TokenKind::Arrow) {
            Some(self.parse_expr_no_init())
        } else {
            None
        };

        Some(self.push(
            NodeKind::FnProto(FnProtoNode {
                name,
                params,
                return_type,
                is_var_args,
                is_extern,
                visib,
                directives,
            }),
            span,
        ))
    }

    fn parse_var_decl(&mut self, visib: VisibMod) -> Option<NodeId> {
        let span = self.peek_span();
        let is_const = matches!(self.peek(), TokenKind::KwConst);
        self.advance();
        let (name, _) = self.expect_identifier()?;
        let type_expr = if self.eat(&TokenKind::Colon) {
            Some(self.parse_expr_no_init())
        } else {
            None
        };
        let init = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon);
        Some(self.push(
            NodeKind::VarDecl(VarDeclNode {
                name,
                is_const,
                is_extern: false,
                visib,
                type_expr,
                init,
            }),
            span,
        ))
    }

    fn parse_container_decl(&mut self, visib: VisibMod) -> Option<NodeId> {
        let span = self.peek_span();
        let kind = if matches!(self.peek(), TokenKind::KwStruct) {
            ContainerKind::Struct
        } else {
            ContainerKind::Enum
        };
        self.advance();
        let (name, _) = self.expect_identifier()?;
        self.expect(&TokenKind::LBrace);

        let mut fields = Vec::new();
        let mut fns = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            let before = self.pos;
            match self.peek() {
                TokenKind::KwFn | TokenKind::KwPub | TokenKind::KwExport => {
                    let fn_visib = if self.eat(&TokenKind::KwPub) {
                        VisibMod::Pub
                    } else if self.eat(&TokenKind::KwExport) {
                        VisibMod::Export
                    } else {
                        VisibMod::Private
                    };
                    if let Some(fn_node) = self.parse_fn(fn_visib, false, Vec::new()) {
                        fns.push(fn_node);
                    }
                }
                TokenKind::Identifier(_) => {
                    let field_span = self.peek_span();
                    let (field_name, _) = self.expect_identifier()?;
                    let type_expr = if self.eat(&TokenKind::Colon) {
                        self.parse_expr_no_init()
                    } else {
                        // payload-less enum variant
                        self.push(
                            NodeKind::Symbol(SymbolExpr {
                                name: "void".to_string(),
                            }),
                            field_span,
                        )
                    };
                    fields.push(self.push(
                        NodeKind::ContainerField(ContainerFieldNode {
                            name: field_name,
                            type_expr,
                        }),
                        field_span,
                    ));
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                other => {
                    let message = format!("expected container member, found {}", other.describe());
                    let span = self.peek_span();
                    self.syntax_error(span, &message);
                    break;
                }
            }
            if self.pos == before {
                break;
            }
        }
        self.expect(&TokenKind::RBrace);

        Some(self.push(
            NodeKind::ContainerDecl(ContainerDeclNode {
                name,
                kind,
                fields,
                fns,
                visib,
            }),
            span,
        ))
    }

    // ---- statements ----

    fn parse_block(&mut self) -> Option<NodeId> {
        let span = self.peek_span();
        if !self.expect(&TokenKind::LBrace) {
            return None;
        }
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            let before = self.pos;

            if self.eat(&TokenKind::Semicolon) {
                continue;
            }

            // `name:` is a label
            if matches!(self.peek(), TokenKind::Identifier(_))
                && matches!(self.peek_at(1), TokenKind::Colon)
            {
                let label_span = self.peek_span();
                if let Some((label_name, _)) = self.expect_identifier() {
                    self.advance(); // colon
                    statements.push(
                        self.push(NodeKind::Label(LabelNode { name: label_name }), label_span),
                    );
                }
                continue;
            }

            if matches!(self.peek(), TokenKind::KwVar | TokenKind::KwConst) {
                if let Some(decl) = self.parse_var_decl(VisibMod::Private) {
                    statements.push(decl);
                }
                continue;
            }

            let expr = self.parse_expr();
            statements.push(expr);

            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            if self.check(&TokenKind::RBrace) {
                break;
            }
            if !self.is_block_like(expr) {
                let span = self.peek_span();
                let message = format!("expected ';', found {}", self.peek().describe());
                self.syntax_error(span, &message);
            }
            if self.pos == before {
                self.advance();
            }
        }
        self.expect(&TokenKind::RBrace);
        Some(self.push(NodeKind::Block(BlockExpr { statements }), span))
    }

    fn is_block_like(&self, node: NodeId) -> bool {
        matches!(
            self.ast.kind(node),
            NodeKind::Block(_)
                | NodeKind::IfBool(_)
                | NodeKind::IfVar(_)
                | NodeKind::While(_)
                | NodeKind::For(_)
                | NodeKind::Switch(_)
        )
    }

    // ---- expressions ----

    pub fn parse_expr(&mut self) -> NodeId {
        self.parse_assign(true)
    }

    fn parse_expr_no_init(&mut self) -> NodeId {
        self.parse_assign(false)
    }

    fn parse_assign(&mut self, allow_init: bool) -> NodeId {
        let lhs = self.parse_bool_or(allow_init);
        let op = match self.peek() {
            TokenKind::Eq => BinOp::Assign,
            TokenKind::StarEq => BinOp::AssignTimes,
            TokenKind::SlashEq => BinOp::AssignDiv,
            TokenKind::PercentEq => BinOp::AssignMod,
            TokenKind::PlusEq => BinOp::AssignPlus,
            TokenKind::MinusEq => BinOp::AssignMinus,
            TokenKind::ShlEq => BinOp::AssignBitShiftLeft,
            TokenKind::ShrEq => BinOp::AssignBitShiftRight,
            TokenKind::AmpEq => BinOp::AssignBitAnd,
            TokenKind::CaretEq => BinOp::AssignBitXor,
            TokenKind::PipeEq => BinOp::AssignBitOr,
            TokenKind::AmpAmpEq => BinOp::AssignBoolAnd,
            TokenKind::PipePipeEq => BinOp::AssignBoolOr,
            _ => return lhs,
        };
        let op_span = self.peek_span();
        self.advance();
        let rhs = self.parse_assign(allow_init);
        self.push(NodeKind::BinOp(BinOpExpr { op, op1: lhs, op2: rhs }), op_span)
    }

    fn parse_bool_or(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_bool_and(allow_init);
        while self.check(&TokenKind::PipePipe) {
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_bool_and(allow_init);
            lhs = self.push(
                NodeKind::BinOp(BinOpExpr { op: BinOp::BoolOr, op1: lhs, op2: rhs }),
                op_span,
            );
        }
        lhs
    }

    fn parse_bool_and(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_unwrap(allow_init);
        while self.check(&TokenKind::AmpAmp) {
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_unwrap(allow_init);
            lhs = self.push(
                NodeKind::BinOp(BinOpExpr { op: BinOp::BoolAnd, op1: lhs, op2: rhs }),
                op_span,
            );
        }
        lhs
    }

    fn parse_unwrap(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_comparison(allow_init);
        loop {
            match self.peek() {
                TokenKind::QuestionQuestion => {
                    let op_span = self.peek_span();
                    self.advance();
                    let rhs = self.parse_comparison(allow_init);
                    lhs = self.push(
                        NodeKind::BinOp(BinOpExpr {
                            op: BinOp::UnwrapMaybe,
                            op1: lhs,
                            op2: rhs,
                        }),
                        op_span,
                    );
                }
                TokenKind::PercentPercent => {
                    let op_span = self.peek_span();
                    self.advance();
                    let symbol = if self.eat(&TokenKind::Pipe) {
                        let sym = self.expect_identifier().map(|(name, sym_span)| {
                            self.push(NodeKind::Symbol(SymbolExpr { name }), sym_span)
                        });
                        self.expect(&TokenKind::Pipe);
                        sym
                    } else {
                        None
                    };
                    let rhs = self.parse_comparison(allow_init);
                    lhs = self.push(
                        NodeKind::UnwrapErr(UnwrapErrExpr { op1: lhs, symbol, op2: rhs }),
                        op_span,
                    );
                }
                _ => break,
            }
        }
        lhs
    }

    fn parse_comparison(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_bit_or(allow_init);
        loop {
            let op = match self.peek() {
                TokenKind::EqEq => BinOp::CmpEq,
                TokenKind::BangEq => BinOp::CmpNotEq,
                TokenKind::Lt => BinOp::CmpLessThan,
                TokenKind::Gt => BinOp::CmpGreaterThan,
                TokenKind::LtEq => BinOp::CmpLessOrEq,
                TokenKind::GtEq => BinOp::CmpGreaterOrEq,
                _ => break,
            };
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_bit_or(allow_init);
            lhs = self.push(NodeKind::BinOp(BinOpExpr { op, op1: lhs, op2: rhs }), op_span);
        }
        lhs
    }

    fn parse_bit_or(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_bit_xor(allow_init);
        while self.check(&TokenKind::Pipe) {
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_bit_xor(allow_init);
            lhs = self.push(
                NodeKind::BinOp(BinOpExpr { op: BinOp::BinOr, op1: lhs, op2: rhs }),
                op_span,
            );
        }
        lhs
    }

    fn parse_bit_xor(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_bit_and(allow_init);
        while self.check(&TokenKind::Caret) {
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_bit_and(allow_init);
            lhs = self.push(
                NodeKind::BinOp(BinOpExpr { op: BinOp::BinXor, op1: lhs, op2: rhs }),
                op_span,
            );
        }
        lhs
    }

    fn parse_bit_and(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_shift(allow_init);
        while self.check(&TokenKind::Amp) {
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_shift(allow_init);
            lhs = self.push(
                NodeKind::BinOp(BinOpExpr { op: BinOp::BinAnd, op1: lhs, op2: rhs }),
                op_span,
            );
        }
        lhs
    }

    fn parse_shift(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_add(allow_init);
        loop {
            let op = match self.peek() {
                TokenKind::Shl => BinOp::BitShiftLeft,
                TokenKind::Shr => BinOp::BitShiftRight,
                _ => break,
            };
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_add(allow_init);
            lhs = self.push(NodeKind::BinOp(BinOpExpr { op, op1: lhs, op2: rhs }), op_span);
        }
        lhs
    }

    fn parse_add(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_mul(allow_init);
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                TokenKind::PlusPlus => BinOp::StrCat,
                _ => break,
            };
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_mul(allow_init);
            lhs = self.push(NodeKind::BinOp(BinOpExpr { op, op1: lhs, op2: rhs }), op_span);
        }
        lhs
    }

    fn parse_mul(&mut self, allow_init: bool) -> NodeId {
        let mut lhs = self.parse_prefix(allow_init);
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mult,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let op_span = self.peek_span();
            self.advance();
            let rhs = self.parse_prefix(allow_init);
            lhs = self.push(NodeKind::BinOp(BinOpExpr { op, op1: lhs, op2: rhs }), op_span);
        }
        lhs
    }

    fn parse_prefix(&mut self, allow_init: bool) -> NodeId {
        let span = self.peek_span();
        let op = match self.peek() {
            TokenKind::Bang => PrefixOp::BoolNot,
            TokenKind::Tilde => PrefixOp::BinNot,
            TokenKind::Minus => PrefixOp::Negation,
            TokenKind::Star => PrefixOp::Dereference,
            TokenKind::Question => PrefixOp::Maybe,
            TokenKind::PercentPercent => PrefixOp::UnwrapError,
            TokenKind::Amp => {
                self.advance();
                let prefix_op = if self.eat(&TokenKind::KwConst) {
                    PrefixOp::ConstAddressOf
                } else {
                    PrefixOp::AddressOf
                };
                let expr = self.parse_prefix(allow_init);
                return self.push(NodeKind::PrefixOp(PrefixOpExpr { op: prefix_op, expr }), span);
            }
            TokenKind::Percent => {
                // %return propagates the error branch
                if matches!(self.peek_at(1), TokenKind::KwReturn) {
                    self.advance();
                    self.advance();
                    let expr = if self.expr_follows() {
                        Some(self.parse_expr())
                    } else {
                        None
                    };
                    return self.push(
                        NodeKind::Return(ReturnExpr { kind: ReturnKind::Error, expr }),
                        span,
                    );
                }
                PrefixOp::Error
            }
            _ => return self.parse_postfix(allow_init),
        };
        self.advance();
        let expr = self.parse_prefix(allow_init);
        self.push(NodeKind::PrefixOp(PrefixOpExpr { op, expr }), span)
    }

    fn parse_postfix(&mut self, allow_init: bool) -> NodeId {
        let mut expr = self.parse_primary(allow_init);
        loop {
            match self.peek() {
                TokenKind::LParen => {
                    let span = self.peek_span();
                    self.advance();
                    let mut params = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            params.push(self.parse_expr());
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(&TokenKind::RParen);
                    expr = self.push(
                        NodeKind::FnCall(FnCallExpr {
                            callee: expr,
                            params,
                            is_builtin: false,
                            builtin_name: None,
                        }),
                        span,
                    );
                }
                TokenKind::LBracket => {
                    let span = self.peek_span();
                    self.advance();
                    let start = self.parse_expr();
                    if self.eat(&TokenKind::DotDot) {
                        let end = if self.check(&TokenKind::RBracket) {
                            None
                        } else {
                            Some(self.parse_expr())
                        };
                        self.expect(&TokenKind::RBracket);
                        expr = self.push(
                            NodeKind::Slice(SliceExpr {
                                array: expr,
                                start,
                                end,
                                is_const: false,
                            }),
                            span,
                        );
                    } else {
                        self.expect(&TokenKind::RBracket);
                        expr = self.push(
                            NodeKind::ArrayAccess(ArrayAccessExpr { array: expr, subscript: start }),
                            span,
                        );
                    }
                }
                TokenKind::Dot => {
                    let span = self.peek_span();
                    self.advance();
                    let field_name = match self.expect_identifier() {
                        Some((name, _)) => name,
                        None => break,
                    };
                    expr = self.push(
                        NodeKind::FieldAccess(FieldAccessExpr { base: expr, field_name }),
                        span,
                    );
                }
                TokenKind::LBrace if allow_init => {
                    expr = self.parse_container_init(expr);
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_container_init(&mut self, type_expr: NodeId) -> NodeId {
        let span = self.peek_span();
        self.advance(); // {
        let mut entries = Vec::new();
        let kind = if self.check(&TokenKind::Dot) {
            // struct form: .field = expr, ...
            while self.check(&TokenKind::Dot) {
                let field_span = self.peek_span();
                self.advance();
                let name = match self.expect_identifier() {
                    Some((name, _)) => name,
                    None => break,
                };
                self.expect(&TokenKind::Eq);
                let value = self.parse_expr();
                entries.push(self.push(
                    NodeKind::StructValField(StructValField { name, expr: value }),
                    field_span,
                ));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            ContainerInitKind::Struct
        } else {
            if !self.check(&TokenKind::RBrace) {
                loop {
                    entries.push(self.parse_expr());
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                    if self.check(&TokenKind::RBrace) {
                        break;
                    }
                }
            }
            ContainerInitKind::Array
        };
        self.expect(&TokenKind::RBrace);
        self.push(
            NodeKind::ContainerInit(ContainerInitExpr { type_expr, kind, entries }),
            span,
        )
    }

    fn parse_primary(&mut self, allow_init: bool) -> NodeId {
        let span = self.peek_span();
        match self.peek().clone() {
            TokenKind::IntLiteral { value, overflow } => {
                self.advance();
                self.push(
                    NodeKind::NumberLit(NumberLitExpr {
                        kind: NumLitKind::Int,
                        value: NumLitValue::Int(value),
                        overflow,
                    }),
                    span,
                )
            }
            TokenKind::FloatLiteral(value) => {
                self.advance();
                self.push(
                    NodeKind::NumberLit(NumberLitExpr {
                        kind: NumLitKind::Float,
                        value: NumLitValue::Float(value),
                        overflow: !value.is_finite(),
                    }),
                    span,
                )
            }
            TokenKind::CharLiteral(value) => {
                self.advance();
                self.push(NodeKind::CharLit(value), span)
            }
            TokenKind::StringLiteral { value, is_c } => {
                self.advance();
                self.push(NodeKind::StringLit(StringLitExpr { value, is_c }), span)
            }
            TokenKind::KwTrue => {
                self.advance();
                self.push(NodeKind::BoolLit(true), span)
            }
            TokenKind::KwFalse => {
                self.advance();
                self.push(NodeKind::BoolLit(false), span)
            }
            TokenKind::KwNull => {
                self.advance();
                self.push(NodeKind::NullLit, span)
            }
            TokenKind::KwUndefined => {
                self.advance();
                self.push(NodeKind::UndefinedLit, span)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.push(NodeKind::Symbol(SymbolExpr { name }), span)
            }
            TokenKind::Builtin(name) => {
                self.advance();
                let callee = self.push(
                    NodeKind::Symbol(SymbolExpr { name: name.clone() }),
                    span,
                );
                self.expect(&TokenKind::LParen);
                let mut params = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        params.push(self.parse_expr());
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen);
                self.push(
                    NodeKind::FnCall(FnCallExpr {
                        callee,
                        params,
                        is_builtin: true,
                        builtin_name: Some(name),
                    }),
                    span,
                )
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr();
                self.expect(&TokenKind::RParen);
                expr
            }
            TokenKind::LBracket => {
                self.advance();
                if self.eat(&TokenKind::RBracket) {
                    let is_const = self.eat(&TokenKind::KwConst);
                    let elem = self.parse_prefix(false);
                    self.push(
                        NodeKind::ArrayType(ArrayTypeExpr { size: None, elem, is_const }),
                        span,
                    )
                } else {
                    let size = self.parse_expr();
                    self.expect(&TokenKind::RBracket);
                    let elem = self.parse_prefix(false);
                    self.push(
                        NodeKind::ArrayType(ArrayTypeExpr {
                            size: Some(size),
                            elem,
                            is_const: false,
                        }),
                        span,
                    )
                }
            }
            TokenKind::KwError => {
                self.advance();
                self.push(NodeKind::ErrorType, span)
            }
            TokenKind::KwReturn => {
                self.advance();
                let expr = if self.expr_follows() {
                    Some(self.parse_expr())
                } else {
                    None
                };
                self.push(
                    NodeKind::Return(ReturnExpr { kind: ReturnKind::Unconditional, expr }),
                    span,
                )
            }
            TokenKind::KwGoto => {
                self.advance();
                let name = self
                    .expect_identifier()
                    .map(|(name, _)| name)
                    .unwrap_or_default();
                self.push(NodeKind::Goto(GotoExpr { name }), span)
            }
            TokenKind::KwBreak => {
                self.advance();
                self.push(NodeKind::Break, span)
            }
            TokenKind::KwContinue => {
                self.advance();
                self.push(NodeKind::Continue, span)
            }
            TokenKind::KwIf => self.parse_if(allow_init),
            TokenKind::KwWhile => {
                self.advance();
                self.expect(&TokenKind::LParen);
                let condition = self.parse_expr();
                self.expect(&TokenKind::RParen);
                let body = self.parse_block_or_expr(allow_init);
                self.push(NodeKind::While(WhileExpr { condition, body }), span)
            }
            TokenKind::KwFor => {
                self.advance();
                self.expect(&TokenKind::LParen);
                let elem = match self.expect_identifier() {
                    Some((name, elem_span)) => {
                        self.push(NodeKind::Symbol(SymbolExpr { name }), elem_span)
                    }
                    None => self.error_node(span),
                };
                self.expect(&TokenKind::Comma);
                let array = self.parse_expr();
                let index = if self.eat(&TokenKind::Comma) {
                    self.expect_identifier().map(|(name, index_span)| {
                        self.push(NodeKind::Symbol(SymbolExpr { name }), index_span)
                    })
                } else {
                    None
                };
                self.expect(&TokenKind::RParen);
                let body = self.parse_block_or_expr(allow_init);
                self.push(NodeKind::For(ForExpr { elem, array, index, body }), span)
            }
            TokenKind::KwSwitch => self.parse_switch(),
            TokenKind::LBrace => self.parse_block().unwrap_or_else(|| self.error_node(span)),
            other => {
                let message = format!("invalid token: {}", other.describe());
                self.syntax_error(span, &message);
                // consume the offending token unless it closes something
                if !matches!(
                    other,
                    TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket
                        | TokenKind::Semicolon | TokenKind::Eof
                ) {
                    self.advance();
                }
                self.error_node(span)
            }
        }
    }

    fn parse_if(&mut self, allow_init: bool) -> NodeId {
        let span = self.peek_span();
        self.advance(); // if
        self.expect(&TokenKind::LParen);

        if matches!(self.peek(), TokenKind::KwVar | TokenKind::KwConst) {
            let is_const = matches!(self.peek(), TokenKind::KwConst);
            self.advance();
            let var_name = self
                .expect_identifier()
                .map(|(name, _)| name)
                .unwrap_or_default();
            let type_expr = if self.eat(&TokenKind::Colon) {
                Some(self.parse_expr_no_init())
            } else {
                None
            };
            self.expect(&TokenKind::QuestionEq);
            let init = self.parse_expr();
            self.expect(&TokenKind::RParen);
            let then_block = self.parse_block_or_expr(allow_init);
            let else_node = if self.eat(&TokenKind::KwElse) {
                Some(self.parse_block_or_expr(allow_init))
            } else {
                None
            };
            return self.push(
                NodeKind::IfVar(IfVarExpr {
                    var_name,
                    is_const,
                    type_expr,
                    init,
                    then_block,
                    else_node,
                }),
                span,
            );
        }

        let condition = self.parse_expr();
        self.expect(&TokenKind::RParen);
        let then_block = self.parse_block_or_expr(allow_init);
        let else_node = if self.eat(&TokenKind::KwElse) {
            Some(self.parse_block_or_expr(allow_init))
        } else {
            None
        };
        self.push(
            NodeKind::IfBool(IfBoolExpr { condition, then_block, else_node }),
            span,
        )
    }

    fn parse_switch(&mut self) -> NodeId {
        let span = self.peek_span();
        self.advance(); // switch
        self.expect(&TokenKind::LParen);
        let expr = self.parse_expr();
        self.expect(&TokenKind::RParen);
        self.expect(&TokenKind::LBrace);

        let mut prongs = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            let prong_span = self.peek_span();
            let mut items = Vec::new();
            if !self.eat(&TokenKind::KwElse) {
                loop {
                    let item = self.parse_expr();
                    if self.eat(&TokenKind::Ellipsis) {
                        let end = self.parse_expr();
                        let range_span = self.ast.span(item);
                        items.push(
                            self.push(NodeKind::SwitchRange { start: item, end }, range_span),
                        );
                    } else {
                        items.push(item);
                    }
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                    if self.check(&TokenKind::FatArrow) {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::FatArrow);
            let payload = if self.eat(&TokenKind::Pipe) {
                let sym = self.expect_identifier().map(|(name, sym_span)| {
                    self.push(NodeKind::Symbol(SymbolExpr { name }), sym_span)
                });
                self.expect(&TokenKind::Pipe);
                sym
            } else {
                None
            };
            let prong_expr = self.parse_expr();
            prongs.push(self.push(
                NodeKind::SwitchProng(SwitchProng { items, payload, expr: prong_expr }),
                prong_span,
            ));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace);
        self.push(NodeKind::Switch(SwitchExpr { expr, prongs }), span)
    }

    fn parse_block_or_expr(&mut self, allow_init: bool) -> NodeId {
        if self.check(&TokenKind::LBrace) {
            let span = self.peek_span();
            self.parse_block().unwrap_or_else(|| self.error_node(span))
        } else {
            self.parse_assign(allow_init)
        }
    }

    /// whether a token that can begin an expression is next; used after
    /// `return` to decide between `return;` and `return expr;`
    fn expr_follows(&self) -> bool {
        !matches!(
            self.peek(),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::RParen
                | TokenKind::Comma | TokenKind::Eof
        )
    }

    // ---- helpers ----

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.ast.push(kind, span, self.import)
    }

    fn error_node(&mut self, span: Span) -> NodeId {
        self.push(
            NodeKind::Symbol(SymbolExpr {
                name: "(error)".to_string(),
            }),
            span,
        )
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn peek_at(&self, n: usize) -> &TokenKind {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos.min(self.tokens.len() - 1)].span
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let span = self.peek_span();
        let message = format!(
            "expected {}, found {}",
            kind.describe(),
            self.peek().describe()
        );
        self.syntax_error(span, &message);
        false
    }

    fn expect_identifier(&mut self) -> Option<(String, Span)> {
        let span = self.peek_span();
        if let TokenKind::Identifier(name) = self.peek().clone() {
            self.advance();
            Some((name, span))
        } else {
            let message = format!("expected identifier, found {}", self.peek().describe());
            self.syntax_error(span, &message);
            None
        }
    }

    fn expect_string(&mut self) -> Option<String> {
        if let TokenKind::StringLiteral { value, .. } = self.peek().clone() {
            self.advance();
            Some(String::from_utf8_lossy(&value).to_string())
        } else {
            let span = self.peek_span();
            let message = format!("expected string literal, found {}", self.peek().describe());
            self.syntax_error(span, &message);
            None
        }
    }

    fn syntax_error(&mut self, span: Span, message: &str) {
        self.reporter.add_diagnostic(Diagnostic::error(
            DiagnosticKind::Parse,
            span,
            self.file_id,
            message.to_string(),
        ));
    }

    fn synchronize(&mut self) {
        while !self.check(&TokenKind::Eof) {
            if self.eat(&TokenKind::Semicolon) {
                return;
            }
            match self.peek() {
                TokenKind::KwFn | TokenKind::KwVar | TokenKind::KwConst | TokenKind::KwStruct
                | TokenKind::KwEnum | TokenKind::KwError | TokenKind::KwImport
                | TokenKind::KwCImport | TokenKind::KwExtern | TokenKind::KwExport
                | TokenKind::KwPub => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
