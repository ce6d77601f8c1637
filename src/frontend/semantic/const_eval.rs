use crate::core::ast::{BinOp, NodeId, NodeKind};
use crate::core::bignum::{BigNum, BigNumError};
use crate::core::types::{FnId, TypeId, TypeKind};
use crate::error::DiagnosticKind;
use crate::frontend::semantic::analyzer::Analyzer;
use crate::frontend::semantic::conv::CastOp;
use crate::frontend::semantic::scope::ErrorId;
use std::rc::Rc;

/// compile time value. absence of a value means the expression could not be
/// evaluated; `Undef` is a value that was deliberately left uninitialized.
#[derive(Debug, Clone)]
pub enum ConstVal {
    Num(BigNum),
    Bool(bool),
    Undef,
    Void,
    Fn(FnId),
    Type(TypeId),
    Null,
    Maybe(Box<ConstVal>),
    Err {
        // none means the ok branch
        err: Option<ErrorId>,
        payload: Option<Box<ConstVal>>,
    },
    EnumTag {
        tag: u64,
        payload: Option<Box<ConstVal>>,
    },
    Struct(Vec<ConstVal>),
    // element storage is shared, not copied, when arrays convert to slices
    Array(Rc<Vec<ConstVal>>),
    Slice {
        elems: Rc<Vec<ConstVal>>,
        len: u64,
    },
    // len is 1 for ordinary pointers; c strings carry their full text
    Ptr {
        elems: Rc<Vec<ConstVal>>,
        len: u64,
    },
}

impl ConstVal {
    pub fn as_num(&self) -> Option<&BigNum> {
        match self {
            ConstVal::Num(num) => Some(num),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstVal::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            ConstVal::Type(type_id) => Some(*type_id),
            _ => None,
        }
    }
}

impl<'a> Analyzer<'a> {
    pub(crate) fn resolve_const_void(&mut self, node: NodeId) -> TypeId {
        self.set_const(node, ConstVal::Void);
        self.interner.void
    }

    pub(crate) fn resolve_const_type(&mut self, node: NodeId, type_id: TypeId) -> TypeId {
        self.set_const(node, ConstVal::Type(type_id));
        self.interner.meta_type
    }

    pub(crate) fn resolve_const_bool(&mut self, node: NodeId, value: bool) -> TypeId {
        self.set_const(node, ConstVal::Bool(value));
        self.interner.bool_
    }

    pub(crate) fn resolve_const_null(&mut self, node: NodeId, maybe_type: TypeId) -> TypeId {
        self.set_const(node, ConstVal::Null);
        maybe_type
    }

    pub(crate) fn resolve_const_fn(&mut self, node: NodeId, fn_id: FnId) -> TypeId {
        self.set_const(node, ConstVal::Fn(fn_id));
        self.fns[fn_id.0 as usize].type_id
    }

    pub(crate) fn resolve_const_err(&mut self, node: NodeId, err: ErrorId) -> TypeId {
        self.set_const(
            node,
            ConstVal::Err {
                err: Some(err),
                payload: None,
            },
        );
        self.interner.pure_error
    }

    pub(crate) fn resolve_const_unsigned_num_lit(&mut self, node: NodeId, x: u64) -> TypeId {
        self.set_const(node, ConstVal::Num(BigNum::from_unsigned(x)));
        self.interner.num_lit_int
    }

    pub(crate) fn resolve_const_float_num_lit(
        &mut self,
        node: NodeId,
        expected: Option<TypeId>,
        x: f64,
    ) -> TypeId {
        self.set_const(node, ConstVal::Num(BigNum::from_float(x)));
        if let Some(expected) = expected {
            let mut reported = false;
            self.num_lit_fits_in_other_type(node, expected, &mut reported);
            expected
        } else {
            self.interner.num_lit_float
        }
    }

    pub(crate) fn resolve_const_string_lit(&mut self, node: NodeId, bytes: &[u8]) -> TypeId {
        let chars: Vec<ConstVal> = bytes
            .iter()
            .map(|&b| ConstVal::Num(BigNum::from_unsigned(b as u64)))
            .collect();
        self.set_const(node, ConstVal::Array(Rc::new(chars)));
        self.interner.array_of(self.interner.u8_, bytes.len() as u64)
    }

    pub(crate) fn resolve_const_c_string_lit(&mut self, node: NodeId, bytes: &[u8]) -> TypeId {
        let mut chars: Vec<ConstVal> = bytes
            .iter()
            .map(|&b| ConstVal::Num(BigNum::from_unsigned(b as u64)))
            .collect();
        chars.push(ConstVal::Num(BigNum::from_unsigned(0)));
        let len = chars.len() as u64;
        self.set_const(
            node,
            ConstVal::Ptr {
                elems: Rc::new(chars),
                len,
            },
        );
        self.interner.pointer_to(self.interner.u8_, true)
    }

    /// constant propagation from a const variable's initializer; the result
    /// type is the initializer's resolved type
    pub(crate) fn resolve_const_copy(&mut self, node: NodeId, other: NodeId) -> TypeId {
        let const_val = self.const_val(other).cloned();
        if let Some(value) = const_val {
            self.set_const(node, value);
        }
        self.expr_type(other)
    }

    /// fold a binary numeric operation over constant operands
    pub(crate) fn eval_const_bignum_op(
        &mut self,
        node: NodeId,
        op: BinOp,
        op1: NodeId,
        op2: NodeId,
        resolved_type: TypeId,
    ) -> TypeId {
        let lhs = match self.const_val(op1).and_then(|v| v.as_num()) {
            Some(num) => *num,
            None => return resolved_type,
        };
        let rhs = match self.const_val(op2).and_then(|v| v.as_num()) {
            Some(num) => *num,
            None => return resolved_type,
        };

        let result = match op {
            BinOp::Add => BigNum::add(&lhs, &rhs),
            BinOp::Sub => BigNum::sub(&lhs, &rhs),
            BinOp::Mult => BigNum::mul(&lhs, &rhs),
            BinOp::Div => BigNum::div(&lhs, &rhs),
            BinOp::Mod => BigNum::rem(&lhs, &rhs),
            BinOp::BinOr => BigNum::bit_or(&lhs, &rhs),
            BinOp::BinAnd => BigNum::bit_and(&lhs, &rhs),
            BinOp::BinXor => BigNum::bit_xor(&lhs, &rhs),
            BinOp::BitShiftLeft => BigNum::shl(&lhs, &rhs),
            BinOp::BitShiftRight => BigNum::shr(&lhs, &rhs),
            _ => return resolved_type,
        };

        match result {
            Ok(value) => {
                self.set_const(node, ConstVal::Num(value));
                let mut reported = false;
                self.num_lit_fits_in_other_type(node, resolved_type, &mut reported);
            }
            Err(BigNumError::Overflow) => {
                self.add_node_error(
                    node,
                    DiagnosticKind::Semantic,
                    "value cannot be represented in any integer type".to_string(),
                );
            }
            Err(BigNumError::DivByZero) => {
                self.add_node_error(
                    node,
                    DiagnosticKind::Semantic,
                    "division by zero".to_string(),
                );
            }
        }

        resolved_type
    }

    /// value rule for each cast classification; absent operand value means
    /// absent result value
    pub(crate) fn eval_implicit_cast(
        &mut self,
        op: CastOp,
        expr_node: NodeId,
        _wanted: TypeId,
    ) -> Option<ConstVal> {
        let other = self.const_val(expr_node)?.clone();
        match op {
            CastOp::NoCast => None,
            CastOp::Noop | CastOp::IntWidenOrShorten | CastOp::PointerReinterpret => Some(other),
            // not computable at compile time
            CastOp::PtrToInt | CastOp::IntToPtr => None,
            CastOp::ToSlice => {
                let len = match &self.interner.entry(self.expr_type(expr_node)).kind {
                    TypeKind::Array { len, .. } => *len,
                    _ => return None,
                };
                match other {
                    ConstVal::Array(elems) => Some(ConstVal::Slice { elems, len }),
                    _ => None,
                }
            }
            CastOp::MaybeWrap => Some(ConstVal::Maybe(Box::new(other))),
            CastOp::ErrorWrap => Some(ConstVal::Err {
                err: None,
                payload: Some(Box::new(other)),
            }),
            CastOp::PureErrorWrap => match other {
                ConstVal::Err { err, .. } => Some(ConstVal::Err { err, payload: None }),
                _ => None,
            },
            CastOp::ErrToInt => match other {
                ConstVal::Err { err, .. } => {
                    let value = err
                        .map(|e| self.error_values[e.0 as usize].value)
                        .unwrap_or(0);
                    Some(ConstVal::Num(BigNum::from_unsigned(value)))
                }
                _ => None,
            },
        }
    }

    /// bytes of a constant u8 slice value (e.g. a resolved string literal)
    pub(crate) fn const_slice_bytes(&self, node: NodeId) -> Option<Vec<u8>> {
        match self.const_val(node)? {
            ConstVal::Slice { elems, len } => {
                let mut bytes = Vec::with_capacity(*len as usize);
                for elem in elems.iter().take(*len as usize) {
                    let num = elem.as_num()?;
                    bytes.push(num.unsigned_value() as u8);
                }
                Some(bytes)
            }
            _ => None,
        }
    }

    /// constant string concatenation; both operands must already hold
    /// constant u8 slices
    pub(crate) fn eval_const_str_cat(
        &mut self,
        node: NodeId,
        op1: NodeId,
        op2: NodeId,
    ) -> Option<()> {
        let (lhs_elems, lhs_len) = match self.const_val(op1)? {
            ConstVal::Slice { elems, len } => (elems.clone(), *len),
            _ => return None,
        };
        let (rhs_elems, rhs_len) = match self.const_val(op2)? {
            ConstVal::Slice { elems, len } => (elems.clone(), *len),
            _ => return None,
        };
        let mut combined = Vec::with_capacity((lhs_len + rhs_len) as usize);
        combined.extend(lhs_elems.iter().take(lhs_len as usize).cloned());
        combined.extend(rhs_elems.iter().take(rhs_len as usize).cloned());
        self.set_const(
            node,
            ConstVal::Slice {
                elems: Rc::new(combined),
                len: lhs_len + rhs_len,
            },
        );
        Some(())
    }

    /// a void value expression synthesized for `return;`
    pub(crate) fn synthesize_void_node(&mut self, source_node: NodeId) -> NodeId {
        let span = self.ast.span(source_node);
        let owner = self.ast.owner(source_node);
        let type_node = self.ast.push(
            NodeKind::Symbol(crate::core::ast::SymbolExpr {
                name: "void".to_string(),
            }),
            span,
            owner,
        );
        let void_node = self.ast.push(
            NodeKind::ContainerInit(crate::core::ast::ContainerInitExpr {
                type_expr: type_node,
                kind: crate::core::ast::ContainerInitKind::Array,
                entries: Vec::new(),
            }),
            span,
            owner,
        );
        self.grow_side_tables();
        void_node
    }
}
