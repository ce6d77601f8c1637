use crate::core::ast::{ImplicitCastExpr, ImportId, NodeId, NodeKind};
use crate::core::types::{TypeId, TypeKind};
use crate::error::DiagnosticKind;
use crate::frontend::semantic::analyzer::{Analyzer, ResolvedExpr};
use crate::frontend::semantic::scope::ScopeId;

/// classification of every cast the backend can be asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOp {
    // the call expression is not a cast at all
    NoCast,
    Noop,
    PtrToInt,
    IntToPtr,
    IntWidenOrShorten,
    ToSlice,
    MaybeWrap,
    ErrorWrap,
    PureErrorWrap,
    PointerReinterpret,
    ErrToInt,
}

impl<'a> Analyzer<'a> {
    /// structural equality up to constness: equal handles, or pointers /
    /// slices whose constness only gains const, recursively
    pub fn types_match_const_cast_only(&self, expected: TypeId, actual: TypeId) -> bool {
        if expected == actual {
            return true;
        }
        let expected_kind = &self.interner.entry(expected).kind;
        let actual_kind = &self.interner.entry(actual).kind;
        match (expected_kind, actual_kind) {
            (
                TypeKind::Pointer { pointee: expected_pointee, is_const: expected_const },
                TypeKind::Pointer { pointee: actual_pointee, is_const: actual_const },
            ) => {
                (!actual_const || *expected_const)
                    && self.types_match_const_cast_only(*expected_pointee, *actual_pointee)
            }
            (
                TypeKind::Slice { elem: expected_elem, is_const: expected_const },
                TypeKind::Slice { elem: actual_elem, is_const: actual_const },
            ) => {
                (!actual_const || *expected_const)
                    && self.types_match_const_cast_only(*expected_elem, *actual_elem)
            }
            (TypeKind::Maybe { child: expected_child }, TypeKind::Maybe { child: actual_child }) => {
                self.types_match_const_cast_only(*expected_child, *actual_child)
            }
            (
                TypeKind::ErrorUnion { ok: expected_ok },
                TypeKind::ErrorUnion { ok: actual_ok },
            ) => self.types_match_const_cast_only(*expected_ok, *actual_ok),
            // TODO decide parameter variance before matching fn types here
            (TypeKind::Fn(_), TypeKind::Fn(_)) => false,
            _ => false,
        }
    }

    /// whether the literal's value is representable in the other type;
    /// reports the mismatch (once) when it is not
    pub(crate) fn num_lit_fits_in_other_type(
        &mut self,
        literal_node: NodeId,
        other_type: TypeId,
        reported: &mut bool,
    ) -> bool {
        if self.interner.entry(other_type).is_invalid() {
            return false;
        }
        let value = match self.const_val(literal_node).and_then(|v| v.as_num()) {
            Some(num) => *num,
            // non-constant expression of literal type; nothing to check
            None => return true,
        };

        let other = self.interner.entry(other_type);
        match &other.kind {
            TypeKind::Float => return true,
            TypeKind::Int { is_signed } => {
                if value.is_int() && value.fits_in_bits(other.size_in_bits as u32, *is_signed) {
                    return true;
                }
            }
            TypeKind::NumLitFloat if value.is_float() => return true,
            TypeKind::NumLitInt if value.is_int() => return true,
            _ => {}
        }

        if !*reported {
            *reported = true;
            let kind_str = if value.is_float() { "float" } else { "integer" };
            let type_name = self.interner.name(other_type).to_string();
            self.add_node_error(
                literal_node,
                DiagnosticKind::Conversion,
                format!(
                    "{} value {} cannot be implicitly casted to type '{}'",
                    kind_str, value, type_name
                ),
            );
        }
        false
    }

    /// the implicit conversion relation; returns the cast the backend must
    /// perform when the types are implicitly compatible
    pub(crate) fn types_match_with_implicit_cast(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        literal_node: NodeId,
        reported: &mut bool,
    ) -> Option<CastOp> {
        if self.types_match_const_cast_only(expected, actual) {
            return Some(CastOp::Noop);
        }

        // wrapping a value into a maybe
        if let TypeKind::Maybe { child } = self.interner.entry(expected).kind {
            if self
                .types_match_with_implicit_cast(child, actual, literal_node, reported)
                .is_some()
            {
                return Some(CastOp::MaybeWrap);
            }
        }

        // wrapping an ok value into an error union
        if let TypeKind::ErrorUnion { ok } = self.interner.entry(expected).kind {
            if self
                .types_match_with_implicit_cast(ok, actual, literal_node, reported)
                .is_some()
            {
                return Some(CastOp::ErrorWrap);
            }
            if matches!(self.interner.entry(actual).kind, TypeKind::PureError) {
                return Some(CastOp::PureErrorWrap);
            }
        }

        // widening between integers of the same signedness
        if let (
            TypeKind::Int { is_signed: expected_signed },
            TypeKind::Int { is_signed: actual_signed },
        ) = (
            &self.interner.entry(expected).kind,
            &self.interner.entry(actual).kind,
        ) {
            if expected_signed == actual_signed
                && self.interner.size_in_bits(expected) >= self.interner.size_in_bits(actual)
            {
                return Some(CastOp::IntWidenOrShorten);
            }
        }

        // fixed size array to slice of the same element
        if let (
            TypeKind::Slice { elem: slice_elem, .. },
            TypeKind::Array { elem: array_elem, .. },
        ) = (
            &self.interner.entry(expected).kind,
            &self.interner.entry(actual).kind,
        ) {
            if self.types_match_const_cast_only(*slice_elem, *array_elem) {
                return Some(CastOp::ToSlice);
            }
        }

        // numeric literal that fits the target
        if self.interner.entry(actual).is_num_lit() {
            if self.num_lit_fits_in_other_type(literal_node, expected, reported) {
                return Some(CastOp::Noop);
            }
        }

        None
    }

    /// checks the actual type against an expectation, inserting an implicit
    /// cast node when a conversion applies
    pub(crate) fn resolve_type_compatibility(
        &mut self,
        scope: ScopeId,
        node: NodeId,
        expected: Option<TypeId>,
        actual: TypeId,
    ) -> TypeId {
        let Some(expected) = expected else {
            return actual;
        };
        if expected == actual {
            return expected;
        }
        if self.interner.entry(expected).is_invalid() || self.interner.entry(actual).is_invalid() {
            return self.interner.invalid;
        }
        if matches!(self.interner.entry(actual).kind, TypeKind::Unreachable) {
            return actual;
        }

        let mut reported = false;
        if let Some(op) = self.types_match_with_implicit_cast(expected, actual, node, &mut reported)
        {
            self.wrap_in_implicit_cast(scope, node, expected, op);
            return expected;
        }

        if !reported {
            let first = self.ast.first_executing_node(node);
            let expected_name = self.interner.name(expected).to_string();
            let actual_name = self.interner.name(actual).to_string();
            self.add_node_error(
                first,
                DiagnosticKind::Conversion,
                format!("expected type '{}', got '{}'", expected_name, actual_name),
            );
        }
        self.interner.invalid
    }

    /// rewrites `node` in place into an implicit cast whose operand is the
    /// original expression; handles stay valid because the arena slot is
    /// reused
    pub(crate) fn wrap_in_implicit_cast(
        &mut self,
        scope: ScopeId,
        node: NodeId,
        wanted: TypeId,
        op: CastOp,
    ) {
        let inner = self
            .ast
            .replace_with(node, NodeKind::ImplicitCast(ImplicitCastExpr { expr: NodeId(0) }));
        if let NodeKind::ImplicitCast(cast) = self.ast.kind_mut(node) {
            cast.expr = inner;
        }
        self.grow_side_tables();
        self.resolved[inner.0 as usize] = self.resolved[node.0 as usize].clone();
        self.meta[inner.0 as usize] = self.meta[node.0 as usize].clone();

        let const_val = self.eval_implicit_cast(op, inner, wanted);
        self.resolved[node.0 as usize] = ResolvedExpr {
            type_id: Some(wanted),
            const_val,
            cast_op: op,
        };

        // these conversions materialize a temporary
        if matches!(op, CastOp::ToSlice | CastOp::MaybeWrap | CastOp::ErrorWrap) {
            self.scopes.scope_mut(scope).cast_allocas.push(node);
        }
    }

    /// unify the types of sibling expressions; the tie-breaks mirror the
    /// conversion relation, except that two distinct concrete integer types
    /// never pick a direction
    pub(crate) fn determine_peer_type(
        &mut self,
        parent: NodeId,
        children: &[(Option<NodeId>, TypeId)],
    ) -> TypeId {
        let mut prev_node = children[0].0;
        let mut prev_type = children[0].1;
        if self.interner.entry(prev_type).is_invalid() {
            return prev_type;
        }
        for &(cur_node, cur_type) in &children[1..] {
            if self.interner.entry(cur_type).is_invalid() {
                return cur_type;
            }
            if self.types_match_const_cast_only(prev_type, cur_type) {
                continue;
            }
            if self.types_match_const_cast_only(cur_type, prev_type) {
                prev_node = cur_node;
                prev_type = cur_type;
                continue;
            }
            if matches!(self.interner.entry(prev_type).kind, TypeKind::Unreachable) {
                prev_node = cur_node;
                prev_type = cur_type;
                continue;
            }
            if matches!(self.interner.entry(cur_type).kind, TypeKind::Unreachable) {
                continue;
            }
            if matches!(self.interner.entry(prev_type).kind, TypeKind::Float)
                && matches!(self.interner.entry(cur_type).kind, TypeKind::Float)
            {
                if self.interner.size_in_bits(cur_type) > self.interner.size_in_bits(prev_type) {
                    prev_node = cur_node;
                    prev_type = cur_type;
                }
                continue;
            }
            if let TypeKind::ErrorUnion { ok } = self.interner.entry(prev_type).kind {
                if self.types_match_const_cast_only(ok, cur_type) {
                    continue;
                }
            }
            if let TypeKind::ErrorUnion { ok } = self.interner.entry(cur_type).kind {
                if self.types_match_const_cast_only(ok, prev_type) {
                    prev_node = cur_node;
                    prev_type = cur_type;
                    continue;
                }
            }
            if self.interner.entry(prev_type).is_num_lit() {
                let mut reported = false;
                if let Some(literal_node) = prev_node {
                    if self.num_lit_fits_in_other_type(literal_node, cur_type, &mut reported) {
                        prev_node = cur_node;
                        prev_type = cur_type;
                        continue;
                    }
                }
                return self.interner.invalid;
            }
            if self.interner.entry(cur_type).is_num_lit() {
                let mut reported = false;
                if let Some(literal_node) = cur_node {
                    if self.num_lit_fits_in_other_type(literal_node, prev_type, &mut reported) {
                        continue;
                    }
                }
                return self.interner.invalid;
            }

            let prev_name = self.interner.name(prev_type).to_string();
            let cur_name = self.interner.name(cur_type).to_string();
            self.add_node_error(
                parent,
                DiagnosticKind::Conversion,
                format!("incompatible types: '{}' and '{}'", prev_name, cur_name),
            );
            return self.interner.invalid;
        }
        prev_type
    }

    pub(crate) fn resolve_peer_type_compatibility(
        &mut self,
        scope: ScopeId,
        parent: NodeId,
        children: &[(Option<NodeId>, TypeId)],
    ) -> TypeId {
        debug_assert!(!children.is_empty());
        let expected = self.determine_peer_type(parent, children);
        if self.interner.entry(expected).is_invalid() {
            return expected;
        }
        for &(child, child_type) in children {
            let Some(child) = child else { continue };
            self.resolve_type_compatibility(scope, child, Some(expected), child_type);
        }
        expected
    }

    /// explicit cast `T(expr)`; classifies the conversion and attaches the
    /// classification to the call node
    pub(crate) fn analyze_cast_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
    ) -> TypeId {
        let (callee, params) = match self.ast.kind(node) {
            NodeKind::FnCall(call) => (call.callee, call.params.clone()),
            _ => return self.interner.invalid,
        };

        if params.len() != 1 {
            self.add_node_error(
                callee,
                DiagnosticKind::Type,
                "cast expression expects exactly one parameter".to_string(),
            );
            return self.interner.invalid;
        }

        let wanted = self.resolve_type(callee);
        let expr_node = params[0];
        let actual = self.analyze_expression(import, scope, None, expr_node);

        if self.interner.entry(wanted).is_invalid() || self.interner.entry(actual).is_invalid() {
            return self.interner.invalid;
        }

        let op = self.classify_explicit_cast(scope, node, expr_node, wanted, actual);
        let Some(op) = op else {
            return self.interner.invalid;
        };

        self.resolved[node.0 as usize].cast_op = op;
        let const_val = self.eval_implicit_cast(op, expr_node, wanted);
        self.resolved[node.0 as usize].const_val = const_val;
        wanted
    }

    fn classify_explicit_cast(
        &mut self,
        scope: ScopeId,
        node: NodeId,
        expr_node: NodeId,
        wanted: TypeId,
        actual: TypeId,
    ) -> Option<CastOp> {
        // exact match or non-const to const
        if self.types_match_const_cast_only(wanted, actual) {
            return Some(CastOp::Noop);
        }

        let wanted_kind = self.interner.entry(wanted).kind.clone();
        let actual_kind = self.interner.entry(actual).kind.clone();

        // pointer to isize or usize
        if (wanted == self.interner.isize_ || wanted == self.interner.usize_)
            && matches!(actual_kind, TypeKind::Pointer { .. })
        {
            return Some(CastOp::PtrToInt);
        }

        // isize or usize to pointer
        if matches!(wanted_kind, TypeKind::Pointer { .. })
            && (actual == self.interner.isize_ || actual == self.interner.usize_)
        {
            return Some(CastOp::IntToPtr);
        }

        // any int to any other int
        if matches!(wanted_kind, TypeKind::Int { .. }) && matches!(actual_kind, TypeKind::Int { .. })
        {
            return Some(CastOp::IntWidenOrShorten);
        }

        // fixed size array to slice
        if let (TypeKind::Slice { elem: slice_elem, .. }, TypeKind::Array { elem: array_elem, .. }) =
            (&wanted_kind, &actual_kind)
        {
            if self.types_match_const_cast_only(*slice_elem, *array_elem) {
                self.scopes.scope_mut(scope).cast_allocas.push(node);
                return Some(CastOp::ToSlice);
            }
        }

        // pointer to another pointer
        if matches!(actual_kind, TypeKind::Pointer { .. })
            && matches!(wanted_kind, TypeKind::Pointer { .. })
        {
            return Some(CastOp::PointerReinterpret);
        }

        // child type of a maybe to the maybe
        if let TypeKind::Maybe { child } = wanted_kind {
            if self.types_match_const_cast_only(child, actual) {
                self.scopes.scope_mut(scope).cast_allocas.push(node);
                return Some(CastOp::MaybeWrap);
            }
            if self.interner.entry(actual).is_num_lit() {
                let mut reported = false;
                if self.num_lit_fits_in_other_type(expr_node, child, &mut reported) {
                    self.scopes.scope_mut(scope).cast_allocas.push(node);
                    return Some(CastOp::MaybeWrap);
                }
                return None;
            }
        }

        // ok type of an error union to the error union
        if let TypeKind::ErrorUnion { ok } = wanted_kind {
            if self.types_match_const_cast_only(ok, actual) {
                self.scopes.scope_mut(scope).cast_allocas.push(node);
                return Some(CastOp::ErrorWrap);
            }
            if matches!(actual_kind, TypeKind::PureError) {
                return Some(CastOp::PureErrorWrap);
            }
            if self.interner.entry(actual).is_num_lit() {
                let mut reported = false;
                if self.num_lit_fits_in_other_type(expr_node, ok, &mut reported) {
                    self.scopes.scope_mut(scope).cast_allocas.push(node);
                    return Some(CastOp::ErrorWrap);
                }
                return None;
            }
        }

        // numeric literal to a concrete type
        if self.interner.entry(actual).is_num_lit() {
            let mut reported = false;
            if self.num_lit_fits_in_other_type(expr_node, wanted, &mut reported) {
                return Some(CastOp::Noop);
            }
            return None;
        }

        // an error tag to an integer wide enough for every error value
        let actual_is_void_err = matches!(actual_kind, TypeKind::ErrorUnion { ok }
            if self.interner.size_in_bits(ok) == 0);
        let actual_is_pure_err = matches!(actual_kind, TypeKind::PureError);
        if (actual_is_void_err || actual_is_pure_err)
            && matches!(wanted_kind, TypeKind::Int { is_signed: _ })
        {
            // error values run 0..count, so the target must hold count - 1
            let max_value = crate::core::bignum::BigNum::from_unsigned(
                self.error_value_count().saturating_sub(1),
            );
            let is_signed = matches!(wanted_kind, TypeKind::Int { is_signed: true });
            if max_value.fits_in_bits(self.interner.size_in_bits(wanted) as u32, is_signed) {
                return Some(CastOp::ErrToInt);
            }
            let wanted_name = self.interner.name(wanted).to_string();
            self.add_node_error(
                node,
                DiagnosticKind::Conversion,
                format!("too many error values to fit in '{}'", wanted_name),
            );
            return None;
        }

        let actual_name = self.interner.name(actual).to_string();
        let wanted_name = self.interner.name(wanted).to_string();
        self.add_node_error(
            node,
            DiagnosticKind::Conversion,
            format!(
                "invalid cast from type '{}' to '{}'",
                actual_name, wanted_name
            ),
        );
        None
    }
}
