pub mod analyzer;
pub mod builtins;
pub mod c_import;
pub mod const_eval;
pub mod conv;
pub mod decl_graph;
pub mod scope;
pub mod type_resolver;

pub use analyzer::{Analyzer, FnEntry, Import, NodeMeta, ResolvedExpr, Session};
pub use builtins::{BuiltinFn, BuiltinFnId};
pub use c_import::{HeaderIngest, HeaderIngestError, NullHeaderIngest};
pub use const_eval::ConstVal;
pub use conv::CastOp;
pub use decl_graph::DeclGraph;
pub use scope::{ErrorEntry, ErrorId, Scope, ScopeArena, ScopeId, Var, VarId};
