use crate::core::ast::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibMod {
    Private,
    Pub,
    Export,
}

#[derive(Debug, Clone)]
pub struct RootNode {
    pub decls: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct RootExportDecl {
    // "executable", "lib", or "obj"
    pub kind: String,
    pub name: String,
    pub directives: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct DirectiveNode {
    pub name: String,
    pub param: String,
}

#[derive(Debug, Clone)]
pub struct FnProtoNode {
    pub name: String,
    pub params: Vec<NodeId>,
    // none means void
    pub return_type: Option<NodeId>,
    pub is_var_args: bool,
    pub is_extern: bool,
    pub visib: VisibMod,
    pub directives: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ParamDeclNode {
    pub name: String,
    pub type_expr: NodeId,
    pub is_noalias: bool,
}

#[derive(Debug, Clone)]
pub struct FnDefNode {
    pub proto: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone)]
pub struct VarDeclNode {
    pub name: String,
    pub is_const: bool,
    pub is_extern: bool,
    pub visib: VisibMod,
    // one or both of type_expr and init are present
    pub type_expr: Option<NodeId>,
    pub init: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ErrorValueDeclNode {
    pub name: String,
    pub visib: VisibMod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Struct,
    Enum,
}

#[derive(Debug, Clone)]
pub struct ContainerDeclNode {
    pub name: String,
    pub kind: ContainerKind,
    pub fields: Vec<NodeId>,
    pub fns: Vec<NodeId>,
    pub visib: VisibMod,
}

#[derive(Debug, Clone)]
pub struct ContainerFieldNode {
    pub name: String,
    pub type_expr: NodeId,
}

#[derive(Debug, Clone)]
pub struct ImportNode {
    pub path: String,
    pub directives: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CImportNode {
    pub block: NodeId,
    pub directives: Vec<NodeId>,
}
