//! Foreign AST vocabulary produced by the expression transpiler.
//!
//! Nodes follow the ESTree/Babel shape and serialize with a `"type"` tag, so
//! `serde_json::to_value` yields JSON directly consumable by downstream code
//! generation in the host ecosystem. The output is strictly tree-shaped:
//! every node is owned by exactly one parent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsNode {
    Program {
        body: Vec<JsNode>,
    },
    ExpressionStatement {
        expression: Box<JsNode>,
    },
    Identifier {
        name: String,
    },
    StringLiteral {
        value: String,
    },
    NumericLiteral {
        value: f64,
    },
    TemplateLiteral {
        quasis: Vec<TemplateElement>,
        expressions: Vec<JsNode>,
    },
    CallExpression {
        callee: Box<JsNode>,
        arguments: Vec<JsNode>,
    },
    MemberExpression {
        object: Box<JsNode>,
        property: Box<JsNode>,
    },
    ArrowFunctionExpression {
        params: Vec<JsNode>,
        body: Box<JsNode>,
    },
}

/// One literal-text fragment of a template literal. The final quasi of a
/// template carries `tail: true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElement {
    pub cooked: String,
    pub tail: bool,
}

impl TemplateElement {
    pub fn new(cooked: impl Into<String>, tail: bool) -> Self {
        Self {
            cooked: cooked.into(),
            tail,
        }
    }
}

impl JsNode {
    pub fn program(body: Vec<JsNode>) -> JsNode {
        JsNode::Program { body }
    }

    pub fn statement(expression: JsNode) -> JsNode {
        JsNode::ExpressionStatement {
            expression: Box::new(expression),
        }
    }

    pub fn ident(name: impl Into<String>) -> JsNode {
        JsNode::Identifier { name: name.into() }
    }

    pub fn string(value: impl Into<String>) -> JsNode {
        JsNode::StringLiteral {
            value: value.into(),
        }
    }

    pub fn number(value: f64) -> JsNode {
        JsNode::NumericLiteral { value }
    }

    pub fn template(quasis: Vec<TemplateElement>, expressions: Vec<JsNode>) -> JsNode {
        JsNode::TemplateLiteral {
            quasis,
            expressions,
        }
    }

    pub fn call(callee: JsNode, arguments: Vec<JsNode>) -> JsNode {
        JsNode::CallExpression {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn member(object: JsNode, property: JsNode) -> JsNode {
        JsNode::MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
        }
    }

    pub fn arrow(params: Vec<JsNode>, body: JsNode) -> JsNode {
        JsNode::ArrowFunctionExpression {
            params,
            body: Box::new(body),
        }
    }
}
