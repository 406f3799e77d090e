//! Expression transpiler: Python-subset source to an ESTree-shaped AST.
//!
//! A [`PythonExpression`] session owns one source string and one immutable
//! error log. `transpile` folds the concrete syntax tree bottom-up through
//! the per-rule dispatch in [`reduce_node`]; intermediate auxiliary records
//! (call arguments, member properties, parameter lists) pass structured data
//! one level up the tree and never escape into the final program.

pub mod js_ast;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{invalid_number, unsupported_node, Result, SpliceError, SyntaxError};
use crate::reduce::{fold, passthrough};
pub use js_ast::{JsNode, TemplateElement};

const SOURCE_NAME: &str = "expression";

#[derive(Parser)]
#[grammar = "python/grammar.pest"]
struct ExpressionParser;

/// Result of reducing one CST node: either a genuine foreign-AST node or a
/// tagged auxiliary record consumed by the parent rule.
enum Reduced {
    Node(JsNode),
    /// Plain array produced by an argument list, before the call wraps it.
    List(Vec<JsNode>),
    /// A call trailer's argument array.
    CallArgs(Vec<JsNode>),
    /// A member-access trailer's property identifier.
    Property(JsNode),
    /// A lambda's parameter identifiers.
    Params(Vec<JsNode>),
}

/// One parsing session over a Python-subset expression source.
pub struct PythonExpression {
    source: String,
    errors: Vec<SyntaxError>,
}

impl PythonExpression {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut errors = Vec::new();
        if let Err(error) = ExpressionParser::parse(Rule::file, &source) {
            errors.push(SyntaxError::from_pest(&error));
        }
        Self { source, errors }
    }

    /// True iff the session's error log is empty.
    pub fn can_parse(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Fails with one aggregated error listing every collected syntax error,
    /// one `line:column message` per line; no-op when the log is empty.
    pub fn check_errors(&self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SpliceError::Syntax(self.errors.clone()))
        }
    }

    /// Transpile the source into a foreign `Program` node.
    pub fn transpile(&self) -> Result<JsNode> {
        self.check_errors()?;
        let mut pairs = ExpressionParser::parse(Rule::file, &self.source)
            .map_err(|error| SpliceError::Syntax(vec![SyntaxError::from_pest(&error)]))?;
        let Some(file) = pairs.next() else {
            return Ok(JsNode::program(vec![]));
        };
        match fold(file.clone(), &mut |pair, children| {
            self.reduce_node(pair, children)
        })? {
            Reduced::Node(program @ JsNode::Program { .. }) => Ok(program),
            _ => Err(self.unsupported(&file)),
        }
    }

    fn reduce_node(&self, pair: Pair<Rule>, children: Vec<Reduced>) -> Result<Reduced> {
        match pair.as_rule() {
            Rule::file => {
                let mut body = Vec::with_capacity(children.len());
                for child in children {
                    match child {
                        Reduced::Node(statement) => body.push(statement),
                        _ => return Err(self.unsupported(&pair)),
                    }
                }
                Ok(Reduced::Node(JsNode::program(body)))
            }

            Rule::expr_stmt => {
                let mut results = children.into_iter();
                match (results.next(), results.next()) {
                    (Some(Reduced::Node(expression)), None) => {
                        Ok(Reduced::Node(JsNode::statement(expression)))
                    }
                    _ => Err(self.unsupported(&pair)),
                }
            }

            Rule::atom => self.reduce_atom(pair, children),
            Rule::atom_expr => self.reduce_atom_expr(pair, children),
            Rule::trailer => self.reduce_trailer(pair, children),

            Rule::call_args => {
                let mut results = children.into_iter();
                match (results.next(), results.next()) {
                    (Some(Reduced::List(arguments)), None) => Ok(Reduced::CallArgs(arguments)),
                    _ => Err(self.unsupported(&pair)),
                }
            }

            Rule::arglist => {
                let mut arguments = Vec::with_capacity(children.len());
                for child in children {
                    match child {
                        Reduced::Node(argument) => arguments.push(argument),
                        _ => return Err(self.unsupported(&pair)),
                    }
                }
                Ok(Reduced::List(arguments))
            }

            Rule::vfpdef => {
                // A formal parameter is a single bare name; the grammar's
                // typed/default extensions are unsupported.
                let inner: Vec<Pair<Rule>> = pair.clone().into_inner().collect();
                match inner.as_slice() {
                    [name] if name.as_rule() == Rule::name => {
                        Ok(Reduced::Node(JsNode::ident(name.as_str())))
                    }
                    _ => Err(self.unsupported(&pair)),
                }
            }

            Rule::varargslist => {
                let mut params = Vec::with_capacity(children.len());
                for child in children {
                    match child {
                        Reduced::Node(param) => params.push(param),
                        _ => return Err(self.unsupported(&pair)),
                    }
                }
                Ok(Reduced::Params(params))
            }

            Rule::lambdef => {
                let mut results = children.into_iter();
                match (results.next(), results.next(), results.next()) {
                    (Some(Reduced::Params(params)), Some(Reduced::Node(body)), None) => {
                        Ok(Reduced::Node(JsNode::arrow(params, body)))
                    }
                    _ => Err(self.unsupported(&pair)),
                }
            }

            Rule::template_string => self.reduce_template(pair, children),

            _ => passthrough(SOURCE_NAME, &self.source, &pair, children),
        }
    }

    fn reduce_atom(&self, pair: Pair<Rule>, children: Vec<Reduced>) -> Result<Reduced> {
        if !children.is_empty() {
            // Template strings and parenthesised expressions arrive here
            // already reduced.
            return passthrough(SOURCE_NAME, &self.source, &pair, children);
        }
        let inner: Vec<Pair<Rule>> = pair.clone().into_inner().collect();
        match inner.first().map(Pair::as_rule) {
            // An empty template (`f""`) has no text chunks or expressions to
            // reduce; it still yields a single empty tail quasi.
            Some(Rule::template_string) => Ok(Reduced::Node(JsNode::template(
                vec![TemplateElement::new("", true)],
                vec![],
            ))),
            Some(Rule::name) => Ok(Reduced::Node(JsNode::ident(inner[0].as_str()))),
            Some(Rule::string) => {
                // Adjacent string literals concatenate into one literal.
                let mut value = String::new();
                for part in &inner {
                    value.push_str(dequote(part.as_str()));
                }
                Ok(Reduced::Node(JsNode::string(value)))
            }
            Some(Rule::number) => {
                let value: f64 = inner[0]
                    .as_str()
                    .parse()
                    .map_err(|_| invalid_number(SOURCE_NAME, &self.source, &inner[0]))?;
                Ok(Reduced::Node(JsNode::number(value)))
            }
            _ => Err(self.unsupported(&pair)),
        }
    }

    fn reduce_atom_expr(&self, pair: Pair<Rule>, children: Vec<Reduced>) -> Result<Reduced> {
        let mut results = children.into_iter();
        let mut expression = match results.next() {
            Some(Reduced::Node(base)) => base,
            _ => return Err(self.unsupported(&pair)),
        };
        for trailer in results {
            expression = match trailer {
                Reduced::CallArgs(arguments) => JsNode::call(expression, arguments),
                Reduced::Property(property) => JsNode::member(expression, property),
                _ => return Err(self.unsupported(&pair)),
            };
        }
        Ok(Reduced::Node(expression))
    }

    fn reduce_trailer(&self, pair: Pair<Rule>, children: Vec<Reduced>) -> Result<Reduced> {
        if !children.is_empty() {
            // A trailer wrapping call-args passes the record through.
            return passthrough(SOURCE_NAME, &self.source, &pair, children);
        }
        let inner: Vec<Pair<Rule>> = pair.clone().into_inner().collect();
        match inner.as_slice() {
            [name] if name.as_rule() == Rule::name => {
                Ok(Reduced::Property(JsNode::ident(name.as_str())))
            }
            // `()` with no arguments leaves the call_args pair childless.
            [args] if args.as_rule() == Rule::call_args => Ok(Reduced::CallArgs(vec![])),
            _ => Err(self.unsupported(&pair)),
        }
    }

    /// Interleave literal text chunks with the reduced embedded expressions,
    /// keeping quasis and expressions strictly alternating: an empty quasi is
    /// inserted before a leading expression and appended after a trailing one
    /// (or for an empty template), so the result always has exactly one more
    /// quasi than expressions, and the final quasi is the tail.
    fn reduce_template(&self, pair: Pair<Rule>, children: Vec<Reduced>) -> Result<Reduced> {
        let mut quasis: Vec<TemplateElement> = Vec::new();
        let mut expressions: Vec<JsNode> = Vec::new();
        let mut reduced = children.into_iter();

        for part in pair.clone().into_inner() {
            match part.as_rule() {
                Rule::template_expr => {
                    let expression = match reduced.next() {
                        Some(Reduced::Node(expression)) => expression,
                        _ => return Err(self.unsupported(&pair)),
                    };
                    if quasis.len() == expressions.len() {
                        quasis.push(TemplateElement::new("", false));
                    }
                    expressions.push(expression);
                }
                _ => quasis.push(TemplateElement::new(part.as_str(), false)),
            }
        }
        if quasis.len() == expressions.len() {
            quasis.push(TemplateElement::new("", false));
        }
        if let Some(last) = quasis.last_mut() {
            last.tail = true;
        }
        Ok(Reduced::Node(JsNode::template(quasis, expressions)))
    }

    fn unsupported(&self, pair: &Pair<Rule>) -> SpliceError {
        unsupported_node(SOURCE_NAME, &self.source, pair)
    }
}

/// Strip one matching leading/trailing quote character, if present. Escape
/// sequences inside the literal are deliberately left untouched.
fn dequote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_expression() {
        assert!(PythonExpression::new("foo.bar(1)").can_parse());
    }

    #[test]
    fn rejects_garbage() {
        let session = PythonExpression::new("foo(");
        assert!(!session.can_parse());
        assert!(session.check_errors().is_err());
    }

    #[test]
    fn dequote_strips_one_quote_pair_only() {
        assert_eq!(dequote("'x'"), "x");
        assert_eq!(dequote("\"x\""), "x");
        assert_eq!(dequote("''"), "");
        assert_eq!(dequote("x"), "x");
        assert_eq!(dequote("'a\\'"), "a\\");
    }
}
