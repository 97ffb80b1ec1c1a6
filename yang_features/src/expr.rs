use crate::feature::FeatureRef;
use yang_diagnostic::{Error, Result};
use yang_ir::{pform::YangVersion, SchemaPath};

/// Bit-packed postfix opcode (spec §3: "2 bits each, 4 ops per byte").
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Op {
    Feature = 0b00,
    Not = 0b01,
    And = 0b10,
    Or = 0b11,
}

impl Op {
    const fn from_bits(bits: u8) -> Self {
        match bits {
            0b00 => Op::Feature,
            0b01 => Op::Not,
            0b10 => Op::And,
            _ => Op::Or,
        }
    }

    const fn bits(self) -> u8 {
        self as u8
    }
}

/// A compiled `if-feature` expression: postfix opcodes packed two bits
/// each, plus the feature references the `Feature` opcodes consume in
/// order (spec §3).
#[derive(Clone, Debug, Default)]
pub struct FeatureExpr {
    ops: Vec<u8>,
    op_count: usize,
    features: Vec<FeatureRef>,
}

impl FeatureExpr {
    pub fn features(&self) -> &[FeatureRef] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn ops(&self) -> impl Iterator<Item = Op> + '_ {
        (0..self.op_count).map(move |i| {
            let byte = self.ops[i / 4];
            let shift = (i % 4) * 2;
            Op::from_bits((byte >> shift) & 0b11)
        })
    }

    fn push_op(&mut self, op: Op) {
        let i = self.op_count;
        let byte_index = i / 4;
        if byte_index == self.ops.len() {
            self.ops.push(0);
        }
        let shift = (i % 4) * 2;
        self.ops[byte_index] |= op.bits() << shift;
        self.op_count += 1;
    }
}

/// Resolves a possibly-prefixed feature name to its module-qualified
/// reference (spec §4.1: "resolving feature names to feature pointers via
/// prefix lookup in the importing module's compiled imports").
pub trait FeatureNameResolver {
    fn resolve(&self, prefix: Option<&str>, name: &str) -> Option<FeatureRef>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token<'a> {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Ref(Option<&'a str>, &'a str),
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '(' {
            tokens.push(Token::LParen);
            chars.next();
            continue;
        }
        if c == ')' {
            tokens.push(Token::RParen);
            chars.next();
            continue;
        }
        while matches!(chars.peek(), Some(&(_, c)) if !c.is_whitespace() && c != '(' && c != ')') {
            chars.next();
        }
        let end = chars.peek().map_or(src.len(), |&(i, _)| i);
        let word = &src[start..end];
        tokens.push(match word {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => match word.split_once(':') {
                Some((prefix, name)) => Token::Ref(Some(prefix), name),
                None => Token::Ref(None, word),
            },
        });
    }
    tokens
}

/// Recursive-descent AST, flattened to postfix once the grammar has been
/// checked end to end.
enum Ast {
    Feature(FeatureRef),
    Not(Box<Ast>),
    And(Box<Ast>, Box<Ast>),
    Or(Box<Ast>, Box<Ast>),
}

struct Parser<'a, 'b> {
    tokens: &'b [Token<'a>],
    pos: usize,
    path: &'b SchemaPath,
    resolver: &'b dyn FeatureNameResolver,
    saw_operator_or_paren: bool,
}

impl<'a, 'b> Parser<'a, 'b> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Token<'a>> {
        let t = self.tokens.get(self.pos);
        self.pos += 1;
        t
    }

    fn parse_or(&mut self) -> Result<Ast> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.saw_operator_or_paren = true;
            self.bump();
            let rhs = self.parse_and()?;
            lhs = Ast::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Ast> {
        let mut lhs = self.parse_not()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.saw_operator_or_paren = true;
            self.bump();
            let rhs = self.parse_not()?;
            lhs = Ast::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Ast> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.saw_operator_or_paren = true;
            self.bump();
            // Double-`not` collapses (spec §4.1).
            if matches!(self.peek(), Some(Token::Not)) {
                self.bump();
                return self.parse_not();
            }
            return Ok(Ast::Not(Box::new(self.parse_not()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        match self.bump() {
            Some(Token::LParen) => {
                self.saw_operator_or_paren = true;
                let inner = self.parse_or()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(Error::syntax(self.path.clone(), "unbalanced parentheses in if-feature")),
                }
            }
            Some(Token::Ref(prefix, name)) => {
                let r = self
                    .resolver
                    .resolve(*prefix, name)
                    .ok_or_else(|| Error::reference(self.path.clone(), format!("unknown feature '{name}'")))?;
                Ok(Ast::Feature(r))
            }
            _ => Err(Error::syntax(self.path.clone(), "expected feature reference in if-feature")),
        }
    }
}

fn flatten(ast: &Ast, expr: &mut FeatureExpr) {
    match ast {
        Ast::Feature(r) => {
            expr.features.push(*r);
            expr.push_op(Op::Feature);
        }
        Ast::Not(inner) => {
            flatten(inner, expr);
            expr.push_op(Op::Not);
        }
        Ast::And(a, b) => {
            flatten(a, expr);
            flatten(b, expr);
            expr.push_op(Op::And);
        }
        Ast::Or(a, b) => {
            flatten(a, expr);
            flatten(b, expr);
            expr.push_op(Op::Or);
        }
    }
}

/// Compile an `if-feature` expression source string into postfix bytecode
/// (spec §4.1).
///
/// `not` binds tightest, then `and`, then `or`, all left-associative.
/// Parentheses or any operator require YANG 1.1; a bare feature reference
/// is legal in 1.0.
pub fn compile_iffeature(
    source: &str,
    version: YangVersion,
    path: &SchemaPath,
    resolver: &dyn FeatureNameResolver,
) -> Result<FeatureExpr> {
    let tokens = tokenize(source);
    if tokens.is_empty() {
        return Err(Error::syntax(path.clone(), "empty if-feature expression"));
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        path,
        resolver,
        saw_operator_or_paren: false,
    };
    let ast = parser.parse_or()?;
    if parser.pos != tokens.len() {
        return Err(Error::syntax(path.clone(), "trailing tokens in if-feature"));
    }
    if parser.saw_operator_or_paren && version != YangVersion::V1_1 {
        return Err(Error::syntax(
            path.clone(),
            "if-feature operators/parentheses require YANG 1.1",
        ));
    }
    let mut expr = FeatureExpr::default();
    flatten(&ast, &mut expr);
    Ok(expr)
}
