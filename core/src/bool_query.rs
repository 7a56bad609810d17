//! Boolean query grammar.
//!
//! ```text
//! query    := or_expr
//! or_expr  := and_expr ("OR" and_expr)*
//! and_expr := unary (["AND"] unary)*
//! unary    := "NOT"* primary
//! primary  := "(" or_expr [")"] | TERM
//! ```
//!
//! Keywords are the uppercase words `AND`, `OR` and `NOT`; every other word is
//! normalized with the document tokenizer, and a word that splits into several
//! terms is grouped as one operand. Parsing never fails: a position
//! where an operand is expected but absent becomes [`BoolQuery::Missing`],
//! which matches no document. Unmatched `)` are dropped and a missing `)` is
//! implied at end of input.

use crate::tokenizer::terms;
use crate::DocId;
use std::fmt;

/// Parenthesized sub-expressions nested deeper than this collapse to
/// [`BoolQuery::Missing`].
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Or,
    And,
    Not,
    /// No combination; the children's results are concatenated.
    Ret,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Or => "OR",
            Operator::And => "AND",
            Operator::Not => "NOT",
            Operator::Ret => "RET",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoolQuery {
    Term(String),
    Missing,
    Group(BoolQueryGroup),
}

/// An operator applied to its children. `result` is only set on groups
/// returned by evaluation; evaluation builds new groups instead of filling
/// this one in.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolQueryGroup {
    operator: Operator,
    children: Vec<BoolQuery>,
    result: Option<Vec<DocId>>,
}

impl BoolQueryGroup {
    pub fn new(operator: Operator, children: Vec<BoolQuery>) -> Self {
        Self { operator, children, result: None }
    }

    pub(crate) fn evaluated(&self, children: Vec<BoolQuery>, result: Vec<DocId>) -> Self {
        Self { operator: self.operator, children, result: Some(result) }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn children(&self) -> &[BoolQuery] {
        &self.children
    }

    pub fn result(&self) -> Option<&[DocId]> {
        self.result.as_deref()
    }
}

impl fmt::Display for BoolQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolQuery::Term(t) => f.write_str(t),
            BoolQuery::Missing => f.write_str("<missing>"),
            BoolQuery::Group(g) => write!(f, "{g}"),
        }
    }
}

impl fmt::Display for BoolQueryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.operator, self.children.as_slice()) {
            (Operator::Not, [only]) => write!(f, "(NOT {only})"),
            (Operator::Ret, [only]) => write!(f, "{only}"),
            (op, children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {op} ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    And,
    Or,
    Not,
    Open,
    Close,
    Term(String),
}

fn flush_word(word: &mut String, out: &mut Vec<Token>) {
    if word.is_empty() {
        return;
    }
    match word.as_str() {
        "AND" => out.push(Token::And),
        "OR" => out.push(Token::Or),
        "NOT" => out.push(Token::Not),
        w => {
            let mut parts = terms(w);
            if parts.len() > 1 {
                // one query word stays one operand: `NOT cat-dog` negates both halves
                out.push(Token::Open);
                out.extend(parts.drain(..).map(Token::Term));
                out.push(Token::Close);
            } else {
                out.extend(parts.pop().map(Token::Term));
            }
        }
    }
    word.clear();
}

fn lex(query: &str) -> Vec<Token> {
    let mut raw = Vec::new();
    let mut word = String::new();
    for ch in query.chars() {
        match ch {
            '(' | ')' => {
                flush_word(&mut word, &mut raw);
                raw.push(if ch == '(' { Token::Open } else { Token::Close });
            }
            c if c.is_whitespace() => flush_word(&mut word, &mut raw),
            c => word.push(c),
        }
    }
    flush_word(&mut word, &mut raw);

    // unmatched ')' carry no meaning
    let mut depth = 0usize;
    raw.retain(|t| match t {
        Token::Open => {
            depth += 1;
            true
        }
        Token::Close if depth == 0 => false,
        Token::Close => {
            depth -= 1;
            true
        }
        _ => true,
    });
    raw
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> BoolQuery {
        let mut children = vec![self.parse_and()];
        while self.eat(&Token::Or) {
            children.push(self.parse_and());
        }
        collapse(Operator::Or, children)
    }

    fn parse_and(&mut self) -> BoolQuery {
        let mut children = vec![self.parse_unary()];
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.pos += 1;
                    children.push(self.parse_unary());
                }
                Some(Token::Not | Token::Open | Token::Term(_)) => children.push(self.parse_unary()),
                _ => break,
            }
        }
        collapse(Operator::And, children)
    }

    fn parse_unary(&mut self) -> BoolQuery {
        let mut negations = 0usize;
        while self.eat(&Token::Not) {
            negations += 1;
        }
        let operand = self.parse_primary();
        // NOT NOT a == a, since every term's postings lie inside the universe
        if negations % 2 == 1 {
            BoolQuery::Group(BoolQueryGroup::new(Operator::Not, vec![operand]))
        } else {
            operand
        }
    }

    fn parse_primary(&mut self) -> BoolQuery {
        match self.peek() {
            Some(Token::Term(t)) => {
                let term = t.clone();
                self.pos += 1;
                BoolQuery::Term(term)
            }
            Some(Token::Open) => {
                self.pos += 1;
                if self.depth >= MAX_DEPTH {
                    self.skip_group();
                    return BoolQuery::Missing;
                }
                self.depth += 1;
                let inner = self.parse_or();
                self.depth -= 1;
                self.eat(&Token::Close);
                inner
            }
            _ => BoolQuery::Missing,
        }
    }

    /// Skip past the `)` matching an already consumed `(`.
    fn skip_group(&mut self) {
        let mut depth = 1usize;
        while let Some(tok) = self.tokens.get(self.pos) {
            self.pos += 1;
            match tok {
                Token::Open => depth += 1,
                Token::Close => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

fn collapse(operator: Operator, mut children: Vec<BoolQuery>) -> BoolQuery {
    if children.len() == 1 {
        children.pop().unwrap_or(BoolQuery::Missing)
    } else {
        BoolQuery::Group(BoolQueryGroup::new(operator, children))
    }
}

/// Parse a boolean query. Never fails; see the module docs for the fallback rules.
pub fn parse(query: &str) -> BoolQuery {
    let mut parser = Parser { tokens: lex(query.trim()), pos: 0, depth: 0 };
    let tree = parser.parse_or();
    if parser.pos < parser.tokens.len() {
        tracing::debug!(query, consumed = parser.pos, total = parser.tokens.len(), "trailing boolean tokens ignored");
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(q: &str) -> String {
        parse(q).to_string()
    }

    #[test]
    fn precedence_not_and_or() {
        assert_eq!(show("cat OR dog AND bird"), "(cat OR (dog AND bird))");
        assert_eq!(show("NOT cat AND dog"), "((NOT cat) AND dog)");
        assert_eq!(show("cat OR NOT dog"), "(cat OR (NOT dog))");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(show("(cat OR dog) AND bird"), "((cat OR dog) AND bird)");
        assert_eq!(show("cat OR (dog AND NOT bird)"), "(cat OR (dog AND (NOT bird)))");
    }

    #[test]
    fn juxtaposition_is_and() {
        assert_eq!(show("cat dog"), "(cat AND dog)");
        assert_eq!(show("cat-dog OR bird"), "((cat AND dog) OR bird)");
    }

    #[test]
    fn split_literal_is_a_single_operand() {
        assert_eq!(show("NOT cat-dog"), "(NOT (cat AND dog))");
        assert_eq!(show("bird cat-dog"), "(bird AND (cat AND dog))");
    }

    #[test]
    fn literals_are_normalized_and_stopwords_dropped() {
        assert_eq!(show("Cats and the Dogs"), "(cat AND dog)");
        assert_eq!(show("the"), "<missing>");
    }

    #[test]
    fn malformed_input_degrades() {
        assert_eq!(show(""), "<missing>");
        assert_eq!(show("   "), "<missing>");
        assert_eq!(show("cat AND"), "(cat AND <missing>)");
        assert_eq!(show("OR dog"), "(<missing> OR dog)");
        assert_eq!(show("NOT"), "(NOT <missing>)");
        assert_eq!(show("(cat OR dog"), "(cat OR dog)");
        assert_eq!(show("cat) OR dog)"), "(cat OR dog)");
        assert_eq!(show("()"), "<missing>");
    }

    #[test]
    fn double_negation_cancels() {
        assert_eq!(show("NOT NOT cat"), "cat");
        assert_eq!(show("NOT (NOT cat)"), "(NOT (NOT cat))");
    }

    #[test]
    fn deep_nesting_terminates() {
        let deep = format!("{}cat{}", "(".repeat(MAX_DEPTH + 10), ")".repeat(MAX_DEPTH + 10));
        assert_eq!(parse(&deep), BoolQuery::Missing);
        let shallow = format!("{}cat{}", "(".repeat(3), ")".repeat(3));
        assert_eq!(parse(&shallow), BoolQuery::Term("cat".into()));
        let unclosed = format!("dog OR {}cat", "(".repeat(10_000));
        assert_eq!(show(&unclosed), "(dog OR <missing>)");
    }

    #[test]
    fn lowercase_keywords_are_literals() {
        // "or" is a stopword, so it vanishes like any other
        assert_eq!(show("cat or dog"), "(cat AND dog)");
    }
}
