// # ========================= START OF THE GRAMMAR =========================
//
// # * Upper case names (NUMBER) denote token types from the tokenizer
// # * COMMENT and WHITESPACE are collectively written SEP below
// # * e1 e2 matches e1, then e2; e1 | e2 matches e1 or e2; e* and e+ repeat
// #
// # Elements of a list, and top-level expressions, must be separated by at
// # least one SEP. A call's argument list must follow its target directly.

use std::rc::Rc;

use super::ast::*;
use super::literal::{decode_number, decode_string};
use super::locations::{Coords, Locatable};
use super::tokenizer::{Token, TokenType as TT};
use crate::error::{Error, Result};
use crate::interpreter::Value;

/// The binding every program is wrapped into a call of.
pub const PROGRAM_BINDING: &str = "do";

pub fn parse(tokens: &[Token]) -> Result<Node> {
    let mut parser = Parser::new(tokens);
    let program = parser.program()?;
    log::debug!("parsed program with {} top-level expressions", top_level_len(&program));
    Ok(program)
}

fn top_level_len(program: &Node) -> usize {
    match program {
        Node::FunCall(call) => call.args.len(),
        _ => 0,
    }
}

struct Parser<'a> {
    tokens: std::slice::Iter<'a, Token>,
    next: Token,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let mut parser = Self {
            tokens: tokens.iter(),
            next: Token::default(),
        };
        parser.shift();
        parser
    }

    fn is(&self, typ: TT) -> bool {
        self.next.typ == typ
    }

    fn shift(&mut self) -> Token {
        let end = self.next.coords.clone();
        let next = match self.tokens.next() {
            Some(token) => token.clone(),
            None => Token::endmarker(end),
        };
        std::mem::replace(&mut self.next, next)
    }

    fn consume(&mut self, typ: TT) -> Result<Token> {
        if typ != TT::ENDMARKER && self.is(TT::ENDMARKER) {
            return Err(self.unexpected_eof());
        }
        if !self.is(typ) {
            return Err(Error::parse(
                format!("expected token <{}>, found <{}>", typ, self.next.typ),
                self.next.coords(),
            ));
        }
        Ok(self.shift())
    }

    fn unexpected_eof(&self) -> Error {
        Error::parse("unexpected end of file", self.next.coords())
    }

    // program: (SEP | expr_or_funcall)* ENDMARKER
    fn program(&mut self) -> Result<Node> {
        let items = self.separated(TT::ENDMARKER)?;
        self.consume(TT::ENDMARKER)?;
        let target = Node::Binding(Symbol::native(PROGRAM_BINDING));
        let args = Rc::new(List::new(items, Coords::Native));
        Ok(Node::FunCall(Rc::new(FunCall::new(
            target,
            args,
            Coords::Native,
        ))))
    }

    // list: '(' (SEP | expr_or_funcall)* ')'
    fn list(&mut self) -> Result<Rc<List>> {
        let coords = self.consume(TT::LPAR)?.coords;
        let items = self.separated(TT::RPAR)?;
        self.consume(TT::RPAR)?;
        Ok(Rc::new(List::new(items, coords)))
    }

    /// Collects elements up to (not including) `end`, requiring a separator
    /// between every two of them.
    fn separated(&mut self, end: TT) -> Result<Vec<Node>> {
        let mut items = vec![];
        let mut needs_separator = false;
        loop {
            match self.next.typ {
                typ if typ == end => return Ok(items),
                TT::ENDMARKER => return Err(self.unexpected_eof()),
                typ if typ.is_separator() => {
                    needs_separator = false;
                    self.shift();
                }
                typ => {
                    if needs_separator {
                        return Err(Error::parse(
                            format!("expected <whitespace>, found <{}>", typ),
                            self.next.coords(),
                        ));
                    }
                    items.push(self.expr_or_funcall()?);
                    needs_separator = true;
                }
            }
        }
    }

    // expr_or_funcall: expr list*
    fn expr_or_funcall(&mut self) -> Result<Node> {
        let mut expr = self.expr()?;
        while self.is(TT::LPAR) {
            let args = self.list()?;
            let coords = args.coords.clone();
            expr = Node::FunCall(Rc::new(FunCall::new(expr, args, coords)));
        }
        Ok(expr)
    }

    // expr: value | binding | list
    fn expr(&mut self) -> Result<Node> {
        match self.next.typ {
            TT::STRING | TT::NUMBER | TT::ATOM => self.value(),
            TT::BINDING => self.binding(),
            TT::LPAR => Ok(Node::List(self.list()?)),
            TT::ENDMARKER => Err(self.unexpected_eof()),
            typ => Err(Error::parse(
                format!(
                    "expected <string | number | atom | binding | parenleft>, found <{}>",
                    typ
                ),
                self.next.coords(),
            )),
        }
    }

    // value: STRING | NUMBER | ATOM
    fn value(&mut self) -> Result<Node> {
        match self.next.typ {
            TT::STRING => {
                let token = self.consume(TT::STRING)?;
                let text = decode_string(&token.lexeme)
                    .map_err(|msg| Error::parse(msg, token.coords()))?;
                Ok(Node::Literal(Value::from(text), token.coords))
            }
            TT::NUMBER => {
                let token = self.consume(TT::NUMBER)?;
                let number = decode_number(&token.lexeme)
                    .map_err(|msg| Error::parse(msg, token.coords()))?;
                Ok(Node::Literal(Value::Number(number), token.coords))
            }
            TT::ATOM => Ok(Node::Atom(self.consume(TT::ATOM)?.into())),
            typ => Err(Error::parse(
                format!("expected <string | number | atom>, found <{}>", typ),
                self.next.coords(),
            )),
        }
    }

    // binding: BINDING
    fn binding(&mut self) -> Result<Node> {
        Ok(Node::Binding(self.consume(TT::BINDING)?.into()))
    }
}
