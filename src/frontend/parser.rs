use std::mem;

use super::ast::{Binop, Exp, Fdef, Item, Program, Stmt, Ty, Vdecl};
use super::grammar::{self, Action, Nt, Sym};
use super::lexer::Lexer;
use super::symbols::SymbolTable;
use super::token::{Token, TokenKind};
use super::Node;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("lexical error: {message} at line {line}, column {column}")]
    Lexical {
        message: String,
        line: u32,
        column: u32,
    },
    #[error("syntax error: expected {expected} but found '{found}' at line {line}, column {column}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        line: u32,
        column: u32,
    },
    #[error("syntax error: unexpected '{found}' at line {line}, column {column}")]
    NoProduction {
        found: String,
        line: u32,
        column: u32,
    },
    #[error("internal parse error in {marker}: {message}")]
    Construction { marker: Action, message: String },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// A value on the semantic stack. `Mark` is the sentinel delimiting
/// collections; the for-clause coalescing reuses it as the "absent clause"
/// handle, so every builder pops a fixed arity.
#[derive(Debug)]
enum Slot {
    Mark,
    Exp(Node<Exp>),
    Stmt(Node<Stmt>),
    Func(Node<Fdef>),
    Prog(Program),
}

impl Slot {
    fn describe(&self) -> &'static str {
        match self {
            Slot::Mark => "sentinel",
            Slot::Exp(_) => "expression",
            Slot::Stmt(_) => "statement",
            Slot::Func(_) => "function",
            Slot::Prog(_) => "program",
        }
    }
}

/// Predictive LL(1) parser with syntax-directed translation. The parse stack
/// holds grammar symbols; the semantic stack holds partially built AST
/// fragments that the `#`-markers assemble bottom-up. `last_type` and
/// `temp_params` carry the two inherited attributes of the translation.
pub struct Parser<'input> {
    lexer: Lexer<'input>,
    current: Token,
    previous: Token,
    sem: Vec<Slot>,
    last_type: Option<Ty>,
    temp_params: Vec<Node<Vdecl>>,
}

impl<'input> Parser<'input> {
    pub fn new(lexer: Lexer<'input>) -> Self {
        Parser {
            lexer,
            current: Token::eof(0, 0),
            previous: Token::eof(0, 0),
            sem: Vec::new(),
            last_type: None,
            temp_params: Vec::new(),
        }
    }

    fn advance(&mut self) -> ParseResult<()> {
        let next = self.lexer.next_token();
        self.previous = mem::replace(&mut self.current, next);
        if self.current.kind == TokenKind::Error {
            return Err(ParseError::Lexical {
                message: self.current.lexeme.clone(),
                line: self.current.line,
                column: self.current.column,
            });
        }
        Ok(())
    }

    pub fn parse(mut self) -> ParseResult<(Program, SymbolTable)> {
        self.advance()?;

        let mut stack = vec![Sym::N(Nt::Program)];
        while let Some(sym) = stack.pop() {
            match sym {
                Sym::A(action) => self.perform(action)?,
                Sym::T(expected) => {
                    if self.current.kind != expected {
                        return Err(ParseError::UnexpectedToken {
                            expected: expected.name(),
                            found: self.current.lexeme.clone(),
                            line: self.current.line,
                            column: self.current.column,
                        });
                    }
                    // Identifiers ride the semantic stack as transient
                    // variable accesses for the next builder to consume.
                    if expected == TokenKind::Ident {
                        self.sem.push(Slot::Exp(Node::new(
                            Exp::Id(self.current.lexeme.clone()),
                            self.current.line,
                        )));
                    }
                    self.advance()?;
                }
                Sym::N(nt) => {
                    let Some(production) = grammar::production(nt, self.current.kind) else {
                        return Err(ParseError::NoProduction {
                            found: self.current.lexeme.clone(),
                            line: self.current.line,
                            column: self.current.column,
                        });
                    };
                    stack.extend(production.iter().rev().copied());
                }
            }
        }

        let root = match self.sem.pop() {
            Some(Slot::Prog(p)) => p,
            other => {
                return Err(ParseError::Construction {
                    marker: Action::BuildProg,
                    message: format!(
                        "expected the program root on the semantic stack, found {}",
                        other.map_or("nothing", |s| s.describe())
                    ),
                })
            }
        };
        if !self.sem.is_empty() {
            eprintln!(
                "warning: {} unconsumed node(s) left on the semantic stack",
                self.sem.len()
            );
        }

        Ok((root, self.lexer.into_symbols()))
    }

    fn underflow(marker: Action) -> ParseError {
        ParseError::Construction {
            marker,
            message: "semantic stack underflow".to_string(),
        }
    }

    fn pop(&mut self, marker: Action) -> ParseResult<Slot> {
        self.sem.pop().ok_or_else(|| Self::underflow(marker))
    }

    fn pop_exp(&mut self, marker: Action) -> ParseResult<Node<Exp>> {
        match self.pop(marker)? {
            Slot::Exp(e) => Ok(e),
            other => Err(ParseError::Construction {
                marker,
                message: format!("expected an expression, found {}", other.describe()),
            }),
        }
    }

    fn pop_stmt(&mut self, marker: Action) -> ParseResult<Node<Stmt>> {
        match self.pop(marker)? {
            Slot::Stmt(s) => Ok(s),
            other => Err(ParseError::Construction {
                marker,
                message: format!("expected a statement, found {}", other.describe()),
            }),
        }
    }

    /// Pops the identifier transient pushed when the terminal was matched.
    fn pop_ident(&mut self, marker: Action) -> ParseResult<(String, u32)> {
        match self.pop(marker)? {
            Slot::Exp(Node {
                t: Exp::Id(name),
                line,
            }) => Ok((name, line)),
            other => Err(ParseError::Construction {
                marker,
                message: format!("expected an identifier, found {}", other.describe()),
            }),
        }
    }

    fn pop_mark(&mut self, marker: Action) -> ParseResult<()> {
        match self.pop(marker)? {
            Slot::Mark => Ok(()),
            other => Err(ParseError::Construction {
                marker,
                message: format!("expected the sentinel, found {}", other.describe()),
            }),
        }
    }

    /// Pops slots down to (and including) the sentinel; the collected slots
    /// come back top-first, i.e. reversed with respect to source order.
    fn pop_until_mark(&mut self, marker: Action) -> ParseResult<Vec<Slot>> {
        let mut collected = Vec::new();
        loop {
            match self.pop(marker)? {
                Slot::Mark => return Ok(collected),
                slot => collected.push(slot),
            }
        }
    }

    fn binary(&mut self, marker: Action, op: Binop) -> ParseResult<()> {
        let right = self.pop_exp(marker)?;
        let left = self.pop_exp(marker)?;
        let line = left.line;
        self.sem.push(Slot::Exp(Node::new(
            Exp::Bop(op, Box::new(left), Box::new(right)),
            line,
        )));
        Ok(())
    }

    fn perform(&mut self, action: Action) -> ParseResult<()> {
        match action {
            Action::MarkProg
            | Action::MarkBlock
            | Action::MarkDecl
            | Action::MarkArgs
            | Action::MarkForInit
            | Action::MarkForUpdate => self.sem.push(Slot::Mark),
            Action::MarkParams => {
                self.sem.push(Slot::Mark);
                self.temp_params.clear();
            }

            Action::BuildInt => {
                let value: i64 =
                    self.previous
                        .lexeme
                        .parse()
                        .map_err(|_| ParseError::Construction {
                            marker: action,
                            message: format!("integer literal '{}' out of range", self.previous.lexeme),
                        })?;
                self.sem
                    .push(Slot::Exp(Node::new(Exp::Int(value), self.previous.line)));
            }
            Action::BuildFloat => {
                let value: f64 =
                    self.previous
                        .lexeme
                        .parse()
                        .map_err(|_| ParseError::Construction {
                            marker: action,
                            message: format!("malformed float literal '{}'", self.previous.lexeme),
                        })?;
                self.sem
                    .push(Slot::Exp(Node::new(Exp::Float(value), self.previous.line)));
            }
            Action::BuildStr => {
                let mut s = self.previous.lexeme.clone();
                // the lexer already strips the quotes; tolerate both forms
                if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
                    s = s[1..s.len() - 1].to_string();
                }
                self.sem
                    .push(Slot::Exp(Node::new(Exp::Str(s), self.previous.line)));
            }

            // The identifier transient is pushed by the terminal handler.
            Action::BuildVar | Action::BuildFuncId => {}

            Action::BuildType => {
                self.last_type = Ty::from_keyword(&self.previous.lexeme);
                if self.last_type.is_none() {
                    return Err(ParseError::Construction {
                        marker: action,
                        message: format!("'{}' is not a type name", self.previous.lexeme),
                    });
                }
            }

            Action::BuildAdd => self.binary(action, Binop::Add)?,
            Action::BuildSub => self.binary(action, Binop::Sub)?,
            Action::BuildMul => self.binary(action, Binop::Mul)?,
            Action::BuildDiv => self.binary(action, Binop::Div)?,
            Action::BuildMod => self.binary(action, Binop::Mod)?,
            Action::BuildLt => self.binary(action, Binop::Lt)?,
            Action::BuildGt => self.binary(action, Binop::Gt)?,
            Action::BuildLe => self.binary(action, Binop::Lte)?,
            Action::BuildGe => self.binary(action, Binop::Gte)?,
            Action::BuildEq => self.binary(action, Binop::Eq)?,
            Action::BuildNeq => self.binary(action, Binop::Neq)?,

            Action::BuildNeg => {
                let operand = self.pop_exp(action)?;
                let line = operand.line;
                let zero = Node::new(Exp::Int(0), line);
                self.sem.push(Slot::Exp(Node::new(
                    Exp::Bop(Binop::Sub, Box::new(zero), Box::new(operand)),
                    line,
                )));
            }

            Action::BuildVarDecl => {
                let collected = self.pop_until_mark(action)?;
                let ty = self.last_type.ok_or_else(|| ParseError::Construction {
                    marker: action,
                    message: "no declared type in flight".to_string(),
                })?;
                // Either {name} or {initializer, name}; the initializer sits
                // on top because it was produced after the name.
                let decl = match collected.len() {
                    1 => {
                        let mut it = collected.into_iter();
                        let (name, line) = Self::ident_slot(it.next(), action)?;
                        Node::new(
                            Stmt::Decl(Vdecl {
                                ty,
                                name,
                                init: None,
                            }),
                            line,
                        )
                    }
                    2 => {
                        let mut it = collected.into_iter();
                        let init = Self::exp_slot(it.next(), action)?;
                        let (name, line) = Self::ident_slot(it.next(), action)?;
                        Node::new(
                            Stmt::Decl(Vdecl {
                                ty,
                                name,
                                init: Some(init),
                            }),
                            line,
                        )
                    }
                    n => {
                        return Err(ParseError::Construction {
                            marker: action,
                            message: format!("expected 1 or 2 nodes, found {n}"),
                        })
                    }
                };
                self.sem.push(Slot::Stmt(decl));
            }

            Action::BuildAssign => {
                let value = self.pop_exp(action)?;
                let (name, line) = self.pop_ident(action)?;
                self.sem
                    .push(Slot::Stmt(Node::new(Stmt::Assn(name, value), line)));
            }

            Action::BuildArrayAccess => {
                let index = self.pop_exp(action)?;
                let (name, line) = self.pop_ident(action)?;
                self.sem.push(Slot::Exp(Node::new(
                    Exp::Index(name, Box::new(index)),
                    line,
                )));
            }

            Action::BuildArrayAssign => {
                let value = self.pop_exp(action)?;
                let index = self.pop_exp(action)?;
                let (name, line) = self.pop_ident(action)?;
                self.sem.push(Slot::Stmt(Node::new(
                    Stmt::IndexAssn(name, index, value),
                    line,
                )));
            }

            Action::BuildPrint => {
                let e = self.pop_exp(action)?;
                self.sem
                    .push(Slot::Stmt(Node::new(Stmt::Print(e), self.previous.line)));
            }
            Action::BuildRead => {
                let (name, line) = self.pop_ident(action)?;
                self.sem.push(Slot::Stmt(Node::new(Stmt::Read(name), line)));
            }
            Action::BuildReturn => {
                let value = if matches!(self.sem.last(), Some(Slot::Exp(_))) {
                    Some(self.pop_exp(action)?)
                } else {
                    None
                };
                self.sem.push(Slot::Stmt(Node::new(
                    Stmt::Ret(value, Ty::Void),
                    self.previous.line,
                )));
            }
            Action::BuildBreak => {
                self.sem
                    .push(Slot::Stmt(Node::new(Stmt::Break, self.previous.line)));
            }

            Action::BuildIf => {
                let then = self.pop_stmt(action)?;
                let cond = self.pop_exp(action)?;
                let line = cond.line;
                self.sem.push(Slot::Stmt(Node::new(
                    Stmt::If(cond, Box::new(then), None),
                    line,
                )));
            }
            Action::BuildIfElse => {
                let otherwise = self.pop_stmt(action)?;
                let then = self.pop_stmt(action)?;
                let cond = self.pop_exp(action)?;
                let line = cond.line;
                self.sem.push(Slot::Stmt(Node::new(
                    Stmt::If(cond, Box::new(then), Some(Box::new(otherwise))),
                    line,
                )));
            }

            Action::BuildForInit | Action::BuildForUpdate => {
                // Coalesce the optional clause: pop the statement if one was
                // produced, discard the sentinel, push the clause (or the
                // sentinel standing in for "absent") back as a single value.
                let clause = if matches!(self.sem.last(), Some(Slot::Stmt(_))) {
                    Some(self.pop_stmt(action)?)
                } else {
                    None
                };
                self.pop_mark(action)?;
                match clause {
                    Some(s) => self.sem.push(Slot::Stmt(s)),
                    None => self.sem.push(Slot::Mark),
                }
            }

            Action::BuildFor => {
                let body = self.pop_stmt(action)?;
                let update = match self.pop(action)? {
                    Slot::Stmt(s) => Some(Box::new(s)),
                    Slot::Mark => None,
                    other => {
                        return Err(ParseError::Construction {
                            marker: action,
                            message: format!("invalid update clause: {}", other.describe()),
                        })
                    }
                };
                let cond = match self.pop(action)? {
                    Slot::Exp(e) => Some(e),
                    Slot::Mark => None,
                    other => {
                        return Err(ParseError::Construction {
                            marker: action,
                            message: format!("invalid loop condition: {}", other.describe()),
                        })
                    }
                };
                let init = match self.pop(action)? {
                    Slot::Stmt(s) => Some(Box::new(s)),
                    Slot::Mark => None,
                    other => {
                        return Err(ParseError::Construction {
                            marker: action,
                            message: format!("invalid init clause: {}", other.describe()),
                        })
                    }
                };
                let line = init.as_ref().map_or(body.line, |i| i.line);
                self.sem.push(Slot::Stmt(Node::new(
                    Stmt::For(init, cond, update, Box::new(body)),
                    line,
                )));
            }

            Action::BuildCall => {
                let collected = self.pop_until_mark(action)?;
                let mut args = Vec::with_capacity(collected.len());
                for slot in collected.into_iter().rev() {
                    match slot {
                        Slot::Exp(e) => args.push(e),
                        other => {
                            return Err(ParseError::Construction {
                                marker: action,
                                message: format!("invalid argument: {}", other.describe()),
                            })
                        }
                    }
                }
                let (name, line) = self.pop_ident(action)?;
                self.sem
                    .push(Slot::Exp(Node::new(Exp::Call(name, args), line)));
            }
            Action::BuildCallStmt => {
                let call = self.pop_exp(action)?;
                let line = call.line;
                match call.t {
                    Exp::Call(name, args) => self
                        .sem
                        .push(Slot::Stmt(Node::new(Stmt::Call(name, args), line))),
                    _ => {
                        return Err(ParseError::Construction {
                            marker: action,
                            message: "expected a call expression".to_string(),
                        })
                    }
                }
            }

            Action::BuildParam => {
                let ty = self.last_type.ok_or_else(|| ParseError::Construction {
                    marker: action,
                    message: "no declared type in flight".to_string(),
                })?;
                let (name, line) = self.pop_ident(action)?;
                self.temp_params.push(Node::new(
                    Vdecl {
                        ty,
                        name,
                        init: None,
                    },
                    line,
                ));
            }

            Action::BuildFunc => {
                let body = match self.pop_stmt(action)? {
                    Node {
                        t: Stmt::Block(stmts),
                        ..
                    } => stmts,
                    _ => {
                        return Err(ParseError::Construction {
                            marker: action,
                            message: "function body is not a block".to_string(),
                        })
                    }
                };
                self.pop_mark(action)?;
                let (name, line) = self.pop_ident(action)?;
                let params = mem::take(&mut self.temp_params);
                self.sem
                    .push(Slot::Func(Node::new(Fdef { name, params, body }, line)));
            }

            Action::BuildBlock => {
                let collected = self.pop_until_mark(action)?;
                let mut stmts = Vec::with_capacity(collected.len());
                for slot in collected.into_iter().rev() {
                    match slot {
                        Slot::Stmt(s) => stmts.push(s),
                        other => {
                            return Err(ParseError::Construction {
                                marker: action,
                                message: format!("non-statement in block: {}", other.describe()),
                            })
                        }
                    }
                }
                let line = stmts.first().map_or(self.previous.line, |s| s.line);
                self.sem
                    .push(Slot::Stmt(Node::new(Stmt::Block(stmts), line)));
            }

            Action::BuildProg => {
                let collected = self.pop_until_mark(action)?;
                let mut items = Vec::with_capacity(collected.len());
                for slot in collected.into_iter().rev() {
                    match slot {
                        Slot::Stmt(s) => items.push(Item::Stmt(s)),
                        Slot::Func(f) => items.push(Item::Func(f)),
                        other => {
                            return Err(ParseError::Construction {
                                marker: action,
                                message: format!("invalid top-level node: {}", other.describe()),
                            })
                        }
                    }
                }
                self.sem.push(Slot::Prog(Program { items }));
            }
        }

        Ok(())
    }

    fn exp_slot(slot: Option<Slot>, marker: Action) -> ParseResult<Node<Exp>> {
        match slot {
            Some(Slot::Exp(e)) => Ok(e),
            Some(other) => Err(ParseError::Construction {
                marker,
                message: format!("expected an expression, found {}", other.describe()),
            }),
            None => Err(Self::underflow(marker)),
        }
    }

    fn ident_slot(slot: Option<Slot>, marker: Action) -> ParseResult<(String, u32)> {
        match slot {
            Some(Slot::Exp(Node {
                t: Exp::Id(name),
                line,
            })) => Ok((name, line)),
            Some(other) => Err(ParseError::Construction {
                marker,
                message: format!("expected an identifier, found {}", other.describe()),
            }),
            None => Err(Self::underflow(marker)),
        }
    }
}
