//! Parser for Ember IR tokens into a package.
//!
//! The text is line-oriented: each non-blank line is one declaration,
//! label, instruction or terminator. [`PackageParser`] tracks which
//! function and block the next line belongs to.

use ember_common::{
    BasicBlock, BinaryOpKind, BlockId, CallSite, CompiledFunction, CompiledPackage, Instruction,
    Operand, Terminator, TypeKind, UnaryOpKind, Value,
};

use crate::error::AsmError;
use crate::lexer::Token;

/// A function whose `end` line has not been seen yet.
struct OpenFunction {
    name: String,
    slots: Vec<TypeKind>,
    param_count: usize,
    blocks: Vec<BasicBlock>,
    /// Instructions of the block being filled, if a label is open.
    current: Option<Vec<Instruction>>,
}

/// What a single instruction line produced.
enum Step {
    Instruction(Instruction),
    Terminator(Terminator),
}

#[derive(Default)]
pub(crate) struct PackageParser {
    package: Option<(String, String)>,
    functions: Vec<CompiledFunction>,
    open: Option<OpenFunction>,
}

impl PackageParser {
    /// Feed one tokenized line.
    pub(crate) fn line(&mut self, tokens: &[Token], line: usize) -> Result<(), AsmError> {
        let Some(first) = tokens.first() else {
            return Ok(());
        };
        let mut cursor = Cursor::new(&tokens[1..], line);

        if let Token::Ident(word) = first {
            match word.as_str() {
                "package" => return self.package(&mut cursor),
                "func" => return self.func(&mut cursor),
                "local" => return self.local(&mut cursor),
                "end" => {
                    cursor.end()?;
                    return self.end(line);
                }
                label if label.ends_with(':') => {
                    cursor.end()?;
                    let found = parse_block(&label[..label.len() - 1]).ok_or_else(|| {
                        AsmError::UnknownInstruction {
                            line,
                            token: label.to_string(),
                        }
                    })?;
                    return self.label(found, line);
                }
                _ => {}
            }
        }

        let step = instruction(first, &mut cursor)?;
        let function = self.open.as_mut().ok_or(AsmError::OutsideBlock { line })?;
        let block = function
            .current
            .as_mut()
            .ok_or(AsmError::OutsideBlock { line })?;
        match step {
            Step::Instruction(instruction) => block.push(instruction),
            Step::Terminator(terminator) => {
                let instructions = std::mem::take(block);
                function.current = None;
                function
                    .blocks
                    .push(BasicBlock::new(instructions, terminator));
            }
        }
        Ok(())
    }

    /// Finish the text and build the package.
    pub(crate) fn finish(self) -> Result<CompiledPackage, AsmError> {
        if let Some(open) = self.open {
            return Err(AsmError::UnclosedFunction { name: open.name });
        }
        let (org, module) = self.package.ok_or(AsmError::MissingPackage)?;
        Ok(CompiledPackage::new(org, module, self.functions))
    }

    fn package(&mut self, cursor: &mut Cursor<'_>) -> Result<(), AsmError> {
        let line = cursor.line;
        if self.package.is_some() {
            return Err(AsmError::DuplicatePackage { line });
        }
        let name = cursor.ident("org/module")?;
        cursor.end()?;
        let (org, module) = name
            .split_once('/')
            .filter(|(org, module)| !org.is_empty() && !module.is_empty())
            .ok_or_else(|| AsmError::Expected {
                line,
                expected: "org/module",
                found: format!("'{name}'"),
            })?;
        self.package = Some((org.to_string(), module.to_string()));
        Ok(())
    }

    fn func(&mut self, cursor: &mut Cursor<'_>) -> Result<(), AsmError> {
        let line = cursor.line;
        if self.package.is_none() {
            return Err(AsmError::MissingPackage);
        }
        if let Some(open) = &self.open {
            return Err(AsmError::Expected {
                line,
                expected: "'end'",
                found: format!("'func' inside '{}'", open.name),
            });
        }

        let name = cursor.ident("function name")?.to_string();
        cursor.punct(Token::LParen, "'('")?;
        let mut params = Vec::new();
        if !cursor.eat(&Token::RParen) {
            loop {
                params.push(cursor.type_kind()?);
                if cursor.eat(&Token::RParen) {
                    break;
                }
                cursor.punct(Token::Comma, "',' or ')'")?;
            }
        }
        cursor.punct(Token::Arrow, "'->'")?;
        let ret = cursor.type_kind()?;
        cursor.end()?;

        let param_count = params.len();
        let mut slots = vec![ret];
        slots.extend(params);
        self.open = Some(OpenFunction {
            name,
            slots,
            param_count,
            blocks: Vec::new(),
            current: None,
        });
        Ok(())
    }

    fn local(&mut self, cursor: &mut Cursor<'_>) -> Result<(), AsmError> {
        let line = cursor.line;
        let kind = cursor.type_kind()?;
        cursor.end()?;
        let function = self.open.as_mut().ok_or(AsmError::OutsideBlock { line })?;
        if function.current.is_some() || !function.blocks.is_empty() {
            return Err(AsmError::LateLocal { line });
        }
        function.slots.push(kind);
        Ok(())
    }

    fn label(&mut self, found: BlockId, line: usize) -> Result<(), AsmError> {
        let function = self.open.as_mut().ok_or(AsmError::OutsideBlock { line })?;
        if function.current.is_some() {
            return Err(AsmError::UnterminatedBlock {
                line,
                block: function.blocks.len(),
            });
        }
        let expected = function.blocks.len();
        if found.index() != expected {
            return Err(AsmError::BlockOrder {
                line,
                expected,
                found: found.index(),
            });
        }
        function.current = Some(Vec::new());
        Ok(())
    }

    fn end(&mut self, line: usize) -> Result<(), AsmError> {
        let function = self.open.take().ok_or(AsmError::UnexpectedToken {
            line,
            token: "end".to_string(),
        })?;
        if function.current.is_some() {
            return Err(AsmError::UnterminatedBlock {
                line,
                block: function.blocks.len(),
            });
        }
        self.functions.push(CompiledFunction::new(
            function.name,
            function.slots,
            function.param_count,
            function.blocks,
        ));
        Ok(())
    }
}

/// Parse `bbN` into a block id.
fn parse_block(text: &str) -> Option<BlockId> {
    let digits = text.strip_prefix("bb")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(BlockId)
}

/// Parse one instruction or terminator line starting at `first`.
fn instruction(first: &Token, cursor: &mut Cursor<'_>) -> Result<Step, AsmError> {
    let line = cursor.line;
    match first {
        Token::Slot(dest) => {
            let dest = Operand(*dest);
            cursor.punct(Token::Equals, "'='")?;
            let mnemonic = cursor.ident("instruction")?;
            assignment(dest, mnemonic, cursor)
        }
        Token::Ident(word) => {
            let step = match word.as_str() {
                "store" => Step::Instruction(Instruction::ArrayStore {
                    array: cursor.slot()?,
                    index: cursor.slot()?,
                    value: cursor.slot()?,
                }),
                "goto" => Step::Terminator(Terminator::Goto(cursor.block()?)),
                "branch" => Step::Terminator(Terminator::Branch {
                    condition: cursor.slot()?,
                    on_true: cursor.block()?,
                    on_false: cursor.block()?,
                }),
                "call" => Step::Terminator(call(None, cursor)?),
                "return" => Step::Terminator(Terminator::Return),
                other => {
                    return Err(AsmError::UnknownInstruction {
                        line,
                        token: other.to_string(),
                    })
                }
            };
            cursor.end()?;
            Ok(step)
        }
        other => Err(AsmError::UnexpectedToken {
            line,
            token: other.to_string(),
        }),
    }
}

/// Parse the right-hand side of `%d = ...`.
fn assignment(dest: Operand, mnemonic: &str, cursor: &mut Cursor<'_>) -> Result<Step, AsmError> {
    let line = cursor.line;
    let instruction = match mnemonic {
        "const" => Instruction::ConstantLoad {
            dest,
            value: cursor.literal()?,
        },
        "move" => Instruction::Move {
            dest,
            src: cursor.slot()?,
        },
        "newarray" => {
            let element = cursor.type_kind()?;
            let size = if cursor.eat(&Token::Ident("len".to_string())) {
                Some(cursor.slot()?)
            } else {
                None
            };
            let mut values = Vec::new();
            while !cursor.at_end() {
                values.push(cursor.slot()?);
            }
            Instruction::NewArray {
                dest,
                element,
                size,
                values,
            }
        }
        "load" => Instruction::ArrayLoad {
            dest,
            array: cursor.slot()?,
            index: cursor.slot()?,
        },
        "cast" => {
            let target = cursor.type_kind()?;
            Instruction::TypeCast {
                dest,
                src: cursor.slot()?,
                target,
            }
        }
        "call" => {
            let terminator = call(Some(dest), cursor)?;
            cursor.end()?;
            return Ok(Step::Terminator(terminator));
        }
        other => {
            if let Some(op) = BinaryOpKind::from_mnemonic(other) {
                Instruction::BinaryOp {
                    op,
                    dest,
                    lhs: cursor.slot()?,
                    rhs: cursor.slot()?,
                }
            } else if let Some(op) = UnaryOpKind::from_mnemonic(other) {
                Instruction::UnaryOp {
                    op,
                    dest,
                    operand: cursor.slot()?,
                }
            } else {
                return Err(AsmError::UnknownInstruction {
                    line,
                    token: other.to_string(),
                });
            }
        }
    };
    cursor.end()?;
    Ok(Step::Instruction(instruction))
}

/// Parse `key(%a, %b) bbN` after the `call` mnemonic.
fn call(dest: Option<Operand>, cursor: &mut Cursor<'_>) -> Result<Terminator, AsmError> {
    let key = cursor.ident("function key")?.to_string();
    cursor.punct(Token::LParen, "'('")?;
    let mut args = Vec::new();
    if !cursor.eat(&Token::RParen) {
        loop {
            args.push(cursor.slot()?);
            if cursor.eat(&Token::RParen) {
                break;
            }
            cursor.punct(Token::Comma, "',' or ')'")?;
        }
    }
    let next = cursor.block()?;
    Ok(Terminator::Call(CallSite::new(key, args, dest, next)))
}

/// Position within one line's tokens.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn expected(&self, expected: &'static str, found: Option<&Token>) -> AsmError {
        AsmError::Expected {
            line: self.line,
            expected,
            found: found.map_or_else(|| "end of line".to_string(), |token| format!("'{token}'")),
        }
    }

    /// Consume `token` if it is next.
    fn eat(&mut self, token: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn punct(&mut self, token: Token, expected: &'static str) -> Result<(), AsmError> {
        match self.advance() {
            Some(found) if *found == token => Ok(()),
            found => Err(self.expected(expected, found)),
        }
    }

    fn end(&mut self) -> Result<(), AsmError> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some(token) => Err(AsmError::UnexpectedToken {
                line: self.line,
                token: token.to_string(),
            }),
        }
    }

    fn ident(&mut self, expected: &'static str) -> Result<&'a str, AsmError> {
        match self.advance() {
            Some(Token::Ident(word)) => Ok(word),
            found => Err(self.expected(expected, found)),
        }
    }

    fn slot(&mut self) -> Result<Operand, AsmError> {
        match self.advance() {
            Some(Token::Slot(n)) => Ok(Operand(*n)),
            found => Err(self.expected("slot", found)),
        }
    }

    fn block(&mut self) -> Result<BlockId, AsmError> {
        match self.advance() {
            Some(Token::Ident(word)) => match parse_block(word) {
                Some(id) => Ok(id),
                None => Err(self.expected("block", Some(&Token::Ident(word.clone())))),
            },
            found => Err(self.expected("block", found)),
        }
    }

    fn type_kind(&mut self) -> Result<TypeKind, AsmError> {
        let line = self.line;
        let name = self.ident("type")?;
        name.parse().map_err(|_| AsmError::UnknownType {
            line,
            token: name.to_string(),
        })
    }

    fn literal(&mut self) -> Result<Value, AsmError> {
        let value = match self.advance() {
            Some(Token::Int(n)) => Value::Int(*n),
            Some(Token::Float(n)) => Value::Float(*n),
            Some(Token::Decimal(n)) => Value::Decimal(n.clone()),
            Some(Token::Str(s)) => Value::Str(s.clone()),
            Some(Token::Ident(word)) => match word.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "nil" => Value::Nil,
                "NaN" => Value::Float(f64::NAN),
                "inf" => Value::Float(f64::INFINITY),
                _ => return Err(self.expected("literal", Some(&Token::Ident(word.clone())))),
            },
            found => return Err(self.expected("literal", found)),
        };
        Ok(value)
    }
}
