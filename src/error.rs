use std::{convert::From, fmt};

/// Simple custom Error for the table generator
pub struct Error {
    pub kind: ErrorKind,
    pub ctx: Option<Context>,
    pub msg: String,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// operand text doesn't match any recognized operand pattern
    InvalidAddressingMode,
    /// mnemonic and addressing mode are individually fine but don't go together
    InvalidInstruction,
    /// malformed descriptor list
    Descriptor,
    /// a previously emitted table doesn't match the generated one
    Check,
    /// underlying io error
    IO,
    /// catch-all for other errors
    General,
}

/// The table entry being generated when an error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub id: u16,
    pub text: String,
}

impl Error {
    pub fn new(kind: ErrorKind, ctx: Option<Context>, message: &str) -> Error {
        Error {
            kind,
            ctx,
            msg: String::from(message),
        }
    }
    /// Attach the opcode id and descriptor text to an error that doesn't have context yet.
    pub fn at(mut self, id: u16, text: &str) -> Error {
        if self.ctx.is_none() {
            self.ctx = Some(Context {
                id,
                text: text.to_string(),
            });
        }
        self
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::new(ErrorKind::IO, None, e.to_string().as_str()) }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}: {}", red!("optable::Error"), self.msg) }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut res = write!(f, "{}", self.msg);
        if res.is_ok() {
            if let Some(ctx) = self.ctx.as_ref() {
                res = write!(f, "\nContext: opcode ${:02X} ({})", ctx.id, ctx.text);
            }
        }
        res
    }
}
impl std::error::Error for Error {}
