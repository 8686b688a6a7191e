use std::{fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, Spacing, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

pub(crate) fn config(ts: TokenStream) -> Result<ast::Record> {
    let p = &mut Parser::new(ts);
    skip_attrs(p)?;
    skip_vis(p);
    if p.at_keyword("enum") || p.at_keyword("union") {
        bail!("only structs with named fields can derive Config")
    }
    p.expect_keyword("struct")?;
    let name = p.expect_ident()?;
    if p.at_punct('<') {
        bail!("generic structs are not supported: `{name}`")
    }
    if p.eat_punct(';') {
        return Ok(ast::Record { name, fields: Vec::new() });
    }
    if p.at_delim(Delimiter::Parenthesis) {
        bail!("tuple structs are not supported: `{name}`")
    }

    let mut fields = Vec::new();
    p.enter_delim(Delimiter::Brace)?;
    while !p.end() {
        fields.push(field(p)?);
    }
    p.exit_delim()?;
    Ok(ast::Record { name, fields })
}

fn field(p: &mut Parser) -> Result<ast::Field> {
    let attrs = field_attrs(p)?;
    skip_vis(p);
    let ident = p.expect_ident()?;
    p.expect_punct(':')?;
    skip_ty(p);
    p.eat_punct(',');
    Ok(ast::Field { ident, attrs })
}

fn field_attrs(p: &mut Parser) -> Result<ast::Attrs> {
    let mut attrs = ast::Attrs::default();
    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        if p.eat_keyword("config") {
            p.enter_delim(Delimiter::Parenthesis)?;
            while !p.end() {
                let key = p.expect_ident()?;
                p.expect_punct('=')?;
                let value = p.expect_string()?;
                let slot = match key.as_str() {
                    "flag" => &mut attrs.flag,
                    "env" => &mut attrs.env,
                    "help" => &mut attrs.help,
                    "def" => &mut attrs.def,
                    _ => bail!("unknown key `{key}`, expected one of `flag`, `env`, `help`, `def`"),
                };
                if slot.is_some() {
                    bail!("duplicate key `{key}`")
                }
                *slot = Some(value);
                if !p.eat_punct(',') {
                    break;
                }
            }
            p.exit_delim()?;
        } else {
            p.skip_rest();
        }
        p.exit_delim()?;
    }
    Ok(attrs)
}

fn skip_attrs(p: &mut Parser) -> Result<()> {
    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        p.skip_rest();
        p.exit_delim()?;
    }
    Ok(())
}

fn skip_vis(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.ts.pop();
    }
}

/// Skips a field type up to the next top-level `,`.
fn skip_ty(p: &mut Parser) {
    let mut depth = 0usize;
    let mut arrow = false;
    while let Some(tt) = p.ts.last() {
        match tt {
            TokenTree::Punct(punct) if punct.as_char() == ',' && depth == 0 => break,
            TokenTree::Punct(punct) if punct.as_char() == '<' => depth += 1,
            TokenTree::Punct(punct) if punct.as_char() == '>' && !arrow => {
                depth = depth.saturating_sub(1)
            }
            _ => {}
        }
        arrow = matches!(
            tt,
            TokenTree::Punct(punct) if punct.as_char() == '-' && punct.spacing() == Spacing::Joint
        );
        p.ts.pop();
    }
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            let next = self.ts.pop().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{next}`")
        }
        self.ts = self.stack.pop().unwrap_or_default();
        Ok(())
    }
    fn skip_rest(&mut self) {
        self.ts.clear();
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn at_delim(&mut self, delimiter: Delimiter) -> bool {
        matches!(self.ts.last(), Some(TokenTree::Group(g)) if g.delimiter() == delimiter)
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{kw}`")
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(other) => bail!("expected an identifier, got: `{other}`"),
            None => bail!("expected an identifier"),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{punct}`")
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        if self.at_punct(punct) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_punct(&mut self, punct: char) -> bool {
        matches!(self.ts.last(), Some(TokenTree::Punct(p)) if p.as_char() == punct)
    }

    /// Returns the literal's source text, quotes included.
    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                if text.starts_with('"') || text.starts_with("r\"") || text.starts_with("r#") {
                    Ok(text)
                } else {
                    bail!("expected a string literal, got: `{text}`")
                }
            }
            _ => bail!("expected a string literal"),
        }
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::Parenthesis => "(",
        Delimiter::None => "group",
    }
}
