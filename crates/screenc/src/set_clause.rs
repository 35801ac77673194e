//! The content language of `Set` and `SetString` elements.
//!
//! ```text
//! content    := clause (";" clause)* ";"?
//! clause     := name ("." name)? "=" value
//! ```
//!
//! A `Set` value is a double-quoted string or a run of characters up to the
//! next `;`, with backslash escapes removed. A `SetString` value is kept as
//! written, quotes included, and evaluated as a string expression later.

use winnow::{
    ModalResult, Parser as _,
    ascii::multispace0,
    combinator::{alt, delimited, eof, opt, preceded, repeat},
    token::{any, none_of, take_while},
};

use crate::error::ErrorKind;

/// Which element the content belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetKind {
    Set,
    SetString,
}

impl SetKind {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SetKind::Set => "Set",
            SetKind::SetString => "SetString",
        }
    }
}

/// One `target.attribute = value` clause. `target` is absent in the short
/// `name = value` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment {
    pub target: Option<String>,
    pub attribute: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SetContent {
    Assignments(Vec<Assignment>),
    /// The whole content is a single value for the element itself.
    Value(String),
}

fn name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        .parse_next(input)
}

fn escaped(input: &mut &str) -> ModalResult<char> {
    preceded('\\', any).parse_next(input)
}

fn quoted(input: &mut &str) -> ModalResult<String> {
    delimited(
        '"',
        repeat(0.., alt((escaped, none_of(['"', '\\'])))).fold(String::new, |mut acc, c| {
            acc.push(c);
            acc
        }),
        '"',
    )
    .parse_next(input)
}

fn unquoted(input: &mut &str) -> ModalResult<String> {
    repeat(1.., alt((escaped, none_of([';', '"', '\\']))))
        .fold(String::new, |mut acc, c| {
            acc.push(c);
            acc
        })
        .map(|s: String| s.trim_end().to_string())
        .parse_next(input)
}

fn raw(input: &mut &str) -> ModalResult<String> {
    repeat::<_, _, (), _, _>(
        1..,
        alt((
            quoted.void(),
            escaped.void(),
            none_of([';', '"', '\\']).void(),
        )),
    )
    .take()
    .map(|s: &str| s.trim_end().to_string())
    .parse_next(input)
}

fn value(input: &mut &str, kind: SetKind) -> ModalResult<String> {
    multispace0.parse_next(input)?;
    match kind {
        SetKind::Set => alt((quoted, unquoted)).parse_next(input),
        SetKind::SetString => raw.parse_next(input),
    }
}

fn assignment(input: &mut &str, kind: SetKind) -> ModalResult<Assignment> {
    multispace0.parse_next(input)?;
    let first = name.parse_next(input)?;
    let member = opt(preceded('.', name)).parse_next(input)?;
    (multispace0, '=').parse_next(input)?;
    let value = value(input, kind)?;

    let (target, attribute) = match member {
        Some(attribute) => (Some(first.to_string()), attribute),
        None => (None, first),
    };
    Ok(Assignment {
        target,
        attribute: attribute.to_string(),
        value,
    })
}

fn assignments(input: &mut &str, kind: SetKind) -> ModalResult<Vec<Assignment>> {
    let mut clauses = vec![assignment(input, kind)?];
    while opt((multispace0, ';')).parse_next(input)?.is_some() {
        match opt(|i: &mut &str| assignment(i, kind)).parse_next(input)? {
            Some(clause) => clauses.push(clause),
            None => break,
        }
    }
    (multispace0, eof).parse_next(input)?;
    Ok(clauses)
}

fn whole_value(input: &mut &str, kind: SetKind) -> ModalResult<String> {
    let value = value(input, kind)?;
    (multispace0, eof).parse_next(input)?;
    Ok(value)
}

/// Parses the text content of a `Set` or `SetString`.
///
/// With `has_ref`, every clause must use the short form and names an
/// attribute of the referenced element. `accepts_value` allows the content
/// to be a bare value when it is not a list of clauses.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidSet`] naming the full content.
pub(crate) fn parse_set_content(
    content: &str,
    kind: SetKind,
    has_ref: bool,
    accepts_value: bool,
) -> Result<SetContent, ErrorKind> {
    let mut input = content;
    if let Ok(clauses) = assignments(&mut input, kind)
        && (!has_ref || clauses.iter().all(|c| c.target.is_none()))
    {
        return Ok(SetContent::Assignments(clauses));
    }

    if !has_ref && accepts_value {
        let mut input = content;
        if let Ok(value) = whole_value(&mut input, kind) {
            return Ok(SetContent::Value(value));
        }
    }

    Err(ErrorKind::InvalidSet {
        keyword: kind.keyword(),
        text: content.to_string(),
    })
}
