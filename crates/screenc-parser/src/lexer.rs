//! Markup scanner for screen documents.
//!
//! Splits source text into [`Markup`] items: start and end tags, character
//! data, comments and processing instructions. Attribute values and
//! character data come out with entity and character references already
//! decoded.
//!
//! Scanning recovers after an error by skipping to the next `<`, so one pass
//! reports every malformed tag in the document.

use winnow::{
    Parser as _,
    ascii::{multispace0, multispace1},
    combinator::{alt, cut_err, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    node::Attribute,
    span::Span,
};

/// Diagnostic details attached to winnow errors through `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScanDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Offset where the failing construct began.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<ScanDiagnostic>>;

/// One scanned piece of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Markup<'a> {
    /// `<?xml ...?>` or another processing instruction.
    Instruction,
    Comment,
    StartTag {
        name: &'a str,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: &'a str,
    },
    /// Decoded character data or the raw content of a CDATA section.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PositionedMarkup<'a> {
    pub markup: Markup<'a>,
    pub span: Span,
}

/// Parses `&name;`, `&#NNN;` or `&#xHHH;` into the character it denotes.
fn reference(input: &mut Input<'_>) -> IResult<char> {
    let start = input.current_token_start();
    '&'.parse_next(input)?;

    cut_err(terminated(
        alt((
            preceded("#x", take_while(1.., |c: char| c.is_ascii_hexdigit()))
                .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)),
            preceded('#', take_while(1.., |c: char| c.is_ascii_digit()))
                .verify_map(|dec: &str| dec.parse::<u32>().ok().and_then(char::from_u32)),
            alt((
                "lt".value('<'),
                "gt".value('>'),
                "amp".value('&'),
                "apos".value('\''),
                "quot".value('"'),
            )),
        )),
        ';',
    ))
    .context(ScanDiagnostic {
        code: ErrorCode::E003,
        message: "invalid entity reference",
        help: Some("use `&lt;`, `&gt;`, `&amp;`, `&apos;`, `&quot;` or a numeric reference"),
        start,
    })
    .parse_next(input)
}

fn push_char(mut acc: String, c: char) -> String {
    acc.push(c);
    acc
}

/// Parses an element or attribute name.
fn name<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
    })
    .verify(|s: &str| {
        s.chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':')
    })
    .parse_next(input)
}

/// Parses a single- or double-quoted attribute value.
fn attribute_value(input: &mut Input<'_>) -> IResult<(String, Span)> {
    let start = input.current_token_start();
    let quote = alt(('"', '\'')).parse_next(input)?;
    let content_start = input.current_token_start();

    let value = repeat(0.., alt((reference, none_of([quote, '<', '&']))))
        .fold(String::new, push_char)
        .parse_next(input)?;
    let content_end = input.current_token_start();

    cut_err(quote)
        .context(ScanDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated attribute value",
            help: Some("close the value with a matching quote"),
            start,
        })
        .parse_next(input)?;

    Ok((value, Span::new(content_start..content_end)))
}

/// Parses `Name = "value"`.
fn attribute(input: &mut Input<'_>) -> IResult<Attribute> {
    let start = input.current_token_start();
    let attr_name = name.parse_next(input)?;

    cut_err((multispace0, '=', multispace0))
        .context(ScanDiagnostic {
            code: ErrorCode::E002,
            message: "expected `=` after attribute name",
            help: Some("attributes take the form Name=\"value\""),
            start,
        })
        .parse_next(input)?;
    let (value, value_span) = cut_err(attribute_value)
        .context(ScanDiagnostic {
            code: ErrorCode::E002,
            message: "expected a quoted attribute value",
            help: Some("attributes take the form Name=\"value\""),
            start,
        })
        .parse_next(input)?;

    let end = input.current_token_start();
    Ok(Attribute::new(
        attr_name.to_string(),
        value,
        Span::new(start..end),
        value_span,
    ))
}

fn start_tag<'a>(input: &mut Input<'a>) -> IResult<Markup<'a>> {
    let start = input.current_token_start();
    let tag = preceded('<', name).parse_next(input)?;
    let attributes: Vec<Attribute> =
        repeat(0.., preceded(multispace1, attribute)).parse_next(input)?;
    multispace0.parse_next(input)?;

    let self_closing = cut_err(alt(("/>".value(true), '>'.value(false))))
        .context(ScanDiagnostic {
            code: ErrorCode::E002,
            message: "expected `>` or `/>` to close the tag",
            help: Some("attributes take the form Name=\"value\""),
            start,
        })
        .parse_next(input)?;

    Ok(Markup::StartTag {
        name: tag,
        attributes,
        self_closing,
    })
}

fn end_tag<'a>(input: &mut Input<'a>) -> IResult<Markup<'a>> {
    let start = input.current_token_start();
    "</".parse_next(input)?;
    cut_err(terminated(name, (multispace0, '>')))
        .context(ScanDiagnostic {
            code: ErrorCode::E002,
            message: "malformed closing tag",
            help: Some("closing tags take the form </Name>"),
            start,
        })
        .map(|tag| Markup::EndTag { name: tag })
        .parse_next(input)
}

/// Parses `open ... close`, committing once `open` matched.
fn enclosed<'a>(
    input: &mut Input<'a>,
    mut open: &'static str,
    close: &'static str,
    message: &'static str,
    help: &'static str,
) -> IResult<&'a str> {
    let start = input.current_token_start();
    open.parse_next(input)?;
    cut_err(terminated(take_until(0.., close), close))
        .context(ScanDiagnostic {
            code: ErrorCode::E001,
            message,
            help: Some(help),
            start,
        })
        .parse_next(input)
}

fn comment<'a>(input: &mut Input<'a>) -> IResult<Markup<'a>> {
    enclosed(input, "<!--", "-->", "unterminated comment", "close the comment with `-->`")
        .map(|_| Markup::Comment)
}

fn cdata<'a>(input: &mut Input<'a>) -> IResult<Markup<'a>> {
    enclosed(
        input,
        "<![CDATA[",
        "]]>",
        "unterminated CDATA section",
        "close the section with `]]>`",
    )
    .map(|content| Markup::Text(content.to_string()))
}

fn instruction<'a>(input: &mut Input<'a>) -> IResult<Markup<'a>> {
    enclosed(
        input,
        "<?",
        "?>",
        "unterminated processing instruction",
        "close the instruction with `?>`",
    )
    .map(|_| Markup::Instruction)
}

fn text<'a>(input: &mut Input<'a>) -> IResult<Markup<'a>> {
    repeat(1.., alt((reference, none_of(['<', '&']))))
        .fold(String::new, push_char)
        .map(Markup::Text)
        .parse_next(input)
}

fn positioned_markup<'a>(input: &mut Input<'a>) -> IResult<PositionedMarkup<'a>> {
    let start = input.current_token_start();
    let markup = alt((comment, cdata, instruction, end_tag, start_tag, text)).parse_next(input)?;
    let end = input.current_token_start();

    Ok(PositionedMarkup {
        markup,
        span: Span::new(start..end),
    })
}

/// Skips to the next `<` after a scanning error.
fn recover(input: &mut Input<'_>) -> IResult<()> {
    take_while(0.., |c: char| c != '<').void().parse_next(input)
}

struct Scanner<'a> {
    items: Vec<PositionedMarkup<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Scanner<'a> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn scan(&mut self, mut input: Input<'a>) {
        while input.eof_offset() > 0 {
            match positioned_markup(&mut input) {
                Ok(item) => self.items.push(item),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos, &input));

                    if input.eof_offset() > 0 {
                        input.next_token();
                    }
                    if recover(&mut input).is_err() {
                        break;
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedMarkup<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.items)
    }

    fn convert_err_mode(
        err: ErrMode<ContextError<ScanDiagnostic>>,
        error_pos: usize,
        input: &Input<'a>,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(ScanDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(Span::new(*start..error_pos), code.description());
            if let Some(help) = help {
                diag = diag.with_help(*help);
            }
            return diag;
        }

        let width = input.peek_token().map_or(0, char::len_utf8);
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(
                Span::new(error_pos..error_pos + width),
                ErrorCode::E002.description(),
            )
            .with_help("markup must start with `<Name`, `</Name>`, `<!--` or `<?`")
    }
}

/// Scans `source` into markup items, collecting every scanning error.
pub(crate) fn scan(source: &str) -> Result<Vec<PositionedMarkup<'_>>, ParseError> {
    let mut scanner = Scanner::new();
    scanner.scan(LocatingSlice::new(source));
    scanner.finish()
}
