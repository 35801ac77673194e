//! # screenc Parser
//!
//! Loads screen documents: a small XML subset with elements, quoted
//! attributes, character data, CDATA, comments and processing instructions.
//! DTDs and namespaces are not supported.
//!
//! ## Usage
//!
//! ```
//! # use screenc_parser::{parse_document, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         <Screens>
//!             <Canvas Name="Main" Width="320" Height="240"/>
//!         </Screens>
//!     "#;
//!
//!     let root = parse_document(source)?;
//!     assert_eq!(root.tag(), "Screens");
//!     assert_eq!(root.children()[0].attribute("Width").map(|a| a.value()), Some("320"));
//!     Ok(())
//! }
//! ```

pub mod error;
mod lexer;
mod node;
mod parser;
mod span;

pub use node::{Attribute, SourceNode};
pub use span::Span;

use log::trace;

/// Parses `source` into its root element.
///
/// Every scanning problem in the document is reported, not only the first.
/// Structural problems such as mismatched closing tags are reported only
/// once scanning succeeded.
///
/// # Errors
///
/// Returns a [`error::ParseError`] holding one diagnostic per problem.
pub fn parse_document(source: &str) -> Result<SourceNode, error::ParseError> {
    let items = lexer::scan(source)?;
    trace!(items = items.len(); "Scanned markup");
    parser::build_tree(source, items)
}
