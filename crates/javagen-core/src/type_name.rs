//! Parsed type references
//!
//! A type reference is a dot-separated path, optionally followed by bracketed
//! generic arguments. Supported shapes:
//!
//! - `java.lang.String`
//! - `java.util.Map<java.lang.String, com.acme.Row>`
//! - `scala.Array[java.lang.String]`
//! - `kotlin.Array<kotlin.Int?>` (nullable arguments)
//! - `java.lang.String[]` (array suffix, kept verbatim)
//!
//! Only "plain" argument lists are broken down into a tree. Wildcards, bounds,
//! intersections and chained bracket groups are kept as verbatim text so that
//! rewriting can never corrupt them.
//!
//! ## Usage
//!
//! ```
//! use javagen_core::type_name::{Generics, TypeName};
//!
//! let ty = TypeName::parse("java.util.List<com.acme.Row>").unwrap();
//! assert_eq!(ty.simple_name(), "List");
//! assert!(matches!(ty.generics(), Generics::Plain { .. }));
//! assert_eq!(ty.to_string(), "java.util.List<com.acme.Row>");
//! ```

use std::fmt::{self, Write as _};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::CoreError;

/// Deepest generic nesting that is still parsed argument by argument.
///
/// Deeper levels are kept as verbatim text. Parsing, printing and resolution
/// walk the tree with explicit work lists; the derived traits still recurse.
pub const MAX_GENERIC_DEPTH: usize = 1024;

static TYPE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:[\p{L}_][\p{L}\p{N}_]*\.)*[\p{L}_][\p{L}\p{N}_]*)((?:<.*>|\[.*\])*)$")
        .expect("type reference pattern compiles")
});

/// A parsed type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    /// Dot-separated path segments (e.g., `["java", "util", "List"]`)
    segments: Vec<String>,
    /// Bracketed suffix following the path
    generics: Generics,
}

/// The bracketed suffix of a type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Generics {
    /// No suffix at all
    None,
    /// A single bracket group whose arguments are all plain type references
    Plain {
        open: char,
        close: char,
        args: Vec<GenericArg>,
    },
    /// Any other suffix (`[]`, `<?>`, `<? extends T>`, `<A>[]`, ...)
    Verbatim(String),
}

/// One argument of a plain generic argument list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericArg {
    pub ty: TypeName,
    /// Trailing `?` nullability marker
    pub nullable: bool,
}

/// A node found while parsing whose generics are not assembled yet
struct PendingNode<'a> {
    segments: Vec<String>,
    suffix: &'a str,
    depth: usize,
    /// Bracket pair and `(node index, nullable)` per argument
    args: Option<(char, char, Vec<(usize, bool)>)>,
}

impl TypeName {
    pub fn new(segments: Vec<String>, generics: Generics) -> Self {
        Self { segments, generics }
    }

    /// Parse a type reference
    ///
    /// Fails with [`CoreError::InvalidTypeName`] when the input does not have
    /// the shape of a (possibly generic) dotted identifier.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let (segments, suffix) =
            split_reference(input).ok_or_else(|| CoreError::InvalidTypeName(input.to_string()))?;

        // Breadth first: children always land after their parent
        let mut nodes = vec![PendingNode {
            segments,
            suffix,
            depth: 0,
            args: None,
        }];
        let mut next = 0;
        while next < nodes.len() {
            if let Some((open, close, args)) = plain_arguments(nodes[next].suffix, nodes[next].depth) {
                let depth = nodes[next].depth + 1;
                let mut ids = Vec::with_capacity(args.len());
                for (segments, suffix, nullable) in args {
                    ids.push((nodes.len(), nullable));
                    nodes.push(PendingNode {
                        segments,
                        suffix,
                        depth,
                        args: None,
                    });
                }
                nodes[next].args = Some((open, close, ids));
            }
            next += 1;
        }

        // Assemble bottom-up
        let mut built: Vec<Option<TypeName>> = Vec::with_capacity(nodes.len());
        built.resize_with(nodes.len(), || None);
        for (idx, node) in nodes.into_iter().enumerate().rev() {
            let generics = match node.args {
                Some((open, close, ids)) => ids
                    .into_iter()
                    .map(|(id, nullable)| built[id].take().map(|ty| GenericArg { ty, nullable }))
                    .collect::<Option<Vec<_>>>()
                    .map(|args| Generics::Plain { open, close, args })
                    .unwrap_or_else(|| Generics::Verbatim(node.suffix.to_string())),
                None if node.suffix.is_empty() => Generics::None,
                None => {
                    trace!("Keeping generic suffix '{}' verbatim", node.suffix);
                    Generics::Verbatim(node.suffix.to_string())
                }
            };
            built[idx] = Some(TypeName::new(node.segments, generics));
        }

        built
            .first_mut()
            .and_then(Option::take)
            .ok_or_else(|| CoreError::InvalidTypeName(input.to_string()))
    }

    /// Split into path segments and generics
    pub fn into_parts(self) -> (Vec<String>, Generics) {
        (self.segments, self.generics)
    }

    /// Path segments without the generic suffix
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The dotted path without the generic suffix
    pub fn path(&self) -> String {
        self.segments.join(".")
    }

    /// The last path segment
    pub fn simple_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Whether the path contains at least one dot
    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn generics(&self) -> &Generics {
        &self.generics
    }
}

impl Generics {
    pub fn is_none(&self) -> bool {
        matches!(self, Generics::None)
    }

    /// Whether the suffix is one or more `[]` array dimensions
    pub fn array_dimensions(&self) -> usize {
        match self {
            Generics::Verbatim(suffix)
                if !suffix.is_empty()
                    && suffix.len() % 2 == 0
                    && suffix.as_bytes().chunks(2).all(|pair| pair == b"[]") =>
            {
                suffix.len() / 2
            }
            _ => 0,
        }
    }
}

/// Path segments and suffix of a type reference, without looking into the suffix
fn split_reference(text: &str) -> Option<(Vec<String>, &str)> {
    let caps = TYPE_REFERENCE.captures(text)?;
    let path = caps.get(1)?.as_str();
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    Some((path.split('.').map(str::to_string).collect(), suffix))
}

type PlainArguments<'a> = (char, char, Vec<(Vec<String>, &'a str, bool)>);

/// Break a single bracket group into its argument references
///
/// Returns `None` when the suffix is not plain: empty, several groups, or
/// any argument that is not a type reference.
fn plain_arguments(suffix: &str, depth: usize) -> Option<PlainArguments<'_>> {
    if suffix.is_empty() || depth >= MAX_GENERIC_DEPTH {
        return None;
    }

    let open = suffix.chars().next()?;
    let close = match open {
        '<' => '>',
        '[' => ']',
        _ => return None,
    };

    let inner = suffix.strip_prefix(open)?.strip_suffix(close)?;
    let args = split_top_level(inner)?
        .into_iter()
        .map(|piece| {
            let piece = piece.trim();
            let (text, nullable) = match piece.strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (piece, false),
            };
            split_reference(text).map(|(segments, suffix)| (segments, suffix, nullable))
        })
        .collect::<Option<Vec<_>>>()?;

    Some((open, close, args))
}

/// Split a bracket group's content at top-level commas
///
/// Returns `None` when the brackets inside are unbalanced, which also rejects
/// suffixes made of several groups such as `<A>[]`.
fn split_top_level(inner: &str) -> Option<Vec<&str>> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                pieces.push(&inner[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }

    pieces.push(&inner[start..]);
    Some(pieces)
}

/// Output still to be printed, innermost last
enum Piece<'a> {
    Type(&'a TypeName),
    Generics(&'a Generics),
    Arg(&'a GenericArg),
    Text(&'static str),
    Close(char),
}

fn write_pieces(f: &mut fmt::Formatter<'_>, first: Piece<'_>) -> fmt::Result {
    let mut stack = vec![first];
    while let Some(piece) = stack.pop() {
        match piece {
            Piece::Type(ty) => {
                f.write_str(&ty.segments.join("."))?;
                stack.push(Piece::Generics(&ty.generics));
            }
            Piece::Generics(Generics::None) => {}
            Piece::Generics(Generics::Verbatim(text)) => f.write_str(text)?,
            Piece::Generics(Generics::Plain { open, close, args }) => {
                f.write_char(*open)?;
                stack.push(Piece::Close(*close));
                for (idx, arg) in args.iter().enumerate().rev() {
                    stack.push(Piece::Arg(arg));
                    if idx > 0 {
                        stack.push(Piece::Text(", "));
                    }
                }
            }
            Piece::Arg(arg) => {
                if arg.nullable {
                    stack.push(Piece::Text("?"));
                }
                stack.push(Piece::Type(&arg.ty));
            }
            Piece::Text(text) => f.write_str(text)?,
            Piece::Close(close) => f.write_char(close)?,
        }
    }
    Ok(())
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pieces(f, Piece::Type(self))
    }
}

impl fmt::Display for Generics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pieces(f, Piece::Generics(self))
    }
}

impl fmt::Display for GenericArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pieces(f, Piece::Arg(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_path() {
        let ty = TypeName::parse("com.example.Table").unwrap();
        assert_eq!(ty.segments(), &["com", "example", "Table"]);
        assert_eq!(ty.simple_name(), "Table");
        assert_eq!(ty.path(), "com.example.Table");
        assert!(ty.is_qualified());
        assert!(ty.generics().is_none());
    }

    #[test]
    fn test_parse_unqualified() {
        let ty = TypeName::parse("int").unwrap();
        assert!(!ty.is_qualified());
        assert_eq!(ty.simple_name(), "int");
    }

    #[test]
    fn test_parse_plain_generics() {
        let ty = TypeName::parse("java.util.Map<java.lang.String, com.acme.Row>").unwrap();
        let Generics::Plain { open, close, args } = ty.generics() else {
            panic!("expected plain generics, got {:?}", ty.generics());
        };
        assert_eq!((*open, *close), ('<', '>'));
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].ty.path(), "java.lang.String");
        assert_eq!(args[1].ty.path(), "com.acme.Row");
    }

    #[test]
    fn test_parse_nested_generics() {
        let ty = TypeName::parse("java.util.List<java.util.Set<com.acme.Row>>").unwrap();
        let Generics::Plain { args, .. } = ty.generics() else {
            panic!("expected plain generics");
        };
        assert!(matches!(args[0].ty.generics(), Generics::Plain { .. }));
        assert_eq!(ty.to_string(), "java.util.List<java.util.Set<com.acme.Row>>");
    }

    #[test]
    fn test_parse_scala_brackets() {
        let ty = TypeName::parse("scala.Array[java.lang.String]").unwrap();
        assert!(matches!(ty.generics(), Generics::Plain { open: '[', close: ']', .. }));
    }

    #[test]
    fn test_nullable_argument() {
        let ty = TypeName::parse("kotlin.Array<kotlin.Int?>").unwrap();
        let Generics::Plain { args, .. } = ty.generics() else {
            panic!("expected plain generics");
        };
        assert!(args[0].nullable);
        assert_eq!(ty.to_string(), "kotlin.Array<kotlin.Int?>");
    }

    #[test]
    fn test_non_plain_suffixes_are_verbatim() {
        let cases = vec![
            ("java.lang.String[]", "[]"),
            ("java.util.List<?>", "<?>"),
            ("java.util.List<? extends com.acme.Row>", "<? extends com.acme.Row>"),
            ("java.util.List<com.acme.Row>[]", "<com.acme.Row>[]"),
        ];

        for (input, suffix) in cases {
            let ty = TypeName::parse(input).unwrap();
            assert_eq!(
                ty.generics(),
                &Generics::Verbatim(suffix.to_string()),
                "suffix mismatch for {}",
                input
            );
            assert_eq!(ty.to_string(), input);
        }
    }

    #[test]
    fn test_invalid_type_names() {
        for input in ["", "1abc", "com..Foo", "com.acme.Foo?", "com.acme.Foo bar", ".Foo"] {
            assert!(
                matches!(TypeName::parse(input), Err(CoreError::InvalidTypeName(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_deep_generics_stay_plain() {
        let depth = 64;
        let input = format!("{}z.Leaf{}", "a.Box<".repeat(depth), ">".repeat(depth));

        let ty = TypeName::parse(&input).unwrap();
        assert_eq!(ty.to_string(), input);

        let mut current = &ty;
        let mut plain_levels = 0;
        while let Generics::Plain { args, .. } = current.generics() {
            plain_levels += 1;
            current = &args[0].ty;
        }
        assert_eq!(plain_levels, depth);
        assert_eq!(current.path(), "z.Leaf");
        assert!(current.generics().is_none());
    }

    #[test]
    fn test_generic_depth_guard() {
        let depth = MAX_GENERIC_DEPTH + 8;
        let input = format!("{}a.Leaf{}", "a.Box<".repeat(depth), ">".repeat(depth));

        let ty = TypeName::parse(&input).unwrap();
        assert_eq!(ty.to_string(), input);

        let mut current = &ty;
        let mut plain_levels = 0;
        while let Generics::Plain { args, .. } = current.generics() {
            plain_levels += 1;
            current = &args[0].ty;
        }
        assert_eq!(plain_levels, MAX_GENERIC_DEPTH);
        assert!(matches!(current.generics(), Generics::Verbatim(_)));
    }

    #[test]
    fn test_array_dimensions() {
        assert_eq!(TypeName::parse("a.B[][]").unwrap().generics().array_dimensions(), 2);
        assert_eq!(TypeName::parse("a.B").unwrap().generics().array_dimensions(), 0);
        assert_eq!(TypeName::parse("a.B<?>").unwrap().generics().array_dimensions(), 0);
        assert_eq!(TypeName::parse("a.B[x.Y]").unwrap().generics().array_dimensions(), 0);
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("a.A, b.B<c.C, d.D>"), Some(vec!["a.A", " b.B<c.C, d.D>"]));
        assert_eq!(split_top_level("A>["), None);
        assert_eq!(split_top_level("A<B"), None);
    }
}
