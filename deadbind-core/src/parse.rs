//! Source parsing - JavaScript/TypeScript into an swc syntax tree.
//!
//! The tree is immutable for the duration of an analysis pass. Every node
//! carries an swc [`Span`]; [`SyntaxTree::range`] turns it into a byte range
//! over the original text so edits can be expressed against that text.

use std::ops::Range;
use std::path::{Path, PathBuf};

use swc_common::{sync::Lrc, BytePos, FileName, FilePathMapping, SourceMap, Span, Spanned};
use swc_ecma_ast::{EsVersion, Program};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};

use crate::error::{DeadbindError, DeadbindResult, IoResultExt};

/// Placeholder path used in errors when analyzing text without a file.
const ANON_PATH: &str = "<input>";

/// Maximum source size to parse (10 MB).
const MAX_SOURCE_SIZE: usize = 10_000_000;

const BOM: char = '\u{feff}';

/// Source dialect, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl FileKind {
    /// Returns `None` for anything that is not `.js`, `.jsx`, `.ts` or `.tsx`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" => Some(Self::Js),
            "jsx" => Some(Self::Jsx),
            "ts" => Some(Self::Ts),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn is_typescript(self) -> bool {
        matches!(self, Self::Ts | Self::Tsx)
    }

    fn syntax(self) -> Syntax {
        match self {
            Self::Ts | Self::Tsx => Syntax::Typescript(TsSyntax {
                tsx: self == Self::Tsx,
                decorators: true,
                ..Default::default()
            }),
            // Plain .js files frequently contain JSX, so enable it for both.
            Self::Js | Self::Jsx => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

/// A parsed source file together with the text it was parsed from.
pub struct SyntaxTree {
    program: Program,
    source: String,
    kind: FileKind,
    /// Source map position of the first byte after any byte order mark.
    base: u32,
    /// Length of a leading byte order mark, which the parser never sees.
    bom: usize,
    line_starts: Vec<usize>,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("kind", &self.kind)
            .field("len", &self.source.len())
            .finish()
    }
}

impl SyntaxTree {
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Byte offset of an swc position within the source text.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.base) as usize + self.bom).min(self.source.len())
    }

    /// Byte range of a node within the source text.
    pub fn range(&self, span: Span) -> Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }

    /// Source text covered by a span.
    pub fn slice(&self, span: Span) -> &str {
        self.source.get(self.range(span)).unwrap_or_default()
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        (line + 1, column + 1)
    }
}

fn line_starts(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Parses source text that did not come from a file.
pub fn parse_source(source: &str, kind: FileKind) -> DeadbindResult<SyntaxTree> {
    parse_named(source, kind, Path::new(ANON_PATH))
}

/// Reads and parses a file, choosing the dialect from its extension.
pub fn parse_file(path: &Path) -> DeadbindResult<SyntaxTree> {
    let kind = FileKind::from_path(path).ok_or_else(|| DeadbindError::unsupported(path))?;
    let source = std::fs::read_to_string(path).with_path(path)?;
    parse_named(&source, kind, path)
}

/// Parses `source` and reports errors against `path`.
///
/// Any error the parser recovered from is still treated as a failure: a file
/// that does not parse cleanly is never rewritten.
pub fn parse_named(source: &str, kind: FileKind, path: &Path) -> DeadbindResult<SyntaxTree> {
    if source.len() > MAX_SOURCE_SIZE {
        return Err(DeadbindError::parse(
            path,
            format!("source is {} bytes, limit is {}", source.len(), MAX_SOURCE_SIZE),
        ));
    }

    // The mark is kept in `source` so rewrites preserve it; spans are shifted
    // back over it in `offset`.
    let body = source.strip_prefix(BOM).unwrap_or(source);
    let bom = source.len() - body.len();

    let cm: Lrc<SourceMap> = Lrc::new(SourceMap::new(FilePathMapping::empty()));
    let file_name = Lrc::new(FileName::Real(PathBuf::from(path)));
    let fm = cm.new_source_file(file_name, body.to_string());
    let base = fm.start_pos.0;

    let lexer = Lexer::new(
        kind.syntax(),
        EsVersion::latest(),
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let line_starts = line_starts(source);
    let locate = |pos: BytePos| -> (usize, usize) {
        let offset = pos.0.saturating_sub(base) as usize + bom;
        let line = match line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let column = offset - line_starts.get(line).copied().unwrap_or(0);
        (line + 1, column + 1)
    };

    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(err) => {
            let (line, column) = locate(err.span().lo);
            return Err(DeadbindError::parse_at(path, err.kind().msg(), line, column));
        }
    };

    if let Some(err) = parser.take_errors().into_iter().next() {
        let (line, column) = locate(err.span().lo);
        return Err(DeadbindError::parse_at(path, err.kind().msg(), line, column));
    }

    Ok(SyntaxTree {
        program,
        source: source.to_string(),
        kind,
        base,
        bom,
        line_starts,
    })
}
