//! go.mod parser for Go modules
//!
//! Handles:
//! - module, go and toolchain directives
//! - require statements (single and block), with `// indirect` markers
//! - exclude and replace, with module versions checked like require
//! - retract, tool, ignore and godebug (syntax-checked only)
//! - quoted and raw-quoted tokens, `//` comments
//!
//! CRLF line endings are normalized to LF before parsing.

use crate::domain::{ModuleIdentity, UNKNOWN_GO_VERSION};
use crate::error::ManifestError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

// Go version directive: 1.21, 1.21.3, 1.22rc1
static GO_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9][0-9]*\.(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))?([a-z]+[0-9]+)?$").unwrap()
});

// Canonical module version: v1.2.3, v1.2.3-pre.1, pseudo-versions, v2.0.0+incompatible
static MODULE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v(?P<major>0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(-[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?(?P<incompatible>\+incompatible)?$",
    )
    .unwrap()
});

// Major version suffix of a module path: example.com/mod/v2, gopkg.in/yaml.v3
static PATH_MAJOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:/v(?P<slash>[2-9]|[1-9][0-9]+)|^gopkg\.in/.+\.v(?P<gopkg>0|[1-9][0-9]*)(?:-unstable)?)$",
    )
    .unwrap()
});

// Toolchain directive: default, go1.21.0, go1.22rc1
static TOOLCHAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^default$|^go1($|\.)").unwrap());

/// A `require` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Module path
    pub path: String,
    /// Required version
    pub version: String,
    /// Marked with `// indirect`
    pub indirect: bool,
}

/// Parsed contents of a go.mod file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModFile {
    /// Path from the `module` directive
    pub module: Option<String>,
    /// Version from the `go` directive
    pub go: Option<String>,
    /// Name from the `toolchain` directive
    pub toolchain: Option<String>,
    /// All `require` entries in file order
    pub requires: Vec<Requirement>,
}

/// A go.mod syntax error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    /// 1-based line number
    pub line: usize,
    /// Description of the problem
    pub message: String,
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Module,
    Go,
    Toolchain,
    Godebug,
    Require,
    Exclude,
    Replace,
    Retract,
    Tool,
    Ignore,
}

impl Verb {
    fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "module" => Verb::Module,
            "go" => Verb::Go,
            "toolchain" => Verb::Toolchain,
            "godebug" => Verb::Godebug,
            "require" => Verb::Require,
            "exclude" => Verb::Exclude,
            "replace" => Verb::Replace,
            "retract" => Verb::Retract,
            "tool" => Verb::Tool,
            "ignore" => Verb::Ignore,
            _ => return None,
        })
    }

    fn keyword(&self) -> &'static str {
        match self {
            Verb::Module => "module",
            Verb::Go => "go",
            Verb::Toolchain => "toolchain",
            Verb::Godebug => "godebug",
            Verb::Require => "require",
            Verb::Exclude => "exclude",
            Verb::Replace => "replace",
            Verb::Retract => "retract",
            Verb::Tool => "tool",
            Verb::Ignore => "ignore",
        }
    }

    fn allows_block(&self) -> bool {
        !matches!(self, Verb::Go | Verb::Toolchain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    LParen,
    RParen,
}

/// Tokens of one line plus its trailing comment
struct Line {
    tokens: Vec<Token>,
    comment: Option<String>,
}

/// Convert CRLF line endings to LF
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Parser for go.mod files
pub struct GoModParser;

impl GoModParser {
    /// Read, normalize and parse the manifest at `path` into a module identity
    pub fn parse_file(&self, path: &Path) -> Result<ModuleIdentity, ManifestError> {
        let bytes = std::fs::read(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let content = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
            ManifestError::parse_error(path, line, "invalid UTF-8")
        })?;

        let file = self
            .parse_str(&normalize_line_endings(&content))
            .map_err(|e| ManifestError::parse_error(path, e.line, e.message))?;

        let name = file
            .module
            .ok_or_else(|| ManifestError::MissingModuleDeclaration {
                path: path.to_path_buf(),
            })?;
        let toolchain_version = file.go.unwrap_or_else(|| UNKNOWN_GO_VERSION.to_string());

        tracing::debug!(
            module = %name,
            go = %toolchain_version,
            requires = file.requires.len(),
            "parsed {}",
            path.display()
        );
        Ok(ModuleIdentity::new(name, toolchain_version))
    }

    /// Parse go.mod text (LF line endings)
    pub fn parse_str(&self, content: &str) -> Result<GoModFile, SyntaxError> {
        let mut file = GoModFile::default();
        let mut block: Option<(Verb, usize)> = None;

        for (index, raw) in content.split('\n').enumerate() {
            let line_no = index + 1;
            let line = tokenize(raw, line_no)?;
            if line.tokens.is_empty() {
                continue;
            }

            if let Some((verb, _)) = block {
                if line.tokens == [Token::RParen] {
                    block = None;
                    continue;
                }
                let args = words(&line.tokens, line_no)?;
                apply(&mut file, verb, &args, line.comment.as_deref(), line_no)?;
                continue;
            }

            let keyword = match &line.tokens[0] {
                Token::Word(word) => word.as_str(),
                Token::LParen => return Err(SyntaxError::new(line_no, "unexpected (")),
                Token::RParen => return Err(SyntaxError::new(line_no, "unexpected )")),
            };
            let verb = Verb::from_keyword(keyword).ok_or_else(|| {
                SyntaxError::new(line_no, format!("unknown directive: {}", keyword))
            })?;

            if line.tokens[1..] == [Token::LParen] {
                if !verb.allows_block() {
                    return Err(SyntaxError::new(
                        line_no,
                        format!("{} directive cannot be a block", verb.keyword()),
                    ));
                }
                block = Some((verb, line_no));
                continue;
            }

            let args = words(&line.tokens[1..], line_no)?;
            apply(&mut file, verb, &args, line.comment.as_deref(), line_no)?;
        }

        if let Some((verb, start)) = block {
            return Err(SyntaxError::new(
                start,
                format!("{} block is missing its closing )", verb.keyword()),
            ));
        }

        Ok(file)
    }
}

/// Split one line into tokens and a trailing `//` comment
fn tokenize(raw: &str, line_no: usize) -> Result<Line, SyntaxError> {
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut chars = raw.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '/' if raw[start..].starts_with("//") => {
                comment = Some(raw[start + 2..].trim().to_string());
                break;
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '"' => {
                chars.next();
                let mut word = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, 'n')) => word.push('\n'),
                            Some((_, 't')) => word.push('\t'),
                            Some((_, escaped)) => word.push(escaped),
                            None => break,
                        },
                        c => word.push(c),
                    }
                }
                if !closed {
                    return Err(SyntaxError::new(line_no, "unterminated quoted string"));
                }
                tokens.push(Token::Word(word));
            }
            '`' => {
                chars.next();
                let rest = &raw[start + 1..];
                let end = rest
                    .find('`')
                    .ok_or_else(|| SyntaxError::new(line_no, "unterminated raw string"))?;
                tokens.push(Token::Word(rest[..end].to_string()));
                // skip past the closing backquote
                let stop = start + 1 + end;
                while chars.next_if(|&(i, _)| i <= stop).is_some() {}
            }
            _ => {
                let mut end = raw.len();
                for (i, c) in raw[start..].char_indices() {
                    if c.is_whitespace()
                        || c == '('
                        || c == ')'
                        || (i > 0 && raw[start + i..].starts_with("//"))
                    {
                        end = start + i;
                        break;
                    }
                }
                tokens.push(Token::Word(raw[start..end].to_string()));
                while chars.next_if(|&(i, _)| i < end).is_some() {}
            }
        }
    }

    Ok(Line { tokens, comment })
}

/// Extract word arguments, rejecting stray parentheses
fn words(tokens: &[Token], line_no: usize) -> Result<Vec<&str>, SyntaxError> {
    tokens
        .iter()
        .map(|t| match t {
            Token::Word(w) => Ok(w.as_str()),
            Token::LParen => Err(SyntaxError::new(line_no, "unexpected (")),
            Token::RParen => Err(SyntaxError::new(line_no, "unexpected )")),
        })
        .collect()
}

/// Apply one directive (or block entry) to the parsed file
fn apply(
    file: &mut GoModFile,
    verb: Verb,
    args: &[&str],
    comment: Option<&str>,
    line_no: usize,
) -> Result<(), SyntaxError> {
    let usage = |text: &str| SyntaxError::new(line_no, format!("usage: {}", text));

    match verb {
        Verb::Module => {
            if args.len() != 1 {
                return Err(usage("module module/path"));
            }
            if file.module.is_some() {
                return Err(SyntaxError::new(line_no, "repeated module statement"));
            }
            file.module = Some(args[0].to_string());
        }
        Verb::Go => {
            if args.len() != 1 {
                return Err(usage("go 1.23"));
            }
            if file.go.is_some() {
                return Err(SyntaxError::new(line_no, "repeated go statement"));
            }
            if !GO_VERSION_RE.is_match(args[0]) {
                return Err(SyntaxError::new(
                    line_no,
                    format!("invalid go version '{}': must match format 1.23.0", args[0]),
                ));
            }
            file.go = Some(args[0].to_string());
        }
        Verb::Toolchain => {
            if args.len() != 1 {
                return Err(usage("toolchain go1.23.0"));
            }
            if file.toolchain.is_some() {
                return Err(SyntaxError::new(line_no, "repeated toolchain statement"));
            }
            if !TOOLCHAIN_RE.is_match(args[0]) {
                return Err(SyntaxError::new(
                    line_no,
                    format!(
                        "invalid toolchain version '{}': must match format go1.23.0 or default",
                        args[0]
                    ),
                ));
            }
            file.toolchain = Some(args[0].to_string());
        }
        Verb::Require => {
            if args.len() != 2 {
                return Err(usage("require module/path v1.2.3"));
            }
            check_version(verb, args[0], args[1], line_no)?;
            let indirect = comment
                .map(|c| c == "indirect" || c.starts_with("indirect;"))
                .unwrap_or(false);
            file.requires.push(Requirement {
                path: args[0].to_string(),
                version: args[1].to_string(),
                indirect,
            });
        }
        Verb::Exclude => {
            if args.len() != 2 {
                return Err(usage("exclude module/path v1.2.3"));
            }
            check_version(verb, args[0], args[1], line_no)?;
        }
        Verb::Replace => {
            let arrow = args
                .iter()
                .position(|a| *a == "=>")
                .ok_or_else(|| usage("replace module/path [v1.2.3] => other/module v1.4"))?;
            let (old, new) = (&args[..arrow], &args[arrow + 1..]);
            if old.is_empty() || old.len() > 2 || new.is_empty() || new.len() > 2 {
                return Err(usage("replace module/path [v1.2.3] => other/module v1.4"));
            }
            if let [path, version] = old {
                check_version(verb, path, version, line_no)?;
            }
            match new {
                [target] if !is_directory_path(target) => {
                    return Err(SyntaxError::new(
                        line_no,
                        "replacement module without version must be directory path (rooted or starting with ./ or ../)",
                    ));
                }
                [target, _] if is_directory_path(target) => {
                    return Err(SyntaxError::new(
                        line_no,
                        "replacement module directory path must not have version",
                    ));
                }
                [target, version] => check_version(verb, target, version, line_no)?,
                _ => {}
            }
        }
        Verb::Retract => {
            if args.is_empty() {
                return Err(usage("retract v1.2.3 or retract [v1.0.0, v1.1.0]"));
            }
        }
        Verb::Tool => {
            if args.len() != 1 {
                return Err(usage("tool module/path/cmd"));
            }
        }
        Verb::Ignore => {
            if args.len() != 1 {
                return Err(usage("ignore ./path"));
            }
        }
        Verb::Godebug => {
            if args.len() != 1 || !args[0].contains('=') {
                return Err(usage("godebug key=value"));
            }
        }
    }
    Ok(())
}

/// Check that `version` is canonical and agrees with the major version of `path`
fn check_version(
    verb: Verb,
    path: &str,
    version: &str,
    line_no: usize,
) -> Result<(), SyntaxError> {
    let invalid = |reason: &str| {
        SyntaxError::new(
            line_no,
            format!(
                "{} {}: version \"{}\" invalid: {}",
                verb.keyword(),
                path,
                version,
                reason
            ),
        )
    };

    let caps = MODULE_VERSION_RE
        .captures(version)
        .ok_or_else(|| invalid("must be of the form v1.2.3"))?;
    let major = &caps["major"];
    let incompatible = caps.name("incompatible").is_some();

    match path_major(path) {
        Some(expected) if incompatible || major != expected => Err(invalid(&format!(
            "should be v{}, not v{}",
            expected,
            version.trim_start_matches('v')
        ))),
        Some(_) => Ok(()),
        None if incompatible && (major == "0" || major == "1") => Err(invalid(
            "+incompatible suffix not allowed: major version v0/v1 is compatible",
        )),
        None if !incompatible && major != "0" && major != "1" => Err(invalid(&format!(
            "should be v0 or v1, not v{}",
            major
        ))),
        None => Ok(()),
    }
}

/// Major version encoded in a module path, if any
fn path_major(path: &str) -> Option<&str> {
    let caps = PATH_MAJOR_RE.captures(path)?;
    caps.name("slash")
        .or_else(|| caps.name("gopkg"))
        .map(|m| m.as_str())
}

/// Replacement targets without a version must be local directories
fn is_directory_path(path: &str) -> bool {
    path == "."
        || path == ".."
        || ["./", "../", ".\\", "..\\", "/"]
            .iter()
            .any(|prefix| path.starts_with(prefix))
        || Path::new(path).is_absolute()
}
