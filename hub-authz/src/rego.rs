//! # Policy modules
//!
//! Structural reading of custom policy documents written in the Rego rule
//! language. Policies are evaluated by the external authorizer, so this module
//! only extracts what the authorizer depends on: the package the module
//! declares and the names of the rules defined at the top level.
//!
//! ```text
//! package artifacthub.authz          <- package path
//!
//! default allow = false              <- rule "allow"
//! allow { ... }                      <- rule "allow"
//! allowed_actions[action] { ... }    <- rule "allowed_actions"
//! ```
//!
//! Rule bodies are skipped, not interpreted. The reader still rejects text
//! that cannot be a module at all: a missing package clause, characters Rego
//! has no use for, unbalanced brackets, unterminated strings and top-level
//! statements that are not an import, a default or a rule.
//!
//! A line continues the previous statement while that statement ends in an
//! operator, so only names heading a statement count as rules.

use std::collections::BTreeSet;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Package every organization policy must declare.
pub const AUTHZ_PACKAGE: &str = "artifacthub.authz";

/// Boolean decision rule queried by the authorizer.
pub const ALLOW_RULE: &str = "allow";

/// Rule listing the actions granted to the requesting user.
pub const ALLOWED_ACTIONS_RULE: &str = "allowed_actions";

/// Reserved words, never a rule name.
const KEYWORDS: &[&str] = &[
    "as", "contains", "default", "else", "every", "false", "if", "import", "in", "not", "null",
    "package", "some", "true", "with",
];

/// Words that cannot begin a value.
const NON_TERM_WORDS: &[&str] = &[
    "as", "contains", "default", "else", "every", "if", "import", "in", "not", "package", "some",
    "with",
];

/// Operators that must be followed by a value.
const OPERATORS: &[&str] = &[
    "=", ":=", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "%", "&", "|",
];

/// Tokens after which a statement carries on onto the next line.
const CONTINUATIONS: &[&str] = &[
    ".", ",", ":", "=", ":=", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "%", "&", "|",
    "as", "contains", "default", "else", "every", "if", "import", "in", "not", "some", "with",
];

/// Errors raised while reading a policy module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The module does not start with a package clause
    #[error("package declaration not found")]
    MissingPackage,

    /// The package clause is not followed by a dotted path
    #[error("invalid package path at line {line}")]
    InvalidPackagePath {
        /// Line of the package clause
        line: usize,
    },

    /// A string literal is never closed
    #[error("unterminated string starting at line {line}")]
    UnterminatedString {
        /// Line where the string starts
        line: usize,
    },

    /// A closing bracket does not match the innermost open one
    #[error("unexpected '{found}' at line {line}")]
    UnexpectedBracket {
        /// The offending bracket
        found: char,
        /// Line of the bracket
        line: usize,
    },

    /// A bracket is still open at the end of the module
    #[error("unclosed '{open}' opened at line {line}")]
    UnclosedBracket {
        /// The open bracket
        open: char,
        /// Line where it was opened
        line: usize,
    },

    /// A character that is not part of any Rego token
    #[error("unexpected character '{found}' at line {line}")]
    UnexpectedCharacter {
        /// The offending character
        found: char,
        /// Line of the character
        line: usize,
    },

    /// A token out of place in a statement
    #[error("unexpected {found} at line {line}")]
    UnexpectedToken {
        /// Description of the token
        found: String,
        /// Line of the token
        line: usize,
    },

    /// The module ends in the middle of a statement
    #[error("unexpected end of module after line {line}")]
    UnexpectedEnd {
        /// Line of the last token
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Literal,
    Punct(&'static str),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: usize,
    /// Bracket nesting depth before this token
    depth: usize,
    /// First token on its line
    line_start: bool,
}

/// Package and top-level rule names of a policy module.
///
/// # Example
///
/// ```
/// use hub_authz::rego::{RegoModule, AUTHZ_PACKAGE};
///
/// let module = RegoModule::parse(r#"
///     package artifacthub.authz
///
///     default allow = false
///     allow { input.user == "admin" }
/// "#).unwrap();
///
/// assert_eq!(module.package(), AUTHZ_PACKAGE);
/// assert!(module.has_rule("allow"));
/// assert!(!module.has_rule("allowed_actions"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegoModule {
    package: String,
    rules: BTreeSet<String>,
}

impl RegoModule {
    /// Read the package path and rule names from a module's source.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        let (package, body) = read_package(&tokens)?;

        let mut rules = BTreeSet::new();
        for statement in statements(body) {
            if let Some(name) = read_statement(statement)? {
                rules.insert(name.to_string());
            }
        }

        Ok(Self { package, rules })
    }

    /// Dotted package path, e.g. `artifacthub.authz`.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Check if a rule with this name is defined at the top level.
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains(name)
    }

    /// Check if the module defines `rule` under `package`.
    pub fn declares(&self, package: &str, rule: &str) -> bool {
        self.package == package && self.has_rule(rule)
    }

    /// Names of all top-level rules, sorted.
    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(String::as_str)
    }
}

impl Token {
    fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(w) if w == word)
    }

    fn is_punct(&self, punct: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == punct)
    }

    fn is_operator(&self) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if OPERATORS.contains(&p))
    }

    /// Check if a value can begin with this token.
    fn starts_term(&self) -> bool {
        match &self.kind {
            TokenKind::Ident(word) => !NON_TERM_WORDS.contains(&word.as_str()),
            TokenKind::Literal => true,
            TokenKind::Punct(p) => matches!(*p, "(" | "[" | "{" | "-"),
        }
    }

    /// Check if this token can follow a rule name.
    fn opens_rule(&self) -> bool {
        match &self.kind {
            TokenKind::Ident(word) => word == "contains" || word == "if",
            TokenKind::Punct(p) => matches!(*p, "{" | "=" | ":=" | "[" | "(" | "."),
            TokenKind::Literal => false,
        }
    }

    fn unexpected(&self) -> ParseError {
        let found = match &self.kind {
            TokenKind::Ident(word) => format!("'{word}'"),
            TokenKind::Literal => "literal".to_string(),
            TokenKind::Punct(p) => format!("'{p}'"),
        };
        ParseError::UnexpectedToken {
            found,
            line: self.line,
        }
    }
}

/// Check if the statement goes on after `tokens[pos]`.
///
/// A word after `.` is a path segment, as in `import future.keywords.in`.
fn continues(tokens: &[Token], pos: usize) -> bool {
    match &tokens[pos].kind {
        TokenKind::Ident(_) if pos > 0 && tokens[pos - 1].is_punct(".") => false,
        TokenKind::Ident(word) => CONTINUATIONS.contains(&word.as_str()),
        TokenKind::Punct(p) => CONTINUATIONS.contains(p),
        TokenKind::Literal => false,
    }
}

/// Read the package clause, returning the path and the tokens after it.
fn read_package(tokens: &[Token]) -> Result<(String, &[Token]), ParseError> {
    let line = match tokens.first() {
        Some(token) if token.is_word("package") => token.line,
        _ => return Err(ParseError::MissingPackage),
    };

    let mut segments = Vec::new();
    let mut pos = 1;
    loop {
        match tokens.get(pos) {
            Some(Token {
                kind: TokenKind::Ident(segment),
                line_start: false,
                ..
            }) => segments.push(segment.as_str()),
            _ => return Err(ParseError::InvalidPackagePath { line }),
        }
        pos += 1;
        match tokens.get(pos) {
            Some(token) if token.is_punct(".") => pos += 1,
            _ => break,
        }
    }

    Ok((segments.join("."), &tokens[pos..]))
}

/// Split top-level tokens into statements.
///
/// A statement ends before a line starting at depth 0, unless the statement
/// so far ends in an operator or the line starts with `else`.
fn statements(tokens: &[Token]) -> Vec<&[Token]> {
    let mut statements = Vec::new();
    let mut start = 0;
    for end in 1..=tokens.len() {
        let ends = match tokens.get(end) {
            None => true,
            Some(next) => {
                next.depth == 0
                    && next.line_start
                    && !next.is_word("else")
                    && !continues(tokens, end - 1)
            }
        };
        if ends {
            statements.push(&tokens[start..end]);
            start = end;
        }
    }
    statements
}

/// Check a statement's shape, returning the rule it defines, if any.
fn read_statement(statement: &[Token]) -> Result<Option<&str>, ParseError> {
    let Some(head) = statement.first() else {
        return Ok(None);
    };
    if !head.line_start {
        return Err(head.unexpected());
    }

    for pair in statement.windows(2) {
        if pair[0].is_operator() && !pair[1].starts_term() {
            return Err(pair[1].unexpected());
        }
    }
    if let Some(stray) = statement
        .iter()
        .find(|token| token.depth == 0 && token.is_punct(";"))
    {
        return Err(stray.unexpected());
    }
    let last = statement.len() - 1;
    if continues(statement, last) {
        return Err(ParseError::UnexpectedEnd {
            line: statement[last].line,
        });
    }

    let next = statement.get(1);
    match &head.kind {
        TokenKind::Ident(word) if word == "import" => match next {
            Some(token) if matches!(token.kind, TokenKind::Ident(_)) => Ok(None),
            Some(token) => Err(token.unexpected()),
            None => Err(ParseError::UnexpectedEnd { line: head.line }),
        },
        TokenKind::Ident(word) if word == "default" => {
            let name = match next.map(|token| &token.kind) {
                Some(TokenKind::Ident(name)) if !KEYWORDS.contains(&name.as_str()) => name,
                _ => return Err(next.unwrap_or(head).unexpected()),
            };
            match statement.get(2) {
                Some(token) if token.is_punct("=") || token.is_punct(":=") => {
                    Ok(Some(name.as_str()))
                }
                Some(token) => Err(token.unexpected()),
                None => Err(ParseError::UnexpectedEnd { line: head.line }),
            }
        }
        TokenKind::Ident(name) if !KEYWORDS.contains(&name.as_str()) => match next {
            Some(token) if token.opens_rule() => Ok(Some(name.as_str())),
            Some(token) => Err(token.unexpected()),
            None => Err(ParseError::UnexpectedEnd { line: head.line }),
        },
        _ => Err(head.unexpected()),
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut line_start = true;
    let mut open: Vec<(char, usize)> = Vec::new();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            line_start = true;
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        if c == '#' {
            while chars.next_if(|&next| next != '\n').is_some() {}
            continue;
        }

        let token_line = line;
        let depth = open.len();
        let kind = match c {
            '"' => {
                skip_string(&mut chars, token_line)?;
                TokenKind::Literal
            }
            '`' => {
                skip_raw_string(&mut chars, &mut line, token_line)?;
                TokenKind::Literal
            }
            '(' | '[' | '{' => {
                open.push((c, token_line));
                TokenKind::Punct(single_punct(c))
            }
            ')' | ']' | '}' => match open.pop() {
                Some((opened, _)) if closes(opened, c) => TokenKind::Punct(single_punct(c)),
                _ => {
                    return Err(ParseError::UnexpectedBracket {
                        found: c,
                        line: token_line,
                    })
                }
            },
            ':' | '=' | '!' | '<' | '>' => {
                let op = match (c, chars.next_if_eq(&'=').is_some()) {
                    (':', true) => ":=",
                    (':', false) => ":",
                    ('=', true) => "==",
                    ('=', false) => "=",
                    ('!', true) => "!=",
                    ('<', true) => "<=",
                    ('<', false) => "<",
                    ('>', true) => ">=",
                    ('>', false) => ">",
                    _ => {
                        return Err(ParseError::UnexpectedCharacter {
                            found: c,
                            line: token_line,
                        })
                    }
                };
                TokenKind::Punct(op)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::from(c);
                while let Some(next) = chars.next_if(|n| n.is_ascii_alphanumeric() || *n == '_') {
                    ident.push(next);
                }
                TokenKind::Ident(ident)
            }
            c if c.is_ascii_digit() => {
                while chars
                    .next_if(|n| n.is_ascii_alphanumeric() || *n == '.')
                    .is_some()
                {}
                TokenKind::Literal
            }
            '.' | ',' | ';' | '+' | '-' | '*' | '/' | '%' | '&' | '|' => {
                TokenKind::Punct(single_punct(c))
            }
            other => {
                return Err(ParseError::UnexpectedCharacter {
                    found: other,
                    line: token_line,
                })
            }
        };

        tokens.push(Token {
            kind,
            line: token_line,
            depth,
            line_start,
        });
        line_start = false;
    }

    if let Some((open, line)) = open.pop() {
        return Err(ParseError::UnclosedBracket { open, line });
    }
    Ok(tokens)
}

fn skip_string(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<(), ParseError> {
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return Ok(()),
            '\n' => break,
            _ => {}
        }
    }
    Err(ParseError::UnterminatedString { line })
}

fn skip_raw_string(
    chars: &mut Peekable<Chars<'_>>,
    line: &mut usize,
    start: usize,
) -> Result<(), ParseError> {
    for c in chars.by_ref() {
        match c {
            '`' => return Ok(()),
            '\n' => *line += 1,
            _ => {}
        }
    }
    Err(ParseError::UnterminatedString { line: start })
}

fn single_punct(c: char) -> &'static str {
    match c {
        '(' => "(",
        ')' => ")",
        '[' => "[",
        ']' => "]",
        '{' => "{",
        '}' => "}",
        '.' => ".",
        ',' => ",",
        ';' => ";",
        '+' => "+",
        '-' => "-",
        '*' => "*",
        '/' => "/",
        '%' => "%",
        '&' => "&",
        _ => "|",
    }
}

fn closes(open: char, close: char) -> bool {
    matches!((open, close), ('(', ')') | ('[', ']') | ('{', '}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_POLICY: &str = r#"
        package artifacthub.authz

        import future.keywords.in

        # Decision
        default allow = false

        allow {
            allowed_actions[_] == input.action
        }

        allowed_actions[action] {
            action := "all"
            data.roles.owner.users[_] == input.user
        }
    "#;

    #[test]
    fn test_parse_full_policy() {
        let module = RegoModule::parse(FULL_POLICY).unwrap();

        assert_eq!(module.package(), AUTHZ_PACKAGE);
        assert!(module.declares(AUTHZ_PACKAGE, ALLOW_RULE));
        assert!(module.declares(AUTHZ_PACKAGE, ALLOWED_ACTIONS_RULE));
        assert_eq!(module.rules().collect::<Vec<_>>(), vec!["allow", "allowed_actions"]);
    }

    #[test]
    fn test_body_identifiers_are_not_rules() {
        let module = RegoModule::parse(
            "package p\n\nallow {\n    user_roles[_] == \"owner\"\n    some role\n}\n",
        )
        .unwrap();

        assert!(module.has_rule("allow"));
        assert!(!module.has_rule("user_roles"));
        assert!(!module.has_rule("role"));
    }

    #[test]
    fn test_package_only() {
        let module = RegoModule::parse("package artifacthub.authz").unwrap();
        assert_eq!(module.package(), "artifacthub.authz");
        assert_eq!(module.rules().count(), 0);
    }

    #[test]
    fn test_wrong_package_does_not_declare() {
        let module =
            RegoModule::parse("package artifacthub.invalid\nallow { true }\n").unwrap();
        assert!(module.has_rule(ALLOW_RULE));
        assert!(!module.declares(AUTHZ_PACKAGE, ALLOW_RULE));
    }

    #[test]
    fn test_comments_and_strings_are_skipped() {
        let module = RegoModule::parse(
            "# leading comment\npackage a.b # trailing\nmsg := \"not { a rule\"\nraw := `multi\nline }`\n",
        )
        .unwrap();
        assert_eq!(module.package(), "a.b");
        assert!(module.has_rule("msg"));
        assert!(module.has_rule("raw"));
        assert!(!module.has_rule("line"));
    }

    #[test]
    fn test_missing_package() {
        assert_eq!(RegoModule::parse("invalid"), Err(ParseError::MissingPackage));
        assert_eq!(RegoModule::parse(""), Err(ParseError::MissingPackage));
        assert_eq!(
            RegoModule::parse("package"),
            Err(ParseError::InvalidPackagePath { line: 1 })
        );
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert_eq!(
            RegoModule::parse("package p\nallow { x ]"),
            Err(ParseError::UnexpectedBracket { found: ']', line: 2 })
        );
        assert_eq!(
            RegoModule::parse("package p\nallow {\n"),
            Err(ParseError::UnclosedBracket { open: '{', line: 2 })
        );
    }

    #[test]
    fn test_continuation_lines_are_not_rules() {
        let module = RegoModule::parse(
            "package artifacthub.authz\nis_owner := input.user ==\n    allow\nallowed_actions[a] { a := \"all\" }\n",
        )
        .unwrap();

        assert!(module.has_rule("is_owner"));
        assert!(module.has_rule(ALLOWED_ACTIONS_RULE));
        assert!(!module.has_rule(ALLOW_RULE));
    }

    #[test]
    fn test_keyword_import_ends_statement() {
        let module = RegoModule::parse(
            "package p\nimport future.keywords.in\ndefault allow = false\n",
        )
        .unwrap();
        assert!(module.has_rule("allow"));
    }

    #[test]
    fn test_else_continues_rule() {
        let module = RegoModule::parse(
            "package p\nlevel = \"high\" { input.admin }\nelse = \"low\"\ndefault allow := false\n",
        )
        .unwrap();

        assert_eq!(module.rules().collect::<Vec<_>>(), vec!["allow", "level"]);
    }

    #[test]
    fn test_modern_rule_heads() {
        let module = RegoModule::parse(
            "package p\nimport rego.v1\nallow if input.admin\nallowed_actions contains \"all\" if { input.admin }\nf(x) := x + 1\n",
        )
        .unwrap();

        assert!(module.has_rule("allow"));
        assert!(module.has_rule("allowed_actions"));
        assert!(module.has_rule("f"));
        assert!(!module.has_rule("rego"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(
            RegoModule::parse("package artifacthub.authz\nallow = = = ;;\n"),
            Err(ParseError::UnexpectedToken {
                found: "'='".into(),
                line: 2
            })
        );
        assert_eq!(
            RegoModule::parse("package artifacthub.authz\nallowed_actions !!! @@ ~~\n"),
            Err(ParseError::UnexpectedCharacter { found: '!', line: 2 })
        );
        assert_eq!(
            RegoModule::parse("package p\nallowed_actions foo\n"),
            Err(ParseError::UnexpectedToken {
                found: "'foo'".into(),
                line: 2
            })
        );
        assert_eq!(
            RegoModule::parse("package p\nallow\n"),
            Err(ParseError::UnexpectedEnd { line: 2 })
        );
        assert_eq!(
            RegoModule::parse("package p\nallow :=\n"),
            Err(ParseError::UnexpectedEnd { line: 2 })
        );
        assert_eq!(
            RegoModule::parse("package p\n\"allow\" = true\n"),
            Err(ParseError::UnexpectedToken {
                found: "literal".into(),
                line: 2
            })
        );
        assert_eq!(
            RegoModule::parse("package p allow { true }"),
            Err(ParseError::UnexpectedToken {
                found: "'allow'".into(),
                line: 1
            })
        );
        assert_eq!(
            RegoModule::parse("package\np\n"),
            Err(ParseError::InvalidPackagePath { line: 1 })
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            RegoModule::parse("package p\nx := \"abc\n"),
            Err(ParseError::UnterminatedString { line: 2 })
        );
    }
}
