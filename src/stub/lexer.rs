//! Token scanner for the stub engine's C-flavoured input.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum Tok {
    #[token("int")]
    #[token("float")]
    #[token("double")]
    #[token("char")]
    #[token("void")]
    #[token("long")]
    #[token("short")]
    #[token("unsigned")]
    #[token("signed")]
    #[token("struct")]
    #[token("union")]
    #[token("enum")]
    #[token("typedef")]
    #[token("const")]
    #[token("static")]
    #[token("extern")]
    #[token("return")]
    #[token("if")]
    #[token("else")]
    #[token("while")]
    #[token("for")]
    #[token("sizeof")]
    Keyword,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 2)]
    Identifier,

    #[regex(r"[0-9]+\.[0-9]+")]
    FloatLiteral,

    #[regex(r"[0-9]+")]
    IntLiteral,

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,

    #[regex(r"'([^'\\]|\\.)'")]
    CharLiteral,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    #[regex(r"[{}()\[\];,=+\-*/<>!&|%^~.?:]")]
    Punct,
}

impl Tok {
    /// Code in the `token_kind` vocabulary.
    pub(crate) fn kind_code(self) -> u32 {
        match self {
            Tok::Punct => 0,
            Tok::Keyword => 1,
            Tok::Identifier => 2,
            Tok::IntLiteral | Tok::FloatLiteral | Tok::StringLiteral | Tok::CharLiteral => 3,
            Tok::LineComment | Tok::BlockComment => 4,
        }
    }

    pub(crate) fn is_comment(self) -> bool {
        matches!(self, Tok::LineComment | Tok::BlockComment)
    }
}

/// One scanned token with its byte span.
#[derive(Debug, Clone)]
pub(crate) struct Lexeme {
    pub tok: Tok,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Scan `text`, dropping bytes the scanner cannot classify.
pub(crate) fn lex(text: &str) -> Vec<Lexeme> {
    let mut lexer = Tok::lexer(text);
    let mut out = Vec::new();
    while let Some(result) = lexer.next() {
        if let Ok(tok) = result {
            let span = lexer.span();
            out.push(Lexeme {
                tok,
                text: lexer.slice().to_string(),
                start: span.start,
                end: span.end,
            });
        }
    }
    out
}

/// 1-based line and column of a byte offset.
pub(crate) fn line_col(text: &str, offset: usize) -> (u32, u32) {
    let clamped = offset.min(text.len());
    let mut line = 1;
    let mut col = 1;
    for b in text.as_bytes()[..clamped].iter() {
        if *b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_declaration() {
        let toks = lex("int x = 1;");
        let kinds: Vec<_> = toks.iter().map(|l| l.tok).collect();
        assert_eq!(
            kinds,
            vec![
                Tok::Keyword,
                Tok::Identifier,
                Tok::Punct,
                Tok::IntLiteral,
                Tok::Punct
            ]
        );
        assert_eq!(toks[1].text, "x");
        assert_eq!(toks[1].start, 4);
    }

    #[test]
    fn test_keywords_beat_identifiers() {
        let toks = lex("interior int");
        assert_eq!(toks[0].tok, Tok::Identifier);
        assert_eq!(toks[1].tok, Tok::Keyword);
    }

    #[test]
    fn test_comments_scanned_whole() {
        let toks = lex("/** doc */ int x;");
        assert_eq!(toks[0].tok, Tok::BlockComment);
        assert!(toks[0].text.contains("doc"));
    }

    #[test]
    fn test_line_col() {
        let text = "int a;\nint b;";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 7), (2, 1));
        assert_eq!(line_col(text, 11), (2, 5));
    }
}
