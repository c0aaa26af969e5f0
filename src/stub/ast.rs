//! The stub engine's source model: a flat node arena plus interned types,
//! parsed comments, and diagnostics, all serializable for unit save/load.
//!
//! The recognizer is deliberately shallow. It picks out the declaration
//! shapes the handle layer's tests exercise (variables, functions, structs,
//! typedefs) and reports everything else as a warning diagnostic; it is not
//! a C frontend.

use serde::{Deserialize, Serialize};

use super::lexer::{self, Lexeme, Tok};

pub(crate) mod kind {
    pub const STRUCT_DECL: u32 = 2;
    pub const FIELD_DECL: u32 = 6;
    pub const FUNCTION_DECL: u32 = 8;
    pub const VAR_DECL: u32 = 9;
    pub const PARM_DECL: u32 = 10;
    pub const TYPEDEF_DECL: u32 = 20;
    pub const INTEGER_LITERAL: u32 = 106;
    pub const FLOATING_LITERAL: u32 = 107;
    pub const STRING_LITERAL: u32 = 109;
    pub const CHARACTER_LITERAL: u32 = 110;
    pub const TRANSLATION_UNIT: u32 = 300;
}

pub(crate) mod type_kind {
    pub const VOID: u32 = 2;
    pub const CHAR_S: u32 = 13;
    pub const SHORT: u32 = 16;
    pub const INT: u32 = 17;
    pub const LONG: u32 = 18;
    pub const FLOAT: u32 = 21;
    pub const DOUBLE: u32 = 22;
    pub const POINTER: u32 = 101;
    pub const RECORD: u32 = 105;
    pub const TYPEDEF: u32 = 107;
    pub const FUNCTION_PROTO: u32 = 111;
}

pub(crate) mod comment_kind {
    pub const TEXT: u32 = 1;
    pub const PARAGRAPH: u32 = 5;
    pub const FULL: u32 = 12;
}

pub(crate) mod storage {
    pub const NONE: u32 = 1;
    pub const EXTERN: u32 = 2;
    pub const STATIC: u32 = 3;
}

pub(crate) const SEVERITY_WARNING: u32 = 2;

/// One AST node. Index 0 is always the translation-unit root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Node {
    pub kind: u32,
    pub spelling: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub start: usize,
    pub end: usize,
    pub ty: Option<usize>,
    pub comment: Option<usize>,
    pub storage: u32,
}

/// One interned type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TypeRecord {
    pub kind: u32,
    pub spelling: String,
    pub size: i64,
    pub align: i64,
    pub pointee: Option<usize>,
    pub result: Option<usize>,
    pub args: Vec<usize>,
    pub decl: Option<usize>,
}

impl TypeRecord {
    fn new(kind: u32, spelling: impl Into<String>, size: i64, align: i64) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            size,
            align,
            pointee: None,
            result: None,
            args: Vec::new(),
            decl: None,
        }
    }
}

/// One node of a parsed documentation comment. The `full_comment` root
/// carries the raw source text; only `text` nodes carry rendered payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentNode {
    pub kind: u32,
    pub text: String,
    pub children: Vec<usize>,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub(crate) struct DiagData {
    pub severity: u32,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
    pub children: Vec<DiagData>,
}

/// Everything the stub knows about one parsed source buffer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub(crate) struct SourceModel {
    pub nodes: Vec<Node>,
    pub types: Vec<TypeRecord>,
    pub comments: Vec<CommentNode>,
    pub diagnostics: Vec<DiagData>,
}

impl SourceModel {
    pub(crate) const ROOT: usize = 0;
}

/// Recognize the declarations in `text`.
pub(crate) fn analyze(text: &str) -> SourceModel {
    let all = lexer::lex(text);
    let comments = all.iter().filter(|l| l.tok.is_comment()).cloned().collect();
    let toks = all.into_iter().filter(|l| !l.tok.is_comment()).collect();
    let mut rec = Recognizer {
        text,
        toks,
        comments,
        pos: 0,
        model: SourceModel::default(),
    };
    rec.run();
    rec.model
}

struct Recognizer<'s> {
    text: &'s str,
    toks: Vec<Lexeme>,
    comments: Vec<Lexeme>,
    pos: usize,
    model: SourceModel,
}

impl Recognizer<'_> {
    fn run(&mut self) {
        self.model.nodes.push(Node {
            kind: kind::TRANSLATION_UNIT,
            spelling: String::new(),
            parent: None,
            children: Vec::new(),
            start: 0,
            end: self.text.len(),
            ty: None,
            comment: None,
            storage: storage::NONE,
        });
        while self.pos < self.toks.len() {
            if self.eat(";") {
                continue;
            }
            let mark = self.pos;
            if !self.declaration(SourceModel::ROOT) {
                self.unrecognized(mark);
            }
        }
    }

    // --- token helpers ---

    fn peek(&self) -> Option<&Lexeme> {
        self.toks.get(self.pos)
    }

    fn peek_text(&self) -> &str {
        self.toks.get(self.pos).map(|l| l.text.as_str()).unwrap_or("")
    }

    fn at(&self, text: &str) -> bool {
        self.peek_text() == text
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lex = self.toks.get(self.pos).cloned();
        if lex.is_some() {
            self.pos += 1;
        }
        lex
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.at(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Option<Lexeme> {
        if self.peek().is_some_and(|l| l.tok == Tok::Identifier) {
            self.bump()
        } else {
            None
        }
    }

    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.toks[self.pos - 1].end
        }
    }

    // --- model helpers ---

    fn add_node(&mut self, parent: usize, kind: u32, spelling: String, start: usize) -> usize {
        let id = self.model.nodes.len();
        self.model.nodes.push(Node {
            kind,
            spelling,
            parent: Some(parent),
            children: Vec::new(),
            start,
            end: start,
            ty: None,
            comment: None,
            storage: storage::NONE,
        });
        self.model.nodes[parent].children.push(id);
        id
    }

    fn intern(&mut self, rec: TypeRecord) -> usize {
        if let Some(i) = self
            .model
            .types
            .iter()
            .position(|t| t.kind == rec.kind && t.spelling == rec.spelling)
        {
            return i;
        }
        self.model.types.push(rec);
        self.model.types.len() - 1
    }

    fn primitive(&mut self, name: &str) -> Option<usize> {
        let (kind, size, align) = match name {
            "void" => (type_kind::VOID, -2, -2),
            "char" => (type_kind::CHAR_S, 1, 1),
            "short" => (type_kind::SHORT, 2, 2),
            "int" => (type_kind::INT, 4, 4),
            "long" => (type_kind::LONG, 8, 8),
            "float" => (type_kind::FLOAT, 4, 4),
            "double" => (type_kind::DOUBLE, 8, 8),
            _ => return None,
        };
        Some(self.intern(TypeRecord::new(kind, name, size, align)))
    }

    fn pointer_to(&mut self, inner: usize) -> usize {
        let spelling = format!("{} *", self.model.types[inner].spelling);
        let mut rec = TypeRecord::new(type_kind::POINTER, spelling, 8, 8);
        rec.pointee = Some(inner);
        self.intern(rec)
    }

    fn warn(&mut self, message: String, offset: usize) {
        let (line, column) = lexer::line_col(self.text, offset);
        self.model.diagnostics.push(DiagData {
            severity: SEVERITY_WARNING,
            message,
            line,
            column,
            offset: offset as u32,
            children: Vec::new(),
        });
    }

    // --- comments ---

    /// Doc comment immediately preceding `decl_start`, as a parsed tree.
    fn doc_for(&mut self, decl_start: usize) -> Option<usize> {
        let lex = self
            .comments
            .iter()
            .find(|c| {
                c.end <= decl_start
                    && self.text[c.end..decl_start].chars().all(char::is_whitespace)
            })?
            .clone();
        let lines = clean_comment(&lex.text);
        if lines.is_empty() {
            return None;
        }
        let mut text_ids = Vec::with_capacity(lines.len());
        for line in lines {
            text_ids.push(self.push_comment(comment_kind::TEXT, line, &lex, Vec::new()));
        }
        let para = self.push_comment(comment_kind::PARAGRAPH, String::new(), &lex, text_ids);
        Some(self.push_comment(comment_kind::FULL, lex.text.clone(), &lex, vec![para]))
    }

    fn push_comment(
        &mut self,
        kind: u32,
        text: String,
        lex: &Lexeme,
        children: Vec<usize>,
    ) -> usize {
        self.model.comments.push(CommentNode {
            kind,
            text,
            children,
            start: lex.start,
            end: lex.end,
        });
        self.model.comments.len() - 1
    }

    // --- declarations ---

    fn declaration(&mut self, parent: usize) -> bool {
        let decl_start = match self.peek() {
            Some(l) => l.start,
            None => return true,
        };
        let comment = self.doc_for(decl_start);

        let mut storage_class = storage::NONE;
        loop {
            if self.at("static") {
                storage_class = storage::STATIC;
                self.pos += 1;
            } else if self.at("extern") {
                storage_class = storage::EXTERN;
                self.pos += 1;
            } else if self.at("const") {
                self.pos += 1;
            } else {
                break;
            }
        }

        if self.at("typedef") {
            return self.typedef_decl(parent, decl_start, comment);
        }
        if self.at("struct") {
            return self.struct_or_var(parent, decl_start, comment, storage_class);
        }

        let base_name = self.peek_text().to_string();
        let Some(base) = self.primitive(&base_name) else {
            return false;
        };
        self.pos += 1;
        self.declarators(parent, base, decl_start, comment, storage_class)
    }

    fn typedef_decl(&mut self, parent: usize, start: usize, comment: Option<usize>) -> bool {
        self.pos += 1; // typedef
        let mut name = None;
        while let Some(lex) = self.peek() {
            if lex.text == ";" {
                break;
            }
            if lex.tok == Tok::Identifier {
                name = Some(lex.text.clone());
            }
            self.pos += 1;
        }
        let Some(name) = name else { return false };
        if !self.eat(";") {
            return false;
        }
        let ty = self.intern(TypeRecord::new(type_kind::TYPEDEF, name.clone(), -3, -3));
        let id = self.add_node(parent, kind::TYPEDEF_DECL, name, start);
        self.model.nodes[id].end = self.prev_end();
        self.model.nodes[id].ty = Some(ty);
        self.model.nodes[id].comment = comment;
        true
    }

    fn struct_or_var(
        &mut self,
        parent: usize,
        start: usize,
        comment: Option<usize>,
        storage_class: u32,
    ) -> bool {
        self.pos += 1; // struct
        let Some(name) = self.identifier() else {
            return false;
        };
        if self.eat("{") {
            return self.struct_decl(parent, start, comment, &name.text);
        }
        // `struct X y;` style variable
        let spelling = format!("struct {}", name.text);
        let base = self.intern(TypeRecord::new(type_kind::RECORD, spelling, -2, -2));
        self.declarators(parent, base, start, comment, storage_class)
    }

    fn struct_decl(
        &mut self,
        parent: usize,
        start: usize,
        comment: Option<usize>,
        name: &str,
    ) -> bool {
        let id = self.add_node(parent, kind::STRUCT_DECL, name.to_string(), start);
        self.model.nodes[id].comment = comment;
        while !self.at("}") {
            if self.peek().is_none() {
                return false;
            }
            let mark = self.pos;
            let field_start = self.toks[mark].start;
            let base_name = self.peek_text().to_string();
            let parsed = match self.primitive(&base_name) {
                Some(base) => {
                    self.pos += 1;
                    self.field(id, base, field_start)
                }
                None => false,
            };
            if !parsed {
                self.unrecognized(mark);
            }
        }
        self.pos += 1; // }
        if !self.eat(";") {
            return false;
        }
        let end = self.prev_end();
        self.model.nodes[id].end = end;

        let mut size = 0;
        let mut align = 1;
        let mut rec = TypeRecord::new(type_kind::RECORD, format!("struct {name}"), 0, 0);
        for child in self.model.nodes[id].children.clone() {
            if let Some(ti) = self.model.nodes[child].ty {
                let t = &self.model.types[ti];
                if t.size > 0 {
                    size += t.size;
                    align = align.max(t.align);
                }
            }
        }
        rec.size = size.max(1);
        rec.align = align;
        rec.decl = Some(id);
        let ty = self.intern(rec);
        // The interned record may predate the definition as an incomplete
        // forward reference; completing it in place keeps both in sync.
        self.model.types[ty].size = size.max(1);
        self.model.types[ty].align = align;
        self.model.types[ty].decl = Some(id);
        self.model.nodes[id].ty = Some(ty);
        true
    }

    fn field(&mut self, parent: usize, base: usize, start: usize) -> bool {
        let mut ty = base;
        while self.eat("*") {
            ty = self.pointer_to(ty);
        }
        let Some(name) = self.identifier() else {
            return false;
        };
        if !self.eat(";") {
            return false;
        }
        let id = self.add_node(parent, kind::FIELD_DECL, name.text, start);
        self.model.nodes[id].end = self.prev_end();
        self.model.nodes[id].ty = Some(ty);
        true
    }

    fn declarators(
        &mut self,
        parent: usize,
        base: usize,
        start: usize,
        comment: Option<usize>,
        storage_class: u32,
    ) -> bool {
        let mut first = true;
        loop {
            let mut ty = base;
            while self.eat("*") {
                ty = self.pointer_to(ty);
            }
            let Some(name) = self.identifier() else {
                return false;
            };
            if first && self.at("(") {
                return self.function_decl(parent, base, name.text, start, comment, storage_class);
            }
            first = false;

            let id = self.add_node(parent, kind::VAR_DECL, name.text, start);
            self.model.nodes[id].ty = Some(ty);
            self.model.nodes[id].comment = comment;
            self.model.nodes[id].storage = storage_class;

            if self.eat("=") {
                self.initializer(id);
            }
            self.model.nodes[id].end = self.prev_end();
            if self.eat(",") {
                continue;
            }
            if !self.eat(";") {
                return false;
            }
            self.model.nodes[id].end = self.prev_end();
            return true;
        }
    }

    /// A single-literal initializer becomes a literal child node; anything
    /// more complex is consumed without modelling.
    fn initializer(&mut self, var: usize) {
        let lit = self.peek().cloned();
        if let Some(lex) = lit {
            let next_ends = self
                .toks
                .get(self.pos + 1)
                .is_none_or(|l| l.text == ";" || l.text == ",");
            let lit_kind = match lex.tok {
                Tok::IntLiteral => Some(kind::INTEGER_LITERAL),
                Tok::FloatLiteral => Some(kind::FLOATING_LITERAL),
                Tok::StringLiteral => Some(kind::STRING_LITERAL),
                Tok::CharLiteral => Some(kind::CHARACTER_LITERAL),
                _ => None,
            };
            if let (Some(k), true) = (lit_kind, next_ends) {
                let id = self.add_node(var, k, lex.text.clone(), lex.start);
                self.model.nodes[id].end = lex.end;
                self.model.nodes[id].ty = self.model.nodes[var].ty;
                self.pos += 1;
                return;
            }
        }
        while let Some(lex) = self.peek() {
            if lex.text == ";" || lex.text == "," {
                break;
            }
            self.pos += 1;
        }
    }

    fn function_decl(
        &mut self,
        parent: usize,
        result: usize,
        name: String,
        start: usize,
        comment: Option<usize>,
        storage_class: u32,
    ) -> bool {
        self.pos += 1; // (
        let id = self.add_node(parent, kind::FUNCTION_DECL, name.clone(), start);
        self.model.nodes[id].comment = comment;
        self.model.nodes[id].storage = storage_class;

        let mut arg_types = Vec::new();
        if self.at("void") && self.toks.get(self.pos + 1).is_some_and(|l| l.text == ")") {
            self.pos += 1;
        } else if !self.at(")") {
            loop {
                let param_start = match self.peek() {
                    Some(l) => l.start,
                    None => return false,
                };
                let base_name = self.peek_text().to_string();
                let Some(mut ty) = self.primitive(&base_name) else {
                    return false;
                };
                self.pos += 1;
                while self.eat("*") {
                    ty = self.pointer_to(ty);
                }
                let pname = self.identifier().map(|l| l.text).unwrap_or_default();
                let pid = self.add_node(id, kind::PARM_DECL, pname, param_start);
                self.model.nodes[pid].end = self.prev_end();
                self.model.nodes[pid].ty = Some(ty);
                arg_types.push(ty);
                if !self.eat(",") {
                    break;
                }
            }
        }
        if !self.eat(")") {
            return false;
        }
        if !self.eat(";") {
            if !self.at("{") {
                return false;
            }
            let mut depth = 0usize;
            while let Some(lex) = self.bump() {
                match lex.text.as_str() {
                    "{" => depth += 1,
                    "}" => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
        self.model.nodes[id].end = self.prev_end();

        let args_spelling: Vec<&str> = arg_types
            .iter()
            .map(|t| self.model.types[*t].spelling.as_str())
            .collect();
        let spelling = format!(
            "{} ({})",
            self.model.types[result].spelling,
            args_spelling.join(", ")
        );
        let mut rec = TypeRecord::new(type_kind::FUNCTION_PROTO, spelling, -1, -1);
        rec.result = Some(result);
        rec.args = arg_types;
        let ty = self.intern(rec);
        self.model.nodes[id].ty = Some(ty);
        true
    }

    /// Skip past the unrecognized chunk (to a top-level `;` or past a
    /// balanced brace group) and report it.
    fn unrecognized(&mut self, mark: usize) {
        let near = self.toks[mark].text.clone();
        self.warn(
            format!("unrecognized declaration near '{near}'"),
            self.toks[mark].start,
        );
        self.pos = mark;
        let mut depth = 0usize;
        while let Some(lex) = self.bump() {
            match lex.text.as_str() {
                "{" => depth += 1,
                "}" => {
                    if depth == 0 {
                        break; // stray closer, consumed
                    }
                    depth -= 1;
                    if depth == 0 {
                        // trailing `;` of e.g. an aggregate definition
                        self.eat(";");
                        break;
                    }
                }
                ";" if depth == 0 => break,
                _ => {}
            }
        }
    }
}

fn clean_comment(text: &str) -> Vec<String> {
    let inner = text
        .strip_prefix("/**")
        .or_else(|| text.strip_prefix("/*"))
        .and_then(|s| s.strip_suffix("*/"))
        .unwrap_or_else(|| text.trim_start_matches('/'));
    inner
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_decl_with_literal() {
        let model = analyze("int x = 1;");
        let root = &model.nodes[SourceModel::ROOT];
        assert_eq!(root.children.len(), 1);
        let var = &model.nodes[root.children[0]];
        assert_eq!(var.kind, kind::VAR_DECL);
        assert_eq!(var.spelling, "x");
        assert_eq!(var.children.len(), 1);
        assert_eq!(model.nodes[var.children[0]].kind, kind::INTEGER_LITERAL);
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_function_with_params() {
        let model = analyze("float scale(float value, int factor);");
        let root = &model.nodes[SourceModel::ROOT];
        let f = &model.nodes[root.children[0]];
        assert_eq!(f.kind, kind::FUNCTION_DECL);
        assert_eq!(f.spelling, "scale");
        assert_eq!(f.children.len(), 2);
        assert_eq!(model.nodes[f.children[0]].kind, kind::PARM_DECL);
        assert_eq!(model.nodes[f.children[1]].spelling, "factor");
        let ty = &model.types[f.ty.unwrap()];
        assert_eq!(ty.kind, type_kind::FUNCTION_PROTO);
        assert_eq!(ty.args.len(), 2);
    }

    #[test]
    fn test_function_with_body() {
        let model = analyze("int answer(void) { return 42; }");
        let root = &model.nodes[SourceModel::ROOT];
        assert_eq!(root.children.len(), 1);
        let f = &model.nodes[root.children[0]];
        assert_eq!(f.kind, kind::FUNCTION_DECL);
        assert!(f.children.is_empty());
    }

    #[test]
    fn test_struct_fields_and_layout() {
        let model = analyze("struct point { int x; int y; };");
        let root = &model.nodes[SourceModel::ROOT];
        let s = &model.nodes[root.children[0]];
        assert_eq!(s.kind, kind::STRUCT_DECL);
        assert_eq!(s.children.len(), 2);
        let ty = &model.types[s.ty.unwrap()];
        assert_eq!(ty.kind, type_kind::RECORD);
        assert_eq!(ty.size, 8);
        assert_eq!(ty.align, 4);
    }

    #[test]
    fn test_pointer_declarator() {
        let model = analyze("char *name;");
        let root = &model.nodes[SourceModel::ROOT];
        let var = &model.nodes[root.children[0]];
        let ty = &model.types[var.ty.unwrap()];
        assert_eq!(ty.kind, type_kind::POINTER);
        let pointee = &model.types[ty.pointee.unwrap()];
        assert_eq!(pointee.kind, type_kind::CHAR_S);
    }

    #[test]
    fn test_unrecognized_chunk_warns() {
        let model = analyze("@weird stuff; int ok;");
        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].severity, SEVERITY_WARNING);
        let root = &model.nodes[SourceModel::ROOT];
        assert_eq!(root.children.len(), 1);
        assert_eq!(model.nodes[root.children[0]].spelling, "ok");
    }

    #[test]
    fn test_doc_comment_attached() {
        let model = analyze("/** The answer. */\nint answer = 42;");
        let root = &model.nodes[SourceModel::ROOT];
        let var = &model.nodes[root.children[0]];
        let full = &model.comments[var.comment.unwrap()];
        assert_eq!(full.kind, comment_kind::FULL);
        let para = &model.comments[full.children[0]];
        assert_eq!(para.kind, comment_kind::PARAGRAPH);
        let text = &model.comments[para.children[0]];
        assert_eq!(text.text, "The answer.");
    }

    #[test]
    fn test_multiple_declarators() {
        let model = analyze("int a, b, c;");
        let root = &model.nodes[SourceModel::ROOT];
        let names: Vec<_> = root
            .children
            .iter()
            .map(|c| model.nodes[*c].spelling.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_static_storage_class() {
        let model = analyze("static int counter;");
        let root = &model.nodes[SourceModel::ROOT];
        assert_eq!(model.nodes[root.children[0]].storage, storage::STATIC);
    }
}
