use logos::Logos;
use std::ops::Range;

/// Raw token classes for tag-delimited content
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A complete `<...>` delimiter
    #[regex(r"<[^<>]*>")]
    Tag,

    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    #[regex(r"[^<> \t\r\n\x0C]+")]
    Text,

    /// A `<` or `>` that does not form a complete tag
    #[regex(r"[<>]")]
    Stray,
}

/// A token with its char span in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Range<usize>,
}

/// What a complete `<...>` delimiter opens or closes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Open(String),
    Close(String),
    SelfClosing(String),
    /// `<!-- ... -->`, `<!DOCTYPE ...>`, `<? ... ?>`
    Comment,
}

/// Elements that never have a closing tag
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Classify the text of a complete tag
pub fn classify_tag(tag: &str) -> TagKind {
    let inner = tag
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(tag);

    if inner.starts_with('!') || inner.starts_with('?') {
        return TagKind::Comment;
    }

    if let Some(rest) = inner.strip_prefix('/') {
        return TagKind::Close(tag_name(rest));
    }

    let name = tag_name(inner);
    if inner.ends_with('/') || VOID_TAGS.contains(&name.as_str()) {
        TagKind::SelfClosing(name)
    } else {
        TagKind::Open(name)
    }
}

fn tag_name(rest: &str) -> String {
    rest.trim_start()
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Tokenize a source string
///
/// Tokens are contiguous and cover every char of the source. Spans are char
/// offsets.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut char_offset = 0;

    for (result, bytes) in TokenKind::lexer(source).spanned() {
        let text = &source[bytes];
        let len = text.chars().count();
        let kind = result.unwrap_or(TokenKind::Text);

        tokens.push(Token {
            kind,
            text,
            span: char_offset..char_offset + len,
        });
        char_offset += len;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("<p>Hello world</p>"),
            vec![
                TokenKind::Tag,
                TokenKind::Text,
                TokenKind::Whitespace,
                TokenKind::Text,
                TokenKind::Tag,
            ]
        );
    }

    #[test]
    fn test_spans_are_char_offsets() {
        let tokens = tokenize("<b>日本</b>");
        assert_eq!(tokens[1].text, "日本");
        assert_eq!(tokens[1].span, 3..5);
        assert_eq!(tokens[2].span, 5..9);
    }

    #[test]
    fn test_stray_angle_brackets() {
        assert_eq!(
            kinds("a < b"),
            vec![
                TokenKind::Text,
                TokenKind::Whitespace,
                TokenKind::Stray,
                TokenKind::Whitespace,
                TokenKind::Text,
            ]
        );
        assert_eq!(kinds("<p"), vec![TokenKind::Stray, TokenKind::Text]);
    }

    #[test]
    fn test_classify_tags() {
        assert_eq!(classify_tag("<p class=\"a\">"), TagKind::Open("p".to_string()));
        assert_eq!(classify_tag("</P>"), TagKind::Close("p".to_string()));
        assert_eq!(classify_tag("<img src=\"x\"/>"), TagKind::SelfClosing("img".to_string()));
        assert_eq!(classify_tag("<br>"), TagKind::SelfClosing("br".to_string()));
        assert_eq!(classify_tag("<!-- note -->"), TagKind::Comment);
    }

    #[test]
    fn test_tokens_cover_source() {
        let source = "<div>\n  <span>x</span> y\n</div>";
        let tokens = tokenize(source);
        let rebuilt: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, source);
    }
}
