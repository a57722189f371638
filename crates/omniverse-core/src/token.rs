//! Collision-safe byte tokenization.
//!
//! A buffer starts out as one literal span. Each `tokenize` pass cuts the
//! remaining literal spans on one pattern, turning every occurrence into an
//! atomic match span that later passes can no longer touch. Applying the
//! passes in descending pattern length is what makes substring collisions
//! deterministic: the longer pattern claims its bytes first, so a shorter
//! pattern that happens to be a substring of it has nothing left to match.

use memchr::memmem;

/// One span of a tokenized buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bytes no pattern has claimed; later passes may still split these.
    Literal(Vec<u8>),
    /// Bytes equal to `from`, replaced by `to` on mutation. Atomic.
    Match { from: Vec<u8>, to: Vec<u8> },
}

impl Token {
    /// The span's original bytes.
    pub fn raw(&self) -> &[u8] {
        match self {
            Self::Literal(bytes) => bytes,
            Self::Match { from, .. } => from,
        }
    }

    /// The span's replacement form.
    pub fn mutated(&self) -> &[u8] {
        match self {
            Self::Literal(bytes) => bytes,
            Self::Match { to, .. } => to,
        }
    }
}

/// An ordered sequence of spans whose raw concatenation is exactly the
/// original input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self {
            tokens: vec![Token::Literal(raw.into())],
        }
    }

    /// Split every literal span on every non-overlapping occurrence of
    /// `from`, leftmost-first, marking each occurrence as a match span that
    /// mutates to `to`. Spans already claimed by an earlier pass are left
    /// untouched. An empty pattern never matches.
    pub fn tokenize(&mut self, from: &[u8], to: &[u8]) {
        if from.is_empty() {
            return;
        }

        let finder = memmem::Finder::new(from);
        let mut next = Vec::with_capacity(self.tokens.len());
        for token in self.tokens.drain(..) {
            let Token::Literal(bytes) = token else {
                next.push(token);
                continue;
            };

            let hits: Vec<usize> = finder.find_iter(&bytes).collect();
            if hits.is_empty() {
                next.push(Token::Literal(bytes));
                continue;
            }

            let mut cursor = 0;
            for hit in hits {
                if hit > cursor {
                    next.push(Token::Literal(bytes[cursor..hit].to_vec()));
                }
                next.push(Token::Match {
                    from: from.to_vec(),
                    to: to.to_vec(),
                });
                cursor = hit + from.len();
            }
            if cursor < bytes.len() {
                next.push(Token::Literal(bytes[cursor..].to_vec()));
            }
        }
        self.tokens = next;
    }

    /// The original input, reassembled. Equal to the constructor argument for
    /// any sequence of `tokenize` calls.
    pub fn raw(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for token in &self.tokens {
            out.extend_from_slice(token.raw());
        }
        out
    }

    /// The rewritten buffer: literal spans pass through, match spans emit
    /// their replacement.
    pub fn mutate(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for token in &self.tokens {
            out.extend_from_slice(token.mutated());
        }
        out
    }

    /// Whether `needle` occurs inside any literal span. Match spans are
    /// excluded on purpose: this asks about text the substitution did NOT
    /// produce.
    pub fn contains(&self, needle: &[u8]) -> bool {
        self.tokens.iter().any(|token| match token {
            Token::Literal(bytes) => memmem::find(bytes, needle).is_some(),
            Token::Match { .. } => false,
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(stream: &TokenStream) -> Vec<&'static str> {
        stream
            .tokens()
            .iter()
            .map(|t| match t {
                Token::Literal(_) => "literal",
                Token::Match { .. } => "match",
            })
            .collect()
    }

    #[test]
    fn no_match_keeps_single_literal() {
        let mut stream = TokenStream::new(&b"hello world"[..]);
        stream.tokenize(b"xyz", b"abc");
        assert_eq!(kinds(&stream), vec!["literal"]);
        assert_eq!(stream.mutate(), b"hello world");
    }

    #[test]
    fn splits_at_start_middle_and_end() {
        let mut stream = TokenStream::new(&b"x-middle-x"[..]);
        stream.tokenize(b"x", b"y");
        assert_eq!(kinds(&stream), vec!["match", "literal", "match"]);
        assert_eq!(stream.mutate(), b"y-middle-y");

        let mut stream = TokenStream::new(&b"a-x-b"[..]);
        stream.tokenize(b"x", b"y");
        assert_eq!(kinds(&stream), vec!["literal", "match", "literal"]);
        assert_eq!(stream.mutate(), b"a-y-b");
    }

    #[test]
    fn full_match_becomes_single_match_span() {
        let mut stream = TokenStream::new(&b"x"[..]);
        stream.tokenize(b"x", b"replacement");
        assert_eq!(kinds(&stream), vec!["match"]);
        assert_eq!(stream.mutate(), b"replacement");
    }

    #[test]
    fn repeated_occurrences_are_all_claimed() {
        let mut stream = TokenStream::new(&b"xxax"[..]);
        stream.tokenize(b"x", b"y");
        assert_eq!(kinds(&stream), vec!["match", "match", "literal", "match"]);
        assert_eq!(stream.mutate(), b"yyay");
    }

    #[test]
    fn longest_pattern_first_wins_over_substring() {
        // "xy" must become "22", never "1y" from the shorter "x" pattern.
        let mut stream = TokenStream::new(&b"xy"[..]);
        stream.tokenize(b"xy", b"22");
        stream.tokenize(b"x", b"1");
        assert_eq!(stream.mutate(), b"22");
    }

    #[test]
    fn match_spans_are_atomic() {
        let mut stream = TokenStream::new(&b"api.example.com"[..]);
        stream.tokenize(b"api.example.com", b"next-api.example-int.com");
        // The shorter pattern is a substring of the already-claimed span and
        // must not re-split it.
        stream.tokenize(b"example.com", b"example-int.com");
        assert_eq!(stream.mutate(), b"next-api.example-int.com");
        assert_eq!(stream.raw(), b"api.example.com");
    }

    #[test]
    fn raw_reassembles_input_exactly() {
        let input = b"one x two xy three".to_vec();
        let mut stream = TokenStream::new(input.clone());
        stream.tokenize(b"xy", b"22");
        stream.tokenize(b"x", b"1");
        stream.tokenize(b"three", b"3");
        assert_eq!(stream.raw(), input);
    }

    #[test]
    fn empty_pattern_never_matches() {
        let mut stream = TokenStream::new(&b"abc"[..]);
        stream.tokenize(b"", b"nope");
        assert_eq!(kinds(&stream), vec!["literal"]);
        assert_eq!(stream.mutate(), b"abc");
    }

    #[test]
    fn contains_only_sees_literal_spans() {
        let mut stream = TokenStream::new(&b"a needle b"[..]);
        assert!(stream.contains(b"needle"));
        stream.tokenize(b"needle", b"thread");
        assert!(!stream.contains(b"needle"));
        assert!(stream.contains(b"a "));
    }
}
