//! Edge case and property tests for quint-lex.

#[cfg(test)]
mod tests {
    use quint_util::DecodeErrorKind;

    use crate::lexer::tokenize;
    use crate::token::{Token, TokenKind};

    fn lex_all(source: &str) -> Vec<Token> {
        tokenize(source).unwrap()
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_whitespace_only() {
        assert!(lex_all(" \t\r\n\u{000B}\u{000C}\u{2028}\u{2029}").is_empty());
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10_000);
        let tokens = lex_all(&name);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span.len(), 10_000);
    }

    #[test]
    fn test_edge_deeply_nested_arrays() {
        let depth = 500;
        let source = "[".repeat(depth) + &"]".repeat(depth);
        let tokens = lex_all(&source);
        assert_eq!(tokens.len(), depth * 2);
    }

    #[test]
    fn test_edge_number_boundaries() {
        // One token each, ending exactly at the buffer end.
        for source in ["0", "0.", ".0", "0x0", "-0", "+Infinity", "-NaN", "1e+0"] {
            let tokens = lex_all(source);
            assert_eq!(tokens.len(), 1, "{source}");
            assert_eq!(tokens[0].kind, TokenKind::Number, "{source}");
            assert_eq!(tokens[0].span.end, source.len(), "{source}");
        }
    }

    #[test]
    fn test_edge_adjacent_strings_need_separator() {
        // Two strings back to back lex fine; the decoder rejects them.
        let tokens = lex_all("'a''b'");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].span, quint_util::Span::new(1, 2));
        assert_eq!(tokens[1].span, quint_util::Span::new(4, 5));
    }

    #[test]
    fn test_edge_crlf_line_comment() {
        let tokens = lex_all("// c\r\n7");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Number);
    }

    #[test]
    fn test_edge_error_offsets_are_line_aware() {
        let err = tokenize("{\n  bad!: 1\n}").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidIdentifierChar('!'));
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 6);
    }

    // ==================== PROPERTY-BASED TESTS ====================

    #[test]
    fn prop_digit_runs_lex_as_one_number() {
        use proptest::prelude::*;

        proptest!(|(input in "[1-9][0-9]{0,18}")| {
            let tokens = tokenize(&input).unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(tokens[0].kind, TokenKind::Number);
            prop_assert_eq!(tokens[0].span.len(), input.len());
        });
    }

    #[test]
    fn prop_dollar_identifiers_lex_as_one_token() {
        use proptest::prelude::*;

        proptest!(|(input in "\\$[a-zA-Z0-9_$]{0,60}")| {
            let tokens = tokenize(&input).unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(tokens[0].kind, TokenKind::Identifier);
        });
    }

    #[test]
    fn prop_quoted_text_spans_exclude_delimiters() {
        use proptest::prelude::*;

        proptest!(|(content in "[a-zA-Z0-9 .,:{}]{0,80}")| {
            let source = format!("\"{content}\"");
            let tokens = tokenize(&source).unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(tokens[0].kind, TokenKind::Str);
            prop_assert_eq!(tokens[0].text(&source), content.as_str());
        });
    }

    #[test]
    fn prop_spans_half_open_and_strictly_increasing() {
        use proptest::prelude::*;

        proptest!(|(numbers in proptest::collection::vec(0u32..=9_999_999, 1..40))| {
            let items: Vec<String> = numbers.iter().map(u32::to_string).collect();
            let source = format!("[{}]", items.join(", "));
            let tokens = tokenize(&source).unwrap();

            // brackets + numbers + separating commas
            prop_assert_eq!(tokens.len(), 2 + numbers.len() + (numbers.len() - 1));

            let mut previous_end = 0;
            for token in &tokens {
                prop_assert!(token.span.start >= previous_end);
                prop_assert!(token.span.start < token.span.end);
                prop_assert!(token.span.end <= source.len());
                previous_end = token.span.end;
            }
        });
    }
}
