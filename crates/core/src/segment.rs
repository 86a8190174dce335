//! Splitting of packed reply strings into displayable segments.

/// Character the chat service uses to pack several utterances into one reply.
pub const DEFAULT_SENTINEL: char = '$';

/// Split `content` on `sentinel`, trim each piece and drop the empty ones.
pub fn split_segments(content: &str, sentinel: char) -> impl Iterator<Item = &str> + '_ {
    content.split(sentinel).map(str::trim).filter(|piece| !piece.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(content: &str) -> Vec<&str> {
        split_segments(content, DEFAULT_SENTINEL).collect()
    }

    #[test]
    fn test_no_sentinel_is_one_segment() {
        assert_eq!(segments("hello there"), vec!["hello there"]);
    }

    #[test]
    fn test_split_preserves_order() {
        assert_eq!(segments("你好$在吗"), vec!["你好", "在吗"]);
        assert_eq!(segments("one$two$three"), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_pieces_are_trimmed() {
        assert_eq!(segments("  first  $\n second\t"), vec!["first", "second"]);
    }

    #[test]
    fn test_empty_pieces_are_dropped() {
        assert_eq!(segments("$a$$ $b$"), vec!["a", "b"]);
        assert!(segments("").is_empty());
        assert!(segments("$$$").is_empty());
        assert!(segments("   ").is_empty());
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        assert_eq!(segments("line one\nline two$x"), vec!["line one\nline two", "x"]);
    }

    #[test]
    fn test_custom_sentinel() {
        let pieces: Vec<&str> = split_segments("a|b$c", '|').collect();
        assert_eq!(pieces, vec!["a", "b$c"]);
    }
}
