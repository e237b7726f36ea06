/// 文分割: `.` `!` `?` の直後に空白、その後に大文字が続く位置を境界とみなす。
/// 略語（"Mr. Smith" 等）は特別扱いしないため、誤分割が起こり得る。
pub fn segment(text: &str) -> Sentences<'_> {
    Sentences { rest: text }
}

/// 文の遅延イテレータ（元テキストへの部分スライスを返す）
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

impl Sentences<'_> {
    /// 次の境界（文末記号の直後のバイト位置, 次文の開始位置）
    fn next_boundary(&self) -> Option<(usize, usize)> {
        for (i, c) in self.rest.char_indices() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let end = i + c.len_utf8();
            let after = &self.rest[end..];
            let trimmed = after.trim_start();
            if trimmed.len() == after.len() {
                continue;
            }
            if trimmed.chars().next().is_some_and(char::is_uppercase) {
                return Some((end, self.rest.len() - trimmed.len()));
            }
        }
        None
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if self.rest.is_empty() {
                return None;
            }
            let (sentence, rest) = match self.next_boundary() {
                Some((end, next_start)) => (&self.rest[..end], &self.rest[next_start..]),
                None => (self.rest, ""),
            };
            self.rest = rest;
            let sentence = sentence.trim();
            if !sentence.is_empty() {
                return Some(sentence);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<&str> {
        segment(text).collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            collect("First one. Second one! Third one? Done"),
            vec!["First one.", "Second one!", "Third one?", "Done"]
        );
    }

    #[test]
    fn test_lowercase_continuation_not_split() {
        assert_eq!(
            collect("Version 2. then more. Next"),
            vec!["Version 2. then more.", "Next"]
        );
    }

    #[test]
    fn test_no_space_not_split() {
        assert_eq!(collect("e.g.This stays"), vec!["e.g.This stays"]);
    }

    #[test]
    fn test_abbreviation_is_split() {
        assert_eq!(collect("Ask Mr. Smith today."), vec!["Ask Mr.", "Smith today."]);
    }

    #[test]
    fn test_empty_segments_discarded() {
        assert!(collect("").is_empty());
        assert!(collect("   \n ").is_empty());
        assert_eq!(collect("  Lead. Tail.  "), vec!["Lead.", "Tail."]);
    }

    #[test]
    fn test_newline_boundary() {
        assert_eq!(collect("One.\n\nTwo."), vec!["One.", "Two."]);
    }

    #[test]
    fn test_unicode_uppercase() {
        assert_eq!(collect("Fin. Élan follows."), vec!["Fin.", "Élan follows."]);
    }

    #[test]
    fn test_roundtrip_modulo_whitespace() {
        let inputs = [
            "Alpha beta. Gamma delta!  Epsilon?   Zeta",
            "  One.   Two.\nThree four five. ",
            "no terminators at all",
            "Trailing. ",
        ];
        for input in inputs {
            let joined = segment(input).collect::<Vec<_>>().join(" ");
            let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
            assert_eq!(squash(&joined), squash(input), "roundtrip failed for {input:?}");
        }
    }
}
