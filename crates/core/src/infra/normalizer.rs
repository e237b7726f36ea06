use std::sync::OnceLock;

use regex::Regex;

/// 推論ブロック: <think>...</think> / <thinking>...</thinking>
fn re_reasoning_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<think>.*?</think>|<thinking>.*?</thinking>").unwrap()
    })
}

/// 句読点直前の水平空白
fn re_space_before_punct() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+([,.!?;:])").unwrap())
}

fn re_multi_period() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.{2,}").unwrap())
}

fn re_multi_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").unwrap())
}

fn re_multi_newline() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// 先頭の前置き: "Here is the rewritten version:" など。コロンか改行までを除去。
fn re_preamble() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:here\s+is|here['’]s|below\s+is|this\s+is|the\s+following\s+is)\b[^:\n]*(?::[ \t]*\n*|\n+)",
        )
        .unwrap()
    })
}

/// LLM出力の整形ノイズ除去。全関数は純粋で失敗しない。
pub struct Normalizer;

impl Normalizer {
    /// 全ルールを適用する。ルール順は冪等性を保つように並べている。
    pub fn normalize(text: &str) -> String {
        let s = Self::strip_reasoning_blocks(text);
        let s = Self::strip_space_before_punctuation(&s);
        let s = Self::collapse_periods(&s);
        let s = Self::collapse_spaces(&s);
        let s = Self::collapse_newlines(&s);
        let s = Self::strip_preamble(&s);
        s.trim().to_string()
    }

    /// 対になった推論ブロックをマーカーごと除去。
    /// 除去で前後が繋がり新たな対ができることがあるので、変化が無くなるまで繰り返す。
    pub fn strip_reasoning_blocks(text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = re_reasoning_block().replace_all(&current, "");
            if next.len() == current.len() {
                return current;
            }
            current = next.into_owned();
        }
    }

    /// `, . ! ? ; :` 直前の空白を除去
    pub fn strip_space_before_punctuation(text: &str) -> String {
        re_space_before_punct().replace_all(text, "$1").into_owned()
    }

    /// 連続ピリオド → 1つ
    pub fn collapse_periods(text: &str) -> String {
        re_multi_period().replace_all(text, ".").into_owned()
    }

    /// 連続空白 → 1つ（改行は保持）
    pub fn collapse_spaces(text: &str) -> String {
        re_multi_space().replace_all(text, " ").into_owned()
    }

    /// 3つ以上の改行 → 2つ
    pub fn collapse_newlines(text: &str) -> String {
        re_multi_newline().replace_all(text, "\n\n").into_owned()
    }

    /// 先頭の前置き節を除去。除去後に再び前置きが現れた場合も続けて除去する。
    pub fn strip_preamble(text: &str) -> String {
        let mut current = text;
        while let Some(m) = re_preamble().find(current) {
            if m.end() == 0 {
                break;
            }
            current = &current[m.end()..];
        }
        current.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_spaces_scenario() {
        assert_eq!(
            Normalizer::normalize("This is important.    It is a test.  "),
            "This is important. It is a test."
        );
    }

    #[test]
    fn test_collapse_periods() {
        assert_eq!(Normalizer::normalize("Wait... what.."), "Wait. what.");
    }

    #[test]
    fn test_space_before_punctuation() {
        assert_eq!(
            Normalizer::normalize("Yes , it works ! Right ? Fine ; ok : done ."),
            "Yes, it works! Right? Fine; ok: done."
        );
    }

    #[test]
    fn test_space_before_period_then_collapse() {
        assert_eq!(Normalizer::normalize("End . . and more"), "End. and more");
    }

    #[test]
    fn test_newlines() {
        assert_eq!(
            Normalizer::normalize("para one\n\n\n\npara two\nline"),
            "para one\n\npara two\nline"
        );
    }

    #[test]
    fn test_preamble_with_colon() {
        assert_eq!(
            Normalizer::normalize("Here is the rewritten version:\n\nThe actual text."),
            "The actual text."
        );
        assert_eq!(
            Normalizer::normalize("here's your essay: It begins here."),
            "It begins here."
        );
        assert_eq!(
            Normalizer::normalize("The following is the revised email:\nHi Sam,"),
            "Hi Sam,"
        );
    }

    #[test]
    fn test_preamble_with_line_break() {
        assert_eq!(
            Normalizer::normalize("Below is the polished draft\nFirst line."),
            "First line."
        );
    }

    #[test]
    fn test_no_preamble_unchanged() {
        assert_eq!(
            Normalizer::normalize("Thistle grows here: in the field."),
            "Thistle grows here: in the field."
        );
        assert_eq!(
            Normalizer::normalize("Heres the thing. Nothing else."),
            "Heres the thing. Nothing else."
        );
    }

    #[test]
    fn test_stacked_preambles() {
        assert_eq!(
            Normalizer::normalize("Here is the text:\nHere's the final version:\nBody."),
            "Body."
        );
    }

    #[test]
    fn test_reasoning_blocks_removed() {
        assert_eq!(
            Normalizer::normalize("<think>plan the answer\nstep 2</think>\nFinal answer."),
            "Final answer."
        );
        assert_eq!(
            Normalizer::normalize("A <THINKING>x</THINKING>B"),
            "A B"
        );
    }

    #[test]
    fn test_nested_markers_removed_in_one_call() {
        assert_eq!(Normalizer::normalize("<thi<think>x</think>nk>y</think>z"), "z");
        assert_eq!(
            Normalizer::normalize("a<thin<thinking>q</thinking>king>r</thinking> b"),
            "a b"
        );
    }

    #[test]
    fn test_unmatched_marker_kept() {
        assert_eq!(Normalizer::normalize("<think> dangling"), "<think> dangling");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(Normalizer::normalize(""), "");
        assert_eq!(Normalizer::normalize("   \n\n  "), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "This is important.    It is a test.  ",
            "Here   is the draft:\nBody text  here .",
            "a .  . b",
            "x ..,  y",
            "one\n\n\n\n\ntwo  \n\n\nthree",
            "<think>hidden</think>Here is it:\n\n\nHere's more:\nDone...",
            "  , leading comma",
            "This is\nThis is\nkept?",
            "Tabs\t\t and  spaces\t.",
            "<thi<think>x</think>nk>y</think>z",
            "<th<thi<think>a</think>nk>b</think>ink>c</think>d",
            "",
        ];
        for input in inputs {
            let once = Normalizer::normalize(input);
            let twice = Normalizer::normalize(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
