use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;

use super::segmenter;
pub use crate::domain::settings::BurstinessConfig;
use crate::domain::types::word_count;

/// 文中の分割候補となる接続詞（前後が空白のもの）
fn re_conjunction() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s(and|but|because|so|while|although|which)\s").unwrap()
    })
}

/// 文の並びを変換する。長文は接続詞（なければカンマ）で2文に、短文が連続すれば1文に。
pub fn vary_rhythm<S, R>(sentences: &[S], cfg: &BurstinessConfig, rng: &mut R) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let split_p = cfg.split_probability.clamp(0.0, 1.0);
    let merge_p = cfg.merge_probability.clamp(0.0, 1.0);
    let mut out = Vec::with_capacity(sentences.len());
    let mut i = 0;

    while i < sentences.len() {
        let current = sentences[i].as_ref();
        let words = word_count(current);

        if words > cfg.long_sentence_words {
            if rng.gen_bool(split_p) {
                if let Some((left, right)) = split_long(current, cfg.min_part_words) {
                    out.push(left);
                    out.push(right);
                    i += 1;
                    continue;
                }
            }
        } else if words < cfg.short_sentence_words && current.ends_with('.') {
            if let Some(next) = sentences.get(i + 1).map(|s| s.as_ref()) {
                if word_count(next) < cfg.short_sentence_words && rng.gen_bool(merge_p) {
                    out.push(merge_short(current, next));
                    i += 2;
                    continue;
                }
            }
        }

        out.push(current.to_string());
        i += 1;
    }

    out
}

/// テキスト全体に適用する。行単位で処理し、改行構造と行頭インデントは保持する。
pub fn apply<R: Rng + ?Sized>(text: &str, cfg: &BurstinessConfig, rng: &mut R) -> String {
    text.split('\n')
        .map(|line| {
            let body = line.trim_start();
            if body.trim().is_empty() {
                return line.to_string();
            }
            let indent = &line[..line.len() - body.len()];
            let sentences: Vec<&str> = segmenter::segment(body).collect();
            format!("{indent}{}", vary_rhythm(&sentences, cfg, rng).join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 分割点を探す: 1/3〜2/3 区間の最初の接続詞、なければ 1/8 以降の最初のカンマ。
/// 各部分が min_words 未満になる場合は分割しない。
fn split_long(sentence: &str, min_words: usize) -> Option<(String, String)> {
    let total = sentence.chars().count();
    let char_offset = |byte: usize| sentence[..byte].chars().count();

    let conj = re_conjunction()
        .captures_iter(sentence)
        .filter_map(|c| c.get(1))
        .map(|m| m.start())
        .find(|&start| {
            let at = char_offset(start);
            at * 3 > total && at * 3 < total * 2
        });

    let (left, right) = match conj {
        Some(start) => (&sentence[..start], &sentence[start..]),
        None => {
            let comma = sentence
                .char_indices()
                .find(|&(i, c)| c == ',' && char_offset(i) * 8 > total)
                .map(|(i, _)| i)?;
            (&sentence[..comma], &sentence[comma + 1..])
        }
    };

    let left = finish_left(left);
    let right = capitalize_first(right.trim());

    if word_count(&left) < min_words || word_count(&right) < min_words {
        return None;
    }
    Some((left, right))
}

/// 末尾の区切り記号を落として句点で閉じる（既に終止記号があれば追加しない）
fn finish_left(left: &str) -> String {
    let trimmed = left
        .trim_end()
        .trim_end_matches([',', ';', ':', '-', '—', '–'])
        .trim_end();
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

fn merge_short(first: &str, second: &str) -> String {
    let head = first.trim_end().trim_end_matches(['.', ',', ';', ':']).trim_end();
    format!("{head}, {}", lowercase_first(second.trim()))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_lowercase() => c.to_uppercase().chain(chars).collect(),
        _ => s.to_string(),
    }
}

/// 先頭文字を小文字化する。代名詞 "I" と頭字語（2文字目も大文字）はそのまま。
fn lowercase_first(s: &str) -> String {
    let first_word = s.split_whitespace().next().unwrap_or("");
    if first_word == "I" || first_word.starts_with("I'") || first_word.starts_with("I’") {
        return s.to_string();
    }
    let mut chars = s.chars();
    match (chars.next(), s.chars().nth(1)) {
        (Some(_), Some(second)) if second.is_uppercase() => s.to_string(),
        (Some(c), _) if c.is_uppercase() => c.to_lowercase().chain(chars).collect(),
        _ => s.to_string(),
    }
}
