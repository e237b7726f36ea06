use rand::Rng;
use regex::{Regex, RegexBuilder};

/// 禁止フレーズと置換候補。フレーズはリテラル（正規表現ではない）。
#[derive(Debug, Clone)]
pub struct ClicheRule {
    pub phrase: String,
    pub replacements: Vec<String>,
    pattern: Regex,
}

impl ClicheRule {
    /// 置換候補が空、またはフレーズが空の場合は None
    pub fn new(phrase: &str, replacements: &[&str]) -> Option<Self> {
        let phrase = phrase.trim();
        if phrase.is_empty() || replacements.is_empty() {
            return None;
        }
        let pattern = RegexBuilder::new(&regex::escape(phrase))
            .case_insensitive(true)
            .build()
            .ok()?;
        Some(Self {
            phrase: phrase.to_string(),
            replacements: replacements.iter().map(|r| r.to_string()).collect(),
            pattern,
        })
    }

    /// 単語境界を満たす最初の出現位置（バイト範囲）。claimed と重なる出現は飛ばす。
    fn first_match(&self, text: &str, claimed: &[(usize, usize)]) -> Option<(usize, usize)> {
        self.pattern
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .find(|&(start, end)| {
                is_word_boundary(text, start, end)
                    && !claimed.iter().any(|&(s, e)| start < e && s < end)
            })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// クリシェ置換テーブル（フレーズ長の降順で保持）
#[derive(Debug, Clone)]
pub struct ClicheTable {
    rules: Vec<ClicheRule>,
}

impl ClicheTable {
    pub fn new(mut rules: Vec<ClicheRule>) -> Self {
        // 長いフレーズ優先（"cutting-edge" を "edge" より先に）。同長は辞書順で決定的に。
        rules.sort_by(|a, b| {
            b.phrase
                .chars()
                .count()
                .cmp(&a.phrase.chars().count())
                .then_with(|| a.phrase.cmp(&b.phrase))
        });
        Self { rules }
    }

    /// 組み込みのAI定型語テーブル
    pub fn builtin() -> Self {
        let rules = BUILTIN_CLICHES
            .iter()
            .filter_map(|(phrase, options)| ClicheRule::new(phrase, options))
            .collect();
        Self::new(rules)
    }

    pub fn rules(&self) -> &[ClicheRule] {
        &self.rules
    }

    /// 各フレーズの最初の出現のみを置換する。
    /// 位置は全て元テキスト上で決めるため、置換後の文字列は再走査されない。
    /// 置換語の大文字小文字は元に合わせない。
    pub fn declicheify<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        let mut edits: Vec<(usize, usize, &str)> = Vec::new();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        for rule in &self.rules {
            if let Some((start, end)) = rule.first_match(text, &claimed) {
                let choice = &rule.replacements[rng.gen_range(0..rule.replacements.len())];
                edits.push((start, end, choice.as_str()));
                claimed.push((start, end));
            }
        }

        if edits.is_empty() {
            return text.to_string();
        }

        edits.sort_by_key(|&(start, _, _)| start);
        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;
        for (start, end, replacement) in edits {
            result.push_str(&text[cursor..start]);
            result.push_str(replacement);
            cursor = end;
        }
        result.push_str(&text[cursor..]);
        result
    }
}

impl Default for ClicheTable {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_CLICHES: &[(&str, &[&str])] = &[
    ("delve into", &["dig into", "explore", "look at", "get into"]),
    ("delves into", &["digs into", "explores"]),
    ("delving into", &["digging into", "exploring"]),
    ("utilize", &["use", "apply"]),
    ("utilizes", &["uses", "applies"]),
    ("leverage", &["use", "tap into", "draw on"]),
    ("leverages", &["uses", "draws on"]),
    ("foster", &["build", "grow", "encourage"]),
    ("facilitate", &["help", "enable"]),
    ("harness", &["use", "tap into", "channel"]),
    ("realm", &["area", "field", "world"]),
    ("landscape", &["field", "scene", "environment"]),
    ("testament", &["proof", "sign", "evidence"]),
    ("paradigm", &["model", "approach", "framework"]),
    ("synergy", &["teamwork", "collaboration"]),
    ("ecosystem", &["system", "network", "environment"]),
    ("paramount", &["key", "critical", "essential"]),
    ("pivotal", &["key", "crucial", "central"]),
    ("groundbreaking", &["new", "innovative", "novel"]),
    ("cutting-edge", &["new", "modern", "latest"]),
    ("cutting edge", &["new", "modern", "latest"]),
    ("robust", &["strong", "solid", "reliable"]),
    ("comprehensive", &["complete", "thorough", "detailed"]),
    ("innovative", &["new", "creative", "fresh"]),
    ("transformative", &["significant", "major", "powerful"]),
    ("multifaceted", &["complex", "layered", "varied"]),
    ("seamlessly", &["smoothly", "easily", "naturally"]),
    ("in conclusion", &["to wrap up", "so", "bottom line"]),
    ("in summary", &["in short", "briefly"]),
    ("it is important to note that", &["worth noting,", "note that"]),
    ("it's important to note that", &["worth noting,", "note that"]),
    ("it is worth noting that", &["worth noting,", "note that"]),
    ("it's worth noting that", &["worth noting,"]),
    ("in order to", &["to"]),
    ("due to the fact that", &["because", "since"]),
    ("game-changer", &["big shift", "major change"]),
    ("game changer", &["big shift", "major change"]),
    ("needless to say", &["clearly", "obviously"]),
    ("as we can see", &["clearly", "as shown"]),
    ("it goes without saying", &["clearly"]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(entries: &[(&str, &[&str])]) -> ClicheTable {
        ClicheTable::new(
            entries
                .iter()
                .filter_map(|(p, r)| ClicheRule::new(p, r))
                .collect(),
        )
    }

    #[test]
    fn test_utilize_scenario() {
        let t = table(&[("utilize", &["use", "apply"])]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = t.declicheify("We utilize this tool.", &mut rng);
            assert!(
                out == "We use this tool." || out == "We apply this tool.",
                "unexpected output: {out}"
            );
        }
    }

    #[test]
    fn test_whole_word_only() {
        let t = table(&[("utilize", &["use"]), ("leverage", &["use"])]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(t.declicheify("utilization", &mut rng), "utilization");
        assert_eq!(t.declicheify("They leveraged it.", &mut rng), "They leveraged it.");
        assert_eq!(t.declicheify("reutilize", &mut rng), "reutilize");
    }

    #[test]
    fn test_case_insensitive_replacement_not_recased() {
        let t = table(&[("robust", &["solid"])]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(t.declicheify("Robust design wins.", &mut rng), "solid design wins.");
    }

    #[test]
    fn test_only_first_occurrence() {
        let t = table(&[("robust", &["solid"])]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            t.declicheify("A robust plan and a robust team.", &mut rng),
            "A solid plan and a robust team."
        );
    }

    #[test]
    fn test_longer_phrase_wins() {
        let t = table(&[("edge", &["rim"]), ("cutting-edge", &["modern"])]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            t.declicheify("A cutting-edge tool at the edge.", &mut rng),
            "A modern tool at the rim."
        );
    }

    #[test]
    fn test_replacement_not_rescanned() {
        let t = table(&[("groundbreaking", &["innovative"]), ("innovative", &["fresh"])]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            t.declicheify("A groundbreaking idea.", &mut rng),
            "A innovative idea."
        );
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let t = ClicheTable::builtin();
        let input = "We leverage a robust, comprehensive ecosystem in order to delve into data.";
        let a = t.declicheify(input, &mut StdRng::seed_from_u64(42));
        let b = t.declicheify(input, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(!a.contains("leverage"));
        assert!(!a.contains("robust"));
        assert!(!a.contains("in order to"));
        assert!(!a.contains("delve into"));
    }

    #[test]
    fn test_builtin_sorted_by_length() {
        let t = ClicheTable::builtin();
        let lens: Vec<usize> = t.rules().iter().map(|r| r.phrase.chars().count()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
        assert!(t.rules().iter().all(|r| !r.replacements.is_empty()));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        assert!(ClicheRule::new("", &["x"]).is_none());
        assert!(ClicheRule::new("robust", &[]).is_none());
    }

    #[test]
    fn test_no_match_returns_input() {
        let t = ClicheTable::builtin();
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(t.declicheify("", &mut rng), "");
        assert_eq!(t.declicheify("Plain words only.", &mut rng), "Plain words only.");
    }
}
