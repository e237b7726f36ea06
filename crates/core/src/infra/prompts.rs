/// パス別・トーン別・検出器別のプロンプトテンプレート
use crate::domain::profile::{PassKind, PassSpec};
use crate::domain::types::{DetectorTargets, Tone};

/// Pass 1: 構造の組み替え（高温度）
pub const SYSTEM_STRUCTURE: &str = "\
You are a structural editor. Your only job is to stop this text from following the \
topic sentence, support, conclusion pattern in every paragraph.
Rules:
- Reorder arguments or ideas while keeping every fact intact.
- Make paragraph lengths unequal: some very short, some longer.
- Open at least two paragraphs mid-thought instead of with a topic sentence.
- Vary sentence length sharply inside each paragraph.
- Add no new information and no buzzwords.
- Output only the restructured text. No preamble.";

/// Pass 3: 文長リズム
pub const SYSTEM_RHYTHM: &str = "\
You are a sentence rhythm editor. Make the rhythm of this text read as human.
Rules:
- After any sentence longer than 20 words, keep the next one under 10.
- Swap formal transitions (However, Furthermore, Moreover, Additionally, Consequently, \
Nevertheless) for plain ones (But, Also, So, Plus, That said, Even so).
- Start at least two paragraphs with a sentence under 8 words.
- Break up any run of three sentences with similar length.
- Add no new facts and no buzzwords.
- Output only the result. No preamble.";

/// Pass 4: 仕上げ
pub const SYSTEM_POLISH: &str = "\
Final quality pass. Make the text flow naturally without losing its human texture.
Rules:
- Fix phrasing that is genuinely confusing.
- Keep the meaning and argument clear.
- Replace any buzzword that slipped back in (delve, utilize, leverage, paramount, \
groundbreaking, pivotal, robust, seamlessly).
- Add no new content and do not reintroduce uniform sentence patterns.
- Output only the final text. No preamble.";

pub const FORBIDDEN_WORDS: &str = "\
FORBIDDEN: never use these words or phrases: delve, utilize, leverage, paramount, \
landscape, realm, testament, moreover, furthermore, in conclusion, cutting-edge, \
game-changer, groundbreaking, pivotal, robust, seamlessly, foster, comprehensive, \
transformative, synergy, ecosystem, paradigm, multifaceted, it is important to note, \
needless to say, as we can see, it goes without saying, in order to.";

pub const NO_PREAMBLE: &str = "\
Output only the rewritten text. Do not add any preamble such as 'Here is the rewritten version:'.";

/// トーンに対応するシステムプロンプト
pub fn tone_prompt(tone: Tone) -> &'static str {
    match tone {
        Tone::Conversational => "\
You are rewriting this in a genuine, casual voice, like a sharp person explaining something to a friend.
Style: mix very short sentences with longer, looser ones. Real opinions. An occasional aside in \
parentheses. Uneven paragraph lengths. No buzzwords and no formal transitions.",
        Tone::Professional => "\
You are a senior editor rewriting this in a confident, direct professional voice.
Style: no fluff, active voice, some short punchy sentences next to medium explanatory ones. \
Specific over vague. No corporate filler.",
        Tone::Storyteller => "\
You are a narrative writer giving this content the flow of a story.
Style: make abstract ideas concrete and visual. Let tension build and resolve. Vary pacing \
between quick beats and slower reflective passages.",
        Tone::Opinionated => "\
You are a blogger with a distinct, confident voice.
Style: first person used naturally. Direct and opinionated. One or two rhetorical questions. \
Admit uncertainty where it is honest.",
        Tone::Witty => "\
You are a witty writer: sharp, clever, occasionally irreverent without trying too hard.
Style: smart observations, light humor where it fits, one well-placed subversion of \
expectation, unexpected but accurate word choices.",
        Tone::Journalistic => "\
You are a journalist rewriting this in clean, neutral news prose.
Style: objective, no editorial asides, active voice, short clear sentences, no jargon, \
attribution where claims need it.",
    }
}

/// 有効な検出器ごとの指示（無効なら空文字列）
pub fn detector_instructions(targets: &DetectorTargets) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if targets.gptzero {
        parts.push("\
GPTZERO (perplexity and burstiness):
- Make at least a fifth of the sentences dramatically short (under 7 words).
- Let at least a fifth run past 25 words with embedded clauses.
- Use one word that is correct but slightly unexpected in context.
- Include one rhetorical question.
- Never start two consecutive sentences with the same word.");
    }
    if targets.originality {
        parts.push("\
ORIGINALITY (semantic fingerprinting):
- Change the order of ideas across paragraphs, not just the wording.
- Use at least two idiomatic expressions.
- Add one concrete, specific detail drawn from the text (a number, a named case, a comparison).
- Avoid clean topic-sentence, detail, conclusion paragraphs.");
    }
    if targets.turnitin {
        parts.push("\
TURNITIN (stylometry and structure):
- Break paragraph symmetry: include a one-sentence paragraph and a long one.
- Include one mild subjective observation.
- Avoid parallel list structures such as First, Second, Third.
- Move the main claim around: sometimes lead with it, sometimes build to it.");
    }
    if targets.zerogpt {
        parts.push("\
ZEROGPT (formal transitions and uniform clauses):
- Replace However, Furthermore, Moreover, Additionally, Consequently, Nevertheless, In conclusion.
- Prefer But, Also, So, Plus, That said, Even so, And yet.
- Avoid symmetrical paired clauses.
- Begin at least two sentences with a conjunction.");
    }
    if targets.quillbot {
        parts.push("\
QUILLBOT (paraphrase patterns):
- Do not simply swap synonyms; change grammatical form instead.
- Turn some noun phrases into verb phrases and the reverse.
- Combine two short related sentences, or split one long sentence.
- Reframe some claims from the other side (\"X improves Y\" becomes \"Y improves when X is applied\").");
    }
    parts.join("\n\n")
}

/// Voice パスのシステムプロンプトを合成する。
/// base が空なら選択トーンのプロンプトを土台にする。
pub fn compose_voice_system(base: &str, tone: Tone, detectors: &DetectorTargets) -> String {
    let mut full = if base.trim().is_empty() {
        tone_prompt(tone).to_string()
    } else {
        base.to_string()
    };
    let rules = detector_instructions(detectors);
    if !rules.is_empty() {
        full.push_str("\n\n");
        full.push_str(&rules);
    }
    full.push_str("\n\n");
    full.push_str(FORBIDDEN_WORDS);
    full.push_str("\n\n");
    full.push_str(NO_PREAMBLE);
    full
}

/// パスに渡す実効システムプロンプト
pub fn system_prompt_for(pass: &PassSpec, tone: Tone, detectors: &DetectorTargets) -> String {
    match pass.kind {
        PassKind::Voice => compose_voice_system(&pass.system, tone, detectors),
        _ => pass.system.clone(),
    }
}

/// パスに渡すユーザーメッセージ
pub fn user_message(kind: PassKind, text: &str) -> String {
    match kind {
        PassKind::Edit => format!("Edit this text:\n\n{text}"),
        PassKind::Voice => format!(
            "Apply your full humanization approach to this text. Make it read as unmistakably human-written:\n\n{text}"
        ),
        PassKind::Structure | PassKind::Rhythm | PassKind::Polish => text.to_string(),
    }
}
