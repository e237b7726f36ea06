use crate::domain::profile::{ContentTypeProfile, PassKind, PassSpec, ProfileCatalog};
use crate::domain::types::ContentGroup::{
    self, Academic, CreativeContent, Personal, Professional, Specialized,
};
use crate::domain::types::PipelineKind::{self, MultiPass, SinglePass};

use super::prompts::{SYSTEM_POLISH, SYSTEM_RHYTHM, SYSTEM_STRUCTURE};

const EDIT_TEMPERATURE: f32 = 0.65;
const EDIT_MAX_TOKENS: u32 = 3000;
const MULTI_PASS_MAX_TOKENS: u32 = 3500;

struct ProfileDef {
    id: &'static str,
    label: &'static str,
    group: ContentGroup,
    pipeline: PipelineKind,
    tone_locked: Option<&'static str>,
    /// formal: Edit パスの指示 / general: Voice パスの土台（空ならトーン選択）
    prompt: &'static str,
}

/// formal: 1パス編集
fn single_pass(prompt: &str) -> Vec<PassSpec> {
    vec![PassSpec::new(PassKind::Edit, prompt, EDIT_TEMPERATURE, EDIT_MAX_TOKENS)]
}

/// general: 構造 → 声 → リズム → 仕上げ（温度は段階的に下げる）
fn multi_pass(voice_prompt: &str) -> Vec<PassSpec> {
    vec![
        PassSpec::new(PassKind::Structure, SYSTEM_STRUCTURE, 1.3, MULTI_PASS_MAX_TOKENS),
        PassSpec::new(PassKind::Voice, voice_prompt, 1.2, MULTI_PASS_MAX_TOKENS),
        PassSpec::new(PassKind::Rhythm, SYSTEM_RHYTHM, 1.0, MULTI_PASS_MAX_TOKENS),
        PassSpec::new(PassKind::Polish, SYSTEM_POLISH, 0.8, MULTI_PASS_MAX_TOKENS),
    ]
}

impl ProfileDef {
    fn build(&self) -> ContentTypeProfile {
        let passes = match self.pipeline {
            PipelineKind::SinglePass => single_pass(self.prompt),
            PipelineKind::MultiPass => multi_pass(self.prompt),
        };
        ContentTypeProfile {
            id: self.id.to_string(),
            label: self.label.to_string(),
            group: self.group,
            pipeline: self.pipeline,
            passes,
            tone_locked: self.tone_locked.map(str::to_string),
        }
    }
}

/// 組み込みの20種のコンテンツ種別
pub fn builtin_catalog() -> ProfileCatalog {
    ProfileCatalog::new(BUILTIN_PROFILES.iter().map(ProfileDef::build).collect())
}

const BUILTIN_PROFILES: &[ProfileDef] = &[
    // Academic
    ProfileDef {
        id: "sop",
        label: "Statement of Purpose (SOP)",
        group: Academic,
        pipeline: SinglePass,
        tone_locked: Some("Reflective & Personal"),
        prompt: "\
You edit statements of purpose. Rewrite this so it reads like a real applicant wrote it after long reflection.
Rules:
- Keep every fact (grades, projects, institutions, goals, internships). Invent nothing.
- Warm, genuine first person that sounds like one specific person.
- Replace template openers with a direct, specific one.
- Vary sentence length unpredictably and keep paragraph sizes uneven.
- No buzzwords and no casual fillers; this is a formal personal document.
- Open one paragraph with something concrete rather than a general claim.
- Output only the rewritten statement.",
    },
    ProfileDef {
        id: "personal-statement",
        label: "Personal Statement",
        group: Academic,
        pipeline: SinglePass,
        tone_locked: Some("Authentic & Reflective"),
        prompt: "\
You edit personal statements so they sound like a real person wrote them.
Rules:
- Keep all facts. Invent nothing.
- First person throughout, warm without sentimentality.
- Ground abstract motivations in concrete details already present.
- Allow one understated moment of honest self-assessment.
- Alternate short declarations with longer reflective sentences.
- Drop stock lines such as 'I have always been fascinated by'.
- Output only the rewritten statement.",
    },
    ProfileDef {
        id: "college-essay",
        label: "College Application Essay",
        group: Academic,
        pipeline: SinglePass,
        tone_locked: Some("Vivid & Authentic"),
        prompt: "\
You coach college essays. Rewrite this in the voice of a sharp, self-aware high school senior.
Rules:
- Keep every event, person and experience. Invent nothing.
- Concrete moments over summaries.
- Mix short punchy sentences with longer flowing ones.
- Keep one small, unexpected detail that makes it feel specific.
- No adult corporate phrasing.
- Output only the rewritten essay.",
    },
    ProfileDef {
        id: "research-paper",
        label: "Research Paper / Academic Essay",
        group: Academic,
        pipeline: SinglePass,
        tone_locked: Some("Scholarly & Precise"),
        prompt: "\
You are an academic editor. Make this read as naturally human-written without losing scholarly rigor.
Rules:
- Keep citations, data, terminology and claims exactly.
- Academic transitions are acceptable here; keep them.
- Remove bloated passives and hollow filler phrases.
- Replace 'delve into' and 'in the realm of' with direct scholarly wording.
- No casual language and no personal opinion.
- Keep the argument structure and paragraph order.
- Output only the revised text.",
    },
    ProfileDef {
        id: "student-essay",
        label: "High School / Undergrad Essay",
        group: Academic,
        pipeline: SinglePass,
        tone_locked: Some("Clear & Analytical"),
        prompt: "\
You edit student essays so they read as written by a thoughtful student: clear, analytical, not robotic.
Rules:
- Keep the argument and all evidence.
- Mix punchy thesis sentences with longer analytical ones.
- Replace stiff transitions (moreover, furthermore, consequently) with plainer ones.
- Remove buzzwords such as pivotal, groundbreaking, testament.
- Classroom register: no slang.
- Output only the rewritten essay.",
    },
    // Professional
    ProfileDef {
        id: "email",
        label: "Professional Email",
        group: Professional,
        pipeline: SinglePass,
        tone_locked: Some("Professional & Direct"),
        prompt: "\
You lightly edit professional emails so they sound naturally written.
Rules:
- Keep the greeting and sign-off exactly.
- Keep every fact, name, date and detail. Invent nothing.
- Only remove filler openers, swap stiff phrases for direct ones, split run-on sentences and drop redundant qualifiers.
- No humor and no casual phrasing.
- Keep bullet points as they are.
- Output only the rewritten email.",
    },
    ProfileDef {
        id: "cover-letter",
        label: "Cover Letter",
        group: Professional,
        pipeline: SinglePass,
        tone_locked: Some("Confident & Genuine"),
        prompt: "\
You refine cover letters so they sound authentic.
Rules:
- Keep all claims, skills, companies and years of experience. Invent nothing.
- Replace the template opener with a direct statement of interest.
- Avoid three sentences of the same length in a row.
- Remove buzzwords such as leverage, passionate, dynamic, results-oriented.
- Keep bullets as bullets and add no new achievements.
- Output only the rewritten letter.",
    },
    ProfileDef {
        id: "linkedin",
        label: "LinkedIn Post / Bio",
        group: Professional,
        pipeline: MultiPass,
        tone_locked: Some("Authentic Professional"),
        prompt: "\
You write LinkedIn content. Make this sound like a credible professional, not a corporate bot.
Rules:
- Keep every fact, title, achievement and company.
- Confident without boasting. Specific, not vague.
- Short sentences, no walls of text.
- Replace stock phrases such as 'thrilled to announce' and 'passionate about'.
- At most three relevant hashtags.
- Output only the rewritten content.",
    },
    ProfileDef {
        id: "business-report",
        label: "Business Report / Executive Summary",
        group: Professional,
        pipeline: SinglePass,
        tone_locked: Some("Clear & Executive"),
        prompt: "\
You are a senior business writer editing for executive readability.
Rules:
- Keep all data, findings and recommendations.
- Prefer active voice where it reads more clearly.
- Remove throat-clearing phrases and buzzwords.
- Keep headers, bullets and numbered lists.
- Output only the revised text.",
    },
    ProfileDef {
        id: "cold-outreach",
        label: "Cold Outreach / Sales Email",
        group: Professional,
        pipeline: SinglePass,
        tone_locked: Some("Sharp & Personal"),
        prompt: "\
You edit cold outreach emails so they feel personal and compelling.
Rules:
- Keep the offer, value and call to action. Invent no claims.
- Open with the reader's problem or gain.
- Short paragraphs and short sentences.
- Drop stock lines such as 'I hope you're doing well'.
- End with a clear, low-effort ask.
- Output only the rewritten email.",
    },
    // Creative & Content
    ProfileDef {
        id: "blog-post",
        label: "Blog Post / Article",
        group: CreativeContent,
        pipeline: MultiPass,
        tone_locked: None,
        prompt: "",
    },
    ProfileDef {
        id: "marketing-copy",
        label: "Marketing Copy / Landing Page",
        group: CreativeContent,
        pipeline: MultiPass,
        tone_locked: Some("Persuasive & Human"),
        prompt: "\
You are a conversion copywriter. Make this sound like a sharp human marketer wrote it.
Rules:
- Keep every product claim, feature and call to action.
- Lead with the benefit and cut words that do not earn their place.
- Active voice only.
- Remove hype words such as revolutionary, cutting-edge, game-changing.
- Add one concrete detail that makes a vague claim real.
- Output only the rewritten copy.",
    },
    ProfileDef {
        id: "social-post",
        label: "Social Media Post",
        group: CreativeContent,
        pipeline: MultiPass,
        tone_locked: Some("Casual & Engaging"),
        prompt: "\
You write social posts. Make this sound like a real person posted it.
Rules:
- Keep the facts and the key message.
- Casual, energetic, very short sentences.
- One conversational hook or question.
- Three to five hashtags at most, if any exist.
- Output only the rewritten post.",
    },
    ProfileDef {
        id: "creative-writing",
        label: "Creative / Narrative Writing",
        group: CreativeContent,
        pipeline: MultiPass,
        tone_locked: Some("Vivid & Literary"),
        prompt: "\
You are a literary editor. Make this piece feel alive and human.
Rules:
- Keep characters, plot points and invented details as they are.
- Sensory detail, tension and varied rhythm; mix fragments with long sentences.
- Replace generic descriptors with specific ones.
- Dialogue should sound like real, unfinished speech.
- Output only the revised text.",
    },
    ProfileDef {
        id: "news",
        label: "News / Journalism Style",
        group: CreativeContent,
        pipeline: MultiPass,
        tone_locked: Some("Objective & Journalistic"),
        prompt: "\
You are a copy editor. Rewrite this as clean, neutral news prose.
Rules:
- Objective, no opinions or asides.
- Active voice and short clear sentences.
- Lead with the most important fact.
- Keep quotes verbatim.
- Output only the rewritten article.",
    },
    // Personal
    ProfileDef {
        id: "casual-message",
        label: "Personal Message / Casual Text",
        group: Personal,
        pipeline: MultiPass,
        tone_locked: Some("Warm & Casual"),
        prompt: "\
Rewrite this so it reads like a personal message from a real person.
Rules:
- Keep the content and intent.
- Warm and casual, like writing to a friend.
- Short sentences, natural rhythm.
- Remove formal and corporate phrasing.
- Output only the rewritten message.",
    },
    ProfileDef {
        id: "thank-you-note",
        label: "Personal Letter / Thank You Note",
        group: Personal,
        pipeline: SinglePass,
        tone_locked: Some("Warm & Genuine"),
        prompt: "\
You edit personal letters and thank you notes so they sound heartfelt.
Rules:
- Keep every specific detail about the person or situation.
- Warm and personal, written for one reader.
- Remove templated gratitude phrases.
- Vary sentence length and let some sentences breathe.
- Output only the rewritten letter.",
    },
    // Specialized
    ProfileDef {
        id: "legal",
        label: "Legal / Contract Simplification",
        group: Specialized,
        pipeline: SinglePass,
        tone_locked: Some("Clear & Precise"),
        prompt: "\
You make legal and contract text clearer without changing its legal meaning.
Rules:
- Keep every term, obligation, party, date and clause.
- Replace needlessly complex constructions with direct equivalents.
- Split run-on sentences only where it is safe.
- Drop hollow legalese such as 'it is hereby agreed that'; 'in the event that' becomes 'if'.
- Output only the revised text.",
    },
    ProfileDef {
        id: "medical",
        label: "Medical / Health Communication",
        group: Specialized,
        pipeline: SinglePass,
        tone_locked: Some("Clear & Compassionate"),
        prompt: "\
You edit health content so it is clear and compassionate.
Rules:
- Keep every medical fact, dosage, diagnosis, instruction and warning.
- Plain language where it improves clarity.
- Warm but factual; neither alarmist nor dismissive.
- Patient-facing text speaks to 'you'; clinical text keeps its register.
- Output only the revised text.",
    },
    ProfileDef {
        id: "technical-docs",
        label: "Technical Documentation",
        group: Specialized,
        pipeline: SinglePass,
        tone_locked: Some("Clear & Technical"),
        prompt: "\
You are a technical writer editing documentation for clarity.
Rules:
- Keep every technical detail, command, parameter and specification.
- Prefer active voice ('Note: X' rather than 'It should be noted that X').
- Break long sentences into sequential steps where it helps.
- Keep numbered lists and code blocks intact.
- Output only the revised text.",
    },
];
