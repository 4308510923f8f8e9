use crate::profile::identity::{Appearance, Background, Capabilities, Personality, Voice};
use crate::profile::setting::Setting;
use crate::profile::story::{Relationship, Story};
use crate::profile::CharacterProfile;

/// Section names accepted by [`to_markdown`], in render order.
pub const SECTIONS: [&str; 10] = [
    "identity",
    "description",
    "appearance",
    "personality",
    "background",
    "capabilities",
    "relationships",
    "story",
    "voice",
    "setting",
];

/// Render a profile as Markdown. An empty `sections` slice renders all.
pub fn to_markdown(profile: &CharacterProfile, sections: &[String]) -> String {
    let mut out = String::with_capacity(4096);
    let want = |name: &str| sections.is_empty() || sections.iter().any(|s| s == name);

    if want("identity") {
        emit_identity(&mut out, profile);
    }
    if want("description") {
        emit_description(&mut out, &profile.description);
    }
    if want("appearance") {
        emit_appearance(&mut out, &profile.appearance);
    }
    if want("personality") {
        emit_personality(&mut out, &profile.personality);
    }
    if want("background") {
        emit_background(&mut out, &profile.background);
    }
    if want("capabilities") {
        emit_capabilities(&mut out, &profile.capabilities);
    }
    if want("relationships") {
        emit_relationships(&mut out, &profile.relationships);
    }
    if want("story") {
        emit_story(&mut out, &profile.story);
    }
    if want("voice") {
        emit_voice(&mut out, &profile.voice);
    }
    if want("setting") {
        emit_setting(&mut out, &profile.setting);
    }
    out
}

// ── Helpers ─────────────────────────────────────────────────────

fn field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        out.push_str(&format!("**{label}:** {value}\n"));
    }
}

fn list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("**{label}:**\n"));
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
}

fn percent(v: f64) -> String {
    format!("{}%", (v * 100.0).round() as i64)
}

/// Markdown table cells cannot hold raw pipes or newlines.
fn cell(v: &str) -> String {
    v.replace('|', "\\|").replace('\n', " ")
}

// ── Section emitters ────────────────────────────────────────────

fn emit_identity(out: &mut String, p: &CharacterProfile) {
    let id = &p.identity;
    out.push_str(&format!("# {}\n\n", p.display_name()));
    let subtitle: Vec<&str> = [
        id.role_or_occupation.as_str(),
        id.species_or_race.as_str(),
        id.age.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    if !subtitle.is_empty() {
        out.push_str(&format!("{}\n\n", subtitle.join(" ・ ")));
    }
    if !p.meta.tags.is_empty() {
        let tags: Vec<String> = p.meta.tags.iter().map(|t| format!("`{t}`")).collect();
        out.push_str(&format!("{}\n\n", tags.join(" ")));
    }
    if id.aliases.is_empty() {
        out.push_str("**別名:** (なし)\n");
    } else {
        field(out, "別名", &id.aliases.join(", "));
    }
    field(out, "代名詞", &id.pronouns);
    field(out, "アーキタイプ", &id.archetype);
    out.push('\n');

    let m = &p.meta;
    out.push_str("| メタ情報 | |\n|---|---|\n");
    for (label, value) in [
        ("ID", m.id.as_str()),
        ("言語", m.language.as_str()),
        ("バージョン", m.version.as_str()),
        ("更新日時", m.updated_at.as_str()),
        ("作成者", m.created_by.as_str()),
        ("ライセンス", m.license.as_str()),
    ] {
        out.push_str(&format!("| {label} | {} |\n", cell(value)));
    }
    out.push('\n');
}

fn emit_description(out: &mut String, description: &str) {
    if description.is_empty() {
        return;
    }
    out.push_str("## 概要\n\n");
    out.push_str(description);
    out.push_str("\n\n");
}

fn emit_appearance(out: &mut String, a: &Appearance) {
    out.push_str("## 外見\n\n");
    field(out, "身長", &a.height);
    field(out, "体型", &a.build);
    field(out, "服装", &a.clothing_style);
    list(out, "特徴", &a.distinct_features);
    if !a.color_palette.is_empty() {
        field(out, "カラーパレット", &a.color_palette.join(", "));
    }
    out.push('\n');
}

fn emit_personality(out: &mut String, p: &Personality) {
    out.push_str("## 性格\n\n");
    if !p.summary.is_empty() {
        out.push_str(&format!("{}\n\n", p.summary));
    }
    list(out, "長所", &p.traits_positive);
    list(out, "短所", &p.traits_negative);
    list(out, "価値観", &p.values);
    list(out, "癖", &p.quirks);
    list(out, "動機", &p.motivations);
    list(out, "恐れ", &p.fears);
    field(out, "気質", &p.temperament);
    out.push('\n');
}

fn emit_background(out: &mut String, b: &Background) {
    out.push_str("## 背景\n\n");
    field(out, "出生地", &b.birthplace);
    field(out, "学歴", &b.education);
    field(out, "文化", &b.culture);
    list(out, "家族", &b.family);
    list(out, "形成的出来事", &b.formative_events);
    out.push('\n');
}

fn emit_capabilities(out: &mut String, c: &Capabilities) {
    out.push_str("## 能力・装備\n\n");
    list(out, "スキル", &c.skills);
    list(out, "魔法・能力", &c.powers_or_magic);
    list(out, "装備", &c.equipment);
    list(out, "弱点", &c.weaknesses);
    list(out, "制約・コスト", &c.constraints_or_costs);
    out.push('\n');
}

fn emit_relationships(out: &mut String, rels: &[Relationship]) {
    out.push_str("## 関係性\n\n");
    if rels.is_empty() {
        out.push_str("関係データはありません\n\n");
        return;
    }
    out.push_str("| 相手 | 種類 | 状態 | 信頼 | 愛情 | 緊張 |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for r in rels {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            cell(&r.name_or_id),
            cell(&r.kind),
            cell(&r.status),
            percent(r.metrics.trust.value()),
            percent(r.metrics.affection.value()),
            percent(r.metrics.tension.value()),
        ));
    }
    out.push('\n');
    for r in rels.iter().filter(|r| !r.history.is_empty()) {
        out.push_str(&format!("- **{}**: {}\n", r.name_or_id, r.history));
    }
    out.push('\n');
}

fn emit_story(out: &mut String, s: &Story) {
    out.push_str("## ストーリー\n\n");
    list(out, "短期目標", &s.goals.short_term);
    list(out, "長期目標", &s.goals.long_term);
    field(out, "賭け・ステークス", &s.stakes);
    list(out, "障害", &s.obstacles);
    out.push('\n');

    out.push_str("### 物語アーク\n\n");
    field(out, "導入", &s.arc.setup);
    field(out, "欠点の露呈", &s.arc.flaws_exposed);
    list(out, "転換点", &s.arc.turning_points);
    field(out, "成長", &s.arc.growth);
    field(out, "解決", &s.arc.resolution);
    out.push('\n');

    out.push_str("### タイムライン\n\n");
    if s.timeline.is_empty() {
        out.push_str("タイムラインはありません\n\n");
        return;
    }
    out.push_str("| 日付 | 年齢 | 出来事 | 概要 | 影響 |\n");
    out.push_str("|---|---|---|---|---|\n");
    for t in &s.timeline {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&t.date),
            cell(&t.age),
            cell(&t.title),
            cell(&t.summary),
            cell(&t.impact),
        ));
    }
    out.push('\n');
}

fn emit_voice(out: &mut String, v: &Voice) {
    out.push_str("## 口調・ボイス\n\n");
    field(out, "語彙", &v.diction);
    field(out, "トーン", &v.tone);
    if !v.catchphrases.is_empty() {
        let quoted: Vec<String> = v.catchphrases.iter().map(|p| format!("「{p}」")).collect();
        field(out, "口癖", &quoted.join(" "));
    }
    if !v.dialogue_examples.is_empty() {
        out.push_str("**セリフ例:**\n");
        for line in &v.dialogue_examples {
            out.push_str(&format!("> {line}\n"));
        }
    }
    out.push('\n');
}

fn emit_setting(out: &mut String, s: &Setting) {
    out.push_str("## 世界観・舞台\n\n");
    field(out, "世界", &s.world);
    field(out, "時代", &s.era);
    list(out, "場所", &s.locations);
    field(out, "技術/魔法ルール", &s.tech_level_or_magic_rules);
    out.push('\n');
}
