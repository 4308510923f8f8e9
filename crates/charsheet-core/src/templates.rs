use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

/// Placeholder profile for `name`: every field present, `meta.language`
/// fixed to `ja`. Backs the offline generator and `charsheet` demos.
pub fn sample_profile(name: &str) -> Value {
    let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    sample_profile_at(name, &uuid::Uuid::new_v4().to_string(), &updated_at)
}

/// Same as [`sample_profile`] with a fixed id and timestamp.
pub fn sample_profile_at(name: &str, id: &str, updated_at: &str) -> Value {
    json!({
        "meta": {
            "id": id,
            "version": "1.0",
            "language": "ja",
            "tags": ["sample", "offline"],
            "created_by": "charsheet",
            "updated_at": updated_at,
            "license": "CC-BY-4.0"
        },
        "identity": {
            "name": name,
            "aliases": [],
            "pronouns": "不明",
            "age": "不明",
            "species_or_race": "人間",
            "role_or_occupation": "冒険者",
            "archetype": "英雄"
        },
        "description": format!("{name}の仮プロフィール。オフライン生成のため詳細は未設定です。"),
        "appearance": {
            "height": "不明",
            "build": "標準",
            "distinct_features": ["印象的な眼差し"],
            "clothing_style": "動きやすい旅装",
            "color_palette": ["赤", "紺"]
        },
        "personality": {
            "summary": "仲間思いで前向き",
            "traits_positive": ["勇敢", "誠実"],
            "traits_negative": ["無鉄砲"],
            "values": ["仲間", "自由"],
            "quirks": ["考え事をすると空を見上げる"],
            "motivations": ["夢を叶える"],
            "fears": ["仲間を失うこと"],
            "temperament": "楽天的"
        },
        "background": {
            "birthplace": "小さな港町",
            "family": ["祖父"],
            "education": "独学",
            "culture": "海洋文化",
            "formative_events": ["旅立ちの日"]
        },
        "capabilities": {
            "skills": ["体術"],
            "powers_or_magic": [],
            "equipment": ["麦わら帽子"],
            "weaknesses": ["泳げない"],
            "constraints_or_costs": ["空腹に弱い"]
        },
        "relationships": [
            {
                "name_or_id": "相棒",
                "type": "仲間",
                "status": "良好",
                "history": "旅の始まりから行動を共にしている",
                "metrics": { "trust": 0.9, "affection": 0.8, "tension": 0.1 }
            }
        ],
        "story": {
            "goals": {
                "short_term": ["次の島へ向かう"],
                "long_term": ["夢の達成"]
            },
            "stakes": "仲間と夢",
            "obstacles": ["強大な敵"],
            "arc": {
                "setup": "故郷を旅立つ",
                "flaws_exposed": "無計画さが仲間を危険にさらす",
                "turning_points": ["最初の敗北"],
                "growth": "仲間を頼ることを学ぶ",
                "resolution": "未定"
            },
            "timeline": [
                {
                    "date": "2000-01-01",
                    "age": "17",
                    "title": "旅立ち",
                    "summary": "故郷を出て海へ",
                    "impact": "物語の始まり"
                }
            ]
        },
        "voice": {
            "diction": "くだけた口調",
            "tone": "明るい",
            "catchphrases": ["行くぞ！"],
            "dialogue_examples": ["腹減ったなー！"]
        },
        "setting": {
            "world": "海と島々の世界",
            "era": "大航海時代",
            "locations": ["港町"],
            "tech_level_or_magic_rules": "帆船と不思議な力が共存する"
        }
    })
}
