use crate::schema::{schema, SchemaError};
use crate::types::Language;

/// Language every generated profile must declare in `meta.language`.
pub const OUTPUT_LANGUAGE: Language = Language::Ja;

/// Build the fixed system instruction sent with every generation call.
///
/// The schema section is serialized from the embedded schema, so the text
/// the model reads and the contract it is held to cannot drift apart.
pub fn system_instruction() -> Result<String, SchemaError> {
    let schema_text = serde_json::to_string_pretty(schema()?)
        .map_err(|e| SchemaError::Json(e.to_string()))?;

    let mut out = String::with_capacity(schema_text.len() + 512);
    out.push_str("# 目的\n");
    out.push_str(
        "与えられたキャラクター名から推論してキャラクター情報を正規化し、\
         下記のスキーマのJSONを出力してください。\n\n",
    );
    out.push_str("# 方針\n");
    out.push_str(&format!(
        "- 出力言語は日本語（\"meta.language\":\"{OUTPUT_LANGUAGE}\"）とします\n"
    ));
    out.push_str("- キーの順序はスキーマ順を維持。未定義のキーは追加しません。\n");
    out.push_str("- 重複キーは禁止。\n");
    out.push_str("- すべての必須フィールドを出力し、不明な値は推測するか「不明」とします。\n\n");
    out.push_str("# スキーマ\n");
    out.push_str(&schema_text);
    out.push('\n');
    Ok(out)
}
