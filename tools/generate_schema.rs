//! JSON Schema + Markdown生成ツール
//!
//! src/domain/config.rsの設定構造から以下を自動生成します：
//! 1. JSON Schema (schema/config.json)
//! 2. Markdownドキュメント (CONFIGURATION.md)
//!
//! 実行方法:
//! ```
//! cargo run --bin generate_schema
//! ```

use memory_tree::domain::config::AppConfig;
use schemars::schema_for;
use serde_json::{Map, Value};
use std::fs;

fn main() {
    println!("JSON Schema + Markdown生成中...");

    // AppConfigからJSON Schemaを生成
    let schema = schema_for!(AppConfig);
    let json = serde_json::to_string_pretty(&schema).expect("Failed to serialize schema to JSON");

    fs::create_dir_all("schema").expect("Failed to create schema/ directory");
    fs::write("schema/config.json", &json).expect("Failed to write schema/config.json");
    println!("  ✓ schema/config.json");

    let schema_value: Value = serde_json::from_str(&json).expect("Failed to parse generated schema");
    let markdown = generate_markdown(&schema_value);

    fs::write("CONFIGURATION.md", markdown).expect("Failed to write CONFIGURATION.md");
    println!("  ✓ CONFIGURATION.md");

    println!("✅ 生成完了: schema/config.json + CONFIGURATION.md");
}

/// JSON Schemaからマークダウンドキュメントを生成
fn generate_markdown(schema: &Value) -> String {
    let mut md = String::new();

    md.push_str("# 設定リファレンス (Configuration Reference)\n\n");

    md.push_str("## 概要\n\n");
    md.push_str("`config.toml`ファイルは、memory-treeのジェスチャー解釈を制御する設定ファイルです。\n");
    md.push_str("JSON Schemaによる検証により、設定の正確性が保証されています。\n\n");

    md.push_str("**設定ファイルの場所**: `config.toml` (プロジェクトルート)  \n");
    md.push_str("**スキーマファイル**: `schema/config.json` (自動生成)  \n");
    md.push_str("**サンプル**: `config.toml.example`\n\n");

    md.push_str("⚠️ **注意**: このドキュメント（CONFIGURATION.md）は `cargo run --bin generate_schema` で自動生成されます。\n");
    md.push_str("設定項目の説明を変更する場合は、`src/domain/config.rs`のdoc commentsを編集してください。\n\n");

    md.push_str("## 設定ファイルの読み込み\n\n");
    md.push_str("- `config.toml`が存在する場合: ファイルから読み込み\n");
    md.push_str("- ファイルが存在しない場合: デフォルト値を使用（警告ログ出力）\n");
    md.push_str("- パース失敗時: デフォルト値を使用（警告ログ出力）\n\n");

    md.push_str("## 設定項目\n\n");

    let defs = schema
        .get("$defs")
        .and_then(|d| d.as_object())
        .cloned()
        .unwrap_or_default();

    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, prop) in props {
            md.push_str(&format!("### [{}] - {}\n\n", key, section_name(key)));

            // セクションはすべて$ref経由でサブ構造体を指す
            if let Some(def_schema) = resolve_ref(prop, &defs) {
                if let Some(desc) = def_schema.get("description").and_then(|d| d.as_str()) {
                    md.push_str(&format!("{}\n\n", desc.replace('\n', " ")));
                }
                generate_properties_table(&mut md, def_schema, &defs);
            }
        }
    }

    md.push_str("## 参考\n\n");
    md.push_str("- [README.md](README.md) - クイックスタート\n");

    md
}

/// $ref参照を解決する（参照でなければそのまま返す）
fn resolve_ref<'a>(schema: &'a Value, defs: &'a Map<String, Value>) -> Option<&'a Value> {
    match schema.get("$ref").and_then(|r| r.as_str()) {
        Some(ref_str) => defs.get(ref_str.strip_prefix("#/$defs/")?),
        None => Some(schema),
    }
}

/// プロパティテーブルを生成
fn generate_properties_table(md: &mut String, schema: &Value, defs: &Map<String, Value>) {
    let Some(props) = schema.get("properties").and_then(|p| p.as_object()) else {
        return;
    };
    if props.is_empty() {
        return;
    }

    md.push_str("| 設定項目 | 型 | デフォルト | 説明 |\n");
    md.push_str("|---------|-----|---------|---------|\n");

    for (key, prop) in props {
        md.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            key,
            type_string(prop, defs).replace('|', "\\|"),
            default_value(prop),
            description(prop)
        ));
    }
    md.push('\n');

    // ネストされたオブジェクト（per-gesture設定など）をサブセクションとして処理
    for (key, prop) in props {
        if prop.get("$ref").is_some() {
            if let Some(def_schema) = resolve_ref(prop, defs) {
                if def_schema.get("properties").is_some() {
                    md.push_str(&format!("#### [{}]\n\n", key));
                    if let Some(desc) = def_schema.get("description").and_then(|d| d.as_str()) {
                        md.push_str(&format!("{}\n\n", desc.replace('\n', " ")));
                    }
                    generate_properties_table(md, def_schema, defs);
                }
            }
        }
    }
}

/// 型を文字列で取得
fn type_string(schema: &Value, defs: &Map<String, Value>) -> String {
    if let Some(ref_str) = schema.get("$ref").and_then(|r| r.as_str()) {
        if let Some(def_name) = ref_str.strip_prefix("#/$defs/") {
            if defs
                .get(def_name)
                .and_then(|d| d.get("properties"))
                .is_some()
            {
                return "object".to_string();
            }
            return def_name.to_string();
        }
    }

    match schema.get("type") {
        Some(Value::String(type_str)) => {
            // 数値型はformat（f32/u32等）を優先して表示
            if let Some(format) = schema.get("format").and_then(|f| f.as_str()) {
                if type_str == "integer" || type_str == "number" {
                    return format.to_string();
                }
            }
            type_str.clone()
        }
        Some(Value::Array(types)) => {
            // Union型（例: ["string", "null"]）
            let names: Vec<&str> = types.iter().filter_map(|t| t.as_str()).collect();
            names.join(" | ")
        }
        _ => "unknown".to_string(),
    }
}

/// デフォルト値を取得
fn default_value(schema: &Value) -> String {
    match schema.get("default") {
        Some(Value::String(s)) => format!("`\"{}\"`", s),
        Some(Value::Number(n)) => format!("`{}`", n),
        Some(Value::Bool(b)) => format!("`{}`", b),
        Some(Value::Null) => "`null`".to_string(),
        _ => "-".to_string(),
    }
}

/// 説明文を取得
fn description(schema: &Value) -> String {
    match schema.get("description").and_then(|d| d.as_str()) {
        Some(desc) => desc
            .replace("\n\n", "<br><br>")
            .replace('\n', " ")
            .replace('|', "\\|"),
        None => "-".to_string(),
    }
}

/// セクション名をフォーマット
fn section_name(key: &str) -> String {
    match key {
        "stabilizer" => "ジェスチャー安定化設定".to_string(),
        "extractor" => "指・ポーズ抽出設定".to_string(),
        "dwell" => "Dwellクリック設定".to_string(),
        "motion" => "モーション追跡設定".to_string(),
        "control" => "連続制御設定".to_string(),
        "actions" => "アクション設定".to_string(),
        "photos" => "写真インデックス設定".to_string(),
        "pipeline" => "フレームループ設定".to_string(),
        _ => key.to_string(),
    }
}
