// src/cli/export.rs — Export stored evaluations as JSON or CSV

use std::io::Write;

use crate::memory::store::{EvaluationRow, Store};

pub fn run_export(
    model: &str,
    format: &str,
    output: Option<&str>,
    store: Option<&Store>,
) -> anyhow::Result<()> {
    let Some(store) = store else {
        anyhow::bail!("Database unavailable; nothing to export.");
    };

    let rows = store.query_evaluations_by_model(model)?;
    if rows.is_empty() {
        println!("No stored evaluations for model '{model}'.");
        return Ok(());
    }

    let content = match format {
        "json" => to_json(&rows)?,
        "csv" => to_csv(&rows),
        other => anyhow::bail!("Unknown export format '{other}' (expected json or csv)"),
    };

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            file.write_all(content.as_bytes())?;
            eprintln!("Exported {} row(s) to {path}", rows.len());
        }
        None => println!("{content}"),
    }

    Ok(())
}

fn to_json(rows: &[EvaluationRow]) -> anyhow::Result<String> {
    // result_json already holds the full serialized EvaluationResult.
    let values: Vec<serde_json::Value> = rows
        .iter()
        .map(|r| {
            Ok(serde_json::json!({
                "id": r.id,
                "model": r.model,
                "test_id": r.test_id,
                "cognitive_domain": r.cognitive_domain,
                "classification": r.classification,
                "overall_score": r.overall_score,
                "created_at": r.created_at,
                "result": serde_json::from_str::<serde_json::Value>(&r.result_json)?,
            }))
        })
        .collect::<anyhow::Result<_>>()?;
    Ok(serde_json::to_string_pretty(&values)?)
}

fn to_csv(rows: &[EvaluationRow]) -> String {
    let mut out = String::from(
        "id,model,test_id,cognitive_domain,classification,overall_score,word_count,created_at\n",
    );
    for r in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{:.2},{},{}\n",
            r.id,
            csv_field(&r.model),
            csv_field(&r.test_id),
            csv_field(r.cognitive_domain.as_deref().unwrap_or("")),
            r.classification,
            r.overall_score,
            r.word_count,
            r.created_at,
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_header_and_rows() {
        let rows = vec![EvaluationRow {
            id: "e-1".into(),
            model: "qwen2.5".into(),
            test_id: "t-1".into(),
            test_name: None,
            category: None,
            reasoning_type: None,
            cognitive_domain: Some("reasoning".into()),
            classification: "clean_response".into(),
            overall_score: 82.5,
            word_count: 140,
            detected_case: None,
            result_json: "{}".into(),
            created_at: "2026-08-26T00:00:00Z".into(),
        }];
        let csv = to_csv(&rows);
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,model"));
        assert_eq!(
            lines.next().unwrap(),
            "e-1,qwen2.5,t-1,reasoning,clean_response,82.50,140,2026-08-26T00:00:00Z"
        );
    }
}
