// src/memory/store.rs — SQLite operations

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::core::types::EvaluationResult;
use crate::patterns::detector::{DetectedPattern, ScoreRecord};

/// Low-level SQLite operations for evaluation history and detected
/// patterns.
pub struct Store {
    conn: Connection,
}

#[derive(Debug, Clone)]
pub struct EvaluationRow {
    pub id: String,
    pub model: String,
    pub test_id: String,
    pub test_name: Option<String>,
    pub category: Option<String>,
    pub reasoning_type: Option<String>,
    pub cognitive_domain: Option<String>,
    pub classification: String,
    pub overall_score: f64,
    pub word_count: i64,
    pub detected_case: Option<String>,
    pub result_json: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct PatternRow {
    pub id: String,
    pub model: String,
    pub cognitive_domain: String,
    pub pattern_type: String,
    pub confidence: f64,
    pub severity: f64,
    pub mean: f64,
    pub std: f64,
    pub sample_size: i64,
    pub created_at: String,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Raw connection access, mainly for verification in tests.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // -- Evaluations --

    pub fn insert_evaluation(
        &self,
        id: &str,
        test_id: &str,
        category: Option<&str>,
        cognitive_domain: Option<&str>,
        result: &EvaluationResult,
    ) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        let json = serde_json::to_string(result)?;
        self.conn.execute(
            "INSERT INTO evaluations (id, model, test_id, test_name, category,
             reasoning_type, cognitive_domain, classification, overall_score,
             word_count, detected_case, result_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                id,
                result.model,
                test_id,
                result.test_name,
                category,
                result.reasoning_type.as_str(),
                cognitive_domain,
                result.classification.as_str(),
                result.metrics.overall_score,
                result.metrics.word_count as i64,
                result.detected_case,
                json,
                now
            ],
        )?;
        Ok(())
    }

    pub fn query_evaluations_by_model(&self, model: &str) -> anyhow::Result<Vec<EvaluationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, model, test_id, test_name, category, reasoning_type,
             cognitive_domain, classification, overall_score, word_count,
             detected_case, result_json, created_at
             FROM evaluations WHERE model = ?1 ORDER BY created_at, id",
        )?;

        let rows = stmt.query_map(params![model], |row| {
            Ok(EvaluationRow {
                id: row.get(0)?,
                model: row.get(1)?,
                test_id: row.get(2)?,
                test_name: row.get(3)?,
                category: row.get(4)?,
                reasoning_type: row.get(5)?,
                cognitive_domain: row.get(6)?,
                classification: row.get(7)?,
                overall_score: row.get(8)?,
                word_count: row.get(9)?,
                detected_case: row.get(10)?,
                result_json: row.get(11)?,
                created_at: row.get(12)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Score history grouped by cognitive domain, the snapshot shape the
    /// pattern detector consumes. Rows without a domain are skipped.
    pub fn domain_scores(&self, model: &str) -> anyhow::Result<BTreeMap<String, Vec<ScoreRecord>>> {
        let mut stmt = self.conn.prepare(
            "SELECT cognitive_domain, test_id, overall_score
             FROM evaluations
             WHERE model = ?1 AND cognitive_domain IS NOT NULL
             ORDER BY cognitive_domain, created_at, id",
        )?;

        let rows = stmt.query_map(params![model], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;

        let mut grouped: BTreeMap<String, Vec<ScoreRecord>> = BTreeMap::new();
        for row in rows {
            let (domain, test_id, score) = row?;
            grouped
                .entry(domain)
                .or_default()
                .push(ScoreRecord { test_id, score });
        }
        Ok(grouped)
    }

    // -- Cognitive patterns --

    pub fn insert_pattern(
        &self,
        id: &str,
        model: &str,
        pattern: &DetectedPattern,
    ) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        let evidence = serde_json::to_string(&pattern.evidence_tests)?;
        self.conn.execute(
            "INSERT INTO cognitive_patterns (id, model, cognitive_domain, pattern_type,
             confidence, severity, mean, std, sample_size, evidence_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                model,
                pattern.cognitive_domain,
                pattern.pattern_type.as_str(),
                pattern.confidence_score,
                pattern.severity,
                pattern.statistical_measures.mean,
                pattern.statistical_measures.std,
                pattern.statistical_measures.sample_size as i64,
                evidence,
                now
            ],
        )?;
        Ok(())
    }

    pub fn query_patterns_by_model(&self, model: &str) -> anyhow::Result<Vec<PatternRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, model, cognitive_domain, pattern_type, confidence, severity,
             mean, std, sample_size, created_at
             FROM cognitive_patterns WHERE model = ?1
             ORDER BY created_at, cognitive_domain",
        )?;

        let rows = stmt.query_map(params![model], |row| {
            Ok(PatternRow {
                id: row.get(0)?,
                model: row.get(1)?,
                cognitive_domain: row.get(2)?,
                pattern_type: row.get(3)?,
                confidence: row.get(4)?,
                severity: row.get(5)?,
                mean: row.get(6)?,
                std: row.get(7)?,
                sample_size: row.get(8)?,
                created_at: row.get(9)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}
