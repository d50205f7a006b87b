//! Prompt templates. Every template carries a single `{text}` placeholder.

use super::SummaryType;

pub struct PromptPair {
    pub map: &'static str,
    pub combine: &'static str,
}

impl PromptPair {
    pub fn render_map(&self, text: &str) -> String {
        self.map.replace("{text}", text)
    }

    pub fn render_combine(&self, text: &str) -> String {
        self.combine.replace("{text}", text)
    }
}

/// Prompts used by the plain `/summarize` endpoint.
pub const BASIC: PromptPair = PromptPair {
    map: "Write a **detailed and comprehensive summary** of the following content. \
Include important points, subtopics, and any nuanced information:\n\n{text}\n",
    combine: "Given the summaries below, write a **detailed and structured summary** \
that preserves all meaningful insights:\n\n{text}\n",
};

const DETAILED: PromptPair = PromptPair {
    map: "Write a **comprehensive and detailed legal analysis** of the following content. Include:
- Background context and case details
- All key legal arguments and evidence
- Legal precedents and citations mentioned
- Court's reasoning and analysis
- Important procedural aspects
- Any dissenting opinions or alternate views

Content: {text}
",
    combine: "Given the detailed analyses below, create a **comprehensive legal summary** that:
- Provides complete case background
- Details all significant legal arguments
- Explains the court's complete reasoning
- Includes all relevant precedents and citations
- Covers procedural history and outcomes
- Maintains legal accuracy and thoroughness

Analyses: {text}
",
};

const CONCISE: PromptPair = PromptPair {
    map: "Write a **concise summary** of the following legal content focusing on:
- Core legal issue (1-2 sentences)
- Key evidence or arguments (2-3 points)
- Final outcome (1-2 sentences)

Keep it under 200 words while maintaining accuracy.

Content: {text}
",
    combine: "Combine the following concise summaries into a **unified concise summary** (300 words max):
- State the main legal issue clearly
- Present key evidence/arguments briefly
- Provide clear final outcome

Summaries: {text}
",
};

const EXECUTIVE: PromptPair = PromptPair {
    map: "Create an **executive summary** suitable for business decision-makers:
- Business impact and implications
- Financial or operational consequences
- Risk assessment
- Key takeaways for leadership

Focus on business relevance, not legal technicalities.

Content: {text}
",
    combine: "Create a **unified executive summary** for senior leadership:
- Overall business impact
- Strategic implications
- Risk factors to consider
- Recommended actions or considerations

Executive summaries: {text}
",
};

const TECHNICAL: PromptPair = PromptPair {
    map: "Provide a **technical legal analysis** for legal professionals:
- Specific legal doctrines and principles applied
- Statutory interpretations and citations
- Precedential value and distinguishing factors
- Procedural posture and jurisdictional issues
- Technical legal reasoning and methodology

Use appropriate legal terminology and citation format.

Content: {text}
",
    combine: "Synthesize the technical analyses into a **comprehensive legal technical summary**:
- Consolidate legal principles and doctrines
- Organize citations and precedents
- Explain technical legal reasoning
- Assess precedential impact

Technical analyses: {text}
",
};

const BULLETS: PromptPair = PromptPair {
    map: "Extract key information as **clear bullet points**:
• Main legal issue
• Key parties involved
• Primary arguments (2-3 bullets)
• Court's decision
• Important outcomes or implications

Use concise, scannable bullet format.

Content: {text}
",
    combine: "Organize the bullet points into a **structured summary**:

## Case Overview
• [Main issue/dispute]

## Key Arguments
• [Primary arguments, max 4 bullets]

## Court Decision
• [Decision and reasoning, max 3 bullets]

## Implications
• [Key outcomes, max 3 bullets]

Bullet points: {text}
",
};

pub fn for_type(summary_type: SummaryType) -> &'static PromptPair {
    match summary_type {
        SummaryType::Detailed => &DETAILED,
        SummaryType::Concise => &CONCISE,
        SummaryType::Executive => &EXECUTIVE,
        SummaryType::Technical => &TECHNICAL,
        SummaryType::Bullets => &BULLETS,
    }
}

/// Prompt for the hybrid pass: extracted sentences as context, then the
/// type's map instructions applied to that context.
pub fn hybrid(summary_type: SummaryType, key_context: &str) -> String {
    let instructions = for_type(summary_type).render_map("Based on the extracted context above");
    format!(
        "Using the following key extracted sentences as context, create a {level} summary that:
1. Incorporates the most important extracted information
2. Adds interpretive analysis and connections
3. Maintains accuracy to the source material

Key extracted context:
{key_context}

{instructions}",
        level = summary_type.as_str(),
    )
}

pub const OVERALL_JUDGMENT: &str = "Given the following legal document summaries, analyze them together and respond ONLY with a JSON object of this shape:
{
  \"pros\": [\"Favorable aspects shared across the documents\"],
  \"cons\": [\"Unfavorable aspects or risks shared across the documents\"],
  \"final_judgment\": \"Overall assessment of the documents taken together (2-3 sentences)\",
  \"legal_themes\": [\"Main legal themes or areas of law covered\"]
}

Summaries:
{text}
";

pub const OVERALL_GENERAL: &str = "Given the following legal case summaries, provide a comprehensive overall summary analyzing the entire set of cases as a whole.

Create a JSON response with this structure:
{
  \"category_overview\": \"Brief explanation of what this collection of cases represents\",
  \"overall_pros\": [\"Main positive aspects across all cases\", \"Common favorable outcomes\", \"Strong legal precedents identified\"],
  \"overall_cons\": [\"Main negative aspects across all cases\", \"Common unfavorable outcomes\", \"Potential legal risks identified\"],
  \"final_judgment\": \"Overall assessment and final judgment about the entire collection (2-3 sentences)\",
  \"legal_insights\": [\"Key legal principles that emerge from the collection\", \"Important trends or patterns observed\", \"Strategic recommendations for similar cases\"],
  \"case_count\": \"Number of cases analyzed\",
  \"dominant_themes\": [\"Main legal themes or areas of law covered\"]
}

Provide a TRUE overall summary - not individual case pros/cons, but synthesized insights about the ENTIRE collection. Focus on patterns, trends, and overarching legal principles that emerge when viewing all cases together.

Summaries:
{text}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_a_placeholder() {
        for t in SummaryType::ALL {
            let pair = for_type(t);
            assert!(pair.map.contains("{text}"), "{t:?} map");
            assert!(pair.combine.contains("{text}"), "{t:?} combine");
        }
        assert!(OVERALL_GENERAL.contains("{text}"));
        assert!(OVERALL_JUDGMENT.contains("{text}"));
    }

    #[test]
    fn hybrid_prompt_embeds_context_without_placeholder() {
        let prompt = hybrid(SummaryType::Concise, "The court held the contract void.");
        assert!(prompt.contains("The court held the contract void."));
        assert!(prompt.contains("concise summary"));
        assert!(!prompt.contains("{text}"));
    }
}
