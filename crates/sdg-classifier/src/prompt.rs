//! Prompt construction for goal classification.
//!
//! The system prompt carries the fixed goal catalog and the required JSON
//! response shape; the user message carries the activity text.

use sdg_core::models::goal::Goal;

const INSTRUCTIONS: &str = "\
You assess university activities against the UN Sustainable Development Goals (SDGs). \
Evaluate the activity against every goal in the catalog and keep only the goals it is \
genuinely relevant to.";

/// Build the system prompt: instructions, the goal catalog, and the response format.
pub fn build_system_prompt(goals: &[Goal], max_results: usize) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(&build_catalog_block(goals));
    prompt.push_str("\n\n");
    prompt.push_str(&format!(
        "Return at most {max_results} goals, most relevant first. For each goal give:\n\
         - sdg_number: the goal number (1-17)\n\
         - relevance_score: an integer from 0 to 100 (100 is extremely relevant)\n\
         - justification: one or two sentences explaining the score\n\n\
         Respond ONLY with valid JSON, no markdown and no extra text, exactly in this shape:\n\
         {{\"impacts\": [{{\"sdg_number\": 1, \"relevance_score\": 85, \"justification\": \"...\"}}]}}\n\
         If no goal is relevant, respond with {{\"impacts\": []}}."
    ));
    prompt
}

/// Render the catalog as an XML-style block, one goal per element.
pub fn build_catalog_block(goals: &[Goal]) -> String {
    let mut block = String::from("<goal_catalog>\n");
    for goal in goals {
        block.push_str(&format!(
            "<goal number=\"{}\" name=\"{}\">{}</goal>\n",
            goal.number, goal.name, goal.description
        ));
    }
    block.push_str("</goal_catalog>");
    block
}

/// Build the user message carrying the activity under assessment.
pub fn build_user_message(title: &str, description: &str) -> String {
    let mut message = String::from("<activity>\n");
    message.push_str(&format!("<title>{}</title>\n", title.trim()));
    message.push_str("<description>\n");
    message.push_str(description.trim());
    message.push_str("\n</description>\n</activity>");
    message
}
